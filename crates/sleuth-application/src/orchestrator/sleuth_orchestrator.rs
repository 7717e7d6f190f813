//! SleuthOrchestrator - runs one claim through retrieval, scoring and history.

use super::report::{HistoryOutcome, SubmissionReport};
use super::state::{RunEvent, RunState};
use sleuth_core::assessment::AssessmentModel;
use sleuth_core::claim::Claim;
use sleuth_core::error::{Result, SleuthError};
use sleuth_core::evidence::EvidenceSource;
use sleuth_core::history::HistoryStore;
use sleuth_core::session::{SessionContext, SessionIdentity};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Sequences Evidence Retriever -> Accuracy Assessor -> History Store.
///
/// Every submission is an independent run with its own id; the orchestrator
/// holds no per-run state and can be shared across tasks.
#[derive(Clone)]
pub struct SleuthOrchestrator {
    evidence: Arc<dyn EvidenceSource>,
    assessor: Arc<dyn AssessmentModel>,
    history: HistoryStore,
    session: SessionContext,
    events: Option<UnboundedSender<RunEvent>>,
}

impl SleuthOrchestrator {
    pub fn new(
        evidence: Arc<dyn EvidenceSource>,
        assessor: Arc<dyn AssessmentModel>,
        history: HistoryStore,
        session: SessionContext,
    ) -> Self {
        Self {
            evidence,
            assessor,
            history,
            session,
            events: None,
        }
    }

    /// Sends a [`RunEvent`] for every state change to `sender`.
    pub fn with_events(mut self, sender: UnboundedSender<RunEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    /// Runs a submission to completion.
    pub async fn submit(&self, claim: &str) -> SubmissionReport {
        self.submit_with_cancel(claim, CancellationToken::new()).await
    }

    /// Runs a submission that ends `Failed` with a Cancelled error as soon as
    /// `cancel` fires during an external call.
    pub async fn submit_with_cancel(
        &self,
        claim: &str,
        cancel: CancellationToken,
    ) -> SubmissionReport {
        let mut run = Run::new(claim, self.events.clone());
        info!(run_id = %run.id(), "Submission received");

        // Entry guard
        let identity = match self.session.current_identity().await {
            Ok(Some(identity)) => identity,
            Ok(None) => {
                return run.fail(SleuthError::validation(
                    "You must be logged in to check a claim.",
                ));
            }
            Err(e) => return run.fail(e),
        };
        let claim = match Claim::parse(claim) {
            Ok(claim) => claim,
            Err(e) => return run.fail(e),
        };

        run.advance(RunState::EvidenceFetching);
        let evidence = match guarded(&cancel, self.evidence.retrieve_evidence(&claim)).await {
            Ok(evidence) => evidence,
            Err(e) => {
                error!(run_id = %run.id(), error = %e, "Evidence retrieval failed");
                return run.fail(e);
            }
        };
        debug!(run_id = %run.id(), articles = evidence.len(), "Evidence fetched");
        let blob = evidence.to_blob();
        run.report.evidence = Some(evidence);

        run.advance(RunState::Assessing);
        let assessment = match guarded(&cancel, self.assessor.assess_accuracy(&claim, &blob))
            .await
            .and_then(|assessment| assessment.validated())
        {
            Ok(assessment) => assessment,
            Err(e) => {
                error!(run_id = %run.id(), error = %e, "Accuracy assessment failed");
                return run.fail(e);
            }
        };
        info!(
            run_id = %run.id(),
            score = assessment.accuracy_score,
            verdict = %assessment.verdict(),
            "Claim assessed"
        );
        run.report.assessment = Some(assessment.clone());

        if cancel.is_cancelled() {
            return run.fail(SleuthError::cancelled("submission was abandoned"));
        }

        run.advance(RunState::Persisting);
        if let Err(e) = self.confirm_same_session(&identity).await {
            warn!(run_id = %run.id(), error = %e, "Not saving result");
            return run.fail(e);
        }

        let evidence = run.report.evidence.clone();
        run.report.history = match self
            .history
            .add_entry(&identity.email, &claim, evidence, Some(assessment))
            .await
        {
            Ok(entry_id) => {
                info!(run_id = %run.id(), entry_id = %entry_id, "Result saved to history");
                HistoryOutcome::Saved(entry_id)
            }
            Err(e) => {
                warn!(run_id = %run.id(), error = %e, "Result not saved to history");
                HistoryOutcome::NotSaved(e)
            }
        };

        run.advance(RunState::Done);
        run.report
    }

    /// Re-resolves the session right before persisting.
    ///
    /// A logout (or a login as someone else) while the run was in flight
    /// must not write to anyone's history.
    async fn confirm_same_session(&self, started_as: &SessionIdentity) -> Result<()> {
        match self.session.current_identity().await {
            Ok(Some(current)) if current.email == started_as.email => Ok(()),
            Ok(_) => Err(SleuthError::cancelled(
                "session ended before the result could be saved",
            )),
            Err(e) => Err(e),
        }
    }
}

/// Races `fut` against `cancel`.
async fn guarded<T>(
    cancel: &CancellationToken,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(SleuthError::cancelled("submission was abandoned")),
        result = fut => result,
    }
}

/// Bookkeeping for one run: state, report and event emission.
struct Run {
    report: SubmissionReport,
    events: Option<UnboundedSender<RunEvent>>,
}

impl Run {
    fn new(claim: &str, events: Option<UnboundedSender<RunEvent>>) -> Self {
        Self {
            report: SubmissionReport::new(Uuid::new_v4(), claim),
            events,
        }
    }

    fn id(&self) -> Uuid {
        self.report.run_id
    }

    fn advance(&mut self, next: RunState) {
        debug_assert!(
            self.report.state.can_transition_to(next),
            "illegal transition {} -> {}",
            self.report.state,
            next
        );
        debug!(run_id = %self.id(), from = %self.report.state, to = %next, "Run state changed");
        self.report.state = next;
        if let Some(events) = &self.events {
            // A dropped receiver only means nobody is watching.
            let _ = events.send(RunEvent {
                run_id: self.id(),
                state: next,
            });
        }
    }

    fn fail(mut self, err: SleuthError) -> SubmissionReport {
        self.advance(RunState::Failed);
        self.report.error = Some(err);
        self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sleuth_core::assessment::AccuracyAssessment;
    use sleuth_core::evidence::EvidenceSet;
    use sleuth_infrastructure::{
        InMemoryHistoryRepository, InMemorySessionStore, LocalSessionAuthority,
    };
    use tempfile::TempDir;

    struct NoEvidence;

    #[async_trait]
    impl EvidenceSource for NoEvidence {
        async fn retrieve_evidence(&self, _claim: &Claim) -> Result<EvidenceSet> {
            Ok(EvidenceSet::empty())
        }
    }

    struct Score(f64);

    #[async_trait]
    impl AssessmentModel for Score {
        async fn assess_accuracy(&self, _claim: &Claim, _evidence: &str) -> Result<AccuracyAssessment> {
            Ok(AccuracyAssessment {
                accuracy_score: self.0,
                explanation: "Scored.".to_string(),
                sources: vec![],
            })
        }
    }

    async fn logged_in(temp_dir: &TempDir) -> SessionContext {
        let session = SessionContext::new(
            Arc::new(InMemorySessionStore::new()),
            Arc::new(LocalSessionAuthority::new(temp_dir.path().join("sessions.toml"))),
        );
        let (token, _) = session.authority().issue("ada@example.com").await.unwrap();
        session.store().store_token(&token).await.unwrap();
        session
    }

    #[tokio::test]
    async fn test_events_follow_state_machine() {
        let temp_dir = TempDir::new().unwrap();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let orchestrator = SleuthOrchestrator::new(
            Arc::new(NoEvidence),
            Arc::new(Score(0.8)),
            HistoryStore::new(Arc::new(InMemoryHistoryRepository::new())),
            logged_in(&temp_dir).await,
        )
        .with_events(tx);

        let report = orchestrator.submit("Claim").await;
        assert!(report.is_done());

        let mut states = Vec::new();
        while let Ok(event) = rx.try_recv() {
            assert_eq!(event.run_id, report.run_id);
            states.push(event.state);
        }
        assert_eq!(
            states,
            vec![
                RunState::EvidenceFetching,
                RunState::Assessing,
                RunState::Persisting,
                RunState::Done
            ]
        );
    }

    #[tokio::test]
    async fn test_out_of_range_score_fails_run() {
        let temp_dir = TempDir::new().unwrap();
        let repository = Arc::new(InMemoryHistoryRepository::new());
        let orchestrator = SleuthOrchestrator::new(
            Arc::new(NoEvidence),
            Arc::new(Score(1.5)),
            HistoryStore::new(repository.clone()),
            logged_in(&temp_dir).await,
        );

        let report = orchestrator.submit("Claim").await;
        assert_eq!(report.state, RunState::Failed);
        assert!(report.assessment.is_none());
        assert!(report.error.as_ref().unwrap().is_upstream());
        assert_eq!(report.history, HistoryOutcome::NotAttempted);
        assert!(repository.is_empty().await);
    }

    #[tokio::test]
    async fn test_whitespace_claim_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let orchestrator = SleuthOrchestrator::new(
            Arc::new(NoEvidence),
            Arc::new(Score(0.5)),
            HistoryStore::new(Arc::new(InMemoryHistoryRepository::new())),
            logged_in(&temp_dir).await,
        );

        let report = orchestrator.submit("  \n\t ").await;
        assert_eq!(report.state, RunState::Failed);
        assert_eq!(
            report.error,
            Some(SleuthError::validation("Claim cannot be empty."))
        );
        assert!(report.evidence.is_none());
    }
}
