use super::analytics::{
    AnalyticsSink, ResponseSubmission, ScenarioSummary, SessionSubmission,
};
use super::catalog::EntityCatalog;
use super::scenarios::{ChoiceSide, Dilemma, ScenarioGenerator};
use super::session::Session;
use chrono::Utc;
use rand::Rng;
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_SESSION_SUBMIT_INTERVAL: usize = 10;

/// Client-side orchestrator: composes the catalog, the dilemma generator, and
/// the analytics collaborator around an explicitly passed [`Session`].
pub struct SurveyService<A> {
    catalog: Arc<EntityCatalog>,
    generator: ScenarioGenerator,
    sink: Arc<A>,
    user_agent: String,
    session_submit_interval: usize,
}

impl<A> SurveyService<A>
where
    A: AnalyticsSink + 'static,
{
    pub fn new(
        catalog: Arc<EntityCatalog>,
        sink: Arc<A>,
        user_agent: impl Into<String>,
        session_submit_interval: usize,
    ) -> Self {
        Self {
            generator: ScenarioGenerator::new(catalog.clone()),
            catalog,
            sink,
            user_agent: user_agent.into(),
            session_submit_interval: session_submit_interval.max(1),
        }
    }

    pub fn catalog(&self) -> &EntityCatalog {
        &self.catalog
    }

    pub fn new_session(&self) -> Session {
        Session::new(&self.catalog)
    }

    pub fn restore_session(&self, payload: &str) -> Session {
        Session::restore(&self.catalog, payload)
    }

    pub fn next_dilemma<R: Rng>(&self, session: &Session, rng: &mut R) -> Dilemma {
        self.generator.generate(session.question_count, rng)
    }

    /// Resolve a dilemma: synchronous local mutation first, then best-effort
    /// analytics. Transport failures are logged and swallowed; the local
    /// update is never rolled back or delayed by them.
    pub fn record_choice(&self, session: &mut Session, dilemma: Dilemma, choice: ChoiceSide) {
        let summary = ScenarioSummary::from(&dilemma);
        let scenario_id = dilemma.id.clone();
        session.apply_choice(dilemma, choice);

        let submission = ResponseSubmission {
            session_id: session.session_id.clone(),
            scenario_id,
            choice,
            scenario: summary,
            elo_ratings: session.elo_ratings.clone(),
            user_agent: self.user_agent.clone(),
            question_number: session.question_count,
        };
        if let Err(err) = self.sink.submit_response(submission) {
            debug!(%err, "response submission dropped");
        }

        if session.responses.len() % self.session_submit_interval == 0 {
            self.submit_session_snapshot(session);
        }
    }

    /// Final best-effort snapshot at session end. May be dropped.
    pub fn finish(&self, session: &Session) {
        if !session.responses.is_empty() {
            self.submit_session_snapshot(session);
        }
    }

    pub fn reset(&self, session: &mut Session) {
        session.reset();
    }

    fn submit_session_snapshot(&self, session: &Session) {
        let submission = SessionSubmission::snapshot(session, &self.user_agent, Utc::now());
        if let Err(err) = self.sink.submit_session(submission) {
            debug!(%err, "session submission dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::analytics::{
        AnalyticsSink, ResponseSubmission, SessionSubmission, SubmissionError,
    };
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        responses: Mutex<Vec<ResponseSubmission>>,
        sessions: Mutex<Vec<SessionSubmission>>,
        fail: bool,
    }

    impl AnalyticsSink for RecordingSink {
        fn submit_response(&self, submission: ResponseSubmission) -> Result<(), SubmissionError> {
            if self.fail {
                return Err(SubmissionError::Transport("offline".to_string()));
            }
            self.responses
                .lock()
                .expect("sink mutex poisoned")
                .push(submission);
            Ok(())
        }

        fn submit_session(&self, submission: SessionSubmission) -> Result<(), SubmissionError> {
            if self.fail {
                return Err(SubmissionError::Transport("offline".to_string()));
            }
            self.sessions
                .lock()
                .expect("sink mutex poisoned")
                .push(submission);
            Ok(())
        }
    }

    fn service_with(
        sink: Arc<RecordingSink>,
        interval: usize,
    ) -> SurveyService<RecordingSink> {
        SurveyService::new(
            Arc::new(EntityCatalog::standard()),
            sink,
            "moral-weights-tests/1.0",
            interval,
        )
    }

    #[test]
    fn every_choice_produces_a_response_submission() {
        let sink = Arc::new(RecordingSink::default());
        let service = service_with(sink.clone(), 100);
        let mut session = service.new_session();
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..4 {
            let dilemma = service.next_dilemma(&session, &mut rng);
            service.record_choice(&mut session, dilemma, ChoiceSide::A);
        }

        let responses = sink.responses.lock().expect("sink mutex poisoned");
        assert_eq!(responses.len(), 4);
        assert_eq!(responses[0].question_number, 1);
        assert_eq!(responses[3].question_number, 4);
        assert_eq!(responses[0].user_agent, "moral-weights-tests/1.0");
    }

    #[test]
    fn session_snapshot_fires_on_the_configured_interval() {
        let sink = Arc::new(RecordingSink::default());
        let service = service_with(sink.clone(), 3);
        let mut session = service.new_session();
        let mut rng = StdRng::seed_from_u64(2);

        for _ in 0..7 {
            let dilemma = service.next_dilemma(&session, &mut rng);
            service.record_choice(&mut session, dilemma, ChoiceSide::B);
        }
        service.finish(&session);

        let sessions = sink.sessions.lock().expect("sink mutex poisoned");
        // periodic at 3 and 6 responses, plus the final snapshot
        assert_eq!(sessions.len(), 3);
        let last = sessions.last().expect("final snapshot");
        assert_eq!(last.total_responses, 7);
        assert_eq!(last.responses.len(), 7);
    }

    #[test]
    fn transport_failures_never_disturb_local_state() {
        let sink = Arc::new(RecordingSink {
            fail: true,
            ..RecordingSink::default()
        });
        let service = service_with(sink.clone(), 2);
        let mut session = service.new_session();
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..4 {
            let dilemma = service.next_dilemma(&session, &mut rng);
            service.record_choice(&mut session, dilemma, ChoiceSide::A);
        }
        service.finish(&session);

        assert_eq!(session.responses.len(), 4);
        assert_eq!(session.question_count, 4);
        assert!(sink.responses.lock().expect("sink mutex poisoned").is_empty());
    }

    #[test]
    fn finish_skips_empty_sessions() {
        let sink = Arc::new(RecordingSink::default());
        let service = service_with(sink.clone(), 5);
        let session = service.new_session();

        service.finish(&session);

        assert!(sink.sessions.lock().expect("sink mutex poisoned").is_empty());
    }
}
