use super::ratings::RatingBook;
use super::scenarios::{ChoiceSide, Dilemma, DilemmaOption, Framing, ScenarioCategory};
use super::session::{Response, Session};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Condensed dilemma shape shipped with analytics submissions: everything but
/// the generation id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSummary {
    pub category: ScenarioCategory,
    pub framing: Framing,
    pub question: String,
    pub option_a: DilemmaOption,
    pub option_b: DilemmaOption,
}

impl From<&Dilemma> for ScenarioSummary {
    fn from(dilemma: &Dilemma) -> Self {
        Self {
            category: dilemma.category,
            framing: dilemma.framing,
            question: dilemma.question.clone(),
            option_a: dilemma.option_a.clone(),
            option_b: dilemma.option_b.clone(),
        }
    }
}

/// Per-choice submission, sent after every resolved dilemma.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSubmission {
    pub session_id: String,
    pub scenario_id: String,
    pub choice: ChoiceSide,
    pub scenario: ScenarioSummary,
    pub elo_ratings: RatingBook,
    pub user_agent: String,
    pub question_number: u64,
}

/// One line of the session digest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDigest {
    pub scenario_id: String,
    pub choice: ChoiceSide,
    pub category: ScenarioCategory,
}

impl From<&Response> for ResponseDigest {
    fn from(response: &Response) -> Self {
        Self {
            scenario_id: response.dilemma_id.clone(),
            choice: response.choice,
            category: response.scenario.category,
        }
    }
}

/// Periodic whole-session snapshot, also sent once at session end.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSubmission {
    pub session_id: String,
    pub session_start: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub total_responses: usize,
    pub elo_ratings: RatingBook,
    pub responses: Vec<ResponseDigest>,
    pub user_agent: String,
}

impl SessionSubmission {
    pub fn snapshot(session: &Session, user_agent: &str, completed_at: DateTime<Utc>) -> Self {
        Self {
            session_id: session.session_id.clone(),
            session_start: session.session_start,
            completed_at,
            total_responses: session.responses.len(),
            elo_ratings: session.elo_ratings.clone(),
            responses: session.responses.iter().map(ResponseDigest::from).collect(),
            user_agent: user_agent.to_string(),
        }
    }
}

/// Failure surfaced by an analytics transport. Callers treat it as
/// diagnostics, never as control flow.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("submission transport unavailable: {0}")]
    Transport(String),
}

/// Outbound analytics collaborator. Both operations are best-effort: the
/// survey loop never blocks on, retries, or surfaces their failures.
pub trait AnalyticsSink: Send + Sync {
    fn submit_response(&self, submission: ResponseSubmission) -> Result<(), SubmissionError>;
    fn submit_session(&self, submission: SessionSubmission) -> Result<(), SubmissionError>;
}

/// Sink that drops everything, for contexts with no analytics endpoint.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl AnalyticsSink for NullSink {
    fn submit_response(&self, _submission: ResponseSubmission) -> Result<(), SubmissionError> {
        Ok(())
    }

    fn submit_session(&self, _submission: SessionSubmission) -> Result<(), SubmissionError> {
        Ok(())
    }
}
