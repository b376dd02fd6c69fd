use super::catalog::EntityCatalog;
use super::ids;
use super::ratings::RatingBook;
use super::scenarios::{ChoiceSide, Dilemma};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Number of recent responses kept in the on-screen history view.
pub const RESPONSE_HISTORY_LIMIT: usize = 15;

/// Record of one resolved dilemma, with a snapshot of what was asked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub dilemma_id: String,
    pub choice: ChoiceSide,
    pub scenario: Dilemma,
    pub timestamp: DateTime<Utc>,
}

/// One participant's running state. Owned by its caller and passed explicitly;
/// doubles as the flat persistence payload, so loading an older or partial
/// payload fills in whatever is missing instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_id: String,
    pub session_start: DateTime<Utc>,
    #[serde(default)]
    pub question_count: u64,
    #[serde(default)]
    pub responses: Vec<Response>,
    #[serde(default)]
    pub elo_ratings: RatingBook,
    #[serde(default)]
    pub started: bool,
}

impl Session {
    pub fn new(catalog: &EntityCatalog) -> Self {
        Self {
            session_id: ids::session_token(&mut rand::thread_rng()),
            session_start: Utc::now(),
            question_count: 0,
            responses: Vec::new(),
            elo_ratings: RatingBook::seeded(catalog),
            started: false,
        }
    }

    /// Load a persisted payload, tolerating older shapes: entities added to
    /// the catalog since the payload was written get default records, and
    /// unparseable payloads fall back to a fresh session.
    pub fn restore(catalog: &EntityCatalog, payload: &str) -> Self {
        match serde_json::from_str::<Session>(payload) {
            Ok(mut session) => {
                session.elo_ratings.ensure_entities(catalog);
                session
            }
            Err(err) => {
                warn!(%err, "saved session state unreadable, starting fresh");
                Self::new(catalog)
            }
        }
    }

    /// Resolve the presented dilemma: update both rating records from the
    /// chosen and rejected options, append the response, and advance the
    /// question counter. Returns the appended record.
    pub fn apply_choice(&mut self, dilemma: Dilemma, choice: ChoiceSide) -> &Response {
        let (winner, loser) = match choice {
            ChoiceSide::A => (&dilemma.option_a, &dilemma.option_b),
            ChoiceSide::B => (&dilemma.option_b, &dilemma.option_a),
        };

        self.elo_ratings.record_outcome(
            &winner.entity,
            &loser.entity,
            winner.multiplicity,
            loser.multiplicity,
        );

        self.responses.push(Response {
            dilemma_id: dilemma.id.clone(),
            choice,
            scenario: dilemma,
            timestamp: Utc::now(),
        });
        self.question_count += 1;

        let appended = self.responses.len() - 1;
        &self.responses[appended]
    }

    /// Most recent responses, newest first, capped for display.
    pub fn recent_responses(&self) -> Vec<&Response> {
        self.responses
            .iter()
            .rev()
            .take(RESPONSE_HISTORY_LIMIT)
            .collect()
    }

    /// Full replacement of the participant state: fresh identifiers, empty
    /// log, zeroed records. Keys are preserved so views stay stable.
    pub fn reset(&mut self) {
        self.session_id = ids::session_token(&mut rand::thread_rng());
        self.session_start = Utc::now();
        self.question_count = 0;
        self.responses.clear();
        self.elo_ratings.reset();
    }

    pub fn export(&self, export_time: DateTime<Utc>) -> SessionExport {
        SessionExport {
            session_id: self.session_id.clone(),
            session_start: self.session_start,
            export_time,
            total_responses: self.responses.len(),
            elo_ratings: self.elo_ratings.clone(),
            responses: self.responses.clone(),
        }
    }
}

/// Download/export payload mirroring the persisted shape plus an export stamp.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionExport {
    pub session_id: String,
    pub session_start: DateTime<Utc>,
    pub export_time: DateTime<Utc>,
    pub total_responses: usize,
    pub elo_ratings: RatingBook,
    pub responses: Vec<Response>,
}
