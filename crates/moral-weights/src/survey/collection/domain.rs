use super::super::analytics::{ResponseDigest, ScenarioSummary};
use super::super::scenarios::ChoiceSide;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Origin stamp attached to every stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitterMeta {
    pub ip: String,
    pub user_agent: String,
}

impl SubmitterMeta {
    pub fn unknown() -> Self {
        Self {
            ip: "unknown".to_string(),
            user_agent: "unknown".to_string(),
        }
    }
}

/// Body accepted on the single-response endpoint. Clients send richer
/// payloads; unknown fields are ignored so the intake shape can trail the
/// client shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePayload {
    pub session_id: String,
    pub scenario_id: String,
    pub choice: ChoiceSide,
    #[serde(default)]
    pub scenario: Option<ScenarioSummary>,
}

/// Body accepted on the full-session endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPayload {
    pub session_id: String,
    #[serde(default)]
    pub session_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub responses: Vec<ResponseDigest>,
}

/// One appended record of the flat store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSubmission {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub ip: String,
    pub user_agent: String,
    pub session_id: String,
    #[serde(flatten)]
    pub kind: SubmissionKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SubmissionKind {
    #[serde(rename_all = "camelCase")]
    Response {
        scenario_id: String,
        choice: ChoiceSide,
        #[serde(default)]
        scenario: Option<ScenarioSummary>,
    },
    #[serde(rename_all = "camelCase")]
    FullSession {
        #[serde(default)]
        session_start: Option<DateTime<Utc>>,
        total_responses: usize,
        responses: Vec<ResponseDigest>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_payload_tolerates_extra_client_fields() {
        let body = serde_json::json!({
            "sessionId": "sess_abc",
            "scenarioId": "q4_xyz",
            "choice": "A",
            "eloRatings": { "dog": { "rating": 3.0 } },
            "userAgent": "browser",
            "questionNumber": 5
        });

        let payload: ResponsePayload =
            serde_json::from_value(body).expect("payload tolerates unknown fields");
        assert_eq!(payload.session_id, "sess_abc");
        assert_eq!(payload.choice, ChoiceSide::A);
        assert!(payload.scenario.is_none());
    }

    #[test]
    fn stored_submission_kinds_round_trip_with_type_tags() {
        let record = StoredSubmission {
            id: "r1".to_string(),
            timestamp: Utc::now(),
            ip: "10.0.0.1".to_string(),
            user_agent: "test".to_string(),
            session_id: "sess_1".to_string(),
            kind: SubmissionKind::FullSession {
                session_start: None,
                total_responses: 0,
                responses: Vec::new(),
            },
        };

        let value = serde_json::to_value(&record).expect("record serializes");
        assert_eq!(value["type"], "full_session");

        let back: StoredSubmission =
            serde_json::from_value(value).expect("record deserializes");
        assert!(matches!(back.kind, SubmissionKind::FullSession { .. }));
    }
}
