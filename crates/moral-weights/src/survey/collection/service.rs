use super::super::ids;
use super::domain::{
    ResponsePayload, SessionPayload, StoredSubmission, SubmissionKind, SubmitterMeta,
};
use super::store::{ResponseStore, StoreError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;

const CSV_HEADER: [&str; 8] = [
    "id",
    "timestamp",
    "ip",
    "sessionId",
    "scenarioId",
    "choice",
    "optionA",
    "optionB",
];

/// Intake and admin surface over the append-only store.
pub struct CollectionService<S> {
    store: Arc<S>,
    admin_key: String,
}

impl<S> CollectionService<S>
where
    S: ResponseStore + 'static,
{
    pub fn new(store: Arc<S>, admin_key: impl Into<String>) -> Self {
        Self {
            store,
            admin_key: admin_key.into(),
        }
    }

    pub fn authorize(&self, key: Option<&str>) -> bool {
        key == Some(self.admin_key.as_str())
    }

    pub fn record_response(
        &self,
        meta: SubmitterMeta,
        payload: ResponsePayload,
    ) -> Result<StoredSubmission, StoreError> {
        let record = StoredSubmission {
            id: ids::record_token(&mut rand::thread_rng()),
            timestamp: Utc::now(),
            ip: meta.ip,
            user_agent: meta.user_agent,
            session_id: payload.session_id,
            kind: SubmissionKind::Response {
                scenario_id: payload.scenario_id,
                choice: payload.choice,
                scenario: payload.scenario,
            },
        };
        self.store.append(record.clone())?;
        Ok(record)
    }

    pub fn record_session(
        &self,
        meta: SubmitterMeta,
        payload: SessionPayload,
    ) -> Result<StoredSubmission, StoreError> {
        let record = StoredSubmission {
            id: ids::record_token(&mut rand::thread_rng()),
            timestamp: Utc::now(),
            ip: meta.ip,
            user_agent: meta.user_agent,
            session_id: payload.session_id,
            kind: SubmissionKind::FullSession {
                session_start: payload.session_start,
                total_responses: payload.responses.len(),
                responses: payload.responses,
            },
        };
        self.store.append(record.clone())?;
        Ok(record)
    }

    pub fn records(&self) -> Result<Vec<StoredSubmission>, StoreError> {
        self.store.load()
    }

    pub fn stats(&self) -> Result<CollectionStats, StoreError> {
        let records = self.store.load()?;

        let submitters: BTreeSet<&str> = records.iter().map(|r| r.ip.as_str()).collect();
        let sessions: BTreeSet<&str> = records.iter().map(|r| r.session_id.as_str()).collect();

        Ok(CollectionStats {
            total_records: records.len(),
            unique_submitters: submitters.len(),
            unique_sessions: sessions.len(),
            first_record: records.first().map(|r| r.timestamp),
            last_record: records.last().map(|r| r.timestamp),
        })
    }

    /// Flatten the store into per-response CSV rows. Full-session records
    /// contribute one row per digest entry; digests carry no option text, so
    /// those columns stay empty, as do single responses stored without a
    /// scenario snapshot.
    pub fn export_csv(&self) -> Result<String, CollectionError> {
        let records = self.store.load()?;

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(CSV_HEADER)
            .map_err(|err| CollectionError::Csv(err.to_string()))?;

        for record in &records {
            let timestamp = record.timestamp.to_rfc3339();
            match &record.kind {
                SubmissionKind::Response {
                    scenario_id,
                    choice,
                    scenario,
                } => {
                    let option_a = scenario
                        .as_ref()
                        .map(|s| s.option_a.text.as_str())
                        .unwrap_or("");
                    let option_b = scenario
                        .as_ref()
                        .map(|s| s.option_b.text.as_str())
                        .unwrap_or("");
                    writer
                        .write_record([
                            record.id.as_str(),
                            timestamp.as_str(),
                            record.ip.as_str(),
                            record.session_id.as_str(),
                            scenario_id.as_str(),
                            choice.label(),
                            option_a,
                            option_b,
                        ])
                        .map_err(|err| CollectionError::Csv(err.to_string()))?;
                }
                SubmissionKind::FullSession { responses, .. } => {
                    for digest in responses {
                        writer
                            .write_record([
                                record.id.as_str(),
                                timestamp.as_str(),
                                record.ip.as_str(),
                                record.session_id.as_str(),
                                digest.scenario_id.as_str(),
                                digest.choice.label(),
                                "",
                                "",
                            ])
                            .map_err(|err| CollectionError::Csv(err.to_string()))?;
                    }
                }
            }
        }

        let bytes = writer
            .into_inner()
            .map_err(|err| CollectionError::Csv(err.to_string()))?;
        String::from_utf8(bytes).map_err(|err| CollectionError::Csv(err.to_string()))
    }
}

/// Aggregate numbers behind the admin stats endpoint.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionStats {
    pub total_records: usize,
    pub unique_submitters: usize,
    pub unique_sessions: usize,
    pub first_record: Option<DateTime<Utc>>,
    pub last_record: Option<DateTime<Utc>>,
}

/// Error raised by the collection service.
#[derive(Debug, thiserror::Error)]
pub enum CollectionError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("csv export failed: {0}")]
    Csv(String),
}

#[cfg(test)]
mod tests {
    use super::super::super::analytics::ResponseDigest;
    use super::super::super::scenarios::{ChoiceSide, ScenarioCategory};
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct VecStore {
        records: Mutex<Vec<StoredSubmission>>,
    }

    impl ResponseStore for VecStore {
        fn append(&self, record: StoredSubmission) -> Result<(), StoreError> {
            self.records
                .lock()
                .expect("store mutex poisoned")
                .push(record);
            Ok(())
        }

        fn load(&self) -> Result<Vec<StoredSubmission>, StoreError> {
            Ok(self.records.lock().expect("store mutex poisoned").clone())
        }
    }

    fn meta(ip: &str) -> SubmitterMeta {
        SubmitterMeta {
            ip: ip.to_string(),
            user_agent: "tests".to_string(),
        }
    }

    fn service() -> CollectionService<VecStore> {
        CollectionService::new(Arc::new(VecStore::default()), "secret")
    }

    fn response_payload(session: &str, scenario: &str) -> ResponsePayload {
        ResponsePayload {
            session_id: session.to_string(),
            scenario_id: scenario.to_string(),
            choice: ChoiceSide::A,
            scenario: None,
        }
    }

    #[test]
    fn authorize_accepts_only_the_exact_key() {
        let service = service();
        assert!(service.authorize(Some("secret")));
        assert!(!service.authorize(Some("Secret")));
        assert!(!service.authorize(Some("")));
        assert!(!service.authorize(None));
    }

    #[test]
    fn stats_count_distinct_submitters_and_sessions() {
        let service = service();
        service
            .record_response(meta("1.1.1.1"), response_payload("sess_a", "q1"))
            .expect("appends");
        service
            .record_response(meta("1.1.1.1"), response_payload("sess_a", "q2"))
            .expect("appends");
        service
            .record_response(meta("2.2.2.2"), response_payload("sess_b", "q1"))
            .expect("appends");

        let stats = service.stats().expect("stats compute");
        assert_eq!(stats.total_records, 3);
        assert_eq!(stats.unique_submitters, 2);
        assert_eq!(stats.unique_sessions, 2);
        assert!(stats.first_record.is_some());
        assert!(stats.first_record <= stats.last_record);
    }

    #[test]
    fn csv_flattens_full_sessions_into_per_response_rows() {
        let service = service();
        service
            .record_response(meta("1.1.1.1"), response_payload("sess_a", "q1"))
            .expect("appends");
        service
            .record_session(
                meta("2.2.2.2"),
                SessionPayload {
                    session_id: "sess_b".to_string(),
                    session_start: None,
                    responses: vec![
                        ResponseDigest {
                            scenario_id: "q1".to_string(),
                            choice: ChoiceSide::A,
                            category: ScenarioCategory::Rescue,
                        },
                        ResponseDigest {
                            scenario_id: "q2".to_string(),
                            choice: ChoiceSide::B,
                            category: ScenarioCategory::FoodEthics,
                        },
                    ],
                },
            )
            .expect("appends");

        let csv = service.export_csv().expect("csv renders");
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4, "header plus three flattened rows");
        assert_eq!(lines[0], CSV_HEADER.join(","));
        assert!(lines[2].contains("sess_b"));
        assert!(lines[3].contains(",B,"));
    }

    #[test]
    fn empty_store_yields_empty_stats_and_header_only_csv() {
        let service = service();
        let stats = service.stats().expect("stats compute");
        assert_eq!(stats.total_records, 0);
        assert!(stats.first_record.is_none());

        let csv = service.export_csv().expect("csv renders");
        assert_eq!(csv.lines().count(), 1);
    }
}
