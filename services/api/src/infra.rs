use metrics_exporter_prometheus::PrometheusHandle;
use moral_weights::survey::collection::{
    CollectionService, ResponsePayload, ResponseStore, SessionPayload, StoreError,
    StoredSubmission, SubmitterMeta,
};
use moral_weights::survey::{
    AnalyticsSink, ResponseSubmission, SessionSubmission, SubmissionError,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::warn;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryResponseStore {
    records: Arc<Mutex<Vec<StoredSubmission>>>,
}

impl ResponseStore for InMemoryResponseStore {
    fn append(&self, record: StoredSubmission) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        guard.push(record);
        Ok(())
    }

    fn load(&self) -> Result<Vec<StoredSubmission>, StoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.clone())
    }
}

/// On-disk shape of the flat store: one JSON document with an append-only
/// record list.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ResponseFile {
    responses: Vec<StoredSubmission>,
}

/// Flat-file store behind the collection service. Reads treat a missing or
/// unreadable file as empty so a corrupted deployment restarts collecting
/// rather than failing every request.
pub(crate) struct FileResponseStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileResponseStore {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    fn read_file(&self) -> ResponseFile {
        match fs::read_to_string(&self.path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(file) => file,
                Err(err) => {
                    warn!(%err, path = %self.path.display(), "response file unreadable, treating as empty");
                    ResponseFile::default()
                }
            },
            Err(_) => ResponseFile::default(),
        }
    }

    fn write_file(&self, file: &ResponseFile) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(file)
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;
        fs::write(&self.path, raw).map_err(|err| StoreError::Unavailable(err.to_string()))
    }
}

impl ResponseStore for FileResponseStore {
    fn append(&self, record: StoredSubmission) -> Result<(), StoreError> {
        let _guard = self.lock.lock().expect("file store mutex poisoned");
        let mut file = self.read_file();
        file.responses.push(record);
        self.write_file(&file)
    }

    fn load(&self) -> Result<Vec<StoredSubmission>, StoreError> {
        let _guard = self.lock.lock().expect("file store mutex poisoned");
        Ok(self.read_file().responses)
    }
}

/// Analytics sink that feeds the local collection service, standing in for a
/// remote analytics endpoint. Store failures map onto transport errors so the
/// survey loop keeps treating them as droppable.
pub(crate) struct CollectionBackedSink<S> {
    service: Arc<CollectionService<S>>,
    origin: SubmitterMeta,
}

impl<S> CollectionBackedSink<S>
where
    S: ResponseStore + 'static,
{
    pub(crate) fn new(service: Arc<CollectionService<S>>, origin: SubmitterMeta) -> Self {
        Self { service, origin }
    }
}

impl<S> AnalyticsSink for CollectionBackedSink<S>
where
    S: ResponseStore + 'static,
{
    fn submit_response(&self, submission: ResponseSubmission) -> Result<(), SubmissionError> {
        let payload = ResponsePayload {
            session_id: submission.session_id,
            scenario_id: submission.scenario_id,
            choice: submission.choice,
            scenario: Some(submission.scenario),
        };
        self.service
            .record_response(self.origin.clone(), payload)
            .map(|_| ())
            .map_err(|err| SubmissionError::Transport(err.to_string()))
    }

    fn submit_session(&self, submission: SessionSubmission) -> Result<(), SubmissionError> {
        let payload = SessionPayload {
            session_id: submission.session_id,
            session_start: Some(submission.session_start),
            responses: submission.responses,
        };
        self.service
            .record_session(self.origin.clone(), payload)
            .map(|_| ())
            .map_err(|err| SubmissionError::Transport(err.to_string()))
    }
}
