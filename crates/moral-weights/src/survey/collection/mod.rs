//! Storage-side intake for analytics submissions: stamped append-only
//! records, key-gated admin reads, and a CSV projection. Nothing here feeds
//! back into the rating math.

pub mod domain;
pub mod router;
pub mod service;
pub mod store;

pub use domain::{
    ResponsePayload, SessionPayload, StoredSubmission, SubmissionKind, SubmitterMeta,
};
pub use router::collection_router;
pub use service::{CollectionError, CollectionService, CollectionStats};
pub use store::{ResponseStore, StoreError};
