//! Moral-weights survey core: entity catalog, dilemma generation, pairwise
//! rating engine, session state, and the submission collection surface.

pub mod analytics;
pub mod catalog;
pub mod collection;
pub mod ratings;
pub mod scenarios;
pub mod service;
pub mod session;

pub(crate) mod ids;

pub use analytics::{
    AnalyticsSink, NullSink, ResponseDigest, ResponseSubmission, ScenarioSummary,
    SessionSubmission, SubmissionError,
};
pub use catalog::{Entity, EntityCatalog, EntityId};
pub use ratings::{
    generate_insights, CategoryWeightView, CoverageStats, EntityWeightView, Insight, InsightKind,
    RatingBook, RatingRecord, BASE_K, INSIGHT_MIN_RESPONSES,
};
pub use scenarios::{
    ChoiceSide, Dilemma, DilemmaOption, DilemmaTemplate, Framing, ScenarioCategory,
    ScenarioGenerator,
};
pub use service::{SurveyService, DEFAULT_SESSION_SUBMIT_INTERVAL};
pub use session::{Response, Session, SessionExport, RESPONSE_HISTORY_LIMIT};
