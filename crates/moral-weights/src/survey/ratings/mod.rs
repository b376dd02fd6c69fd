//! Pairwise-comparison rating engine: logistic expected score with a size
//! adjustment that widens the swing when a larger group loses to a smaller
//! one. That asymmetry is what turns binary choices into an exchange rate
//! between classes of beings.

mod insights;
mod views;

pub use insights::{generate_insights, Insight, InsightKind, INSIGHT_MIN_RESPONSES};
pub use views::{CategoryWeightView, CoverageStats, EntityWeightView};

use super::catalog::{EntityCatalog, EntityId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const BASE_K: f64 = 32.0;

/// Per-entity tally. `rating` is unbounded and unnormalized; it can drift
/// negative. `comparisons == wins + losses` holds after every update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub comparisons: u32,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
}

/// Mapping of entity to rating record. Keys are seeded from the catalog and
/// never removed; a reset zeroes records in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatingBook {
    records: BTreeMap<EntityId, RatingRecord>,
}

impl RatingBook {
    pub fn seeded(catalog: &EntityCatalog) -> Self {
        let mut book = Self::default();
        book.ensure_entities(catalog);
        book
    }

    /// Forward-compatible merge: entities missing from a loaded payload get
    /// default records, already-present records are left untouched.
    pub fn ensure_entities(&mut self, catalog: &EntityCatalog) {
        for entity in catalog.entities() {
            self.records.entry(entity.entity_id()).or_default();
        }
    }

    pub fn get(&self, id: &EntityId) -> Option<&RatingRecord> {
        self.records.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, &RatingRecord)> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Apply one resolved comparison. Unknown ids on either side make the
    /// call a no-op so malformed generator output can never poison the book.
    /// A self-comparison leaves the rating unchanged but still tallies one
    /// win and one loss on the single record.
    pub fn record_outcome(
        &mut self,
        winner: &EntityId,
        loser: &EntityId,
        winner_multiplicity: u32,
        loser_multiplicity: u32,
    ) -> bool {
        if winner == loser {
            if let Some(record) = self.records.get_mut(winner) {
                record.comparisons += 2;
                record.wins += 1;
                record.losses += 1;
                return true;
            }
            return false;
        }

        let (winner_rating, loser_rating) = match (self.records.get(winner), self.records.get(loser))
        {
            (Some(w), Some(l)) => (w.rating, l.rating),
            _ => return false,
        };

        let delta = rating_delta(
            winner_rating,
            loser_rating,
            winner_multiplicity,
            loser_multiplicity,
        );

        if let Some(record) = self.records.get_mut(winner) {
            record.rating += delta;
            record.comparisons += 1;
            record.wins += 1;
        }
        if let Some(record) = self.records.get_mut(loser) {
            record.rating -= delta;
            record.comparisons += 1;
            record.losses += 1;
        }
        true
    }

    pub fn reset(&mut self) {
        for record in self.records.values_mut() {
            *record = RatingRecord::default();
        }
    }
}

/// Swing applied to both sides of a resolved comparison: classic logistic
/// expectation scaled by a K that grows with how badly outnumbered the winner
/// was.
pub(crate) fn rating_delta(
    winner_rating: f64,
    loser_rating: f64,
    winner_multiplicity: u32,
    loser_multiplicity: u32,
) -> f64 {
    debug_assert!(winner_multiplicity >= 1 && loser_multiplicity >= 1);
    let expected_winner =
        1.0 / (1.0 + 10f64.powf((loser_rating - winner_rating) / 400.0));
    let size_ratio = (loser_multiplicity as f64 / winner_multiplicity as f64).max(1.0);
    let adjusted_k = BASE_K * (1.0 + (size_ratio + 1.0).log10() * 0.5);
    adjusted_k * (1.0 - expected_winner)
}
