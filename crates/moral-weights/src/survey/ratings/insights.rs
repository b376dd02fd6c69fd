use super::super::catalog::{Entity, EntityCatalog};
use super::{RatingBook, RatingRecord};
use serde::Serialize;

/// Minimum resolved responses before any heuristic is surfaced.
pub const INSIGHT_MIN_RESPONSES: usize = 10;

const STRONG_HUMAN_GAP: f64 = 20.0;
const MODERATE_HUMAN_GAP: f64 = 10.0;
const EQUAL_WEIGHT_GAP: f64 = 5.0;
const COMPANION_BIAS_GAP: f64 = 10.0;
const GREAT_APE_GAP: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    HumanAnimalGap,
    CompanionBias,
    GreatApeRecognition,
    Coverage,
}

#[derive(Debug, Clone, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub detail: String,
}

fn mean_rating<'a, I>(records: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a RatingRecord>,
{
    let mut total = 0.0;
    let mut count = 0usize;
    for record in records {
        total += record.rating;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(total / count as f64)
    }
}

/// Fixed comparative heuristics over the tested portion of the book. Empty
/// until the response count crosses the gate; each heuristic only fires past
/// its own threshold.
pub fn generate_insights(
    book: &RatingBook,
    catalog: &EntityCatalog,
    total_responses: usize,
) -> Vec<Insight> {
    if total_responses < INSIGHT_MIN_RESPONSES {
        return Vec::new();
    }

    let mut insights = Vec::new();

    let tested: Vec<(&Entity, &RatingRecord)> = book
        .iter()
        .filter(|(_, record)| record.comparisons > 0)
        .filter_map(|(id, record)| catalog.get(id.as_str()).map(|entity| (entity, record)))
        .collect();

    let humans: Vec<&RatingRecord> = tested
        .iter()
        .filter(|(entity, _)| entity.is_human)
        .map(|(_, record)| *record)
        .collect();
    let animals: Vec<&RatingRecord> = tested
        .iter()
        .filter(|(entity, _)| !entity.is_human)
        .map(|(_, record)| *record)
        .collect();

    if let (Some(human_avg), Some(animal_avg)) =
        (mean_rating(humans.iter().copied()), mean_rating(animals.iter().copied()))
    {
        let gap = human_avg - animal_avg;
        if gap > STRONG_HUMAN_GAP {
            insights.push(Insight {
                kind: InsightKind::HumanAnimalGap,
                detail: format!(
                    "Strong human preference: human entities average {:.0} points higher than animals.",
                    gap
                ),
            });
        } else if gap > MODERATE_HUMAN_GAP {
            insights.push(Insight {
                kind: InsightKind::HumanAnimalGap,
                detail: format!(
                    "Moderate human preference: human entities average {:.0} points higher than animals.",
                    gap
                ),
            });
        } else if gap < EQUAL_WEIGHT_GAP {
            insights.push(Insight {
                kind: InsightKind::HumanAnimalGap,
                detail: format!(
                    "Relatively equal weighting: only {:.0} point gap between humans and animals on average.",
                    gap
                ),
            });
        }
    }

    let tag_mean = |tag: &str| {
        mean_rating(
            tested
                .iter()
                .filter(|(entity, _)| entity.categories.iter().any(|category| *category == tag))
                .map(|(_, record)| *record),
        )
    };

    if let (Some(companion_avg), Some(livestock_avg)) = (tag_mean("companion"), tag_mean("livestock"))
    {
        if companion_avg > livestock_avg + COMPANION_BIAS_GAP {
            insights.push(Insight {
                kind: InsightKind::CompanionBias,
                detail: format!(
                    "Pet bias detected: companion animals rated {:.0} points higher than farmed animals.",
                    companion_avg - livestock_avg
                ),
            });
        }
    }

    let ape_records: Vec<&RatingRecord> = tested
        .iter()
        .filter(|(entity, _)| entity.categories.contains(&"great-ape"))
        .map(|(_, record)| *record)
        .collect();
    let other_animals: Vec<&RatingRecord> = tested
        .iter()
        .filter(|(entity, _)| !entity.is_human && !entity.categories.contains(&"great-ape"))
        .map(|(_, record)| *record)
        .collect();

    if let (Some(ape_avg), Some(other_avg)) = (
        mean_rating(ape_records.iter().copied()),
        mean_rating(other_animals.iter().copied()),
    ) {
        if ape_avg > other_avg + GREAT_APE_GAP {
            insights.push(Insight {
                kind: InsightKind::GreatApeRecognition,
                detail: format!(
                    "Great ape recognition: apes rated {:.0} points higher than other animals.",
                    ape_avg - other_avg
                ),
            });
        }
    }

    insights.push(Insight {
        kind: InsightKind::Coverage,
        detail: format!(
            "Analysis based on {} responses comparing {} entities.",
            total_responses,
            tested.len()
        ),
    });

    insights
}
