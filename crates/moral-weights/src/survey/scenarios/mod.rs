//! Dilemma generation: a closed library of phrasing templates, each with its
//! own entity-selection policy, dispatched uniformly at random.

mod templates;

pub use templates::DilemmaTemplate;

use super::catalog::{Entity, EntityCatalog, EntityId};
use super::ids;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Ethical dimension a dilemma probes. Informational only; the rating math
/// never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioCategory {
    HumanAnimal,
    AnimalComparison,
    MedicalResearch,
    OrganTransplant,
    ActiveHarm,
    Probability,
    FoodEthics,
    Conservation,
    TestingEthics,
    HumanComparison,
    Rescue,
    ResourceAllocation,
    PestControl,
}

impl ScenarioCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::HumanAnimal => "Human vs Animal",
            Self::AnimalComparison => "Animal Comparison",
            Self::MedicalResearch => "Medical Research",
            Self::OrganTransplant => "Organ Transplant",
            Self::ActiveHarm => "Active Harm",
            Self::Probability => "Probability",
            Self::FoodEthics => "Food Ethics",
            Self::Conservation => "Conservation",
            Self::TestingEthics => "Testing Ethics",
            Self::HumanComparison => "Human Comparison",
            Self::Rescue => "Rescue",
            Self::ResourceAllocation => "Resource Allocation",
            Self::PestControl => "Pest Control",
        }
    }
}

/// Framing a template applies on top of its category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Framing {
    PreventHarm,
    SaveOneGroup,
    ResearchEthics,
    TransplantEthics,
    ActiveTradeoff,
    ProbabilityTradeoff,
    FoodEthics,
    ConservationEthics,
    AnimalComparison,
    ProductTesting,
    VaccineEthics,
    SpeciesPreservation,
    LifeStageComparison,
    RescueScenario,
    ResourceAllocation,
    Xenotransplantation,
    PestControl,
    PopulationControl,
    TestingMethodChoice,
    IntelligentAnimalComparison,
}

impl Framing {
    pub const fn label(self) -> &'static str {
        match self {
            Self::PreventHarm => "Prevent Harm",
            Self::SaveOneGroup => "Save One Group",
            Self::ResearchEthics => "Research Ethics",
            Self::TransplantEthics => "Transplant Ethics",
            Self::ActiveTradeoff => "Active Trade-off",
            Self::ProbabilityTradeoff => "Probability Trade-off",
            Self::FoodEthics => "Food Ethics",
            Self::ConservationEthics => "Conservation Ethics",
            Self::AnimalComparison => "Animal Comparison",
            Self::ProductTesting => "Product Testing",
            Self::VaccineEthics => "Vaccine Ethics",
            Self::SpeciesPreservation => "Species Preservation",
            Self::LifeStageComparison => "Life Stage Comparison",
            Self::RescueScenario => "Rescue Scenario",
            Self::ResourceAllocation => "Resource Allocation",
            Self::Xenotransplantation => "Xenotransplantation",
            Self::PestControl => "Pest Control",
            Self::PopulationControl => "Population Control",
            Self::TestingMethodChoice => "Testing Method Choice",
            Self::IntelligentAnimalComparison => "Intelligent Animal Comparison",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChoiceSide {
    A,
    B,
}

impl ChoiceSide {
    pub const fn label(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
        }
    }
}

/// One side of a dilemma, bound to the entity credited or debited when the
/// side wins or loses. The entity is not always the grammatical subject of a
/// "yes" answer: status-quo options debit the entity left at risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DilemmaOption {
    pub text: String,
    pub entity: EntityId,
    pub multiplicity: u32,
    pub categories: Vec<String>,
}

impl DilemmaOption {
    pub(crate) fn new(entity: &Entity, multiplicity: u32, text: String) -> Self {
        Self {
            text,
            entity: entity.entity_id(),
            multiplicity,
            categories: entity.categories.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// One generated forced-choice comparison. Transient: shown once, resolved
/// into a single response, then retained only in capped history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dilemma {
    pub id: String,
    pub category: ScenarioCategory,
    pub framing: Framing,
    pub question: String,
    pub option_a: DilemmaOption,
    pub option_b: DilemmaOption,
}

impl Dilemma {
    pub fn option(&self, side: ChoiceSide) -> &DilemmaOption {
        match side {
            ChoiceSide::A => &self.option_a,
            ChoiceSide::B => &self.option_b,
        }
    }
}

/// Stateless dilemma factory. Every call samples one template uniformly from
/// the library and stamps a generation-unique id.
#[derive(Debug, Clone)]
pub struct ScenarioGenerator {
    catalog: Arc<EntityCatalog>,
}

impl ScenarioGenerator {
    pub fn new(catalog: Arc<EntityCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &EntityCatalog {
        &self.catalog
    }

    pub fn generate<R: Rng>(&self, sequence: u64, rng: &mut R) -> Dilemma {
        let template = DilemmaTemplate::ALL[rng.gen_range(0..DilemmaTemplate::ALL.len())];
        let mut dilemma = template.build(&self.catalog, rng);
        dilemma.id = format!(
            "q{}_{}_{}",
            sequence,
            ids::millis_token(),
            ids::random_token(rng, 4)
        );
        dilemma
    }
}

/// Grouped rendering for counts shown in question text; counts up to 999 stay
/// plain.
pub(crate) fn format_count(value: u32) -> String {
    let raw = value.to_string();
    if value < 1_000 {
        return raw;
    }
    let len = raw.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (index, digit) in raw.chars().enumerate() {
        if index > 0 && (len - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn format_count_groups_thousands() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(50_000), "50,000");
        assert_eq!(format_count(1_000_000), "1,000,000");
        assert_eq!(format_count(10_000_000), "10,000,000");
    }

    #[test]
    fn generated_ids_are_unique_and_sequenced() {
        let generator = ScenarioGenerator::new(Arc::new(EntityCatalog::standard()));
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = std::collections::HashSet::new();
        for sequence in 0..100u64 {
            let dilemma = generator.generate(sequence, &mut rng);
            assert!(dilemma.id.starts_with(&format!("q{sequence}_")));
            assert!(seen.insert(dilemma.id));
        }
    }

    #[test]
    fn dispatch_reaches_a_spread_of_templates() {
        let generator = ScenarioGenerator::new(Arc::new(EntityCatalog::standard()));
        let mut rng = StdRng::seed_from_u64(17);
        let mut framings = std::collections::HashSet::new();
        for sequence in 0..400u64 {
            framings.insert(generator.generate(sequence, &mut rng).framing);
        }
        assert!(
            framings.len() >= 15,
            "uniform dispatch should touch most framings, saw {}",
            framings.len()
        );
    }

    #[test]
    fn every_option_carries_entity_categories() {
        let generator = ScenarioGenerator::new(Arc::new(EntityCatalog::standard()));
        let mut rng = StdRng::seed_from_u64(29);
        for sequence in 0..200u64 {
            let dilemma = generator.generate(sequence, &mut rng);
            assert!(!dilemma.option_a.categories.is_empty());
            assert!(!dilemma.option_b.categories.is_empty());
        }
    }
}
