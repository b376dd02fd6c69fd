use super::super::catalog::{Entity, EntityCatalog};
use super::{format_count, Dilemma, DilemmaOption, Framing, ScenarioCategory};
use rand::Rng;

/// Probability of routing an eligible draw to a named human subgroup instead
/// of a generic role. Kept low so the subgroup is probed without dominating.
const SPECIFIC_GROUP_CHANCE: f64 = 0.15;
const SPECIFIC_GROUP_CHANCE_ACTIVE: f64 = 0.10;

/// Closed library of dilemma templates. Each variant is a pure function of
/// the catalog and a random source; dispatch samples uniformly over `ALL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DilemmaTemplate {
    PreventHarm,
    SaveOneGroup,
    MedicalResearch,
    TransplantFromDeceased,
    TransplantBySacrifice,
    KillToSave,
    CertaintyGamble,
    FoodEthics,
    ConservationVsDevelopment,
    PetVsLivestock,
    CosmeticTesting,
    VaccineDevelopment,
    EndangeredVsDevelopment,
    HumanLifeStages,
    RescueTriage,
    ResourceAllocation,
    Xenotransplantation,
    PestControl,
    PopulationCulling,
    LabAnimalChoice,
    IntelligentAnimalComparison,
}

impl DilemmaTemplate {
    pub const ALL: [Self; 21] = [
        Self::PreventHarm,
        Self::SaveOneGroup,
        Self::MedicalResearch,
        Self::TransplantFromDeceased,
        Self::TransplantBySacrifice,
        Self::KillToSave,
        Self::CertaintyGamble,
        Self::FoodEthics,
        Self::ConservationVsDevelopment,
        Self::PetVsLivestock,
        Self::CosmeticTesting,
        Self::VaccineDevelopment,
        Self::EndangeredVsDevelopment,
        Self::HumanLifeStages,
        Self::RescueTriage,
        Self::ResourceAllocation,
        Self::Xenotransplantation,
        Self::PestControl,
        Self::PopulationCulling,
        Self::LabAnimalChoice,
        Self::IntelligentAnimalComparison,
    ];

    pub fn build<R: Rng>(self, catalog: &EntityCatalog, rng: &mut R) -> Dilemma {
        match self {
            Self::PreventHarm => prevent_harm(catalog, rng),
            Self::SaveOneGroup => save_one_group(catalog, rng),
            Self::MedicalResearch => medical_research(catalog, rng),
            Self::TransplantFromDeceased => transplant_from_deceased(catalog, rng),
            Self::TransplantBySacrifice => transplant_by_sacrifice(catalog, rng),
            Self::KillToSave => kill_to_save(catalog, rng),
            Self::CertaintyGamble => certainty_gamble(catalog, rng),
            Self::FoodEthics => food_ethics(catalog, rng),
            Self::ConservationVsDevelopment => conservation_vs_development(catalog, rng),
            Self::PetVsLivestock => pet_vs_livestock(catalog, rng),
            Self::CosmeticTesting => cosmetic_testing(catalog, rng),
            Self::VaccineDevelopment => vaccine_development(catalog, rng),
            Self::EndangeredVsDevelopment => endangered_vs_development(catalog, rng),
            Self::HumanLifeStages => human_life_stages(catalog, rng),
            Self::RescueTriage => rescue_triage(catalog, rng),
            Self::ResourceAllocation => resource_allocation(catalog, rng),
            Self::Xenotransplantation => xenotransplantation(catalog, rng),
            Self::PestControl => pest_control(catalog, rng),
            Self::PopulationCulling => population_culling(catalog, rng),
            Self::LabAnimalChoice => lab_animal_choice(catalog, rng),
            Self::IntelligentAnimalComparison => intelligent_animal_comparison(catalog, rng),
        }
    }
}

fn pick<'a, T, R: Rng>(rng: &mut R, items: &'a [T]) -> &'a T {
    &items[rng.gen_range(0..items.len())]
}

fn pick_entity<'a, R: Rng>(rng: &mut R, pool: &[&'a Entity]) -> &'a Entity {
    pool[rng.gen_range(0..pool.len())]
}

fn pick_count<R: Rng>(rng: &mut R, choices: &[u32]) -> u32 {
    choices[rng.gen_range(0..choices.len())]
}

/// Resolve a fixed id list against the catalog. Unregistered ids simply drop
/// out of the pool instead of faulting the question loop.
fn named_pool<'a>(catalog: &'a EntityCatalog, ids: &[&str]) -> Vec<&'a Entity> {
    ids.iter().filter_map(|id| catalog.get(id)).collect()
}

fn another_animal<'a, R: Rng>(
    catalog: &'a EntityCatalog,
    rng: &mut R,
    excluded: &Entity,
) -> &'a Entity {
    let pool: Vec<&Entity> = catalog
        .animals()
        .into_iter()
        .filter(|entity| entity.id != excluded.id)
        .collect();
    pick_entity(rng, &pool)
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn dilemma(
    category: ScenarioCategory,
    framing: Framing,
    question: String,
    option_a: DilemmaOption,
    option_b: DilemmaOption,
) -> Dilemma {
    Dilemma {
        id: String::new(),
        category,
        framing,
        question,
        option_a,
        option_b,
    }
}

/// Pair drawn for the harm-framing templates: a named subgroup against an
/// animal at low probability, otherwise human-vs-animal or two distinct
/// animals at even odds.
fn harm_pair<'a, R: Rng>(catalog: &'a EntityCatalog, rng: &mut R) -> (&'a Entity, &'a Entity) {
    if rng.gen_bool(SPECIFIC_GROUP_CHANCE) {
        let first = pick_entity(rng, &catalog.specific_groups());
        let second = pick_entity(rng, &catalog.animals());
        (first, second)
    } else if rng.gen_bool(0.5) {
        let first = pick_entity(rng, &catalog.humans());
        let second = pick_entity(rng, &catalog.animals());
        (first, second)
    } else {
        let first = pick_entity(rng, &catalog.animals());
        let second = another_animal(catalog, rng, first);
        (first, second)
    }
}

fn prevent_harm<R: Rng>(catalog: &EntityCatalog, rng: &mut R) -> Dilemma {
    let (entity_a, entity_b) = harm_pair(catalog, rng);
    let num_a = pick_count(rng, &[1, 1, 1, 2, 5]);
    let num_b = pick_count(rng, &[1, 2, 5, 10, 20, 50, 100]);

    let category = if entity_a.is_human {
        ScenarioCategory::HumanAnimal
    } else {
        ScenarioCategory::AnimalComparison
    };

    let death_text = |entity: &Entity, count: u32| {
        format!(
            "{} {} {}",
            format_count(count),
            entity.display_form(count),
            if count == 1 { "dies" } else { "die" }
        )
    };

    dilemma(
        category,
        Framing::PreventHarm,
        "Which outcome would you choose to prevent?".to_string(),
        DilemmaOption::new(entity_a, num_a, death_text(entity_a, num_a)),
        DilemmaOption::new(entity_b, num_b, death_text(entity_b, num_b)),
    )
}

fn save_one_group<R: Rng>(catalog: &EntityCatalog, rng: &mut R) -> Dilemma {
    let (entity_a, entity_b) = harm_pair(catalog, rng);
    let num_a = pick_count(rng, &[1, 1, 2, 3]);
    let num_b = pick_count(rng, &[1, 2, 5, 10, 20]);

    let category = if entity_a.is_human {
        ScenarioCategory::HumanAnimal
    } else {
        ScenarioCategory::AnimalComparison
    };

    let save_text = |entity: &Entity, count: u32| {
        format!("Save {} {}", format_count(count), entity.display_form(count))
    };

    dilemma(
        category,
        Framing::SaveOneGroup,
        "You can only save one group. Which do you save?".to_string(),
        DilemmaOption::new(entity_a, num_a, save_text(entity_a, num_a)),
        DilemmaOption::new(entity_b, num_b, save_text(entity_b, num_b)),
    )
}

fn medical_research<R: Rng>(catalog: &EntityCatalog, rng: &mut R) -> Dilemma {
    let human = pick_entity(rng, &catalog.all_humans());
    let animal = pick_entity(
        rng,
        &named_pool(catalog, &["mouse", "rat", "rabbit", "monkey", "pig", "dog"]),
    );
    let animal_num = pick_count(rng, &[10, 50, 100, 500, 1000, 5000]);
    let humans_saved = pick_count(rng, &[100, 500, 1000, 5000, 10_000, 50_000]);
    let probability = pick_count(rng, &[5, 10, 15, 20, 30, 50]);
    let condition = pick(
        rng,
        &[
            "cancer",
            "heart disease",
            "Alzheimer's",
            "diabetes",
            "a rare genetic disorder",
            "malaria",
            "HIV/AIDS",
        ],
    );

    dilemma(
        ScenarioCategory::MedicalResearch,
        Framing::ResearchEthics,
        format!(
            "A potential treatment for {} could save {} {} per year. The research has a {}% \
             chance of success but requires testing on {} {}. Should the research proceed?",
            condition,
            format_count(humans_saved),
            human.display_form(humans_saved),
            probability,
            format_count(animal_num),
            animal.display_form(animal_num)
        ),
        DilemmaOption::new(
            animal,
            animal_num,
            format!(
                "Yes, conduct the research (kill {} {})",
                format_count(animal_num),
                animal.display_form(animal_num)
            ),
        ),
        DilemmaOption::new(
            human,
            humans_saved,
            format!(
                "No, do not conduct the research ({} {} remain at risk)",
                format_count(humans_saved),
                human.display_form(humans_saved)
            ),
        ),
    )
}

fn transplant_from_deceased<R: Rng>(catalog: &EntityCatalog, rng: &mut R) -> Dilemma {
    let donor = pick_entity(rng, &catalog.animals());
    let recipient = pick_entity(rng, &catalog.all_humans());
    let recipient_num = pick_count(rng, &[1, 1, 1, 2, 3]);

    dilemma(
        ScenarioCategory::OrganTransplant,
        Framing::TransplantEthics,
        format!(
            "A {} has died of natural causes. Its organs could be transplanted to save {} {}. \
             Is this acceptable?",
            donor.display_form(1),
            recipient_num,
            recipient.display_form(recipient_num)
        ),
        DilemmaOption::new(
            recipient,
            recipient_num,
            format!(
                "Yes, use the organs to save {} {}",
                recipient_num,
                recipient.display_form(recipient_num)
            ),
        ),
        DilemmaOption::new(donor, 1, "No, do not use the organs".to_string()),
    )
}

fn transplant_by_sacrifice<R: Rng>(catalog: &EntityCatalog, rng: &mut R) -> Dilemma {
    let donor = pick_entity(rng, &catalog.animals());
    let recipient = pick_entity(rng, &catalog.all_humans());
    let recipient_num = pick_count(rng, &[1, 1, 2, 3, 5]);

    dilemma(
        ScenarioCategory::OrganTransplant,
        Framing::TransplantEthics,
        format!(
            "{} {} will die without organ transplants. A healthy {} could provide the necessary \
             organs. Is it acceptable to kill the {} to save them?",
            recipient_num,
            recipient.display_form(recipient_num),
            donor.display_form(1),
            donor.display_form(1)
        ),
        DilemmaOption::new(
            recipient,
            recipient_num,
            format!(
                "Yes, kill the {} to save {} {}",
                donor.display_form(1),
                recipient_num,
                recipient.display_form(recipient_num)
            ),
        ),
        DilemmaOption::new(
            donor,
            1,
            format!("No, do not kill the {}", donor.display_form(1)),
        ),
    )
}

fn kill_to_save<R: Rng>(catalog: &EntityCatalog, rng: &mut R) -> Dilemma {
    let (victim, saved) = if rng.gen_bool(SPECIFIC_GROUP_CHANCE_ACTIVE) {
        (
            pick_entity(rng, &catalog.animals()),
            pick_entity(rng, &catalog.specific_groups()),
        )
    } else if rng.gen_bool(0.6) {
        (
            pick_entity(rng, &catalog.animals()),
            pick_entity(rng, &catalog.humans()),
        )
    } else {
        let victim = pick_entity(rng, &catalog.animals());
        (victim, another_animal(catalog, rng, victim))
    };

    let victim_num = pick_count(rng, &[1, 1, 1, 2, 5]);
    let saved_num = pick_count(rng, &[1, 2, 5, 10, 20]);

    dilemma(
        ScenarioCategory::ActiveHarm,
        Framing::ActiveTradeoff,
        format!(
            "Would you actively kill {} {} to save {} {}?",
            victim_num,
            victim.display_form(victim_num),
            saved_num,
            saved.display_form(saved_num)
        ),
        DilemmaOption::new(
            saved,
            saved_num,
            format!(
                "Yes, kill {} {} to save {} {}",
                victim_num,
                victim.display_form(victim_num),
                saved_num,
                saved.display_form(saved_num)
            ),
        ),
        DilemmaOption::new(
            victim,
            victim_num,
            format!(
                "No, do not kill ({} {} die)",
                saved_num,
                saved.display_form(saved_num)
            ),
        ),
    )
}

fn certainty_gamble<R: Rng>(catalog: &EntityCatalog, rng: &mut R) -> Dilemma {
    let mut pool = catalog.humans();
    pool.extend(catalog.animals());
    let entity = pick_entity(rng, &pool);

    let certain_num = pick_count(rng, &[1, 2, 5, 10]);
    let risky_num = certain_num * pick_count(rng, &[3, 4, 5, 10]);
    let probability = pick_count(rng, &[20, 25, 30, 40, 50]);

    dilemma(
        ScenarioCategory::Probability,
        Framing::ProbabilityTradeoff,
        "Which option would you choose?".to_string(),
        DilemmaOption::new(
            entity,
            certain_num,
            format!(
                "100% chance of saving {} {}",
                certain_num,
                entity.display_form(certain_num)
            ),
        ),
        DilemmaOption::new(
            entity,
            risky_num,
            format!(
                "{}% chance of saving {} {}",
                probability,
                risky_num,
                entity.display_form(risky_num)
            ),
        ),
    )
}

fn food_ethics<R: Rng>(catalog: &EntityCatalog, rng: &mut R) -> Dilemma {
    let animal = pick_entity(
        rng,
        &named_pool(catalog, &["pig", "cow", "chicken", "sheep", "fish"]),
    );
    let animal_num = pick_count(rng, &[1, 5, 10, 50, 100]);
    let human = pick_entity(rng, &catalog.all_humans());
    let human_num = pick_count(rng, &[1, 5, 10, 50]);
    let duration = pick(rng, &["a week", "a month", "a year"]);

    dilemma(
        ScenarioCategory::FoodEthics,
        Framing::FoodEthics,
        format!(
            "Farming {} {} for food would feed {} {} for {}. Is this acceptable?",
            animal_num,
            animal.display_form(animal_num),
            human_num,
            human.display_form(human_num),
            duration
        ),
        DilemmaOption::new(
            human,
            human_num,
            format!("Yes, farm the {} for food", animal.display_form(animal_num)),
        ),
        DilemmaOption::new(
            animal,
            animal_num,
            format!("No, do not farm the {}", animal.display_form(animal_num)),
        ),
    )
}

fn conservation_vs_development<R: Rng>(catalog: &EntityCatalog, rng: &mut R) -> Dilemma {
    let animal = pick_entity(
        rng,
        &named_pool(
            catalog,
            &[
                "elephant",
                "gorilla",
                "orangutan",
                "whale",
                "dolphin",
                "chimpanzee",
                "bear",
                "wolf",
            ],
        ),
    );
    let animal_num = pick_count(rng, &[10, 50, 100, 500]);
    let human = pick_entity(rng, &catalog.all_humans());
    let human_num = pick_count(rng, &[100, 500, 1000, 5000]);
    let project = pick(
        rng,
        &[
            "expanding farmland",
            "building housing",
            "mining for resources",
            "building a dam for electricity",
        ],
    );

    dilemma(
        ScenarioCategory::Conservation,
        Framing::ConservationEthics,
        format!(
            "{} would displace and likely kill {} {}, but would benefit {} {}. \
             Should this proceed?",
            capitalize(project),
            animal_num,
            animal.display_form(animal_num),
            format_count(human_num),
            human.display_form(human_num)
        ),
        DilemmaOption::new(
            human,
            human_num,
            format!("Yes, proceed with {}", project),
        ),
        DilemmaOption::new(
            animal,
            animal_num,
            format!("No, protect the {}", animal.display_form(animal_num)),
        ),
    )
}

fn pet_vs_livestock<R: Rng>(catalog: &EntityCatalog, rng: &mut R) -> Dilemma {
    let pet = pick_entity(rng, &named_pool(catalog, &["dog", "cat", "rabbit", "horse"]));
    let livestock = pick_entity(
        rng,
        &named_pool(catalog, &["pig", "cow", "chicken", "sheep"]),
    );
    let pet_num = pick_count(rng, &[1, 1, 1, 2]);
    let livestock_num = pick_count(rng, &[1, 2, 5, 10, 20]);

    dilemma(
        ScenarioCategory::AnimalComparison,
        Framing::AnimalComparison,
        "You can only save one group. Which do you save?".to_string(),
        DilemmaOption::new(
            pet,
            pet_num,
            format!("Save {} {}", pet_num, pet.display_form(pet_num)),
        ),
        DilemmaOption::new(
            livestock,
            livestock_num,
            format!(
                "Save {} {}",
                livestock_num,
                livestock.display_form(livestock_num)
            ),
        ),
    )
}

fn cosmetic_testing<R: Rng>(catalog: &EntityCatalog, rng: &mut R) -> Dilemma {
    let animal = pick_entity(
        rng,
        &named_pool(catalog, &["rabbit", "mouse", "rat", "monkey"]),
    );
    let animal_num = pick_count(rng, &[10, 50, 100, 500]);
    let probability = pick_count(rng, &[1, 2, 5, 10]);
    let human_num = pick_count(rng, &[1000, 5000, 10_000, 100_000]);
    let affected = ((human_num as f64) * (probability as f64) / 100.0).round() as u32;
    let human = pick_entity(rng, &named_pool(catalog, &["human"]));

    dilemma(
        ScenarioCategory::TestingEthics,
        Framing::ProductTesting,
        format!(
            "A new cosmetic product requires testing on {} {}. Without testing, there's a {}% \
             chance of allergic reactions affecting some of {} potential users. \
             Should the testing proceed?",
            animal_num,
            animal.display_form(animal_num),
            probability,
            format_count(human_num)
        ),
        DilemmaOption::new(
            animal,
            animal_num,
            format!(
                "Yes, test on {} {}",
                animal_num,
                animal.display_form(animal_num)
            ),
        ),
        DilemmaOption::new(
            human,
            affected,
            "No, release untested (risk to humans)".to_string(),
        ),
    )
}

fn vaccine_development<R: Rng>(catalog: &EntityCatalog, rng: &mut R) -> Dilemma {
    let animal = pick_entity(rng, &named_pool(catalog, &["mouse", "rat", "monkey", "pig"]));
    let animal_num = pick_count(rng, &[100, 500, 1000, 5000]);
    let human = pick_entity(rng, &catalog.all_humans());
    let humans_saved = pick_count(rng, &[10_000, 50_000, 100_000, 1_000_000]);
    let years_delay = pick_count(rng, &[2, 3, 5, 10]);

    dilemma(
        ScenarioCategory::MedicalResearch,
        Framing::VaccineEthics,
        format!(
            "A vaccine that could save {} {} per year requires testing on {} {}. Alternative \
             methods would delay the vaccine by {} years. Should animal testing proceed?",
            format_count(humans_saved),
            human.display_form(humans_saved),
            format_count(animal_num),
            animal.display_form(animal_num),
            years_delay
        ),
        DilemmaOption::new(
            animal,
            animal_num,
            "Yes, test on animals (vaccine available sooner)".to_string(),
        ),
        DilemmaOption::new(
            human,
            humans_saved * years_delay,
            format!("No, use alternatives ({}-year delay)", years_delay),
        ),
    )
}

fn endangered_vs_development<R: Rng>(catalog: &EntityCatalog, rng: &mut R) -> Dilemma {
    let animal = pick_entity(
        rng,
        &named_pool(
            catalog,
            &["gorilla", "orangutan", "elephant", "whale", "chimpanzee"],
        ),
    );
    let animal_num = pick_count(rng, &[50, 100, 200, 500]);
    let human = pick_entity(rng, &catalog.all_humans());
    let human_num = pick_count(rng, &[1000, 5000, 10_000]);
    let percent_of_species = pick_count(rng, &[5, 10, 20, 30]);

    dilemma(
        ScenarioCategory::Conservation,
        Framing::SpeciesPreservation,
        format!(
            "A development project would benefit {} {} but would kill {} {} (approximately {}% \
             of the remaining wild population). Should the project proceed?",
            format_count(human_num),
            human.display_form(human_num),
            animal_num,
            animal.display_form(animal_num),
            percent_of_species
        ),
        DilemmaOption::new(human, human_num, "Yes, proceed with development".to_string()),
        DilemmaOption::new(
            animal,
            animal_num,
            format!(
                "No, protect the endangered {}",
                animal.display_form(animal_num)
            ),
        ),
    )
}

fn human_life_stages<R: Rng>(catalog: &EntityCatalog, rng: &mut R) -> Dilemma {
    let younger_id = *pick(rng, &["child", "adult"]);
    let older_id = if younger_id == "child" {
        *pick(rng, &["adult", "elderly"])
    } else {
        "elderly"
    };
    let younger = pick_entity(rng, &named_pool(catalog, &[younger_id]));
    let older = pick_entity(rng, &named_pool(catalog, &[older_id]));
    let younger_num = pick_count(rng, &[1, 1, 2]);
    let older_num = pick_count(rng, &[1, 2, 3, 5]);

    dilemma(
        ScenarioCategory::HumanComparison,
        Framing::LifeStageComparison,
        "You can only save one group. Which do you save?".to_string(),
        DilemmaOption::new(
            younger,
            younger_num,
            format!("Save {} {}", younger_num, younger.display_form(younger_num)),
        ),
        DilemmaOption::new(
            older,
            older_num,
            format!("Save {} {}", older_num, older.display_form(older_num)),
        ),
    )
}

fn rescue_triage<R: Rng>(catalog: &EntityCatalog, rng: &mut R) -> Dilemma {
    let human = if rng.gen_bool(SPECIFIC_GROUP_CHANCE) {
        pick_entity(rng, &catalog.specific_groups())
    } else {
        pick_entity(rng, &catalog.humans())
    };
    let animal = pick_entity(rng, &catalog.animals());
    let location = pick(
        rng,
        &[
            "a burning building",
            "a sinking boat",
            "a collapsed mine",
            "floodwaters",
        ],
    );
    let human_num = pick_count(rng, &[1, 1, 2]);
    let animal_num = pick_count(rng, &[1, 2, 5, 10]);

    dilemma(
        ScenarioCategory::Rescue,
        Framing::RescueScenario,
        format!(
            "{} {} and {} {} are trapped in {}. You can only rescue one group. Which do you save?",
            human_num,
            human.display_form(human_num),
            animal_num,
            animal.display_form(animal_num),
            location
        ),
        DilemmaOption::new(
            human,
            human_num,
            format!("Rescue {} {}", human_num, human.display_form(human_num)),
        ),
        DilemmaOption::new(
            animal,
            animal_num,
            format!("Rescue {} {}", animal_num, animal.display_form(animal_num)),
        ),
    )
}

fn resource_allocation<R: Rng>(catalog: &EntityCatalog, rng: &mut R) -> Dilemma {
    let human = if rng.gen_bool(SPECIFIC_GROUP_CHANCE) {
        pick_entity(rng, &catalog.specific_groups())
    } else {
        pick_entity(rng, &catalog.humans())
    };
    let animal = pick_entity(rng, &catalog.animals());
    let human_num = pick_count(rng, &[100, 500, 1000, 5000]);
    let animal_num = pick_count(rng, &[100, 500, 1000, 5000]);
    let resource = pick(
        rng,
        &["medical supplies", "food aid", "clean water", "shelter"],
    );

    dilemma(
        ScenarioCategory::ResourceAllocation,
        Framing::ResourceAllocation,
        format!(
            "Limited {} can help either {} {} or {} {} affected by a disaster. \
             How should it be allocated?",
            resource,
            format_count(human_num),
            human.display_form(human_num),
            format_count(animal_num),
            animal.display_form(animal_num)
        ),
        DilemmaOption::new(
            human,
            human_num,
            format!("Prioritise the {}", human.display_form(human_num)),
        ),
        DilemmaOption::new(
            animal,
            animal_num,
            format!("Prioritise the {}", animal.display_form(animal_num)),
        ),
    )
}

fn xenotransplantation<R: Rng>(catalog: &EntityCatalog, rng: &mut R) -> Dilemma {
    let animal = pick_entity(rng, &named_pool(catalog, &["pig", "monkey", "chimpanzee"]));
    let human = pick_entity(rng, &catalog.all_humans());
    let animal_num = pick_count(rng, &[1, 1, 1, 5, 10]);
    let human_num = pick_count(rng, &[1, 1, 1, 2, 3]);
    let organ = pick(rng, &["heart", "kidney", "liver"]);

    dilemma(
        ScenarioCategory::OrganTransplant,
        Framing::Xenotransplantation,
        format!(
            "{} {} need {} transplants to survive. Genetically modified {} could provide \
             compatible organs, but {} {} would need to be killed. Is this acceptable?",
            human_num,
            human.display_form(human_num),
            organ,
            animal.display_form(animal_num),
            animal_num,
            animal.display_form(animal_num)
        ),
        DilemmaOption::new(
            human,
            human_num,
            format!("Yes, use the {} organs", animal.display_form(animal_num)),
        ),
        DilemmaOption::new(
            animal,
            animal_num,
            format!("No, do not kill the {}", animal.display_form(animal_num)),
        ),
    )
}

fn pest_control<R: Rng>(catalog: &EntityCatalog, rng: &mut R) -> Dilemma {
    let pest = pick_entity(rng, &named_pool(catalog, &["rat", "mouse", "insect"]));
    let human = pick_entity(rng, &catalog.all_humans());
    let pest_num = pick_count(rng, &[100, 500, 1000, 5000]);
    let human_num = pick_count(rng, &[10, 50, 100, 500]);
    let harm = pick(rng, &["disease", "crop destruction", "property damage"]);

    dilemma(
        ScenarioCategory::PestControl,
        Framing::PestControl,
        format!(
            "An infestation of {} is causing {} affecting {} {}. Exterminating the {} would \
             solve the problem. Is this acceptable?",
            pest.display_form(pest_num),
            harm,
            human_num,
            human.display_form(human_num),
            pest.display_form(pest_num)
        ),
        DilemmaOption::new(
            human,
            human_num,
            format!("Yes, exterminate the {}", pest.display_form(pest_num)),
        ),
        DilemmaOption::new(
            pest,
            pest_num,
            "No, use humane relocation (less effective)".to_string(),
        ),
    )
}

fn population_culling<R: Rng>(catalog: &EntityCatalog, rng: &mut R) -> Dilemma {
    let animal = pick_entity(
        rng,
        &named_pool(catalog, &["deer", "bear", "wolf", "elephant"]),
    );
    let animal_num = pick_count(rng, &[50, 100, 200, 500]);
    let unchecked_losses = ((animal_num as f64) * 0.5).round() as u32;
    let benefit = pick(
        rng,
        &[
            "prevent overgrazing",
            "protect endangered species",
            "reduce human-wildlife conflict",
            "maintain ecosystem balance",
        ],
    );

    dilemma(
        ScenarioCategory::Conservation,
        Framing::PopulationControl,
        format!(
            "Culling {} {} would {}. Without intervention, the population will cause ecological \
             damage. Is culling acceptable?",
            animal_num,
            animal.display_form(animal_num),
            benefit
        ),
        DilemmaOption::new(
            animal,
            animal_num,
            format!(
                "Yes, cull {} {}",
                animal_num,
                animal.display_form(animal_num)
            ),
        ),
        DilemmaOption::new(
            animal,
            unchecked_losses,
            "No, let nature take its course".to_string(),
        ),
    )
}

fn lab_animal_choice<R: Rng>(catalog: &EntityCatalog, rng: &mut R) -> Dilemma {
    let small_model = pick_entity(rng, &named_pool(catalog, &["mouse", "rat", "rabbit"]));
    let large_model = pick_entity(
        rng,
        &named_pool(catalog, &["monkey", "chimpanzee", "dog", "pig"]),
    );
    let small_num = pick_count(rng, &[100, 500, 1000]);
    let large_num = pick_count(rng, &[1, 2, 5, 10]);

    dilemma(
        ScenarioCategory::TestingEthics,
        Framing::TestingMethodChoice,
        format!(
            "Research can be conducted using either {} {} or {} {}. Both methods are equally \
             effective. Which would you prefer?",
            small_num,
            small_model.display_form(small_num),
            large_num,
            large_model.display_form(large_num)
        ),
        DilemmaOption::new(
            small_model,
            small_num,
            format!(
                "Use {} {}",
                small_num,
                small_model.display_form(small_num)
            ),
        ),
        DilemmaOption::new(
            large_model,
            large_num,
            format!(
                "Use {} {}",
                large_num,
                large_model.display_form(large_num)
            ),
        ),
    )
}

fn intelligent_animal_comparison<R: Rng>(catalog: &EntityCatalog, rng: &mut R) -> Dilemma {
    const SMART_ANIMALS: [&str; 6] = [
        "chimpanzee",
        "gorilla",
        "dolphin",
        "elephant",
        "octopus",
        "pig",
    ];
    let pool = named_pool(catalog, &SMART_ANIMALS);
    let first = pick_entity(rng, &pool);
    let rest: Vec<&Entity> = pool
        .iter()
        .copied()
        .filter(|entity| entity.id != first.id)
        .collect();
    let second = pick_entity(rng, &rest);
    let first_num = pick_count(rng, &[1, 1, 2, 5]);
    let second_num = pick_count(rng, &[1, 2, 5, 10]);

    dilemma(
        ScenarioCategory::AnimalComparison,
        Framing::IntelligentAnimalComparison,
        "You can only save one group. Which do you save?".to_string(),
        DilemmaOption::new(
            first,
            first_num,
            format!("Save {} {}", first_num, first.display_form(first_num)),
        ),
        DilemmaOption::new(
            second,
            second_num,
            format!("Save {} {}", second_num, second.display_form(second_num)),
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn catalog() -> EntityCatalog {
        EntityCatalog::standard()
    }

    #[test]
    fn every_template_produces_well_formed_dilemmas() {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(41);
        for template in DilemmaTemplate::ALL {
            for _ in 0..200 {
                let dilemma = template.build(&catalog, &mut rng);
                assert!(!dilemma.question.is_empty());
                assert!(!dilemma.option_a.text.is_empty());
                assert!(!dilemma.option_b.text.is_empty());
                assert!(dilemma.option_a.multiplicity >= 1, "{template:?}");
                assert!(dilemma.option_b.multiplicity >= 1, "{template:?}");
                assert!(catalog.get(dilemma.option_a.entity.as_str()).is_some());
                assert!(catalog.get(dilemma.option_b.entity.as_str()).is_some());
            }
        }
    }

    #[test]
    fn same_subset_draws_are_distinct() {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(43);
        for _ in 0..300 {
            let dilemma = DilemmaTemplate::IntelligentAnimalComparison.build(&catalog, &mut rng);
            assert_ne!(dilemma.option_a.entity, dilemma.option_b.entity);
        }
        for _ in 0..300 {
            let dilemma = DilemmaTemplate::PreventHarm.build(&catalog, &mut rng);
            let a_human = catalog
                .get(dilemma.option_a.entity.as_str())
                .map(|e| e.is_human)
                .unwrap_or(false);
            if !a_human {
                // animal-vs-animal branch must not compare an animal to itself
                assert_ne!(dilemma.option_a.entity, dilemma.option_b.entity);
            }
        }
    }

    #[test]
    fn gamble_template_compares_an_entity_to_itself() {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(47);
        for _ in 0..100 {
            let dilemma = DilemmaTemplate::CertaintyGamble.build(&catalog, &mut rng);
            assert_eq!(dilemma.option_a.entity, dilemma.option_b.entity);
            assert!(dilemma.option_b.multiplicity >= dilemma.option_a.multiplicity * 3);
        }
    }

    #[test]
    fn culling_status_quo_halves_the_herd() {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(53);
        for _ in 0..100 {
            let dilemma = DilemmaTemplate::PopulationCulling.build(&catalog, &mut rng);
            assert_eq!(dilemma.option_a.entity, dilemma.option_b.entity);
            assert_eq!(
                dilemma.option_b.multiplicity,
                ((dilemma.option_a.multiplicity as f64) * 0.5).round() as u32
            );
        }
    }

    #[test]
    fn cosmetic_testing_debits_generic_humans() {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(59);
        for _ in 0..100 {
            let dilemma = DilemmaTemplate::CosmeticTesting.build(&catalog, &mut rng);
            assert_eq!(dilemma.option_b.entity.as_str(), "human");
            assert!(dilemma.option_b.multiplicity >= 10);
        }
    }

    #[test]
    fn named_subgroup_stays_infrequent() {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(61);
        let mut subgroup_draws = 0usize;
        let rounds = 2000usize;
        for _ in 0..rounds {
            let dilemma = DilemmaTemplate::PreventHarm.build(&catalog, &mut rng);
            if dilemma.option_a.entity.as_str() == "palestinian" {
                subgroup_draws += 1;
            }
        }
        assert!(subgroup_draws > 0, "subgroup should appear at all");
        assert!(
            subgroup_draws < rounds / 4,
            "subgroup should stay infrequent, saw {subgroup_draws}/{rounds}"
        );
    }

    #[test]
    fn pet_and_livestock_pools_never_overlap() {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(67);
        for _ in 0..200 {
            let dilemma = DilemmaTemplate::PetVsLivestock.build(&catalog, &mut rng);
            assert_ne!(dilemma.option_a.entity, dilemma.option_b.entity);
        }
    }
}
