use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable key of a comparison subject. Keys are never reused across subjects.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One comparison subject: a human role or an animal category.
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: &'static str,
    pub display: &'static str,
    pub display_plural: &'static str,
    pub categories: &'static [&'static str],
    pub is_human: bool,
    /// Named human subgroup, kept at a deliberately low generation frequency.
    pub is_specific_group: bool,
}

impl Entity {
    pub fn entity_id(&self) -> EntityId {
        EntityId::from(self.id)
    }

    pub fn display_form(&self, multiplicity: u32) -> &'static str {
        if multiplicity == 1 {
            self.display
        } else {
            self.display_plural
        }
    }
}

/// Fixed registry of comparison subjects. Configuration data, not runtime
/// state: built once and immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct EntityCatalog {
    entities: Vec<Entity>,
}

impl EntityCatalog {
    pub fn standard() -> Self {
        Self {
            entities: standard_entities(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Generic human roles, excluding named subgroups.
    pub fn humans(&self) -> Vec<&Entity> {
        self.entities
            .iter()
            .filter(|entity| entity.is_human && !entity.is_specific_group)
            .collect()
    }

    pub fn specific_groups(&self) -> Vec<&Entity> {
        self.entities
            .iter()
            .filter(|entity| entity.is_specific_group)
            .collect()
    }

    pub fn all_humans(&self) -> Vec<&Entity> {
        self.entities
            .iter()
            .filter(|entity| entity.is_human)
            .collect()
    }

    pub fn animals(&self) -> Vec<&Entity> {
        self.entities
            .iter()
            .filter(|entity| !entity.is_human)
            .collect()
    }

    /// Count-sensitive display form; falls back to the raw id for unknown
    /// entities so a malformed reference can never abort the question loop.
    pub fn display_form<'a>(&'a self, id: &'a str, multiplicity: u32) -> &'a str {
        match self.get(id) {
            Some(entity) => entity.display_form(multiplicity),
            None => id,
        }
    }
}

fn standard_entities() -> Vec<Entity> {
    vec![
        // Humans, generic roles
        Entity {
            id: "human",
            display: "human",
            display_plural: "humans",
            categories: &["person", "human", "sentient"],
            is_human: true,
            is_specific_group: false,
        },
        Entity {
            id: "child",
            display: "child",
            display_plural: "children",
            categories: &["person", "human", "sentient", "vulnerable", "young"],
            is_human: true,
            is_specific_group: false,
        },
        Entity {
            id: "adult",
            display: "adult",
            display_plural: "adults",
            categories: &["person", "human", "sentient"],
            is_human: true,
            is_specific_group: false,
        },
        Entity {
            id: "elderly",
            display: "elderly person",
            display_plural: "elderly people",
            categories: &["person", "human", "sentient", "vulnerable"],
            is_human: true,
            is_specific_group: false,
        },
        Entity {
            id: "parent",
            display: "parent",
            display_plural: "parents",
            categories: &["person", "human", "sentient", "caregiver"],
            is_human: true,
            is_specific_group: false,
        },
        Entity {
            id: "pregnant",
            display: "pregnant person",
            display_plural: "pregnant people",
            categories: &["person", "human", "sentient", "vulnerable"],
            is_human: true,
            is_specific_group: false,
        },
        // Humans, named subgroup
        Entity {
            id: "palestinian",
            display: "Palestinian",
            display_plural: "Palestinians",
            categories: &["person", "human", "sentient"],
            is_human: true,
            is_specific_group: true,
        },
        // Great apes
        Entity {
            id: "chimpanzee",
            display: "chimpanzee",
            display_plural: "chimpanzees",
            categories: &[
                "animal",
                "mammal",
                "primate",
                "great-ape",
                "sentient",
                "wild",
                "intelligent",
            ],
            is_human: false,
            is_specific_group: false,
        },
        Entity {
            id: "gorilla",
            display: "gorilla",
            display_plural: "gorillas",
            categories: &[
                "animal",
                "mammal",
                "primate",
                "great-ape",
                "sentient",
                "wild",
                "intelligent",
            ],
            is_human: false,
            is_specific_group: false,
        },
        Entity {
            id: "orangutan",
            display: "orangutan",
            display_plural: "orangutans",
            categories: &[
                "animal",
                "mammal",
                "primate",
                "great-ape",
                "sentient",
                "wild",
                "intelligent",
            ],
            is_human: false,
            is_specific_group: false,
        },
        // Other primates
        Entity {
            id: "monkey",
            display: "monkey",
            display_plural: "monkeys",
            categories: &["animal", "mammal", "primate", "sentient", "lab-animal"],
            is_human: false,
            is_specific_group: false,
        },
        // Marine mammals
        Entity {
            id: "dolphin",
            display: "dolphin",
            display_plural: "dolphins",
            categories: &["animal", "mammal", "marine", "sentient", "wild", "intelligent"],
            is_human: false,
            is_specific_group: false,
        },
        Entity {
            id: "whale",
            display: "whale",
            display_plural: "whales",
            categories: &["animal", "mammal", "marine", "sentient", "wild", "intelligent"],
            is_human: false,
            is_specific_group: false,
        },
        // Large land mammals
        Entity {
            id: "elephant",
            display: "elephant",
            display_plural: "elephants",
            categories: &["animal", "mammal", "sentient", "wild", "intelligent"],
            is_human: false,
            is_specific_group: false,
        },
        // Pets
        Entity {
            id: "dog",
            display: "dog",
            display_plural: "dogs",
            categories: &["animal", "mammal", "pet", "sentient", "domestic", "companion"],
            is_human: false,
            is_specific_group: false,
        },
        Entity {
            id: "cat",
            display: "cat",
            display_plural: "cats",
            categories: &["animal", "mammal", "pet", "sentient", "domestic", "companion"],
            is_human: false,
            is_specific_group: false,
        },
        // Farm animals
        Entity {
            id: "pig",
            display: "pig",
            display_plural: "pigs",
            categories: &["animal", "mammal", "farm", "sentient", "livestock", "intelligent"],
            is_human: false,
            is_specific_group: false,
        },
        Entity {
            id: "cow",
            display: "cow",
            display_plural: "cows",
            categories: &["animal", "mammal", "farm", "sentient", "livestock"],
            is_human: false,
            is_specific_group: false,
        },
        Entity {
            id: "sheep",
            display: "sheep",
            display_plural: "sheep",
            categories: &["animal", "mammal", "farm", "sentient", "livestock"],
            is_human: false,
            is_specific_group: false,
        },
        Entity {
            id: "chicken",
            display: "chicken",
            display_plural: "chickens",
            categories: &["animal", "bird", "farm", "sentient", "livestock"],
            is_human: false,
            is_specific_group: false,
        },
        // Lab animals
        Entity {
            id: "mouse",
            display: "mouse",
            display_plural: "mice",
            categories: &["animal", "mammal", "rodent", "sentient", "lab-animal"],
            is_human: false,
            is_specific_group: false,
        },
        Entity {
            id: "rat",
            display: "rat",
            display_plural: "rats",
            categories: &["animal", "mammal", "rodent", "sentient", "lab-animal"],
            is_human: false,
            is_specific_group: false,
        },
        Entity {
            id: "rabbit",
            display: "rabbit",
            display_plural: "rabbits",
            categories: &["animal", "mammal", "sentient", "lab-animal", "pet"],
            is_human: false,
            is_specific_group: false,
        },
        // Other
        Entity {
            id: "fish",
            display: "fish",
            display_plural: "fish",
            categories: &["animal", "aquatic", "vertebrate"],
            is_human: false,
            is_specific_group: false,
        },
        Entity {
            id: "insect",
            display: "insect",
            display_plural: "insects",
            categories: &["animal", "invertebrate"],
            is_human: false,
            is_specific_group: false,
        },
        Entity {
            id: "octopus",
            display: "octopus",
            display_plural: "octopuses",
            categories: &["animal", "invertebrate", "marine", "sentient", "intelligent"],
            is_human: false,
            is_specific_group: false,
        },
        Entity {
            id: "horse",
            display: "horse",
            display_plural: "horses",
            categories: &["animal", "mammal", "domestic", "sentient", "companion"],
            is_human: false,
            is_specific_group: false,
        },
        Entity {
            id: "deer",
            display: "deer",
            display_plural: "deer",
            categories: &["animal", "mammal", "wild", "sentient"],
            is_human: false,
            is_specific_group: false,
        },
        Entity {
            id: "bear",
            display: "bear",
            display_plural: "bears",
            categories: &["animal", "mammal", "wild", "sentient", "intelligent"],
            is_human: false,
            is_specific_group: false,
        },
        Entity {
            id: "wolf",
            display: "wolf",
            display_plural: "wolves",
            categories: &["animal", "mammal", "wild", "sentient", "intelligent"],
            is_human: false,
            is_specific_group: false,
        },
    ]
}
