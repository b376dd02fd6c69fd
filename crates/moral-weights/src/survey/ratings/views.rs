use super::super::catalog::{EntityCatalog, EntityId};
use super::RatingBook;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// One row of the ranked weight table.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityWeightView {
    pub entity: EntityId,
    pub label: String,
    pub rating: f64,
    pub comparisons: u32,
    pub wins: u32,
    pub losses: u32,
}

/// Mean rating across the tested entities carrying one category tag.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWeightView {
    pub category: String,
    pub average: f64,
    pub entities: usize,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageStats {
    pub answered: usize,
    pub compared_entities: usize,
    pub categories: usize,
}

impl RatingBook {
    /// Entities with at least one comparison, highest rating first.
    pub fn ranked(&self, catalog: &EntityCatalog) -> Vec<EntityWeightView> {
        let mut rows: Vec<EntityWeightView> = self
            .iter()
            .filter(|(_, record)| record.comparisons > 0)
            .map(|(id, record)| EntityWeightView {
                entity: id.clone(),
                label: catalog
                    .get(id.as_str())
                    .map(|entity| entity.display.to_string())
                    .unwrap_or_else(|| id.0.clone()),
                rating: record.rating,
                comparisons: record.comparisons,
                wins: record.wins,
                losses: record.losses,
            })
            .collect();
        rows.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        rows
    }

    /// Mean rating per category tag over tested entities, highest first.
    pub fn category_weights(&self, catalog: &EntityCatalog) -> Vec<CategoryWeightView> {
        let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
        for (id, record) in self.iter() {
            if record.comparisons == 0 {
                continue;
            }
            let Some(entity) = catalog.get(id.as_str()) else {
                continue;
            };
            for category in entity.categories {
                let slot = sums.entry(category).or_insert((0.0, 0));
                slot.0 += record.rating;
                slot.1 += 1;
            }
        }

        let mut rows: Vec<CategoryWeightView> = sums
            .into_iter()
            .map(|(category, (total, count))| CategoryWeightView {
                category: category.to_string(),
                average: total / count as f64,
                entities: count,
            })
            .collect();
        rows.sort_by(|a, b| b.average.total_cmp(&a.average));
        rows
    }

    /// Display labels of entities never drawn into a comparison.
    pub fn untested(&self, catalog: &EntityCatalog) -> Vec<String> {
        self.iter()
            .filter(|(_, record)| record.comparisons == 0)
            .map(|(id, _)| {
                catalog
                    .get(id.as_str())
                    .map(|entity| entity.display.to_string())
                    .unwrap_or_else(|| id.0.clone())
            })
            .collect()
    }

    pub fn coverage(&self, catalog: &EntityCatalog, answered: usize) -> CoverageStats {
        let compared_entities = self
            .iter()
            .filter(|(_, record)| record.comparisons > 0)
            .count();

        let mut categories: BTreeSet<&str> = BTreeSet::new();
        for (id, record) in self.iter() {
            if record.comparisons == 0 {
                continue;
            }
            if let Some(entity) = catalog.get(id.as_str()) {
                categories.extend(entity.categories.iter().copied());
            }
        }

        CoverageStats {
            answered,
            compared_entities,
            categories: categories.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::catalog::EntityCatalog;
    use super::super::RatingBook;
    use super::*;

    fn exercised_book(catalog: &EntityCatalog) -> RatingBook {
        let mut book = RatingBook::seeded(catalog);
        book.record_outcome(&EntityId::from("dog"), &EntityId::from("chicken"), 1, 10);
        book.record_outcome(&EntityId::from("human"), &EntityId::from("dog"), 1, 2);
        book
    }

    #[test]
    fn ranked_filters_untested_and_sorts_descending() {
        let catalog = EntityCatalog::standard();
        let book = exercised_book(&catalog);

        let ranked = book.ranked(&catalog);
        assert_eq!(ranked.len(), 3);
        assert!(ranked
            .windows(2)
            .all(|pair| pair[0].rating >= pair[1].rating));
        assert_eq!(ranked[0].entity, EntityId::from("human"));
        assert_eq!(ranked[0].label, "human");
        assert_eq!(
            ranked.last().map(|row| row.entity.clone()),
            Some(EntityId::from("chicken"))
        );
    }

    #[test]
    fn category_weights_average_over_tested_entities() {
        let catalog = EntityCatalog::standard();
        let book = exercised_book(&catalog);

        let weights = book.category_weights(&catalog);
        let animal = weights
            .iter()
            .find(|row| row.category == "animal")
            .expect("animal tag present");
        // dog and chicken are the only tested animals
        assert_eq!(animal.entities, 2);

        let dog = book.get(&EntityId::from("dog")).expect("dog tracked");
        let chicken = book
            .get(&EntityId::from("chicken"))
            .expect("chicken tracked");
        let expected = (dog.rating + chicken.rating) / 2.0;
        assert!((animal.average - expected).abs() < 1e-9);
    }

    #[test]
    fn untested_lists_every_untouched_entity() {
        let catalog = EntityCatalog::standard();
        let book = exercised_book(&catalog);

        let untested = book.untested(&catalog);
        assert_eq!(untested.len(), catalog.entities().len() - 3);
        assert!(!untested.contains(&"dog".to_string()));
        assert!(untested.contains(&"gorilla".to_string()));
    }

    #[test]
    fn coverage_counts_entities_and_tags() {
        let catalog = EntityCatalog::standard();
        let book = exercised_book(&catalog);

        let stats = book.coverage(&catalog, 2);
        assert_eq!(stats.answered, 2);
        assert_eq!(stats.compared_entities, 3);
        // human + dog + chicken tags
        assert!(stats.categories >= 8);
    }
}
