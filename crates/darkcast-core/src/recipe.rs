//! Immutable recipe data. Recipes are shared by `Arc` and compared by id;
//! nothing in the simulation ever copies or mutates them.

use crate::id::{CookbookId, ItemId, RecipeId};
use crate::item::Item;
use std::sync::Arc;

/// An ingredient or result line: `count` units of `item`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub item: Item,
    pub count: u32,
}

/// Turns ingredients plus an energy cost into results.
#[derive(Debug, Clone)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    /// Energy a machine must spend before the results appear.
    pub energy_cost: u32,
    pub ingredients: Vec<Ingredient>,
    pub results: Vec<Ingredient>,
}

impl Recipe {
    /// Total units of `item` this recipe consumes, summed over every
    /// ingredient line naming it.
    pub fn requirement(&self, item: ItemId) -> u64 {
        self.ingredients
            .iter()
            .filter(|i| i.item.id() == item)
            .map(|i| u64::from(i.count))
            .sum()
    }

    /// Ingredient lines merged per item, in order of first appearance.
    pub fn demand(&self) -> Vec<(&Item, u64)> {
        let mut demand: Vec<(&Item, u64)> = Vec::with_capacity(self.ingredients.len());
        for line in &self.ingredients {
            match demand.iter_mut().find(|(item, _)| **item == line.item) {
                Some((_, total)) => *total += u64::from(line.count),
                None => demand.push((&line.item, u64::from(line.count))),
            }
        }
        demand
    }
}

impl PartialEq for Recipe {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Recipe {}

/// The ordered recipe list of one machine type.
#[derive(Debug, Clone)]
pub struct Cookbook {
    pub id: CookbookId,
    pub name: String,
    pub recipes: Vec<Arc<Recipe>>,
}

impl Cookbook {
    pub fn get(&self, id: RecipeId) -> Option<&Arc<Recipe>> {
        self.recipes.iter().find(|r| r.id == id)
    }

    pub fn find(&self, name: &str) -> Option<&Arc<Recipe>> {
        self.recipes.iter().find(|r| r.name == name)
    }

    pub fn contains(&self, id: RecipeId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Recipe>> {
        self.recipes.iter()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemDef;

    fn item(id: u32, name: &str) -> Item {
        Item::new(ItemDef {
            id: ItemId(id),
            name: name.to_string(),
            max_stack: 64,
            fuel: None,
        })
    }

    fn pulverize(id: u32) -> Recipe {
        let ore = item(0, "iron_ore");
        Recipe {
            id: RecipeId(id),
            name: "pulverize_iron".to_string(),
            energy_cost: 40,
            ingredients: vec![
                Ingredient {
                    item: ore.clone(),
                    count: 2,
                },
                Ingredient {
                    item: ore,
                    count: 1,
                },
            ],
            results: vec![Ingredient {
                item: item(1, "iron_dust"),
                count: 1,
            }],
        }
    }

    #[test]
    fn requirement_sums_repeated_lines() {
        let recipe = pulverize(0);
        assert_eq!(recipe.requirement(ItemId(0)), 3);
        assert_eq!(recipe.requirement(ItemId(1)), 0);
    }

    #[test]
    fn demand_merges_lines_without_overflow() {
        let mut recipe = pulverize(0);
        recipe.ingredients[0].count = u32::MAX;
        let demand = recipe.demand();
        assert_eq!(demand.len(), 1);
        assert_eq!(demand[0].0.id(), ItemId(0));
        assert_eq!(demand[0].1, u64::from(u32::MAX) + 1);
        assert_eq!(recipe.requirement(ItemId(0)), u64::from(u32::MAX) + 1);
    }

    #[test]
    fn recipes_compare_by_id() {
        let mut renamed = pulverize(0);
        renamed.name = "other".to_string();
        assert_eq!(pulverize(0), renamed);
        assert_ne!(pulverize(0), pulverize(1));
    }

    #[test]
    fn cookbook_lookup() {
        let book = Cookbook {
            id: CookbookId(0),
            name: "pulverizer".to_string(),
            recipes: vec![Arc::new(pulverize(4))],
        };
        assert!(book.contains(RecipeId(4)));
        assert!(!book.contains(RecipeId(5)));
        assert_eq!(book.find("pulverize_iron").map(|r| r.id), Some(RecipeId(4)));
        assert_eq!(book.len(), 1);
        assert!(!book.is_empty());
    }
}
