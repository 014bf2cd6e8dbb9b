//! Serde data file structs for crafting content.
//!
//! These structs define the on-disk format for items, recipes, cookbooks and
//! machine templates. They are deserialized from RON, JSON, or TOML data
//! files and then resolved into registry entries by the loader.

use darkcast_core::inventory::InventoryLayout;
use darkcast_core::machine::CompletionPolicy;
use serde::Deserialize;

// ===========================================================================
// Items
// ===========================================================================

/// Stack size used when an item omits `max_stack`.
pub const DEFAULT_MAX_STACK: u32 = 64;

fn default_max_stack() -> u32 {
    DEFAULT_MAX_STACK
}

/// An item kind definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemData {
    pub name: String,
    #[serde(default = "default_max_stack")]
    pub max_stack: u32,
    /// Present only for items that can be burned.
    #[serde(default)]
    pub fuel: Option<FuelData>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct FuelData {
    pub burn_time: u32,
}

// ===========================================================================
// Recipes
// ===========================================================================

/// A recipe ingredient or result line, in short tuple form or full form.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LineData {
    /// Short form: `("item_name", count)`.
    Short(String, u32),
    /// Full form: `{ item: "item_name", count: n }`.
    Full { item: String, count: u32 },
}

impl LineData {
    pub fn item(&self) -> &str {
        match self {
            LineData::Short(item, _) | LineData::Full { item, .. } => item,
        }
    }

    pub fn count(&self) -> u32 {
        match *self {
            LineData::Short(_, count) | LineData::Full { count, .. } => count,
        }
    }
}

/// A recipe definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeData {
    pub name: String,
    pub energy_cost: u32,
    #[serde(default)]
    pub ingredients: Vec<LineData>,
    pub results: Vec<LineData>,
}

// ===========================================================================
// Cookbooks
// ===========================================================================

/// A named, ordered list of recipe names.
#[derive(Debug, Clone, Deserialize)]
pub struct CookbookData {
    pub name: String,
    pub recipes: Vec<String>,
}

// ===========================================================================
// Machines
// ===========================================================================

/// A machine template. Missing layouts fall back to a ledger of the default
/// capacity, and missing tuning to the engine defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct MachineData {
    pub name: String,
    pub cookbook: String,
    #[serde(default)]
    pub input: InventoryLayout,
    #[serde(default)]
    pub output: InventoryLayout,
    #[serde(default)]
    pub energy_per_tick: Option<u32>,
    #[serde(default)]
    pub completion: Option<CompletionPolicy>,
}

// ===========================================================================
// Single-document catalog
// ===========================================================================

/// All content in one document. Every section is optional so a catalog
/// can hold, say, only items and recipes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogData {
    #[serde(default)]
    pub items: Vec<ItemData>,
    #[serde(default)]
    pub recipes: Vec<RecipeData>,
    #[serde(default)]
    pub cookbooks: Vec<CookbookData>,
    #[serde(default)]
    pub machines: Vec<MachineData>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_defaults() {
        let item: ItemData = ron::from_str(r#"(name: "iron_ore")"#).unwrap();
        assert_eq!(item.max_stack, DEFAULT_MAX_STACK);
        assert!(item.fuel.is_none());
    }

    #[test]
    fn fuel_item_ron() {
        let item: ItemData =
            ron::from_str(r#"(name: "coal", max_stack: 32, fuel: Some((burn_time: 80)))"#).unwrap();
        assert_eq!(item.max_stack, 32);
        assert_eq!(item.fuel.map(|f| f.burn_time), Some(80));
    }

    #[test]
    fn line_short_and_full_forms() {
        let lines: Vec<LineData> =
            serde_json::from_str(r#"[["iron_ore", 2], {"item": "coal", "count": 1}]"#).unwrap();
        assert_eq!(lines[0].item(), "iron_ore");
        assert_eq!(lines[0].count(), 2);
        assert_eq!(lines[1].item(), "coal");
        assert_eq!(lines[1].count(), 1);
    }

    #[test]
    fn recipe_without_ingredients() {
        let recipe: RecipeData = ron::from_str(
            r#"(name: "sift_air", energy_cost: 20, results: [("iron_dust", 1)])"#,
        )
        .unwrap();
        assert!(recipe.ingredients.is_empty());
        assert_eq!(recipe.results.len(), 1);
    }

    #[test]
    fn machine_defaults() {
        let machine: MachineData =
            serde_json::from_str(r#"{"name": "pulverizer", "cookbook": "pulverizer"}"#).unwrap();
        assert_eq!(machine.input, InventoryLayout::default());
        assert_eq!(machine.output, InventoryLayout::default());
        assert!(machine.energy_per_tick.is_none());
        assert!(machine.completion.is_none());
    }

    #[test]
    fn machine_layouts_toml() {
        let machine: MachineData = toml::from_str(
            r#"
name = "pulverizer"
cookbook = "pulverizer"
energy_per_tick = 10
completion = "exact_zero"
input = { ledger = { capacity = 50 } }
output = { slots = { slots = 4 } }
"#,
        )
        .unwrap();
        assert_eq!(machine.input, InventoryLayout::Ledger { capacity: 50 });
        assert_eq!(machine.output, InventoryLayout::Slots { slots: 4 });
        assert_eq!(machine.energy_per_tick, Some(10));
        assert_eq!(machine.completion, Some(CompletionPolicy::ExactZero));
    }

    #[test]
    fn empty_catalog() {
        let catalog: CatalogData = serde_json::from_str("{}").unwrap();
        assert!(catalog.items.is_empty());
        assert!(catalog.machines.is_empty());
    }
}
