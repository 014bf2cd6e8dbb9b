use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Identifies a machine instance owned by a [`Simulation`](crate::sim::Simulation).
    pub struct MachineId;
}

/// Identifies an item kind in the registry. Cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u32);

/// Identifies a recipe in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecipeId(pub u32);

/// Identifies a cookbook (the recipe list of one machine type).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CookbookId(pub u32);

/// Identifies a machine template in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MachineTypeId(pub u32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_id_equality() {
        let a = ItemId(0);
        let b = ItemId(0);
        let c = ItemId(1);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn recipe_id_copy() {
        let a = RecipeId(5);
        let b = a; // Copy
        assert_eq!(a, b);
    }

    #[test]
    fn ids_are_hashable() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(ItemId(0), "iron_ore");
        map.insert(ItemId(1), "iron_dust");
        assert_eq!(map[&ItemId(0)], "iron_ore");
    }
}
