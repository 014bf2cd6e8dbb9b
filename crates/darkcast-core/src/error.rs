use crate::id::{MachineTypeId, RecipeId};

/// Invalid arguments rejected by stacks, inventories and machines.
///
/// These are fatal to the call, never to the simulation. Shortages (a full
/// inventory, missing ingredients) are not errors and never surface here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A stack was asked to hold more than its item's stack size.
    #[error("count {count} exceeds max stack size {max_stack} of '{item}'")]
    CountExceedsStack {
        item: String,
        count: u32,
        max_stack: u32,
    },

    /// Store and remove amounts must be positive.
    #[error("amount must be positive")]
    ZeroAmount,

    /// Inventories need a positive capacity or slot count.
    #[error("inventory capacity must be positive")]
    ZeroCapacity,

    /// A machine cannot work with a zero energy rate.
    #[error("energy per tick must be positive")]
    ZeroEnergyRate,

    /// The recipe is not part of the machine's cookbook.
    #[error("recipe {recipe:?} is not in cookbook '{cookbook}'")]
    RecipeNotInCookbook { recipe: RecipeId, cookbook: String },

    /// No machine template with this id exists in the registry.
    #[error("unknown machine type {0:?}")]
    UnknownMachineType(MachineTypeId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = CoreError::CountExceedsStack {
            item: "iron_ore".to_string(),
            count: 65,
            max_stack: 64,
        };
        assert_eq!(
            err.to_string(),
            "count 65 exceeds max stack size 64 of 'iron_ore'"
        );

        let err = CoreError::RecipeNotInCookbook {
            recipe: RecipeId(3),
            cookbook: "pulverizer".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("RecipeId(3)"), "got: {msg}");
        assert!(msg.contains("pulverizer"), "got: {msg}");

        assert_eq!(CoreError::ZeroAmount.to_string(), "amount must be positive");
    }
}
