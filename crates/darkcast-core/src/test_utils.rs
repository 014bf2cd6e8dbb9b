//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::inventory::InventoryLayout;
use crate::item::Item;
use crate::machine::MachineConfig;
use crate::recipe::Cookbook;
use crate::registry::{Registry, RegistryBuilder};
use std::sync::Arc;

// ===========================================================================
// Fixture registry
// ===========================================================================

/// Registry used across the test suite.
///
/// Items: `iron_ore` (64), `iron_dust` (64), `coal` (fuel, 32),
/// `iron_ingot` (64), `gravel` (8).
///
/// The `pulverizer` cookbook holds, in order:
/// - `pulverize_iron`: 2 ore -> 1 dust, 40 energy
/// - `crush_with_coal`: 3 ore + 1 coal -> 4 dust, 40 energy
/// - `split_lines`: 2 ore + 1 ore -> 1 dust, 20 energy
/// - `sift_air`: nothing -> 1 dust, 20 energy
/// - `crush_slow`: 1 ore -> 2 dust, 50 energy
///
/// The `furnace` cookbook holds `smelt_dust`: 1 dust -> 1 ingot, 60 energy.
///
/// Machine template `pulverizer` uses a ledger input (capacity 100) and a
/// four-slot output.
pub fn pulverizer_builder() -> RegistryBuilder {
    let mut b = RegistryBuilder::new();
    let ore = b.register_item("iron_ore", 64);
    let dust = b.register_item("iron_dust", 64);
    let coal = b.register_fuel("coal", 32, 80);
    let ingot = b.register_item("iron_ingot", 64);
    b.register_item("gravel", 8);

    let pulverize = b.register_recipe(
        "pulverize_iron",
        40,
        vec![(ore, 2).into()],
        vec![(dust, 1).into()],
    );
    let with_coal = b.register_recipe(
        "crush_with_coal",
        40,
        vec![(ore, 3).into(), (coal, 1).into()],
        vec![(dust, 4).into()],
    );
    let split_lines = b.register_recipe(
        "split_lines",
        20,
        vec![(ore, 2).into(), (ore, 1).into()],
        vec![(dust, 1).into()],
    );
    let sift = b.register_recipe("sift_air", 20, vec![], vec![(dust, 1).into()]);
    let slow = b.register_recipe(
        "crush_slow",
        50,
        vec![(ore, 1).into()],
        vec![(dust, 2).into()],
    );
    let smelt = b.register_recipe(
        "smelt_dust",
        60,
        vec![(dust, 1).into()],
        vec![(ingot, 1).into()],
    );

    let pulverizer = b.register_cookbook(
        "pulverizer",
        vec![pulverize, with_coal, split_lines, sift, slow],
    );
    let furnace = b.register_cookbook("furnace", vec![smelt]);

    b.register_machine(
        "pulverizer",
        pulverizer,
        InventoryLayout::Ledger { capacity: 100 },
        InventoryLayout::Slots { slots: 4 },
        MachineConfig::default(),
    );
    b.register_machine(
        "furnace",
        furnace,
        InventoryLayout::Slots { slots: 2 },
        InventoryLayout::Slots { slots: 2 },
        MachineConfig::default(),
    );
    b
}

pub fn pulverizer_registry() -> Arc<Registry> {
    Arc::new(pulverizer_builder().build().expect("fixture is valid"))
}

/// The `pulverizer` cookbook of a fixture registry.
pub fn pulverizer_cookbook(registry: &Registry) -> Arc<Cookbook> {
    let id = registry
        .cookbook_id("pulverizer")
        .expect("fixture has a pulverizer cookbook");
    Arc::clone(registry.get_cookbook(id).expect("cookbook id is valid"))
}

/// Item handle by name. Panics on unknown names.
pub fn item(registry: &Registry, name: &str) -> Item {
    registry
        .item(name)
        .cloned()
        .unwrap_or_else(|| panic!("fixture has no item named {name}"))
}
