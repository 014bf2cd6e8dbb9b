//! Integration tests for the Darkcast crafting engine.
//!
//! These tests drive stacks, inventories and machines end to end through the
//! public API, the way a host game would.

use darkcast_core::inventory::{Inventory, LedgerInventory};
use darkcast_core::item::ItemStack;
use darkcast_core::machine::{Machine, MachineConfig, MachineState};
use darkcast_core::sim::Simulation;
use darkcast_core::test_utils::*;

// ===========================================================================
// Stack scenarios
// ===========================================================================

#[test]
fn combining_partial_stacks_merges_into_first() {
    let registry = pulverizer_registry();
    let ore = item(&registry, "iron_ore");
    let mut first = ItemStack::new(&ore, 24).unwrap();
    let mut second = ItemStack::new(&ore, 16).unwrap();

    first.combine(&mut second);

    assert_eq!(first.count(), 40);
    assert!(second.is_empty());
    assert_eq!(second.to_string(), "(Empty)");
}

#[test]
fn combining_overfull_stacks_leaves_remainder() {
    let registry = pulverizer_registry();
    let ore = item(&registry, "iron_ore");
    let mut first = ItemStack::new(&ore, 50).unwrap();
    let mut second = ItemStack::new(&ore, 30).unwrap();

    first.combine(&mut second);

    assert_eq!(first.count(), 64);
    assert_eq!(second.count(), 16);
    assert_eq!(second.to_string(), "(iron_ore, 16)");
}

// ===========================================================================
// Inventory scenarios
// ===========================================================================

#[test]
fn store_over_capacity_is_rejected() {
    let registry = pulverizer_registry();
    let ore = item(&registry, "iron_ore");
    let mut inv = LedgerInventory::new(10).unwrap();

    assert_eq!(inv.store(&ore, 5), Ok(true));
    assert_eq!(inv.store(&ore, 6), Ok(false));
    assert_eq!(inv.quantity(&ore), 5);
}

#[test]
fn slot_inventory_hands_back_what_does_not_fit() {
    let registry = pulverizer_registry();
    let gravel = item(&registry, "gravel");
    let ore = item(&registry, "iron_ore");
    let mut inv = Inventory::slots(2).unwrap();
    assert_eq!(inv.store(&gravel, 8), Ok(true));
    assert_eq!(inv.store(&ore, 10), Ok(true));

    // Both slots taken: gravel is full and ore blocks the other slot.
    assert_eq!(inv.store(&gravel, 1), Ok(false));
    let Inventory::Slots(slots) = &mut inv else {
        panic!("expected a slot inventory");
    };
    let mut carried = ItemStack::new(&gravel, 3).unwrap();
    slots.insert(&mut carried);
    assert_eq!(carried.count(), 3);
}

// ===========================================================================
// Machine scenarios
// ===========================================================================

#[test]
fn pulverizer_turns_two_ore_into_one_dust_over_two_ticks() {
    let registry = pulverizer_registry();
    let ore = item(&registry, "iron_ore");
    let dust = item(&registry, "iron_dust");
    let mut machine = Machine::new(
        pulverizer_cookbook(&registry),
        Inventory::ledger(64).unwrap(),
        Inventory::ledger(64).unwrap(),
        MachineConfig::default(),
    )
    .unwrap();
    machine
        .select_recipe(registry.recipe_id("pulverize_iron").unwrap())
        .unwrap();
    assert_eq!(machine.input_mut().store(&ore, 2), Ok(true));

    // Tick 1: ingredients consumed, 40 -> 20, no output yet.
    machine.tick();
    assert!(!machine.input().contains(&ore, 1));
    assert_eq!(machine.energy_remaining(), 20);
    assert!(machine.output().is_empty());

    // Tick 2: 20 -> 0, one dust stored, idle again.
    machine.tick();
    assert_eq!(machine.output().quantity(&dust), 1);
    assert_eq!(*machine.state(), MachineState::Idle);
}

#[test]
fn unselected_machine_does_nothing() {
    let registry = pulverizer_registry();
    let ore = item(&registry, "iron_ore");
    let mut machine =
        Machine::from_registry(&registry, registry.machine_id("pulverizer").unwrap()).unwrap();
    let _ = machine.input_mut().store(&ore, 10);
    let input_before = machine.input().clone();
    let output_before = machine.output().clone();

    for _ in 0..50 {
        let report = machine.tick();
        assert!(!report.state_changed());
    }

    assert_eq!(machine.input(), &input_before);
    assert_eq!(machine.output(), &output_before);
}

// ===========================================================================
// Production chain
// ===========================================================================
//
// Pulverizer (ore -> dust) feeding a furnace (dust -> ingot). The host moves
// dust between the two machines each tick, as a conveyor would.

#[test]
fn pulverizer_feeds_furnace() {
    let registry = pulverizer_registry();
    let ore = item(&registry, "iron_ore");
    let dust = item(&registry, "iron_dust");
    let ingot = item(&registry, "iron_ingot");

    let mut sim = Simulation::new(registry.clone());
    let pulverizer = sim.spawn(registry.machine_id("pulverizer").unwrap()).unwrap();
    let furnace = sim.spawn(registry.machine_id("furnace").unwrap()).unwrap();
    {
        let m = sim.machine_mut(pulverizer).unwrap();
        m.select_recipe(registry.recipe_id("pulverize_iron").unwrap())
            .unwrap();
        let _ = m.input_mut().store(&ore, 8);
    }
    sim.machine_mut(furnace)
        .unwrap()
        .select_recipe(registry.recipe_id("smelt_dust").unwrap())
        .unwrap();

    for _ in 0..30 {
        sim.step();
        let held = sim.machine(pulverizer).unwrap().output().quantity(&dust);
        let moved = u32::try_from(held).unwrap();
        if moved > 0
            && sim.machine_mut(furnace).unwrap().input_mut().store(&dust, moved) == Ok(true)
        {
            let taken = sim
                .machine_mut(pulverizer)
                .unwrap()
                .output_mut()
                .remove(&dust, moved);
            assert!(taken);
        }
    }

    // 8 ore -> 4 dust -> 4 ingots.
    assert_eq!(sim.machine(furnace).unwrap().output().quantity(&ingot), 4);
    assert!(sim.machine(pulverizer).unwrap().input().is_empty());
    assert_eq!(sim.tick(), 30);
}
