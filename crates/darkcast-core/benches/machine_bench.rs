//! Criterion benchmarks for the Darkcast crafting engine.
//!
//! Two benchmark groups:
//! - `pulverizer_scene`: 1000 pulverizers with ledger inventories, always busy
//! - `slot_churn`: store/remove cycles against a 16-slot inventory

use criterion::{criterion_group, criterion_main, Criterion};
use darkcast_core::inventory::Inventory;
use darkcast_core::sim::Simulation;
use darkcast_core::test_utils::*;

// ===========================================================================
// Scene builders
// ===========================================================================

/// 1000 pulverizers, each stocked with enough ore for the whole run.
fn build_pulverizer_scene() -> Simulation {
    let registry = pulverizer_registry();
    let ore = item(&registry, "iron_ore");
    let template = registry.machine_id("pulverizer").expect("fixture template");
    let recipe = registry.recipe_id("pulverize_iron").expect("fixture recipe");

    let mut sim = Simulation::new(registry);
    for _ in 0..1000 {
        let id = sim.spawn(template).expect("spawn pulverizer");
        let machine = sim.machine_mut(id).expect("just spawned");
        machine.select_recipe(recipe).expect("recipe in cookbook");
        let _ = machine.input_mut().store(&ore, 100);
    }
    sim
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_pulverizer_scene(c: &mut Criterion) {
    let mut group = c.benchmark_group("pulverizer_scene");
    group.bench_function("step_1000_machines", |b| {
        b.iter_batched(
            build_pulverizer_scene,
            |mut sim| {
                for _ in 0..50 {
                    sim.step();
                }
                sim
            },
            criterion::BatchSize::LargeInput,
        );
    });
    group.finish();
}

fn bench_slot_churn(c: &mut Criterion) {
    let registry = pulverizer_registry();
    let ore = item(&registry, "iron_ore");
    let gravel = item(&registry, "gravel");

    let mut group = c.benchmark_group("slot_churn");
    group.bench_function("store_remove_16_slots", |b| {
        let mut inv = Inventory::slots(16).expect("non-zero size");
        b.iter(|| {
            let _ = inv.store(&ore, 300);
            let _ = inv.store(&gravel, 20);
            let _ = inv.remove(&ore, 300);
            let _ = inv.remove(&gravel, 20);
        });
    });
    group.finish();
}

criterion_group!(benches, bench_pulverizer_scene, bench_slot_churn);
criterion_main!(benches);
