//! Darkcast Core -- the resource and crafting simulation engine.
//!
//! Tracks stackable resources held in bounded containers and drives
//! crafting machines that turn input resources into output resources over
//! simulated time, according to recipes declared up front.
//!
//! # Tick model
//!
//! The host calls [`machine::Machine::tick`] (or [`sim::Simulation::step`]
//! for a whole scene) once per fixed simulation step. Each tick runs to
//! completion:
//!
//! 1. **Start** -- An idle machine with a selected recipe checks its input
//!    inventory. If every ingredient is present they are all removed and the
//!    recipe becomes active; otherwise nothing happens.
//! 2. **Work** -- The active recipe, if any, spends one tick of energy.
//! 3. **Finish** -- Once the energy is spent, results go into the output
//!    inventory and the machine is idle again.
//!
//! Shortages are never errors: a missing ingredient keeps the machine idle,
//! a full inventory rejects a store, and the next tick simply tries again.
//!
//! # Key Types
//!
//! - [`item::ItemStack`] -- A bounded quantity of one item kind, with
//!   combine/split semantics.
//! - [`inventory::Inventory`] -- A ledger or slot-array container.
//! - [`recipe::Recipe`] / [`recipe::Cookbook`] -- Immutable crafting data.
//! - [`registry::Registry`] -- Interned items, recipes, cookbooks and
//!   machine templates, frozen at startup.
//! - [`machine::Machine`] -- The crafting state machine.
//! - [`sim::Simulation`] -- Owns machines and steps them together.

pub mod error;
pub mod fixed;
pub mod id;
pub mod inventory;
pub mod item;
pub mod machine;
pub mod recipe;
pub mod registry;
pub mod sim;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
