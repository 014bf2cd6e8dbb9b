//! Host-side simulation driver.
//!
//! A [`Simulation`] owns every machine in a scene and advances them all by
//! one fixed step per [`Simulation::step`] call. It assumes nothing about
//! how often it is called; the host decides the cadence.

use crate::error::CoreError;
use crate::fixed::Ticks;
use crate::id::{MachineId, MachineTypeId};
use crate::machine::{Machine, TickReport};
use crate::registry::Registry;
use slotmap::SlotMap;
use std::sync::Arc;
use tracing::debug_span;

/// Machines and the tick counter for one scene.
///
/// Machines tick in the order they were added. Slot keys are recycled after
/// a removal, so the order is kept separately from the slot map.
#[derive(Debug)]
pub struct Simulation {
    registry: Arc<Registry>,
    machines: SlotMap<MachineId, Machine>,
    order: Vec<MachineId>,
    tick: Ticks,
}

impl Simulation {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            machines: SlotMap::with_key(),
            order: Vec::new(),
            tick: 0,
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Build a machine from a registered template and add it.
    pub fn spawn(&mut self, machine_type: MachineTypeId) -> Result<MachineId, CoreError> {
        let machine = Machine::from_registry(&self.registry, machine_type)?;
        Ok(self.insert(machine))
    }

    pub fn insert(&mut self, machine: Machine) -> MachineId {
        let id = self.machines.insert(machine);
        self.order.push(id);
        id
    }

    pub fn remove(&mut self, id: MachineId) -> Option<Machine> {
        let machine = self.machines.remove(id)?;
        self.order.retain(|&other| other != id);
        Some(machine)
    }

    pub fn machine(&self, id: MachineId) -> Option<&Machine> {
        self.machines.get(id)
    }

    pub fn machine_mut(&mut self, id: MachineId) -> Option<&mut Machine> {
        self.machines.get_mut(id)
    }

    /// Every machine, in the order it was added.
    pub fn machines(&self) -> impl Iterator<Item = (MachineId, &Machine)> {
        self.order
            .iter()
            .filter_map(|&id| self.machines.get(id).map(|machine| (id, machine)))
    }

    pub fn machine_count(&self) -> usize {
        self.machines.len()
    }

    /// Ticks run so far.
    pub fn tick(&self) -> Ticks {
        self.tick
    }

    /// Tick every machine once, in the order they were added. Returns the
    /// reports of machines that started or finished a recipe.
    pub fn step(&mut self) -> Vec<(MachineId, TickReport)> {
        let _span = debug_span!("step", tick = self.tick).entered();
        let mut reports = Vec::new();
        for &id in &self.order {
            let Some(machine) = self.machines.get_mut(id) else {
                continue;
            };
            let report = machine.tick();
            if report.state_changed() {
                reports.push((id, report));
            }
        }
        self.tick += 1;
        reports
    }

    /// Run `steps` ticks, discarding the reports.
    pub fn run(&mut self, steps: Ticks) {
        for _ in 0..steps {
            self.step();
        }
    }
}
