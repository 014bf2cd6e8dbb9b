use crate::error::CoreError;
use crate::fixed::{fraction, Fixed64};
use crate::id::{ItemId, MachineTypeId, RecipeId};
use crate::inventory::Inventory;
use crate::recipe::{Cookbook, Recipe};
use crate::registry::Registry;
use std::sync::Arc;
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Energy a machine spends on its active recipe each tick unless configured
/// otherwise.
pub const DEFAULT_ENERGY_PER_TICK: u32 = 20;

fn default_energy_per_tick() -> u32 {
    DEFAULT_ENERGY_PER_TICK
}

/// When a working recipe counts as finished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionPolicy {
    /// Finish as soon as remaining energy drops to zero or below.
    #[default]
    Clamped,
    /// Finish only when remaining energy lands on exactly zero. A recipe
    /// whose cost is not a multiple of the energy rate never finishes.
    ExactZero,
}

/// Per-machine tuning, usually loaded alongside the cookbook.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MachineConfig {
    #[serde(default = "default_energy_per_tick")]
    pub energy_per_tick: u32,
    #[serde(default)]
    pub completion: CompletionPolicy,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            energy_per_tick: DEFAULT_ENERGY_PER_TICK,
            completion: CompletionPolicy::default(),
        }
    }
}

impl MachineConfig {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.energy_per_tick == 0 {
            return Err(CoreError::ZeroEnergyRate);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Crafting state. A machine only ever works on one recipe at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MachineState {
    #[default]
    Idle,
    Working {
        recipe: Arc<Recipe>,
        /// Energy still owed before the results are emitted. Only negative
        /// under [`CompletionPolicy::ExactZero`].
        energy_remaining: i64,
    },
}

// ---------------------------------------------------------------------------
// Tick report
// ---------------------------------------------------------------------------

/// What a single tick did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Recipe that started this tick.
    pub started: Option<RecipeId>,
    /// Ingredients taken from the input inventory this tick, one entry per
    /// item.
    pub consumed: Vec<(ItemId, u32)>,
    /// Recipe that finished this tick.
    pub completed: Option<RecipeId>,
    /// Results stored into the output inventory this tick.
    pub produced: Vec<(ItemId, u32)>,
    /// Results the output inventory refused. These are lost.
    pub rejected: Vec<(ItemId, u32)>,
}

impl TickReport {
    /// Whether the machine started or finished a recipe.
    pub fn state_changed(&self) -> bool {
        self.started.is_some() || self.completed.is_some()
    }
}

// ---------------------------------------------------------------------------
// Machine
// ---------------------------------------------------------------------------

/// A crafting machine: takes ingredients from its input inventory, spends
/// energy over a number of ticks, then puts the results in its output
/// inventory.
#[derive(Debug, Clone)]
pub struct Machine {
    cookbook: Arc<Cookbook>,
    input: Inventory,
    output: Inventory,
    config: MachineConfig,
    selected: Option<Arc<Recipe>>,
    state: MachineState,
}

impl Machine {
    pub fn new(
        cookbook: Arc<Cookbook>,
        input: Inventory,
        output: Inventory,
        config: MachineConfig,
    ) -> Result<Self, CoreError> {
        config.validate()?;
        Ok(Self {
            cookbook,
            input,
            output,
            config,
            selected: None,
            state: MachineState::Idle,
        })
    }

    /// Build a machine from a registered template.
    pub fn from_registry(registry: &Registry, id: MachineTypeId) -> Result<Self, CoreError> {
        let def = registry
            .get_machine(id)
            .ok_or(CoreError::UnknownMachineType(id))?;
        let cookbook = registry
            .get_cookbook(def.cookbook)
            .cloned()
            .ok_or(CoreError::UnknownMachineType(id))?;
        Self::new(
            cookbook,
            Inventory::from_layout(def.input)?,
            Inventory::from_layout(def.output)?,
            def.config.clone(),
        )
    }

    /// Choose the recipe to work on next. A recipe already in progress is not
    /// interrupted; the new choice applies once the machine is idle again.
    pub fn select_recipe(&mut self, id: RecipeId) -> Result<(), CoreError> {
        let recipe = self
            .cookbook
            .get(id)
            .cloned()
            .ok_or_else(|| CoreError::RecipeNotInCookbook {
                recipe: id,
                cookbook: self.cookbook.name.clone(),
            })?;
        self.selected = Some(recipe);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Advance the machine by one simulation step.
    ///
    /// An idle machine with a selected recipe first tries to start it: every
    /// ingredient must be present, otherwise nothing is consumed and the
    /// machine stays idle. Whatever recipe is active afterwards (including
    /// one started this tick) then receives one tick of energy and, when
    /// finished, stores its results.
    pub fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();
        if self.state == MachineState::Idle {
            self.try_start(&mut report);
        }
        self.work(&mut report);
        report
    }

    fn try_start(&mut self, report: &mut TickReport) {
        let Some(recipe) = self.selected.clone() else {
            return;
        };

        // Lines naming the same item are merged, so each item is checked and
        // removed once for its full requirement.
        let mut needed = Vec::with_capacity(recipe.ingredients.len());
        for (item, total) in recipe.demand() {
            match u32::try_from(total) {
                Ok(amount) if self.input.contains(item, amount) => needed.push((item, amount)),
                _ => {
                    trace!(
                        recipe = %recipe.name,
                        item = item.name(),
                        "missing ingredients, staying idle"
                    );
                    return;
                }
            }
        }

        // Remove from a copy and commit only if every removal succeeds.
        let mut input = self.input.clone();
        for &(item, amount) in &needed {
            if !input.remove(item, amount) {
                warn!(
                    recipe = %recipe.name,
                    item = item.name(),
                    amount,
                    "ingredient removal failed, staying idle"
                );
                return;
            }
        }
        self.input = input;
        report.consumed = needed
            .iter()
            .map(|(item, amount)| (item.id(), *amount))
            .collect();

        debug!(recipe = %recipe.name, energy = recipe.energy_cost, "recipe started");
        report.started = Some(recipe.id);
        self.state = MachineState::Working {
            energy_remaining: i64::from(recipe.energy_cost),
            recipe,
        };
    }

    fn work(&mut self, report: &mut TickReport) {
        let MachineState::Working {
            recipe,
            energy_remaining,
        } = &mut self.state
        else {
            return;
        };

        *energy_remaining = energy_remaining.saturating_sub(i64::from(self.config.energy_per_tick));
        let finished = match self.config.completion {
            CompletionPolicy::Clamped => *energy_remaining <= 0,
            CompletionPolicy::ExactZero => *energy_remaining == 0,
        };
        if !finished {
            return;
        }

        let recipe = Arc::clone(recipe);
        self.state = MachineState::Idle;

        for line in &recipe.results {
            match self.output.store(&line.item, line.count) {
                Ok(true) => report.produced.push((line.item.id(), line.count)),
                Ok(false) | Err(_) => {
                    warn!(
                        recipe = %recipe.name,
                        item = line.item.name(),
                        count = line.count,
                        "output inventory rejected result"
                    );
                    report.rejected.push((line.item.id(), line.count));
                }
            }
        }

        debug!(recipe = %recipe.name, "recipe completed");
        report.completed = Some(recipe.id);
    }

    pub fn state(&self) -> &MachineState {
        &self.state
    }

    pub fn is_working(&self) -> bool {
        matches!(self.state, MachineState::Working { .. })
    }

    pub fn selected_recipe(&self) -> Option<&Arc<Recipe>> {
        self.selected.as_ref()
    }

    pub fn active_recipe(&self) -> Option<&Arc<Recipe>> {
        match &self.state {
            MachineState::Working { recipe, .. } => Some(recipe),
            MachineState::Idle => None,
        }
    }

    /// Energy still owed on the active recipe; zero when idle.
    pub fn energy_remaining(&self) -> i64 {
        match &self.state {
            MachineState::Working {
                energy_remaining, ..
            } => *energy_remaining,
            MachineState::Idle => 0,
        }
    }

    /// Fraction of the active recipe's energy already spent, for progress
    /// bars. Zero when idle.
    pub fn progress(&self) -> Fixed64 {
        match &self.state {
            MachineState::Working {
                recipe,
                energy_remaining,
            } => {
                let cost = i64::from(recipe.energy_cost);
                fraction(cost.saturating_sub(*energy_remaining), cost)
            }
            MachineState::Idle => Fixed64::ZERO,
        }
    }

    pub fn cookbook(&self) -> &Arc<Cookbook> {
        &self.cookbook
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn input(&self) -> &Inventory {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut Inventory {
        &mut self.input
    }

    pub fn output(&self) -> &Inventory {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut Inventory {
        &mut self.output
    }
}

// ===========================================================================
// Tests
// ===========================================================================
