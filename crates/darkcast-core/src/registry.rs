use crate::error::CoreError;
use crate::id::*;
use crate::inventory::InventoryLayout;
use crate::item::{Fuel, Item, ItemDef};
use crate::machine::MachineConfig;
use crate::recipe::{Cookbook, Ingredient, Recipe};
use std::collections::HashMap;
use std::sync::Arc;

/// A recipe ingredient/result line as registered, before item handles are
/// resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeEntry {
    pub item: ItemId,
    pub count: u32,
}

impl From<(ItemId, u32)> for RecipeEntry {
    fn from((item, count): (ItemId, u32)) -> Self {
        Self { item, count }
    }
}

/// A recipe definition as registered.
#[derive(Debug, Clone)]
pub struct RecipeDef {
    pub name: String,
    pub energy_cost: u32,
    pub ingredients: Vec<RecipeEntry>,
    pub results: Vec<RecipeEntry>,
}

/// A cookbook definition as registered.
#[derive(Debug, Clone)]
pub struct CookbookDef {
    pub name: String,
    pub recipes: Vec<RecipeId>,
}

/// A machine template: which cookbook it crafts from, how its inventories
/// are laid out, and how fast it works.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineTypeDef {
    pub name: String,
    pub cookbook: CookbookId,
    pub input: InventoryLayout,
    pub output: InventoryLayout,
    pub config: MachineConfig,
}

/// Builder for constructing an immutable Registry.
/// Three-phase lifecycle: registration -> mutation -> finalization.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    items: Vec<ItemDef>,
    item_name_to_id: HashMap<String, ItemId>,
    recipes: Vec<RecipeDef>,
    recipe_name_to_id: HashMap<String, RecipeId>,
    cookbooks: Vec<CookbookDef>,
    cookbook_name_to_id: HashMap<String, CookbookId>,
    machines: Vec<MachineTypeDef>,
    machine_name_to_id: HashMap<String, MachineTypeId>,
    duplicates: Vec<String>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn note_name<V>(map: &HashMap<String, V>, duplicates: &mut Vec<String>, name: &str) {
        if map.contains_key(name) {
            duplicates.push(name.to_string());
        }
    }

    /// Phase 1: Register an item kind. Returns its ID.
    pub fn register_item(&mut self, name: &str, max_stack: u32) -> ItemId {
        self.push_item(name, max_stack, None)
    }

    /// Phase 1: Register an item that can be burned as fuel.
    pub fn register_fuel(&mut self, name: &str, max_stack: u32, burn_time: u32) -> ItemId {
        self.push_item(name, max_stack, Some(Fuel { burn_time }))
    }

    fn push_item(&mut self, name: &str, max_stack: u32, fuel: Option<Fuel>) -> ItemId {
        Self::note_name(&self.item_name_to_id, &mut self.duplicates, name);
        let id = ItemId(self.items.len() as u32);
        self.items.push(ItemDef {
            id,
            name: name.to_string(),
            max_stack,
            fuel,
        });
        self.item_name_to_id.insert(name.to_string(), id);
        id
    }

    /// Phase 1: Register a recipe. Returns its ID.
    pub fn register_recipe(
        &mut self,
        name: &str,
        energy_cost: u32,
        ingredients: Vec<RecipeEntry>,
        results: Vec<RecipeEntry>,
    ) -> RecipeId {
        Self::note_name(&self.recipe_name_to_id, &mut self.duplicates, name);
        let id = RecipeId(self.recipes.len() as u32);
        self.recipes.push(RecipeDef {
            name: name.to_string(),
            energy_cost,
            ingredients,
            results,
        });
        self.recipe_name_to_id.insert(name.to_string(), id);
        id
    }

    /// Phase 1: Register a cookbook listing recipes in display order.
    pub fn register_cookbook(&mut self, name: &str, recipes: Vec<RecipeId>) -> CookbookId {
        Self::note_name(&self.cookbook_name_to_id, &mut self.duplicates, name);
        let id = CookbookId(self.cookbooks.len() as u32);
        self.cookbooks.push(CookbookDef {
            name: name.to_string(),
            recipes,
        });
        self.cookbook_name_to_id.insert(name.to_string(), id);
        id
    }

    /// Phase 1: Register a machine template.
    pub fn register_machine(
        &mut self,
        name: &str,
        cookbook: CookbookId,
        input: InventoryLayout,
        output: InventoryLayout,
        config: MachineConfig,
    ) -> MachineTypeId {
        Self::note_name(&self.machine_name_to_id, &mut self.duplicates, name);
        let id = MachineTypeId(self.machines.len() as u32);
        self.machines.push(MachineTypeDef {
            name: name.to_string(),
            cookbook,
            input,
            output,
            config,
        });
        self.machine_name_to_id.insert(name.to_string(), id);
        id
    }

    /// Phase 2: Mutate an existing recipe by name.
    pub fn mutate_recipe<F>(&mut self, name: &str, f: F) -> Result<(), RegistryError>
    where
        F: FnOnce(&mut RecipeDef),
    {
        let id = self
            .recipe_name_to_id
            .get(name)
            .ok_or(RegistryError::NotFound(name.to_string()))?;
        f(&mut self.recipes[id.0 as usize]);
        Ok(())
    }

    /// Phase 2: Mutate an existing machine template by name.
    pub fn mutate_machine<F>(&mut self, name: &str, f: F) -> Result<(), RegistryError>
    where
        F: FnOnce(&mut MachineTypeDef),
    {
        let id = self
            .machine_name_to_id
            .get(name)
            .ok_or(RegistryError::NotFound(name.to_string()))?;
        f(&mut self.machines[id.0 as usize]);
        Ok(())
    }

    pub fn item_id(&self, name: &str) -> Option<ItemId> {
        self.item_name_to_id.get(name).copied()
    }

    pub fn recipe_id(&self, name: &str) -> Option<RecipeId> {
        self.recipe_name_to_id.get(name).copied()
    }

    pub fn cookbook_id(&self, name: &str) -> Option<CookbookId> {
        self.cookbook_name_to_id.get(name).copied()
    }

    pub fn get_recipe(&self, id: RecipeId) -> Option<&RecipeDef> {
        self.recipes.get(id.0 as usize)
    }

    /// Phase 3: Validate, resolve handles, and freeze.
    pub fn build(self) -> Result<Registry, RegistryError> {
        if let Some(name) = self.duplicates.into_iter().next() {
            return Err(RegistryError::DuplicateName(name));
        }

        let mut items = Vec::with_capacity(self.items.len());
        for def in self.items {
            if def.max_stack == 0 {
                return Err(RegistryError::ZeroStackSize(def.name));
            }
            items.push(Item::new(def));
        }

        let resolve = |recipe: &str, entries: &[RecipeEntry]| {
            entries
                .iter()
                .map(|entry| -> Result<Ingredient, RegistryError> {
                    let item = items
                        .get(entry.item.0 as usize)
                        .ok_or(RegistryError::InvalidItemRef(entry.item))?;
                    if entry.count == 0 {
                        return Err(RegistryError::ZeroQuantity {
                            recipe: recipe.to_string(),
                            item: item.name().to_string(),
                        });
                    }
                    Ok(Ingredient {
                        item: item.clone(),
                        count: entry.count,
                    })
                })
                .collect::<Result<Vec<_>, _>>()
        };

        let mut recipes = Vec::with_capacity(self.recipes.len());
        for (index, def) in self.recipes.into_iter().enumerate() {
            if def.energy_cost == 0 {
                return Err(RegistryError::ZeroEnergyCost(def.name));
            }
            let ingredients = resolve(&def.name, &def.ingredients)?;
            let results = resolve(&def.name, &def.results)?;
            let recipe = Recipe {
                id: RecipeId(index as u32),
                name: def.name,
                energy_cost: def.energy_cost,
                ingredients,
                results,
            };
            // A machine checks and removes each item's summed requirement in
            // one call, so it has to fit an inventory amount.
            if let Some((item, _)) = recipe
                .demand()
                .into_iter()
                .find(|(_, total)| *total > u64::from(u32::MAX))
            {
                return Err(RegistryError::RequirementOverflow {
                    recipe: recipe.name.clone(),
                    item: item.name().to_string(),
                });
            }
            recipes.push(Arc::new(recipe));
        }

        let mut cookbooks = Vec::with_capacity(self.cookbooks.len());
        for (index, def) in self.cookbooks.into_iter().enumerate() {
            let entries = def
                .recipes
                .iter()
                .map(|id| {
                    recipes
                        .get(id.0 as usize)
                        .cloned()
                        .ok_or(RegistryError::InvalidRecipeRef(*id))
                })
                .collect::<Result<Vec<_>, _>>()?;
            cookbooks.push(Arc::new(Cookbook {
                id: CookbookId(index as u32),
                name: def.name,
                recipes: entries,
            }));
        }

        for def in &self.machines {
            if def.cookbook.0 as usize >= cookbooks.len() {
                return Err(RegistryError::InvalidCookbookRef(def.cookbook));
            }
            let invalid = |source: CoreError| RegistryError::InvalidMachine {
                name: def.name.clone(),
                source,
            };
            def.config.validate().map_err(invalid)?;
            def.input.validate().map_err(invalid)?;
            def.output.validate().map_err(invalid)?;
        }

        Ok(Registry {
            items,
            item_name_to_id: self.item_name_to_id,
            recipes,
            recipe_name_to_id: self.recipe_name_to_id,
            cookbooks,
            cookbook_name_to_id: self.cookbook_name_to_id,
            machines: self.machines,
            machine_name_to_id: self.machine_name_to_id,
        })
    }
}

/// Immutable registry. Frozen after build(). Thread-safe to share.
#[derive(Debug)]
pub struct Registry {
    items: Vec<Item>,
    item_name_to_id: HashMap<String, ItemId>,
    recipes: Vec<Arc<Recipe>>,
    recipe_name_to_id: HashMap<String, RecipeId>,
    cookbooks: Vec<Arc<Cookbook>>,
    cookbook_name_to_id: HashMap<String, CookbookId>,
    machines: Vec<MachineTypeDef>,
    machine_name_to_id: HashMap<String, MachineTypeId>,
}

impl Registry {
    pub fn get_item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(id.0 as usize)
    }

    pub fn get_recipe(&self, id: RecipeId) -> Option<&Arc<Recipe>> {
        self.recipes.get(id.0 as usize)
    }

    pub fn get_cookbook(&self, id: CookbookId) -> Option<&Arc<Cookbook>> {
        self.cookbooks.get(id.0 as usize)
    }

    pub fn get_machine(&self, id: MachineTypeId) -> Option<&MachineTypeDef> {
        self.machines.get(id.0 as usize)
    }

    /// Item handle by name.
    pub fn item(&self, name: &str) -> Option<&Item> {
        self.item_id(name).and_then(|id| self.get_item(id))
    }

    pub fn item_id(&self, name: &str) -> Option<ItemId> {
        self.item_name_to_id.get(name).copied()
    }

    pub fn recipe_id(&self, name: &str) -> Option<RecipeId> {
        self.recipe_name_to_id.get(name).copied()
    }

    pub fn cookbook_id(&self, name: &str) -> Option<CookbookId> {
        self.cookbook_name_to_id.get(name).copied()
    }

    pub fn machine_id(&self, name: &str) -> Option<MachineTypeId> {
        self.machine_name_to_id.get(name).copied()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn recipe_count(&self) -> usize {
        self.recipes.len()
    }

    pub fn cookbook_count(&self) -> usize {
        self.cookbooks.len()
    }

    pub fn machine_count(&self) -> usize {
        self.machines.len()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("duplicate name: {0}")]
    DuplicateName(String),
    #[error("item '{0}' has a max stack size of zero")]
    ZeroStackSize(String),
    #[error("recipe '{0}' has an energy cost of zero")]
    ZeroEnergyCost(String),
    #[error("recipe '{recipe}' lists zero of '{item}'")]
    ZeroQuantity { recipe: String, item: String },
    #[error("recipe '{recipe}' needs more of '{item}' than an inventory can move at once")]
    RequirementOverflow { recipe: String, item: String },
    #[error("invalid item reference: {0:?}")]
    InvalidItemRef(ItemId),
    #[error("invalid recipe reference: {0:?}")]
    InvalidRecipeRef(RecipeId),
    #[error("invalid cookbook reference: {0:?}")]
    InvalidCookbookRef(CookbookId),
    #[error("invalid machine '{name}': {source}")]
    InvalidMachine { name: String, source: CoreError },
}
