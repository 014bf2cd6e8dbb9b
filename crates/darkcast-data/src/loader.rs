//! Resolution pipeline: reads data files, resolves name references, builds
//! the content registry.
//!
//! Provides format detection (RON/JSON/TOML), file discovery, and
//! deserialization helpers, plus the loading entry points built on them.

use crate::schema::{CatalogData, CookbookData, ItemData, LineData, MachineData, RecipeData};
use darkcast_core::id::{CookbookId, ItemId, MachineTypeId, RecipeId};
use darkcast_core::machine::{MachineConfig, DEFAULT_ENERGY_PER_TICK};
use darkcast_core::registry::{RecipeEntry, Registry, RegistryBuilder, RegistryError};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A required data file was not found in the given directory.
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: String, dir: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A name reference could not be resolved.
    #[error("unresolved {expected_kind} reference '{name}' in {file}")]
    UnresolvedRef {
        file: PathBuf,
        name: String,
        expected_kind: &'static str,
    },

    /// A duplicate name was found.
    #[error("duplicate name '{name}' in {file}")]
    DuplicateName { file: PathBuf, name: String },

    /// The resolved content failed registry validation.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Scan a directory for a data file with the given base name (without extension).
///
/// Looks for `{base_name}.ron`, `{base_name}.toml`, and `{base_name}.json`.
/// Returns `Ok(None)` if no file is found, or `Err(ConflictingFormats)` if
/// multiple formats exist for the same base name.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut found: Option<PathBuf> = None;

    for ext in ["ron", "toml", "json"] {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if !candidate.exists() {
            continue;
        }
        if let Some(existing) = found {
            return Err(DataLoadError::ConflictingFormats {
                a: existing,
                b: candidate,
            });
        }
        found = Some(candidate);
    }

    Ok(found)
}

/// Like [`find_data_file`], but returns an error if no file is found.
pub fn require_data_file(dir: &Path, base_name: &str) -> Result<PathBuf, DataLoadError> {
    find_data_file(dir, base_name)?.ok_or_else(|| DataLoadError::MissingRequired {
        file: base_name.to_string(),
        dir: dir.to_path_buf(),
    })
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Deserialize `content` in the given format. `file` only labels errors.
pub fn parse_str<T: DeserializeOwned>(
    content: &str,
    format: Format,
    file: &Path,
) -> Result<T, DataLoadError> {
    let parse_err = |detail: String| DataLoadError::Parse {
        file: file.to_path_buf(),
        detail,
    };
    match format {
        Format::Ron => ron::from_str(content).map_err(|e| parse_err(e.to_string())),
        Format::Json => serde_json::from_str(content).map_err(|e| parse_err(e.to_string())),
        Format::Toml => toml::from_str(content).map_err(|e| parse_err(e.to_string())),
    }
}

/// Read a file and deserialize it according to its format (detected from extension).
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    parse_str(&content, format, path)
}

/// Deserialize a list from a file. For TOML files, extracts the array at the
/// given `toml_key` from a top-level table. For RON and JSON, deserializes
/// directly as `Vec<T>`.
pub fn deserialize_list<T: DeserializeOwned>(
    path: &Path,
    toml_key: &str,
) -> Result<Vec<T>, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    if format != Format::Toml {
        return parse_str(&content, format, path);
    }

    let parse_err = |detail: String| DataLoadError::Parse {
        file: path.to_path_buf(),
        detail,
    };
    let mut table: toml::Table = toml::from_str(&content).map_err(|e| parse_err(e.to_string()))?;
    let array = table
        .remove(toml_key)
        .ok_or_else(|| parse_err(format!("missing key '{toml_key}' in TOML file")))?;
    array
        .try_into()
        .map_err(|e: toml::de::Error| parse_err(e.to_string()))
}

// ===========================================================================
// Name resolution helpers
// ===========================================================================

/// Look up a name in a map, returning an `UnresolvedRef` error if not found.
pub fn resolve_name<'a, V>(
    map: &'a HashMap<String, V>,
    name: &str,
    file: &Path,
    expected_kind: &'static str,
) -> Result<&'a V, DataLoadError> {
    map.get(name).ok_or_else(|| DataLoadError::UnresolvedRef {
        file: file.to_path_buf(),
        name: name.to_string(),
        expected_kind,
    })
}

/// Check whether a name already exists in a map, returning a `DuplicateName`
/// error if so.
pub fn check_duplicate<V>(
    map: &HashMap<String, V>,
    name: &str,
    file: &Path,
) -> Result<(), DataLoadError> {
    if map.contains_key(name) {
        Err(DataLoadError::DuplicateName {
            file: file.to_path_buf(),
            name: name.to_string(),
        })
    } else {
        Ok(())
    }
}

// ===========================================================================
// Registration
// ===========================================================================

/// Which file each catalog section came from, for error messages.
#[derive(Debug, Clone, Copy)]
struct Sources<'a> {
    items: &'a Path,
    recipes: &'a Path,
    cookbooks: &'a Path,
    machines: &'a Path,
}

impl<'a> Sources<'a> {
    fn single(file: &'a Path) -> Self {
        Self {
            items: file,
            recipes: file,
            cookbooks: file,
            machines: file,
        }
    }
}

fn register_items(
    builder: &mut RegistryBuilder,
    items: &[ItemData],
    file: &Path,
) -> Result<HashMap<String, ItemId>, DataLoadError> {
    let mut ids = HashMap::with_capacity(items.len());
    for item in items {
        check_duplicate(&ids, &item.name, file)?;
        let id = match item.fuel {
            Some(fuel) => builder.register_fuel(&item.name, item.max_stack, fuel.burn_time),
            None => builder.register_item(&item.name, item.max_stack),
        };
        ids.insert(item.name.clone(), id);
    }
    Ok(ids)
}

fn register_recipes(
    builder: &mut RegistryBuilder,
    recipes: &[RecipeData],
    item_ids: &HashMap<String, ItemId>,
    file: &Path,
) -> Result<HashMap<String, RecipeId>, DataLoadError> {
    let mut ids = HashMap::with_capacity(recipes.len());
    for recipe in recipes {
        check_duplicate(&ids, &recipe.name, file)?;
        let resolve = |lines: &[LineData]| {
            lines
                .iter()
                .map(|line| -> Result<RecipeEntry, DataLoadError> {
                    let item = resolve_name(item_ids, line.item(), file, "item")?;
                    Ok(RecipeEntry::from((*item, line.count())))
                })
                .collect::<Result<Vec<_>, DataLoadError>>()
        };
        let ingredients = resolve(&recipe.ingredients)?;
        let results = resolve(&recipe.results)?;
        let id = builder.register_recipe(&recipe.name, recipe.energy_cost, ingredients, results);
        ids.insert(recipe.name.clone(), id);
    }
    Ok(ids)
}

fn register_cookbooks(
    builder: &mut RegistryBuilder,
    cookbooks: &[CookbookData],
    recipe_ids: &HashMap<String, RecipeId>,
    file: &Path,
) -> Result<HashMap<String, CookbookId>, DataLoadError> {
    let mut ids = HashMap::with_capacity(cookbooks.len());
    for cookbook in cookbooks {
        check_duplicate(&ids, &cookbook.name, file)?;
        let recipes = cookbook
            .recipes
            .iter()
            .map(|name| resolve_name(recipe_ids, name, file, "recipe").copied())
            .collect::<Result<Vec<_>, _>>()?;
        let id = builder.register_cookbook(&cookbook.name, recipes);
        ids.insert(cookbook.name.clone(), id);
    }
    Ok(ids)
}

fn register_machines(
    builder: &mut RegistryBuilder,
    machines: &[MachineData],
    cookbook_ids: &HashMap<String, CookbookId>,
    file: &Path,
) -> Result<HashMap<String, MachineTypeId>, DataLoadError> {
    let mut ids = HashMap::with_capacity(machines.len());
    for machine in machines {
        check_duplicate(&ids, &machine.name, file)?;
        let cookbook = *resolve_name(cookbook_ids, &machine.cookbook, file, "cookbook")?;
        let config = MachineConfig {
            energy_per_tick: machine.energy_per_tick.unwrap_or(DEFAULT_ENERGY_PER_TICK),
            completion: machine.completion.unwrap_or_default(),
        };
        let id = builder.register_machine(
            &machine.name,
            cookbook,
            machine.input,
            machine.output,
            config,
        );
        ids.insert(machine.name.clone(), id);
    }
    Ok(ids)
}

fn register_catalog(
    catalog: &CatalogData,
    sources: Sources<'_>,
) -> Result<RegistryBuilder, DataLoadError> {
    let mut builder = RegistryBuilder::new();
    let item_ids = register_items(&mut builder, &catalog.items, sources.items)?;
    let recipe_ids = register_recipes(&mut builder, &catalog.recipes, &item_ids, sources.recipes)?;
    let cookbook_ids =
        register_cookbooks(&mut builder, &catalog.cookbooks, &recipe_ids, sources.cookbooks)?;
    register_machines(&mut builder, &catalog.machines, &cookbook_ids, sources.machines)?;
    Ok(builder)
}

fn finish(builder: RegistryBuilder) -> Result<Registry, DataLoadError> {
    let registry = builder.build()?;
    info!(
        items = registry.item_count(),
        recipes = registry.recipe_count(),
        cookbooks = registry.cookbook_count(),
        machines = registry.machine_count(),
        "content registry built"
    );
    Ok(registry)
}

// ===========================================================================
// Entry points
// ===========================================================================

/// Resolve a parsed catalog into a registry builder, leaving it open for
/// mutation before [`RegistryBuilder::build`]. `file` labels errors.
pub fn catalog_builder(
    catalog: &CatalogData,
    file: &Path,
) -> Result<RegistryBuilder, DataLoadError> {
    register_catalog(catalog, Sources::single(file))
}

/// Load a registry from a single catalog document held in memory.
pub fn load_catalog_str(content: &str, format: Format) -> Result<Registry, DataLoadError> {
    let file = Path::new("<inline>");
    let catalog: CatalogData = parse_str(content, format, file)?;
    finish(catalog_builder(&catalog, file)?)
}

/// Load a registry from a single catalog file.
pub fn load_catalog(path: &Path) -> Result<Registry, DataLoadError> {
    let catalog: CatalogData = deserialize_file(path)?;
    debug!(file = %path.display(), "catalog parsed");
    finish(catalog_builder(&catalog, path)?)
}

/// Load a registry from a directory of per-kind data files.
///
/// `items`, `recipes` and `cookbooks` are required; `machines` is optional.
/// Each may be RON, TOML or JSON, but only one format per base name.
pub fn load_game_data(dir: &Path) -> Result<Registry, DataLoadError> {
    let items_path = require_data_file(dir, "items")?;
    let recipes_path = require_data_file(dir, "recipes")?;
    let cookbooks_path = require_data_file(dir, "cookbooks")?;
    let machines_path = find_data_file(dir, "machines")?;

    let catalog = CatalogData {
        items: deserialize_list(&items_path, "items")?,
        recipes: deserialize_list(&recipes_path, "recipes")?,
        cookbooks: deserialize_list(&cookbooks_path, "cookbooks")?,
        machines: match &machines_path {
            Some(path) => deserialize_list(path, "machines")?,
            None => Vec::new(),
        },
    };
    debug!(dir = %dir.display(), "data files parsed");

    let sources = Sources {
        items: &items_path,
        recipes: &recipes_path,
        cookbooks: &cookbooks_path,
        machines: machines_path.as_deref().unwrap_or(dir),
    };
    finish(register_catalog(&catalog, sources)?)
}

// ===========================================================================
// Tests
// ===========================================================================
