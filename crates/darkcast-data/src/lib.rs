//! Data-driven content loading for the Darkcast crafting engine.
//!
//! Items, recipes, cookbooks and machine templates are declared in RON,
//! TOML or JSON and resolved into a frozen [`darkcast_core::registry::Registry`].

pub mod loader;
pub mod schema;

pub use loader::{load_catalog, load_catalog_str, load_game_data, DataLoadError, Format};
