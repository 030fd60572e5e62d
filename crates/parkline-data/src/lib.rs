//! Data loading for parks: object definitions, scenario configuration and
//! track designs from RON, TOML or JSON files.

pub mod loader;
pub mod schema;

pub use loader::{
    DataLoadError, load_objects, load_park, load_scenario, load_track_design, load_track_designs,
};
