//! Resolution pipeline: reads data files, resolves names, builds the
//! object registry and the game context.
//!
//! Provides format detection (RON/JSON/TOML), file discovery, and
//! deserialization helpers, plus the loaders for objects, scenarios and
//! track designs built on them.

use crate::schema::ObjectsData;
use log::debug;
use parkline_actions::config::MAP_SIZE_RANGE;
use parkline_actions::{GameContext, ScenarioConfig};
use parkline_core::fixed::money;
use parkline_core::id::{RideEntryIndex, RideGroupIndex, RideType};
use parkline_core::registry::{
    ObjectRegistry, ObjectRegistryBuilder, RegistryError, RepositoryItem, RideEntryDef,
};
use parkline_ride::TrackDesign;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Base name of the object definitions file.
pub const OBJECTS_FILE: &str = "objects";

/// Base name of the scenario configuration file.
pub const SCENARIO_FILE: &str = "scenario";

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

    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A name reference could not be resolved.
    #[error("unresolved {expected_kind} reference '{name}' in {file}")]
    UnresolvedRef {
        file: PathBuf,
        name: String,
        expected_kind: &'static str,
    },

    #[error("duplicate name '{name}' in {file}")]
    DuplicateName { file: PathBuf, name: String },

    /// A numeric setting lies outside the range the game supports.
    #[error("{field} = {value} in {file} is outside {min}..={max}")]
    OutOfRange {
        file: PathBuf,
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// The definitions parsed but the registry refused them.
    #[error("invalid objects in {file}: {source}")]
    Registry {
        file: PathBuf,
        source: RegistryError,
    },

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
/// Returns `Ok(None)` if no file is found, or `Err(ConflictingFormats)` if
/// multiple formats exist for the same base name.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut found: Option<PathBuf> = None;

    for ext in ["ron", "toml", "json"] {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing,
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
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

/// Read a file and deserialize it according to its format (detected from extension).
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    let parse_error = |detail: String| DataLoadError::Parse {
        file: path.to_path_buf(),
        detail,
    };

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(e.to_string())),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(e.to_string())),
        Format::Toml => toml::from_str(&content).map_err(|e| parse_error(e.to_string())),
    }
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
// Objects
// ===========================================================================

/// Register parsed object definitions, in file order.
///
/// Ride entry and repository names share one namespace: a name may be
/// either loaded or merely installed, not both.
pub fn build_registry(data: &ObjectsData, file: &Path) -> Result<ObjectRegistry, DataLoadError> {
    let mut builder = ObjectRegistryBuilder::new();

    for surface in &data.surfaces {
        builder.register_surface(&surface.name, money(surface.price), surface.can_grow);
    }
    for edge in &data.edges {
        builder.register_edge(&edge.name);
    }

    let mut ride_objects: HashMap<String, RideType> = HashMap::new();
    for entry in &data.ride_entries {
        check_duplicate(&ride_objects, &entry.name, file)?;
        ride_objects.insert(entry.name.clone(), RideType(entry.ride_type));

        let mut def = RideEntryDef::new(&entry.name, RideType(entry.ride_type));
        def.ride_group = entry.ride_group.map(RideGroupIndex);
        if !entry.preset_colours.is_empty() {
            def.preset_colours = entry.preset_colours.clone();
        }
        def.min_cars_per_train = entry.min_cars_per_train;
        def.max_cars_per_train = entry.max_cars_per_train.max(entry.min_cars_per_train);
        builder.register_ride_entry(def);
    }
    for item in &data.repository {
        check_duplicate(&ride_objects, &item.name, file)?;
        ride_objects.insert(item.name.clone(), RideType(item.ride_type));

        builder.register_repository_item(RepositoryItem {
            name: item.name.clone(),
            ride_type: RideType(item.ride_type),
            ride_group: item.ride_group.map(RideGroupIndex),
        });
    }

    for scenery in &data.scenery {
        builder.register_scenery(&scenery.name, money(scenery.price));
    }

    builder.build().map_err(|source| DataLoadError::Registry {
        file: file.to_path_buf(),
        source,
    })
}

/// Load `objects.{ron,toml,json}` from `dir` into a registry.
pub fn load_objects(dir: &Path) -> Result<ObjectRegistry, DataLoadError> {
    let path = require_data_file(dir, OBJECTS_FILE)?;
    let data: ObjectsData = deserialize_file(&path)?;
    let registry = build_registry(&data, &path)?;
    debug!(
        "loaded {} surfaces, {} edges, {} ride entries, {} scenery objects from {}",
        registry.surface_count(),
        registry.edge_count(),
        registry.ride_entry_count(),
        registry.scenery_count(),
        path.display()
    );
    Ok(registry)
}

// ===========================================================================
// Scenario and designs
// ===========================================================================

/// Load `scenario.{ron,toml,json}` from `dir`. A missing file yields the
/// default scenario. The map size must lie in [`MAP_SIZE_RANGE`].
pub fn load_scenario(dir: &Path) -> Result<ScenarioConfig, DataLoadError> {
    match find_data_file(dir, SCENARIO_FILE)? {
        Some(path) => {
            let config: ScenarioConfig = deserialize_file(&path)?;
            if !MAP_SIZE_RANGE.contains(&config.map_size) {
                return Err(DataLoadError::OutOfRange {
                    file: path,
                    field: "map_size",
                    value: config.map_size.into(),
                    min: (*MAP_SIZE_RANGE.start()).into(),
                    max: (*MAP_SIZE_RANGE.end()).into(),
                });
            }
            Ok(config)
        }
        None => {
            debug!("no scenario file in {}, using defaults", dir.display());
            Ok(ScenarioConfig::default())
        }
    }
}

/// Load a single track design file.
pub fn load_track_design(path: &Path) -> Result<TrackDesign, DataLoadError> {
    deserialize_file(path)
}

/// Load every track design in `dir`, in file name order. Files with an
/// unsupported extension are skipped.
pub fn load_track_designs(dir: &Path) -> Result<Vec<TrackDesign>, DataLoadError> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && detect_format(&path).is_ok() {
            paths.push(path);
        }
    }
    paths.sort();
    paths.iter().map(|path| load_track_design(path)).collect()
}

/// Load objects and scenario from `dir` and build a ready-to-run context.
///
/// Unlike [`GameContext::from_config`], an invented ride entry that is not
/// loaded is an error here.
pub fn load_park(dir: &Path) -> Result<GameContext, DataLoadError> {
    let objects = load_objects(dir)?;
    let config = load_scenario(dir)?;

    let loaded: HashMap<String, RideEntryIndex> = config
        .invented_ride_entries
        .iter()
        .filter_map(|name| Some((name.clone(), objects.ride_entry_by_name(name)?)))
        .collect();
    let scenario_path = find_data_file(dir, SCENARIO_FILE)?.unwrap_or_else(|| dir.to_path_buf());
    for name in &config.invented_ride_entries {
        resolve_name(&loaded, name, &scenario_path, "ride entry")?;
    }

    Ok(GameContext::from_config(objects, &config))
}

// ===========================================================================
// Tests
// ===========================================================================
