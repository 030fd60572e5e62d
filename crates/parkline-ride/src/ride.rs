//! Ride entities and the registry that owns them.

use parkline_core::hash::StateHash;
use parkline_core::id::{RideEntryIndex, RideId, RideType};
use parkline_core::registry::{ObjectRegistry, VehicleColour};
use parkline_core::strings::StringId;
use serde::{Deserialize, Serialize};
use slotmap::{Key, SlotMap};

/// Maximum number of rides a park can hold.
pub const MAX_RIDES: usize = 255;

/// Maximum number of vehicles (trains) per ride, and vehicle colour slots.
pub const MAX_VEHICLES_PER_RIDE: usize = 32;

/// Number of track colour schemes per ride.
pub const NUM_COLOUR_SCHEMES: usize = 4;

/// Maximum circuits a ride can be set to run.
pub const MAX_CIRCUITS: u8 = 20;

/// Lifecycle flag: the ride was built from a track design, not by hand.
pub const RIDE_LIFECYCLE_NOT_CUSTOM_DESIGN: u32 = 1 << 18;

/// How often mechanics inspect a ride.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InspectionInterval {
    Every10Minutes,
    Every20Minutes,
    #[default]
    Every30Minutes,
    Every45Minutes,
    EveryHour,
    Every2Hours,
    Never,
}

/// Main/additional/supports colours for one track colour scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TrackColour {
    pub main: u8,
    pub additional: u8,
    pub supports: u8,
}

/// A ride in the park. Created by the ride registry; outlives the action
/// that created it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ride {
    pub name: String,
    pub ride_type: RideType,
    pub entry: RideEntryIndex,
    /// Index into the entry's preset colour list.
    pub colour_preset: u8,
    pub mode: u8,
    pub num_trains: u8,
    pub num_cars_per_train: u8,
    pub depart_flags: u8,
    pub min_waiting_time: u8,
    pub max_waiting_time: u8,
    pub operation_option: u8,
    pub lift_hill_speed: u8,
    pub num_circuits: u8,
    pub inspection_interval: InspectionInterval,
    pub lifecycle_flags: u32,
    pub colour_scheme_type: u8,
    pub entrance_style: u8,
    pub track_colours: [TrackColour; NUM_COLOUR_SCHEMES],
    pub vehicle_colours: Vec<VehicleColour>,
}

impl Ride {
    fn new(name: String, ride_type: RideType, entry: RideEntryIndex, colour_preset: u8) -> Self {
        Self {
            name,
            ride_type,
            entry,
            colour_preset,
            mode: 0,
            num_trains: 1,
            num_cars_per_train: 1,
            depart_flags: 0,
            min_waiting_time: 10,
            max_waiting_time: 60,
            operation_option: 0,
            lift_hill_speed: 1,
            num_circuits: 1,
            inspection_interval: InspectionInterval::default(),
            lifecycle_flags: 0,
            colour_scheme_type: 0,
            entrance_style: 0,
            track_colours: [TrackColour::default(); NUM_COLOUR_SCHEMES],
            vehicle_colours: vec![VehicleColour::default(); MAX_VEHICLES_PER_RIDE],
        }
    }

    pub fn set_to_default_inspection_interval(&mut self) {
        self.inspection_interval = InspectionInterval::default();
    }

    /// Paint every vehicle with the given preset colour of the ride's entry.
    pub fn apply_preset_colour(&mut self, objects: &ObjectRegistry, preset: u8) {
        self.colour_preset = preset;
        let colour = objects
            .ride_entry(self.entry)
            .and_then(|def| def.preset_colours.get(preset as usize))
            .copied()
            .unwrap_or_default();
        for slot in self.vehicle_colours.iter_mut() {
            *slot = colour;
        }
    }

    fn hash_into(&self, h: &mut StateHash) {
        h.write_str(&self.name);
        h.write_u8(self.ride_type.0);
        h.write_u32(self.entry.0 as u32);
        for v in [
            self.colour_preset,
            self.mode,
            self.num_trains,
            self.num_cars_per_train,
            self.depart_flags,
            self.min_waiting_time,
            self.max_waiting_time,
            self.operation_option,
            self.lift_hill_speed,
            self.num_circuits,
            self.inspection_interval as u8,
            self.colour_scheme_type,
            self.entrance_style,
        ] {
            h.write_u8(v);
        }
        h.write_u32(self.lifecycle_flags);
        for c in &self.track_colours {
            h.write(&[c.main, c.additional, c.supports]);
        }
        for c in &self.vehicle_colours {
            h.write(&[c.body, c.trim, c.ternary]);
        }
    }
}

/// What a successful creation would produce, computed without mutating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RidePreview {
    pub ride_type: RideType,
    pub entry: RideEntryIndex,
    pub colour_preset: u8,
}

/// Errors from ride registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RideError {
    #[error("too many rides (limit {0})")]
    TooManyRides(usize),
    #[error("ride entry {0:?} is not loaded or has the wrong ride type")]
    InvalidEntry(RideEntryIndex),
    #[error("no available ride entry for ride type {0:?}")]
    NoEntryAvailable(RideType),
    #[error("ride not found")]
    NotFound,
}

impl RideError {
    /// Localizable reason for showing the error to the player.
    pub fn reason(&self) -> StringId {
        match self {
            RideError::TooManyRides(_) => StringId::TooManyRides,
            RideError::InvalidEntry(_) | RideError::NoEntryAvailable(_) => {
                StringId::InvalidRideEntry
            }
            RideError::NotFound => StringId::RideNotFound,
        }
    }
}

/// Owns every ride in the park.
///
/// Backed by a `SlotMap`, so a demolished ride's id never resolves again
/// and key allocation is identical on every peer that runs the same
/// sequence of creates and demolishes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RideRegistry {
    rides: SlotMap<RideId, Ride>,
    capacity: usize,
    next_name_number: u32,
}

impl Default for RideRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RideRegistry {
    pub fn new() -> Self {
        Self::with_capacity(MAX_RIDES)
    }

    /// A registry that refuses to hold more than `capacity` rides.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rides: SlotMap::with_key(),
            capacity,
            next_name_number: 1,
        }
    }

    /// Validate a creation request and pick the entry and colour it would use.
    ///
    /// With no entry given, the first entry of the ride type (registry
    /// order) for which `is_available` holds is used.
    pub fn check_create(
        &self,
        ride_type: RideType,
        entry: Option<RideEntryIndex>,
        objects: &ObjectRegistry,
        is_available: impl Fn(RideEntryIndex) -> bool,
    ) -> Result<RidePreview, RideError> {
        if self.rides.len() >= self.capacity {
            return Err(RideError::TooManyRides(self.capacity));
        }

        let entry = match entry {
            Some(index) => {
                let def = objects
                    .ride_entry(index)
                    .ok_or(RideError::InvalidEntry(index))?;
                if def.ride_type != ride_type {
                    return Err(RideError::InvalidEntry(index));
                }
                index
            }
            None => objects
                .ride_entries_for_type(ride_type)
                .map(|(index, _)| index)
                .find(|&index| is_available(index))
                .ok_or(RideError::NoEntryAvailable(ride_type))?,
        };

        Ok(RidePreview {
            ride_type,
            entry,
            colour_preset: self.unused_preset_vehicle_colour(entry, objects),
        })
    }

    /// Create a ride. See [`check_create`](Self::check_create) for entry selection.
    pub fn create(
        &mut self,
        ride_type: RideType,
        entry: Option<RideEntryIndex>,
        objects: &ObjectRegistry,
        is_available: impl Fn(RideEntryIndex) -> bool,
    ) -> Result<(RideId, RidePreview), RideError> {
        let preview = self.check_create(ride_type, entry, objects, is_available)?;

        let base_name = objects
            .ride_entry(preview.entry)
            .map(|def| def.name.clone())
            .unwrap_or_else(|| "Ride".to_string());
        let name = loop {
            let candidate = format!("{base_name} {}", self.next_name_number);
            self.next_name_number += 1;
            if !self.name_in_use(&candidate, None) {
                break candidate;
            }
        };

        let mut ride = Ride::new(name, ride_type, preview.entry, preview.colour_preset);
        if let Some(def) = objects.ride_entry(preview.entry) {
            ride.num_cars_per_train = def.min_cars_per_train.max(1);
        }
        ride.apply_preset_colour(objects, preview.colour_preset);
        let id = self.rides.insert(ride);
        Ok((id, preview))
    }

    /// Remove a ride. Its id never resolves again.
    pub fn demolish(&mut self, id: RideId) -> Result<Ride, RideError> {
        self.rides.remove(id).ok_or(RideError::NotFound)
    }

    pub fn get(&self, id: RideId) -> Option<&Ride> {
        self.rides.get(id)
    }

    pub fn get_mut(&mut self, id: RideId) -> Option<&mut Ride> {
        self.rides.get_mut(id)
    }

    pub fn contains(&self, id: RideId) -> bool {
        self.rides.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.rides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rides.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RideId, &Ride)> {
        self.rides.iter()
    }

    /// Whether another ride (other than `except`) already uses `name`.
    pub fn name_in_use(&self, name: &str, except: Option<RideId>) -> bool {
        self.rides
            .iter()
            .any(|(id, ride)| Some(id) != except && ride.name == name)
    }

    /// First preset colour of `entry` not used by another ride of the same
    /// entry. Falls back to preset 0 when every preset is taken.
    pub fn unused_preset_vehicle_colour(&self, entry: RideEntryIndex, objects: &ObjectRegistry) -> u8 {
        let preset_count = objects
            .ride_entry(entry)
            .map(|def| def.preset_colours.len())
            .unwrap_or(0);
        if preset_count <= 1 {
            return 0;
        }
        (0..preset_count.min(u8::MAX as usize) as u8)
            .find(|&preset| {
                !self
                    .rides
                    .values()
                    .any(|ride| ride.entry == entry && ride.colour_preset == preset)
            })
            .unwrap_or(0)
    }

    /// Feed every ride and the name counter into a state hash, rides in
    /// slot order.
    pub fn hash_into(&self, h: &mut StateHash) {
        h.write_u32(self.next_name_number);
        h.write_u64(self.rides.len() as u64);
        for (id, ride) in &self.rides {
            h.write_u64(id.data().as_ffi());
            ride.hash_into(h);
        }
    }
}
