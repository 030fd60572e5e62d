use parkline_core::hash::StateHash;
use parkline_core::id::RideEntryIndex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Which ride entries research has made available to the park.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Research {
    invented: BTreeSet<RideEntryIndex>,
}

impl Research {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an entry as invented. Returns false if it already was.
    pub fn invent(&mut self, entry: RideEntryIndex) -> bool {
        self.invented.insert(entry)
    }

    pub fn is_invented(&self, entry: RideEntryIndex) -> bool {
        self.invented.contains(&entry)
    }

    pub fn invented(&self) -> impl Iterator<Item = RideEntryIndex> + '_ {
        self.invented.iter().copied()
    }

    pub fn hash_into(&self, h: &mut StateHash) {
        h.write_u64(self.invented.len() as u64);
        for entry in &self.invented {
            h.write_u32(entry.0 as u32);
        }
    }
}
