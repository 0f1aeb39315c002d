//! World state - locations, NPCs and global flags.
//!
//! Everything here is keyed by name. Runtime-discovered entities join the
//! world through transactional changes, and other state refers to them by
//! name lookup rather than by owning pointer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::StateError;

/// Broad NPC disposition, used by rules like trade and rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NpcArchetype {
    Hostile,
    Friendly,
    Merchant,
    Neutral,
}

/// A non-player character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Npc {
    pub name: String,
    pub archetype: NpcArchetype,
    pub hp: i32,
    pub max_hp: i32,
    pub ac: i32,
    /// Name of the location the NPC is at. Empty means the NPC follows
    /// the current scene.
    #[serde(default)]
    pub location: String,
    /// Item name -> quantity carried.
    #[serde(default)]
    pub inventory: BTreeMap<String, u32>,
    /// Status effect names, resolved against the concept registry.
    #[serde(default)]
    pub status_effects: Vec<String>,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl Npc {
    /// Create an NPC with full hp.
    pub fn new(name: impl Into<String>, archetype: NpcArchetype, max_hp: i32) -> Self {
        Self {
            name: name.into(),
            archetype,
            hp: max_hp,
            max_hp,
            ac: 10,
            location: String::new(),
            inventory: BTreeMap::new(),
            status_effects: Vec::new(),
            properties: Map::new(),
        }
    }

    /// Set the armor class.
    pub fn with_ac(mut self, ac: i32) -> Self {
        self.ac = ac;
        self
    }

    /// Place the NPC at a named location.
    pub fn with_location(mut self, name: impl Into<String>) -> Self {
        self.location = name.into();
        self
    }

    /// Add carried items.
    pub fn with_item(mut self, name: impl Into<String>, quantity: u32) -> Self {
        *self.inventory.entry(name.into()).or_insert(0) += quantity;
        self
    }

    /// Whether the NPC is alive.
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Whether the NPC will trade with the player.
    pub fn can_trade(&self) -> bool {
        matches!(
            self.archetype,
            NpcArchetype::Merchant | NpcArchetype::Friendly
        )
    }
}

/// A place in the game world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub description: String,
    /// Names of directly reachable locations.
    #[serde(default)]
    pub connections: Vec<String>,
    /// Item name -> quantity lying here.
    #[serde(default)]
    pub items: BTreeMap<String, u32>,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl Location {
    /// Create a location.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            connections: Vec::new(),
            items: BTreeMap::new(),
            properties: Map::new(),
        }
    }

    /// Connect this location to another by name.
    pub fn with_connection(mut self, name: impl Into<String>) -> Self {
        self.connections.push(name.into());
        self
    }

    /// Place items here.
    pub fn with_item(mut self, name: impl Into<String>, quantity: u32) -> Self {
        *self.items.entry(name.into()).or_insert(0) += quantity;
        self
    }

    /// Whether `name` is directly reachable from here.
    pub fn connects_to(&self, name: &str) -> bool {
        self.connections.iter().any(|c| c == name)
    }
}

/// The complete world side of one session's state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WorldState {
    /// Name of the location the session is focused on.
    pub current_location: String,
    pub locations: BTreeMap<String, Location>,
    pub npcs: BTreeMap<String, Npc>,
    /// Global boolean flags.
    pub flags: BTreeMap<String, bool>,
}

impl WorldState {
    /// Create an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a location, keyed by its name.
    pub fn add_location(&mut self, location: Location) {
        self.locations.insert(location.name.clone(), location);
    }

    /// Insert an NPC, keyed by its name.
    pub fn add_npc(&mut self, npc: Npc) {
        self.npcs.insert(npc.name.clone(), npc);
    }

    /// Exact-name NPC lookup.
    pub fn get_npc(&self, name: &str) -> Option<&Npc> {
        self.npcs.get(name)
    }

    /// Exact-name mutable NPC lookup.
    pub fn get_npc_mut(&mut self, name: &str) -> Option<&mut Npc> {
        self.npcs.get_mut(name)
    }

    /// Resolve a player-supplied name to an NPC.
    ///
    /// Case-insensitive; accepts a substring of the full name, so "goblin"
    /// finds "goblin scout". Exact matches win over substring matches.
    pub fn find_npc(&self, name: &str) -> Option<&Npc> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.npcs
            .values()
            .find(|npc| npc.name.to_lowercase() == needle)
            .or_else(|| {
                self.npcs
                    .values()
                    .find(|npc| npc.name.to_lowercase().contains(&needle))
            })
    }

    /// The location the session is focused on.
    pub fn current(&self) -> Option<&Location> {
        self.locations.get(&self.current_location)
    }

    /// Whether a living hostile NPC is present at the current location.
    ///
    /// NPCs without a placement count as part of the current scene.
    pub fn hostiles_present(&self) -> bool {
        self.npcs.values().any(|npc| {
            npc.archetype == NpcArchetype::Hostile
                && npc.is_alive()
                && (npc.location.is_empty() || npc.location == self.current_location)
        })
    }

    /// Set a global flag.
    pub fn set_flag(&mut self, name: impl Into<String>, value: bool) {
        self.flags.insert(name.into(), value);
    }

    /// Read a global flag; unset flags read as false.
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    /// Check world invariants: NPC hp bounds and a resolvable focus location.
    pub fn validate(&self) -> Result<(), StateError> {
        for npc in self.npcs.values() {
            if npc.max_hp < 0 {
                return Err(StateError::bounds(format!(
                    "npc '{}' max_hp must be non-negative",
                    npc.name
                )));
            }
            if npc.hp < 0 || npc.hp > npc.max_hp {
                return Err(StateError::bounds(format!(
                    "npc '{}' hp {} outside [0, {}]",
                    npc.name, npc.hp, npc.max_hp
                )));
            }
            if !npc.location.is_empty() && !self.locations.contains_key(&npc.location) {
                return Err(StateError::unresolved("location", &npc.location));
            }
        }
        if !self.current_location.is_empty() && !self.locations.contains_key(&self.current_location)
        {
            return Err(StateError::unresolved("location", &self.current_location));
        }
        Ok(())
    }
}
