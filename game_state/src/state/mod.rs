//! Game state - the single unit of truth for one session.
//!
//! A [`GameState`] owns the player, the world, the per-session concept
//! registry, the turn counter and the event history. All mutation flows
//! through the transaction API in [`crate::transaction`]; the change
//! application here is crate-private so nothing can bypass commit-time
//! validation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::changes::{ChangeAction, ChangeTarget, StateChange};
use crate::concepts::ConceptRegistry;
use crate::error::StateError;
use crate::player::{Ability, EquipmentSlot, PlayerState};
use crate::world::{Location, Npc, WorldState};

/// Unique identifier for a play session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Create a new random session ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One line of session history, appended per committed turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub turn: u64,
    pub summary: String,
}

/// The complete state of one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub session_id: SessionId,
    pub player: PlayerState,
    pub world: WorldState,
    pub concepts: ConceptRegistry,
    /// Incremented once per successfully committed turn.
    pub turn: u64,
    pub events: Vec<EventRecord>,

    /// Guard against re-entrant transactions. Never persisted.
    #[serde(skip)]
    pub(crate) transaction_open: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Create a fresh session with an empty world.
    pub fn new() -> Self {
        Self {
            session_id: SessionId::new(),
            player: PlayerState::default(),
            world: WorldState::new(),
            concepts: ConceptRegistry::new(),
            turn: 0,
            events: Vec::new(),
            transaction_open: false,
        }
    }

    /// Serialize every invariant-bearing field to a plain JSON mapping.
    ///
    /// The external persistence layer chooses the storage format; this is
    /// only the round-trip contract.
    pub fn snapshot(&self) -> Result<Value, StateError> {
        serde_json::to_value(self).map_err(|e| StateError::Serialization(e.to_string()))
    }

    /// Rebuild a session from a [`snapshot`](Self::snapshot) mapping.
    ///
    /// The restored state is re-validated before it is returned.
    pub fn restore(value: Value) -> Result<Self, StateError> {
        let state: GameState =
            serde_json::from_value(value).map_err(|e| StateError::Serialization(e.to_string()))?;
        state.validate()?;
        Ok(state)
    }

    /// Check every state invariant: hp/mp bounds and reference resolution.
    pub fn validate(&self) -> Result<(), StateError> {
        self.player.validate()?;
        self.world.validate()?;
        if !self.player.location.is_empty()
            && !self.world.locations.contains_key(&self.player.location)
        {
            return Err(StateError::unresolved("location", &self.player.location));
        }
        Ok(())
    }

    /// Apply a single buffered change. Only the transaction commit path
    /// calls this, and only against a staged copy of the state.
    pub(crate) fn apply_change(&mut self, change: &StateChange) -> Result<(), StateError> {
        match &change.target {
            ChangeTarget::Player => self.apply_player_change(change),
            ChangeTarget::Npc(name) => self.apply_npc_change(name, change),
            ChangeTarget::World => self.apply_world_change(change),
        }
    }

    fn apply_player_change(&mut self, change: &StateChange) -> Result<(), StateError> {
        use ChangeAction::*;
        match (change.action, change.property.as_str()) {
            (Modify, "hp") => {
                let delta = int_value(change)?;
                self.player.hp = (self.player.hp + delta).clamp(0, self.player.max_hp);
            }
            (Modify, "mp") => {
                let delta = int_value(change)?;
                self.player.mp = (self.player.mp + delta).clamp(0, self.player.max_mp);
            }
            (Modify, "max_hp") => {
                self.player.max_hp = int_value(change)?;
                self.player.hp = self.player.hp.min(self.player.max_hp);
            }
            (Modify, "max_mp") => {
                self.player.max_mp = int_value(change)?;
                self.player.mp = self.player.mp.min(self.player.max_mp);
            }
            (Modify, "ac") => self.player.ac = int_value(change)?,
            (Modify, "location") => {
                let name = string_value(change)?;
                if !self.world.locations.contains_key(&name) {
                    return Err(StateError::unresolved("location", name));
                }
                self.player.location = name.clone();
                self.world.current_location = name;
            }
            (Modify, other) => {
                let ability = Ability::from_name(other)
                    .ok_or_else(|| StateError::unknown_property("player", other))?;
                self.player.abilities.set_score(ability, int_value(change)?);
            }
            (Add, "inventory") => {
                let (name, quantity) = item_value(change)?;
                self.player.add_item(name, quantity);
            }
            (Remove, "inventory") => {
                let (name, quantity) = item_value(change)?;
                self.player.remove_item(&name, quantity)?;
            }
            (Add, "status_effects") => self.player.add_status(string_value(change)?),
            (Remove, "status_effects") => self.player.remove_status(&string_value(change)?),
            (Add, "equipment") => {
                let (slot, item) = equipment_value(change)?;
                self.player.equipment.insert(slot, item);
            }
            (Remove, "equipment") => {
                let slot: EquipmentSlot = serde_json::from_value(change.value.clone())
                    .map_err(|_| bad_value(change))?;
                self.player.equipment.remove(&slot);
            }
            _ => return Err(StateError::unknown_property("player", &change.property)),
        }
        Ok(())
    }

    fn apply_npc_change(&mut self, name: &str, change: &StateChange) -> Result<(), StateError> {
        use ChangeAction::*;
        let npc = self
            .world
            .get_npc_mut(name)
            .ok_or_else(|| StateError::unresolved("npc", name))?;
        match (change.action, change.property.as_str()) {
            (Modify, "hp") => {
                let delta = int_value(change)?;
                npc.hp = (npc.hp + delta).clamp(0, npc.max_hp);
            }
            (Modify, "max_hp") => {
                npc.max_hp = int_value(change)?;
                npc.hp = npc.hp.min(npc.max_hp);
            }
            (Modify, "ac") => npc.ac = int_value(change)?,
            (Add, "inventory") => {
                let (item, quantity) = item_value(change)?;
                *npc.inventory.entry(item).or_insert(0) += quantity;
            }
            (Remove, "inventory") => {
                let (item, quantity) = item_value(change)?;
                match npc.inventory.get_mut(&item) {
                    Some(held) if *held >= quantity => {
                        *held -= quantity;
                        if *held == 0 {
                            npc.inventory.remove(&item);
                        }
                    }
                    _ => {
                        return Err(StateError::invalid_change(format!(
                            "npc '{}' does not hold {}x '{}'",
                            name, quantity, item
                        )))
                    }
                }
            }
            (Add, "status_effects") => {
                let effect = string_value(change)?;
                if !npc.status_effects.contains(&effect) {
                    npc.status_effects.push(effect);
                }
            }
            (Remove, "status_effects") => {
                let effect = string_value(change)?;
                npc.status_effects.retain(|e| e != &effect);
            }
            _ => {
                return Err(StateError::unknown_property(
                    format!("npc:{}", name),
                    &change.property,
                ))
            }
        }
        Ok(())
    }

    fn apply_world_change(&mut self, change: &StateChange) -> Result<(), StateError> {
        use ChangeAction::*;
        match (change.action, change.property.as_str()) {
            (Modify, "location") | (Modify, "current_location") => {
                let name = string_value(change)?;
                if !self.world.locations.contains_key(&name) {
                    return Err(StateError::unresolved("location", name));
                }
                self.world.current_location = name.clone();
                self.player.location = name;
            }
            (Add, "npc") => {
                let npc: Npc =
                    serde_json::from_value(change.value.clone()).map_err(|_| bad_value(change))?;
                if self.world.npcs.contains_key(&npc.name) {
                    return Err(StateError::invalid_change(format!(
                        "npc '{}' already exists",
                        npc.name
                    )));
                }
                self.world.add_npc(npc);
            }
            (Remove, "npc") => {
                let name = string_value(change)?;
                if self.world.npcs.remove(&name).is_none() {
                    return Err(StateError::unresolved("npc", name));
                }
            }
            (Add, "location") => {
                let location: Location =
                    serde_json::from_value(change.value.clone()).map_err(|_| bad_value(change))?;
                if self.world.locations.contains_key(&location.name) {
                    return Err(StateError::invalid_change(format!(
                        "location '{}' already exists",
                        location.name
                    )));
                }
                self.world.add_location(location);
            }
            (Add, "items") => {
                let (item, quantity, place) = placed_item_value(change, &self.world)?;
                let location = self
                    .world
                    .locations
                    .get_mut(&place)
                    .ok_or_else(|| StateError::unresolved("location", &place))?;
                *location.items.entry(item).or_insert(0) += quantity;
            }
            (Remove, "items") => {
                let (item, quantity, place) = placed_item_value(change, &self.world)?;
                let location = self
                    .world
                    .locations
                    .get_mut(&place)
                    .ok_or_else(|| StateError::unresolved("location", &place))?;
                match location.items.get_mut(&item) {
                    Some(held) if *held >= quantity => {
                        *held -= quantity;
                        if *held == 0 {
                            location.items.remove(&item);
                        }
                    }
                    _ => {
                        return Err(StateError::invalid_change(format!(
                            "location '{}' does not hold {}x '{}'",
                            place, quantity, item
                        )))
                    }
                }
            }
            (Add, "flags") => {
                let flag = string_value(change)?;
                self.world.set_flag(flag, true);
            }
            (Remove, "flags") => {
                let flag = string_value(change)?;
                self.world.flags.remove(&flag);
            }
            _ => return Err(StateError::unknown_property("world", &change.property)),
        }
        Ok(())
    }
}

fn bad_value(change: &StateChange) -> StateError {
    StateError::invalid_change(format!(
        "bad value {} for property '{}'",
        change.value, change.property
    ))
}

fn int_value(change: &StateChange) -> Result<i32, StateError> {
    change
        .value
        .as_i64()
        .and_then(|v| i32::try_from(v).ok())
        .ok_or_else(|| bad_value(change))
}

fn string_value(change: &StateChange) -> Result<String, StateError> {
    change
        .value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| bad_value(change))
}

/// Accepts `"torch"` (quantity 1) or `{"name": "torch", "quantity": 3}`.
fn item_value(change: &StateChange) -> Result<(String, u32), StateError> {
    match &change.value {
        Value::String(name) => Ok((name.clone(), 1)),
        Value::Object(map) => {
            let name = map
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| bad_value(change))?;
            let quantity = match map.get("quantity") {
                None => 1,
                Some(q) => q
                    .as_u64()
                    .and_then(|q| u32::try_from(q).ok())
                    .filter(|q| *q > 0)
                    .ok_or_else(|| bad_value(change))?,
            };
            Ok((name.to_string(), quantity))
        }
        _ => Err(bad_value(change)),
    }
}

/// Like [`item_value`], plus an optional `"location"` key; defaults to the
/// world's current location.
fn placed_item_value(
    change: &StateChange,
    world: &WorldState,
) -> Result<(String, u32, String), StateError> {
    let (name, quantity) = item_value(change)?;
    let place = change
        .value
        .get("location")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| world.current_location.clone());
    Ok((name, quantity, place))
}

fn equipment_value(change: &StateChange) -> Result<(EquipmentSlot, String), StateError> {
    let slot = change
        .value
        .get("slot")
        .cloned()
        .ok_or_else(|| bad_value(change))?;
    let slot: EquipmentSlot = serde_json::from_value(slot).map_err(|_| bad_value(change))?;
    let item = change
        .value
        .get("item")
        .and_then(Value::as_str)
        .ok_or_else(|| bad_value(change))?;
    Ok((slot, item.to_string()))
}
