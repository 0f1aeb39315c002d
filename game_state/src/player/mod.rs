//! Player state - the character sheet side of the ledger.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::StateError;

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    /// All abilities, in sheet order.
    pub const ALL: [Ability; 6] = [
        Ability::Strength,
        Ability::Dexterity,
        Ability::Constitution,
        Ability::Intelligence,
        Ability::Wisdom,
        Ability::Charisma,
    ];

    /// Parse a lowercase ability name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "strength" => Some(Ability::Strength),
            "dexterity" => Some(Ability::Dexterity),
            "constitution" => Some(Ability::Constitution),
            "intelligence" => Some(Ability::Intelligence),
            "wisdom" => Some(Ability::Wisdom),
            "charisma" => Some(Ability::Charisma),
            _ => None,
        }
    }
}

/// Ability score block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Abilities {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl Default for Abilities {
    fn default() -> Self {
        Self {
            strength: 10,
            dexterity: 10,
            constitution: 10,
            intelligence: 10,
            wisdom: 10,
            charisma: 10,
        }
    }
}

impl Abilities {
    /// Raw score for an ability.
    pub fn score(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    /// Set the raw score for an ability.
    pub fn set_score(&mut self, ability: Ability, value: i32) {
        match ability {
            Ability::Strength => self.strength = value,
            Ability::Dexterity => self.dexterity = value,
            Ability::Constitution => self.constitution = value,
            Ability::Intelligence => self.intelligence = value,
            Ability::Wisdom => self.wisdom = value,
            Ability::Charisma => self.charisma = value,
        }
    }

    /// Modifier for an ability ((score - 10) / 2).
    pub fn modifier(&self, ability: Ability) -> i32 {
        (self.score(ability) - 10).div_euclid(2)
    }
}

/// Equipment slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentSlot {
    Head,
    Chest,
    Hands,
    Legs,
    Feet,
    MainHand,
    OffHand,
}

/// The player's full state within one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub abilities: Abilities,
    pub hp: i32,
    pub max_hp: i32,
    pub mp: i32,
    pub max_mp: i32,
    pub ac: i32,
    /// Names of active status effects, resolved against the concept
    /// registry at read time.
    pub status_effects: Vec<String>,
    /// Item name -> quantity held.
    pub inventory: BTreeMap<String, u32>,
    /// Equipped item name per slot.
    pub equipment: BTreeMap<EquipmentSlot, String>,
    /// Name of the location the player occupies.
    pub location: String,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            abilities: Abilities::default(),
            hp: 20,
            max_hp: 20,
            mp: 10,
            max_mp: 10,
            ac: 10,
            status_effects: Vec::new(),
            inventory: BTreeMap::new(),
            equipment: BTreeMap::new(),
            location: String::new(),
        }
    }
}

impl PlayerState {
    /// Create a player with default stats at the given location.
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            ..Self::default()
        }
    }

    /// Whether the player is alive.
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Add items to the inventory.
    pub fn add_item(&mut self, name: impl Into<String>, quantity: u32) {
        *self.inventory.entry(name.into()).or_insert(0) += quantity;
    }

    /// Remove items from the inventory. Fails if fewer are held.
    pub fn remove_item(&mut self, name: &str, quantity: u32) -> Result<(), StateError> {
        match self.inventory.get_mut(name) {
            Some(held) if *held >= quantity => {
                *held -= quantity;
                if *held == 0 {
                    self.inventory.remove(name);
                }
                Ok(())
            }
            Some(held) => Err(StateError::invalid_change(format!(
                "cannot remove {}x '{}': only {} held",
                quantity, name, held
            ))),
            None => Err(StateError::unresolved("item", name)),
        }
    }

    /// Quantity of an item held.
    pub fn item_count(&self, name: &str) -> u32 {
        self.inventory.get(name).copied().unwrap_or(0)
    }

    /// Add a status effect name if not already present.
    pub fn add_status(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.status_effects.contains(&name) {
            self.status_effects.push(name);
        }
    }

    /// Remove a status effect by name. No-op if absent.
    pub fn remove_status(&mut self, name: &str) {
        self.status_effects.retain(|effect| effect != name);
    }

    /// Check the hp/mp invariants.
    pub fn validate(&self) -> Result<(), StateError> {
        if self.max_hp < 0 || self.max_mp < 0 {
            return Err(StateError::bounds("player maxima must be non-negative"));
        }
        if self.hp < 0 || self.hp > self.max_hp {
            return Err(StateError::bounds(format!(
                "player hp {} outside [0, {}]",
                self.hp, self.max_hp
            )));
        }
        if self.mp < 0 || self.mp > self.max_mp {
            return Err(StateError::bounds(format!(
                "player mp {} outside [0, {}]",
                self.mp, self.max_mp
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ability_modifiers() {
        let abilities = Abilities {
            strength: 18,
            dexterity: 14,
            constitution: 12,
            intelligence: 8,
            wisdom: 10,
            charisma: 7,
        };
        assert_eq!(abilities.modifier(Ability::Strength), 4);
        assert_eq!(abilities.modifier(Ability::Dexterity), 2);
        assert_eq!(abilities.modifier(Ability::Constitution), 1);
        assert_eq!(abilities.modifier(Ability::Intelligence), -1);
        assert_eq!(abilities.modifier(Ability::Wisdom), 0);
        assert_eq!(abilities.modifier(Ability::Charisma), -2);
    }

    #[test]
    fn test_inventory_add_remove() {
        let mut player = PlayerState::default();
        player.add_item("torch", 3);
        player.remove_item("torch", 2).unwrap();
        assert_eq!(player.item_count("torch"), 1);
        player.remove_item("torch", 1).unwrap();
        assert_eq!(player.item_count("torch"), 0);
        assert!(player.remove_item("torch", 1).is_err());
    }

    #[test]
    fn test_remove_more_than_held_fails() {
        let mut player = PlayerState::default();
        player.add_item("potion", 1);
        assert!(player.remove_item("potion", 2).is_err());
        assert_eq!(player.item_count("potion"), 1);
    }

    #[test]
    fn test_status_effects_dedupe() {
        let mut player = PlayerState::default();
        player.add_status("blessed");
        player.add_status("blessed");
        assert_eq!(player.status_effects.len(), 1);
        player.remove_status("blessed");
        assert!(player.status_effects.is_empty());
    }

    #[test]
    fn test_validate_bounds() {
        let mut player = PlayerState::default();
        assert!(player.validate().is_ok());
        player.hp = player.max_hp + 1;
        assert!(player.validate().is_err());
        player.hp = -1;
        assert!(player.validate().is_err());
    }
}
