//! Players known to the session, keyed by connection id.
//!
//! A connection becomes a player on its first join or card submission and
//! stops being one when it disconnects. Players are kept in join order so the
//! name list shown to clients does not shuffle between updates.

use crate::error::GameError;
use log::info;
use shared::{Card, MIN_NAME_LEN};

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: u32,
    pub name: String,
    pub card: Option<Card>,
    /// Set once the player's first join has been acknowledged
    pub acknowledged: bool,
}

/// Result of a registry write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// Confirmed display name after the update
    pub name: String,
    /// True when the names snapshot changed (new player or rename)
    pub names_changed: bool,
}

#[derive(Debug, Default)]
pub struct PlayerRegistry {
    players: Vec<Player>,
}

/// Trims a requested display name and checks its length.
pub fn normalize_name(name: &str) -> Result<String, GameError> {
    let trimmed = name.trim();
    if trimmed.chars().count() < MIN_NAME_LEN {
        return Err(GameError::NameTooShort);
    }
    Ok(trimmed.to_string())
}

/// Name used for a player who never picked one.
pub fn anonymous_name(id: u32) -> String {
    format!("Player-{}", id)
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates or partially updates the player for `id`.
    ///
    /// Only the fields that are present overwrite existing ones. Inputs are
    /// checked before anything is written, so a rejected update leaves the
    /// registry untouched.
    pub fn set_or_update(
        &mut self,
        id: u32,
        name: Option<&str>,
        card: Option<Card>,
    ) -> Result<Registration, GameError> {
        let name = name.map(normalize_name).transpose()?;
        if let Some(card) = &card {
            card.validate()?;
        }

        if let Some(player) = self.players.iter_mut().find(|p| p.id == id) {
            let mut names_changed = false;
            if let Some(name) = name {
                if player.name != name {
                    info!("Player {} renamed from {} to {}", id, player.name, name);
                    player.name = name;
                    names_changed = true;
                }
            }
            if card.is_some() {
                player.card = card;
            }
            return Ok(Registration {
                name: player.name.clone(),
                names_changed,
            });
        }

        let name = name.unwrap_or_else(|| anonymous_name(id));
        info!("Player {} joined as {}", id, name);
        self.players.push(Player {
            id,
            name: name.clone(),
            card,
            acknowledged: false,
        });

        Ok(Registration {
            name,
            names_changed: true,
        })
    }

    pub fn remove(&mut self, id: u32) -> Option<Player> {
        let index = self.players.iter().position(|p| p.id == id)?;
        let player = self.players.remove(index);
        info!("Player {} ({}) left", id, player.name);
        Some(player)
    }

    /// Marks the player's join as acknowledged. True only the first time.
    pub fn acknowledge(&mut self, id: u32) -> bool {
        match self.players.iter_mut().find(|p| p.id == id) {
            Some(player) if !player.acknowledged => {
                player.acknowledged = true;
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, id: u32) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn card_of(&self, id: u32) -> Option<&Card> {
        self.get(id).and_then(|p| p.card.as_ref())
    }

    pub fn name_of(&self, id: u32) -> Option<&str> {
        self.get(id).map(|p| p.name.as_str())
    }

    /// Display names in join order.
    pub fn names_snapshot(&self) -> Vec<String> {
        self.players.iter().map(|p| p.name.clone()).collect()
    }

    /// Drops every submitted card; names are kept.
    pub fn clear_cards(&mut self) {
        for player in &mut self.players {
            player.card = None;
        }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
