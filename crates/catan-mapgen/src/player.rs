//! Players and their colors.
//!
//! This module contains:
//! - The six-color palette
//! - `Player` (display name and color)
//! - `Roster`, the ordered seat list with color cycling and renaming

use crate::config::PlayerCount;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Player identifier: the seat index in the roster (0-5)
pub type PlayerId = u8;

/// Player color for UI rendering and placement keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerColor {
    Red,
    Blue,
    Green,
    Brown,
    Orange,
    White,
}

impl PlayerColor {
    /// Palette order, also the default seat order
    pub const ALL: [PlayerColor; 6] = [
        PlayerColor::Red,
        PlayerColor::Blue,
        PlayerColor::Green,
        PlayerColor::Brown,
        PlayerColor::Orange,
        PlayerColor::White,
    ];

    /// Default color for a seat
    pub fn for_player(id: PlayerId) -> Self {
        Self::ALL[id as usize % Self::ALL.len()]
    }

    /// CSS hex code, also the suffix of placement keys
    pub fn hex_code(&self) -> &'static str {
        match self {
            PlayerColor::Red => "#ff0000",
            PlayerColor::Blue => "#0000ff",
            PlayerColor::Green => "#008000",
            PlayerColor::Brown => "#a52a2a",
            PlayerColor::Orange => "#ffa500",
            PlayerColor::White => "#ffffff",
        }
    }

    /// Inverse of [`PlayerColor::hex_code`], case-insensitive
    pub fn from_hex(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.hex_code().eq_ignore_ascii_case(code))
    }

    pub fn name(&self) -> &'static str {
        match self {
            PlayerColor::Red => "Red",
            PlayerColor::Blue => "Blue",
            PlayerColor::Green => "Green",
            PlayerColor::Brown => "Brown",
            PlayerColor::Orange => "Orange",
            PlayerColor::White => "White",
        }
    }
}

impl fmt::Display for PlayerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hex_code())
    }
}

/// Returned when a color code is not in the palette
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown player color: {0:?}")]
pub struct UnknownColor(pub String);

impl FromStr for PlayerColor {
    type Err = UnknownColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s).ok_or_else(|| UnknownColor(s.to_string()))
    }
}

/// A seat at the table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub color: PlayerColor,
}

impl Player {
    pub fn new(name: impl Into<String>, color: PlayerColor) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }

    /// "Player N" with the seat's default color
    pub fn default_for(id: PlayerId) -> Self {
        Self::new(format!("Player {}", id as usize + 1), PlayerColor::for_player(id))
    }
}

/// Roster errors
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum RosterError {
    #[error("No player in seat {0}")]
    UnknownPlayer(PlayerId),

    #[error("Color {0} is already taken by seat {1}")]
    ColorInUse(PlayerColor, PlayerId),
}

/// A color change, old color first
pub type ColorChange = (PlayerColor, PlayerColor);

/// Ordered seats; colors are unique across the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    /// Default roster for a player count
    pub fn new(count: PlayerCount) -> Self {
        let mut roster = Self { players: Vec::new() };
        roster.resize(count);
        roster
    }

    /// Default roster whose first seats take `colors` in order.
    ///
    /// Repeated colors are skipped and colors beyond the seat count are
    /// dropped. Remaining seats get their default color or the first free one.
    pub fn with_colors(count: PlayerCount, colors: &[PlayerColor]) -> Self {
        let mut seated: Vec<PlayerColor> = Vec::new();
        for &color in colors {
            if !seated.contains(&color) && seated.len() < count.get() {
                seated.push(color);
            }
        }

        let players = seated
            .iter()
            .enumerate()
            .map(|(i, &color)| Player::new(format!("Player {}", i + 1), color))
            .collect();
        let mut roster = Self { players };
        roster.resize(count);
        roster
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id as usize)
    }

    /// Seat holding a color
    pub fn seat_of(&self, color: PlayerColor) -> Option<PlayerId> {
        self.players
            .iter()
            .position(|p| p.color == color)
            .map(|i| i as PlayerId)
    }

    /// Grow or shrink to `count` seats.
    ///
    /// Existing seats keep their names and colors. New seats get "Player N"
    /// and their default color, or the first free one if it is taken.
    pub fn resize(&mut self, count: PlayerCount) {
        let target = count.get();
        self.players.truncate(target);
        while self.players.len() < target {
            let id = self.players.len() as PlayerId;
            let mut player = Player::default_for(id);
            if self.seat_of(player.color).is_some() {
                if let Some(free) = self.free_colors().first() {
                    player.color = *free;
                }
            }
            self.players.push(player);
        }
    }

    /// Palette colors nobody holds
    pub fn free_colors(&self) -> Vec<PlayerColor> {
        PlayerColor::ALL
            .into_iter()
            .filter(|c| self.seat_of(*c).is_none())
            .collect()
    }

    pub fn rename(&mut self, id: PlayerId, name: impl Into<String>) -> Result<(), RosterError> {
        let player = self
            .players
            .get_mut(id as usize)
            .ok_or(RosterError::UnknownPlayer(id))?;
        player.name = name.into();
        Ok(())
    }

    /// Move a seat to the next palette color nobody else holds.
    ///
    /// Returns the change, or `None` when every other color is taken.
    pub fn cycle_color(&mut self, id: PlayerId) -> Result<Option<ColorChange>, RosterError> {
        let current = self.get(id).ok_or(RosterError::UnknownPlayer(id))?.color;

        // Own color stays in the candidate list so the cycle wraps around it
        let available: Vec<PlayerColor> = PlayerColor::ALL
            .into_iter()
            .filter(|c| *c == current || self.seat_of(*c).is_none())
            .collect();
        let position = available.iter().position(|c| *c == current).unwrap_or(0);
        let next = available[(position + 1) % available.len()];

        if next == current {
            return Ok(None);
        }
        self.players[id as usize].color = next;
        Ok(Some((current, next)))
    }

    /// Give a seat a specific free color
    pub fn set_color(&mut self, id: PlayerId, color: PlayerColor) -> Result<Option<ColorChange>, RosterError> {
        let current = self.get(id).ok_or(RosterError::UnknownPlayer(id))?.color;
        if current == color {
            return Ok(None);
        }
        if let Some(holder) = self.seat_of(color) {
            return Err(RosterError::ColorInUse(color, holder));
        }
        self.players[id as usize].color = color;
        Ok(Some((current, color)))
    }

    /// Exchange the colors of two seats
    pub fn swap_colors(&mut self, a: PlayerId, b: PlayerId) -> Result<Vec<ColorChange>, RosterError> {
        let color_a = self.get(a).ok_or(RosterError::UnknownPlayer(a))?.color;
        let color_b = self.get(b).ok_or(RosterError::UnknownPlayer(b))?.color;
        if a == b {
            return Ok(Vec::new());
        }
        self.players[a as usize].color = color_b;
        self.players[b as usize].color = color_a;
        Ok(vec![(color_a, color_b), (color_b, color_a)])
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::new(PlayerCount::default())
    }
}
