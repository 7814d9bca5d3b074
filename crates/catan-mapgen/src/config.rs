//! Generation settings and solver tuning.

use crate::board::Resource;
use crate::topology::BoardSize;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Supported table sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PlayerCount {
    #[default]
    Four,
    Five,
    Six,
}

/// Returned when a player count outside 4..=6 is requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unsupported player count: {0} (expected 4, 5 or 6)")]
pub struct InvalidPlayerCount(pub u8);

impl PlayerCount {
    /// All supported counts, smallest first
    pub const ALL: [PlayerCount; 3] = [PlayerCount::Four, PlayerCount::Five, PlayerCount::Six];

    /// Number of players as an integer
    pub fn get(&self) -> usize {
        match self {
            PlayerCount::Four => 4,
            PlayerCount::Five => 5,
            PlayerCount::Six => 6,
        }
    }

    /// The board layout used for this many players
    pub fn board_size(&self) -> BoardSize {
        match self {
            PlayerCount::Four => BoardSize::Standard,
            PlayerCount::Five | PlayerCount::Six => BoardSize::Extended,
        }
    }
}

impl TryFrom<u8> for PlayerCount {
    type Error = InvalidPlayerCount;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            4 => Ok(PlayerCount::Four),
            5 => Ok(PlayerCount::Five),
            6 => Ok(PlayerCount::Six),
            other => Err(InvalidPlayerCount(other)),
        }
    }
}

impl fmt::Display for PlayerCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// What the caller asks the generator for.
///
/// The flags read the way the controls are labelled ("no same resources
/// touch"). The solver works with the opposite sense, which is exposed
/// through [`GenerationSettings::resources_may_touch`] and
/// [`GenerationSettings::numbers_may_touch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GenerationSettings {
    pub player_count: PlayerCount,
    /// Forbid two identical resources on neighboring hexes
    pub no_same_resources: bool,
    /// Forbid two identical numbers on neighboring hexes
    pub no_same_numbers: bool,
    /// Resource to pair with low-probability numbers
    pub scarce_resource: Option<Resource>,
}

impl GenerationSettings {
    pub fn new(
        player_count: PlayerCount,
        no_same_resources: bool,
        no_same_numbers: bool,
        scarce_resource: Option<Resource>,
    ) -> Self {
        Self {
            player_count,
            no_same_resources,
            no_same_numbers,
            scarce_resource,
        }
        .normalized()
    }

    /// Drop a desert scarce resource; desert never carries a number
    pub fn normalized(mut self) -> Self {
        if self.scarce_resource == Some(Resource::Desert) {
            self.scarce_resource = None;
        }
        self
    }

    pub fn resources_may_touch(&self) -> bool {
        !self.no_same_resources
    }

    pub fn numbers_may_touch(&self) -> bool {
        !self.no_same_numbers
    }

    pub fn board_size(&self) -> BoardSize {
        self.player_count.board_size()
    }
}

/// Solver tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Full restarts allowed before the solver gives up
    pub max_attempts: u32,
}

impl SolverConfig {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 10_000;
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
        }
    }
}
