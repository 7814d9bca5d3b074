//! Board contents: resources, number tokens, and the solved board.
//!
//! This module contains:
//! - Resource types and their single-character share codes
//! - Number tokens and their 2d6 probability weights
//! - The tile pools for each player count
//! - `BoardHex` / `Board`, the solver's output, and its queries

use crate::config::PlayerCount;
use crate::hex::{EdgeCoord, Point, VertexCoord, MIN_SETTLEMENT_DISTANCE, ROAD_ENDPOINT_TOLERANCE};
use crate::topology::{BoardSize, HexTopologyEntry, PortPosition};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// A dice sum printed on a hex (2..=12, never 7)
pub type NumberToken = u8;

/// Every value a number token can take
pub const NUMBER_VALUES: [NumberToken; 10] = [2, 3, 4, 5, 6, 8, 9, 10, 11, 12];

/// The 18 tokens of the base game
pub const STANDARD_NUMBERS: [NumberToken; 18] =
    [2, 3, 3, 4, 4, 5, 5, 6, 6, 8, 8, 9, 9, 10, 10, 11, 11, 12];

/// Numbers at or below this weight count as low-probability
pub const LOW_PROBABILITY_WEIGHT: u8 = 2;

/// Resource types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Wood,
    Brick,
    Ore,
    Hay,
    Sheep,
    /// Produces nothing and carries no number
    Desert,
}

impl Resource {
    /// All tile types, desert last
    pub const ALL: [Resource; 6] = [
        Resource::Wood,
        Resource::Brick,
        Resource::Ore,
        Resource::Hay,
        Resource::Sheep,
        Resource::Desert,
    ];

    /// The five producing resources
    pub const PRODUCING: [Resource; 5] = [
        Resource::Wood,
        Resource::Brick,
        Resource::Ore,
        Resource::Hay,
        Resource::Sheep,
    ];

    /// Single-character code used in share tokens
    pub fn code(&self) -> char {
        match self {
            Resource::Wood => 'w',
            Resource::Brick => 'b',
            Resource::Ore => 'o',
            Resource::Hay => 'h',
            Resource::Sheep => 's',
            Resource::Desert => 'd',
        }
    }

    /// Inverse of [`Resource::code`]
    pub fn from_code(code: char) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.code() == code)
    }

    pub fn is_desert(&self) -> bool {
        matches!(self, Resource::Desert)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Resource::Wood => "wood",
            Resource::Brick => "brick",
            Resource::Ore => "ore",
            Resource::Hay => "hay",
            Resource::Sheep => "sheep",
            Resource::Desert => "desert",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How many of the 36 two-dice outcomes roll this number (0 for 7 and
/// anything off the dice).
pub fn probability_weight(number: NumberToken) -> u8 {
    match number {
        6 | 8 => 5,
        5 | 9 => 4,
        4 | 10 => 3,
        3 | 11 => 2,
        2 | 12 => 1,
        _ => 0,
    }
}

/// Whether a value can appear on a number token
pub fn is_valid_number(number: NumberToken) -> bool {
    NUMBER_VALUES.contains(&number)
}

/// The multisets of tiles and tokens the solver draws from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilePool {
    pub resources: Vec<Resource>,
    pub numbers: Vec<NumberToken>,
}

impl TilePool {
    /// Full pool for a player count
    ///
    /// 4 players: 4 wood, 3 brick, 3 ore, 4 hay, 4 sheep, 1 desert and the
    /// 18 standard tokens. 5-6 players: two more of each producing resource,
    /// a second desert and one extra token of every value (28 tokens).
    pub fn for_player_count(count: PlayerCount) -> Self {
        let (counts, numbers): ([usize; 6], Vec<NumberToken>) = match count {
            PlayerCount::Four => ([4, 3, 3, 4, 4, 1], STANDARD_NUMBERS.to_vec()),
            PlayerCount::Five | PlayerCount::Six => {
                let mut numbers = STANDARD_NUMBERS.to_vec();
                numbers.extend_from_slice(&NUMBER_VALUES);
                numbers.sort_unstable();
                ([6, 5, 5, 6, 6, 2], numbers)
            }
        };

        let resources = Resource::ALL
            .iter()
            .zip(counts)
            .flat_map(|(&r, n)| std::iter::repeat(r).take(n))
            .collect();

        Self { resources, numbers }
    }

    /// Uniformly permute both multisets
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.resources.shuffle(rng);
        self.numbers.shuffle(rng);
    }

    pub fn desert_count(&self) -> usize {
        self.resources.iter().filter(|r| r.is_desert()).count()
    }
}

/// One hex of a solved board
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoardHex {
    /// Position in the topology table
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub resource: Resource,
    /// `None` exactly when the hex is a desert
    pub number: Option<NumberToken>,
}

impl BoardHex {
    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Errors raised when assembling a board from explicit contents
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("expected {expected} hexes, got {found}")]
    HexCountMismatch { expected: usize, found: usize },

    #[error("hex {index} is a {resource} without a number")]
    MissingNumber { index: usize, resource: Resource },

    #[error("desert hex {index} carries number {number}")]
    DesertWithNumber { index: usize, number: NumberToken },

    #[error("hex {index} carries invalid number {number}")]
    InvalidNumber { index: usize, number: NumberToken },
}

/// A fully assigned board.
///
/// Boards are values: regenerating produces a new `Board` instead of
/// mutating the old one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    size: BoardSize,
    hexes: Vec<BoardHex>,
}

impl Board {
    /// Build a board from per-hex contents given in topology order
    pub fn from_contents(
        size: BoardSize,
        contents: &[(Resource, Option<NumberToken>)],
    ) -> Result<Self, BoardError> {
        let table = size.hexes();
        if contents.len() != table.len() {
            return Err(BoardError::HexCountMismatch {
                expected: table.len(),
                found: contents.len(),
            });
        }

        let hexes = table
            .iter()
            .zip(contents)
            .enumerate()
            .map(|(index, (entry, &(resource, number)))| {
                match (resource.is_desert(), number) {
                    (true, Some(number)) => Err(BoardError::DesertWithNumber { index, number }),
                    (false, None) => Err(BoardError::MissingNumber { index, resource }),
                    (false, Some(number)) if !is_valid_number(number) => {
                        Err(BoardError::InvalidNumber { index, number })
                    }
                    _ => Ok(BoardHex {
                        index,
                        x: entry.x,
                        y: entry.y,
                        resource,
                        number,
                    }),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { size, hexes })
    }

    // ==================== Query Methods ====================

    pub fn size(&self) -> BoardSize {
        self.size
    }

    pub fn hexes(&self) -> &[BoardHex] {
        &self.hexes
    }

    pub fn hex(&self, index: usize) -> Option<&BoardHex> {
        self.hexes.get(index)
    }

    /// Static layout entry for a hex
    pub fn topology(&self, index: usize) -> Option<&'static HexTopologyEntry> {
        self.size.hexes().get(index)
    }

    /// Hexes sharing a side with `index`
    pub fn neighbors(&self, index: usize) -> impl Iterator<Item = &BoardHex> + '_ {
        self.topology(index)
            .map(|entry| entry.adjacent)
            .unwrap_or(&[])
            .iter()
            .filter_map(move |&j| self.hexes.get(j))
    }

    /// Every unordered pair of neighboring hexes, lower index first
    pub fn adjacent_pairs(&self) -> impl Iterator<Item = (&BoardHex, &BoardHex)> + '_ {
        self.hexes.iter().flat_map(move |hex| {
            self.neighbors(hex.index)
                .filter(move |other| other.index > hex.index)
                .map(move |other| (hex, other))
        })
    }

    /// Decorative harbors for this board size
    pub fn ports(&self) -> &'static [PortPosition] {
        self.size.ports()
    }

    /// Every settlement spot, each corner once
    pub fn vertices(&self) -> Vec<VertexCoord> {
        self.size
            .hexes()
            .iter()
            .flat_map(|entry| {
                entry
                    .vertex_slots
                    .iter()
                    .map(move |&slot| VertexCoord::of_hex(entry.center(), slot))
            })
            .collect()
    }

    /// Every road spot, each side once
    pub fn edges(&self) -> Vec<EdgeCoord> {
        self.size
            .hexes()
            .iter()
            .flat_map(|entry| {
                entry
                    .edge_slots
                    .iter()
                    .map(move |&slot| EdgeCoord::of_hex(entry.center(), slot))
            })
            .collect()
    }

    /// Whether `vertex` is one of this board's corners
    pub fn contains_vertex(&self, vertex: &VertexCoord) -> bool {
        self.vertices()
            .iter()
            .any(|v| v.is_near(vertex, ROAD_ENDPOINT_TOLERANCE))
    }

    /// Whether `edge` is one of this board's sides
    pub fn contains_edge(&self, edge: &EdgeCoord) -> bool {
        let mid = edge.midpoint();
        self.edges()
            .iter()
            .any(|e| e.midpoint().distance_to(&mid) < ROAD_ENDPOINT_TOLERANCE)
    }

    /// Hexes whose center lies within the settlement radius of `vertex`
    pub fn hexes_touching(&self, vertex: &VertexCoord) -> impl Iterator<Item = &BoardHex> + '_ {
        let point = vertex.to_point();
        self.hexes
            .iter()
            .filter(move |hex| hex.center().distance_to(&point) < MIN_SETTLEMENT_DISTANCE)
    }

    /// Producing resources around a corner, in hex order
    pub fn resources_touching(&self, vertex: &VertexCoord) -> Vec<Resource> {
        self.hexes_touching(vertex)
            .map(|hex| hex.resource)
            .filter(|r| !r.is_desert())
            .collect()
    }

    /// Tile count per resource type
    pub fn resource_counts(&self) -> HashMap<Resource, usize> {
        let mut counts = HashMap::new();
        for hex in &self.hexes {
            *counts.entry(hex.resource).or_insert(0) += 1;
        }
        counts
    }

    /// Number tokens on the board, sorted
    pub fn numbers(&self) -> Vec<NumberToken> {
        let mut numbers: Vec<_> = self.hexes.iter().filter_map(|h| h.number).collect();
        numbers.sort_unstable();
        numbers
    }

    /// Whether two neighbors share a resource
    pub fn has_touching_resources(&self) -> bool {
        self.adjacent_pairs().any(|(a, b)| a.resource == b.resource)
    }

    /// Whether two neighbors share a number
    pub fn has_touching_numbers(&self) -> bool {
        self.adjacent_pairs()
            .any(|(a, b)| a.number.is_some() && a.number == b.number)
    }
}
