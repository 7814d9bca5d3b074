//! Catan map generator
//!
//! This crate generates randomized Catan boards under adjacency constraints
//! and runs the "surprise mode" placement round, including:
//! - Fixed board layouts for 4 and 5-6 players
//! - A restart-on-dead-end constraint solver for resources and numbers
//! - A settlement/road placement state machine with undo
//! - Compact share tokens for boards and placements
//!
//! # Architecture
//!
//! The caller owns a [`GameSession`]; the solver and the placement state
//! machine are plain functions and methods over its parts. There is no
//! global state and nothing runs in the background. The crate can be
//! compiled natively or to WebAssembly (`wasm` feature).
//!
//! # Modules
//!
//! - [`hex`]: Board geometry and corner/side coordinates
//! - [`topology`]: Static hex tables and harbor positions
//! - [`board`]: Resources, number tokens, pools and the solved board
//! - [`solver`]: Board generation
//! - [`player`]: Players and the color palette
//! - [`placement`]: The placement round
//! - [`session`]: The session aggregate
//! - [`encoding`]: Share tokens

pub mod actions;
pub mod board;
pub mod config;
pub mod encoding;
pub mod hex;
pub mod placement;
pub mod player;
pub mod session;
pub mod solver;
pub mod topology;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use actions::{PlacementAction, PlacementEvent};
pub use board::{probability_weight, Board, BoardError, BoardHex, NumberToken, Resource, TilePool};
pub use config::{GenerationSettings, PlayerCount, SolverConfig};
pub use encoding::{decode_map, encode_map, DecodeError, MapData, SharedPlacements};
pub use hex::{EdgeCoord, Point, VertexCoord, MIN_SETTLEMENT_DISTANCE};
pub use placement::{turn_order, Placement, PlacementError, PlacementPhase, PlacementState, RoadKey, SettlementKey};
pub use player::{Player, PlayerColor, PlayerId, Roster, RosterError};
pub use session::{GameSession, SessionError};
pub use solver::{generate_board, solve, SolverError};
pub use topology::{BoardSize, Harbor, HexTopologyEntry, PortPosition};
