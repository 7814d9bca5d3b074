//! The caller-owned game session.
//!
//! `GameSession` ties together the settings, the solved board, the roster
//! and the placement round. Every change of settings builds a new board and
//! starts the placement round over.

use crate::actions::{PlacementAction, PlacementEvent};
use crate::board::{Board, BoardError, Resource};
use crate::config::{GenerationSettings, SolverConfig};
use crate::encoding::{decode_map, encode_map, DecodeError};
use crate::hex::{EdgeCoord, VertexCoord};
use crate::placement::{PlacementError, PlacementState};
use crate::player::{ColorChange, Player, PlayerColor, PlayerId, Roster, RosterError};
use crate::solver::{solve, SolverError};
use rand::Rng;
use thiserror::Error;
use tracing::{debug, info};

/// Errors surfaced by session operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error(transparent)]
    Placement(#[from] PlacementError),

    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error(transparent)]
    Board(#[from] BoardError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Board, players and placement round for one table
#[derive(Debug, Clone)]
pub struct GameSession {
    settings: GenerationSettings,
    solver: SolverConfig,
    /// Hide the board until the placement round is over
    surprise_mode: bool,
    board: Board,
    roster: Roster,
    placement: PlacementState,
}

impl GameSession {
    /// New session with a freshly generated board
    pub fn new(settings: GenerationSettings) -> Result<Self, SessionError> {
        let mut rng = rand::thread_rng();
        Self::new_with_rng(settings, SolverConfig::default(), &mut rng)
    }

    /// New session using a provided RNG
    pub fn new_with_rng<R: Rng + ?Sized>(
        settings: GenerationSettings,
        solver: SolverConfig,
        rng: &mut R,
    ) -> Result<Self, SessionError> {
        let settings = settings.normalized();
        let board = solve(&settings, &solver, rng)?;
        let mut session = Self {
            settings,
            solver,
            surprise_mode: false,
            board,
            roster: Roster::new(settings.player_count),
            placement: PlacementState::new(settings.player_count),
        };
        session.reset_placement_state();
        Ok(session)
    }

    /// Rebuild a session from a share token.
    ///
    /// Seats are colored in the order the token's settlements first
    /// appear, which is the turn order of the round that produced it.
    pub fn from_token(token: &str) -> Result<Self, SessionError> {
        let data = decode_map(token)?;
        let settings = data.settings.normalized();
        let board = Board::from_contents(settings.board_size(), &data.hexes)?;
        let shared = data.placements.unwrap_or_default();

        let colors: Vec<PlayerColor> = shared
            .houses
            .iter()
            .map(|h| h.color)
            .chain(shared.roads.iter().map(|r| r.color))
            .collect();
        let roster = Roster::with_colors(settings.player_count, &colors);
        let mut placement = PlacementState::restore(
            settings.player_count,
            roster.players(),
            shared.houses,
            shared.roads,
        )?;
        placement.reveal();

        info!(
            players = settings.player_count.get(),
            settlements = placement.houses().len(),
            "Session restored from token"
        );

        Ok(Self {
            settings,
            solver: SolverConfig::default(),
            surprise_mode: false,
            board,
            roster,
            placement,
        })
    }

    // ==================== Query Methods ====================

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    pub fn surprise_mode(&self) -> bool {
        self.surprise_mode
    }

    /// The board, whether or not it is revealed
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The board if players may see it, `None` while hidden
    pub fn visible_board(&self) -> Option<&Board> {
        self.placement.is_revealed().then_some(&self.board)
    }

    pub fn players(&self) -> &[Player] {
        self.roster.players()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn placement(&self) -> &PlacementState {
        &self.placement
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.placement.current_player(self.roster.players())
    }

    pub fn is_last_turn(&self) -> bool {
        self.placement.is_last_turn()
    }

    pub fn valid_settlement_spots(&self) -> Vec<VertexCoord> {
        self.placement.valid_settlement_spots(&self.board)
    }

    pub fn valid_road_spots(&self) -> Vec<EdgeCoord> {
        self.placement.valid_road_spots(&self.board)
    }

    /// Starting resources for one seat
    pub fn resources_for_player(&self, player: PlayerId) -> Vec<Resource> {
        self.placement.resources_for_player(&self.board, player)
    }

    /// Starting resources for every seat, in roster order
    pub fn resources_for_all_players(&self) -> Vec<Vec<Resource>> {
        (0..self.roster.len())
            .map(|id| self.resources_for_player(id as PlayerId))
            .collect()
    }

    /// Share token for the board and current placements
    pub fn to_token(&self) -> String {
        encode_map(
            &self.settings,
            &self.board,
            self.placement.houses(),
            self.placement.roads(),
        )
    }

    // ==================== Board Lifecycle ====================

    /// Replace the board with a new one under the same settings
    pub fn regenerate(&mut self) -> Result<(), SessionError> {
        let mut rng = rand::thread_rng();
        self.regenerate_with_rng(&mut rng)
    }

    pub fn regenerate_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), SessionError> {
        let settings = self.settings;
        self.apply_settings_with_rng(settings, rng)
    }

    /// Switch settings, regenerate and restart placement
    pub fn apply_settings(&mut self, settings: GenerationSettings) -> Result<(), SessionError> {
        let mut rng = rand::thread_rng();
        self.apply_settings_with_rng(settings, &mut rng)
    }

    /// Like [`GameSession::apply_settings`] with a provided RNG.
    ///
    /// The board is solved before anything is touched, so on failure the
    /// session is unchanged.
    pub fn apply_settings_with_rng<R: Rng + ?Sized>(
        &mut self,
        settings: GenerationSettings,
        rng: &mut R,
    ) -> Result<(), SessionError> {
        let settings = settings.normalized();
        let board = solve(&settings, &self.solver, rng)?;

        self.settings = settings;
        self.board = board;
        self.roster.resize(settings.player_count);
        self.reset_placement_state();

        info!(?settings, "Board regenerated");
        Ok(())
    }

    /// Turn surprise mode on or off; restarts placement
    pub fn set_surprise_mode(&mut self, enabled: bool) {
        self.surprise_mode = enabled;
        self.reset_placement_state();
    }

    /// Drop all placements. The board starts hidden only in surprise mode.
    pub fn reset_placement_state(&mut self) {
        self.placement = PlacementState::new(self.settings.player_count);
        if !self.surprise_mode {
            self.placement.reveal();
        }
        debug!(surprise = self.surprise_mode, "Placement state reset");
    }

    // ==================== Placement ====================

    /// Apply a placement action for the current player
    pub fn apply_action(&mut self, action: PlacementAction) -> Result<PlacementEvent, SessionError> {
        let on_board = match action {
            PlacementAction::PlaceSettlement(vertex) => self.board.contains_vertex(&vertex),
            PlacementAction::PlaceRoad(edge) => self.board.contains_edge(&edge),
            _ => true,
        };
        if !on_board {
            debug!(?action, "Placement off the board");
            return Err(PlacementError::OffBoard.into());
        }

        Ok(self.placement.apply_action(self.roster.players(), action)?)
    }

    // ==================== Players ====================

    pub fn rename_player(&mut self, player: PlayerId, name: impl Into<String>) -> Result<(), SessionError> {
        Ok(self.roster.rename(player, name)?)
    }

    /// Advance a seat to the next free color, rewriting its placements
    pub fn cycle_player_color(&mut self, player: PlayerId) -> Result<Option<PlayerColor>, SessionError> {
        let change = self.roster.cycle_color(player)?;
        self.apply_color_changes(change.as_slice());
        Ok(change.map(|(_, new)| new))
    }

    pub fn set_player_color(&mut self, player: PlayerId, color: PlayerColor) -> Result<(), SessionError> {
        let change = self.roster.set_color(player, color)?;
        self.apply_color_changes(change.as_slice());
        Ok(())
    }

    pub fn swap_player_colors(&mut self, a: PlayerId, b: PlayerId) -> Result<(), SessionError> {
        let changes = self.roster.swap_colors(a, b)?;
        self.apply_color_changes(&changes);
        Ok(())
    }

    fn apply_color_changes(&mut self, changes: &[ColorChange]) {
        if !changes.is_empty() {
            debug!(?changes, "Recoloring placements");
            self.placement.recolor(changes);
        }
    }
}
