//! Surprise-mode placement round.
//!
//! Each player places one settlement and one connected road, twice, in
//! snake order (`0, 1, .. N-1, N-1, .. 1, 0`). Within a turn the phase runs
//! settlement -> road -> done and can be stepped back with undo; confirming
//! hands the turn to the next player and cannot be undone.
//!
//! Every operation either succeeds and returns a [`PlacementEvent`], or
//! returns a [`PlacementError`] and leaves the state untouched.

use crate::actions::{PlacementAction, PlacementEvent};
use crate::board::{Board, Resource};
use crate::config::PlayerCount;
use crate::hex::{EdgeCoord, ParseCoordError, VertexCoord, MIN_SETTLEMENT_DISTANCE, ROAD_ENDPOINT_TOLERANCE};
use crate::player::{ColorChange, Player, PlayerColor, PlayerId, UnknownColor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Snake order for a player count: every seat places twice
pub fn turn_order(count: PlayerCount) -> Vec<PlayerId> {
    let n = count.get() as PlayerId;
    (0..n).chain((0..n).rev()).collect()
}

/// Where the current player is within their turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementPhase {
    Settlement,
    Road,
    Done,
}

/// Errors that can occur when applying placement actions
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum PlacementError {
    #[error("Placement round is complete")]
    RoundComplete,

    #[error("Not allowed during the {0:?} phase")]
    WrongPhase(PlacementPhase),

    #[error("Too close to the settlement at {0}")]
    TooCloseToSettlement(VertexCoord),

    #[error("Road must touch the settlement placed this turn")]
    NotConnectedToSettlement,

    #[error("There is already a road on {0}")]
    EdgeOccupied(EdgeCoord),

    #[error("Not a spot on this board")]
    OffBoard,

    #[error("Nothing to undo this turn")]
    NothingToUndo,

    #[error("No player in seat {0}")]
    UnknownPlayer(PlayerId),

    #[error("No player holds color {0}")]
    NoPlayerWithColor(PlayerColor),
}

/// Error returned when a placement key cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseKeyError {
    #[error("missing color suffix in {0:?}")]
    MissingColor(String),

    #[error(transparent)]
    Coord(#[from] ParseCoordError),

    #[error(transparent)]
    Color(#[from] UnknownColor),
}

fn split_color(s: &str) -> Result<(&str, PlayerColor), ParseKeyError> {
    let at = s.find('#').ok_or_else(|| ParseKeyError::MissingColor(s.to_string()))?;
    Ok((&s[..at], s[at..].parse()?))
}

/// A settlement: the corner it stands on and its owner's color.
///
/// Text form is `"{x},{y}{color}"`, e.g. `-2,-4.633#ff0000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SettlementKey {
    pub vertex: VertexCoord,
    pub color: PlayerColor,
}

impl fmt::Display for SettlementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.vertex, self.color)
    }
}

impl FromStr for SettlementKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (coord, color) = split_color(s)?;
        Ok(Self {
            vertex: coord.parse()?,
            color,
        })
    }
}

/// A road: the side it runs along and its owner's color.
///
/// Text form is `"{x1},{y1}-{x2},{y2}{color}"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoadKey {
    pub edge: EdgeCoord,
    pub color: PlayerColor,
}

impl fmt::Display for RoadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.edge, self.color)
    }
}

impl FromStr for RoadKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (coord, color) = split_color(s)?;
        Ok(Self {
            edge: coord.parse()?,
            color,
        })
    }
}

/// One settlement and, once placed, its road
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub settlement: SettlementKey,
    pub road: Option<RoadKey>,
}

/// State of the placement round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementState {
    order: Vec<PlayerId>,
    /// Turns confirmed so far
    turn_index: usize,
    phase: PlacementPhase,
    houses: Vec<SettlementKey>,
    roads: Vec<RoadKey>,
    placements: BTreeMap<PlayerId, Vec<Placement>>,
    revealed: bool,
}

impl PlacementState {
    /// Fresh round with the board hidden
    pub fn new(count: PlayerCount) -> Self {
        Self {
            order: turn_order(count),
            turn_index: 0,
            phase: PlacementPhase::Settlement,
            houses: Vec::new(),
            roads: Vec::new(),
            placements: BTreeMap::new(),
            revealed: false,
        }
    }

    /// Rebuild a round from recorded keys.
    ///
    /// Settlements are attributed to seats by color, in list order. Each
    /// road fills the first road-less settlement of the same color that it
    /// touches. Every recorded settlement counts as one finished turn.
    pub fn restore(
        count: PlayerCount,
        players: &[Player],
        houses: Vec<SettlementKey>,
        roads: Vec<RoadKey>,
    ) -> Result<Self, PlacementError> {
        let seat_of = |color: PlayerColor| {
            players
                .iter()
                .position(|p| p.color == color)
                .map(|i| i as PlayerId)
                .ok_or(PlacementError::NoPlayerWithColor(color))
        };

        let mut state = Self::new(count);
        for house in &houses {
            let seat = seat_of(house.color)?;
            state.placements.entry(seat).or_default().push(Placement {
                settlement: *house,
                road: None,
            });
        }
        for road in &roads {
            let seat = seat_of(road.color)?;
            let open = state.placements.get_mut(&seat).and_then(|list| {
                list.iter_mut().find(|p| {
                    p.road.is_none() && road.edge.touches(&p.settlement.vertex, ROAD_ENDPOINT_TOLERANCE)
                })
            });
            if let Some(placement) = open {
                placement.road = Some(*road);
            }
        }

        state.turn_index = houses.len().min(state.order.len());
        state.houses = houses;
        state.roads = roads;
        state.revealed = state.is_round_complete();
        Ok(state)
    }

    // ==================== Query Methods ====================

    pub fn turn_order(&self) -> &[PlayerId] {
        &self.order
    }

    pub fn turn_index(&self) -> usize {
        self.turn_index
    }

    pub fn phase(&self) -> PlacementPhase {
        self.phase
    }

    pub fn houses(&self) -> &[SettlementKey] {
        &self.houses
    }

    pub fn roads(&self) -> &[RoadKey] {
        &self.roads
    }

    pub fn placements(&self) -> &BTreeMap<PlayerId, Vec<Placement>> {
        &self.placements
    }

    pub fn placements_for(&self, player: PlayerId) -> &[Placement] {
        self.placements.get(&player).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn is_round_complete(&self) -> bool {
        self.turn_index >= self.order.len()
    }

    /// Whether the current turn is the final one (confirming it reveals the board)
    pub fn is_last_turn(&self) -> bool {
        self.turn_index + 1 == self.order.len()
    }

    /// Seat whose turn it is, `None` once the round is complete
    pub fn current_player_id(&self) -> Option<PlayerId> {
        self.order.get(self.turn_index).copied()
    }

    pub fn current_player<'a>(&self, players: &'a [Player]) -> Option<&'a Player> {
        self.current_player_id()
            .and_then(|id| players.get(id as usize))
    }

    /// The settlement placed during the current turn, if any
    pub fn pending_settlement(&self) -> Option<&SettlementKey> {
        if self.phase == PlacementPhase::Settlement {
            return None;
        }
        let id = self.current_player_id()?;
        self.placements_for(id).last().map(|p| &p.settlement)
    }

    /// Settlement closer than the distance rule allows, if any
    pub fn blocking_settlement(&self, vertex: &VertexCoord) -> Option<&SettlementKey> {
        self.houses
            .iter()
            .find(|h| h.vertex.distance_to(vertex) < MIN_SETTLEMENT_DISTANCE)
    }

    fn road_on(&self, edge: &EdgeCoord) -> Option<&RoadKey> {
        let mid = edge.midpoint();
        self.roads
            .iter()
            .find(|r| r.edge.midpoint().distance_to(&mid) < ROAD_ENDPOINT_TOLERANCE)
    }

    /// Corners where the current player may settle
    pub fn valid_settlement_spots(&self, board: &Board) -> Vec<VertexCoord> {
        if self.is_round_complete() || self.phase != PlacementPhase::Settlement {
            return Vec::new();
        }
        board
            .vertices()
            .into_iter()
            .filter(|v| self.blocking_settlement(v).is_none())
            .collect()
    }

    /// Sides where the current player may build the road for this turn
    pub fn valid_road_spots(&self, board: &Board) -> Vec<EdgeCoord> {
        let Some(settlement) = self.pending_settlement() else {
            return Vec::new();
        };
        if self.phase != PlacementPhase::Road {
            return Vec::new();
        }
        board
            .edges()
            .into_iter()
            .filter(|e| e.touches(&settlement.vertex, ROAD_ENDPOINT_TOLERANCE))
            .filter(|e| self.road_on(e).is_none())
            .collect()
    }

    /// Producing resources around a player's second settlement, or the
    /// first if only one is placed.
    pub fn resources_for_player(&self, board: &Board, player: PlayerId) -> Vec<Resource> {
        let placements = self.placements_for(player);
        placements
            .get(1)
            .or_else(|| placements.first())
            .map(|p| board.resources_touching(&p.settlement.vertex))
            .unwrap_or_default()
    }

    // ==================== Actions ====================

    /// Apply an action on behalf of whoever's turn it is
    pub fn apply_action(
        &mut self,
        players: &[Player],
        action: PlacementAction,
    ) -> Result<PlacementEvent, PlacementError> {
        let result = match action {
            PlacementAction::PlaceSettlement(vertex) => self.attempt_settlement(players, vertex),
            PlacementAction::PlaceRoad(edge) => self.attempt_road(players, edge),
            PlacementAction::ConfirmTurn => self.confirm_and_advance(),
            PlacementAction::Undo => self.undo(),
            PlacementAction::Reveal => Ok(self.reveal()),
        };

        match &result {
            Ok(event) => debug!(?event, turn = self.turn_index, "Placement accepted"),
            Err(err) => debug!(?action, %err, "Placement rejected"),
        }
        result
    }

    fn current_seat(&self, players: &[Player]) -> Result<(PlayerId, PlayerColor), PlacementError> {
        let id = self.current_player_id().ok_or(PlacementError::RoundComplete)?;
        let player = players
            .get(id as usize)
            .ok_or(PlacementError::UnknownPlayer(id))?;
        Ok((id, player.color))
    }

    fn expect_phase(&self, phase: PlacementPhase) -> Result<(), PlacementError> {
        if self.phase != phase {
            return Err(PlacementError::WrongPhase(self.phase));
        }
        Ok(())
    }

    /// Place the current player's settlement
    pub fn attempt_settlement(
        &mut self,
        players: &[Player],
        vertex: VertexCoord,
    ) -> Result<PlacementEvent, PlacementError> {
        let (player, color) = self.current_seat(players)?;
        self.expect_phase(PlacementPhase::Settlement)?;

        if let Some(blocking) = self.blocking_settlement(&vertex) {
            return Err(PlacementError::TooCloseToSettlement(blocking.vertex));
        }

        let key = SettlementKey { vertex, color };
        self.houses.push(key);
        self.placements.entry(player).or_default().push(Placement {
            settlement: key,
            road: None,
        });
        self.phase = PlacementPhase::Road;

        Ok(PlacementEvent::SettlementPlaced { player, key })
    }

    /// Place the road for the settlement placed this turn
    pub fn attempt_road(
        &mut self,
        players: &[Player],
        edge: EdgeCoord,
    ) -> Result<PlacementEvent, PlacementError> {
        let (player, color) = self.current_seat(players)?;
        self.expect_phase(PlacementPhase::Road)?;

        let settlement = *self
            .pending_settlement()
            .ok_or(PlacementError::WrongPhase(self.phase))?;
        if !edge.touches(&settlement.vertex, ROAD_ENDPOINT_TOLERANCE) {
            return Err(PlacementError::NotConnectedToSettlement);
        }
        if let Some(existing) = self.road_on(&edge) {
            return Err(PlacementError::EdgeOccupied(existing.edge));
        }

        let key = RoadKey { edge, color };
        if let Some(placement) = self.placements.get_mut(&player).and_then(|list| list.last_mut()) {
            placement.road = Some(key);
        }
        self.roads.push(key);
        self.phase = PlacementPhase::Done;

        Ok(PlacementEvent::RoadPlaced { player, key })
    }

    /// Finish the current turn. On the last turn this reveals the board.
    pub fn confirm_and_advance(&mut self) -> Result<PlacementEvent, PlacementError> {
        if self.is_round_complete() {
            return Err(PlacementError::RoundComplete);
        }
        self.expect_phase(PlacementPhase::Done)?;

        let last = self.is_last_turn();
        self.turn_index += 1;
        self.phase = PlacementPhase::Settlement;

        if last {
            return Ok(self.reveal());
        }
        Ok(PlacementEvent::TurnAdvanced {
            turn_index: self.turn_index,
            next_player: self.order[self.turn_index],
        })
    }

    /// Step back within the current turn
    pub fn undo(&mut self) -> Result<PlacementEvent, PlacementError> {
        let player = self.current_player_id().ok_or(PlacementError::RoundComplete)?;

        match self.phase {
            PlacementPhase::Settlement => Err(PlacementError::NothingToUndo),
            PlacementPhase::Done => {
                let key = self
                    .placements
                    .get_mut(&player)
                    .and_then(|list| list.last_mut())
                    .and_then(|p| p.road.take())
                    .ok_or(PlacementError::NothingToUndo)?;
                if let Some(pos) = self.roads.iter().rposition(|r| *r == key) {
                    self.roads.remove(pos);
                }
                self.phase = PlacementPhase::Road;
                Ok(PlacementEvent::RoadRemoved { player, key })
            }
            PlacementPhase::Road => {
                let placement = self
                    .placements
                    .get_mut(&player)
                    .and_then(|list| list.pop())
                    .ok_or(PlacementError::NothingToUndo)?;
                if self.placements.get(&player).is_some_and(|list| list.is_empty()) {
                    self.placements.remove(&player);
                }
                let key = placement.settlement;
                if let Some(pos) = self.houses.iter().rposition(|h| *h == key) {
                    self.houses.remove(pos);
                }
                self.phase = PlacementPhase::Settlement;
                Ok(PlacementEvent::SettlementRemoved { player, key })
            }
        }
    }

    /// Show the board. Placement data is unaffected.
    pub fn reveal(&mut self) -> PlacementEvent {
        self.revealed = true;
        PlacementEvent::BoardRevealed
    }

    /// Rewrite every recorded key after color changes.
    ///
    /// Each key is mapped from its color before the call, so pairwise swaps
    /// (`[(a, b), (b, a)]`) cannot collide.
    pub fn recolor(&mut self, changes: &[ColorChange]) {
        if changes.is_empty() {
            return;
        }
        let map = |color: PlayerColor| {
            changes
                .iter()
                .find(|(old, _)| *old == color)
                .map(|&(_, new)| new)
                .unwrap_or(color)
        };

        for house in &mut self.houses {
            house.color = map(house.color);
        }
        for road in &mut self.roads {
            road.color = map(road.color);
        }
        for placement in self.placements.values_mut().flatten() {
            placement.settlement.color = map(placement.settlement.color);
            if let Some(road) = placement.road.as_mut() {
                road.color = map(road.color);
            }
        }
    }
}
