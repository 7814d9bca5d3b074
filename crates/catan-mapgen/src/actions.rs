//! Placement actions and the events they produce.
//!
//! Actions are always taken on behalf of the player whose turn it is, so
//! they carry no player id.

use crate::hex::{EdgeCoord, VertexCoord};
use crate::placement::{RoadKey, SettlementKey};
use crate::player::PlayerId;
use serde::{Deserialize, Serialize};

/// Everything a player can do during the placement round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementAction {
    /// Put the turn's settlement on a corner
    PlaceSettlement(VertexCoord),
    /// Put the turn's road on a side touching that settlement
    PlaceRoad(EdgeCoord),
    /// Hand over to the next player (reveals the board on the last turn)
    ConfirmTurn,
    /// Take back the last step of this turn
    Undo,
    /// Show the board without touching placements
    Reveal,
}

/// What happened as a result of an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementEvent {
    SettlementPlaced {
        player: PlayerId,
        key: SettlementKey,
    },

    RoadPlaced {
        player: PlayerId,
        key: RoadKey,
    },

    SettlementRemoved {
        player: PlayerId,
        key: SettlementKey,
    },

    RoadRemoved {
        player: PlayerId,
        key: RoadKey,
    },

    /// The turn passed on; `turn_index` counts confirmed turns
    TurnAdvanced {
        turn_index: usize,
        next_player: PlayerId,
    },

    BoardRevealed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::Point;
    use crate::player::PlayerColor;

    #[test]
    fn test_action_json_shape() {
        let action = PlacementAction::PlaceSettlement(VertexCoord::of_hex(Point::new(0.0, 0.0), 0));
        let json = serde_json::to_string(&action).unwrap();
        let back: PlacementAction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, action);

        let json = serde_json::to_string(&PlacementAction::Undo).unwrap();
        assert_eq!(json, "\"Undo\"");
    }

    #[test]
    fn test_event_serializes_with_key() {
        let event = PlacementEvent::SettlementPlaced {
            player: 2,
            key: SettlementKey {
                vertex: VertexCoord::of_hex(Point::new(0.0, 0.0), 3),
                color: PlayerColor::Green,
            },
        };
        let value = serde_json::to_value(event).unwrap();
        assert_eq!(value["SettlementPlaced"]["player"], 2);
        assert_eq!(value["SettlementPlaced"]["key"]["color"], "Green");
    }
}
