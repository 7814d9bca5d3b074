//! Shared helpers for the integration tests.

use catan_mapgen::*;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Route library logs to the test output. Set RUST_LOG to see them.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(fmt::layer().with_test_writer())
        .try_init();
}

/// Play out the rest of the placement round, always taking the first valid
/// spot. Picks up mid-turn if a settlement or road is already down.
#[allow(dead_code)]
pub fn play_full_round(session: &mut GameSession) -> Vec<PlacementEvent> {
    let mut events = Vec::new();

    while !session.placement().is_round_complete() {
        let turn = session.placement().turn_index();
        let action = match session.placement().phase() {
            PlacementPhase::Settlement => {
                let vertex = *session
                    .valid_settlement_spots()
                    .first()
                    .unwrap_or_else(|| panic!("no settlement spot on turn {turn}"));
                PlacementAction::PlaceSettlement(vertex)
            }
            PlacementPhase::Road => {
                let edge = *session
                    .valid_road_spots()
                    .first()
                    .unwrap_or_else(|| panic!("no road spot on turn {turn}"));
                PlacementAction::PlaceRoad(edge)
            }
            PlacementPhase::Done => PlacementAction::ConfirmTurn,
        };
        events.push(session.apply_action(action).unwrap());
    }

    events
}
