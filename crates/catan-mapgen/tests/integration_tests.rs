//! Integration tests for the map generator.
//!
//! These tests drive complete sessions: generation, the surprise-mode
//! placement round, and share tokens.

mod common;

use catan_mapgen::*;
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn surprise_session(count: PlayerCount, seed: u64) -> GameSession {
    let settings = GenerationSettings::new(count, true, true, Some(Resource::Ore));
    let mut session =
        GameSession::new_with_rng(settings, SolverConfig::default(), &mut StdRng::seed_from_u64(seed)).unwrap();
    session.set_surprise_mode(true);
    session
}

/// Advance a raw placement state by one full turn
fn place_turn(state: &mut PlacementState, players: &[Player], vertex: VertexCoord, edge: EdgeCoord) {
    state.attempt_settlement(players, vertex).unwrap();
    state.attempt_road(players, edge).unwrap();
    state.confirm_and_advance().unwrap();
}

#[test]
fn test_surprise_round_reveals_on_last_confirm() {
    common::init_tracing();

    for (count, seed) in [(PlayerCount::Four, 1), (PlayerCount::Five, 2), (PlayerCount::Six, 3)] {
        let mut session = surprise_session(count, seed);
        assert!(session.visible_board().is_none());

        let events = common::play_full_round(&mut session);

        assert_eq!(events.last(), Some(&PlacementEvent::BoardRevealed));
        assert!(session.visible_board().is_some());
        assert!(session.placement().is_round_complete());
        assert_eq!(session.placement().houses().len(), count.get() * 2);
        assert_eq!(session.placement().roads().len(), count.get() * 2);
        assert_eq!(session.current_player(), None);

        // Every seat placed exactly twice, in snake order
        let seats: Vec<PlayerId> = events
            .iter()
            .filter_map(|e| match e {
                PlacementEvent::SettlementPlaced { player, .. } => Some(*player),
                _ => None,
            })
            .collect();
        assert_eq!(seats, turn_order(count));
    }
}

#[test]
fn test_turn_order_tables() {
    assert_eq!(turn_order(PlayerCount::Four), vec![0, 1, 2, 3, 3, 2, 1, 0]);
    assert_eq!(turn_order(PlayerCount::Five), vec![0, 1, 2, 3, 4, 4, 3, 2, 1, 0]);
    assert_eq!(turn_order(PlayerCount::Six), vec![0, 1, 2, 3, 4, 5, 5, 4, 3, 2, 1, 0]);
}

#[test]
fn test_distance_rule_over_every_corner() {
    let session = surprise_session(PlayerCount::Four, 4);
    let board = session.board();
    let players = session.players();

    let first = board.vertices()[20];
    let mut state = PlacementState::new(PlayerCount::Four);
    let edge = *board
        .edges()
        .iter()
        .find(|e| e.touches(&first, 0.1))
        .unwrap();
    place_turn(&mut state, players, first, edge);

    for vertex in board.vertices() {
        let mut attempt = state.clone();
        let result = attempt.attempt_settlement(players, vertex);
        if vertex.distance_to(&first) < MIN_SETTLEMENT_DISTANCE {
            assert_eq!(result, Err(PlacementError::TooCloseToSettlement(first)), "{vertex}");
            assert_eq!(attempt.houses(), state.houses());
        } else {
            assert!(result.is_ok(), "{vertex}: {result:?}");
            assert_eq!(attempt.houses().len(), 2);
        }
    }
}

#[test]
fn test_settlement_half_the_minimum_distance_away_is_rejected() {
    let roster = Roster::new(PlayerCount::Four);
    let players = roster.players();
    let mut state = PlacementState::new(PlayerCount::Four);

    let v1 = VertexCoord::of_hex(Point::new(0.0, 0.0), 0);
    place_turn(&mut state, players, v1, EdgeCoord::of_hex(Point::new(0.0, 0.0), 0));

    let p = v1.to_point();
    let v2 = VertexCoord::from_point(Point::new(p.x + MIN_SETTLEMENT_DISTANCE * 0.5, p.y));
    let before = state.clone();
    assert_eq!(
        state.attempt_settlement(players, v2),
        Err(PlacementError::TooCloseToSettlement(v1))
    );
    assert_eq!(state, before);
}

#[test]
fn test_road_adjacency_over_every_edge() {
    let session = surprise_session(PlayerCount::Six, 5);
    let board = session.board();
    let players = session.players();

    let settlement = board.vertices()[33];
    let mut state = PlacementState::new(PlayerCount::Six);
    state.attempt_settlement(players, settlement).unwrap();

    let mut connected = 0;
    for edge in board.edges() {
        let mut attempt = state.clone();
        let result = attempt.attempt_road(players, edge);
        if edge.touches(&settlement, 0.1) {
            assert!(result.is_ok(), "{edge}: {result:?}");
            assert_eq!(attempt.phase(), PlacementPhase::Done);
            connected += 1;
        } else {
            assert_eq!(result, Err(PlacementError::NotConnectedToSettlement), "{edge}");
            assert!(attempt.roads().is_empty());
        }
    }
    assert!((2..=3).contains(&connected), "{connected} sides at a corner");
}

#[test]
fn test_undo_restores_the_turn() {
    let mut session = surprise_session(PlayerCount::Four, 6);
    common::play_full_round(&mut session);
    session.reset_placement_state();
    let fresh = session.placement().clone();

    let vertex = session.valid_settlement_spots()[7];
    session.apply_action(PlacementAction::PlaceSettlement(vertex)).unwrap();
    let edge = session.valid_road_spots()[0];
    session.apply_action(PlacementAction::PlaceRoad(edge)).unwrap();

    let event = session.apply_action(PlacementAction::Undo).unwrap();
    assert!(matches!(event, PlacementEvent::RoadRemoved { player: 0, .. }));
    assert_eq!(session.placement().phase(), PlacementPhase::Road);
    assert!(session.placement().roads().is_empty());
    assert_eq!(session.placement().houses().len(), 1);

    let event = session.apply_action(PlacementAction::Undo).unwrap();
    assert!(matches!(event, PlacementEvent::SettlementRemoved { player: 0, .. }));
    assert_eq!(session.placement(), &fresh);

    assert_eq!(
        session.apply_action(PlacementAction::Undo),
        Err(SessionError::Placement(PlacementError::NothingToUndo))
    );
}

#[test]
fn test_starting_resources_come_from_second_settlement() {
    let mut session = surprise_session(PlayerCount::Four, 7);
    assert!(session.resources_for_all_players().iter().all(Vec::is_empty));

    // Seat 0 places once: its first settlement counts until the second exists
    let first = session.valid_settlement_spots()[0];
    session.apply_action(PlacementAction::PlaceSettlement(first)).unwrap();
    assert_eq!(session.resources_for_player(0), session.board().resources_touching(&first));

    common::play_full_round(&mut session);

    let board = session.board().clone();
    for (seat, resources) in session.resources_for_all_players().into_iter().enumerate() {
        let placements = session.placement().placements_for(seat as PlayerId);
        assert_eq!(placements.len(), 2);
        let second = placements[1].settlement.vertex;
        assert_eq!(resources, board.resources_touching(&second));
        assert!(resources.iter().all(|r| !r.is_desert()));
        assert!(resources.len() <= 3);
    }
}

#[test]
fn test_share_token_round_trip_with_placements() {
    common::init_tracing();
    let mut session = surprise_session(PlayerCount::Five, 8);
    common::play_full_round(&mut session);

    let token = session.to_token();
    let restored = GameSession::from_token(&token).unwrap();

    assert_eq!(restored.settings(), session.settings());
    assert_eq!(restored.board(), session.board());
    assert_eq!(restored.players(), session.players());
    assert_eq!(restored.placement(), session.placement());
    assert_eq!(restored.resources_for_all_players(), session.resources_for_all_players());
    assert_eq!(restored.to_token(), token);
}

#[test]
fn test_decoded_map_matches_session() {
    let mut session = surprise_session(PlayerCount::Four, 9);
    let vertex = session.valid_settlement_spots()[3];
    session.apply_action(PlacementAction::PlaceSettlement(vertex)).unwrap();

    let data = decode_map(&session.to_token()).unwrap();
    assert_eq!(data.settings, *session.settings());
    assert_eq!(data.hexes.len(), 19);
    for (hex, (resource, number)) in session.board().hexes().iter().zip(&data.hexes) {
        assert_eq!((hex.resource, hex.number), (*resource, *number));
    }
    let placements = data.placements.unwrap();
    assert_eq!(placements.houses, session.placement().houses().to_vec());
    assert!(placements.roads.is_empty());
}

#[test]
fn test_token_without_placements_has_two_segments() {
    let session = surprise_session(PlayerCount::Six, 10);
    let data = decode_map(&session.to_token()).unwrap();
    assert_eq!(data.placements, None);
    assert_eq!(data.settings.player_count, PlayerCount::Six);
    assert_eq!(data.settings.scarce_resource, Some(Resource::Ore));
}

#[test]
fn test_malformed_tokens_are_rejected() {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;

    common::init_tracing();
    let token = |raw: &str| STANDARD.encode(raw);

    let cases = [
        (token("400n"), "one segment"),
        (token("400n|w2|;|x"), "four segments"),
        (token("40n|w2"), "short settings"),
        (token("3000|w2"), "player digit"),
        (token("4a0n|w2"), "flag"),
        (token("400q|w2"), "scarce char"),
        (token("400n|w2-b"), "short hex token"),
        (token("400n|w2-q5"), "resource char"),
        (token("400n|w2-b5x"), "number suffix"),
        (token("400n|w2|1,2#ff0000"), "placements without ;"),
        ("not base64 at all!".to_string(), "base64"),
    ];

    for (token, label) in cases {
        assert!(decode_map(&token).is_err(), "{label}");
        assert!(GameSession::from_token(&token).is_err(), "{label}");
    }

    // Well-formed but the wrong number of hexes for the board
    let short = token("400n|w2-d0");
    assert!(decode_map(&short).is_ok());
    assert!(matches!(
        GameSession::from_token(&short),
        Err(SessionError::Board(BoardError::HexCountMismatch { .. }))
    ));
}

#[test]
fn test_recolor_after_placements_keeps_token_consistent() {
    let mut session = surprise_session(PlayerCount::Four, 11);
    common::play_full_round(&mut session);
    let resources = session.resources_for_all_players();

    session.swap_player_colors(0, 3).unwrap();
    session.cycle_player_color(1).unwrap();

    let colors: Vec<PlayerColor> = session.players().iter().map(|p| p.color).collect();
    for (seat, color) in colors.iter().enumerate() {
        for placement in session.placement().placements_for(seat as PlayerId) {
            assert_eq!(placement.settlement.color, *color);
            assert_eq!(placement.road.map(|r| r.color), Some(*color));
        }
    }
    assert_eq!(session.resources_for_all_players(), resources);

    let restored = GameSession::from_token(&session.to_token()).unwrap();
    assert_eq!(restored.placement(), session.placement());
}
