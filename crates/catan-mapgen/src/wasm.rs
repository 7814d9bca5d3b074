//! WebAssembly bindings for the board generator.
//!
//! Exposes `GameSession` to JavaScript. Structured results are returned as
//! JSON strings; failures become `JsValue` strings.

use crate::actions::PlacementAction;
use crate::board::Resource;
use crate::config::{GenerationSettings, PlayerCount, SolverConfig};
use crate::hex::{EdgeCoord, Point, VertexCoord};
use crate::session::GameSession;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn to_json<T: Serialize + ?Sized>(value: &T, fallback: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| fallback.to_string())
}

fn js_error(context: &str, err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{context}: {err}"))
}

fn settings_from(
    player_count: u8,
    no_same_resources: bool,
    no_same_numbers: bool,
    scarce: &str,
) -> Result<GenerationSettings, JsValue> {
    let player_count = PlayerCount::try_from(player_count).map_err(|e| js_error("Invalid settings", e))?;
    let scarce_resource = match scarce.chars().next() {
        None | Some('n') => None,
        Some(c) => Some(
            Resource::from_code(c).ok_or_else(|| JsValue::from_str(&format!("Unknown resource: {scarce}")))?,
        ),
    };
    Ok(GenerationSettings::new(
        player_count,
        no_same_resources,
        no_same_numbers,
        scarce_resource,
    ))
}

/// WASM-exposed session wrapper
#[wasm_bindgen]
pub struct WasmSession {
    session: GameSession,
}

#[wasm_bindgen]
impl WasmSession {
    /// Generate a board. `scarce` is a resource code (`w`, `b`, `o`, `h`,
    /// `s`) or empty / `n` for none.
    #[wasm_bindgen(constructor)]
    pub fn new(
        player_count: u8,
        no_same_resources: bool,
        no_same_numbers: bool,
        scarce: &str,
    ) -> Result<WasmSession, JsValue> {
        let settings = settings_from(player_count, no_same_resources, no_same_numbers, scarce)?;
        let mut rng = rand::thread_rng();
        let session = GameSession::new_with_rng(settings, SolverConfig::default(), &mut rng)
            .map_err(|e| js_error("Generation failed", e))?;
        Ok(WasmSession { session })
    }

    /// Restore a session from a share token
    #[wasm_bindgen(js_name = fromToken)]
    pub fn from_token(token: &str) -> Result<WasmSession, JsValue> {
        GameSession::from_token(token)
            .map(|session| WasmSession { session })
            .map_err(|e| js_error("Invalid share token", e))
    }

    #[wasm_bindgen(js_name = toToken)]
    pub fn to_token(&self) -> String {
        self.session.to_token()
    }

    #[wasm_bindgen(js_name = applySettings)]
    pub fn apply_settings(
        &mut self,
        player_count: u8,
        no_same_resources: bool,
        no_same_numbers: bool,
        scarce: &str,
    ) -> Result<(), JsValue> {
        let settings = settings_from(player_count, no_same_resources, no_same_numbers, scarce)?;
        self.session
            .apply_settings(settings)
            .map_err(|e| js_error("Generation failed", e))
    }

    pub fn regenerate(&mut self) -> Result<(), JsValue> {
        self.session
            .regenerate()
            .map_err(|e| js_error("Generation failed", e))
    }

    #[wasm_bindgen(js_name = setSurpriseMode)]
    pub fn set_surprise_mode(&mut self, enabled: bool) {
        self.session.set_surprise_mode(enabled);
    }

    #[wasm_bindgen(js_name = resetPlacementState)]
    pub fn reset_placement_state(&mut self) {
        self.session.reset_placement_state();
    }

    /// Board as JSON, `null` while hidden
    #[wasm_bindgen(js_name = getBoard)]
    pub fn get_board(&self) -> String {
        to_json(&self.session.visible_board(), "null")
    }

    /// Harbor markers as JSON
    #[wasm_bindgen(js_name = getPorts)]
    pub fn get_ports(&self) -> String {
        to_json(self.session.board().ports(), "[]")
    }

    #[wasm_bindgen(js_name = getPlayers)]
    pub fn get_players(&self) -> String {
        to_json(self.session.players(), "[]")
    }

    /// Placement round state as JSON
    #[wasm_bindgen(js_name = getPlacement)]
    pub fn get_placement(&self) -> String {
        to_json(self.session.placement(), "{}")
    }

    #[wasm_bindgen(js_name = getCurrentPlayer)]
    pub fn get_current_player(&self) -> Option<u8> {
        self.session.placement().current_player_id()
    }

    #[wasm_bindgen(js_name = isLastTurn)]
    pub fn is_last_turn(&self) -> bool {
        self.session.is_last_turn()
    }

    /// Every corner on the board as `[{x, y}]`
    #[wasm_bindgen(js_name = getVertices)]
    pub fn get_vertices(&self) -> String {
        let points: Vec<Point> = self.session.board().vertices().iter().map(VertexCoord::to_point).collect();
        to_json(&points, "[]")
    }

    /// Every side on the board as `[[{x, y}, {x, y}]]`
    #[wasm_bindgen(js_name = getEdges)]
    pub fn get_edges(&self) -> String {
        let segments: Vec<[Point; 2]> = self.session.board().edges().iter().map(edge_points).collect();
        to_json(&segments, "[]")
    }

    /// Corners the current player may settle, as `[{x, y}]`
    #[wasm_bindgen(js_name = getValidSettlementSpots)]
    pub fn get_valid_settlement_spots(&self) -> String {
        let points: Vec<Point> = self
            .session
            .valid_settlement_spots()
            .iter()
            .map(VertexCoord::to_point)
            .collect();
        to_json(&points, "[]")
    }

    /// Sides the current player may build on, as `[[{x, y}, {x, y}]]`
    #[wasm_bindgen(js_name = getValidRoadSpots)]
    pub fn get_valid_road_spots(&self) -> String {
        let segments: Vec<[Point; 2]> = self.session.valid_road_spots().iter().map(edge_points).collect();
        to_json(&segments, "[]")
    }

    #[wasm_bindgen(js_name = placeSettlement)]
    pub fn place_settlement(&mut self, x: f64, y: f64) -> Result<String, JsValue> {
        let vertex = VertexCoord::from_point(Point::new(x, y));
        self.apply(PlacementAction::PlaceSettlement(vertex))
    }

    #[wasm_bindgen(js_name = placeRoad)]
    pub fn place_road(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<String, JsValue> {
        let edge = EdgeCoord::new(
            VertexCoord::from_point(Point::new(x1, y1)),
            VertexCoord::from_point(Point::new(x2, y2)),
        );
        self.apply(PlacementAction::PlaceRoad(edge))
    }

    #[wasm_bindgen(js_name = confirmTurn)]
    pub fn confirm_turn(&mut self) -> Result<String, JsValue> {
        self.apply(PlacementAction::ConfirmTurn)
    }

    pub fn undo(&mut self) -> Result<String, JsValue> {
        self.apply(PlacementAction::Undo)
    }

    pub fn reveal(&mut self) -> Result<String, JsValue> {
        self.apply(PlacementAction::Reveal)
    }

    /// Starting resources per seat as JSON
    #[wasm_bindgen(js_name = getStartingResources)]
    pub fn get_starting_resources(&self) -> String {
        to_json(&self.session.resources_for_all_players(), "[]")
    }

    #[wasm_bindgen(js_name = renamePlayer)]
    pub fn rename_player(&mut self, player: u8, name: &str) -> Result<(), JsValue> {
        self.session
            .rename_player(player, name)
            .map_err(|e| js_error("Rename failed", e))
    }

    /// Move a seat to its next free color; returns the new hex code
    #[wasm_bindgen(js_name = cyclePlayerColor)]
    pub fn cycle_player_color(&mut self, player: u8) -> Result<Option<String>, JsValue> {
        self.session
            .cycle_player_color(player)
            .map(|color| color.map(|c| c.hex_code().to_string()))
            .map_err(|e| js_error("Color change failed", e))
    }

    fn apply(&mut self, action: PlacementAction) -> Result<String, JsValue> {
        self.session
            .apply_action(action)
            .map(|event| to_json(&event, "null"))
            .map_err(|e| js_error("Action failed", e))
    }
}

fn edge_points(edge: &EdgeCoord) -> [Point; 2] {
    let [a, b] = edge.endpoints();
    [a.to_point(), b.to_point()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_json_falls_back_on_error() {
        let mut map = std::collections::HashMap::new();
        map.insert((1, 2), "tuple keys are not valid JSON object keys");
        assert_eq!(to_json(&map, "{}"), "{}");
        assert_eq!(to_json(&[1, 2], "[]"), "[1,2]");
    }

    #[test]
    fn test_edge_points() {
        let edge = EdgeCoord::of_hex(Point::new(0.0, 0.0), 1);
        let [a, b] = edge_points(&edge);
        assert_eq!((a.x, a.y), (0.99, -0.5865));
        assert_eq!((b.x, b.y), (0.99, 0.5865));
    }
}
