//! Share tokens.
//!
//! A token is standard base64 over
//! `settings|hexes` or `settings|hexes|houses;roads`:
//!
//! - `settings`: four characters, `[player count][no same resources 0/1]
//!   [no same numbers 0/1][scarce w/b/o/h/s or n]`
//! - `hexes`: one `[resource char][number]` token per hex in topology
//!   order, joined with `-`; deserts carry `0`
//! - `houses` / `roads`: placement keys in their text form, joined with `,`
//!
//! Keys contain commas themselves, so a key list is split at the commas
//! that follow a key's `#color` suffix.

use crate::board::{Board, NumberToken, Resource};
use crate::config::{GenerationSettings, PlayerCount};
use crate::placement::{ParseKeyError, RoadKey, SettlementKey};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

const NO_SCARCE_RESOURCE: char = 'n';

/// Why a token was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("expected 2 or 3 segments, found {0}")]
    SegmentCount(usize),

    #[error("settings must be 4 characters, found {0}")]
    SettingsLength(usize),

    #[error("invalid player count {0:?}")]
    PlayerCount(char),

    #[error("invalid flag {0:?}")]
    Flag(char),

    #[error("invalid scarce resource {0:?}")]
    ScarceResource(char),

    #[error("hex token too short: {0:?}")]
    ShortHexToken(String),

    #[error("invalid resource code {0:?}")]
    ResourceCode(char),

    #[error("invalid number in hex token {0:?}")]
    NumberSuffix(String),

    #[error("placements must have exactly 2 parts, found {0}")]
    PlacementParts(usize),

    #[error("invalid placement key: {0}")]
    Key(#[from] ParseKeyError),
}

/// Settlements and roads carried by a token
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SharedPlacements {
    pub houses: Vec<SettlementKey>,
    pub roads: Vec<RoadKey>,
}

/// Everything a token describes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapData {
    pub settings: GenerationSettings,
    /// Per-hex contents in topology order
    pub hexes: Vec<(Resource, Option<NumberToken>)>,
    pub placements: Option<SharedPlacements>,
}

impl MapData {
    /// Snapshot a board; placements are kept only if there are any
    pub fn from_board(
        settings: &GenerationSettings,
        board: &Board,
        houses: &[SettlementKey],
        roads: &[RoadKey],
    ) -> Self {
        let placements = (!houses.is_empty() || !roads.is_empty()).then(|| SharedPlacements {
            houses: houses.to_vec(),
            roads: roads.to_vec(),
        });
        Self {
            settings: settings.normalized(),
            hexes: board.hexes().iter().map(|h| (h.resource, h.number)).collect(),
            placements,
        }
    }

    /// Token text for this snapshot
    pub fn encode(&self) -> String {
        let settings = encode_settings(&self.settings);
        let hexes = self
            .hexes
            .iter()
            .map(|(resource, number)| format!("{}{}", resource.code(), number.unwrap_or(0)))
            .collect::<Vec<_>>()
            .join("-");

        let raw = match &self.placements {
            Some(p) if !p.houses.is_empty() || !p.roads.is_empty() => {
                format!("{settings}|{hexes}|{};{}", join_keys(&p.houses), join_keys(&p.roads))
            }
            _ => format!("{settings}|{hexes}"),
        };
        STANDARD.encode(raw)
    }

    /// Parse a token
    pub fn decode(token: &str) -> Result<Self, DecodeError> {
        let raw = String::from_utf8(STANDARD.decode(token.trim())?)?;

        let segments: Vec<&str> = raw.split('|').collect();
        if !(2..=3).contains(&segments.len()) {
            return Err(DecodeError::SegmentCount(segments.len()));
        }

        let settings = decode_settings(segments[0])?;
        let hexes = segments[1]
            .split('-')
            .map(decode_hex)
            .collect::<Result<Vec<_>, _>>()?;
        let placements = segments.get(2).map(|s| decode_placements(s)).transpose()?;

        Ok(Self {
            settings,
            hexes,
            placements,
        })
    }
}

/// Encode a board and its placements as a share token
pub fn encode_map(
    settings: &GenerationSettings,
    board: &Board,
    houses: &[SettlementKey],
    roads: &[RoadKey],
) -> String {
    MapData::from_board(settings, board, houses, roads).encode()
}

/// Decode a share token; failures are logged and returned, never panics
pub fn decode_map(token: &str) -> Result<MapData, DecodeError> {
    match MapData::decode(token) {
        Ok(data) => Ok(data),
        Err(err) => {
            warn!(%err, "Rejected share token");
            Err(err)
        }
    }
}

fn flag_char(flag: bool) -> char {
    if flag {
        '1'
    } else {
        '0'
    }
}

fn encode_settings(settings: &GenerationSettings) -> String {
    let scarce = settings
        .normalized()
        .scarce_resource
        .map_or(NO_SCARCE_RESOURCE, |r| r.code());
    format!(
        "{}{}{}{}",
        settings.player_count,
        flag_char(settings.no_same_resources),
        flag_char(settings.no_same_numbers),
        scarce
    )
}

fn decode_flag(c: char) -> Result<bool, DecodeError> {
    match c {
        '0' => Ok(false),
        '1' => Ok(true),
        other => Err(DecodeError::Flag(other)),
    }
}

fn decode_settings(s: &str) -> Result<GenerationSettings, DecodeError> {
    let chars: Vec<char> = s.chars().collect();
    let [count, resources, numbers, scarce] = chars[..] else {
        return Err(DecodeError::SettingsLength(chars.len()));
    };

    let player_count = count
        .to_digit(10)
        .and_then(|d| PlayerCount::try_from(d as u8).ok())
        .ok_or(DecodeError::PlayerCount(count))?;

    let scarce_resource = match scarce {
        NO_SCARCE_RESOURCE => None,
        c => match Resource::from_code(c) {
            Some(r) if !r.is_desert() => Some(r),
            _ => return Err(DecodeError::ScarceResource(c)),
        },
    };

    Ok(GenerationSettings {
        player_count,
        no_same_resources: decode_flag(resources)?,
        no_same_numbers: decode_flag(numbers)?,
        scarce_resource,
    })
}

fn decode_hex(token: &str) -> Result<(Resource, Option<NumberToken>), DecodeError> {
    let mut chars = token.chars();
    let code = match chars.next() {
        Some(c) if token.chars().count() >= 2 => c,
        _ => return Err(DecodeError::ShortHexToken(token.to_string())),
    };
    let resource = Resource::from_code(code).ok_or(DecodeError::ResourceCode(code))?;

    let suffix = chars.as_str();
    if !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DecodeError::NumberSuffix(token.to_string()));
    }
    let number: NumberToken = suffix
        .parse()
        .map_err(|_| DecodeError::NumberSuffix(token.to_string()))?;

    Ok((resource, (number != 0).then_some(number)))
}

fn join_keys<K: ToString>(keys: &[K]) -> String {
    keys.iter().map(ToString::to_string).collect::<Vec<_>>().join(",")
}

/// Split a joined key list at the commas that end a key
fn split_keys(list: &str) -> Vec<&str> {
    let mut keys = Vec::new();
    let mut start = 0;
    let mut seen_color = false;
    for (i, c) in list.char_indices() {
        match c {
            '#' => seen_color = true,
            ',' if seen_color => {
                keys.push(&list[start..i]);
                start = i + 1;
                seen_color = false;
            }
            _ => {}
        }
    }
    if start < list.len() || !keys.is_empty() {
        keys.push(&list[start..]);
    }
    keys
}

fn decode_placements(segment: &str) -> Result<SharedPlacements, DecodeError> {
    let parts: Vec<&str> = segment.split(';').collect();
    let [houses, roads] = parts[..] else {
        return Err(DecodeError::PlacementParts(parts.len()));
    };

    Ok(SharedPlacements {
        houses: split_keys(houses)
            .into_iter()
            .map(str::parse::<SettlementKey>)
            .collect::<Result<_, _>>()?,
        roads: split_keys(roads)
            .into_iter()
            .map(str::parse::<RoadKey>)
            .collect::<Result<_, _>>()?,
    })
}
