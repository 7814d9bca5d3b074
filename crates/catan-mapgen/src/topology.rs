//! Static board layouts.
//!
//! Each board size has a fixed table of hexes in processing order. Every
//! entry carries its center, the corner and side slots it is responsible
//! for drawing (so a corner shared by three hexes is instantiated once), and
//! the indices of its neighbors in the same table.

use crate::board::Resource;
use crate::hex::Point;
use serde::{Deserialize, Serialize};

/// Which layout is in play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoardSize {
    /// 19 hexes, base game (4 players)
    Standard,
    /// 30 hexes, extension (5-6 players)
    Extended,
}

impl BoardSize {
    /// The hex table for this size
    pub fn hexes(&self) -> &'static [HexTopologyEntry] {
        match self {
            BoardSize::Standard => &STANDARD_HEXES,
            BoardSize::Extended => &EXTENDED_HEXES,
        }
    }

    /// The decorative harbor table for this size
    pub fn ports(&self) -> &'static [PortPosition] {
        match self {
            BoardSize::Standard => &STANDARD_PORTS,
            BoardSize::Extended => &EXTENDED_PORTS,
        }
    }

    /// Number of hexes on the board
    pub fn hex_count(&self) -> usize {
        self.hexes().len()
    }
}

/// One hex slot in a static layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HexTopologyEntry {
    /// Center of the hex
    pub x: f64,
    pub y: f64,
    /// Corner slots (0..6) this hex instantiates
    pub vertex_slots: &'static [usize],
    /// Side slots (0..6) this hex instantiates
    pub edge_slots: &'static [usize],
    /// Indices of neighboring hexes in the same table
    pub adjacent: &'static [usize],
}

impl HexTopologyEntry {
    /// Center of the hex as a point
    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Harbor types, printed next to the coast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Harbor {
    /// 3:1 trade any resource
    Generic,
    /// 2:1 trade for a specific resource
    Specific(Resource),
}

impl Harbor {
    /// The exchange rate printed on this harbor
    pub fn rate(&self) -> u32 {
        match self {
            Harbor::Generic => 3,
            Harbor::Specific(_) => 2,
        }
    }
}

/// Where a harbor marker is drawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PortPosition {
    pub x: f64,
    pub y: f64,
    pub harbor: Harbor,
    /// Rotation of the marker in degrees
    pub rotation: i16,
}

const fn hex(
    x: f64,
    y: f64,
    vertex_slots: &'static [usize],
    edge_slots: &'static [usize],
    adjacent: &'static [usize],
) -> HexTopologyEntry {
    HexTopologyEntry {
        x,
        y,
        vertex_slots,
        edge_slots,
        adjacent,
    }
}

const fn port(x: f64, y: f64, harbor: Harbor, rotation: i16) -> PortPosition {
    PortPosition {
        x,
        y,
        harbor,
        rotation,
    }
}

static STANDARD_HEXES: [HexTopologyEntry; 19] = [
    // Row 1
    hex(-2.0, -3.46, &[0, 5], &[4, 5, 0], &[1, 3, 4]),
    hex(0.0, -3.46, &[0, 5], &[4, 5, 0], &[0, 2, 4, 5]),
    hex(2.0, -3.46, &[0, 5, 1], &[4, 5, 0, 1], &[1, 5, 6]),
    // Row 2
    hex(-3.0, -1.73, &[0, 5], &[4, 5, 0], &[0, 4, 7, 8]),
    hex(-1.0, -1.73, &[0, 5], &[4, 5, 0], &[0, 1, 3, 5, 8, 9]),
    hex(1.0, -1.73, &[0, 5], &[4, 5, 0], &[1, 2, 4, 6, 9, 10]),
    hex(3.0, -1.73, &[0, 5, 1], &[4, 5, 0, 1], &[2, 5, 10, 11]),
    // Row 3
    hex(-4.0, 0.0, &[0, 5, 4], &[4, 5, 0, 3], &[3, 8, 12]),
    hex(-2.0, 0.0, &[0, 5], &[4, 5, 0], &[3, 4, 7, 9, 12, 13]),
    hex(0.0, 0.0, &[0, 5], &[4, 5, 0], &[4, 5, 8, 10, 13, 14]),
    hex(2.0, 0.0, &[0, 5], &[4, 5, 0], &[5, 6, 9, 11, 14, 15]),
    hex(4.0, 0.0, &[0, 5, 2, 1], &[4, 5, 0, 1, 2], &[6, 10, 15]),
    // Row 4
    hex(-3.0, 1.73, &[0, 5, 4], &[4, 5, 0, 3], &[7, 8, 13, 16]),
    hex(-1.0, 1.73, &[0, 5], &[4, 5, 0], &[8, 9, 12, 14, 16, 17]),
    hex(1.0, 1.73, &[0, 5], &[4, 5, 0], &[9, 10, 13, 15, 17, 18]),
    hex(3.0, 1.73, &[0, 5, 2, 1], &[4, 5, 0, 1, 2], &[10, 11, 14, 18]),
    // Row 5
    hex(-2.0, 3.46, &[0, 5, 3, 2, 4], &[4, 5, 0, 2, 3], &[12, 13, 17]),
    hex(0.0, 3.46, &[0, 5, 3, 2], &[4, 5, 0, 2, 3], &[13, 14, 16, 18]),
    hex(2.0, 3.46, &[0, 5, 1, 3, 2], &[4, 5, 0, 1, 2, 3], &[14, 15, 17]),
];

static EXTENDED_HEXES: [HexTopologyEntry; 30] = [
    // Row 1
    hex(-2.0, -5.19, &[0, 5], &[4, 5, 0], &[1, 3, 4]),
    hex(0.0, -5.19, &[0, 5], &[4, 5, 0], &[0, 2, 4, 5]),
    hex(2.0, -5.19, &[0, 5, 1], &[4, 5, 0, 1], &[1, 5, 6]),
    // Row 2
    hex(-3.0, -3.46, &[0, 5], &[4, 5, 0], &[0, 4, 7, 8]),
    hex(-1.0, -3.46, &[0, 5], &[4, 5, 0], &[0, 1, 3, 5, 8, 9]),
    hex(1.0, -3.46, &[0, 5], &[4, 5, 0], &[1, 2, 4, 6, 9, 10]),
    hex(3.0, -3.46, &[0, 5, 1], &[4, 5, 0, 1], &[2, 5, 10, 11]),
    // Row 3
    hex(-4.0, -1.73, &[0, 5], &[4, 5, 0], &[3, 8, 12, 13]),
    hex(-2.0, -1.73, &[0, 5], &[4, 5, 0], &[3, 4, 7, 9, 13, 14]),
    hex(0.0, -1.73, &[0, 5], &[4, 5, 0], &[4, 5, 8, 10, 14, 15]),
    hex(2.0, -1.73, &[0, 5], &[4, 5, 0], &[5, 6, 9, 11, 15, 16]),
    hex(4.0, -1.73, &[0, 5, 1], &[4, 5, 0, 1], &[6, 10, 16, 17]),
    // Row 4
    hex(-5.0, 0.0, &[0, 4, 5], &[3, 4, 5, 0], &[7, 13, 18]),
    hex(-3.0, 0.0, &[0, 5], &[4, 5, 0], &[7, 8, 12, 14, 18, 19]),
    hex(-1.0, 0.0, &[0, 5], &[4, 5, 0], &[8, 9, 13, 15, 19, 20]),
    hex(1.0, 0.0, &[0, 5], &[4, 5, 0], &[9, 10, 14, 16, 20, 21]),
    hex(3.0, 0.0, &[0, 5], &[4, 5, 0], &[10, 11, 15, 17, 21, 22]),
    hex(5.0, 0.0, &[0, 5, 1, 2], &[4, 5, 0, 1, 2], &[11, 16, 22]),
    // Row 5
    hex(-4.0, 1.73, &[0, 4, 5], &[3, 4, 5, 0], &[12, 13, 19, 23]),
    hex(-2.0, 1.73, &[0, 5], &[4, 5, 0], &[13, 14, 18, 20, 23, 24]),
    hex(0.0, 1.73, &[0, 5], &[4, 5, 0], &[14, 15, 19, 21, 24, 25]),
    hex(2.0, 1.73, &[0, 5], &[4, 5, 0], &[15, 16, 20, 22, 25, 26]),
    hex(4.0, 1.73, &[0, 5, 1, 2], &[1, 2, 4, 5, 0], &[16, 17, 21, 26]),
    // Row 6
    hex(-3.0, 3.46, &[0, 4, 5], &[3, 4, 5, 0], &[18, 19, 24, 27]),
    hex(-1.0, 3.46, &[0, 5], &[4, 5, 0], &[19, 20, 23, 25, 27, 28]),
    hex(1.0, 3.46, &[0, 5], &[4, 5, 0], &[20, 21, 24, 26, 28, 29]),
    hex(3.0, 3.46, &[0, 5, 1, 2], &[1, 2, 4, 5, 0], &[21, 22, 25, 29]),
    // Row 7
    hex(-2.0, 5.19, &[0, 3, 4, 5], &[2, 3, 4, 5, 0], &[23, 24, 28]),
    hex(0.0, 5.19, &[0, 3, 4, 5], &[2, 3, 4, 5, 0], &[24, 25, 27, 29]),
    hex(2.0, 5.19, &[0, 3, 4, 2, 5, 1], &[2, 3, 4, 5, 0, 1], &[25, 26, 28]),
];

static STANDARD_PORTS: [PortPosition; 9] = [
    port(-0.7, -4.7, Harbor::Generic, -30),
    port(2.7, -4.6, Harbor::Generic, 30),
    port(-3.7, -2.9, Harbor::Specific(Resource::Sheep), -30),
    port(4.4, -1.7, Harbor::Specific(Resource::Brick), -30),
    port(-5.4, 0.0, Harbor::Generic, -90),
    port(4.4, 1.7, Harbor::Specific(Resource::Wood), 90),
    port(-3.7, 3.0, Harbor::Specific(Resource::Ore), -30),
    port(-0.7, 4.7, Harbor::Specific(Resource::Hay), -30),
    port(2.7, 4.7, Harbor::Generic, 30),
];

static EXTENDED_PORTS: [PortPosition; 11] = [
    port(-2.7, -6.4, Harbor::Generic, -30),
    port(0.7, -6.4, Harbor::Specific(Resource::Sheep), 30),
    port(3.6, -4.7, Harbor::Generic, 30),
    port(-5.4, -1.7, Harbor::Specific(Resource::Ore), 30),
    port(-5.6, 1.3, Harbor::Generic, -30),
    port(-4.4, 3.4, Harbor::Specific(Resource::Hay), 30),
    port(-2.7, 6.5, Harbor::Generic, -30),
    port(0.7, 6.5, Harbor::Specific(Resource::Wood), 30),
    port(3.4, 5.2, Harbor::Generic, 90),
    port(4.65, 3.05, Harbor::Specific(Resource::Brick), 30),
    port(6.4, 0.0, Harbor::Generic, 90),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::{EdgeCoord, VertexCoord, ROAD_ENDPOINT_TOLERANCE};

    const SIZES: [BoardSize; 2] = [BoardSize::Standard, BoardSize::Extended];

    /// Every corner of every hex, clustered by proximity
    fn distinct_corners(size: BoardSize) -> Vec<VertexCoord> {
        let mut clusters: Vec<VertexCoord> = Vec::new();
        for entry in size.hexes() {
            for slot in 0..6 {
                let v = VertexCoord::of_hex(entry.center(), slot);
                if !clusters.iter().any(|c| c.is_near(&v, ROAD_ENDPOINT_TOLERANCE)) {
                    clusters.push(v);
                }
            }
        }
        clusters
    }

    #[test]
    fn test_hex_counts() {
        assert_eq!(BoardSize::Standard.hex_count(), 19);
        assert_eq!(BoardSize::Extended.hex_count(), 30);
    }

    #[test]
    fn test_adjacency_is_symmetric() {
        for size in SIZES {
            let hexes = size.hexes();
            for (i, entry) in hexes.iter().enumerate() {
                for &j in entry.adjacent {
                    assert!(
                        hexes[j].adjacent.contains(&i),
                        "{size:?}: {i} lists {j} but not the reverse"
                    );
                }
            }
        }
    }

    #[test]
    fn test_adjacency_matches_geometry() {
        for size in SIZES {
            let hexes = size.hexes();
            for (i, entry) in hexes.iter().enumerate() {
                let mut geometric: Vec<usize> = hexes
                    .iter()
                    .enumerate()
                    .filter(|(j, other)| {
                        *j != i && (entry.center().distance_to(&other.center()) - 2.0).abs() < 0.05
                    })
                    .map(|(j, _)| j)
                    .collect();
                let mut listed = entry.adjacent.to_vec();
                geometric.sort_unstable();
                listed.sort_unstable();
                assert_eq!(listed, geometric, "{size:?} hex {i}");
            }
        }
    }

    #[test]
    fn test_owned_corners_cover_board_exactly_once() {
        for size in SIZES {
            let owned: Vec<VertexCoord> = size
                .hexes()
                .iter()
                .flat_map(|e| e.vertex_slots.iter().map(|&s| VertexCoord::of_hex(e.center(), s)))
                .collect();
            for corner in distinct_corners(size) {
                let owners = owned
                    .iter()
                    .filter(|o| o.is_near(&corner, ROAD_ENDPOINT_TOLERANCE))
                    .count();
                assert_eq!(owners, 1, "{size:?} corner {corner}");
            }
        }
    }

    #[test]
    fn test_owned_sides_cover_board_exactly_once() {
        for size in SIZES {
            let mut all: Vec<EdgeCoord> = Vec::new();
            for entry in size.hexes() {
                for slot in 0..6 {
                    let e = EdgeCoord::of_hex(entry.center(), slot);
                    if !all
                        .iter()
                        .any(|a| a.midpoint().distance_to(&e.midpoint()) < ROAD_ENDPOINT_TOLERANCE)
                    {
                        all.push(e);
                    }
                }
            }
            let owned: Vec<EdgeCoord> = size
                .hexes()
                .iter()
                .flat_map(|e| e.edge_slots.iter().map(|&s| EdgeCoord::of_hex(e.center(), s)))
                .collect();
            assert_eq!(owned.len(), all.len(), "{size:?}");
            for side in all {
                let owners = owned
                    .iter()
                    .filter(|o| o.midpoint().distance_to(&side.midpoint()) < ROAD_ENDPOINT_TOLERANCE)
                    .count();
                assert_eq!(owners, 1, "{size:?} side {side}");
            }
        }
    }

    #[test]
    fn test_corner_and_side_totals() {
        assert_eq!(distinct_corners(BoardSize::Standard).len(), 54);
        assert_eq!(distinct_corners(BoardSize::Extended).len(), 80);
    }

    #[test]
    fn test_port_counts() {
        assert_eq!(BoardSize::Standard.ports().len(), 9);
        assert_eq!(BoardSize::Extended.ports().len(), 11);

        for size in SIZES {
            let specific = size
                .ports()
                .iter()
                .filter(|p| matches!(p.harbor, Harbor::Specific(_)))
                .count();
            assert_eq!(specific, 5, "{size:?}");
            assert!(size.ports().iter().all(|p| p.harbor.rate() <= 3));
        }
    }
}
