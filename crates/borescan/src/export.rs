//! Export document in the downstream reposition-point schema.
//!
//! Field names, constant codes, corner order, and rounding are a contract
//! with the downstream consumer and must not drift.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::cluster::Hole;

/// Corner point of an exported hole's square.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExportPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// One exported hole record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRecord {
    #[serde(rename = "HoleID")]
    pub hole_id: String,
    #[serde(rename = "Shape")]
    pub shape: u32,
    pub group: u32,
    pub radius: f64,
    pub num_circles: u32,
    pub score: f64,
    pub point1: ExportPoint,
    pub point2: ExportPoint,
    pub point3: ExportPoint,
    pub point4: ExportPoint,
}

/// Top-level export document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportDocument {
    #[serde(rename = "repositionPointDataArray")]
    pub reposition_point_data_array: Vec<ExportRecord>,
}

const SHAPE_CODE: u32 = 2;
const GROUP_CODE: u32 = 0;

/// Corner half-width as a fraction of the hole radius.
const CORNER_OFFSET_FACTOR: f64 = 0.7;

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Build the export document for the selected holes.
///
/// Holes are emitted in ranked order filtered by membership in `selected`;
/// labels are 1-based over the emitted records. Each record carries four
/// corner points of a square of half-width `radius · 0.7` centered on the
/// hole, in the order (+,+), (−,+), (−,−), (+,−).
pub fn build_export(holes: &[Hole], selected: &BTreeSet<u32>) -> ExportDocument {
    let records = holes
        .iter()
        .filter(|h| selected.contains(&h.id))
        .enumerate()
        .map(|(i, h)| {
            let [cx, cy, cz] = h.center;
            let off = h.radius * CORNER_OFFSET_FACTOR;
            let corner = |sx: f64, sy: f64| ExportPoint {
                x: round_to(cx + sx * off, 2),
                y: round_to(cy + sy * off, 2),
                z: round_to(cz, 2),
            };
            ExportRecord {
                hole_id: format!("BS-{}", i + 1),
                shape: SHAPE_CODE,
                group: GROUP_CODE,
                radius: round_to(h.radius, 4),
                num_circles: h.num_circles,
                score: round_to(h.score, 2),
                point1: corner(1.0, 1.0),
                point2: corner(-1.0, 1.0),
                point3: corner(-1.0, -1.0),
                point4: corner(1.0, -1.0),
            }
        })
        .collect();
    ExportDocument {
        reposition_point_data_array: records,
    }
}
