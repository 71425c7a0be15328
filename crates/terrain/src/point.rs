//! Terrain polyline data model.

use serde::{Deserialize, Serialize};

/// One vertex of the terrain polyline.
///
/// `is_pad` is a property of the *segment starting at this point* (the
/// segment to its right), not of the point itself. The wire name is `isPad`
/// to match the persisted terrain file format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainPoint {
    pub x: f32,
    pub y: f32,
    #[serde(rename = "isPad")]
    pub is_pad: bool,
}

/// One segment of the terrain, derived from a consecutive point pair.
/// Immutable once generated; physics colliders are built from these and
/// discarded on regeneration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainSegment {
    pub a: (f32, f32),
    pub b: (f32, f32),
    /// Whether this segment is a landing pad (flat, eligible for touchdown).
    pub is_pad: bool,
}

impl TerrainSegment {
    /// Left x-extent of the segment.
    pub fn min_x(&self) -> f32 {
        self.a.0.min(self.b.0)
    }

    /// Right x-extent of the segment.
    pub fn max_x(&self) -> f32 {
        self.a.0.max(self.b.0)
    }
}

/// Generated terrain for one level: an ordered polyline spanning the whole
/// play field. Serializes as a bare JSON array of points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Terrain {
    points: Vec<TerrainPoint>,
}

impl Terrain {
    pub fn new(points: Vec<TerrainPoint>) -> Self {
        Self { points }
    }

    /// The raw point sequence (for rendering and persistence).
    pub fn points(&self) -> &[TerrainPoint] {
        &self.points
    }

    /// Iterate the derived segments, one per consecutive point pair.
    pub fn segments(&self) -> impl Iterator<Item = TerrainSegment> + '_ {
        self.points.windows(2).map(|w| TerrainSegment {
            a: (w[0].x, w[0].y),
            b: (w[1].x, w[1].y),
            is_pad: w[0].is_pad,
        })
    }

    /// Number of pad segments in the terrain.
    pub fn pad_count(&self) -> usize {
        self.segments().filter(|s| s.is_pad).count()
    }

    /// Structural invariants every generated terrain satisfies: non-empty,
    /// strictly increasing in x, and flat pad segments.
    pub fn is_well_formed(&self) -> bool {
        if self.points.is_empty() {
            return false;
        }
        for w in self.points.windows(2) {
            if w[1].x <= w[0].x {
                return false;
            }
            if w[0].is_pad && w[0].y != w[1].y {
                return false;
            }
        }
        true
    }
}
