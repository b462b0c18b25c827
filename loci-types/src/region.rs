use crate::point::Poi;
use geo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Per-result attributes recorded when a region is accepted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RegionMetadata {
    /// Points that the accepted block covered, in block order.
    pub covered_points: Vec<Poi>,
    /// Milliseconds elapsed between the start of the search and acceptance.
    pub elapsed_millis: u64,
}

/// A ranked catchment area: a fixed `eps x eps` square centred on the
/// envelope centre of the accepted block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchmentArea {
    pub id: String,
    pub centroid: Point<f64>,
    pub envelope: Rect<f64>,
    pub score: f64,
    pub metadata: RegionMetadata,
}

impl CatchmentArea {
    pub fn new(
        id: impl Into<String>,
        centroid: Point<f64>,
        envelope: Rect<f64>,
        score: f64,
        metadata: RegionMetadata,
    ) -> Self {
        Self {
            id: id.into(),
            centroid,
            envelope,
            score,
            metadata,
        }
    }

    pub fn covered_points(&self) -> &[Poi] {
        &self.metadata.covered_points
    }

    pub fn elapsed_millis(&self) -> u64 {
        self.metadata.elapsed_millis
    }

    /// Number of covered points.
    pub fn len(&self) -> usize {
        self.metadata.covered_points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metadata.covered_points.is_empty()
    }
}
