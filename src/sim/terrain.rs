//! Height-field terrain
//!
//! The battlefield is a row of control heights sampled every `chunk_size`
//! world units. Slope queries during tank movement read the raw control
//! grid; everything else (spawn placement, solid-ground containment) uses
//! the linearly interpolated surface between control points.
//!
//! Terrain is read-only shared state: tanks and projectiles query it every
//! tick but never mutate it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Terrain generation bounds (world units)
const GEN_BASE_HEIGHT: f32 = 120.0;
const GEN_MIN_HEIGHT: f32 = 40.0;
const GEN_MAX_HEIGHT: f32 = 300.0;
const GEN_MAX_STEP: f32 = 14.0;

/// A height-field battlefield
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Terrain {
    control_heights: Vec<f32>,
    chunk_size: f32,
}

impl Terrain {
    /// Build terrain from explicit control heights
    pub fn new(control_heights: Vec<f32>, chunk_size: f32) -> Self {
        debug_assert!(control_heights.len() >= 2, "terrain needs at least two control points");
        debug_assert!(chunk_size > 0.0);
        Self {
            control_heights,
            chunk_size,
        }
    }

    /// Perfectly level terrain (scenario/test helper)
    pub fn flat(height: f32, control_points: usize, chunk_size: f32) -> Self {
        Self::new(vec![height; control_points], chunk_size)
    }

    /// Generate rolling terrain from a seed
    ///
    /// A bounded random walk over the control grid; the same seed always
    /// produces the same battlefield.
    pub fn generate(seed: u64, control_points: usize, chunk_size: f32) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut heights = Vec::with_capacity(control_points);
        let mut h = GEN_BASE_HEIGHT;
        for _ in 0..control_points {
            heights.push(h);
            h = (h + rng.random_range(-GEN_MAX_STEP..=GEN_MAX_STEP))
                .clamp(GEN_MIN_HEIGHT, GEN_MAX_HEIGHT);
        }
        log::info!(
            "Generated terrain: {} control points, chunk {}, seed {}",
            control_points,
            chunk_size,
            seed
        );
        Self::new(heights, chunk_size)
    }

    /// Height at a control point, clamped to the grid
    pub fn height_at(&self, control_index: usize) -> f32 {
        let i = control_index.min(self.control_heights.len() - 1);
        self.control_heights[i]
    }

    /// Number of control points
    pub fn control_points(&self) -> usize {
        self.control_heights.len()
    }

    /// Horizontal spacing between control points
    #[inline]
    pub fn chunk_size(&self) -> f32 {
        self.chunk_size
    }

    /// Horizontal extent of the battlefield
    #[inline]
    pub fn width(&self) -> f32 {
        (self.control_heights.len() - 1) as f32 * self.chunk_size
    }

    /// Interpolated surface height at an arbitrary x
    pub fn surface_height(&self, x: f32) -> f32 {
        let x = x.clamp(0.0, self.width());
        let cell = (x / self.chunk_size).floor() as usize;
        let t = (x - cell as f32 * self.chunk_size) / self.chunk_size;
        let y0 = self.height_at(cell);
        let y1 = self.height_at(cell + 1);
        y0 + (y1 - y0) * t
    }

    /// Is this point inside solid ground?
    ///
    /// Solid ground is the region between y = 0 and the interpolated
    /// surface, within the horizontal extent.
    pub fn contains(&self, point: Vec2) -> bool {
        if point.x < 0.0 || point.x > self.width() || point.y < 0.0 {
            return false;
        }
        point.y <= self.surface_height(point.x)
    }
}
