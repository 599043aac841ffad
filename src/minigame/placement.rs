//! Spacing-aware target placement
//!
//! Rejection sampling with a fixed attempt budget. When no candidate clears
//! every live target the last one is used anyway, so spacing is a soft
//! guarantee.

use rand::Rng;

use crate::core::types::Vec2;

/// Rectangular play field centred on the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnArea {
    pub width: f32,
    pub height: f32,
}

impl SpawnArea {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Candidate range along one axis, keeping `margin` from both edges
    fn axis_range(extent: f32, margin: f32) -> (f32, f32) {
        let half = extent / 2.0;
        (-half + margin, half - margin)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x.abs() <= self.width / 2.0 && p.y.abs() <= self.height / 2.0
    }
}

fn sample_axis<R: Rng>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if lo < hi {
        rng.gen_range(lo..hi)
    } else {
        (lo + hi) / 2.0
    }
}

pub fn is_too_close(candidate: Vec2, occupied: &[Vec2], min_spacing: f32) -> bool {
    occupied.iter().any(|p| candidate.distance(p) < min_spacing)
}

/// Pick a spawn point at least `min_spacing` from every occupied point
///
/// Candidates keep half a spacing from the area edges. At most `attempts`
/// candidates are drawn (minimum one).
pub fn pick_position<R: Rng>(
    rng: &mut R,
    area: SpawnArea,
    min_spacing: f32,
    occupied: &[Vec2],
    attempts: u32,
) -> Vec2 {
    let margin = min_spacing / 2.0;
    let (x_lo, x_hi) = SpawnArea::axis_range(area.width, margin);
    let (y_lo, y_hi) = SpawnArea::axis_range(area.height, margin);

    let mut candidate = Vec2::default();
    for _ in 0..attempts.max(1) {
        candidate = Vec2::new(sample_axis(rng, x_lo, x_hi), sample_axis(rng, y_lo, y_hi));
        if !is_too_close(candidate, occupied, min_spacing) {
            return candidate;
        }
    }
    candidate
}
