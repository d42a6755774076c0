//! Fixed-step ray marching over a [`GridMap`].
//!
//! The same primitive serves the per-column wall render and line-of-sight
//! queries; only the maximum distance differs between callers.

use crate::grid::{CellCode, GridMap, WorldPoint};

/// Distance advanced per marching step, in world units.
///
/// Small relative to the tile size so a ray cannot skip a one-tile wall.
pub const RAY_STEP: f32 = 3.0;

/// Number of interpolated points tested between two endpoints for line of sight.
pub const LINE_OF_SIGHT_SAMPLES: u32 = 16;

/// Result of casting a single ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Distance travelled before entering a solid cell, capped at the maximum.
    pub distance: f32,
    /// Cell that stopped the ray; [`CellCode::Wall`] when the ray ran out of range.
    pub cell: CellCode,
}

/// Marches a ray from `origin` along `angle` until it enters a solid cell or
/// reaches `max_distance`.
///
/// Leaving the map counts as hitting a wall at the current distance. A ray
/// that exhausts its range reports `max_distance` with a wall sentinel, so the
/// result never carries [`CellCode::Empty`].
#[must_use]
pub fn cast_ray(map: &GridMap, origin: WorldPoint, angle: f32, max_distance: f32) -> RayHit {
    let (sin, cos) = angle.sin_cos();
    let mut travelled = 0.0_f32;

    while travelled < max_distance {
        let sample = origin.offset(cos * travelled, sin * travelled);
        match map.cell_at(sample) {
            None => {
                return RayHit {
                    distance: travelled,
                    cell: CellCode::Wall,
                }
            }
            Some(CellCode::Empty) => {}
            Some(cell) => {
                return RayHit {
                    distance: travelled,
                    cell,
                }
            }
        }
        travelled += RAY_STEP;
    }

    RayHit {
        distance: max_distance,
        cell: CellCode::Wall,
    }
}

/// Samples evenly spaced points between `from` and `to` (excluding `from`) and
/// reports whether none of them lands in a solid cell.
#[must_use]
pub fn has_line_of_sight(map: &GridMap, from: WorldPoint, to: WorldPoint) -> bool {
    (1..=LINE_OF_SIGHT_SAMPLES).all(|step| {
        let t = step as f32 / LINE_OF_SIGHT_SAMPLES as f32;
        !map.is_wall(from.lerp(to, t))
    })
}
