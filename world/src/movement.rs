//! Per-axis collision resolution against the tile grid.

use cyberdoom_core::{GridMap, WorldPoint};

/// Collision radius of the player in world units.
pub(crate) const PLAYER_RADIUS: f32 = 14.0;

/// Moves `origin` by `(dx, dy)`, applying each axis independently.
///
/// The x displacement is accepted only when neither probe at `x ± radius`
/// (on the current row) lands in a solid cell; the y displacement is then
/// tested from the possibly updated x the same way. Blocking one axis leaves
/// the other free, which lets bodies slide along walls.
pub(crate) fn slide(
    map: &GridMap,
    origin: WorldPoint,
    dx: f32,
    dy: f32,
    radius: f32,
) -> WorldPoint {
    let mut resolved = origin;

    let next_x = resolved.x + dx;
    if !map.is_wall(WorldPoint::new(next_x + radius, resolved.y))
        && !map.is_wall(WorldPoint::new(next_x - radius, resolved.y))
    {
        resolved.x = next_x;
    }

    let next_y = resolved.y + dy;
    if !map.is_wall(WorldPoint::new(resolved.x, next_y + radius))
        && !map.is_wall(WorldPoint::new(resolved.x, next_y - radius))
    {
        resolved.y = next_y;
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use cyberdoom_core::TILE_SIZE;

    fn room() -> GridMap {
        GridMap::from_rows(vec![
            vec![1, 1, 1, 1, 1],
            vec![1, 0, 0, 0, 1],
            vec![1, 0, 1, 0, 1],
            vec![1, 0, 0, 0, 1],
            vec![1, 1, 1, 1, 1],
        ])
        .expect("room is closed")
    }

    #[test]
    fn free_move_applies_both_axes() {
        let map = room();
        let origin = WorldPoint::new(1.5 * TILE_SIZE, 1.5 * TILE_SIZE);

        let moved = slide(&map, origin, 5.0, 4.0, PLAYER_RADIUS);

        assert_eq!(moved, WorldPoint::new(origin.x + 5.0, origin.y + 4.0));
    }

    #[test]
    fn blocked_axis_slides_along_wall() {
        let map = room();
        let origin = WorldPoint::new(1.5 * TILE_SIZE, 1.5 * TILE_SIZE);

        let moved = slide(&map, origin, -40.0, 6.0, PLAYER_RADIUS);

        assert_eq!(moved.x, origin.x);
        assert_eq!(moved.y, origin.y + 6.0);
    }

    #[test]
    fn radius_keeps_probe_distance_from_walls() {
        let map = room();
        let origin = WorldPoint::new(1.0 * TILE_SIZE + 20.0, 1.5 * TILE_SIZE);

        let blocked = slide(&map, origin, -7.0, 0.0, PLAYER_RADIUS);
        let allowed = slide(&map, origin, -5.0, 0.0, PLAYER_RADIUS);

        assert_eq!(blocked.x, origin.x);
        assert_eq!(allowed.x, origin.x - 5.0);
    }

    #[test]
    fn zero_radius_probes_the_destination_only() {
        let map = room();
        let origin = WorldPoint::new(1.0 * TILE_SIZE + 2.0, 1.5 * TILE_SIZE);

        let moved = slide(&map, origin, -1.5, 0.0, 0.0);

        assert_eq!(moved.x, origin.x - 1.5);
    }
}
