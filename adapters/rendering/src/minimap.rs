use cyberdoom_core::{CellCode, SpriteKind, WorldPoint, TILE_SIZE};
use glam::Vec2;

use crate::{
    raycaster::{enemy_color, PICKUP},
    Color, RasterSurface, Scene, MINIMAP_SCALE,
};

const PADDING: f32 = 10.0;
const INSET: f32 = 4.0;
const OPACITY: f32 = 0.9;
const BACKDROP: Color = Color::from_rgba_u8(10, 14, 22, 0.6);
const BORDER: Color = Color::from_rgba_u8(255, 255, 255, 0.12);
const WALL: Color = Color::from_rgba_u8(110, 231, 255, 0.35);
const SERVER_WALL: Color = Color::from_rgba_u8(167, 139, 250, 0.7);
const PLAYER: Color = Color::from_rgba_u8(233, 238, 246, 0.95);
const HEADING: Color = Color::from_rgba_u8(233, 238, 246, 0.8);
const HEADING_LENGTH: f32 = 7.0;

/// Draws the top-down overlay in the top-left corner.
pub(crate) fn draw(scene: &Scene<'_>, surface: &mut dyn RasterSurface) {
    let map = scene.map;
    let width = map.columns() as f32 * MINIMAP_SCALE;
    let height = map.rows() as f32 * MINIMAP_SCALE;
    let frame = INSET * 2.0;

    surface.fill_rect(PADDING, PADDING, width + frame, height + frame, BACKDROP.fade(OPACITY));
    surface.stroke_rect(PADDING, PADDING, width + frame, height + frame, BORDER.fade(OPACITY));

    for (column, row, cell) in map.iter() {
        let color = match cell {
            CellCode::Empty => continue,
            CellCode::Wall => WALL,
            CellCode::ServerWall => SERVER_WALL,
        };
        surface.fill_rect(
            PADDING + INSET + column as f32 * MINIMAP_SCALE,
            PADDING + INSET + row as f32 * MINIMAP_SCALE,
            MINIMAP_SCALE,
            MINIMAP_SCALE,
            color.fade(OPACITY),
        );
    }

    for sprite in scene.sprites {
        let color = match sprite.kind {
            SpriteKind::Enemy(kind) => enemy_color(kind),
            SpriteKind::Pickup(_) => PICKUP,
        };
        let marker = project(sprite.position);
        surface.fill_rect(marker.x - 2.0, marker.y - 2.0, 5.0, 5.0, color.fade(OPACITY));
    }

    let player = project(scene.camera.position);
    surface.fill_rect(player.x - 1.0, player.y - 1.0, 3.0, 3.0, PLAYER.fade(OPACITY));
    let (sin, cos) = scene.camera.angle.sin_cos();
    surface.line(
        player,
        player + Vec2::new(cos, sin) * HEADING_LENGTH,
        HEADING.fade(OPACITY),
    );
}

fn project(point: WorldPoint) -> Vec2 {
    Vec2::new(point.x, point.y) / TILE_SIZE * MINIMAP_SCALE + Vec2::splat(PADDING + INSET)
}
