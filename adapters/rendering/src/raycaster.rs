//! Column raycaster and billboard sprites.

use cyberdoom_core::{cast_ray, CellCode, EnemyKind, Sprite, SpriteKind, TILE_SIZE};

use crate::{
    minimap, Color, RasterSurface, Scene, FIELD_OF_VIEW, FOG_FLOOR, MAX_DEPTH, SPRITE_MARGIN,
};

const SKY: Color = Color::from_rgb_u8(11, 15, 23);
const FLOOR: Color = Color::from_rgb_u8(7, 10, 16);
const WALL: Color = Color::from_rgb_u8(110, 231, 255);
const SERVER_WALL: Color = Color::from_rgb_u8(167, 139, 250);
const MALWARE: Color = Color::from_rgba_u8(110, 231, 255, 0.9);
const INSIDER: Color = Color::from_rgba_u8(167, 139, 250, 0.9);
const RANSOMWARE: Color = Color::from_rgba_u8(255, 92, 122, 0.9);
pub(crate) const PICKUP: Color = Color::from_rgba_u8(92, 255, 178, 0.95);
const EYE: Color = Color::from_rgba_u8(233, 238, 246, 0.95);
const PICKUP_DETAIL: Color = Color::from_rgba_u8(233, 238, 246, 0.9);

/// Smallest corrected distance used when projecting a wall slab.
const WALL_DEPTH_EPSILON: f32 = 0.0001;
/// Smallest distance used when sizing a billboard.
const SPRITE_DEPTH_EPSILON: f32 = 0.001;
/// Distance over which billboards fade to their minimum opacity.
const SPRITE_FADE_DISTANCE: f32 = TILE_SIZE * 14.0;
const SPRITE_ALPHA_FLOOR: f32 = 0.25;
/// Vertical stripes painted across an enemy billboard.
const ENEMY_BANDS: f32 = 6.0;
const DIM_BAND_ALPHA: f32 = 0.85;
/// Half-width of the detail marker as a fraction of the billboard width.
const MARKER_HALF_WIDTH: f32 = 0.02;

/// Renders scenes column by column.
///
/// The renderer keeps the corrected wall distance of every column of the last
/// frame; billboards are occluded against it one column at a time.
#[derive(Clone, Debug, Default)]
pub struct Renderer {
    depth: Vec<f32>,
}

impl Renderer {
    /// Creates a renderer with an empty depth buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Corrected wall distance per column of the last rendered frame.
    #[must_use]
    pub fn column_depths(&self) -> &[f32] {
        &self.depth
    }

    /// Draws `scene` onto `surface`.
    pub fn render(&mut self, scene: &Scene<'_>, surface: &mut dyn RasterSurface) {
        let width = surface.width() as f32;
        let height = surface.height() as f32;
        let horizon = height / 2.0;

        surface.fill_rect(0.0, 0.0, width, horizon, SKY);
        surface.fill_rect(0.0, horizon, width, height - horizon, FLOOR);

        self.cast_walls(scene, surface);
        self.draw_sprites(scene, surface);

        if scene.show_minimap {
            minimap::draw(scene, surface);
        }
    }

    fn cast_walls(&mut self, scene: &Scene<'_>, surface: &mut dyn RasterSurface) {
        let columns = surface.width();
        let height = surface.height() as f32;
        let projection = projection_distance(columns);
        let camera = scene.camera;

        self.depth.clear();
        for column in 0..columns {
            let angle = camera.angle - FIELD_OF_VIEW / 2.0
                + (column as f32 / columns as f32) * FIELD_OF_VIEW;
            let hit = cast_ray(scene.map, camera.position, angle, MAX_DEPTH);
            let corrected = hit.distance * (angle - camera.angle).cos();
            let slab = TILE_SIZE / corrected.max(WALL_DEPTH_EPSILON) * projection;

            let top = (height / 2.0 - slab / 2.0).floor();
            let bottom = (height / 2.0 + slab / 2.0).floor();
            let color = wall_color(hit.cell).shade(fog(corrected));
            surface.fill_rect(column as f32, top, 1.0, bottom - top, color);

            self.depth.push(corrected);
        }
    }

    fn draw_sprites(&self, scene: &Scene<'_>, surface: &mut dyn RasterSurface) {
        let origin = scene.camera.position;
        let mut ordered: Vec<(f32, &Sprite)> = scene
            .sprites
            .iter()
            .map(|sprite| (origin.distance_to(sprite.position), sprite))
            .collect();
        ordered.sort_by(|left, right| right.0.total_cmp(&left.0));

        for (distance, sprite) in ordered {
            self.draw_billboard(scene, surface, sprite, distance);
        }
    }

    fn draw_billboard(
        &self,
        scene: &Scene<'_>,
        surface: &mut dyn RasterSurface,
        sprite: &Sprite,
        distance: f32,
    ) {
        let camera = scene.camera;
        let relative = relative_angle(camera.angle, camera.position.angle_to(sprite.position));
        if relative.abs() > FIELD_OF_VIEW / 2.0 + SPRITE_MARGIN {
            return;
        }

        let width = surface.width();
        let height = surface.height() as f32;
        let projection = projection_distance(width);
        let size = TILE_SIZE / distance.max(SPRITE_DEPTH_EPSILON) * projection;
        let center = width as f32 / 2.0 + relative.tan() * projection;
        let top = height / 2.0 - size / 2.0;

        let left = (center - size / 2.0).floor();
        let right = (center + size / 2.0).floor();
        let span = (right - left).max(1.0);
        let alpha = (1.0 - distance / SPRITE_FADE_DISTANCE).clamp(SPRITE_ALPHA_FLOOR, 1.0);

        let first = left.max(0.0) as u32;
        let last = right.clamp(0.0, width as f32) as u32;
        for column in first..last {
            match self.depth.get(column as usize) {
                Some(&wall) if wall >= distance => {}
                _ => continue,
            }
            let t = (column as f32 - left) / span;
            let x = column as f32;
            let marker = (t - 0.5).abs() < MARKER_HALF_WIDTH;

            match sprite.kind {
                SpriteKind::Enemy(kind) => {
                    let band = if (t * ENEMY_BANDS).floor() as u32 % 2 == 1 {
                        DIM_BAND_ALPHA
                    } else {
                        1.0
                    };
                    let body = enemy_color(kind).fade(band * alpha);
                    surface.fill_rect(x, top, 1.0, size, body);
                    if marker {
                        surface.fill_rect(x, top + size * 0.38, 1.0, size * 0.08, EYE.fade(alpha));
                    }
                }
                SpriteKind::Pickup(_) => {
                    surface.fill_rect(x, top + size * 0.2, 1.0, size * 0.6, PICKUP.fade(alpha));
                    if marker {
                        surface.fill_rect(
                            x,
                            top + size * 0.45,
                            1.0,
                            size * 0.1,
                            PICKUP_DETAIL.fade(alpha),
                        );
                    }
                }
            }
        }
    }
}

/// Distance from the eye to the projection plane for a screen `width` pixels wide.
fn projection_distance(width: u32) -> f32 {
    (width as f32 / 2.0) / (FIELD_OF_VIEW / 2.0).tan()
}

fn fog(distance: f32) -> f32 {
    (1.0 - distance / MAX_DEPTH).clamp(FOG_FLOOR, 1.0)
}

fn wall_color(cell: CellCode) -> Color {
    match cell {
        CellCode::ServerWall => SERVER_WALL,
        CellCode::Wall | CellCode::Empty => WALL,
    }
}

pub(crate) fn enemy_color(kind: EnemyKind) -> Color {
    match kind {
        EnemyKind::Malware => MALWARE,
        EnemyKind::Insider => INSIDER,
        EnemyKind::Ransomware => RANSOMWARE,
    }
}

/// Signed angle from `facing` to `target`, in `(-π, π]`.
fn relative_angle(facing: f32, target: f32) -> f32 {
    use std::f32::consts::{PI, TAU};

    let delta = (target - facing).rem_euclid(TAU);
    if delta > PI {
        delta - TAU
    } else {
        delta
    }
}
