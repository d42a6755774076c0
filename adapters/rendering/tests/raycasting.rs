use cyberdoom_core::{
    EnemyKind, GridMap, PickupKind, Sprite, SpriteKind, WorldPoint, RAY_STEP, TILE_SIZE,
};
use cyberdoom_rendering::{Camera, Color, Framebuffer, Renderer, Scene, MAX_DEPTH};

/// Ten columns by eleven rows, with a server wall along the east edge.
fn hall() -> GridMap {
    let mut rows = vec![vec![1; 10]];
    for _ in 0..9 {
        let mut row = vec![0; 10];
        row[0] = 1;
        row[9] = 2;
        rows.push(row);
    }
    rows.push(vec![1; 10]);
    GridMap::from_rows(rows).expect("hall is closed")
}

fn camera() -> Camera {
    Camera::new(WorldPoint::new(1.5 * TILE_SIZE, 5.5 * TILE_SIZE), 0.0)
}

fn render(map: &GridMap, sprites: &[Sprite], show_minimap: bool, size: (u32, u32)) -> Framebuffer {
    let mut buffer = Framebuffer::new(size.0, size.1).expect("valid size");
    let mut renderer = Renderer::new();
    renderer.render(
        &Scene {
            map,
            camera: camera(),
            sprites,
            show_minimap,
        },
        &mut buffer,
    );
    buffer
}

fn enemy(x: f32) -> Sprite {
    Sprite {
        kind: SpriteKind::Enemy(EnemyKind::Malware),
        position: WorldPoint::new(x, 5.5 * TILE_SIZE),
    }
}

#[test]
fn center_column_shows_fogged_server_wall_between_sky_and_floor() {
    let map = hall();
    let buffer = render(&map, &[], false, (64, 32));

    let wall = buffer.pixel(32, 16).expect("inside buffer");
    let fog = 1.0 - 480.0 / MAX_DEPTH;
    assert!((wall.red - 167.0 / 255.0 * fog).abs() < 1e-4);
    assert!((wall.blue - 250.0 / 255.0 * fog).abs() < 1e-4);

    assert_eq!(buffer.pixel(32, 0), Some(Color::from_rgb_u8(11, 15, 23)));
    assert_eq!(buffer.pixel(32, 31), Some(Color::from_rgb_u8(7, 10, 16)));
}

#[test]
fn fisheye_correction_flattens_a_perpendicular_wall() {
    let map = hall();
    let mut buffer = Framebuffer::new(64, 32).expect("valid size");
    let mut renderer = Renderer::new();
    renderer.render(
        &Scene {
            map: &map,
            camera: camera(),
            sprites: &[],
            show_minimap: false,
        },
        &mut buffer,
    );

    let depths = renderer.column_depths();
    assert_eq!(depths.len(), 64);
    assert!((depths[32] - 480.0).abs() < f32::EPSILON);
    for depth in depths {
        assert!(depth.is_finite());
        assert!((depth - depths[32]).abs() <= RAY_STEP);
    }
}

#[test]
fn billboards_are_occluded_per_column_by_nearer_walls() {
    let map = hall();
    let plain = render(&map, &[], false, (64, 32));

    let behind_wall = render(&map, &[enemy(11.0 * TILE_SIZE)], false, (64, 32));
    assert_eq!(behind_wall, plain);

    let in_front = render(&map, &[enemy(5.0 * TILE_SIZE)], false, (64, 32));
    assert_ne!(in_front.pixel(32, 16), plain.pixel(32, 16));
}

#[test]
fn sprites_behind_the_camera_are_culled() {
    let map = hall();
    let plain = render(&map, &[], false, (64, 32));

    let behind = render(&map, &[enemy(0.5 * TILE_SIZE)], false, (64, 32));
    assert_eq!(behind, plain);
}

#[test]
fn billboard_order_does_not_depend_on_input_order() {
    let map = hall();
    let pickup = Sprite {
        kind: SpriteKind::Pickup(PickupKind::Battery),
        position: WorldPoint::new(3.5 * TILE_SIZE, 5.5 * TILE_SIZE),
    };
    let far = enemy(6.2 * TILE_SIZE);

    let forward = render(&map, &[pickup, far], false, (64, 32));
    let reversed = render(&map, &[far, pickup], false, (64, 32));
    assert_eq!(forward, reversed);
}

#[test]
fn minimap_marks_the_player_position() {
    let map = hall();
    let plain = render(&map, &[], false, (96, 64));
    let overlay = render(&map, &[], true, (96, 64));

    let marker = overlay.pixel(20, 36).expect("inside buffer");
    assert_ne!(Some(marker), plain.pixel(20, 36));
    assert!(marker.red > 0.7 && marker.green > 0.7);
}
