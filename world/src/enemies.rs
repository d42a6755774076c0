//! Per-enemy behavior: spawning, ranged fire, pursuit and melee.

use cyberdoom_core::{has_line_of_sight, EnemyKind, Event, WorldPoint, TILE_SIZE};

use crate::{entities::Enemy, movement, World};

/// Wobble phase advance in radians per second.
const WOBBLE_RATE: f32 = 2.2;
/// Distance within which an enemy can see the player.
const SIGHT_RANGE: f32 = TILE_SIZE * 7.0;
/// Distance within which an enemy pursues the player.
const ENGAGE_RANGE: f32 = TILE_SIZE * 9.0;
/// Distance below which pursuit gains a perpendicular orbit component.
const ORBIT_RANGE: f32 = TILE_SIZE * 1.2;
const ORBIT_AMPLITUDE: f32 = 0.45;
/// Contact distance for melee attacks.
const MELEE_RANGE: f32 = 26.0;
/// Fraction of the enemy's damage dealt by a melee hit.
const MELEE_DAMAGE_FACTOR: f32 = 0.75;
const RANGED_COOLDOWN: (f32, f32) = (1.2, 2.0);
const MELEE_COOLDOWN: (f32, f32) = (0.8, 1.1);
const SPAWN_COOLDOWN: (f32, f32) = (4.5, 7.0);
/// Maximum offset of a spawned unit from its spawner on each axis.
const SPAWN_OFFSET: f32 = TILE_SIZE;
const SPAWNED_HEALTH_FACTOR: f32 = 0.65;
const SPAWNED_SCORE_FACTOR: f32 = 0.6;
const SPAWN_NOTICE_CHANCE: f32 = 0.45;

/// Runs one behavior step for the enemy stored at `index`.
pub(crate) fn think(world: &mut World, index: usize, dt: f32, out_events: &mut Vec<Event>) {
    let Some(enemy) = world.enemies.get_mut(index) else {
        return;
    };
    if !enemy.alive {
        return;
    }
    enemy.wobble += WOBBLE_RATE * dt;
    let stats = enemy.kind.stats();
    let (id, origin, damage) = (enemy.id, enemy.position, enemy.damage);

    if stats.spawner && countdown(&mut enemy.spawn_timer, dt) {
        enemy.spawn_timer = world.random.range(SPAWN_COOLDOWN.0, SPAWN_COOLDOWN.1);
        spawn_malware(world, id, origin, out_events);
    }

    let target = world.player.position;
    let distance = origin.distance_to(target);
    let can_see = distance < SIGHT_RANGE && has_line_of_sight(&world.level.map, origin, target);

    if can_see && stats.ranged && countdown(&mut world.enemies[index].ranged_timer, dt) {
        world.enemies[index].ranged_timer = world.random.range(RANGED_COOLDOWN.0, RANGED_COOLDOWN.1);
        world.damage_player(id, damage, out_events);
    }

    if distance >= ENGAGE_RANGE {
        return;
    }

    let enemy = &mut world.enemies[index];
    let reach = distance.max(0.001);
    let (ax, ay) = ((target.x - origin.x) / reach, (target.y - origin.y) / reach);
    let orbit = if distance < ORBIT_RANGE { 1.0 } else { 0.0 };
    let (ox, oy) = (-ay * orbit, ax * orbit);
    let vx = (ax + ox * ORBIT_AMPLITUDE * enemy.wobble.sin()) * enemy.speed;
    let vy = (ay + oy * ORBIT_AMPLITUDE * enemy.wobble.cos()) * enemy.speed;
    enemy.position = movement::slide(&world.level.map, enemy.position, vx * dt, vy * dt, 0.0);

    if distance < MELEE_RANGE && can_see && countdown(&mut enemy.melee_timer, dt) {
        enemy.melee_timer = world.random.range(MELEE_COOLDOWN.0, MELEE_COOLDOWN.1);
        world.damage_player(id, damage * MELEE_DAMAGE_FACTOR, out_events);
    }
}

fn countdown(timer: &mut f32, dt: f32) -> bool {
    *timer -= dt;
    *timer <= 0.0
}

fn spawn_malware(
    world: &mut World,
    spawner: cyberdoom_core::EnemyId,
    origin: WorldPoint,
    out_events: &mut Vec<Event>,
) {
    let candidate = origin.offset(
        world.random.range(-SPAWN_OFFSET, SPAWN_OFFSET),
        world.random.range(-SPAWN_OFFSET, SPAWN_OFFSET),
    );
    if world.level.map.is_wall(candidate) {
        return;
    }

    let id = world.allocate_enemy_id();
    let wobble = world.random.range(0.0, std::f32::consts::TAU);
    let mut spawned = Enemy::new(id, EnemyKind::Malware, candidate, &world.modifiers, wobble);
    spawned.health = (spawned.health * SPAWNED_HEALTH_FACTOR).round();
    spawned.max_health = spawned.health;
    spawned.score = (spawned.score as f32 * SPAWNED_SCORE_FACTOR).round() as u32;
    world.enemies.push(spawned);

    log::debug!("enemy {} spawned {} at {:?}", spawner.get(), id.get(), candidate);
    out_events.push(Event::EnemySpawned {
        enemy: id,
        kind: EnemyKind::Malware,
        spawner,
    });
    if world.random.chance(SPAWN_NOTICE_CHANCE) {
        world.notify("Anomalous activity: a bot propagated.");
    }
}
