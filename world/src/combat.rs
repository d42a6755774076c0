//! Player attack resolution.

use std::time::Duration;

use cyberdoom_core::{
    has_line_of_sight, AttackRejection, Event, GridMap, PickupKind, WorldPoint, TILE_SIZE,
};

use crate::{
    entities::{angle_delta, Enemy},
    World,
};

/// Minimum simulated time between two successful attacks.
pub(crate) const ATTACK_COOLDOWN: Duration = Duration::from_millis(220);
/// Energy consumed by each attack that passes the cooldown and energy checks.
pub(crate) const ATTACK_ENERGY_COST: f32 = 6.0;
/// Maximum distance to a target.
pub(crate) const ATTACK_RANGE: f32 = TILE_SIZE * 6.2;
/// Half-width of the targeting cone in radians.
pub(crate) const ATTACK_CONE: f32 = 0.09;
/// Health removed from the selected target.
pub(crate) const ATTACK_DAMAGE: f32 = 26.0;
/// Probability that a neutralized spawner leaves a battery behind.
const SPAWNER_DROP_CHANCE: f32 = 0.8;

/// Attempts an attack from the player's current pose.
pub(crate) fn attack(world: &mut World, out_events: &mut Vec<Event>) {
    let now = world.clock;
    if let Some(last) = world.player.last_attack_at {
        if now.saturating_sub(last) < ATTACK_COOLDOWN {
            out_events.push(Event::AttackRejected {
                reason: AttackRejection::Cooldown,
            });
            return;
        }
    }

    if world.player.energy < ATTACK_ENERGY_COST {
        out_events.push(Event::AttackRejected {
            reason: AttackRejection::InsufficientEnergy,
        });
        world.notify("Insufficient energy.");
        return;
    }

    world.player.adjust_energy(-ATTACK_ENERGY_COST);
    world.player.last_attack_at = Some(now);

    let Some(index) = select_target(
        &world.level.map,
        world.player.position,
        world.player.angle,
        &world.enemies,
    ) else {
        out_events.push(Event::AttackRejected {
            reason: AttackRejection::NoTarget,
        });
        world.notify("Scan found nothing.");
        return;
    };

    let target = &mut world.enemies[index];
    target.health -= ATTACK_DAMAGE;
    if target.health > 0.0 {
        let message = format!("Patched: {} (-{ATTACK_DAMAGE})", target.kind.stats().name);
        out_events.push(Event::EnemyHit {
            enemy: target.id,
            remaining: target.health,
        });
        world.notify(message);
        return;
    }

    target.health = 0.0;
    target.alive = false;
    let (id, kind, position) = (target.id, target.kind, target.position);
    let awarded = (target.score as f32 * world.modifiers.score_multiplier()).round() as u32;

    world.kills += 1;
    world.score = world.score.saturating_add(awarded);
    out_events.push(Event::EnemyNeutralized {
        enemy: id,
        kind,
        score: awarded,
    });
    world.notify(format!("Threat neutralized (+{awarded})"));

    if kind.stats().spawner && world.random.chance(SPAWNER_DROP_CHANCE) {
        world.drop_pickup(PickupKind::Battery, position, out_events);
    }
}

/// Picks the nearest live enemy inside the range and cone with a clear line of sight.
pub(crate) fn select_target(
    map: &GridMap,
    origin: WorldPoint,
    facing: f32,
    enemies: &[Enemy],
) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, enemy) in enemies.iter().enumerate() {
        if !enemy.alive {
            continue;
        }
        let distance = origin.distance_to(enemy.position);
        if distance > ATTACK_RANGE {
            continue;
        }
        if angle_delta(facing, origin.angle_to(enemy.position)).abs() > ATTACK_CONE {
            continue;
        }
        if !has_line_of_sight(map, origin, enemy.position) {
            continue;
        }
        if best.map_or(true, |(_, nearest)| distance < nearest) {
            best = Some((index, distance));
        }
    }
    best.map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cyberdoom_core::{EnemyId, EnemyKind, RunModifiers};

    fn hall() -> GridMap {
        GridMap::from_rows(vec![
            vec![1, 1, 1, 1, 1, 1, 1, 1],
            vec![1, 0, 0, 0, 0, 0, 0, 1],
            vec![1, 0, 0, 0, 1, 0, 0, 1],
            vec![1, 0, 0, 0, 0, 0, 0, 1],
            vec![1, 1, 1, 1, 1, 1, 1, 1],
        ])
        .expect("hall is closed")
    }

    fn enemy_at(id: u32, x: f32, y: f32) -> Enemy {
        Enemy::new(
            EnemyId::new(id),
            EnemyKind::Malware,
            WorldPoint::new(x * TILE_SIZE, y * TILE_SIZE),
            &RunModifiers::default(),
            0.0,
        )
    }

    #[test]
    fn nearest_enemy_in_cone_is_selected() {
        let map = hall();
        let origin = WorldPoint::new(1.5 * TILE_SIZE, 1.5 * TILE_SIZE);
        let enemies = vec![enemy_at(0, 6.5, 1.5), enemy_at(1, 3.5, 1.5)];

        assert_eq!(select_target(&map, origin, 0.0, &enemies), Some(1));
    }

    #[test]
    fn enemy_outside_cone_is_ignored_even_when_nearest() {
        let map = hall();
        let origin = WorldPoint::new(1.5 * TILE_SIZE, 1.5 * TILE_SIZE);
        let enemies = vec![enemy_at(0, 2.5, 2.0), enemy_at(1, 5.5, 1.5)];

        assert_eq!(select_target(&map, origin, 0.0, &enemies), Some(1));
        assert_eq!(select_target(&map, origin, 0.0, &enemies[..1]), None);
    }

    #[test]
    fn walls_and_range_exclude_targets() {
        let map = hall();
        let origin = WorldPoint::new(1.5 * TILE_SIZE, 2.5 * TILE_SIZE);
        let hidden = vec![enemy_at(0, 5.5, 2.5)];
        assert_eq!(select_target(&map, origin, 0.0, &hidden), None);

        let far_origin = WorldPoint::new(0.5 * TILE_SIZE, 3.5 * TILE_SIZE);
        let distant = vec![enemy_at(0, 6.8, 3.5)];
        assert_eq!(select_target(&map, far_origin, 0.0, &distant), None);
    }

    #[test]
    fn dead_enemies_are_never_selected() {
        let map = hall();
        let origin = WorldPoint::new(1.5 * TILE_SIZE, 1.5 * TILE_SIZE);
        let mut enemies = vec![enemy_at(0, 3.5, 1.5)];
        enemies[0].alive = false;

        assert_eq!(select_target(&map, origin, 0.0, &enemies), None);
    }

    #[test]
    fn cone_wraps_around_zero_heading() {
        let map = hall();
        let origin = WorldPoint::new(1.5 * TILE_SIZE, 1.5 * TILE_SIZE);
        let enemies = vec![enemy_at(0, 4.5, 1.5)];

        assert_eq!(
            select_target(&map, origin, std::f32::consts::TAU - 0.05, &enemies),
            Some(0)
        );
    }
}
