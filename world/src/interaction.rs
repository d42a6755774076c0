//! Pickup collection and server door access.

use cyberdoom_core::{Event, PickupEffect, RunOutcome};

use crate::World;

/// Distance within which the player can consume a pickup.
pub(crate) const PICKUP_RADIUS: f32 = 44.0;
/// Extra reach beyond the server door radius.
pub(crate) const DOOR_REACH: f32 = 20.0;
/// Score awarded for collecting a token.
pub(crate) const TOKEN_SCORE: u32 = 120;
/// Score awarded for a health or energy refill.
pub(crate) const RESTORE_SCORE: u32 = 30;
/// Score awarded for a pickup without a gameplay effect.
pub(crate) const FALLBACK_SCORE: u32 = 10;

/// Consumes the first pickup in reach, or else tries the server door.
pub(crate) fn interact(world: &mut World, out_events: &mut Vec<Event>) {
    let position = world.player.position;
    let nearby = world
        .pickups
        .iter()
        .position(|pickup| pickup.alive && pickup.position.distance_to(position) < PICKUP_RADIUS);
    if let Some(index) = nearby {
        collect(world, index, out_events);
        return;
    }

    let Some(door) = world.level.server_door.as_ref() else {
        return;
    };
    if position.distance_to(door.position.to_world()) >= door.radius + DOOR_REACH {
        return;
    }

    let missing = door
        .requires
        .iter()
        .copied()
        .find(|kind| !world.inventory.contains(kind));
    match missing {
        Some(kind) => {
            out_events.push(Event::AccessDenied { missing: kind });
            world.notify(format!("Access blocked. Missing: {}", kind.name()));
        }
        None => {
            world.notify("Server access granted. Objective complete.");
            world.complete(RunOutcome::Won, out_events);
        }
    }
}

fn collect(world: &mut World, index: usize, out_events: &mut Vec<Event>) {
    let pickup = &mut world.pickups[index];
    pickup.alive = false;
    let (id, kind) = (pickup.id, pickup.kind);
    let label = pickup.label.clone();

    let (score, message) = match kind.effect() {
        PickupEffect::Token => {
            let _ = world.inventory.insert(kind);
            world.objective = world.describe_objective();
            (TOKEN_SCORE, format!("Acquired: {label}"))
        }
        PickupEffect::Heal(amount) => {
            let before = world.player.health;
            world.player.adjust_health(amount);
            let restored = world.player.health - before;
            (RESTORE_SCORE, format!("Health +{restored:.0}"))
        }
        PickupEffect::Energy(amount) => {
            let before = world.player.energy;
            world.player.adjust_energy(amount);
            let restored = world.player.energy - before;
            (RESTORE_SCORE, format!("Energy +{restored:.0}"))
        }
        PickupEffect::Inert => (FALLBACK_SCORE, format!("Collected: {label}")),
    };

    world.score = world.score.saturating_add(score);
    out_events.push(Event::PickupCollected {
        pickup: id,
        kind,
        score,
    });
    world.notify(message);
}
