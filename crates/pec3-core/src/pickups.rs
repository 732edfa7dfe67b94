//! Power-ups, keys and door switches reacting to the player.

use hecs::Entity;
use log::{debug, info};

use crate::components::{
    Character, DoorSwitch, KeyPickup, KeyRing, PowerUp, PowerUpKind, Tag, Transform,
};
use crate::context::Frame;
use crate::doors::Door;
use crate::events::{Contact, ContactPhase};
use crate::host::SoundCue;
use crate::states::state_for;

/// Degrees per second items turn on the spot.
pub const ITEM_SPIN_RATE: f32 = 100.0;

fn is_player(frame: &Frame<'_>, entity: Entity) -> bool {
    frame
        .world
        .get::<&Tag>(entity)
        .map(|t| *t == Tag::Player)
        .unwrap_or(false)
}

/// A player walked into a power-up.
pub fn handle_power_up_contact(frame: &mut Frame<'_>, me: Entity, contact: Contact) {
    if contact.phase != ContactPhase::Enter
        || !is_player(frame, contact.other)
        || frame.is_destroying(me)
    {
        return;
    }
    let Ok(kind) = frame.world.get::<&PowerUp>(me).map(|p| p.kind) else {
        return;
    };
    let player = contact.other;
    let (character_kind, health_full, shield_full) = {
        let Ok(c) = frame.world.get::<&Character>(player) else {
            return;
        };
        (c.kind, c.vitals.health_full(), c.vitals.shield_full())
    };
    let fraction = frame.settings().powerup_restore_fraction;
    let state = state_for(character_kind);

    match kind {
        PowerUpKind::Health => {
            if health_full {
                frame.message("Already at full health");
                return;
            }
            frame.message("You got some health!");
            state.restore_health(frame, player, fraction);
        }
        PowerUpKind::Shield => {
            if shield_full {
                frame.message("Already at full shield");
                return;
            }
            frame.message("You got some shield");
            state.restore_shield(frame, player, fraction);
        }
    }
    info!("{:?} picked up a {} power-up", player, kind);
    frame.host.play_sound(me, SoundCue::Pickup);
    frame.destroy(me, 0.0);
}

/// A player walked into a key.
pub fn handle_key_contact(frame: &mut Frame<'_>, me: Entity, contact: Contact) {
    if contact.phase != ContactPhase::Enter
        || !is_player(frame, contact.other)
        || frame.is_destroying(me)
    {
        return;
    }
    let Ok(color) = frame.world.get::<&KeyPickup>(me).map(|k| k.color) else {
        return;
    };
    let player = contact.other;
    frame.message(&format!(
        "You got the {} key!",
        color.to_string().to_lowercase()
    ));

    let ring = {
        let Ok(mut ring) = frame.world.get::<&mut KeyRing>(player) else {
            return;
        };
        ring.grant(color);
        *ring
    };
    frame.host.update_key_icons(ring.red, ring.green, ring.blue);
    info!("{:?} picked up the {} key", player, color);
    frame.host.play_sound(me, SoundCue::Pickup);
    frame.destroy(me, 0.0);
}

/// A player stepped on a switch: arm the linked door.
pub fn handle_switch_contact(frame: &mut Frame<'_>, me: Entity, contact: Contact) {
    if contact.phase != ContactPhase::Enter || !is_player(frame, contact.other) {
        return;
    }
    let Ok(door) = frame.world.get::<&DoorSwitch>(me).map(|s| s.door) else {
        return;
    };
    match frame.world.get::<&mut Door>(door) {
        Ok(mut d) => d.press_switch(),
        Err(_) => {
            debug!("switch {:?} points at missing door {:?}", me, door);
            return;
        }
    }
    frame.message("A door opened somewhere");
}

/// Spin items, blink aging power-ups and schedule their removal.
pub fn pickup_system(frame: &mut Frame<'_>) {
    let delta = frame.delta();
    let spin = ITEM_SPIN_RATE * delta;
    for (_, (transform, _)) in frame
        .world
        .query_mut::<(&mut Transform, &Tag)>()
        .into_iter()
        .filter(|(_, (_, tag))| **tag == Tag::Item)
    {
        transform.forward = transform.forward.rotate_yaw(spin);
    }

    let fade_after = frame.settings().powerup_fade_after;
    let fade_duration = frame.settings().powerup_fade_duration;
    let interval = frame.settings().powerup_blink_interval;

    let mut expiring = Vec::new();
    for (entity, power_up) in frame.world.query_mut::<&mut PowerUp>() {
        if power_up.persistent {
            continue;
        }
        power_up.age += delta;
        if power_up.age < fade_after {
            continue;
        }
        if !power_up.expiring {
            power_up.expiring = true;
            expiring.push(entity);
        }
        // Hidden on even half-periods, starting with the first
        let phase = ((power_up.age - fade_after) / interval).floor() as u64;
        let visible = phase % 2 == 1;
        if visible != power_up.visible {
            power_up.visible = visible;
            frame.host.set_visible(entity, visible);
        }
    }
    for entity in expiring {
        debug!("power-up {:?} fading out", entity);
        frame.destroy(entity, fade_duration);
    }
}
