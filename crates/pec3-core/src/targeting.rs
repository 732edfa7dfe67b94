//! Threat registry maintenance: candidate sensing, nearest-target resolution
//! and the forced-target (aggro) override.

use hecs::{Entity, World};
use log::debug;
use pec3_logic::targeting::resolve_nearest;
use pec3_logic::Vec3;

use crate::components::{Character, CharacterKind, Inactive, Tag, ThreatRegistry, Transform};
use crate::context::Frame;
use crate::events::{Contact, ContactPhase, Zone};
use crate::host::SoundCue;
use crate::states::state_for;

/// Position of `entity` if it is alive, active and still in the world.
pub fn locate_live(world: &World, entity: Entity) -> Option<Vec3> {
    if world.get::<&Inactive>(entity).is_ok() {
        return None;
    }
    if let Ok(character) = world.get::<&Character>(entity) {
        if character.dead {
            return None;
        }
    }
    world.get::<&Transform>(entity).ok().map(|t| t.position)
}

/// Like [`locate_live`], additionally requiring a tag from `tags`.
pub fn locate_target(world: &World, entity: Entity, tags: &[Tag]) -> Option<Vec3> {
    let tag = *world.get::<&Tag>(entity).ok()?;
    if !tag.is_any(tags) {
        return None;
    }
    locate_live(world, entity)
}

fn kind_of(world: &World, entity: Entity) -> Option<CharacterKind> {
    world.get::<&Character>(entity).ok().map(|c| c.kind)
}

/// Recompute `target` as the nearest valid candidate, pruning stale ones.
///
/// Acquiring a new non-null target plays the detection cue: neutrals get
/// scared, everyone else starts hunting.
pub fn set_target(frame: &mut Frame<'_>, me: Entity) {
    let Some(kind) = kind_of(frame.world, me) else {
        return;
    };
    let tags = state_for(kind).target_tags();
    let Ok(origin) = frame.world.get::<&Transform>(me).map(|t| t.position) else {
        return;
    };
    let (candidates, previous) = match frame.world.get::<&ThreatRegistry>(me) {
        Ok(registry) => (registry.candidates.clone(), registry.target),
        Err(_) => return,
    };

    let world: &World = frame.world;
    let (nearest, pruned) = resolve_nearest(origin, &candidates, |h| locate_target(world, h, tags));
    if pruned.len() != candidates.len() {
        debug!(
            "{:?} pruned {} stale candidates",
            me,
            candidates.len() - pruned.len()
        );
    }

    if let Ok(mut registry) = frame.world.get::<&mut ThreatRegistry>(me) {
        registry.candidates = pruned;
        registry.target = nearest;
    }

    if nearest != previous {
        match nearest {
            Some(target) => {
                debug!("{:?} ({}) acquired target {:?}", me, kind, target);
                let cue = if kind == CharacterKind::Neutral {
                    SoundCue::Scared
                } else {
                    SoundCue::Detect
                };
                frame.host.play_sound(me, cue);
            }
            None => debug!("{:?} ({}) lost its target", me, kind),
        }
    }
}

/// Register `other` as a candidate if its tag is hunted by `me`'s variant.
pub fn add_candidate(frame: &mut Frame<'_>, me: Entity, other: Entity) -> bool {
    let Some(kind) = kind_of(frame.world, me) else {
        return false;
    };
    let Ok(tag) = frame.world.get::<&Tag>(other).map(|t| *t) else {
        return false;
    };
    if !tag.is_any(state_for(kind).target_tags()) {
        return false;
    }
    let added = match frame.world.get::<&mut ThreatRegistry>(me) {
        Ok(mut registry) => registry.add(other),
        Err(_) => false,
    };
    if added {
        set_target(frame, me);
    }
    added
}

pub fn remove_candidate(frame: &mut Frame<'_>, me: Entity, other: Entity) -> bool {
    let removed = match frame.world.get::<&mut ThreatRegistry>(me) {
        Ok(mut registry) => registry.remove(other),
        Err(_) => false,
    };
    if removed {
        set_target(frame, me);
    }
    removed
}

/// Point `me`'s aggro at `attacker`.
pub fn force_target(world: &mut World, me: Entity, attacker: Entity) {
    if me == attacker {
        return;
    }
    if let Ok(mut registry) = world.get::<&mut ThreatRegistry>(me) {
        registry.forced_target = Some(attacker);
    }
}

/// Drop the forced target if it is `other`.
pub fn release_forced(world: &mut World, me: Entity, other: Entity) {
    if let Ok(mut registry) = world.get::<&mut ThreatRegistry>(me) {
        if registry.forced_target == Some(other) {
            registry.forced_target = None;
        }
    }
}

/// The entity `me` should act against this frame: a valid forced target
/// first, otherwise the nearest candidate. Stale slots are cleared on the
/// way.
pub fn current_target(frame: &mut Frame<'_>, me: Entity) -> Option<(Entity, Vec3)> {
    let (forced, target) = {
        let registry = frame.world.get::<&ThreatRegistry>(me).ok()?;
        (registry.forced_target, registry.target)
    };

    if let Some(forced) = forced {
        match locate_live(frame.world, forced) {
            Some(position) => return Some((forced, position)),
            None => {
                debug!("{:?} dropped stale forced target {:?}", me, forced);
                release_forced(frame.world, me, forced);
            }
        }
    }

    let target = target?;
    let tags = state_for(kind_of(frame.world, me)?).target_tags();
    if let Some(position) = locate_target(frame.world, target, tags) {
        return Some((target, position));
    }
    set_target(frame, me);
    let target = frame.world.get::<&ThreatRegistry>(me).ok()?.target?;
    locate_target(frame.world, target, tags).map(|p| (target, p))
}

/// Shared inner/outer zone handling for every sensing variant.
pub fn handle_sensing(frame: &mut Frame<'_>, me: Entity, contact: Contact) {
    match (contact.zone, contact.phase) {
        (Zone::Inner, ContactPhase::Enter | ContactPhase::Stay) => {
            add_candidate(frame, me, contact.other);
        }
        (Zone::Inner, ContactPhase::Exit) => {
            remove_candidate(frame, me, contact.other);
        }
        (Zone::Outer, ContactPhase::Exit) => release_forced(frame.world, me, contact.other),
        _ => {}
    }
}
