//! Flight and impact of projectiles.

use hecs::Entity;
use log::debug;

use crate::components::{Character, Inactive, Projectile, Tag, Transform};
use crate::context::Frame;
use crate::events::{Contact, ContactPhase};

/// Integrate positions and expire projectiles past their lifetime.
pub fn projectile_system(frame: &mut Frame<'_>) {
    let delta = frame.delta();
    let mut expired = Vec::new();
    for (entity, (transform, projectile)) in frame
        .world
        .query_mut::<(&mut Transform, &mut Projectile)>()
    {
        transform.position += projectile.velocity * delta;
        projectile.remaining -= delta;
        if projectile.remaining <= 0.0 {
            expired.push(entity);
        }
    }
    for entity in expired {
        frame.destroy(entity, 0.0);
    }
}

/// Something entered a projectile's collider.
pub fn handle_projectile_contact(frame: &mut Frame<'_>, me: Entity, contact: Contact) {
    if contact.phase != ContactPhase::Enter || frame.is_destroying(me) {
        return;
    }
    let Some((damage, owner, hits)) = frame
        .world
        .get::<&Projectile>(me)
        .ok()
        .map(|p| (p.damage, p.owner, p.hits.clone()))
    else {
        return;
    };
    let other = contact.other;
    if Some(other) == owner {
        return;
    }
    let tag = frame
        .world
        .get::<&Tag>(other)
        .map(|t| *t)
        .unwrap_or(Tag::Untagged);
    if matches!(tag, Tag::Item | Tag::Projectile) {
        return;
    }

    let alive = frame.world.get::<&Inactive>(other).is_err()
        && frame
            .world
            .get::<&Character>(other)
            .map(|c| !c.dead)
            .unwrap_or(false);
    if alive && tag.is_any(&hits) {
        debug!("projectile {:?} hit {:?} for {}", me, other, damage);
        frame.ctx.inbox.push(other, damage, owner);
    }
    frame.destroy(me, 0.0);
}
