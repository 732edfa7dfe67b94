//! Combat resolution shared by the character variants: attack and shot
//! gating, hit-scans, damage and restoration, death, explosion, loot and
//! kind changes.

use hecs::Entity;
use log::{debug, info, warn};
use pec3_logic::drops::decide_drop;
use pec3_logic::Vec3;

use crate::components::{
    Capabilities, Character, CharacterKind, CharacterStats, Inactive, Loot, PlayerSenses, Tag,
    ThreatRegistry, Transform,
};
use crate::context::Frame;
use crate::error::{GameResult, InitError};
use crate::host::{AnimParam, ParticleFx, SoundCue, ALL_LAYERS};
use crate::sequences::{schedule, Sequences, Task};
use crate::spawning::{spawn_prefab, spawn_projectile};
use crate::states::state_for;

fn stats_of(frame: &Frame<'_>, me: Entity) -> Result<CharacterStats, InitError> {
    frame
        .world
        .get::<&CharacterStats>(me)
        .map(|s| (*s).clone())
        .map_err(|_| InitError::MissingComponent {
            entity: me,
            component: "CharacterStats",
        })
}

/// Start a melee attack unless one is in flight or the cooldown is running.
///
/// The hit-scan is resolved when the windup's attack-complete signal
/// arrives.
pub fn try_attack(frame: &mut Frame<'_>, me: Entity) -> bool {
    let Ok(rate) = frame.world.get::<&CharacterStats>(me).map(|s| s.attack_rate) else {
        return false;
    };
    let now = frame.now();
    {
        let Ok(mut c) = frame.world.get::<&mut Character>(me) else {
            return false;
        };
        if c.dead || !c.attack_ready(now, rate) {
            return false;
        }
        c.attacking = true;
        c.attack_landed = false;
        c.last_attack_time = now;
    }
    frame.host.set_trigger(me, AnimParam::Attacking);
    frame.host.play_sound(me, SoundCue::Attack);
    schedule(frame, me, Task::AttackWindup);
    debug!("{:?} started an attack at {:.2}s", me, now);
    true
}

/// Forward ray from chest height; a live hunted character in reach is
/// damaged and turns its aggro on the attacker.
pub fn melee_hit_scan(frame: &mut Frame<'_>, me: Entity) {
    let Ok((kind, damage)) = frame
        .world
        .get::<&Character>(me)
        .map(|c| (c.kind, c.melee_damage))
    else {
        return;
    };
    let Ok(reach) = frame.world.get::<&CharacterStats>(me).map(|s| s.attack_distance) else {
        return;
    };
    let Ok((position, forward)) = frame
        .world
        .get::<&Transform>(me)
        .map(|t| (t.position, t.forward))
    else {
        return;
    };

    let origin = position + Vec3::UP * frame.settings().attack_ray_height;
    let Some(hit) = frame.host.raycast(origin, forward, reach, ALL_LAYERS) else {
        return;
    };
    if hit.entity == me || !hit.tag.is_any(state_for(kind).target_tags()) {
        return;
    }
    let alive = frame
        .world
        .get::<&Character>(hit.entity)
        .map(|c| !c.dead)
        .unwrap_or(false);
    if !alive {
        return;
    }
    debug!("{:?} hit {:?} for {}", me, hit.entity, damage);
    frame.ctx.inbox.push(hit.entity, damage, Some(me));
}

/// Fire the configured projectile from `spawn` along `direction`.
pub fn try_shoot(
    frame: &mut Frame<'_>,
    me: Entity,
    spawn: Vec3,
    direction: Vec3,
) -> GameResult<bool> {
    let stats = stats_of(frame, me)?;
    let Some(projectile) = stats.projectile else {
        return Ok(false);
    };
    let now = frame.now();
    {
        let Ok(mut c) = frame.world.get::<&mut Character>(me) else {
            return Ok(false);
        };
        if c.dead || !c.shot_ready(now, stats.shoot_rate) {
            return Ok(false);
        }
        c.shooting_started = true;
        c.shooting_finished = false;
        c.last_shoot_time = now;
    }
    spawn_projectile(frame, &projectile, spawn, direction, Some(me))?;
    frame.host.set_bool(me, AnimParam::Shooting, true);
    schedule(frame, me, Task::ShootRelease);
    debug!("{:?} fired {}", me, projectile);
    Ok(true)
}

fn refresh_bars(frame: &mut Frame<'_>, me: Entity) {
    let Ok((kind, vitals)) = frame.world.get::<&Character>(me).map(|c| (c.kind, c.vitals)) else {
        return;
    };
    if kind == CharacterKind::Player {
        frame
            .host
            .update_health_shield_bars(vitals.health, vitals.shield);
    }
}

/// Absorb `amount` through the shield/health split.
///
/// Ignored while a hit is being resolved or once dead. Depleted health
/// hands over to the variant's death path.
pub fn apply_damage(frame: &mut Frame<'_>, me: Entity, amount: f32) {
    let (kind, vitals) = {
        let Ok(mut c) = frame.world.get::<&mut Character>(me) else {
            return;
        };
        if c.hit || c.dead {
            return;
        }
        c.hit = true;
        c.vitals.absorb(amount);
        (c.kind, c.vitals)
    };

    frame.host.set_trigger(me, AnimParam::Hit);
    frame.host.set_particle_active(me, ParticleFx::Hit, true);
    frame.host.set_particle_active(me, ParticleFx::HitBurst, true);
    frame.host.play_sound(me, SoundCue::Hit);
    refresh_bars(frame, me);
    debug!(
        "{:?} took {} damage: health {:.1}, shield {:.1}",
        me, amount, vitals.health, vitals.shield
    );

    if let Ok(mut c) = frame.world.get::<&mut Character>(me) {
        c.hit = false;
    }
    if vitals.is_depleted() {
        state_for(kind).die(frame, me);
    } else {
        interrupt_attack(frame, me);
    }
}

/// The hit reaction cuts a swing short: its hit frame never plays, so the
/// windup is dropped and the next attack only waits on the cooldown.
fn interrupt_attack(frame: &mut Frame<'_>, me: Entity) {
    let interrupted = match frame.world.get::<&mut Character>(me) {
        Ok(mut c) if c.attacking => {
            c.attacking = false;
            c.attack_landed = false;
            true
        }
        _ => false,
    };
    if !interrupted {
        return;
    }
    if let Ok(mut sequences) = frame.world.get::<&mut Sequences>(me) {
        sequences.cancel_windup();
    }
    debug!("{:?} was hit mid-swing", me);
}

pub fn restore_health(frame: &mut Frame<'_>, me: Entity, multiplier: f32) {
    if let Ok(mut c) = frame.world.get::<&mut Character>(me) {
        c.vitals.restore_health(multiplier);
    }
    refresh_bars(frame, me);
}

pub fn restore_shield(frame: &mut Frame<'_>, me: Entity, multiplier: f32) {
    if let Ok(mut c) = frame.world.get::<&mut Character>(me) {
        c.vitals.restore_shield(multiplier);
    }
    refresh_bars(frame, me);
}

/// Latch death and cancel everything in flight. Idempotent.
pub fn die(frame: &mut Frame<'_>, me: Entity) -> bool {
    let kind = {
        let Ok(mut c) = frame.world.get::<&mut Character>(me) else {
            return false;
        };
        if c.dead {
            return false;
        }
        c.dead = true;
        c.life = c.life.wrapping_add(1);
        c.cancel_actions();
        c.kind
    };
    if let Ok(mut sequences) = frame.world.get::<&mut Sequences>(me) {
        sequences.clear();
    }
    frame.host.set_bool(me, AnimParam::Dead, true);
    frame.host.set_particle_active(me, ParticleFx::Death, true);
    frame.host.play_sound(me, SoundCue::Death);
    info!("{:?} ({}) died", me, kind);
    true
}

/// Blow the entity up, skipping the death sequence entirely.
pub fn explode(frame: &mut Frame<'_>, me: Entity) {
    if frame.is_destroying(me) {
        return;
    }
    if let Ok(mut c) = frame.world.get::<&mut Character>(me) {
        c.life = c.life.wrapping_add(1);
        c.cancel_actions();
    }
    if let Ok(mut sequences) = frame.world.get::<&mut Sequences>(me) {
        sequences.clear();
    }
    let _ = frame.world.insert_one(me, Inactive);

    frame.host.set_visible(me, false);
    frame
        .host
        .set_particle_active(me, ParticleFx::Explosion, true);
    frame.host.play_sound(me, SoundCue::Explosion);
    let delay = frame.settings().explosion_duration;
    frame.destroy(me, delay);
    info!("{:?} exploded", me);
}

/// Leave the configured loot above the corpse.
pub fn drop_item(frame: &mut Frame<'_>, me: Entity) -> GameResult<()> {
    let Ok(loot) = frame.world.get::<&Loot>(me).map(|l| (*l).clone()) else {
        return Ok(());
    };
    let Ok(position) = frame.world.get::<&Transform>(me).map(|t| t.position) else {
        return Ok(());
    };
    let chance = frame.settings().optional_drop_chance;
    let decision = decide_drop(
        loot.mandatory.as_ref(),
        &loot.optional,
        chance,
        &mut frame.ctx.rng,
    );
    let Some(item) = decision.item() else {
        debug!("{:?} dropped nothing", me);
        return Ok(());
    };
    let drop_at = position + Vec3::UP * frame.settings().drop_height;
    let dropped = spawn_prefab(frame, item, drop_at, Vec3::FORWARD)?;
    info!("{:?} dropped {} as {:?}", me, item, dropped);
    Ok(())
}

/// Latch the end of the death animation. `true` only the first time it is
/// reported for the current life.
pub fn finish_death(frame: &mut Frame<'_>, me: Entity) -> bool {
    let Ok(mut c) = frame.world.get::<&mut Character>(me) else {
        return false;
    };
    if !c.dead || c.death_finished {
        return false;
    }
    c.death_finished = true;
    true
}

/// Shrink the corpse away over the following frames.
pub fn begin_death_shrink(frame: &mut Frame<'_>, me: Entity) {
    schedule(frame, me, Task::DeathShrink);
}

/// Re-type `me` as `kind`: full property reset from base stats, registry
/// and sequences cleared, then the new variant starts.
///
/// Leaving the Player kind strips the player control surfaces and hands the
/// body to AI navigation.
pub fn change_type(frame: &mut Frame<'_>, me: Entity, kind: CharacterKind) -> GameResult<()> {
    let stats = stats_of(frame, me)?;
    let previous = {
        let mut c = frame
            .world
            .get::<&mut Character>(me)
            .map_err(|_| InitError::MissingComponent {
                entity: me,
                component: "Character",
            })?;
        let previous = c.kind;
        c.reset(kind, &stats);
        previous
    };

    if let Ok(mut registry) = frame.world.get::<&mut ThreatRegistry>(me) {
        registry.clear();
    }
    if let Ok(mut sequences) = frame.world.get::<&mut Sequences>(me) {
        sequences.clear();
    }
    if let Ok(mut transform) = frame.world.get::<&mut Transform>(me) {
        transform.scale = 1.0;
    }
    if let Ok(mut tag) = frame.world.get::<&mut Tag>(me) {
        *tag = kind.tag();
    }

    if previous == CharacterKind::Player && kind != CharacterKind::Player {
        if let Ok(mut caps) = frame.world.get::<&mut Capabilities>(me) {
            caps.remove(Capabilities::PLAYER_CONTROLS);
            caps.insert(Capabilities::AI_NAVIGATION);
        }
        if frame.world.remove_one::<PlayerSenses>(me).is_err() {
            warn!("{:?} left the Player kind without player senses", me);
        }
        frame.host.set_look_at(me, None);
    }

    info!("{:?} changed from {} to {}", me, previous, kind);
    state_for(kind).start_state(frame, me)?;
    Ok(())
}
