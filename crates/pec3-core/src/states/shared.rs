//! Movement and start-of-life helpers shared by the AI-driven variants.

use hecs::Entity;
use pec3_logic::motion::{
    chase_step, face_towards, flee_destination, interval_elapsed, random_flee_yaw,
    random_point_in_sphere,
};
use pec3_logic::Vec3;

use super::CharacterState;
use crate::combat;
use crate::components::{Character, CharacterKind, CharacterStats, Transform};
use crate::context::Frame;
use crate::error::{GameResult, InitError};
use crate::host::{AnimParam, ParticleFx, SoundCue, ALL_LAYERS};
use crate::targeting::current_target;

/// Acceleration is always twice the requested speed.
const ACCELERATION_FACTOR: f32 = 2.0;

fn missing(me: Entity, component: &'static str) -> InitError {
    InitError::MissingComponent {
        entity: me,
        component,
    }
}

/// Reset the animator and apply speed scaling, plus difficulty scaling of
/// vitals and melee damage for hostile kinds.
pub(super) fn start_ai(
    frame: &mut Frame<'_>,
    me: Entity,
    scale_by_difficulty: bool,
) -> Result<(), InitError> {
    let stats = frame
        .world
        .get::<&CharacterStats>(me)
        .map(|s| (*s).clone())
        .map_err(|_| missing(me, "CharacterStats"))?;
    let difficulty = frame.settings().difficulty;
    let game_speed = frame.settings().game_speed;
    {
        let mut c = frame
            .world
            .get::<&mut Character>(me)
            .map_err(|_| missing(me, "Character"))?;
        c.move_speed = stats.move_speed * game_speed;
        c.sprint_speed = stats.sprint_speed * game_speed;
        if scale_by_difficulty {
            c.vitals = stats.full_vitals().scaled(difficulty);
            c.melee_damage = stats.melee_damage * difficulty;
        }
    }
    frame.host.rebind(me);
    Ok(())
}

/// Forward the navigation agent's speed to the animator.
pub(super) fn report_speed(frame: &mut Frame<'_>, me: Entity) {
    let speed = frame.host.velocity(me).length();
    frame.host.set_float(me, AnimParam::Speed, speed);
    let motion = if speed > 0.0 { 1.0 } else { 0.0 };
    frame.host.set_float(me, AnimParam::MotionSpeed, motion);
}

fn pose(frame: &Frame<'_>, me: Entity) -> Option<(Vec3, CharacterStats)> {
    let position = frame.world.get::<&Transform>(me).ok()?.position;
    let stats = (*frame.world.get::<&CharacterStats>(me).ok()?).clone();
    Some((position, stats))
}

/// Chase the current target, or wander when there is none.
pub(super) fn hunt(state: &dyn CharacterState, frame: &mut Frame<'_>, me: Entity) {
    match current_target(frame, me) {
        Some((_, position)) => state.chase(frame, me, position),
        None => state.wander(frame, me),
    }
}

pub(super) fn wander(frame: &mut Frame<'_>, me: Entity) {
    let Some((position, stats)) = pose(frame, me) else {
        return;
    };
    let delta = frame.delta();
    let (speed, due) = {
        let Ok(mut c) = frame.world.get::<&mut Character>(me) else {
            return;
        };
        let due = interval_elapsed(&mut c.wander_timer, delta, stats.wander_time);
        (c.move_speed, due)
    };
    frame
        .host
        .set_speed(me, speed, speed * ACCELERATION_FACTOR);
    if !due {
        return;
    }

    let point = random_point_in_sphere(position, stats.wander_radius, &mut frame.ctx.rng);
    if let Some(point) = frame
        .host
        .sample_position(point, stats.wander_radius, ALL_LAYERS)
    {
        frame.host.set_destination(me, point);
    }
    if let Ok(mut c) = frame.world.get::<&mut Character>(me) {
        c.wander_timer = 0.0;
    }
}

/// Sprint toward `target`; swing once in reach.
pub(super) fn chase(state: &dyn CharacterState, frame: &mut Frame<'_>, me: Entity, target: Vec3) {
    let Some((position, stats)) = pose(frame, me) else {
        return;
    };
    let Ok(speed) = frame.world.get::<&Character>(me).map(|c| c.sprint_speed) else {
        return;
    };
    frame
        .host
        .set_speed(me, speed, speed * ACCELERATION_FACTOR);

    if position.distance(&target) <= stats.attack_distance {
        if let Ok(mut transform) = frame.world.get::<&mut Transform>(me) {
            transform.forward = face_towards(position, target, transform.forward);
        }
        state.attack(frame, me);
    } else {
        frame.host.set_destination(me, chase_step(position, target));
    }
}

/// Sprint away from `threat` at a random angle.
pub(super) fn flee(frame: &mut Frame<'_>, me: Entity, threat: Vec3) {
    let Some((position, _)) = pose(frame, me) else {
        return;
    };
    let Ok(speed) = frame.world.get::<&Character>(me).map(|c| c.sprint_speed) else {
        return;
    };
    frame
        .host
        .set_speed(me, speed, speed * ACCELERATION_FACTOR);
    let yaw = random_flee_yaw(&mut frame.ctx.rng);
    frame
        .host
        .set_destination(me, flee_destination(position, threat, yaw));
    if let Ok(mut c) = frame.world.get::<&mut Character>(me) {
        c.flee_timer = 0.0;
    }
}

/// Hold position while the flee delay runs, then flee.
pub(super) fn evade(state: &dyn CharacterState, frame: &mut Frame<'_>, me: Entity) {
    let Some((_, threat)) = current_target(frame, me) else {
        state.wander(frame, me);
        return;
    };
    let Ok(flee_time) = frame.world.get::<&CharacterStats>(me).map(|s| s.flee_time) else {
        return;
    };
    let delta = frame.delta();
    let due = match frame.world.get::<&mut Character>(me) {
        Ok(mut c) => interval_elapsed(&mut c.flee_timer, delta, flee_time),
        Err(_) => return,
    };
    if due {
        state.flee(frame, me, threat);
    }
}

pub(super) fn is_dead(frame: &Frame<'_>, me: Entity) -> bool {
    frame
        .world
        .get::<&Character>(me)
        .map(|c| c.dead)
        .unwrap_or(true)
}

/// Rise again as an enemy once the death animation is over.
pub(super) fn rebirth(frame: &mut Frame<'_>, me: Entity) -> GameResult<()> {
    combat::change_type(frame, me, CharacterKind::Enemy)?;
    frame.host.set_particle_active(me, ParticleFx::Rebirth, true);
    frame.host.play_sound(me, SoundCue::Rebirth);
    Ok(())
}
