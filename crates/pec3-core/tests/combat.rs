//! Integration tests for damage, attacks, shots, death and kind changes.
//!
//! Every scenario runs through `GameEngine::update` against a recording host.

mod common;

use approx::assert_relative_eq;
use common::Arena;
use pec3_core::components::*;
use pec3_core::config::GameSettings;
use pec3_core::events::{Contact, PlayerInput, Zone};
use pec3_core::host::{AnimParam, AnimationEvent, ParticleFx, RayHit, SoundCue};
use pec3_core::sequences::{Sequences, Task};
use pec3_core::spawning::spawn_projectile;
use pec3_core::states::state_for;
use pec3_logic::Vec3;

fn at(x: f32, z: f32) -> Vec3 {
    Vec3::new(x, 0.0, z)
}

// ── Damage ─────────────────────────────────────────────────────────────

#[test]
fn damage_splits_between_shield_and_health() {
    let mut arena = Arena::new();
    let grunt = arena.spawn("grunt", at(0.0, 0.0));

    arena.damage(grunt, 30.0, None);
    arena.step();
    let c = arena.character(grunt);
    assert_relative_eq!(c.vitals.health, 97.0, epsilon = 1e-4);
    assert_relative_eq!(c.vitals.shield, 73.0, epsilon = 1e-4);
    assert!(!c.dead);
    assert_eq!(arena.host.trigger_count(grunt, AnimParam::Hit), 1);
    assert_eq!(arena.host.sound_count(grunt, SoundCue::Hit), 1);
}

#[test]
fn shield_shortfall_spills_into_health() {
    let mut arena = Arena::new();
    let grunt = arena.spawn("grunt", at(0.0, 0.0));
    arena.damage(grunt, 100.0, None);
    arena.step();
    arena.damage(grunt, 50.0, None);
    arena.step();
    let c = arena.character(grunt);
    // 100 -> (90, 10); 50 -> health 85, shield 10 - 45 = -35 -> health 50
    assert_relative_eq!(c.vitals.shield, 0.0, epsilon = 1e-4);
    assert_relative_eq!(c.vitals.health, 50.0, epsilon = 1e-4);
    let lost = 200.0 - c.vitals.health - c.vitals.shield;
    assert_relative_eq!(lost, 150.0, epsilon = 1e-4);
}

#[test]
fn lethal_damage_kills_once_and_corpse_ignores_more() {
    let mut arena = Arena::new();
    let grunt = arena.spawn("grunt", at(0.0, 0.0));

    arena.damage(grunt, 500.0, None);
    arena.damage(grunt, 500.0, None);
    arena.step();
    let c = arena.character(grunt);
    assert!(c.dead);
    assert_eq!(arena.host.sound_count(grunt, SoundCue::Death), 1);
    assert_eq!(arena.host.last_bool(grunt, AnimParam::Dead), Some(true));

    let before = c.vitals;
    arena.damage(grunt, 10.0, None);
    arena.step();
    assert_eq!(arena.character(grunt).vitals, before);
}

#[test]
fn difficulty_scales_hostile_vitals() {
    let settings = GameSettings {
        difficulty: 2.0,
        ..GameSettings::default()
    };
    let mut arena = Arena::with(settings, vec![]);
    let grunt = arena.spawn("grunt", at(0.0, 0.0));
    let boss = arena.spawn("boss", at(-5.0, 0.0));
    let buddy = arena.spawn("buddy", at(5.0, 0.0));
    let grunt = arena.character(grunt);
    assert_relative_eq!(grunt.vitals.max_health, 200.0);
    assert_relative_eq!(grunt.melee_damage, 20.0);
    assert_relative_eq!(arena.character(boss).vitals.max_shield, 200.0);
    assert_relative_eq!(arena.character(buddy).vitals.max_health, 100.0);
}

// ── Melee ──────────────────────────────────────────────────────────────

#[test]
fn attack_is_rejected_while_one_is_in_flight() {
    let mut arena = Arena::new();
    let grunt = arena.spawn("grunt", at(0.0, 0.0));
    arena.run(1.0);

    let enemy = state_for(CharacterKind::Enemy);
    let mut frame = arena.engine.frame(&mut arena.host);
    assert!(enemy.attack(&mut frame, grunt));
    assert!(!enemy.attack(&mut frame, grunt));
    drop(frame);
    assert_eq!(arena.host.trigger_count(grunt, AnimParam::Attacking), 1);
    assert!(arena.character(grunt).attacking);
}

#[test]
fn attack_waits_for_cooldown() {
    let mut arena = Arena::new();
    let grunt = arena.spawn("grunt", at(0.0, 0.0));
    arena.step();
    let mut frame = arena.engine.frame(&mut arena.host);
    // Fresh characters wait one attack interval
    assert!(!state_for(CharacterKind::Enemy).attack(&mut frame, grunt));
}

#[test]
fn player_swing_lands_on_attack_complete() {
    let mut arena = Arena::new();
    let player = arena.spawn("player", at(0.0, 0.0));
    let grunt = arena.spawn("grunt", at(0.0, 1.0));
    arena.run(1.0);
    arena.host.ray_hit = Some(RayHit {
        point: at(0.0, 1.0),
        tag: Tag::Enemy,
        entity: grunt,
    });

    arena.input(player, PlayerInput::Attack(true));
    arena.step();
    arena.step();
    assert!(arena.character(player).attacking);
    assert_eq!(arena.host.trigger_count(player, AnimParam::Attacking), 1);
    assert!(arena.character(grunt).vitals.shield_full());

    arena.animation(player, AnimationEvent::AttackComplete);
    arena.step();
    arena.step();
    assert!(!arena.character(player).attacking);
    let victim = arena.character(grunt);
    assert_relative_eq!(victim.vitals.shield, 91.0, epsilon = 1e-4);
    assert_relative_eq!(victim.vitals.health, 99.0, epsilon = 1e-4);

    // The victim's aggro turns on the attacker
    let forced = arena
        .engine
        .world()
        .get::<&ThreatRegistry>(grunt)
        .map(|r| r.forced_target)
        .unwrap();
    assert_eq!(forced, Some(player));
}

#[test]
fn swing_misses_untargeted_tags() {
    let mut arena = Arena::new();
    let player = arena.spawn("player", at(0.0, 0.0));
    let villager = arena.spawn("villager", at(0.0, 1.0));
    arena.run(1.0);
    arena.host.ray_hit = Some(RayHit {
        point: at(0.0, 1.0),
        tag: Tag::Neutral,
        entity: villager,
    });
    arena.input(player, PlayerInput::Attack(true));
    arena.step();
    arena.animation(player, AnimationEvent::AttackComplete);
    arena.step();
    arena.step();
    assert!(arena.character(villager).vitals.shield_full());
}

#[test]
fn enemy_chases_and_strikes_sensed_player() {
    let mut arena = Arena::new();
    let player = arena.spawn("player", at(0.0, 0.0));
    let grunt = arena.spawn("grunt", at(0.0, 1.0));
    arena.run(1.0);

    arena.trigger(grunt, Contact::enter(Zone::Inner, player));
    arena.step();
    let registry = arena
        .engine
        .world()
        .get::<&ThreatRegistry>(grunt)
        .map(|r| (*r).clone())
        .unwrap();
    assert_eq!(registry.target, Some(player));
    assert_eq!(arena.host.sound_count(grunt, SoundCue::Detect), 1);

    // In reach: the next update swings
    arena.step();
    assert!(arena.character(grunt).attacking);
}

#[test]
fn hit_mid_swing_interrupts_and_swings_again_after_cooldown() {
    let mut arena = Arena::new();
    let player = arena.spawn("player", at(0.0, 0.0));
    let grunt = arena.spawn("grunt", at(0.0, 1.0));
    arena.run(1.0);
    arena.trigger(grunt, Contact::enter(Zone::Inner, player));
    arena.step();
    arena.step();
    assert!(arena.character(grunt).attacking);

    // The hit reaction cuts the swing before its hit frame
    arena.damage(grunt, 1.0, None);
    arena.step();
    assert!(!arena.character(grunt).attacking);
    let windups = arena
        .engine
        .world()
        .get::<&Sequences>(grunt)
        .unwrap()
        .iter()
        .filter(|s| s.task == Task::AttackWindup)
        .count();
    assert_eq!(windups, 0);
    assert_eq!(arena.host.trigger_count(grunt, AnimParam::Attacking), 1);

    arena.run(1.1);
    assert_eq!(arena.host.trigger_count(grunt, AnimParam::Attacking), 2);
    assert!(arena.character(grunt).attacking);
}

// ── Sensing and targets ────────────────────────────────────────────────

fn registry(arena: &Arena, entity: hecs::Entity) -> ThreatRegistry {
    arena
        .engine
        .world()
        .get::<&ThreatRegistry>(entity)
        .map(|r| (*r).clone())
        .unwrap()
}

#[test]
fn leaving_the_outer_zone_drops_aggro_but_keeps_the_target() {
    let mut arena = Arena::new();
    let player = arena.spawn("player", at(0.0, 0.0));
    let grunt = arena.spawn("grunt", at(0.0, 3.0));
    arena.trigger(grunt, Contact::enter(Zone::Inner, player));
    arena.damage(grunt, 10.0, Some(player));
    arena.step();
    let r = registry(&arena, grunt);
    assert_eq!(r.forced_target, Some(player));
    assert_eq!(r.target, Some(player));

    arena.trigger(grunt, Contact::exit(Zone::Outer, player));
    arena.step();
    let r = registry(&arena, grunt);
    assert_eq!(r.forced_target, None);
    assert_eq!(r.target, Some(player));
    assert_eq!(r.candidates, vec![player]);
}

#[test]
fn neutral_gets_scared_then_flees_on_its_delay() {
    let mut arena = Arena::new();
    let villager = arena.spawn("villager", at(0.0, 0.0));
    let grunt = arena.spawn("grunt", at(0.0, 3.0));
    arena.trigger(villager, Contact::enter(Zone::Inner, grunt));
    arena.step();
    assert_eq!(registry(&arena, villager).target, Some(grunt));
    assert_eq!(arena.host.sound_count(villager, SoundCue::Scared), 1);
    assert_eq!(arena.host.sound_count(villager, SoundCue::Detect), 0);
    assert_eq!(arena.host.last_destination(villager), None);

    // Primed at spawn: the first flee is immediate
    arena.step();
    let away = arena.host.last_destination(villager).unwrap();
    // Flee points are the threat offset turned about the vertical axis
    assert_relative_eq!(away.length(), 3.0, epsilon = 1e-3);
    let c = arena.character(villager);
    let sprint = arena
        .host
        .speeds
        .iter()
        .rev()
        .find(|(e, _, _)| *e == villager)
        .map(|(_, speed, _)| *speed)
        .unwrap();
    assert_relative_eq!(sprint, c.sprint_speed);

    let fled = |arena: &Arena| {
        arena
            .host
            .destinations
            .iter()
            .filter(|(e, _)| *e == villager)
            .count()
    };
    arena.run(0.9);
    assert_eq!(fled(&arena), 1);
    arena.run(0.2);
    assert_eq!(fled(&arena), 2);
}

#[test]
fn dead_target_is_pruned_and_hunter_wanders() {
    let mut arena = Arena::new();
    let villager = arena.spawn("villager", at(0.0, 3.0));
    let grunt = arena.spawn("grunt", at(0.0, 0.0));
    arena.trigger(grunt, Contact::enter(Zone::Inner, villager));
    arena.step();
    assert_eq!(registry(&arena, grunt).target, Some(villager));

    arena.damage(villager, 1000.0, None);
    arena.step();
    arena.step();
    let r = registry(&arena, grunt);
    assert_eq!(r.target, None);
    assert!(r.candidates.is_empty());

    // Back to wandering pace
    let c = arena.character(grunt);
    let (_, speed, acceleration) = *arena
        .host
        .speeds
        .iter()
        .rev()
        .find(|(e, _, _)| *e == grunt)
        .unwrap();
    assert_relative_eq!(speed, c.move_speed);
    assert_relative_eq!(acceleration, c.move_speed * 2.0);
}

#[test]
fn despawned_target_is_pruned() {
    let mut arena = Arena::new();
    let player = arena.spawn("player", at(0.0, 3.0));
    let buddy = arena.spawn("buddy", at(0.0, 4.0));
    let grunt = arena.spawn("grunt", at(0.0, 0.0));
    arena.trigger(grunt, Contact::enter(Zone::Inner, player));
    arena.trigger(grunt, Contact::enter(Zone::Inner, buddy));
    arena.step();
    assert_eq!(registry(&arena, grunt).target, Some(player));

    arena.engine.world.despawn(player).unwrap();
    arena.step();
    let r = registry(&arena, grunt);
    assert_eq!(r.target, Some(buddy));
    assert_eq!(r.candidates, vec![buddy]);
}

// ── Ranged ─────────────────────────────────────────────────────────────

#[test]
fn charged_shot_fires_and_releases() {
    let mut arena = Arena::new();
    let player = arena.spawn("player", at(0.0, 0.0));
    arena.run(1.0);

    arena.input(player, PlayerInput::Aim(true));
    arena.input(player, PlayerInput::AimAt(at(0.0, 10.0)));
    arena.step();
    arena.step();
    assert_eq!(arena.host.last_bool(player, AnimParam::Charging), Some(true));
    arena.animation(player, AnimationEvent::ChargeComplete);
    arena.input(player, PlayerInput::Shoot(true));
    arena.step();
    arena.step();

    assert_eq!(arena.count::<Projectile>(), 1);
    assert_eq!(arena.host.last_bool(player, AnimParam::Shooting), Some(true));
    assert!(arena.character(player).shooting_started);

    arena.animation(player, AnimationEvent::ShootComplete);
    arena.step();
    arena.step();
    assert_eq!(arena.host.last_bool(player, AnimParam::Shooting), Some(false));
    let c = arena.character(player);
    assert!(!c.shooting && !c.shooting_started && !c.shooting_finished);
}

#[test]
fn shooting_before_charge_is_cancelled() {
    let mut arena = Arena::new();
    let player = arena.spawn("player", at(0.0, 0.0));
    arena.run(1.0);

    arena.input(player, PlayerInput::Aim(true));
    arena.input(player, PlayerInput::Shoot(true));
    arena.step();
    arena.step();
    assert_eq!(arena.count::<Projectile>(), 0);
    assert!(!arena.character(player).shooting);
}

#[test]
fn projectile_damages_enemy_and_is_destroyed() {
    let mut arena = Arena::new();
    let player = arena.spawn("player", at(0.0, 0.0));
    let grunt = arena.spawn("grunt", at(0.0, 5.0));
    let bolt = {
        let mut frame = arena.engine.frame(&mut arena.host);
        spawn_projectile(&mut frame, &"bolt".into(), at(0.0, 1.0), at(0.0, 1.0), Some(player))
            .unwrap()
    };

    // The shooter's own body does not stop it
    arena.trigger(bolt, Contact::enter(Zone::Body, player));
    arena.step();
    assert!(arena.exists(bolt));

    arena.trigger(bolt, Contact::enter(Zone::Body, grunt));
    arena.step();
    assert!(!arena.exists(bolt));
    let victim = arena.character(grunt);
    // 25 damage: health 97.5, shield 77.5
    assert_relative_eq!(victim.vitals.health, 97.5, epsilon = 1e-4);
    assert_relative_eq!(victim.vitals.shield, 77.5, epsilon = 1e-4);
}

#[test]
fn projectile_expires_after_lifetime() {
    let mut arena = Arena::new();
    let bolt = arena.spawn("bolt", at(0.0, 0.0));
    arena.run(1.0);
    let position = arena
        .engine
        .world()
        .get::<&Transform>(bolt)
        .map(|t| t.position)
        .unwrap();
    assert!(position.z > 19.0);
    arena.run(4.5);
    assert!(!arena.exists(bolt));
}

// ── Death and kind changes ─────────────────────────────────────────────

#[test]
fn enemy_death_drops_loot_and_shrinks_away() {
    let mut arena = Arena::new();
    let carrier = arena.spawn("carrier", at(2.0, 2.0));
    arena.damage(carrier, 1000.0, None);
    arena.step();
    assert!(arena.character(carrier).dead);

    arena.animation(carrier, AnimationEvent::DeadComplete);
    arena.step();
    let keys: Vec<(Vec3, KeyColor)> = arena
        .engine
        .world()
        .query::<(&Transform, &KeyPickup)>()
        .iter()
        .map(|(_, (t, k))| (t.position, k.color))
        .collect();
    assert_eq!(keys, vec![(Vec3::new(2.0, 1.0, 2.0), KeyColor::Blue)]);
    assert_eq!(arena.count::<PowerUp>(), 0);

    arena.run(1.0);
    let scale = arena
        .engine
        .world()
        .get::<&Transform>(carrier)
        .map(|t| t.scale)
        .unwrap();
    assert!(scale < 0.5 && scale > 0.0);
    arena.run(1.0);
    assert!(!arena.exists(carrier));
    assert_eq!(
        arena.host.particle_state(carrier, ParticleFx::AfterDeath),
        Some(true)
    );
}

#[test]
fn repeated_dead_complete_is_handled_once() {
    let mut arena = Arena::new();
    let carrier = arena.spawn("carrier", at(2.0, 2.0));
    arena.damage(carrier, 1000.0, None);
    arena.step();

    arena.animation(carrier, AnimationEvent::DeadComplete);
    arena.step();
    arena.animation(carrier, AnimationEvent::DeadComplete);
    arena.animation(carrier, AnimationEvent::DeadComplete);
    arena.step();

    assert!(arena.character(carrier).death_finished);
    assert_eq!(arena.count::<KeyPickup>(), 1);
    let shrinks = arena
        .engine
        .world()
        .get::<&Sequences>(carrier)
        .unwrap()
        .iter()
        .filter(|s| s.task == Task::DeathShrink)
        .count();
    assert_eq!(shrinks, 1);

    // Shrinks at the configured rate, not twice as fast
    arena.run(1.0);
    let scale = arena
        .engine
        .world()
        .get::<&Transform>(carrier)
        .map(|t| t.scale)
        .unwrap();
    assert!(scale > 0.3 && scale < 0.5);
}

#[test]
fn rebirth_is_not_repeated_by_a_late_dead_complete() {
    let mut arena = Arena::new();
    let villager = arena.spawn("villager", at(0.0, 0.0));
    arena.damage(villager, 1000.0, None);
    arena.step();
    arena.animation(villager, AnimationEvent::DeadComplete);
    arena.step();
    let life = arena.character(villager).life;

    arena.animation(villager, AnimationEvent::DeadComplete);
    arena.step();
    let c = arena.character(villager);
    assert_eq!(c.life, life);
    assert!(!c.dead && !c.death_finished);
    assert_eq!(arena.host.sound_count(villager, SoundCue::Rebirth), 1);
}

#[test]
fn neutral_is_reborn_as_enemy() {
    let mut arena = Arena::new();
    let villager = arena.spawn("villager", at(0.0, 0.0));
    arena.damage(villager, 1000.0, None);
    arena.step();
    let life = arena.character(villager).life;
    arena.animation(villager, AnimationEvent::DeadComplete);
    arena.step();

    let c = arena.character(villager);
    assert_eq!(c.kind, CharacterKind::Enemy);
    assert!(!c.dead);
    assert!(c.vitals.health_full() && c.vitals.shield_full());
    assert!(c.life > life);
    let tag = *arena.engine.world().get::<&Tag>(villager).unwrap();
    assert_eq!(tag, Tag::Enemy);
    assert_eq!(arena.host.sound_count(villager, SoundCue::Rebirth), 1);
    assert_eq!(arena.count::<PowerUp>() + arena.count::<KeyPickup>(), 0);
}

#[test]
fn ally_is_reborn_as_enemy() {
    let mut arena = Arena::new();
    let buddy = arena.spawn("buddy", at(0.0, 0.0));
    arena.damage(buddy, 1000.0, None);
    arena.step();
    arena.animation(buddy, AnimationEvent::DeadComplete);
    arena.step();
    assert_eq!(arena.character(buddy).kind, CharacterKind::Enemy);
}

#[test]
fn player_death_ends_the_game() {
    let mut arena = Arena::new();
    let player = arena.spawn("player", at(0.0, 0.0));
    arena.damage(player, 1000.0, None);
    arena.step();
    let (health, shield) = *arena.host.bars.last().unwrap();
    assert!(health <= 0.0);
    assert_eq!(shield, 0.0);
    assert_eq!(arena.host.last_bool(player, AnimParam::Dead), Some(true));

    arena.animation(player, AnimationEvent::DeadComplete);
    arena.step();
    assert_eq!(arena.host.game_over, vec!["Game Over".to_string()]);
    assert_eq!(arena.character(player).kind, CharacterKind::Enemy);
    let world = arena.engine.world();
    assert!(world.get::<&PlayerSenses>(player).is_err());
    let caps = *world.get::<&Capabilities>(player).unwrap();
    assert!(caps.contains(Capabilities::AI_NAVIGATION));
    assert!(!caps.intersects(Capabilities::PLAYER_CONTROLS));
}

#[test]
fn change_type_resets_the_record() {
    let mut arena = Arena::new();
    let grunt = arena.spawn("grunt", at(0.0, 0.0));
    let player = arena.spawn("player", at(0.0, 3.0));
    arena.trigger(grunt, Contact::enter(Zone::Inner, player));
    arena.damage(grunt, 40.0, Some(player));
    arena.step();
    arena.step();

    {
        let mut frame = arena.engine.frame(&mut arena.host);
        pec3_core::combat::change_type(&mut frame, grunt, CharacterKind::Neutral).unwrap();
    }
    let c = arena.character(grunt);
    assert_eq!(c.kind, CharacterKind::Neutral);
    assert!(c.vitals.health_full() && c.vitals.shield_full());
    assert!(!c.attacking && !c.dead);
    let registry = arena
        .engine
        .world()
        .get::<&ThreatRegistry>(grunt)
        .map(|r| (*r).clone())
        .unwrap();
    assert!(registry.candidates.is_empty());
    assert_eq!(registry.target, None);
    assert_eq!(registry.forced_target, None);
}

#[test]
fn sequences_from_a_previous_life_are_dropped() {
    let mut arena = Arena::new();
    let player = arena.spawn("player", at(0.0, 0.0));
    let grunt = arena.spawn("grunt", at(0.0, 1.0));
    arena.run(1.0);
    arena.host.ray_hit = Some(RayHit {
        point: at(0.0, 1.0),
        tag: Tag::Enemy,
        entity: grunt,
    });

    // A windup stamped with the life before the current one
    {
        let world = &mut arena.engine.world;
        let mut c = world.get::<&mut Character>(player).unwrap();
        let stale = c.life;
        c.life += 1;
        c.attacking = true;
        c.attack_landed = true;
        drop(c);
        world
            .get::<&mut Sequences>(player)
            .unwrap()
            .push(stale, Task::AttackWindup);
    }
    arena.step();
    arena.step();
    assert!(arena.character(grunt).vitals.shield_full());
    assert!(arena
        .engine
        .world()
        .get::<&Sequences>(player)
        .unwrap()
        .is_empty());
}

#[test]
fn death_cancels_attack_in_flight() {
    let mut arena = Arena::new();
    let player = arena.spawn("player", at(0.0, 0.0));
    let grunt = arena.spawn("grunt", at(0.0, 1.0));
    arena.run(1.0);
    arena.host.ray_hit = Some(RayHit {
        point: at(0.0, 1.0),
        tag: Tag::Player,
        entity: player,
    });
    {
        let mut frame = arena.engine.frame(&mut arena.host);
        assert!(state_for(CharacterKind::Enemy).attack(&mut frame, grunt));
    }
    arena.damage(grunt, 1000.0, None);
    arena.step();
    arena.animation(grunt, AnimationEvent::AttackComplete);
    arena.step();
    arena.step();
    assert!(arena.character(player).vitals.shield_full());
    assert!(!arena.character(grunt).attacking);
}

#[test]
fn explosion_skips_the_death_sequence() {
    let mut arena = Arena::new();
    let grunt = arena.spawn("grunt", at(0.0, 0.0));
    {
        let mut frame = arena.engine.frame(&mut arena.host);
        let enemy = state_for(CharacterKind::Enemy);
        enemy.explode(&mut frame, grunt);
        enemy.explode(&mut frame, grunt);
    }
    assert!(arena.is_inactive(grunt));
    assert_eq!(arena.host.sound_count(grunt, SoundCue::Explosion), 1);
    arena.run(1.0);
    assert!(arena.exists(grunt));
    arena.run(1.1);
    assert!(!arena.exists(grunt));
    assert_eq!(arena.host.sound_count(grunt, SoundCue::Death), 0);
}
