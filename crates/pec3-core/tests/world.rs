//! Integration tests for doors, pickups, the enemy spawner and ships.

mod common;

use common::Arena;
use hecs::Entity;
use pec3_core::components::*;
use pec3_core::config::{GameSettings, SpawnEntry, SpawnerSpec};
use pec3_core::doors::{Door, DoorSpec, DoorType, LeafAnchors};
use pec3_core::error::{GameError, InitError};
use pec3_core::events::{Contact, PlayerInput, Zone};
use pec3_core::host::{CameraRig, SoundCue};
use pec3_logic::Vec3;

fn at(x: f32, z: f32) -> Vec3 {
    Vec3::new(x, 0.0, z)
}

// ── Helpers ────────────────────────────────────────────────────────────

fn door_spec(door_type: DoorType) -> DoorSpec {
    DoorSpec {
        name: "gate".into(),
        door_type,
        key_color: None,
        max_time: 5.0,
        speed: 4.0,
        position: at(0.0, 10.0),
        left: LeafAnchors {
            closed: at(-0.5, 10.0),
            open: at(-1.5, 10.0),
        },
        right: LeafAnchors {
            closed: at(0.5, 10.0),
            open: at(1.5, 10.0),
        },
    }
}

fn door(arena: &Arena, entity: Entity) -> Door {
    arena
        .engine
        .world()
        .get::<&Door>(entity)
        .map(|d| (*d).clone())
        .unwrap()
}

fn place_door(arena: &mut Arena, spec: &DoorSpec, enemies: Vec<Entity>) -> Entity {
    arena
        .engine
        .spawn_door(&mut arena.host, spec, enemies)
        .unwrap()
}

fn keys(arena: &Arena, player: Entity) -> KeyRing {
    *arena.engine.world().get::<&KeyRing>(player).unwrap()
}

// ── Doors ──────────────────────────────────────────────────────────────

#[test]
fn automatic_door_follows_the_player() {
    let mut arena = Arena::new();
    let player = arena.spawn("player", at(0.0, 9.0));
    let gate = place_door(&mut arena, &door_spec(DoorType::Automatic), vec![]);

    arena.trigger(gate, Contact::enter(Zone::Body, player));
    arena.step();
    assert!(door(&arena, gate).mechanism.is_opening);
    arena.run(3.0);
    let open = door(&arena, gate);
    assert!(open.mechanism.is_open());
    assert_eq!(open.mechanism.right.position, at(1.5, 10.0));

    arena.trigger(gate, Contact::exit(Zone::Body, player));
    arena.run(3.0);
    assert!(door(&arena, gate).mechanism.is_closed());
}

#[test]
fn doors_ignore_everything_but_the_player() {
    let mut arena = Arena::new();
    let grunt = arena.spawn("grunt", at(0.0, 9.0));
    let gate = place_door(&mut arena, &door_spec(DoorType::Automatic), vec![]);
    arena.trigger(gate, Contact::enter(Zone::Body, grunt));
    arena.step();
    assert!(!door(&arena, gate).mechanism.is_opening);
}

#[test]
fn destroy_enemies_door_waits_for_its_guards() {
    let mut arena = Arena::new();
    let player = arena.spawn("player", at(0.0, 9.0));
    let guards = vec![
        arena.spawn("grunt", at(5.0, 5.0)),
        arena.spawn("grunt", at(-5.0, 5.0)),
    ];
    let gate = place_door(
        &mut arena,
        &door_spec(DoorType::DestroyEnemies),
        guards.clone(),
    );

    arena.trigger(gate, Contact::enter(Zone::Body, player));
    arena.step();
    assert_eq!(
        arena.host.last_message(),
        Some("You need to destroy all the enemies")
    );
    assert!(!door(&arena, gate).mechanism.is_opening);

    // A corpse still counts until it is gone
    arena.damage(guards[0], 1000.0, None);
    arena.engine.world.despawn(guards[1]).unwrap();
    arena.step();
    arena.trigger(gate, Contact::enter(Zone::Body, player));
    arena.step();
    assert!(!door(&arena, gate).mechanism.is_opening);

    arena.engine.world.despawn(guards[0]).unwrap();
    arena.trigger(gate, Contact::enter(Zone::Body, player));
    arena.step();
    assert_eq!(arena.host.last_message(), Some("Enemies destroyed"));
    assert!(door(&arena, gate).mechanism.is_opening);

    // Latched: later visits open it without a message
    arena.trigger(gate, Contact::exit(Zone::Body, player));
    arena.step();
    assert!(door(&arena, gate).mechanism.is_closing);
    let messages = arena.host.messages.len();
    arena.trigger(gate, Contact::enter(Zone::Body, player));
    arena.step();
    assert!(door(&arena, gate).mechanism.is_opening);
    assert_eq!(arena.host.messages.len(), messages);
}

#[test]
fn locked_door_needs_the_key() {
    let mut arena = Arena::new();
    let player = arena.spawn("player", at(0.0, 9.0));
    let mut spec = door_spec(DoorType::Locked);
    spec.key_color = Some(KeyColor::Blue);
    let gate = place_door(&mut arena, &spec, vec![]);

    arena.trigger(gate, Contact::enter(Zone::Body, player));
    arena.step();
    assert_eq!(arena.host.last_message(), Some("Blue key needed"));
    assert!(!door(&arena, gate).mechanism.is_opening);

    let key = arena.spawn("blue_key", at(0.0, 8.0));
    arena.trigger(key, Contact::enter(Zone::Body, player));
    arena.step();
    assert_eq!(arena.host.last_message(), Some("You got the blue key!"));
    assert_eq!(arena.host.key_icons.last(), Some(&(false, false, true)));
    assert_eq!(arena.host.sound_count(key, SoundCue::Pickup), 1);
    assert!(!arena.exists(key));
    assert!(keys(&arena, player).has(KeyColor::Blue));

    arena.trigger(gate, Contact::enter(Zone::Body, player));
    arena.step();
    assert_eq!(arena.host.last_message(), Some("Blue key used"));
    assert!(door(&arena, gate).mechanism.is_opening);
}

#[test]
fn all_keys_door() {
    let mut arena = Arena::new();
    let player = arena.spawn("player", at(0.0, 9.0));
    let mut spec = door_spec(DoorType::Locked);
    spec.key_color = Some(KeyColor::All);
    let gate = place_door(&mut arena, &spec, vec![]);

    for (i, name) in ["red_key", "green_key"].iter().enumerate() {
        let key = arena.spawn(name, at(i as f32, 8.0));
        arena.trigger(key, Contact::enter(Zone::Body, player));
    }
    arena.step();
    arena.trigger(gate, Contact::enter(Zone::Body, player));
    arena.step();
    assert_eq!(arena.host.last_message(), Some("All keys needed"));

    let key = arena.spawn("blue_key", at(3.0, 8.0));
    arena.trigger(key, Contact::enter(Zone::Body, player));
    arena.trigger(gate, Contact::enter(Zone::Body, player));
    arena.step();
    assert_eq!(arena.host.last_message(), Some("All keys used"));
    assert_eq!(arena.host.key_icons.last(), Some(&(true, true, true)));
}

#[test]
fn timed_door_opens_on_switch_and_closes_on_expiry() {
    let mut arena = Arena::new();
    let player = arena.spawn("player", at(0.0, 9.0));
    let gate = place_door(&mut arena, &door_spec(DoorType::Timed), vec![]);
    let switch = arena
        .engine
        .spawn_switch(&mut arena.host, at(4.0, 4.0), gate);

    arena.trigger(gate, Contact::enter(Zone::Body, player));
    arena.step();
    assert_eq!(arena.host.last_message(), Some("Switch needed"));

    arena.trigger(switch, Contact::enter(Zone::Body, player));
    arena.step();
    assert_eq!(arena.host.last_message(), Some("A door opened somewhere"));
    arena.step();
    assert!(door(&arena, gate).mechanism.is_opening);
    let shown = arena.host.timer.last().cloned().flatten().unwrap();
    assert!(shown.starts_with("00:04:"));

    // Inside the window the door stays quiet
    arena.trigger(gate, Contact::enter(Zone::Body, player));
    let messages = arena.host.messages.len();
    arena.step();
    assert_eq!(arena.host.messages.len(), messages);

    arena.run(5.0);
    let closing = door(&arena, gate);
    assert!(closing.mechanism.is_closing || closing.mechanism.is_closed());
    assert_eq!(arena.host.timer.last(), Some(&None));
}

// ── Pickups ────────────────────────────────────────────────────────────

#[test]
fn power_up_refused_at_full_health() {
    let mut arena = Arena::new();
    let player = arena.spawn("player", at(0.0, 0.0));
    let medkit = arena.spawn("medkit", at(0.0, 1.0));
    arena.trigger(medkit, Contact::enter(Zone::Body, player));
    arena.step();
    assert_eq!(arena.host.last_message(), Some("Already at full health"));
    assert!(arena.exists(medkit));
}

#[test]
fn power_ups_restore_a_quarter() {
    let mut arena = Arena::new();
    let player = arena.spawn("player", at(0.0, 0.0));
    // Shield soaks 100 of its 135 share, the rest spills: health 50, shield 0
    arena.damage(player, 150.0, None);
    arena.step();
    let hurt = arena.character(player).vitals;
    approx::assert_relative_eq!(hurt.health, 50.0, epsilon = 1e-4);

    let medkit = arena.spawn("medkit", at(0.0, 1.0));
    arena.trigger(medkit, Contact::enter(Zone::Body, player));
    arena.step();
    assert_eq!(arena.host.last_message(), Some("You got some health!"));
    let healed = arena.character(player).vitals;
    approx::assert_relative_eq!(
        healed.health,
        75.0,
        epsilon = 1e-4
    );
    assert!(!arena.exists(medkit));

    let battery = arena.spawn("battery", at(0.0, 1.0));
    arena.trigger(battery, Contact::enter(Zone::Body, player));
    arena.step();
    assert_eq!(arena.host.last_message(), Some("You got some shield"));
    approx::assert_relative_eq!(
        arena.character(player).vitals.shield,
        25.0,
        epsilon = 1e-4
    );
    assert!(arena.host.bars.len() >= 3);
}

#[test]
fn only_players_pick_things_up() {
    let mut arena = Arena::new();
    let grunt = arena.spawn("grunt", at(0.0, 0.0));
    let key = arena.spawn("red_key", at(0.0, 1.0));
    arena.trigger(key, Contact::enter(Zone::Body, grunt));
    arena.step();
    assert!(arena.exists(key));
    assert!(arena.host.messages.is_empty());
}

#[test]
fn dropped_power_up_blinks_then_vanishes() {
    let mut arena = Arena::new();
    let medkit = arena.spawn("medkit", at(0.0, 0.0));
    let battery = arena.spawn("battery", at(2.0, 0.0));

    arena.run(4.9);
    assert!(arena.host.visibility.is_empty());
    arena.run(0.5);
    assert!(arena.host.visibility.contains(&(medkit, false)));
    assert!(arena.host.visibility.contains(&(medkit, true)));

    arena.run(5.0);
    assert!(!arena.exists(medkit));
    assert!(arena.exists(battery));
    assert!(arena.host.visibility.iter().all(|(e, _)| *e != battery));
}

// ── Spawner ────────────────────────────────────────────────────────────

fn gate_spawner(waves: Vec<u32>) -> SpawnerSpec {
    SpawnerSpec {
        name: "north gate".into(),
        position: at(0.0, 20.0),
        entries: vec![
            SpawnEntry {
                prefab: "grunt".into(),
                weight: 3,
            },
            SpawnEntry {
                prefab: "boss".into(),
                weight: 1,
            },
        ],
        waves,
        time_between_spawns: 10.0,
    }
}

#[test]
fn spawner_sends_waves_on_schedule() {
    let mut arena = Arena::with(GameSettings::default(), vec![gate_spawner(vec![2, 3])]);
    arena.step();
    assert_eq!(arena.engine.live_enemy_count(), 2);

    arena.run(5.0);
    assert_eq!(arena.engine.live_enemy_count(), 2);

    arena.run(5.5);
    assert_eq!(arena.engine.live_enemy_count(), 5);
}

#[test]
fn spawner_respects_the_enemy_cap() {
    let settings = GameSettings {
        max_enemies: 2,
        ..GameSettings::default()
    };
    let mut arena = Arena::with(settings, vec![gate_spawner(vec![2])]);
    arena.step();
    arena.run(25.0);
    assert_eq!(arena.engine.live_enemy_count(), 2);
}

// ── Ships ──────────────────────────────────────────────────────────────

#[test]
fn ai_ship_needs_waypoints() {
    let mut arena = Arena::new();
    let result = arena.engine.spawn_ship(
        &mut arena.host,
        Ship::new(ShipKind::AI),
        Transform::at(Vec3::ZERO),
    );
    assert!(matches!(
        result,
        Err(GameError::Init(InitError::MissingWaypoints(_)))
    ));
    assert_eq!(arena.count::<Ship>(), 0);
}

#[test]
fn ai_ship_patrols_and_blows_up_what_it_rams() {
    let mut arena = Arena::new();
    let waypoints = vec![at(0.0, 0.0), at(50.0, 0.0), at(50.0, 50.0)];
    let ship = arena
        .engine
        .spawn_ship(
            &mut arena.host,
            Ship::new(ShipKind::AI).with_waypoints(waypoints.clone()),
            Transform::at(Vec3::ZERO),
        )
        .unwrap();

    arena.host.remaining_distance = 10.0;
    arena.step();
    assert_eq!(arena.host.last_destination(ship), Some(waypoints[0]));
    arena.host.remaining_distance = 0.0;
    arena.step();
    arena.step();
    assert_eq!(arena.host.last_destination(ship), Some(waypoints[1]));

    let grunt = arena.spawn("grunt", at(1.0, 1.0));
    let player = arena.spawn("player", at(-3.0, 1.0));
    arena.trigger(ship, Contact::enter(Zone::Hull, grunt));
    arena.trigger(ship, Contact::enter(Zone::Hull, player));
    arena.step();
    assert!(arena.is_inactive(grunt));
    assert_eq!(arena.host.sound_count(grunt, SoundCue::Explosion), 1);
    assert!(!arena.is_inactive(player));

    arena.run(2.1);
    assert!(!arena.exists(grunt));
}

#[test]
fn player_boards_and_docks_the_human_ship() {
    let mut arena = Arena::new();
    let player = arena.spawn("player", at(0.0, 0.0));
    let ship = arena
        .engine
        .spawn_ship(
            &mut arena.host,
            Ship::new(ShipKind::Human),
            Transform::at(at(0.0, 3.0)),
        )
        .unwrap();
    let dock = arena.engine.spawn_dock(
        &mut arena.host,
        at(40.0, 40.0),
        Dock {
            spawn_point: Some(at(42.0, 40.0)),
            yaw: 90.0,
        },
    );

    arena.trigger(player, Contact::enter(Zone::Inner, ship));
    arena.input(player, PlayerInput::EnterShip(true));
    arena.step();
    assert!(arena.is_inactive(player));
    assert_eq!(arena.host.last_camera(), Some((CameraRig::ShipFollow, ship)));
    let caps = *arena.engine.world().get::<&Capabilities>(ship).unwrap();
    assert!(caps.contains(Capabilities::VEHICLE_CONTROL));

    // No dock in range yet
    arena.input(player, PlayerInput::ExitShip(true));
    arena.step();
    assert!(arena.is_inactive(player));

    arena.trigger(ship, Contact::enter(Zone::Inner, dock));
    arena.input(player, PlayerInput::ExitShip(true));
    arena.step();
    assert!(!arena.is_inactive(player));
    let placed = *arena.engine.world().get::<&Transform>(player).unwrap();
    assert_eq!(placed.position, at(42.0, 40.0));
    assert!((placed.yaw_degrees() - 90.0).abs() < 1e-3);
    assert_eq!(
        arena.host.last_camera(),
        Some((CameraRig::PlayerFollow, player))
    );
    let pilot = arena.engine.world().get::<&Ship>(ship).unwrap().pilot;
    assert_eq!(pilot, None);
}

#[test]
fn dock_without_spawn_point_is_an_error() {
    let mut arena = Arena::new();
    let player = arena.spawn("player", at(0.0, 0.0));
    let ship = arena
        .engine
        .spawn_ship(
            &mut arena.host,
            Ship::new(ShipKind::Human),
            Transform::at(at(0.0, 3.0)),
        )
        .unwrap();
    let dock = arena.engine.spawn_dock(
        &mut arena.host,
        at(40.0, 40.0),
        Dock {
            spawn_point: None,
            yaw: 0.0,
        },
    );
    arena.trigger(player, Contact::enter(Zone::Inner, ship));
    arena.input(player, PlayerInput::EnterShip(true));
    arena.step();
    arena.trigger(ship, Contact::enter(Zone::Inner, dock));
    arena.input(ship, PlayerInput::ExitShip(true));
    let result = arena.engine.update(common::FRAME, &mut arena.host);
    assert!(matches!(
        result,
        Err(GameError::Init(InitError::MissingDockSpawn(d))) if d == dock
    ));
    assert!(arena.is_inactive(player));
}
