//! PEC3 Headless Simulation Harness
//!
//! Drives the gameplay core through scripted arena scenarios with a
//! recording host. Runs entirely in-process: no engine, no rendering,
//! no physics.
//!
//! Usage:
//!   cargo run -p pec3-simtest
//!   cargo run -p pec3-simtest -- --verbose

use pec3_core::components::{
    Character, CharacterKind, KeyColor, KeyPickup, KeyRing, Ship, ShipKind, Tag, Transform,
};
use pec3_core::config::{ArenaConfig, Prefab, PrefabId};
use pec3_core::doors::{Door, DoorSpec, DoorType, LeafAnchors};
use pec3_core::engine::GameEngine;
use pec3_core::events::{Contact, FrameEvent, Zone};
use pec3_core::host::AnimationEvent;
use pec3_core::testing::RecordingHost;
use pec3_logic::damage::split_damage;
use pec3_logic::drops::decide_drop;
use pec3_logic::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

// ── Arena data (same JSON a game build ships with) ──────────────────────
const ARENA_JSON: &str = include_str!("../../../data/arena.json");

const FRAME: f32 = 1.0 / 60.0;
const SEED: u64 = 0x5EC3;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    let level = if verbose { "debug" } else { "info" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .try_init();
    println!("=== PEC3 Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Arena data validation
    results.extend(validate_arena_data(verbose));

    // 2. Damage split sweep
    results.extend(validate_damage_split(verbose));

    // 3. Spawn table and drop odds
    results.extend(validate_random_tables(verbose));

    // 4. Spawner waves over two minutes of play
    results.extend(validate_spawner_run(verbose));

    // 5. Key carrier to locked door
    results.extend(validate_key_run(verbose));

    // 6. AI ship patrol
    results.extend(validate_ship_patrol(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn new_engine() -> Result<GameEngine, String> {
    GameEngine::from_json(ARENA_JSON, SEED).map_err(|e| e.to_string())
}

/// Run `seconds` of frames, stopping at the first error.
fn run_for(
    engine: &mut GameEngine,
    host: &mut RecordingHost,
    seconds: f32,
) -> Result<(), String> {
    let frames = (seconds / FRAME).ceil() as usize;
    for _ in 0..frames {
        engine.update(FRAME, host).map_err(|e| e.to_string())?;
    }
    Ok(())
}

// ── 1. Arena Data ───────────────────────────────────────────────────────

fn validate_arena_data(verbose: bool) -> Vec<TestResult> {
    println!("--- Arena Data ---");
    let mut results = Vec::new();

    let config = match ArenaConfig::from_json(ARENA_JSON) {
        Ok(c) => c,
        Err(e) => {
            results.push(TestResult {
                name: "arena_parse".into(),
                passed: false,
                detail: format!("arena rejected: {}", e),
            });
            return results;
        }
    };
    results.push(TestResult {
        name: "arena_parse".into(),
        passed: true,
        detail: format!(
            "{} prefabs, {} spawners",
            config.prefabs.len(),
            config.spawners.len()
        ),
    });

    // Unknown top-level sections would be silently ignored by the loader
    let unknown: Vec<String> = match serde_json::from_str::<serde_json::Value>(ARENA_JSON) {
        Ok(serde_json::Value::Object(map)) => map
            .keys()
            .filter(|k| !["settings", "prefabs", "spawners"].contains(&k.as_str()))
            .cloned()
            .collect(),
        _ => vec!["<not an object>".into()],
    };
    results.push(TestResult {
        name: "arena_known_sections".into(),
        passed: unknown.is_empty(),
        detail: if unknown.is_empty() {
            "settings, prefabs, spawners".into()
        } else {
            format!("unknown sections: {}", unknown.join(", "))
        },
    });

    // One player, and every behaviour variant authored at least once
    let kinds: Vec<CharacterKind> = config
        .prefabs
        .iter()
        .filter_map(|(_, p)| match p {
            Prefab::Character(c) => Some(c.kind),
            _ => None,
        })
        .collect();
    let players = kinds.iter().filter(|k| **k == CharacterKind::Player).count();
    results.push(TestResult {
        name: "arena_single_player".into(),
        passed: players == 1,
        detail: format!("{} player prefabs", players),
    });
    let missing: Vec<String> = [
        CharacterKind::Ally,
        CharacterKind::Boss,
        CharacterKind::Enemy,
        CharacterKind::Neutral,
        CharacterKind::Still,
    ]
    .iter()
    .filter(|k| !kinds.contains(k))
    .map(|k| k.to_string())
    .collect();
    results.push(TestResult {
        name: "arena_all_kinds".into(),
        passed: missing.is_empty(),
        detail: if missing.is_empty() {
            "every character kind authored".into()
        } else {
            format!("missing: {}", missing.join(", "))
        },
    });

    // Every collectable key colour can be obtained
    let colours: Vec<KeyColor> = config
        .prefabs
        .iter()
        .filter_map(|(_, p)| match p {
            Prefab::Key(k) => Some(k.color),
            _ => None,
        })
        .collect();
    let all_keys = KeyColor::collectable().all(|c| colours.contains(&c));
    results.push(TestResult {
        name: "arena_keys_obtainable".into(),
        passed: all_keys,
        detail: format!("{} key prefabs", colours.len()),
    });

    // Spawners only produce hostiles
    let mut friendly = Vec::new();
    for spawner in &config.spawners {
        for entry in &spawner.entries {
            if let Ok(c) = config.prefabs.character(&entry.prefab) {
                if c.kind.tag() != Tag::Enemy {
                    friendly.push(format!("{}:{}", spawner.name, entry.prefab));
                }
            }
        }
    }
    results.push(TestResult {
        name: "arena_spawners_hostile".into(),
        passed: friendly.is_empty(),
        detail: if friendly.is_empty() {
            "all spawner entries are enemies".into()
        } else {
            format!("non-enemy entries: {}", friendly.join(", "))
        },
    });

    if verbose {
        for (id, prefab) in config.prefabs.iter() {
            println!("    {:<16} {}", id.as_str(), prefab.type_name());
        }
    }
    results
}

// ── 2. Damage Split ─────────────────────────────────────────────────────

fn validate_damage_split(verbose: bool) -> Vec<TestResult> {
    println!("--- Damage Split ---");
    let mut results = Vec::new();

    // Total pool loss equals the hit while the shield can cover its share
    let mut conserved = true;
    let mut monotonic = true;
    let mut shield_floor = true;
    for shield in [0.0_f32, 10.0, 45.0, 90.0, 100.0] {
        for amount in [0.0_f32, 1.0, 10.0, 50.0, 100.0, 250.0] {
            let (h, s) = split_damage(100.0, shield, amount);
            if h > 100.0 || s > shield {
                monotonic = false;
            }
            if s < 0.0 {
                shield_floor = false;
            }
            let loss = (100.0 - h) + (shield - s);
            if (loss - amount).abs() > 1e-3 {
                conserved = false;
            }
            if verbose {
                println!(
                    "    shield {:>5.1} hit {:>5.1} -> health {:>7.2} shield {:>6.2}",
                    shield, amount, h, s
                );
            }
        }
    }
    results.push(TestResult {
        name: "damage_conserved".into(),
        passed: conserved,
        detail: "health + shield loss equals the hit".into(),
    });
    results.push(TestResult {
        name: "damage_never_heals".into(),
        passed: monotonic,
        detail: "no pool grows from a hit".into(),
    });
    results.push(TestResult {
        name: "damage_shield_floor".into(),
        passed: shield_floor,
        detail: "shield never goes negative".into(),
    });
    results
}

// ── 3. Random Tables ────────────────────────────────────────────────────

fn validate_random_tables(verbose: bool) -> Vec<TestResult> {
    println!("--- Spawn & Drop Odds ---");
    let mut results = Vec::new();

    let config = match ArenaConfig::from_json(ARENA_JSON) {
        Ok(c) => c,
        Err(e) => {
            results.push(TestResult {
                name: "odds_arena".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };
    let mut rng = StdRng::seed_from_u64(SEED);

    // Sampled spawn frequencies track the authored weights
    for spawner in &config.spawners {
        let table = match spawner.table() {
            Ok(t) => t,
            Err(e) => {
                results.push(TestResult {
                    name: format!("odds_{}", spawner.name),
                    passed: false,
                    detail: e.to_string(),
                });
                continue;
            }
        };
        const DRAWS: usize = 20_000;
        let mut worst = 0.0_f32;
        for (id, weight) in table.entries() {
            let hits = (0..DRAWS)
                .filter(|_| table.sample(&mut rng) == id)
                .count();
            let expected = *weight as f32 / table.total_weight() as f32;
            let observed = hits as f32 / DRAWS as f32;
            worst = worst.max((observed - expected).abs());
            if verbose {
                println!(
                    "    {:<12} {:<12} expected {:.3} observed {:.3}",
                    spawner.name,
                    id.as_str(),
                    expected,
                    observed
                );
            }
        }
        results.push(TestResult {
            name: format!("odds_{}", spawner.name),
            passed: worst < 0.02,
            detail: format!("largest deviation {:.4}", worst),
        });
    }

    // Optional drops appear at the configured chance
    let optional: Vec<PrefabId> = vec!["medkit".into(), "shield_cell".into()];
    let chance = config.settings.optional_drop_chance;
    const DEATHS: usize = 20_000;
    let drops = (0..DEATHS)
        .filter(|_| {
            decide_drop(None, &optional, chance, &mut rng)
                .item()
                .is_some()
        })
        .count();
    let rate = drops as f32 / DEATHS as f32;
    results.push(TestResult {
        name: "odds_optional_drop".into(),
        passed: (rate - chance).abs() < 0.02,
        detail: format!("rate {:.3} for chance {:.2}", rate, chance),
    });

    let mandatory: PrefabId = "red_key".into();
    let always = (0..100).all(|_| {
        decide_drop(Some(&mandatory), &optional, chance, &mut rng).item() == Some(&mandatory)
    });
    results.push(TestResult {
        name: "odds_mandatory_drop".into(),
        passed: always,
        detail: "mandatory drop always wins".into(),
    });
    results
}

// ── 4. Spawner Run ──────────────────────────────────────────────────────

fn validate_spawner_run(verbose: bool) -> Vec<TestResult> {
    println!("--- Spawner Run ---");
    let mut results = Vec::new();

    let mut engine = match new_engine() {
        Ok(e) => e,
        Err(e) => {
            results.push(TestResult {
                name: "spawner_engine".into(),
                passed: false,
                detail: e,
            });
            return results;
        }
    };
    let mut host = RecordingHost::new();
    let max_enemies = engine.settings().max_enemies;

    let mut peak = 0;
    let mut error = None;
    for second in 0..120 {
        if let Err(e) = run_for(&mut engine, &mut host, 1.0) {
            error = Some(e);
            break;
        }
        let live = engine.live_enemy_count();
        peak = peak.max(live);
        if verbose && second % 10 == 0 {
            println!("    t={:>3}s live enemies {}", second, live);
        }
    }

    results.push(TestResult {
        name: "spawner_runs_clean".into(),
        passed: error.is_none(),
        detail: error.unwrap_or_else(|| "120s without errors".into()),
    });
    results.push(TestResult {
        name: "spawner_produces".into(),
        passed: !host.spawned.is_empty(),
        detail: format!("{} entities spawned", host.spawned.len()),
    });
    // The cap is checked before a wave, so one wave may overshoot it
    let largest_wave = 3;
    results.push(TestResult {
        name: "spawner_respects_cap".into(),
        passed: peak <= max_enemies + largest_wave,
        detail: format!("peak {} with cap {}", peak, max_enemies),
    });
    results
}

// ── 5. Key Run ──────────────────────────────────────────────────────────

fn validate_key_run(_verbose: bool) -> Vec<TestResult> {
    println!("--- Key Carrier ---");
    let mut results = Vec::new();
    match key_run() {
        Ok(steps) => {
            for (name, passed, detail) in steps {
                results.push(TestResult {
                    name: name.into(),
                    passed,
                    detail,
                });
            }
        }
        Err(e) => results.push(TestResult {
            name: "key_run".into(),
            passed: false,
            detail: e,
        }),
    }
    results
}

type Step = (&'static str, bool, String);

/// Kill a key carrier, collect its key and open a blue door with it.
fn key_run() -> Result<Vec<Step>, String> {
    let mut steps = Vec::new();
    let mut engine = new_engine()?;
    let mut host = RecordingHost::new();

    let player = engine
        .spawn(&mut host, &"player".into(), Vec3::ZERO, Vec3::FORWARD)
        .map_err(|e| e.to_string())?;
    let carrier = engine
        .spawn(
            &mut host,
            &"key_carrier".into(),
            Vec3::new(3.0, 0.0, 3.0),
            Vec3::FORWARD,
        )
        .map_err(|e| e.to_string())?;
    let gate = engine
        .spawn_door(
            &mut host,
            &DoorSpec {
                name: "blue_gate".into(),
                door_type: DoorType::Locked,
                key_color: Some(KeyColor::Blue),
                max_time: 5.0,
                speed: 2.0,
                position: Vec3::new(0.0, 0.0, 12.0),
                left: LeafAnchors {
                    closed: Vec3::new(-0.5, 0.0, 12.0),
                    open: Vec3::new(-1.5, 0.0, 12.0),
                },
                right: LeafAnchors {
                    closed: Vec3::new(0.5, 0.0, 12.0),
                    open: Vec3::new(1.5, 0.0, 12.0),
                },
            },
            vec![],
        )
        .map_err(|e| e.to_string())?;

    engine.push_event(FrameEvent::Trigger {
        entity: gate,
        contact: Contact::enter(Zone::Body, player),
    });
    run_for(&mut engine, &mut host, FRAME)?;
    steps.push((
        "key_door_refuses",
        host.last_message() == Some("Blue key needed"),
        format!("message {:?}", host.last_message()),
    ));

    engine.ctx.inbox.push(carrier, 1000.0, Some(player));
    run_for(&mut engine, &mut host, FRAME)?;
    let dead = engine
        .world()
        .get::<&Character>(carrier)
        .map(|c| c.dead)
        .unwrap_or(false);
    steps.push(("key_carrier_dies", dead, "lethal hit delivered".into()));

    engine.push_event(FrameEvent::Animation {
        entity: carrier,
        event: AnimationEvent::DeadComplete,
    });
    run_for(&mut engine, &mut host, FRAME)?;
    let key = engine
        .world()
        .query::<(&KeyPickup, &Transform)>()
        .iter()
        .find(|(_, (k, _))| k.color == KeyColor::Blue)
        .map(|(e, _)| e);
    steps.push((
        "key_dropped",
        key.is_some(),
        format!("blue key {:?}", key),
    ));
    let Some(key) = key else {
        return Ok(steps);
    };

    engine.push_event(FrameEvent::Trigger {
        entity: key,
        contact: Contact::enter(Zone::Body, player),
    });
    run_for(&mut engine, &mut host, FRAME)?;
    let held = engine
        .world()
        .get::<&KeyRing>(player)
        .map(|r| r.has(KeyColor::Blue))
        .unwrap_or(false);
    steps.push((
        "key_collected",
        held && !engine.world().contains(key),
        format!("message {:?}", host.last_message()),
    ));

    engine.push_event(FrameEvent::Trigger {
        entity: gate,
        contact: Contact::enter(Zone::Body, player),
    });
    run_for(&mut engine, &mut host, 3.0)?;
    let open = engine
        .world()
        .get::<&Door>(gate)
        .map(|d| d.mechanism.is_open())
        .unwrap_or(false);
    steps.push((
        "key_door_opens",
        open && host.has_message("Blue key used"),
        "blue gate open".into(),
    ));

    let gone = !engine.world().contains(carrier);
    steps.push(("key_corpse_removed", gone, "corpse shrank away".into()));
    Ok(steps)
}

// ── 6. Ship Patrol ──────────────────────────────────────────────────────

fn validate_ship_patrol(verbose: bool) -> Vec<TestResult> {
    println!("--- Ship Patrol ---");
    let mut results = Vec::new();

    let mut engine = match new_engine() {
        Ok(e) => e,
        Err(e) => {
            results.push(TestResult {
                name: "patrol_engine".into(),
                passed: false,
                detail: e,
            });
            return results;
        }
    };
    let mut host = RecordingHost::new();
    let waypoints = vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(60.0, 0.0, 0.0),
        Vec3::new(60.0, 0.0, 60.0),
        Vec3::new(0.0, 0.0, 60.0),
    ];
    let ship = match engine.spawn_ship(
        &mut host,
        Ship::new(ShipKind::AI).with_waypoints(waypoints.clone()),
        Transform::at(Vec3::ZERO),
    ) {
        Ok(s) => s,
        Err(e) => {
            results.push(TestResult {
                name: "patrol_start".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };

    // Arrive at a waypoint every third frame
    let mut visited = Vec::new();
    for frame in 0..(waypoints.len() * 2 * 3) {
        host.remaining_distance = if frame % 3 == 2 { 0.0 } else { 25.0 };
        if let Err(e) = engine.update(FRAME, &mut host) {
            results.push(TestResult {
                name: "patrol_runs_clean".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
        if let Some(target) = host.last_destination(ship) {
            if visited.last() != Some(&target) {
                visited.push(target);
            }
        }
    }
    if verbose {
        for point in &visited {
            println!("    waypoint ({:.0}, {:.0})", point.x, point.z);
        }
    }
    let expected: Vec<Vec3> = waypoints.iter().chain(waypoints.iter()).copied().collect();
    results.push(TestResult {
        name: "patrol_loops".into(),
        passed: visited == expected,
        detail: format!("{} waypoint changes", visited.len()),
    });

    let missing = engine.spawn_ship(
        &mut host,
        Ship::new(ShipKind::AI),
        Transform::at(Vec3::ZERO),
    );
    results.push(TestResult {
        name: "patrol_requires_waypoints".into(),
        passed: missing.is_err(),
        detail: match missing {
            Ok(_) => "ship without waypoints accepted".into(),
            Err(e) => e.to_string(),
        },
    });
    results
}
