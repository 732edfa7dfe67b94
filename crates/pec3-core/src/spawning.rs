//! Prefab instantiation and the periodic enemy spawner.

use hecs::{Entity, EntityBuilder, World};
use log::{debug, info};
use pec3_logic::weighted::WeightedTable;
use pec3_logic::Vec3;

use crate::components::{
    Capabilities, Character, CharacterKind, Inactive, KeyColor, KeyPickup, KeyRing, Loot,
    PlayerSenses, PowerUp, Projectile, Tag, ThreatRegistry, Transform,
};
use crate::config::{CharacterPrefab, PrefabId, Prefab, SpawnerSpec};
use crate::context::Frame;
use crate::error::{ConfigError, GameResult};
use crate::sequences::Sequences;
use crate::states::state_for;

/// Instantiate a catalog prefab at `position` facing `forward`.
pub fn spawn_prefab(
    frame: &mut Frame<'_>,
    id: &PrefabId,
    position: Vec3,
    forward: Vec3,
) -> GameResult<Entity> {
    let prefab = frame.ctx.catalog.get(id)?.clone();
    let transform = Transform::at(position).facing(forward);
    let entity = match prefab {
        Prefab::Character(character) => spawn_character(frame, id, &character, transform)?,
        Prefab::PowerUp(power_up) => {
            let entity = frame.world.spawn((
                transform,
                Tag::Item,
                PowerUp::new(power_up.kind, power_up.persistent),
            ));
            frame.host.spawned(entity, Some(id), &transform);
            entity
        }
        Prefab::Key(key) => {
            if key.color == KeyColor::All {
                return Err(ConfigError::KeyPickupAll(id.clone()).into());
            }
            let entity = frame
                .world
                .spawn((transform, Tag::Item, KeyPickup { color: key.color }));
            frame.host.spawned(entity, Some(id), &transform);
            entity
        }
        Prefab::Projectile(_) => spawn_projectile(frame, id, position, forward, None)?,
    };
    Ok(entity)
}

fn spawn_character(
    frame: &mut Frame<'_>,
    id: &PrefabId,
    prefab: &CharacterPrefab,
    transform: Transform,
) -> GameResult<Entity> {
    let kind = prefab.kind;
    let mut builder = EntityBuilder::new();
    builder
        .add(Character::new(kind, &prefab.stats))
        .add(prefab.stats.clone())
        .add(transform)
        .add(kind.tag())
        .add(ThreatRegistry::default())
        .add(Sequences::default())
        .add(Capabilities::for_kind(kind))
        .add(Loot {
            mandatory: prefab.mandatory_drop.clone(),
            optional: prefab.optional_drops.clone(),
        });
    if kind == CharacterKind::Player {
        builder.add(PlayerSenses::default()).add(KeyRing::default());
    }
    let entity = frame.world.spawn(builder.build());
    frame.host.spawned(entity, Some(id), &transform);

    if let Err(err) = state_for(kind).start_state(frame, entity) {
        // A half-initialized entity must not linger
        let _ = frame.world.despawn(entity);
        frame.host.destroyed(entity);
        return Err(err.into());
    }
    info!("spawned {} ({}) as {:?}", id, kind, entity);
    Ok(entity)
}

/// Launch a projectile prefab along `direction`.
pub fn spawn_projectile(
    frame: &mut Frame<'_>,
    id: &PrefabId,
    position: Vec3,
    direction: Vec3,
    owner: Option<Entity>,
) -> GameResult<Entity> {
    let prefab = frame.ctx.catalog.projectile(id)?.clone();
    let mut heading = direction.normalize();
    if heading == Vec3::ZERO {
        heading = Vec3::FORWARD;
    }
    let transform = Transform {
        position,
        forward: heading,
        scale: 1.0,
    };
    let entity = frame.world.spawn((
        transform,
        Tag::Projectile,
        Projectile {
            damage: prefab.damage,
            velocity: heading * prefab.speed,
            remaining: prefab.lifetime,
            owner,
            hits: prefab.hits,
        },
    ));
    frame.host.spawned(entity, Some(id), &transform);
    Ok(entity)
}

/// Periodic enemy spawner.
#[derive(Debug, Clone)]
pub struct EnemySpawner {
    pub name: String,
    pub position: Vec3,
    pub table: WeightedTable<PrefabId>,
    pub waves: Vec<u32>,
    pub time_between_spawns: f32,
    pub last_spawn_time: f32,
    pub started: bool,
}

impl EnemySpawner {
    pub fn from_spec(spec: &SpawnerSpec) -> Result<Self, ConfigError> {
        let table = spec.table()?;
        if spec.waves.is_empty() {
            return Err(ConfigError::EmptySchedule(spec.name.clone()));
        }
        Ok(Self {
            name: spec.name.clone(),
            position: spec.position,
            table,
            waves: spec.waves.clone(),
            time_between_spawns: spec.time_between_spawns,
            last_spawn_time: 0.0,
            started: false,
        })
    }

    /// Enemies in the wave due at `now`. Past the end of the schedule the
    /// last entry repeats.
    pub fn wave_size(&self, now: f32) -> u32 {
        let index = (now / self.time_between_spawns).floor().max(0.0) as usize;
        self.waves
            .get(index.min(self.waves.len().saturating_sub(1)))
            .copied()
            .unwrap_or(0)
    }

    /// Whether a wave is due. Marks it taken.
    fn take_wave(&mut self, now: f32, live_enemies: usize, max_enemies: usize) -> Option<u32> {
        if !self.started {
            self.started = true;
            self.last_spawn_time = now;
            return Some(self.wave_size(now));
        }
        if now - self.last_spawn_time > self.time_between_spawns && live_enemies < max_enemies {
            self.last_spawn_time = now;
            return Some(self.wave_size(now));
        }
        None
    }
}

/// Enemy-tagged characters still in play, including corpses not yet gone.
pub fn count_live_enemies(world: &World) -> usize {
    world
        .query::<(&Tag, &Character)>()
        .without::<&Inactive>()
        .iter()
        .filter(|(_, (tag, _))| **tag == Tag::Enemy)
        .count()
}

pub fn spawner_system(frame: &mut Frame<'_>) -> GameResult<()> {
    let spawners: Vec<Entity> = frame
        .world
        .query::<&EnemySpawner>()
        .iter()
        .map(|(e, _)| e)
        .collect();
    if spawners.is_empty() {
        return Ok(());
    }

    let now = frame.now();
    let max_enemies = frame.settings().max_enemies;
    for spawner in spawners {
        let live = count_live_enemies(frame.world);
        let (position, picks) = {
            let Ok(mut state) = frame.world.get::<&mut EnemySpawner>(spawner) else {
                continue;
            };
            let Some(count) = state.take_wave(now, live, max_enemies) else {
                continue;
            };
            let picks: Vec<PrefabId> = (0..count)
                .map(|_| state.table.sample(&mut frame.ctx.rng).clone())
                .collect();
            debug!("spawner {} wave of {} at {:.2}s", state.name, count, now);
            (state.position, picks)
        };
        for id in &picks {
            spawn_prefab(frame, id, position, Vec3::FORWARD)?;
        }
    }
    Ok(())
}
