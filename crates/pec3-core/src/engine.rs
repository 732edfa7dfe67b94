//! Game engine - owns the world and runs one frame at a time.

use hecs::{Entity, World};
use log::{debug, error, info};
use pec3_logic::Vec3;

use crate::components::*;
use crate::config::{ArenaConfig, GameSettings, PrefabId};
use crate::context::{Frame, GameContext};
use crate::doors::{door_system, handle_door_contact, Door, DoorSpec};
use crate::error::{ConfigError, GameError, GameResult};
use crate::events::{Contact, FrameEvent, PlayerInput};
use crate::host::{AnimationEvent, Host, ParticleFx};
use crate::pickups::{
    handle_key_contact, handle_power_up_contact, handle_switch_contact, pickup_system,
};
use crate::projectile::{handle_projectile_contact, projectile_system};
use crate::sequences::run_sequences;
use crate::ships::ship_state_for;
use crate::spawning::{count_live_enemies, spawn_prefab, spawner_system, EnemySpawner};
use crate::states::state_for;
use crate::targeting;

/// Main engine
pub struct GameEngine {
    /// ECS world containing all entities
    pub world: World,
    /// Settings, prefabs, randomness, clock and the damage inbox
    pub ctx: GameContext,
    /// Signals queued by the host for the next frame
    events: Vec<FrameEvent>,
}

impl GameEngine {
    /// Create an engine for a validated arena. Spawners are placed
    /// immediately; their first wave comes on the first update.
    pub fn new(config: ArenaConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut world = World::new();
        for spec in &config.spawners {
            world.spawn((EnemySpawner::from_spec(spec)?,));
        }
        info!(
            "arena ready: {} prefabs, {} spawners",
            config.prefabs.len(),
            config.spawners.len()
        );
        Ok(Self {
            world,
            ctx: GameContext::new(config.settings, config.prefabs, seed),
            events: Vec::new(),
        })
    }

    /// Parse, validate and build.
    pub fn from_json(json: &str, seed: u64) -> Result<Self, ConfigError> {
        Self::new(ArenaConfig::from_json(json)?, seed)
    }

    /// Borrow the world and context together with `host` for direct calls
    /// into behaviours.
    pub fn frame<'a>(&'a mut self, host: &'a mut dyn Host) -> Frame<'a> {
        Frame::new(&mut self.world, host, &mut self.ctx)
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn settings(&self) -> &GameSettings {
        &self.ctx.settings
    }

    /// Seconds since the engine started
    pub fn now(&self) -> f32 {
        self.ctx.now
    }

    /// Instantiate a prefab.
    pub fn spawn(
        &mut self,
        host: &mut dyn Host,
        id: &PrefabId,
        position: Vec3,
        forward: Vec3,
    ) -> GameResult<Entity> {
        spawn_prefab(&mut self.frame(host), id, position, forward)
    }

    /// Place a door. `enemies` are the guards of a destroy-enemies door.
    pub fn spawn_door(
        &mut self,
        host: &mut dyn Host,
        spec: &DoorSpec,
        enemies: Vec<Entity>,
    ) -> GameResult<Entity> {
        let door = Door::from_spec(spec, enemies)?;
        let transform = Transform::at(spec.position);
        let door_type = door.door_type();
        let entity = self.world.spawn((transform, Tag::Untagged, door));
        host.spawned(entity, None, &transform);
        info!("door {} ({}) placed as {:?}", spec.name, door_type, entity);
        Ok(entity)
    }

    /// Place a ship and start its variant.
    pub fn spawn_ship(
        &mut self,
        host: &mut dyn Host,
        ship: Ship,
        transform: Transform,
    ) -> GameResult<Entity> {
        let kind = ship.kind;
        let entity = self
            .world
            .spawn((transform, Tag::Ship, Capabilities::empty(), ship));
        host.spawned(entity, None, &transform);
        let mut frame = self.frame(host);
        if let Err(err) = ship_state_for(kind).start_state(&mut frame, entity) {
            let _ = frame.world.despawn(entity);
            frame.host.destroyed(entity);
            return Err(err.into());
        }
        info!("{} ship placed as {:?}", kind, entity);
        Ok(entity)
    }

    /// Place a port ships can dock at.
    pub fn spawn_dock(&mut self, host: &mut dyn Host, position: Vec3, dock: Dock) -> Entity {
        let transform = Transform::at(position);
        let entity = self.world.spawn((transform, Tag::Port, dock));
        host.spawned(entity, None, &transform);
        entity
    }

    /// Place a switch arming `door`.
    pub fn spawn_switch(&mut self, host: &mut dyn Host, position: Vec3, door: Entity) -> Entity {
        let transform = Transform::at(position);
        let entity = self
            .world
            .spawn((transform, Tag::Untagged, DoorSwitch { door }));
        host.spawned(entity, None, &transform);
        entity
    }

    /// Queue a signal for the next update.
    pub fn push_event(&mut self, event: FrameEvent) {
        self.events.push(event);
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Write back where physics put an entity. Returns `false` for stale
    /// handles.
    pub fn sync_transform(&mut self, entity: Entity, position: Vec3, forward: Vec3) -> bool {
        match self.world.get::<&mut Transform>(entity) {
            Ok(mut transform) => {
                transform.position = position;
                *transform = transform.facing(forward);
                true
            }
            Err(_) => false,
        }
    }

    /// Enemy-tagged characters in play, corpses included.
    pub fn live_enemy_count(&self) -> usize {
        count_live_enemies(&self.world)
    }

    pub fn character_count(&self) -> usize {
        self.world.query::<&Character>().iter().count()
    }

    /// Advance the game by `delta_seconds`.
    ///
    /// Order within a frame: character and ship updates, multi-frame
    /// sequences, queued signals, damage delivery, then doors, projectiles,
    /// pickups, spawners and finally despawns. A failing entity is logged
    /// and skipped; the first error is returned once the frame is done.
    pub fn update(&mut self, delta_seconds: f32, host: &mut dyn Host) -> GameResult<()> {
        let delta = delta_seconds.max(0.0);
        self.ctx.now += delta;
        self.ctx.delta = delta;
        let events = std::mem::take(&mut self.events);
        let mut first_error = None;
        let mut frame = Frame::new(&mut self.world, host, &mut self.ctx);

        // Characters
        let characters: Vec<(Entity, CharacterKind)> = frame
            .world
            .query::<&Character>()
            .without::<&Inactive>()
            .iter()
            .map(|(e, c)| (e, c.kind))
            .collect();
        for (entity, kind) in characters {
            note(state_for(kind).update_state(&mut frame, entity), &mut first_error);
        }

        // Ships
        let ships: Vec<(Entity, ShipKind)> = frame
            .world
            .query::<&Ship>()
            .without::<&Inactive>()
            .iter()
            .map(|(e, s)| (e, s.kind))
            .collect();
        for (entity, kind) in ships {
            ship_state_for(kind).update_state(&mut frame, entity);
        }

        note(run_sequences(&mut frame), &mut first_error);

        for event in events {
            if !frame.world.contains(event.entity()) {
                debug!("dropped {:?} for a despawned entity", event);
                continue;
            }
            note(dispatch(&mut frame, event), &mut first_error);
        }

        deliver_damage(&mut frame);

        door_system(&mut frame);
        projectile_system(&mut frame);
        pickup_system(&mut frame);
        note(spawner_system(&mut frame), &mut first_error);

        despawn_system(&mut frame);

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn note(result: GameResult<()>, first: &mut Option<GameError>) {
    if let Err(err) = result {
        error!("{}", err);
        if first.is_none() {
            *first = Some(err);
        }
    }
}

fn dispatch(frame: &mut Frame<'_>, event: FrameEvent) -> GameResult<()> {
    match event {
        FrameEvent::Trigger { entity, contact } => {
            route_contact(frame, entity, contact, false);
            Ok(())
        }
        FrameEvent::Collision { entity, contact } => {
            route_contact(frame, entity, contact, true);
            Ok(())
        }
        FrameEvent::Animation { entity, event } => animation_event(frame, entity, event),
        FrameEvent::Input { entity, input } => player_input(frame, entity, input),
    }
}

/// Hand a contact to whatever the receiving entity is.
fn route_contact(frame: &mut Frame<'_>, entity: Entity, contact: Contact, collision: bool) {
    if !frame.world.contains(contact.other) {
        return;
    }
    if frame.world.get::<&Inactive>(entity).is_ok() {
        return;
    }

    if let Ok(kind) = frame.world.get::<&Character>(entity).map(|c| c.kind) {
        let state = state_for(kind);
        if collision {
            state.handle_collision(frame, entity, contact);
        } else {
            state.handle_trigger(frame, entity, contact);
        }
        return;
    }
    if let Ok(kind) = frame.world.get::<&Ship>(entity).map(|s| s.kind) {
        let state = ship_state_for(kind);
        if collision {
            state.handle_collision(frame, entity, contact);
        } else {
            state.handle_trigger(frame, entity, contact);
        }
        return;
    }
    if frame.world.get::<&Projectile>(entity).is_ok() {
        handle_projectile_contact(frame, entity, contact);
        return;
    }
    if collision {
        return;
    }
    if frame.world.get::<&Door>(entity).is_ok() {
        handle_door_contact(frame, entity, contact);
    } else if frame.world.get::<&PowerUp>(entity).is_ok() {
        handle_power_up_contact(frame, entity, contact);
    } else if frame.world.get::<&KeyPickup>(entity).is_ok() {
        handle_key_contact(frame, entity, contact);
    } else if frame.world.get::<&DoorSwitch>(entity).is_ok() {
        handle_switch_contact(frame, entity, contact);
    }
}

fn animation_event(frame: &mut Frame<'_>, entity: Entity, event: AnimationEvent) -> GameResult<()> {
    let kind = {
        let Ok(mut c) = frame.world.get::<&mut Character>(entity) else {
            return Ok(());
        };
        match event {
            AnimationEvent::ChargeComplete => c.charging_finished = true,
            AnimationEvent::ShootComplete => c.shooting_finished = true,
            AnimationEvent::AttackComplete => {
                if c.attacking {
                    c.attack_landed = true;
                }
            }
            AnimationEvent::HitComplete | AnimationEvent::DeadComplete => {}
        }
        c.kind
    };
    match event {
        AnimationEvent::HitComplete => {
            frame.host.set_particle_active(entity, ParticleFx::Hit, false);
            Ok(())
        }
        AnimationEvent::DeadComplete => state_for(kind).dead_finished(frame, entity),
        _ => Ok(()),
    }
}

fn player_input(frame: &mut Frame<'_>, entity: Entity, input: PlayerInput) -> GameResult<()> {
    if let PlayerInput::ExitShip(pressed) = input {
        let Some(ship) = piloted_ship(frame.world, entity) else {
            return Ok(());
        };
        let Ok(kind) = frame.world.get::<&Ship>(ship).map(|s| s.kind) else {
            return Ok(());
        };
        return ship_state_for(kind).input_exit_ship(frame, ship, pressed);
    }

    if frame.world.get::<&Inactive>(entity).is_ok() {
        return Ok(());
    }
    let Ok(kind) = frame.world.get::<&Character>(entity).map(|c| c.kind) else {
        return Ok(());
    };
    let state = state_for(kind);
    match input {
        PlayerInput::Attack(pressed) => state.input_attack(frame, entity, pressed),
        PlayerInput::Aim(pressed) => state.input_aim(frame, entity, pressed),
        PlayerInput::Shoot(pressed) => state.input_shoot(frame, entity, pressed),
        PlayerInput::EnterShip(pressed) => return state.input_enter_ship(frame, entity, pressed),
        PlayerInput::AimAt(point) => {
            if let Ok(mut c) = frame.world.get::<&mut Character>(entity) {
                c.aim_point = Some(point);
            }
        }
        PlayerInput::ExitShip(_) => {}
    }
    Ok(())
}

/// The ship `entity` is, or the ship it is piloting.
fn piloted_ship(world: &World, entity: Entity) -> Option<Entity> {
    if world.get::<&Ship>(entity).is_ok() {
        return Some(entity);
    }
    world
        .query::<&Ship>()
        .iter()
        .find(|(_, s)| s.pilot == Some(entity))
        .map(|(e, _)| e)
}

/// Apply the frame's queued damage and point each victim at its attacker.
fn deliver_damage(frame: &mut Frame<'_>) {
    for pending in frame.ctx.inbox.take() {
        if frame.world.get::<&Inactive>(pending.victim).is_ok() {
            continue;
        }
        let Ok(kind) = frame.world.get::<&Character>(pending.victim).map(|c| c.kind) else {
            continue;
        };
        state_for(kind).take_damage(frame, pending.victim, pending.amount);
        if let Some(source) = pending.source {
            if frame.world.contains(source) {
                targeting::force_target(frame.world, pending.victim, source);
            }
        }
    }
}

fn despawn_system(frame: &mut Frame<'_>) {
    let delta = frame.delta();
    let mut due = Vec::new();
    for (entity, timer) in frame.world.query_mut::<&mut DespawnTimer>() {
        timer.remaining -= delta;
        if timer.remaining <= 0.0 {
            due.push(entity);
        }
    }
    for entity in due {
        if frame.world.despawn(entity).is_ok() {
            frame.host.destroyed(entity);
            debug!("despawned {:?}", entity);
        }
    }
}
