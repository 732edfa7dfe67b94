//! In-memory host for tests and headless runs.
//!
//! Every call the core makes is appended to a public log; queries answer
//! from scriptable fields.

use hecs::Entity;
use pec3_logic::timer::format_countdown;
use pec3_logic::Vec3;

use crate::components::Transform;
use crate::config::PrefabId;
use crate::host::{
    AnimParam, Animation, CameraRig, LayerMask, Lifecycle, Navigation, ParticleFx, Presentation,
    RayHit, Rig, SoundCue, SpatialQuery,
};

#[derive(Debug, Clone)]
pub struct RecordingHost {
    // Scripted answers
    /// Returned by every ray cast
    pub ray_hit: Option<RayHit>,
    /// Whether `sample_position` finds the nav mesh
    pub nav_mesh: bool,
    pub overlap: bool,
    pub remaining_distance: f32,
    pub stopping_distance: f32,
    pub velocity: Vec3,

    // Recorded calls
    pub triggers: Vec<(Entity, AnimParam)>,
    pub bools: Vec<(Entity, AnimParam, bool)>,
    pub floats: Vec<(Entity, AnimParam, f32)>,
    pub rebinds: Vec<Entity>,
    pub rig_weights: Vec<(Entity, Rig, f32)>,
    pub look_at: Vec<(Entity, Option<Entity>)>,
    pub destinations: Vec<(Entity, Vec3)>,
    pub speeds: Vec<(Entity, f32, f32)>,
    pub angular_speeds: Vec<(Entity, f32)>,
    pub sounds: Vec<(Entity, SoundCue)>,
    pub particles: Vec<(Entity, ParticleFx, bool)>,
    pub visibility: Vec<(Entity, bool)>,
    pub messages: Vec<String>,
    pub bars: Vec<(f32, f32)>,
    pub key_icons: Vec<(bool, bool, bool)>,
    /// Timer text as shown, `None` when hidden
    pub timer: Vec<Option<String>>,
    pub game_over: Vec<String>,
    pub cameras: Vec<(CameraRig, Entity)>,
    pub spawned: Vec<(Entity, Option<PrefabId>)>,
    pub destroyed: Vec<Entity>,
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingHost {
    pub fn new() -> Self {
        Self {
            ray_hit: None,
            nav_mesh: true,
            overlap: false,
            remaining_distance: 0.0,
            stopping_distance: 0.0,
            velocity: Vec3::ZERO,
            triggers: Vec::new(),
            bools: Vec::new(),
            floats: Vec::new(),
            rebinds: Vec::new(),
            rig_weights: Vec::new(),
            look_at: Vec::new(),
            destinations: Vec::new(),
            speeds: Vec::new(),
            angular_speeds: Vec::new(),
            sounds: Vec::new(),
            particles: Vec::new(),
            visibility: Vec::new(),
            messages: Vec::new(),
            bars: Vec::new(),
            key_icons: Vec::new(),
            timer: Vec::new(),
            game_over: Vec::new(),
            cameras: Vec::new(),
            spawned: Vec::new(),
            destroyed: Vec::new(),
        }
    }

    /// Forget every recorded call, keeping the scripted answers.
    pub fn clear_log(&mut self) {
        let scripted = Self {
            ray_hit: self.ray_hit,
            nav_mesh: self.nav_mesh,
            overlap: self.overlap,
            remaining_distance: self.remaining_distance,
            stopping_distance: self.stopping_distance,
            velocity: self.velocity,
            ..Self::new()
        };
        *self = scripted;
    }

    pub fn has_message(&self, text: &str) -> bool {
        self.messages.iter().any(|m| m == text)
    }

    pub fn last_message(&self) -> Option<&str> {
        self.messages.last().map(String::as_str)
    }

    pub fn trigger_count(&self, entity: Entity, param: AnimParam) -> usize {
        self.triggers
            .iter()
            .filter(|(e, p)| *e == entity && *p == param)
            .count()
    }

    pub fn last_bool(&self, entity: Entity, param: AnimParam) -> Option<bool> {
        self.bools
            .iter()
            .rev()
            .find(|(e, p, _)| *e == entity && *p == param)
            .map(|(_, _, v)| *v)
    }

    pub fn sound_count(&self, entity: Entity, cue: SoundCue) -> usize {
        self.sounds
            .iter()
            .filter(|(e, c)| *e == entity && *c == cue)
            .count()
    }

    pub fn particle_state(&self, entity: Entity, fx: ParticleFx) -> Option<bool> {
        self.particles
            .iter()
            .rev()
            .find(|(e, f, _)| *e == entity && *f == fx)
            .map(|(_, _, on)| *on)
    }

    pub fn last_rig_weight(&self, entity: Entity, rig: Rig) -> Option<f32> {
        self.rig_weights
            .iter()
            .rev()
            .find(|(e, r, _)| *e == entity && *r == rig)
            .map(|(_, _, w)| *w)
    }

    pub fn last_destination(&self, entity: Entity) -> Option<Vec3> {
        self.destinations
            .iter()
            .rev()
            .find(|(e, _)| *e == entity)
            .map(|(_, p)| *p)
    }

    pub fn last_camera(&self) -> Option<(CameraRig, Entity)> {
        self.cameras.last().copied()
    }
}

impl SpatialQuery for RecordingHost {
    fn raycast(
        &self,
        _origin: Vec3,
        _direction: Vec3,
        _max_distance: f32,
        _mask: LayerMask,
    ) -> Option<RayHit> {
        self.ray_hit
    }

    fn overlap_sphere(&self, _point: Vec3, _radius: f32, _mask: LayerMask) -> bool {
        self.overlap
    }
}

impl Navigation for RecordingHost {
    fn sample_position(
        &self,
        point: Vec3,
        _max_distance: f32,
        _area_mask: LayerMask,
    ) -> Option<Vec3> {
        self.nav_mesh.then_some(point)
    }

    fn set_destination(&mut self, entity: Entity, point: Vec3) {
        self.destinations.push((entity, point));
    }

    fn set_speed(&mut self, entity: Entity, speed: f32, acceleration: f32) {
        self.speeds.push((entity, speed, acceleration));
    }

    fn set_angular_speed(&mut self, entity: Entity, degrees_per_second: f32) {
        self.angular_speeds.push((entity, degrees_per_second));
    }

    fn remaining_distance(&self, _entity: Entity) -> f32 {
        self.remaining_distance
    }

    fn stopping_distance(&self, _entity: Entity) -> f32 {
        self.stopping_distance
    }

    fn velocity(&self, _entity: Entity) -> Vec3 {
        self.velocity
    }
}

impl Animation for RecordingHost {
    fn set_trigger(&mut self, entity: Entity, param: AnimParam) {
        self.triggers.push((entity, param));
    }

    fn set_bool(&mut self, entity: Entity, param: AnimParam, value: bool) {
        self.bools.push((entity, param, value));
    }

    fn set_float(&mut self, entity: Entity, param: AnimParam, value: f32) {
        self.floats.push((entity, param, value));
    }

    fn rebind(&mut self, entity: Entity) {
        self.rebinds.push(entity);
    }

    fn set_rig_weight(&mut self, entity: Entity, rig: Rig, weight: f32) {
        self.rig_weights.push((entity, rig, weight));
    }

    fn set_look_at(&mut self, entity: Entity, target: Option<Entity>) {
        self.look_at.push((entity, target));
    }
}

impl Presentation for RecordingHost {
    fn play_sound(&mut self, entity: Entity, cue: SoundCue) {
        self.sounds.push((entity, cue));
    }

    fn set_particle_active(&mut self, entity: Entity, fx: ParticleFx, active: bool) {
        self.particles.push((entity, fx, active));
    }

    fn set_visible(&mut self, entity: Entity, visible: bool) {
        self.visibility.push((entity, visible));
    }

    fn show_message(&mut self, text: &str, _duration: f32) {
        self.messages.push(text.to_string());
    }

    fn update_health_shield_bars(&mut self, health: f32, shield: f32) {
        self.bars.push((health, shield));
    }

    fn update_key_icons(&mut self, red: bool, green: bool, blue: bool) {
        self.key_icons.push((red, green, blue));
    }

    fn update_timer_display(&mut self, seconds: f32, visible: bool) {
        self.timer.push(visible.then(|| format_countdown(seconds)));
    }

    fn show_game_over(&mut self, text: &str) {
        self.game_over.push(text.to_string());
    }

    fn focus_camera(&mut self, rig: CameraRig, follow: Entity) {
        self.cameras.push((rig, follow));
    }
}

impl Lifecycle for RecordingHost {
    fn spawned(&mut self, entity: Entity, prefab: Option<&PrefabId>, _transform: &Transform) {
        self.spawned.push((entity, prefab.cloned()));
    }

    fn destroyed(&mut self, entity: Entity) {
        self.destroyed.push(entity);
    }
}
