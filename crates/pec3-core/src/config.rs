//! Arena configuration: tuning settings, the prefab catalog and enemy
//! spawners, loaded from JSON and validated before the engine starts.

use std::collections::HashMap;
use std::fmt;

use pec3_logic::weighted::WeightedTable;
use pec3_logic::Vec3;
use serde::{Deserialize, Serialize};

use crate::components::{CharacterKind, CharacterStats, KeyColor, PowerUpKind, Tag};
use crate::error::ConfigError;

/// Global tuning knobs. Every field has a default, so a config file only
/// needs to name what it overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Enemy vitals and melee damage multiplier
    pub difficulty: f32,
    /// Character and ship speed multiplier
    pub game_speed: f32,
    /// Spawners stop producing while this many enemies are alive
    pub max_enemies: usize,
    pub optional_drop_chance: f32,
    /// Dropped items appear this far above the corpse
    pub drop_height: f32,
    /// Melee hit-scans start this far above the attacker's feet
    pub attack_ray_height: f32,
    pub powerup_restore_fraction: f32,
    pub powerup_fade_after: f32,
    pub powerup_fade_duration: f32,
    pub powerup_blink_interval: f32,
    pub message_duration: f32,
    /// Scale lost per second while a corpse shrinks away
    pub death_shrink_rate: f32,
    pub explosion_duration: f32,
    pub rig_lerp_duration: f32,
    pub door_snap_epsilon: f32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            difficulty: 1.0,
            game_speed: 1.0,
            max_enemies: 10,
            optional_drop_chance: 0.25,
            drop_height: 1.0,
            attack_ray_height: 1.0,
            powerup_restore_fraction: 0.25,
            powerup_fade_after: 5.0,
            powerup_fade_duration: 5.0,
            powerup_blink_interval: 0.1,
            message_duration: 2.0,
            death_shrink_rate: 0.6,
            explosion_duration: 2.0,
            rig_lerp_duration: 1.0,
            door_snap_epsilon: 0.001,
        }
    }
}

impl GameSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("difficulty", self.difficulty),
            ("game_speed", self.game_speed),
            ("powerup_blink_interval", self.powerup_blink_interval),
            ("death_shrink_rate", self.death_shrink_rate),
            ("door_snap_epsilon", self.door_snap_epsilon),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::InvalidSetting { name, value });
            }
        }
        let fractions = [
            ("optional_drop_chance", self.optional_drop_chance),
            ("powerup_restore_fraction", self.powerup_restore_fraction),
        ];
        for (name, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidSetting { name, value });
            }
        }
        let durations = [
            ("powerup_fade_after", self.powerup_fade_after),
            ("powerup_fade_duration", self.powerup_fade_duration),
            ("message_duration", self.message_duration),
            ("explosion_duration", self.explosion_duration),
            ("rig_lerp_duration", self.rig_lerp_duration),
        ];
        for (name, value) in durations {
            if !(value >= 0.0) {
                return Err(ConfigError::InvalidSetting { name, value });
            }
        }
        Ok(())
    }
}

/// Name of a prefab in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrefabId(pub String);

impl PrefabId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PrefabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PrefabId {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

/// A combatant template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterPrefab {
    pub kind: CharacterKind,
    #[serde(default)]
    pub stats: CharacterStats,
    /// Always dropped on death when set; optional drops are then skipped
    #[serde(default)]
    pub mandatory_drop: Option<PrefabId>,
    #[serde(default)]
    pub optional_drops: Vec<PrefabId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUpPrefab {
    pub kind: PowerUpKind,
    /// Persistent power-ups never blink out
    #[serde(default)]
    pub persistent: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyPrefab {
    pub color: KeyColor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectilePrefab {
    pub speed: f32,
    pub damage: f32,
    pub lifetime: f32,
    /// Tags this projectile damages on contact
    pub hits: Vec<Tag>,
}

impl Default for ProjectilePrefab {
    fn default() -> Self {
        Self {
            speed: 20.0,
            damage: 25.0,
            lifetime: 5.0,
            hits: vec![Tag::Enemy],
        }
    }
}

/// Everything the engine knows how to instantiate by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Prefab {
    Character(CharacterPrefab),
    PowerUp(PowerUpPrefab),
    Key(KeyPrefab),
    Projectile(ProjectilePrefab),
}

impl Prefab {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Character(_) => "character",
            Self::PowerUp(_) => "power_up",
            Self::Key(_) => "key",
            Self::Projectile(_) => "projectile",
        }
    }

    /// Whether a character may drop this prefab.
    pub fn is_item(&self) -> bool {
        matches!(self, Self::PowerUp(_) | Self::Key(_))
    }
}

/// Prefab lookup by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrefabCatalog {
    prefabs: HashMap<PrefabId, Prefab>,
}

impl PrefabCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<PrefabId>, prefab: Prefab) {
        self.prefabs.insert(id.into(), prefab);
    }

    pub fn with(mut self, id: impl Into<PrefabId>, prefab: Prefab) -> Self {
        self.insert(id, prefab);
        self
    }

    pub fn len(&self) -> usize {
        self.prefabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefabs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PrefabId, &Prefab)> {
        self.prefabs.iter()
    }

    pub fn get(&self, id: &PrefabId) -> Result<&Prefab, ConfigError> {
        self.prefabs
            .get(id)
            .ok_or_else(|| ConfigError::UnknownPrefab(id.clone()))
    }

    pub fn character(&self, id: &PrefabId) -> Result<&CharacterPrefab, ConfigError> {
        match self.get(id)? {
            Prefab::Character(prefab) => Ok(prefab),
            other => Err(wrong_type(id, "character", other)),
        }
    }

    pub fn projectile(&self, id: &PrefabId) -> Result<&ProjectilePrefab, ConfigError> {
        match self.get(id)? {
            Prefab::Projectile(prefab) => Ok(prefab),
            other => Err(wrong_type(id, "projectile", other)),
        }
    }

    /// Check every cross-reference between prefabs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (id, prefab) in &self.prefabs {
            match prefab {
                Prefab::Character(character) => {
                    let drops = character
                        .mandatory_drop
                        .iter()
                        .chain(character.optional_drops.iter());
                    for drop in drops {
                        let item = self.get(drop)?;
                        if !item.is_item() {
                            return Err(wrong_type(drop, "power_up or key", item));
                        }
                    }
                    if let Some(projectile) = &character.stats.projectile {
                        self.projectile(projectile)?;
                    }
                }
                Prefab::Key(key) if key.color == KeyColor::All => {
                    return Err(ConfigError::KeyPickupAll(id.clone()));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

fn wrong_type(id: &PrefabId, expected: &'static str, found: &Prefab) -> ConfigError {
    ConfigError::WrongPrefabType {
        id: id.clone(),
        expected,
        found: found.type_name(),
    }
}

/// One row of a spawner's weighted table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnEntry {
    pub prefab: PrefabId,
    pub weight: u32,
}

/// A periodic enemy spawner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnerSpec {
    pub name: String,
    pub position: Vec3,
    pub entries: Vec<SpawnEntry>,
    /// Enemies per wave, indexed by elapsed intervals; the last entry repeats
    pub waves: Vec<u32>,
    pub time_between_spawns: f32,
}

impl SpawnerSpec {
    pub fn table(&self) -> Result<WeightedTable<PrefabId>, ConfigError> {
        let entries = self
            .entries
            .iter()
            .map(|entry| (entry.prefab.clone(), entry.weight))
            .collect();
        WeightedTable::new(entries).ok_or_else(|| ConfigError::EmptySpawnTable(self.name.clone()))
    }

    pub fn validate(&self, catalog: &PrefabCatalog) -> Result<(), ConfigError> {
        self.table()?;
        if self.waves.is_empty() {
            return Err(ConfigError::EmptySchedule(self.name.clone()));
        }
        for entry in &self.entries {
            catalog.character(&entry.prefab)?;
        }
        if !(self.time_between_spawns > 0.0) {
            return Err(ConfigError::InvalidSetting {
                name: "time_between_spawns",
                value: self.time_between_spawns,
            });
        }
        Ok(())
    }
}

/// Top-level arena configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArenaConfig {
    #[serde(default)]
    pub settings: GameSettings,
    #[serde(default)]
    pub prefabs: PrefabCatalog,
    #[serde(default)]
    pub spawners: Vec<SpawnerSpec>,
}

impl ArenaConfig {
    /// Parse and validate a JSON arena file.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.settings.validate()?;
        self.prefabs.validate()?;
        for spawner in &self.spawners {
            spawner.validate(&self.prefabs)?;
        }
        Ok(())
    }
}
