//! Multi-frame action sequences as explicit resumable tasks.
//!
//! Each task is stamped with the owner's life epoch when scheduled. Death,
//! explosion and kind changes advance the epoch, so a task from an earlier
//! life is discarded the next time it would run instead of touching the new
//! life's state.

use hecs::Entity;
use log::debug;
use pec3_logic::motion::blend_weight;

use crate::components::{Character, Transform};
use crate::context::Frame;
use crate::error::GameResult;
use crate::host::{AnimParam, ParticleFx, Rig};
use crate::states::state_for;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Task {
    /// Waits for the attack-complete signal, then resolves the hit
    AttackWindup,
    /// Waits for the shoot-complete signal, then clears the shot flags
    ShootRelease,
    RigBlend {
        rig: Rig,
        from: f32,
        to: f32,
        duration: f32,
        elapsed: f32,
    },
    /// Shrinks the corpse to nothing, then destroys it
    DeathShrink,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scheduled {
    pub life: u32,
    pub task: Task,
}

/// Tasks in flight for one entity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sequences {
    tasks: Vec<Scheduled>,
}

impl Sequences {
    pub fn push(&mut self, life: u32, task: Task) {
        self.tasks.push(Scheduled { life, task });
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scheduled> {
        self.tasks.iter()
    }

    /// Drop a swing still waiting for its hit frame.
    pub fn cancel_windup(&mut self) {
        self.tasks.retain(|s| s.task != Task::AttackWindup);
    }

    /// Drop any blend already driving `rig`.
    pub fn cancel_rig(&mut self, rig: Rig) {
        self.tasks
            .retain(|s| !matches!(s.task, Task::RigBlend { rig: r, .. } if r == rig));
    }
}

/// Schedule `task` on `entity` for its current life.
pub fn schedule(frame: &mut Frame<'_>, entity: Entity, task: Task) {
    let Ok(life) = frame.world.get::<&Character>(entity).map(|c| c.life) else {
        return;
    };
    if let Ok(mut sequences) = frame.world.get::<&mut Sequences>(entity) {
        sequences.push(life, task);
    }
}

fn life_of(frame: &Frame<'_>, entity: Entity) -> Option<u32> {
    frame.world.get::<&Character>(entity).ok().map(|c| c.life)
}

/// Step every in-flight task once.
pub fn run_sequences(frame: &mut Frame<'_>) -> GameResult<()> {
    let owners: Vec<Entity> = frame
        .world
        .query::<&Sequences>()
        .iter()
        .filter(|(_, s)| !s.is_empty())
        .map(|(e, _)| e)
        .collect();

    for owner in owners {
        let tasks = match frame.world.get::<&mut Sequences>(owner) {
            Ok(mut sequences) => std::mem::take(&mut sequences.tasks),
            Err(_) => continue,
        };

        let mut kept = Vec::with_capacity(tasks.len());
        for scheduled in tasks {
            if life_of(frame, owner) != Some(scheduled.life) {
                debug!("{:?} dropped stale {:?}", owner, scheduled.task);
                continue;
            }
            if let Some(task) = step(frame, owner, scheduled.task)? {
                kept.push(Scheduled {
                    life: scheduled.life,
                    task,
                });
            }
        }

        let life = life_of(frame, owner);
        if let Ok(mut sequences) = frame.world.get::<&mut Sequences>(owner) {
            kept.retain(|s| Some(s.life) == life);
            // Tasks scheduled while stepping run after the survivors
            kept.append(&mut sequences.tasks);
            sequences.tasks = kept;
        }
    }
    Ok(())
}

/// Advance one task. `None` means it completed.
fn step(frame: &mut Frame<'_>, owner: Entity, task: Task) -> GameResult<Option<Task>> {
    match task {
        Task::AttackWindup => {
            let landed = match frame.world.get::<&mut Character>(owner) {
                Ok(mut c) if c.attack_landed => {
                    c.attack_landed = false;
                    c.attacking = false;
                    Some(c.kind)
                }
                Ok(_) => None,
                Err(_) => return Ok(None),
            };
            match landed {
                Some(kind) => {
                    state_for(kind).attack_finished(frame, owner);
                    Ok(None)
                }
                None => Ok(Some(task)),
            }
        }
        Task::ShootRelease => {
            let released = match frame.world.get::<&mut Character>(owner) {
                Ok(mut c) if c.shooting_finished => {
                    c.shooting = false;
                    c.shooting_started = false;
                    c.shooting_finished = false;
                    true
                }
                Ok(_) => false,
                Err(_) => return Ok(None),
            };
            if released {
                frame.host.set_bool(owner, AnimParam::Shooting, false);
                Ok(None)
            } else {
                Ok(Some(task))
            }
        }
        Task::RigBlend {
            rig,
            from,
            to,
            duration,
            elapsed,
        } => {
            let elapsed = elapsed + frame.delta();
            frame
                .host
                .set_rig_weight(owner, rig, blend_weight(from, to, elapsed, duration));
            if elapsed >= duration {
                Ok(None)
            } else {
                Ok(Some(Task::RigBlend {
                    rig,
                    from,
                    to,
                    duration,
                    elapsed,
                }))
            }
        }
        Task::DeathShrink => {
            let shrink = frame.settings().death_shrink_rate * frame.delta();
            let gone = match frame.world.get::<&mut Transform>(owner) {
                Ok(mut transform) => {
                    transform.scale = (transform.scale - shrink).max(0.0);
                    transform.scale <= 0.0
                }
                Err(_) => return Ok(None),
            };
            if !gone {
                return Ok(Some(task));
            }
            frame
                .host
                .set_particle_active(owner, ParticleFx::AfterDeath, true);
            frame.destroy(owner, 0.0);
            debug!("{:?} shrank away", owner);
            Ok(None)
        }
    }
}
