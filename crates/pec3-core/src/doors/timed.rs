use hecs::Entity;
use log::debug;
use pec3_logic::timer::{Countdown, CountdownTick};

use super::{DoorBehaviour, DoorMechanism, DoorType};
use crate::context::Frame;

/// Opened by a switch for `max_time` seconds. Pressing again restarts the
/// countdown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timed {
    pub max_time: f32,
    pub countdown: Countdown,
}

impl Timed {
    pub fn new(max_time: f32) -> Self {
        Self {
            max_time,
            countdown: Countdown::default(),
        }
    }
}

impl DoorBehaviour for Timed {
    fn door_type(&self) -> DoorType {
        DoorType::Timed
    }

    fn update(&mut self, frame: &mut Frame<'_>, door: &mut DoorMechanism) {
        if door.timer_button_pressed {
            door.timer_button_pressed = false;
            self.countdown.start(self.max_time);
            door.open();
            debug!("timed door armed for {:.1}s", self.max_time);
        }
        match self.countdown.tick(frame.delta()) {
            CountdownTick::Idle => {}
            CountdownTick::Running(remaining) => frame.host.update_timer_display(remaining, true),
            CountdownTick::Expired => {
                door.close();
                frame.host.update_timer_display(0.0, false);
            }
        }
    }

    fn on_enter(&mut self, frame: &mut Frame<'_>, _door: &mut DoorMechanism, _player: Entity) {
        if self.countdown.remaining() <= 0.0 {
            frame.message("Switch needed");
        }
    }

    fn on_stay(&mut self, _frame: &mut Frame<'_>, _door: &mut DoorMechanism, _player: Entity) {}

    fn on_exit(&mut self, _frame: &mut Frame<'_>, _door: &mut DoorMechanism, _player: Entity) {}
}
