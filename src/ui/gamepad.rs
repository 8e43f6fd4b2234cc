/// Gamepad input using gilrs (behind the `gamepad` feature).
///
/// Only presses count, matching the keyboard:
///   D-pad / Left Stick    →  Move (one step per press / stick push)
///   Quit buttons          →  Quit   (config.toml `[gamepad] quit`, default Select)
///   Any other button      →  Other  (dismisses the intro)

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};
#[cfg(feature = "gamepad")]
use tracing::{info, warn};

use crate::config::GamepadConfig;
use crate::domain::actor::Direction;
use crate::sim::event::Command;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.5;

/// Logical button identifiers (one per physical button).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,      // LeftTrigger
    R1,      // RightTrigger
    Start,
    Select,
}

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH"  => Some(Btn::A),
            "B" | "EAST"   => Some(Btn::B),
            "X" | "WEST"   => Some(Btn::X),
            "Y" | "NORTH"  => Some(Btn::Y),
            "L1" | "LB" => Some(Btn::L1),
            "R1" | "RB" => Some(Btn::R1),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South     => Some(Btn::A),
            Button::East      => Some(Btn::B),
            Button::West      => Some(Btn::X),
            Button::North     => Some(Btn::Y),
            Button::LeftTrigger  => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::Start     => Some(Btn::Start),
            Button::Select    => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Which stick direction is currently pushed past the deadzone.
#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
fn stick_direction(x: f32, y: f32) -> Option<Direction> {
    if x.abs() >= y.abs() {
        if x < -STICK_DEADZONE {
            Some(Direction::Left)
        } else if x > STICK_DEADZONE {
            Some(Direction::Right)
        } else {
            None
        }
    } else if y > STICK_DEADZONE {
        Some(Direction::Up)
    } else if y < -STICK_DEADZONE {
        Some(Direction::Down)
    } else {
        None
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    quit_buttons: Vec<Btn>,

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick_x: f32,
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick_y: f32,
    /// Stick direction at the end of the previous poll (edge detection).
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick_dir: Option<Direction>,

    commands: Vec<Command>,
}

impl GamepadState {
    pub fn new(cfg: &GamepadConfig) -> Self {
        #[cfg(feature = "gamepad")]
        let gilrs_opt = match Gilrs::new() {
            Ok(g) => {
                if g.gamepads().next().is_some() {
                    info!("gamepad connected");
                }
                Some(g)
            }
            Err(e) => {
                warn!(error = %e, "gamepad support unavailable");
                None
            }
        };

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            quit_buttons: parse_buttons(&cfg.quit),
            stick_x: 0.0,
            stick_y: 0.0,
            stick_dir: None,
            commands: Vec::with_capacity(4),
        }
    }

    /// Drain pending pad events into commands (empty without the feature).
    pub fn drain_events(&mut self) -> &[Command] {
        self.commands.clear();

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();

        &self.commands
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    let cmd = self.decode_button(btn);
                    self.commands.push(cmd);
                }
                EventType::AxisChanged(Axis::LeftStickX, value, _) => self.stick_x = value,
                EventType::AxisChanged(Axis::LeftStickY, value, _) => self.stick_y = value,
                EventType::Connected => info!("gamepad connected"),
                EventType::Disconnected => {
                    info!("gamepad disconnected");
                    self.stick_x = 0.0;
                    self.stick_y = 0.0;
                }
                _ => {}
            }
        }

        let dir = stick_direction(self.stick_x, self.stick_y);
        if dir.is_some() && dir != self.stick_dir {
            self.commands.extend(dir.map(Command::Move));
        }
        self.stick_dir = dir;
    }

    #[cfg(feature = "gamepad")]
    fn decode_button(&self, btn: Button) -> Command {
        match btn {
            Button::DPadUp => Command::Move(Direction::Up),
            Button::DPadDown => Command::Move(Direction::Down),
            Button::DPadLeft => Command::Move(Direction::Left),
            Button::DPadRight => Command::Move(Direction::Right),
            other => match Btn::from_gilrs(other) {
                Some(b) if self.quit_buttons.contains(&b) => Command::Quit,
                _ => Command::Other,
            },
        }
    }
}

/// Unknown names are skipped; an empty result falls back to Select.
fn parse_buttons(names: &[String]) -> Vec<Btn> {
    let btns: Vec<Btn> = names.iter().filter_map(|s| Btn::from_name(s)).collect();
    if btns.is_empty() { vec![Btn::Select] } else { btns }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_names_are_case_insensitive() {
        assert_eq!(Btn::from_name("select"), Some(Btn::Select));
        assert_eq!(Btn::from_name("Back"), Some(Btn::Select));
        assert_eq!(Btn::from_name("south"), Some(Btn::A));
        assert_eq!(Btn::from_name("turbo"), None);
    }

    #[test]
    fn quit_buttons_fall_back_to_select() {
        assert_eq!(parse_buttons(&["nope".into()]), vec![Btn::Select]);
        assert_eq!(parse_buttons(&["Start".into(), "B".into()]), vec![Btn::Start, Btn::B]);
    }

    #[test]
    fn configured_quit_buttons_are_kept_on_the_state() {
        let state = GamepadState::new(&GamepadConfig { quit: vec!["Start".into()] });
        assert_eq!(state.quit_buttons, vec![Btn::Start]);
    }

    #[test]
    fn stick_needs_deadzone_and_dominant_axis() {
        assert_eq!(stick_direction(0.1, -0.2), None);
        assert_eq!(stick_direction(-0.9, 0.3), Some(Direction::Left));
        assert_eq!(stick_direction(0.9, 0.0), Some(Direction::Right));
        assert_eq!(stick_direction(0.2, 0.8), Some(Direction::Up));
        assert_eq!(stick_direction(0.0, -0.8), Some(Direction::Down));
    }
}
