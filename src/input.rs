//! Input-state snapshot.
//!
//! Host events arrive whenever they like and are folded into `Controls`;
//! the frame loop samples one `InputSnapshot` at the start of each tick.
//! Movement is level-triggered (held flags), firing is edge-triggered.

use crate::config::Tuning;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    /// Space: start, restart and fire.
    Fire,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// Touch position in play-area pixels.
    TouchStart { x: f32, y: f32 },
    TouchEnd,
}

/// One-shot actions produced by an input edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Space press or centre tap: start, restart, or fire depending on lifecycle.
    Trigger,
    /// Side-zone tap.  Only meaningful before the game starts (it starts it).
    Tap,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
}

#[derive(Clone, Debug, Default)]
pub struct Controls {
    left: bool,
    right: bool,
    fire_held: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TouchZone {
    Left,
    Centre,
    Right,
}

fn touch_zone(x: f32, tuning: &Tuning) -> TouchZone {
    let viewport = tuning.viewport;
    let side = viewport.width * tuning.touch_zone_fraction;
    if x < side {
        TouchZone::Left
    } else if x > viewport.width - side {
        TouchZone::Right
    } else {
        TouchZone::Centre
    }
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one host event into the control state.
    pub fn apply(&mut self, event: InputEvent, tuning: &Tuning) -> Option<Action> {
        match event {
            InputEvent::KeyDown(Key::Left) => {
                self.left = true;
                None
            }
            InputEvent::KeyDown(Key::Right) => {
                self.right = true;
                None
            }
            InputEvent::KeyDown(Key::Fire) => {
                // Auto-repeat while held must not fire again
                if self.fire_held {
                    return None;
                }
                self.fire_held = true;
                Some(Action::Trigger)
            }
            InputEvent::KeyUp(Key::Left) => {
                self.left = false;
                None
            }
            InputEvent::KeyUp(Key::Right) => {
                self.right = false;
                None
            }
            InputEvent::KeyUp(Key::Fire) => {
                self.fire_held = false;
                None
            }
            InputEvent::TouchStart { x, .. } => match touch_zone(x, tuning) {
                TouchZone::Left => {
                    self.left = true;
                    Some(Action::Tap)
                }
                TouchZone::Right => {
                    self.right = true;
                    Some(Action::Tap)
                }
                TouchZone::Centre => Some(Action::Trigger),
            },
            InputEvent::TouchEnd => {
                self.left = false;
                self.right = false;
                None
            }
        }
    }

    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            left: self.left,
            right: self.right,
        }
    }
}
