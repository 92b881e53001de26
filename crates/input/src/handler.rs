//! Held-key tracking for terminal environments.
//!
//! The session expects, every tick, the set of intents currently active:
//! movement and soft drop while their key is held, everything else once per
//! press. Terminals often report presses only, so a key counts as held once
//! a repeat press arrives, and is released after a quiet period without one.
//! A single press is reported for exactly one tick.

use crossterm::event::KeyCode;

use arrayvec::ArrayVec;

use crate::map::intent_for_code;
use crate::types::Intent;

/// Intents reported for one tick
pub type TickIntents = ArrayVec<Intent, 8>;

/// Direction for horizontal movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalDirection {
    Left,
    Right,
    None,
}

impl HorizontalDirection {
    fn intent(self) -> Option<Intent> {
        match self {
            HorizontalDirection::Left => Some(Intent::MoveLeft),
            HorizontalDirection::Right => Some(Intent::MoveRight),
            HorizontalDirection::None => None,
        }
    }
}

const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 150;

/// Tracks key state between ticks.
#[derive(Debug, Clone)]
pub struct InputHandler {
    horizontal: HorizontalDirection,
    horizontal_held: bool,
    horizontal_tapped: Option<Intent>,
    horizontal_idle_ms: u32,
    down_pressed: bool,
    down_held: bool,
    down_tapped: bool,
    down_idle_ms: u32,
    pending: TickIntents,
    key_release_timeout_ms: u32,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            horizontal: HorizontalDirection::None,
            horizontal_held: false,
            horizontal_tapped: None,
            horizontal_idle_ms: 0,
            down_pressed: false,
            down_held: false,
            down_tapped: false,
            down_idle_ms: 0,
            pending: TickIntents::new(),
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    pub fn horizontal(&self) -> HorizontalDirection {
        self.horizontal
    }

    /// Whether the movement or soft drop key is reported on every tick
    pub fn is_held(&self, intent: Intent) -> bool {
        match intent {
            Intent::SoftDrop => self.down_held,
            Intent::MoveLeft | Intent::MoveRight => {
                self.horizontal_held && self.horizontal.intent() == Some(intent)
            }
            _ => false,
        }
    }

    /// Record a press (or terminal auto-repeat) of `code`.
    pub fn handle_key_press(&mut self, code: KeyCode) -> Option<Intent> {
        let intent = intent_for_code(code)?;
        if !intent.is_level_triggered() {
            if !self.pending.contains(&intent) {
                let _ = self.pending.try_push(intent);
            }
            return Some(intent);
        }

        if intent == Intent::SoftDrop {
            self.down_held = self.down_pressed;
            self.down_pressed = true;
            self.down_tapped = true;
            self.down_idle_ms = 0;
        } else {
            // the latest direction wins
            let direction = if intent == Intent::MoveLeft {
                HorizontalDirection::Left
            } else {
                HorizontalDirection::Right
            };
            self.horizontal_held = self.horizontal == direction;
            self.horizontal = direction;
            self.horizontal_tapped = Some(intent);
            self.horizontal_idle_ms = 0;
        }
        Some(intent)
    }

    pub fn handle_key_release(&mut self, code: KeyCode) {
        match intent_for_code(code) {
            Some(Intent::MoveLeft) if self.horizontal == HorizontalDirection::Left => {
                self.release_horizontal();
            }
            Some(Intent::MoveRight) if self.horizontal == HorizontalDirection::Right => {
                self.release_horizontal();
            }
            Some(Intent::SoftDrop) => self.release_down(),
            _ => {}
        }
    }

    fn release_horizontal(&mut self) {
        self.horizontal = HorizontalDirection::None;
        self.horizontal_held = false;
    }

    fn release_down(&mut self) {
        self.down_pressed = false;
        self.down_held = false;
    }

    /// Collect the intents for the tick that just elapsed.
    ///
    /// A key pressed and released within one tick still shows up once.
    pub fn update(&mut self, elapsed_ms: u32) -> TickIntents {
        let mut intents = std::mem::take(&mut self.pending);

        // Auto-release when terminal does not emit release events.
        if self.horizontal != HorizontalDirection::None {
            self.horizontal_idle_ms = self.horizontal_idle_ms.saturating_add(elapsed_ms);
            if self.horizontal_idle_ms > self.key_release_timeout_ms {
                self.release_horizontal();
            }
        }
        if self.down_pressed {
            self.down_idle_ms = self.down_idle_ms.saturating_add(elapsed_ms);
            if self.down_idle_ms > self.key_release_timeout_ms {
                self.release_down();
            }
        }

        let held = if self.horizontal_held {
            self.horizontal.intent()
        } else {
            None
        };
        if let Some(intent) = held.or(self.horizontal_tapped) {
            let _ = intents.try_push(intent);
        }
        if self.down_held || self.down_tapped {
            let _ = intents.try_push(Intent::SoftDrop);
        }

        self.horizontal_tapped = None;
        self.down_tapped = false;
        intents
    }

    pub fn reset(&mut self) {
        *self = Self::new().with_key_release_timeout_ms(self.key_release_timeout_ms);
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
