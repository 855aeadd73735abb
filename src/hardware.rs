//! In-memory model of the control panel: one key switch, three colored
//! toggle switches and four rotary encoders.
//!
//! The model starts fully unknown and converges as telemetry arrives.
//! Every mutation goes through [`HardwareSnapshot::apply`], so the rest
//! of the app only ever sees states that some event actually reported.

use serde::Deserialize;

pub const ENCODER_COUNT: usize = 4;
pub const SWITCH_COUNT: usize = 3;

/// The three colored switches on the panel, in panel order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwitchColor {
    Red,
    Green,
    Blue,
}

impl SwitchColor {
    pub const ALL: [SwitchColor; SWITCH_COUNT] =
        [SwitchColor::Red, SwitchColor::Green, SwitchColor::Blue];

    pub fn label(&self) -> &'static str {
        match self {
            SwitchColor::Red => "RED",
            SwitchColor::Green => "GREEN",
            SwitchColor::Blue => "BLUE",
        }
    }

    /// Fixed RGB used everywhere this color is drawn.
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            SwitchColor::Red => (255, 0, 0),
            SwitchColor::Green => (0, 255, 0),
            SwitchColor::Blue => (0, 128, 255),
        }
    }

    pub fn index(&self) -> usize {
        match self {
            SwitchColor::Red => 0,
            SwitchColor::Green => 1,
            SwitchColor::Blue => 2,
        }
    }
}

/// Last reported spin direction of an encoder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    #[default]
    Idle,
}

impl Direction {
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Left => "← COUNTER-CW",
            Direction::Right => "→ CLOCKWISE",
            Direction::Idle => "— IDLE",
        }
    }
}

/// One rotary encoder: accumulated detent count plus the direction of
/// the most recent movement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Encoder {
    pub value: i32,
    pub direction: Direction,
}

/// Full-state seed the panel sends right after a connection is made.
/// Sections it did not report are left empty and do not touch the
/// snapshot; encoder seeds carry values only, directions are kept.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InitialState {
    pub key: Option<Option<bool>>,
    pub switches: Vec<(SwitchColor, Option<bool>)>,
    pub encoders: Vec<(usize, i32)>,
}

/// A single decoded telemetry event. `Option<bool>` states are
/// tri-state: the panel may explicitly report a control as unknown.
#[derive(Clone, Debug, PartialEq)]
pub enum PanelEvent {
    Connected,
    Disconnected,
    InitialState(InitialState),
    KeyChanged { active: Option<bool> },
    SwitchChanged { switch: SwitchColor, active: Option<bool> },
    EncoderChanged { encoder: usize, value: i32, direction: Direction },
    EncoderReset { encoder: usize },
}

/// Latest reported state of every control. `None` means no event has
/// reported that control yet (or it was last reported as unknown).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HardwareSnapshot {
    key: Option<bool>,
    switches: [Option<bool>; SWITCH_COUNT],
    encoders: [Encoder; ENCODER_COUNT],
}

impl HardwareSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(&self) -> Option<bool> {
        self.key
    }

    pub fn switch(&self, color: SwitchColor) -> Option<bool> {
        self.switches[color.index()]
    }

    /// Returns a zeroed encoder for out-of-range ids so display code
    /// never has to bounds-check.
    pub fn encoder(&self, index: usize) -> Encoder {
        self.encoders.get(index).copied().unwrap_or_default()
    }

    /// Colors whose switch is confirmed on. Unknown counts as off, so
    /// nothing is drawn for a control the panel has not reported.
    pub fn active_colors(&self) -> Vec<SwitchColor> {
        SwitchColor::ALL
            .into_iter()
            .filter(|color| self.switches[color.index()] == Some(true))
            .collect()
    }

    /// Folds one event into the snapshot. Only the fields the event
    /// names change; connection events carry no control state and are
    /// no-ops here. Encoder indexes outside the panel are ignored.
    pub fn apply(&mut self, event: &PanelEvent) {
        match event {
            PanelEvent::Connected | PanelEvent::Disconnected => {}
            PanelEvent::InitialState(seed) => {
                if let Some(key) = seed.key {
                    self.key = key;
                }
                for (color, active) in &seed.switches {
                    self.switches[color.index()] = *active;
                }
                for (index, value) in &seed.encoders {
                    if let Some(encoder) = self.encoders.get_mut(*index) {
                        encoder.value = *value;
                    }
                }
            }
            PanelEvent::KeyChanged { active } => {
                self.key = *active;
            }
            PanelEvent::SwitchChanged { switch, active } => {
                self.switches[switch.index()] = *active;
            }
            PanelEvent::EncoderChanged { encoder, value, direction } => {
                if let Some(slot) = self.encoders.get_mut(*encoder) {
                    slot.value = *value;
                    slot.direction = *direction;
                }
            }
            PanelEvent::EncoderReset { encoder } => {
                if let Some(slot) = self.encoders.get_mut(*encoder) {
                    *slot = Encoder::default();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_fully_unknown() {
        let snapshot = HardwareSnapshot::new();
        assert_eq!(snapshot.key(), None);
        for color in SwitchColor::ALL {
            assert_eq!(snapshot.switch(color), None);
        }
        for index in 0..ENCODER_COUNT {
            assert_eq!(snapshot.encoder(index), Encoder::default());
        }
        assert!(snapshot.active_colors().is_empty());
    }

    #[test]
    fn switch_event_sets_only_named_switch() {
        let mut snapshot = HardwareSnapshot::new();
        snapshot.apply(&PanelEvent::SwitchChanged {
            switch: SwitchColor::Green,
            active: Some(true),
        });
        assert_eq!(snapshot.switch(SwitchColor::Green), Some(true));
        assert_eq!(snapshot.switch(SwitchColor::Red), None);
        assert_eq!(snapshot.switch(SwitchColor::Blue), None);
    }

    #[test]
    fn repeated_switch_event_is_idempotent() {
        let event = PanelEvent::SwitchChanged {
            switch: SwitchColor::Red,
            active: Some(true),
        };
        let mut once = HardwareSnapshot::new();
        once.apply(&event);
        let mut twice = once;
        twice.apply(&event);
        assert_eq!(once, twice);
    }

    #[test]
    fn switch_can_return_to_unknown() {
        let mut snapshot = HardwareSnapshot::new();
        snapshot.apply(&PanelEvent::SwitchChanged {
            switch: SwitchColor::Blue,
            active: Some(true),
        });
        snapshot.apply(&PanelEvent::SwitchChanged {
            switch: SwitchColor::Blue,
            active: None,
        });
        assert_eq!(snapshot.switch(SwitchColor::Blue), None);
        assert!(snapshot.active_colors().is_empty());
    }

    #[test]
    fn active_colors_requires_confirmed_on() {
        let mut snapshot = HardwareSnapshot::new();
        snapshot.apply(&PanelEvent::SwitchChanged {
            switch: SwitchColor::Red,
            active: Some(true),
        });
        snapshot.apply(&PanelEvent::SwitchChanged {
            switch: SwitchColor::Green,
            active: Some(false),
        });
        assert_eq!(snapshot.active_colors(), vec![SwitchColor::Red]);
    }

    #[test]
    fn encoder_change_updates_value_and_direction() {
        let mut snapshot = HardwareSnapshot::new();
        snapshot.apply(&PanelEvent::EncoderChanged {
            encoder: 2,
            value: -7,
            direction: Direction::Left,
        });
        assert_eq!(
            snapshot.encoder(2),
            Encoder { value: -7, direction: Direction::Left }
        );
        assert_eq!(snapshot.encoder(0), Encoder::default());
    }

    #[test]
    fn encoder_reset_zeroes_value_and_idles_direction() {
        let mut snapshot = HardwareSnapshot::new();
        snapshot.apply(&PanelEvent::EncoderChanged {
            encoder: 1,
            value: 42,
            direction: Direction::Right,
        });
        snapshot.apply(&PanelEvent::EncoderReset { encoder: 1 });
        assert_eq!(snapshot.encoder(1), Encoder::default());
    }

    #[test]
    fn out_of_range_encoder_is_ignored() {
        let mut snapshot = HardwareSnapshot::new();
        snapshot.apply(&PanelEvent::EncoderChanged {
            encoder: ENCODER_COUNT,
            value: 9,
            direction: Direction::Right,
        });
        assert_eq!(snapshot, HardwareSnapshot::new());
    }

    #[test]
    fn initial_state_applies_only_reported_sections() {
        let mut snapshot = HardwareSnapshot::new();
        snapshot.apply(&PanelEvent::KeyChanged { active: Some(true) });
        snapshot.apply(&PanelEvent::InitialState(InitialState {
            key: None,
            switches: vec![(SwitchColor::Red, Some(true))],
            encoders: vec![(0, 5), (9, 99)],
        }));
        // key section absent from the seed, so the earlier value stays
        assert_eq!(snapshot.key(), Some(true));
        assert_eq!(snapshot.switch(SwitchColor::Red), Some(true));
        assert_eq!(snapshot.switch(SwitchColor::Green), None);
        assert_eq!(snapshot.encoder(0).value, 5);
    }

    #[test]
    fn initial_state_seed_keeps_encoder_direction() {
        let mut snapshot = HardwareSnapshot::new();
        snapshot.apply(&PanelEvent::EncoderChanged {
            encoder: 3,
            value: 2,
            direction: Direction::Right,
        });
        snapshot.apply(&PanelEvent::InitialState(InitialState {
            encoders: vec![(3, 11)],
            ..InitialState::default()
        }));
        assert_eq!(snapshot.encoder(3).value, 11);
        assert_eq!(snapshot.encoder(3).direction, Direction::Right);
    }

    #[test]
    fn connection_events_do_not_touch_state() {
        let mut snapshot = HardwareSnapshot::new();
        snapshot.apply(&PanelEvent::SwitchChanged {
            switch: SwitchColor::Blue,
            active: Some(true),
        });
        let before = snapshot;
        snapshot.apply(&PanelEvent::Disconnected);
        snapshot.apply(&PanelEvent::Connected);
        assert_eq!(snapshot, before);
    }
}
