//! Telemetry feed from the panel controller.
//!
//! The controller streams newline-delimited JSON over TCP, one event
//! per line, tagged by a `type` field. A background thread owns the
//! connection, reconnects forever and forwards decoded events into the
//! app's event channel. `--demo` swaps the socket for a synthetic feed
//! so the visualizer runs without hardware attached.

use std::collections::BTreeMap;
use std::io::{BufRead, BufReader};
use std::net::TcpStream;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use rand::Rng;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::event::Event;
use crate::hardware::{Direction, InitialState, PanelEvent, SwitchColor, ENCODER_COUNT};

const RECONNECT_DELAY: Duration = Duration::from_millis(1000);
const DEMO_STEP: Duration = Duration::from_millis(400);

/// Wire shape of one telemetry line. Field names match what the panel
/// controller emits, so this is the only place they appear.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireEvent {
    InitialState {
        key: Option<WireControl>,
        switches: Option<WireSwitches>,
        // the tag-buffered decode leaves object keys as strings, so the
        // encoder ids are parsed in into_panel_event
        encoders: Option<BTreeMap<String, i32>>,
    },
    KeyChange {
        active: Option<bool>,
    },
    SwitchChange {
        switch: SwitchColor,
        active: Option<bool>,
    },
    EncoderChange {
        encoder_id: u8,
        value: i32,
        direction: Option<Direction>,
    },
    EncoderButtonPress {
        encoder_id: u8,
    },
}

#[derive(Debug, Deserialize)]
struct WireControl {
    active: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct WireSwitches {
    red: Option<WireControl>,
    green: Option<WireControl>,
    blue: Option<WireControl>,
}

/// Maps a 1-based wire encoder id onto an array index, rejecting ids
/// the panel does not have.
fn encoder_index(id: u8) -> Option<usize> {
    let index = id.checked_sub(1)? as usize;
    (index < ENCODER_COUNT).then_some(index)
}

impl WireEvent {
    fn into_panel_event(self) -> Option<PanelEvent> {
        match self {
            WireEvent::InitialState { key, switches, encoders } => {
                let mut seed = InitialState {
                    key: key.map(|control| control.active),
                    ..InitialState::default()
                };
                if let Some(states) = switches {
                    for (color, control) in [
                        (SwitchColor::Red, states.red),
                        (SwitchColor::Green, states.green),
                        (SwitchColor::Blue, states.blue),
                    ] {
                        if let Some(control) = control {
                            seed.switches.push((color, control.active));
                        }
                    }
                }
                if let Some(values) = encoders {
                    for (id, value) in values {
                        match id.parse::<u8>().ok().and_then(encoder_index) {
                            Some(index) => seed.encoders.push((index, value)),
                            None => warn!(%id, "dropping seed for unknown encoder"),
                        }
                    }
                }
                Some(PanelEvent::InitialState(seed))
            }
            WireEvent::KeyChange { active } => Some(PanelEvent::KeyChanged { active }),
            WireEvent::SwitchChange { switch, active } => {
                Some(PanelEvent::SwitchChanged { switch, active })
            }
            WireEvent::EncoderChange { encoder_id, value, direction } => {
                let encoder = encoder_index(encoder_id)?;
                Some(PanelEvent::EncoderChanged {
                    encoder,
                    value,
                    direction: direction.unwrap_or(Direction::Idle),
                })
            }
            WireEvent::EncoderButtonPress { encoder_id } => {
                let encoder = encoder_index(encoder_id)?;
                Some(PanelEvent::EncoderReset { encoder })
            }
        }
    }
}

/// Decodes one telemetry line. Anything malformed or unrecognized is
/// dropped; bad input must never take the visualizer down.
pub fn decode_line(line: &str) -> Option<PanelEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str::<WireEvent>(line) {
        Ok(wire) => {
            let event = wire.into_panel_event();
            if event.is_none() {
                warn!(line, "dropping event for unknown encoder");
            }
            event
        }
        Err(err) => {
            warn!(%err, line, "dropping malformed telemetry line");
            None
        }
    }
}

/// Spawns the reader thread for a live panel at `addr`. The thread
/// reconnects after every failure and exits once the app side of the
/// channel is gone.
pub fn spawn_client(addr: String, tx: Sender<Event>) -> thread::JoinHandle<()> {
    thread::spawn(move || loop {
        match TcpStream::connect(&addr) {
            Ok(stream) => {
                info!(%addr, "panel link up");
                if tx.send(Event::Panel(PanelEvent::Connected)).is_err() {
                    return;
                }
                read_stream(stream, &tx);
                info!(%addr, "panel link down");
                if tx.send(Event::Panel(PanelEvent::Disconnected)).is_err() {
                    return;
                }
            }
            Err(err) => {
                debug!(%addr, %err, "panel connect failed, retrying");
            }
        }
        thread::sleep(RECONNECT_DELAY);
    })
}

fn read_stream(stream: TcpStream, tx: &Sender<Event>) {
    let reader = BufReader::new(stream);
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                warn!(%err, "panel read failed");
                return;
            }
        };
        if let Some(event) = decode_line(&line) {
            if tx.send(Event::Panel(event)).is_err() {
                return;
            }
        }
    }
}

/// Synthetic feed for running without hardware: seeds a plausible
/// panel state, then keeps twiddling encoders and flipping switches.
pub fn spawn_demo_feed(tx: Sender<Event>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut rng = rand::thread_rng();
        let seed = PanelEvent::InitialState(InitialState {
            key: Some(Some(true)),
            switches: vec![
                (SwitchColor::Red, Some(true)),
                (SwitchColor::Green, Some(false)),
                (SwitchColor::Blue, Some(true)),
            ],
            encoders: (0..ENCODER_COUNT).map(|index| (index, 0)).collect(),
        });
        for event in [PanelEvent::Connected, seed] {
            if tx.send(Event::Panel(event)).is_err() {
                return;
            }
        }

        let mut values = [0i32; ENCODER_COUNT];
        loop {
            thread::sleep(DEMO_STEP);
            let event = if rng.gen_bool(0.15) {
                let switch = SwitchColor::ALL[rng.gen_range(0..SwitchColor::ALL.len())];
                PanelEvent::SwitchChanged { switch, active: Some(rng.gen_bool(0.7)) }
            } else if rng.gen_bool(0.05) {
                PanelEvent::KeyChanged { active: Some(rng.gen_bool(0.8)) }
            } else if rng.gen_bool(0.05) {
                let encoder = rng.gen_range(0..ENCODER_COUNT);
                values[encoder] = 0;
                PanelEvent::EncoderReset { encoder }
            } else {
                let encoder = rng.gen_range(0..ENCODER_COUNT);
                let delta = if rng.gen_bool(0.5) { 1 } else { -1 };
                values[encoder] += delta;
                PanelEvent::EncoderChanged {
                    encoder,
                    value: values[encoder],
                    direction: if delta > 0 { Direction::Right } else { Direction::Left },
                }
            };
            if tx.send(Event::Panel(event)).is_err() {
                return;
            }
        }
    })
}
