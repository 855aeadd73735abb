use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, KeyEvent, KeyEventKind};

use crate::hardware::PanelEvent;

/// Everything the main loop reacts to, funneled through one channel so
/// a burst on one source can never block the others.
pub enum Event {
    Key(KeyEvent),
    Panel(PanelEvent),
    Resize,
    Tick,
}

pub struct EventHandler {
    tx: mpsc::Sender<Event>,
    rx: mpsc::Receiver<Event>,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::channel();
        let tick_rate = Duration::from_millis(tick_rate_ms);

        let input_tx = tx.clone();
        thread::spawn(move || loop {
            if event::poll(tick_rate).unwrap_or(false) {
                let forwarded = match event::read() {
                    Ok(crossterm::event::Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        input_tx.send(Event::Key(key))
                    }
                    Ok(crossterm::event::Event::Resize(_, _)) => input_tx.send(Event::Resize),
                    _ => Ok(()),
                };
                if forwarded.is_err() {
                    return;
                }
            } else if input_tx.send(Event::Tick).is_err() {
                return;
            }
        });

        Self { tx, rx }
    }

    /// Handle for producer threads (telemetry, demo feed).
    pub fn sender(&self) -> mpsc::Sender<Event> {
        self.tx.clone()
    }

    pub fn next(&self) -> io::Result<Event> {
        self.rx
            .recv()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}
