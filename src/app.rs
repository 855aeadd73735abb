use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::hardware::{HardwareSnapshot, PanelEvent};
use crate::viz::{Visualizer, VizOptions};

#[derive(Clone, Copy, PartialEq)]
pub enum Tab {
    Visualizer,
    Debug,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::Visualizer, Tab::Debug]
    }

    pub fn title(&self) -> &str {
        match self {
            Tab::Visualizer => "Visualizer",
            Tab::Debug => "Debug",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Visualizer => 0,
            Tab::Debug => 1,
        }
    }
}

pub struct App {
    pub should_quit: bool,
    pub current_tab: Tab,
    pub link_up: bool,
    pub feed_label: String,
    pub snapshot: HardwareSnapshot,
    pub viz: Visualizer,
}

impl App {
    pub fn new(feed_label: String, options: VizOptions, tick_ms: u64) -> Self {
        Self {
            should_quit: false,
            current_tab: Tab::Visualizer,
            link_up: false,
            feed_label,
            snapshot: HardwareSnapshot::new(),
            viz: Visualizer::new(options, tick_ms),
        }
    }

    pub fn on_tick(&mut self) {
        // The simulation only runs while its surface is on screen;
        // the debug tab is a frozen view of the snapshot.
        match self.current_tab {
            Tab::Visualizer => self.viz.update(&self.snapshot),
            Tab::Debug => {}
        }
    }

    /// Folds one telemetry event into the app. The connection flag is
    /// app-level state; everything else lands in the snapshot.
    pub fn on_panel(&mut self, event: PanelEvent) {
        match event {
            PanelEvent::Connected => self.link_up = true,
            PanelEvent::Disconnected => self.link_up = false,
            _ => {}
        }
        self.snapshot.apply(&event);
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        // Ctrl+C always quits
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.prev_tab();
                } else {
                    self.next_tab();
                }
                return;
            }
            KeyCode::BackTab => {
                self.prev_tab();
                return;
            }
            KeyCode::Char('1') => {
                self.current_tab = Tab::Visualizer;
                return;
            }
            KeyCode::Char('2') => {
                self.current_tab = Tab::Debug;
                return;
            }
            _ => {}
        }

        if matches!(self.current_tab, Tab::Visualizer) {
            self.viz.handle_input(key);
        }
    }

    fn next_tab(&mut self) {
        let tabs = Tab::all();
        let idx = self.current_tab.index();
        self.current_tab = tabs[(idx + 1) % tabs.len()];
    }

    fn prev_tab(&mut self) {
        let tabs = Tab::all();
        let idx = self.current_tab.index();
        self.current_tab = tabs[(idx + tabs.len() - 1) % tabs.len()];
    }
}
