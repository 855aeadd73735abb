//! Command line options. The panel address and a handful of tuning
//! knobs; everything has a default so `panelscope --demo` just works.

use crate::viz::motion::{MotionMode, PatternSelector};
use crate::viz::VizOptions;

pub const USAGE: &str = "\
panelscope - terminal particle visualizer driven by control panel telemetry

USAGE:
    panelscope [OPTIONS]

OPTIONS:
    --addr <HOST:PORT>    panel telemetry address [default: 127.0.0.1:9100]
    --demo                run from a synthetic feed instead of a socket
    --density-step <N>    particles per E1 detent, 5 or 10 [default: 10]
    --select <MODE>       E4 role: swirl, ranges or modulo [default: swirl]
    --link-same-color     only link particles that share a color
    --tick <MS>           frame interval in milliseconds [default: 16]
    -h, --help            print this help
";

#[derive(Debug)]
pub enum ParseError {
    HelpRequested,
    Invalid(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub addr: String,
    pub demo: bool,
    pub density_step: i32,
    pub mode: MotionMode,
    pub link_same_color: bool,
    pub tick_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: String::from("127.0.0.1:9100"),
            demo: false,
            density_step: 10,
            mode: MotionMode::Swirl,
            link_same_color: false,
            tick_ms: 16,
        }
    }
}

impl Config {
    pub fn from_args(mut args: impl Iterator<Item = String>) -> Result<Self, ParseError> {
        let mut config = Config::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--addr" => config.addr = value(&mut args, "--addr")?,
                "--demo" => config.demo = true,
                "--density-step" => {
                    let raw = value(&mut args, "--density-step")?;
                    config.density_step = match raw.as_str() {
                        "5" => 5,
                        "10" => 10,
                        _ => {
                            return Err(ParseError::Invalid(format!(
                                "--density-step must be 5 or 10, got '{raw}'"
                            )))
                        }
                    };
                }
                "--select" => {
                    let raw = value(&mut args, "--select")?;
                    config.mode = match raw.as_str() {
                        "swirl" => MotionMode::Swirl,
                        "ranges" => MotionMode::Patterns(PatternSelector::Ranges),
                        "modulo" => MotionMode::Patterns(PatternSelector::Modulo),
                        _ => {
                            return Err(ParseError::Invalid(format!(
                                "--select must be swirl, ranges or modulo, got '{raw}'"
                            )))
                        }
                    };
                }
                "--link-same-color" => config.link_same_color = true,
                "--tick" => {
                    let raw = value(&mut args, "--tick")?;
                    config.tick_ms = raw
                        .parse()
                        .ok()
                        .filter(|ms| *ms > 0)
                        .ok_or_else(|| {
                            ParseError::Invalid(format!(
                                "--tick must be a positive integer, got '{raw}'"
                            ))
                        })?;
                }
                "-h" | "--help" => return Err(ParseError::HelpRequested),
                _ => return Err(ParseError::Invalid(format!("unknown option '{arg}'"))),
            }
        }
        Ok(config)
    }

    pub fn viz_options(&self) -> VizOptions {
        VizOptions {
            mode: self.mode,
            density_step: self.density_step,
            link_same_color: self.link_same_color,
        }
    }

    /// What the status line shows as the telemetry source.
    pub fn feed_label(&self) -> String {
        if self.demo {
            String::from("demo feed")
        } else {
            self.addr.clone()
        }
    }
}

fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, ParseError> {
    args.next()
        .ok_or_else(|| ParseError::Invalid(format!("{flag} needs a value")))
}
