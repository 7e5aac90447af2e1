use super::{CollectorError, LineSource, SourceExit};
use crate::domain::event::{HEARTBEAT, SHUTDOWN};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SIMULATED_TICKS: u32 = 5;
pub const DEFAULT_SIMPLE_LOOP_TICKS: u32 = 3;

const SIMPLE_LOOP_PRELUDE: [&str; 7] = [
    "[Demo] Launching QSAFP simple loop...",
    "[Validator] Starting validator emulator...",
    "[Validator] Temporal boundary check: PASSED",
    "[Validator] Multi-party quorum: SIMULATED OK",
    "[Demo] Validator check passed, simulating firmware...",
    "[Firmware] Boot sequence start...",
    "[Firmware] Temporal boundary handshake: OK",
];

/// Which canned subordinate the simulator plays back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SimulationProfile {
    /// Firmware stub: boot banner, a tick log and heartbeat event per tick, shutdown event
    #[default]
    Stub,
    /// Simple-loop demo: validator pre-check, then plain firmware log lines
    SimpleLoop,
}

impl SimulationProfile {
    pub fn default_ticks(&self) -> u32 {
        match self {
            SimulationProfile::Stub => DEFAULT_SIMULATED_TICKS,
            SimulationProfile::SimpleLoop => DEFAULT_SIMPLE_LOOP_TICKS,
        }
    }

    /// Number of lines played back for `ticks` ticks.
    pub fn line_count(&self, ticks: u32) -> u64 {
        let ticks = u64::from(ticks);
        match self {
            SimulationProfile::Stub => 2 * ticks + 3,
            SimulationProfile::SimpleLoop => SIMPLE_LOOP_PRELUDE.len() as u64 + ticks + 2,
        }
    }

    /// The line at position `index`, or `None` past the end.
    pub fn line(&self, ticks: u32, index: u64) -> Option<String> {
        match self {
            SimulationProfile::Stub => stub_line(ticks, index),
            SimulationProfile::SimpleLoop => simple_loop_line(ticks, index),
        }
    }

    /// The whole sequence at once. Only meant for small tick counts.
    pub fn script(&self, ticks: u32) -> Vec<String> {
        (0..).map_while(|index| self.line(ticks, index)).collect()
    }
}

fn stub_line(ticks: u32, index: u64) -> Option<String> {
    let body = 2 * u64::from(ticks);
    let line = match index {
        0 => "[BOOT] QSAFP Firmware Stub starting up...".to_string(),
        i if i <= body => {
            let tick = (i - 1) / 2;
            if (i - 1) % 2 == 0 {
                format!("[TICK] Runtime tick {tick} (total ticks: {})", tick + 1)
            } else {
                format!(
                    r#"{{"event":"{HEARTBEAT}","tick":{},"status":"ok"}}"#,
                    tick + 1
                )
            }
        }
        i if i == body + 1 => "[SHUTDOWN] QSAFP Firmware Stub shutting down.".to_string(),
        i if i == body + 2 => {
            format!(r#"{{"event":"{SHUTDOWN}","tick":{ticks},"status":"completed"}}"#)
        }
        _ => return None,
    };
    Some(line)
}

fn simple_loop_line(ticks: u32, index: u64) -> Option<String> {
    let prelude = SIMPLE_LOOP_PRELUDE.len() as u64;
    let last_tick = prelude + u64::from(ticks);
    let line = match index {
        i if i < prelude => SIMPLE_LOOP_PRELUDE[i as usize].to_string(),
        i if i < last_tick => format!("[Firmware] Runtime tick {}", i - prelude + 1),
        i if i == last_tick => "[Firmware] Runtime status: SAFE".to_string(),
        i if i == last_tick + 1 => "[Demo] QSAFP simple loop complete.".to_string(),
        _ => return None,
    };
    Some(line)
}

/// Built-in stand-in for the firmware.
///
/// Plays back a profile's canned output without launching anything. Lines
/// are produced one at a time from a cursor, so the tick count only bounds
/// how long the playback runs. No delays are simulated.
#[derive(Debug, Clone)]
pub struct SimulatedFirmware {
    profile: SimulationProfile,
    max_ticks: u32,
    cursor: u64,
}

impl Default for SimulatedFirmware {
    fn default() -> Self {
        Self::new(DEFAULT_SIMULATED_TICKS)
    }
}

impl SimulatedFirmware {
    /// The firmware stub profile with `max_ticks` ticks.
    pub fn new(max_ticks: u32) -> Self {
        Self::with_profile(SimulationProfile::Stub, max_ticks)
    }

    pub fn with_profile(profile: SimulationProfile, max_ticks: u32) -> Self {
        Self {
            profile,
            max_ticks,
            cursor: 0,
        }
    }

    pub fn profile(&self) -> SimulationProfile {
        self.profile
    }

    pub fn max_ticks(&self) -> u32 {
        self.max_ticks
    }

    /// The full stub sequence for `max_ticks` ticks, for tests and benchmarks.
    pub fn script(max_ticks: u32) -> Vec<String> {
        SimulationProfile::Stub.script(max_ticks)
    }
}

impl LineSource for SimulatedFirmware {
    async fn next_line(&mut self) -> Result<Option<String>, CollectorError> {
        let line = self.profile.line(self.max_ticks, self.cursor);
        if line.is_some() {
            self.cursor += 1;
        }
        Ok(line)
    }

    async fn finish(self) -> Result<SourceExit, CollectorError> {
        Ok(SourceExit { code: Some(0) })
    }

    async fn terminate(&mut self) -> Result<(), CollectorError> {
        self.cursor = self.profile.line_count(self.max_ticks);
        Ok(())
    }

    fn describe(&self) -> String {
        format!(
            "simulated {:?} firmware ({} ticks)",
            self.profile, self.max_ticks
        )
    }
}
