use super::{ConfigError, LogLevel, SourceKind};
use crate::collector::SimulationProfile;
use crate::report::{OutputFormat, ReportingPolicy};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_FIRMWARE_PATH: &str = "./qsafp_firmware_stub.exe";

#[derive(Parser, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[command(author, version, about = "Relay and classify QSAFP firmware output", long_about = None)]
#[serde(default)]
pub struct Config {
    /// Enable JSON validator mode (same as --mode verbose)
    #[arg(long, env = "RELAY_JSON", conflicts_with = "mode")]
    pub json: bool,

    /// Reporting policy
    #[arg(long, env = "RELAY_MODE", value_enum)]
    pub mode: Option<ReportingPolicy>,

    /// Firmware executable to launch (invoked with no arguments)
    #[arg(long, env = "FIRMWARE_PATH", default_value = DEFAULT_FIRMWARE_PATH)]
    pub firmware: PathBuf,

    /// Use the built-in simulated firmware instead of launching a process
    #[arg(long, env = "RELAY_SIMULATE", conflicts_with = "stdin")]
    pub simulate: bool,

    /// Which canned output the simulated firmware plays back
    #[arg(long, env = "SIMULATE_PROFILE", value_enum, default_value = "stub")]
    pub simulate_profile: SimulationProfile,

    /// Number of ticks the simulated firmware runs (profile default when unset)
    #[arg(long, env = "SIMULATED_TICKS")]
    pub simulated_ticks: Option<u32>,

    /// Read subordinate output from stdin instead of launching a process
    #[arg(long)]
    pub stdin: bool,

    /// Report output format
    #[arg(long, env = "OUTPUT_FORMAT", value_enum, default_value = "text")]
    pub output_format: OutputFormat,

    /// Diagnostic log level (written to stderr)
    #[arg(long, env = "LOG_LEVEL", value_enum, default_value = "warn")]
    pub log_level: LogLevel,

    /// Configuration file path (optional)
    #[arg(long, env = "CONFIG_FILE")]
    #[serde(skip)]
    pub config_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            json: false,
            mode: None,
            firmware: PathBuf::from(DEFAULT_FIRMWARE_PATH),
            simulate: false,
            simulate_profile: SimulationProfile::Stub,
            simulated_ticks: None,
            stdin: false,
            output_format: OutputFormat::Text,
            log_level: LogLevel::Warn,
            config_file: None,
        }
    }
}

impl Config {
    pub fn from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let config = Config::try_parse_from(args)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse CLI args (clap folds in env vars). When `--config-file` is given,
    /// the file supplies every value the command line left at its default.
    pub fn from_args_and_env<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut config = Config::try_parse_from(args)?;

        if let Some(path) = config.config_file.clone() {
            let base_config = Self::load_file(&path)?;
            config.merge_defaults_from(base_config);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load_file(path)?;
        config.validate()?;
        Ok(config)
    }

    fn load_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config: Config = toml::from_str(&content)?;
        config.config_file = Some(path.as_ref().to_path_buf());
        Ok(config)
    }

    // Mutually exclusive flags move as a pair so a CLI choice never
    // combines with the file's opposite choice.
    fn merge_defaults_from(&mut self, base_config: Config) {
        let defaults = Config::default();

        if !self.json && self.mode.is_none() {
            self.json = base_config.json;
            self.mode = base_config.mode;
        }
        if !self.simulate && !self.stdin {
            self.simulate = base_config.simulate;
            self.stdin = base_config.stdin;
        }
        if self.firmware == defaults.firmware && base_config.firmware != defaults.firmware {
            self.firmware = base_config.firmware;
        }
        if self.simulate_profile == defaults.simulate_profile {
            self.simulate_profile = base_config.simulate_profile;
        }
        if self.simulated_ticks.is_none() {
            self.simulated_ticks = base_config.simulated_ticks;
        }
        if self.output_format == defaults.output_format {
            self.output_format = base_config.output_format;
        }
        if self.log_level == defaults.log_level {
            self.log_level = base_config.log_level;
        }
    }

    /// The reporting policy after folding `--json` into `--mode`.
    pub fn effective_policy(&self) -> ReportingPolicy {
        match self.mode {
            Some(policy) => policy,
            None if self.json => ReportingPolicy::Verbose,
            None => ReportingPolicy::Plain,
        }
    }

    pub fn source_kind(&self) -> SourceKind {
        if self.simulate {
            SourceKind::Simulated {
                profile: self.simulate_profile,
                ticks: self
                    .simulated_ticks
                    .unwrap_or_else(|| self.simulate_profile.default_ticks()),
            }
        } else if self.stdin {
            SourceKind::Stdin
        } else {
            SourceKind::Process(self.firmware.clone())
        }
    }
}
