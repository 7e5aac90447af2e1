use super::{Config, ConfigError};

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.json && self.mode.is_some() {
            return Err(ConfigError::InvalidConfig(
                "'json' and 'mode' cannot both be set".to_string(),
            ));
        }

        if self.simulate && self.stdin {
            return Err(ConfigError::InvalidConfig(
                "'simulate' and 'stdin' cannot both be set".to_string(),
            ));
        }

        if self.simulate && self.simulated_ticks == Some(0) {
            return Err(ConfigError::InvalidConfig(
                "Simulated ticks must be greater than 0".to_string(),
            ));
        }

        if !self.simulate && !self.stdin && self.firmware.as_os_str().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "Firmware path must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
