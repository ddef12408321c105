//! Configuration loading from files (std only).

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{truncated, ConfigError, Error, Result};

use super::RigConfig;

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or fails validation.
///
/// # Example
///
/// ```rust,ignore
/// use turntable_motion::load_config;
///
/// let config = load_config("rig.toml")?;
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RigConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(ConfigError::IoError(truncated(&e.to_string()))))?;

    debug!(path = %path.display(), "loaded rig configuration");
    parse_config(&content)
}

/// Parse configuration from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is invalid or fails validation.
pub fn parse_config(content: &str) -> Result<RigConfig> {
    let config: RigConfig = toml::from_str(content)
        .map_err(|e| Error::Config(ConfigError::ParseError(truncated(e.message()))))?;

    super::validation::validate_config(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::units::Degrees;

    #[test]
    fn test_parse_empty_config_uses_reference_rig() {
        let config = parse_config("").unwrap();
        assert_eq!(config, RigConfig::default());
        assert_eq!(config.rotor.steps_per_rotation, 48_000);
        assert_eq!(config.turntable.steps_per_rotation, 3_200);
    }

    #[test]
    fn test_parse_partial_sections() {
        let toml = r#"
[rotor]
steps_per_rotation = 24000
tolerance_deg = 2.5

[timing]
idle_us = 20000
"#;

        let config = parse_config(toml).unwrap();
        assert_eq!(config.rotor.steps_per_rotation, 24_000);
        assert_eq!(config.rotor.tolerance, Degrees(2.5));
        assert_eq!(config.rotor.angle_max, Degrees(115.0));
        assert_eq!(config.timing.idle_us, 20_000);
        assert_eq!(config.timing.step_hold_us, 600);
    }

    #[test]
    fn test_parse_rejects_unparseable_toml() {
        let result = parse_config("[rotor\nsteps_per_rotation = ");
        assert!(matches!(result, Err(Error::Config(ConfigError::ParseError(_)))));
    }

    #[test]
    fn test_parse_runs_validation() {
        let toml = r#"
[turntable]
steps_per_rotation = 0
"#;
        let result = parse_config(toml);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidStepsPerRotation(0)))
        ));
    }

    #[test]
    fn test_sample_file_matches_defaults() {
        let config = load_config(concat!(env!("CARGO_MANIFEST_DIR"), "/rig.toml")).unwrap();
        assert_eq!(config, RigConfig::default());
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_config("/nonexistent/rig.toml");
        assert!(matches!(result, Err(Error::Config(ConfigError::IoError(_)))));
    }
}
