use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use long_snake_core::{Cell, Config, Direction, GridBounds, SpeedScaling};
use serde::Deserialize;
use thiserror::Error;

/// Optional overrides for [`Config::classic`] loaded from a TOML file.
///
/// ```toml
/// tick_interval_ms = 250
/// speed_scaling = "continuous"
///
/// [grid]
/// max_row = 19
/// max_column = 19
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SettingsFile {
    grid: Option<GridSettings>,
    start_body: Option<Vec<Cell>>,
    initial_direction: Option<Direction>,
    tick_interval_ms: Option<u64>,
    min_tick_interval_ms: Option<u64>,
    max_score: Option<u32>,
    speed_scaling: Option<SpeedScaling>,
    food_placement_attempts: Option<u32>,
    rng_seed: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
struct GridSettings {
    max_row: u16,
    max_column: u16,
}

impl SettingsFile {
    /// Reads settings from the file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Layers the present fields over `config`.
    #[must_use]
    pub(crate) fn apply(&self, mut config: Config) -> Config {
        if let Some(grid) = self.grid {
            config = config.with_grid(GridBounds::new(grid.max_row, grid.max_column));
        }
        if let Some(start_body) = &self.start_body {
            config = config.with_start_body(start_body.clone());
        }
        if let Some(direction) = self.initial_direction {
            config = config.with_initial_direction(direction);
        }
        if let Some(millis) = self.tick_interval_ms {
            config = config.with_tick_interval(Duration::from_millis(millis));
        }
        if let Some(millis) = self.min_tick_interval_ms {
            config = config.with_min_tick_interval(Duration::from_millis(millis));
        }
        if let Some(max_score) = self.max_score {
            config = config.with_max_score(max_score);
        }
        if let Some(speed_scaling) = self.speed_scaling {
            config = config.with_speed_scaling(speed_scaling);
        }
        if let Some(attempts) = self.food_placement_attempts {
            config = config.with_food_placement_attempts(attempts);
        }
        if let Some(seed) = self.rng_seed {
            config = config.with_rng_seed(seed);
        }
        config
    }
}

/// Errors raised while loading a settings file.
#[derive(Debug, Error)]
pub(crate) enum SettingsError {
    /// The file could not be read.
    #[error("failed to read settings file {}", path.display())]
    Read {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The file is not a valid settings document.
    #[error("settings file {} is invalid", path.display())]
    Parse {
        /// File holding the invalid document.
        path: PathBuf,
        /// Parser failure.
        #[source]
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use long_snake_core::ConfigError;

    #[test]
    fn empty_document_keeps_classic_config() {
        let settings: SettingsFile = toml::from_str("").expect("empty settings");
        assert_eq!(settings.apply(Config::classic()), Config::classic());
    }

    #[test]
    fn present_fields_override_config() {
        let settings: SettingsFile = toml::from_str(
            r#"
            tick_interval_ms = 200
            speed_scaling = "continuous"
            initial_direction = "right"
            rng_seed = 9
            start_body = [{ row = 1, column = 1 }, { row = 1, column = 0 }]

            [grid]
            max_row = 9
            max_column = 9
            "#,
        )
        .expect("valid settings");

        let config = settings.apply(Config::classic());

        assert_eq!(config.grid(), GridBounds::new(9, 9));
        assert_eq!(config.tick_interval(), Duration::from_millis(200));
        assert_eq!(config.speed_scaling(), SpeedScaling::Continuous);
        assert_eq!(config.initial_direction(), Direction::Right);
        assert_eq!(config.rng_seed(), 9);
        assert_eq!(config.start_body(), &[Cell::new(1, 1), Cell::new(1, 0)]);
        assert_eq!(config.max_score(), Config::classic().max_score());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn oversized_grid_fails_validation() {
        let settings: SettingsFile = toml::from_str(
            r#"
            [grid]
            max_row = 65535
            max_column = 65535
            "#,
        )
        .expect("well-formed settings");

        let config = settings.apply(Config::classic());

        assert!(matches!(
            config.validate(),
            Err(ConfigError::GridTooLarge { .. })
        ));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(toml::from_str::<SettingsFile>("tick_rate = 3").is_err());
    }

    #[test]
    fn missing_file_is_reported_with_its_path() {
        let path = std::env::temp_dir().join("long-snake-settings-that-do-not-exist.toml");
        let error = SettingsFile::load(&path).expect_err("missing file");
        assert!(matches!(error, SettingsError::Read { .. }));
        assert!(error.to_string().contains("long-snake-settings-that-do-not-exist"));
    }
}
