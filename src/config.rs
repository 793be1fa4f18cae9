//! Tunables for a game session.
//!
//! Defaults reproduce the shipped balance. The heal and recovery numbers have no
//! derivation beyond play-testing, so they live here instead of being inlined.

use thiserror::Error;

use crate::board::generator::SizeRange;
use crate::board::layout::TileSizing;
use crate::ledger::METER_FLOOR;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{axis} range {min}..={max} is empty")]
    EmptySizeRange { axis: &'static str, min: u32, max: u32 },
    #[error("{axis} range must start at 1 or more")]
    ZeroDimension { axis: &'static str },
    #[error("`{field}` must be a positive finite number, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("`{field}` must be a finite number >= 0, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("`initial_time` must be above the meter floor {floor}, got {value}")]
    InitialTimeAtFloor { value: f64, floor: f64 },
    #[error("{axis} range may not exceed {limit} tiles, got {max}")]
    OversizedRange { axis: &'static str, max: u32, limit: u32 },
    #[error("`recovery_fraction` must be in (0, 1], got {0}")]
    RecoveryFraction(f64),
    #[error("invalid config JSON: {0}")]
    Json(String),
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Bounds for generated board dimensions.
    pub size_range: SizeRange,
    /// Starting generator bias: a draw `0..=9` at or below this is an empty tile.
    pub initial_bias: u32,
    pub tile_sizing: TileSizing,
    /// Meter value at game start and after a restart.
    pub initial_time: f64,
    /// Meter units drained per elapsed millisecond.
    pub decay_coefficient: f64,
    /// Meter units restored per cleared tile on a win.
    pub heal_per_point: f64,
    /// How long the "won" indication is shown.
    pub won_flash_ms: f64,
    /// Input stays frozen this long after the indication clears.
    pub won_settle_ms: f64,
    pub recovery_steps: u32,
    pub recovery_step_ms: f64,
    /// Share of the remaining gap closed per recovery step.
    pub recovery_fraction: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            size_range: SizeRange::CLASSIC,
            initial_bias: 3,
            tile_sizing: TileSizing::LongestAxis,
            initial_time: 100.0,
            decay_coefficient: 0.005,
            heal_per_point: 3.1,
            won_flash_ms: 500.0,
            won_settle_ms: 500.0,
            recovery_steps: 100,
            recovery_step_ms: 1.0,
            recovery_fraction: 0.1,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        // SizeRange enforces its own invariant on construction.
        positive("initial_time", self.initial_time)?;
        // A meter that starts on the floor is lost before the first move.
        if self.initial_time <= METER_FLOOR {
            return Err(ConfigError::InitialTimeAtFloor {
                value: self.initial_time,
                floor: METER_FLOOR,
            });
        }
        non_negative("decay_coefficient", self.decay_coefficient)?;
        non_negative("heal_per_point", self.heal_per_point)?;
        non_negative("won_flash_ms", self.won_flash_ms)?;
        non_negative("won_settle_ms", self.won_settle_ms)?;
        non_negative("recovery_step_ms", self.recovery_step_ms)?;
        if !(self.recovery_fraction > 0.0 && self.recovery_fraction <= 1.0) {
            return Err(ConfigError::RecoveryFraction(self.recovery_fraction));
        }
        Ok(())
    }

    /// Parse a (possibly partial) JSON object over the defaults, then validate.
    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}
