//! Random layouts.
//!
//! Every cell draws a uniform digit in `0..=9`; digits at or below the bias become
//! `Empty`, the rest `Frozen`. A layout with no `Empty` cell would be won before the
//! player touches it, so it is rejected and regenerated with `bias + 1`. Once the
//! bias reaches 9 every draw qualifies, which bounds the retries.

use rand::Rng;

use super::{Board, CellState};
use crate::config::ConfigError;

/// Upper bound (inclusive) of the per-cell draw.
pub const DRAW_MAX: u32 = 9;

/// Largest width or height a range may allow.
pub const MAX_SIDE: u32 = 64;

/// Attempts before giving up on randomness. Unreachable for a valid `SizeRange`
/// because bias 9 always succeeds within ten attempts.
const MAX_ATTEMPTS: u32 = 32;

/// Inclusive width/height bounds for generated boards. Never empty, never zero,
/// never wider or taller than [`MAX_SIDE`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawSizeRange", into = "RawSizeRange")
)]
pub struct SizeRange {
    min_width: u32,
    max_width: u32,
    min_height: u32,
    max_height: u32,
}

impl SizeRange {
    /// Square boards of one to nine tiles per side.
    pub const CLASSIC: SizeRange = SizeRange {
        min_width: 1,
        max_width: 9,
        min_height: 1,
        max_height: 9,
    };

    /// Landscape-leaning boards for wide screens.
    pub const WIDE: SizeRange = SizeRange {
        min_width: 4,
        max_width: 16,
        min_height: 3,
        max_height: 9,
    };

    pub fn new(
        min_width: u32,
        max_width: u32,
        min_height: u32,
        max_height: u32,
    ) -> Result<Self, ConfigError> {
        for (axis, min, max) in [
            ("width", min_width, max_width),
            ("height", min_height, max_height),
        ] {
            if min == 0 {
                return Err(ConfigError::ZeroDimension { axis });
            }
            if min > max {
                return Err(ConfigError::EmptySizeRange { axis, min, max });
            }
            if max > MAX_SIDE {
                return Err(ConfigError::OversizedRange {
                    axis,
                    max,
                    limit: MAX_SIDE,
                });
            }
        }
        Ok(Self {
            min_width,
            max_width,
            min_height,
            max_height,
        })
    }

    pub fn contains(&self, width: u32, height: u32) -> bool {
        (self.min_width..=self.max_width).contains(&width)
            && (self.min_height..=self.max_height).contains(&height)
    }
}

impl Default for SizeRange {
    fn default() -> Self {
        Self::CLASSIC
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct RawSizeRange {
    min_width: u32,
    max_width: u32,
    min_height: u32,
    max_height: u32,
}

#[cfg(feature = "serde")]
impl TryFrom<RawSizeRange> for SizeRange {
    type Error = ConfigError;

    fn try_from(raw: RawSizeRange) -> Result<Self, Self::Error> {
        SizeRange::new(raw.min_width, raw.max_width, raw.min_height, raw.max_height)
    }
}

#[cfg(feature = "serde")]
impl From<SizeRange> for RawSizeRange {
    fn from(range: SizeRange) -> Self {
        RawSizeRange {
            min_width: range.min_width,
            max_width: range.max_width,
            min_height: range.min_height,
            max_height: range.max_height,
        }
    }
}

/// Generate a board that has at least one `Empty` cell.
///
/// `bias` is the highest draw that still yields an `Empty` cell, so higher values
/// mean more work for the player. Width and height are drawn independently for
/// every attempt.
pub fn generate<R: Rng>(bias: u32, sizes: &SizeRange, rng: &mut R) -> Board {
    let mut bias = bias;
    for _ in 0..MAX_ATTEMPTS {
        let board = roll(bias, sizes, rng);
        if !board.is_complete() {
            return board;
        }
        log::debug!("rejected complete {}x{} layout at bias {bias}", board.width(), board.height());
        bias = bias.saturating_add(1);
    }
    log::warn!("layout generation hit {MAX_ATTEMPTS} attempts; using an all-empty board");
    roll(DRAW_MAX, sizes, rng)
}

fn roll<R: Rng>(bias: u32, sizes: &SizeRange, rng: &mut R) -> Board {
    let width = rng.gen_range(sizes.min_width..=sizes.max_width);
    let height = rng.gen_range(sizes.min_height..=sizes.max_height);
    // Both sides are at most MAX_SIDE, so the product fits any usize.
    let cells = (0..(width * height) as usize)
        .map(|_| {
            if rng.gen_range(0..=DRAW_MAX) <= bias {
                CellState::Empty
            } else {
                CellState::Frozen
            }
        })
        .collect();
    Board {
        width,
        height,
        cells,
    }
}
