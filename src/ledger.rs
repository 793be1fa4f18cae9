//! Time meter and score.
//!
//! The meter drains every frame and refills when a board is cleared. It never
//! drops below [`METER_FLOOR`]; sitting on the floor is what loses the round.

/// Lowest value the meter can hold. Reaching it is the loss condition.
pub const METER_FLOOR: f64 = 5.0;

/// Remaining time plus the highest value it has reached, used to scale the bar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Meter {
    pub time: f64,
    pub max_time: f64,
}

impl Meter {
    pub fn new(initial: f64) -> Self {
        let time = initial.max(METER_FLOOR);
        Self {
            time,
            max_time: time,
        }
    }

    /// Drain `elapsed_ms * coefficient`.
    pub fn decay(self, elapsed_ms: f64, coefficient: f64) -> Self {
        self.heal(-(elapsed_ms * coefficient))
    }

    /// Add `amount` (negative drains). Clamped to the floor; raises `max_time`.
    pub fn heal(self, amount: f64) -> Self {
        let time = (self.time + amount).max(METER_FLOOR);
        Self {
            time,
            max_time: self.max_time.max(time),
        }
    }

    pub fn is_lost(&self) -> bool {
        self.time <= METER_FLOOR
    }

    /// One step of the restart ease: close `fraction` of the gap to `target` and pin
    /// `max_time` to the new value so the bar reads full while it refills.
    pub fn recover_step(self, target: f64, fraction: f64) -> Self {
        let time = self.time + (target - self.time) * fraction;
        Self {
            time,
            max_time: time,
        }
    }

    /// Fraction of the bar to draw, `0.0..=1.0`.
    pub fn fill_ratio(&self) -> f64 {
        if self.max_time <= 0.0 {
            return 0.0;
        }
        (self.time / self.max_time).clamp(0.0, 1.0)
    }
}

/// Meter plus the score carried across won rounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ledger {
    pub meter: Meter,
    pub score: u64,
}

impl Ledger {
    pub fn new(initial_time: f64) -> Self {
        Self {
            meter: Meter::new(initial_time),
            score: 0,
        }
    }

    /// Credit a won board: score grows by the cleared count and the meter heals
    /// `cleared * heal_per_point`.
    pub fn record_win(&mut self, cleared: usize, heal_per_point: f64) {
        self.score += cleared as u64;
        self.meter = self.meter.heal(cleared as f64 * heal_per_point);
    }

    pub fn reset_score(&mut self) {
        self.score = 0;
    }
}
