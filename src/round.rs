//! Round state machine.
//!
//! `Running -> WonTransition -> Running` on a cleared board and
//! `Running -> LostTransition -> Restarting -> Running` when the meter bottoms out.
//! Transitions are plain phase values with deadlines; [`Round::tick`] advances them
//! using the frame timestamp, so nothing here blocks and rendering keeps going
//! every frame. Pointer input is only honored while `Running`; anything arriving
//! during a transition is dropped.

use std::mem;

use rand::Rng;

use crate::board::generator::generate;
use crate::board::layout::{Point, Viewport, screen_to_cell};
use crate::board::{Board, CellState};
use crate::config::GameConfig;
use crate::ledger::{Ledger, Meter};

/// Drawing/indication callbacks. The round calls these; it never draws itself.
pub trait RenderSink {
    fn draw_board(&mut self, board: &Board);
    fn draw_meter(&mut self, meter: &Meter);
    fn show_won(&mut self);
    fn clear_won(&mut self);
    fn show_lost(&mut self, score: u64);
    fn clear_lost(&mut self);
}

/// Sub-steps of the win interlude.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WonStage {
    /// "Won" indication visible.
    Flash,
    /// Indication cleared, input still frozen.
    Settle,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RoundPhase {
    Running,
    /// `next` becomes the active board when the interlude ends.
    WonTransition {
        stage: WonStage,
        deadline: f64,
        next: Board,
    },
    /// Waits for an explicit restart; no deadline.
    LostTransition { final_score: u64 },
    /// Meter easing back to its initial value, one step per `recovery_step_ms`.
    Restarting {
        started_at: f64,
        steps_done: u32,
        next: Board,
    },
}

impl RoundPhase {
    pub fn accepts_input(&self) -> bool {
        matches!(self, RoundPhase::Running)
    }

    pub fn name(&self) -> &'static str {
        match self {
            RoundPhase::Running => "running",
            RoundPhase::WonTransition { .. } => "won",
            RoundPhase::LostTransition { .. } => "lost",
            RoundPhase::Restarting { .. } => "restarting",
        }
    }
}

/// Owns the board, meter, score and phase of one game session.
pub struct Round<R> {
    config: GameConfig,
    rng: R,
    board: Board,
    ledger: Ledger,
    phase: RoundPhase,
    // Frame time the meter was last drained at.
    last_tick: f64,
    pointer_held: bool,
}

impl<R: Rng> Round<R> {
    /// New session on the fixed opening board.
    pub fn new(config: GameConfig, rng: R, now: f64) -> Self {
        Self::with_board(config, rng, Board::starter(), now)
    }

    pub fn with_board(config: GameConfig, rng: R, board: Board, now: f64) -> Self {
        let ledger = Ledger::new(config.initial_time);
        Self {
            config,
            rng,
            board,
            ledger,
            phase: RoundPhase::Running,
            last_tick: now,
            pointer_held: false,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Board currently on screen. During a won interlude this is still the
    /// completed board; during lost/restart it is the final board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> &RoundPhase {
        &self.phase
    }

    pub fn meter(&self) -> &Meter {
        &self.ledger.meter
    }

    pub fn score(&self) -> u64 {
        self.ledger.score
    }

    pub fn final_score(&self) -> Option<u64> {
        match self.phase {
            RoundPhase::LostTransition { final_score } => Some(final_score),
            _ => None,
        }
    }

    pub fn pointer_held(&self) -> bool {
        self.pointer_held
    }

    /// Per-frame update: drain or advance the current transition, then draw.
    pub fn tick<S: RenderSink>(&mut self, now: f64, sink: &mut S) {
        match &self.phase {
            RoundPhase::Running => {
                let elapsed = (now - self.last_tick).max(0.0);
                self.last_tick = now;
                self.ledger.meter = self
                    .ledger
                    .meter
                    .decay(elapsed, self.config.decay_coefficient);
                self.resolve(now, sink);
            }
            RoundPhase::WonTransition { .. } => self.advance_won(now, sink),
            RoundPhase::LostTransition { .. } => {}
            RoundPhase::Restarting { .. } => self.advance_recovery(now),
        }
        sink.draw_board(&self.board);
        sink.draw_meter(&self.ledger.meter);
    }

    /// Press: starts a drag and thaws the cell under the pointer. Returns the
    /// thawed index, if any.
    pub fn pointer_down<S: RenderSink>(
        &mut self,
        pointer: Point,
        viewport: Viewport,
        now: f64,
        sink: &mut S,
    ) -> Option<usize> {
        if !self.phase.accepts_input() {
            log::debug!("dropping pointer-down during {} phase", self.phase.name());
            return None;
        }
        self.pointer_held = true;
        self.take_turn(pointer, viewport, now, sink)
    }

    /// Drag: only acts while the pointer is held.
    pub fn pointer_move<S: RenderSink>(
        &mut self,
        pointer: Point,
        viewport: Viewport,
        now: f64,
        sink: &mut S,
    ) -> Option<usize> {
        if !self.pointer_held || !self.phase.accepts_input() {
            return None;
        }
        self.take_turn(pointer, viewport, now, sink)
    }

    pub fn pointer_up(&mut self) {
        self.pointer_held = false;
    }

    /// Player asked for a new game. Only honored while lost; returns whether the
    /// restart started.
    pub fn restart<S: RenderSink>(&mut self, now: f64, sink: &mut S) -> bool {
        let RoundPhase::LostTransition { final_score } = self.phase else {
            log::debug!("ignoring restart during {} phase", self.phase.name());
            return false;
        };
        sink.clear_lost();
        self.ledger.reset_score();
        let next = generate(self.config.initial_bias, &self.config.size_range, &mut self.rng);
        self.phase = RoundPhase::Restarting {
            started_at: now,
            steps_done: 0,
            next,
        };
        log::info!("restart requested (final score {final_score})");
        true
    }

    fn take_turn<S: RenderSink>(
        &mut self,
        pointer: Point,
        viewport: Viewport,
        now: f64,
        sink: &mut S,
    ) -> Option<usize> {
        let index = screen_to_cell(
            pointer,
            viewport,
            self.board.width(),
            self.board.height(),
            self.config.tile_sizing,
        )?;
        let next = self.board.apply_action(index);
        let thawed = next != self.board;
        self.board = next;
        if thawed {
            self.resolve(now, sink);
        }
        thawed.then_some(index)
    }

    // Loss beats a simultaneous win.
    fn resolve<S: RenderSink>(&mut self, now: f64, sink: &mut S) {
        if !self.phase.accepts_input() {
            return;
        }
        if self.ledger.meter.is_lost() {
            let final_score = self.ledger.score;
            self.pointer_held = false;
            self.phase = RoundPhase::LostTransition { final_score };
            sink.show_lost(final_score);
            log::info!("round lost with score {final_score}");
        } else if self.board.is_complete() {
            let cleared = self.board.count(CellState::Cleared);
            self.ledger.record_win(cleared, self.config.heal_per_point);
            let next = generate(self.config.initial_bias, &self.config.size_range, &mut self.rng);
            self.pointer_held = false;
            sink.show_won();
            self.phase = RoundPhase::WonTransition {
                stage: WonStage::Flash,
                deadline: now + self.config.won_flash_ms,
                next,
            };
            log::info!(
                "round won: {cleared} cleared, score {}, meter {:.1}",
                self.ledger.score,
                self.ledger.meter.time
            );
        }
    }

    fn advance_won<S: RenderSink>(&mut self, now: f64, sink: &mut S) {
        loop {
            let (stage, deadline) = match &self.phase {
                RoundPhase::WonTransition {
                    stage, deadline, ..
                } => (*stage, *deadline),
                _ => return,
            };
            if now < deadline {
                return;
            }
            match stage {
                WonStage::Flash => {
                    sink.clear_won();
                    if let RoundPhase::WonTransition {
                        stage, deadline, ..
                    } = &mut self.phase
                    {
                        *stage = WonStage::Settle;
                        *deadline += self.config.won_settle_ms;
                    }
                }
                WonStage::Settle => {
                    if let RoundPhase::WonTransition { next, .. } =
                        mem::replace(&mut self.phase, RoundPhase::Running)
                    {
                        self.board = next;
                    }
                    // The interlude does not count against the meter.
                    self.last_tick = now;
                    log::debug!(
                        "next board {}x{} active",
                        self.board.width(),
                        self.board.height()
                    );
                }
            }
        }
    }

    fn advance_recovery(&mut self, now: f64) {
        let (started_at, steps_done) = match &self.phase {
            RoundPhase::Restarting {
                started_at,
                steps_done,
                ..
            } => (*started_at, *steps_done),
            _ => return,
        };
        let total = self.config.recovery_steps;
        let due = if self.config.recovery_step_ms > 0.0 {
            ((now - started_at) / self.config.recovery_step_ms)
                .floor()
                .clamp(0.0, f64::from(total)) as u32
        } else {
            total
        };
        let target = self.config.initial_time;
        for _ in steps_done..due {
            self.ledger.meter = self
                .ledger
                .meter
                .recover_step(target, self.config.recovery_fraction);
        }
        if due < total {
            if let RoundPhase::Restarting { steps_done, .. } = &mut self.phase {
                *steps_done = due;
            }
            return;
        }
        self.ledger.meter = Meter::new(target);
        if let RoundPhase::Restarting { next, .. } =
            mem::replace(&mut self.phase, RoundPhase::Running)
        {
            self.board = next;
        }
        self.last_tick = now;
        log::info!("restart complete, meter at {target:.1}");
    }
}
