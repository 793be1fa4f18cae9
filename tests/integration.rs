// Integration tests (native) for the `frost-grid` crate.
// These tests avoid wasm-specific functionality and exercise pure Rust logic so
// they can run under `cargo test` on the host.

use frost_grid::{
    Board, CellState, GameConfig, Meter, Point, RenderSink, Round, RoundPhase, SizeRange,
    TileSizing, Viewport, generate, screen_to_cell,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Sink that ignores drawing and keeps the last indicator state.
#[derive(Default)]
struct Indicators {
    won: bool,
    lost: Option<u64>,
}

impl RenderSink for Indicators {
    fn draw_board(&mut self, _board: &Board) {}
    fn draw_meter(&mut self, _meter: &Meter) {}
    fn show_won(&mut self) {
        self.won = true;
    }
    fn clear_won(&mut self) {
        self.won = false;
    }
    fn show_lost(&mut self, score: u64) {
        self.lost = Some(score);
    }
    fn clear_lost(&mut self) {
        self.lost = None;
    }
}

fn plus_board() -> Board {
    use CellState::{Empty, Frozen};
    Board::new(
        3,
        3,
        vec![Frozen, Empty, Frozen, Empty, Empty, Empty, Frozen, Empty, Frozen],
    )
    .unwrap()
}

// Opening plus-shaped board clears in five turns.
#[test]
fn plus_board_completes_after_five_turns() {
    let mut board = plus_board();
    for idx in [1, 3, 4, 5, 7] {
        board = board.apply_action(idx);
    }
    assert!(board.is_complete());
    assert_eq!(board.count(CellState::Cleared), 5);
}

#[test]
fn clicking_frozen_cell_returns_equal_board() {
    let board = plus_board();
    assert_eq!(board.apply_action(0), board);
    assert_eq!(Board::starter(), board);
}

#[test]
fn meter_hits_floor_and_loses() {
    let meter = Meter {
        time: 10.0,
        max_time: 10.0,
    }
    .decay(600.0, 0.01);
    assert_eq!(meter.time, 5.0);
    assert!(meter.is_lost());
}

#[test]
fn centre_pixel_maps_to_centre_cell() {
    let view = Viewport::new(900.0, 900.0);
    let idx = screen_to_cell(Point::new(450.0, 450.0), view, 3, 3, TileSizing::LongestAxis);
    assert_eq!(idx, Some(4));
    let idx = screen_to_cell(Point::new(450.0, 450.0), view, 3, 3, TileSizing::ShortestAxis);
    assert_eq!(idx, Some(4));
}

#[test]
fn generation_always_leaves_work_to_do() {
    let ranges = [
        SizeRange::CLASSIC,
        SizeRange::WIDE,
        SizeRange::new(1, 2, 1, 2).unwrap(),
    ];
    for seed in 0..50u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        for range in &ranges {
            for bias in 0..12 {
                let board = generate(bias, range, &mut rng);
                assert!(!board.is_complete());
                assert_eq!(board.len(), (board.width() * board.height()) as usize);
                assert!(range.contains(board.width(), board.height()));
            }
        }
    }
}

// Full session: win the opening board by dragging, sit out the interlude, then
// let the meter run dry and restart.
#[test]
fn session_win_loss_restart() {
    let view = Viewport::new(900.0, 900.0);
    let mut round = Round::new(GameConfig::default(), StdRng::seed_from_u64(5), 0.0);
    let mut sink = Indicators::default();

    // Tiles are 180px with a one-tile margin: column c spans 180*(c+1)..180*(c+2).
    let centre = |col: f64, row: f64| Point::new(270.0 + col * 180.0, 270.0 + row * 180.0);
    round.pointer_down(centre(1.0, 0.0), view, 10.0, &mut sink);
    for (c, r) in [(1.0, 1.0), (0.0, 1.0), (2.0, 1.0), (1.0, 2.0)] {
        round.pointer_move(centre(c, r), view, 10.0, &mut sink);
    }
    assert!(sink.won);
    assert_eq!(round.score(), 5);

    round.tick(510.0, &mut sink);
    assert!(!sink.won);
    assert!(!round.phase().accepts_input());
    round.tick(1010.0, &mut sink);
    assert_eq!(round.phase(), &RoundPhase::Running);

    round.tick(1.0e9, &mut sink);
    assert_eq!(sink.lost, Some(5));
    assert_eq!(round.meter().time, frost_grid::METER_FLOOR);

    assert!(round.restart(1.0e9, &mut sink));
    assert_eq!(sink.lost, None);
    assert_eq!(round.score(), 0);
    round.tick(1.0e9 + 100.0, &mut sink);
    assert_eq!(round.phase(), &RoundPhase::Running);
    assert_eq!(round.meter().time, GameConfig::default().initial_time);
}
