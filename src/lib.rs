//! Frost Grid core crate.
//!
//! A thaw puzzle on a procedurally generated grid: click or drag over every empty
//! tile before the time meter drains. Clearing a board refills the meter and adds
//! to the score; letting the meter hit its floor ends the game until the player
//! restarts.
//!
//! The pure game rules ([`board`], [`ledger`], [`round`]) build and test natively.
//! [`start_game()`] wires them to a full-window canvas in the browser.

use wasm_bindgen::prelude::*;

pub mod board;
pub mod config;
pub mod ledger;
pub mod logging;
pub mod round;
mod web;

pub use board::generator::{MAX_SIDE, SizeRange, generate};
pub use board::layout::{BoardGeometry, Point, TileSizing, Viewport, screen_to_cell};
pub use board::{Board, BoardError, CellState};
pub use config::{ConfigError, GameConfig};
pub use ledger::{Ledger, METER_FLOOR, Meter};
pub use round::{RenderSink, Round, RoundPhase, WonStage};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    logging::init(level);
}

// -----------------------------------------------------------------------------
// JS entrypoints
// -----------------------------------------------------------------------------

/// Start with the default balance.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    web::start(GameConfig::default())
}

/// Start with a JSON config; omitted fields keep their defaults.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_game_with_config(json: &str) -> Result<(), JsValue> {
    let config = GameConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    web::start(config)
}

/// Restart after a loss (same as pressing the overlay button). Returns false when
/// there is nothing to restart.
#[wasm_bindgen]
pub fn restart_game() -> bool {
    web::restart()
}
