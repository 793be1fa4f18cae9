// Browser smoke tests; run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn game_starts_and_ignores_restart_while_running() {
    frost_grid::wasm_start();
    frost_grid::start_game().expect("start_game");
    assert!(!frost_grid::restart_game());
    // A second start is a no-op rather than an error.
    frost_grid::start_game().expect("second start_game");
}
