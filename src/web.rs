//! Browser front end: full-window canvas, mouse listeners, restart button and the
//! requestAnimationFrame loop driving [`Round::tick`].
//!
//! All game state lives in one thread-local `WebGame`; every event handler and the
//! frame callback borrow it for the duration of a single call, so a handler never
//! observes a half-applied turn.

use std::cell::RefCell;
use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, EventTarget, HtmlCanvasElement, HtmlElement,
    MouseEvent, Window, window,
};

use crate::board::layout::{BoardGeometry, Point, TileSizing, Viewport};
use crate::board::{Board, CellState};
use crate::config::GameConfig;
use crate::ledger::Meter;
use crate::round::{RenderSink, Round};

const CANVAS_ID: &str = "fg-canvas";
const OVERLAY_ID: &str = "fg-lost";
const WON_CLASS: &str = "full won";
const LOST_CLASS: &str = "full lost";
const METER_HEIGHT: f64 = 10.0;

// --- Rendering ---------------------------------------------------------------

/// Canvas-backed [`RenderSink`]. Also tracks the viewport the mouse handlers map
/// against, so drawing and hit-testing always agree.
struct CanvasSink {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    overlay: HtmlElement,
    score_label: Element,
    base_class: String,
    viewport: Viewport,
    sizing: TileSizing,
}

impl CanvasSink {
    fn draw_tile(&self, cell: CellState, x: f64, y: f64, side: f64) {
        let ctx = &self.ctx;
        match cell {
            CellState::Frozen => {
                ctx.set_fill_style_str("#dcecf7");
                ctx.fill_rect(x, y, side, side);
                ctx.set_stroke_style_str("#a9c9e2");
                ctx.set_line_width(1.0);
                ctx.stroke_rect(x + 0.5, y + 0.5, side - 1.0, side - 1.0);
            }
            CellState::Empty => {
                ctx.set_fill_style_str("black");
                ctx.fill_rect(x, y, side, side);
            }
            CellState::Cleared => {
                // Wrapped present: red box, gold ribbon cross.
                let pad = side * 0.12;
                let inner = side - 2.0 * pad;
                let ribbon = inner * 0.18;
                ctx.set_fill_style_str("black");
                ctx.fill_rect(x, y, side, side);
                ctx.set_fill_style_str("#c0392b");
                ctx.fill_rect(x + pad, y + pad, inner, inner);
                ctx.set_fill_style_str("#f1c40f");
                ctx.fill_rect(x + (side - ribbon) / 2.0, y + pad, ribbon, inner);
                ctx.fill_rect(x + pad, y + (side - ribbon) / 2.0, inner, ribbon);
            }
        }
    }
}

impl RenderSink for CanvasSink {
    fn draw_board(&mut self, board: &Board) {
        let Viewport { width, height } = self.viewport;
        self.ctx.set_fill_style_str("#333333");
        self.ctx.fill_rect(0.0, 0.0, width, height);

        let geom = BoardGeometry::new(self.viewport, board.width(), board.height(), self.sizing);
        let side = geom.side;
        if !side.is_finite() || side <= 0.0 {
            return;
        }
        // Snow backdrop on the same tile grid the board is aligned to.
        let cols = (width / side).ceil() as i64;
        let rows = (height / side).ceil() as i64;
        for tx in 0..cols {
            for ty in 0..rows {
                self.draw_tile(CellState::Frozen, tx as f64 * side, ty as f64 * side, side);
            }
        }
        for (index, cell) in board.cells().iter().enumerate() {
            let o = geom.cell_origin(index);
            self.draw_tile(*cell, o.x, o.y, side);
        }
    }

    fn draw_meter(&mut self, meter: &Meter) {
        let width = self.viewport.width;
        let ratio = meter.fill_ratio();
        self.ctx.set_fill_style_str("rgba(0,0,0,0.45)");
        self.ctx.fill_rect(0.0, 0.0, width, METER_HEIGHT);
        self.ctx
            .set_fill_style_str(if ratio < 0.25 { "#e74c3c" } else { "#5dade2" });
        self.ctx.fill_rect(0.0, 0.0, width * ratio, METER_HEIGHT);
    }

    fn show_won(&mut self) {
        self.canvas.set_class_name(WON_CLASS);
    }

    fn clear_won(&mut self) {
        self.canvas.set_class_name(&self.base_class);
    }

    fn show_lost(&mut self, score: u64) {
        self.canvas.set_class_name(LOST_CLASS);
        self.score_label
            .set_text_content(Some(&format!("Score: {score}")));
        self.overlay.set_hidden(false);
    }

    fn clear_lost(&mut self) {
        self.canvas.set_class_name(&self.base_class);
        self.overlay.set_hidden(true);
    }
}

// --- Session state -------------------------------------------------------------

struct WebGame {
    round: Round<SmallRng>,
    sink: CanvasSink,
}

thread_local! {
    static GAME: RefCell<Option<WebGame>> = RefCell::new(None);
}

fn with_game<T>(f: impl FnOnce(&mut WebGame) -> T) -> Option<T> {
    GAME.with(|cell| cell.borrow_mut().as_mut().map(f))
}

pub(crate) fn performance_now() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

fn seeded_rng() -> SmallRng {
    let mut seed = [0u8; 8];
    match getrandom::getrandom(&mut seed) {
        Ok(()) => SmallRng::seed_from_u64(u64::from_le_bytes(seed)),
        Err(err) => {
            log::warn!("entropy source unavailable ({err}); seeding from the clock");
            SmallRng::seed_from_u64(performance_now().to_bits())
        }
    }
}

fn window_viewport(win: &Window) -> Viewport {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    Viewport::new(dim(win.inner_width()), dim(win.inner_height()))
}

fn point_of(evt: &MouseEvent) -> Point {
    Point::new(f64::from(evt.client_x()), f64::from(evt.client_y()))
}

// --- Setup -------------------------------------------------------------------

pub(crate) fn start(config: GameConfig) -> Result<(), JsValue> {
    config
        .validate()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    if GAME.with(|cell| cell.borrow().is_some()) {
        log::warn!("game already running; ignoring second start");
        return Ok(());
    }

    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;

    // Reuse a host-provided canvas when present, otherwise cover the window.
    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id(CANVAS_ID) {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id(CANVAS_ID);
        c.set_attribute("style", "position:fixed; left:0; top:0; display:block;")?;
        body.append_child(&c)?;
        c
    };
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into()?;

    let (overlay, score_label, restart_button) = build_lost_overlay(&doc)?;
    body.append_child(&overlay)?;

    let viewport = window_viewport(&win);
    canvas.set_width(viewport.width as u32);
    canvas.set_height(viewport.height as u32);

    let sink = CanvasSink {
        base_class: canvas.class_name(),
        canvas: canvas.clone(),
        ctx,
        overlay,
        score_label,
        viewport,
        sizing: config.tile_sizing,
    };
    let round = Round::new(config, seeded_rng(), performance_now());
    GAME.with(|cell| cell.replace(Some(WebGame { round, sink })));

    {
        let canvas = canvas.clone();
        let win_resize = win.clone();
        listen(&win, "resize", move |_evt: web_sys::Event| {
            let viewport = window_viewport(&win_resize);
            canvas.set_width(viewport.width as u32);
            canvas.set_height(viewport.height as u32);
            with_game(|game| game.sink.viewport = viewport);
        })?;
    }
    listen(&canvas, "mousedown", move |evt: MouseEvent| {
        let now = performance_now();
        with_game(|game| {
            let viewport = game.sink.viewport;
            game.round
                .pointer_down(point_of(&evt), viewport, now, &mut game.sink);
        });
    })?;
    listen(&canvas, "mousemove", move |evt: MouseEvent| {
        let now = performance_now();
        with_game(|game| {
            let viewport = game.sink.viewport;
            game.round
                .pointer_move(point_of(&evt), viewport, now, &mut game.sink);
        });
    })?;
    // Window-level so a release outside the canvas still ends the drag.
    listen(&win, "mouseup", move |_evt: MouseEvent| {
        with_game(|game| game.round.pointer_up());
    })?;
    listen(&restart_button, "click", move |_evt: MouseEvent| {
        restart();
    })?;

    start_loop();
    log::info!(
        "frost grid started ({}x{} viewport)",
        viewport.width,
        viewport.height
    );
    Ok(())
}

/// Overlay shown after a loss: final score plus a restart button. Starts hidden.
fn build_lost_overlay(doc: &Document) -> Result<(HtmlElement, Element, Element), JsValue> {
    let overlay: HtmlElement = doc.create_element("div")?.dyn_into()?;
    overlay.set_id(OVERLAY_ID);
    overlay.set_attribute("style", "position:fixed; top:50%; left:50%; transform:translate(-50%,-50%); padding:18px 28px; background:rgba(0,0,0,0.72); border:1px solid #555; border-radius:10px; color:#f5f5f5; font-family:sans-serif; font-size:22px; text-align:center; z-index:40;")?;
    overlay.set_hidden(true);

    let score_label = doc.create_element("div")?;
    score_label.set_text_content(Some("Score: 0"));
    overlay.append_child(&score_label)?;

    let button = doc.create_element("button")?;
    button.set_text_content(Some("Play again"));
    button.set_attribute("style", "margin-top:12px; font-size:18px; padding:6px 16px; cursor:pointer;")?;
    overlay.append_child(&button)?;

    Ok((overlay, score_label, button))
}

/// Attach a listener for the page's lifetime.
fn listen<E>(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(E) + 'static,
) -> Result<(), JsValue>
where
    E: FromWasmAbi + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Forward the restart signal. Returns whether a restart began.
pub(crate) fn restart() -> bool {
    let now = performance_now();
    with_game(|game| game.round.restart(now, &mut game.sink)).unwrap_or(false)
}

// --- Frame loop ----------------------------------------------------------------

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        with_game(|game| game.round.tick(ts, &mut game.sink));
        request_frame(&f);
    }) as Box<dyn FnMut(f64)>));
    request_frame(&g);
}

fn request_frame(callback: &FrameCallback) {
    let Some(win) = window() else { return };
    if let Some(cb) = callback.borrow().as_ref() {
        let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
