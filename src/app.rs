use crate::config::{Config, RendererMode};
use crate::controls::ControlId;
use crate::engine::PatternEngine;
use crate::input::InputSystem;
use crate::layout::ControlLayout;
use crate::params::RenderParams;
use crate::render::{AsciiRenderer, Frame, HalfBlockRenderer, Renderer};
use crate::terminal::TerminalGuard;
use anyhow::Context as _;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::io::BufWriter;
use std::time::{Duration, Instant};

const HUD_ROWS: u16 = 1;
const MIN_COLS: u16 = 4;
const MIN_ROWS: u16 = 2;

pub fn run(cfg: Config) -> anyhow::Result<()> {
    let layout = match cfg.layout.as_deref() {
        Some(path) => ControlLayout::load(path)
            .with_context(|| format!("load control layout {}", path.display()))?,
        None => ControlLayout::default(),
    };

    let inputs = InputSystem::new(cfg.source, cfg.feed.as_deref())
        .with_context(|| format!("start control source ({:?})", cfg.source))?;
    let controls = inputs.controls();

    let _term = TerminalGuard::new()?;
    let mut out = BufWriter::new(TerminalGuard::stdout());

    let mut renderer: Box<dyn Renderer> = match cfg.renderer {
        RendererMode::HalfBlock => Box::new(HalfBlockRenderer::new()),
        RendererMode::Ascii => Box::new(AsciiRenderer::new()),
    };
    let (px_w_mul, px_h_mul) = match cfg.renderer {
        RendererMode::HalfBlock => (1usize, 2usize),
        RendererMode::Ascii => (1usize, 1usize),
    };

    let mut show_hud = true;
    let mut engine = PatternEngine::new(0, 0);
    let mut fps = FpsCounter::new();
    let tick_budget = Duration::from_secs_f32(1.0 / cfg.fps.max(1) as f32);

    loop {
        let tick_start = Instant::now();

        // Drain input events (non-blocking).
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(k) if k.kind != KeyEventKind::Release => {
                    if handle_key(k.code, k.modifiers, &mut show_hud) {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }

        // The presentation surface can be transiently unusable (mid-resize,
        // tiny window). Skip the tick and retry rather than bailing.
        let (term_cols, term_rows) = crossterm::terminal::size().context("get terminal size")?;
        if term_cols < MIN_COLS || term_rows < MIN_ROWS {
            std::thread::sleep(tick_budget);
            continue;
        }

        let hud_rows = if show_hud { HUD_ROWS } else { 0 };
        let visual_rows = term_rows.saturating_sub(hud_rows).max(1);
        let w = (term_cols as usize).saturating_mul(px_w_mul);
        let h = (visual_rows as usize).saturating_mul(px_h_mul);
        engine.resize(w, h);

        // One atomic snapshot per tick; parameters are never touched while a
        // sweep is in progress.
        let snapshot = controls.load();
        let params = RenderParams::derive(&snapshot, &layout);
        let left = snapshot.pressed(ControlId::ButtonLeft);
        let right = snapshot.pressed(ControlId::ButtonRight);

        engine.tick(&params, left, right);

        let hud = if show_hud {
            build_hud(&fps, &params, &engine, controls.age_ms())
        } else {
            String::new()
        };
        let pixels = engine.pixels();

        let frame = Frame {
            term_cols,
            term_rows,
            visual_rows,
            pixel_width: w,
            pixel_height: h,
            pixels_rgba: pixels,
            hud: &hud,
            hud_rows,
            sync_updates: cfg.sync_updates,
        };
        renderer.render(&frame, &mut out)?;

        fps.tick();

        let elapsed = tick_start.elapsed();
        if elapsed < tick_budget {
            std::thread::sleep(tick_budget - elapsed);
        }
    }
}

fn handle_key(code: KeyCode, mods: KeyModifiers, show_hud: &mut bool) -> bool {
    if mods.contains(KeyModifiers::CONTROL) && matches!(code, KeyCode::Char('c')) {
        return true;
    }
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => true,
        KeyCode::Char('h') | KeyCode::Char('H') => {
            *show_hud = !*show_hud;
            false
        }
        _ => false,
    }
}

fn build_hud(fps: &FpsCounter, params: &RenderParams, engine: &PatternEngine, age_ms: f32) -> String {
    format!(
        "fps {:>5.1} | cell {:>4} px {:>3} | off {:>7.2} | trim {:+3} | thr {:.2} mod {:>6.2} spd {:.3} | hue {:>6.1}/{:>5.1} | feed {:>4.0}ms",
        fps.fps(),
        params.cell_size,
        params.pixel_size,
        engine.offset(),
        engine.lightness_delta(),
        params.threshold,
        params.mod_val,
        params.speed,
        params.hue,
        params.background_hue,
        age_ms,
    )
}

struct FpsCounter {
    window_start: Instant,
    frames: u32,
    fps: f32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            window_start: Instant::now(),
            frames: 0,
            fps: 0.0,
        }
    }

    fn tick(&mut self) {
        self.frames += 1;
        let elapsed = self.window_start.elapsed().as_secs_f32();
        if elapsed >= 0.5 {
            self.fps = self.frames as f32 / elapsed;
            self.frames = 0;
            self.window_start = Instant::now();
        }
    }

    fn fps(&self) -> f32 {
        self.fps
    }
}
