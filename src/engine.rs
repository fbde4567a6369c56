use crate::params::RenderParams;
use crate::pattern;

pub const LIGHTNESS_DELTA_LIMIT: i32 = 50;

/// Vertical scroll phase within one cell, wrapped modulo the current cell
/// size. Owned exclusively by the render tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnimationState {
    pub offset: f32,
}

impl AnimationState {
    /// Frozen when speed is zero or negative; otherwise advances and wraps
    /// against the cell size in effect *now*. A cell that shrank since the
    /// last tick snaps the offset down discontinuously, which is accepted.
    pub fn advance(&mut self, speed: f32, cell_size: usize) {
        if speed <= 0.0 {
            return;
        }
        let cell = cell_size.max(1) as f32;
        self.offset = (self.offset + speed).rem_euclid(cell);
    }
}

/// Bounded lightness bias driven by the left/right buttons. Sampled once per
/// tick: a held button keeps drifting the bias until it hits the bound.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LightnessTrim {
    delta: i32,
}

impl LightnessTrim {
    pub fn delta(&self) -> i32 {
        self.delta
    }

    /// Both buttons in one tick cancel out; the clamps are symmetric so the
    /// order of the two updates does not matter.
    pub fn update(&mut self, left_pressed: bool, right_pressed: bool) {
        if left_pressed {
            self.delta = (self.delta - 1).max(-LIGHTNESS_DELTA_LIMIT);
        }
        if right_pressed {
            self.delta = (self.delta + 1).min(LIGHTNESS_DELTA_LIMIT);
        }
    }
}

/// Composes one full frame off-screen: uniform background fill, then
/// cell-aligned blocks of `pixel_size` foreground squares. Background-decided
/// sub-blocks are never re-drawn.
pub fn render_into(
    pixels: &mut [u8],
    w: usize,
    h: usize,
    params: &RenderParams,
    offset: f32,
    lightness_delta: i32,
) {
    let frame_len = w.saturating_mul(h).saturating_mul(4);
    if pixels.len() < frame_len || w == 0 || h == 0 {
        return;
    }

    let bg = pattern::background_color(params, lightness_delta);
    let fg = pattern::foreground_color(params, lightness_delta);

    for px in pixels[..frame_len].chunks_exact_mut(4) {
        px[0] = bg[0];
        px[1] = bg[1];
        px[2] = bg[2];
        px[3] = 255;
    }

    let cell = params.cell_size.max(1);
    let block = params.pixel_size.max(1);

    for y in (0..h).step_by(cell) {
        for x in (0..w).step_by(cell) {
            for j in (0..cell).step_by(block) {
                for i in (0..cell).step_by(block) {
                    if !pattern::is_foreground(i, j, params, offset) {
                        continue;
                    }
                    // Filled square of side `block`, clipped at the surface edge.
                    for dy in 0..block {
                        let py = y + j + dy;
                        if py >= h {
                            break;
                        }
                        for dx in 0..block {
                            let px = x + i + dx;
                            if px >= w {
                                break;
                            }
                            let idx = (py * w + px) * 4;
                            pixels[idx] = fg[0];
                            pixels[idx + 1] = fg[1];
                            pixels[idx + 2] = fg[2];
                            pixels[idx + 3] = 255;
                        }
                    }
                }
            }
        }
    }
}

/// Owns the mutable frame-loop state (scroll offset, lightness trim) and the
/// off-screen RGBA surface the presentation layer commits in one operation.
pub struct PatternEngine {
    anim: AnimationState,
    trim: LightnessTrim,
    pixels: Vec<u8>,
    w: usize,
    h: usize,
}

impl PatternEngine {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            anim: AnimationState::default(),
            trim: LightnessTrim::default(),
            pixels: vec![0u8; w * h * 4],
            w,
            h,
        }
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        if (w, h) != (self.w, self.h) {
            self.w = w;
            self.h = h;
            self.pixels = vec![0u8; w * h * 4];
        }
    }

    pub fn size(&self) -> (usize, usize) {
        (self.w, self.h)
    }

    pub fn offset(&self) -> f32 {
        self.anim.offset
    }

    pub fn lightness_delta(&self) -> i32 {
        self.trim.delta()
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// One scheduling tick: trim update, offset advance, full sweep. Returns
    /// the finished frame.
    pub fn tick(&mut self, params: &RenderParams, left_pressed: bool, right_pressed: bool) -> &[u8] {
        self.trim.update(left_pressed, right_pressed);
        self.anim.advance(params.speed, params.cell_size);
        render_into(
            &mut self.pixels,
            self.w,
            self.h,
            params,
            self.anim.offset,
            self.trim.delta(),
        );
        &self.pixels
    }
}
