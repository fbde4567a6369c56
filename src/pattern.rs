use crate::params::RenderParams;

const SIN_WAVE_MULTIPLIER: f32 = 0.1;
const BASE_LIGHTNESS: i32 = 50;

/// Foreground/background decision for one sub-block at cell-local (i, j).
/// The offset scrolls the pattern vertically inside each cell, wrapping.
pub fn is_foreground(i: usize, j: usize, params: &RenderParams, offset: f32) -> bool {
    if params.mod_val <= 0.0 {
        return false;
    }

    let cell = params.cell_size as f32;
    let i = i as f32;
    let animated_j = (j as f32 - offset + cell).rem_euclid(cell);

    let base = (params.i_mult * i + params.j_mult * animated_j) * params.expr_mult;
    let half_mod = params.mod_val / 2.0;
    let sin_wave =
        ((i * params.j_mult + animated_j * params.i_mult) * SIN_WAVE_MULTIPLIER).sin() * half_mod
            + half_mod;
    let expression = (base + sin_wave).rem_euclid(params.mod_val);

    expression / params.mod_val < params.threshold
}

/// Uniform foreground ink for the frame. The lightness trim pushes the
/// foreground darker while the background gets brighter, centered at 50%.
pub fn foreground_color(params: &RenderParams, lightness_delta: i32) -> [u8; 3] {
    if params.mono_foreground {
        return [255, 255, 255];
    }
    hsl_to_rgb(params.hue, 1.0, lightness_pct(BASE_LIGHTNESS - lightness_delta))
}

pub fn background_color(params: &RenderParams, lightness_delta: i32) -> [u8; 3] {
    if params.mono_background {
        return [0, 0, 0];
    }
    hsl_to_rgb(
        params.background_hue,
        1.0,
        lightness_pct(BASE_LIGHTNESS + lightness_delta),
    )
}

/// Full per-pixel contract: decision plus color. Deterministic; the fast path
/// in the engine precomputes the two uniform colors and calls only the
/// decision per sub-block.
pub fn paint(i: usize, j: usize, params: &RenderParams, offset: f32, lightness_delta: i32) -> [u8; 3] {
    if is_foreground(i, j, params, offset) {
        foreground_color(params, lightness_delta)
    } else {
        background_color(params, lightness_delta)
    }
}

fn lightness_pct(l: i32) -> f32 {
    l.clamp(0, 100) as f32 / 100.0
}

/// HSL to RGB, hue in degrees (any value, wrapped into [0,360)), s and l in
/// [0,1].
pub fn hsl_to_rgb(h_deg: f32, s: f32, l: f32) -> [u8; 3] {
    let h = h_deg.rem_euclid(360.0);
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    [
        ((r + m).clamp(0.0, 1.0) * 255.0).round() as u8,
        ((g + m).clamp(0.0, 1.0) * 255.0).round() as u8,
        ((b + m).clamp(0.0, 1.0) * 255.0).round() as u8,
    ]
}
