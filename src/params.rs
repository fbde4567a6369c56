use crate::controls::{ControlFrame, ControlId};
use crate::layout::ControlLayout;

pub const BASE_CELL_SIZE: usize = 32;
pub const BASE_PIXEL_SIZE: usize = 2;
pub const SCALE_BUCKETS: u32 = 8;

/// Smallest modulus the mapper will emit. Keeps the pattern expression's
/// division well-defined even when knob_4 sits at its low stop.
pub const MIN_MOD_VAL: f32 = 1e-3;

/// Linear range conversion. The input is clamped into its source range first,
/// so outputs never leave [dst_lo, dst_hi] (in either orientation).
pub fn convert_range(value: f32, src_lo: f32, src_hi: f32, dst_lo: f32, dst_hi: f32) -> f32 {
    let span = src_hi - src_lo;
    if !span.is_normal() {
        return dst_lo;
    }
    let v = value.clamp(src_lo.min(src_hi), src_lo.max(src_hi));
    dst_lo + (v - src_lo) / span * (dst_hi - dst_lo)
}

/// Shared bucket index for cell and pixel sizing. Both sizes must come from
/// the same index or they desynchronize at bucket boundaries.
pub fn scale_bucket(scale_factor: f32) -> u32 {
    let idx = (scale_factor * SCALE_BUCKETS as f32).floor();
    (idx as i32).clamp(0, SCALE_BUCKETS as i32 - 1) as u32
}

/// Rendering parameters, derived fresh from the control snapshot every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderParams {
    pub i_mult: f32,
    pub j_mult: f32,
    pub expr_mult: f32,
    pub mod_val: f32,
    pub threshold: f32,
    pub speed: f32,
    pub hue: f32,
    pub background_hue: f32,
    pub mono_foreground: bool,
    pub mono_background: bool,
    pub cell_size: usize,
    pub pixel_size: usize,
}

impl RenderParams {
    /// Pure and total: missing controls read as zero, every mapping is
    /// clamped, nothing is rejected.
    pub fn derive(frame: &ControlFrame, layout: &ControlLayout) -> Self {
        let map = |id: ControlId, dst_lo: f32, dst_hi: f32| {
            let r = layout.range(id);
            convert_range(frame.analog(id), r.lo, r.hi, dst_lo, dst_hi)
        };

        let scale_factor = map(ControlId::VerticalSlider3, 0.125, 1.0);
        let bucket = scale_bucket(scale_factor);

        Self {
            i_mult: map(ControlId::Knob1, 0.0, 2.0),
            j_mult: map(ControlId::Knob2, 0.0, 2.0),
            expr_mult: map(ControlId::Knob3, 0.0, 128.0),
            mod_val: map(ControlId::Knob4, 0.0, 128.0).max(MIN_MOD_VAL),
            threshold: map(ControlId::Knob5, 0.0, 1.0),
            speed: map(ControlId::HorizontalSlider, 0.0, 0.2),
            // Inverted on purpose: raising the slider lowers the hue.
            hue: map(ControlId::VerticalSlider1, 180.0, -180.0),
            background_hue: map(ControlId::VerticalSlider2, 0.0, 360.0),
            mono_foreground: frame.pressed(ControlId::ButtonUp),
            mono_background: frame.pressed(ControlId::ButtonDown),
            cell_size: BASE_CELL_SIZE << bucket,
            pixel_size: BASE_PIXEL_SIZE << bucket,
        }
    }
}
