mod ascii;
mod halfblock;

pub use ascii::AsciiRenderer;
pub use halfblock::HalfBlockRenderer;

use std::io::Write;

/// One finished frame handed to the presentation layer. The pixel buffer is
/// fully composed before this is built, so the terminal either shows the
/// previous frame or this one, never a partial sweep.
pub struct Frame<'a> {
    pub term_cols: u16,
    pub term_rows: u16,
    pub visual_rows: u16,
    pub pixel_width: usize,
    pub pixel_height: usize,
    pub pixels_rgba: &'a [u8],
    pub hud: &'a str,
    pub hud_rows: u16,
    pub sync_updates: bool,
}

pub trait Renderer {
    fn name(&self) -> &'static str;
    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()>;
}

/// Shared preamble for text-grid backends: validates the frame against the
/// backend's pixels-per-cell ratio, begins the synchronized update, homes the
/// cursor and disables autowrap. Returns None when the frame should be a
/// silent no-op (zero size or dimension mismatch).
pub(crate) fn text_frame_begin(
    frame: &Frame<'_>,
    px_w_mul: usize,
    px_h_mul: usize,
    out: &mut dyn Write,
) -> anyhow::Result<Option<(usize, usize, usize, usize)>> {
    let cols = frame.term_cols as usize;
    let visual_rows = frame.visual_rows as usize;
    let w = frame.pixel_width;
    let h = frame.pixel_height;

    if cols == 0 || visual_rows == 0 || w == 0 || h == 0 {
        return Ok(None);
    }
    if w != cols * px_w_mul || h != visual_rows * px_h_mul {
        return Ok(None);
    }
    if frame.pixels_rgba.len() < w * h * 4 {
        return Ok(None);
    }

    if frame.sync_updates {
        out.write_all(b"\x1b[?2026h")?;
    }
    // Home, reset attributes, autowrap off while painting full-width rows.
    out.write_all(b"\x1b[H\x1b[0m\x1b[?7l")?;

    Ok(Some((cols, visual_rows, w, h)))
}

/// Shared epilogue: HUD rows below the visual area, autowrap back on, end of
/// the synchronized update, flush.
pub(crate) fn text_frame_end(
    frame: &Frame<'_>,
    cols: usize,
    visual_rows: usize,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let mut hud_lines = frame.hud.lines();
    for i in 0..(frame.hud_rows as usize) {
        write!(out, "\x1b[{};1H\x1b[0m\x1b[2K", visual_rows + i + 1)?;
        if let Some(mut line) = hud_lines.next() {
            if line.len() > cols {
                line = &line[..cols];
            }
            write!(out, "{line}")?;
        }
    }

    out.write_all(b"\x1b[?7h")?;
    if frame.sync_updates {
        out.write_all(b"\x1b[?2026l")?;
    }
    out.flush()?;
    Ok(())
}

pub(crate) fn write_fg_rgb(out: &mut dyn Write, r: u8, g: u8, b: u8) -> anyhow::Result<()> {
    write!(out, "\x1b[38;2;{};{};{}m", r, g, b)?;
    Ok(())
}

pub(crate) fn write_bg_rgb(out: &mut dyn Write, r: u8, g: u8, b: u8) -> anyhow::Result<()> {
    write!(out, "\x1b[48;2;{};{};{}m", r, g, b)?;
    Ok(())
}

pub(crate) fn luma_u8(r: u8, g: u8, b: u8) -> u8 {
    // Integer Rec.601 approximation.
    ((r as u32 * 77 + g as u32 * 150 + b as u32 * 29) >> 8) as u8
}
