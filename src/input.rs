use crate::config::ControlSource;
use crate::controls::{AtomicControlBank, ControlFrame, ControlId, ANALOG_CONTROL_COUNT};
use anyhow::{anyhow, Context as _};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const WRITER_TICK: Duration = Duration::from_millis(16);

/// Owns the background thread that publishes control snapshots into the
/// shared bank. Dropping it stops the writer and joins the thread.
pub struct InputSystem {
    stop: Arc<AtomicBool>,
    writer_handle: Option<thread::JoinHandle<()>>,
    controls: Arc<AtomicControlBank>,
}

impl InputSystem {
    pub fn new(source: ControlSource, feed_path: Option<&Path>) -> anyhow::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let controls = Arc::new(AtomicControlBank::new());
        let stop_for_thread = Arc::clone(&stop);
        let controls_for_thread = Arc::clone(&controls);

        let writer_handle = match source {
            ControlSource::Sim => thread::spawn(move || {
                sim_loop(&stop_for_thread, &controls_for_thread);
            }),
            ControlSource::Feed => {
                let path: PathBuf = feed_path
                    .ok_or_else(|| anyhow!("--source feed requires --feed <path>"))?
                    .to_path_buf();
                // Fail fast on an unopenable path; transient read errors later
                // are tolerated by the reader loop.
                File::open(&path)
                    .with_context(|| format!("open control feed {}", path.display()))?;
                thread::spawn(move || {
                    feed_loop(&path, &stop_for_thread, &controls_for_thread);
                })
            }
        };

        Ok(Self {
            stop,
            writer_handle: Some(writer_handle),
            controls,
        })
    }

    /// Latest-snapshot read accessor. Diagnostic collaborators use the same
    /// handle to answer "current control values" requests verbatim.
    pub fn controls(&self) -> Arc<AtomicControlBank> {
        Arc::clone(&self.controls)
    }
}

impl Drop for InputSystem {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(h) = self.writer_handle.take() {
            let _ = h.join();
        }
    }
}

/// Smoothly drifting fake hardware: each analog control eases toward a target
/// that is re-rolled now and then, and buttons pulse for short bursts.
fn sim_loop(stop: &AtomicBool, controls: &AtomicControlBank) {
    let mut frame = ControlFrame::default();
    let mut targets = [0.0f32; ANALOG_CONTROL_COUNT];
    for t in &mut targets {
        *t = fastrand::f32();
    }
    let mut button_ticks = [0u32; 4];

    while !stop.load(Ordering::Relaxed) {
        for (idx, target) in targets.iter_mut().enumerate() {
            if fastrand::u32(..600) == 0 {
                *target = fastrand::f32();
            }
            frame.analog[idx] += (*target - frame.analog[idx]) * 0.02;
        }

        for (idx, ticks) in button_ticks.iter_mut().enumerate() {
            if *ticks > 0 {
                *ticks -= 1;
            } else if fastrand::u32(..900) == 0 {
                *ticks = 10 + fastrand::u32(..50);
            }
            frame.buttons[idx] = *ticks > 0;
        }

        controls.store(&frame);
        thread::sleep(WRITER_TICK);
    }
}

/// Tail-follows a `<control> <value>` line feed (regular file or FIFO).
/// Malformed lines are skipped; EOF sleeps and retries so a writer can keep
/// appending. Each accepted line publishes a whole fresh snapshot.
fn feed_loop(path: &Path, stop: &AtomicBool, controls: &AtomicControlBank) {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(err) => {
            eprintln!("control feed error: {err}");
            return;
        }
    };
    let mut reader = BufReader::new(file);
    let mut frame = ControlFrame::default();
    let mut line = String::new();

    while !stop.load(Ordering::Relaxed) {
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => {
                thread::sleep(Duration::from_millis(10));
            }
            Ok(_) => {
                if apply_feed_line(&line, &mut frame) {
                    controls.store(&frame);
                }
            }
            Err(err) => {
                eprintln!("control feed error: {err}");
                thread::sleep(Duration::from_millis(50));
            }
        }
    }
}

/// Parses one feed line into the running frame. Returns whether the frame
/// changed. Unknown controls and unparsable values are ignored, never fatal.
pub fn apply_feed_line(line: &str, frame: &mut ControlFrame) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return false;
    }

    let mut tokens = trimmed.split_whitespace();
    let (Some(name), Some(value_raw), None) = (tokens.next(), tokens.next(), tokens.next()) else {
        return false;
    };
    let Some(id) = ControlId::parse(name) else {
        return false;
    };

    let value = match value_raw {
        "true" => 1.0,
        "false" => 0.0,
        other => match other.parse::<f32>() {
            Ok(v) if v.is_finite() => v,
            _ => return false,
        },
    };

    frame.set(id, value);
    true
}
