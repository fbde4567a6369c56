use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub const ANALOG_CONTROL_COUNT: usize = 9;
pub const BUTTON_CONTROL_COUNT: usize = 4;

/// Every named control the input feed can deliver. Analog controls carry a
/// value in their native range; buttons are pressed/released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlId {
    Knob1,
    Knob2,
    Knob3,
    Knob4,
    Knob5,
    HorizontalSlider,
    VerticalSlider1,
    VerticalSlider2,
    VerticalSlider3,
    ButtonLeft,
    ButtonRight,
    ButtonUp,
    ButtonDown,
}

impl ControlId {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "knob_1" => Some(Self::Knob1),
            "knob_2" => Some(Self::Knob2),
            "knob_3" => Some(Self::Knob3),
            "knob_4" => Some(Self::Knob4),
            "knob_5" => Some(Self::Knob5),
            "horizontal_slider" => Some(Self::HorizontalSlider),
            "vertical_slider_1" => Some(Self::VerticalSlider1),
            "vertical_slider_2" => Some(Self::VerticalSlider2),
            "vertical_slider_3" => Some(Self::VerticalSlider3),
            "button_left" => Some(Self::ButtonLeft),
            "button_right" => Some(Self::ButtonRight),
            "button_up" => Some(Self::ButtonUp),
            "button_down" => Some(Self::ButtonDown),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Knob1 => "knob_1",
            Self::Knob2 => "knob_2",
            Self::Knob3 => "knob_3",
            Self::Knob4 => "knob_4",
            Self::Knob5 => "knob_5",
            Self::HorizontalSlider => "horizontal_slider",
            Self::VerticalSlider1 => "vertical_slider_1",
            Self::VerticalSlider2 => "vertical_slider_2",
            Self::VerticalSlider3 => "vertical_slider_3",
            Self::ButtonLeft => "button_left",
            Self::ButtonRight => "button_right",
            Self::ButtonUp => "button_up",
            Self::ButtonDown => "button_down",
        }
    }

    pub const fn analog_controls() -> [Self; ANALOG_CONTROL_COUNT] {
        [
            Self::Knob1,
            Self::Knob2,
            Self::Knob3,
            Self::Knob4,
            Self::Knob5,
            Self::HorizontalSlider,
            Self::VerticalSlider1,
            Self::VerticalSlider2,
            Self::VerticalSlider3,
        ]
    }

    pub const fn button_controls() -> [Self; BUTTON_CONTROL_COUNT] {
        [
            Self::ButtonLeft,
            Self::ButtonRight,
            Self::ButtonUp,
            Self::ButtonDown,
        ]
    }

    pub fn is_button(self) -> bool {
        self.button_index().is_some()
    }

    pub(crate) fn analog_index(self) -> Option<usize> {
        match self {
            Self::Knob1 => Some(0),
            Self::Knob2 => Some(1),
            Self::Knob3 => Some(2),
            Self::Knob4 => Some(3),
            Self::Knob5 => Some(4),
            Self::HorizontalSlider => Some(5),
            Self::VerticalSlider1 => Some(6),
            Self::VerticalSlider2 => Some(7),
            Self::VerticalSlider3 => Some(8),
            _ => None,
        }
    }

    pub(crate) fn button_index(self) -> Option<usize> {
        match self {
            Self::ButtonLeft => Some(0),
            Self::ButtonRight => Some(1),
            Self::ButtonUp => Some(2),
            Self::ButtonDown => Some(3),
            _ => None,
        }
    }
}

/// Snapshot of every control's last-known value. A control the feed never
/// mentioned reads as zero / released.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlFrame {
    pub analog: [f32; ANALOG_CONTROL_COUNT],
    pub buttons: [bool; BUTTON_CONTROL_COUNT],
}

impl ControlFrame {
    pub fn analog(&self, id: ControlId) -> f32 {
        id.analog_index().map_or(0.0, |i| self.analog[i])
    }

    pub fn pressed(&self, id: ControlId) -> bool {
        id.button_index().is_some_and(|i| self.buttons[i])
    }

    pub fn set(&mut self, id: ControlId, value: f32) {
        if let Some(i) = id.analog_index() {
            self.analog[i] = value;
        } else if let Some(i) = id.button_index() {
            self.buttons[i] = value != 0.0;
        }
    }
}

/// Lock-free snapshot store shared between the input writer thread and the
/// render tick. Writers publish whole frames; readers retry until they see a
/// stable even sequence number, so a tick never observes a half-written frame.
pub struct AtomicControlBank {
    seq: AtomicU64,
    analog: [AtomicU32; ANALOG_CONTROL_COUNT],
    buttons: [AtomicU32; BUTTON_CONTROL_COUNT],
    updated_ms: AtomicU64,
}

impl AtomicControlBank {
    pub fn new() -> Self {
        Self {
            seq: AtomicU64::new(0),
            analog: std::array::from_fn(|_| AtomicU32::new(0.0f32.to_bits())),
            buttons: std::array::from_fn(|_| AtomicU32::new(0)),
            updated_ms: AtomicU64::new(0),
        }
    }

    pub fn store(&self, frame: &ControlFrame) {
        // Odd sequence marks a write in progress.
        self.seq.fetch_add(1, Ordering::Release);
        for (dst, src) in self.analog.iter().zip(frame.analog.iter()) {
            dst.store(src.to_bits(), Ordering::Relaxed);
        }
        for (dst, src) in self.buttons.iter().zip(frame.buttons.iter()) {
            dst.store(u32::from(*src), Ordering::Relaxed);
        }
        self.updated_ms.store(now_ms(), Ordering::Relaxed);
        self.seq.fetch_add(1, Ordering::Release);
    }

    pub fn load(&self) -> ControlFrame {
        loop {
            let v1 = self.seq.load(Ordering::Acquire);
            if v1 % 2 != 0 {
                std::hint::spin_loop();
                continue;
            }

            let mut frame = ControlFrame::default();
            for (dst, src) in frame.analog.iter_mut().zip(self.analog.iter()) {
                *dst = f32::from_bits(src.load(Ordering::Relaxed));
            }
            for (dst, src) in frame.buttons.iter_mut().zip(self.buttons.iter()) {
                *dst = src.load(Ordering::Relaxed) != 0;
            }

            let v2 = self.seq.load(Ordering::Acquire);
            if v1 == v2 {
                return frame;
            }
        }
    }

    /// Milliseconds since the writer last published, for HUD staleness.
    pub fn age_ms(&self) -> f32 {
        let t = self.updated_ms.load(Ordering::Relaxed);
        if t == 0 {
            return 0.0;
        }
        now_ms().saturating_sub(t) as f32
    }
}

impl Default for AtomicControlBank {
    fn default() -> Self {
        Self::new()
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_millis(0))
        .as_millis() as u64
}
