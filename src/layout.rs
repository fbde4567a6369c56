use crate::controls::ControlId;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// Native analog range declared for one control. The parameter mapper must be
/// told the true bounds because some hardware pre-scales its values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlRange {
    pub lo: f32,
    pub hi: f32,
}

impl ControlRange {
    pub const UNIT: Self = Self { lo: 0.0, hi: 1.0 };
}

/// Native ranges for every analog control, loadable from a layout file.
/// Controls the file does not mention keep the default [0,1] range.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlLayout {
    ranges: [ControlRange; crate::controls::ANALOG_CONTROL_COUNT],
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    Io(String),
    Parse { line: usize, message: String },
    UnknownControl { line: usize, name: String },
    NotAnalog { line: usize, name: String },
    DuplicateControl(String),
    InvalidRange { control: String, lo: f32, hi: f32 },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
            Self::Parse { line, message } => write!(f, "parse error at line {line}: {message}"),
            Self::UnknownControl { line, name } => {
                write!(f, "unknown control at line {line}: {name}")
            }
            Self::NotAnalog { line, name } => {
                write!(f, "control '{name}' at line {line} is a button, not analog")
            }
            Self::DuplicateControl(name) => write!(f, "duplicate range for control: {name}"),
            Self::InvalidRange { control, lo, hi } => {
                write!(f, "invalid range for control '{control}': lo={lo} hi={hi}")
            }
        }
    }
}

impl std::error::Error for LayoutError {}

impl Default for ControlLayout {
    fn default() -> Self {
        Self {
            ranges: [ControlRange::UNIT; crate::controls::ANALOG_CONTROL_COUNT],
        }
    }
}

impl ControlLayout {
    pub fn parse(text: &str) -> Result<Self, LayoutError> {
        let mut layout = Self::default();
        let mut seen = HashSet::new();

        for (line_idx, raw) in text.lines().enumerate() {
            let line_no = line_idx + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let tokens: Vec<&str> = trimmed.split_whitespace().collect();
            if tokens.first().copied() != Some("range") {
                return Err(LayoutError::Parse {
                    line: line_no,
                    message: "expected 'range'".to_string(),
                });
            }
            if tokens.len() != 4 {
                return Err(LayoutError::Parse {
                    line: line_no,
                    message: "range expects: range <control> <lo> <hi>".to_string(),
                });
            }

            let name = tokens[1];
            let id = ControlId::parse(name).ok_or_else(|| LayoutError::UnknownControl {
                line: line_no,
                name: name.to_string(),
            })?;
            if id.is_button() {
                return Err(LayoutError::NotAnalog {
                    line: line_no,
                    name: name.to_string(),
                });
            }
            if !seen.insert(id) {
                return Err(LayoutError::DuplicateControl(name.to_string()));
            }

            let lo = parse_f32(tokens[2], line_no, "invalid lo bound")?;
            let hi = parse_f32(tokens[3], line_no, "invalid hi bound")?;
            if lo >= hi {
                return Err(LayoutError::InvalidRange {
                    control: name.to_string(),
                    lo,
                    hi,
                });
            }

            if let Some(idx) = id.analog_index() {
                layout.ranges[idx] = ControlRange { lo, hi };
            }
        }

        Ok(layout)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LayoutError> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| LayoutError::Io(e.to_string()))?;
        Self::parse(&text)
    }

    pub fn range(&self, id: ControlId) -> ControlRange {
        id.analog_index()
            .map_or(ControlRange::UNIT, |i| self.ranges[i])
    }

    pub fn to_text(&self) -> String {
        ControlId::analog_controls()
            .iter()
            .map(|id| {
                let r = self.range(*id);
                format!("range {} {:.6} {:.6}", id.as_str(), r.lo, r.hi)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn parse_f32(s: &str, line: usize, msg: &str) -> Result<f32, LayoutError> {
    let v = s.parse::<f32>().map_err(|_| LayoutError::Parse {
        line,
        message: msg.to_string(),
    })?;
    if !v.is_finite() {
        return Err(LayoutError::Parse {
            line,
            message: msg.to_string(),
        });
    }
    Ok(v)
}
