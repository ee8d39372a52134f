use once_cell::sync::Lazy;
use regex::Regex;

use crate::utils::metrics::js_round;

static NON_NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\d.,]").expect("static regex"));

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderConfig {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl SliderConfig {
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }

    /// Snaps to the step grid, then clamps.
    pub fn snap(&self, value: f64) -> f64 {
        let stepped = if self.step > 0.0 {
            js_round(value / self.step) * self.step
        } else {
            value
        };
        self.clamp(stepped)
    }

    /// Value under the pointer for a track starting at `track_left` and
    /// `track_width` pixels wide.
    pub fn value_at(&self, pointer_x: f64, track_left: f64, track_width: f64) -> f64 {
        if track_width <= 0.0 {
            return self.min;
        }
        let ratio = ((pointer_x - track_left) / track_width).clamp(0.0, 1.0);
        self.snap(self.min + ratio * (self.max - self.min))
    }

    pub fn percentage(&self, value: f64) -> f64 {
        if self.max == self.min {
            return 0.0;
        }
        (value - self.min) / (self.max - self.min) * 100.0
    }

    /// Parses what the user typed in the side box. Out of range or
    /// unparsable text gives `None` and the previous value stays.
    pub fn parse_input(&self, text: &str) -> Option<f64> {
        let cleaned = NON_NUMERIC.replace_all(text, "").replacen(',', ".", 1);
        let value = parse_float_prefix(&cleaned)?;
        (value >= self.min && value <= self.max).then_some(value)
    }
}

// parseFloat semantics: longest numeric prefix wins ("1.5.2" -> 1.5).
fn parse_float_prefix(text: &str) -> Option<f64> {
    let mut end = 0;
    let mut seen_dot = false;
    for (idx, ch) in text.char_indices() {
        match ch {
            '0'..='9' => end = idx + 1,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
    }
    if end == 0 {
        return None;
    }
    text[..end].parse::<f64>().ok()
}

/// Pointer gesture on a slider track. Moves only count between press and
/// release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderDrag {
    config: SliderConfig,
    track_left: f64,
    track_width: f64,
    dragging: bool,
}

impl SliderDrag {
    pub fn new(config: SliderConfig, track_left: f64, track_width: f64) -> Self {
        Self { config, track_left, track_width, dragging: false }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn press(&mut self, pointer_x: f64) -> f64 {
        self.dragging = true;
        self.config.value_at(pointer_x, self.track_left, self.track_width)
    }

    pub fn move_to(&mut self, pointer_x: f64) -> Option<f64> {
        self.dragging
            .then(|| self.config.value_at(pointer_x, self.track_left, self.track_width))
    }

    pub fn release(&mut self) {
        self.dragging = false;
    }
}
