use std::time::Duration;

pub const DEFAULT_ANIMATION: Duration = Duration::from_millis(800);

// fr-FR groups thousands with a narrow no-break space.
const GROUP_SEPARATOR: char = '\u{202F}';

pub fn ease_out_cubic(progress: f64) -> f64 {
    let p = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(3)
}

/// Tween between the displayed value and a new target, restarted from the
/// current display value whenever the target changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CounterAnimation {
    pub from: f64,
    pub to: f64,
    pub duration: Duration,
}

impl CounterAnimation {
    pub fn new(from: f64, to: f64) -> Self {
        Self { from, to, duration: DEFAULT_ANIMATION }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn value_at(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() || elapsed >= self.duration {
            return self.to;
        }
        let progress = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.from + (self.to - self.from) * ease_out_cubic(progress)
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }

    /// Retarget mid-flight, starting from whatever is on screen right now.
    pub fn retarget(&self, elapsed: Duration, to: f64) -> Self {
        Self { from: self.value_at(elapsed), to, duration: self.duration }
    }
}

// Enough fraction digits to print any f64 exactly.
const EXACT_DIGITS: usize = 1100;

fn non_finite(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value > 0.0 {
        "Infinity".to_string()
    } else {
        "-Infinity".to_string()
    }
}

/// Adds one unit in the last place of a plain decimal string.
fn increment_decimal(digits: &str) -> String {
    let mut bytes = digits.as_bytes().to_vec();
    let mut carry = true;
    for b in bytes.iter_mut().rev() {
        if !carry {
            break;
        }
        match *b {
            b'.' => continue,
            b'9' => *b = b'0',
            _ => {
                *b += 1;
                carry = false;
            }
        }
    }
    let mut out = String::from_utf8_lossy(&bytes).into_owned();
    if carry {
        out.insert(0, '1');
    }
    out
}

/// Rounds the magnitude to `digits` places. Exact ties go up, everything
/// else to the nearest representable decimal.
fn round_half_up(abs: f64, digits: usize) -> String {
    let exact = format!("{:.*}", EXACT_DIGITS, abs);
    let tail = exact
        .split_once('.')
        .map(|(_, frac)| &frac[digits.min(frac.len())..])
        .unwrap_or("");
    let tie = tail.starts_with('5') && tail[1..].bytes().all(|b| b == b'0');

    if tie {
        let keep = exact.len() - tail.len();
        let truncated = exact[..keep].trim_end_matches('.');
        increment_decimal(truncated)
    } else {
        format!("{:.*}", digits, abs)
    }
}

/// `Number.prototype.toFixed`: decimal point, no grouping.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return non_finite(value);
    }
    let rounded = round_half_up(value.abs(), digits);
    if value < 0.0 {
        format!("-{}", rounded)
    } else {
        rounded
    }
}

fn group_fr(rounded: &str, negative: bool) -> String {
    let (int_part, frac_part) = match rounded.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rounded, None),
    };

    let mut out = String::with_capacity(rounded.len() + int_part.len() / 3 + 1);
    if negative {
        out.push('-');
    }
    for (idx, digit) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(digit);
    }
    if let Some(frac) = frac_part.filter(|f| !f.is_empty()) {
        out.push(',');
        out.push_str(frac);
    }
    out
}

/// Fixed-precision fr-FR display, as the animated counters render.
pub fn format_fr(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return non_finite(value);
    }

    let rounded = round_half_up(value.abs(), precision);
    let negative = value < 0.0 && rounded.bytes().any(|c| c.is_ascii_digit() && c != b'0');
    group_fr(&rounded, negative)
}

/// Bare `toLocaleString('fr-FR')`: up to three fraction digits, trailing
/// zeros dropped.
pub fn format_fr_locale(value: f64) -> String {
    if !value.is_finite() {
        return non_finite(value);
    }

    let rounded = round_half_up(value.abs(), 3);
    let trimmed = if rounded.contains('.') {
        rounded.trim_end_matches('0').trim_end_matches('.')
    } else {
        rounded.as_str()
    };
    group_fr(trimmed, value < 0.0)
}
