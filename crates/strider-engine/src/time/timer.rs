use super::offset_clock::SharedClock;

const MAX_FRACTION_DIGITS: usize = 9;

/// Formats seconds as `minutes:seconds.fraction`.
///
/// Seconds are zero-padded to two digits; minutes are not padded or wrapped.
/// The value is rounded to `fraction_digits` before it is split, so a carry
/// rolls into the minutes (`59.999` at two digits is `1:00.00`). Negative or
/// non-finite input reads as zero; more than nine digits are capped at nine.
pub fn format_elapsed(seconds: f64, fraction_digits: usize) -> String {
    let digits = fraction_digits.min(MAX_FRACTION_DIGITS);
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };

    let scale = 10u64.pow(digits as u32);
    let ticks = (seconds * scale as f64).round() as u64;
    let per_minute = 60 * scale;

    let minutes = ticks / per_minute;
    let rem = ticks % per_minute;
    let whole = rem / scale;

    if digits == 0 {
        format!("{minutes}:{whole:02}")
    } else {
        let frac = rem % scale;
        format!("{minutes}:{whole:02}.{frac:0digits$}")
    }
}

/// Read-only timer view over a level clock, polled once per display refresh.
#[derive(Debug, Clone)]
pub struct TimerDisplay {
    clock: SharedClock,
    fraction_digits: usize,
}

impl TimerDisplay {
    pub fn new(clock: SharedClock, fraction_digits: usize) -> Self {
        Self { clock, fraction_digits }
    }

    pub fn seconds(&self) -> f64 {
        self.clock.elapsed_secs()
    }

    pub fn text(&self) -> String {
        format_elapsed(self.seconds(), self.fraction_digits)
    }
}
