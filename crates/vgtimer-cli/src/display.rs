//! Text rendering of timer readings.

use vgtimer_core::{format_remaining, TimerReading};

const STRIKE_LABEL: &str = "Strikes in";

/// One `Label: S.d` entry per value, strike countdowns right after their
/// timer.
pub fn render_lines(readings: &[TimerReading]) -> Vec<String> {
    let mut lines = Vec::with_capacity(readings.len() + 1);
    for reading in readings {
        lines.push(format!(
            "{}: {}",
            reading.kind.label(),
            format_remaining(reading.to_activation_ms)
        ));
        if let Some(strike) = reading.to_strike_ms {
            lines.push(format!("{STRIKE_LABEL}: {}", format_remaining(strike)));
        }
    }
    lines
}

/// All readings on one line, for a status line redrawn in place.
pub fn render_status_line(readings: &[TimerReading]) -> String {
    render_lines(readings).join("  |  ")
}
