use chrono::{NaiveDateTime, Timelike};

pub const DEFAULT_MINUTE_STEP: u32 = 5;

/// Hour and minute from `"HH:MM"`. Unreadable parts fall back to zero.
pub fn parse_time(value: &str) -> (u32, u32) {
    let mut parts = value.split(':').map(|p| p.trim().parse::<u32>().ok());
    let hour = parts.next().flatten().unwrap_or(0);
    let minute = parts.next().flatten().unwrap_or(0);
    (hour, minute)
}

pub fn format_time(hour: u32, minute: u32) -> String {
    format!("{:02}:{:02}", hour, minute)
}

pub fn hour_options(min_hour: u32, max_hour: u32) -> Vec<u32> {
    (min_hour..=max_hour.min(23)).collect()
}

/// Minutes offered by the picker; a zero step uses the default.
pub fn minute_options(step: u32) -> Vec<u32> {
    let step = if step == 0 { DEFAULT_MINUTE_STEP } else { step };
    (0..60).step_by(step as usize).collect()
}

/// The offered minute closest to `target`; ties keep the earlier option.
pub fn nearest_minute(options: &[u32], target: u32) -> Option<u32> {
    options
        .iter()
        .copied()
        .min_by_key(|m| m.abs_diff(target))
}

/// Initial picker value: the current time with minutes rounded to the step.
pub fn rounded_time(now: NaiveDateTime) -> String {
    let step = DEFAULT_MINUTE_STEP;
    let rounded = ((now.minute() + step / 2) / step) * step;
    format_time(now.hour(), rounded.min(60 - step))
}
