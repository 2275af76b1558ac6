//! Display formatting shared by the views.

use chrono::{DateTime, Utc};

/// Group digits with commas: `15000000` -> `15,000,000`.
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Shorten `name` to `max` characters followed by `...`.
pub fn truncate(name: &str, max: usize) -> String {
    if name.chars().count() > max {
        let mut short: String = name.chars().take(max).collect();
        short.push_str("...");
        short
    } else {
        name.to_string()
    }
}

/// Release year from a `YYYY`, `YYYY-MM` or `YYYY-MM-DD` date.
pub fn release_year(date: Option<&str>) -> String {
    date.and_then(|d| d.get(..4))
        .filter(|y| y.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or("-")
        .to_string()
}

/// Long form snapshot date, e.g. `18 October 2026`.
pub fn snapshot_date(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(at) => at.format("%-d %B %Y").to_string(),
        None => "Recently".to_string(),
    }
}

/// Ten-cell bar for a 0-100 score.
pub fn bar(score: u8) -> String {
    let filled = (score.min(100) as usize).div_ceil(10);
    format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}
