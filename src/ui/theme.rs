use crate::feeds::{Category, ThreatLevel};
use chrono::{DateTime, NaiveDate};
use ratatui::style::Color;

pub const ACCENT: Color = Color::Cyan;
pub const WARNING: Color = Color::Yellow;
pub const NEUTRAL: Color = Color::Gray;
pub const ORANGE: Color = Color::Rgb(251, 146, 60);
pub const PURPLE: Color = Color::Rgb(192, 132, 252);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryStyle {
    pub bg: Color,
    pub fg: Color,
    pub border: Color,
}

pub fn category_style(category: &Category) -> CategoryStyle {
    match category {
        Category::Breach => CategoryStyle {
            bg: Color::Rgb(69, 10, 10),
            fg: Color::LightRed,
            border: Color::Red,
        },
        Category::Ransomware => CategoryStyle {
            bg: Color::Rgb(67, 20, 7),
            fg: ORANGE,
            border: Color::Rgb(234, 88, 12),
        },
        Category::Policy => CategoryStyle {
            bg: Color::Rgb(23, 37, 84),
            fg: Color::LightBlue,
            border: Color::Blue,
        },
        Category::Exploit => CategoryStyle {
            bg: Color::Rgb(59, 7, 100),
            fg: PURPLE,
            border: Color::Magenta,
        },
        Category::Economics => CategoryStyle {
            bg: Color::Rgb(5, 46, 22),
            fg: Color::LightGreen,
            border: Color::Green,
        },
        Category::General | Category::Unrecognized(_) => CategoryStyle {
            bg: Color::Rgb(31, 41, 55),
            fg: Color::Gray,
            border: Color::DarkGray,
        },
    }
}

pub fn relevance_color(score: f64) -> Color {
    if score > 80.0 {
        ACCENT
    } else if score > 50.0 {
        WARNING
    } else {
        NEUTRAL
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThreatGauge {
    pub label: String,
    pub badge: Color,
    pub bar: Color,
    /// Fraction of the gauge to fill, 0.0..=1.0.
    pub fill: f64,
    pub risk: &'static str,
}

/// Gauge treatment for the current threat level; `None` means nothing has loaded yet.
/// A blank level reads the same as no level.
pub fn threat_gauge(level: Option<&ThreatLevel>) -> ThreatGauge {
    let label = level
        .map(|l| l.as_str().trim())
        .filter(|l| !l.is_empty())
        .unwrap_or("SECURE")
        .to_string();

    let (badge, bar, fill, risk) = match level {
        Some(ThreatLevel::Critical) => (Color::Red, Color::Red, 1.0, "98%"),
        Some(ThreatLevel::High) => (ORANGE, ACCENT, 0.75, "75%"),
        Some(ThreatLevel::Moderate) => (Color::Yellow, ACCENT, 0.5, "45%"),
        _ => (Color::Green, ACCENT, 0.25, "12%"),
    };

    ThreatGauge {
        label,
        badge,
        bar,
        fill,
        risk,
    }
}

pub fn format_relevance(score: f64) -> String {
    if score.is_finite() && score.fract() == 0.0 {
        format!("Match: {}%", score as i64)
    } else {
        format!("Match: {:.1}%", score)
    }
}

/// Render a publication timestamp as `YYYY-MM-DD` when it parses; otherwise show it as given.
pub fn format_published(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.date_naive().format("%Y-%m-%d").to_string();
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return dt.date_naive().format("%Y-%m-%d").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }
    raw.to_string()
}
