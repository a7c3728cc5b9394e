use std::fmt::{self, Write};

use crate::{
    day::day_label,
    icon::{UNKNOWN_ICON, flag_emoji, icon_for},
    model::{ForecastSeries, ResolvedLocation, WidgetState},
};

pub const TITLE: &str = "Get your weather";
pub const PLACEHOLDER: &str = "Get weather for city";
pub const LOADING: &str = "Loading...";
/// Shown in place of a temperature upstream didn't report.
pub const MISSING: &str = "--";

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub show_flag: bool,
}

/// One rendered day. Missing upstream values stay `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct DayCard {
    pub icon: &'static str,
    pub label: String,
    /// Lowest temperature, rounded down.
    pub min: Option<i64>,
    /// Highest temperature, rounded up.
    pub max: Option<i64>,
}

pub fn day_cards(series: &ForecastSeries) -> Vec<DayCard> {
    series
        .days()
        .iter()
        .enumerate()
        .map(|(i, day)| DayCard {
            icon: day.weather_code.map_or(UNKNOWN_ICON, icon_for),
            label: day_label(i, &day.date),
            min: day.temp_min.map(|t| t.floor() as i64),
            max: day.temp_max.map(|t| t.ceil() as i64),
        })
        .collect()
}

/// Draw the whole widget as text.
pub fn render(state: &WidgetState, options: &RenderOptions) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_widget(&mut out, state, options);
    out
}

fn write_widget(out: &mut String, state: &WidgetState, options: &RenderOptions) -> fmt::Result {
    writeln!(out, "{TITLE}")?;
    if state.query.is_empty() {
        writeln!(out, "> ({PLACEHOLDER})")?;
    } else {
        writeln!(out, "> {}", state.query)?;
    }

    if state.loading {
        writeln!(out, "{LOADING}")?;
    }

    if !state.forecast.is_empty() {
        writeln!(out)?;
        writeln!(out, "Weather in {}", place_line(state.location.as_ref(), options))?;
        for card in day_cards(&state.forecast) {
            writeln!(
                out,
                "  {}  {:<5} {}° — {}°",
                card.icon,
                card.label,
                temperature(card.min),
                temperature(card.max)
            )?;
        }
    }

    Ok(())
}

fn temperature(value: Option<i64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |t| t.to_string())
}

fn place_line(location: Option<&ResolvedLocation>, options: &RenderOptions) -> String {
    let Some(location) = location else {
        return String::from("-");
    };

    let country = if options.show_flag {
        flag_emoji(&location.country_code).unwrap_or_else(|| location.country_code.clone())
    } else {
        location.country_code.clone()
    };

    format!("{} - {}", location.display_name, country)
}
