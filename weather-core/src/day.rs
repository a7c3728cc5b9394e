use anyhow::{Context, Result};
use chrono::NaiveDate;

pub const TODAY_LABEL: &str = "Today";

/// Short weekday name ("Mon", "Tue", ...) for an ISO calendar date.
///
/// The date is taken as a plain calendar day, so the label never shifts with
/// the local UTC offset.
pub fn weekday_label(date: &str) -> Result<String> {
    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .with_context(|| format!("Invalid calendar date '{date}'"))?;

    Ok(day.format("%a").to_string())
}

/// Label for the card at `index`; the first card is always "Today".
pub fn day_label(index: usize, date: &str) -> String {
    if index == 0 {
        return TODAY_LABEL.to_string();
    }

    weekday_label(date).unwrap_or_else(|err| {
        tracing::debug!("{err:#}; showing raw date");
        date.to_string()
    })
}
