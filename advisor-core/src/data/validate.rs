//! Validation and cleaning of raw provider rows.
//!
//! Validation runs on the raw rows exactly as delivered. Cleaning then drops
//! empty rows, sorts by date, keeps the last row per date, and fills remaining
//! gaps forward then backward per field.

use chrono::NaiveDate;

use super::provider::{DataError, RawBar};
use crate::domain::PriceBar;

const FIELDS: [&str; 5] = ["Open", "High", "Low", "Close", "Volume"];

/// Thresholds applied to a raw pull.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationRules {
    pub min_rows: usize,
    pub max_missing_pct: f64,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            min_rows: 20,
            max_missing_pct: 50.0,
        }
    }
}

/// Check a raw pull. Failures are `DataUnavailable` with a user-facing message.
pub fn validate(bars: &[RawBar], rules: &ValidationRules) -> Result<(), DataError> {
    if bars.is_empty() {
        return Err(DataError::DataUnavailable("No data available".into()));
    }
    if bars.len() < rules.min_rows {
        return Err(DataError::DataUnavailable(format!(
            "Insufficient data (only {} rows, need at least {})",
            bars.len(),
            rules.min_rows
        )));
    }

    let missing_per_field = missing_per_field(bars);
    let absent: Vec<&str> = FIELDS
        .iter()
        .zip(missing_per_field)
        .filter(|(_, missing)| *missing == bars.len())
        .map(|(name, _)| *name)
        .collect();
    if !absent.is_empty() {
        return Err(DataError::DataUnavailable(format!(
            "Missing required columns: [{}]",
            absent.join(", ")
        )));
    }

    let missing: usize = missing_per_field.iter().sum();
    let pct = missing as f64 / (bars.len() * FIELDS.len()) as f64 * 100.0;
    if pct > rules.max_missing_pct {
        return Err(DataError::DataUnavailable(format!(
            "Too many missing values ({pct:.1}%)"
        )));
    }
    Ok(())
}

fn missing_per_field(bars: &[RawBar]) -> [usize; 5] {
    let mut counts = [0usize; 5];
    for bar in bars {
        let flags = [
            bar.open.is_none(),
            bar.high.is_none(),
            bar.low.is_none(),
            bar.close.is_none(),
            bar.volume.is_none(),
        ];
        for (count, missing) in counts.iter_mut().zip(flags) {
            *count += usize::from(missing);
        }
    }
    counts
}

/// Turn validated raw rows into an ascending, gap-free `PriceBar` series.
///
/// Later rows win over earlier rows with the same date, so a refresh pull
/// appended after the history replaces stale entries.
pub fn clean(mut bars: Vec<RawBar>) -> Result<Vec<PriceBar>, DataError> {
    bars.retain(|b| !b.is_empty());
    // stable: equal dates keep their arrival order
    bars.sort_by_key(|b| b.date);

    let mut deduped: Vec<RawBar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match deduped.last_mut() {
            Some(last) if last.date == bar.date => *last = bar,
            _ => deduped.push(bar),
        }
    }
    if deduped.is_empty() {
        return Err(DataError::DataUnavailable("No data available".into()));
    }

    let open = fill_both_ways(deduped.iter().map(|b| b.open).collect());
    let high = fill_both_ways(deduped.iter().map(|b| b.high).collect());
    let low = fill_both_ways(deduped.iter().map(|b| b.low).collect());
    let close = fill_both_ways(deduped.iter().map(|b| b.close).collect());
    let volume = fill_both_ways(deduped.iter().map(|b| b.volume).collect());

    let bars: Vec<PriceBar> = deduped
        .iter()
        .enumerate()
        .map(|(i, b)| {
            match (open[i], high[i], low[i], close[i], volume[i]) {
                (Some(open), Some(high), Some(low), Some(close), Some(volume)) => Ok(PriceBar {
                    date: b.date,
                    open,
                    high,
                    low,
                    close,
                    volume,
                }),
                _ => Err(DataError::DataUnavailable(format!(
                    "Missing required columns at {}",
                    b.date
                ))),
            }
        })
        .collect::<Result<_, _>>()?;

    let suspect = insane_dates(&bars);
    if !suspect.is_empty() {
        tracing::debug!(count = suspect.len(), first = %suspect[0], "bars with inconsistent OHLC");
    }
    Ok(bars)
}

/// Dates of bars failing the OHLC sanity check.
pub fn insane_dates(bars: &[PriceBar]) -> Vec<NaiveDate> {
    bars.iter().filter(|b| !b.is_sane()).map(|b| b.date).collect()
}

fn fill_both_ways<T: Copy>(mut values: Vec<Option<T>>) -> Vec<Option<T>> {
    let mut last = None;
    for v in values.iter_mut() {
        match v {
            Some(x) => last = Some(*x),
            None => *v = last,
        }
    }
    let mut next = None;
    for v in values.iter_mut().rev() {
        match v {
            Some(x) => next = Some(*x),
            None => *v = next,
        }
    }
    values
}
