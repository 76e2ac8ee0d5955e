//! Gap filling for indicator series.
//!
//! Forward-fill from the nearest prior defined value, then backward-fill any
//! leading gap from the nearest following one, then fall back to 0.

use super::IndicatorValue;
use serde::{Deserialize, Serialize};

/// How a resolved value came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Produced by the indicator formula.
    Computed,
    /// A documented default (neutral oscillator, zero MACD) or a forward/backward fill.
    Filled,
    /// Nothing to fill from; set to 0.
    Zeroed,
}

/// Resolve every position of a series to a number, recording provenance.
pub fn resolve_series(series: &[IndicatorValue]) -> (Vec<f64>, Vec<Provenance>) {
    let n = series.len();
    let mut out: Vec<Option<f64>> = series.iter().map(|v| v.value()).collect();
    let mut provenance: Vec<Provenance> = series
        .iter()
        .map(|v| match v {
            IndicatorValue::Computed(_) => Provenance::Computed,
            _ => Provenance::Filled,
        })
        .collect();

    let mut last = None;
    for slot in out.iter_mut() {
        match slot {
            Some(v) => last = Some(*v),
            None => *slot = last,
        }
    }

    let mut next = None;
    for slot in out.iter_mut().rev() {
        match slot {
            Some(v) => next = Some(*v),
            None => *slot = next,
        }
    }

    let mut values = Vec::with_capacity(n);
    for (slot, prov) in out.into_iter().zip(provenance.iter_mut()) {
        match slot {
            Some(v) => values.push(v),
            None => {
                *prov = Provenance::Zeroed;
                values.push(0.0);
            }
        }
    }
    (values, provenance)
}
