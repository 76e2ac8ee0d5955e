//! Domain types shared by every layer.

pub mod bar;
pub mod decision;
pub mod row;

pub use bar::{is_strictly_ascending, PriceBar};
pub use decision::{Decision, Signal, SignalTone, Verdict};
pub use row::IndicatorRow;
