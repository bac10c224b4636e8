//! Weekly statistics over matched feed items.

pub mod aggregator;
pub mod week;

pub use aggregator::*;
pub use week::{WeekFields, WeekKey};
