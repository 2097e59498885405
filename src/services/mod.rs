pub mod coerce;
pub mod day;
pub mod goal;
pub mod insight;
pub mod progress;
pub mod streak;

/// Rounds to one decimal place.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
