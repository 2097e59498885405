use crate::models::progress_log::ProgressLog;

pub const LOW_CONSISTENCY: &str = "Consistency Needs Improvement";
pub const WEIGHT_PLATEAU: &str = "Weight Plateau Detected";
pub const STRENGTH_MILESTONE: &str = "Strength Milestone Achieved";

const CONSISTENCY_THRESHOLD_PCT: f64 = 60.0;
const PLATEAU_WINDOW: usize = 14;
const PLATEAU_TOLERANCE: f64 = 0.5;
const STRENGTH_MILESTONE_PCT: f64 = 10.0;

/// Average of the three main lifts on one log. Missing lifts count as zero;
/// the divisor is always three.
pub fn lift_average(log: &ProgressLog) -> f64 {
    [log.strength_bench, log.strength_squat, log.strength_deadlift]
        .into_iter()
        .flatten()
        .sum::<f64>()
        / 3.0
}

/// First and last lift averages over logs that record any lift.
fn lift_endpoints(logs_asc: &[ProgressLog]) -> Option<(f64, f64)> {
    let mut lifts = logs_asc.iter().filter(|l| l.has_strength());
    let first = lifts.next()?;
    let last = lifts.last()?;
    Some((lift_average(first), lift_average(last)))
}

/// Growth in lift average from the first lift log to the last, unrounded.
pub fn strength_growth_percent(logs_asc: &[ProgressLog]) -> Option<f64> {
    let (first, last) = lift_endpoints(logs_asc)?;
    if first <= 0.0 {
        return None;
    }
    Some((last - first) / first * 100.0)
}

/// Share of logs with a completed workout, 0..=100. `None` for no logs.
pub fn consistency_percent(logs: &[ProgressLog]) -> Option<f64> {
    if logs.is_empty() {
        return None;
    }
    let completed = logs.iter().filter(|l| l.workout_completed).count();
    Some(completed as f64 / logs.len() as f64 * 100.0)
}

fn weight_plateau(logs_asc: &[ProgressLog]) -> bool {
    let weights: Vec<f64> = logs_asc.iter().filter_map(|l| l.weight).collect();
    if weights.len() < PLATEAU_WINDOW {
        return false;
    }
    let recent = &weights[weights.len() - PLATEAU_WINDOW..];
    let mean = recent.iter().sum::<f64>() / recent.len() as f64;
    recent.iter().all(|w| (w - mean).abs() < PLATEAU_TOLERANCE)
}

fn strength_milestone(logs_asc: &[ProgressLog]) -> bool {
    match lift_endpoints(logs_asc) {
        Some((first, last)) if first > 0.0 && last > 0.0 => {
            (last - first) / first * 100.0 > STRENGTH_MILESTONE_PCT
        }
        _ => false,
    }
}

/// Rule-based labels over a user's full history, oldest log first.
pub fn insights(logs_asc: &[ProgressLog]) -> Vec<String> {
    let mut labels = Vec::new();
    let Some(consistency) = consistency_percent(logs_asc) else {
        return labels;
    };

    if consistency < CONSISTENCY_THRESHOLD_PCT {
        labels.push(LOW_CONSISTENCY.to_string());
    }
    if weight_plateau(logs_asc) {
        labels.push(WEIGHT_PLATEAU.to_string());
    }
    if strength_milestone(logs_asc) {
        labels.push(STRENGTH_MILESTONE.to_string());
    }
    labels
}
