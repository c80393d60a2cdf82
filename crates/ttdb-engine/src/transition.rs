use std::time::{Duration, Instant};

use ttdb_core::{Database, RecordId};

use crate::parse::coordinate_from_id;

const MIN_FRACTION: f64 = 0.03;
const SLOW_TOUR_PACE: f64 = 1.5;
const MIN_PLAYBACK_MS: u64 = 120;
const MIN_TRAVEL_PX: f64 = 24.0;

#[derive(Debug, Clone, PartialEq)]
pub struct TransitionPlan {
    pub from: RecordId,
    pub to: RecordId,
    pub direction: (f64, f64),
    pub duration: Duration,
    pub travel_px: f64,
    pub from_tour: bool,
}

/// Signed longitude difference wrapped into [-180, 180] degrees.
pub fn delta_degrees(target: f64, current: f64) -> f64 {
    let mut delta = target - current;
    while delta > 180.0 {
        delta -= 360.0;
    }
    while delta < -180.0 {
        delta += 360.0;
    }
    delta
}

/// Haversine great-circle arc between two (lat, lon) pairs, as a fraction
/// of PI. Antipodal points yield 1.0.
pub fn great_circle_fraction(from: (f64, f64), to: (f64, f64)) -> f64 {
    let lat1 = from.0.to_radians();
    let lat2 = to.0.to_radians();
    let d_lat = lat2 - lat1;
    let d_lon = delta_degrees(to.1, from.1).to_radians();
    let sin_lat = (d_lat / 2.0).sin();
    let sin_lon = (d_lon / 2.0).sin();
    let a = (sin_lat * sin_lat + lat1.cos() * lat2.cos() * sin_lon * sin_lon).clamp(0.0, 1.0);
    let arc = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    arc / std::f64::consts::PI
}

fn planar_coords(db: &Database, id: &RecordId) -> Option<(f64, f64)> {
    if let Some(coord) = db.coords.get(id) {
        return Some((coord.lat, coord.lon));
    }
    coordinate_from_id(id.as_str())
}

// Direction, duration and travel distance for the slide between two
// selections. Coordinate-bearing pairs move along the wrapped lon/lat
// delta; everything else falls back to file-order distance.
pub fn plan(
    db: &Database,
    from: &RecordId,
    to: &RecordId,
    from_tour: bool,
    slow_pace: bool,
) -> Option<TransitionPlan> {
    if from == to {
        return None;
    }

    let mut dir_x = 1.0;
    let mut dir_y = 0.0;
    let mut fraction = MIN_FRACTION;

    match (planar_coords(db, from), planar_coords(db, to)) {
        (Some(a), Some(b)) => {
            dir_x = delta_degrees(b.1, a.1);
            dir_y = -(b.0 - a.0);
            fraction = great_circle_fraction(a, b);
        }
        _ => {
            if let (Some(from_idx), Some(to_idx)) = (db.index_of(from), db.index_of(to)) {
                let delta = to_idx as isize - from_idx as isize;
                dir_x = if delta == 0 { 1.0 } else { (delta as f64).signum() };
                dir_y = 0.0;
                let max_delta = db.len().saturating_sub(1).max(1) as f64;
                fraction = (delta.unsigned_abs() as f64 / max_delta).min(1.0);
            }
        }
    }

    let magnitude = dir_x.hypot(dir_y);
    let direction = if magnitude < 1e-4 {
        (1.0, 0.0)
    } else {
        (dir_x / magnitude, dir_y / magnitude)
    };

    let fraction = fraction.clamp(MIN_FRACTION, 1.0);
    let base_duration = (160.0 + fraction.powf(0.55) * 1400.0).round();
    let pace = if from_tour && slow_pace { SLOW_TOUR_PACE } else { 1.0 };
    let duration_ms = (base_duration * pace).round() as u64;
    let travel_px = (72.0 + fraction.powf(0.75) * 300.0).round();

    Some(TransitionPlan {
        from: from.clone(),
        to: to.clone(),
        direction,
        duration: Duration::from_millis(duration_ms),
        travel_px,
        from_tour,
    })
}

fn ease_out_cubic(progress: f64) -> f64 {
    1.0 - (1.0 - progress).powi(3)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionFrame {
    pub incoming: (f64, f64),
    pub outgoing: (f64, f64),
    pub progress: f64,
    pub done: bool,
}

// Playback state. The frame is a pure function of elapsed time, so the host
// can sample it from whatever scheduler it runs.
#[derive(Debug, Clone)]
pub struct TransitionAnimation {
    plan: TransitionPlan,
    started: Instant,
    duration: Duration,
    travel_px: f64,
}

impl TransitionAnimation {
    pub fn new(plan: TransitionPlan, now: Instant) -> Self {
        let duration = plan.duration.max(Duration::from_millis(MIN_PLAYBACK_MS));
        let travel_px = plan.travel_px.max(MIN_TRAVEL_PX);
        Self {
            plan,
            started: now,
            duration,
            travel_px,
        }
    }

    pub fn plan(&self) -> &TransitionPlan {
        &self.plan
    }

    pub fn frame(&self, now: Instant) -> TransitionFrame {
        let elapsed = now.saturating_duration_since(self.started);
        let progress = (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0);
        let ease = ease_out_cubic(progress);
        let (dx, dy) = self.plan.direction;
        let enter = (dx * self.travel_px, dy * self.travel_px);
        TransitionFrame {
            incoming: (enter.0 * (1.0 - ease), enter.1 * (1.0 - ease)),
            outgoing: (-enter.0 * ease, -enter.1 * ease),
            progress,
            done: progress >= 1.0,
        }
    }
}
