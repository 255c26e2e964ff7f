use std::time::Duration;

use crate::coords::{Point3, Position};
use crate::error::CraneError;
use crate::warehouse::Warehouse;

// Moves run as single-axis legs: lift, along x, along z, descend.

pub fn clamp(x: f64, lower: f64, upper: f64) -> f64 {
    x.max(lower).min(upper)
}

pub fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    if edge1 <= edge0 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = clamp((x - edge0) / (edge1 - edge0), 0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

// Saturates at Duration::MAX instead of panicking on unrepresentable spans.
pub fn travel_time(units: f64, speed: f64) -> Duration {
    Duration::try_from_secs_f64(units / speed).unwrap_or(Duration::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leg {
    pub from: Position,
    pub to: Position,
}

impl Leg {
    pub fn length(&self) -> u32 {
        self.from.manhattan(self.to)
    }

    pub fn duration(&self, move_speed: f64) -> Duration {
        travel_time(f64::from(self.length()), move_speed)
    }

    pub fn point_at(&self, t: f64) -> Point3 {
        Point3::from(self.from).lerp(Point3::from(self.to), smoothstep(0.0, 1.0, t))
    }
}

/// Lowest hook height that passes over every column on the x-then-z route.
/// Fails with `OutOfBounds` when that height is above the warehouse ceiling.
pub fn clearance(
    warehouse: &Warehouse,
    from: Position,
    to: Position,
    carrying: bool,
) -> Result<i32, CraneError> {
    let (x0, x1) = (from.x.min(to.x), from.x.max(to.x));
    let (z0, z1) = (from.z.min(to.z), from.z.max(to.z));
    let along_x = (x0..=x1).map(|x| (x, from.z));
    let along_z = (z0..=z1).map(|z| (to.x, z));
    let Some((tallest, x, z)) = along_x
        .chain(along_z)
        .map(|(x, z)| (warehouse.height_at(x, z), x, z))
        .max_by_key(|&(h, _, _)| h)
    else {
        return Ok(0);
    };
    let needed = tallest as i32 + i32::from(carrying);
    let size = warehouse.size();
    if needed >= size.height {
        return Err(CraneError::out_of_bounds(Position::new(x, needed, z), size));
    }
    Ok(needed)
}

pub fn plan_legs(
    warehouse: &Warehouse,
    from: Position,
    to: Position,
    carrying: bool,
) -> Result<Vec<Leg>, CraneError> {
    let travel_y = from
        .y
        .max(to.y)
        .max(clearance(warehouse, from, to, carrying)?);
    let waypoints = [
        from,
        from.with_y(travel_y),
        from.with_y(travel_y).with_x(to.x),
        to.with_y(travel_y),
        to,
    ];
    Ok(waypoints
        .windows(2)
        .map(|w| Leg { from: w[0], to: w[1] })
        .filter(|leg| leg.from != leg.to)
        .collect())
}

// At least one step; a step never exceeds `frame`.
pub fn step_count(duration: Duration, frame: Duration) -> u64 {
    if frame.is_zero() {
        return 1;
    }
    let n = duration.as_nanos().div_ceil(frame.as_nanos());
    u64::try_from(n).unwrap_or(u64::MAX).max(1)
}

pub fn step_length(duration: Duration, steps: u64) -> Duration {
    let nanos = duration.as_nanos() / u128::from(steps.max(1));
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}

/// Hook positions along `leg`, one per frame, each paired with the simulated time it takes.
/// The last point is exactly `leg.to`.
pub fn leg_frames(
    leg: Leg,
    move_speed: f64,
    frame: Duration,
) -> impl Iterator<Item = (Point3, Duration)> {
    let duration = leg.duration(move_speed);
    let n = step_count(duration, frame);
    let dt = step_length(duration, n);
    (1..=n).map(move |k| (leg.point_at(k as f64 / n as f64), dt))
}
