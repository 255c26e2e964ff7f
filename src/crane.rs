use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::coords::{Point3, Position};
use crate::motion::travel_time;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CraneStatus {
	Idle,
	Moving,
	Attaching,
	Detaching,
	Waiting,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crane {
	/// Hook position, continuous while a move is in flight.
	pub position: Point3,
	/// Last grid cell the hook came to rest on.
	pub resting: Position,
	pub target: Option<Position>,
	pub status: CraneStatus,
	pub carrying: bool,
	// cells per second
	pub move_speed: f64,
	// attach or detach operations per second
	pub attach_detach_speed: f64,
}

impl Crane {
	pub fn new(home: Position, move_speed: f64, attach_detach_speed: f64) -> Self {
		Self {
			position: home.into(),
			resting: home,
			target: None,
			status: CraneStatus::Idle,
			carrying: false,
			move_speed,
			attach_detach_speed,
		}
	}

	pub fn begin_move(&mut self, target: Position) {
		self.target = Some(target);
		self.status = CraneStatus::Moving;
	}

	pub fn set_position(&mut self, p: Point3) {
		self.position = p;
	}

	pub fn attach_detach_duration(&self) -> Duration {
		travel_time(1.0, self.attach_detach_speed)
	}

	/// Snaps the hook onto `p` and clears any pending target.
	pub fn arrive(&mut self, p: Position) {
		self.position = p.into();
		self.resting = p;
		self.target = None;
		self.status = CraneStatus::Idle;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn crane_init() {
		let c = Crane::new(Position::default(), 2.0, 1.0);
		assert_eq!(c.resting, Position::new(0, 0, 0));
		assert_eq!(c.position, Point3::new(0.0, 0.0, 0.0));
		assert_eq!(c.status, CraneStatus::Idle);
		assert!(c.target.is_none());
		assert!(!c.carrying);
	}

	#[test]
	fn attach_detach_duration_follows_speed() {
		let c = Crane::new(Position::default(), 2.0, 4.0);
		assert_eq!(c.attach_detach_duration(), Duration::from_millis(250));
		let stalled = Crane::new(Position::default(), 2.0, 1e-300);
		assert_eq!(stalled.attach_detach_duration(), Duration::MAX);
	}

	#[test]
	fn move_then_arrive() {
		let mut c = Crane::new(Position::default(), 2.0, 1.0);
		let t = Position::new(1, 2, 0);
		c.begin_move(t);
		assert_eq!(c.status, CraneStatus::Moving);
		c.set_position(Point3::new(0.5, 1.0, 0.0));
		assert_eq!(c.resting, Position::default());
		c.arrive(t);
		assert_eq!(c.resting, t);
		assert_eq!(c.position, Point3::from(t));
		assert!(c.target.is_none());
		assert_eq!(c.status, CraneStatus::Idle);
	}
}
