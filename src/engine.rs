use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::{CraneConfig, Pacing};
use crate::coords::Position;
use crate::crane::CraneStatus;
use crate::error::{CraneError, ExecutionError};
use crate::motion::{leg_frames, plan_legs, step_count, step_length};
use crate::path::{Command, CranePath};
use crate::state::SharedSimulation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionReport {
	pub commands: usize,
	/// Simulated time the path took.
	pub elapsed: Duration,
}

/// Runs crane paths against the shared simulation, one command at a time.
#[derive(Debug)]
pub struct Engine<'a> {
	shared: &'a SharedSimulation,
	config: &'a CraneConfig,
}

// Releases the execution claim on every exit path, unwinding included.
struct ExecutionClaim<'a>(&'a SharedSimulation);

impl Drop for ExecutionClaim<'_> {
	fn drop(&mut self) {
		self.0.update(|s| s.end_execution());
	}
}

impl<'a> Engine<'a> {
	pub fn new(shared: &'a SharedSimulation, config: &'a CraneConfig) -> Self {
		Self { shared, config }
	}

	// Processes a path:
	// - claim the simulation, refusing if another path holds it
	// - run each command to completion before the next
	// - stop at the first failure; earlier effects stay
	#[instrument(skip_all, fields(commands = path.len()))]
	pub fn run(&self, path: &CranePath) -> Result<ExecutionReport, ExecutionError> {
		let started = self
			.shared
			.update(|s| s.begin_execution().map(|_| s.elapsed))
			.map_err(ExecutionError::rejected)?;
		let _claim = ExecutionClaim(self.shared);
		info!("executing crane path");

		for (i, cmd) in path.iter().enumerate() {
			self.shared.update(|s| s.active_command = Some(i));
			debug!(index = i, command = %cmd, "command start");
			if let Err(e) = self.step(*cmd) {
				warn!(index = i, command = %cmd, error = %e, "command failed");
				return Err(ExecutionError::at(i, *cmd, e));
			}
		}

		let elapsed = self.shared.read(|s| s.elapsed).saturating_sub(started);
		info!(elapsed_ms = elapsed.as_millis() as u64, "crane path finished");
		Ok(ExecutionReport { commands: path.len(), elapsed })
	}

	fn step(&self, cmd: Command) -> Result<(), CraneError> {
		match cmd {
			Command::MoveTo(target) => self.move_to(target),
			Command::Idle(d) => {
				self.shared.update(|s| s.crane.status = CraneStatus::Waiting);
				self.dwell(d);
				self.shared.update(|s| s.crane.status = CraneStatus::Idle);
				Ok(())
			}
			Command::Attach => {
				let dwell = self.shared.update(|s| {
					s.check_attach()?;
					s.crane.status = CraneStatus::Attaching;
					Ok::<_, CraneError>(s.crane.attach_detach_duration())
				})?;
				self.dwell(dwell);
				self.shared.update(|s| {
					s.crane.status = CraneStatus::Idle;
					s.attach()
				})
			}
			Command::Detach => {
				let dwell = self.shared.update(|s| {
					s.check_detach()?;
					s.crane.status = CraneStatus::Detaching;
					Ok::<_, CraneError>(s.crane.attach_detach_duration())
				})?;
				self.dwell(dwell);
				self.shared.update(|s| {
					s.crane.status = CraneStatus::Idle;
					s.detach()
				})
			}
		}
	}

	fn move_to(&self, target: Position) -> Result<(), CraneError> {
		let (legs, speed) = self.shared.update(|s| {
			s.check_move(target)?;
			let legs = plan_legs(&s.warehouse, s.crane.resting, target, s.crane.carrying)?;
			s.crane.begin_move(target);
			Ok::<_, CraneError>((legs, s.crane.move_speed))
		})?;
		let frame = self.config.frame_interval();
		for leg in legs {
			for (p, dt) in leg_frames(leg, speed, frame) {
				self.shared.update(|s| {
					s.crane.set_position(p);
					s.advance(dt);
				});
				self.pace(dt);
			}
		}
		self.shared.update(|s| s.crane.arrive(target));
		Ok(())
	}

	fn dwell(&self, d: Duration) {
		if d.is_zero() {
			return;
		}
		let n = step_count(d, self.config.frame_interval());
		let dt = step_length(d, n);
		for _ in 0..n {
			self.shared.update(|s| s.advance(dt));
			self.pace(dt);
		}
	}

	fn pace(&self, dt: Duration) {
		match self.config.pacing {
			Pacing::RealTime => thread::sleep(dt),
			Pacing::Unthrottled => {}
		}
	}
}
