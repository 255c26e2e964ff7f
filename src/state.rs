use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::CraneConfig;
use crate::coords::{Position, Size};
use crate::crane::{Crane, CraneStatus};
use crate::error::{CraneError, StateConflict};
use crate::snapshot::Snapshot;
use crate::warehouse::Warehouse;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Simulation {
    pub crane: Crane,
    pub warehouse: Warehouse,
    pub elapsed: Duration,
    pub active_command: Option<usize>,
    executing: bool,
}

impl Simulation {
    pub fn new(size: Size, config: &CraneConfig) -> Self {
        Self {
            crane: Crane::new(
                Position::default(),
                config.move_speed,
                config.attach_detach_speed,
            ),
            warehouse: Warehouse::new(size),
            elapsed: Duration::ZERO,
            active_command: None,
            executing: false,
        }
    }

    pub fn size(&self) -> Size {
        self.warehouse.size()
    }

    pub fn is_executing(&self) -> bool {
        self.executing
    }

    pub fn begin_execution(&mut self) -> Result<(), CraneError> {
        if self.executing {
            return Err(CraneError::InvalidState(StateConflict::ExecutionInProgress));
        }
        self.executing = true;
        Ok(())
    }

    pub fn end_execution(&mut self) {
        self.executing = false;
        self.active_command = None;
        self.crane.status = CraneStatus::Idle;
    }

    pub fn fill(&mut self, rows: &[Vec<u32>]) -> Result<(), CraneError> {
        if self.executing {
            return Err(CraneError::InvalidState(StateConflict::ExecutionInProgress));
        }
        self.warehouse.fill(rows)
    }

    pub fn check_move(&self, target: Position) -> Result<(), CraneError> {
        if self.size().contains(target) {
            Ok(())
        } else {
            Err(CraneError::out_of_bounds(target, self.size()))
        }
    }

    // hook on top of the stack: y == h
    pub fn check_attach(&self) -> Result<(), CraneError> {
        if self.crane.carrying {
            return Err(CraneError::InvalidState(StateConflict::AlreadyCarrying));
        }
        let Position { x, y, z } = self.crane.resting;
        let h = self.warehouse.height_at(x, z);
        if h == 0 {
            return Err(CraneError::EmptyColumn { x, z });
        }
        let expected = h as i32;
        if y != expected {
            return Err(CraneError::HeightMismatch { x, z, expected, actual: y });
        }
        Ok(())
    }

    // carried container directly on the stack: y == h + 1
    pub fn check_detach(&self) -> Result<(), CraneError> {
        if !self.crane.carrying {
            return Err(CraneError::InvalidState(StateConflict::NotCarrying));
        }
        let Position { x, y, z } = self.crane.resting;
        let h = self.warehouse.height_at(x, z);
        if h >= self.warehouse.max_height() {
            return Err(CraneError::Overflow { x, z, height: h });
        }
        let expected = h as i32 + 1;
        if y != expected {
            return Err(CraneError::HeightMismatch { x, z, expected, actual: y });
        }
        Ok(())
    }

    pub fn attach(&mut self) -> Result<(), CraneError> {
        self.check_attach()?;
        let Position { x, z, .. } = self.crane.resting;
        self.warehouse.decrement(x, z)?;
        self.crane.carrying = true;
        Ok(())
    }

    pub fn detach(&mut self) -> Result<(), CraneError> {
        self.check_detach()?;
        let Position { x, z, .. } = self.crane.resting;
        self.warehouse.increment(x, z)?;
        self.crane.carrying = false;
        Ok(())
    }

    pub fn advance(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    pub fn total_containers(&self) -> u32 {
        self.warehouse.total() + u32::from(self.crane.carrying)
    }
}

/// One lock around the whole simulation, so each read is a single instant.
#[derive(Debug, Clone)]
pub struct SharedSimulation {
    inner: Arc<Mutex<Simulation>>,
}

impl SharedSimulation {
    pub fn new(sim: Simulation) -> Self {
        Self {
            inner: Arc::new(Mutex::new(sim)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Simulation> {
        // Every update leaves the state whole, so a panicking holder cannot tear it.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn read<R>(&self, f: impl FnOnce(&Simulation) -> R) -> R {
        f(&self.lock())
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut Simulation) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn snapshot(&self) -> Snapshot {
        self.read(Snapshot::capture)
    }
}
