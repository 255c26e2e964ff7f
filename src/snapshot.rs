use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::coords::{Point3, Position, Size};
use crate::crane::CraneStatus;
use crate::state::Simulation;

/// A copy of crane and warehouse state taken under one lock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub size: Size,
    pub position: Point3,
    pub resting: Position,
    pub target: Option<Position>,
    pub status: CraneStatus,
    pub carrying: bool,
    /// Column heights, x-major (`heights[x * depth + z]`).
    pub heights: Vec<u32>,
    pub elapsed: Duration,
    pub active_command: Option<usize>,
}

impl Snapshot {
    pub fn capture(sim: &Simulation) -> Self {
        Self {
            size: sim.size(),
            position: sim.crane.position,
            resting: sim.crane.resting,
            target: sim.crane.target,
            status: sim.crane.status,
            carrying: sim.crane.carrying,
            heights: sim.warehouse.heights().to_vec(),
            elapsed: sim.elapsed,
            active_command: sim.active_command,
        }
    }

    pub fn height_at(&self, x: i32, z: i32) -> u32 {
        if !self.size.contains_column(x, z) {
            return 0;
        }
        self.heights[(x * self.size.depth + z) as usize]
    }

    pub fn total_containers(&self) -> u32 {
        self.heights.iter().sum::<u32>() + u32::from(self.carrying)
    }
}
