use std::fmt;

use thiserror::Error;

use crate::coords::{Position, Size};
use crate::path::Command;

/// Why an operation was refused in the crane's current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateConflict {
    AlreadyCarrying,
    NotCarrying,
    FillAfterManipulation,
    ExecutionInProgress,
}

impl fmt::Display for StateConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            StateConflict::AlreadyCarrying => "crane is already carrying a container",
            StateConflict::NotCarrying => "crane is not carrying a container",
            StateConflict::FillAfterManipulation => {
                "warehouse cannot be filled after containers were moved"
            }
            StateConflict::ExecutionInProgress => "another crane path is executing",
        };
        f.write_str(msg)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CraneError {
    #[error("position {position} is outside the warehouse ({size})")]
    OutOfBounds { position: Position, size: Size },
    #[error("invalid state: {0}")]
    InvalidState(StateConflict),
    #[error("column ({x}, {z}) has no container to attach")]
    EmptyColumn { x: i32, z: i32 },
    #[error("column ({x}, {z}) is already full at height {height}")]
    Overflow { x: i32, z: i32, height: u32 },
    #[error("column ({x}, {z}) is already empty")]
    Underflow { x: i32, z: i32 },
    #[error("hook at y={actual} but contact height at ({x}, {z}) is y={expected}")]
    HeightMismatch {
        x: i32,
        z: i32,
        expected: i32,
        actual: i32,
    },
}

impl CraneError {
    pub fn out_of_bounds(position: Position, size: Size) -> Self {
        CraneError::OutOfBounds { position, size }
    }
}

/// A crane path that stopped before finishing.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionError {
    /// Index of the command that failed, `None` when the path was rejected before it started.
    pub index: Option<usize>,
    pub command: Option<Command>,
    pub source: CraneError,
}

impl ExecutionError {
    pub fn at(index: usize, command: Command, source: CraneError) -> Self {
        Self {
            index: Some(index),
            command: Some(command),
            source,
        }
    }

    pub fn rejected(source: CraneError) -> Self {
        Self {
            index: None,
            command: None,
            source,
        }
    }
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.index, &self.command) {
            (Some(i), Some(cmd)) => write!(f, "command #{} ({}) failed: {}", i, cmd, self.source),
            (Some(i), None) => write!(f, "command #{} failed: {}", i, self.source),
            _ => write!(f, "crane path rejected: {}", self.source),
        }
    }
}

impl std::error::Error for ExecutionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a positive finite number, got {value}")]
    InvalidSpeed { name: &'static str, value: f64 },
    #[error("frame interval must be at least 1 ms")]
    InvalidFrameInterval,
    #[error("warehouse size {0} must be positive in every dimension")]
    InvalidSize(Size),
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
