use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coords::Position;
use crate::path::{Command, CranePath};

pub const PROGRAM_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ProgramError {
	#[error("Unsupported program version {0}")]
	UnsupportedVersion(u32),
	#[error("Schema error: {0}")]
	Schema(#[from] serde_json::Error),
}

/// A crane path written as JSON, optionally with the warehouse layout it starts from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathProgram {
	pub version: u32,
	/// Initial stack heights as `fill[x][z]`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fill: Option<Vec<Vec<u32>>>,
	pub commands: Vec<Step>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
	MoveTo { x: i32, y: i32, z: i32 },
	Idle { ms: u64 },
	Attach,
	Detach,
}

impl From<Step> for Command {
	fn from(s: Step) -> Self {
		match s {
			Step::MoveTo { x, y, z } => Command::MoveTo(Position::new(x, y, z)),
			Step::Idle { ms } => Command::Idle(Duration::from_millis(ms)),
			Step::Attach => Command::Attach,
			Step::Detach => Command::Detach,
		}
	}
}

// Programs count idle time in whole milliseconds; finer durations are truncated.
impl From<&Command> for Step {
	fn from(c: &Command) -> Self {
		match *c {
			Command::MoveTo(p) => Step::MoveTo { x: p.x, y: p.y, z: p.z },
			Command::Idle(d) => Step::Idle {
				ms: u64::try_from(d.as_millis()).unwrap_or(u64::MAX),
			},
			Command::Attach => Step::Attach,
			Command::Detach => Step::Detach,
		}
	}
}

impl PathProgram {
	pub fn from_json(s: &str) -> Result<Self, ProgramError> {
		Ok(serde_json::from_str(s)?)
	}

	pub fn from_path(path: &CranePath) -> Self {
		Self {
			version: PROGRAM_VERSION,
			fill: None,
			commands: path.iter().map(Step::from).collect(),
		}
	}
}

pub fn compile_program(p: &PathProgram) -> Result<CranePath, ProgramError> {
	if p.version != PROGRAM_VERSION {
		return Err(ProgramError::UnsupportedVersion(p.version));
	}
	Ok(p.commands.iter().copied().map(Command::from).collect())
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn parse_and_compile_path() {
		let program_json = json!({
			"version": 1,
			"fill": [[1, 1, 3, 3], [3, 3, 2, 1]],
			"commands": [
				{ "op": "move_to", "x": 0, "y": 1, "z": 0 },
				{ "op": "attach" },
				{ "op": "move_to", "x": 3, "y": 2, "z": 3 },
				{ "op": "detach" },
				{ "op": "idle", "ms": 2000 }
			]
		});
		let prog: PathProgram = serde_json::from_value(program_json).unwrap();
		assert_eq!(prog.fill.as_ref().map(|f| f.len()), Some(2));
		let path = compile_program(&prog).unwrap();
		assert_eq!(path.len(), 5);
		assert_eq!(path.commands()[0], Command::MoveTo(Position::new(0, 1, 0)));
		assert_eq!(path.commands()[4], Command::Idle(Duration::from_secs(2)));
	}

	#[test]
	fn fill_is_optional() {
		let prog = PathProgram::from_json(r#"{ "version": 1, "commands": [{ "op": "detach" }] }"#)
			.unwrap();
		assert!(prog.fill.is_none());
		assert_eq!(compile_program(&prog).unwrap().commands(), &[Command::Detach]);
	}

	#[test]
	fn unknown_version_is_rejected() {
		let prog = PathProgram { version: 2, fill: None, commands: vec![] };
		assert!(matches!(
			compile_program(&prog),
			Err(ProgramError::UnsupportedVersion(2))
		));
	}

	#[test]
	fn unknown_op_is_a_schema_error() {
		let err = PathProgram::from_json(r#"{ "version": 1, "commands": [{ "op": "jump" }] }"#)
			.unwrap_err();
		assert!(matches!(err, ProgramError::Schema(_)));
	}

	#[test]
	fn path_converts_back_to_program() {
		let mut path = CranePath::new();
		path.move_to(Position::new(1, 2, 3)).idle_ms(250).attach();
		let prog = PathProgram::from_path(&path);
		let json = serde_json::to_value(&prog).unwrap();
		assert_eq!(json["commands"][0]["op"], "move_to");
		assert_eq!(json["commands"][1]["ms"], 250);
		assert!(json.get("fill").is_none());
		assert_eq!(compile_program(&prog).unwrap(), path);
	}

	#[test]
	fn idle_is_stored_in_whole_milliseconds() {
		assert_eq!(
			Step::from(&Command::Idle(Duration::from_micros(1_500))),
			Step::Idle { ms: 1 }
		);
		assert_eq!(
			Step::from(&Command::Idle(Duration::MAX)),
			Step::Idle { ms: u64::MAX }
		);
	}
}
