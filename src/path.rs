use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::coords::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    MoveTo(Position),
    Idle(Duration),
    Attach,
    Detach,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::MoveTo(p) => write!(f, "MOVE {}", p),
            Command::Idle(d) => write!(f, "IDLE {}", d.as_millis()),
            Command::Attach => f.write_str("ATTACH"),
            Command::Detach => f.write_str("DETACH"),
        }
    }
}

/// Ordered crane commands, built by chaining.
///
/// ```
/// use crane_sim::{CranePath, Position};
///
/// let mut path = CranePath::new();
/// path.move_to(Position::new(0, 1, 0))
///     .attach()
///     .move_to(Position::new(1, 1, 0))
///     .detach();
/// assert_eq!(path.len(), 4);
/// ```
///
/// Nothing is validated here; bounds and stack heights are checked when the path executes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CranePath {
    cmds: Vec<Command>,
}

impl CranePath {
    pub fn new() -> Self {
        Self { cmds: Vec::new() }
    }

    pub fn push(&mut self, cmd: Command) -> &mut Self {
        self.cmds.push(cmd);
        self
    }

    pub fn move_to(&mut self, position: Position) -> &mut Self {
        self.push(Command::MoveTo(position))
    }

    pub fn idle(&mut self, duration: Duration) -> &mut Self {
        self.push(Command::Idle(duration))
    }

    pub fn idle_ms(&mut self, ms: u64) -> &mut Self {
        self.idle(Duration::from_millis(ms))
    }

    pub fn attach(&mut self) -> &mut Self {
        self.push(Command::Attach)
    }

    pub fn detach(&mut self) -> &mut Self {
        self.push(Command::Detach)
    }

    pub fn len(&self) -> usize {
        self.cmds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    pub fn commands(&self) -> &[Command] {
        &self.cmds
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Command> {
        self.cmds.iter()
    }
}

impl FromIterator<Command> for CranePath {
    fn from_iter<I: IntoIterator<Item = Command>>(iter: I) -> Self {
        Self {
            cmds: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a CranePath {
    type Item = &'a Command;
    type IntoIter = std::slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.cmds.iter()
    }
}

impl fmt::Display for CranePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cmd) in self.cmds.iter().enumerate() {
            writeln!(f, "#{} {}", i, cmd)?;
        }
        Ok(())
    }
}
