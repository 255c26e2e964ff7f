pub mod config;
pub mod controller;
pub mod coords;
pub mod crane;
pub mod engine;
pub mod error;
pub mod hud;
pub mod motion;
pub mod path;
pub mod program;
pub mod render;
pub mod snapshot;
pub mod state;
pub mod warehouse;

// Re-exports for convenience in tests and integration users.
pub use config::{CraneConfig, Pacing};
pub use controller::{CraneController, ProgramRunError, StartError};
pub use coords::{Point3, Position, Size};
pub use crane::{Crane, CraneStatus};
pub use engine::{Engine, ExecutionReport};
pub use error::{ConfigError, CraneError, ExecutionError, StateConflict};
pub use hud::{format_column_panel, format_hud};
pub use path::{Command, CranePath};
pub use program::{PathProgram, ProgramError, Step, compile_program};
pub use render::{LogRenderer, NullRenderer, RenderLoop, Renderer};
pub use snapshot::Snapshot;
pub use state::{SharedSimulation, Simulation};
pub use warehouse::{Warehouse, random_layout};
