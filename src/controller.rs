use tracing::info;

use crate::config::CraneConfig;
use crate::coords::Size;
use crate::engine::{Engine, ExecutionReport};
use crate::error::{ConfigError, CraneError, ExecutionError};
use crate::path::CranePath;
use crate::program::PathProgram;
use crate::render::{RenderLoop, Renderer};
use crate::snapshot::Snapshot;
use crate::state::{SharedSimulation, Simulation};

// Dropping the controller stops and joins the render thread, unwinding included.
#[derive(Debug)]
pub struct CraneController {
    config: CraneConfig,
    shared: SharedSimulation,
    render: RenderLoop,
}

#[derive(Debug, thiserror::Error)]
pub enum StartError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to spawn render thread: {0}")]
    Spawn(#[from] std::io::Error),
}

impl CraneController {
    pub fn start<R: Renderer>(
        size: Size,
        config: CraneConfig,
        renderer: R,
    ) -> Result<Self, StartError> {
        if size.is_empty() {
            return Err(ConfigError::InvalidSize(size).into());
        }
        config.validate()?;
        let shared = SharedSimulation::new(Simulation::new(size, &config));
        let render = RenderLoop::spawn(shared.clone(), renderer, config.frame_interval())?;
        info!(%size, "crane controller started");
        Ok(Self {
            config,
            shared,
            render,
        })
    }

    pub fn size(&self) -> Size {
        self.shared.read(|s| s.size())
    }

    pub fn config(&self) -> &CraneConfig {
        &self.config
    }

    // rows[x][z]; refused once any attach or detach has happened
    pub fn fill_warehouse(&self, rows: &[Vec<u32>]) -> Result<(), CraneError> {
        self.shared.update(|s| s.fill(rows))
    }

    pub fn height_at(&self, x: i32, z: i32) -> u32 {
        self.shared.read(|s| s.warehouse.height_at(x, z))
    }

    pub fn execute(&self, path: &CranePath) -> Result<ExecutionReport, ExecutionError> {
        Engine::new(&self.shared, &self.config).run(path)
    }

    pub fn run_program(&self, program: &PathProgram) -> Result<ExecutionReport, ProgramRunError> {
        let path = crate::program::compile_program(program)?;
        if let Some(rows) = &program.fill {
            self.fill_warehouse(rows)?;
        }
        Ok(self.execute(&path)?)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.shared.snapshot()
    }

    pub fn is_rendering(&self) -> bool {
        self.render.is_running()
    }

    pub fn shutdown(mut self) {
        self.render.stop();
        info!("crane controller stopped");
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProgramRunError {
    #[error(transparent)]
    Compile(#[from] crate::program::ProgramError),
    #[error("fill failed: {0}")]
    Fill(#[from] CraneError),
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Position;
    use crate::render::NullRenderer;

    fn controller(size: Size) -> CraneController {
        CraneController::start(size, CraneConfig::unthrottled(), NullRenderer).unwrap()
    }

    #[test]
    fn start_validates_inputs() {
        assert!(matches!(
            CraneController::start(Size::new(0, 3, 3), CraneConfig::default(), NullRenderer),
            Err(StartError::Config(ConfigError::InvalidSize(_)))
        ));
        let bad = CraneConfig { move_speed: 0.0, ..CraneConfig::default() };
        assert!(matches!(
            CraneController::start(Size::new(2, 2, 2), bad, NullRenderer),
            Err(StartError::Config(ConfigError::InvalidSpeed { .. }))
        ));
    }

    #[test]
    fn unrepresentable_speeds_are_refused_at_start() {
        let slow = CraneConfig { move_speed: 1e-300, ..CraneConfig::unthrottled() };
        assert!(matches!(
            CraneController::start(Size::new(2, 2, 2), slow, NullRenderer),
            Err(StartError::Config(ConfigError::InvalidSpeed { name: "move_speed", .. }))
        ));
        let slow = CraneConfig { attach_detach_speed: 1e-300, ..CraneConfig::unthrottled() };
        assert!(matches!(
            CraneController::start(Size::new(2, 2, 2), slow, NullRenderer),
            Err(StartError::Config(ConfigError::InvalidSpeed { name: "attach_detach_speed", .. }))
        ));
    }

    #[test]
    fn start_and_stop_without_commands() {
        let c = controller(Size::new(4, 3, 4));
        assert!(c.is_rendering());
        c.shutdown();
    }

    #[test]
    fn empty_warehouse_attach_scenario() {
        let c = controller(Size::new(4, 3, 4));
        c.fill_warehouse(&[vec![0; 4], vec![0; 4], vec![0; 4], vec![0; 4]]).unwrap();
        let mut path = CranePath::new();
        path.move_to(Position::new(0, 0, 0)).attach();
        let err = c.execute(&path).unwrap_err();
        assert_eq!(err.index, Some(1));
        assert_eq!(err.source, CraneError::EmptyColumn { x: 0, z: 0 });
    }

    #[test]
    fn fill_after_attach_is_refused() {
        let c = controller(Size::new(2, 2, 2));
        c.fill_warehouse(&[vec![1]]).unwrap();
        let mut path = CranePath::new();
        path.move_to(Position::new(0, 1, 0)).attach();
        c.execute(&path).unwrap();
        assert!(matches!(
            c.fill_warehouse(&[vec![2]]),
            Err(CraneError::InvalidState(_))
        ));
        assert_eq!(c.height_at(0, 0), 0);
    }
}
