
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::hud::{format_column_panel, format_hud};
use crate::snapshot::Snapshot;
use crate::state::SharedSimulation;

/// Consumes snapshots on the render thread. Must never touch the simulation itself.
pub trait Renderer: Send + 'static {
    fn render(&mut self, frame: &Snapshot);

    fn finish(&mut self) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _frame: &Snapshot) {}
}

/// Writes the HUD line through `tracing` every `every` frames.
#[derive(Debug, Clone)]
pub struct LogRenderer {
    every: u64,
    frames: u64,
    last: Option<Snapshot>,
}

impl LogRenderer {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            frames: 0,
            last: None,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Default for LogRenderer {
    fn default() -> Self {
        Self::new(60)
    }
}

impl Renderer for LogRenderer {
    fn render(&mut self, frame: &Snapshot) {
        if self.frames % self.every == 0 {
            info!(target: "crane_sim::hud", "{}", format_hud(frame));
        }
        self.frames += 1;
        self.last = Some(frame.clone());
    }

    fn finish(&mut self) {
        if let Some(last) = &self.last {
            for line in format_column_panel(last) {
                info!(target: "crane_sim::hud", "{}", line);
            }
        }
    }
}

/// A running render thread. Dropping it stops and joins the thread.
#[derive(Debug)]
pub struct RenderLoop {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<u64>>,
}

impl RenderLoop {
    pub fn spawn<R: Renderer>(
        shared: SharedSimulation,
        mut renderer: R,
        interval: Duration,
    ) -> std::io::Result<Self> {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let handle = thread::Builder::new()
            .name("crane-render".to_string())
            .spawn(move || {
                debug!(?interval, "render loop started");
                let mut frames = 0u64;
                loop {
                    // stop is checked before each read so no frame is taken after shutdown
                    match stop_rx.try_recv() {
                        Err(mpsc::TryRecvError::Empty) => {}
                        _ => break,
                    }
                    let frame = shared.snapshot();
                    renderer.render(&frame);
                    frames += 1;
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => continue,
                        _ => break,
                    }
                }
                renderer.finish();
                debug!(frames, "render loop stopped");
                frames
            })?;
        Ok(Self {
            stop: Some(stop_tx),
            handle: Some(handle),
        })
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Signals the thread to stop and waits for it. Returns the number of frames drawn,
    /// or `None` if the renderer panicked.
    pub fn stop(&mut self) -> Option<u64> {
        if let Some(tx) = self.stop.take() {
            // the receiver is gone if the thread already exited
            let _ = tx.send(());
        }
        let handle = self.handle.take()?;
        match handle.join() {
            Ok(frames) => Some(frames),
            Err(_) => {
                warn!("render thread panicked");
                None
            }
        }
    }
}

impl Drop for RenderLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CraneConfig;
    use crate::coords::{Position, Size};
    use crate::state::Simulation;
    use std::sync::{Arc, Mutex};

    struct Counting(Arc<Mutex<Vec<Snapshot>>>);

    impl Renderer for Counting {
        fn render(&mut self, frame: &Snapshot) {
            self.0.lock().unwrap().push(frame.clone());
        }
    }

    struct Panicking;

    impl Renderer for Panicking {
        fn render(&mut self, _frame: &Snapshot) {
            panic!("draw failed");
        }
    }

    fn shared() -> SharedSimulation {
        SharedSimulation::new(Simulation::new(Size::new(2, 2, 2), &CraneConfig::default()))
    }

    #[test]
    fn loop_renders_until_stopped() {
        let frames = Arc::new(Mutex::new(Vec::new()));
        let state = shared();
        let mut rl =
            RenderLoop::spawn(state.clone(), Counting(frames.clone()), Duration::from_millis(1))
                .unwrap();
        state.update(|s| s.crane.arrive(Position::new(1, 1, 1)));
        thread::sleep(Duration::from_millis(30));
        let drawn = rl.stop().unwrap();
        assert!(!rl.is_running());
        let seen = frames.lock().unwrap();
        assert_eq!(seen.len() as u64, drawn);
        assert!(drawn >= 1);
        let count_after_stop = seen.len();
        drop(seen);
        thread::sleep(Duration::from_millis(10));
        assert_eq!(frames.lock().unwrap().len(), count_after_stop);
    }

    #[test]
    fn panicking_renderer_is_contained() {
        let mut rl = RenderLoop::spawn(shared(), Panicking, Duration::from_millis(1)).unwrap();
        assert_eq!(rl.stop(), None);
    }

    #[test]
    fn log_renderer_counts_frames() {
        let mut r = LogRenderer::new(2);
        let snap = shared().snapshot();
        r.render(&snap);
        r.render(&snap);
        r.render(&snap);
        r.finish();
        assert_eq!(r.frames(), 3);
    }
}
