use thiserror::Error;
use tracing::debug;
use tracing::info;
use tracing::trace;

use crate::config::SimConfig;
use crate::framebuffer;
use crate::framebuffer::FrameError;
use crate::framebuffer::RenderFrame;
use crate::grid::Dimensions;
use crate::grid::GridError;
use crate::render;
use crate::seed;
use crate::transport::Transport;
use crate::transport::TransportError;
use crate::transport::send_blocking;
use crate::world::DoubleBuffer;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Where the simulation is in its life.
///
/// ```notrust
/// Init -> Seeded -> (Step -> Export)*
/// ```
/// There is no terminal state, the loop runs until the process is stopped from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    Seeded,
    Running,
}

/// The whole program: two generations, the frame they get drawn to, and a channel to report
/// through.
pub struct Simulation<T> {
    world: DoubleBuffer,
    frame: RenderFrame,
    transport: T,
    config: SimConfig,
    phase: Phase,

    /// Scratch space for row dumps
    row: Vec<u8>,
}

impl<T: Transport> Simulation<T> {
    /// Set up a simulation over `world` and `frame`. Nothing is seeded yet.
    pub fn new(
        world: DoubleBuffer,
        frame: RenderFrame,
        transport: T,
        config: SimConfig,
    ) -> Result<Self, SimError> {
        let grid = world.current();

        if grid.width() > frame.width() || grid.height() > frame.height() {
            return Err(FrameError::GridTooLarge {
                grid_width: grid.width(),
                grid_height: grid.height(),
                width: frame.width(),
                height: frame.height(),
            }
            .into());
        }

        let row = Vec::with_capacity(grid.width());

        Ok(Self {
            world,
            frame,
            transport,
            config,
            phase: Phase::Init,
            row,
        })
    }

    /// Allocate a world of `grid` cells and a frame of `frame` pixels
    pub fn with_dimensions(
        grid: Dimensions,
        frame: Dimensions,
        transport: T,
        config: SimConfig,
    ) -> Result<Self, SimError> {
        let world = DoubleBuffer::new(grid)?;
        let frame = RenderFrame::with_dimensions(frame)?;

        Self::new(world, frame, transport, config)
    }

    /// A simulation with the board's dimensions
    pub fn with_transport(transport: T, config: SimConfig) -> Self {
        Self {
            world: DoubleBuffer::default(),
            frame: RenderFrame::default(),
            transport,
            config,
            phase: Phase::Init,
            row: Vec::new(),
        }
    }

    /// Seed the initial pattern, reporting progress through the transport.
    ///
    /// Calling this more than once does nothing past the first time.
    pub fn boot(&mut self) -> Result<(), SimError> {
        if self.phase != Phase::Init {
            return Ok(());
        }

        self.status("Starting up\n")?;

        self.status("Programming initial state\n")?;
        seed::seed(self.world.current_mut());
        self.status("Done\n")?;

        self.phase = Phase::Seeded;
        debug!(population = self.world.current().population(), "Seeded");

        if self.config.dump_rows {
            self.dump()?;
        }

        self.status("Entering loop\n")?;

        Ok(())
    }

    /// Run one iteration of the loop: compute the next generation, then draw it.
    ///
    /// Boots first if that hasn't happened yet.
    pub fn tick(&mut self) -> Result<(), SimError> {
        if self.phase == Phase::Init {
            self.boot()?;
        }

        self.world.advance();
        framebuffer::export(self.world.current(), &mut self.frame)?;
        self.phase = Phase::Running;

        trace!(generation = self.world.generation(), "Tick");

        if self.config.dump_rows {
            self.dump()?;
        }

        Ok(())
    }

    /// Loop forever. This only returns if something fails.
    pub fn run(&mut self) -> Result<std::convert::Infallible, SimError> {
        info!("Running until stopped");

        loop {
            self.tick()?;
        }
    }

    /// Send the current generation as text
    pub fn dump(&mut self) -> Result<(), SimError> {
        render::send_rows(
            &mut self.transport,
            self.config.retry,
            &mut self.row,
            self.world.current(),
        )?;

        Ok(())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.world.generation()
    }

    pub fn world(&self) -> &DoubleBuffer {
        &self.world
    }

    pub fn frame(&self) -> &RenderFrame {
        &self.frame
    }

    /// The transport status lines and dumps go to
    pub fn diagnostics(&self) -> &T {
        &self.transport
    }

    pub fn diagnostics_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    fn status(&mut self, line: &str) -> Result<(), TransportError> {
        debug!(status = line.trim_end());
        send_blocking(&mut self.transport, line.as_bytes(), self.config.retry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::BufferTransport;
    use crate::transport::RetryPolicy;
    use crate::transport::WriteTransport;

    #[test]
    fn test_boot() {
        let mut sim = Simulation::with_transport(BufferTransport::new(), SimConfig::default());
        assert_eq!(sim.phase(), Phase::Init);

        sim.boot().unwrap();

        assert_eq!(sim.phase(), Phase::Seeded);
        assert_eq!(
            sim.diagnostics().text(),
            "Starting up\nProgramming initial state\nDone\nEntering loop\n"
        );
        assert_eq!(sim.world().current().population(), 7);

        // a second boot is ignored
        sim.boot().unwrap();
        assert_eq!(sim.world().current().population(), 7);
    }

    #[test]
    fn test_tick_exports_current() -> anyhow::Result<()> {
        let mut sim = Simulation::with_transport(BufferTransport::new(), SimConfig::default());

        sim.tick()?;
        sim.tick()?;

        assert_eq!(sim.phase(), Phase::Running);
        assert_eq!(sim.generation(), 2);

        let grid = sim.world().current();
        for y in 0..grid.height() {
            assert_eq!(sim.frame().row(y).unwrap()[0], grid.row(y).unwrap()[0]);
        }

        Ok(())
    }

    #[test]
    fn test_bounded_retry_surfaces() {
        let config = SimConfig::default().with_retry(RetryPolicy::bounded(2));
        let mut sim = Simulation::with_transport(BufferTransport::new().busy_for(5), config);

        assert!(matches!(
            sim.boot(),
            Err(SimError::Transport(TransportError::RetriesExhausted {
                attempts: 2,
                ..
            }))
        ));
        assert_eq!(sim.phase(), Phase::Init);
    }

    #[test]
    fn test_broken_transport_stops_dumps() {
        struct Broken;

        impl std::io::Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::ErrorKind::BrokenPipe.into())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let config = SimConfig::default().with_dump_rows(true);
        let mut sim = Simulation::with_transport(WriteTransport::new(Broken), config);

        assert!(matches!(
            sim.tick(),
            Err(SimError::Transport(TransportError::Io(_)))
        ));
    }

    #[test]
    fn test_dump_through_diagnostics() -> anyhow::Result<()> {
        let mut sim = Simulation::with_transport(BufferTransport::new(), SimConfig::default());
        sim.boot()?;
        sim.diagnostics_mut().take();

        sim.dump()?;

        assert_eq!(
            sim.diagnostics().text(),
            render::grid_text(sim.world().current())
        );

        Ok(())
    }

    #[test]
    fn test_invalid_dimensions() {
        let res = Simulation::with_dimensions(
            Dimensions::new(10, 8),
            Dimensions::new(32, 32),
            BufferTransport::new(),
            SimConfig::default(),
        );

        assert!(matches!(res, Err(SimError::Grid(_))));
    }

    #[test]
    fn test_grid_must_fit_frame() {
        let res = Simulation::with_dimensions(
            Dimensions::new(64, 8),
            Dimensions::new(32, 32),
            BufferTransport::new(),
            SimConfig::default(),
        );

        assert!(matches!(res, Err(SimError::Frame(FrameError::GridTooLarge { .. }))));
    }
}
