use std::io;
use std::io::Write;
use std::thread;
use std::time;

use anyhow::Context;
use crossterm::cursor;
use crossterm::event;
use crossterm::execute;
use crossterm::style;
use crossterm::terminal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bitlife::config::SimConfig;
use bitlife::events::Event;
use bitlife::io::convert_event;
use bitlife::panel::Panel;
use bitlife::sim::Simulation;
use bitlife::transport::BufferTransport;

const FRAMERATE: u32 = 10;
const FRAMETIME: time::Duration =
    time::Duration::from_millis(((1f64 / FRAMERATE as f64) * 1_000f64) as u64);

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    // Diagnostics are collected in memory, the terminal belongs to the panel while running
    let mut sim = Simulation::with_transport(BufferTransport::new(), SimConfig::default());
    sim.boot().context("Failed to boot the simulation")?;

    let mut stdout = io::stdout();
    stdout.write_all(&sim.diagnostics_mut().take())?;

    let mut panel = Panel::new(sim.frame().dimensions());

    terminal::enable_raw_mode()?;
    let res = run(&mut sim, &mut panel);
    terminal::disable_raw_mode()?;

    // the latest dump, if any
    stdout.write_all(sim.diagnostics().as_bytes())?;

    info!(generation = sim.generation(), "Stopped");

    res
}

fn run(sim: &mut Simulation<BufferTransport>, panel: &mut Panel) -> anyhow::Result<()> {
    let mut stdout = io::stdout();
    let mut paused = false;

    loop {
        let t = time::Instant::now();

        // Poll event for as long as FRAMETIME
        let event = if event::poll(FRAMETIME)? {
            convert_event(event::read()?)
        } else {
            None
        };

        match event {
            None => {}
            Some(Event::Exit) => break,
            Some(Event::TogglePause) => paused = !paused,
            Some(Event::Step) if paused => sim.tick()?,
            Some(Event::Step) => {}
            Some(Event::DumpRows) => {
                // only the latest dump is kept, so the buffer stays one grid large
                sim.diagnostics_mut().take();
                sim.dump()?;
            }
        }

        if !paused {
            sim.tick()?;
        }

        let s = panel.render(sim.frame());

        execute!(
            stdout,
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0),
        )?;

        for line in s.lines() {
            execute!(stdout, style::Print(line), cursor::MoveToNextLine(1))?;
        }

        let status = format!(
            "generation {}{}",
            sim.generation(),
            if paused { " (paused)" } else { "" }
        );
        execute!(stdout, style::Print(status), cursor::MoveToNextLine(1))?;

        let time_left = FRAMETIME.saturating_sub(t.elapsed());
        thread::sleep(time_left);
    }

    Ok(())
}
