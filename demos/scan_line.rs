//! Sweeps the frame pixel by pixel, inverting each one, the way a scanline test pattern checks
//! that every pixel of a panel is wired up.

use std::io;
use std::thread;
use std::time::Duration;

use crossterm::cursor;
use crossterm::execute;
use crossterm::style;
use crossterm::terminal;

use bitlife::RenderFrame;
use bitlife::panel::Panel;
use bitlife::transport::RetryPolicy;
use bitlife::transport::WriteTransport;
use bitlife::transport::send_blocking;

const SWEEPS: usize = 2;
const ROW_DELAY: Duration = Duration::from_millis(30);

fn main() -> anyhow::Result<()> {
    let mut stdout = io::stdout();
    let mut transport = WriteTransport::new(io::stderr());

    let mut frame = RenderFrame::default();
    let mut panel = Panel::new(frame.dimensions());

    // export never clears, so a fresh frame has to start blank
    frame.clear();
    send_blocking(&mut transport, b"Start\n", RetryPolicy::Unbounded)?;

    for _ in 0..SWEEPS {
        for y in 0..frame.height() {
            for x in 0..frame.width() {
                let on = frame.get(x, y)?;
                frame.set(x, y, !on)?;
            }

            execute!(
                stdout,
                terminal::Clear(terminal::ClearType::All),
                cursor::MoveTo(0, 0),
            )?;

            for line in panel.render(&frame).lines() {
                execute!(stdout, style::Print(line), cursor::MoveToNextLine(1))?;
            }

            thread::sleep(ROW_DELAY);
        }
    }

    Ok(())
}
