use bitlife::config::SimConfig;
use bitlife::sim::Simulation;
use bitlife::transport::WriteTransport;
use bitlife::transport::send_blocking;

const GENERATIONS: usize = 4;

fn main() -> anyhow::Result<()> {
    let transport = WriteTransport::new(std::io::stdout());
    let config = SimConfig::default().with_dump_rows(true);

    // a closed stdout ends the demo with an error instead of spinning
    let mut sim = Simulation::with_transport(transport, config);
    sim.boot()?;

    for _ in 0..GENERATIONS {
        sim.tick()?;

        let line = format!(
            "generation {}, {} alive\n",
            sim.generation(),
            sim.world().current().population()
        );
        send_blocking(sim.diagnostics_mut(), line.as_bytes(), config.retry)?;
    }

    Ok(())
}
