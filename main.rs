use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};

use dps310::{Dps310, Smbus, DPS310_ADDR};

/// Periodically reads temperature and pressure from a DPS310.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// I2C bus number (/dev/i2c-N).
    #[arg(long, default_value_t = 1)]
    bus: u8,
    /// Seconds to wait between measurement cycles.
    #[arg(long, default_value_t = 1.0)]
    interval: f64,
    /// Stop after this many cycles.
    #[arg(long)]
    count: Option<u64>,
    /// Print coefficients and intermediate values after every cycle.
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let interval = Duration::try_from_secs_f64(args.interval)
        .with_context(|| format!("invalid interval: {}", args.interval))?;

    let mut bus = Smbus::new(args.bus)
        .with_context(|| format!("failed to open I2C bus {}", args.bus))?;
    let mut dps = Dps310::new(&mut bus)
        .with_context(|| format!("failed to initialise DPS310 at 0x{:02x}", DPS310_ADDR))?;
    info!("DPS310 initialised on bus {}", args.bus);

    let mut cycle = 0u64;
    loop {
        if let Some(count) = args.count {
            if cycle >= count {
                break;
            }
        }
        cycle += 1;

        if let Err(e) = dps.measure_temperature().and_then(|_| dps.measure_pressure()) {
            error!("measurement failed: {}", e);
        } else {
            println!("TEMP={:.2} C", dps.temperature());
            println!("PRES={:.2} Pa", dps.pressure());
        }

        if args.debug {
            println!("{}", dps.diagnostics());
        }

        thread::sleep(interval);
    }

    Ok(())
}
