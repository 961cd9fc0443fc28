mod thermal;
mod tuning;

use anyhow::{Context, Result};
use log::info;

use thermal::{AnchorPoint, FileSamples, SampleSource, SerialSamples};
use tuning::{TelemetrySource, TuningSession};

// Bench-measured anchors for the coolant thermistor: kOhms at Celsius.
const COLD_ANCHOR: AnchorPoint = AnchorPoint {
    resistance: 2.46,
    temperature: 20.0,
};
const HOT_ANCHOR: AnchorPoint = AnchorPoint {
    resistance: 0.318,
    temperature: 80.0,
};

const DEFAULT_SAMPLE_PORT: &str = "/dev/ttyACM0";

fn main() -> Result<()> {
    env_logger::init();

    let mut session = TuningSession::open(".").context("failed to open tuning session")?;
    info!(
        "session open: VE {}x{}, SA {}x{}",
        session.ve().row_count(),
        session.ve().col_count(),
        session.sa().row_count(),
        session.sa().col_count()
    );

    // Optional live highlight pass: drain the telemetry feed and report
    // which VE cells each operating point lands on.
    if let Ok(port) = std::env::var("SMVTUNER_TELEMETRY_PORT") {
        session.serial_mut().port = Some(port);
        let mut feed = tuning::SerialTelemetry::open(session.serial())
            .context("failed to open telemetry port")?;
        while let Some(reading) = feed.next_reading()? {
            let quadrant = session.ve().locate_quadrant(reading.rpm, reading.load);
            info!(
                "operating point ({}, {}) -> quadrant {:?}",
                reading.rpm,
                reading.load,
                quadrant.cells()
            );
        }
    }

    run_temp_plot(&session)?;

    let save = session.has_unsaved_changes();
    session.close(save).context("failed to close tuning session")?;
    Ok(())
}

/// Thermistor calibration flow: fit the curve, collect a sample dump from a
/// capture file (first CLI argument) or the sampling firmware over serial,
/// convert, report, and plot.
fn run_temp_plot(session: &TuningSession) -> Result<()> {
    let curve = thermal::calibrate(COLD_ANCHOR, HOT_ANCHOR)
        .context("thermistor calibration failed")?;

    let tokens = match std::env::args().nth(1) {
        Some(path) => FileSamples::new(&path)
            .read_tokens()
            .with_context(|| format!("failed to read samples from {path}"))?,
        None => {
            let port = session
                .serial()
                .port
                .clone()
                .unwrap_or_else(|| DEFAULT_SAMPLE_PORT.to_string());
            SerialSamples::new(&port, session.serial().baud)
                .read_tokens()
                .with_context(|| format!("failed to collect samples from {port}"))?
        }
    };

    let readings = thermal::convert_stream(&curve, &tokens);
    let mean = thermal::average(&readings).context("no convertible samples in the dump")?;
    println!("Average: {mean:.2} F over {} samples", readings.len());

    let png = thermal::render_series_png(&readings, thermal::PlotStyle::default())?;
    std::fs::write("temp_plot.png", png).context("failed to write temp_plot.png")?;
    info!("wrote temp_plot.png");
    Ok(())
}
