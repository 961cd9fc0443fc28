use std::collections::VecDeque;
use std::io::{BufRead, BufReader};
use std::time::Duration;

use log::debug;

use crate::tuning::error::TuneError;
use crate::tuning::session::SerialConfig;

/// One live operating point from the engine: RPM on the x axis, load
/// percent on the y axis. Drives quadrant highlighting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TelemetryReading {
    pub rpm: f64,
    pub load: f64,
}

/// Something that can yield operating points on demand. `Ok(None)` means
/// the feed is exhausted for now.
pub trait TelemetrySource {
    fn next_reading(&mut self) -> Result<Option<TelemetryReading>, TuneError>;
}

/// In-memory source for tests and deterministic playback.
pub struct ManualTelemetry {
    queue: VecDeque<TelemetryReading>,
}

impl ManualTelemetry {
    pub fn new(readings: impl IntoIterator<Item = TelemetryReading>) -> Self {
        Self {
            queue: readings.into_iter().collect(),
        }
    }
}

impl TelemetrySource for ManualTelemetry {
    fn next_reading(&mut self) -> Result<Option<TelemetryReading>, TuneError> {
        Ok(self.queue.pop_front())
    }
}

/// Serial feed of `rpm,load` lines. Malformed lines are skipped, matching
/// the lenient stream policy of the sample reader; a read timeout ends the
/// feed rather than erroring.
pub struct SerialTelemetry {
    reader: BufReader<Box<dyn serialport::SerialPort>>,
}

impl SerialTelemetry {
    pub fn open(config: &SerialConfig) -> Result<Self, TuneError> {
        let path = config.port.as_deref().ok_or_else(|| {
            serialport::Error::new(serialport::ErrorKind::NoDevice, "no serial port selected")
        })?;
        let port = serialport::new(path, config.baud)
            .timeout(Duration::from_secs(2))
            .open()?;
        Ok(Self {
            reader: BufReader::new(port),
        })
    }
}

/// Decodes one telemetry line. Shared with the serial source so the format
/// is testable without a device on the other end.
pub fn decode_line(line: &str) -> Option<TelemetryReading> {
    let (rpm, load) = line.trim().split_once(',')?;
    Some(TelemetryReading {
        rpm: rpm.trim().parse().ok()?,
        load: load.trim().parse().ok()?,
    })
}

impl TelemetrySource for SerialTelemetry {
    fn next_reading(&mut self) -> Result<Option<TelemetryReading>, TuneError> {
        loop {
            let mut line = String::new();
            match self.reader.read_line(&mut line) {
                Ok(0) => return Ok(None),
                Ok(_) => match decode_line(&line) {
                    Some(reading) => return Ok(Some(reading)),
                    None => debug!("skipping malformed telemetry line {line:?}"),
                },
                Err(err) if err.kind() == std::io::ErrorKind::TimedOut => return Ok(None),
                Err(err) => return Err(err.into()),
            }
        }
    }
}
