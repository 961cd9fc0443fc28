use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::PathBuf;
use std::time::Duration;

use log::info;

use crate::thermal::error::ThermalError;

/// Something that can deliver a batch of raw ADC line tokens. The tokens
/// are uninterpreted here; `series::convert_stream` applies the lenient
/// parse-and-skip policy.
pub trait SampleSource {
    fn read_tokens(&mut self) -> Result<Vec<String>, ThermalError>;
}

/// In-memory source for tests and deterministic playback.
pub struct ManualSamples {
    tokens: Vec<String>,
}

impl ManualSamples {
    pub fn new(tokens: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }
}

impl SampleSource for ManualSamples {
    fn read_tokens(&mut self) -> Result<Vec<String>, ThermalError> {
        Ok(std::mem::take(&mut self.tokens))
    }
}

/// Reads one token per line from a capture file.
pub struct FileSamples {
    path: PathBuf,
}

impl FileSamples {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SampleSource for FileSamples {
    fn read_tokens(&mut self) -> Result<Vec<String>, ThermalError> {
        let reader = BufReader::new(File::open(&self.path)?);
        let tokens = reader.lines().collect::<Result<Vec<_>, _>>()?;
        info!("read {} sample lines from {}", tokens.len(), self.path.display());
        Ok(tokens)
    }
}

/// Polls the sampling firmware over serial: sends the `q` dump command and
/// collects every line until the port times out.
pub struct SerialSamples {
    port: String,
    baud: u32,
}

impl SerialSamples {
    pub fn new(port: impl Into<String>, baud: u32) -> Self {
        Self {
            port: port.into(),
            baud,
        }
    }
}

impl SampleSource for SerialSamples {
    fn read_tokens(&mut self) -> Result<Vec<String>, ThermalError> {
        let mut port = serialport::new(&self.port, self.baud)
            .timeout(Duration::from_secs(2))
            .open()?;
        port.write_all(b"q")?;
        let mut raw = String::new();
        match port.read_to_string(&mut raw) {
            Ok(_) => {}
            // the dump has no terminator; the read ends on port timeout
            Err(err) if err.kind() == std::io::ErrorKind::TimedOut => {}
            Err(err) => return Err(err.into()),
        }
        let tokens: Vec<String> = raw.lines().map(str::to_string).collect();
        info!("collected {} sample lines from {}", tokens.len(), self.port);
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn manual_source_yields_once() {
        let mut source = ManualSamples::new(["123", "start", "456"]);
        assert_eq!(source.read_tokens().unwrap().len(), 3);
        assert!(source.read_tokens().unwrap().is_empty());
    }

    #[test]
    fn file_source_reads_lines() {
        let path = std::env::temp_dir().join(format!(
            "smvtuner-samples-{}.txt",
            std::process::id()
        ));
        let mut file = File::create(&path).unwrap();
        writeln!(file, "start").unwrap();
        writeln!(file, "512").unwrap();
        writeln!(file, "end").unwrap();
        drop(file);

        let mut source = FileSamples::new(&path);
        let tokens = source.read_tokens().unwrap();
        assert_eq!(tokens, vec!["start", "512", "end"]);
        std::fs::remove_file(path).unwrap();
    }
}
