use crate::error::Result;
use crate::statistics::Trajectory;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Destination for a finished magnetization series.
pub trait TrajectorySink {
    fn write_trajectory(&mut self, trajectory: &Trajectory) -> Result<()>;
}

/// Writes one `step,magnetization` line per step, no header.
pub struct CsvSink<W: Write> {
    writer: W,
}

impl<W: Write> CsvSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TrajectorySink for CsvSink<W> {
    fn write_trajectory(&mut self, trajectory: &Trajectory) -> Result<()> {
        for (step, m) in trajectory.iter() {
            writeln!(self.writer, "{step},{m}")?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

pub fn write_csv_file(path: impl AsRef<Path>, trajectory: &Trajectory) -> Result<()> {
    let file = File::create(path)?;
    CsvSink::new(BufWriter::new(file)).write_trajectory(trajectory)
}
