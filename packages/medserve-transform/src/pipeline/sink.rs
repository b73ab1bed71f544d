//! Record sinks
//!
//! A sink receives the records of a run batch by batch. The engine already
//! guarantees one record per concept, so sinks never deduplicate.

use std::io::Write;

use crate::errors::{Result, TransformError};
use crate::features::records::Record;

/// Batch-accepting consumer of created records
pub trait RecordSink {
    /// Accept a batch of freshly created records, in creation order. Batches
    /// may be empty.
    fn accept_batch(&mut self, records: Vec<Record>) -> Result<()>;

    /// Called once after the last batch
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<S: RecordSink + ?Sized> RecordSink for Box<S> {
    fn accept_batch(&mut self, records: Vec<Record>) -> Result<()> {
        (**self).accept_batch(records)
    }

    fn finish(&mut self) -> Result<()> {
        (**self).finish()
    }
}

/// Keeps every batch in memory
#[derive(Debug, Default)]
pub struct CollectingSink {
    batches: Vec<Vec<Record>>,
    finished: bool,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batches(&self) -> &[Vec<Record>] {
        &self.batches
    }

    /// All records in the order they were handed over
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.batches.iter().flatten()
    }

    pub fn record(&self, id: &str) -> Option<&Record> {
        self.records().find(|r| r.id() == id)
    }

    pub fn len(&self) -> usize {
        self.batches.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn into_records(self) -> Vec<Record> {
        self.batches.into_iter().flatten().collect()
    }
}

impl RecordSink for CollectingSink {
    fn accept_batch(&mut self, records: Vec<Record>) -> Result<()> {
        self.batches.push(records);
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.finished = true;
        Ok(())
    }
}

/// Writes one JSON record per line
#[derive(Debug)]
pub struct NdjsonSink<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> NdjsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RecordSink for NdjsonSink<W> {
    fn accept_batch(&mut self, records: Vec<Record>) -> Result<()> {
        for record in &records {
            serde_json::to_writer(&mut self.writer, record)?;
            self.writer.write_all(b"\n").map_err(|e| {
                TransformError::sink(format!("failed to write record {}", record.id()))
                    .with_source(e)
            })?;
            self.written += 1;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| TransformError::sink("failed to flush record output").with_source(e))
    }
}
