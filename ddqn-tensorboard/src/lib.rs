//! TensorBoard recorder for the Double DQN trainer.
use ddqn_core::record::{AggregateRecorder, Record, RecordStorage, RecordValue, Recorder};
use log::warn;
use std::path::Path;
use tensorboard_rs::summary_writer::SummaryWriter;

/// Write records to TFRecord.
pub struct TensorboardRecorder {
    writer: SummaryWriter,
    step_key: String,
    storage: RecordStorage,
}

impl TensorboardRecorder {
    /// Construct a [`TensorboardRecorder`].
    ///
    /// TFRecord will be stored in `logdir`.
    pub fn new<P: AsRef<Path>>(logdir: P) -> Self {
        Self {
            writer: SummaryWriter::new(logdir),
            step_key: "frame".to_string(),
            storage: RecordStorage::new(),
        }
    }

    fn write_with_step(&mut self, record: &Record, step: usize) {
        for (k, v) in record.iter() {
            if *k != self.step_key {
                match v {
                    RecordValue::Scalar(v) => self.writer.add_scalar(k, *v, step),
                    RecordValue::String(_) => {} // discard value
                };
            }
        }
    }
}

impl Recorder for TensorboardRecorder {
    /// Write a given [Record] into a TFRecord.
    ///
    /// The step is taken from the scalar under the key `"frame"`. A record
    /// without it is discarded. This method handles [RecordValue::Scalar]
    /// in the [Record]. Strings are ignored.
    fn write(&mut self, record: Record) {
        let step = match record.get(&self.step_key) {
            Some(RecordValue::Scalar(v)) => *v as usize,
            _ => {
                warn!("Record without {:?} is discarded", self.step_key);
                return;
            }
        };
        self.write_with_step(&record, step);
    }
}

impl AggregateRecorder for TensorboardRecorder {
    fn store(&mut self, record: Record) {
        self.storage.store(record);
    }

    /// Writes the aggregate of the stored records with the given step.
    fn flush(&mut self, step: i64) {
        let record = self.storage.aggregate();
        if !record.is_empty() {
            self.write_with_step(&record, step.max(0) as usize);
            self.writer.flush();
        }
    }
}
