use super::Record;

/// Writes a record to an output destination with [`Recorder::write`].
pub trait Recorder {
    /// Write a record to the [`Recorder`].
    fn write(&mut self, record: Record);
}

/// A [`Recorder`] that stores records and writes their aggregate on flush.
pub trait AggregateRecorder: Recorder {
    /// Store the record.
    fn store(&mut self, record: Record);

    /// Writes values aggregated from the stored records.
    ///
    /// `step` is the training step the aggregate is attributed to.
    fn flush(&mut self, step: i64);
}
