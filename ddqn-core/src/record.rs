//! Types and traits for recording training metrics.
//!
//! * [`Record`] - key-value pairs of [`RecordValue`]s
//! * [`Recorder`] - writes a record to some destination
//! * [`AggregateRecorder`] - stores records and writes their aggregate on flush
//! * [`RecordStorage`] - aggregation of stored records (min, max, mean, median of scalars)
//! * [`BufferedRecorder`] - keeps records in memory, used to inspect training curves
//! * [`NullRecorder`] - discards everything
//!
//! ```rust
//! use ddqn_core::record::{Record, RecordValue};
//!
//! let mut record = Record::empty();
//! record.insert("frame", RecordValue::Scalar(1000.0));
//! record.insert("loss", RecordValue::Scalar(0.25));
//! assert_eq!(record.get_scalar("loss").unwrap(), 0.25);
//! ```
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;
mod storage;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::{AggregateRecorder, Recorder};
pub use storage::RecordStorage;
