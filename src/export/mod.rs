//! Export pipeline.
//!
//! Frames are composed on a worker thread at the output cadence and
//! streamed to the encoder collaborator through a bounded channel so
//! composition and encoding overlap. Progress lands in a shared status
//! record; cancellation is a single atomic flag polled between frames.

mod driver;
mod encoder;
mod status;


pub use driver::{ExportDriver, ExportHandle, ExportRequest, FrameSource, SolidColorSource};
pub use encoder::{FrameEncoder, NullEncoder, RawRgbaFileEncoder};
pub use status::{ExportStatus, SharedExportStatus};
