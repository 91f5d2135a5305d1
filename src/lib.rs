//! NeuroScreenCaster synthesis core.
//!
//! A metadata-first screen recorder: capture produces a raw video (no
//! system pointer) plus an input-telemetry log, and the visible result is
//! synthesized afterwards by a virtual camera driving zoom, pan, and a
//! vector cursor over the raw footage. This crate is that synthesis core:
//!
//! - [`engine`]: click telemetry in, zoom segments out
//! - [`cursor`]: smoothed cursor samples and the click-pulse signal
//! - [`timeline`]: segment ordering, trimming, gap search, visual bounds
//! - [`rendering`]: spring camera track, frame composer, compositing
//! - [`preview`]: immutable snapshots for the live render loop
//! - [`export`]: frame iteration, encoder hand-off, progress, cancel
//! - [`qa`]: smoke checks behind the `nsc-check` binary
//!
//! Capture, input hooks, the UI shell, and real encoders are external
//! collaborators with fixed interfaces; the core never talks to the
//! platform.

pub mod cursor;
pub mod engine;
pub mod error;
pub mod export;
pub mod geometry;
pub mod models;
pub mod preview;
pub mod qa;
pub mod rendering;
pub mod timeline;

pub use error::{NscError, NscResult};
