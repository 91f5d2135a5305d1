//! Encoder collaborator contract.
//!
//! The core never encodes video itself: it hands finished RGBA frames to
//! a [`FrameEncoder`]. Encoder errors are terminal; the driver reports
//! them and never retries a whole export on its own.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::error::{NscError, NscResult};

/// Sink for rendered frames at a fixed `(width, height, fps)`.
///
/// Lifecycle: `begin` once, `write_frame` per frame in order, `finish`
/// exactly once on success. On cancellation or failure the driver drops
/// the encoder without `finish`, which must release its resources.
pub trait FrameEncoder: Send {
    fn begin(&mut self, width: u32, height: u32, fps: u32, output_path: &Path) -> NscResult<()>;

    fn write_frame(&mut self, frame: &RgbaImage) -> NscResult<()>;

    fn finish(&mut self) -> NscResult<()>;
}

/// Counts frames and writes nothing. Test double.
#[derive(Debug, Default)]
pub struct NullEncoder {
    pub frames: usize,
    pub finished: bool,
    /// When set, `write_frame` fails at this frame index.
    pub fail_at: Option<usize>,
}

impl FrameEncoder for NullEncoder {
    fn begin(&mut self, _width: u32, _height: u32, _fps: u32, _output_path: &Path) -> NscResult<()> {
        Ok(())
    }

    fn write_frame(&mut self, _frame: &RgbaImage) -> NscResult<()> {
        if self.fail_at == Some(self.frames) {
            return Err(NscError::EncoderError(format!(
                "synthetic failure at frame {}",
                self.frames
            )));
        }
        self.frames += 1;
        Ok(())
    }

    fn finish(&mut self) -> NscResult<()> {
        self.finished = true;
        Ok(())
    }
}

/// Streams raw RGBA frames into a single file, one frame after another.
///
/// Good enough to pipe into `ffmpeg -f rawvideo -pix_fmt rgba` or to
/// inspect in tests; a real container encoder lives outside the core.
pub struct RawRgbaFileEncoder {
    writer: Option<BufWriter<File>>,
    path: Option<PathBuf>,
    width: u32,
    height: u32,
}

impl RawRgbaFileEncoder {
    pub fn new() -> Self {
        RawRgbaFileEncoder {
            writer: None,
            path: None,
            width: 0,
            height: 0,
        }
    }
}

impl Default for RawRgbaFileEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameEncoder for RawRgbaFileEncoder {
    fn begin(&mut self, width: u32, height: u32, _fps: u32, output_path: &Path) -> NscResult<()> {
        let file = File::create(output_path).map_err(|e| {
            NscError::ResourceUnavailable(format!(
                "cannot create export output {}: {e}",
                output_path.display()
            ))
        })?;
        self.writer = Some(BufWriter::new(file));
        self.path = Some(output_path.to_path_buf());
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn write_frame(&mut self, frame: &RgbaImage) -> NscResult<()> {
        if frame.width() != self.width || frame.height() != self.height {
            return Err(NscError::EncoderError(format!(
                "frame size {}x{} does not match declared {}x{}",
                frame.width(),
                frame.height(),
                self.width,
                self.height
            )));
        }
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| NscError::EncoderError("write_frame before begin".to_string()))?;
        writer.write_all(frame.as_raw())?;
        Ok(())
    }

    fn finish(&mut self) -> NscResult<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn null_encoder_counts_frames() {
        let mut encoder = NullEncoder::default();
        encoder.begin(4, 4, 30, Path::new("ignored")).unwrap();
        let frame = RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 255]));
        encoder.write_frame(&frame).unwrap();
        encoder.write_frame(&frame).unwrap();
        encoder.finish().unwrap();
        assert_eq!(encoder.frames, 2);
        assert!(encoder.finished);
    }

    #[test]
    fn raw_encoder_writes_expected_byte_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frames.rgba");

        let mut encoder = RawRgbaFileEncoder::new();
        encoder.begin(8, 8, 30, &path).unwrap();
        let frame = RgbaImage::from_pixel(8, 8, Rgba([9, 9, 9, 255]));
        encoder.write_frame(&frame).unwrap();
        encoder.write_frame(&frame).unwrap();
        encoder.finish().unwrap();

        let written = std::fs::metadata(&path).unwrap().len();
        assert_eq!(written, 2 * 8 * 8 * 4);
    }

    #[test]
    fn raw_encoder_rejects_mismatched_frames() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frames.rgba");

        let mut encoder = RawRgbaFileEncoder::new();
        encoder.begin(8, 8, 30, &path).unwrap();
        let frame = RgbaImage::from_pixel(4, 4, Rgba([9, 9, 9, 255]));
        assert!(matches!(
            encoder.write_frame(&frame),
            Err(NscError::EncoderError(_))
        ));
    }
}
