//! Frames and the frame capture capability

use crate::error::VisionError;
use async_trait::async_trait;
use image::RgbImage;

/// One captured image plus its position in the capture sequence.
#[derive(Debug, Clone)]
pub struct Frame {
    sequence: u64,
    image: RgbImage,
}

impl Frame {
    pub fn new(sequence: u64, image: RgbImage) -> Self {
        Self { sequence, image }
    }

    /// Black frame of the given size.
    pub fn blank(sequence: u64, width: u32, height: u32) -> Self {
        Self::new(sequence, RgbImage::new(width, height))
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }
}

/// Source of camera frames.
///
/// `open` is called once before the first frame and `release` on every
/// exit path of the consuming loop, including after errors.
#[async_trait]
pub trait FrameSource: Send {
    async fn open(&mut self) -> Result<(), VisionError>;

    /// Next frame, or `Ok(None)` when capture has ended.
    async fn next_frame(&mut self) -> Result<Option<Frame>, VisionError>;

    async fn release(&mut self);

    fn name(&self) -> &str;
}

/// Receiver of annotated frames for display.
pub trait FrameDisplay: Send + Sync {
    fn show(&self, frame: &Frame);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_frame_dimensions() {
        let frame = Frame::blank(7, 900, 600);
        assert_eq!(frame.sequence(), 7);
        assert_eq!(frame.width(), 900);
        assert_eq!(frame.height(), 600);
        assert!(frame.image().pixels().all(|p| p.0 == [0, 0, 0]));
    }
}
