//! Frame displays

use crate::camera::{Frame, FrameDisplay};
use crate::error::VisionError;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Writes every shown frame to `<dir>/frame_<sequence>.png`.
pub struct PngSequenceDisplay {
    dir: PathBuf,
}

impl PngSequenceDisplay {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, VisionError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn path_for(&self, sequence: u64) -> PathBuf {
        self.dir.join(format!("frame_{:06}.png", sequence))
    }
}

impl FrameDisplay for PngSequenceDisplay {
    fn show(&self, frame: &Frame) {
        let path = self.path_for(frame.sequence());
        match frame.image().save(&path) {
            Ok(()) => debug!("Wrote {}", path.display()),
            Err(e) => warn!("Failed to write {}: {}", path.display(), e),
        }
    }
}
