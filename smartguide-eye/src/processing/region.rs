//! Horizontal thirds of the camera frame

use crate::models::BoundingBox;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of three fixed horizontal regions of the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Region {
    Left,
    Center,
    Right,
}

impl Region {
    /// Announcement order.
    pub const ALL: [Region; 3] = [Region::Left, Region::Center, Region::Right];

    pub fn index(self) -> usize {
        match self {
            Region::Left => 0,
            Region::Center => 1,
            Region::Right => 2,
        }
    }

    /// Region name as spoken in announcements.
    pub fn spoken_name(self) -> &'static str {
        match self {
            Region::Left => "左邊",
            Region::Center => "中間",
            Region::Right => "右邊",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spoken_name())
    }
}

/// Region holding the horizontal centre of `bbox`.
///
/// LEFT is `[0, w/3)`, CENTER is `[w/3, 2w/3)`, RIGHT is the rest, so a
/// centre sitting exactly on a boundary belongs to the region it opens.
/// Compared in integers (`3 * cx < w`) so boundaries never flap.
/// `frame_width` must be non-zero.
pub fn classify(bbox: &BoundingBox, frame_width: u32) -> Region {
    classify_center(bbox.center_x(), frame_width)
}

pub fn classify_center(center_x: i64, frame_width: u32) -> Region {
    let scaled = center_x.saturating_mul(3);
    let width = frame_width as i64;

    if scaled < width {
        Region::Left
    } else if scaled < 2 * width {
        Region::Center
    } else {
        Region::Right
    }
}
