//! Box and label overlays for displayed frames

use crate::camera::Frame;
use crate::config::VisionConfig;
use crate::error::VisionError;
use crate::models::{BoundingBox, Detection};
use ab_glyph::FontVec;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use std::path::Path;
use tracing::{debug, info, warn};

pub const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

pub const TEXT_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

const LABEL_PADDING: u32 = 2;

// CJK faces first so zh-TW labels render.
const SYSTEM_FONTS: [&str; 7] = [
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/System/Library/Fonts/PingFang.ttc",
    "C:\\Windows\\Fonts\\msjh.ttc",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Draws detection boxes and their labels onto copies of frames.
///
/// Without a font the label plate is still drawn, only the text is skipped.
pub struct Annotator {
    font: Option<FontVec>,
    font_scale: f32,
    thickness: u32,
}

impl Default for Annotator {
    fn default() -> Self {
        Self {
            font: None,
            font_scale: 16.0,
            thickness: 2,
        }
    }
}

impl Annotator {
    pub fn with_font_path(path: &Path) -> Result<Self, VisionError> {
        let data = std::fs::read(path)?;
        let font = FontVec::try_from_vec(data)
            .map_err(|_| VisionError::Font(format!("Failed to parse font file: {}", path.display())))?;
        Ok(Self {
            font: Some(font),
            ..Self::default()
        })
    }

    /// First loadable font from the usual system locations.
    pub fn with_system_font() -> Self {
        for path in SYSTEM_FONTS {
            if let Ok(annotator) = Self::with_font_path(Path::new(path)) {
                info!("Loaded label font: {}", path);
                return annotator;
            }
        }
        debug!("No system font found, label text will be skipped");
        Self::default()
    }

    /// The configured label font, falling back to a system font.
    pub fn from_config(config: &VisionConfig) -> Self {
        if let Some(path) = &config.label_font {
            match Self::with_font_path(path) {
                Ok(annotator) => return annotator,
                Err(e) => warn!("Could not load label font {}: {}", path.display(), e),
            }
        }
        Self::with_system_font()
    }

    pub fn with_font_scale(mut self, scale: f32) -> Self {
        self.font_scale = scale;
        self
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Copy of `frame` with every detection boxed and labelled.
    ///
    /// The source frame is left untouched so detection results always
    /// describe the unannotated image.
    pub fn annotate(&self, frame: &Frame, detections: &[Detection]) -> Frame {
        let mut image = frame.image().clone();
        for detection in detections {
            let Some(rect) = clip_to_frame(&detection.bbox, image.width(), image.height()) else {
                continue;
            };
            self.draw_box(&mut image, rect);
            self.draw_label(&mut image, &detection.label, rect);
        }
        Frame::new(frame.sequence(), image)
    }

    fn draw_box(&self, image: &mut RgbImage, rect: Rect) {
        for t in 0..self.thickness {
            if rect.width() <= 2 * t || rect.height() <= 2 * t {
                break;
            }
            let inset = Rect::at(rect.left() + t as i32, rect.top() + t as i32)
                .of_size(rect.width() - 2 * t, rect.height() - 2 * t);
            draw_hollow_rect_mut(image, inset, BOX_COLOR);
        }
    }

    // Plate sits above the box, or inside its top edge when there is no room.
    fn draw_label(&self, image: &mut RgbImage, label: &str, rect: Rect) {
        let (text_width, text_height) = match &self.font {
            Some(font) => text_size(self.font_scale, font, label),
            None => (
                (label.chars().count() as f32 * self.font_scale * 0.6).ceil() as u32,
                self.font_scale.ceil() as u32,
            ),
        };
        let plate_height = text_height + 2 * LABEL_PADDING;
        let left = rect.left();
        let top = if rect.top() >= plate_height as i32 {
            rect.top() - plate_height as i32
        } else {
            rect.top()
        };

        let width = (text_width + 2 * LABEL_PADDING).min(image.width() - left as u32);
        let height = plate_height.min(image.height() - top as u32);
        if width == 0 || height == 0 {
            return;
        }
        draw_filled_rect_mut(image, Rect::at(left, top).of_size(width, height), BOX_COLOR);

        if let Some(font) = &self.font {
            draw_text_mut(
                image,
                TEXT_COLOR,
                left + LABEL_PADDING as i32,
                top + LABEL_PADDING as i32,
                self.font_scale,
                font,
                label,
            );
        }
    }
}

/// The part of `bbox` inside a `width` x `height` frame, if any.
fn clip_to_frame(bbox: &BoundingBox, width: u32, height: u32) -> Option<Rect> {
    if width == 0 || height == 0 {
        return None;
    }
    let x1 = i64::from(bbox.x1()).max(0);
    let y1 = i64::from(bbox.y1()).max(0);
    let x2 = i64::from(bbox.x2()).min(i64::from(width) - 1);
    let y2 = i64::from(bbox.y2()).min(i64::from(height) - 1);
    if x1 > x2 || y1 > y2 {
        return None;
    }
    Some(Rect::at(x1 as i32, y1 as i32).of_size((x2 - x1 + 1) as u32, (y2 - y1 + 1) as u32))
}
