//! Track configuration: window, display mode and glyph constants.

use crate::error::{RmskError, RmskResult};
use crate::scale::Scale;
use crate::types::GenomicPos;
use serde::{Deserialize, Serialize};

/// Track display mode as chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Full,
    Pack,
    Squish,
    Dense,
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Visibility::Full => "full",
            Visibility::Pack => "pack",
            Visibility::Squish => "squish",
            Visibility::Dense => "dense",
        };
        f.write_str(name)
    }
}

/// Pixel and base-pair constants of the joined-repeat glyph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphConstants {
    /// Longest unaligned arm drawn to scale, in pixels
    #[serde(default = "default_max_unaligned_pixel_len")]
    pub max_unaligned_pixel_len: f64,

    /// Space reserved around labels, in pixels
    #[serde(default = "default_label_padding")]
    pub label_padding: i32,

    /// Shorter unaligned extensions are not drawn
    #[serde(default = "default_min_visible_ext_pixels")]
    pub min_visible_ext_pixels: i32,

    /// Fraction of a flanking aligned block an overlapping middle
    /// unaligned segment may cover before it is shortened
    #[serde(default = "default_overlap_shorten_fraction")]
    pub overlap_shorten_fraction: f64,

    #[serde(default = "default_dash_len")]
    pub dash_len: i32,

    #[serde(default = "default_gap_len")]
    pub gap_len: i32,

    /// Minimum row height in detail view
    #[serde(default = "default_min_row_height")]
    pub min_row_height: i32,

    /// Chevron spacing inside aligned blocks
    #[serde(default = "default_chevron_spacing")]
    pub chevron_spacing: i32,
}

impl Default for GlyphConstants {
    fn default() -> Self {
        Self {
            max_unaligned_pixel_len: default_max_unaligned_pixel_len(),
            label_padding: default_label_padding(),
            min_visible_ext_pixels: default_min_visible_ext_pixels(),
            overlap_shorten_fraction: default_overlap_shorten_fraction(),
            dash_len: default_dash_len(),
            gap_len: default_gap_len(),
            min_row_height: default_min_row_height(),
            chevron_spacing: default_chevron_spacing(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackConfig {
    #[serde(default)]
    pub window_start: GenomicPos,

    #[serde(default = "default_window_end")]
    pub window_end: GenomicPos,

    /// Width of the data area in pixels
    #[serde(default = "default_image_width")]
    pub image_width: u32,

    /// Overrides the scale derived from `image_width`
    #[serde(default)]
    pub pixels_per_base: Option<f64>,

    #[serde(default)]
    pub visibility: Visibility,

    #[serde(default = "default_true")]
    pub show_labels: bool,

    #[serde(default = "default_true")]
    pub show_unaligned_arms: bool,

    /// One row per repeat class when not in detail view
    #[serde(default = "default_true")]
    pub use_class_row_layout: bool,

    /// Widest window, in bases, drawn with the detailed glyph
    #[serde(default = "default_detail_view_max_span")]
    pub detail_view_max_span: u64,

    /// More records than this collapse into a single row
    #[serde(default = "default_max_pack_items")]
    pub max_pack_items: usize,

    /// Bases of slack in the overlap test between extents
    #[serde(default)]
    pub overlap_tolerance: i64,

    /// Score range mapped onto the gray ramp (score 10000 = most diverged)
    #[serde(default = "default_gray_min")]
    pub gray_min: i64,

    #[serde(default = "default_gray_max")]
    pub gray_max: i64,

    #[serde(default)]
    pub glyph: GlyphConstants,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            window_start: 0,
            window_end: default_window_end(),
            image_width: default_image_width(),
            pixels_per_base: None,
            visibility: Visibility::default(),
            show_labels: true,
            show_unaligned_arms: true,
            use_class_row_layout: true,
            detail_view_max_span: default_detail_view_max_span(),
            max_pack_items: default_max_pack_items(),
            overlap_tolerance: 0,
            gray_min: default_gray_min(),
            gray_max: default_gray_max(),
            glyph: GlyphConstants::default(),
        }
    }
}

impl TrackConfig {
    pub fn with_window(mut self, start: GenomicPos, end: GenomicPos) -> Self {
        self.window_start = start;
        self.window_end = end;
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_pixels_per_base(mut self, pixels_per_base: f64) -> Self {
        self.pixels_per_base = Some(pixels_per_base);
        self
    }

    pub fn window_span(&self) -> u64 {
        self.window_end.saturating_sub(self.window_start)
    }

    pub fn scale(&self) -> Scale {
        match self.pixels_per_base {
            Some(ppb) => Scale::new(self.window_start, self.window_end, ppb),
            None => Scale::from_width(self.window_start, self.window_end, self.image_width),
        }
    }

    /// Labels are never drawn in squish or dense mode.
    pub fn labels_enabled(&self) -> bool {
        self.show_labels && matches!(self.visibility, Visibility::Full | Visibility::Pack)
    }

    /// Full mode on a window narrow enough for the detailed glyph.
    pub fn is_detail_view(&self) -> bool {
        self.visibility == Visibility::Full && self.window_span() <= self.detail_view_max_span
    }

    pub fn validate(&self) -> RmskResult<()> {
        if self.window_end <= self.window_start {
            return Err(RmskError::invalid_config(format!(
                "window end {} must be greater than start {}",
                self.window_end, self.window_start
            )));
        }
        if self.image_width == 0 {
            return Err(RmskError::invalid_config("image width must be positive"));
        }
        if let Some(ppb) = self.pixels_per_base {
            if !(ppb.is_finite() && ppb > 0.0) {
                return Err(RmskError::invalid_config(format!(
                    "pixels per base must be positive, got {}",
                    ppb
                )));
            }
        }
        if self.overlap_tolerance < 0 {
            return Err(RmskError::invalid_config("overlap tolerance cannot be negative"));
        }
        if self.gray_max <= self.gray_min {
            return Err(RmskError::invalid_config("gray_max must exceed gray_min"));
        }
        if self.max_pack_items == 0 {
            return Err(RmskError::invalid_config("max_pack_items must be at least 1"));
        }

        let g = &self.glyph;
        if g.dash_len < 1 || g.gap_len < 0 {
            return Err(RmskError::invalid_config("dash length must be >= 1 and gap length >= 0"));
        }
        if !(g.max_unaligned_pixel_len > 0.0) {
            return Err(RmskError::invalid_config("max_unaligned_pixel_len must be positive"));
        }
        if !(0.0..=0.5).contains(&g.overlap_shorten_fraction) {
            return Err(RmskError::invalid_config(
                "overlap_shorten_fraction must lie in [0, 0.5]",
            ));
        }
        if g.chevron_spacing < 1 {
            return Err(RmskError::invalid_config("chevron spacing must be at least 1"));
        }

        Ok(())
    }
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_window_end() -> GenomicPos {
    10_000
}

fn default_image_width() -> u32 {
    1200
}

fn default_detail_view_max_span() -> u64 {
    45_000
}

fn default_max_pack_items() -> usize {
    500
}

fn default_gray_min() -> i64 {
    6000
}

fn default_gray_max() -> i64 {
    10000
}

fn default_max_unaligned_pixel_len() -> f64 {
    150.0
}

fn default_label_padding() -> i32 {
    20
}

fn default_min_visible_ext_pixels() -> i32 {
    4
}

fn default_overlap_shorten_fraction() -> f64 {
    0.3
}

fn default_dash_len() -> i32 {
    5
}

fn default_gap_len() -> i32 {
    5
}

fn default_min_row_height() -> i32 {
    24
}

fn default_chevron_spacing() -> i32 {
    5
}
