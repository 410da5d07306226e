//! RmskView Core Library
//!
//! Layout engine and glyph geometry for joined RepeatMasker annotation
//! tracks: record types, repeat class table, screen scale, visual extents,
//! row assignment, glyph rendering into abstract draw primitives, and the
//! text loader for bigRmsk-style records.

pub mod error;
pub mod types;
pub mod class;
pub mod scale;
pub mod font;
pub mod config;
pub mod draw;
pub mod extent;
pub mod layout;
pub mod glyph;
pub mod track;
pub mod io;

// Re-export commonly used types and functions
pub use error::{RmskError, RmskResult};
pub use types::{AnnotationRecord, BlockKind, GenomicPos, RecordId, Strand};
pub use class::{ClassColorTable, Color, RepeatClass};
pub use scale::{gray_level, shade_of_gray, Scale};
pub use font::{FixedWidthFont, TextMeasure};
pub use config::{GlyphConstants, TrackConfig, Visibility};
pub use draw::{ClipSink, DrawCommand, MapItem, PrimitiveSink, TextAlign};
pub use extent::{visual_extent, Extent, GlyphContext};
pub use layout::{CoarseStyle, Layout, LayoutEngine, LayoutPolicy, OverlapGraph, Placement};
pub use glyph::{GlyphOutcome, GlyphPainter};
pub use track::{LeftLabel, TrackDrawing, TrackPainter};
pub use io::{AnnotationSource, BigRmskTextSource, NameFilter};

/// Version information for the RmskView core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
