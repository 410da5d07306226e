//! RmskView rendering backends.
//!
//! Turns the draw commands produced by `rmsk-core` into SVG documents and
//! PNG images, with a class legend, left-margin labels and a footer.

pub mod svg;
pub mod raster;
pub mod vector_export;

pub use raster::RasterSink;
pub use svg::{SvgBuilder, SvgSink};
pub use vector_export::{ExportConfig, ExportSummary, TrackExporter};

/// Output format chosen from a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
}

impl OutputFormat {
    pub fn from_path<P: AsRef<std::path::Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "svg" => Some(OutputFormat::Svg),
            "png" => Some(OutputFormat::Png),
            _ => None,
        }
    }
}
