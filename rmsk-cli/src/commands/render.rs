//! Render command implementation - export a repeat track to SVG/PNG

use anyhow::{Context, Result};
use rmsk_core::{LayoutEngine, TrackConfig};
use rmsk_render::{ExportSummary, OutputFormat, TrackExporter};
use std::path::{Path, PathBuf};

use super::{load_records, name_filter, parse_window, track_config, VisibilityArg, Window};
use crate::config::Config;
use crate::error::CliError;

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum RenderFormat {
    Svg,
    Png,
}

impl From<RenderFormat> for OutputFormat {
    fn from(format: RenderFormat) -> Self {
        match format {
            RenderFormat::Svg => OutputFormat::Svg,
            RenderFormat::Png => OutputFormat::Png,
        }
    }
}

/// Flags that switch parts of the output off.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderToggles {
    pub no_labels: bool,
    pub no_arms: bool,
    pub no_legend: bool,
    pub no_footer: bool,
}

#[allow(clippy::too_many_arguments)]
pub fn execute(
    config: &Config,
    input: PathBuf,
    window: String,
    output: PathBuf,
    format: Option<RenderFormat>,
    visibility: Option<VisibilityArg>,
    filter: Option<String>,
    regex: bool,
    width: Option<u32>,
    title: Option<String>,
    toggles: RenderToggles,
) -> Result<ExportSummary> {
    log::info!("Starting track rendering");
    log::info!("Input file: {}", input.display());
    log::info!("Output file: {}", output.display());

    let output_format = match format {
        Some(f) => f.into(),
        None => detect_output_format(&output)?,
    };
    log::info!("Output format: {:?}", output_format);

    let window = parse_window(&window)?;
    let filter = name_filter(config, filter.as_deref(), regex)?;
    let mut track = track_config(config, &window, visibility, width, None)?;
    if toggles.no_labels {
        track.show_labels = false;
    }
    if toggles.no_arms {
        track.show_unaligned_arms = false;
    }

    let records = load_records(&input, &filter, &window)?;

    let mut render = config.render.clone();
    if toggles.no_legend {
        render.show_legend = false;
    }
    if toggles.no_footer {
        render.show_footer = false;
    }
    let exporter = TrackExporter::new(render.export_config(
        title,
        Some(build_provenance_comment(&input, &window, &track, records.len())),
    ));
    let engine = LayoutEngine::new();

    let summary = match output_format {
        OutputFormat::Svg => exporter.export_svg(&output, &engine, &track, &records),
        OutputFormat::Png => exporter.export_png(&output, &engine, &track, &records),
    }
    .map_err(|e| CliError::rendering(format!("{:#}", e)))
    .with_context(|| format!("Failed to render {}", output.display()))?;

    log::info!(
        "Rendered {} records on {} rows ({} layout), {}x{} px",
        summary.records,
        summary.row_count,
        summary.policy,
        summary.width,
        summary.height
    );
    Ok(summary)
}

fn detect_output_format(path: &Path) -> Result<OutputFormat, CliError> {
    OutputFormat::from_path(path).ok_or_else(|| {
        CliError::invalid_format(format!(
            "cannot infer output format from '{}'",
            path.display()
        ))
    })
}

fn build_provenance_comment(input: &Path, window: &Window, track: &TrackConfig, records: usize) -> String {
    format!(
        "rmsk v{}\ninput: {}\nwindow: {}\nvisibility: {}\nrecords: {}\nlabels: {} arms: {} class rows: {}",
        rmsk_core::VERSION,
        input.display(),
        window,
        track.visibility,
        records,
        track.show_labels,
        track.show_unaligned_arms,
        track.use_class_row_layout
    )
}
