//! Command implementations for the rmsk CLI

pub mod layout;
pub mod render;

use crate::config::Config;
use crate::error::CliError;
use anyhow::{Context, Result};
use rmsk_core::{AnnotationRecord, AnnotationSource, BigRmskTextSource, GenomicPos, NameFilter, TrackConfig};
use std::path::Path;

/// A genomic window such as `chr1:10,000-20,000`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    pub chrom: String,
    pub start: GenomicPos,
    pub end: GenomicPos,
}

impl std::fmt::Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}-{}", self.chrom, self.start, self.end)
    }
}

pub fn parse_window(text: &str) -> Result<Window, CliError> {
    let (chrom, range) = text
        .rsplit_once(':')
        .ok_or_else(|| CliError::invalid_window(text, "expected chrom:start-end"))?;
    if chrom.is_empty() {
        return Err(CliError::invalid_window(text, "missing chromosome name"));
    }
    let (start, end) = range
        .split_once('-')
        .ok_or_else(|| CliError::invalid_window(text, "expected start-end"))?;

    let position = |s: &str| -> Result<GenomicPos, CliError> {
        s.trim()
            .replace(',', "")
            .parse::<GenomicPos>()
            .map_err(|_| CliError::invalid_window(text.to_string(), format!("'{}' is not a position", s)))
    };
    let start = position(start)?;
    let end = position(end)?;
    if end <= start {
        return Err(CliError::invalid_window(text, "end must exceed start"));
    }

    Ok(Window {
        chrom: chrom.to_string(),
        start,
        end,
    })
}

/// Name filter from the command line, else from the config file.
pub fn name_filter(config: &Config, pattern: Option<&str>, regex: bool) -> Result<NameFilter, CliError> {
    let (pattern, is_regex) = match pattern {
        Some(p) => (Some(p), regex),
        None => (config.input.name_filter.as_deref(), config.input.filter_is_regex),
    };
    match pattern {
        None => Ok(NameFilter::All),
        Some(p) => NameFilter::from_pattern(p, is_regex)
            .map_err(|e| CliError::invalid_filter(p.to_string(), e.to_string())),
    }
}

/// Read a bigRmsk text file and return the records overlapping `window`.
pub fn load_records(input: &Path, filter: &NameFilter, window: &Window) -> Result<Vec<AnnotationRecord>> {
    if !input.exists() {
        return Err(CliError::file_not_found(input.to_path_buf()).into());
    }

    let source = BigRmskTextSource::open(input, filter)
        .map_err(|e| CliError::parse(input.display().to_string(), e.to_string()))?;
    let records = source
        .fetch(&window.chrom, window.start, window.end)
        .with_context(|| format!("Failed to fetch records in {}", window))?;

    log::info!(
        "{} of {} records from {} fall in {}",
        records.len(),
        source.len(),
        input.display(),
        window
    );
    Ok(records)
}

/// Track options for `window`, with command-line overrides applied.
pub fn track_config(
    config: &Config,
    window: &Window,
    visibility: Option<VisibilityArg>,
    image_width: Option<u32>,
    pixels_per_base: Option<f64>,
) -> Result<TrackConfig> {
    let mut track = config.track.clone().with_window(window.start, window.end);
    if let Some(visibility) = visibility {
        track = track.with_visibility(visibility.into());
    }
    if let Some(width) = image_width {
        track.image_width = width;
    }
    if let Some(ppb) = pixels_per_base {
        track = track.with_pixels_per_base(ppb);
    }
    track
        .validate()
        .map_err(|e| CliError::config(e.to_string()))?;
    Ok(track)
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum VisibilityArg {
    Full,
    Pack,
    Squish,
    Dense,
}

impl From<VisibilityArg> for rmsk_core::Visibility {
    fn from(arg: VisibilityArg) -> Self {
        match arg {
            VisibilityArg::Full => rmsk_core::Visibility::Full,
            VisibilityArg::Pack => rmsk_core::Visibility::Pack,
            VisibilityArg::Squish => rmsk_core::Visibility::Squish,
            VisibilityArg::Dense => rmsk_core::Visibility::Dense,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_window() {
        let window = parse_window("chr1:10,000-20,000").unwrap();
        assert_eq!(window.chrom, "chr1");
        assert_eq!(window.start, 10_000);
        assert_eq!(window.end, 20_000);
        assert_eq!(window.to_string(), "chr1:10000-20000");
    }

    #[test]
    fn test_parse_window_rejects_bad_input() {
        assert!(matches!(parse_window("chr1"), Err(CliError::InvalidWindow { .. })));
        assert!(matches!(parse_window(":1-2"), Err(CliError::InvalidWindow { .. })));
        assert!(matches!(parse_window("chr1:x-2"), Err(CliError::InvalidWindow { .. })));
        assert!(matches!(parse_window("chr1:500-100"), Err(CliError::InvalidWindow { .. })));
    }

    #[test]
    fn test_name_filter_prefers_command_line() {
        let mut config = Config::default();
        config.input.name_filter = Some("L1*".into());

        let from_config = name_filter(&config, None, false).unwrap();
        assert!(from_config.matches("L1PA2#LINE/L1"));
        assert!(!from_config.matches("AluY#SINE/Alu"));

        let from_cli = name_filter(&config, Some("^Alu"), true).unwrap();
        assert!(from_cli.matches("AluY#SINE/Alu"));

        assert!(matches!(
            name_filter(&config, Some("(unclosed"), true),
            Err(CliError::InvalidFilter { .. })
        ));
    }

    #[test]
    fn test_track_config_overrides() {
        let config = Config::default();
        let window = parse_window("chr2:0-4000").unwrap();
        let track = track_config(&config, &window, Some(VisibilityArg::Pack), Some(800), None).unwrap();
        assert_eq!(track.visibility, rmsk_core::Visibility::Pack);
        assert_eq!(track.image_width, 800);
        assert_eq!(track.window_end, 4000);

        assert!(track_config(&config, &window, None, None, Some(-1.0)).is_err());
    }
}
