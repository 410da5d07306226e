//! Text form of bigRmsk (BED9+5) records, as produced by `bigBedToBed`.
//!
//! Columns: chrom, chromStart, chromEnd, name, score, strand, alignStart,
//! alignEnd, reserved, blockCount, blockSizes, blockRelStarts, id,
//! description. Block lists are comma separated with an optional trailing
//! comma; relative starts of `-1` mark unaligned blocks.

use crate::error::{RmskError, RmskResult};
use crate::io::{AnnotationSource, NameFilter};
use crate::types::{AnnotationRecord, GenomicPos, Strand};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

pub const BIGRMSK_FIELD_COUNT: usize = 14;

/// In-memory set of records loaded from a text file.
#[derive(Debug, Clone, Default)]
pub struct BigRmskTextSource {
    records: Vec<AnnotationRecord>,
}

impl BigRmskTextSource {
    pub fn new(records: Vec<AnnotationRecord>) -> Self {
        Self { records }
    }

    pub fn open<P: AsRef<Path>>(path: P, filter: &NameFilter) -> RmskResult<Self> {
        let file = File::open(&path)?;
        let source = Self::from_reader(BufReader::new(file), filter)?;
        log::info!(
            "Loaded {} records from {}",
            source.records.len(),
            path.as_ref().display()
        );
        Ok(source)
    }

    /// Read records, keeping those whose name passes `filter`.
    pub fn from_reader<R: BufRead>(reader: R, filter: &NameFilter) -> RmskResult<Self> {
        let mut records = Vec::new();
        let mut skipped = 0usize;

        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim_end_matches(['\r', '\n']);
            if trimmed.trim().is_empty() || is_header(trimmed) {
                continue;
            }
            let record = parse_line(trimmed).map_err(|message| RmskError::parse(line_num + 1, message))?;
            if filter.matches(&record.name) {
                records.push(record);
            } else {
                skipped += 1;
            }
        }

        if skipped > 0 {
            log::debug!("Name filter dropped {} records", skipped);
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[AnnotationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl AnnotationSource for BigRmskTextSource {
    fn fetch(&self, chrom: &str, start: GenomicPos, end: GenomicPos) -> RmskResult<Vec<AnnotationRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.chrom == chrom && r.chrom_start < end && r.chrom_end > start)
            .cloned()
            .collect())
    }
}

fn is_header(line: &str) -> bool {
    line.starts_with('#') || line.starts_with("track") || line.starts_with("browser")
}

fn parse_line(line: &str) -> Result<AnnotationRecord, String> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < BIGRMSK_FIELD_COUNT {
        return Err(format!(
            "expected {} tab-separated fields, got {}",
            BIGRMSK_FIELD_COUNT,
            fields.len()
        ));
    }

    let mut strand_chars = fields[5].chars();
    let strand = match (strand_chars.next().and_then(Strand::from_char), strand_chars.next()) {
        (Some(strand), None) => strand,
        _ => return Err(format!("invalid strand '{}'", fields[5])),
    };

    Ok(AnnotationRecord {
        chrom: fields[0].to_string(),
        chrom_start: parse_number(fields[1], "chromStart")?,
        chrom_end: parse_number(fields[2], "chromEnd")?,
        name: fields[3].to_string(),
        score: parse_number(fields[4], "score")?,
        strand,
        align_start: parse_number(fields[6], "alignStart")?,
        align_end: parse_number(fields[7], "alignEnd")?,
        block_count: parse_number(fields[9], "blockCount")?,
        block_sizes: parse_list(fields[10], "blockSizes")?,
        block_rel_starts: parse_list(fields[11], "blockRelStarts")?,
        id: parse_number(fields[12], "id")?,
        description: fields[13..].join("\t"),
    })
}

fn parse_number<T: std::str::FromStr>(field: &str, what: &str) -> Result<T, String> {
    field
        .trim()
        .parse::<T>()
        .map_err(|_| format!("invalid {} '{}'", what, field))
}

fn parse_list(field: &str, what: &str) -> Result<Vec<i64>, String> {
    field
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse_number(s, what))
        .collect()
}
