//! Annotation sources.
//!
//! Records reach the layout engine through [`AnnotationSource`]; the only
//! on-disk format read here is the 14-column text dump of a bigRmsk file.

pub mod bigrmsk;

pub use bigrmsk::BigRmskTextSource;

use crate::error::RmskResult;
use crate::types::{AnnotationRecord, GenomicPos};
use regex::Regex;

/// Supplies the records overlapping a window.
pub trait AnnotationSource {
    fn fetch(&self, chrom: &str, start: GenomicPos, end: GenomicPos) -> RmskResult<Vec<AnnotationRecord>>;
}

/// Record name filter applied while loading.
#[derive(Debug, Clone, Default)]
pub enum NameFilter {
    #[default]
    All,
    /// Shell-style pattern (`*`, `?`) matched against the whole name
    Wildcard(Regex),
    /// Regular expression matched anywhere in the name
    Regex(Regex),
}

impl NameFilter {
    pub fn wildcard(pattern: &str) -> RmskResult<Self> {
        if pattern == "*" || pattern.is_empty() {
            return Ok(NameFilter::All);
        }
        let mut translated = String::with_capacity(pattern.len() + 8);
        translated.push('^');
        for c in pattern.chars() {
            match c {
                '*' => translated.push_str(".*"),
                '?' => translated.push('.'),
                c => translated.push_str(&regex::escape(&c.to_string())),
            }
        }
        translated.push('$');
        Ok(NameFilter::Wildcard(Regex::new(&translated)?))
    }

    pub fn regex(pattern: &str) -> RmskResult<Self> {
        Ok(NameFilter::Regex(Regex::new(pattern)?))
    }

    /// Build from a pattern, as a regular expression or a wildcard.
    pub fn from_pattern(pattern: &str, is_regex: bool) -> RmskResult<Self> {
        if is_regex {
            Self::regex(pattern)
        } else {
            Self::wildcard(pattern)
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            NameFilter::All => true,
            NameFilter::Wildcard(re) | NameFilter::Regex(re) => re.is_match(name),
        }
    }
}
