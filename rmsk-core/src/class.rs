//! Repeat class table.
//!
//! The closed set of repeat classes drawn by the track, in row order, with
//! their display labels and colors, plus normalization of the
//! `family#class/subclass` names found in annotation records.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Decode a packed `0xAARRGGBB` value.
    pub const fn from_argb(value: u32) -> Self {
        Self {
            a: (value >> 24) as u8,
            r: (value >> 16) as u8,
            g: (value >> 8) as u8,
            b: value as u8,
        }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Black on light colors, white on dark ones.
    pub fn contrasting(&self) -> Color {
        let luma = (self.r as u32 * 299 + self.g as u32 * 587 + self.b as u32 * 114) / 1000;
        if luma >= 128 {
            Color::BLACK
        } else {
            Color::WHITE
        }
    }
}

/// One entry of the class table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepeatClass {
    /// Name as it appears after `#` in annotation names
    pub key: &'static str,
    pub label: &'static str,
    pub row: usize,
    pub color: Color,
}

pub const OTHER_CLASS: &str = "Other";
pub const UNKNOWN_CLASS: &str = "Unknown";

const STANDARD_CLASSES: [(&str, &str, u32); 10] = [
    ("SINE", "SINE", 0xff1f77b4),
    ("LINE", "LINE", 0xffff7f0e),
    ("LTR", "LTR", 0xff2ca02c),
    ("DNA", "DNA", 0xffd62728),
    ("Simple_repeat", "Simple", 0xff9467bd),
    ("Low_complexity", "Low Complexity", 0xff8c564b),
    ("Satellite", "Satellite", 0xffe377c2),
    ("RNA", "RNA", 0xff7f7f7f),
    (OTHER_CLASS, "Other", 0xffbcbd22),
    (UNKNOWN_CLASS, "Unknown", 0xff17becf),
];

// Alternate spellings seen in older annotation sets.
const ALIASES: [(&str, &str); 2] = [("Simple", "Simple_repeat"), ("Low complexity", "Low_complexity")];

/// Class name lookup. Row index equals table position.
#[derive(Debug, Clone)]
pub struct ClassColorTable {
    classes: Vec<RepeatClass>,
    index: HashMap<&'static str, usize>,
    other: usize,
}

impl ClassColorTable {
    pub fn new() -> Self {
        let classes: Vec<RepeatClass> = STANDARD_CLASSES
            .iter()
            .copied()
            .enumerate()
            .map(|(row, (key, label, argb))| RepeatClass {
                key,
                label,
                row,
                color: Color::from_argb(argb),
            })
            .collect();

        let mut index: HashMap<&'static str, usize> =
            classes.iter().map(|c| (c.key, c.row)).collect();
        for (alias, key) in ALIASES {
            if let Some(row) = index.get(key).copied() {
                index.insert(alias, row);
            }
        }
        let other = index.get(OTHER_CLASS).copied().unwrap_or(classes.len() - 1);

        Self { classes, index, other }
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RepeatClass> {
        self.classes.iter()
    }

    pub fn get(&self, key: &str) -> Option<&RepeatClass> {
        self.index.get(key).map(|&row| &self.classes[row])
    }

    /// Resolve a full annotation name to its class.
    pub fn resolve(&self, name: &str) -> &RepeatClass {
        let key = normalize_class(name);
        self.get(&key).unwrap_or(&self.classes[self.other])
    }

    pub fn row_of(&self, name: &str) -> usize {
        self.resolve(name).row
    }
}

impl Default for ClassColorTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the class key from `family#class/subclass`.
///
/// No `#` means `Unknown`. A trailing `?` is dropped and anything ending in
/// `RNA` (tRNA, snRNA, scRNA...) collapses to `RNA`. The result may still be
/// outside the table, in which case [`ClassColorTable::resolve`] maps it to
/// `Other`.
pub fn normalize_class(name: &str) -> String {
    let Some((_, rest)) = name.split_once('#') else {
        return UNKNOWN_CLASS.to_string();
    };
    let class = rest.split('/').next().unwrap_or(rest);
    let class = class.strip_suffix('?').unwrap_or(class);

    if class.is_empty() {
        OTHER_CLASS.to_string()
    } else if class.ends_with("RNA") {
        "RNA".to_string()
    } else {
        class.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_normalization() {
        let table = ClassColorTable::new();
        assert_eq!(table.resolve("AluY#SINE/Alu").key, "SINE");
        assert_eq!(table.resolve("L1#LINE?").key, "LINE");
        assert_eq!(table.resolve("U6#snRNA").key, "RNA");
        assert_eq!(table.resolve("tRNA-Glu#tRNA").key, "RNA");
        assert_eq!(table.resolve("foo").key, "Unknown");
        assert_eq!(table.resolve("X#Weird").key, "Other");
        assert_eq!(table.resolve("X#").key, "Other");
        assert_eq!(table.resolve("(CA)n#Simple_repeat").label, "Simple");
    }

    #[test]
    fn test_rows_follow_table_order() {
        let table = ClassColorTable::new();
        assert_eq!(table.len(), 10);
        for (i, class) in table.iter().enumerate() {
            assert_eq!(class.row, i);
        }
        assert_eq!(table.row_of("MER5A#DNA/hAT-Charlie"), 3);
        assert_eq!(table.row_of("HAL1#LINE/L1"), 1);
    }

    #[test]
    fn test_color_decoding() {
        let sine = Color::from_argb(0xff1f77b4);
        assert_eq!(sine, Color::rgb(0x1f, 0x77, 0xb4));
        assert_eq!(sine.to_hex(), "#1f77b4");
        assert_eq!(Color::WHITE.contrasting(), Color::BLACK);
        assert_eq!(Color::BLACK.contrasting(), Color::WHITE);
    }
}
