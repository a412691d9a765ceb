//! Stable label-to-color assignment
//!
//! Each distinct comparison label gets a color at its first appearance
//! and keeps it for as long as the label stays in the working set, so
//! the legend does not reshuffle when filters change. Labels beyond the
//! fixed palette get a generated color from an RNG seeded by the
//! assignment index, which makes overflow colors reproducible across
//! renders instead of re-randomized per redraw.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Fixed distinct palette used for the first assignments.
pub const PALETTE: [Color; 12] = [
    Color::new(0xe6, 0x19, 0x4b), // red
    Color::new(0x43, 0x63, 0xd8), // blue
    Color::new(0x3c, 0xb4, 0x4b), // green
    Color::new(0xf5, 0x82, 0x31), // orange
    Color::new(0x91, 0x1e, 0xb4), // purple
    Color::new(0x42, 0xd4, 0xf4), // cyan
    Color::new(0xf0, 0x32, 0xe6), // magenta
    Color::new(0xbf, 0xef, 0x45), // lime
    Color::new(0x46, 0x99, 0x90), // teal
    Color::new(0x9a, 0x63, 0x24), // brown
    Color::new(0x80, 0x80, 0x00), // olive
    Color::new(0x00, 0x00, 0x75), // navy
];

/// Generated color for assignment indices past the palette. Channel
/// range avoids near-black and near-white so segments stay visible on
/// either background.
fn generated_color(index: usize) -> Color {
    let mut rng = StdRng::seed_from_u64(index as u64);
    Color {
        r: rng.gen_range(32..=224),
        g: rng.gen_range(32..=224),
        b: rng.gen_range(32..=224),
    }
}

/// Session-scoped label -> color map, in assignment (first appearance)
/// order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColorAssignment {
    assigned: Vec<(String, Color)>,
    next_index: usize,
}

impl ColorAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Color for a label, assigning one on first sight. The assignment
    /// index is monotonic: removing a label never shifts the colors of
    /// the labels that remain.
    pub fn color_for(&mut self, label: &str) -> Color {
        if let Some(color) = self.get(label) {
            return color;
        }
        let color = match PALETTE.get(self.next_index) {
            Some(&color) => color,
            None => generated_color(self.next_index),
        };
        self.assigned.push((label.to_string(), color));
        self.next_index += 1;
        color
    }

    pub fn get(&self, label: &str) -> Option<Color> {
        self.assigned
            .iter()
            .find(|(name, _)| name == label)
            .map(|&(_, color)| color)
    }

    /// Drop assignments for labels no longer present. A label that is
    /// removed and later re-added counts as a new first appearance and
    /// may receive a different color.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.assigned.retain(|(label, _)| keep(label));
    }

    /// Explicit regeneration: forget everything, including the index.
    pub fn reset(&mut self) {
        self.assigned.clear();
        self.next_index = 0;
    }

    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }

    /// Assigned (label, color) pairs in assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Color)> + '_ {
        self.assigned
            .iter()
            .map(|(label, color)| (label.as_str(), *color))
    }
}
