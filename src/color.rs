//! Color handling: RGB math, the highlight palette, and per-page colors.
//!
//! Colors are CSS strings at the canvas boundary; [`Rgb`] avoids repeated
//! string parsing when doing color math (luminance checks for label
//! contrast, page tint generation).

use crate::types::PageIndex;

/// RGB color with u8 components for efficient color manipulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse from a hex string (with or without #).
    /// Returns None if the format is invalid.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
        let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
        let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
        Some(Self { r, g, b })
    }

    /// Convert to CSS hex string (#RRGGBB).
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Relative luminance (0.0 to 1.0).
    /// Uses simplified formula: 0.299*R + 0.587*G + 0.114*B
    pub fn luminance(self) -> f64 {
        let r = f64::from(self.r);
        let g = f64::from(self.g);
        let b = f64::from(self.b);
        (0.299 * r + 0.587 * g + 0.114 * b) / 255.0
    }

    /// Check if this is a light color (luminance > 0.5).
    pub fn is_light(self) -> bool {
        self.luminance() > 0.5
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::new(0, 0, 0)
    }
}

/// Colors used when rendering the grid (CSS format).
pub mod palette {
    pub const WHITE: &str = "#FFFFFF";
    pub const BLACK: &str = "#000000";

    /// Cell border color
    pub const CELL_STROKE: &str = "#000000";

    /// Axis index label color (dark gray)
    pub const AXIS_TEXT: &str = "#595959";

    /// Fill for the cell under the pointer
    pub const HOVER_FILL: &str = "#FFB74D";

    /// Fill for cells matching the current search
    pub const SEARCH_FILL: &str = "#64B5F6";

    /// Fill for sticky-marked cells
    pub const MARK_FILL: &str = "#E57373";

    /// Opacity of the page-color tint layer
    pub const PAGE_TINT_OPACITY: f64 = 0.35;
}

/// Seed used when OS/browser entropy is unavailable (and to remap a zero
/// seed, which the generator cannot hold).
const FALLBACK_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

/// Assigns one color per distinct page, stable for the session.
///
/// Each page gets three independent uniform samples in `[0, 256)` from a
/// small xorshift64* generator seeded from `getrandom`. Colors change on
/// every reload by default; [`PageColorAssigner::with_seed`] is the
/// deterministic variant for tests and hosts that want reload-stable
/// colors.
#[derive(Debug, Clone)]
pub struct PageColorAssigner {
    state: u64,
}

impl PageColorAssigner {
    /// Seed from OS/browser entropy.
    pub fn new() -> Self {
        let mut bytes = [0u8; 8];
        let seed = match getrandom::getrandom(&mut bytes) {
            Ok(()) => u64::from_le_bytes(bytes),
            Err(_) => FALLBACK_SEED,
        };
        Self::with_seed(seed)
    }

    /// Deterministic generator: the same seed always yields the same
    /// color sequence.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            state: if seed == 0 { FALLBACK_SEED } else { seed },
        }
    }

    /// One color per page, indexed by the page's dense index.
    pub fn assign(&mut self, pages: &PageIndex) -> PageColors {
        let colors = (0..pages.len())
            .map(|_| Rgb::new(self.next_channel(), self.next_channel(), self.next_channel()))
            .collect();
        PageColors { colors }
    }

    // xorshift64*
    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    /// Uniform sample in [0, 256), from the high bits.
    #[allow(clippy::cast_possible_truncation)]
    fn next_channel(&mut self) -> u8 {
        (self.next_u64() >> 56) as u8
    }
}

impl Default for PageColorAssigner {
    fn default() -> Self {
        Self::new()
    }
}

/// Page colors indexed by dense page index.
#[derive(Debug, Clone, Default)]
pub struct PageColors {
    colors: Vec<Rgb>,
}

impl PageColors {
    pub fn get(&self, page_index: usize) -> Option<Rgb> {
        self.colors.get(page_index).copied()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;
    use crate::types::PictogramRecord;

    fn pages(names: &[&str]) -> PageIndex {
        let records: Vec<PictogramRecord> = names
            .iter()
            .map(|n| PictogramRecord::new("w", 0, 0, *n, ""))
            .collect();
        PageIndex::from_records(&records)
    }

    #[test]
    fn test_hex_round_trip() {
        let color = Rgb::from_hex("#FF8040").unwrap();
        assert_eq!(color, Rgb::new(255, 128, 64));
        assert_eq!(color.to_hex(), "#FF8040");
        assert_eq!(Rgb::from_hex("4080FF").unwrap(), Rgb::new(64, 128, 255));
        assert!(Rgb::from_hex("#FFF").is_none());
        assert!(Rgb::from_hex("not-a-color").is_none());
    }

    #[test]
    fn test_luminance_contrast() {
        assert!(Rgb::new(255, 255, 255).is_light());
        assert!(!Rgb::new(0, 0, 0).is_light());
        assert!(Rgb::new(255, 235, 59).is_light()); // yellow
        assert!(!Rgb::new(33, 33, 150).is_light()); // dark blue
    }

    #[test]
    fn test_same_seed_same_colors() {
        let index = pages(&["a", "b", "c"]);
        let first = PageColorAssigner::with_seed(42).assign(&index);
        let second = PageColorAssigner::with_seed(42).assign(&index);
        for i in 0..3 {
            assert_eq!(first.get(i), second.get(i));
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let index = pages(&["a", "b", "c", "d"]);
        let first = PageColorAssigner::with_seed(1).assign(&index);
        let second = PageColorAssigner::with_seed(2).assign(&index);
        let same = (0..4).all(|i| first.get(i) == second.get(i));
        assert!(!same);
    }

    #[test]
    fn test_degenerate_page_counts() {
        let mut assigner = PageColorAssigner::with_seed(7);
        assert!(assigner.assign(&pages(&[])).is_empty());
        let single = assigner.assign(&pages(&["only"]));
        assert_eq!(single.len(), 1);
        assert!(single.get(0).is_some());
        assert!(single.get(1).is_none());
    }

    #[test]
    fn test_zero_seed_remapped() {
        let index = pages(&["a"]);
        let from_zero = PageColorAssigner::with_seed(0).assign(&index);
        let from_fallback = PageColorAssigner::with_seed(FALLBACK_SEED).assign(&index);
        assert_eq!(from_zero.get(0), from_fallback.get(0));
    }
}
