//! Colour ramps and palettes.

use crate::scale::LinearScale;

/// Fill for regions and bars without a value.
pub const NO_DATA_FILL: &str = "#ccc";

/// Ten categorical colours, cycled by ordinal scales.
pub const CATEGORY10: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Series colours for the radar small multiples.
pub const RADAR_PALETTE: [&str; 8] = [
    "#4F8EF7", "#F7B32B", "#E4572E", "#76B041", "#A259F7", "#F76E9A", "#43BCCD", "#FF8C42",
];

/// Nine-class sequential blues, light to dark.
const BLUES: [(u8, u8, u8); 9] = [
    (0xf7, 0xfb, 0xff),
    (0xde, 0xeb, 0xf7),
    (0xc6, 0xdb, 0xef),
    (0x9e, 0xca, 0xe1),
    (0x6b, 0xae, 0xd6),
    (0x42, 0x92, 0xc6),
    (0x21, 0x71, 0xb5),
    (0x08, 0x51, 0x9c),
    (0x08, 0x30, 0x6b),
];

/// Colour at `t` in `[0, 1]` along the blues ramp, as `#rrggbb`.
#[must_use]
pub fn blues(t: f64) -> String {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let position = t * (BLUES.len() - 1) as f64;
    let index = (position.floor() as usize).min(BLUES.len() - 2);
    let local = position - index as f64;

    let (r0, g0, b0) = BLUES[index];
    let (r1, g1, b1) = BLUES[index + 1];
    let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * local).round() as u8;
    format!("#{:02x}{:02x}{:02x}", mix(r0, r1), mix(g0, g1), mix(b0, b1))
}

/// Maps a numeric domain onto the blues ramp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequentialScale {
    position: LinearScale,
}

impl SequentialScale {
    #[must_use]
    pub fn blues(domain: (f64, f64)) -> Self {
        Self {
            position: LinearScale::new(domain, (0.0, 1.0)),
        }
    }

    #[must_use]
    pub fn color(&self, value: f64) -> String {
        blues(self.position.scale_clamped(value))
    }

    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        self.position.domain
    }
}

/// Assigns palette colours to keys in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct OrdinalScale {
    palette: Vec<&'static str>,
    keys: Vec<String>,
}

impl OrdinalScale {
    #[must_use]
    pub fn new(palette: &[&'static str]) -> Self {
        Self {
            palette: palette.to_vec(),
            keys: Vec::new(),
        }
    }

    /// A scale whose domain is fixed up front.
    #[must_use]
    pub fn with_domain<I, S>(palette: &[&'static str], keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            palette: palette.to_vec(),
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Colour for `key`; unseen keys extend the domain.
    pub fn color(&mut self, key: &str) -> &'static str {
        let index = match self.keys.iter().position(|k| k == key) {
            Some(index) => index,
            None => {
                self.keys.push(key.to_string());
                self.keys.len() - 1
            }
        };
        self.get(index)
    }

    /// Colour for `key` without extending the domain.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<&'static str> {
        let index = self.keys.iter().position(|k| k == key)?;
        Some(self.get(index))
    }

    fn get(&self, index: usize) -> &'static str {
        if self.palette.is_empty() {
            return NO_DATA_FILL;
        }
        self.palette[index % self.palette.len()]
    }
}
