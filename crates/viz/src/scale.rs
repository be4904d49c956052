//! Linear and band scales.

/// Maps a continuous domain onto a continuous range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    #[must_use]
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Position of `value`; a zero-width domain maps to the range start.
    #[must_use]
    pub fn scale(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        if span == 0.0 || !span.is_finite() {
            return r0;
        }
        r0 + (value - d0) / span * (r1 - r0)
    }

    /// Like [`scale`](Self::scale), clamped to the range.
    #[must_use]
    pub fn scale_clamped(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (lo, hi) = if d0 <= d1 { (d0, d1) } else { (d1, d0) };
        self.scale(value.clamp(lo, hi))
    }

    /// Round tick values inside the domain, about `count` of them.
    #[must_use]
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = if self.domain.0 <= self.domain.1 {
            self.domain
        } else {
            (self.domain.1, self.domain.0)
        };
        if !(lo.is_finite() && hi.is_finite()) || count == 0 {
            return Vec::new();
        }
        if lo == hi {
            return vec![lo];
        }

        let step = tick_step(lo, hi, count);
        let first = (lo / step).ceil() as i64;
        let last = (hi / step).floor() as i64;
        (first..=last).map(|i| i as f64 * step).collect()
    }
}

/// 1, 2 or 5 times a power of ten, so that about `count` steps span the range.
fn tick_step(lo: f64, hi: f64, count: usize) -> f64 {
    let raw = (hi - lo) / count as f64;
    let power = 10f64.powf(raw.log10().floor());
    let error = raw / power;
    let factor = if error >= 7.07 {
        10.0
    } else if error >= 3.16 {
        5.0
    } else if error >= 1.41 {
        2.0
    } else {
        1.0
    };
    factor * power
}

/// Splits a range into equal bands, one per key, with padding between them.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    keys: Vec<String>,
    range: (f64, f64),
    padding: f64,
}

impl BandScale {
    /// `padding` is the fraction of each step left empty, split evenly
    /// between the inner gaps and the outer edges.
    #[must_use]
    pub fn new(keys: Vec<String>, range: (f64, f64), padding: f64) -> Self {
        Self {
            keys,
            range,
            padding: padding.clamp(0.0, 1.0),
        }
    }

    fn step(&self) -> f64 {
        let n = self.keys.len() as f64;
        let (r0, r1) = self.range;
        (r1 - r0) / (n - self.padding + 2.0 * self.padding).max(1.0)
    }

    /// Start of the band for `key`.
    #[must_use]
    pub fn position(&self, key: &str) -> Option<f64> {
        let index = self.keys.iter().position(|k| k == key)?;
        let step = self.step();
        Some(self.range.0 + step * self.padding + step * index as f64)
    }

    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding)
    }

    /// Centre of the band for `key`.
    #[must_use]
    pub fn center(&self, key: &str) -> Option<f64> {
        Some(self.position(key)? + self.bandwidth() / 2.0)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_scale() {
        let scale = LinearScale::new((50.0, 100.0), (200.0, 0.0));
        assert_eq!(scale.scale(50.0), 200.0);
        assert_eq!(scale.scale(75.0), 100.0);
        assert_eq!(scale.scale_clamped(120.0), 0.0);
        assert_eq!(LinearScale::new((3.0, 3.0), (0.0, 10.0)).scale(3.0), 0.0);
    }

    #[test]
    fn test_ticks() {
        let scale = LinearScale::new((50.0, 100.0), (0.0, 1.0));
        assert_eq!(scale.ticks(5), vec![50.0, 60.0, 70.0, 80.0, 90.0, 100.0]);

        let scale = LinearScale::new((-12.0, 31.0), (0.0, 1.0));
        assert_eq!(scale.ticks(5), vec![-10.0, 0.0, 10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_band_scale() {
        let keys = vec!["a".to_string(), "b".to_string()];
        let bands = BandScale::new(keys, (0.0, 100.0), 0.0);
        assert_eq!(bands.position("a"), Some(0.0));
        assert_eq!(bands.position("b"), Some(50.0));
        assert_eq!(bands.bandwidth(), 50.0);
        assert_eq!(bands.position("c"), None);

        let padded = BandScale::new(vec!["x".to_string()], (0.0, 100.0), 0.5);
        let start = padded.position("x").unwrap();
        assert!((start + padded.bandwidth() / 2.0 - 50.0).abs() < 1e-9);
    }
}
