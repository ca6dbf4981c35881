//! Named color gradients and level quantization.
//!
//! A [`Palette`] is a fixed number of shades sampled from a named gradient,
//! ordered from the lowest level to the highest. Levels are mapped onto it
//! with [`quantize`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Rgba;

/// Smallest palette that still has a distinct low and high end.
pub const MIN_SHADES: usize = 2;

/// Gradient a palette is sampled from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColormapName {
    /// Dark blue through cyan and yellow to dark red
    #[default]
    Jet,
    /// Black through red and yellow to white
    Hot,
    /// Cyan to magenta
    Cool,
    /// Black to white
    Greys,
    /// Perceptually uniform purple to yellow
    Viridis,
}

impl ColormapName {
    /// All gradients, in the order they are offered to the user.
    pub fn all() -> &'static [ColormapName] {
        &[
            ColormapName::Jet,
            ColormapName::Hot,
            ColormapName::Cool,
            ColormapName::Greys,
            ColormapName::Viridis,
        ]
    }

    /// Control stops as `(position, rgb)` pairs, positions in `0.0..=1.0`.
    fn stops(&self) -> &'static [(f64, [u8; 3])] {
        match self {
            ColormapName::Jet => &[
                (0.0, [0, 0, 131]),
                (0.125, [0, 60, 170]),
                (0.375, [5, 255, 255]),
                (0.625, [255, 255, 0]),
                (0.875, [250, 0, 0]),
                (1.0, [128, 0, 0]),
            ],
            ColormapName::Hot => &[
                (0.0, [0, 0, 0]),
                (0.3, [230, 0, 0]),
                (0.6, [255, 210, 0]),
                (1.0, [255, 255, 255]),
            ],
            ColormapName::Cool => &[(0.0, [0, 255, 255]), (1.0, [255, 0, 255])],
            ColormapName::Greys => &[(0.0, [0, 0, 0]), (1.0, [255, 255, 255])],
            ColormapName::Viridis => &[
                (0.0, [68, 1, 84]),
                (0.13, [71, 44, 122]),
                (0.25, [59, 81, 139]),
                (0.38, [44, 113, 142]),
                (0.5, [33, 144, 141]),
                (0.63, [39, 173, 129]),
                (0.75, [92, 200, 99]),
                (0.88, [170, 220, 50]),
                (1.0, [253, 231, 37]),
            ],
        }
    }

    /// Samples the gradient at `t` (clamped to `0.0..=1.0`).
    fn sample(&self, t: f64) -> [u8; 3] {
        let stops = self.stops();
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        for pair in stops.windows(2) {
            let (lo_pos, lo) = pair[0];
            let (hi_pos, hi) = pair[1];
            if t <= hi_pos {
                let span = hi_pos - lo_pos;
                let f = if span > 0.0 { (t - lo_pos) / span } else { 0.0 };
                let mut rgb = [0u8; 3];
                for (channel, out) in rgb.iter_mut().enumerate() {
                    let a = lo[channel] as f64;
                    let b = hi[channel] as f64;
                    *out = (a + (b - a) * f).round().clamp(0.0, 255.0) as u8;
                }
                return rgb;
            }
        }

        stops[stops.len() - 1].1
    }
}

impl fmt::Display for ColormapName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jet => write!(f, "jet"),
            Self::Hot => write!(f, "hot"),
            Self::Cool => write!(f, "cool"),
            Self::Greys => write!(f, "greys"),
            Self::Viridis => write!(f, "viridis"),
        }
    }
}

impl FromStr for ColormapName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ColormapName::all()
            .iter()
            .copied()
            .find(|name| name.to_string() == wanted)
            .ok_or_else(|| {
                let known: Vec<String> =
                    ColormapName::all().iter().map(|n| n.to_string()).collect();
                format!("unknown colormap '{s}' (expected one of: {})", known.join(", "))
            })
    }
}

/// Ordered shades from low level (index 0) to high level (last index).
///
/// Immutable once built; share it between buffers behind an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    name: ColormapName,
    shades: Vec<Rgba>,
}

impl Palette {
    /// Builds a palette of `shade_count` opaque shades from a named gradient.
    ///
    /// Counts below [`MIN_SHADES`] are raised to it.
    pub fn build(name: ColormapName, shade_count: usize) -> Self {
        let count = shade_count.max(MIN_SHADES);
        let last = (count - 1) as f64;
        let shades = (0..count)
            .map(|i| {
                let [r, g, b] = name.sample(i as f64 / last);
                Rgba::opaque(r, g, b)
            })
            .collect();

        Palette { name, shades }
    }

    pub fn name(&self) -> ColormapName {
        self.name
    }

    pub fn len(&self) -> usize {
        self.shades.len()
    }

    /// Always false; a palette holds at least [`MIN_SHADES`] entries.
    pub fn is_empty(&self) -> bool {
        self.shades.is_empty()
    }

    pub fn shades(&self) -> &[Rgba] {
        &self.shades
    }

    /// Shade at `index`, clamped to the last shade.
    pub fn color(&self, index: usize) -> Rgba {
        self.shades[index.min(self.shades.len() - 1)]
    }

    /// Quantizes `level` against this palette.
    pub fn quantize(&self, level: f64, min_level: f64, max_level: f64) -> usize {
        quantize(level, min_level, max_level, self.shades.len())
    }

    /// Shade for `level`; shorthand for `color(quantize(..))`.
    pub fn color_for(&self, level: f64, min_level: f64, max_level: f64) -> Rgba {
        self.color(self.quantize(level, min_level, max_level))
    }
}

/// Maps `level` onto a palette index in `0..palette_len`.
///
/// Levels at or below `min_level` map to 0, at or above `max_level` to the
/// last index, and everything in between is rounded linearly. A range with
/// `max_level <= min_level` is degenerate and always yields 0, as does a
/// NaN level.
pub fn quantize(level: f64, min_level: f64, max_level: f64, palette_len: usize) -> usize {
    let last = palette_len.saturating_sub(1);
    let range = max_level - min_level;

    if last == 0 || !(range > 0.0) || level.is_nan() {
        return 0;
    }
    if level <= min_level {
        return 0;
    }
    if level >= max_level {
        return last;
    }

    let index = ((level - min_level) / range * last as f64).round() as usize;
    index.min(last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_reference_levels() {
        let palette = Palette::build(ColormapName::Jet, 150);
        assert_eq!(palette.quantize(-125.0, -125.0, 0.0), 0);
        assert_eq!(palette.quantize(0.0, -125.0, 0.0), 149);
        assert_eq!(palette.quantize(-62.5, -125.0, 0.0), 75);
    }

    #[test]
    fn test_quantize_clamps_out_of_range() {
        assert_eq!(quantize(-500.0, -125.0, 0.0, 150), 0);
        assert_eq!(quantize(30.0, -125.0, 0.0, 150), 149);
    }

    #[test]
    fn test_quantize_is_monotonic() {
        let mut previous = 0;
        let mut level = -140.0;
        while level <= 10.0 {
            let index = quantize(level, -125.0, 0.0, 150);
            assert!(index >= previous, "index dropped at level {level}");
            previous = index;
            level += 0.37;
        }
        assert_eq!(previous, 149);
    }

    #[test]
    fn test_quantize_degenerate_range() {
        for level in [-1000.0, -10.0, 0.0, 10.0, f64::INFINITY] {
            assert_eq!(quantize(level, -10.0, -10.0, 150), 0);
        }
        assert_eq!(quantize(5.0, 10.0, -10.0, 150), 0);
    }

    #[test]
    fn test_quantize_nan_level() {
        assert_eq!(quantize(f64::NAN, -125.0, 0.0, 150), 0);
    }

    #[test]
    fn test_palette_has_requested_shades() {
        let palette = Palette::build(ColormapName::Viridis, 64);
        assert_eq!(palette.len(), 64);
        assert!(palette.shades().iter().all(|c| c.a == 255));
    }

    #[test]
    fn test_palette_raises_tiny_counts() {
        assert_eq!(Palette::build(ColormapName::Greys, 0).len(), MIN_SHADES);
        assert_eq!(Palette::build(ColormapName::Greys, 1).len(), MIN_SHADES);
    }

    #[test]
    fn test_palette_endpoints_match_gradient() {
        let jet = Palette::build(ColormapName::Jet, 150);
        assert_eq!(jet.color(0), Rgba::opaque(0, 0, 131));
        assert_eq!(jet.color(149), Rgba::opaque(128, 0, 0));
        assert_eq!(jet.color(10_000), Rgba::opaque(128, 0, 0));

        let greys = Palette::build(ColormapName::Greys, 3);
        assert_eq!(greys.color(1), Rgba::opaque(128, 128, 128));
    }

    #[test]
    fn test_colormap_name_parsing() {
        assert_eq!("JET".parse::<ColormapName>().unwrap(), ColormapName::Jet);
        assert_eq!(" viridis ".parse::<ColormapName>().unwrap(), ColormapName::Viridis);
        assert!("rainbow".parse::<ColormapName>().is_err());
        for name in ColormapName::all() {
            assert_eq!(name.to_string().parse::<ColormapName>().unwrap(), *name);
        }
    }
}
