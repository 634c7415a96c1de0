use plotters::style::colors::colormaps::{ColorMap, ViridisRGB};
use plotters::style::RGBColor;

/// Linear normalisation of values onto `[0, 1]` over their observed range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalize {
    pub min: f64,
    pub max: f64,
}

impl Normalize {
    pub fn fit(values: impl IntoIterator<Item = f64>) -> Self {
        let (min, max) = values
            .into_iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if min > max {
            return Normalize { min: 0.0, max: 0.0 };
        }
        Normalize { min, max }
    }

    /// A flat range maps everything to 0.
    pub fn apply(&self, value: f64) -> f64 {
        if self.max <= self.min {
            return 0.0;
        }
        ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }
}

pub fn viridis(t: f64) -> RGBColor {
    ColorMap::<RGBColor, f64>::get_color(&ViridisRGB, t.clamp(0.0, 1.0))
}
