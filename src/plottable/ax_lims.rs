//! This module contains the [`AxLims`] struct, which is used to define the axis limits of a plot.
use log::warn;

/// Struct that holds the maximum and minimum values of an axis
#[derive(Clone, Debug, Copy, PartialEq)]
pub struct AxLims {
    /// minimum value of the axis
    pub min: f64,
    /// maximum value of the axis
    pub max: f64,
}

impl AxLims {
    ///Creates a new [`AxLims`] struct
    /// # Attributes
    /// -`min`: minimum value of the ax limit
    /// -`max`: maximum value of the ax limit
    ///
    /// # Returns
    /// This function returns Some([`AxLims`]) or None if the chosen minimum or maximum value is NaN or infinite
    /// or if `min >= max`.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Option<Self> {
        let axlim = Self { min, max };
        if axlim.check_validity() {
            Some(axlim)
        } else {
            warn!("Invalid axis limits. Must be finite and min < max.");
            None
        }
    }
    /// Creates [`AxLims`] spanning all finite values of the given data.
    ///
    /// If all finite values are equal, the limits are widened to `value ± 0.5`.
    /// Returns `None` if the data contains no finite value.
    #[must_use]
    pub fn finite_from_slice(data: &[f64]) -> Option<Self> {
        let (min, max) = data
            .iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, v| {
                Some(acc.map_or((*v, *v), |(min, max)| (min.min(*v), max.max(*v))))
            })?;
        if max > min {
            Some(Self { min, max })
        } else {
            Some(Self {
                min: min - 0.5,
                max: max + 0.5,
            })
        }
    }
    /// Returns the span `max - min` of these limits.
    #[must_use]
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
    /// Maps a value onto the interval [0.0, 1.0] relative to these limits.
    #[must_use]
    pub fn normalize(&self, value: f64) -> f64 {
        ((value - self.min) / self.range()).clamp(0.0, 1.0)
    }
    fn check_validity(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min < self.max
    }
}
