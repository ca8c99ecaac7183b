use std::{fmt::Display, ops::Range};

use kahan::KahanSummator;
use nalgebra::DVector;
use num::Zero;
use uom::{
    fmt::DisplayStyle::Abbreviation,
    si::{
        angle::degree,
        f64::{Angle, Length},
        length::nanometer,
    },
};

use super::{model::check_incidence_angle, RtPair};
use crate::{
    error::{FsoError, FsoResult},
    plottable::{AxLims, PlotConfig, PlotData, Plottable},
    utils::{f64_to_usize, usize_to_f64},
};

/// Equidistant wavelength samples from `start` to `end` (both included).
#[derive(Clone, Debug, PartialEq)]
pub struct WavelengthSweep {
    start: Length,
    step: Length,
    samples: usize,
}

impl WavelengthSweep {
    /// Create a new wavelength sweep over the given range with the given resolution.
    ///
    /// The end point of the range is part of the sweep if the range is a multiple of the resolution.
    ///
    /// # Errors
    ///
    /// This function will return an [`FsoError::InvalidParameter`] if
    ///   - the wavelength range is not in ascending order
    ///   - the wavelength limits are not both positive and finite
    ///   - the resolution is not positive and finite
    ///   - the sweep would exceed [`MAX_SWEEP_SAMPLES`] samples
    pub fn new(range: Range<Length>, resolution: Length) -> FsoResult<Self> {
        if !resolution.is_normal() || resolution <= Length::zero() {
            return Err(FsoError::InvalidParameter(
                "resolution must be positive".into(),
            ));
        }
        if !range.start.is_finite() || !range.end.is_finite() {
            return Err(FsoError::InvalidParameter(
                "wavelength range limits must be finite".into(),
            ));
        }
        if range.start >= range.end {
            return Err(FsoError::InvalidParameter(
                "wavelength range must be in ascending order and not empty".into(),
            ));
        }
        if range.start <= Length::zero() {
            return Err(FsoError::InvalidParameter(
                "wavelength range limits must both be positive".into(),
            ));
        }
        Ok(Self {
            start: range.start,
            step: resolution,
            samples: number_of_samples((range.end - range.start).value / resolution.value)?,
        })
    }
    /// Returns the number of wavelengths of this sweep.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.samples
    }
    /// Always `false` since a sweep contains at least its start point.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.samples == 0
    }
    /// Returns all wavelengths of this sweep.
    #[must_use]
    pub fn wavelengths(&self) -> Vec<Length> {
        (0..self.samples)
            .map(|i| self.start + usize_to_f64(i) * self.step)
            .collect()
    }
}

/// Equidistant angles of incidence from `start` to `end` (both included).
#[derive(Clone, Debug, PartialEq)]
pub struct AngleSweep {
    start: Angle,
    step: Angle,
    samples: usize,
}

impl AngleSweep {
    /// Create a new sweep of incidence angles over the given range with the given step.
    ///
    /// # Errors
    ///
    /// This function will return an [`FsoError::InvalidParameter`] if
    ///   - the step is not positive and finite
    ///   - the range is not in ascending order
    ///   - one of the limits is outside [0°, 90°)
    ///   - the sweep would exceed [`MAX_SWEEP_SAMPLES`] samples
    pub fn new(range: Range<Angle>, step: Angle) -> FsoResult<Self> {
        if !step.is_normal() || step <= Angle::zero() {
            return Err(FsoError::InvalidParameter("step must be positive".into()));
        }
        check_incidence_angle(range.start)?;
        check_incidence_angle(range.end)?;
        if range.start >= range.end {
            return Err(FsoError::InvalidParameter(
                "angle range must be in ascending order and not empty".into(),
            ));
        }
        Ok(Self {
            start: range.start,
            step,
            samples: number_of_samples((range.end - range.start).value / step.value)?,
        })
    }
    /// Returns the number of angles of this sweep.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.samples
    }
    /// Always `false` since a sweep contains at least its start point.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.samples == 0
    }
    /// Returns all angles of this sweep.
    #[must_use]
    pub fn angles(&self) -> Vec<Angle> {
        (0..self.samples)
            .map(|i| self.start + usize_to_f64(i) * self.step)
            .collect()
    }
}

/// Upper limit of the number of samples of a sweep
pub const MAX_SWEEP_SAMPLES: usize = 1_000_000;

/// Number of samples of an inclusive sweep spanning `steps` (fractional) steps.
fn number_of_samples(steps: f64) -> FsoResult<usize> {
    // tolerate rounding errors of the range division
    let steps = (steps + 1e-9).floor();
    if steps >= usize_to_f64(MAX_SWEEP_SAMPLES) {
        return Err(FsoError::InvalidParameter(format!(
            "sweep would contain more than {MAX_SWEEP_SAMPLES} samples"
        )));
    }
    Ok(f64_to_usize(steps) + 1)
}

/// The quantity varied along a [`FilmSpectrum`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SweepVariable {
    /// wavelength in nanometers
    Wavelength,
    /// angle of incidence in degrees
    IncidenceAngle,
}

impl SweepVariable {
    /// Returns the axis label of this variable.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Wavelength => "wavelength (nm)",
            Self::IncidenceAngle => "angle of incidence (deg)",
        }
    }
}

/// Reflectance and transmittance of a stack sampled along a [`SweepVariable`].
#[derive(Clone, Debug, PartialEq)]
pub struct FilmSpectrum {
    variable: SweepVariable,
    data: Vec<(f64, RtPair)>,
}

impl FilmSpectrum {
    pub(super) const fn new(variable: SweepVariable, data: Vec<(f64, RtPair)>) -> Self {
        Self { variable, data }
    }
    /// Returns the [`SweepVariable`] of this spectrum.
    #[must_use]
    pub const fn variable(&self) -> SweepVariable {
        self.variable
    }
    /// Returns the samples as (sweep value, [`RtPair`]).
    ///
    /// Wavelengths are given in nanometers, angles in degrees.
    #[must_use]
    pub fn data(&self) -> &[(f64, RtPair)] {
        &self.data
    }
    /// Returns the number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }
    /// Returns `true` if the spectrum has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
    /// Returns the reflectance values.
    #[must_use]
    pub fn reflectance(&self) -> Vec<f64> {
        self.data.iter().map(|d| d.1.reflectance()).collect()
    }
    /// Returns the transmittance values.
    #[must_use]
    pub fn transmittance(&self) -> Vec<f64> {
        self.data.iter().map(|d| d.1.transmittance()).collect()
    }
    /// Return the [`RtPair`] at a given sweep value (nanometers or degrees).
    ///
    /// The value is linearly interpolated between the neighboring samples. If the sweep value is outside
    /// the range of this spectrum `None` is returned.
    #[must_use]
    pub fn get_value(&self, x: f64) -> Option<RtPair> {
        let first = self.data.first()?;
        let last = self.data.last()?;
        if x < first.0 || x > last.0 {
            return None;
        }
        let idx = self.data.iter().position(|d| d.0 >= x)?;
        #[allow(clippy::float_cmp)]
        if idx == 0 || self.data[idx].0 == x {
            return Some(self.data[idx].1);
        }
        let (left, right) = (&self.data[idx - 1], &self.data[idx]);
        let ratio = (x - left.0) / (right.0 - left.0);
        Some(left.1.lerp(&right.1, ratio))
    }
    /// Returns the mean reflectance over all samples.
    #[must_use]
    pub fn average_reflectance(&self) -> Option<f64> {
        if self.data.is_empty() {
            return None;
        }
        let reflectance = self.reflectance();
        let sum: f64 = reflectance.iter().kahan_sum().sum();
        Some(sum / usize_to_f64(reflectance.len()))
    }
    /// Returns the sample with the lowest reflectance.
    #[must_use]
    pub fn min_reflectance(&self) -> Option<(f64, RtPair)> {
        self.data
            .iter()
            .copied()
            .min_by(|a, b| a.1.reflectance().total_cmp(&b.1.reflectance()))
    }
}

impl Display for FilmSpectrum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fmt_length = Length::format_args(nanometer, Abbreviation);
        let fmt_angle = Angle::format_args(degree, Abbreviation);
        for (x, rt) in &self.data {
            match self.variable {
                SweepVariable::Wavelength => {
                    write!(f, "{:7.2}", fmt_length.with(Length::new::<nanometer>(*x)))?;
                }
                SweepVariable::IncidenceAngle => {
                    write!(f, "{:5.1}", fmt_angle.with(Angle::new::<degree>(*x)))?;
                }
            }
            writeln!(
                f,
                " -> R = {:.6}, T = {:.6}",
                rt.reflectance(),
                rt.transmittance()
            )?;
        }
        match self.average_reflectance() {
            Some(avg) => write!(f, "\nAverage reflectance: {avg:.6}"),
            None => write!(f, "\nAverage reflectance: -"),
        }
    }
}

impl Plottable for FilmSpectrum {
    fn plot_data(&self) -> FsoResult<PlotData> {
        Ok(PlotData::Lines {
            x_dat: DVector::from_iterator(self.len(), self.data.iter().map(|d| d.0)),
            series: vec![
                ("R".into(), DVector::from_vec(self.reflectance())),
                ("T".into(), DVector::from_vec(self.transmittance())),
            ],
            y_bounds: Some(AxLims { min: 0.0, max: 1.0 }),
        })
    }
    fn plot_config(&self) -> PlotConfig {
        PlotConfig::default().with_axis_labels(self.variable.label(), "R, T")
    }
}
