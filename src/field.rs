#![warn(missing_docs)]
//! Complex optical fields sampled on a [`Grid`] and the real maps derived from them.
use kahan::{KahanSum, KahanSummator};
use nalgebra::DMatrix;
use num::complex::Complex64;
use std::f64::consts::PI;
use uom::si::{f64::Length, length::meter};

use crate::{
    error::{FsoError, FsoResult},
    grid::Grid,
    mask::TransmittanceMap,
    plottable::{AxLims, CGradient, PlotConfig, PlotData, Plottable},
};

/// Complex field values on every sample of a [`Grid`].
#[derive(Clone, Debug, PartialEq)]
pub struct ComplexField {
    grid: Grid,
    values: DMatrix<Complex64>,
}

impl ComplexField {
    /// Creates a new [`ComplexField`] from a matrix of values.
    ///
    /// # Errors
    ///
    /// This function will return an [`FsoError::InvalidParameter`] if the matrix shape does not match the [`Grid`].
    pub fn new(grid: Grid, values: DMatrix<Complex64>) -> FsoResult<Self> {
        check_shape(&grid, values.shape())?;
        Ok(Self { grid, values })
    }
    pub(crate) const fn from_parts(grid: Grid, values: DMatrix<Complex64>) -> Self {
        Self { grid, values }
    }
    /// Returns the [`Grid`] of this [`ComplexField`].
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }
    /// Returns a reference to the field values.
    #[must_use]
    pub const fn values(&self) -> &DMatrix<Complex64> {
        &self.values
    }
    /// Returns the field value at (`row`, `col`) or `None` if the position is outside the [`Grid`].
    #[must_use]
    pub fn value_at(&self, row: usize, col: usize) -> Option<Complex64> {
        self.values.get((row, col)).copied()
    }
    /// Returns the [`IntensityMap`] `|E|²` of this field.
    #[must_use]
    pub fn intensity(&self) -> IntensityMap {
        IntensityMap {
            grid: self.grid,
            values: self.values.map(|e| e.norm_sqr()),
        }
    }
    /// Returns the [`PhaseMap`] `arg(E)` of this field.
    #[must_use]
    pub fn phase(&self) -> PhaseMap {
        PhaseMap {
            grid: self.grid,
            values: self.values.map(|e| e.arg()),
        }
    }
    /// Returns a new field with every sample multiplied by the corresponding transmittance.
    ///
    /// # Errors
    ///
    /// This function will return an [`FsoError::InvalidParameter`] if the mask was created on a different [`Grid`].
    pub fn apply_mask(&self, mask: &TransmittanceMap) -> FsoResult<Self> {
        if mask.grid() != &self.grid {
            return Err(FsoError::InvalidParameter(
                "mask and field must be sampled on the same grid".into(),
            ));
        }
        let values = self.values.zip_map(mask.values(), |e, t| e * t);
        Ok(Self {
            grid: self.grid,
            values,
        })
    }
}

/// Intensity `|E|²` of a [`ComplexField`].
#[derive(Clone, Debug, PartialEq)]
pub struct IntensityMap {
    grid: Grid,
    values: DMatrix<f64>,
}

impl IntensityMap {
    /// Returns the [`Grid`] of this [`IntensityMap`].
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }
    /// Returns a reference to the intensity values.
    #[must_use]
    pub const fn values(&self) -> &DMatrix<f64> {
        &self.values
    }
    /// Returns the maximum intensity. NaN samples are ignored.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(f64::NAN, f64::max)
    }
    /// Returns a copy of this map scaled to a maximum of 1.0.
    ///
    /// # Errors
    ///
    /// This function will return an [`FsoError::NumericalInstability`] if the maximum is zero or not finite.
    pub fn normalized(&self) -> FsoResult<Self> {
        let max = self.max();
        if !max.is_normal() {
            return Err(FsoError::NumericalInstability(format!(
                "cannot normalize intensity map with maximum {max}"
            )));
        }
        Ok(Self {
            grid: self.grid,
            values: &self.values / max,
        })
    }
    /// Returns the integrated power (sum of all samples times the sample area).
    #[must_use]
    pub fn total_power(&self) -> f64 {
        let dx = self.grid.spacing().get::<meter>();
        let sum: f64 = self.values.iter().kahan_sum().sum();
        sum * dx * dx
    }
    /// Returns the intensity-weighted radius `sqrt(<r²>)` of this map.
    ///
    /// Returns `None` if the total intensity is zero or not finite.
    #[must_use]
    pub fn rms_radius(&self) -> Option<Length> {
        let radii = self.grid.radius_map();
        let total: f64 = self.values.iter().kahan_sum().sum();
        let mut weighted = KahanSum::new();
        for (intensity, radius) in self.values.iter().zip(radii.iter()) {
            weighted += intensity * radius * radius;
        }
        let weighted = weighted.sum();
        (total.is_normal() && weighted.is_finite())
            .then(|| Length::new::<meter>((weighted / total).sqrt()))
    }
}

/// Phase `arg(E)` in (-π, π] of a [`ComplexField`].
#[derive(Clone, Debug, PartialEq)]
pub struct PhaseMap {
    grid: Grid,
    values: DMatrix<f64>,
}

impl PhaseMap {
    /// Returns the [`Grid`] of this [`PhaseMap`].
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }
    /// Returns a reference to the phase values (in radians).
    #[must_use]
    pub const fn values(&self) -> &DMatrix<f64> {
        &self.values
    }
}

impl Plottable for IntensityMap {
    fn plot_data(&self) -> FsoResult<PlotData> {
        Ok(color_mesh(&self.grid, &self.values, None))
    }
    fn plot_config(&self) -> PlotConfig {
        PlotConfig::default().with_cbar_label("intensity (a.u.)")
    }
}

impl Plottable for PhaseMap {
    fn plot_data(&self) -> FsoResult<PlotData> {
        Ok(color_mesh(
            &self.grid,
            &self.values,
            Some(AxLims { min: -PI, max: PI }),
        ))
    }
    fn plot_config(&self) -> PlotConfig {
        PlotConfig::default()
            .with_cmap(CGradient::new(colorous::SINEBOW))
            .with_cbar_label("phase (rad)")
    }
}

/// Color mesh of grid values with both axes in millimeters.
pub(crate) fn color_mesh(
    grid: &Grid,
    values: &DMatrix<f64>,
    z_bounds: Option<AxLims>,
) -> PlotData {
    let axis = grid.axis() * 1.0e3;
    PlotData::ColorMesh {
        x_dat_n: axis.clone(),
        y_dat_m: axis,
        z_dat_nxm: values.clone(),
        z_bounds,
    }
}

pub(crate) fn check_shape(grid: &Grid, shape: (usize, usize)) -> FsoResult<()> {
    let n = grid.resolution();
    if shape == (n, n) {
        Ok(())
    } else {
        Err(FsoError::InvalidParameter(format!(
            "matrix shape {shape:?} does not match the {n}x{n} grid"
        )))
    }
}
