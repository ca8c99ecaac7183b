#![warn(missing_docs)]
//! Angular apertures ("films") with a partial transmittance outside of a circular sector.
use std::f64::consts::PI;

use nalgebra::DMatrix;
use uom::si::{
    angle::radian,
    f64::{Angle, Length},
    length::meter,
};

use crate::{
    error::{FsoError, FsoResult},
    field::{check_shape, color_mesh},
    grid::Grid,
    millimeter,
    plottable::{AxLims, CGradient, PlotConfig, PlotData, Plottable},
    radian,
};

/// Circular sector of full transmittance, surrounded by a region of reduced transmittance.
///
/// A sample at polar position (r, θ) is fully transmitted if `r <= radius` and θ lies within
/// the sector running counter-clockwise from `start_angle` to `end_angle`. All other samples are
/// attenuated by `transmittance`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectorMask {
    radius: Length,
    start_angle: Angle,
    end_angle: Angle,
    transmittance: f64,
}

impl Default for SectorMask {
    /// Opaque everywhere except the first quadrant within a radius of 20 mm.
    fn default() -> Self {
        Self {
            radius: millimeter!(20.0),
            start_angle: radian!(0.0),
            end_angle: radian!(PI / 2.0),
            transmittance: 0.0,
        }
    }
}

impl SectorMask {
    /// Creates a new [`SectorMask`].
    ///
    /// # Errors
    ///
    /// This function will return an [`FsoError::InvalidParameter`] if
    ///  - the radius is not positive or not finite.
    ///  - one of the angles is not finite.
    ///  - the end angle is not larger than the start angle or the sector spans more than a full turn.
    ///  - the transmittance is outside the interval [0.0, 1.0].
    pub fn new(
        radius: Length,
        start_angle: Angle,
        end_angle: Angle,
        transmittance: f64,
    ) -> FsoResult<Self> {
        if !radius.is_normal() || radius.is_sign_negative() {
            return Err(FsoError::InvalidParameter(
                "mask radius must be > 0 and finite".into(),
            ));
        }
        if !start_angle.is_finite() || !end_angle.is_finite() {
            return Err(FsoError::InvalidParameter(
                "sector angles must be finite".into(),
            ));
        }
        let width = (end_angle - start_angle).get::<radian>();
        if width <= 0.0 || width > 2.0 * PI {
            return Err(FsoError::InvalidParameter(
                "sector end angle must be larger than its start angle and span at most a full turn"
                    .into(),
            ));
        }
        if !(0.0..=1.0).contains(&transmittance) {
            return Err(FsoError::InvalidParameter(
                "transmittance must be within the range [0.0, 1.0]".into(),
            ));
        }
        Ok(Self {
            radius,
            start_angle,
            end_angle,
            transmittance,
        })
    }
    /// Returns the radius of the transmitting sector.
    #[must_use]
    pub const fn radius(&self) -> Length {
        self.radius
    }
    /// Returns the start and end angle of the transmitting sector.
    #[must_use]
    pub const fn angles(&self) -> (Angle, Angle) {
        (self.start_angle, self.end_angle)
    }
    /// Returns the transmittance outside the sector.
    #[must_use]
    pub const fn transmittance(&self) -> f64 {
        self.transmittance
    }
    /// Returns the transmittance at the given polar position (radius in meters, angle in radians).
    #[must_use]
    pub fn transmittance_at(&self, radius: f64, angle: f64) -> f64 {
        let start = self.start_angle.get::<radian>();
        let width = (self.end_angle - self.start_angle).get::<radian>();
        let inside =
            radius <= self.radius.get::<meter>() && (angle - start).rem_euclid(2.0 * PI) <= width;
        if inside {
            1.0
        } else {
            self.transmittance
        }
    }
    /// Sample this [`SectorMask`] on the given [`Grid`].
    #[must_use]
    pub fn create(&self, grid: &Grid) -> TransmittanceMap {
        let n = grid.resolution();
        let values = DMatrix::from_fn(n, n, |row, col| {
            let (radius, angle) = grid.polar(row, col);
            self.transmittance_at(radius, angle)
        });
        TransmittanceMap {
            grid: *grid,
            values,
        }
    }
}

/// Transmittance values in the range [0.0, 1.0] on every sample of a [`Grid`].
#[derive(Clone, Debug, PartialEq)]
pub struct TransmittanceMap {
    grid: Grid,
    values: DMatrix<f64>,
}

impl TransmittanceMap {
    /// Creates a new [`TransmittanceMap`].
    ///
    /// # Errors
    ///
    /// This function will return an [`FsoError::InvalidParameter`] if the matrix does not match the [`Grid`]
    /// or contains values outside the range [0.0, 1.0].
    pub fn new(grid: Grid, values: DMatrix<f64>) -> FsoResult<Self> {
        check_shape(&grid, values.shape())?;
        if values.iter().any(|t| !(0.0..=1.0).contains(t)) {
            return Err(FsoError::InvalidParameter(
                "transmittance values must be within the range [0.0, 1.0]".into(),
            ));
        }
        Ok(Self { grid, values })
    }
    /// Returns the [`Grid`] of this [`TransmittanceMap`].
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }
    /// Returns a reference to the transmittance values.
    #[must_use]
    pub const fn values(&self) -> &DMatrix<f64> {
        &self.values
    }
}

impl Plottable for TransmittanceMap {
    fn plot_data(&self) -> FsoResult<PlotData> {
        Ok(color_mesh(
            &self.grid,
            &self.values,
            Some(AxLims { min: 0.0, max: 1.0 }),
        ))
    }
    fn plot_config(&self) -> PlotConfig {
        PlotConfig::default()
            .with_cmap(CGradient::new(colorous::GREYS))
            .with_cbar_label("transmittance")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{degree, meter, utils::test_helper::test_helper::check_plot};
    use assert_matches::assert_matches;
    #[test]
    fn default() {
        let m = SectorMask::default();
        assert_eq!(m.radius(), millimeter!(20.0));
        assert_eq!(m.angles(), (radian!(0.0), radian!(PI / 2.0)));
        assert_eq!(m.transmittance(), 0.0);
    }
    #[test]
    fn new() {
        let m = SectorMask::new(millimeter!(2.0), degree!(10.0), degree!(80.0), 0.3).unwrap();
        assert_eq!(m.radius(), millimeter!(2.0));
        assert_eq!(m.transmittance(), 0.3);
    }
    #[test]
    fn new_wrong() {
        let (start, end) = (degree!(0.0), degree!(90.0));
        assert_matches!(
            SectorMask::new(millimeter!(0.0), start, end, 0.0),
            Err(FsoError::InvalidParameter(_))
        );
        assert!(SectorMask::new(millimeter!(-1.0), start, end, 0.0).is_err());
        assert!(SectorMask::new(millimeter!(f64::INFINITY), start, end, 0.0).is_err());
        assert!(SectorMask::new(millimeter!(1.0), degree!(f64::NAN), end, 0.0).is_err());
        assert!(SectorMask::new(millimeter!(1.0), end, start, 0.0).is_err());
        assert!(SectorMask::new(millimeter!(1.0), start, start, 0.0).is_err());
        assert!(SectorMask::new(millimeter!(1.0), start, degree!(361.0), 0.0).is_err());
        assert!(SectorMask::new(millimeter!(1.0), start, end, -0.1).is_err());
        assert!(SectorMask::new(millimeter!(1.0), start, end, 1.1).is_err());
        assert!(SectorMask::new(millimeter!(1.0), start, end, f64::NAN).is_err());
    }
    #[test]
    fn transmittance_at() {
        let m = SectorMask::new(meter!(1.0), radian!(0.0), radian!(PI / 2.0), 0.25).unwrap();
        assert_eq!(m.transmittance_at(0.5, PI / 4.0), 1.0);
        assert_eq!(m.transmittance_at(0.5, 0.0), 1.0);
        assert_eq!(m.transmittance_at(1.0, PI / 2.0), 1.0);
        assert_eq!(m.transmittance_at(1.5, PI / 4.0), 0.25);
        assert_eq!(m.transmittance_at(0.5, -PI / 4.0), 0.25);
        assert_eq!(m.transmittance_at(0.5, PI), 0.25);
    }
    #[test]
    fn sector_across_negative_x_axis() {
        let m = SectorMask::new(meter!(1.0), degree!(135.0), degree!(225.0), 0.0).unwrap();
        assert_eq!(m.transmittance_at(0.5, PI), 1.0);
        assert_eq!(m.transmittance_at(0.5, -0.9 * PI), 1.0);
        assert_eq!(m.transmittance_at(0.5, 0.0), 0.0);
    }
    #[test]
    fn create() {
        let grid = Grid::new(5, meter!(2.5)).unwrap();
        let m = SectorMask::new(meter!(1.5), degree!(0.0), degree!(90.0), 0.5).unwrap();
        let map = m.create(&grid);
        assert_eq!(map.grid(), &grid);
        assert_eq!(map.values().shape(), (5, 5));
        // origin and first quadrant
        assert_eq!(map.values()[(2, 2)], 1.0);
        assert_eq!(map.values()[(3, 3)], 1.0);
        // first quadrant but outside the radius
        assert_eq!(map.values()[(4, 4)], 0.5);
        // other quadrants
        assert_eq!(map.values()[(1, 1)], 0.5);
        assert_eq!(map.values()[(1, 3)], 0.5);
        assert!(map.values().iter().all(|t| (0.0..=1.0).contains(t)));
    }
    #[test]
    fn transmittance_map_new() {
        let grid = Grid::new(2, meter!(1.0)).unwrap();
        assert!(TransmittanceMap::new(grid, DMatrix::from_element(2, 2, 0.5)).is_ok());
        assert_matches!(
            TransmittanceMap::new(grid, DMatrix::from_element(2, 2, 1.5)),
            Err(FsoError::InvalidParameter(_))
        );
        assert!(TransmittanceMap::new(grid, DMatrix::from_element(3, 2, 0.5)).is_err());
    }
    #[test]
    fn to_plot() {
        let dir = tempfile::TempDir::new().unwrap();
        let grid = Grid::new(32, millimeter!(4.0)).unwrap();
        let map = SectorMask::new(millimeter!(3.0), degree!(30.0), degree!(300.0), 0.2)
            .unwrap()
            .create(&grid);
        assert_eq!(map.plot_config().cbar_label(), "transmittance");
        let path = dir.path().join("mask.png");
        check_plot(map.to_plot(&path, &map.plot_config()), &path);
    }
}
