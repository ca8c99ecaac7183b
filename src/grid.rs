#![warn(missing_docs)]
//! Square, evenly spaced sampling grid for field evaluations
use crate::{
    error::{FsoError, FsoResult},
    utils::{centered_index_to_f64, usize_to_f64},
};
use nalgebra::{DMatrix, DVector};
use num::Zero;
use serde::{Deserialize, Serialize};
use uom::si::{f64::Length, length::meter};

/// Square, evenly spaced sampling grid centered on the optical axis.
///
/// A grid with resolution `N` and half width `W` has the spacing `dx = 2W/N`. The axis
/// coordinates are `c_i = (i - N/2) * dx` (integer division), so the sample
/// ([`Grid::center_index`], [`Grid::center_index`]) always lies exactly on the origin.
/// Matrices created on a grid use the row index for y and the column index for x.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Copy)]
pub struct Grid {
    resolution: usize,
    half_width: Length,
}

impl Grid {
    /// Create a new [`Grid`].
    ///
    /// # Errors
    ///
    /// This function will return an [`FsoError::InvalidParameter`] if
    ///  - the resolution is zero.
    ///  - the half width is not positive or not finite.
    pub fn new(resolution: usize, half_width: Length) -> FsoResult<Self> {
        if resolution.is_zero() {
            return Err(FsoError::InvalidParameter(
                "grid resolution must be > 0".into(),
            ));
        }
        if !half_width.is_normal() || half_width.is_sign_negative() {
            return Err(FsoError::InvalidParameter(
                "grid half width must be > 0 and finite".into(),
            ));
        }
        Ok(Self {
            resolution,
            half_width,
        })
    }
    /// Returns the number of samples along each axis.
    #[must_use]
    pub const fn resolution(&self) -> usize {
        self.resolution
    }
    /// Returns the physical half width of this [`Grid`].
    #[must_use]
    pub const fn half_width(&self) -> Length {
        self.half_width
    }
    /// Returns the distance between two neighboring samples.
    #[must_use]
    pub fn spacing(&self) -> Length {
        2.0 * self.half_width / usize_to_f64(self.resolution)
    }
    /// Returns the row / column index of the sample located on the origin.
    #[must_use]
    pub const fn center_index(&self) -> usize {
        self.resolution / 2
    }
    /// Returns the axis coordinates (in meters). Identical for x and y.
    #[must_use]
    pub fn axis(&self) -> DVector<f64> {
        let dx = self.spacing().get::<meter>();
        let center = self.center_index();
        DVector::from_fn(self.resolution, |i, _| centered_index_to_f64(i, center) * dx)
    }
    /// Returns the cartesian coordinates (x, y) in meters of the sample at (`row`, `col`).
    #[must_use]
    pub fn cartesian(&self, row: usize, col: usize) -> (f64, f64) {
        let dx = self.spacing().get::<meter>();
        let center = self.center_index();
        (
            centered_index_to_f64(col, center) * dx,
            centered_index_to_f64(row, center) * dx,
        )
    }
    /// Returns the polar coordinates (radius in meters, angle in radians) of the sample at (`row`, `col`).
    ///
    /// The angle is measured counter-clockwise from the positive x axis and lies in (-π, π].
    #[must_use]
    pub fn polar(&self, row: usize, col: usize) -> (f64, f64) {
        let (x, y) = self.cartesian(row, col);
        cartesian_to_polar(x, y)
    }
    /// Returns a matrix of the radius of every sample (in meters).
    #[must_use]
    pub fn radius_map(&self) -> DMatrix<f64> {
        DMatrix::from_fn(self.resolution, self.resolution, |row, col| {
            self.polar(row, col).0
        })
    }
    /// Returns a matrix of the polar angle of every sample (in radians).
    #[must_use]
    pub fn angle_map(&self) -> DMatrix<f64> {
        DMatrix::from_fn(self.resolution, self.resolution, |row, col| {
            self.polar(row, col).1
        })
    }
}

/// Convert cartesian coordinates into polar coordinates (radius, angle).
#[must_use]
pub fn cartesian_to_polar(x: f64, y: f64) -> (f64, f64) {
    (x.hypot(y), y.atan2(x))
}

/// Convert polar coordinates (radius, angle) into cartesian coordinates (x, y).
#[must_use]
pub fn polar_to_cartesian(radius: f64, angle: f64) -> (f64, f64) {
    let (sin, cos) = angle.sin_cos();
    (radius * cos, radius * sin)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{meter, millimeter};
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;
    use std::f64::consts::PI;
    #[test]
    fn new() {
        let grid = Grid::new(256, millimeter!(5.0)).unwrap();
        assert_eq!(grid.resolution(), 256);
        assert_eq!(grid.half_width(), millimeter!(5.0));
    }
    #[test]
    fn new_wrong() {
        assert_matches!(
            Grid::new(0, millimeter!(5.0)),
            Err(FsoError::InvalidParameter(_))
        );
        assert!(Grid::new(10, millimeter!(0.0)).is_err());
        assert!(Grid::new(10, millimeter!(-1.0)).is_err());
        assert!(Grid::new(10, millimeter!(f64::NAN)).is_err());
        assert!(Grid::new(10, millimeter!(f64::INFINITY)).is_err());
    }
    #[test]
    fn spacing() {
        let grid = Grid::new(100, millimeter!(5.0)).unwrap();
        assert_abs_diff_eq!(grid.spacing().get::<meter>(), 1.0e-4);
    }
    #[test]
    fn axis_even() {
        let grid = Grid::new(4, meter!(2.0)).unwrap();
        assert_eq!(grid.center_index(), 2);
        assert_eq!(grid.axis().as_slice(), &[-2.0, -1.0, 0.0, 1.0]);
    }
    #[test]
    fn axis_odd() {
        let grid = Grid::new(5, meter!(2.5)).unwrap();
        assert_eq!(grid.center_index(), 2);
        assert_eq!(grid.axis().as_slice(), &[-2.0, -1.0, 0.0, 1.0, 2.0]);
    }
    #[test]
    fn single_sample() {
        let grid = Grid::new(1, meter!(1.0)).unwrap();
        assert_eq!(grid.axis().as_slice(), &[0.0]);
        assert_eq!(grid.polar(0, 0).0, 0.0);
    }
    #[test]
    fn center_is_origin() {
        for resolution in [1, 2, 7, 256, 1023] {
            let grid = Grid::new(resolution, millimeter!(5.0)).unwrap();
            let c = grid.center_index();
            assert_eq!(grid.cartesian(c, c), (0.0, 0.0));
        }
    }
    #[test]
    fn cartesian_rows_are_y() {
        let grid = Grid::new(4, meter!(2.0)).unwrap();
        assert_eq!(grid.cartesian(0, 3), (1.0, -2.0));
    }
    #[test]
    fn polar() {
        let grid = Grid::new(4, meter!(2.0)).unwrap();
        let (r, phi) = grid.polar(3, 3);
        assert_abs_diff_eq!(r, 2.0f64.sqrt());
        assert_abs_diff_eq!(phi, PI / 4.0);
        let (r, phi) = grid.polar(2, 1);
        assert_abs_diff_eq!(r, 1.0);
        assert_abs_diff_eq!(phi, PI);
    }
    #[test]
    fn maps() {
        let grid = Grid::new(3, meter!(1.5)).unwrap();
        let radius = grid.radius_map();
        let angle = grid.angle_map();
        assert_eq!(radius.shape(), (3, 3));
        assert_eq!(radius[(1, 1)], 0.0);
        assert_abs_diff_eq!(radius[(0, 0)], 2.0f64.sqrt());
        assert_abs_diff_eq!(angle[(1, 2)], 0.0);
        assert_abs_diff_eq!(angle[(2, 1)], PI / 2.0);
    }
    #[test]
    fn polar_roundtrip() {
        let (x, y) = polar_to_cartesian(2.0, -PI / 3.0);
        let (r, phi) = cartesian_to_polar(x, y);
        assert_abs_diff_eq!(r, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(phi, -PI / 3.0, epsilon = 1e-12);
    }
}
