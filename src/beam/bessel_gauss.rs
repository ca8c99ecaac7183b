use std::f64::consts::PI;

use log::{info, warn};
use nalgebra::DMatrix;
use num::complex::Complex64;
use uom::si::{f64::Length, length::meter};

use super::{BeamKind, BeamParameters};
use crate::{
    field::ComplexField,
    grid::{cartesian_to_polar, Grid},
    utils::special_functions::{bessel_i_scaled, bessel_jn},
};

/// Radial part of the field, resolved once from the [`BeamKind`].
#[derive(Clone, Copy, Debug)]
enum RadialProfile {
    Ordinary {
        transverse_wave_number: f64,
    },
    Modified {
        lower_order: f64,
        upper_order: f64,
        prefactor: Complex64,
    },
}

/// Bessel-Gauss beam carrying an orbital angular momentum of `ℓħ` per photon.
///
/// The beam is evaluated in a transverse plane at the propagation distance given in its
/// [`BeamParameters`].
#[derive(Clone, Debug)]
pub struct BesselGaussBeam {
    params: BeamParameters,
    beam_width: f64,
    profile: RadialProfile,
}

impl BesselGaussBeam {
    /// Creates a new [`BesselGaussBeam`].
    #[must_use]
    pub fn new(params: BeamParameters) -> Self {
        let optical = params.optical_parameters();
        let charge = f64::from(params.charge());
        let profile = match params.kind() {
            BeamKind::OrdinaryBessel => RadialProfile::Ordinary {
                transverse_wave_number: optical.transverse_wave_number,
            },
            BeamKind::ModifiedBessel => {
                let z = params.propagation_distance().get::<meter>();
                let waist = params.waist().get::<meter>();
                let phase =
                    z / optical.rayleigh_range + 1.5 * PI * charge + optical.wave_number * z;
                RadialProfile::Modified {
                    lower_order: (charge - 1.0) / 2.0,
                    upper_order: (charge + 1.0) / 2.0,
                    prefactor: Complex64::from_polar(PI.sqrt() / waist, phase),
                }
            }
        };
        Self {
            params,
            beam_width: optical.beam_width,
            profile,
        }
    }
    /// Returns the [`BeamParameters`] of this [`BesselGaussBeam`].
    #[must_use]
    pub const fn parameters(&self) -> &BeamParameters {
        &self.params
    }
    /// Evaluate the complex field at the cartesian position (`x`, `y`).
    #[must_use]
    pub fn field_at(&self, x: Length, y: Length) -> Complex64 {
        let (radius, angle) = cartesian_to_polar(x.get::<meter>(), y.get::<meter>());
        self.field_at_polar(radius, angle)
    }
    /// Evaluate the complex field at the polar position (`radius` in meters, `angle` in radians).
    #[must_use]
    pub fn field_at_polar(&self, radius: f64, angle: f64) -> Complex64 {
        let vortex = Complex64::from_polar(1.0, f64::from(self.params.charge()) * angle);
        let w2 = self.beam_width * self.beam_width;
        match self.profile {
            RadialProfile::Ordinary {
                transverse_wave_number,
            } => {
                let radial = bessel_jn(self.params.charge(), transverse_wave_number * radius);
                vortex * radial * (-radius * radius / w2).exp()
            }
            RadialProfile::Modified {
                lower_order,
                upper_order,
                prefactor,
            } => {
                // exp(-2x) = exp(-x) from the scaled Bessel functions times exp(-x)
                let x = radius * radius / (2.0 * w2);
                let radial = bessel_i_scaled(lower_order, x) - bessel_i_scaled(upper_order, x);
                prefactor * vortex * (radial * radius * (-x).exp())
            }
        }
    }
    /// Evaluate the complex field on every sample of the given [`Grid`].
    ///
    /// Samples where the closed form is singular (the origin for a [`BeamKind::ModifiedBessel`] beam
    /// with even charge `ℓ ≤ 0`) are returned as NaN and a warning is logged.
    #[must_use]
    pub fn evaluate(&self, grid: &Grid) -> ComplexField {
        let n = grid.resolution();
        info!(
            "evaluating {} beam with charge {} on a {n}x{n} grid",
            self.params.kind(),
            self.params.charge()
        );
        if let RadialProfile::Ordinary {
            transverse_wave_number,
        } = self.profile
        {
            if transverse_wave_number * grid.spacing().get::<meter>() > PI {
                warn!("grid spacing too coarse, radial rings of the beam are undersampled");
            }
        }
        let values = DMatrix::from_fn(n, n, |row, col| {
            let (radius, angle) = grid.polar(row, col);
            self.field_at_polar(radius, angle)
        });
        let c = grid.center_index();
        if !values[(c, c)].is_finite() {
            warn!(
                "field of {} beam with charge {} is singular on the optical axis",
                self.params.kind(),
                self.params.charge()
            );
        }
        ComplexField::from_parts(*grid, values)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        meter, millimeter, nanometer,
        utils::test_helper::test_helper::{check_logs, check_warnings},
    };
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use log::Level;

    fn beam(kind: BeamKind, charge: i32) -> BesselGaussBeam {
        BesselGaussBeam::new(
            BeamParameters::new(kind, charge, millimeter!(1.0), nanometer!(633.0)).unwrap(),
        )
    }
    fn winding(beam: &BesselGaussBeam, radius: f64, steps: usize) -> f64 {
        let mut total = 0.0;
        let mut last = beam.field_at_polar(radius, 0.0).arg();
        for i in 1..=steps {
            let angle = 2.0 * PI * i as f64 / steps as f64;
            let phase = beam.field_at_polar(radius, angle).arg();
            let mut diff = phase - last;
            if diff > PI {
                diff -= 2.0 * PI;
            } else if diff < -PI {
                diff += 2.0 * PI;
            }
            total += diff;
            last = phase;
        }
        total
    }
    #[test]
    fn new() {
        let b = beam(BeamKind::ModifiedBessel, 3);
        assert_eq!(b.parameters().charge(), 3);
        assert_eq!(b.parameters().kind(), BeamKind::ModifiedBessel);
        assert_relative_eq!(b.beam_width, 1.0e-3);
    }
    #[test]
    fn vortex_null_ordinary() {
        for charge in [-4, -1, 1, 2, 7] {
            let b = beam(BeamKind::OrdinaryBessel, charge);
            assert_eq!(b.field_at(millimeter!(0.0), millimeter!(0.0)).norm(), 0.0);
        }
        let b = beam(BeamKind::OrdinaryBessel, 0);
        assert_abs_diff_eq!(b.field_at(millimeter!(0.0), millimeter!(0.0)).re, 1.0);
    }
    #[test]
    fn vortex_null_modified() {
        for charge in [-3, -1, 1, 2, 5] {
            let b = beam(BeamKind::ModifiedBessel, charge);
            let value = b.field_at(millimeter!(0.0), millimeter!(0.0));
            assert!(value.is_finite(), "charge {charge}");
            assert_eq!(value.norm(), 0.0, "charge {charge}");
        }
    }
    #[test]
    fn singular_origin_modified() {
        for charge in [0, -2, -4] {
            let b = beam(BeamKind::ModifiedBessel, charge);
            assert!(b.field_at(millimeter!(0.0), millimeter!(0.0)).is_nan());
            assert!(b.field_at(millimeter!(0.5), millimeter!(0.0)).is_finite());
        }
    }
    #[test]
    fn phase_winding() {
        for (kind, charge) in [
            (BeamKind::OrdinaryBessel, 1),
            (BeamKind::OrdinaryBessel, 3),
            (BeamKind::OrdinaryBessel, -2),
            (BeamKind::ModifiedBessel, 1),
            (BeamKind::ModifiedBessel, 2),
            (BeamKind::ModifiedBessel, -3),
        ] {
            let b = beam(kind, charge);
            assert_abs_diff_eq!(
                winding(&b, 1.0e-3, 360),
                2.0 * PI * f64::from(charge),
                epsilon = 1e-9
            );
        }
    }
    #[test]
    fn phase_on_circle() {
        let b = beam(BeamKind::OrdinaryBessel, 1);
        let phases: Vec<f64> = (0..8)
            .map(|i| b.field_at_polar(2.0e-3, f64::from(i) * PI / 4.0).arg())
            .collect();
        for pair in phases.windows(2) {
            let step = (pair[1] - pair[0]).rem_euclid(2.0 * PI);
            assert_abs_diff_eq!(step, PI / 4.0, epsilon = 1e-9);
        }
    }
    #[test]
    fn gaussian_envelope() {
        let b = beam(BeamKind::OrdinaryBessel, 0);
        let value = b.field_at_polar(1.0e-3, 0.3);
        let kt = b.parameters().optical_parameters().transverse_wave_number;
        assert_relative_eq!(
            value.norm(),
            (bessel_jn(0, kt * 1.0e-3) * (-1.0f64).exp()).abs(),
            max_relative = 1e-12
        );
    }
    #[test]
    fn modified_far_field_decays() {
        let b = beam(BeamKind::ModifiedBessel, 4);
        let near = b.field_at_polar(1.0e-3, 0.0).norm();
        let far = b.field_at_polar(20.0e-3, 0.0).norm();
        assert!(far.is_finite());
        assert!(far < near * 1e-10);
    }
    #[test]
    fn modified_prefactor_phase() {
        let params = BeamParameters::new(
            BeamKind::ModifiedBessel,
            1,
            millimeter!(1.0),
            nanometer!(633.0),
        )
        .unwrap();
        let at_waist = BesselGaussBeam::new(params);
        let moved =
            BesselGaussBeam::new(params.with_propagation_distance(millimeter!(10.0)).unwrap());
        assert!(at_waist.field_at_polar(1.0e-3, 0.0).is_finite());
        assert!(moved.field_at_polar(1.0e-3, 0.0).is_finite());
        assert!(moved.beam_width > at_waist.beam_width);
    }
    #[test]
    fn evaluate() {
        testing_logger::setup();
        let b = beam(BeamKind::OrdinaryBessel, 1);
        let grid = Grid::new(128, millimeter!(5.0)).unwrap();
        let field = b.evaluate(&grid);
        assert_eq!(field.values().shape(), (128, 128));
        assert_eq!(field.value_at(64, 64).unwrap().norm(), 0.0);
        let (x, y) = grid.cartesian(10, 70);
        assert_eq!(
            field.value_at(10, 70),
            Some(b.field_at(meter!(x), meter!(y)))
        );
        check_logs(
            Level::Info,
            vec!["evaluating ordinary Bessel (Jv) beam with charge 1 on a 128x128 grid"],
        );
        check_warnings(vec![]);
    }
    #[test]
    fn evaluate_undersampled() {
        testing_logger::setup();
        let b = beam(BeamKind::OrdinaryBessel, 1);
        let grid = Grid::new(4, millimeter!(5.0)).unwrap();
        let _ = b.evaluate(&grid);
        check_warnings(vec![
            "grid spacing too coarse, radial rings of the beam are undersampled",
        ]);
    }
    #[test]
    fn evaluate_singular() {
        testing_logger::setup();
        let b = beam(BeamKind::ModifiedBessel, -2);
        let grid = Grid::new(9, millimeter!(5.0)).unwrap();
        let field = b.evaluate(&grid);
        assert!(field.value_at(4, 4).unwrap().is_nan());
        assert!(field.value_at(0, 0).unwrap().is_finite());
        check_warnings(vec![
            "field of modified Bessel (Iv) beam with charge -2 is singular on the optical axis",
        ]);
    }
}
