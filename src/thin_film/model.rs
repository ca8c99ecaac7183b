use std::f64::consts::PI;

use log::info;
use nalgebra::{Matrix2, Vector2};
use num::{complex::Complex64, Zero};
use uom::si::{
    angle::{degree, radian},
    f64::{Angle, Length},
    length::{meter, nanometer},
};

use super::{
    layer::{check_refractive_index, LayerStack},
    spectrum::{AngleSweep, FilmSpectrum, SweepVariable, WavelengthSweep},
    Polarization,
};
use crate::error::{FsoError, FsoResult};

/// Reflectance and transmittance of a stack at a single wavelength and angle of incidence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RtPair {
    reflectance: f64,
    transmittance: f64,
}

impl RtPair {
    pub(super) const fn from_values(reflectance: f64, transmittance: f64) -> Self {
        Self {
            reflectance,
            transmittance,
        }
    }
    /// Returns the (power) reflectance.
    #[must_use]
    pub const fn reflectance(&self) -> f64 {
        self.reflectance
    }
    /// Returns the (power) transmittance into the substrate.
    #[must_use]
    pub const fn transmittance(&self) -> f64 {
        self.transmittance
    }
    /// Returns the absorptance `1 - R - T`.
    #[must_use]
    pub fn absorptance(&self) -> f64 {
        1.0 - self.reflectance - self.transmittance
    }
    pub(super) fn lerp(&self, other: &Self, ratio: f64) -> Self {
        Self {
            reflectance: (other.reflectance - self.reflectance).mul_add(ratio, self.reflectance),
            transmittance: (other.transmittance - self.transmittance)
                .mul_add(ratio, self.transmittance),
        }
    }
}

/// Surrounding media, angle of incidence and polarization of a thin-film calculation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThinFilmModel {
    ambient: f64,
    substrate: Complex64,
    incidence_angle: Angle,
    polarization: Polarization,
}

impl ThinFilmModel {
    /// Creates a new [`ThinFilmModel`] for normal incidence of unpolarized light.
    ///
    /// The light is incident from a lossless ambient medium with refractive index `ambient` and is
    /// transmitted into a substrate with refractive index `n + iκ`.
    ///
    /// # Errors
    ///
    /// This function will return an [`FsoError::InvalidParameter`] if
    ///  - the ambient index is not positive or not finite.
    ///  - the substrate index is not finite, `n <= 0` or `κ < 0`.
    pub fn new(ambient: f64, substrate: Complex64) -> FsoResult<Self> {
        if !ambient.is_normal() || ambient.is_sign_negative() {
            return Err(FsoError::InvalidParameter(
                "ambient refractive index must be > 0 and finite".into(),
            ));
        }
        check_refractive_index(substrate)?;
        Ok(Self {
            ambient,
            substrate,
            incidence_angle: Angle::zero(),
            polarization: Polarization::default(),
        })
    }
    /// Returns this model with a different angle of incidence (measured in the ambient medium).
    ///
    /// # Errors
    ///
    /// This function will return an [`FsoError::InvalidParameter`] if the angle is not within [0°, 90°).
    pub fn with_incidence_angle(mut self, angle: Angle) -> FsoResult<Self> {
        check_incidence_angle(angle)?;
        self.incidence_angle = angle;
        Ok(self)
    }
    /// Returns this model with a different [`Polarization`].
    #[must_use]
    pub const fn with_polarization(mut self, polarization: Polarization) -> Self {
        self.polarization = polarization;
        self
    }
    /// Returns the refractive index of the ambient medium.
    #[must_use]
    pub const fn ambient(&self) -> f64 {
        self.ambient
    }
    /// Returns the refractive index `n + iκ` of the substrate.
    #[must_use]
    pub const fn substrate(&self) -> Complex64 {
        self.substrate
    }
    /// Returns the angle of incidence.
    #[must_use]
    pub const fn incidence_angle(&self) -> Angle {
        self.incidence_angle
    }
    /// Returns the [`Polarization`] of the incident light.
    #[must_use]
    pub const fn polarization(&self) -> Polarization {
        self.polarization
    }
    /// Calculate reflectance and transmittance of the given [`LayerStack`] at a single wavelength.
    ///
    /// # Errors
    ///
    /// This function will return
    ///  - an [`FsoError::InvalidParameter`] if the wavelength is not positive or not finite.
    ///  - an [`FsoError::NumericalInstability`] if the calculation produced non-finite values.
    pub fn evaluate_at(&self, stack: &LayerStack, wavelength: Length) -> FsoResult<RtPair> {
        check_wavelength(wavelength)?;
        self.rt_pair(
            stack,
            wavelength.get::<meter>(),
            self.incidence_angle.get::<radian>(),
        )
    }
    /// Calculate the reflectance and transmittance spectrum of the given [`LayerStack`].
    ///
    /// # Errors
    ///
    /// This function will return an [`FsoError::NumericalInstability`] if the calculation produced non-finite
    /// values for one of the wavelengths.
    pub fn spectrum(&self, stack: &LayerStack, sweep: &WavelengthSweep) -> FsoResult<FilmSpectrum> {
        info!(
            "calculating {} spectrum of a stack with {} layer(s) at {} wavelengths",
            self.polarization,
            stack.len(),
            sweep.len()
        );
        let angle = self.incidence_angle.get::<radian>();
        let data = sweep
            .wavelengths()
            .into_iter()
            .map(|wavelength| {
                let rt = self.rt_pair(stack, wavelength.get::<meter>(), angle)?;
                Ok((wavelength.get::<nanometer>(), rt))
            })
            .collect::<FsoResult<Vec<(f64, RtPair)>>>()?;
        Ok(FilmSpectrum::new(SweepVariable::Wavelength, data))
    }
    /// Calculate reflectance and transmittance of the given [`LayerStack`] for a sweep of incidence angles.
    ///
    /// # Errors
    ///
    /// This function will return
    ///  - an [`FsoError::InvalidParameter`] if the wavelength is not positive or not finite.
    ///  - an [`FsoError::NumericalInstability`] if the calculation produced non-finite values for one of the angles.
    pub fn angular_spectrum(
        &self,
        stack: &LayerStack,
        wavelength: Length,
        sweep: &AngleSweep,
    ) -> FsoResult<FilmSpectrum> {
        check_wavelength(wavelength)?;
        info!(
            "calculating {} angular spectrum of a stack with {} layer(s) at {} angles",
            self.polarization,
            stack.len(),
            sweep.len()
        );
        let wavelength = wavelength.get::<meter>();
        let data = sweep
            .angles()
            .into_iter()
            .map(|angle| {
                let rt = self.rt_pair(stack, wavelength, angle.get::<radian>())?;
                Ok((angle.get::<degree>(), rt))
            })
            .collect::<FsoResult<Vec<(f64, RtPair)>>>()?;
        Ok(FilmSpectrum::new(SweepVariable::IncidenceAngle, data))
    }
    fn rt_pair(&self, stack: &LayerStack, wavelength: f64, angle: f64) -> FsoResult<RtPair> {
        match self.polarization {
            Polarization::S | Polarization::P => {
                self.polarized_rt_pair(stack, wavelength, angle, self.polarization)
            }
            Polarization::Unpolarized => {
                let s = self.polarized_rt_pair(stack, wavelength, angle, Polarization::S)?;
                let p = self.polarized_rt_pair(stack, wavelength, angle, Polarization::P)?;
                Ok(s.lerp(&p, 0.5))
            }
        }
    }
    fn polarized_rt_pair(
        &self,
        stack: &LayerStack,
        wavelength: f64,
        angle: f64,
        polarization: Polarization,
    ) -> FsoResult<RtPair> {
        // n0 sin(θ0) is conserved through all layers
        let tangential = self.ambient * angle.sin();
        let ambient = Complex64::new(self.ambient, 0.0);
        let eta_0 = tilted_admittance(
            ambient,
            normal_component(ambient, tangential),
            polarization,
        );
        let substrate = self.substrate.conj();
        let eta_s = tilted_admittance(
            substrate,
            normal_component(substrate, tangential),
            polarization,
        );
        let mut product = Matrix2::<Complex64>::identity();
        for (thickness, index) in stack.raw_layers() {
            product *= characteristic_matrix(
                thickness,
                index.conj(),
                wavelength,
                tangential,
                polarization,
            );
            if product.iter().any(|m| !m.is_finite()) {
                return Err(FsoError::NumericalInstability(
                    "characteristic matrix of the stack is not finite".into(),
                ));
            }
        }
        let bc = product * Vector2::new(Complex64::new(1.0, 0.0), eta_s);
        let denominator = eta_0 * bc[0] + bc[1];
        let r = (eta_0 * bc[0] - bc[1]) / denominator;
        let reflectance = r.norm_sqr();
        let transmittance = 4.0 * eta_0.re * eta_s.re / denominator.norm_sqr();
        if !reflectance.is_finite() || !transmittance.is_finite() {
            return Err(FsoError::NumericalInstability(
                "reflectance or transmittance of the stack is not finite".into(),
            ));
        }
        Ok(RtPair::from_values(reflectance, transmittance))
    }
}

/// `N cos θ` of a medium with (internal) index `N = n - iκ` for the conserved tangential component `n0 sin θ0`.
///
/// The branch is chosen such that the imaginary part is not positive (decaying or evanescent wave).
fn normal_component(index: Complex64, tangential: f64) -> Complex64 {
    let q = (index * index - tangential * tangential).sqrt();
    if q.im > 0.0 {
        -q
    } else {
        q
    }
}

fn tilted_admittance(index: Complex64, normal: Complex64, polarization: Polarization) -> Complex64 {
    match polarization {
        Polarization::P => index * index / normal,
        _ => normal,
    }
}

fn characteristic_matrix(
    thickness: f64,
    index: Complex64,
    wavelength: f64,
    tangential: f64,
    polarization: Polarization,
) -> Matrix2<Complex64> {
    if thickness.is_zero() {
        return Matrix2::identity();
    }
    let normal = normal_component(index, tangential);
    let eta = tilted_admittance(index, normal, polarization);
    let delta = normal * (2.0 * PI * thickness / wavelength);
    let (sin, cos) = (delta.sin(), delta.cos());
    let i = Complex64::i();
    Matrix2::new(cos, i * sin / eta, i * eta * sin, cos)
}

fn check_wavelength(wavelength: Length) -> FsoResult<()> {
    if !wavelength.is_normal() || wavelength.is_sign_negative() {
        return Err(FsoError::InvalidParameter(
            "wavelength must be > 0 and finite".into(),
        ));
    }
    Ok(())
}

pub(super) fn check_incidence_angle(angle: Angle) -> FsoResult<()> {
    if !angle.is_finite() || angle.is_sign_negative() || angle.get::<radian>() >= PI / 2.0 {
        return Err(FsoError::InvalidParameter(
            "angle of incidence must be within [0°, 90°)".into(),
        ));
    }
    Ok(())
}
