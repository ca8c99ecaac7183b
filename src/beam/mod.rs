//! Beams carrying orbital angular momentum.
//!
//! A beam is described by a set of validated [`BeamParameters`]. The [`BesselGaussBeam`] created
//! from them evaluates the complex field on a [`Grid`](crate::grid::Grid) or at single points.
#![warn(missing_docs)]
use std::{f64::consts::PI, fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};
use uom::si::{f64::Length, length::meter};

use crate::error::{FsoError, FsoResult};

mod bessel_gauss;
pub use bessel_gauss::BesselGaussBeam;

/// Default ratio between the transverse wave number and the wave number (`kt / k`).
pub const DEFAULT_TRANSVERSE_RATIO: f64 = 1.0 / 500.0;

/// Radial profile families of a Bessel-Gauss beam
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, EnumIter, Default)]
pub enum BeamKind {
    /// Radial profile given by the ordinary Bessel function of the first kind `J_ℓ` ("Jv")
    #[default]
    OrdinaryBessel,
    /// Radial profile given by a difference of modified Bessel functions `I_ν` ("Iv")
    ModifiedBessel,
}

impl BeamKind {
    /// Returns the short name of this [`BeamKind`] as used in scenario files.
    #[must_use]
    pub const fn short_name(&self) -> &'static str {
        match self {
            Self::OrdinaryBessel => "Jv",
            Self::ModifiedBessel => "Iv",
        }
    }
}

impl Display for BeamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OrdinaryBessel => write!(f, "ordinary Bessel (Jv)"),
            Self::ModifiedBessel => write!(f, "modified Bessel (Iv)"),
        }
    }
}

impl FromStr for BeamKind {
    type Err = FsoError;

    /// Parse a beam kind from its short name ("Jv", "Iv") or its variant name (case-insensitive).
    fn from_str(name: &str) -> FsoResult<Self> {
        let name = name.trim();
        Self::iter()
            .find(|kind| {
                kind.short_name().eq_ignore_ascii_case(name)
                    || format!("{kind:?}").eq_ignore_ascii_case(name)
            })
            .ok_or_else(|| {
                let supported: Vec<&str> = Self::iter().map(|k| k.short_name()).collect();
                FsoError::UnsupportedKind(format!(
                    "unknown Bessel-Gauss kind '{name}', supported kinds are {supported:?}"
                ))
            })
    }
}

impl TryFrom<&str> for BeamKind {
    type Error = FsoError;

    fn try_from(name: &str) -> FsoResult<Self> {
        Self::from_str(name)
    }
}

/// Validated, immutable parameters of a Bessel-Gauss beam.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct BeamParameters {
    kind: BeamKind,
    charge: i32,
    waist: Length,
    wavelength: Length,
    propagation_distance: Length,
    transverse_ratio: f64,
}

impl BeamParameters {
    /// Create new [`BeamParameters`] in the waist plane (z = 0) with the default transverse ratio.
    ///
    /// # Errors
    ///
    /// This function will return an [`FsoError::InvalidParameter`] if
    ///   - the waist radius is not positive or not finite.
    ///   - the wavelength is not positive or not finite.
    pub fn new(kind: BeamKind, charge: i32, waist: Length, wavelength: Length) -> FsoResult<Self> {
        if !waist.is_normal() || waist.is_sign_negative() {
            return Err(FsoError::InvalidParameter(
                "waist radius must be > 0 and finite".into(),
            ));
        }
        if !wavelength.is_normal() || wavelength.is_sign_negative() {
            return Err(FsoError::InvalidParameter(
                "wavelength must be > 0 and finite".into(),
            ));
        }
        Ok(Self {
            kind,
            charge,
            waist,
            wavelength,
            propagation_distance: Length::new::<meter>(0.0),
            transverse_ratio: DEFAULT_TRANSVERSE_RATIO,
        })
    }
    /// Returns these [`BeamParameters`] evaluated at the given distance from the waist plane.
    ///
    /// # Errors
    ///
    /// This function will return an [`FsoError::InvalidParameter`] if the distance is not finite.
    pub fn with_propagation_distance(mut self, distance: Length) -> FsoResult<Self> {
        if !distance.is_finite() {
            return Err(FsoError::InvalidParameter(
                "propagation distance must be finite".into(),
            ));
        }
        self.propagation_distance = distance;
        Ok(self)
    }
    /// Returns these [`BeamParameters`] with a different ratio `kt / k` of transverse wave number to wave number.
    ///
    /// # Errors
    ///
    /// This function will return an [`FsoError::InvalidParameter`] if the ratio is not positive or not finite.
    pub fn with_transverse_ratio(mut self, ratio: f64) -> FsoResult<Self> {
        if !ratio.is_normal() || ratio.is_sign_negative() {
            return Err(FsoError::InvalidParameter(
                "transverse wave number ratio must be > 0 and finite".into(),
            ));
        }
        self.transverse_ratio = ratio;
        Ok(self)
    }
    /// Returns the [`BeamKind`] of these [`BeamParameters`].
    #[must_use]
    pub const fn kind(&self) -> BeamKind {
        self.kind
    }
    /// Returns the topological charge ℓ.
    #[must_use]
    pub const fn charge(&self) -> i32 {
        self.charge
    }
    /// Returns the waist radius.
    #[must_use]
    pub const fn waist(&self) -> Length {
        self.waist
    }
    /// Returns the wavelength.
    #[must_use]
    pub const fn wavelength(&self) -> Length {
        self.wavelength
    }
    /// Returns the distance from the waist plane.
    #[must_use]
    pub const fn propagation_distance(&self) -> Length {
        self.propagation_distance
    }
    /// Returns the ratio `kt / k` of transverse wave number to wave number.
    #[must_use]
    pub const fn transverse_ratio(&self) -> f64 {
        self.transverse_ratio
    }
    /// Calculate the derived [`OpticalParameters`].
    #[must_use]
    pub fn optical_parameters(&self) -> OpticalParameters {
        let wavelength = self.wavelength.get::<meter>();
        let waist = self.waist.get::<meter>();
        let z = self.propagation_distance.get::<meter>();
        let wave_number = 2.0 * PI / wavelength;
        let rayleigh_range = PI * waist * waist / wavelength;
        let beam_width = waist * (z / rayleigh_range).hypot(1.0);
        OpticalParameters {
            wave_number,
            rayleigh_range,
            beam_width,
            transverse_wave_number: wave_number * self.transverse_ratio,
        }
    }
}

/// Quantities derived from [`BeamParameters`] (all in SI base units).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OpticalParameters {
    /// wave number `k = 2π/λ` (1/m)
    pub wave_number: f64,
    /// Rayleigh range `zR = π w0² / λ` (m)
    pub rayleigh_range: f64,
    /// beam width `w(z) = w0 sqrt(1 + (z/zR)²)` (m)
    pub beam_width: f64,
    /// transverse wave number `kt` scaling the argument of the radial Bessel term (1/m)
    pub transverse_wave_number: f64,
}
