//! Reflectance and transmittance of multilayer thin-film stacks.
//!
//! The stacks are evaluated with the characteristic-matrix (transfer-matrix) method. A
//! [`ThinFilmModel`] describes the surrounding media, the angle of incidence and the polarization.
//! It evaluates a [`LayerStack`] at a single wavelength ([`ThinFilmModel::evaluate_at`]) or over a
//! sweep of wavelengths or incidence angles, returning a [`FilmSpectrum`].
//!
//! Refractive indices are given as `n + iκ` with the extinction coefficient `κ >= 0`.
#![warn(missing_docs)]
use std::fmt::Display;

use serde::{Deserialize, Serialize};
use strum::EnumIter;

mod layer;
mod model;
mod spectrum;

pub use layer::{Layer, LayerStack};
pub use model::{RtPair, ThinFilmModel};
pub use spectrum::{AngleSweep, FilmSpectrum, SweepVariable, WavelengthSweep};

/// Polarization state of the incident light
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, EnumIter, Default)]
pub enum Polarization {
    /// electric field perpendicular to the plane of incidence (TE)
    S,
    /// electric field parallel to the plane of incidence (TM)
    P,
    /// equal mixture of s- and p-polarized light
    #[default]
    Unpolarized,
}

impl Display for Polarization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::S => write!(f, "s-polarized"),
            Self::P => write!(f, "p-polarized"),
            Self::Unpolarized => write!(f, "unpolarized"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use strum::IntoEnumIterator;
    #[test]
    fn polarization_display() {
        let names: Vec<String> = Polarization::iter().map(|p| p.to_string()).collect();
        assert_eq!(names, vec!["s-polarized", "p-polarized", "unpolarized"]);
        assert_eq!(Polarization::default(), Polarization::Unpolarized);
    }
}
