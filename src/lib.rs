//! This is the documentation for the **fsoptics** package, a small free-space optics toolkit.
//!
//! It covers two independent computations:
//!  - complex fields of Bessel-Gauss beams carrying orbital angular momentum ([`beam`]), sampled on a
//!    square [`grid::Grid`] and optionally clipped by an angular [`mask::SectorMask`].
//!  - reflectance and transmittance spectra of multilayer thin-film stacks calculated with the
//!    transfer-matrix method ([`thin_film`]).
//!
//! Results can be rendered to image files with the [`plottable::Plottable`] trait.
#![allow(clippy::module_name_repetitions)]

pub mod beam;
pub mod console;
pub mod error;
pub mod field;
pub mod grid;
pub mod mask;
pub mod plottable;
pub mod scenario;
pub mod thin_film;
pub mod utils;

/// Return the version information of the currently built fsoptics executable.
#[must_use]
pub fn get_version() -> String {
    format!("{} ({})", env!("CARGO_PKG_VERSION"), env!("CARGO_PKG_NAME"))
}
