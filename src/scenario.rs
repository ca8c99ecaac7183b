#![warn(missing_docs)]
//! Scenario documents describing a complete beam or thin-film computation.
//!
//! Scenarios are stored as YAML. A document holds exactly one of the two computations, tagged
//! by its top-level key:
//!
//! ```yaml
//! beam:
//!   kind: Jv
//!   charge: 1
//!   waist_mm: 1.0
//!   wavelength_nm: 633.0
//!   resolution: 256
//!   half_width_mm: 5.0
//! ```
//!
//! ```yaml
//! film:
//!   ambient: 1.0
//!   substrate: { n: 1.52 }
//!   layers:
//!     - { thickness_nm: 99.6, n: 1.38 }
//!   sweep: { start_nm: 400.0, end_nm: 800.0, step_nm: 1.0 }
//! ```
use std::{fs, path::Path};

use log::info;
use num::{complex::Complex64, Zero};
use serde::{Deserialize, Serialize};

use crate::{
    beam::{BeamKind, BeamParameters, BesselGaussBeam},
    degree,
    error::{FsoError, FsoResult},
    field::{ComplexField, IntensityMap, PhaseMap},
    grid::Grid,
    mask::{SectorMask, TransmittanceMap},
    millimeter, nanometer,
    thin_film::{
        FilmSpectrum, Layer, LayerStack, Polarization, ThinFilmModel, WavelengthSweep,
    },
};

/// A complete computation read from a scenario document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    /// evaluation of a Bessel-Gauss beam on a grid
    Beam(BeamScenario),
    /// reflectance / transmittance spectrum of a thin-film stack
    Film(FilmScenario),
}

impl Scenario {
    /// Read a [`Scenario`] from a YAML file.
    ///
    /// # Errors
    ///
    /// This function will return an [`FsoError::Console`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> FsoResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            FsoError::Console(format!("cannot read file {} : {}", path.display(), e))
        })?;
        Self::from_string(&contents)
    }
    /// Parse a [`Scenario`] from a YAML string.
    ///
    /// # Errors
    ///
    /// This function will return an [`FsoError::Console`] if the string is not a valid scenario document.
    pub fn from_string(contents: &str) -> FsoResult<Self> {
        serde_yaml::with::singleton_map::deserialize(serde_yaml::Deserializer::from_str(contents))
            .map_err(|e| FsoError::Console(format!("parsing of scenario failed: {e}")))
    }
}

/// Parameters of a sector mask in a beam scenario.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MaskScenario {
    /// radius of the transmitting sector in millimeters
    pub radius_mm: f64,
    /// start angle of the sector in degrees
    #[serde(default)]
    pub start_deg: f64,
    /// end angle of the sector in degrees
    #[serde(default = "default_end_deg")]
    pub end_deg: f64,
    /// transmittance outside the sector
    #[serde(default)]
    pub transmittance: f64,
}

const fn default_end_deg() -> f64 {
    90.0
}
const fn default_true() -> bool {
    true
}

/// A Bessel-Gauss beam evaluated on a square grid, optionally behind a sector mask.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BeamScenario {
    /// beam kind (`Jv` or `Iv`)
    pub kind: String,
    /// topological charge
    pub charge: i32,
    /// Gaussian waist in millimeters
    pub waist_mm: f64,
    /// wavelength in nanometers
    pub wavelength_nm: f64,
    /// propagation distance from the waist in millimeters
    #[serde(default)]
    pub z_mm: f64,
    /// ratio of the transverse to the total wave number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transverse_ratio: Option<f64>,
    /// number of grid samples per axis
    pub resolution: usize,
    /// half width of the grid in millimeters
    pub half_width_mm: f64,
    /// scale the intensity map to a maximum of 1.0
    #[serde(default = "default_true")]
    pub normalize: bool,
    /// optional sector mask applied to the field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<MaskScenario>,
}

/// Results of a [`BeamScenario`].
#[derive(Clone, Debug)]
pub struct BeamResult {
    /// the (masked) field
    pub field: ComplexField,
    /// intensity of the (masked) field, normalized if requested
    pub intensity: IntensityMap,
    /// phase of the unmasked field
    pub phase: PhaseMap,
    /// the sampled mask if one was defined
    pub mask: Option<TransmittanceMap>,
}

impl BeamScenario {
    /// Returns the validated [`BeamParameters`] of this scenario.
    ///
    /// # Errors
    ///
    /// This function will return an error if the kind is unknown or a parameter is out of range.
    pub fn beam_parameters(&self) -> FsoResult<BeamParameters> {
        let kind = BeamKind::try_from(self.kind.as_str())?;
        let params = BeamParameters::new(
            kind,
            self.charge,
            millimeter!(self.waist_mm),
            nanometer!(self.wavelength_nm),
        )?
        .with_propagation_distance(millimeter!(self.z_mm))?;
        match self.transverse_ratio {
            Some(ratio) => params.with_transverse_ratio(ratio),
            None => Ok(params),
        }
    }
    /// Returns the [`Grid`] of this scenario.
    ///
    /// # Errors
    ///
    /// This function will return an [`FsoError::InvalidParameter`] if the resolution or half width is invalid.
    pub fn grid(&self) -> FsoResult<Grid> {
        Grid::new(self.resolution, millimeter!(self.half_width_mm))
    }
    /// Returns the [`SectorMask`] of this scenario, if any.
    ///
    /// # Errors
    ///
    /// This function will return an [`FsoError::InvalidParameter`] if the mask parameters are invalid.
    pub fn sector_mask(&self) -> FsoResult<Option<SectorMask>> {
        self.mask
            .as_ref()
            .map(|m| {
                SectorMask::new(
                    millimeter!(m.radius_mm),
                    degree!(m.start_deg),
                    degree!(m.end_deg),
                    m.transmittance,
                )
            })
            .transpose()
    }
    /// Evaluate the beam and derive its intensity and phase maps.
    ///
    /// # Errors
    ///
    /// This function will return an error if a parameter is invalid or the intensity map cannot be normalized.
    pub fn evaluate(&self) -> FsoResult<BeamResult> {
        let beam = BesselGaussBeam::new(self.beam_parameters()?);
        let grid = self.grid()?;
        let field = beam.evaluate(&grid);
        let phase = field.phase();
        let mask = self.sector_mask()?.map(|m| m.create(&grid));
        let field = match &mask {
            Some(mask) => {
                info!("applying sector mask");
                field.apply_mask(mask)?
            }
            None => field,
        };
        let intensity = if self.normalize {
            field.intensity().normalized()?
        } else {
            field.intensity()
        };
        Ok(BeamResult {
            field,
            intensity,
            phase,
            mask,
        })
    }
}

/// Refractive index `n + iκ` as given in a scenario document.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexScenario {
    /// real part
    pub n: f64,
    /// extinction coefficient
    #[serde(default)]
    pub k: f64,
}

impl From<IndexScenario> for Complex64 {
    fn from(index: IndexScenario) -> Self {
        Self::new(index.n, index.k)
    }
}

/// A single layer as given in a scenario document.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerScenario {
    /// physical thickness in nanometers
    pub thickness_nm: f64,
    /// real part of the refractive index
    pub n: f64,
    /// extinction coefficient
    #[serde(default)]
    pub k: f64,
}

/// Wavelength range of a [`FilmScenario`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SweepScenario {
    /// first wavelength in nanometers
    pub start_nm: f64,
    /// last wavelength in nanometers
    pub end_nm: f64,
    /// wavelength step in nanometers
    pub step_nm: f64,
}

/// A thin-film stack between an ambient medium and a substrate, evaluated over a wavelength range.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilmScenario {
    /// refractive index of the (lossless) ambient medium
    pub ambient: f64,
    /// refractive index of the substrate
    pub substrate: IndexScenario,
    /// angle of incidence in degrees
    #[serde(default)]
    pub angle_deg: f64,
    /// polarization of the incident light
    #[serde(default)]
    pub polarization: Polarization,
    /// layers ordered from the ambient medium to the substrate
    pub layers: Vec<LayerScenario>,
    /// wavelength range
    pub sweep: SweepScenario,
}

impl FilmScenario {
    /// Returns the [`ThinFilmModel`] of this scenario.
    ///
    /// # Errors
    ///
    /// This function will return an [`FsoError::InvalidParameter`] if an index or the angle is invalid.
    pub fn model(&self) -> FsoResult<ThinFilmModel> {
        Ok(ThinFilmModel::new(self.ambient, self.substrate.into())?
            .with_incidence_angle(degree!(self.angle_deg))?
            .with_polarization(self.polarization))
    }
    /// Returns the [`LayerStack`] of this scenario.
    ///
    /// Layers with a thickness of zero are interpreted as bare interfaces.
    ///
    /// # Errors
    ///
    /// This function will return an [`FsoError::InvalidParameter`] if no layer is given or a layer is invalid.
    pub fn stack(&self) -> FsoResult<LayerStack> {
        let layers = self
            .layers
            .iter()
            .map(|l| {
                let index = Complex64::new(l.n, l.k);
                if l.thickness_nm.is_zero() {
                    Layer::bare_interface(index)
                } else {
                    Layer::new(nanometer!(l.thickness_nm), index)
                }
            })
            .collect::<FsoResult<Vec<_>>>()?;
        LayerStack::new(layers)
    }
    /// Returns the [`WavelengthSweep`] of this scenario.
    ///
    /// # Errors
    ///
    /// This function will return an [`FsoError::InvalidParameter`] if the range or the step is invalid.
    pub fn sweep(&self) -> FsoResult<WavelengthSweep> {
        WavelengthSweep::new(
            nanometer!(self.sweep.start_nm)..nanometer!(self.sweep.end_nm),
            nanometer!(self.sweep.step_nm),
        )
    }
    /// Calculate the spectrum of this scenario.
    ///
    /// # Errors
    ///
    /// This function will return an error if a parameter is invalid or the calculation becomes unstable.
    pub fn evaluate(&self) -> FsoResult<FilmSpectrum> {
        self.model()?.spectrum(&self.stack()?, &self.sweep()?)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;
    use std::io::Write;

    const BEAM: &str = "beam:
  kind: Jv
  charge: 1
  waist_mm: 1.0
  wavelength_nm: 633.0
  resolution: 64
  half_width_mm: 5.0
";
    const FILM: &str = "film:
  ambient: 1.0
  substrate: { n: 1.5 }
  layers:
    - { thickness_nm: 0.0, n: 1.5 }
  sweep: { start_nm: 500.0, end_nm: 600.0, step_nm: 50.0 }
";
    #[test]
    fn from_string_beam() {
        let Scenario::Beam(beam) = Scenario::from_string(BEAM).unwrap() else {
            panic!("wrong scenario type");
        };
        assert_eq!(beam.kind, "Jv");
        assert_eq!(beam.z_mm, 0.0);
        assert!(beam.normalize);
        assert!(beam.mask.is_none());
        let params = beam.beam_parameters().unwrap();
        assert_eq!(params.kind(), BeamKind::OrdinaryBessel);
        assert_eq!(params.charge(), 1);
        assert_eq!(beam.grid().unwrap().resolution(), 64);
    }
    #[test]
    fn from_string_top_level_key() {
        assert_matches!(Scenario::from_string(FILM), Ok(Scenario::Film(_)));
        assert_matches!(Scenario::from_string(BEAM), Ok(Scenario::Beam(_)));
        assert!(Scenario::from_string(&format!("{BEAM}{FILM}")).is_err());
    }
    #[test]
    fn from_string_wrong() {
        assert_matches!(Scenario::from_string("beam: 3"), Err(FsoError::Console(_)));
        assert!(Scenario::from_string("laser:\n  power: 1.0\n").is_err());
        assert!(Scenario::from_string(&format!("{BEAM}  color: red\n")).is_err());
    }
    #[test]
    fn from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FILM.as_bytes()).unwrap();
        assert_matches!(Scenario::from_file(file.path()), Ok(Scenario::Film(_)));
        assert_matches!(
            Scenario::from_file(Path::new("./no/such/file.yaml")),
            Err(FsoError::Console(_))
        );
    }
    #[test]
    fn beam_unknown_kind() {
        let Scenario::Beam(mut beam) = Scenario::from_string(BEAM).unwrap() else {
            panic!("wrong scenario type");
        };
        beam.kind = "Kv".into();
        assert_matches!(beam.evaluate(), Err(FsoError::UnsupportedKind(_)));
    }
    #[test]
    fn beam_evaluate() {
        let Scenario::Beam(mut beam) = Scenario::from_string(BEAM).unwrap() else {
            panic!("wrong scenario type");
        };
        let result = beam.evaluate().unwrap();
        assert_abs_diff_eq!(result.intensity.max(), 1.0);
        assert!(result.mask.is_none());
        let center = result.field.grid().center_index();
        assert_eq!(result.intensity.values()[(center, center)], 0.0);
        beam.mask = Some(MaskScenario {
            radius_mm: 4.0,
            start_deg: 0.0,
            end_deg: 90.0,
            transmittance: 0.0,
        });
        let masked = beam.evaluate().unwrap();
        let mask = masked.mask.unwrap();
        assert_eq!(mask.values()[(0, 0)], 0.0);
        // third quadrant is blocked
        assert_eq!(masked.intensity.values()[(10, 10)], 0.0);
        // phase is taken before masking
        assert_eq!(masked.phase, result.phase);
    }
    #[test]
    fn beam_wrong_grid() {
        let Scenario::Beam(mut beam) = Scenario::from_string(BEAM).unwrap() else {
            panic!("wrong scenario type");
        };
        beam.resolution = 0;
        assert_matches!(beam.evaluate(), Err(FsoError::InvalidParameter(_)));
    }
    #[test]
    fn film_evaluate() {
        let Scenario::Film(film) = Scenario::from_string(FILM).unwrap() else {
            panic!("wrong scenario type");
        };
        assert_eq!(film.polarization, Polarization::Unpolarized);
        assert_eq!(film.angle_deg, 0.0);
        let spectrum = film.evaluate().unwrap();
        assert_eq!(spectrum.len(), 3);
        for rt in spectrum.data() {
            assert_abs_diff_eq!(rt.1.reflectance(), 0.04, epsilon = 1e-12);
            assert_abs_diff_eq!(rt.1.transmittance(), 0.96, epsilon = 1e-12);
        }
    }
    #[test]
    fn film_wrong() {
        let Scenario::Film(mut film) = Scenario::from_string(FILM).unwrap() else {
            panic!("wrong scenario type");
        };
        film.layers.clear();
        assert_matches!(film.evaluate(), Err(FsoError::InvalidParameter(_)));
        let Scenario::Film(mut film) = Scenario::from_string(FILM).unwrap() else {
            panic!("wrong scenario type");
        };
        film.sweep.step_nm = 0.0;
        assert!(film.evaluate().is_err());
    }
}
