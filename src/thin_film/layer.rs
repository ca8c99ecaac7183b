use num::{complex::Complex64, Zero};
use uom::si::{f64::Length, length::meter};

use crate::error::{FsoError, FsoResult};

/// A single homogeneous layer of a thin-film stack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layer {
    thickness: Length,
    index: Complex64,
}

impl Layer {
    /// Creates a new [`Layer`] with the given physical thickness and refractive index `n + iκ`.
    ///
    /// # Errors
    ///
    /// This function will return an [`FsoError::InvalidParameter`] if
    ///  - the thickness is not positive or not finite.
    ///  - the refractive index is not finite, `n <= 0` or `κ < 0`.
    pub fn new(thickness: Length, index: Complex64) -> FsoResult<Self> {
        if !thickness.is_normal() || thickness.is_sign_negative() {
            return Err(FsoError::InvalidParameter(
                "layer thickness must be > 0 and finite".into(),
            ));
        }
        check_refractive_index(index)?;
        Ok(Self { thickness, index })
    }
    /// Creates a layer of zero thickness.
    ///
    /// Such a layer does not alter the stack. A stack consisting only of this layer represents the
    /// bare interface between the ambient medium and the substrate.
    ///
    /// # Errors
    ///
    /// This function will return an [`FsoError::InvalidParameter`] if the refractive index is not finite,
    /// `n <= 0` or `κ < 0`.
    pub fn bare_interface(index: Complex64) -> FsoResult<Self> {
        check_refractive_index(index)?;
        Ok(Self {
            thickness: Length::zero(),
            index,
        })
    }
    /// Creates a lossless layer with an optical thickness of a quarter of the given design wavelength.
    ///
    /// # Errors
    ///
    /// This function will return an [`FsoError::InvalidParameter`] if the wavelength or the refractive index
    /// are not positive or not finite.
    pub fn quarter_wave(design_wavelength: Length, index: f64) -> FsoResult<Self> {
        if !design_wavelength.is_normal() || design_wavelength.is_sign_negative() {
            return Err(FsoError::InvalidParameter(
                "design wavelength must be > 0 and finite".into(),
            ));
        }
        if !index.is_normal() || index.is_sign_negative() {
            return Err(FsoError::InvalidParameter(
                "refractive index must be > 0 and finite".into(),
            ));
        }
        Self::new(design_wavelength / (4.0 * index), Complex64::new(index, 0.0))
    }
    /// Returns the physical thickness of this [`Layer`].
    #[must_use]
    pub const fn thickness(&self) -> Length {
        self.thickness
    }
    /// Returns the refractive index `n + iκ` of this [`Layer`].
    #[must_use]
    pub const fn index(&self) -> Complex64 {
        self.index
    }
    /// Returns `true` if the layer has a non-zero extinction coefficient.
    #[must_use]
    pub fn is_absorbing(&self) -> bool {
        self.index.im > 0.0
    }
}

/// An ordered, non-empty sequence of [`Layer`]s.
///
/// The first layer faces the ambient (incidence) medium, the last layer lies on the substrate.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerStack {
    layers: Vec<Layer>,
}

impl LayerStack {
    /// Creates a new [`LayerStack`].
    ///
    /// # Errors
    ///
    /// This function will return an [`FsoError::InvalidParameter`] if the given vector is empty.
    pub fn new(layers: Vec<Layer>) -> FsoResult<Self> {
        if layers.is_empty() {
            return Err(FsoError::InvalidParameter(
                "layer stack must contain at least one layer".into(),
            ));
        }
        Ok(Self { layers })
    }
    /// Returns the layers of this [`LayerStack`] ordered from the ambient medium to the substrate.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }
    /// Returns the number of layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }
    /// Always `false` since a [`LayerStack`] cannot be empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
    /// Returns a copy of this stack with the layer order reversed.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            layers: self.layers.iter().rev().copied().collect(),
        }
    }
    /// Returns the sum of all layer thicknesses.
    #[must_use]
    pub fn total_thickness(&self) -> Length {
        self.layers
            .iter()
            .fold(Length::zero(), |sum, layer| sum + layer.thickness)
    }
    /// Returns `true` if at least one layer is absorbing.
    #[must_use]
    pub fn is_absorbing(&self) -> bool {
        self.layers.iter().any(Layer::is_absorbing)
    }
    pub(super) fn raw_layers(&self) -> impl Iterator<Item = (f64, Complex64)> + '_ {
        self.layers
            .iter()
            .map(|layer| (layer.thickness.get::<meter>(), layer.index))
    }
}

/// Check that a refractive index `n + iκ` is finite with `n > 0` and `κ >= 0`.
pub(super) fn check_refractive_index(index: Complex64) -> FsoResult<()> {
    if !index.is_finite() || index.re <= 0.0 || index.im < 0.0 {
        return Err(FsoError::InvalidParameter(format!(
            "refractive index {index} must be finite with n > 0 and k >= 0"
        )));
    }
    Ok(())
}
