#![warn(missing_docs)]
//! Trait for adding the possibility to generate a plot of a field map or a spectrum.
//!
//! All appearance settings are passed explicitly as a [`PlotConfig`] value. The backend is
//! selected from the extension of the output file.

pub mod ax_lims;
pub use ax_lims::AxLims;

use crate::{
    error::{FsoError, FsoResult},
    utils::usize_to_f64,
};
use colorous::Gradient;
use itertools::izip;
use nalgebra::{DMatrix, DVector};
use num::ToPrimitive;
use plotters::{
    backend::DrawingBackend,
    chart::{ChartBuilder, ChartContext, LabelAreaPosition, SeriesLabelPosition},
    coord::{cartesian::Cartesian2d, types::RangedCoordf64, Shift},
    element::{PathElement, Rectangle},
    prelude::{BitMapBackend, DrawingArea, IntoDrawingArea, SVGBackend},
    series::LineSeries,
    style::{Color, IntoFont, RGBAColor, ShapeStyle, BLACK, WHITE},
};
use std::{fmt::Display, path::Path};

/// Width of the drawing area reserved for the colorbar of a color mesh (in pixels)
const COLORBAR_WIDTH: u32 = 170;

/// The data of a plot.
#[derive(Debug, Clone)]
pub enum PlotData {
    /// Equidistant 2D data drawn as colored rectangles with a colorbar.
    ColorMesh {
        /// x axis values (n)
        x_dat_n: DVector<f64>,
        /// y axis values (m)
        y_dat_m: DVector<f64>,
        /// values (m x n). The row index corresponds to y, the column index to x.
        z_dat_nxm: DMatrix<f64>,
        /// fixed limits of the color scale. If `None`, the limits are derived from the finite data values.
        z_bounds: Option<AxLims>,
    },
    /// One or more named curves sharing the same x values.
    Lines {
        /// x values
        x_dat: DVector<f64>,
        /// named y values, each of the same length as `x_dat`
        series: Vec<(String, DVector<f64>)>,
        /// fixed limits of the y axis. If `None`, the limits are derived from the data.
        y_bounds: Option<AxLims>,
    },
}

impl PlotData {
    /// Check the consistency of the data dimensions.
    ///
    /// # Errors
    ///
    /// This function will return an [`FsoError::Plot`] if
    ///  - a color mesh axis has less than two values or the shape of the values does not match the axes.
    ///  - a line plot has less than two x values, no series or a series of the wrong length.
    pub fn check(&self) -> FsoResult<()> {
        match self {
            Self::ColorMesh {
                x_dat_n,
                y_dat_m,
                z_dat_nxm,
                ..
            } => {
                if x_dat_n.len() < 2 || y_dat_m.len() < 2 {
                    return Err(FsoError::Plot(
                        "color mesh needs at least two values per axis".into(),
                    ));
                }
                if z_dat_nxm.shape() != (y_dat_m.len(), x_dat_n.len()) {
                    return Err(FsoError::Plot("shapes of x, y and z do not match".into()));
                }
            }
            Self::Lines { x_dat, series, .. } => {
                if x_dat.len() < 2 {
                    return Err(FsoError::Plot(
                        "line plot needs at least two x values".into(),
                    ));
                }
                if series.is_empty() {
                    return Err(FsoError::Plot("no plot series defined".into()));
                }
                if series.iter().any(|(_, y)| y.len() != x_dat.len()) {
                    return Err(FsoError::Plot("shapes of x and y do not match".into()));
                }
            }
        }
        Ok(())
    }
    fn draw<B: DrawingBackend>(
        &self,
        root: &DrawingArea<B, Shift>,
        config: &PlotConfig,
    ) -> FsoResult<()> {
        root.fill(&WHITE).map_err(plot_error)?;
        match self {
            Self::ColorMesh {
                x_dat_n,
                y_dat_m,
                z_dat_nxm,
                z_bounds,
            } => {
                let z_bounds = z_bounds
                    .or_else(|| AxLims::finite_from_slice(z_dat_nxm.as_slice()))
                    .unwrap_or(AxLims { min: 0.0, max: 1.0 });
                plot_color_mesh(root, config, x_dat_n, y_dat_m, z_dat_nxm, z_bounds)?;
            }
            Self::Lines {
                x_dat,
                series,
                y_bounds,
            } => {
                plot_lines(root, config, x_dat, series, *y_bounds)?;
            }
        }
        root.present().map_err(plot_error)
    }
}

/// Trait for all data types that can be rendered into an image file.
pub trait Plottable {
    /// Returns the [`PlotData`] of this element.
    ///
    /// # Errors
    ///
    /// Whether an error is returned depends on the individual implementation.
    fn plot_data(&self) -> FsoResult<PlotData>;
    /// Returns a [`PlotConfig`] with labels and color map suitable for this element.
    fn plot_config(&self) -> PlotConfig {
        PlotConfig::default()
    }
    /// Render this element into the given file.
    ///
    /// The backend is chosen from the file extension (see [`PltBackEnd::from_path`]).
    ///
    /// # Errors
    ///
    /// This function will return an [`FsoError::Plot`] if
    ///   - the file extension is not supported.
    ///   - the plot data is inconsistent.
    ///   - the plot could not be drawn or written.
    fn to_plot(&self, f_path: &Path, config: &PlotConfig) -> FsoResult<()> {
        let backend = PltBackEnd::from_path(f_path)?;
        let plot_data = self.plot_data()?;
        plot_data.check()?;
        match backend {
            PltBackEnd::Bitmap => {
                let root = BitMapBackend::new(f_path, config.fig_size()).into_drawing_area();
                plot_data.draw(&root, config)
            }
            PltBackEnd::SVG => {
                let root = SVGBackend::new(f_path, config.fig_size()).into_drawing_area();
                plot_data.draw(&root, config)
            }
        }
    }
}

///Enum to describe which type of plotting backend should be used
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PltBackEnd {
    /// `BitmapBackend`. Used to create .png, .bmp, .jpg
    #[default]
    Bitmap,
    /// `SVGBackend`. Used to create .svg
    SVG,
}

impl PltBackEnd {
    /// Select the backend from the extension of the given file path (case-insensitive).
    ///
    /// # Errors
    ///
    /// This function will return an [`FsoError::Plot`] if the path has no or an unsupported extension.
    pub fn from_path(f_path: &Path) -> FsoResult<Self> {
        let extension = f_path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "png" | "bmp" | "jpg" | "jpeg" => Ok(Self::Bitmap),
            "svg" => Ok(Self::SVG),
            _ => Err(FsoError::Plot(format!(
                "unsupported plot file extension '{extension}'"
            ))),
        }
    }
}

///Struct to hold the color gradient information of a colorbar
#[derive(Debug, Clone, Copy)]
pub struct CGradient {
    gradient: Gradient,
}

impl CGradient {
    /// Creates a new [`CGradient`].
    #[must_use]
    pub const fn new(gradient: Gradient) -> Self {
        Self { gradient }
    }
    /// Creates a [`CGradient`] from the (case-insensitive) name of a color map.
    ///
    /// Supported names are `turbo`, `viridis`, `inferno`, `magma`, `plasma`, `cividis`, `greys` and `sinebow`.
    ///
    /// # Errors
    ///
    /// This function will return an [`FsoError::Plot`] if the name is unknown.
    pub fn from_name(name: &str) -> FsoResult<Self> {
        let gradient = match name.to_ascii_lowercase().as_str() {
            "turbo" => colorous::TURBO,
            "viridis" => colorous::VIRIDIS,
            "inferno" => colorous::INFERNO,
            "magma" => colorous::MAGMA,
            "plasma" => colorous::PLASMA,
            "cividis" => colorous::CIVIDIS,
            "greys" => colorous::GREYS,
            "sinebow" => colorous::SINEBOW,
            _ => return Err(FsoError::Plot(format!("unknown color map '{name}'"))),
        };
        Ok(Self { gradient })
    }
    /// Returns the gradient of this [`CGradient`].
    #[must_use]
    pub const fn get_gradient(&self) -> Gradient {
        self.gradient
    }
}
impl Default for CGradient {
    fn default() -> Self {
        Self {
            gradient: colorous::TURBO,
        }
    }
}

/// Appearance of a plot: figure size, color map and labels.
#[derive(Debug, Clone)]
pub struct PlotConfig {
    fig_size: (u32, u32),
    cmap: CGradient,
    x_label: String,
    y_label: String,
    cbar_label: String,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            fig_size: (1000, 850),
            cmap: CGradient::default(),
            x_label: "x (mm)".into(),
            y_label: "y (mm)".into(),
            cbar_label: String::new(),
        }
    }
}

impl PlotConfig {
    /// Returns this [`PlotConfig`] with a different figure size (width, height) in pixels.
    ///
    /// # Errors
    ///
    /// This function will return an [`FsoError::Plot`] if the figure is too small to hold axes and colorbar
    /// (width or height below 400 pixels).
    pub fn with_fig_size(mut self, width: u32, height: u32) -> FsoResult<Self> {
        if width < 400 || height < 400 {
            return Err(FsoError::Plot(
                "figure size must be at least 400 x 400 pixels".into(),
            ));
        }
        self.fig_size = (width, height);
        Ok(self)
    }
    /// Returns this [`PlotConfig`] with a different color map.
    #[must_use]
    pub const fn with_cmap(mut self, cmap: CGradient) -> Self {
        self.cmap = cmap;
        self
    }
    /// Returns this [`PlotConfig`] with different axis labels.
    #[must_use]
    pub fn with_axis_labels(mut self, x_label: &str, y_label: &str) -> Self {
        x_label.clone_into(&mut self.x_label);
        y_label.clone_into(&mut self.y_label);
        self
    }
    /// Returns this [`PlotConfig`] with a different colorbar label.
    #[must_use]
    pub fn with_cbar_label(mut self, label: &str) -> Self {
        label.clone_into(&mut self.cbar_label);
        self
    }
    /// Returns the figure size (width, height) in pixels.
    #[must_use]
    pub const fn fig_size(&self) -> (u32, u32) {
        self.fig_size
    }
    /// Returns the color map.
    #[must_use]
    pub const fn cmap(&self) -> CGradient {
        self.cmap
    }
    /// Returns the x axis label.
    #[must_use]
    pub fn x_label(&self) -> &str {
        &self.x_label
    }
    /// Returns the y axis label.
    #[must_use]
    pub fn y_label(&self) -> &str {
        &self.y_label
    }
    /// Returns the colorbar label.
    #[must_use]
    pub fn cbar_label(&self) -> &str {
        &self.cbar_label
    }
}

fn plot_error<E: Display>(error: E) -> FsoError {
    FsoError::Plot(error.to_string())
}

/// `n` equidistant values from `start` to `end` (both included).
fn linspace(start: f64, end: f64, n: usize) -> DVector<f64> {
    if n < 2 {
        return DVector::from_element(n, start);
    }
    let step = (end - start) / usize_to_f64(n - 1);
    DVector::from_fn(n, |i, _| usize_to_f64(i).mul_add(step, start))
}

fn plot_color_mesh<B: DrawingBackend>(
    root: &DrawingArea<B, Shift>,
    config: &PlotConfig,
    x_dat_n: &DVector<f64>,
    y_dat_m: &DVector<f64>,
    z_dat_nxm: &DMatrix<f64>,
    z_bounds: AxLims,
) -> FsoResult<()> {
    let cmap = config.cmap().get_gradient();
    let split_pixel = config.fig_size().0.saturating_sub(COLORBAR_WIDTH);
    //split root for main plot and colorbar
    let (main_root, cbar_root) = root.split_horizontally(split_pixel);

    //colorbar first, otherwise the x label of the main plot is cropped
    let mut chart = create_2d_plot_chart(
        &cbar_root,
        AxLims { min: 0.0, max: 1.0 },
        z_bounds,
        ("", config.cbar_label()),
        false,
    )?;
    let c_dat = linspace(z_bounds.min, z_bounds.max, 100);
    let d_mat = DMatrix::<f64>::from_columns(&[c_dat.clone(), c_dat.clone()]);
    draw_2d_colormesh(
        &mut chart,
        &DVector::from_vec(vec![0.0, 1.0]),
        &c_dat,
        &d_mat,
        &cmap,
        z_bounds,
    )?;

    let x_bounds = pixel_bounds(x_dat_n)?;
    let y_bounds = pixel_bounds(y_dat_m)?;
    let mut chart = create_2d_plot_chart(
        &main_root,
        x_bounds,
        y_bounds,
        (config.x_label(), config.y_label()),
        true,
    )?;
    draw_2d_colormesh(&mut chart, x_dat_n, y_dat_m, z_dat_nxm, &cmap, z_bounds)
}

/// Axis limits covering the full extent of the outermost pixels of an equidistant axis.
fn pixel_bounds(ax: &DVector<f64>) -> FsoResult<AxLims> {
    let len = ax.len();
    let first = (ax[1] - ax[0]) / 2.0;
    let last = (ax[len - 1] - ax[len - 2]) / 2.0;
    AxLims::new(ax[0] - first, ax[len - 1] + last)
        .ok_or_else(|| FsoError::Plot("invalid axis values".into()))
}

fn draw_2d_colormesh<B: DrawingBackend>(
    chart: &mut ChartContext<'_, B, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    x_ax: &DVector<f64>,
    y_ax: &DVector<f64>,
    z_dat: &DMatrix<f64>,
    cmap: &Gradient,
    cbounds: AxLims,
) -> FsoResult<()> {
    let yy_points = y_ax.len();
    let xx_points = x_ax.len();
    let mut rect_vec = Vec::<Rectangle<(f64, f64)>>::with_capacity(yy_points * xx_points);
    for y_idx in 0..yy_points {
        let y_center = y_ax[y_idx];
        let y_dist = if y_idx == yy_points - 1 {
            y_ax[y_idx] - y_ax[y_idx - 1]
        } else {
            y_ax[y_idx + 1] - y_center
        };
        for x_idx in 0..xx_points {
            let x_center = x_ax[x_idx];
            let x_dist = if x_idx == xx_points - 1 {
                x_ax[x_idx] - x_ax[x_idx - 1]
            } else {
                x_ax[x_idx + 1] - x_center
            };
            let value = z_dat[(y_idx, x_idx)];
            // non-finite samples stay white
            let color = if value.is_finite() {
                let cor = cmap.eval_continuous(cbounds.normalize(value));
                RGBAColor(cor.r, cor.g, cor.b, 1.)
            } else {
                WHITE.to_rgba()
            };
            rect_vec.push(Rectangle::new(
                [
                    (x_center - x_dist / 2., y_center + y_dist / 2.),
                    (x_center + x_dist / 2., y_center - y_dist / 2.),
                ],
                Into::<ShapeStyle>::into(color).filled(),
            ));
        }
    }
    chart.draw_series(rect_vec).map_err(plot_error)?;
    Ok(())
}

fn plot_lines<B: DrawingBackend>(
    root: &DrawingArea<B, Shift>,
    config: &PlotConfig,
    x_dat: &DVector<f64>,
    series: &[(String, DVector<f64>)],
    y_bounds: Option<AxLims>,
) -> FsoResult<()> {
    let x_bounds = AxLims::finite_from_slice(x_dat.as_slice())
        .ok_or_else(|| FsoError::Plot("no finite x values".into()))?;
    let y_bounds = match y_bounds {
        Some(bounds) => bounds,
        None => {
            let all_y: Vec<f64> = series.iter().flat_map(|s| s.1.iter().copied()).collect();
            AxLims::finite_from_slice(&all_y)
                .ok_or_else(|| FsoError::Plot("no finite y values".into()))?
        }
    };
    let mut chart = create_2d_plot_chart(
        root,
        x_bounds,
        y_bounds,
        (config.x_label(), config.y_label()),
        true,
    )?;
    for (idx, (label, y_dat)) in series.iter().enumerate() {
        let c = colorous::CATEGORY10[idx % colorous::CATEGORY10.len()];
        let line_color = RGBAColor(c.r, c.g, c.b, 1.);
        let series_anno = chart
            .draw_series(LineSeries::new(
                izip!(x_dat, y_dat).map(|xy| (*xy.0, *xy.1)),
                line_color.stroke_width(3),
            ))
            .map_err(plot_error)?;
        let label_color = line_color.stroke_width(8);
        series_anno
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], label_color));
    }
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", 30).into_font())
        .draw()
        .map_err(plot_error)
}

fn tick_formatter(range: core::ops::Range<f64>) -> impl Fn(&f64) -> String {
    let log_val = range
        .end
        .abs()
        .max(range.start.abs())
        .log10()
        .floor()
        .to_i32()
        .unwrap_or(0);

    move |v: &_| match log_val {
        -3 | -2 => format!("{v:.3}"),
        -1 | 0 => format!("{v:.2}"),
        1 => format!("{v:.1}"),
        2 => format!("{v:.0}"),
        _ => format!("{v:.2e}"),
    }
}

fn create_2d_plot_chart<'a, B: DrawingBackend>(
    root: &'a DrawingArea<B, Shift>,
    x_bounds: AxLims,
    y_bounds: AxLims,
    labels: (&str, &str),
    x_ax: bool,
) -> FsoResult<ChartContext<'a, B, Cartesian2d<RangedCoordf64, RangedCoordf64>>> {
    let mut chart_builder = ChartBuilder::on(root);
    chart_builder.margin(30).margin_top(40).margin_left(10);
    chart_builder.set_label_area_size(LabelAreaPosition::Left, 21 + calc_pixel_margin(y_bounds));
    chart_builder.set_label_area_size(LabelAreaPosition::Bottom, 65);

    let mut chart = chart_builder
        .build_cartesian_2d(x_bounds.min..x_bounds.max, y_bounds.min..y_bounds.max)
        .map_err(plot_error)?;

    let x_format = tick_formatter(chart.x_range());
    let y_format = tick_formatter(chart.y_range());
    let mut mesh = chart.configure_mesh();
    mesh.x_labels(5).y_labels(5);
    mesh.x_label_formatter(&x_format)
        .y_label_formatter(&y_format);
    mesh.y_desc(labels.1);
    if x_ax {
        mesh.x_desc(labels.0);
    } else {
        mesh.disable_x_axis();
    }
    mesh.label_style(("sans-serif", 30).into_font())
        .draw()
        .map_err(plot_error)?;
    Ok(chart)
}

/// Width of the y tick labels estimated from the number of digits of the axis limits.
fn calc_pixel_margin(bounds: AxLims) -> u32 {
    let digits = |value: f64| {
        let log_val = if value.abs() > f64::EPSILON {
            value.abs().log10().floor().to_i32().unwrap_or(0)
        } else {
            -1
        };
        let digits = match log_val {
            -3 | -2 => 5,
            3.. => 8,
            _ => 4,
        };
        digits + u32::from(value.is_sign_negative())
    };
    digits(bounds.min).max(digits(bounds.max)) * 13 + 20
}
