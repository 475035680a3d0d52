use crate::error::PixelizationError;
use crate::float_trait::Float;
use crate::geometry::Coordinate;
use crate::grid::{Grid, GridStack};

use conv::prelude::*;
use ndarray::{Array1, ArrayView1, Zip};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Source-plane pixel grid of a galaxy reconstructed by an inversion
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[non_exhaustive]
pub enum Pixelization {
    /// Uniform `(rows, cols)` grid over the extent of the traced sub-grid
    Rectangular { shape: (usize, usize) },
    /// Voronoi cells around the given number of pixel centres
    Voronoi { pixels: usize },
}

impl Pixelization {
    pub fn rectangular(shape: (usize, usize)) -> Result<Self, PixelizationError> {
        if shape.0 < 3 || shape.1 < 3 {
            return Err(PixelizationError::RectangularShape(shape));
        }
        Ok(Self::Rectangular { shape })
    }

    pub fn voronoi(pixels: usize) -> Self {
        Self::Voronoi { pixels }
    }

    pub fn pixels(&self) -> usize {
        match self {
            Self::Rectangular { shape } => shape.0 * shape.1,
            Self::Voronoi { pixels } => *pixels,
        }
    }
}

/// Smoothing prior of an inversion
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[non_exhaustive]
pub enum Regularization {
    /// One coefficient for every pair of neighbouring pixels
    Constant { coefficient: f64 },
    /// Separate coefficients for high and low signal pixels
    Weighted {
        coefficients: (f64, f64),
        signal_scale: f64,
    },
}

impl Default for Regularization {
    fn default() -> Self {
        Self::Constant { coefficient: 1.0 }
    }
}

impl Regularization {
    pub fn weighted(coefficients: (f64, f64), signal_scale: f64) -> Self {
        Self::Weighted {
            coefficients,
            signal_scale,
        }
    }

    /// Mean galaxy flux of every source pixel, normalised by the brightest pixel and raised to
    /// the signal scale
    ///
    /// Constant regularization does not depend on the signal, every pixel gets unit signal.
    /// Pixels no image pixel maps to get zero signal.
    pub fn pixel_signals_from_images(
        &self,
        pixels: usize,
        regular_to_pixelization: &[usize],
        galaxy_image: ArrayView1<f64>,
    ) -> Array1<f64> {
        let signal_scale = match self {
            Self::Constant { .. } => return Array1::ones(pixels),
            Self::Weighted { signal_scale, .. } => *signal_scale,
        };
        let mut signals = Array1::zeros(pixels);
        let mut sizes = Array1::<usize>::zeros(pixels);
        for (&pixel, &flux) in regular_to_pixelization.iter().zip(galaxy_image.iter()) {
            signals[pixel] += flux;
            sizes[pixel] += 1;
        }
        Zip::from(&mut signals).and(&sizes).for_each(|signal, &size| {
            if size > 0 {
                *signal /= size as f64;
            }
        });
        let max = signals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if max > 0.0 {
            signals.mapv_inplace(|signal| (signal / max).powf(signal_scale));
        }
        signals
    }

    /// `(c_high s + c_low (1 - s))^2` for every pixel signal `s`
    pub fn regularization_weights_from_pixel_signals(
        &self,
        pixel_signals: ArrayView1<f64>,
    ) -> Array1<f64> {
        match self {
            Self::Constant { coefficient } => pixel_signals.mapv(|_| coefficient.powi(2)),
            Self::Weighted {
                coefficients: (high, low),
                ..
            } => pixel_signals.mapv(|s| (high * s + low * (1.0 - s)).powi(2)),
        }
    }
}

/// Rectangular source-plane pixel grid fitted to a set of coordinates
#[derive(Clone, Debug, PartialEq)]
pub struct RectangularGeometry<T> {
    shape: (usize, usize),
    pixel_scales: (T, T),
    origin: Coordinate<T>,
    y_max: T,
    x_min: T,
}

impl<T> RectangularGeometry<T>
where
    T: Float,
{
    /// Bounding box of the grid widened by a small buffer so edge points fall inside it,
    /// `None` for an empty grid
    pub fn from_grid(shape: (usize, usize), grid: &Grid<T>) -> Option<Self> {
        let buffer: T = 1e-8_f64.approx().unwrap();
        let (y_min, y_max, x_min, x_max) = grid.extent()?;
        let (y_min, y_max) = (y_min - buffer, y_max + buffer);
        let (x_min, x_max) = (x_min - buffer, x_max + buffer);
        let rows: T = shape.0.approx().unwrap();
        let cols: T = shape.1.approx().unwrap();
        Some(Self {
            shape,
            pixel_scales: ((y_max - y_min) / rows, (x_max - x_min) / cols),
            origin: Coordinate::new((y_max + y_min) * T::half(), (x_max + x_min) * T::half()),
            y_max,
            x_min,
        })
    }

    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    pub fn pixel_scales(&self) -> (T, T) {
        self.pixel_scales
    }

    pub fn origin(&self) -> Coordinate<T> {
        self.origin
    }

    /// Raster index of the pixel containing the coordinate, row 0 at the largest y
    pub fn pixel_index(&self, c: Coordinate<T>) -> usize {
        let index = |offset: T, scale: T, size: usize| -> usize {
            let i = (offset / scale).floor().to_usize().unwrap_or(0);
            i.min(size - 1)
        };
        let row = index(self.y_max - c.y, self.pixel_scales.0, self.shape.0);
        let col = index(c.x - self.x_min, self.pixel_scales.1, self.shape.1);
        row * self.shape.1 + col
    }
}

/// Pixelization paired with the grids of the plane it reconstructs
#[derive(Clone, Debug, PartialEq)]
pub struct Mapper<T: Float> {
    pixelization: Pixelization,
    grid_stack: GridStack<T>,
}

impl<T> Mapper<T>
where
    T: Float,
{
    pub fn new(pixelization: Pixelization, grid_stack: GridStack<T>) -> Self {
        Self {
            pixelization,
            grid_stack,
        }
    }

    pub fn pixelization(&self) -> &Pixelization {
        &self.pixelization
    }

    pub fn grid_stack(&self) -> &GridStack<T> {
        &self.grid_stack
    }

    pub fn pixels(&self) -> usize {
        self.pixelization.pixels()
    }

    /// Geometry of a rectangular pixelization over the sub-grid, `None` for other pixelizations
    pub fn rectangular_geometry(&self) -> Option<RectangularGeometry<T>> {
        match self.pixelization {
            Pixelization::Rectangular { shape } => {
                RectangularGeometry::from_grid(shape, self.grid_stack.sub().grid())
            }
            Pixelization::Voronoi { .. } => None,
        }
    }

    /// Source pixel of every regular-grid coordinate
    pub fn regular_to_pixelization(&self) -> Option<Vec<usize>> {
        let geometry = self.rectangular_geometry()?;
        Some(
            self.grid_stack
                .regular()
                .coordinates()
                .map(|c| geometry.pixel_index(c))
                .collect(),
        )
    }

    /// Source pixel of every sub-grid coordinate
    pub fn sub_to_pixelization(&self) -> Option<Vec<usize>> {
        let geometry = self.rectangular_geometry()?;
        Some(
            self.grid_stack
                .sub()
                .grid()
                .coordinates()
                .map(|c| geometry.pixel_index(c))
                .collect(),
        )
    }
}
