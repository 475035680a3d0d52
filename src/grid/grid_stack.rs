use crate::error::GridError;
use crate::float_trait::Float;
use crate::grid::grid::{Grid, SubGrid};
use crate::grid::mask::Mask;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Regular, sub and blurring grids derived from one mask
///
/// The mask is kept to map 1D results back to 2D images. Tracing shifts the coordinates of all
/// three grids but never the mask, so a traced stack still maps to the original pixel layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "T: Float")]
pub struct GridStack<T> {
    mask: Mask<T>,
    regular: Grid<T>,
    sub: SubGrid<T>,
    blurring: Grid<T>,
}

impl<T> GridStack<T>
where
    T: Float,
{
    /// Assemble a stack from explicit grids, checking their sizes against the mask
    pub fn new(
        mask: Mask<T>,
        regular: Grid<T>,
        sub: SubGrid<T>,
        blurring: Grid<T>,
    ) -> Result<Self, GridError> {
        let pixels = mask.pixels_in_mask();
        if regular.len() != pixels {
            return Err(GridError::LengthMismatch {
                actual: regular.len(),
                expected: pixels,
            });
        }
        if sub.regular_pixels() != pixels {
            return Err(GridError::LengthMismatch {
                actual: sub.grid().len(),
                expected: pixels * sub.sub_pixels_per_pixel(),
            });
        }
        Ok(Self {
            mask,
            regular,
            sub,
            blurring,
        })
    }

    pub fn from_mask_sub_grid_size_and_psf_shape(
        mask: Mask<T>,
        sub_grid_size: usize,
        psf_shape: (usize, usize),
    ) -> Result<Self, GridError> {
        let regular = mask.regular_grid();
        let sub = mask.sub_grid(sub_grid_size)?;
        let blurring = mask.blurring_mask(psf_shape)?.regular_grid();
        Self::new(mask, regular, sub, blurring)
    }

    /// Stack with an empty blurring grid
    pub fn from_mask_and_sub_grid_size(
        mask: Mask<T>,
        sub_grid_size: usize,
    ) -> Result<Self, GridError> {
        let regular = mask.regular_grid();
        let sub = mask.sub_grid(sub_grid_size)?;
        Self::new(mask, regular, sub, Grid::empty())
    }

    pub fn mask(&self) -> &Mask<T> {
        &self.mask
    }

    pub fn regular(&self) -> &Grid<T> {
        &self.regular
    }

    pub fn sub(&self) -> &SubGrid<T> {
        &self.sub
    }

    pub fn blurring(&self) -> &Grid<T> {
        &self.blurring
    }

    /// Shift every grid by `-deflections`
    pub fn traced(&self, deflections: &DeflectionStack<T>) -> Result<Self, GridError> {
        Ok(Self {
            mask: self.mask.clone(),
            regular: self.regular.traced(deflections.regular.view())?,
            sub: SubGrid::new(
                self.sub.grid().traced(deflections.sub.view())?,
                self.sub.sub_grid_size(),
            )?,
            blurring: self.blurring.traced(deflections.blurring.view())?,
        })
    }
}

/// Deflection angles evaluated on each grid of a [GridStack], as `(n, 2)` (y, x) arrays
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "T: Float")]
pub struct DeflectionStack<T> {
    pub regular: Array2<T>,
    pub sub: Array2<T>,
    pub blurring: Array2<T>,
}

impl<T> DeflectionStack<T>
where
    T: Float,
{
    pub fn zeros_like(grid_stack: &GridStack<T>) -> Self {
        Self {
            regular: Array2::zeros((grid_stack.regular.len(), 2)),
            sub: Array2::zeros((grid_stack.sub.grid().len(), 2)),
            blurring: Array2::zeros((grid_stack.blurring.len(), 2)),
        }
    }

    pub fn scaled(&self, factor: T) -> Self {
        Self {
            regular: &self.regular * factor,
            sub: &self.sub * factor,
            blurring: &self.blurring * factor,
        }
    }

    /// `self += factor * other`
    pub fn scaled_add(&mut self, factor: T, other: &Self) {
        self.regular.scaled_add(factor, &other.regular);
        self.sub.scaled_add(factor, &other.sub);
        self.blurring.scaled_add(factor, &other.blurring);
    }
}
