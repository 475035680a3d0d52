use crate::error::GridError;
use crate::float_trait::Float;
use crate::geometry::{Coordinate, EllipticalGeometry, GeometryProfile};
use crate::grid::grid::{Grid, SubGrid};

use conv::prelude::*;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

/// Boolean pixel mask, `true` marks a masked (excluded) pixel
///
/// Pixel centres follow the grid convention: row 0 holds the largest y, column 0 the smallest x
/// and the array centre sits at the origin. Unmasked pixels are enumerated in raster order, which
/// is the order of every 1D array derived from the mask.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "T: Float")]
pub struct Mask<T> {
    array: Array2<bool>,
    pixel_scale: T,
}

impl<T> Mask<T>
where
    T: Float,
{
    pub fn new(array: Array2<bool>, pixel_scale: T) -> Self {
        assert!(
            pixel_scale.is_normal() && pixel_scale.is_sign_positive(),
            "pixel scale must be a positive normal number"
        );
        Self { array, pixel_scale }
    }

    pub fn unmasked(shape: (usize, usize), pixel_scale: T) -> Self {
        Self::new(Array2::from_elem(shape, false), pixel_scale)
    }

    /// Unmask pixels whose centre predicate holds
    fn from_predicate(
        shape: (usize, usize),
        pixel_scale: T,
        keep: impl Fn(Coordinate<T>) -> bool,
    ) -> Self {
        let mut mask = Self::new(Array2::from_elem(shape, true), pixel_scale);
        mask.array = Array2::from_shape_fn(shape, |(row, col)| !keep(mask.pixel_centre(row, col)));
        mask
    }

    pub fn circular(
        shape: (usize, usize),
        pixel_scale: T,
        radius: T,
        centre: Coordinate<T>,
    ) -> Self {
        Self::from_predicate(shape, pixel_scale, |c| (c - centre).radius() <= radius)
    }

    pub fn circular_annular(
        shape: (usize, usize),
        pixel_scale: T,
        inner_radius: T,
        outer_radius: T,
        centre: Coordinate<T>,
    ) -> Self {
        Self::from_predicate(shape, pixel_scale, |c| {
            let r = (c - centre).radius();
            inner_radius <= r && r <= outer_radius
        })
    }

    /// Unmask pixels inside the ellipse of the given semi-major axis
    pub fn elliptical(
        shape: (usize, usize),
        pixel_scale: T,
        geometry: &EllipticalGeometry<T>,
        major_axis: T,
    ) -> Self {
        Self::from_predicate(shape, pixel_scale, |c| {
            geometry.coordinates_to_elliptical_radius(c) <= major_axis
        })
    }

    pub fn shape(&self) -> (usize, usize) {
        self.array.dim()
    }

    pub fn pixel_scale(&self) -> T {
        self.pixel_scale
    }

    pub fn as_array(&self) -> ArrayView2<'_, bool> {
        self.array.view()
    }

    #[inline]
    pub fn is_masked(&self, row: usize, col: usize) -> bool {
        self.array[(row, col)]
    }

    pub fn pixels_in_mask(&self) -> usize {
        self.array.iter().filter(|&&masked| !masked).count()
    }

    pub fn pixel_centre(&self, row: usize, col: usize) -> Coordinate<T> {
        let (rows, cols) = self.shape();
        let row: T = row.approx().unwrap();
        let col: T = col.approx().unwrap();
        let y_centre: T = (rows as f64 - 1.0).approx().unwrap();
        let y_centre = y_centre * T::half();
        let x_centre: T = (cols as f64 - 1.0).approx().unwrap();
        let x_centre = x_centre * T::half();
        Coordinate::new(
            -(row - y_centre) * self.pixel_scale,
            (col - x_centre) * self.pixel_scale,
        )
    }

    /// (row, col) of every unmasked pixel in 1D order
    pub fn grid_to_pixel(&self) -> Vec<(usize, usize)> {
        self.array
            .indexed_iter()
            .filter_map(|(index, &masked)| (!masked).then_some(index))
            .collect()
    }

    /// Scatter a 1D array over the unmasked pixels, masked pixels are zero
    pub fn map_1d_to_2d(&self, array_1d: ArrayView1<T>) -> Result<Array2<T>, GridError> {
        let pixels = self.grid_to_pixel();
        if array_1d.len() != pixels.len() {
            return Err(GridError::LengthMismatch {
                actual: array_1d.len(),
                expected: pixels.len(),
            });
        }
        let mut output = Array2::zeros(self.shape());
        for (&index, &value) in pixels.iter().zip(array_1d.iter()) {
            output[index] = value;
        }
        Ok(output)
    }

    /// Gather the unmasked pixels of a 2D array in 1D order
    pub fn map_2d_to_1d(&self, array_2d: ArrayView2<T>) -> Result<Array1<T>, GridError> {
        if array_2d.dim() != self.shape() {
            return Err(GridError::ShapeMismatch {
                actual: array_2d.dim(),
                expected: self.shape(),
            });
        }
        Ok(self
            .grid_to_pixel()
            .into_iter()
            .map(|index| array_2d[index])
            .collect())
    }

    /// Masked pixels whose light a PSF of `psf_shape` would spread into the unmasked region
    pub fn blurring_mask(&self, psf_shape: (usize, usize)) -> Result<Self, GridError> {
        let (rows, cols) = self.shape();
        let half_range = |size: usize| {
            let size = size as isize;
            (-size + 1).div_euclid(2)..(size + 1).div_euclid(2)
        };
        let mut blurring = Array2::from_elem(self.shape(), true);
        for ((row, col), &masked) in self.array.indexed_iter() {
            if masked {
                continue;
            }
            for dy in half_range(psf_shape.0) {
                for dx in half_range(psf_shape.1) {
                    let y = row as isize + dy;
                    let x = col as isize + dx;
                    if y < 0 || x < 0 || y >= rows as isize || x >= cols as isize {
                        return Err(GridError::BlurringOutOfBounds { row, col });
                    }
                    let index = (y as usize, x as usize);
                    if self.array[index] {
                        blurring[index] = false;
                    }
                }
            }
        }
        Ok(Self::new(blurring, self.pixel_scale))
    }

    /// Centres of the unmasked pixels
    pub fn regular_grid(&self) -> Grid<T> {
        Grid::from_coordinates(
            self.grid_to_pixel()
                .into_iter()
                .map(|(row, col)| self.pixel_centre(row, col)),
        )
    }

    /// `sub_grid_size^2` evenly spaced points per unmasked pixel, raster-ordered within a pixel
    pub fn sub_grid(&self, sub_grid_size: usize) -> Result<SubGrid<T>, GridError> {
        if sub_grid_size == 0 {
            return Err(GridError::ZeroSubGridSize);
        }
        let half = self.pixel_scale * T::half();
        let step = self.pixel_scale / (sub_grid_size + 1).approx().unwrap();
        let offsets: Vec<T> = (1..=sub_grid_size)
            .map(|i| step * i.approx().unwrap() - half)
            .collect();
        let grid = Grid::from_coordinates(self.grid_to_pixel().into_iter().flat_map(
            |(row, col)| {
                let centre = self.pixel_centre(row, col);
                let offsets = &offsets;
                offsets.iter().flat_map(move |&dy| {
                    offsets
                        .iter()
                        .map(move |&dx| Coordinate::new(centre.y - dy, centre.x + dx))
                })
            },
        ));
        SubGrid::new(grid, sub_grid_size)
    }

    /// Index of the regular pixel of every sub-pixel
    pub fn sub_to_regular(&self, sub_grid_size: usize) -> Vec<usize> {
        let per_pixel = sub_grid_size * sub_grid_size;
        (0..self.pixels_in_mask())
            .flat_map(|pixel| std::iter::repeat_n(pixel, per_pixel))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unreadable_literal)]
#[allow(clippy::excessive_precision)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use ndarray::array;

    fn cross_mask() -> Mask<f64> {
        Mask::new(
            array![
                [true, true, true, true, true],
                [true, true, false, true, true],
                [true, false, false, false, true],
                [true, true, false, true, true],
                [true, true, true, true, true],
            ],
            1.0,
        )
    }

    #[test]
    fn pixel_centres() {
        let mask = Mask::<f64>::unmasked((3, 4), 2.0);
        assert_eq!(mask.pixel_centre(0, 0), Coordinate::new(2.0, -3.0));
        assert_eq!(mask.pixel_centre(2, 3), Coordinate::new(-2.0, 3.0));
        assert_eq!(mask.pixel_centre(1, 1), Coordinate::new(0.0, -1.0));

        let mask = Mask::<f32>::unmasked((2, 5), 0.5);
        assert_eq!(mask.pixel_centre(0, 0), Coordinate::new(0.25, -1.0));
        assert_eq!(mask.pixel_centre(1, 2), Coordinate::new(-0.25, 0.0));
    }

    #[test]
    fn circular_mask() {
        let mask = Mask::<f64>::circular((3, 3), 1.0, 0.5, Coordinate::origin());
        assert_eq!(mask.pixels_in_mask(), 1);
        assert!(!mask.is_masked(1, 1));

        let mask = Mask::<f64>::circular((3, 3), 1.0, 1.3, Coordinate::origin());
        assert_eq!(mask.as_array(), cross_mask().as_array().slice(ndarray::s![1..4, 1..4]));

        let mask = Mask::<f64>::circular((3, 3), 1.0, 0.5, Coordinate::new(1.0, -1.0));
        assert_eq!(mask.grid_to_pixel(), vec![(0, 0)]);
    }

    #[test]
    fn annular_mask() {
        let mask = Mask::<f64>::circular_annular((3, 3), 1.0, 0.5, 1.1, Coordinate::origin());
        assert_eq!(mask.grid_to_pixel(), vec![(0, 1), (1, 0), (1, 2), (2, 1)]);
    }

    #[test]
    fn elliptical_mask_follows_position_angle() {
        let horizontal = EllipticalGeometry::new(Coordinate::origin(), 0.5, 0.0).unwrap();
        let mask = Mask::<f64>::elliptical((5, 5), 1.0, &horizontal, 2.5);
        assert_eq!(
            mask.grid_to_pixel(),
            vec![
                (1, 1),
                (1, 2),
                (1, 3),
                (2, 0),
                (2, 1),
                (2, 2),
                (2, 3),
                (2, 4),
                (3, 1),
                (3, 2),
                (3, 3)
            ]
        );

        let vertical = EllipticalGeometry::new(Coordinate::origin(), 0.5, 90.0).unwrap();
        let mask = Mask::<f64>::elliptical((5, 5), 1.0, &vertical, 2.5);
        assert_eq!(
            mask.grid_to_pixel(),
            vec![
                (0, 2),
                (1, 1),
                (1, 2),
                (1, 3),
                (2, 1),
                (2, 2),
                (2, 3),
                (3, 1),
                (3, 2),
                (3, 3),
                (4, 2)
            ]
        );
    }

    #[test]
    fn one_to_two_dimensions() {
        let mask = cross_mask();
        let array_1d = array![1.0, 2.0, 3.0, 4.0, 5.0];
        let array_2d = mask.map_1d_to_2d(array_1d.view()).unwrap();
        assert_eq!(array_2d[(1, 2)], 1.0);
        assert_eq!(array_2d[(2, 1)], 2.0);
        assert_eq!(array_2d[(3, 2)], 5.0);
        assert_eq!(array_2d.sum(), 15.0);
        assert_eq!(mask.map_2d_to_1d(array_2d.view()).unwrap(), array_1d);

        assert!(mask.map_1d_to_2d(array![1.0].view()).is_err());
        assert!(mask.map_2d_to_1d(Array2::zeros((2, 2)).view()).is_err());
    }

    #[test]
    fn blurring_mask() {
        let mask = cross_mask();
        let blurring = mask.blurring_mask((3, 3)).unwrap();
        assert_eq!(
            blurring.as_array(),
            array![
                [true, false, false, false, true],
                [false, false, true, false, false],
                [false, true, true, true, false],
                [false, false, true, false, false],
                [true, false, false, false, true],
            ]
        );
        assert_eq!(
            mask.blurring_mask((5, 5)),
            Err(GridError::BlurringOutOfBounds { row: 1, col: 2 })
        );
    }

    #[test]
    fn regular_and_sub_grids() {
        let mask = Mask::new(array![[true, true, true], [true, false, false]], 3.0);
        let regular = mask.regular_grid();
        assert_eq!(regular.len(), 2);
        assert_eq!(regular.coordinate(0), Coordinate::new(-1.5, 0.0));
        assert_eq!(regular.coordinate(1), Coordinate::new(-1.5, 3.0));

        let sub = mask.sub_grid(2).unwrap();
        assert_eq!(sub.grid().len(), 8);
        let expected = [
            (-1.0, -0.5),
            (-1.0, 0.5),
            (-2.0, -0.5),
            (-2.0, 0.5),
            (-1.0, 2.5),
            (-1.0, 3.5),
            (-2.0, 2.5),
            (-2.0, 3.5),
        ];
        for (i, &(y, x)) in expected.iter().enumerate() {
            let c = sub.grid().coordinate(i);
            assert_relative_eq!(c.y, y, epsilon = 1e-12);
            assert_relative_eq!(c.x, x, epsilon = 1e-12);
        }
        assert_eq!(mask.sub_to_regular(2), vec![0, 0, 0, 0, 1, 1, 1, 1]);
    }

    #[test]
    fn sub_grid_of_size_one_is_regular_grid() {
        let mask = cross_mask();
        assert_eq!(mask.sub_grid(1).unwrap().into_grid(), mask.regular_grid());
        assert_eq!(mask.sub_grid(0), Err(GridError::ZeroSubGridSize));
    }
}
