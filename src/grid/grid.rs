use crate::error::GridError;
use crate::float_trait::Float;
use crate::geometry::Coordinate;

use conv::prelude::*;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Zip};
use serde::{Deserialize, Serialize};

/// Ordered sequence of (y, x) coordinates stored as an `(n, 2)` array
///
/// The order of the rows is the order of every array evaluated on the grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Array2<T>", into = "Array2<T>")]
#[serde(bound = "T: Float")]
pub struct Grid<T> {
    array: Array2<T>,
}

impl<T> TryFrom<Array2<T>> for Grid<T>
where
    T: Float,
{
    type Error = GridError;

    fn try_from(array: Array2<T>) -> Result<Self, Self::Error> {
        Self::new(array)
    }
}

impl<T> From<Grid<T>> for Array2<T> {
    fn from(grid: Grid<T>) -> Self {
        grid.array
    }
}

impl<T> Grid<T>
where
    T: Float,
{
    pub fn new(array: Array2<T>) -> Result<Self, GridError> {
        if array.ncols() != 2 {
            return Err(GridError::NotTwoColumns(array.ncols()));
        }
        Ok(Self { array })
    }

    pub fn empty() -> Self {
        Self {
            array: Array2::zeros((0, 2)),
        }
    }

    pub fn from_coordinates(coordinates: impl IntoIterator<Item = Coordinate<T>>) -> Self {
        let flat: Vec<T> = coordinates.into_iter().flat_map(|c| [c.y, c.x]).collect();
        let n = flat.len() / 2;
        Self {
            array: Array2::from_shape_vec((n, 2), flat).expect("two values per coordinate"),
        }
    }

    /// Pixel centres of a full `shape` array with row 0 at the largest y and column 0 at the
    /// smallest x
    pub fn uniform(shape: (usize, usize), pixel_scales: (T, T), origin: Coordinate<T>) -> Self {
        let (rows, cols) = shape;
        let y_centre: T = (rows as f64 - 1.0).approx().unwrap();
        let y_centre = y_centre * T::half();
        let x_centre: T = (cols as f64 - 1.0).approx().unwrap();
        let x_centre = x_centre * T::half();
        Self::from_coordinates((0..rows).flat_map(|row| {
            let row: T = row.approx().unwrap();
            (0..cols).map(move |col| {
                let col: T = col.approx().unwrap();
                Coordinate::new(
                    origin.y - (row - y_centre) * pixel_scales.0,
                    origin.x + (col - x_centre) * pixel_scales.1,
                )
            })
        }))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.array.nrows()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_array(&self) -> ArrayView2<'_, T> {
        self.array.view()
    }

    pub fn coordinate(&self, index: usize) -> Coordinate<T> {
        Coordinate::new(self.array[(index, 0)], self.array[(index, 1)])
    }

    pub fn set_coordinate(&mut self, index: usize, c: Coordinate<T>) {
        self.array[(index, 0)] = c.y;
        self.array[(index, 1)] = c.x;
    }

    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate<T>> + '_ {
        self.array
            .rows()
            .into_iter()
            .map(|row| Coordinate::new(row[0], row[1]))
    }

    /// Evaluate `f` at every coordinate, keeping the grid order
    ///
    /// Runs on the rayon thread pool when the `parallel` feature is enabled.
    pub fn map_coordinates<R, F>(&self, f: F) -> Array1<R>
    where
        R: Send,
        F: Fn(Coordinate<T>) -> R + Sync + Send,
    {
        let zip = Zip::from(self.array.rows());
        let f = |row: ArrayView1<T>| f(Coordinate::new(row[0], row[1]));
        #[cfg(feature = "parallel")]
        {
            zip.par_map_collect(f)
        }
        #[cfg(not(feature = "parallel"))]
        {
            zip.map_collect(f)
        }
    }

    /// Evaluate a vector field at every coordinate, returning an `(n, 2)` array of (y, x) rows
    pub fn map_coordinates_to_vectors<F>(&self, f: F) -> Array2<T>
    where
        F: Fn(Coordinate<T>) -> Coordinate<T> + Sync + Send,
    {
        let vectors = self.map_coordinates(f);
        let mut output = Array2::zeros((self.len(), 2));
        Zip::from(output.rows_mut())
            .and(&vectors)
            .for_each(|mut row, v| {
                row[0] = v.y;
                row[1] = v.x;
            });
        output
    }

    /// New grid with every coordinate shifted by `-deflections`
    pub fn traced(&self, deflections: ArrayView2<T>) -> Result<Self, GridError> {
        if deflections.dim() != self.array.dim() {
            return Err(GridError::LengthMismatch {
                actual: deflections.nrows(),
                expected: self.len(),
            });
        }
        Ok(Self {
            array: &self.array - &deflections,
        })
    }

    /// `(y_min, y_max, x_min, x_max)`, `None` for an empty grid
    pub fn extent(&self) -> Option<(T, T, T, T)> {
        if self.is_empty() {
            return None;
        }
        let fold = |column: usize| {
            self.array
                .column(column)
                .fold((T::infinity(), T::neg_infinity()), |(min, max), &v| {
                    (min.min(v), max.max(v))
                })
        };
        let (y_min, y_max) = fold(0);
        let (x_min, x_max) = fold(1);
        Some((y_min, y_max, x_min, x_max))
    }
}

/// Grid oversampled by `sub_grid_size^2` points per regular pixel
///
/// Sub-pixels of one pixel are contiguous and pixels follow the regular grid order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "T: Float")]
pub struct SubGrid<T> {
    grid: Grid<T>,
    sub_grid_size: usize,
}

impl<T> SubGrid<T>
where
    T: Float,
{
    pub fn new(grid: Grid<T>, sub_grid_size: usize) -> Result<Self, GridError> {
        if sub_grid_size == 0 {
            return Err(GridError::ZeroSubGridSize);
        }
        let per_pixel = sub_grid_size * sub_grid_size;
        if grid.len() % per_pixel != 0 {
            return Err(GridError::LengthMismatch {
                actual: grid.len(),
                expected: (grid.len() / per_pixel + 1) * per_pixel,
            });
        }
        Ok(Self {
            grid,
            sub_grid_size,
        })
    }

    pub fn grid(&self) -> &Grid<T> {
        &self.grid
    }

    pub fn into_grid(self) -> Grid<T> {
        self.grid
    }

    pub fn sub_grid_size(&self) -> usize {
        self.sub_grid_size
    }

    pub fn sub_pixels_per_pixel(&self) -> usize {
        self.sub_grid_size * self.sub_grid_size
    }

    pub fn regular_pixels(&self) -> usize {
        self.grid.len() / self.sub_pixels_per_pixel()
    }

    /// Bin sub-grid values to the regular grid: each pixel is the mean of its sub-pixels
    pub fn regular_data_1d_from_sub_data_1d(
        &self,
        sub_data: &Array1<T>,
    ) -> Result<Array1<T>, GridError> {
        self.check_len(sub_data.len())?;
        let per_pixel = self.sub_pixels_per_pixel();
        let norm: T = per_pixel.approx().unwrap();
        Ok(sub_data
            .exact_chunks(per_pixel)
            .into_iter()
            .map(|chunk| chunk.iter().copied().sum::<T>() / norm)
            .collect())
    }

    /// Bin sub-grid (y, x) vectors to the regular grid, column by column
    pub fn regular_vectors_from_sub_vectors(
        &self,
        sub_vectors: &Array2<T>,
    ) -> Result<Array2<T>, GridError> {
        self.check_len(sub_vectors.nrows())?;
        let per_pixel = self.sub_pixels_per_pixel();
        let norm: T = per_pixel.approx().unwrap();
        let mut output = Array2::zeros((self.regular_pixels(), 2));
        for (mut row, chunk) in output
            .rows_mut()
            .into_iter()
            .zip(sub_vectors.exact_chunks((per_pixel, 2)))
        {
            for column in 0..2 {
                row[column] = chunk.column(column).iter().copied().sum::<T>() / norm;
            }
        }
        Ok(output)
    }

    fn check_len(&self, actual: usize) -> Result<(), GridError> {
        if actual == self.grid.len() {
            Ok(())
        } else {
            Err(GridError::LengthMismatch {
                actual,
                expected: self.grid.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ndarray::array;

    #[test]
    fn requires_two_columns() {
        assert_eq!(
            Grid::new(Array2::<f64>::zeros((3, 3))),
            Err(GridError::NotTwoColumns(3))
        );
    }

    #[test]
    fn map_keeps_order() {
        let grid = Grid::from_coordinates((0..10).map(|i| Coordinate::new(i as f64, -(i as f64))));
        let values = grid.map_coordinates(|c| c.y - c.x);
        assert_eq!(values, Array1::from_iter((0..10).map(|i| 2.0 * i as f64)));
    }

    #[test]
    fn vectors_are_y_x_rows() {
        let grid = Grid::from_coordinates([Coordinate::new(1.0, 2.0), Coordinate::new(3.0, 4.0)]);
        let vectors = grid.map_coordinates_to_vectors(|c| Coordinate::new(c.x, c.y));
        assert_eq!(vectors, array![[2.0, 1.0], [4.0, 3.0]]);
    }

    #[test]
    fn traced_subtracts_deflections() {
        let grid = Grid::from_coordinates([Coordinate::new(1.0, 1.0), Coordinate::new(0.0, 2.0)]);
        let traced = grid
            .traced(array![[0.5, 1.0], [-1.0, 0.0]].view())
            .unwrap();
        assert_eq!(traced.coordinate(0), Coordinate::new(0.5, 0.0));
        assert_eq!(traced.coordinate(1), Coordinate::new(1.0, 2.0));
        assert!(grid.traced(Array2::zeros((3, 2)).view()).is_err());
    }

    #[test]
    fn uniform_grid_orientation() {
        let grid = Grid::uniform((2, 3), (1.0, 2.0), Coordinate::new(10.0, 0.0));
        assert_eq!(grid.len(), 6);
        assert_eq!(grid.coordinate(0), Coordinate::new(10.5, -2.0));
        assert_eq!(grid.coordinate(5), Coordinate::new(9.5, 2.0));
        assert_eq!(grid.extent(), Some((9.5, 10.5, -2.0, 2.0)));
    }

    #[test]
    fn uniform_grid_single_precision() {
        let grid = Grid::<f32>::uniform((3, 2), (0.5, 0.5), Coordinate::origin());
        assert_eq!(grid.coordinate(0), Coordinate::new(0.5, -0.25));
        assert_eq!(grid.coordinate(5), Coordinate::new(-0.5, 0.25));
    }

    #[test]
    fn sub_grid_binning_is_mean_of_sub_pixels() {
        let grid = Grid::from_coordinates((0..8).map(|_| Coordinate::origin()));
        let sub = SubGrid::new(grid, 2).unwrap();
        let data = array![1.0, 2.0, 3.0, 4.0, 10.0, 20.0, 30.0, 40.0];
        assert_eq!(
            sub.regular_data_1d_from_sub_data_1d(&data).unwrap(),
            array![2.5, 25.0]
        );
        let vectors = array![
            [1.0, 0.0],
            [1.0, 0.0],
            [1.0, 4.0],
            [1.0, 0.0],
            [2.0, 2.0],
            [2.0, 2.0],
            [2.0, 2.0],
            [6.0, 2.0]
        ];
        assert_eq!(
            sub.regular_vectors_from_sub_vectors(&vectors).unwrap(),
            array![[1.0, 1.0], [3.0, 2.0]]
        );
    }

    #[test]
    fn sub_grid_validation() {
        let grid = Grid::<f32>::from_coordinates((0..6).map(|_| Coordinate::origin()));
        assert_eq!(
            SubGrid::new(grid.clone(), 0),
            Err(GridError::ZeroSubGridSize)
        );
        assert!(SubGrid::new(grid, 2).is_err());
    }

    #[test]
    fn serde_rejects_wrong_shape() {
        let grid = Grid::from_coordinates([Coordinate::new(1.0_f64, 2.0)]);
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(serde_json::from_str::<Grid<f64>>(&json).unwrap(), grid);

        let wrong = serde_json::to_string(&Array2::<f64>::zeros((2, 3))).unwrap();
        assert!(serde_json::from_str::<Grid<f64>>(&wrong).is_err());
    }
}
