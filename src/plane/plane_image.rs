use crate::float_trait::Float;
use crate::geometry::Coordinate;

use conv::prelude::*;
use ndarray::{Array1, Array2};

/// Light of a plane evaluated on a uniform grid covering its traced coordinates
///
/// Row 0 holds the largest y and column 0 the smallest x.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaneImage<T> {
    array: Array2<T>,
    pixel_scales: (T, T),
    origin: Coordinate<T>,
}

impl<T> PlaneImage<T>
where
    T: Float,
{
    pub fn new(array: Array2<T>, pixel_scales: (T, T), origin: Coordinate<T>) -> Self {
        Self {
            array,
            pixel_scales,
            origin,
        }
    }

    pub fn array(&self) -> &Array2<T> {
        &self.array
    }

    pub fn into_array(self) -> Array2<T> {
        self.array
    }

    pub fn shape(&self) -> (usize, usize) {
        self.array.dim()
    }

    pub fn pixel_scales(&self) -> (T, T) {
        self.pixel_scales
    }

    pub fn origin(&self) -> Coordinate<T> {
        self.origin
    }

    /// Four evenly spaced y values spanning the image height, centred on zero
    pub fn yticks(&self) -> Array1<T> {
        Self::ticks(self.array.nrows(), self.pixel_scales.0)
    }

    /// Four evenly spaced x values spanning the image width, centred on zero
    pub fn xticks(&self) -> Array1<T> {
        Self::ticks(self.array.ncols(), self.pixel_scales.1)
    }

    fn ticks(size: usize, pixel_scale: T) -> Array1<T> {
        let half_extent = size.approx_as::<T>().unwrap() * pixel_scale * T::half();
        Array1::linspace(-half_extent, half_extent, 4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn ticks_span_the_image() {
        let image = PlaneImage::new(
            Array2::<f64>::zeros((3, 6)),
            (0.5, 2.0),
            Coordinate::new(1.0, -1.0),
        );
        assert_eq!(image.shape(), (3, 6));
        let xticks = image.xticks();
        assert_eq!(xticks.len(), 4);
        assert_relative_eq!(xticks[0], -6.0);
        assert_relative_eq!(xticks[1], -2.0);
        assert_relative_eq!(xticks[3], 6.0);
        let yticks = image.yticks();
        assert_relative_eq!(yticks[0], -0.75);
        assert_relative_eq!(yticks[2], 0.25);
    }
}
