//! Galaxies: light and mass profiles sharing a redshift, with inversion and noise-scaling extras

#[allow(clippy::module_inception)]
mod galaxy;
pub use galaxy::{Galaxy, NamedProfile};

mod hyper_galaxy;
pub use hyper_galaxy::HyperGalaxy;

pub mod pixelization;
pub use pixelization::{Mapper, Pixelization, RectangularGeometry, Regularization};
