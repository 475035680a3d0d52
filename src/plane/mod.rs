//! Planes of galaxies at a common redshift

#[allow(clippy::module_inception)]
mod plane;
pub(crate) use plane::common_redshift;
pub use plane::Plane;

mod plane_image;
pub use plane_image::PlaneImage;
