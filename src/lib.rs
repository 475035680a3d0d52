#![doc = include_str!("../README.md")]


#[macro_use]
mod macros;

pub mod cosmology;
pub use cosmology::{Cosmology, CosmologyTrait, FlatLambdaCdm};

mod error;
pub use error::{
    CoordinatesError, GalaxyError, GridError, IntegrationError, PixelizationError, ProfileError,
    RayTracingError,
};

mod float_trait;
pub use float_trait::Float;

pub mod galaxy;
pub use galaxy::{Galaxy, HyperGalaxy, Mapper, Pixelization, Regularization};

pub mod geometry;
pub use geometry::{
    Coordinate, EllipticalGeometry, FrameCoordinate, GeometryProfile, ReferenceFrame,
    TransformedCoordinate,
};

pub mod grid;
pub use grid::{DeflectionStack, Grid, GridStack, Mask, SubGrid};

mod integrate;
pub use integrate::Quadrature;

pub mod light_profiles;
pub use light_profiles::{LightProfile, LightProfileTrait};

pub mod mass_profiles;
pub use mass_profiles::{MassProfile, MassProfileTrait};

pub mod plane;
pub use plane::{Plane, PlaneImage};

pub mod prelude;

mod tracer;
pub use tracer::Tracer;

pub use ndarray;
