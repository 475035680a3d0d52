mod coordinates;
pub use coordinates::{Coordinate, FrameCoordinate, TransformedCoordinate};

mod geometry_profile;
pub(crate) use geometry_profile::{as_f64, check_finite, check_positive};
pub use geometry_profile::{EllipticalGeometry, GeometryProfile, ReferenceFrame};
