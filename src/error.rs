/// Error returned from profile and cosmology constructors
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ProfileError {
    #[error("{parameter} must be a positive finite number, got {value}")]
    NonPositive { parameter: &'static str, value: f64 },

    #[error("{parameter} must be finite, got {value}")]
    NonFinite { parameter: &'static str, value: f64 },

    #[error("axis ratio must be in (0, 1], got {0}")]
    AxisRatioOutOfRange(f64),
}

/// Error returned when a coordinate arrives in the wrong frame
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CoordinatesError {
    #[error("coordinate is already in the profile reference frame")]
    AlreadyTransformed,

    #[error("coordinate is not in the profile reference frame")]
    NotTransformed,
}

/// Error returned from numerical quadrature
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum IntegrationError {
    #[error(
        "quadrature did not converge after {subdivisions} subdivisions, estimated error {estimated_error:e}"
    )]
    NotConverged {
        subdivisions: usize,
        estimated_error: f64,
    },

    #[error("integrand is not finite on [{lower}, {upper}]")]
    NonFinite { lower: f64, upper: f64 },
}

/// Error returned from [crate::Galaxy] constructors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GalaxyError {
    #[error("galaxy has a pixelization but no regularization")]
    PixelizationWithoutRegularization,

    #[error("galaxy has a regularization but no pixelization")]
    RegularizationWithoutPixelization,
}

/// Error returned from pixelization constructors and plane pixelization lookups
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PixelizationError {
    #[error("{0} galaxies of a plane have a pixelization, at most one is allowed")]
    MultiplePixelizations(usize),

    #[error("rectangular pixelization must be at least 3x3, got {0:?}")]
    RectangularShape((usize, usize)),
}

/// Error returned from masks, grids and their mappings
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GridError {
    #[error("grid array must have two columns (y, x), got {0}")]
    NotTwoColumns(usize),

    #[error("array length {actual} does not match the expected {expected}")]
    LengthMismatch { actual: usize, expected: usize },

    #[error("sub-grid size must be positive")]
    ZeroSubGridSize,

    #[error("blurring region of pixel ({row}, {col}) extends beyond the mask array, pad the array")]
    BlurringOutOfBounds { row: usize, col: usize },

    #[error("shape {actual:?} does not match the mask shape {expected:?}")]
    ShapeMismatch {
        actual: (usize, usize),
        expected: (usize, usize),
    },
}

/// Error returned from [crate::Plane] and [crate::Tracer] constructors
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RayTracingError {
    #[error("a plane must contain at least one galaxy")]
    NoGalaxies,

    #[error("a tracer must contain at least one plane")]
    NoPlanes,

    #[error("galaxies of a plane have different redshifts: {0:?}")]
    InconsistentRedshifts(Vec<Option<f64>>),

    #[error("multi-plane tracing requires every galaxy to have a redshift")]
    MissingRedshift,

    #[error("redshift {0} is not finite")]
    NonFiniteRedshift(f64),

    #[error("plane redshifts must increase, got {next} after {previous}")]
    NonMonotonicRedshifts { previous: f64, next: f64 },

    #[error("the plane has no deflections to trace through")]
    NoDeflections,

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Integration(#[from] IntegrationError),
}
