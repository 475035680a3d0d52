pub use crate::cosmology::CosmologyTrait;
pub use crate::geometry::GeometryProfile;
pub use crate::light_profiles::LightProfileTrait;
pub use crate::mass_profiles::MassProfileTrait;
