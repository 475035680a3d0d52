#[allow(clippy::module_inception)]
mod grid;
pub use grid::{Grid, SubGrid};

mod grid_stack;
pub use grid_stack::{DeflectionStack, GridStack};

mod mask;
pub use mask::Mask;
