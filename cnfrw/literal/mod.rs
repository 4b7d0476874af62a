/// Variables, polarities, and literals.
#[allow(clippy::module_inception)]
pub mod literal;

pub use crate::literal::literal::*;
