//! Core baseline-stacking algorithms
//!
//! Everything in this module is a pure, synchronous computation over
//! already-fetched products; network and filesystem work lives in `io`.

pub mod assemble;
pub mod baseline;
pub mod geometry;
pub mod neighbors;
pub mod stack_params;

// Re-export main types
pub use assemble::{ReferenceStrategy, StackAssembler};
pub use baseline::{BaselineCalculator, BaselineReport, PerpendicularStrategy};
pub use neighbors::NeighborSelector;
pub use stack_params::{StackParamBuilder, StackQuerySpec};
