//! sarstack: search, stack, and download SAR acquisitions
//!
//! This library queries a CMR-backed SearchAPI for satellite radar products,
//! builds baseline stacks around a reference acquisition, and feeds ordered
//! stacks to a parallel download worker pool.

pub mod types;
pub mod core;
pub mod io;

// Re-export main types and functions for easier access
pub use types::{
    BaselineAnnotation, Coordinate, Geometry, Product, Ring, Stack, StackEntry, StackError,
    StackResult,
};

pub use crate::core::{
    BaselineCalculator, BaselineReport, NeighborSelector, PerpendicularStrategy,
    ReferenceStrategy, StackAssembler, StackParamBuilder, StackQuerySpec,
};

pub use io::{SearchClient, Session};
