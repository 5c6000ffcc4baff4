//! Heuristics for tour construction and improvement.

pub mod construction;
pub mod local_search;

pub use construction::*;
pub use local_search::*;
