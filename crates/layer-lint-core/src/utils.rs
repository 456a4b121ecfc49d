//! Utility functions shared by the graph builder and rule implementations.

pub mod names;

#[doc(inline)]
pub use names::{last_segment, leading_segments, name_matches, root_segment, segments};
