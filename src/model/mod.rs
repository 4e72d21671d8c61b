//! Document model types for filing content representation.
//!
//! A parsed filing is an ordered sequence of [`Line`]s. Ordinary lines carry
//! text; table lines carry the table's raw content and its reconstructed
//! [`Grid`].

mod grid;
mod line;

pub use grid::Grid;
pub use line::{Line, LineKind, TableLine, Tag};
