pub mod grid;

pub use grid::GridOptions;
