//! Path normalization and root-relative path computation.

pub mod normalize;

pub use normalize::{PathNormalizer, RelPath, RelativePath};
