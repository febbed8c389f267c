// Common utilities shared by sinks, sources and the EWF reader

pub mod binary;
pub mod entropy;
pub mod format;
pub mod hash;
pub mod io_pool;
pub mod segments;

// Re-exports for convenience
pub use format::file_size;
pub use hash::{compute_hash, HashAlgorithm, StreamingHasher};
