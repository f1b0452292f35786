//! Utility helpers: JSON serializers, atomic file writes and random identifiers.
pub mod files;
pub mod ids;
pub mod serialization;

pub use files::{relative_slash_path, resolve_against, write_atomic};
pub use ids::IdMinter;
pub use serialization::FileSerializer;
pub use serialization::FileUtils;
pub use serialization::JsonLinesWriter;
pub use serialization::JsonSerializer;
pub use serialization::Serializer;
