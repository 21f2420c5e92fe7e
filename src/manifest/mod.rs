/*!
 * Chapter manifests.
 *
 * One builder serves every scripture; what differs between scriptures is captured by a
 * `NamingConvention` (folder layout, name patterns, title rules, bucket path).
 */

pub mod builder;
pub mod conventions;
pub mod model;
pub mod validate;

pub use builder::{write_manifest, ManifestBuilder, DEFAULT_BUCKET};
pub use conventions::{builtin_conventions, lookup, ConventionSpec, NamingConvention};
pub use model::{ChapterEntry, Manifest, Section};
pub use validate::{validate_manifest, ValidationReport};
