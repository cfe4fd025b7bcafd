//! Project manifest (`pubspec.yaml`) reading
//!
//! Yields the declared asset list, expanded from directory entries, and the
//! declared dependency names split into ordinary and development groups.

mod pubspec;

pub use pubspec::{Manifest, ManifestError, ManifestReader, MANIFEST_FILE};
