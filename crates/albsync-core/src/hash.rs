//! Order-independent fingerprints of string collections.

use sha2::{Digest, Sha256};

/// Hash an unordered collection of strings.
///
/// Elements are sorted by byte order and fed to the digest back to back with
/// no delimiter, so any permutation of the same multiset yields the same
/// value. Duplicates are kept: `["a", "a"]` and `["a"]` hash differently.
pub fn fingerprint<S: AsRef<str>>(items: &[S]) -> String {
    let mut sorted: Vec<&str> = items.iter().map(AsRef::as_ref).collect();
    sorted.sort_unstable();

    let mut hasher = Sha256::new();
    for item in sorted {
        hasher.update(item.as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Hash a single string. Used where ordering matters, e.g. `namespace/name`.
pub fn digest(value: &str) -> String {
    hex::encode(Sha256::digest(value.as_bytes()))
}
