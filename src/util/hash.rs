//! Hashing utilities for object file naming.

use std::path::Path;

use sha1::{Digest, Sha1};

/// SHA-1 of a byte slice as upper-case hex.
pub fn sha1_upper_hex(data: &[u8]) -> String {
    hex::encode_upper(Sha1::digest(data))
}

/// Object file name for a source: `<basename>_<SHA1(full path)>.o`.
///
/// The digest keeps same-named sources from different directories apart.
pub fn object_file_name(source: &Path) -> String {
    let base = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let digest = sha1_upper_hex(source.to_string_lossy().as_bytes());

    format!("{}_{}.o", base, digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha1_upper_hex() {
        assert_eq!(
            sha1_upper_hex(b"abc"),
            "A9993E364706816ABA3E25717850C26C9CD0D89D"
        );
    }

    #[test]
    fn test_object_file_name_shape() {
        let name = object_file_name(Path::new("/src/app/nif.c"));
        let digest = sha1_upper_hex(b"/src/app/nif.c");

        assert_eq!(name, format!("nif.c_{}.o", digest));
        assert_eq!(digest.len(), 40);
    }

    #[test]
    fn test_same_basename_different_dirs() {
        let a = object_file_name(Path::new("/src/app/util.c"));
        let b = object_file_name(Path::new("/src/shared/util.c"));

        assert!(a.starts_with("util.c_"));
        assert!(b.starts_with("util.c_"));
        assert_ne!(a, b);
    }
}
