//! Centralized validation and helper functions.

use std::io::Read;
use std::path::Path;

/// Read buffer size used when checksumming files
const CHECKSUM_BUFFER_SIZE: usize = 1 << 20;

/// Validate that a string is a valid MD5 checksum (32 hex characters).
///
/// # Examples
///
/// ```
/// use mcheck::utils::validation::is_valid_md5;
///
/// assert!(is_valid_md5("6aef897c3d6ff0c78aff06ac189178dd"));
/// assert!(!is_valid_md5("not-an-md5"));
/// assert!(!is_valid_md5("6aef897c3d6ff0c78aff06ac189178d")); // 31 chars
/// ```
#[must_use]
pub fn is_valid_md5(s: &str) -> bool {
    s.len() == 32 && s.chars().all(|c| c.is_ascii_hexdigit())
}

/// Normalize an MD5 string to lowercase.
/// Returns None if the input is not a valid MD5.
#[must_use]
pub fn normalize_md5(s: &str) -> Option<String> {
    if is_valid_md5(s) {
        Some(s.to_lowercase())
    } else {
        None
    }
}

/// Compute the MD5 of a file's contents as lowercase hex
///
/// # Errors
///
/// Returns an IO error if the file cannot be read.
pub fn compute_file_md5(path: &Path) -> std::io::Result<String> {
    let mut file = std::fs::File::open(path)?;
    let mut context = md5::Context::new();
    let mut buffer = vec![0u8; CHECKSUM_BUFFER_SIZE];

    loop {
        let n = file.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        context.consume(&buffer[..n]);
    }

    Ok(format!("{:x}", context.compute()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_normalize_md5() {
        assert_eq!(
            normalize_md5("6AEF897C3D6FF0C78AFF06AC189178DD"),
            Some("6aef897c3d6ff0c78aff06ac189178dd".to_string())
        );
        assert_eq!(normalize_md5("xyz"), None);
    }

    #[test]
    fn test_compute_file_md5() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"hello world").unwrap();
        file.flush().unwrap();

        let digest = compute_file_md5(file.path()).unwrap();
        assert_eq!(digest, "5eb63bbbe01eeed093cb22bb8f5acdc3");
    }

    #[test]
    fn test_compute_md5_of_empty_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let digest = compute_file_md5(file.path()).unwrap();
        assert_eq!(digest, "d41d8cd98f00b204e9800998ecf8427e");
    }
}
