//! Lexical confinement of requested paths
//!
//! Nothing in here touches the filesystem. The filesystem checks and symlink
//! resolution live in `infrastructure::file_access`.

use std::path::{Component, Path, PathBuf};

use crate::domain::DomainError;

const SEPARATORS: [char; 2] = ['/', '\\'];

/// Cheap syntactic screen run before anything else
///
/// Rejects blank paths and any `..` segment, whichever separator style the
/// client used.
pub fn screen_requested_path(requested: &str) -> Result<(), DomainError> {
    if requested.trim().is_empty() {
        return Err(DomainError::directory_traversal("empty requested path"));
    }

    if has_parent_segment(requested) {
        return Err(DomainError::directory_traversal(format!(
            "parent segment in requested path '{}'",
            requested
        )));
    }

    if requested.contains('\0') {
        return Err(DomainError::invalid_argument("requested path contains a NUL byte"));
    }

    Ok(())
}

/// Whether `requested` contains `..` as a path segment
pub fn has_parent_segment(requested: &str) -> bool {
    requested.split(SEPARATORS).any(|segment| segment == "..")
}

/// Drop leading separators so the path cannot act as an absolute path
pub fn strip_leading_separators(requested: &str) -> &str {
    requested.trim_start_matches(SEPARATORS)
}

/// Join `requested` onto `root` and normalize `.` and `..` lexically
///
/// Both separator styles split segments. A segment that would reset the path
/// (a drive prefix or root) is rejected.
pub fn normalize_join(root: &Path, requested: &str) -> Result<PathBuf, DomainError> {
    let mut resolved = root.to_path_buf();

    for segment in strip_leading_separators(requested).split(SEPARATORS) {
        for component in Path::new(segment).components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    resolved.pop();
                }
                Component::Normal(part) => resolved.push(part),
                Component::Prefix(_) | Component::RootDir => {
                    return Err(DomainError::directory_traversal(format!(
                        "absolute component in requested path '{}'",
                        requested
                    )));
                }
            }
        }
    }

    Ok(resolved)
}

/// Component-wise check that `candidate` is `root` or nested under it
pub fn is_confined(root: &Path, candidate: &Path) -> bool {
    candidate.starts_with(root)
}

/// Screen, join, normalize and confinement-check a requested path
///
/// `root` must already be absolute and canonical.
pub fn confine(root: &Path, requested: &str) -> Result<PathBuf, DomainError> {
    screen_requested_path(requested)?;

    let candidate = normalize_join(root, requested)?;

    if !is_confined(root, &candidate) {
        return Err(DomainError::directory_traversal(format!(
            "'{}' resolves outside the root",
            requested
        )));
    }

    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;

    fn root() -> &'static Path {
        Path::new("/srv/cdn")
    }

    fn kind_of(requested: &str) -> ErrorKind {
        confine(root(), requested).unwrap_err().kind()
    }

    #[test]
    fn test_valid_path() {
        let resolved = confine(root(), "reports/q1.pdf").unwrap();
        assert_eq!(resolved, Path::new("/srv/cdn/reports/q1.pdf"));
    }

    #[test]
    fn test_parent_segments_always_rejected() {
        for requested in [
            "../../etc/passwd",
            "..",
            "reports/../q1.pdf",
            "reports/..",
            "a/b/../../../etc",
            "..\\windows\\system32",
            "reports\\..\\..\\secret",
            "/../etc/passwd",
        ] {
            assert_eq!(
                kind_of(requested),
                ErrorKind::DirectoryTraversalAttempt,
                "{requested}"
            );
        }
    }

    #[test]
    fn test_blank_path_rejected() {
        assert_eq!(kind_of(""), ErrorKind::DirectoryTraversalAttempt);
        assert_eq!(kind_of("   "), ErrorKind::DirectoryTraversalAttempt);
    }

    #[test]
    fn test_dots_inside_names_allowed() {
        let resolved = confine(root(), "archive..2024.tar.gz").unwrap();
        assert_eq!(resolved, Path::new("/srv/cdn/archive..2024.tar.gz"));
        assert!(confine(root(), "...").is_ok());
    }

    #[test]
    fn test_absolute_injection_is_rebased() {
        let resolved = confine(root(), "/etc/passwd").unwrap();
        assert_eq!(resolved, Path::new("/srv/cdn/etc/passwd"));

        let resolved = confine(root(), "///reports//q1.pdf").unwrap();
        assert_eq!(resolved, Path::new("/srv/cdn/reports/q1.pdf"));
    }

    #[test]
    fn test_mixed_separators_normalized() {
        let resolved = confine(root(), "\\reports\\2024/q1.pdf").unwrap();
        assert_eq!(resolved, Path::new("/srv/cdn/reports/2024/q1.pdf"));
    }

    #[test]
    fn test_current_dir_segments_dropped() {
        let resolved = confine(root(), "./reports/./q1.pdf").unwrap();
        assert_eq!(resolved, Path::new("/srv/cdn/reports/q1.pdf"));
    }

    #[test]
    fn test_nul_byte_is_invalid_argument() {
        assert_eq!(kind_of("reports/q1.pdf\0.txt"), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_root_itself_is_confined() {
        let resolved = confine(root(), ".").unwrap();
        assert_eq!(resolved, Path::new("/srv/cdn"));
    }

    #[test]
    fn test_sibling_with_shared_prefix_not_confined() {
        assert!(!is_confined(root(), Path::new("/srv/cdn-private/file")));
        assert!(!is_confined(root(), Path::new("/srv")));
        assert!(is_confined(root(), Path::new("/srv/cdn/a/b")));
    }

    #[test]
    fn test_normalize_join_escape_caught_by_confinement() {
        // The screen would stop this earlier; the confinement check must
        // hold on its own.
        let candidate = normalize_join(root(), "a/../../../etc/passwd").unwrap();
        assert_eq!(candidate, Path::new("/etc/passwd"));
        assert!(!is_confined(root(), &candidate));
    }
}
