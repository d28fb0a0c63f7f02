//! In-place file replacement.

use std::fs;
use std::io::{self, Write as IoWrite};
use std::path::Path;

use tempfile::NamedTempFile;

/// Replaces the contents of `path` with `content`.
///
/// Symbolic links are resolved first, so the file they point at is the one
/// replaced and the link itself survives. The new content is written to a
/// temporary file next to that target, given its permissions, and renamed
/// over it. On error the temporary file is removed and the target keeps its
/// previous contents.
pub(crate) fn replace_file(path: &Path, content: &str) -> io::Result<()> {
    let target = fs::canonicalize(path)?;
    let parent = target.parent().unwrap_or_else(|| Path::new("/"));
    let permissions = fs::metadata(&target)?.permissions();

    let mut temp_file = NamedTempFile::new_in(parent)?;
    temp_file.write_all(content.as_bytes())?;
    temp_file.as_file().sync_all()?;
    temp_file.as_file().set_permissions(permissions)?;

    temp_file.persist(&target).map_err(|err| err.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn replaces_existing_content() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("main.go");
        fs::write(&path, "old").expect("seed file");

        replace_file(&path, "new").expect("replace");

        assert_eq!(fs::read_to_string(&path).expect("read back"), "new");
        let entries = fs::read_dir(dir.path()).expect("list dir").count();
        assert_eq!(entries, 1, "temporary file must not be left behind");
    }

    #[test]
    fn missing_target_is_an_error_and_creates_nothing() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("absent.go");

        let error = replace_file(&path, "new").expect_err("target is missing");

        assert_eq!(error.kind(), io::ErrorKind::NotFound);
        assert_eq!(fs::read_dir(dir.path()).expect("list dir").count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn writes_through_symbolic_links() {
        let dir = TempDir::new().expect("temp dir");
        let real = dir.path().join("real.go");
        let link = dir.path().join("link.go");
        fs::write(&real, "old").expect("seed file");
        std::os::unix::fs::symlink(&real, &link).expect("symlink");

        replace_file(&link, "new").expect("replace");

        let link_type = fs::symlink_metadata(&link).expect("link metadata").file_type();
        assert!(link_type.is_symlink(), "link must not be replaced");
        assert_eq!(fs::read_to_string(&real).expect("read target"), "new");
        assert_eq!(fs::read_dir(dir.path()).expect("list dir").count(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn keeps_original_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("main.go");
        fs::write(&path, "old").expect("seed file");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).expect("chmod");

        replace_file(&path, "new").expect("replace");

        let mode = fs::metadata(&path).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }
}
