/// File handling utilities
///
/// This module provides the filesystem primitives used by the planner and
/// the apply stage: listing template sources, reading them, and replacing
/// file contents atomically.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use log::{debug, warn};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

/// List files directly inside `dir` whose names end in one of `extensions`
///
/// Extensions are given without the leading dot. Matching follows shell
/// glob rules for `*.ext`: hidden files are skipped and the comparison is
/// case-sensitive. Symlinks are followed, so a link to a regular file is
/// listed; subdirectories are not descended into.
///
/// # Returns
///
/// Map of file name to the matched extension (with its dot), sorted by name
pub fn list_files_with_extensions(
    dir: &Path,
    extensions: &[String],
) -> io::Result<BTreeMap<String, String>> {
    let mut files = BTreeMap::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() > 0 => {
                // Broken or looping links inside the directory
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().to_string();
        if file_name.starts_with('.') {
            continue;
        }

        for extension in extensions {
            let suffix = format!(".{}", extension);
            if file_name.ends_with(&suffix) {
                debug!("Discovered {} ({})", file_name, suffix);
                files.insert(file_name.clone(), suffix);
            }
        }
    }

    Ok(files)
}

/// Read a whole file as UTF-8 text
pub fn read_text(path: &Path) -> io::Result<String> {
    fs::read_to_string(path)
}

/// Replace the content of `path` atomically
///
/// The content goes to a temporary file in the same directory which is then
/// renamed over the target, so readers see either the old or the new
/// content. The temporary file is removed if anything fails before the
/// rename. When `path` is a symlink the file it points to is replaced and
/// the link itself is kept.
pub fn write_file_atomic(path: &Path, content: &str) -> io::Result<()> {
    let is_link = fs::symlink_metadata(path)
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false);
    let resolved;
    let path = if is_link {
        resolved = fs::canonicalize(path)?;
        resolved.as_path()
    } else {
        path
    };

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(content.as_bytes())?;
    temp.as_file().sync_all()?;

    // Keep the permissions of the file being replaced
    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(temp.path(), metadata.permissions())?;
    }

    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Rename a file, refusing to overwrite an existing target
pub fn rename_no_clobber(from: &Path, to: &Path) -> io::Result<()> {
    if to.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists", to.display()),
        ));
    }
    fs::rename(from, to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_only_matching_top_level_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.cpp", "b.h", "c.hpp", "d.txt", ".hidden.cpp", "E.CPP"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        fs::create_dir(dir.path().join("nested.cpp")).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("deep.cpp"), "").unwrap();

        let extensions = vec!["cpp".to_string(), "h".to_string()];
        let files = list_files_with_extensions(dir.path(), &extensions).unwrap();

        let listed: Vec<_> = files.iter().map(|(n, e)| (n.as_str(), e.as_str())).collect();
        assert_eq!(listed, vec![("a.cpp", ".cpp"), ("b.h", ".h")]);
    }

    #[test]
    fn atomic_write_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.h");
        fs::write(&path, "old").unwrap();

        write_file_atomic(&path, "new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn lists_symlinked_files_and_skips_broken_links() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("real.h"), "").unwrap();
        let src = dir.path().join("src");
        fs::create_dir(&src).unwrap();
        std::os::unix::fs::symlink("../real.h", src.join("linked.h")).unwrap();
        std::os::unix::fs::symlink("../missing.h", src.join("broken.h")).unwrap();

        let extensions = vec!["h".to_string()];
        let files = list_files_with_extensions(&src, &extensions).unwrap();

        assert_eq!(files.keys().collect::<Vec<_>>(), vec!["linked.h"]);
    }

    #[cfg(unix)]
    #[test]
    fn atomic_write_goes_through_symlink() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("real.h");
        let link = dir.path().join("link.h");
        fs::write(&real, "old").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        write_file_atomic(&link, "new").unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(&real).unwrap(), "new");
    }

    #[test]
    fn rename_refuses_existing_target() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("a.cpp");
        let to = dir.path().join("b.cpp");
        fs::write(&from, "a").unwrap();
        fs::write(&to, "b").unwrap();

        let err = rename_no_clobber(&from, &to).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read_to_string(&to).unwrap(), "b");
    }
}
