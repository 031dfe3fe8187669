//! Member name sanitization (zip-slip prevention)

use std::path::{Component, Path, PathBuf};

use crate::error::ExtractionFailureReason;

/// Turns the raw name of an archive member into a path relative to the
/// extraction directory.
///
/// `.` segments are dropped and `..` segments are resolved lexically. A name
/// that is absolute, carries a drive prefix, contains a NUL byte or climbs above
/// the extraction directory is rejected. The returned path is empty when the
/// name refers to the extraction directory itself (e.g. `./`).
///
/// Accepts and rejects the same names as `ZipFile::enclosed_name`, which only
/// answers yes or no and hands back the name unresolved (`a/..` stays as is).
/// The extractor needs the resolved path to recognise entries that name the
/// extraction directory, and the rejected name for the error.
pub fn sanitize_member_name(name: &str) -> Result<PathBuf, ExtractionFailureReason> {
    let traversal = || ExtractionFailureReason::PathTraversal {
        name: name.to_string(),
    };

    if name.contains('\0') {
        return Err(traversal());
    }

    let mut resolved = PathBuf::new();
    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !resolved.pop() {
                    return Err(traversal());
                }
            }
            Component::RootDir | Component::Prefix(_) => return Err(traversal()),
        }
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Cursor;

    #[test]
    fn test_plain_names() {
        assert_eq!(
            sanitize_member_name("readme.txt").unwrap(),
            Path::new("readme.txt")
        );
        assert_eq!(
            sanitize_member_name("docs/guide/intro.md").unwrap(),
            Path::new("docs/guide/intro.md")
        );
        assert_eq!(sanitize_member_name("docs/").unwrap(), Path::new("docs"));
    }

    #[test]
    fn test_inner_parent_segments_resolve() {
        assert_eq!(
            sanitize_member_name("a/./b/../c.txt").unwrap(),
            Path::new("a/c.txt")
        );
        assert_eq!(sanitize_member_name("a/..").unwrap(), Path::new(""));
    }

    #[test]
    fn test_escaping_names_are_rejected() {
        for name in ["../evil.txt", "a/../../evil.txt", "..", "./../x"] {
            assert_matches!(
                sanitize_member_name(name),
                Err(ExtractionFailureReason::PathTraversal { name: n }) if n == name
            );
        }
    }

    #[test]
    fn test_absolute_names_are_rejected() {
        let absolute = if cfg!(windows) {
            "C:\\Windows\\evil.dll"
        } else {
            "/etc/passwd"
        };
        assert_matches!(
            sanitize_member_name(absolute),
            Err(ExtractionFailureReason::PathTraversal { .. })
        );
    }

    #[test]
    fn test_nul_byte_is_rejected() {
        assert_matches!(
            sanitize_member_name("evil\0.txt"),
            Err(ExtractionFailureReason::PathTraversal { .. })
        );
    }

    #[test]
    fn test_agrees_with_enclosed_name() {
        let names = [
            "readme.txt",
            "docs/guide/intro.md",
            "a/./b/../c.txt",
            "../evil.txt",
            "a/../../evil.txt",
            "./../x",
        ];

        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for name in names {
            writer
                .start_file(name, zip::write::SimpleFileOptions::default())
                .unwrap();
        }
        let mut archive = zip::ZipArchive::new(writer.finish().unwrap()).unwrap();

        for (index, name) in names.into_iter().enumerate() {
            let file = archive.by_index(index).unwrap();
            assert_eq!(file.name(), name);
            assert_eq!(
                sanitize_member_name(name).is_ok(),
                file.enclosed_name().is_some(),
                "disagreement on {name}"
            );
        }
    }
}
