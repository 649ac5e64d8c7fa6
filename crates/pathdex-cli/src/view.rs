use std::fs;
use std::io;
use std::path::Path;

/// Immediate children of `dir` drawn as a one-level tree, sorted by name.
/// Directories get a trailing `/`.
pub fn one_level(dir: &Path) -> io::Result<Vec<String>> {
    let mut entries: Vec<(String, bool)> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| {
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            (entry.file_name().to_string_lossy().into_owned(), is_dir)
        })
        .collect();
    entries.sort();

    let last = entries.len().saturating_sub(1);
    let mut lines = Vec::with_capacity(entries.len() + 1);
    lines.push(dir.display().to_string());
    for (i, (name, is_dir)) in entries.into_iter().enumerate() {
        let branch = if i == last { "└── " } else { "├── " };
        let suffix = if is_dir { "/" } else { "" };
        lines.push(format!("{branch}{name}{suffix}"));
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_sorted_children() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("Cargo.toml"), b"").unwrap();
        fs::write(dir.path().join("README.md"), b"").unwrap();

        let lines = one_level(dir.path()).unwrap();
        assert_eq!(lines[0], dir.path().display().to_string());
        assert_eq!(&lines[1..], ["├── Cargo.toml", "├── README.md", "└── src/"]);
    }

    #[test]
    fn empty_directory_has_only_header() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(one_level(dir.path()).unwrap().len(), 1);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(one_level(&dir.path().join("nope")).is_err());
    }
}
