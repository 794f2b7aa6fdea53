//! File discovery
//!
//! Builds the document list for a run from positional file/directory
//! arguments and an optional `--input-file` list. Directories are walked
//! recursively, keeping `.json`/`.yml` regular files and ignoring dotfiles.
//! A path given directly is passed through untouched so that an unsupported
//! extension surfaces as a per-document error instead of vanishing.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use walkdir::WalkDir;

/// Extensions accepted when walking a directory
const IMPORT_EXTENSIONS: [&str; 2] = ["json", "yml"];

/// Collect the files to import.
pub fn discover_files(paths: &[PathBuf], input_file: Option<&Path>) -> Result<Vec<PathBuf>> {
    if paths.is_empty() && input_file.is_none() {
        bail!("You either need to provide file arguments or the --input-file option");
    }

    let mut roots: Vec<PathBuf> = paths.to_vec();
    if let Some(list) = input_file {
        roots.extend(read_input_file(list)?);
    }

    let mut files = Vec::new();
    for root in roots {
        if root.is_file() {
            files.push(root);
        } else if root.is_dir() {
            collect_dir(&root, &mut files);
        } else {
            bail!("Path '{}' does not seem to exist", root.display());
        }
    }

    Ok(files)
}

/// Read a newline-separated path list, skipping blank lines.
fn read_input_file(list: &Path) -> Result<Vec<PathBuf>> {
    let contents = std::fs::read_to_string(list)
        .with_context(|| format!("Cannot read input file '{}'", list.display()))?;

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect())
}

fn collect_dir(root: &Path, files: &mut Vec<PathBuf>) {
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e.path()) || e.path() == root);

    for entry in walker.filter_map(|e| e.ok()) {
        let path = entry.path();
        if entry.file_type().is_file() && has_import_extension(path) {
            files.push(path.to_path_buf());
        }
    }
}

fn has_import_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMPORT_EXTENSIONS.contains(&e))
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "---\ntarget: /x\n---\n{}\n").unwrap();
    }

    #[test]
    fn test_directory_walk_filters_extensions_and_dotfiles() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.json"));
        touch(&dir.path().join("sub/b.yml"));
        touch(&dir.path().join("sub/notes.txt"));
        touch(&dir.path().join(".hidden.json"));
        touch(&dir.path().join(".git/c.json"));

        let files = discover_files(&[dir.path().to_path_buf()], None).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().display().to_string())
            .collect();

        assert_eq!(names, vec!["a.json", "sub/b.yml"]);
    }

    #[test]
    fn test_single_file_arg_is_not_filtered() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.xml");
        touch(&path);

        // Passed through so the unknown extension fails per-document later
        let files = discover_files(&[path.clone()], None).unwrap();
        assert_eq!(files, vec![path]);
    }

    #[test]
    fn test_input_file_list() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.json");
        let b = dir.path().join("b.yml");
        touch(&a);
        touch(&b);

        let list = dir.path().join("list.txt");
        fs::write(&list, format!("{}\n\n{}\n", a.display(), b.display())).unwrap();

        let files = discover_files(&[], Some(&list)).unwrap();
        assert_eq!(files, vec![a, b]);
    }

    #[test]
    fn test_no_inputs_is_an_error() {
        assert!(discover_files(&[], None).is_err());
    }

    #[test]
    fn test_missing_input_file_is_an_error() {
        assert!(discover_files(&[], Some(Path::new("no/such/list.txt"))).is_err());
    }

    #[test]
    fn test_missing_path_is_an_error() {
        let err = discover_files(&[PathBuf::from("no/such/dir")], None).unwrap_err();
        assert!(err.to_string().contains("does not seem to exist"));
    }
}
