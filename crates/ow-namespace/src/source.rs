//! Where candidate records come from.

use std::fmt;
use std::path::{Path, PathBuf};

use ow_types::{ShellError, ShellResult, WideString};
use serde::Deserialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{read_file, ConfigResult};

/// Who is asking for an enumeration.
///
/// Sources use `location` to leave out the caller's own entry, so a window
/// never lists itself.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallerContext {
    pub location: Option<WideString>,
}

impl CallerContext {
    pub fn at(location: impl Into<WideString>) -> Self {
        Self {
            location: Some(location.into()),
        }
    }

    /// True when `path` is the caller's own location.
    pub fn is_self(&self, path: &WideString) -> bool {
        self.location.as_ref() == Some(path)
    }
}

/// A candidate before filtering and ranking.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Discovered {
    pub name: WideString,
    pub path: WideString,
}

impl Discovered {
    pub fn new(name: impl Into<WideString>, path: impl Into<WideString>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Candidate named after the last component of `path`.
    pub fn from_path(path: &str) -> Self {
        Self::new(simplify_name(path), path)
    }
}

/// Supplies candidates in discovery order.
///
/// Implementations must exclude the caller's own entry. An empty list is a
/// normal answer.
pub trait RecordSource: fmt::Debug + Send + Sync {
    fn discover(&self, caller: &CallerContext) -> ShellResult<Vec<Discovered>>;
}

/// Last component of a slash- or backslash-separated path.
///
/// Trailing separators are ignored; a path with no separators comes back
/// unchanged.
pub fn simplify_name(path: &str) -> String {
    let trimmed = path.trim_end_matches(['\\', '/']);
    if trimmed.is_empty() {
        return path.to_string();
    }
    match trimmed.rfind(['\\', '/']) {
        Some(i) => trimmed[i + 1..].to_string(),
        None => trimmed.to_string(),
    }
}

/// A fixed list, typically loaded from a TOML file of `[[record]]` tables.
#[derive(Clone, Debug, Default)]
pub struct StaticRecordSource {
    entries: Vec<Discovered>,
}

#[derive(Deserialize)]
struct RecordFile {
    #[serde(default)]
    record: Vec<RecordEntry>,
}

#[derive(Deserialize)]
struct RecordEntry {
    name: Option<String>,
    path: String,
}

impl StaticRecordSource {
    pub fn new(entries: Vec<Discovered>) -> Self {
        Self { entries }
    }

    /// Parse `[[record]]` tables with a required `path` and optional `name`.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let file: RecordFile = toml::from_str(text)?;
        let entries = file
            .record
            .into_iter()
            .map(|entry| match entry.name {
                Some(name) => Discovered::new(name, entry.path),
                None => Discovered::from_path(&entry.path),
            })
            .collect();
        Ok(Self { entries })
    }

    pub fn load(path: &Path) -> ConfigResult<Self> {
        Self::from_toml_str(&read_file(path)?)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RecordSource for StaticRecordSource {
    fn discover(&self, caller: &CallerContext) -> ShellResult<Vec<Discovered>> {
        Ok(self
            .entries
            .iter()
            .filter(|d| !caller.is_self(&d.path))
            .cloned()
            .collect())
    }
}

/// Immediate subdirectories of a directory, in file-name order.
#[derive(Clone, Debug)]
pub struct DirectoryRecordSource {
    root: PathBuf,
}

impl DirectoryRecordSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl RecordSource for DirectoryRecordSource {
    fn discover(&self, caller: &CallerContext) -> ShellResult<Vec<Discovered>> {
        if !self.root.is_dir() {
            return Err(ShellError::Resolve {
                path: self.root.display().to_string(),
                reason: "not a directory".into(),
            });
        }

        let mut found = Vec::new();
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(root = %self.root.display(), error = %err, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_dir() {
                continue;
            }
            let path = WideString::from(entry.path().to_string_lossy().into_owned());
            if caller.is_self(&path) {
                continue;
            }
            let name = WideString::from(entry.file_name().to_string_lossy().into_owned());
            found.push(Discovered { name, path });
        }
        debug!(root = %self.root.display(), count = found.len(), "discovered directories");
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simplify_strips_to_last_component() {
        assert_eq!(simplify_name("C:\\Users\\me\\Projects"), "Projects");
        assert_eq!(simplify_name("/home/me/src/"), "src");
        assert_eq!(simplify_name("C:\\"), "C:");
        assert_eq!(simplify_name("plain"), "plain");
        assert_eq!(simplify_name("\\"), "\\");
    }

    #[test]
    fn static_source_skips_caller() {
        let source = StaticRecordSource::new(vec![
            Discovered::new("Alpha", "C:\\A"),
            Discovered::new("Beta", "C:\\B"),
        ]);
        let all = source.discover(&CallerContext::default()).unwrap();
        assert_eq!(all.len(), 2);

        let others = source.discover(&CallerContext::at("C:\\A")).unwrap();
        assert_eq!(others, vec![Discovered::new("Beta", "C:\\B")]);
    }

    #[test]
    fn static_source_from_toml() {
        let text = r#"
            [[record]]
            name = "Docs"
            path = "C:\\Users\\me\\Documents"

            [[record]]
            path = "D:\\Builds\\nightly"
        "#;
        let source = StaticRecordSource::from_toml_str(text).unwrap();
        let found = source.discover(&CallerContext::default()).unwrap();
        assert_eq!(found[0].name, "Docs");
        assert_eq!(found[1].name, "nightly");
        assert_eq!(found[1].path, "D:\\Builds\\nightly");

        assert!(StaticRecordSource::from_toml_str("").unwrap().is_empty());
        assert!(StaticRecordSource::from_toml_str("[[record]]\nname = \"x\"").is_err());
    }

    #[test]
    fn directory_source_lists_subdirectories_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("beta")).unwrap();
        std::fs::create_dir(dir.path().join("alpha")).unwrap();
        std::fs::write(dir.path().join("file.txt"), b"x").unwrap();

        let source = DirectoryRecordSource::new(dir.path());
        let found = source.discover(&CallerContext::default()).unwrap();
        let names: Vec<_> = found.iter().map(|d| d.name.to_string_lossy()).collect();
        assert_eq!(names, ["alpha", "beta"]);

        let alpha = dir.path().join("alpha").to_string_lossy().into_owned();
        let rest = source.discover(&CallerContext::at(alpha.as_str())).unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].name, "beta");
    }

    #[test]
    fn directory_source_requires_directory() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirectoryRecordSource::new(dir.path().join("missing"));
        assert!(matches!(
            source.discover(&CallerContext::default()),
            Err(ShellError::Resolve { .. })
        ));
    }
}
