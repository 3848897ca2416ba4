//! Turning stored paths into bindable folders.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use ow_pidl::{IdChain, ItemRef};
use ow_types::{ShellError, ShellResult, WideString};
use tracing::trace;

/// A folder obtained by binding; may itself bind deeper identifiers.
pub trait FolderHandle: fmt::Debug + Send + Sync {
    /// Human-readable location, for logging and display.
    fn location(&self) -> String;

    /// Bind `rest` relative to this folder. An empty chain binds to the
    /// folder itself.
    fn bind(&self, rest: IdChain<'_>) -> ShellResult<Arc<dyn FolderHandle>>;
}

/// Maps a stored path to a folder handle.
pub trait PathResolver: fmt::Debug + Send + Sync {
    fn resolve(&self, path: &WideString) -> ShellResult<Arc<dyn FolderHandle>>;
}

/// Resolves paths against the local filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsPathResolver;

impl PathResolver for FsPathResolver {
    fn resolve(&self, path: &WideString) -> ShellResult<Arc<dyn FolderHandle>> {
        let folder = FsFolder::open(PathBuf::from(path.to_string_lossy()))?;
        Ok(Arc::new(folder))
    }
}

/// An existing directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FsFolder {
    path: PathBuf,
}

impl FsFolder {
    pub fn open(path: PathBuf) -> ShellResult<Self> {
        if !path.is_dir() {
            return Err(ShellError::Resolve {
                path: path.display().to_string(),
                reason: "not an existing directory".into(),
            });
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Accept `name` only as a single plain directory entry, so binding can
/// never leave the folder it starts from.
fn child_name(name: &str) -> ShellResult<&str> {
    let plain = !name.contains(['/', '\\', ':'])
        && matches!(
            Path::new(name).components().collect::<Vec<_>>().as_slice(),
            [Component::Normal(_)]
        );
    if plain {
        Ok(name)
    } else {
        Err(ShellError::invalid(format!(
            "{name:?} is not a child directory name"
        )))
    }
}

impl FolderHandle for FsFolder {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    /// Each owned segment in `rest` names a child directory.
    fn bind(&self, rest: IdChain<'_>) -> ShellResult<Arc<dyn FolderHandle>> {
        match ItemRef::classify(rest)? {
            ItemRef::Root => Ok(Arc::new(self.clone())),
            ItemRef::Foreign(seg) => Err(ShellError::invalid(format!(
                "cannot bind a {}-byte foreign segment under {}",
                seg.size(),
                self.path.display()
            ))),
            ItemRef::Owned { record, rest } => {
                let name = record.name.to_string_lossy();
                let child = Self::open(self.path.join(child_name(&name)?))?;
                trace!(from = %self.path.display(), to = %child.path.display(), "descend");
                child.bind(rest)
            }
        }
    }
}
