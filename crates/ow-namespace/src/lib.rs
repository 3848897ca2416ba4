//! Namespace provider for OpenWin.
//!
//! Presents the locations currently open on the desktop as a flat, virtual
//! folder. Hosts enumerate it, compare and bind its items, ask for display
//! names and column values, and hand items to other applications as
//! transfer packages.
//!
//! # Architecture
//!
//! - **Provider** ([`provider`]): the host-facing operations, built around a
//!   snapshot that is rebuilt on every enumeration
//! - **Sources** ([`source`]): where candidate records come from; a fixed
//!   list or the subdirectories of a directory
//! - **Resolvers** ([`resolver`]): turn a stored path into a folder handle
//! - **Schema** ([`columns`], [`attributes`], [`display`]): the details
//!   columns, capability flags, and display-name modes
//! - **Config** ([`config`]): placeholder policy and record limits, loaded
//!   from TOML
//!
//! # Key Types
//!
//! - [`NamespaceProvider`]: one mounted instance of the namespace
//! - [`RecordSource`] / [`PathResolver`]: the seams to the outside world
//! - [`CompareOutcome`]: three-way order plus "unordered"

pub mod attributes;
pub mod columns;
pub mod config;
pub mod display;
pub mod error;
pub mod provider;
pub mod resolver;
pub mod source;

pub use attributes::Attributes;
pub use columns::{
    Align, Column, ColumnInfo, ColumnKind, ColumnState, ColumnValue, PropertyKey, COLUMN_MASK,
};
pub use config::{NamespaceConfig, PlaceholderPolicy, RANK_SPACE};
pub use display::{DisplayMode, NameIntent, NameScope};
pub use error::{ConfigError, ConfigResult};
pub use provider::{CompareOutcome, NamespaceProvider};
pub use resolver::{FolderHandle, FsFolder, FsPathResolver, PathResolver};
pub use source::{
    simplify_name, CallerContext, Discovered, DirectoryRecordSource, RecordSource,
    StaticRecordSource,
};
