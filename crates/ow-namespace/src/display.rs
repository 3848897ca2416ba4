use serde::Serialize;

/// Whose frame of reference a display name is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum NameScope {
    /// Relative to the desktop.
    Normal,
    /// Relative to the containing folder.
    InFolder,
}

/// What the caller intends to do with a display name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum NameIntent {
    /// Show it to a user.
    Display,
    /// Hand it back to a parser; items answer with their path.
    Parsing,
    /// Seed an inline rename. Never offered.
    Editing,
    /// Show it in an address bar.
    AddressBar,
}

/// A display-name request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct DisplayMode {
    pub scope: NameScope,
    pub intent: NameIntent,
}

/// Host display-name flag bits.
pub mod host_flags {
    pub const IN_FOLDER: u32 = 0x0001;
    pub const FOR_EDITING: u32 = 0x1000;
    pub const FOR_ADDRESS_BAR: u32 = 0x4000;
    pub const FOR_PARSING: u32 = 0x8000;
}

impl DisplayMode {
    pub const NORMAL: Self = Self::new(NameScope::Normal, NameIntent::Display);
    pub const NORMAL_PARSING: Self = Self::new(NameScope::Normal, NameIntent::Parsing);
    pub const IN_FOLDER: Self = Self::new(NameScope::InFolder, NameIntent::Display);
    pub const IN_FOLDER_PARSING: Self = Self::new(NameScope::InFolder, NameIntent::Parsing);

    pub const fn new(scope: NameScope, intent: NameIntent) -> Self {
        Self { scope, intent }
    }

    /// Decode host flag bits. Editing wins over everything; parsing combined
    /// with the address-bar bit counts as an address-bar request.
    pub fn from_host_flags(flags: u32) -> Self {
        use host_flags::*;
        let scope = if flags & IN_FOLDER != 0 {
            NameScope::InFolder
        } else {
            NameScope::Normal
        };
        let intent = if flags & FOR_EDITING != 0 {
            NameIntent::Editing
        } else if flags & FOR_ADDRESS_BAR != 0 {
            NameIntent::AddressBar
        } else if flags & FOR_PARSING != 0 {
            NameIntent::Parsing
        } else {
            NameIntent::Display
        };
        Self { scope, intent }
    }
}
