use bitflags::bitflags;

bitflags! {
    /// Capability flags reported for the root or for items.
    ///
    /// Bit values follow the host's item-attribute convention so they can be
    /// passed through unchanged.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Attributes: u32 {
        const LINK = 0x0001_0000;
        const FILESYS_ANCESTOR = 0x1000_0000;
        const FOLDER = 0x2000_0000;
        const FILESYSTEM = 0x4000_0000;
        const HAS_SUBFOLDER = 0x8000_0000;
        const BROWSABLE = 0x0800_0000;
    }
}

impl Attributes {
    /// What the root advertises: a browsable, filesystem-like folder with
    /// children.
    pub const ROOT: Attributes = Attributes::HAS_SUBFOLDER
        .union(Attributes::FOLDER)
        .union(Attributes::FILESYSTEM)
        .union(Attributes::FILESYS_ANCESTOR)
        .union(Attributes::BROWSABLE);

    /// What every item advertises. Items never claim sub-folders, which keeps
    /// the namespace a single level deep.
    pub const ITEM: Attributes = Attributes::FOLDER
        .union(Attributes::FILESYSTEM)
        .union(Attributes::FILESYS_ANCESTOR)
        .union(Attributes::BROWSABLE)
        .union(Attributes::LINK);
}
