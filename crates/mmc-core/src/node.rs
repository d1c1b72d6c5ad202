/// Identity of a node in the parse tree or in the raw declarations.
///
/// Node IDs are handed out by the tree builder and are the keys of every side
/// table (types, optionality, pointers) as well as the back-reference of an
/// [`Error`](crate::Error) to its source. They are cheap to copy and never
/// reused within one compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    /// Creates a new NodeId from a raw value
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw value
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}
