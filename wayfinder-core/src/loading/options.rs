/// Options controlling how the campus graph is loaded
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Reject the whole graph when any node, edge, building or override
    /// had to be dropped, instead of loading what is usable
    pub strict: bool,
}

impl LoadOptions {
    pub fn strict() -> Self {
        Self { strict: true }
    }
}
