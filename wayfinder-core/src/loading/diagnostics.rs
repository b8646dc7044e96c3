use std::fmt;

/// Part of the graph file a diagnostic refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Node,
    Edge,
    Building,
    Override,
    Image,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::Node => "node",
            Section::Edge => "edge",
            Section::Building => "building",
            Section::Override => "override",
            Section::Image => "image",
        };
        f.write_str(name)
    }
}

/// An item that was dropped or trimmed while loading the graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadDiagnostic {
    pub section: Section,
    /// Id of the offending item, or `#<position>` when it has no usable id
    pub item: String,
    pub reason: String,
}

impl LoadDiagnostic {
    pub(crate) fn new(section: Section, item: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            section,
            item: item.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for LoadDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.section, self.item, self.reason)
    }
}
