//! This module is responsible for reading the campus graph description
//! and turning it into a validated, indexed [`CampusGraph`](crate::CampusGraph).

mod builder;
mod de;
mod diagnostics;
mod options;
mod raw_types;

pub use builder::{campus_graph_from_reader, campus_graph_from_str, load_campus_graph};
pub use diagnostics::{LoadDiagnostic, Section};
pub use options::LoadOptions;
