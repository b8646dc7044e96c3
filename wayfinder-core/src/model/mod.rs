//! Data model for campus path planning
//!
//! Contains the walkway graph as loaded from disk together with its
//! id-keyed lookup indices.

pub mod campus_graph;
pub mod components;

pub use campus_graph::CampusGraph;
pub use components::{Building, Edge, EdgeFlags, ImageMeta, Node, Penalties, Settings};
