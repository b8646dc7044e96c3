use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use geo::Coord;
use hashbrown::HashSet;
use log::{info, warn};
use serde_json::Value;

use super::de::id_from_value;
use super::diagnostics::{LoadDiagnostic, Section};
use super::options::LoadOptions;
use super::raw_types::{
    RawBuilding, RawEdge, RawGraph, RawImage, RawNode, RawOverrides, RawSettings,
};
use crate::model::{Building, Edge, EdgeFlags, ImageMeta, Node, Penalties, Settings};
use crate::{CampusGraph, Error};

/// Loads the campus graph from a JSON file
///
/// # Errors
///
/// Returns an error if the file cannot be opened, is not valid JSON, lacks a
/// usable walking speed, or (with `strict`) contains malformed items
pub fn load_campus_graph(path: &Path, options: &LoadOptions) -> Result<CampusGraph, Error> {
    info!("Loading campus graph: {}", path.display());

    let file = File::open(path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to open campus graph '{}': {}", path.display(), e),
        )
    })?;
    campus_graph_from_reader(BufReader::new(file), options)
}

/// # Errors
///
/// See [`load_campus_graph`]
pub fn campus_graph_from_reader(
    reader: impl Read,
    options: &LoadOptions,
) -> Result<CampusGraph, Error> {
    let raw: RawGraph = serde_json::from_reader(reader)?;
    build_campus_graph(raw, options)
}

/// # Errors
///
/// See [`load_campus_graph`]
pub fn campus_graph_from_str(json: &str, options: &LoadOptions) -> Result<CampusGraph, Error> {
    let raw: RawGraph = serde_json::from_str(json)?;
    build_campus_graph(raw, options)
}

fn build_campus_graph(raw: RawGraph, options: &LoadOptions) -> Result<CampusGraph, Error> {
    let settings = validate_settings(raw.settings)?;

    let mut diagnostics = Vec::new();
    let nodes = collect_nodes(raw.nodes, &mut diagnostics);
    let edges = collect_edges(raw.edges, &mut diagnostics);
    let buildings = {
        let node_ids: HashSet<&str> = nodes.iter().map(|node| node.id.as_str()).collect();
        collect_buildings(raw.buildings, &node_ids, &mut diagnostics)
    };
    let blocked_edges = collect_overrides(raw.overrides, &mut diagnostics);
    let image = parse_image(raw.image, &mut diagnostics);

    for diagnostic in &diagnostics {
        warn!("Dropped {diagnostic}");
    }

    if options.strict
        && let Some(first) = diagnostics.first()
    {
        return Err(Error::StrictLoad {
            count: diagnostics.len(),
            first: first.to_string(),
        });
    }

    let routable = buildings.iter().filter(|b| b.is_routable()).count();
    info!(
        "Campus graph loaded: {} nodes, {} edges, {} buildings ({} routable), {} blocked overrides",
        nodes.len(),
        edges.len(),
        buildings.len(),
        routable,
        blocked_edges.len()
    );

    Ok(CampusGraph::from_parts(
        nodes,
        edges,
        buildings,
        settings,
        blocked_edges,
        image,
        diagnostics,
    ))
}

fn validate_settings(raw: Option<RawSettings>) -> Result<Settings, Error> {
    let raw = raw.ok_or_else(|| {
        Error::InvalidData("Campus graph has no `settings` section".to_string())
    })?;

    let walking_speed_mps = raw.walking_speed_mps.ok_or_else(|| {
        Error::InvalidData("`settings.walking_speed_mps` is required".to_string())
    })?;
    if !walking_speed_mps.is_finite() || walking_speed_mps <= 0.0 {
        return Err(Error::InvalidData(format!(
            "`settings.walking_speed_mps` must be positive, got {walking_speed_mps}"
        )));
    }

    let penalties = Penalties {
        stairs_s: raw.penalties.stairs_s,
        steep_s: raw.penalties.steep_s,
        covered_s: raw.penalties.covered_s,
    };
    for (name, value) in [
        ("stairs_s", penalties.stairs_s),
        ("steep_s", penalties.steep_s),
        ("covered_s", penalties.covered_s),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::InvalidData(format!(
                "`settings.penalties.{name}` must be a non-negative number, got {value}"
            )));
        }
    }

    Ok(Settings {
        walking_speed_mps,
        penalties,
    })
}

/// Best-effort label for an item that failed to parse
fn item_label(value: &Value, position: usize) -> String {
    value
        .get("id")
        .and_then(id_from_value)
        .unwrap_or_else(|| format!("#{position}"))
}

fn collect_nodes(values: Vec<Value>, diagnostics: &mut Vec<LoadDiagnostic>) -> Vec<Node> {
    let mut seen = HashSet::with_capacity(values.len());
    let mut nodes = Vec::with_capacity(values.len());

    for (position, value) in values.into_iter().enumerate() {
        let label = item_label(&value, position);
        let raw = match serde_json::from_value::<RawNode>(value) {
            Ok(raw) => raw,
            Err(e) => {
                diagnostics.push(LoadDiagnostic::new(Section::Node, label, e.to_string()));
                continue;
            }
        };
        if !raw.x.is_finite() || !raw.y.is_finite() {
            diagnostics.push(LoadDiagnostic::new(
                Section::Node,
                raw.id,
                "coordinates must be finite",
            ));
            continue;
        }
        if !seen.insert(raw.id.clone()) {
            diagnostics.push(LoadDiagnostic::new(Section::Node, raw.id, "duplicate id"));
            continue;
        }
        nodes.push(Node {
            id: raw.id,
            position: Coord { x: raw.x, y: raw.y },
        });
    }

    nodes
}

fn collect_edges(values: Vec<Value>, diagnostics: &mut Vec<LoadDiagnostic>) -> Vec<Edge> {
    let mut seen = HashSet::with_capacity(values.len());
    let mut edges = Vec::with_capacity(values.len());

    for (position, value) in values.into_iter().enumerate() {
        let label = item_label(&value, position);
        let raw = match serde_json::from_value::<RawEdge>(value) {
            Ok(raw) => raw,
            Err(e) => {
                diagnostics.push(LoadDiagnostic::new(Section::Edge, label, e.to_string()));
                continue;
            }
        };
        if !raw.length_m.is_finite() || raw.length_m < 0.0 {
            diagnostics.push(LoadDiagnostic::new(
                Section::Edge,
                raw.id,
                format!("length_m must be a non-negative number, got {}", raw.length_m),
            ));
            continue;
        }
        if let Some(penalty) = raw.penalty_s
            && (!penalty.is_finite() || penalty < 0.0)
        {
            diagnostics.push(LoadDiagnostic::new(
                Section::Edge,
                raw.id,
                format!("penalty_s must be a non-negative number, got {penalty}"),
            ));
            continue;
        }
        if !seen.insert(raw.id.clone()) {
            diagnostics.push(LoadDiagnostic::new(Section::Edge, raw.id, "duplicate id"));
            continue;
        }

        let flags = raw.flags.unwrap_or_default();
        edges.push(Edge {
            id: raw.id,
            from: raw.from,
            to: raw.to,
            length_m: raw.length_m,
            penalty_s: raw.penalty_s,
            flags: EdgeFlags {
                blocked: flags.blocked,
                stairs: flags.stairs,
                steep: flags.steep,
                covered: flags.covered,
            },
        });
    }

    edges
}

fn collect_buildings(
    values: Vec<Value>,
    node_ids: &HashSet<&str>,
    diagnostics: &mut Vec<LoadDiagnostic>,
) -> Vec<Building> {
    let mut seen = HashSet::with_capacity(values.len());
    let mut buildings = Vec::with_capacity(values.len());

    for (position, value) in values.into_iter().enumerate() {
        let label = item_label(&value, position);
        let raw = match serde_json::from_value::<RawBuilding>(value) {
            Ok(raw) => raw,
            Err(e) => {
                diagnostics.push(LoadDiagnostic::new(Section::Building, label, e.to_string()));
                continue;
            }
        };
        if !seen.insert(raw.id.clone()) {
            diagnostics.push(LoadDiagnostic::new(Section::Building, raw.id, "duplicate id"));
            continue;
        }

        let mut entrances = Vec::with_capacity(raw.entrance_node_ids.len());
        for value in &raw.entrance_node_ids {
            let Some(entrance) = id_from_value(value) else {
                diagnostics.push(LoadDiagnostic::new(
                    Section::Building,
                    raw.id.clone(),
                    format!("entrance id must be a string or integer, found {value}"),
                ));
                continue;
            };
            if !node_ids.contains(entrance.as_str()) {
                diagnostics.push(LoadDiagnostic::new(
                    Section::Building,
                    raw.id.clone(),
                    format!("entrance node {entrance} does not exist"),
                ));
            } else if !entrances.contains(&entrance) {
                entrances.push(entrance);
            }
        }

        buildings.push(Building {
            name: raw.name.unwrap_or_else(|| raw.id.clone()),
            code: raw.id,
            entrances,
        });
    }

    buildings
}

fn collect_overrides(
    overrides: RawOverrides,
    diagnostics: &mut Vec<LoadDiagnostic>,
) -> HashSet<String> {
    overrides
        .blocked_edge_ids
        .iter()
        .enumerate()
        .filter_map(|(position, value)| {
            let id = id_from_value(value);
            if id.is_none() {
                diagnostics.push(LoadDiagnostic::new(
                    Section::Override,
                    format!("#{position}"),
                    format!("blocked edge id must be a string or integer, found {value}"),
                ));
            }
            id
        })
        .collect()
}

fn parse_image(value: Option<Value>, diagnostics: &mut Vec<LoadDiagnostic>) -> ImageMeta {
    let Some(value) = value else {
        return ImageMeta::default();
    };
    match serde_json::from_value::<RawImage>(value) {
        Ok(raw) => ImageMeta {
            width_px: image_dimension("width_px", raw.width_px, diagnostics),
            height_px: image_dimension("height_px", raw.height_px, diagnostics),
        },
        Err(e) => {
            diagnostics.push(LoadDiagnostic::new(Section::Image, "image", e.to_string()));
            ImageMeta::default()
        }
    }
}

/// Any JSON number is kept as given; other values are dropped on their own
/// without touching the other dimension
fn image_dimension(
    field: &str,
    value: Option<Value>,
    diagnostics: &mut Vec<LoadDiagnostic>,
) -> Option<f64> {
    match value? {
        Value::Null => None,
        Value::Number(n) => n.as_f64(),
        other => {
            diagnostics.push(LoadDiagnostic::new(
                Section::Image,
                field,
                format!("expected a number, found {other}"),
            ));
            None
        }
    }
}
