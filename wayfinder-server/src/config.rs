//! Server configuration.
//!
//! Values come from an optional TOML file; every field has a default so an
//! empty file (or no file at all) yields a working setup. Command-line flags
//! are applied on top through [`Overrides`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use wayfinder_core::routing::LegSearch;

use crate::error::ServerError;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub planner: PlannerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the HTTP listener binds to
    pub bind: String,
    /// Requests handled at the same time before new ones wait
    pub max_concurrent_requests: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            max_concurrent_requests: 64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub graph_path: PathBuf,
    pub map_image_path: PathBuf,
    /// Refuse to start when the graph file produced any load diagnostic
    pub strict_load: bool,
    pub leg_search: LegSearch,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            graph_path: PathBuf::from("resources/campus-graph.json"),
            map_image_path: PathBuf::from("resources/campus-map.png"),
            strict_load: false,
            leg_search: LegSearch::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, used when `RUST_LOG` is not set
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info,tower_http=debug".to_string(),
        }
    }
}

/// Values given on the command line, each replacing its file counterpart
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bind: Option<String>,
    pub graph_path: Option<PathBuf>,
    pub map_image_path: Option<PathBuf>,
    pub strict_load: bool,
}

impl Config {
    /// Parses a TOML document. Relative paths are kept as written.
    pub fn from_toml_str(text: &str) -> Result<Self, ServerError> {
        let config: Self =
            toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads the file at `path`; relative planner paths inside it are
    /// resolved against the file's directory.
    pub fn from_file(path: &Path) -> Result<Self, ServerError> {
        let text = fs::read_to_string(path).map_err(|e| {
            ServerError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let mut config = Self::from_toml_str(&text)?;
        if let Some(base) = path.parent() {
            config.planner.graph_path = resolve(base, &config.planner.graph_path);
            config.planner.map_image_path = resolve(base, &config.planner.map_image_path);
        }
        Ok(config)
    }

    /// Loads `path` if given, otherwise the defaults, then applies `overrides`
    pub fn load(path: Option<&Path>, overrides: Overrides) -> Result<Self, ServerError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply(overrides);
        config.validate()?;
        Ok(config)
    }

    fn apply(&mut self, overrides: Overrides) {
        if let Some(bind) = overrides.bind {
            self.server.bind = bind;
        }
        if let Some(graph_path) = overrides.graph_path {
            self.planner.graph_path = graph_path;
        }
        if let Some(map_image_path) = overrides.map_image_path {
            self.planner.map_image_path = map_image_path;
        }
        self.planner.strict_load |= overrides.strict_load;
    }

    fn validate(&self) -> Result<(), ServerError> {
        if self.server.max_concurrent_requests == 0 {
            return Err(ServerError::Config(
                "server.max_concurrent_requests must be at least 1".to_string(),
            ));
        }
        if self.server.bind.trim().is_empty() {
            return Err(ServerError::Config("server.bind must not be empty".to_string()));
        }
        Ok(())
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.planner.leg_search, LegSearch::MultiSource);
        assert!(!config.planner.strict_load);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = Config::from_toml_str(
            r#"
            [server]
            bind = "0.0.0.0:9000"

            [planner]
            leg_search = "cross_product"
            strict_load = true

            [logging]
            filter = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(config.server.max_concurrent_requests, 64);
        assert_eq!(config.planner.leg_search, LegSearch::CrossProduct);
        assert!(config.planner.strict_load);
        assert_eq!(
            config.planner.graph_path,
            PathBuf::from("resources/campus-graph.json")
        );
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn unknown_leg_search_is_rejected() {
        let err = Config::from_toml_str("[planner]\nleg_search = \"teleport\"").unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let err = Config::from_toml_str("[server]\nmax_concurrent_requests = 0").unwrap_err();
        assert!(err.to_string().contains("max_concurrent_requests"));
    }

    #[test]
    fn file_paths_resolve_next_to_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wayfinder.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[planner]\ngraph_path = \"data/graph.json\"\nmap_image_path = \"/srv/map.png\""
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.planner.graph_path, dir.path().join("data/graph.json"));
        assert_eq!(config.planner.map_image_path, PathBuf::from("/srv/map.png"));
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn overrides_win_over_the_file() {
        let config = Config::load(
            None,
            Overrides {
                bind: Some("127.0.0.1:3000".to_string()),
                graph_path: Some(PathBuf::from("other.json")),
                map_image_path: None,
                strict_load: true,
            },
        )
        .unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:3000");
        assert_eq!(config.planner.graph_path, PathBuf::from("other.json"));
        assert_eq!(
            config.planner.map_image_path,
            PathBuf::from("resources/campus-map.png")
        );
        assert!(config.planner.strict_load);
    }
}
