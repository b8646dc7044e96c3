//! HTTP surface of the planner

use std::path::Path;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use geo::Coord;
use serde::Serialize;
use serde_json::Value;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;
use wayfinder_core::model::ImageMeta;
use wayfinder_core::routing::{RouteLeg, RoutePlan};
use wayfinder_core::{Planner, RouteError};

pub const MAP_IMAGE_URL: &str = "/planner/campus-map";

type SharedPlanner = Arc<Planner>;

// ============ Response types ============

#[derive(Debug, Serialize)]
pub struct PointDto {
    pub x: f64,
    pub y: f64,
}

impl From<Coord<f64>> for PointDto {
    fn from(coord: Coord<f64>) -> Self {
        Self {
            x: coord.x,
            y: coord.y,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ImageDto {
    pub width_px: Option<f64>,
    pub height_px: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<&'static str>,
}

impl ImageDto {
    fn new(meta: ImageMeta, url: Option<&'static str>) -> Self {
        Self {
            width_px: meta.width_px,
            height_px: meta.height_px,
            url,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BuildingDto {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub buildings: Vec<BuildingDto>,
    pub image: ImageDto,
}

#[derive(Debug, Serialize)]
pub struct LegDto {
    pub from_building: String,
    pub to_building: String,
    pub time_s: f64,
    pub polyline: Vec<PointDto>,
    pub label_position: PointDto,
}

impl From<RouteLeg> for LegDto {
    fn from(leg: RouteLeg) -> Self {
        Self {
            from_building: leg.from_building,
            to_building: leg.to_building,
            time_s: leg.time_s,
            polyline: leg.polyline.into_iter().map(PointDto::from).collect(),
            label_position: leg.label_position.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub image: ImageDto,
    pub legs: Vec<LegDto>,
    pub total_time_s: f64,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub nodes: usize,
    pub edges: usize,
    pub buildings: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============ Errors ============

#[derive(Debug)]
pub enum ApiError {
    Route(RouteError),
    Internal(String),
}

impl From<RouteError> for ApiError {
    fn from(err: RouteError) -> Self {
        Self::Route(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Route(err) => {
                tracing::info!(error = %err, "route request rejected");
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            Self::Internal(message) => {
                tracing::error!(%message, "route rendering failed");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

// ============ Router ============

pub fn build_router(
    planner: SharedPlanner,
    map_image_path: &Path,
    max_concurrent_requests: usize,
) -> Router {
    Router::new()
        .route("/planner", get(index))
        .route("/planner/", get(index))
        .route("/planner/route", post(route))
        .route("/planner/route.geojson", post(route_geojson))
        .route("/health", get(health))
        .with_state(planner)
        .route_service(MAP_IMAGE_URL, ServeFile::new(map_image_path))
        .layer(GlobalConcurrencyLimitLayer::new(max_concurrent_requests))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

// ============ Handlers ============

async fn index(State(planner): State<SharedPlanner>) -> Json<IndexResponse> {
    let graph = planner.graph();
    let buildings = graph
        .buildings()
        .iter()
        .map(|building| BuildingDto {
            id: building.code.clone(),
            name: building.name.clone(),
        })
        .collect();

    Json(IndexResponse {
        buildings,
        image: ImageDto::new(graph.image(), None),
    })
}

async fn route(
    State(planner): State<SharedPlanner>,
    body: Bytes,
) -> Result<Json<RouteResponse>, ApiError> {
    let plan = plan_request(planner.clone(), body).await?;

    Ok(Json(RouteResponse {
        image: ImageDto::new(planner.graph().image(), Some(MAP_IMAGE_URL)),
        total_time_s: plan.total_time_s,
        legs: plan.legs.into_iter().map(LegDto::from).collect(),
    }))
}

async fn route_geojson(
    State(planner): State<SharedPlanner>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let plan = plan_request(planner, body).await?;
    let collection = plan
        .to_geojson()
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    let value = serde_json::to_value(collection).map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(value))
}

async fn health(State(planner): State<SharedPlanner>) -> Json<HealthResponse> {
    let graph = planner.graph();
    Json(HealthResponse {
        status: "ok",
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        buildings: graph.building_count(),
    })
}

/// Route searches run on the blocking pool; the cross-product strategy fans
/// out over rayon and must not hold a runtime worker
async fn plan_request(planner: SharedPlanner, body: Bytes) -> Result<RoutePlan, ApiError> {
    let plan = tokio::task::spawn_blocking(move || {
        let codes = building_codes(&body)?;
        tracing::debug!(?codes, "planning route");
        planner.route(&codes)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("route search failed: {e}")))??;
    Ok(plan)
}

/// Pulls the `buildings` list out of a request body. Bodies that are not a
/// JSON object count as an empty request.
fn building_codes(body: &[u8]) -> Result<Vec<String>, RouteError> {
    let value: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
    let Some(Value::Array(items)) = value.get("buildings") else {
        return Err(RouteError::InvalidRequest);
    };

    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or(RouteError::InvalidRequest)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::json;
    use tower::ServiceExt;
    use wayfinder_core::CampusGraph;
    use wayfinder_core::routing::LegSearch;

    use super::*;

    fn campus(blocked: &[&str]) -> Planner {
        let value = json!({
            "nodes": [
                {"id": "N1", "x": 0, "y": 0},
                {"id": "N2", "x": 10, "y": 0},
                {"id": "N3", "x": 20, "y": 0},
                {"id": "N4", "x": 30, "y": 0}
            ],
            "edges": [
                {"id": "N1-N2", "from": "N1", "to": "N2", "length_m": 10},
                {"id": "N2-N3", "from": "N2", "to": "N3", "length_m": 10},
                {"id": "N3-N4", "from": "N3", "to": "N4", "length_m": 10}
            ],
            "buildings": [
                {"id": "X", "name": "X Hall", "entranceNodeIds": ["N1"]},
                {"id": "Y", "name": "Y Hall", "entranceNodeIds": ["N4"]}
            ],
            "settings": {"walking_speed_mps": 1.0, "penalties": {}},
            "overrides": {"blockedEdgeIds": blocked},
            "image": {"width_px": 640, "height_px": 480}
        });
        Planner::new(CampusGraph::from_json_str(&value.to_string()).unwrap())
    }

    fn app(planner: Planner, map_image: &Path) -> Router {
        build_router(Arc::new(planner), map_image, 8)
    }

    fn post_json(uri: &str, body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn index_lists_buildings_and_image() {
        let request = Request::get("/planner/").body(Body::empty()).unwrap();
        let (status, body) = send(app(campus(&[]), Path::new("map.png")), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["buildings"],
            json!([{"id": "X", "name": "X Hall"}, {"id": "Y", "name": "Y Hall"}])
        );
        assert_eq!(body["image"], json!({"width_px": 640.0, "height_px": 480.0}));
    }

    #[tokio::test]
    async fn route_walks_the_line() {
        let request = post_json("/planner/route", r#"{"buildings": ["X", "Y"]}"#);
        let (status, body) = send(app(campus(&[]), Path::new("map.png")), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_time_s"], json!(30.0));
        assert_eq!(body["image"]["url"], json!(MAP_IMAGE_URL));
        assert_eq!(body["legs"].as_array().unwrap().len(), 1);

        let leg = &body["legs"][0];
        assert_eq!(leg["from_building"], json!("X"));
        assert_eq!(leg["to_building"], json!("Y"));
        assert_eq!(leg["polyline"].as_array().unwrap().len(), 4);
        assert_eq!(leg["polyline"][3], json!({"x": 30.0, "y": 0.0}));
        assert_eq!(leg["label_position"], json!({"x": 15.0, "y": 0.0}));
    }

    #[tokio::test]
    async fn cross_product_search_runs_off_the_runtime() {
        let planner = campus(&[]).with_leg_search(LegSearch::CrossProduct);
        let request = post_json("/planner/route", r#"{"buildings": ["X", "Y", "X"]}"#);
        let (status, body) = send(app(planner, Path::new("map.png")), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_time_s"], json!(60.0));
        assert_eq!(body["legs"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn unknown_code_is_named_in_the_error() {
        let request = post_json("/planner/route", r#"{"buildings": ["X", "ZZZ"]}"#);
        let (status, body) = send(app(campus(&[]), Path::new("map.png")), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], json!("Unknown building codes: ZZZ"));
    }

    #[tokio::test]
    async fn single_code_needs_a_second_building() {
        let request = post_json("/planner/route", r#"{"buildings": ["X"]}"#);
        let (status, body) = send(app(campus(&[]), Path::new("map.png")), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            json!("Provide at least two building codes to plan a route.")
        );
    }

    #[tokio::test]
    async fn malformed_bodies_are_invalid_requests() {
        let bodies = [
            "not json",
            "[]",
            r#"{"buildings": "X"}"#,
            r#"{"buildings": ["X", null]}"#,
            r#"{"buildings": ["X", 7]}"#,
            "",
        ];
        for body in bodies {
            let request = post_json("/planner/route", body);
            let (status, reply) = send(app(campus(&[]), Path::new("map.png")), request).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
            assert_eq!(
                reply["error"],
                json!("Request must include a list of building codes."),
                "{body}"
            );
        }
    }

    #[tokio::test]
    async fn blocked_walkway_reports_no_path() {
        let request = post_json("/planner/route", r#"{"buildings": ["X", "Y"]}"#);
        let (status, body) = send(app(campus(&["N2-N3"]), Path::new("map.png")), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], json!("No available path between X and Y."));
    }

    #[tokio::test]
    async fn geojson_route_has_a_feature_per_leg() {
        let request = post_json("/planner/route.geojson", r#"{"buildings": ["X", "Y", "X"]}"#);
        let (status, body) = send(app(campus(&[]), Path::new("map.png")), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["type"], json!("FeatureCollection"));
        assert_eq!(body["features"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn health_reports_graph_size() {
        let request = Request::get("/health").body(Body::empty()).unwrap();
        let (status, body) = send(app(campus(&[]), Path::new("map.png")), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"status": "ok", "nodes": 4, "edges": 3, "buildings": 2})
        );
    }

    #[tokio::test]
    async fn campus_map_is_served_from_disk() {
        let mut image = tempfile::NamedTempFile::new().unwrap();
        image.write_all(b"\x89PNG fake").unwrap();

        let request = Request::get(MAP_IMAGE_URL).body(Body::empty()).unwrap();
        let response = app(campus(&[]), image.path())
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"\x89PNG fake");
    }
}
