use geo::LineString;
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use serde_json::json;

use super::route_plan::{RouteLeg, RoutePlan};
use crate::Error;

impl RoutePlan {
    /// Converts the route to a `GeoJSON` `FeatureCollection` with one
    /// `LineString` per leg, in map pixel coordinates.
    ///
    /// # Errors
    ///
    /// Returns an error if a feature cannot be assembled
    pub fn to_geojson(&self) -> Result<FeatureCollection, Error> {
        let features = self
            .legs
            .iter()
            .enumerate()
            .map(|(idx, leg)| leg_feature(idx, leg))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FeatureCollection {
            features,
            bbox: None,
            foreign_members: None,
        })
    }

    /// # Errors
    ///
    /// See [`RoutePlan::to_geojson`]
    pub fn to_geojson_string(&self) -> Result<String, Error> {
        serde_json::to_string(&self.to_geojson()?).map_err(|e| Error::GeoJsonError(e.to_string()))
    }
}

fn leg_feature(leg_idx: usize, leg: &RouteLeg) -> Result<Feature, Error> {
    let geometry = Geometry::new(GeoJsonValue::from(&LineString::new(leg.polyline.clone())));

    let value = json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": {
            "leg_index": leg_idx,
            "from_building": leg.from_building,
            "to_building": leg.to_building,
            "time_s": leg.time_s,
            "label_position": [leg.label_position.x, leg.label_position.y],
        }
    });

    serde_json::from_value::<Feature>(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}
