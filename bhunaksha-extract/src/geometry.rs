//! Conversion WKT (grille de relevé) → géométrie GeoJSON géographique

use geo::{CoordsIter, Geometry};
use geozero::wkt::Wkt;
use geozero::ToGeo;

use crate::error::GeometryError;
use crate::reproject_lite::SmartReprojector;

/// Grille UTM 43N des relevés du Maharashtra
pub const DEFAULT_SOURCE_EPSG: u32 = 32643;

/// Longitude/latitude WGS84
pub const DEFAULT_TARGET_EPSG: u32 = 4326;

/// Reprojection d'une géométrie WKT vers GeoJSON, transformation fixe
pub struct CoordinateReprojector {
    inner: SmartReprojector,
    source_epsg: u32,
    target_epsg: u32,
}

impl CoordinateReprojector {
    pub fn new(source_epsg: u32, target_epsg: u32) -> Result<Self, GeometryError> {
        Ok(Self {
            inner: SmartReprojector::new(source_epsg, target_epsg)?,
            source_epsg,
            target_epsg,
        })
    }

    pub fn source_epsg(&self) -> u32 {
        self.source_epsg
    }

    pub fn target_epsg(&self) -> u32 {
        self.target_epsg
    }

    pub fn description(&self) -> &'static str {
        self.inner.description()
    }

    /// Parse le WKT et reprojette chaque sommet
    pub fn reproject_geometry(&self, wkt: &str) -> Result<Geometry, GeometryError> {
        let geom = Wkt(wkt)
            .to_geo()
            .map_err(|e| GeometryError::Parse(e.to_string()))?;

        if geom.coords_count() == 0 {
            return Err(GeometryError::Empty);
        }

        self.inner.transform_geometry(&geom)
    }

    /// Parse, reprojette et convertit en géométrie GeoJSON
    pub fn reproject_wkt(&self, wkt: &str) -> Result<geojson::Geometry, GeometryError> {
        let geom = self.reproject_geometry(wkt)?;
        Ok(geojson::Geometry::new(geojson::Value::from(&geom)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reprojector() -> CoordinateReprojector {
        CoordinateReprojector::new(DEFAULT_SOURCE_EPSG, DEFAULT_TARGET_EPSG).unwrap()
    }

    #[test]
    fn test_point_round_trip() {
        let geom = reprojector()
            .reproject_wkt("POINT (276689.33 2110588.84)")
            .unwrap();
        let geojson::Value::Point(coords) = geom.value else {
            panic!("Expected Point");
        };
        assert!((coords[0] - 72.8777).abs() < 1e-5, "lon={}", coords[0]);
        assert!((coords[1] - 19.0760).abs() < 1e-5, "lat={}", coords[1]);
    }

    #[test]
    fn test_polygon_structure() {
        let wkt = "POLYGON ((276600 2110500, 276800 2110500, 276800 2110700, 276600 2110500), \
                   (276650 2110550, 276700 2110550, 276700 2110600, 276650 2110550))";
        let geom = reprojector().reproject_wkt(wkt).unwrap();
        let geojson::Value::Polygon(rings) = geom.value else {
            panic!("Expected Polygon");
        };
        assert_eq!(rings.len(), 2);
        assert_eq!(rings[0].len(), 4);
        assert_eq!(rings[1].len(), 4);
    }

    #[test]
    fn test_multipolygon() {
        let wkt = "MULTIPOLYGON (((276600 2110500, 276610 2110500, 276610 2110510, 276600 2110500)), \
                   ((276700 2110500, 276710 2110500, 276710 2110510, 276700 2110500)))";
        let geom = reprojector().reproject_wkt(wkt).unwrap();
        assert!(matches!(geom.value, geojson::Value::MultiPolygon(ref p) if p.len() == 2));
    }

    #[test]
    fn test_invalid_wkt() {
        let err = reprojector().reproject_wkt("POLYGON ((1 2, 3").unwrap_err();
        assert!(matches!(err, GeometryError::Parse(_)));
        assert!(reprojector().reproject_wkt("not wkt").is_err());
    }
}
