//! Reprojection de géométries avec PROJ
//!
//! Ce module est disponible uniquement avec le feature `proj` ; il couvre les
//! systèmes non gérés par `reproject_lite` (grilles locales, datums Everest).

use geo::{Coord, Geometry, MapCoords};
use proj::Proj;

use crate::error::GeometryError;

/// Reprojection de géométries entre deux systèmes de coordonnées
pub struct Reprojector {
    proj: Proj,
}

impl Reprojector {
    /// Crée un nouveau reprojector entre deux EPSG
    pub fn new(source_epsg: u32, target_epsg: u32) -> Result<Self, GeometryError> {
        let source = format!("EPSG:{}", source_epsg);
        let target = format!("EPSG:{}", target_epsg);

        let proj = Proj::new_known_crs(&source, &target, None).map_err(|e| {
            tracing::debug!("PROJ rejected {} -> {}: {}", source, target, e);
            GeometryError::UnsupportedCrs {
                source_epsg,
                target_epsg,
            }
        })?;

        Ok(Self { proj })
    }

    /// Transforme une géométrie
    pub fn transform_geometry(&self, geom: &Geometry) -> Result<Geometry, GeometryError> {
        geom.try_map_coords(|c: Coord| {
            let (x, y) = self
                .proj
                .convert((c.x, c.y))
                .map_err(|e| GeometryError::Transform {
                    x: c.x,
                    y: c.y,
                    reason: e.to_string(),
                })?;
            Ok::<_, GeometryError>(Coord { x, y })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Point;

    #[test]
    fn test_utm43_to_wgs84() {
        let reprojector = Reprojector::new(32643, 4326).unwrap();

        let mumbai = Geometry::Point(Point::new(276689.33, 2110588.84));
        let Geometry::Point(p) = reprojector.transform_geometry(&mumbai).unwrap() else {
            panic!("Expected Point geometry");
        };
        assert!((p.x() - 72.8777).abs() < 1e-5, "lon={}", p.x());
        assert!((p.y() - 19.0760).abs() < 1e-5, "lat={}", p.y());
    }

    #[test]
    fn test_invalid_epsg() {
        assert!(Reprojector::new(99999, 4326).is_err());
    }
}
