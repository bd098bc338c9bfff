//! Reprojection légère en Rust pur (sans dépendances externes)
//!
//! Supporte les grilles UTM utilisées par les relevés cadastraux :
//! - WGS84 / UTM toutes zones (EPSG:326xx nord, EPSG:327xx sud)
//!
//! Cibles supportées :
//! - WGS84 (EPSG:4326)
//! - Web Mercator (EPSG:3857)

mod ellipsoid;
mod mercator;
mod smart;
mod utm;

pub use smart::SmartReprojector;
pub use utm::UtmZone;

use geo::{Coord, Geometry, MapCoords};

use crate::error::GeometryError;

/// Point en coordonnées géographiques (radians)
#[derive(Debug, Clone, Copy)]
pub struct Geographic {
    /// Longitude en radians
    pub lon: f64,
    /// Latitude en radians
    pub lat: f64,
}

impl Geographic {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Convertit en degrés
    pub fn to_degrees(self) -> (f64, f64) {
        (self.lon.to_degrees(), self.lat.to_degrees())
    }

    /// Crée depuis des degrés
    pub fn from_degrees(lon_deg: f64, lat_deg: f64) -> Self {
        Self {
            lon: lon_deg.to_radians(),
            lat: lat_deg.to_radians(),
        }
    }
}

/// Cible supportée par la reprojection légère
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Wgs84,
    WebMercator,
}

/// Reprojection légère UTM → WGS84 / Web Mercator
pub struct ReprojectorLite {
    zone: UtmZone,
    target: Target,
}

impl ReprojectorLite {
    /// Crée un nouveau reprojector
    pub fn new(source_epsg: u32, target_epsg: u32) -> Result<Self, GeometryError> {
        let unsupported = GeometryError::UnsupportedCrs {
            source_epsg,
            target_epsg,
        };
        let Some(zone) = UtmZone::from_epsg(source_epsg) else {
            return Err(unsupported);
        };
        let target = match target_epsg {
            4326 => Target::Wgs84,
            3857 => Target::WebMercator,
            _ => return Err(unsupported),
        };
        Ok(Self { zone, target })
    }

    /// Vérifie si la reprojection est supportée
    pub fn is_supported(source: u32, target: u32) -> bool {
        UtmZone::from_epsg(source).is_some() && matches!(target, 4326 | 3857)
    }

    /// Transforme un point (x, y) de la source vers la cible
    pub fn transform_point(&self, x: f64, y: f64) -> Result<(f64, f64), GeometryError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(GeometryError::Transform {
                x,
                y,
                reason: "non-finite input".into(),
            });
        }

        let geo = utm::utm_to_geographic(x, y, self.zone);
        let (tx, ty) = match self.target {
            Target::Wgs84 => geo.to_degrees(),
            Target::WebMercator => mercator::geographic_to_web_mercator(geo),
        };

        if !tx.is_finite() || !ty.is_finite() {
            return Err(GeometryError::Transform {
                x,
                y,
                reason: "non-finite output".into(),
            });
        }
        Ok((tx, ty))
    }

    /// Transforme une géométrie (type et structure des anneaux conservés)
    pub fn transform_geometry(&self, geom: &Geometry) -> Result<Geometry, GeometryError> {
        geom.try_map_coords(|c: Coord| {
            let (x, y) = self.transform_point(c.x, c.y)?;
            Ok::<_, GeometryError>(Coord { x, y })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{LineString, MultiPolygon, Point, Polygon};

    #[test]
    fn test_utm43_to_wgs84() {
        let reproj = ReprojectorLite::new(32643, 4326).unwrap();
        let (lon, lat) = reproj.transform_point(276689.33, 2110588.84).unwrap();

        assert!((lon - 72.8777).abs() < 1e-5, "lon={}", lon);
        assert!((lat - 19.0760).abs() < 1e-5, "lat={}", lat);
    }

    #[test]
    fn test_utm43_to_web_mercator() {
        let reproj = ReprojectorLite::new(32643, 3857).unwrap();
        let (x, y) = reproj.transform_point(276689.33, 2110588.84).unwrap();

        assert!((x - 8_112_708.0).abs() < 2.0, "x={}", x);
        assert!((y - 2_163_886.0).abs() < 2.0, "y={}", y);
    }

    #[test]
    fn test_unsupported_epsg() {
        assert!(ReprojectorLite::new(4326, 4326).is_err());
        assert!(ReprojectorLite::new(2154, 4326).is_err());
        assert!(ReprojectorLite::new(32643, 32643).is_err());
        assert!(ReprojectorLite::is_supported(32644, 4326));
        assert!(!ReprojectorLite::is_supported(32644, 2154));
    }

    #[test]
    fn test_non_finite_input() {
        let reproj = ReprojectorLite::new(32643, 4326).unwrap();
        assert!(reproj.transform_point(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_polygon_with_hole_keeps_structure() {
        let reproj = ReprojectorLite::new(32643, 4326).unwrap();
        let exterior = LineString::from(vec![
            (276600.0, 2110500.0),
            (276800.0, 2110500.0),
            (276800.0, 2110700.0),
            (276600.0, 2110700.0),
            (276600.0, 2110500.0),
        ]);
        let hole = LineString::from(vec![
            (276650.0, 2110550.0),
            (276700.0, 2110550.0),
            (276700.0, 2110600.0),
            (276650.0, 2110550.0),
        ]);
        let poly = Geometry::Polygon(Polygon::new(exterior, vec![hole]));

        let Geometry::Polygon(p) = reproj.transform_geometry(&poly).unwrap() else {
            panic!("Expected Polygon geometry");
        };
        assert_eq!(p.exterior().0.len(), 5);
        assert_eq!(p.interiors().len(), 1);
        assert_eq!(p.interiors()[0].0.len(), 4);
        let first = p.exterior().0[0];
        assert!(first.x > 72.0 && first.x < 73.0);
        assert!(first.y > 19.0 && first.y < 19.2);
    }

    #[test]
    fn test_multipolygon() {
        let reproj = ReprojectorLite::new(32643, 4326).unwrap();
        let square = |x0: f64| {
            Polygon::new(
                LineString::from(vec![
                    (x0, 2110500.0),
                    (x0 + 10.0, 2110500.0),
                    (x0 + 10.0, 2110510.0),
                    (x0, 2110500.0),
                ]),
                vec![],
            )
        };
        let mp = Geometry::MultiPolygon(MultiPolygon::new(vec![square(276600.0), square(276700.0)]));

        let Geometry::MultiPolygon(out) = reproj.transform_geometry(&mp).unwrap() else {
            panic!("Expected MultiPolygon geometry");
        };
        assert_eq!(out.0.len(), 2);

        let point = Geometry::Point(Point::new(500000.0, 0.0));
        let Geometry::Point(p) = reproj.transform_geometry(&point).unwrap() else {
            panic!("Expected Point geometry");
        };
        assert!((p.x() - 75.0).abs() < 1e-9);
        assert!(p.y().abs() < 1e-9);
    }
}
