//! Projection UTM (Universal Transverse Mercator) sur WGS84
//!
//! Toutes les zones WGS84/UTM sont supportées :
//! - EPSG:32601 à 32660 (hémisphère nord)
//! - EPSG:32701 à 32760 (hémisphère sud)
//!
//! Les grilles cadastrales indiennes utilisent les zones 42N à 46N
//! (Maharashtra : 43N, EPSG:32643).

use super::ellipsoid::WGS84;
use super::Geographic;

/// Zone UTM identifiée par son numéro et son hémisphère
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtmZone {
    pub zone: u32,
    pub south: bool,
}

impl UtmZone {
    /// Déduit la zone d'un code EPSG WGS84/UTM
    pub fn from_epsg(epsg: u32) -> Option<Self> {
        let (base, south) = match epsg {
            32601..=32660 => (32600, false),
            32701..=32760 => (32700, true),
            _ => return None,
        };
        Some(Self {
            zone: epsg - base,
            south,
        })
    }

    /// Longitude du méridien central (radians)
    fn central_meridian(self) -> f64 {
        ((self.zone as f64 - 1.0) * 6.0 - 180.0 + 3.0).to_radians()
    }
}

/// Convertit UTM vers coordonnées géographiques WGS84
pub fn utm_to_geographic(x: f64, y: f64, zone: UtmZone) -> Geographic {
    let a = WGS84::A;
    let e2 = WGS84::E2;
    let ep2 = WGS84::EP2;

    // Paramètres UTM
    let k0 = 0.9996;
    let x0 = 500000.0;
    let y0 = if zone.south { 10000000.0 } else { 0.0 };

    let lon0 = zone.central_meridian();

    // Coordonnées réduites
    let x = x - x0;
    let y = y - y0;

    // Latitude du pied de la perpendiculaire
    let m = y / k0;
    let mu = m / (a * (1.0 - e2 / 4.0 - 3.0 * e2.powi(2) / 64.0 - 5.0 * e2.powi(3) / 256.0));

    let e1 = (1.0 - (1.0 - e2).sqrt()) / (1.0 + (1.0 - e2).sqrt());

    let phi1 = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1.powi(2) / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
        + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

    let sin_phi1 = phi1.sin();
    let cos_phi1 = phi1.cos();
    let tan_phi1 = phi1.tan();

    let n1 = a / (1.0 - e2 * sin_phi1.powi(2)).sqrt();
    let t1 = tan_phi1.powi(2);
    let c1 = ep2 * cos_phi1.powi(2);
    let r1 = a * (1.0 - e2) / (1.0 - e2 * sin_phi1.powi(2)).powf(1.5);
    let d = x / (n1 * k0);

    let lat = phi1
        - (n1 * tan_phi1 / r1)
            * (d.powi(2) / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1.powi(2) - 9.0 * ep2) * d.powi(4) / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1.powi(2) - 252.0 * ep2 - 3.0 * c1.powi(2))
                    * d.powi(6)
                    / 720.0);

    let lon = lon0
        + (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1.powi(2) + 8.0 * ep2 + 24.0 * t1.powi(2))
                * d.powi(5)
                / 120.0)
            / cos_phi1;

    Geographic::new(lon, lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZONE_43N: UtmZone = UtmZone {
        zone: 43,
        south: false,
    };

    #[test]
    fn test_zone_from_epsg() {
        assert_eq!(UtmZone::from_epsg(32643), Some(ZONE_43N));
        assert_eq!(
            UtmZone::from_epsg(32740),
            Some(UtmZone {
                zone: 40,
                south: true
            })
        );
        assert_eq!(UtmZone::from_epsg(32600), None);
        assert_eq!(UtmZone::from_epsg(32661), None);
        assert_eq!(UtmZone::from_epsg(4326), None);
    }

    #[test]
    fn test_mumbai() {
        // Mumbai (Fort) : 72.8777°E, 19.0760°N
        let geo = utm_to_geographic(276689.33, 2110588.84, ZONE_43N);
        let (lon, lat) = geo.to_degrees();

        assert!((lon - 72.8777).abs() < 1e-5, "lon={}", lon);
        assert!((lat - 19.0760).abs() < 1e-5, "lat={}", lat);
    }

    #[test]
    fn test_pune() {
        // Pune : 73.8567°E, 18.5204°N
        let geo = utm_to_geographic(379320.82, 2048144.62, ZONE_43N);
        let (lon, lat) = geo.to_degrees();

        assert!((lon - 73.8567).abs() < 1e-5, "lon={}", lon);
        assert!((lat - 18.5204).abs() < 1e-5, "lat={}", lat);
    }

    #[test]
    fn test_central_meridian() {
        let geo = utm_to_geographic(500000.0, 2211481.31, ZONE_43N);
        let (lon, lat) = geo.to_degrees();

        assert!((lon - 75.0).abs() < 1e-9, "lon={}", lon);
        assert!((lat - 20.0).abs() < 1e-5, "lat={}", lat);
    }

    #[test]
    fn test_reunion() {
        // Saint-Denis approximativement, UTM 40S
        let zone = UtmZone::from_epsg(32740).unwrap();
        let geo = utm_to_geographic(338000.0, 7691000.0, zone);
        let (lon, lat) = geo.to_degrees();

        assert!((lon - 55.45).abs() < 0.2, "lon={}", lon);
        assert!((lat - (-20.88)).abs() < 0.2, "lat={}", lat);
    }
}
