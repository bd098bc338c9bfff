//! Projection Web Mercator (EPSG:3857)

use super::ellipsoid::WGS84;
use super::Geographic;

/// Convertit coordonnées géographiques vers Web Mercator (EPSG:3857)
pub fn geographic_to_web_mercator(geo: Geographic) -> (f64, f64) {
    // Modèle sphérique avec le rayon équatorial
    let r = WGS84::A;

    // Limiter la latitude pour éviter l'infini
    let lat = geo.lat.clamp(-85.0_f64.to_radians(), 85.0_f64.to_radians());

    let x = r * geo.lon;
    let y = r * (std::f64::consts::FRAC_PI_4 + lat / 2.0).tan().ln();

    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin() {
        let (x, y) = geographic_to_web_mercator(Geographic::from_degrees(0.0, 0.0));
        assert!(x.abs() < 1e-9);
        assert!(y.abs() < 1e-9);
    }

    #[test]
    fn test_mumbai() {
        // Mumbai ≈ (8112708, 2163886) en EPSG:3857
        let (x, y) = geographic_to_web_mercator(Geographic::from_degrees(72.8777, 19.0760));
        assert!((x - 8_112_708.0).abs() < 1.0, "x={}", x);
        assert!((y - 2_163_886.0).abs() < 1.0, "y={}", y);
    }
}
