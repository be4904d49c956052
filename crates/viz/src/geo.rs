//! GeoJSON regions and the Mercator projection.

use crate::error::{VizError, VizResult};
use serde::Deserialize;
use std::f64::consts::FRAC_PI_4;
use std::fmt::Write as _;

type Ring = Vec<[f64; 2]>;

#[derive(Debug, Clone, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Clone, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: serde_json::Map<String, serde_json::Value>,
    geometry: Option<Geometry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Polygon {
        coordinates: Vec<Ring>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Ring>>,
    },
    #[serde(other)]
    Unsupported,
}

/// A named area made of polygons of (longitude, latitude) rings.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: String,
    pub polygons: Vec<Vec<Ring>>,
}

/// Parse a FeatureCollection, keeping features that have a name under
/// `name_property` and polygon geometry.
pub fn parse_regions(json: &[u8], name_property: &str) -> VizResult<Vec<Region>> {
    let collection: FeatureCollection = serde_json::from_slice(json)?;
    let regions: Vec<Region> = collection
        .features
        .into_iter()
        .filter_map(|feature| {
            let name = feature.properties.get(name_property)?.as_str()?.to_string();
            let polygons = match feature.geometry? {
                Geometry::Polygon { coordinates } => vec![coordinates],
                Geometry::MultiPolygon { coordinates } => coordinates,
                Geometry::Unsupported => return None,
            };
            Some(Region { name, polygons })
        })
        .collect();

    if regions.is_empty() {
        return Err(VizError::EmptyGeometry);
    }
    Ok(regions)
}

/// Spherical Mercator on the unit sphere, in radians, y pointing up.
fn mercator(lon: f64, lat: f64) -> (f64, f64) {
    // Clamp away from the poles where y diverges
    let lat = lat.clamp(-85.0, 85.0).to_radians();
    (lon.to_radians(), (FRAC_PI_4 + lat / 2.0).tan().ln())
}

/// Mercator fitted to a view and centred on a set of regions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    scale: f64,
    center: (f64, f64),
    translate: (f64, f64),
}

impl Projection {
    /// Fit `regions` into `width` x `height` with `padding` on every side.
    ///
    /// The view centre shows the area-weighted centroid of the regions, and
    /// the scale is the largest at which every region stays inside.
    #[must_use]
    pub fn fit(regions: &[Region], width: f64, height: f64, padding: f64) -> Self {
        let mut min = (f64::INFINITY, f64::INFINITY);
        let mut max = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        let mut area_sum = 0.0;
        let mut weighted = (0.0, 0.0);

        for ring in regions.iter().flat_map(|r| r.polygons.iter().flatten()) {
            let projected: Vec<(f64, f64)> = ring.iter().map(|[lon, lat]| mercator(*lon, *lat)).collect();
            for (x, y) in &projected {
                min = (min.0.min(*x), min.1.min(*y));
                max = (max.0.max(*x), max.1.max(*y));
            }
            let (area, (cx, cy)) = ring_centroid(&projected);
            area_sum += area;
            weighted = (weighted.0 + cx * area, weighted.1 + cy * area);
        }

        if !min.0.is_finite() {
            return Self {
                scale: 1.0,
                center: (0.0, 0.0),
                translate: (width / 2.0, height / 2.0),
            };
        }

        let center = if area_sum.abs() > f64::EPSILON {
            (weighted.0 / area_sum, weighted.1 / area_sum)
        } else {
            ((min.0 + max.0) / 2.0, (min.1 + max.1) / 2.0)
        };

        let half_w = (center.0 - min.0).max(max.0 - center.0);
        let half_h = (center.1 - min.1).max(max.1 - center.1);
        let avail_w = (width / 2.0 - padding).max(1.0);
        let avail_h = (height / 2.0 - padding).max(1.0);
        let scale = match (half_w > 0.0, half_h > 0.0) {
            (true, true) => (avail_w / half_w).min(avail_h / half_h),
            (true, false) => avail_w / half_w,
            (false, true) => avail_h / half_h,
            (false, false) => 1.0,
        };

        Self {
            scale,
            center,
            translate: (width / 2.0, height / 2.0),
        }
    }

    /// Screen position of a (longitude, latitude) pair.
    #[must_use]
    pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        let (x, y) = mercator(lon, lat);
        (
            self.translate.0 + (x - self.center.0) * self.scale,
            self.translate.1 - (y - self.center.1) * self.scale,
        )
    }

    /// SVG path data for a region, one closed subpath per ring.
    #[must_use]
    pub fn path(&self, region: &Region) -> String {
        let mut d = String::new();
        for ring in region.polygons.iter().flatten() {
            for (index, [lon, lat]) in ring.iter().enumerate() {
                let (x, y) = self.project(*lon, *lat);
                let command = if index == 0 { 'M' } else { 'L' };
                let _ = write!(d, "{command}{x:.1},{y:.1}");
            }
            if !ring.is_empty() {
                d.push('Z');
            }
        }
        d
    }
}

/// Signed area and centroid of a closed ring (shoelace formula).
fn ring_centroid(points: &[(f64, f64)]) -> (f64, (f64, f64)) {
    if points.len() < 3 {
        return (0.0, (0.0, 0.0));
    }
    let mut area = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for (i, (x0, y0)) in points.iter().enumerate() {
        let (x1, y1) = points[(i + 1) % points.len()];
        let cross = x0 * y1 - x1 * y0;
        area += cross;
        cx += (x0 + x1) * cross;
        cy += (y0 + y1) * cross;
    }
    area /= 2.0;
    if area.abs() < f64::EPSILON {
        return (0.0, (0.0, 0.0));
    }
    (area.abs(), (cx / (6.0 * area), cy / (6.0 * area)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"NAME": "Westland"},
             "geometry": {"type": "Polygon", "coordinates": [[[0,40],[10,40],[10,50],[0,50],[0,40]]]}},
            {"type": "Feature", "properties": {"NAME": "Eastland"},
             "geometry": {"type": "MultiPolygon", "coordinates": [[[[10,40],[20,40],[20,50],[10,50],[10,40]]]]}},
            {"type": "Feature", "properties": {"NAME": "Pointland"},
             "geometry": {"type": "Point", "coordinates": [5,45]}},
            {"type": "Feature", "properties": {},
             "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]]}}
        ]
    }"#;

    #[test]
    fn test_parse_regions() {
        let regions = parse_regions(SQUARES.as_bytes(), "NAME").unwrap();
        let names: Vec<&str> = regions.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Westland", "Eastland"]);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_regions(b"not json", "NAME"),
            Err(VizError::GeoJson(_))
        ));
        assert!(matches!(
            parse_regions(br#"{"type":"FeatureCollection","features":[]}"#, "NAME"),
            Err(VizError::EmptyGeometry)
        ));
    }

    #[test]
    fn test_fit_keeps_regions_inside() {
        let regions = parse_regions(SQUARES.as_bytes(), "NAME").unwrap();
        let projection = Projection::fit(&regions, 400.0, 300.0, 10.0);

        for ring in regions.iter().flat_map(|r| r.polygons.iter().flatten()) {
            for [lon, lat] in ring {
                let (x, y) = projection.project(*lon, *lat);
                assert!((9.9..=390.1).contains(&x), "x = {x}");
                assert!((9.9..=290.1).contains(&y), "y = {y}");
            }
        }

        // Symmetric squares centre on the shared edge at longitude 10
        let (x, _) = projection.project(10.0, 45.0);
        assert!((x - 200.0).abs() < 1e-6);

        // North is up
        let (_, north) = projection.project(10.0, 50.0);
        let (_, south) = projection.project(10.0, 40.0);
        assert!(north < south);
    }

    #[test]
    fn test_path() {
        let regions = parse_regions(SQUARES.as_bytes(), "NAME").unwrap();
        let projection = Projection::fit(&regions, 400.0, 300.0, 10.0);
        let d = projection.path(&regions[0]);
        assert!(d.starts_with('M'));
        assert_eq!(d.matches('Z').count(), 1);
        assert_eq!(d.matches('L').count(), 4);
    }
}
