//! Country Geometry Loader
//! Reads country polygons keyed by their `ADMIN` attribute from a shapefile or GeoJSON.

use log::{info, warn};
use serde_json::Value as JsonValue;
use shapefile::dbase::FieldValue;
use shapefile::{PolygonRing, Shape};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Attribute carrying the country name used as join key.
pub const ADMIN_FIELD: &str = "ADMIN";

pub type Point2 = (f64, f64);

#[derive(Error, Debug)]
pub enum GeometryError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to read geometry {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("Unsupported geometry format: {} (expected .shp, .geojson or .json)", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("Geometry file {} has no `ADMIN` attribute", .path.display())]
    MissingAdminField { path: PathBuf },
    #[error("Geometry file {} contains no polygon features", .0.display())]
    Empty(PathBuf),
}

/// One polygon: an exterior ring plus holes.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonShape {
    pub exterior: Vec<Point2>,
    pub interiors: Vec<Vec<Point2>>,
}

impl PolygonShape {
    /// Exterior first, then every hole.
    pub fn rings(&self) -> impl Iterator<Item = &[Point2]> {
        std::iter::once(self.exterior.as_slice()).chain(self.interiors.iter().map(Vec::as_slice))
    }
}

/// A country outline. Multipolygons hold several entries in `polygons`.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryGeometry {
    pub admin: String,
    pub polygons: Vec<PolygonShape>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    fn of<'a>(points: impl Iterator<Item = &'a Point2>) -> Option<Self> {
        points.fold(None, |acc, &(x, y)| {
            Some(match acc {
                None => Bounds {
                    min_x: x,
                    min_y: y,
                    max_x: x,
                    max_y: y,
                },
                Some(b) => Bounds {
                    min_x: b.min_x.min(x),
                    min_y: b.min_y.min(y),
                    max_x: b.max_x.max(x),
                    max_y: b.max_y.max(y),
                },
            })
        })
    }
}

/// The loaded geometry dataset. Immutable once built; never empty.
#[derive(Debug, Clone)]
pub struct GeometrySet {
    countries: Vec<CountryGeometry>,
    bounds: Bounds,
}

impl GeometrySet {
    /// Returns `None` when no country carries a point.
    pub fn new(countries: Vec<CountryGeometry>) -> Option<Self> {
        let bounds = Bounds::of(
            countries
                .iter()
                .flat_map(|c| c.polygons.iter())
                .flat_map(|p| p.exterior.iter()),
        )?;
        Some(Self { countries, bounds })
    }

    pub fn countries(&self) -> &[CountryGeometry] {
        &self.countries
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }
}

pub struct GeometryLoader;

impl GeometryLoader {
    /// Load from `.shp` (with sibling `.shx`/`.dbf`) or from a GeoJSON FeatureCollection.
    pub fn load(path: impl AsRef<Path>) -> Result<GeometrySet, GeometryError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(GeometryError::NotFound(path.to_path_buf()));
        }

        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        let countries = match extension.as_str() {
            "shp" => Self::read_shapefile(path)?,
            "geojson" | "json" => Self::read_geojson(path)?,
            _ => return Err(GeometryError::UnsupportedFormat(path.to_path_buf())),
        };

        let set = GeometrySet::new(countries)
            .ok_or_else(|| GeometryError::Empty(path.to_path_buf()))?;
        info!("Loaded {} country geometries from {}", set.len(), path.display());
        Ok(set)
    }

    fn read_shapefile(path: &Path) -> Result<Vec<CountryGeometry>, GeometryError> {
        let shapes = shapefile::read(path).map_err(|e| unreadable(path, e))?;

        let mut countries = Vec::with_capacity(shapes.len());
        for (shape, record) in shapes {
            let admin = match record.get(ADMIN_FIELD) {
                Some(FieldValue::Character(value)) => value.clone().unwrap_or_default(),
                Some(FieldValue::Memo(value)) => value.clone(),
                Some(other) => {
                    warn!("Non-text ADMIN value {:?}, treating as unnamed", other);
                    String::new()
                }
                None => {
                    return Err(GeometryError::MissingAdminField {
                        path: path.to_path_buf(),
                    })
                }
            };

            let polygons = match shape {
                Shape::Polygon(p) => polygons_from_rings(p.rings(), |pt| (pt.x, pt.y)),
                Shape::PolygonM(p) => polygons_from_rings(p.rings(), |pt| (pt.x, pt.y)),
                Shape::PolygonZ(p) => polygons_from_rings(p.rings(), |pt| (pt.x, pt.y)),
                Shape::NullShape => continue,
                other => {
                    warn!("Skipping non-polygon shape {:?} for {}", other.shapetype(), admin);
                    continue;
                }
            };

            countries.push(CountryGeometry { admin, polygons });
        }

        Ok(countries)
    }

    fn read_geojson(path: &Path) -> Result<Vec<CountryGeometry>, GeometryError> {
        let file = File::open(path).map_err(|e| unreadable(path, e))?;
        let geojson =
            geojson::GeoJson::from_reader(BufReader::new(file)).map_err(|e| unreadable(path, e))?;

        let geojson::GeoJson::FeatureCollection(collection) = geojson else {
            return Err(unreadable(path, "expected a GeoJSON FeatureCollection"));
        };

        let mut countries = Vec::with_capacity(collection.features.len());
        for feature in collection.features {
            let admin = match feature.property(ADMIN_FIELD) {
                Some(JsonValue::String(name)) => name.clone(),
                Some(JsonValue::Null) => String::new(),
                Some(other) => other.to_string(),
                None => {
                    return Err(GeometryError::MissingAdminField {
                        path: path.to_path_buf(),
                    })
                }
            };

            let Some(geometry) = feature.geometry else {
                continue;
            };

            let polygons = match geometry.value {
                geojson::Value::Polygon(rings) => vec![polygon_from_positions(&rings)],
                geojson::Value::MultiPolygon(parts) => {
                    parts.iter().map(|rings| polygon_from_positions(rings)).collect()
                }
                _ => {
                    warn!("Skipping non-polygon geometry for {}", admin);
                    continue;
                }
            };

            countries.push(CountryGeometry { admin, polygons });
        }

        Ok(countries)
    }
}

fn unreadable(
    path: &Path,
    source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
) -> GeometryError {
    GeometryError::Unreadable {
        path: path.to_path_buf(),
        source: source.into(),
    }
}

/// Shapefile polygons list outer rings each followed by their holes.
fn polygons_from_rings<P>(
    rings: &[PolygonRing<P>],
    xy: impl Fn(&P) -> Point2,
) -> Vec<PolygonShape> {
    let mut polygons: Vec<PolygonShape> = Vec::new();
    for ring in rings {
        let points: Vec<Point2> = ring.points().iter().map(&xy).collect();
        if let (PolygonRing::Inner(_), Some(last)) = (ring, polygons.last_mut()) {
            last.interiors.push(points);
            continue;
        }
        polygons.push(PolygonShape {
            exterior: points,
            interiors: Vec::new(),
        });
    }
    polygons
}

fn polygon_from_positions(rings: &[Vec<Vec<f64>>]) -> PolygonShape {
    let to_points = |ring: &Vec<Vec<f64>>| -> Vec<Point2> {
        ring.iter()
            .filter(|pos| pos.len() >= 2)
            .map(|pos| (pos[0], pos[1]))
            .collect()
    };

    PolygonShape {
        exterior: rings.first().map(to_points).unwrap_or_default(),
        interiors: rings.iter().skip(1).map(to_points).collect(),
    }
}
