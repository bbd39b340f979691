//! Land boundary polygons.
//!
//! The drawing collaborator hands over closed rings of (lat, lng) points.
//! On the wire a boundary is `[[["lat","lng"], ...], ...]` with every
//! coordinate printed to 10 decimal places.

use serde::{Deserialize, Serialize};

use crate::error::{PattaError, PattaResult};

/// Decimal places kept for every boundary coordinate.
pub const COORD_PRECISION: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Reject non-finite or out-of-range coordinates.
    pub fn check(&self) -> PattaResult<()> {
        check_coordinate("lat", self.lat, 90.0)?;
        check_coordinate("lng", self.lng, 180.0)
    }
}

/// A coordinate entered on the form: the text as typed (trimmed) and its value.
///
/// The text is what goes on the wire; the value is only used for range checks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormCoordinate {
    pub text: String,
    pub value: f64,
}

impl FormCoordinate {
    /// Parse `raw` and check it lies within `-limit..=limit`.
    pub fn parse(name: &'static str, raw: &str, limit: f64) -> PattaResult<Self> {
        let text = raw.trim();
        let value: f64 = text.parse().map_err(|_| PattaError::InvalidNumber {
            name,
            value: text.to_string(),
        })?;
        check_coordinate(name, value, limit)?;

        Ok(Self {
            text: text.to_string(),
            value,
        })
    }
}

impl From<f64> for FormCoordinate {
    fn from(value: f64) -> Self {
        Self {
            text: value.to_string(),
            value,
        }
    }
}

/// One closed ring of a polygon.
pub type Ring = Vec<LatLng>;

/// Source of drawn boundary rings (the map layer).
pub trait BoundarySource {
    /// Rings in drawing order, produced lazily.
    fn rings(&self) -> Box<dyn Iterator<Item = Ring> + '_>;
}

/// A fixed set of rings, e.g. loaded from a file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticBoundary(pub Vec<Ring>);

impl StaticBoundary {
    /// Parse `[[[lat, lng], ...], ...]` where each coordinate is a number or
    /// a numeric string.
    pub fn from_json(text: &str) -> PattaResult<Self> {
        let raw: Vec<Vec<[serde_json::Value; 2]>> = serde_json::from_str(text)?;
        let mut rings = Vec::with_capacity(raw.len());

        for raw_ring in raw {
            let mut ring = Vec::with_capacity(raw_ring.len());
            for [lat, lng] in raw_ring {
                ring.push(LatLng::new(number("lat", &lat)?, number("lng", &lng)?));
            }
            rings.push(ring);
        }

        Ok(Self(rings))
    }
}

impl BoundarySource for StaticBoundary {
    fn rings(&self) -> Box<dyn Iterator<Item = Ring> + '_> {
        Box::new(self.0.iter().cloned())
    }
}

/// Serialize rings in the wire format.
pub fn encode_boundary(rings: &[Ring]) -> Result<String, serde_json::Error> {
    let wire: Vec<Vec<[String; 2]>> = rings
        .iter()
        .map(|ring| {
            ring.iter()
                .map(|p| [fixed(p.lat), fixed(p.lng)])
                .collect()
        })
        .collect();

    serde_json::to_string(&wire)
}

fn fixed(value: f64) -> String {
    format!("{:.*}", COORD_PRECISION, value)
}

pub(crate) fn check_coordinate(name: &'static str, value: f64, limit: f64) -> PattaResult<()> {
    if value.is_finite() && (-limit..=limit).contains(&value) {
        Ok(())
    } else {
        Err(PattaError::InvalidCoordinate { name, value })
    }
}

fn number(name: &'static str, value: &serde_json::Value) -> PattaResult<f64> {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| PattaError::InvalidNumber {
        name,
        value: value.to_string(),
    })
}
