//! The materialized, read-only form of a Topology.
//!
//! A Document serializes to the TopoJSON-style layout consumers expect:
//! `{"type": "Topology", "objects": ..., "arcs": ..., "bbox": ...}`, plus
//! `"transform"` when arcs are quantized and `"options"` on request. Point
//! geometries carry their coordinates inline.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::geo::{BoundingBox, GridPoint, Point};
use crate::options::TopoOptions;
use crate::quantize::Transform;
use crate::topology::{ArcTable, DirectedArc, TopoFeature, TopoGeometry};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Document {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub objects: BTreeMap<String, GeometryCollection>,
    pub arcs: ArcTable,
    pub bbox: BoundingBox,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<TopoOptions>,
}

/// One named object: all its features.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GeometryCollection {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub geometries: Vec<DocGeometry>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DocGeometry {
    #[serde(flatten)]
    pub shape: DocShape,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Map<String, Value>>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum DocShape {
    Point { coordinates: Position },
    MultiPoint { coordinates: Vec<Position> },
    LineString { arcs: Vec<DirectedArc> },
    MultiLineString { arcs: Vec<Vec<DirectedArc>> },
    Polygon { arcs: Vec<Vec<DirectedArc>> },
    MultiPolygon { arcs: Vec<Vec<Vec<DirectedArc>>> },
    GeometryCollection { geometries: Vec<DocGeometry> },
}

/// A point coordinate: on the grid when the Document has a transform.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Position {
    Planar(Point),
    Grid(GridPoint),
}

/// Resolves indexes into the direct coordinate table.
pub(crate) struct PointTable<'a> {
    pub coordinates: &'a [Point],
    pub transform: Option<&'a Transform>,
}

impl<'a> PointTable<'a> {
    fn position(&self, index: usize) -> Position {
        let ref point = self.coordinates[index];

        match self.transform {
            Some(transform) => Position::Grid(transform.quantize(point)),
            None => Position::Planar(*point),
        }
    }

    fn shape(&self, geometry: &TopoGeometry) -> DocShape {
        match geometry {
            TopoGeometry::Point(i) => DocShape::Point { coordinates: self.position(*i) },
            TopoGeometry::MultiPoint(is) => DocShape::MultiPoint {
                coordinates: is.iter().map(|&i| self.position(i)).collect(),
            },
            TopoGeometry::LineString(arcs) => DocShape::LineString { arcs: arcs.clone() },
            TopoGeometry::MultiLineString(arcs) => DocShape::MultiLineString { arcs: arcs.clone() },
            TopoGeometry::Polygon(arcs) => DocShape::Polygon { arcs: arcs.clone() },
            TopoGeometry::MultiPolygon(arcs) => DocShape::MultiPolygon { arcs: arcs.clone() },
            TopoGeometry::GeometryCollection(geometries) => DocShape::GeometryCollection {
                geometries: geometries.iter()
                    .map(|g| DocGeometry { shape: self.shape(g), id: None, properties: None })
                    .collect(),
            },
        }
    }

    pub fn geometry(&self, feature: &TopoFeature) -> DocGeometry {
        DocGeometry {
            shape: self.shape(&feature.geometry),
            id: feature.id.clone(),
            properties: feature.properties.clone(),
        }
    }

    pub fn collection(&self, features: &[TopoFeature]) -> GeometryCollection {
        GeometryCollection {
            kind: "GeometryCollection",
            geometries: features.iter().map(|f| self.geometry(f)).collect(),
        }
    }
}
