//! Breaks input features into rings and lines.
//!
//! Junction detection and arc building only care about paths: a ring is a
//! path that ends where it starts; a line is a path that doesn't. Points have
//! no boundary to share, so they go straight to a coordinate table.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::geo::{winding_order, BoundingBox, Feature, FeatureId, Geometry, Point, Shape, WindingOrder};
use crate::options::WindingConvention;
use crate::topology::{PathId, TopoFeature, TopoGeometry};

/// One ring or line, ready for junction detection.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractedPath {
    pub points: Vec<Point>,
    pub closed: bool,
    pub feature: FeatureId,
}

impl Shape for ExtractedPath {
    fn points(&self) -> &[Point] {
        &self.points[..]
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn feature_id(&self) -> FeatureId {
        self.feature
    }
}

#[derive(Debug)]
pub struct Extraction {
    /// Every ring and line, indexed by PathId.
    pub paths: Vec<ExtractedPath>,
    /// Point and MultiPoint coordinates, indexed by TopoGeometry::Point.
    pub coordinates: Vec<Point>,
    pub objects: BTreeMap<String, Vec<TopoFeature<PathId>>>,
    pub bbox: BoundingBox,
}

struct Extractor {
    winding: WindingConvention,
    paths: Vec<ExtractedPath>,
    coordinates: Vec<Point>,
    bbox: BoundingBox,
    feature: FeatureId,
}

/// Splits every feature of every object into paths and points.
///
/// Rings come out closed, oriented per `winding`: a polygon's first ring is
/// its exterior, the rest are holes.
pub fn extract(objects: BTreeMap<String, Vec<Feature>>, winding: WindingConvention) -> Result<Extraction> {
    let mut extractor = Extractor {
        winding: winding,
        paths: vec![],
        coordinates: vec![],
        bbox: BoundingBox::empty(),
        feature: FeatureId { object: 0, feature: 0 },
    };

    let mut topo_objects = BTreeMap::new();

    for (object_index, (name, features)) in objects.into_iter().enumerate() {
        let mut topo_features = Vec::with_capacity(features.len());

        for (feature_index, feature) in features.into_iter().enumerate() {
            extractor.feature = FeatureId { object: object_index as u32, feature: feature_index as u32 };

            let Feature { geometry, id, properties } = feature;
            let topo_geometry = extractor.add_geometry(geometry)?;

            topo_features.push(TopoFeature {
                geometry: topo_geometry,
                id: id,
                properties: properties,
            });
        }

        topo_objects.insert(name, topo_features);
    }

    debug!("extracted {} paths and {} points", extractor.paths.len(), extractor.coordinates.len());

    Ok(Extraction {
        paths: extractor.paths,
        coordinates: extractor.coordinates,
        objects: topo_objects,
        bbox: extractor.bbox,
    })
}

impl Extractor {
    fn invalid(&self, message: String) -> Error {
        Error::InvalidGeometry(format!(
            "{} (object {}, feature {})",
            message,
            self.feature.object,
            self.feature.feature
        ))
    }

    fn check_points(&self, points: &[Point]) -> Result<()> {
        match points.iter().find(|p| !p.is_finite()) {
            Some(p) => Err(self.invalid(format!("coordinate {} is not finite", p))),
            None => Ok(()),
        }
    }

    fn add_geometry(&mut self, geometry: Geometry) -> Result<TopoGeometry<PathId>> {
        Ok(match geometry {
            Geometry::Point(point) => TopoGeometry::Point(self.add_point(point)?),
            Geometry::MultiPoint(points) => TopoGeometry::MultiPoint(
                points.into_iter().map(|p| self.add_point(p)).collect::<Result<Vec<usize>>>()?
            ),
            Geometry::LineString(points) => TopoGeometry::LineString(self.add_line(points)?),
            Geometry::MultiLineString(lines) => TopoGeometry::MultiLineString(
                lines.into_iter().map(|l| self.add_line(l)).collect::<Result<Vec<PathId>>>()?
            ),
            Geometry::Polygon(rings) => TopoGeometry::Polygon(self.add_polygon(rings)?),
            Geometry::MultiPolygon(polygons) => TopoGeometry::MultiPolygon(
                polygons.into_iter().map(|p| self.add_polygon(p)).collect::<Result<Vec<Vec<PathId>>>>()?
            ),
            Geometry::GeometryCollection(geometries) => TopoGeometry::GeometryCollection(
                geometries.into_iter().map(|g| self.add_geometry(g)).collect::<Result<Vec<TopoGeometry<PathId>>>>()?
            ),
        })
    }

    fn add_point(&mut self, point: Point) -> Result<usize> {
        self.check_points(&[ point ])?;
        self.bbox.extend(&point);
        self.coordinates.push(point);
        Ok(self.coordinates.len() - 1)
    }

    fn add_path(&mut self, points: Vec<Point>, closed: bool) -> PathId {
        for p in points.iter() {
            self.bbox.extend(p);
        }

        let path_id = self.paths.len() as PathId;
        trace!("path {}: {} points, closed={}", path_id, points.len(), closed);
        self.paths.push(ExtractedPath { points: points, closed: closed, feature: self.feature });
        path_id
    }

    fn add_line(&mut self, points: Vec<Point>) -> Result<PathId> {
        if points.len() < 2 {
            return Err(self.invalid(format!("a line needs at least 2 points; got {}", points.len())));
        }
        self.check_points(&points)?;

        Ok(self.add_path(points, false))
    }

    fn add_polygon(&mut self, rings: Vec<Vec<Point>>) -> Result<Vec<PathId>> {
        let exterior = self.winding.exterior();
        let interior = self.winding.interior();

        rings.into_iter()
            .enumerate()
            .map(|(i, ring)| self.add_ring(ring, if i == 0 { exterior } else { interior }))
            .collect()
    }

    fn add_ring(&mut self, mut points: Vec<Point>, wanted: WindingOrder) -> Result<PathId> {
        self.check_points(&points)?;

        if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
            if first != last {
                points.push(first);
            }
        }

        if points.len() < 4 {
            return Err(self.invalid(format!("a ring needs at least 4 points (closed); got {}", points.len())));
        }

        // Zero-area rings have no orientation to fix.
        match winding_order(&points) {
            Some(order) if order != wanted => points.reverse(),
            _ => {}
        }

        Ok(self.add_path(points, true))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point(x, y)
    }

    fn one_object(features: Vec<Feature>) -> BTreeMap<String, Vec<Feature>> {
        let mut objects = BTreeMap::new();
        objects.insert("data".to_string(), features);
        objects
    }

    #[test]
    fn close_and_orient_rings() {
        // counter-clockwise exterior (no closing point), clockwise hole
        let polygon = Geometry::Polygon(vec![
            vec![ p(0., 0.), p(10., 0.), p(10., 10.), p(0., 10.) ],
            vec![ p(2., 2.), p(2., 8.), p(8., 8.), p(8., 2.), p(2., 2.) ],
        ]);

        let extraction = extract(one_object(vec![ polygon.into() ]), WindingConvention::CwCcw).unwrap();

        assert_eq!(2, extraction.paths.len());
        assert_eq!(
            vec![ p(0., 0.), p(0., 10.), p(10., 10.), p(10., 0.), p(0., 0.) ],
            extraction.paths[0].points
        );
        assert_eq!(Some(WindingOrder::Clockwise), winding_order(&extraction.paths[0].points));
        assert_eq!(Some(WindingOrder::CounterClockwise), winding_order(&extraction.paths[1].points));
        assert!(extraction.paths.iter().all(|path| path.is_closed()));
        assert_eq!(BoundingBox::new(0., 0., 10., 10.), extraction.bbox);
    }

    #[test]
    fn ccw_convention() {
        let polygon = Geometry::Polygon(vec![ vec![ p(0., 0.), p(0., 1.), p(1., 1.), p(1., 0.), p(0., 0.) ] ]);
        let extraction = extract(one_object(vec![ polygon.into() ]), WindingConvention::CcwCw).unwrap();
        assert_eq!(Some(WindingOrder::CounterClockwise), winding_order(&extraction.paths[0].points));
    }

    #[test]
    fn points_go_to_coordinate_table() {
        let features = vec![
            Geometry::Point(p(5., 5.)).into(),
            Geometry::GeometryCollection(vec![
                Geometry::MultiPoint(vec![ p(1., 2.), p(3., 4.) ]),
                Geometry::LineString(vec![ p(0., 0.), p(1., 1.) ]),
            ]).into(),
        ];

        let extraction = extract(one_object(features), WindingConvention::CwCcw).unwrap();

        assert_eq!(vec![ p(5., 5.), p(1., 2.), p(3., 4.) ], extraction.coordinates);
        assert_eq!(1, extraction.paths.len());
        assert!(!extraction.paths[0].is_closed());

        let ref features = extraction.objects["data"];
        assert_eq!(TopoGeometry::Point(0), features[0].geometry);
        assert_eq!(
            TopoGeometry::GeometryCollection(vec![ TopoGeometry::MultiPoint(vec![ 1, 2 ]), TopoGeometry::LineString(0) ]),
            features[1].geometry
        );
        assert_eq!(FeatureId { object: 0, feature: 1 }, extraction.paths[0].feature_id());
    }

    #[test]
    fn feature_ids_follow_object_order() {
        let mut objects = BTreeMap::new();
        objects.insert("roads".to_string(), vec![ Geometry::LineString(vec![ p(0., 0.), p(1., 0.) ]).into() ]);
        objects.insert("lakes".to_string(), vec![
            Geometry::LineString(vec![ p(0., 1.), p(1., 1.) ]).into(),
            Geometry::LineString(vec![ p(0., 2.), p(1., 2.) ]).into(),
        ]);

        let extraction = extract(objects, WindingConvention::CwCcw).unwrap();

        // "lakes" sorts first
        assert_eq!(FeatureId { object: 0, feature: 1 }, extraction.paths[1].feature);
        assert_eq!(FeatureId { object: 1, feature: 0 }, extraction.paths[2].feature);
    }

    #[test]
    fn keep_id_and_properties() {
        let mut properties = serde_json::Map::new();
        properties.insert("name".to_string(), serde_json::Value::from("Null Island"));

        let feature = Feature {
            geometry: Geometry::Point(p(0., 0.)),
            id: Some(serde_json::Value::from(7)),
            properties: Some(properties.clone()),
        };

        let extraction = extract(one_object(vec![ feature ]), WindingConvention::CwCcw).unwrap();
        let ref topo_feature = extraction.objects["data"][0];
        assert_eq!(Some(serde_json::Value::from(7)), topo_feature.id);
        assert_eq!(Some(properties), topo_feature.properties);
    }

    #[test]
    fn reject_short_line() {
        let result = extract(one_object(vec![ Geometry::LineString(vec![ p(0., 0.) ]).into() ]), WindingConvention::CwCcw);
        match result {
            Err(Error::InvalidGeometry(_)) => {}
            other => panic!("expected InvalidGeometry, got {:?}", other),
        }
    }

    #[test]
    fn reject_short_ring() {
        let polygon = Geometry::Polygon(vec![ vec![ p(0., 0.), p(1., 0.), p(0., 0.) ] ]);
        assert!(extract(one_object(vec![ polygon.into() ]), WindingConvention::CwCcw).is_err());
    }

    #[test]
    fn reject_nan() {
        let result = extract(one_object(vec![ Geometry::Point(p(f64::NAN, 0.)).into() ]), WindingConvention::CwCcw);
        assert!(result.is_err());
    }
}
