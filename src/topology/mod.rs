//! A set of geometries whose shared boundaries are stored once.
//!
//! The Topology is made up of arcs and features. Top-down: a feature's
//! geometry is composed of rings and lines; each ring or line is a list of
//! DirectedArcs; each arc is a list of Points whose first and last Points are
//! junctions. We won't move junctions when we simplify or quantize, so a
//! boundary shared by two polygons stays shared.

mod build;
pub mod junctions;
mod types;

use std::collections::BTreeMap;
use std::fmt;
use std::io;

use itertools::Itertools;
use once_cell::sync::OnceCell;
use serde::Serialize;

use crate::delta;
use crate::document::{Document, PointTable};
use crate::error::Result;
use crate::export::{self, JsonOptions};
use crate::extract::{extract, ExtractedPath, Extraction};
use crate::geo::{BoundingBox, Feature, GridPoint, Point};
use crate::options::{check_epsilon, TopoOptions};
use crate::quantize::{self, check_factor, Transform};
use crate::simplify::{simplify_arc, simplify_arcs};

pub use self::build::ArcBuilder;
pub use self::types::{stitch, ArcId, DirectedArc, Direction, PathId, TopoFeature, TopoGeometry};

/// The arc table: planar points, or delta-encoded grid points when the
/// Topology has a Transform.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ArcTable {
    Planar(Vec<Vec<Point>>),
    Delta(Vec<Vec<GridPoint>>),
}

impl ArcTable {
    pub fn len(&self) -> usize {
        match self {
            ArcTable::Planar(arcs) => arcs.len(),
            ArcTable::Delta(arcs) => arcs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn n_points(&self) -> usize {
        match self {
            ArcTable::Planar(arcs) => arcs.iter().map(|a| a.len()).sum(),
            ArcTable::Delta(arcs) => arcs.iter().map(|a| a.len()).sum(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Topology {
    options: TopoOptions,
    objects: BTreeMap<String, Vec<TopoFeature>>,
    arcs: ArcTable,
    transform: Option<Transform>,
    /// Point and MultiPoint coordinates, in planar units.
    coordinates: Vec<Point>,
    bbox: BoundingBox,
    /// Compact JSON, without options. Reset whenever arcs change.
    cached_json: OnceCell<String>,
}

/// Moves `path` onto the grid centers of `transform`, dropping points that
/// land on their predecessor's cell.
fn snap_path(path: &mut ExtractedPath, transform: &Transform) {
    let snapped: Vec<Point> = path.points.iter().map(|p| transform.snap(p)).collect();
    let deduped: Vec<Point> = snapped.iter().cloned().dedup().collect();
    let min_len = if path.closed { 4 } else { 2 };

    path.points = if deduped.len() >= min_len { deduped } else { snapped };
}

impl Topology {
    /// Builds a Topology from named collections of features.
    ///
    /// Fails if `options` are invalid or a geometry can't be split into rings
    /// and lines; no Topology exists in that case.
    pub fn new(objects: BTreeMap<String, Vec<Feature>>, options: TopoOptions) -> Result<Topology> {
        options.validate()?;

        let Extraction { mut paths, coordinates, objects, bbox } = extract(objects, options.winding_order)?;

        if let Some(epsilon) = options.presimplify {
            for path in paths.iter_mut() {
                path.points = simplify_arc(&path.points, epsilon, options.simplify_algorithm, options.prevent_oversimplify);
            }
        }

        let (prequantize, coordinates) = match options.prequantize {
            Some(factor) => {
                let transform = Transform::new(&bbox, factor)?;
                for path in paths.iter_mut() {
                    snap_path(path, &transform);
                }
                let snapped: Vec<Point> = coordinates.iter().map(|p| transform.snap(p)).collect();
                (Some(factor), snapped)
            }
            None => (None, coordinates),
        };

        let cuts = if options.topology {
            junctions::cut_positions(&paths[..], options.junction_strategy())
        } else {
            junctions::endpoint_cuts(&paths[..])
        };

        let mut builder = if options.topology { ArcBuilder::new() } else { ArcBuilder::without_dedup() };

        let mut path_arcs: Vec<Vec<DirectedArc>> = paths.iter()
            .zip(cuts.iter())
            .map(|(path, path_cuts)| builder.add_path(path, path_cuts))
            .collect();

        let planar = builder.into_arcs();
        debug!("built {} arcs from {} paths", planar.len(), paths.len());

        let (arcs, transform) = match prequantize {
            Some(factor) => {
                let (grid, transform) = quantize::quantize(&planar, &bbox, factor)?;
                (ArcTable::Delta(delta::encode_arcs(&grid)), Some(transform))
            }
            None => (ArcTable::Planar(planar), None),
        };

        let mut topo_objects = BTreeMap::new();
        for (name, features) in objects {
            let mut topo_features = Vec::with_capacity(features.len());

            for feature in features {
                let geometry = feature.geometry.map(&mut |path_id: PathId| {
                    std::mem::replace(&mut path_arcs[path_id as usize], vec![])
                });

                topo_features.push(TopoFeature {
                    geometry: geometry,
                    id: feature.id,
                    properties: feature.properties,
                });
            }

            topo_objects.insert(name, topo_features);
        }

        let mut topology = Topology {
            options: options,
            objects: topo_objects,
            arcs: arcs,
            transform: transform,
            coordinates: coordinates,
            bbox: bbox,
            cached_json: OnceCell::new(),
        };

        if let Some(factor) = topology.options.topoquantize {
            topology.topoquantize_inplace(factor)?;
        }

        if let Some(epsilon) = topology.options.toposimplify {
            topology.toposimplify_inplace(epsilon)?;
        }

        Ok(topology)
    }

    /// Builds a Topology with a single object, named "data".
    pub fn from_features(features: Vec<Feature>, options: TopoOptions) -> Result<Topology> {
        let mut objects = BTreeMap::new();
        objects.insert("data".to_string(), features);
        Topology::new(objects, options)
    }

    pub fn options(&self) -> &TopoOptions {
        &self.options
    }

    pub fn objects(&self) -> &BTreeMap<String, Vec<TopoFeature>> {
        &self.objects
    }

    pub fn arcs(&self) -> &ArcTable {
        &self.arcs
    }

    pub fn transform(&self) -> Option<&Transform> {
        self.transform.as_ref()
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    /// Returns every arc as absolute planar Points.
    pub fn planar_arcs(&self) -> Vec<Vec<Point>> {
        match (&self.arcs, &self.transform) {
            (ArcTable::Planar(arcs), _) => arcs.clone(),
            (ArcTable::Delta(arcs), Some(transform)) => quantize::dequantize(&delta::decode_arcs(arcs), transform),
            (ArcTable::Delta(arcs), None) => delta::decode_arcs(arcs).iter()
                .map(|arc| arc.iter().map(|g| Point(g.0 as f64, g.1 as f64)).collect())
                .collect(),
        }
    }

    /// Returns the planar Points traced by `directed_arcs`, or `None` if one
    /// of them isn't an arc of this Topology.
    pub fn stitch(&self, directed_arcs: &[DirectedArc]) -> Option<Vec<Point>> {
        stitch(&self.planar_arcs(), directed_arcs)
    }

    /// Re-quantizes every arc onto a grid of `factor` lines per axis.
    ///
    /// Already-quantized arcs are dequantized first, so quantizing twice with
    /// the same factor changes nothing. Without arcs, nothing happens.
    pub fn topoquantize_inplace(&mut self, factor: f64) -> Result<()> {
        check_factor(factor)?;

        if self.arcs.is_empty() {
            return Ok(());
        }

        let (grid, transform) = quantize::quantize(&self.planar_arcs(), &self.bbox, factor)?;
        debug!("quantized {} arcs to a {} grid", grid.len(), factor);

        self.arcs = ArcTable::Delta(delta::encode_arcs(&grid));
        self.transform = Some(transform);
        self.options.topoquantize = Some(factor);
        self.cached_json = OnceCell::new();
        Ok(())
    }

    /// Returns a quantized copy. See `topoquantize_inplace()`.
    pub fn topoquantize(&self, factor: f64) -> Result<Topology> {
        let mut ret = self.clone();
        ret.topoquantize_inplace(factor)?;
        Ok(ret)
    }

    /// Simplifies every arc.
    ///
    /// Arcs are simplified in planar units, then quantized again with the
    /// topoquantize factor, else the prequantize factor, else left planar.
    pub fn toposimplify_inplace(&mut self, epsilon: f64) -> Result<()> {
        check_epsilon(epsilon)?;

        let mut planar = self.planar_arcs();
        simplify_arcs(&mut planar, epsilon, self.options.simplify_algorithm, self.options.prevent_oversimplify);

        let (arcs, transform) = match self.options.quantize_factor() {
            Some(factor) => {
                let (grid, transform) = quantize::quantize(&planar, &self.bbox, factor)?;
                (ArcTable::Delta(delta::encode_arcs(&grid)), Some(transform))
            }
            None => (ArcTable::Planar(planar), None),
        };

        self.arcs = arcs;
        self.transform = transform;
        self.options.toposimplify = Some(epsilon);
        self.cached_json = OnceCell::new();
        Ok(())
    }

    /// Returns a simplified copy. See `toposimplify_inplace()`.
    pub fn toposimplify(&self, epsilon: f64) -> Result<Topology> {
        let mut ret = self.clone();
        ret.toposimplify_inplace(epsilon)?;
        Ok(ret)
    }

    /// Materializes the Topology, with point coordinates inline.
    pub fn to_document(&self, include_options: bool) -> Document {
        let table = PointTable {
            coordinates: &self.coordinates[..],
            transform: self.transform.as_ref(),
        };

        Document {
            kind: "Topology",
            objects: self.objects.iter()
                .map(|(name, features)| (name.clone(), table.collection(features)))
                .collect(),
            arcs: self.arcs.clone(),
            bbox: self.bbox,
            transform: self.transform,
            options: if include_options { Some(self.options.clone()) } else { None },
        }
    }

    pub fn to_json(&self, json_options: &JsonOptions) -> Result<String> {
        if !json_options.options && !json_options.pretty {
            let json = self.cached_json.get_or_try_init(|| serde_json::to_string(&self.to_document(false)))?;
            return Ok(json.clone());
        }

        export::to_string(&self.to_document(json_options.options), json_options)
    }

    pub fn write_json<W: io::Write>(&self, mut writer: W, json_options: &JsonOptions) -> Result<()> {
        let json = self.to_json(json_options)?;
        writer.write_all(json.as_bytes())?;
        Ok(())
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Topology: {} objects, {} arcs ({} points)", self.objects.len(), self.arcs.len(), self.arcs.n_points())?;
        match self.transform {
            Some(ref transform) => write!(f, ", scale {:?} translate {:?}", transform.scale, transform.translate),
            None => write!(f, ", planar"),
        }
    }
}
