//! Converts points, lines and polygons into a topology: every boundary that
//! two or more geometries share is stored once, as an arc, and geometries
//! refer to arcs by signed index.
//!
//! ```
//! use topoarc::{Feature, Geometry, JsonOptions, Point, TopoOptions, Topology};
//!
//! let square = |x: f64| -> Feature {
//!     Geometry::Polygon(vec![ vec![
//!         Point(x, 0.0), Point(x + 1.0, 0.0), Point(x + 1.0, 1.0), Point(x, 1.0), Point(x, 0.0),
//!     ] ]).into()
//! };
//!
//! let topology = Topology::from_features(vec![ square(0.0), square(1.0) ], TopoOptions::default()).unwrap();
//! assert_eq!(3, topology.arcs().len());
//!
//! let json = topology.to_json(&JsonOptions::default()).unwrap();
//! assert!(json.starts_with(r#"{"type":"Topology""#));
//! ```

#[macro_use] extern crate log;

pub mod error;
pub mod geo;
pub mod options;
pub mod quantize;
pub mod delta;
pub mod simplify;
pub mod topology;
pub mod document;
mod extract;
mod export;

pub use error::{Error, Result};
pub use export::JsonOptions;
pub use geo::{Feature, Geometry, Point};
pub use options::TopoOptions;
pub use topology::Topology;
