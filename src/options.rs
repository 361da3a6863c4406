//! Construction-time configuration.
//!
//! `TopoOptions` is plain data with sensible defaults. It can be loaded from
//! JSON, where the factor and tolerance options also accept `true` (use the
//! default value) and `false` (turn the step off):
//!
//! ```
//! use topoarc::options::{SimplifyAlgorithm, TopoOptions};
//!
//! let options = TopoOptions::from_json(r#"{
//!     "prequantize": 1e4,
//!     "toposimplify": true,
//!     "simplify_algorithm": "vw"
//! }"#).unwrap();
//!
//! assert_eq!(Some(1e4), options.prequantize);
//! assert_eq!(Some(0.0001), options.toposimplify);
//! assert_eq!(SimplifyAlgorithm::VisvalingamWhyatt, options.simplify_algorithm);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};
use crate::geo::WindingOrder;
use crate::quantize::check_factor;

pub const DEFAULT_QUANTIZE_FACTOR: f64 = 1e6;
pub const DEFAULT_SIMPLIFY_EPSILON: f64 = 0.0001;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimplifyAlgorithm {
    #[serde(rename = "dp")]
    DouglasPeucker,
    #[serde(rename = "vw")]
    VisvalingamWhyatt,
}

impl FromStr for SimplifyAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<SimplifyAlgorithm> {
        if s.eq_ignore_ascii_case("dp") {
            Ok(SimplifyAlgorithm::DouglasPeucker)
        } else if s.eq_ignore_ascii_case("vw") {
            Ok(SimplifyAlgorithm::VisvalingamWhyatt)
        } else {
            Err(Error::UnsupportedOption(format!("simplify_algorithm must be \"dp\" or \"vw\"; got {:?}", s)))
        }
    }
}

impl fmt::Display for SimplifyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SimplifyAlgorithm::DouglasPeucker => write!(f, "dp"),
            SimplifyAlgorithm::VisvalingamWhyatt => write!(f, "vw"),
        }
    }
}

/// Orientation of polygon rings in the output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindingConvention {
    /// Clockwise exterior rings, counter-clockwise holes.
    #[serde(rename = "CW_CCW")]
    CwCcw,
    /// Counter-clockwise exterior rings, clockwise holes.
    #[serde(rename = "CCW_CW")]
    CcwCw,
}

impl WindingConvention {
    pub fn exterior(&self) -> WindingOrder {
        match self {
            WindingConvention::CwCcw => WindingOrder::Clockwise,
            WindingConvention::CcwCw => WindingOrder::CounterClockwise,
        }
    }

    pub fn interior(&self) -> WindingOrder {
        match self {
            WindingConvention::CwCcw => WindingOrder::CounterClockwise,
            WindingConvention::CcwCw => WindingOrder::Clockwise,
        }
    }
}

impl FromStr for WindingConvention {
    type Err = Error;

    fn from_str(s: &str) -> Result<WindingConvention> {
        if s.eq_ignore_ascii_case("CW_CCW") {
            Ok(WindingConvention::CwCcw)
        } else if s.eq_ignore_ascii_case("CCW_CW") {
            Ok(WindingConvention::CcwCw)
        } else {
            Err(Error::UnsupportedOption(format!("winding_order must be \"CW_CCW\" or \"CCW_CW\"; got {:?}", s)))
        }
    }
}

/// How to find the points where rings and lines get cut into arcs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JunctionStrategy {
    /// Cut where paths start or stop sharing segments.
    PathConnected,
    /// Cut wherever a coordinate appears in two or more paths.
    CoordsConnected,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagOrValue {
    Flag(bool),
    Value(f64),
}

fn flag_or_value<'de, D: Deserializer<'de>>(deserializer: D, default: f64) -> std::result::Result<Option<f64>, D::Error> {
    Ok(match Option::<FlagOrValue>::deserialize(deserializer)? {
        None | Some(FlagOrValue::Flag(false)) => None,
        Some(FlagOrValue::Flag(true)) => Some(default),
        Some(FlagOrValue::Value(v)) => Some(v),
    })
}

fn quantize_flag<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<f64>, D::Error> {
    flag_or_value(deserializer, DEFAULT_QUANTIZE_FACTOR)
}

fn simplify_flag<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<f64>, D::Error> {
    flag_or_value(deserializer, DEFAULT_SIMPLIFY_EPSILON)
}

/// Everything that steers `Topology::new()`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TopoOptions {
    /// Find shared boundaries. When `false`, every ring and line gets its own
    /// arc(s).
    pub topology: bool,

    /// Quantize input coordinates to this many grid lines per axis before
    /// finding the topology. Snapping helps messy input, where adjacent
    /// boundaries differ by floating-point noise.
    #[serde(deserialize_with = "quantize_flag")]
    pub prequantize: Option<f64>,

    /// Quantize arcs after finding the topology.
    #[serde(deserialize_with = "quantize_flag")]
    pub topoquantize: Option<f64>,

    /// Simplify input rings and lines (independently) before finding the
    /// topology.
    #[serde(deserialize_with = "simplify_flag")]
    pub presimplify: Option<f64>,

    /// Simplify arcs after finding the topology. Shared boundaries stay
    /// shared.
    #[serde(deserialize_with = "simplify_flag")]
    pub toposimplify: Option<f64>,

    /// `true` selects `JunctionStrategy::CoordsConnected`.
    pub shared_coords: bool,

    /// Keep an arc's original points when simplifying would collapse it or
    /// make it cross itself.
    pub prevent_oversimplify: bool,

    pub simplify_algorithm: SimplifyAlgorithm,

    pub winding_order: WindingConvention,
}

impl Default for TopoOptions {
    fn default() -> TopoOptions {
        TopoOptions {
            topology: true,
            prequantize: Some(DEFAULT_QUANTIZE_FACTOR),
            topoquantize: None,
            presimplify: None,
            toposimplify: None,
            shared_coords: false,
            prevent_oversimplify: true,
            simplify_algorithm: SimplifyAlgorithm::DouglasPeucker,
            winding_order: WindingConvention::CwCcw,
        }
    }
}

/// Returns an error unless `epsilon` is a usable simplification tolerance.
pub fn check_epsilon(epsilon: f64) -> Result<()> {
    if epsilon.is_finite() && epsilon >= 0.0 {
        Ok(())
    } else {
        Err(Error::UnsupportedOption(format!("simplification tolerance must be a finite number >= 0; got {}", epsilon)))
    }
}

impl TopoOptions {
    /// Parses and validates options from JSON. Missing keys take defaults.
    pub fn from_json(json: &str) -> Result<TopoOptions> {
        let options: TopoOptions = serde_json::from_str(json)
            .map_err(|err| Error::UnsupportedOption(err.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        for factor in self.prequantize.iter().chain(self.topoquantize.iter()) {
            check_factor(*factor)?;
        }
        for epsilon in self.presimplify.iter().chain(self.toposimplify.iter()) {
            check_epsilon(*epsilon)?;
        }
        Ok(())
    }

    pub fn junction_strategy(&self) -> JunctionStrategy {
        if self.shared_coords {
            JunctionStrategy::CoordsConnected
        } else {
            JunctionStrategy::PathConnected
        }
    }

    /// The grid size arcs are re-quantized to after simplification, if any.
    pub fn quantize_factor(&self) -> Option<f64> {
        self.topoquantize.or(self.prequantize)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults() {
        let options = TopoOptions::default();
        assert!(options.topology);
        assert_eq!(Some(1e6), options.prequantize);
        assert_eq!(None, options.topoquantize);
        assert_eq!(JunctionStrategy::PathConnected, options.junction_strategy());
        assert_eq!(WindingOrder::Clockwise, options.winding_order.exterior());
        assert_eq!(Some(1e6), options.quantize_factor());
    }

    #[test]
    fn empty_json_is_default() {
        assert_eq!(TopoOptions::default(), TopoOptions::from_json("{}").unwrap());
    }

    #[test]
    fn flags() {
        let options = TopoOptions::from_json(r#"{"prequantize": false, "topoquantize": true, "presimplify": 2.5}"#).unwrap();
        assert_eq!(None, options.prequantize);
        assert_eq!(Some(1e6), options.topoquantize);
        assert_eq!(Some(2.5), options.presimplify);
        assert_eq!(Some(1e6), options.quantize_factor());
    }

    #[test]
    fn reject_unknown_algorithm() {
        match TopoOptions::from_json(r#"{"simplify_algorithm": "chaikin"}"#) {
            Err(Error::UnsupportedOption(_)) => {}
            other => panic!("expected UnsupportedOption, got {:?}", other),
        }
    }

    #[test]
    fn reject_unknown_key() {
        assert!(TopoOptions::from_json(r#"{"simplify_with": "shapely"}"#).is_err());
    }

    #[test]
    fn reject_bad_factor() {
        assert!(TopoOptions::from_json(r#"{"prequantize": 1}"#).is_err());
        assert!(TopoOptions::from_json(r#"{"topoquantize": 2.7}"#).is_err());
        assert!(TopoOptions::from_json(r#"{"toposimplify": -3}"#).is_err());
    }

    #[test]
    fn parse_strings() {
        assert_eq!(SimplifyAlgorithm::VisvalingamWhyatt, "VW".parse().unwrap());
        assert_eq!(WindingConvention::CcwCw, "ccw_cw".parse().unwrap());
        assert!("CW".parse::<WindingConvention>().is_err());
    }

    #[test]
    fn serialize_round_trip() {
        let options = TopoOptions { shared_coords: true, toposimplify: Some(0.5), ..TopoOptions::default() };
        let json = serde_json::to_string(&options).unwrap();
        assert_eq!(options, TopoOptions::from_json(&json).unwrap());
    }
}
