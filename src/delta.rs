//! Delta encoding of quantized arcs.
//!
//! The first point of an arc stays absolute; each later point becomes its
//! offset from the point before it. Lossless.

use crate::geo::GridPoint;

pub fn encode(arc: &[GridPoint]) -> Vec<GridPoint> {
    let mut previous = GridPoint(0, 0);

    arc.iter()
        .map(|&p| {
            let delta = GridPoint(p.0 - previous.0, p.1 - previous.1);
            previous = p;
            delta
        })
        .collect()
}

pub fn decode(arc: &[GridPoint]) -> Vec<GridPoint> {
    let mut position = GridPoint(0, 0);

    arc.iter()
        .map(|&d| {
            position = GridPoint(position.0 + d.0, position.1 + d.1);
            position
        })
        .collect()
}

pub fn encode_arcs(arcs: &[Vec<GridPoint>]) -> Vec<Vec<GridPoint>> {
    arcs.iter().map(|arc| encode(arc)).collect()
}

pub fn decode_arcs(arcs: &[Vec<GridPoint>]) -> Vec<Vec<GridPoint>> {
    arcs.iter().map(|arc| decode(arc)).collect()
}
