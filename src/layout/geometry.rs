//! Connector path primitives

use std::fmt::Write;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One drawing command of a connector path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Segment {
    MoveTo { to: Point },
    LineTo { to: Point },
    CubicTo { c1: Point, c2: Point, to: Point },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ConnectorKind {
    /// Horizontal link between two nodes on the same row
    Straight,
    /// Curve fanning out to or in from another row
    Branch,
    /// Faint line drawn through a skipped node
    Ghost,
    /// Detour that dips below skipped nodes
    Skip,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectorPath {
    pub key: String,
    pub kind: ConnectorKind,
    pub segments: Vec<Segment>,
}

impl ConnectorPath {
    pub fn new(key: String, kind: ConnectorKind, start: Point) -> Self {
        Self {
            key,
            kind,
            segments: vec![Segment::MoveTo { to: start }],
        }
    }

    pub fn line_to(mut self, to: Point) -> Self {
        self.segments.push(Segment::LineTo { to });
        self
    }

    pub fn cubic_to(mut self, c1: Point, c2: Point, to: Point) -> Self {
        self.segments.push(Segment::CubicTo { c1, c2, to });
        self
    }

    pub fn end_point(&self) -> Point {
        match self.segments.last() {
            Some(Segment::MoveTo { to } | Segment::LineTo { to } | Segment::CubicTo { to, .. }) => {
                *to
            }
            None => Point::new(0.0, 0.0),
        }
    }

    /// SVG `d` attribute for this path.
    pub fn svg_data(&self) -> String {
        let mut data = String::new();
        for segment in &self.segments {
            if !data.is_empty() {
                data.push(' ');
            }
            // Writing to a String cannot fail
            let _ = match segment {
                Segment::MoveTo { to } => write!(data, "M {} {}", to.x, to.y),
                Segment::LineTo { to } => write!(data, "L {} {}", to.x, to.y),
                Segment::CubicTo { c1, c2, to } => write!(
                    data,
                    "C {} {} {} {} {} {}",
                    c1.x, c1.y, c2.x, c2.y, to.x, to.y
                ),
            };
        }
        data
    }
}
