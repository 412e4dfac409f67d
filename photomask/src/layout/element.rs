//! Shapes bound to a mask layer, and text annotations.

use arcstr::ArcStr;
use phogeom::bbox::{Bbox, BoundBox};
use phogeom::transform::{Transform, Transformation};
use phogeom::{Point, Shape};
use serde::{Deserialize, Serialize};

use super::layers::Layer;

/// A shape drawn on one mask layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Element {
    pub layer: Layer,
    pub inner: Shape,
}

impl Element {
    pub fn new(layer: Layer, shape: impl Into<Shape>) -> Self {
        Self {
            layer,
            inner: shape.into(),
        }
    }
}

impl BoundBox for Element {
    fn bbox(&self) -> Bbox {
        self.inner.bbox()
    }
}

impl Transform for Element {
    fn transform(&self, trans: Transformation) -> Self {
        Self::new(self.layer, self.inner.transform(trans))
    }
}

/// A text string placed on the mask, usually on [`Layer::Label`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextElement {
    pub string: ArcStr,
    /// Anchor of the first character.
    pub loc: Point,
    pub layer: Layer,
    /// Character height in micrometres.
    pub height: f64,
    /// Counter-clockwise rotation in radians.
    pub angle: f64,
}
