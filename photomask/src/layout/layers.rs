//! Mask layers and their GDS layer/datatype numbers.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A GDS layer number and datatype pair.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct GdsLayerSpec(pub i16, pub i16);

impl From<GdsLayerSpec> for gds21::GdsLayerSpec {
    fn from(GdsLayerSpec(layer, xtype): GdsLayerSpec) -> Self {
        Self { layer, xtype }
    }
}

/// The purposes a shape on the mask can serve.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Layer {
    /// Waveguide cores and component bodies.
    Waveguide,
    /// Shallow-etched grating teeth.
    Grating,
    /// Device and chip outlines.
    Outline,
    /// Text labels.
    Label,
}

impl Layer {
    pub fn all() -> [Layer; 4] {
        [Layer::Waveguide, Layer::Grating, Layer::Outline, Layer::Label]
    }
}

impl Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Layer::Waveguide => "waveguide",
            Layer::Grating => "grating",
            Layer::Outline => "outline",
            Layer::Label => "label",
        };
        write!(f, "{name}")
    }
}

/// Assignment of GDS numbers to each [`Layer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerMap {
    pub waveguide: GdsLayerSpec,
    pub grating: GdsLayerSpec,
    pub outline: GdsLayerSpec,
    pub label: GdsLayerSpec,
}

impl Default for LayerMap {
    fn default() -> Self {
        Self {
            waveguide: GdsLayerSpec(3, 0),
            grating: GdsLayerSpec(4, 0),
            outline: GdsLayerSpec(99, 0),
            label: GdsLayerSpec(100, 0),
        }
    }
}

impl LayerMap {
    /// Returns the GDS numbers for `layer`.
    pub fn to_gds_spec(&self, layer: Layer) -> GdsLayerSpec {
        match layer {
            Layer::Waveguide => self.waveguide,
            Layer::Grating => self.grating,
            Layer::Outline => self.outline,
            Layer::Label => self.label,
        }
    }

    /// Returns the [`Layer`] drawn on GDS numbers `spec`, if any.
    pub fn from_gds_spec(&self, spec: GdsLayerSpec) -> Option<Layer> {
        Layer::all()
            .into_iter()
            .find(|layer| self.to_gds_spec(*layer) == spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layer_numbers() {
        let layers = LayerMap::default();
        assert_eq!(layers.to_gds_spec(Layer::Waveguide), GdsLayerSpec(3, 0));
        assert_eq!(layers.from_gds_spec(GdsLayerSpec(99, 0)), Some(Layer::Outline));
        assert_eq!(layers.from_gds_spec(GdsLayerSpec(1, 0)), None);
    }
}
