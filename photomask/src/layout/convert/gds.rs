//! Utilities for GDS conversion.
//!
//! Converts masks to [`gds21`] structures. Every device becomes its own struct,
//! every grating coupler a struct referenced from its device, and a top struct
//! references the devices at their placement offsets.

use std::collections::HashSet;
use std::convert::TryFrom;

use arcstr::ArcStr;
use phogeom::{Point, Shape, ShapeTrait};

use super::error::{ErrorContext, ErrorHelper};
use crate::layout::element::{Element, TextElement};
use crate::layout::elements::PlacedComponent;
use crate::layout::error::{LayoutError, LayoutResult};
use crate::layout::group::DeviceGroup;
use crate::layout::layers::{Layer, LayerMap};
use crate::layout::MaskLayout;

/// Database units per micrometre.
const DB_PER_UM: f64 = 1000.;

/// Walks a [`MaskLayout`] and builds the equivalent [`gds21::GdsLibrary`].
///
/// Struct names are made unique across the whole library.
#[derive(Debug)]
pub struct GdsExporter<'a> {
    layout: &'a MaskLayout,
    layers: &'a LayerMap,
    backtrace: Vec<ErrorContext>,
    names_used: HashSet<ArcStr>,
}

impl<'a> GdsExporter<'a> {
    pub fn new(layout: &'a MaskLayout, layers: &'a LayerMap) -> Self {
        Self {
            layout,
            layers,
            backtrace: Vec::new(),
            names_used: HashSet::new(),
        }
    }

    /// Builds the library, with the top struct listed last.
    pub fn export_lib(&mut self) -> LayoutResult<gds21::GdsLibrary> {
        self.backtrace.push(ErrorContext::Library);
        let top_name = sanitize_name(self.layout.name());
        self.names_used.insert(top_name.clone());

        let mut gdslib = gds21::GdsLibrary::new(top_name.as_str());
        // User units are 1um; the database grid is 1nm.
        gdslib.units = gds21::GdsUnits::new(1e-3, 1e-9);

        let mut top = gds21::GdsStruct::new(top_name.as_str());
        for device in self.layout.devices() {
            let (name, structs) = self.export_device(&device.group)?;
            gdslib.structs.extend(structs);
            top.elems.push(
                gds21::GdsStructRef {
                    name: name.as_str().into(),
                    xy: self.export_point(&device.offset)?,
                    ..Default::default()
                }
                .into(),
            );
        }

        self.backtrace.push(ErrorContext::Geometry);
        for elem in self.layout.elems() {
            top.elems.extend(self.export_element(elem)?);
        }
        self.backtrace.pop();

        self.backtrace.push(ErrorContext::Annotations);
        for annotation in self.layout.annotations() {
            top.elems.push(self.export_annotation(annotation)?);
        }
        self.backtrace.pop();

        gdslib.structs.push(top);
        self.backtrace.pop();
        Ok(gdslib)
    }

    /// Converts a [`DeviceGroup`] to its own struct plus one struct per grating coupler.
    ///
    /// Returns the name given to the device struct, followed by all new structs.
    fn export_device(
        &mut self,
        group: &DeviceGroup,
    ) -> LayoutResult<(ArcStr, Vec<gds21::GdsStruct>)> {
        self.backtrace.push(ErrorContext::Device(group.name().clone()));
        let mut structs = Vec::with_capacity(group.gratings().len() + 1);
        let mut elems = Vec::new();

        for gc in group.gratings() {
            let strukt = self.export_component(gc)?;
            elems.push(
                gds21::GdsStructRef {
                    name: strukt.name.clone(),
                    xy: gds21::GdsPoint::new(0, 0),
                    ..Default::default()
                }
                .into(),
            );
            structs.push(strukt);
        }

        self.backtrace.push(ErrorContext::Geometry);
        for elem in group.elements() {
            elems.extend(self.export_element(&elem)?);
        }
        self.backtrace.pop();

        if let Some(label) = group.label() {
            self.backtrace.push(ErrorContext::Annotations);
            elems.push(self.export_annotation(label)?);
            self.backtrace.pop();
        }

        let name = self.get_cell_name(group.name());
        let mut strukt = gds21::GdsStruct::new(name.as_str());
        strukt.elems = elems;
        structs.push(strukt);

        self.backtrace.pop();
        Ok((name, structs))
    }

    /// Converts a [`PlacedComponent`] to a [`gds21::GdsStruct`] in device coordinates.
    fn export_component(&mut self, component: &PlacedComponent) -> LayoutResult<gds21::GdsStruct> {
        self.backtrace
            .push(ErrorContext::Component(component.name().clone()));
        let mut elems = Vec::new();
        for elem in component.elements() {
            elems.extend(self.export_element(elem)?);
        }
        let name = self.get_cell_name(component.name());
        let mut strukt = gds21::GdsStruct::new(name.as_str());
        strukt.elems = elems;
        self.backtrace.pop();
        Ok(strukt)
    }

    /// The GDS layer and datatype numbers of `layer`.
    pub fn export_layerspec(&self, layer: Layer) -> gds21::GdsLayerSpec {
        self.layers.to_gds_spec(layer).into()
    }

    /// Converts an [`Element`] into zero or more [`gds21::GdsElement`]s.
    pub fn export_element(&mut self, elem: &Element) -> LayoutResult<Vec<gds21::GdsElement>> {
        let layerspec = self.export_layerspec(elem.layer);
        Ok(self.export_shape(&elem.inner, &layerspec)?.into_iter().collect())
    }

    /// Converts a [`Shape`] to a [`gds21::GdsElement`].
    ///
    /// GDS boundaries include an explicit repetition of their origin for closure,
    /// so an N-sided polygon is described by a (N+1)-point vector.
    /// Shapes with fewer than three vertices are dropped.
    pub fn export_shape(
        &mut self,
        shape: &Shape,
        layerspec: &gds21::GdsLayerSpec,
    ) -> LayoutResult<Option<gds21::GdsElement>> {
        let poly = shape.to_poly();
        if poly.points.len() < 3 {
            return Ok(None);
        }
        let mut xy = poly
            .points
            .iter()
            .map(|p| self.export_point(p))
            .collect::<LayoutResult<Vec<_>>>()?;
        xy.push(xy[0].clone());
        Ok(Some(
            gds21::GdsBoundary {
                layer: layerspec.layer,
                datatype: layerspec.xtype,
                xy,
                ..Default::default()
            }
            .into(),
        ))
    }

    /// Converts a [`TextElement`] to a [`gds21::GdsElement`].
    pub fn export_annotation(
        &mut self,
        text_elem: &TextElement,
    ) -> LayoutResult<gds21::GdsElement> {
        let layerspec = self.export_layerspec(text_elem.layer);
        Ok(gds21::GdsTextElem {
            string: text_elem.string.as_str().into(),
            layer: layerspec.layer,
            texttype: layerspec.xtype,
            xy: self.export_point(&text_elem.loc)?,
            strans: Some(gds21::GdsStrans {
                angle: Some(text_elem.angle.to_degrees()),
                mag: Some(text_elem.height),
                ..Default::default()
            }),
            ..Default::default()
        }
        .into())
    }

    /// Converts a [`Point`] in micrometres to a GDS21 [`gds21::GdsPoint`] on the 1nm grid.
    pub fn export_point(&mut self, pt: &Point) -> LayoutResult<gds21::GdsPoint> {
        let x = self.to_db(pt.x)?;
        let y = self.to_db(pt.y)?;
        Ok(gds21::GdsPoint::new(x, y))
    }

    fn to_db(&self, val: f64) -> LayoutResult<i32> {
        let scaled = (val * DB_PER_UM).round();
        self.ensure(scaled.is_finite(), || format!("coordinate {val} is not finite"))?;
        Ok(i32::try_from(scaled as i64)?)
    }

    /// Claims a struct name for `name`, appending `_1`, `_2`, ... until it is unused.
    fn get_cell_name(&mut self, name: &str) -> ArcStr {
        let base = sanitize_name(name);
        let name = (0..)
            .map(|i| match i {
                0 => base.clone(),
                i => arcstr::format!("{base}_{i}"),
            })
            .find(|candidate| !self.names_used.contains(candidate))
            .unwrap_or_else(|| base.clone());
        self.names_used.insert(name.clone());
        name
    }
}

impl ErrorHelper for GdsExporter<'_> {
    type Error = LayoutError;
    fn err(&self, msg: impl Into<String>) -> Self::Error {
        LayoutError::Export {
            message: msg.into(),
            stack: self.backtrace.clone(),
        }
    }
}

/// Replaces characters that are not valid in GDS struct names with underscores.
///
/// Runs of whitespace collapse into a single underscore.
pub fn sanitize_name(name: &str) -> ArcStr {
    let mut out = String::with_capacity(name.len());
    let mut last_blank = false;
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '_' | '?' | '$' | '.' | '-') {
            out.push(c);
            last_blank = false;
        } else if !last_blank {
            out.push('_');
            last_blank = true;
        }
    }
    if out.is_empty() {
        out.push_str("UNNAMED");
    }
    ArcStr::from(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize() {
        assert_eq!(
            sanitize_name("Ring_Resonator_ZL\nRadius_70um\nGap_0.25um"),
            "Ring_Resonator_ZL_Radius_70um_Gap_0.25um"
        );
        assert_eq!(
            sanitize_name("Directional Coupler  90 : 10"),
            "Directional_Coupler_90_10"
        );
        assert_eq!(sanitize_name("  "), "UNNAMED");
    }

    #[test]
    fn duplicate_names_get_suffixes() {
        let layout = MaskLayout::new("top");
        let layers = LayerMap::default();
        let mut exporter = GdsExporter::new(&layout, &layers);
        exporter.names_used.insert(ArcStr::from("top"));
        assert_eq!(exporter.get_cell_name("dev"), "dev");
        assert_eq!(exporter.get_cell_name("dev"), "dev_1");
        assert_eq!(exporter.get_cell_name("top"), "top_1");
    }

    #[test]
    fn points_snap_to_nm() {
        let layout = MaskLayout::new("top");
        let layers = LayerMap::default();
        let mut exporter = GdsExporter::new(&layout, &layers);
        let pt = exporter.export_point(&Point::new(1.2346, -0.0004)).unwrap();
        assert_eq!(pt, gds21::GdsPoint::new(1235, 0));
        assert!(exporter.export_point(&Point::new(3e6, 0.)).is_err());
    }
}
