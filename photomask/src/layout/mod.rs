//! Layout data model and generation.

use std::path::Path;

use arcstr::ArcStr;
use phogeom::bbox::{Bbox, BoundBox};
use phogeom::Point;

use self::element::{Element, TextElement};
use self::error::LayoutError;
use self::group::DeviceGroup;
use self::layers::LayerMap;
use crate::error::{with_err_context, ErrorContext, ErrorSource, Result};

pub mod convert;
pub mod element;
pub mod elements;
pub mod error;
pub mod group;
pub mod layers;
pub mod placement;
pub mod routing;
pub mod validation;

/// A device group placed at an offset on the mask.
#[derive(Debug, Clone)]
pub struct PlacedDevice {
    pub group: DeviceGroup,
    pub offset: Point,
}

impl BoundBox for PlacedDevice {
    fn bbox(&self) -> Bbox {
        self.group.bbox().translated(self.offset)
    }
}

/// A complete mask: placed devices plus top-level shapes and text.
#[derive(Debug, Clone, Default)]
pub struct MaskLayout {
    name: ArcStr,
    devices: Vec<PlacedDevice>,
    elems: Vec<Element>,
    annotations: Vec<TextElement>,
}

impl MaskLayout {
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    #[inline]
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    /// Places `group` with its local origin at `offset`.
    pub fn add_device(&mut self, group: DeviceGroup, offset: Point) {
        self.devices.push(PlacedDevice { group, offset });
    }

    pub fn add_element(&mut self, elem: Element) {
        self.elems.push(elem);
    }

    pub fn add_annotation(&mut self, text: TextElement) {
        self.annotations.push(text);
    }

    #[inline]
    pub fn devices(&self) -> &[PlacedDevice] {
        &self.devices
    }

    #[inline]
    pub fn elems(&self) -> &[Element] {
        &self.elems
    }

    #[inline]
    pub fn annotations(&self) -> &[TextElement] {
        &self.annotations
    }

    /// Converts the mask to a GDSII library.
    pub fn to_gds_lib(&self, layers: &LayerMap) -> Result<gds21::GdsLibrary> {
        let inner = || -> Result<gds21::GdsLibrary> {
            Ok(convert::gds::GdsExporter::new(self, layers)
                .export_lib()
                .map_err(ErrorSource::Layout)?)
        };
        with_err_context(inner(), || {
            ErrorContext::Task(arcstr::format!("converting mask {} to GDS library", self.name))
        })
    }

    /// Writes the mask to a GDSII file, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>, layers: &LayerMap) -> Result<()> {
        let path = path.as_ref();
        crate::io::create_parent_dir(path)?;
        let inner = || -> Result<()> {
            self.to_gds_lib(layers)?
                .save(path)
                .map_err(LayoutError::from)
                .map_err(ErrorSource::Layout)?;
            Ok(())
        };
        with_err_context(inner(), || ErrorContext::CreateFile(path.to_path_buf()))
    }
}

impl BoundBox for MaskLayout {
    fn bbox(&self) -> Bbox {
        let bbox = self
            .devices
            .iter()
            .fold(Bbox::empty(), |bbox, dev| bbox.union(dev.bbox()));
        self.elems
            .iter()
            .fold(bbox, |bbox, elem| bbox.union(elem.bbox()))
    }
}
