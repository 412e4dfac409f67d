use arcstr::ArcStr;
use derive_builder::Builder;
use phogeom::bbox::{Bbox, BoundBox};
use phogeom::{snap_up, Point, Rect};
use serde::{Deserialize, Serialize};

use crate::config::ChipConfig;
use crate::layout::element::{Element, TextElement};
use crate::layout::group::DeviceGroup;
use crate::layout::layers::Layer;
use crate::layout::MaskLayout;
use crate::log::debug;

/// Spacing rules for a [`GridLayout`].
#[derive(Builder, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridLayoutParams {
    /// Space between adjacent devices in a row.
    #[builder(default = "10.")]
    pub horizontal_spacing: f64,
    /// Grid that the left edge of every device snaps up to.
    #[builder(default = "10.")]
    pub horizontal_alignment: f64,
    /// Space between adjacent rows.
    #[builder(default = "20.")]
    pub vertical_spacing: f64,
    /// Character height of the layout title.
    #[builder(default = "120.")]
    pub title_height: f64,
    /// Whether to draw an outline around the packed devices.
    #[builder(default = "false")]
    pub frame: bool,
}

impl Default for GridLayoutParams {
    fn default() -> Self {
        Self {
            horizontal_spacing: 10.,
            horizontal_alignment: 10.,
            vertical_spacing: 20.,
            title_height: 120.,
            frame: false,
        }
    }
}

impl From<&ChipConfig> for GridLayoutParams {
    fn from(chip: &ChipConfig) -> Self {
        Self {
            horizontal_spacing: chip.horizontal_spacing,
            horizontal_alignment: chip.horizontal_alignment,
            vertical_spacing: chip.vertical_spacing,
            title_height: chip.title_height,
            frame: false,
        }
    }
}

impl GridLayoutParams {
    #[inline]
    pub fn builder() -> GridLayoutParamsBuilder {
        GridLayoutParamsBuilder::default()
    }
}

/// Where a device ended up on the mask.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub device: ArcStr,
    pub row: usize,
    pub col: usize,
    /// Translation applied to the device's own coordinates.
    pub offset: Point,
    /// Bounding box of the device in mask coordinates.
    pub bbox: Bbox,
}

/// Packs device groups into rows.
///
/// Rows stack downward from the origin. Devices within a row are bottom aligned
/// and laid out left to right, each left edge snapped up to the alignment grid.
#[derive(Debug, Clone)]
pub struct GridLayout {
    title: ArcStr,
    rows: Vec<Vec<DeviceGroup>>,
    params: GridLayoutParams,
}

impl GridLayout {
    pub fn new(title: impl Into<ArcStr>, params: GridLayoutParams) -> Self {
        Self {
            title: title.into(),
            rows: vec![Vec::new()],
            params,
        }
    }

    #[inline]
    pub fn params(&self) -> &GridLayoutParams {
        &self.params
    }

    /// Starts a new row. Does nothing if the current row is empty.
    pub fn begin_new_row(&mut self) {
        if self.rows.last().map_or(false, |row| !row.is_empty()) {
            self.rows.push(Vec::new());
        }
    }

    /// Appends `group` to the current row.
    pub fn add_to_row(&mut self, group: DeviceGroup) {
        if let Some(row) = self.rows.last_mut() {
            row.push(group);
        } else {
            self.rows.push(vec![group]);
        }
    }

    /// Number of devices added so far.
    pub fn len(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Places every device and returns the mask named `name` with the resulting placements.
    pub fn generate_layout(self, name: impl Into<ArcStr>) -> (MaskLayout, Vec<Placement>) {
        let GridLayout {
            title,
            rows,
            params,
        } = self;
        let mut layout = MaskLayout::new(name);
        let mut placements = Vec::new();

        layout.add_annotation(TextElement {
            string: title,
            loc: Point::new(0., params.vertical_spacing),
            layer: Layer::Label,
            height: params.title_height,
            angle: 0.,
        });

        let mut row_top = 0.;
        for (i, row) in rows.into_iter().filter(|r| !r.is_empty()).enumerate() {
            let bboxes: Vec<Bbox> = row.iter().map(|g| g.bbox()).collect();
            let height = bboxes
                .iter()
                .filter(|b| !b.is_empty())
                .map(Bbox::height)
                .fold(0., f64::max);
            let row_bottom = row_top - height;

            let mut x = 0.;
            for (j, (group, bbox)) in row.into_iter().zip(bboxes).enumerate() {
                let (offset, placed) = if bbox.is_empty() {
                    (Point::new(x, row_bottom), bbox)
                } else {
                    let pos = Point::new(snap_up(x, params.horizontal_alignment), row_bottom);
                    let offset = pos - bbox.p0;
                    x = pos.x + bbox.width() + params.horizontal_spacing;
                    (offset, bbox.translated(offset))
                };
                debug!(
                    "placing {:?} at row {i}, column {j}, offset ({}, {})",
                    group.name(),
                    offset.x,
                    offset.y
                );
                placements.push(Placement {
                    device: group.name().clone(),
                    row: i,
                    col: j,
                    offset,
                    bbox: placed,
                });
                layout.add_device(group, offset);
            }
            row_top = row_bottom - params.vertical_spacing;
        }

        if params.frame {
            let mut bbox = layout.bbox();
            if !bbox.is_empty() {
                bbox.expand(params.horizontal_spacing);
                layout.add_element(Element::new(
                    Layer::Outline,
                    Rect::new(bbox.p0, bbox.p1),
                ));
            }
        }

        (layout, placements)
    }
}

#[cfg(test)]
mod tests {
    use float_eq::assert_float_eq;
    use phogeom::Pose;

    use super::*;
    use crate::layout::routing::Router;

    fn block(name: &str, width: f64, height: f64) -> DeviceGroup {
        let mut group = DeviceGroup::new(name);
        let mut router = Router::new(Pose::new(-5., height / 2., 0.), height);
        router.straight(width);
        group.add_route(router);
        group
    }

    #[test]
    fn rows_stack_downward() {
        let mut grid = GridLayout::new("title", GridLayoutParams::default());
        grid.add_to_row(block("a", 33., 40.));
        grid.add_to_row(block("b", 20., 10.));
        grid.begin_new_row();
        grid.add_to_row(block("c", 5., 5.));

        let (layout, placements) = grid.generate_layout("top");
        assert_eq!(layout.devices().len(), 3);
        assert_eq!(placements.len(), 3);

        let (a, b, c) = (&placements[0], &placements[1], &placements[2]);
        assert_float_eq!(a.bbox.p0.x, 0., abs <= 1e-9);
        assert_float_eq!(a.bbox.p0.y, -40., abs <= 1e-9);
        // 33 + 10 snaps up to 50.
        assert_float_eq!(b.bbox.p0.x, 50., abs <= 1e-9);
        assert_float_eq!(b.bbox.p0.y, -40., abs <= 1e-9);
        assert_eq!((c.row, c.col), (1, 0));
        assert_float_eq!(c.bbox.p1.y, -60., abs <= 1e-9);
        assert_eq!(layout.annotations()[0].string, "title");
    }

    #[test]
    fn empty_rows_are_skipped() {
        let mut grid = GridLayout::new("t", GridLayoutParams::default());
        grid.begin_new_row();
        grid.begin_new_row();
        grid.add_to_row(block("a", 10., 10.));
        assert_eq!(grid.len(), 1);
        let (_, placements) = grid.generate_layout("top");
        assert_eq!(placements[0].row, 0);
    }

    #[test]
    fn frame_surrounds_devices() {
        let params = GridLayoutParams::builder().frame(true).build().unwrap();
        let mut grid = GridLayout::new("t", params);
        grid.add_to_row(block("a", 10., 10.));
        let (layout, _) = grid.generate_layout("top");
        assert_eq!(layout.elems().len(), 1);
        assert_eq!(layout.elems()[0].layer, Layer::Outline);
    }
}
