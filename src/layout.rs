//! Fitting paths into page cells.
//!
//! All rectangles are in page space: PostScript points with the origin at the
//! bottom-left corner and Y pointing up. Renderers with a different origin
//! flip coordinates themselves.

use crate::config::{LayoutStyle, PageSize, PlotConfig, Typography};
use crate::error::LsysError;
use crate::path::{Bounds, Path};
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Share of the figure area given to the preview row in [`LayoutEngine::showcase`].
const SHOWCASE_PREVIEW_SHARE: f64 = 0.3;

/// An axis-aligned rectangle in page space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: DVec2,
    pub max: DVec2,
}

impl Rect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            min: DVec2::new(x0.min(x1), y0.min(y1)),
            max: DVec2::new(x0.max(x1), y0.max(y1)),
        }
    }

    /// The whole page.
    pub fn page(page: PageSize) -> Self {
        Self::new(0.0, 0.0, page.width, page.height)
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    /// Shrinks the rectangle by `fraction` of its size on every side, keeping its center.
    pub fn shrink(&self, fraction: f64) -> Self {
        let pad = (self.max - self.min) * fraction;
        Self {
            min: self.min + pad,
            max: self.max - pad,
        }
    }

    pub fn contains(&self, p: DVec2, tolerance: f64) -> bool {
        p.cmpge(self.min - DVec2::splat(tolerance)).all()
            && p.cmple(self.max + DVec2::splat(tolerance)).all()
    }

    fn validate(&self, field: &str) -> Result<(), LsysError> {
        let (w, h) = (self.width(), self.height());
        if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
            return Err(LsysError::configuration(
                field,
                format!("layout area must have positive size, got {w} x {h}"),
            ));
        }
        Ok(())
    }
}

/// Uniform scale plus translation that places one path inside its cell.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutCell {
    pub scale: f64,
    pub translate: DVec2,
    /// The cell the path was fitted into.
    pub cell: Rect,
}

impl LayoutCell {
    /// Maps a point from path space to page space.
    pub fn apply(&self, p: DVec2) -> DVec2 {
        p * self.scale + self.translate
    }

    /// Maps a bounding box from path space to page space.
    pub fn apply_bounds(&self, bounds: &Bounds) -> Rect {
        let a = self.apply(bounds.min);
        let b = self.apply(bounds.max);
        Rect::new(a.x, a.y, b.x, b.y)
    }
}

/// The two regions of a page: annotations on top, figures below.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageRegions {
    pub header: Rect,
    pub figures: Rect,
}

impl PageRegions {
    pub fn new(config: &PlotConfig) -> Self {
        let printable = Rect::page(config.page).shrink(config.page_margin);
        let split = printable.max.y - printable.height() * config.header_fraction;
        Self {
            header: Rect::new(printable.min.x, split, printable.max.x, printable.max.y),
            figures: Rect::new(printable.min.x, printable.min.y, printable.max.x, split),
        }
    }
}

/// Where the title, references and rule lines sit inside the header band.
///
/// References run down the left half. Rule lines run down the right half,
/// split into two columns when one column would reach below the band. If
/// even that does not fit, the line spacing shrinks until it does.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeaderPlacement {
    /// Baseline of the title line.
    pub title_y: f64,
    /// Vertical distance between consecutive annotation lines.
    pub line_step: f64,
    first_line: f64,
    left_x: f64,
    rules_x: f64,
    column_gap: f64,
    rows: usize,
}

impl HeaderPlacement {
    pub fn new(header: Rect, typography: &Typography, refs: usize, rules: usize) -> Self {
        let title_y = header.max.y - typography.title_size;
        let first_line = title_y - typography.title_size * 0.5 - typography.attr_size;
        let room = (first_line - header.min.y).max(0.0);
        let mut line_step = typography.attr_size * 1.2;

        let capacity = (room / line_step).floor() as usize + 1;
        let rows = if rules <= capacity {
            rules
        } else {
            rules.div_ceil(2)
        };
        let needed = rows.max(refs);
        if needed > capacity {
            line_step = room / (needed - 1) as f64;
        }

        Self {
            title_y,
            line_step,
            first_line,
            left_x: header.min.x,
            rules_x: header.center().x,
            column_gap: header.width() * 0.25,
            rows: rows.max(1),
        }
    }

    /// Start of the `i`-th reference line.
    pub fn reference(&self, i: usize) -> DVec2 {
        DVec2::new(self.left_x, self.first_line - i as f64 * self.line_step)
    }

    /// Start of the `i`-th rule line.
    pub fn rule(&self, i: usize) -> DVec2 {
        let (column, row) = (i / self.rows, i % self.rows);
        DVec2::new(
            self.rules_x + column as f64 * self.column_gap,
            self.first_line - row as f64 * self.line_step,
        )
    }

    /// Rule lines per column.
    pub fn rows(&self) -> usize {
        self.rows
    }
}

/// Computes [`LayoutCell`]s for groups of paths.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutEngine {
    /// Fraction of its cell a path may fill, in `(0, 1]`.
    pub margin_factor: f64,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self { margin_factor: 0.9 }
    }
}

impl LayoutEngine {
    pub fn new(margin_factor: f64) -> Self {
        Self { margin_factor }
    }

    /// Scales `bounds` uniformly to fit `cell` and centers it there.
    ///
    /// A zero extent on one axis drops that axis from the fit; a single
    /// point is treated as one unit wide and tall.
    pub fn fit(&self, bounds: &Bounds, cell: Rect) -> LayoutCell {
        let size = bounds.size();
        let axis_scale = |extent: f64, room: f64| {
            if extent > 0.0 {
                room / extent
            } else {
                f64::INFINITY
            }
        };
        let mut scale = axis_scale(size.x, cell.width()).min(axis_scale(size.y, cell.height()));
        if !scale.is_finite() {
            scale = cell.width().min(cell.height());
        }
        let scale = scale * self.margin_factor;

        LayoutCell {
            scale,
            translate: cell.center() - bounds.center() * scale,
            cell,
        }
    }

    /// Lays `paths` out over the whole page in a grid of `cells_per_row` columns.
    pub fn grid(
        &self,
        paths: &[Path],
        page: PageSize,
        cells_per_row: usize,
    ) -> Result<Vec<LayoutCell>, LsysError> {
        page.validate()?;
        self.grid_in(paths, Rect::page(page), cells_per_row)
    }

    /// Lays `paths` out inside `area`, filling rows left to right, top to bottom.
    pub fn grid_in(
        &self,
        paths: &[Path],
        area: Rect,
        cells_per_row: usize,
    ) -> Result<Vec<LayoutCell>, LsysError> {
        self.validate()?;
        area.validate("layout.area")?;
        if cells_per_row == 0 {
            return Err(LsysError::configuration(
                "layout.cells_per_row",
                "must be at least 1",
            ));
        }
        if paths.is_empty() {
            return Ok(Vec::new());
        }

        let columns = cells_per_row.min(paths.len());
        let rows = paths.len().div_ceil(cells_per_row);
        let cell_w = area.width() / columns as f64;
        let cell_h = area.height() / rows as f64;

        Ok(paths
            .iter()
            .enumerate()
            .map(|(i, path)| {
                let (row, col) = (i / cells_per_row, i % cells_per_row);
                let x0 = area.min.x + col as f64 * cell_w;
                let y1 = area.max.y - row as f64 * cell_h;
                self.fit(&path.bounds, Rect::new(x0, y1 - cell_h, x0 + cell_w, y1))
            })
            .collect())
    }

    /// Small previews of every path but the last in one row along the top of
    /// `area`, with the last path filling the main region underneath.
    pub fn showcase(&self, paths: &[Path], area: Rect) -> Result<Vec<LayoutCell>, LsysError> {
        self.validate()?;
        area.validate("layout.area")?;
        let Some((main, previews)) = paths.split_last() else {
            return Ok(Vec::new());
        };
        if previews.is_empty() {
            return Ok(vec![self.fit(&main.bounds, area)]);
        }

        let split = area.max.y - area.height() * SHOWCASE_PREVIEW_SHARE;
        let band = Rect::new(area.min.x, split, area.max.x, area.max.y);
        let main_area = Rect::new(area.min.x, area.min.y, area.max.x, split);

        let mut cells = self.grid_in(previews, band, previews.len())?;
        cells.push(self.fit(&main.bounds, main_area));
        Ok(cells)
    }

    /// Dispatches on the configured [`LayoutStyle`].
    pub fn arrange(
        &self,
        paths: &[Path],
        area: Rect,
        style: LayoutStyle,
    ) -> Result<Vec<LayoutCell>, LsysError> {
        match style {
            LayoutStyle::Grid { cells_per_row } => self.grid_in(paths, area, cells_per_row),
            LayoutStyle::Showcase => self.showcase(paths, area),
        }
    }

    fn validate(&self) -> Result<(), LsysError> {
        if !(self.margin_factor > 0.0 && self.margin_factor <= 1.0) {
            return Err(LsysError::configuration(
                "margin_factor",
                format!("must lie in (0, 1], got {}", self.margin_factor),
            ));
        }
        Ok(())
    }
}
