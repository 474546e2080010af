//! Coordinate mapping between domain space (log2FC, -log10 padj) and draw
//! space (pixels inside the plot widget), including the zoom transform.
//!
//! The base scales map the padded data domain onto the plot area: x onto
//! `[0, width]`, y onto `[height, 0]` so larger values sit higher. The zoom
//! transform `(k, tx, ty)` acts on the range side, `zoomed(v) = k * base(v) + t`,
//! and the zoomed scales are what every conversion uses.

use serde::{Deserialize, Serialize};

use super::points::{Extent, Point};

/// Plot margins in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 20.0,
            bottom: 30.0,
            left: 30.0,
        }
    }
}

/// Pixel geometry of the plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotLayout {
    /// Width of the plot area (x range).
    pub width: f64,
    /// Height of the plot area (y range).
    pub height: f64,
    pub margins: Margins,
    pub axis_label_padding: f64,
    /// Space reserved for the title inside the top margin band.
    pub title_padding: f64,
    pub point_radius: f64,
    pub label_offset: [f64; 2],
}

impl Default for PlotLayout {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 480.0,
            margins: Margins::default(),
            axis_label_padding: 20.0,
            title_padding: 20.0,
            point_radius: 3.0,
            label_offset: [4.0, -4.0],
        }
    }
}

impl PlotLayout {
    /// Horizontal offset from the widget origin to the x range origin.
    pub fn left_offset(&self) -> f64 {
        self.margins.left + self.axis_label_padding
    }

    pub fn top_offset(&self) -> f64 {
        self.margins.top
    }

    /// Full widget size needed to host the plot area.
    pub fn outer_size(&self) -> (f64, f64) {
        (
            self.left_offset() + self.width + self.margins.right,
            self.top_offset() + self.height + self.margins.bottom,
        )
    }
}

/// Allowed range of the zoom scale factor `k`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomLimits {
    pub min: f64,
    pub max: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self { min: 0.5, max: 5.0 }
    }
}

/// `d3.scaleLinear`-style affine map from `domain` to `range`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// A degenerate domain maps everything to the middle of the range.
    pub fn apply(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) * 0.5;
        }
        r0 + (v - d0) / (d1 - d0) * (r1 - r0)
    }

    pub fn invert(&self, px: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if r1 == r0 {
            return (d0 + d1) * 0.5;
        }
        d0 + (px - r0) / (r1 - r0) * (d1 - d0)
    }
}

/// Zoom/pan transform acting on range (pixel) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomTransform {
    pub k: f64,
    pub x: f64,
    pub y: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ZoomTransform {
    pub const IDENTITY: Self = Self { k: 1.0, x: 0.0, y: 0.0 };

    pub fn new(k: f64, x: f64, y: f64) -> Self {
        Self { k, x, y }
    }

    pub fn apply_x(&self, v: f64) -> f64 {
        v * self.k + self.x
    }

    pub fn apply_y(&self, v: f64) -> f64 {
        v * self.k + self.y
    }

    pub fn invert_x(&self, px: f64) -> f64 {
        (px - self.x) / self.k
    }

    pub fn invert_y(&self, py: f64) -> f64 {
        (py - self.y) / self.k
    }

    /// Scale whose domain is what is visible through this transform.
    pub fn rescale_x(&self, base: &LinearScale) -> LinearScale {
        let (r0, r1) = base.range();
        LinearScale::new(
            (base.invert(self.invert_x(r0)), base.invert(self.invert_x(r1))),
            base.range(),
        )
    }

    pub fn rescale_y(&self, base: &LinearScale) -> LinearScale {
        let (r0, r1) = base.range();
        LinearScale::new(
            (base.invert(self.invert_y(r0)), base.invert(self.invert_y(r1))),
            base.range(),
        )
    }

    pub fn is_finite(&self) -> bool {
        self.k.is_finite() && self.x.is_finite() && self.y.is_finite()
    }

    /// Clamp `k`, keeping the range-space point under `anchor` fixed.
    pub fn clamped(self, limits: ZoomLimits, anchor: (f64, f64)) -> Self {
        let k = self.k.clamp(limits.min, limits.max);
        if k == self.k || !self.k.is_finite() || self.k == 0.0 {
            return Self { k, ..self };
        }
        let ratio = k / self.k;
        Self {
            k,
            x: anchor.0 - (anchor.0 - self.x) * ratio,
            y: anchor.1 - (anchor.1 - self.y) * ratio,
        }
    }

    /// Multiply the scale by `factor` around a range-space anchor.
    pub fn scale_by(self, factor: f64, anchor: (f64, f64)) -> Self {
        Self {
            k: self.k * factor,
            x: anchor.0 - (anchor.0 - self.x) * factor,
            y: anchor.1 - (anchor.1 - self.y) * factor,
        }
    }

    pub fn translate_by(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DrawPos {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DomainPos {
    pub x: f64,
    pub y: f64,
}

/// A pointer position in both spaces.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EventCoords {
    pub draw: DrawPos,
    pub domain: DomainPos,
}

/// Axis-aligned domain rectangle with `min <= max` on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainRect {
    pub min: DomainPos,
    pub max: DomainPos,
}

impl DomainRect {
    pub fn from_corners(a: DomainPos, b: DomainPos) -> Self {
        Self {
            min: DomainPos {
                x: a.x.min(b.x),
                y: a.y.min(b.y),
            },
            max: DomainPos {
                x: a.x.max(b.x),
                y: a.y.max(b.y),
            },
        }
    }

    /// Inclusive on all four edges.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min.x && x <= self.max.x && y >= self.min.y && y <= self.max.y
    }

    pub fn is_degenerate(&self) -> bool {
        self.min.x == self.max.x || self.min.y == self.max.y
    }
}

/// Containment in domain space, so the answer does not depend on zoom.
pub fn containment_test(point: &Point, corners: [DomainPos; 2]) -> bool {
    DomainRect::from_corners(corners[0], corners[1]).contains(point.x, point.y)
}

/// A line segment in draw space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawLine {
    pub from: DrawPos,
    pub to: DrawPos,
}

#[derive(Debug, Clone)]
pub struct CoordinateMapper {
    layout: PlotLayout,
    limits: ZoomLimits,
    domain: DomainRect,
    base_x: LinearScale,
    base_y: LinearScale,
    zoom_x: LinearScale,
    zoom_y: LinearScale,
    transform: ZoomTransform,
    origin: (f64, f64),
}

impl CoordinateMapper {
    pub fn new(layout: PlotLayout, limits: ZoomLimits) -> Self {
        let domain = DomainRect {
            min: DomainPos { x: 0.0, y: 0.0 },
            max: DomainPos { x: 1.0, y: 1.0 },
        };
        let mut m = Self {
            layout,
            limits,
            domain,
            base_x: LinearScale::new((0.0, 1.0), (0.0, 1.0)),
            base_y: LinearScale::new((0.0, 1.0), (1.0, 0.0)),
            zoom_x: LinearScale::new((0.0, 1.0), (0.0, 1.0)),
            zoom_y: LinearScale::new((0.0, 1.0), (1.0, 0.0)),
            transform: ZoomTransform::IDENTITY,
            origin: (0.0, 0.0),
        };
        m.rebuild_scales();
        m
    }

    pub fn layout(&self) -> &PlotLayout {
        &self.layout
    }

    pub fn limits(&self) -> ZoomLimits {
        self.limits
    }

    /// Fit the domain to a data extent plus fixed padding and reset the zoom.
    /// An empty store keeps a unit domain.
    pub fn fit_domain(&mut self, extent: Option<Extent>, padding: (f64, f64)) {
        self.domain = match extent {
            Some(e) => DomainRect {
                min: DomainPos {
                    x: e.x.0 - padding.0,
                    y: e.y.0 - padding.1,
                },
                max: DomainPos {
                    x: e.x.1 + padding.0,
                    y: e.y.1 + padding.1,
                },
            },
            None => DomainRect {
                min: DomainPos { x: 0.0, y: 0.0 },
                max: DomainPos { x: 1.0, y: 1.0 },
            },
        };
        self.transform = ZoomTransform::IDENTITY;
        self.rebuild_scales();
    }

    /// Change the plot area size, keeping domain and zoom.
    pub fn set_plot_size(&mut self, width: f64, height: f64) {
        if width > 0.0 && height > 0.0 {
            self.layout.width = width;
            self.layout.height = height;
            self.rebuild_scales();
        }
    }

    /// Position of the widget's top-left corner in event coordinates.
    pub fn set_origin(&mut self, x: f64, y: f64) {
        self.origin = (x, y);
    }

    pub fn origin(&self) -> (f64, f64) {
        self.origin
    }

    fn rebuild_scales(&mut self) {
        self.base_x = LinearScale::new((self.domain.min.x, self.domain.max.x), (0.0, self.layout.width));
        self.base_y = LinearScale::new((self.domain.min.y, self.domain.max.y), (self.layout.height, 0.0));
        self.zoom_x = self.transform.rescale_x(&self.base_x);
        self.zoom_y = self.transform.rescale_y(&self.base_y);
    }

    /// Full (unzoomed) data domain including padding.
    pub fn domain(&self) -> DomainRect {
        self.domain
    }

    /// Domain currently visible through the zoom.
    pub fn visible_domain(&self) -> DomainRect {
        let (x0, x1) = self.zoom_x.domain();
        let (y0, y1) = self.zoom_y.domain();
        DomainRect::from_corners(DomainPos { x: x0, y: y0 }, DomainPos { x: x1, y: y1 })
    }

    pub fn transform(&self) -> ZoomTransform {
        self.transform
    }

    pub fn zoom_scales(&self) -> (&LinearScale, &LinearScale) {
        (&self.zoom_x, &self.zoom_y)
    }

    pub fn to_draw(&self, point: &Point) -> DrawPos {
        self.to_draw_xy(point.x, point.y)
    }

    pub fn to_draw_xy(&self, x: f64, y: f64) -> DrawPos {
        DrawPos {
            x: self.zoom_x.apply(x) + self.layout.left_offset(),
            y: self.zoom_y.apply(y) + self.layout.top_offset(),
        }
    }

    /// Convert an event position (same coordinate system as [`origin`](Self::origin))
    /// into widget-relative draw coordinates and domain coordinates.
    pub fn from_event(&self, px: f64, py: f64) -> EventCoords {
        let draw = DrawPos {
            x: px - self.origin.0,
            y: py - self.origin.1,
        };
        EventCoords {
            draw,
            domain: DomainPos {
                x: self.zoom_x.invert(draw.x - self.layout.left_offset()),
                y: self.zoom_y.invert(draw.y - self.layout.top_offset()),
            },
        }
    }

    /// Install a zoom transform. `k` is clamped to the zoom limits around the
    /// centre of the plot area. Returns the transform actually applied.
    /// Non-finite transforms leave the current one in place.
    pub fn apply_zoom(&mut self, transform: ZoomTransform) -> ZoomTransform {
        if !transform.is_finite() {
            return self.transform;
        }
        let centre = (self.layout.width * 0.5, self.layout.height * 0.5);
        self.transform = transform.clamped(self.limits, centre);
        self.rebuild_scales();
        log::debug!(
            "zoom k={:.3} t=({:.1}, {:.1})",
            self.transform.k,
            self.transform.x,
            self.transform.y
        );
        self.transform
    }

    /// Zoom by `factor` keeping the domain point under `draw` fixed.
    pub fn zoom_at(&mut self, factor: f64, draw: DrawPos) -> ZoomTransform {
        let anchor = (draw.x - self.layout.left_offset(), draw.y - self.layout.top_offset());
        let next = self.transform.scale_by(factor, anchor).clamped(self.limits, anchor);
        self.transform = next;
        self.rebuild_scales();
        next
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) -> ZoomTransform {
        self.transform = self.transform.translate_by(dx, dy);
        self.rebuild_scales();
        self.transform
    }

    pub fn reset_zoom(&mut self) {
        self.transform = ZoomTransform::IDENTITY;
        self.rebuild_scales();
    }

    /// Whether the point lies inside the visible domain.
    pub fn is_in_view(&self, point: &Point) -> bool {
        self.visible_domain().contains(point.x, point.y)
    }

    /// Clamp a domain position to the full data domain.
    pub fn clamp_to_domain(&self, pos: DomainPos) -> DomainPos {
        DomainPos {
            x: pos.x.clamp(self.domain.min.x, self.domain.max.x),
            y: pos.y.clamp(self.domain.min.y, self.domain.max.y),
        }
    }

    /// Index of the in-view point nearest to a draw position, within `radius`
    /// pixels.
    pub fn hit_test(&self, points: &[Point], draw: DrawPos, radius: f64) -> Option<usize> {
        let r2 = radius * radius;
        let mut best: Option<(usize, f64)> = None;
        for (i, p) in points.iter().enumerate() {
            if !self.is_in_view(p) {
                continue;
            }
            let d = self.to_draw(p);
            let dist = (d.x - draw.x).powi(2) + (d.y - draw.y).powi(2);
            if dist <= r2 && best.is_none_or(|(_, b)| dist < b) {
                best = Some((i, dist));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Threshold guide lines: vertical at `-fc` and `+fc`, horizontal at
    /// `nlogpadj`, each spanning the visible domain.
    pub fn threshold_lines(&self, log2_fold_change: f64, nlogpadj: f64) -> [DrawLine; 3] {
        let v = self.visible_domain();
        let vertical = |x: f64| DrawLine {
            from: self.to_draw_xy(x, v.min.y),
            to: self.to_draw_xy(x, v.max.y),
        };
        [
            vertical(-log2_fold_change),
            vertical(log2_fold_change),
            DrawLine {
                from: self.to_draw_xy(v.min.x, nlogpadj),
                to: self.to_draw_xy(v.max.x, nlogpadj),
            },
        ]
    }
}

impl Default for CoordinateMapper {
    fn default() -> Self {
        Self::new(PlotLayout::default(), ZoomLimits::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_scale_round_trip() {
        let s = LinearScale::new((-2.0, 6.0), (400.0, 0.0));
        assert_eq!(s.apply(-2.0), 400.0);
        assert_eq!(s.apply(6.0), 0.0);
        assert!((s.invert(s.apply(1.25)) - 1.25).abs() < 1e-12);
    }

    #[test]
    fn clamped_keeps_anchor_fixed() {
        let t = ZoomTransform::new(10.0, 0.0, 0.0).clamped(ZoomLimits::default(), (100.0, 50.0));
        assert_eq!(t.k, 5.0);
        // the anchor maps to the same spot as with the unclamped transform
        assert!((t.invert_x(100.0) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn rescale_matches_transform_composition() {
        let base = LinearScale::new((0.0, 10.0), (0.0, 500.0));
        let t = ZoomTransform::new(2.0, -100.0, 0.0);
        let z = t.rescale_x(&base);
        for v in [0.0, 2.5, 7.0] {
            assert!((z.apply(v) - t.apply_x(base.apply(v))).abs() < 1e-9);
        }
    }
}
