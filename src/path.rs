//! Path construction
//!
//! A path is one or more figures (subpaths), each a chain of connected
//! points. Figures may be left open or closed explicitly; a fill always
//! treats every figure as closed. The path manager owns the current
//! point that line and spline operations extend, converts finished
//! figures to edges, and drives the edge manager for fills, clipping,
//! and masking.

use log::debug;

use crate::curve::{flatten_cubic, flatten_quadratic};
use crate::edge::{EdgeManager, FillMode, FillRule};
use crate::fixed::*;
use crate::render::Renderer;

/// Default curve-to-chord error tolerance, in pixels
pub const FLATNESS_DEFAULT: f32 = 0.6;
/// Minimum flatness setting
pub const FLATNESS_MINIMUM: f32 = 1.0 / 16.0;
/// Maximum flatness setting
pub const FLATNESS_MAXIMUM: f32 = 16.0;

/// One finalized figure: a range of vertices in the path
#[derive(Debug,Copy,Clone)]
struct Figure {
    start: usize,
    end: usize,
}

/// Builds paths and fills them through an [EdgeManager]
#[derive(Debug)]
pub struct Path {
    verts: Vec<Vert16>,
    figures: Vec<Figure>,
    fig_start: usize,  // first vertex of the open figure
    has_current: bool, // the open figure is non-empty
    edges: EdgeManager,
    device_rect: Rect,
    scroll: Point,
    flatness: Fix16,
    fixshift: i32, // left shift taking user coordinates to 16.16
}

impl Path {
    /// Creates a path manager for a device surface of the given pixel
    /// dimensions. The clip region starts out as the whole surface.
    pub fn new(width: i32, height: i32) -> Self {
        let mut path = Self {
            verts: Vec::new(),
            figures: Vec::new(),
            fig_start: 0,
            has_current: false,
            edges: EdgeManager::new(),
            device_rect: Rect::new(0, 0, 0, 0),
            scroll: Point::default(),
            flatness: 0,
            fixshift: FIX_SHIFT,
        };
        path.set_flatness(FLATNESS_DEFAULT);
        path.init_clip_region(width, height);
        path
    }

    fn to_fixed(&self, p: Point) -> Vert16 {
        Vert16::new(p.x << self.fixshift, p.y << self.fixshift)
    }

    /// Discards all figures and begins an empty path
    pub fn begin_path(&mut self) {
        self.verts.clear();
        self.figures.clear();
        self.fig_start = 0;
        self.has_current = false;
    }

    /// Terminates the current figure and starts a new one containing
    /// the single point (x,y), which becomes the current point
    pub fn move_to(&mut self, x: i32, y: i32) {
        self.end_figure();
        self.verts.push(self.to_fixed(Point::new(x, y)));
        self.fig_start = self.verts.len() - 1;
        self.has_current = true;
    }

    /// Appends a line segment from the current point to (x,y). Returns
    /// false if the current point is undefined.
    pub fn line_to(&mut self, x: i32, y: i32) -> bool {
        if !self.has_current {
            debug_assert!(false, "line_to requires a current point");
            return false;
        }
        self.verts.push(self.to_fixed(Point::new(x, y)));
        true
    }

    /// Appends a connected series of line segments, starting at the
    /// current point. Returns false if the current point is undefined.
    pub fn poly_line(&mut self, xy: &[Point]) -> bool {
        if !self.has_current {
            debug_assert!(false, "poly_line requires a current point");
            return false;
        }
        for p in xy {
            self.verts.push(self.to_fixed(*p));
        }
        true
    }

    /// Appends a rectangle to the path as its own closed figure, wound
    /// clockwise. The current figure is terminated first.
    pub fn rectangle(&mut self, rect: Rect) {
        let (mut x, mut y) = (rect.x, rect.y);
        self.move_to(x, y);
        x += rect.w;
        self.line_to(x, y);
        y += rect.h;
        self.line_to(x, y);
        x -= rect.w;
        self.line_to(x, y);
        self.close_figure();
    }

    /// Closes the current figure by connecting its end point back to
    /// its first point, then starts a new, empty figure
    pub fn close_figure(&mut self) {
        self.finalize_figure(true);
    }

    /// Terminates the current figure without connecting its end point
    /// to its first point, then starts a new, empty figure
    pub fn end_figure(&mut self) {
        self.finalize_figure(false);
    }

    /// Ties off the open figure. Runs of coincident points collapse to
    /// one, a closing point that repeats the first point is dropped,
    /// and a figure left with fewer than two points is discarded.
    fn finalize_figure(&mut self, close: bool) {
        if !self.has_current {
            return;
        }
        self.has_current = false;

        let first = self.verts[self.fig_start];
        let mut keep = self.fig_start;
        for i in self.fig_start + 1..self.verts.len() {
            if self.verts[i] != self.verts[keep] {
                keep += 1;
                self.verts[keep] = self.verts[i];
            }
        }
        self.verts.truncate(keep + 1);
        if close && keep > self.fig_start && self.verts[keep] == first {
            self.verts.truncate(keep);
        }

        if self.verts.len() - self.fig_start >= 2 {
            self.figures.push(Figure { start: self.fig_start, end: self.verts.len() });
        } else {
            // A single point draws nothing
            self.verts.truncate(self.fig_start);
        }
        self.fig_start = self.verts.len();
    }

    /// Converts every figure to edges in the edge manager's input list,
    /// forcing each figure closed. Returns false if the path is empty.
    fn path_to_edges(&mut self) -> bool {
        self.end_figure();
        if self.figures.is_empty() {
            return false;
        }
        for fig in &self.figures {
            let pts = &self.verts[fig.start..fig.end];
            let mut prev = pts[pts.len() - 1];
            for &p in pts {
                self.edges.attach_edge(prev, p);
                prev = p;
            }
        }
        if self.scroll.x != 0 || self.scroll.y != 0 {
            self.edges.translate_edges(-self.scroll.x, -self.scroll.y);
        }
        true
    }

    /// Fills the current path: every figure is closed, the interior is
    /// resolved under `rule`, clipped to the active clip region, and
    /// fed to `ren`. Returns false if nothing was filled.
    pub fn fill_path<R: Renderer>(&mut self, rule: FillRule, ren: &mut R) -> bool {
        if !self.path_to_edges() {
            return false;
        }
        debug!("fill_path: {} figures, {:?}", self.figures.len(), rule);
        self.edges.normalize_edges(rule.into());
        self.edges.clip_edges(FillMode::Intersect);
        self.edges.fill_edge_list(ren)
    }

    /// Replaces the clip region with the intersection of the current
    /// clip region and the interior of the current path. Returns false
    /// if the new clip region is empty.
    pub fn set_clip_region(&mut self, rule: FillRule) -> bool {
        if !self.path_to_edges() {
            return false;
        }
        self.edges.normalize_edges(rule.into());
        self.edges.clip_edges(FillMode::Intersect);
        self.edges.set_clip_list()
    }

    /// Replaces the clip region with the part of the current clip
    /// region lying outside the current path. Returns false if the new
    /// clip region is empty.
    pub fn set_mask_region(&mut self, rule: FillRule) -> bool {
        if !self.path_to_edges() {
            return false;
        }
        self.edges.normalize_edges(rule.into());
        self.edges.reverse_edges();
        self.edges.clip_edges(FillMode::Exclude);
        self.edges.set_clip_list()
    }

    /// Initializes the clip region to the device rectangle of the given
    /// pixel dimensions. Returns false on empty dimensions.
    pub fn init_clip_region(&mut self, width: i32, height: i32) -> bool {
        if width <= 0 || height <= 0 {
            debug_assert!(false, "empty device rectangle");
            return false;
        }
        self.device_rect = Rect::new(0, 0, width, height);
        self.edges.set_device_clip_rect(&self.device_rect);
        true
    }

    /// Resets the clip region to the whole device rectangle
    pub fn reset_clip_region(&mut self) {
        self.edges.set_device_clip_rect(&self.device_rect);
    }

    /// Saves a copy of the clip region for a later swap_clip_region.
    /// Returns false if the current clip region is empty.
    pub fn save_clip_region(&mut self) -> bool {
        self.edges.save_clip_region()
    }

    /// Exchanges the clip region with the previously saved copy.
    /// Returns false if the newly active clip region is empty.
    pub fn swap_clip_region(&mut self) -> bool {
        self.edges.swap_clip_region()
    }

    /// Sets the curve-to-chord error tolerance in pixels, clamped to
    /// the documented range. Returns the previous tolerance.
    pub fn set_flatness(&mut self, tol: f32) -> f32 {
        let old = self.flatness as f32 / 65536.0;
        let tol = tol.max(FLATNESS_MINIMUM).min(FLATNESS_MAXIMUM);
        self.flatness = (65536.0 * tol) as Fix16;
        old
    }

    /// Declares how many bits of fraction user coordinates carry, from
    /// 0 (integers, the default) to 16 (full fixed point). Returns the
    /// previous setting, or -1 if `nbits` is out of range.
    pub fn set_fixed_bits(&mut self, nbits: i32) -> i32 {
        let old = FIX_SHIFT - self.fixshift;
        if nbits < 0 || nbits > FIX_SHIFT {
            debug_assert!(false, "fixed bits out of range");
            return -1;
        }
        self.fixshift = FIX_SHIFT - nbits;
        old
    }

    /// Sets the scroll position. The displacement is subtracted from
    /// every shape before it is filled, so the window can pan over an
    /// image larger than the device.
    pub fn set_scroll_position(&mut self, x: i32, y: i32) {
        self.scroll = Point::new(x, y);
    }

    /// The current point, if the current figure is non-empty
    pub fn current_point(&self) -> Option<Point> {
        if !self.has_current {
            return None;
        }
        Some(self.to_user(*self.verts.last().unwrap()))
    }

    /// The first point of the current figure, if it is non-empty
    pub fn first_point(&self) -> Option<Point> {
        if !self.has_current {
            return None;
        }
        Some(self.to_user(self.verts[self.fig_start]))
    }

    fn to_user(&self, v: Vert16) -> Point {
        let roundoff = if self.fixshift == 0 { 0 } else { 1 << (self.fixshift - 1) };
        Point::new((v.x + roundoff) >> self.fixshift, (v.y + roundoff) >> self.fixshift)
    }

    /// Minimum bounding box of every point in the path, in user
    /// coordinates, rounded outward to cover fractional extents.
    /// Returns `None` for an empty path.
    pub fn bounding_box(&self) -> Option<Rect> {
        if self.verts.is_empty() {
            return None;
        }
        let mut xmin = Fix16::max_value();
        let mut ymin = Fix16::max_value();
        let mut xmax = Fix16::min_value();
        let mut ymax = Fix16::min_value();
        for v in &self.verts {
            xmin = xmin.min(v.x);
            ymin = ymin.min(v.y);
            xmax = xmax.max(v.x);
            ymax = ymax.max(v.y);
        }
        let roundup = 0xFFFF >> (FIX_SHIFT - self.fixshift);
        let x = xmin >> self.fixshift;
        let y = ymin >> self.fixshift;
        Some(Rect::new(
            x,
            y,
            ((xmax + roundup) >> self.fixshift) - x,
            ((ymax + roundup) >> self.fixshift) - y,
        ))
    }

    /// Every vertex currently in the path, in 16.16 fixed point
    pub fn vertices(&self) -> &[Vert16] {
        &self.verts
    }

    /// Appends a quadratic Bezier spline to the current figure. The
    /// current point is the first point of the 3-point control polygon;
    /// `v1` and `v2` supply the rest, and `v2` becomes the new current
    /// point. Returns false if the current point is undefined.
    pub fn bezier2(&mut self, v1: Point, v2: Point) -> bool {
        if !self.has_current {
            debug_assert!(false, "bezier2 requires a current point");
            return false;
        }
        let ctrl = [*self.verts.last().unwrap(), self.to_fixed(v1), self.to_fixed(v2)];
        flatten_quadratic(&ctrl, self.flatness, &mut self.verts);
        true
    }

    /// Appends a series of connected quadratic Bezier splines. Each
    /// spline takes the previous one's end point as its first control
    /// point and consumes two points of `xy`. Returns false if the
    /// current point is undefined or `xy` is not a whole number of
    /// splines.
    pub fn poly_bezier2(&mut self, xy: &[Point]) -> bool {
        if !self.has_current || xy.len() % 2 != 0 {
            debug_assert!(self.has_current, "poly_bezier2 requires a current point");
            debug_assert!(xy.len() % 2 == 0, "poly_bezier2 takes point pairs");
            return false;
        }
        for pair in xy.chunks_exact(2) {
            self.bezier2(pair[0], pair[1]);
        }
        true
    }

    /// Appends a cubic Bezier spline to the current figure. The current
    /// point is the first point of the 4-point control polygon; `v1`,
    /// `v2`, and `v3` supply the rest, and `v3` becomes the new current
    /// point. Returns false if the current point is undefined.
    pub fn bezier3(&mut self, v1: Point, v2: Point, v3: Point) -> bool {
        if !self.has_current {
            debug_assert!(false, "bezier3 requires a current point");
            return false;
        }
        let ctrl = [
            *self.verts.last().unwrap(),
            self.to_fixed(v1),
            self.to_fixed(v2),
            self.to_fixed(v3),
        ];
        flatten_cubic(&ctrl, self.flatness, &mut self.verts);
        true
    }

    /// Appends a series of connected cubic Bezier splines, three points
    /// of `xy` per spline. Returns false if the current point is
    /// undefined or `xy` is not a whole number of splines.
    pub fn poly_bezier3(&mut self, xy: &[Point]) -> bool {
        if !self.has_current || xy.len() % 3 != 0 {
            debug_assert!(self.has_current, "poly_bezier3 requires a current point");
            debug_assert!(xy.len() % 3 == 0, "poly_bezier3 takes point triples");
            return false;
        }
        for ctrl in xy.chunks_exact(3) {
            self.bezier3(ctrl[0], ctrl[1], ctrl[2]);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_point_figures_are_discarded() {
        let mut path = Path::new(100, 100);
        path.move_to(10, 10);
        path.move_to(20, 20);
        path.line_to(30, 20);
        path.end_figure();
        // Only the two-point figure survives
        assert_eq!(path.vertices().len(), 2);
    }

    #[test]
    fn coincident_points_collapse() {
        let mut path = Path::new(100, 100);
        path.move_to(0, 0);
        path.line_to(10, 0);
        path.line_to(10, 0);
        path.line_to(10, 10);
        path.close_figure();
        assert_eq!(path.vertices().len(), 3);
    }

    #[test]
    fn closing_point_repeating_the_first_is_dropped() {
        let mut path = Path::new(100, 100);
        path.move_to(0, 0);
        path.line_to(10, 0);
        path.line_to(10, 10);
        path.line_to(0, 0);
        path.close_figure();
        assert_eq!(path.vertices().len(), 3);
    }

    #[test]
    fn current_point_tracks_operations() {
        let mut path = Path::new(100, 100);
        assert_eq!(path.current_point(), None);
        path.move_to(5, 6);
        assert_eq!(path.current_point(), Some(Point::new(5, 6)));
        path.line_to(9, 6);
        assert_eq!(path.current_point(), Some(Point::new(9, 6)));
        assert_eq!(path.first_point(), Some(Point::new(5, 6)));
        path.end_figure();
        assert_eq!(path.current_point(), None);
    }

    #[test]
    fn line_without_current_point_fails() {
        let mut path = Path::new(100, 100);
        // Contract violations report false in release builds
        let ok = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            path.line_to(1, 1)
        }));
        match ok {
            Ok(result) => assert!(!result), // debug_assert disabled
            Err(_) => {}                    // debug_assert fired
        }
    }

    #[test]
    fn fixed_bits_scale_incoming_coordinates() {
        let mut path = Path::new(100, 100);
        assert_eq!(path.set_fixed_bits(4), 0);
        path.move_to(16, 32); // 1.0, 2.0 in 12.4 coordinates
        let v = path.vertices()[0];
        assert_eq!(v.x, FIX_ONE);
        assert_eq!(v.y, 2 * FIX_ONE);
        assert_eq!(path.current_point(), Some(Point::new(16, 32)));
        assert_eq!(path.set_fixed_bits(0), 4);
    }

    #[test]
    fn bounding_box_rounds_outward() {
        let mut path = Path::new(200, 200);
        path.move_to(10, 20);
        path.line_to(50, 20);
        path.line_to(50, 80);
        path.close_figure();
        assert_eq!(path.bounding_box(), Some(Rect::new(10, 20, 40, 60)));
    }

    #[test]
    fn bezier_endpoint_becomes_current_point() {
        let mut path = Path::new(200, 200);
        path.move_to(0, 0);
        assert!(path.bezier2(Point::new(50, 100), Point::new(100, 0)));
        assert_eq!(path.current_point(), Some(Point::new(100, 0)));
        assert!(path.bezier3(
            Point::new(110, 10),
            Point::new(120, 20),
            Point::new(130, 30)
        ));
        assert_eq!(path.current_point(), Some(Point::new(130, 30)));
    }

    #[test]
    fn flatness_is_clamped_to_its_range() {
        let mut path = Path::new(100, 100);
        path.set_flatness(1000.0);
        assert_eq!(path.set_flatness(0.0), FLATNESS_MAXIMUM);
        assert_eq!(path.set_flatness(0.5), FLATNESS_MINIMUM);
    }
}
