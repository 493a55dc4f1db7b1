//! Polygonal edge manager
//!
//! Converts the line segments of a path into polygonal edges, partitions
//! the edges into bands of non-overlapping trapezoids under a fill rule,
//! intersects the result with the active clip region, and hands the
//! finished list to a renderer through an [EdgeFeeder](crate::EdgeFeeder).

use std::mem;

use log::{debug, warn};

use crate::feeder::EdgeFeeder;
use crate::fixed::*;
use crate::pool::EdgePool;
use crate::render::Renderer;

/// Fill rule for deciding which regions bounded by a path are interior
#[derive(Debug,PartialEq,Copy,Clone)]
pub enum FillRule {
    /// Even-odd (parity) rule
    EvenOdd,
    /// Nonzero winding number rule
    NonZero,
}

impl Default for FillRule {
    fn default() -> FillRule {
        FillRule::NonZero
    }
}

/// Fill modes understood by edge normalization
///
/// The last two combine a normalized shape with the active clip region
/// and never appear as a user-facing fill rule.
#[derive(Debug,PartialEq,Copy,Clone)]
pub(crate) enum FillMode {
    EvenOdd,
    NonZero,
    /// Keep spans inside both the clip region and the shape
    Intersect,
    /// Keep spans inside the clip region but outside the shape
    Exclude,
}

impl From<FillRule> for FillMode {
    fn from(rule: FillRule) -> FillMode {
        match rule {
            FillRule::EvenOdd => FillMode::EvenOdd,
            FillRule::NonZero => FillMode::NonZero,
        }
    }
}

/// Polygonal edge: a directed, non-horizontal line segment normalized to
/// point down the display in y
#[derive(Debug,Default,Copy,Clone,PartialEq)]
pub struct Edge {
    /// Integer y coordinate at the top (minimum-y) end
    pub ytop: i32,
    /// Signed height in pixel rows; the sign is the winding direction
    pub dy: i32,
    /// Fixed-point x coordinate at the top end
    pub xtop: Fix16,
    /// Inverse slope: change in x per unit step in y
    pub dxdy: Fix16,
}

/// Largest height a trapezoid band starts from
const MAX_BAND_HEIGHT: i32 = 0x7FFF;

fn wind_sign(dy: i32) -> i32 {
    if dy < 0 {
        -1
    } else {
        1
    }
}

/// Owns the edge lists a shape passes through on its way to a renderer
///
/// The input and output lists are transient scratch space, fully drained
/// at the end of every normalization pass. The clip list holds the active
/// clip region, the saved list a backup of it, and the render list the
/// shape currently being fed to a renderer. Every list lives in its own
/// [EdgePool], and lists change owners only by swapping whole pools.
#[derive(Debug,Default)]
pub struct EdgeManager {
    input: EdgePool,
    output: EdgePool,
    clip: EdgePool,
    render: EdgePool,
    saved: EdgePool,
}

impl EdgeManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Converts a directed line segment to a polygonal edge in the input
    /// list. Horizontal segments contribute no fill coverage and are
    /// discarded. The x sample point is placed at the pixel-center y of
    /// the topmost covered row.
    pub fn attach_edge(&mut self, v1: Vert16, v2: Vert16) {
        let j = (v1.y + FIX_BIAS) >> FIX_SHIFT;
        let k = (v2.y + FIX_BIAS) >> FIX_SHIFT;
        if j == k {
            return;
        }
        let (vtop, vbot, y) = if k > j { (v1, v2, j) } else { (v2, v1, k) };
        let dxdy = fix_div(vbot.x - vtop.x, vbot.y - vtop.y);
        let xgap = fix_mul(dxdy, (y << FIX_SHIFT) + FIX_HALF - vtop.y);
        self.input.alloc(Edge {
            ytop: y,
            dy: k - j,
            xtop: vtop.x + xgap + FIX_BIAS,
            dxdy,
        });
    }

    /// Saves one pair of mated edges to the output list. The pair spans
    /// one trapezoid: `left` bounds it on the left, `right` on the right.
    fn save_edge_pair(&mut self, height: i32, left: u32, right: u32) {
        let mut l = self.input[left as usize];
        let mut r = self.input[right as usize];
        l.dy = height; // positive so that the winding number increments
        r.dy = -height; // negative so that it decrements
        self.output.alloc(l);
        self.output.alloc(r);
    }

    /// Partitions the input list, which may describe self-intersecting
    /// and multi-figure shapes, into the output list of non-overlapping
    /// trapezoids under the given fill mode.
    ///
    /// The caller guarantees closed figures, so the number of edges
    /// crossing any scan line is even. Trapezoids are emitted in bands
    /// from top to bottom, left to right within a band, and the input
    /// list is drained no matter what.
    pub(crate) fn normalize_edges(&mut self, mode: FillMode) {
        debug_assert!(self.output.is_empty());
        if self.input.is_empty() {
            return;
        }
        if self.clip.is_empty() {
            // Nothing survives an empty clip region
            self.input.reset();
            return;
        }
        debug!("normalize: {} edges, {:?}", self.input.count(), mode);

        // Process in order of ascending ytop. The sort is stable, which
        // keeps coincident edges deterministic.
        let mut order: Vec<u32> = (0..self.input.count() as u32).collect();
        order.sort_by_key(|&i| self.input[i as usize].ytop);

        let mut next = 0; // cursor into the y-sorted order
        let mut band: Vec<u32> = Vec::new();
        let mut carry: Vec<u32> = Vec::new();

        while !carry.is_empty() || next < order.len() {
            // Edges carried over from the previous band all share one
            // ytop, and no pending edge starts above them.
            let yscan = if carry.is_empty() {
                self.input[order[next] as usize].ytop
            } else {
                self.input[carry[0] as usize].ytop
            };

            // Collect the band: every edge active at yscan
            band.clear();
            band.append(&mut carry);
            while next < order.len() && self.input[order[next] as usize].ytop == yscan {
                band.push(order[next]);
                next += 1;
            }

            // The band height starts at the shortest edge in the band
            // and shrinks to the top of the first pending edge below
            let mut h = MAX_BAND_HEIGHT;
            for &i in &band {
                h = h.min(self.input[i as usize].dy.abs());
            }
            if next < order.len() {
                h = h.min(self.input[order[next] as usize].ytop - yscan);
            }

            // Left-to-right order inside the band: ascending xtop, then
            // ascending slope, then descending height for coincident edges
            band.sort_by(|&a, &b| {
                let p = &self.input[a as usize];
                let q = &self.input[b as usize];
                p.xtop
                    .cmp(&q.xtop)
                    .then(p.dxdy.cmp(&q.dxdy))
                    .then(q.dy.cmp(&p.dy))
            });

            // If any pair of x-adjacent edges converges, stop the band
            // just above their point of intersection so that no two
            // edges swap order inside it
            let mut i = 0;
            while i + 1 < band.len() && h > 1 {
                let p = &self.input[band[i] as usize];
                let q = &self.input[band[i + 1] as usize];
                let ddx = p.dxdy - q.dxdy;
                let xdist = q.xtop - p.xtop;
                if ddx > 0 && i64::from(xdist) < i64::from(h - 1) * i64::from(ddx) {
                    h = 1 + xdist / ddx;
                }
                i += 1;
            }

            self.emit_band(&band, h, yscan, mode);

            // Clip the band off every edge; whatever height remains
            // continues into the next band, in unchanged x order
            let ynext = yscan + h;
            for &ix in &band {
                let e = &mut self.input[ix as usize];
                e.dy -= if e.dy < 0 { -h } else { h };
                if e.dy != 0 {
                    e.xtop = (i64::from(e.xtop) + i64::from(h) * i64::from(e.dxdy)) as Fix16;
                    e.ytop = ynext;
                    carry.push(ix);
                }
            }
        }
        self.input.reset();
    }

    /// Applies the fill mode to one x-sorted band, pairing off the edges
    /// that bound filled trapezoids of height `h`
    fn emit_band(&mut self, band: &[u32], h: i32, yscan: i32, mode: FillMode) {
        if band.len() % 2 != 0 {
            // A closed figure can never put an odd number of edges on a
            // scan line; drop the band rather than mispair it
            debug_assert!(false, "odd edge count {} at y {}", band.len(), yscan);
            warn!("normalize: dropping malformed band of {} edges at y {}", band.len(), yscan);
            return;
        }
        match mode {
            FillMode::EvenOdd => {
                for pair in band.chunks_exact(2) {
                    self.save_edge_pair(h, pair[0], pair[1]);
                }
            }
            FillMode::NonZero => {
                let mut i = 0;
                while i < band.len() {
                    let mut wind = wind_sign(self.input[band[i] as usize].dy);
                    let mut j = i + 1;
                    while j < band.len() {
                        wind += wind_sign(self.input[band[j] as usize].dy);
                        if wind == 0 {
                            break;
                        }
                        j += 1;
                    }
                    if j >= band.len() {
                        debug_assert!(false, "unclosed winding at y {}", yscan);
                        warn!("normalize: unclosed winding at y {}", yscan);
                        return;
                    }
                    self.save_edge_pair(h, band[i], band[j]);
                    i = j + 1;
                }
            }
            FillMode::Intersect | FillMode::Exclude => {
                // The clip region edges were merged into the same band,
                // so a span is interior exactly where the accumulated
                // count reaches one above the seed
                let mut wind = if mode == FillMode::Intersect { -1 } else { 0 };
                let mut i = 0;
                loop {
                    let mut left = None;
                    while i < band.len() {
                        wind += wind_sign(self.input[band[i] as usize].dy);
                        i += 1;
                        if wind == 1 {
                            left = Some(band[i - 1]);
                            break;
                        }
                    }
                    let left = match left {
                        Some(l) => l,
                        None => break,
                    };
                    let mut right = None;
                    while i < band.len() {
                        wind += wind_sign(self.input[band[i] as usize].dy);
                        i += 1;
                        if wind == 0 {
                            right = Some(band[i - 1]);
                            break;
                        }
                    }
                    let right = match right {
                        Some(r) => r,
                        None => break,
                    };
                    self.save_edge_pair(h, left, right);
                }
            }
        }
    }

    /// Clips the normalized output list to the current clip region by
    /// merging both into the input list and renormalizing. An empty clip
    /// region discards all output.
    pub(crate) fn clip_edges(&mut self, mode: FillMode) {
        debug_assert!(self.input.is_empty());
        debug_assert!(mode == FillMode::Intersect || mode == FillMode::Exclude);

        // The output list may be empty if the shape is so tiny that it
        // fell into a crack between pixels
        if self.output.is_empty() {
            return;
        }
        if self.clip.is_empty() {
            self.output.reset();
            return;
        }
        mem::swap(&mut self.input, &mut self.output);
        self.input.extend_from(&self.clip);
        self.normalize_edges(mode);
    }

    /// Adopts the output list as the new clip region. Returns false if
    /// the new clip region is empty.
    pub fn set_clip_list(&mut self) -> bool {
        if self.output.is_empty() {
            self.clip.reset();
            return false;
        }
        mem::swap(&mut self.clip, &mut self.output);
        self.output.reset();
        debug!("clip region set: {} edges", self.clip.count());
        true
    }

    /// Saves a deep copy of the current clip region for a later
    /// [swap_clip_region](EdgeManager::swap_clip_region). Returns false
    /// if the current clip region is empty.
    pub fn save_clip_region(&mut self) -> bool {
        self.saved.reset();
        if self.clip.is_empty() {
            return false;
        }
        self.saved.extend_from(&self.clip);
        true
    }

    /// Exchanges the active clip region with the saved one. Returns
    /// false if the newly active clip region is empty.
    pub fn swap_clip_region(&mut self) -> bool {
        mem::swap(&mut self.clip, &mut self.saved);
        !self.clip.is_empty()
    }

    /// Reverses the direction of every edge in the output list
    pub fn reverse_edges(&mut self) {
        for e in self.output.iter_mut() {
            e.dy = -e.dy;
        }
    }

    /// Translates every edge in the input list by whole pixels
    pub fn translate_edges(&mut self, x: i32, y: i32) {
        let xfix = x << FIX_SHIFT;
        for e in self.input.iter_mut() {
            e.xtop += xfix;
            e.ytop += y;
        }
    }

    /// Sets the clip region to a device rectangle. A rectangle of zero
    /// or negative area leaves the clip region empty, and every
    /// subsequent fill is discarded until a new region is set.
    pub fn set_device_clip_rect(&mut self, rect: &Rect) {
        debug_assert!(self.input.is_empty());
        if rect.w <= 0 || rect.h <= 0 {
            self.clip.reset();
            self.saved.reset();
            return;
        }
        // Only the left and right sides are needed; the horizontal top
        // and bottom would be discarded at attachment anyway
        let y1 = rect.y << FIX_SHIFT;
        let y2 = y1 + (rect.h << FIX_SHIFT);
        let x1 = rect.x << FIX_SHIFT;
        let x2 = x1 + (rect.w << FIX_SHIFT);
        self.attach_edge(Vert16::new(x1, y1), Vert16::new(x1, y2));
        self.attach_edge(Vert16::new(x2, y2), Vert16::new(x2, y1)); // reverse direction
        mem::swap(&mut self.clip, &mut self.input);
        self.input.reset();
    }

    /// Moves the output list to the render list and feeds it to the
    /// renderer one span at a time. Returns false without rendering if
    /// the output list is empty.
    pub fn fill_edge_list(&mut self, renderer: &mut dyn Renderer) -> bool {
        if self.output.is_empty() {
            return false;
        }
        mem::swap(&mut self.render, &mut self.output);
        self.output.reset();
        let mut feeder = EdgeFeeder::new(self.render.as_slice());
        renderer.render_shape(&mut feeder);
        true
    }

    /// The normalized output list, as left by the latest pass
    pub fn output_edges(&self) -> &[Edge] {
        self.output.as_slice()
    }
}
