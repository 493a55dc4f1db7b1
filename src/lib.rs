//! Device-independent 2-D polygonal shape generation
//!
//! How a shape reaches the display:
//!
//!    path = Path::new(w, h)            -- clip region = whole device
//!    path.move_to / line_to / bezier2 / bezier3 / rectangle
//!      curve ops flatten to line vertices   'flatten_quadratic'
//!    path.fill_path(rule, ren)
//!      attach_edge()      -- segments to edges        'input list'
//!      normalize_edges()  -- banded trapezoid pairs   'output list'
//!      clip_edges()       -- merge with clip region
//!      fill_edge_list()   -- EdgeFeeder drains to the Renderer
//!
//! All device dependencies live behind the [Renderer] trait: the engine
//! produces integer rectangles and fixed-point trapezoids through the
//! [ShapeFeeder] protocol and never touches a pixel itself. Everything
//! inside runs on 16.16 fixed-point integers, so a shape rasterizes
//! identically on every platform.

pub mod buffer;
pub mod curve;
pub mod edge;
pub mod feeder;
pub mod fixed;
pub mod output;
pub mod path;
pub mod pool;
pub mod render;

pub use crate::buffer::*;
pub use crate::curve::*;
pub use crate::edge::*;
pub use crate::feeder::*;
pub use crate::fixed::*;
pub use crate::output::*;
pub use crate::path::*;
pub use crate::pool::*;
pub use crate::render::*;
