//! Renderers
//!
//! The engine never touches pixels itself: it hands each shape to a
//! [Renderer] as a [ShapeFeeder] and the renderer decides how to paint
//! the pieces. [SolidRenderer] is the bundled minimal renderer, filling
//! every span with one flat color.

use crate::buffer::RasterBuffer;
use crate::feeder::ShapeFeeder;

/// Color as Red, Green, and Blue
#[derive(Debug,Default,Copy,Clone,PartialEq)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
    /// White (255,255,255)
    pub fn white() -> Self {
        Self::new(255, 255, 255)
    }
    /// Black (0,0,0)
    pub fn black() -> Self {
        Self::new(0, 0, 0)
    }
}

/// Handles requests to draw filled shapes
///
/// A renderer drains the feeder it is handed before returning; the
/// feeder is not valid beyond the call.
pub trait Renderer {
    fn render_shape(&mut self, feeder: &mut dyn ShapeFeeder);
}

/// Solid-color renderer over a [RasterBuffer]
#[derive(Debug)]
pub struct SolidRenderer<'a> {
    pub base: &'a mut RasterBuffer,
    pub color: Rgb8,
}

impl<'a> SolidRenderer<'a> {
    /// Creates a renderer painting into `base`, initially in black
    pub fn with_base(base: &'a mut RasterBuffer) -> Self {
        let color = Rgb8::black();
        Self { base, color }
    }
    /// Sets the current color
    pub fn color(&mut self, color: Rgb8) {
        self.color = color;
    }
}

impl<'a> Renderer for SolidRenderer<'a> {
    fn render_shape(&mut self, feeder: &mut dyn ShapeFeeder) {
        while let Some(span) = feeder.next_span() {
            self.base.fill_span(span.x, span.y, span.w, span.h, self.color);
        }
    }
}
