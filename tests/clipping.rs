extern crate polyspan;

use polyspan::{FillRule, Path, RasterBuffer, Rect, Rgb8, SolidRenderer};

fn triangle(path: &mut Path) {
    path.move_to(20, 20);
    path.line_to(80, 20);
    path.line_to(50, 80);
    path.close_figure();
}

fn fill_white(path: &mut Path, buf: &mut RasterBuffer) -> bool {
    let mut ren = SolidRenderer::with_base(buf);
    ren.color(Rgb8::white());
    path.fill_path(FillRule::EvenOdd, &mut ren)
}

#[test]
fn clipping_to_the_bounding_box_changes_nothing() {
    let mut plain = RasterBuffer::new(100, 100);
    let mut path = Path::new(100, 100);
    triangle(&mut path);
    assert!(fill_white(&mut path, &mut plain));

    let mut clipped = RasterBuffer::new(100, 100);
    let mut path = Path::new(100, 100);
    path.rectangle(Rect::new(20, 20, 60, 60));
    assert!(path.set_clip_region(FillRule::EvenOdd));
    path.begin_path();
    triangle(&mut path);
    assert!(fill_white(&mut path, &mut clipped));

    assert_eq!(plain.data, clipped.data);
}

#[test]
fn clip_region_intersects_the_fill() {
    let mut buf = RasterBuffer::new(100, 100);
    let mut path = Path::new(100, 100);
    path.rectangle(Rect::new(0, 0, 50, 100));
    assert!(path.set_clip_region(FillRule::EvenOdd));
    path.begin_path();
    path.rectangle(Rect::new(20, 10, 60, 20));
    assert!(fill_white(&mut path, &mut buf));
    // Only the part left of x = 50 survives
    assert_eq!(buf.count_pixels(Rgb8::white()), 30 * 20);
    assert_eq!(buf.pixel(49, 15), Rgb8::white());
    assert_eq!(buf.pixel(50, 15), Rgb8::black());
}

#[test]
fn nested_clip_regions_intersect_each_other() {
    let mut buf = RasterBuffer::new(100, 100);
    let mut path = Path::new(100, 100);
    path.rectangle(Rect::new(0, 0, 60, 100));
    assert!(path.set_clip_region(FillRule::EvenOdd));
    path.begin_path();
    path.rectangle(Rect::new(40, 0, 60, 100));
    assert!(path.set_clip_region(FillRule::EvenOdd));
    path.begin_path();
    path.rectangle(Rect::new(0, 0, 100, 10));
    assert!(fill_white(&mut path, &mut buf));
    // Clip is now the 40..60 column
    assert_eq!(buf.count_pixels(Rgb8::white()), 20 * 10);
}

#[test]
fn mask_region_excludes_the_path_interior() {
    let mut buf = RasterBuffer::new(100, 100);
    let mut path = Path::new(100, 100);
    path.rectangle(Rect::new(30, 30, 40, 40));
    assert!(path.set_mask_region(FillRule::EvenOdd));
    path.begin_path();
    path.rectangle(Rect::new(0, 0, 100, 100));
    assert!(fill_white(&mut path, &mut buf));
    assert_eq!(buf.pixel(50, 50), Rgb8::black()); // inside the mask
    assert_eq!(buf.pixel(10, 50), Rgb8::white());
    assert_eq!(buf.count_pixels(Rgb8::white()), 100 * 100 - 40 * 40);
}

#[test]
fn save_and_swap_restore_a_clip_region() {
    let mut path = Path::new(100, 100);
    path.rectangle(Rect::new(0, 0, 50, 100));
    assert!(path.set_clip_region(FillRule::EvenOdd));
    assert!(path.save_clip_region());

    // Shrink the active region, then swap the saved one back in
    path.begin_path();
    path.rectangle(Rect::new(0, 0, 10, 10));
    assert!(path.set_clip_region(FillRule::EvenOdd));

    let mut small = RasterBuffer::new(100, 100);
    path.begin_path();
    path.rectangle(Rect::new(0, 0, 100, 100));
    assert!(fill_white(&mut path, &mut small));
    assert_eq!(small.count_pixels(Rgb8::white()), 10 * 10);

    assert!(path.swap_clip_region());
    let mut wide = RasterBuffer::new(100, 100);
    path.begin_path();
    path.rectangle(Rect::new(0, 0, 100, 100));
    assert!(fill_white(&mut path, &mut wide));
    assert_eq!(wide.count_pixels(Rgb8::white()), 50 * 100);
}

#[test]
fn reset_clip_region_returns_to_the_device_rectangle() {
    let mut path = Path::new(100, 100);
    path.rectangle(Rect::new(0, 0, 10, 10));
    assert!(path.set_clip_region(FillRule::EvenOdd));
    path.reset_clip_region();

    let mut buf = RasterBuffer::new(100, 100);
    path.begin_path();
    path.rectangle(Rect::new(0, 0, 100, 100));
    assert!(fill_white(&mut path, &mut buf));
    assert_eq!(buf.count_pixels(Rgb8::white()), 100 * 100);
}

#[test]
fn empty_path_never_changes_the_clip_region() {
    let mut path = Path::new(100, 100);
    assert!(!path.set_clip_region(FillRule::EvenOdd)); // nothing to clip to

    // The failed call left the device clip region in place
    let mut buf = RasterBuffer::new(100, 100);
    path.begin_path();
    path.rectangle(Rect::new(0, 0, 100, 100));
    assert!(fill_white(&mut path, &mut buf));
    assert_eq!(buf.count_pixels(Rgb8::white()), 100 * 100);
}

#[test]
fn scroll_position_shifts_the_output() {
    let mut buf = RasterBuffer::new(100, 100);
    let mut path = Path::new(100, 100);
    path.set_scroll_position(10, 20);
    path.rectangle(Rect::new(10, 20, 30, 30));
    assert!(fill_white(&mut path, &mut buf));
    // The scroll displacement is subtracted before filling
    assert_eq!(buf.pixel(0, 0), Rgb8::white());
    assert_eq!(buf.pixel(29, 29), Rgb8::white());
    assert_eq!(buf.pixel(30, 30), Rgb8::black());
    assert_eq!(buf.count_pixels(Rgb8::white()), 30 * 30);
}

#[test]
fn fill_outside_the_device_rectangle_is_discarded() {
    let mut buf = RasterBuffer::new(50, 50);
    let mut path = Path::new(50, 50);
    path.rectangle(Rect::new(40, 40, 100, 100));
    assert!(fill_white(&mut path, &mut buf));
    assert_eq!(buf.count_pixels(Rgb8::white()), 10 * 10);
}
