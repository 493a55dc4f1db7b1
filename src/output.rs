//! Image file output
//!
//! Helpers for dumping raster buffers to disk and comparing the result
//! against a reference, used by the tests and example programs.
//!
//! See <https://en.wikipedia.org/wiki/Netpbm_format#PPM_example>

use std::path::Path;

/// Reads an image file into raw RGB bytes plus its dimensions
pub fn read_file<P: AsRef<Path>>(filename: P) -> Result<(Vec<u8>, usize, usize), image::ImageError> {
    let img = image::open(filename)?.to_rgb();
    let (w, h) = img.dimensions();
    let buf = img.into_raw();
    Ok((buf, w as usize, h as usize))
}

/// Writes raw RGB bytes as an image file; the format follows the file
/// extension
pub fn write_file<P: AsRef<Path>>(
    buf: &[u8],
    width: usize,
    height: usize,
    filename: P,
) -> Result<(), std::io::Error> {
    image::save_buffer(filename, buf, width as u32, height as u32, image::RGB(8))
}

/// Compares two image files pixel for pixel
///
/// Returns `Ok(true)` only when the dimensions match and every byte is
/// equal; the number of differing bytes is logged otherwise.
pub fn img_diff<P: AsRef<Path>>(f1: P, f2: P) -> Result<bool, image::ImageError> {
    let (d1, w1, h1) = read_file(f1)?;
    let (d2, w2, h2) = read_file(f2)?;
    if w1 != w2 || h1 != h2 || d1.len() != d2.len() {
        log::warn!("img_diff: size mismatch {}x{} vs {}x{}", w1, h1, w2, h2);
        return Ok(false);
    }
    let differing = d1.iter().zip(d2.iter()).filter(|(a, b)| a != b).count();
    if differing != 0 {
        log::warn!("img_diff: {} of {} bytes differ", differing, d1.len());
    }
    Ok(differing == 0)
}
