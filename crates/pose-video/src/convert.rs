//! Pixel format conversions into RGBA8.
//!
//! All converters write into a caller buffer of exactly `width * height * 4`
//! bytes and fail instead of reallocating it.

use crate::{BYTES_PER_PIXEL, VideoError};
use pose_base::Vec2;

fn check_len(what: &str, got: usize, expected: usize) -> Result<(), VideoError> {
    if got != expected {
        return Err(VideoError::Decode(format!(
            "{what}: expected {expected} bytes, got {got}"
        )));
    }
    Ok(())
}

// BT.601 YUV-to-RGB conversion for a single pixel (fixed-point, shift 8)
pub(crate) fn yuv_to_rgb(y: u8, u: u8, v: u8) -> (u8, u8, u8) {
    let y = y as i32;
    let u = u as i32 - 128;
    let v = v as i32 - 128;
    let r = (y + ((359 * v) >> 8)).clamp(0, 255) as u8;
    let g = (y - ((88 * u + 183 * v) >> 8)).clamp(0, 255) as u8;
    let b = (y + ((454 * u) >> 8)).clamp(0, 255) as u8;
    (r, g, b)
}

/// Packed YUYV 4:2:2, two pixels per four bytes.
pub fn yuyv_to_rgba(size: Vec2<usize>, src: &[u8], dst: &mut [u8]) -> Result<(), VideoError> {
    check_len("yuyv source", src.len(), size.area() * 2)?;
    check_len("rgba destination", dst.len(), size.area() * BYTES_PER_PIXEL)?;
    for (yuyv, out) in src.chunks_exact(4).zip(dst.chunks_exact_mut(8)) {
        let (r0, g0, b0) = yuv_to_rgb(yuyv[0], yuyv[1], yuyv[3]);
        let (r1, g1, b1) = yuv_to_rgb(yuyv[2], yuyv[1], yuyv[3]);
        out.copy_from_slice(&[r0, g0, b0, 0xFF, r1, g1, b1, 0xFF]);
    }
    Ok(())
}

pub fn rgb_to_rgba(size: Vec2<usize>, src: &[u8], dst: &mut [u8]) -> Result<(), VideoError> {
    check_len("rgb source", src.len(), size.area() * 3)?;
    check_len("rgba destination", dst.len(), size.area() * BYTES_PER_PIXEL)?;
    for (rgb, out) in src.chunks_exact(3).zip(dst.chunks_exact_mut(4)) {
        out.copy_from_slice(&[rgb[0], rgb[1], rgb[2], 0xFF]);
    }
    Ok(())
}

/// Decode a JPEG (MJPG camera frame) and write it as RGBA.
pub fn jpeg_to_rgba(size: Vec2<usize>, src: &[u8], dst: &mut [u8]) -> Result<(), VideoError> {
    let decoded =
        crates_image::load_from_memory_with_format(src, crates_image::ImageFormat::Jpeg)?;
    let rgba = decoded.to_rgba8();
    let (w, h) = rgba.dimensions();
    if (w as usize, h as usize) != (size.x, size.y) {
        return Err(VideoError::Decode(format!(
            "jpeg is {}x{}, expected {}x{}",
            w, h, size.x, size.y
        )));
    }
    check_len("rgba destination", dst.len(), size.area() * BYTES_PER_PIXEL)?;
    dst.copy_from_slice(rgba.as_raw());
    Ok(())
}

/// Pack RGBA8 into `0xAARRGGBB` words for framebuffer windows, reusing `dst`.
pub fn rgba_to_argb_u32(src: &[u8], dst: &mut Vec<u32>) {
    dst.clear();
    dst.extend(src.chunks_exact(4).map(|p| {
        (p[3] as u32) << 24 | (p[0] as u32) << 16 | (p[1] as u32) << 8 | p[2] as u32
    }));
}
