//! Layered portrait compositor.
//!
//! Draws up to three layers in z-order (base, face, hair) into a frame of
//! any size. The first present layer is the reference: its size decides a
//! single uniform scale and a centred placement shared by every layer.

use std::borrow::Cow;

use clap::ValueEnum;
use image::imageops::{self, FilterType};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// Resampling filter used when scaling layers to the placement size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    /// Nearest neighbour, for pixel art.
    Nearest,
    /// Bilinear.
    #[default]
    Bilinear,
}

impl Interpolation {
    fn filter(self) -> FilterType {
        match self {
            Interpolation::Nearest => FilterType::Nearest,
            Interpolation::Bilinear => FilterType::Triangle,
        }
    }
}

/// Where the scaled layers land inside the target frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub scale: f64,
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl Placement {
    /// Uniform scale-to-fit of a `ref_w`×`ref_h` image into `target_w`×`target_h`, centred.
    ///
    /// Returns `None` when either size has a zero dimension or the fitted
    /// size rounds down to nothing.
    pub fn fit(ref_w: u32, ref_h: u32, target_w: u32, target_h: u32) -> Option<Self> {
        if ref_w == 0 || ref_h == 0 || target_w == 0 || target_h == 0 {
            return None;
        }

        let scale = (target_w as f64 / ref_w as f64).min(target_h as f64 / ref_h as f64);
        let width = ((ref_w as f64 * scale).round() as u32).min(target_w);
        let height = ((ref_h as f64 * scale).round() as u32).min(target_h);
        if width == 0 || height == 0 {
            return None;
        }

        Some(Self {
            scale,
            x: ((target_w - width) / 2) as i64,
            y: ((target_h - height) / 2) as i64,
            width,
            height,
        })
    }
}

/// The selected image of each layer. Absent layers are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayerStack<'a> {
    pub base: Option<&'a RgbaImage>,
    pub face: Option<&'a RgbaImage>,
    pub hair: Option<&'a RgbaImage>,
}

impl<'a> LayerStack<'a> {
    pub fn new(
        base: Option<&'a RgbaImage>,
        face: Option<&'a RgbaImage>,
        hair: Option<&'a RgbaImage>,
    ) -> Self {
        Self { base, face, hair }
    }

    /// The first present layer, in base, face, hair priority.
    pub fn reference(&self) -> Option<&'a RgbaImage> {
        self.base.or(self.face).or(self.hair)
    }

    /// Present layers in draw order.
    pub fn layers(&self) -> impl Iterator<Item = &'a RgbaImage> {
        [self.base, self.face, self.hair].into_iter().flatten()
    }
}

/// Square bounding the largest circle inscribed in a `width`×`height` frame,
/// as `(x, y, diameter)`.
pub fn circle_bounds(width: u32, height: u32) -> (u32, u32, u32) {
    let diameter = width.min(height);
    ((width - diameter) / 2, (height - diameter) / 2, diameter)
}

/// Clear every pixel whose centre lies outside the inscribed circle.
pub fn apply_circle_clip(frame: &mut RgbaImage) {
    let (x, y, diameter) = circle_bounds(frame.width(), frame.height());
    let radius = diameter as f64 / 2.0;
    let cx = x as f64 + radius;
    let cy = y as f64 + radius;
    let r2 = radius * radius;

    for (px, py, pixel) in frame.enumerate_pixels_mut() {
        let dx = px as f64 + 0.5 - cx;
        let dy = py as f64 + 0.5 - cy;
        if dx * dx + dy * dy > r2 {
            pixel.0 = [0, 0, 0, 0];
        }
    }
}

/// Renders layer stacks into fresh frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct Compositor {
    interpolation: Interpolation,
}

impl Compositor {
    pub fn new(interpolation: Interpolation) -> Self {
        Self { interpolation }
    }

    /// Render `stack` into a new `width`×`height` frame.
    ///
    /// An empty stack yields a fully transparent frame.
    pub fn render(
        &self,
        width: u32,
        height: u32,
        stack: &LayerStack<'_>,
        circle_clip: bool,
    ) -> RgbaImage {
        let mut frame = RgbaImage::new(width, height);

        let Some(reference) = stack.reference() else {
            return frame;
        };
        let Some(placement) = Placement::fit(reference.width(), reference.height(), width, height)
        else {
            return frame;
        };

        for layer in stack.layers() {
            let scaled = self.scale(layer, placement.width, placement.height);
            imageops::overlay(&mut frame, &*scaled, placement.x, placement.y);
        }

        if circle_clip {
            apply_circle_clip(&mut frame);
        }

        frame
    }

    /// Render for export: with `circle_clip`, the frame is cropped to the
    /// circle's bounding square.
    pub fn export_frame(
        &self,
        width: u32,
        height: u32,
        stack: &LayerStack<'_>,
        circle_clip: bool,
    ) -> RgbaImage {
        let frame = self.render(width, height, stack, circle_clip);
        if !circle_clip {
            return frame;
        }

        let (x, y, diameter) = circle_bounds(width, height);
        imageops::crop_imm(&frame, x, y, diameter, diameter).to_image()
    }

    /// Resample in premultiplied space so transparent texels carry no colour
    /// into the edges of a layer.
    fn scale<'i>(&self, image: &'i RgbaImage, width: u32, height: u32) -> Cow<'i, RgbaImage> {
        if image.dimensions() == (width, height) {
            return Cow::Borrowed(image);
        }

        let mut premultiplied = image.clone();
        premultiply_in_place(&mut premultiplied);
        let mut scaled =
            imageops::resize(&premultiplied, width, height, self.interpolation.filter());
        unpremultiply_in_place(&mut scaled);
        Cow::Owned(scaled)
    }
}

fn premultiply_in_place(image: &mut RgbaImage) {
    for px in image.pixels_mut() {
        let a = u16::from(px[3]);
        if a == 255 {
            continue;
        }
        for c in &mut px.0[..3] {
            *c = ((u16::from(*c) * a + 127) / 255) as u8;
        }
    }
}

fn unpremultiply_in_place(image: &mut RgbaImage) {
    for px in image.pixels_mut() {
        let a = u16::from(px[3]);
        match a {
            255 => {}
            0 => px.0[..3].fill(0),
            _ => {
                for c in &mut px.0[..3] {
                    *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
    const CLEAR: [u8; 4] = [0, 0, 0, 0];

    fn solid(width: u32, height: u32, colour: Rgba<u8>) -> RgbaImage {
        RgbaImage::from_pixel(width, height, colour)
    }

    /// Left half `colour`, right half transparent.
    fn left_half(width: u32, height: u32, colour: Rgba<u8>) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, _| {
            if x < width / 2 {
                colour
            } else {
                Rgba(CLEAR)
            }
        })
    }

    fn nearest() -> Compositor {
        Compositor::new(Interpolation::Nearest)
    }

    #[test]
    fn test_fit_square_into_square() {
        let placement = Placement::fit(512, 512, 420, 420).unwrap();

        assert_eq!(placement.scale, 0.8203125);
        assert_eq!((placement.width, placement.height), (420, 420));
        assert_eq!((placement.x, placement.y), (0, 0));
    }

    #[test]
    fn test_fit_wide_image_is_centred_vertically() {
        let placement = Placement::fit(400, 200, 420, 420).unwrap();

        assert_eq!((placement.width, placement.height), (420, 210));
        assert_eq!((placement.x, placement.y), (0, 105));
    }

    #[test]
    fn test_fit_preserves_aspect_and_bounds() {
        let refs = [(512, 512), (300, 700), (1920, 1080), (7, 3), (1, 1000)];
        let targets = [(420, 420), (640, 480), (99, 301), (1, 1)];

        for &(rw, rh) in &refs {
            for &(tw, th) in &targets {
                let Some(p) = Placement::fit(rw, rh, tw, th) else {
                    continue;
                };
                assert!(p.width <= tw && p.height <= th, "{rw}x{rh} in {tw}x{th}");
                assert!(p.width == tw || p.height == th, "{rw}x{rh} in {tw}x{th} does not fill");

                let skew = (p.width as f64 * rh as f64 - p.height as f64 * rw as f64).abs();
                assert!(skew <= (rw + rh) as f64 / 2.0 + 1.0, "{rw}x{rh} in {tw}x{th} skewed");
            }
        }
    }

    #[test]
    fn test_fit_rejects_zero_dimensions() {
        assert!(Placement::fit(0, 10, 420, 420).is_none());
        assert!(Placement::fit(10, 10, 0, 420).is_none());
        assert!(Placement::fit(1, 1000, 1, 1).is_none());
    }

    #[test]
    fn test_render_empty_stack_is_transparent() {
        let frame = Compositor::default().render(420, 420, &LayerStack::default(), false);

        assert_eq!(frame.dimensions(), (420, 420));
        assert!(frame.pixels().all(|p| p.0 == CLEAR));
    }

    #[test]
    fn test_render_later_layers_draw_over_earlier() {
        let base = solid(4, 4, RED);
        let hair = left_half(4, 4, BLUE);
        let stack = LayerStack::new(Some(&base), None, Some(&hair));

        let frame = nearest().render(40, 40, &stack, false);

        assert_eq!(*frame.get_pixel(5, 20), BLUE);
        // transparent half of the hair shows the base
        assert_eq!(*frame.get_pixel(35, 20), RED);
    }

    #[test]
    fn test_render_centres_reference() {
        let base = solid(2, 1, RED);
        let stack = LayerStack::new(Some(&base), None, None);

        let frame = nearest().render(10, 10, &stack, false);

        // 10x5 band at y = 2..7
        assert_eq!(frame.get_pixel(0, 1).0, CLEAR);
        assert_eq!(*frame.get_pixel(0, 2), RED);
        assert_eq!(*frame.get_pixel(9, 6), RED);
        assert_eq!(frame.get_pixel(9, 7).0, CLEAR);
    }

    #[test]
    fn test_reference_falls_through_to_face() {
        let face = solid(1, 2, BLUE);
        let hair = solid(8, 8, RED);
        let stack = LayerStack::new(None, Some(&face), Some(&hair));

        assert_eq!(stack.reference().unwrap().dimensions(), (1, 2));

        let frame = nearest().render(10, 10, &stack, false);

        // hair is squeezed into the face's 5x10 placement
        assert_eq!(frame.get_pixel(1, 5).0, CLEAR);
        assert_eq!(*frame.get_pixel(4, 5), RED);
        assert_eq!(frame.get_pixel(8, 5).0, CLEAR);
    }

    #[test]
    fn test_circle_clip_clears_corners_only() {
        let base = solid(8, 8, RED);
        let stack = LayerStack::new(Some(&base), None, None);
        let compositor = nearest();

        let clipped = compositor.render(420, 420, &stack, true);
        let plain = compositor.render(420, 420, &stack, false);

        for (x, y) in [(0, 0), (419, 0), (0, 419), (419, 419)] {
            assert_eq!(clipped.get_pixel(x, y).0, CLEAR);
        }
        for (x, y) in [(210, 210), (209, 209), (10, 210), (210, 10)] {
            assert_eq!(clipped.get_pixel(x, y), plain.get_pixel(x, y));
        }
    }

    #[test]
    fn test_circle_bounds() {
        assert_eq!(circle_bounds(420, 420), (0, 0, 420));
        assert_eq!(circle_bounds(600, 400), (100, 0, 400));
        assert_eq!(circle_bounds(300, 500), (0, 100, 300));
    }

    #[test]
    fn test_export_frame_crops_to_circle() {
        let base = solid(8, 8, RED);
        let stack = LayerStack::new(Some(&base), None, None);
        let compositor = Compositor::default();

        let square = compositor.export_frame(420, 420, &stack, true);
        assert_eq!(square.dimensions(), (420, 420));
        assert_eq!(square.get_pixel(0, 0).0, CLEAR);
        assert_eq!(
            square.get_pixel(210, 210),
            compositor.render(420, 420, &stack, false).get_pixel(210, 210)
        );

        let wide = compositor.export_frame(600, 400, &stack, true);
        assert_eq!(wide.dimensions(), (400, 400));

        let full = compositor.export_frame(600, 400, &stack, false);
        assert_eq!(full.dimensions(), (600, 400));
    }

    #[test]
    fn test_render_is_deterministic() {
        let base = RgbaImage::from_fn(13, 17, |x, y| Rgba([(x * 19) as u8, (y * 15) as u8, 90, 255]));
        let face = left_half(13, 17, Rgba([10, 200, 30, 128]));
        let stack = LayerStack::new(Some(&base), Some(&face), None);
        let compositor = Compositor::default();

        let first = compositor.render(420, 300, &stack, true);
        let second = compositor.render(420, 300, &stack, true);

        assert_eq!(first.as_raw(), second.as_raw());
    }

    #[test]
    fn test_scaled_edges_keep_layer_colour() {
        let layer = left_half(512, 512, Rgba([255, 255, 255, 255]));

        let scaled = Compositor::default().scale(&layer, 420, 420);

        let partial = scaled.pixels().filter(|px| px[3] > 0 && px[3] < 255).count();
        assert!(partial > 0, "bilinear resize should soften the edge");
        for (x, y, px) in scaled.enumerate_pixels() {
            if px[3] > 0 {
                assert_eq!(px.0[..3], [255, 255, 255], "dark fringe at ({x}, {y})");
            }
        }
    }
}
