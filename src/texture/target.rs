//! Drawing seam between the scene and a presentation backend.
//!
//! Every backend samples nearest-neighbour: the character sheets are pixel-art adjacent
//! and must never be blurred when scaled.

use glam::Vec2;

use crate::texture::raster::RasterImage;
use crate::texture::sprite::FrameRect;

/// A straight (non-premultiplied) RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// A destination rectangle in playfield coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// A rectangle of `size` centered on `center`.
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self {
            pos: center - size * 0.5,
            size,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }
}

/// Anything the scene can be drawn onto.
pub trait DrawTarget {
    /// Size of the target, in pixels.
    fn size(&self) -> (u32, u32);

    fn clear(&mut self, color: Color);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// Draws `src` from `image` scaled into `dest`, mirrored about the destination's
    /// vertical centerline when `flip_horizontal` is set.
    fn blit(&mut self, image: &RasterImage, src: FrameRect, dest: Rect, flip_horizontal: bool);
}

/// A CPU-side RGBA framebuffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    image: RasterImage,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RasterImage::filled(width, height, Color::TRANSPARENT.to_array()),
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.pixel(x, y)
    }

    /// Integer pixel span covered by `rect`, clipped to the framebuffer.
    fn span(&self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        let x0 = rect.pos.x.round().max(0.0) as u32;
        let y0 = rect.pos.y.round().max(0.0) as u32;
        let x1 = ((rect.pos.x + rect.size.x).round().max(0.0) as u32).min(self.image.width());
        let y1 = ((rect.pos.y + rect.size.y).round().max(0.0) as u32).min(self.image.height());
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }

    fn blend(&mut self, x: u32, y: u32, src: [u8; 4]) {
        let alpha = src[3] as u32;
        if alpha == 0 {
            return;
        }
        if alpha == 255 {
            self.image.put_pixel(x, y, src);
            return;
        }

        let dst = self.image.pixel(x, y);
        let inv = 255 - alpha;
        let mix = |s: u8, d: u8| ((s as u32 * alpha + d as u32 * inv + 127) / 255) as u8;
        let out_alpha = (alpha + (dst[3] as u32 * inv + 127) / 255).min(255) as u8;
        self.image
            .put_pixel(x, y, [mix(src[0], dst[0]), mix(src[1], dst[1]), mix(src[2], dst[2]), out_alpha]);
    }
}

impl DrawTarget for Framebuffer {
    fn size(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    fn clear(&mut self, color: Color) {
        self.image = RasterImage::filled(self.image.width(), self.image.height(), color.to_array());
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some((x0, y0, x1, y1)) = self.span(rect) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                self.blend(x, y, color.to_array());
            }
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let bounds = Rect::centered(center, Vec2::splat(radius * 2.0));
        let Some((x0, y0, x1, y1)) = self.span(bounds) else {
            return;
        };
        let r2 = radius * radius;
        for y in y0..y1 {
            for x in x0..x1 {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - center;
                if d.length_squared() <= r2 {
                    self.blend(x, y, color.to_array());
                }
            }
        }
    }

    fn blit(&mut self, image: &RasterImage, src: FrameRect, dest: Rect, flip_horizontal: bool) {
        if src.is_empty() || dest.size.x <= 0.0 || dest.size.y <= 0.0 {
            return;
        }
        let Some((x0, y0, x1, y1)) = self.span(dest) else {
            return;
        };

        // Clip the source to the image so a stale rectangle can never read out of bounds.
        let src_w = src.width.min(image.width().saturating_sub(src.x));
        let src_h = src.height.min(image.height().saturating_sub(src.y));
        if src_w == 0 || src_h == 0 {
            return;
        }

        for y in y0..y1 {
            let v = ((y as f32 + 0.5 - dest.pos.y) / dest.size.y).clamp(0.0, 1.0);
            let sy = src.y + ((v * src_h as f32) as u32).min(src_h - 1);
            for x in x0..x1 {
                let u = ((x as f32 + 0.5 - dest.pos.x) / dest.size.x).clamp(0.0, 1.0);
                let mut sx = ((u * src_w as f32) as u32).min(src_w - 1);
                if flip_horizontal {
                    sx = src_w - 1 - sx;
                }
                self.blend(x, y, image.pixel(src.x + sx, sy));
            }
        }
    }
}
