//! Image collaborator
//!
//! A loaded image exposes its dimensions and a byte buffer in a declared
//! channel order, tagged with a color space. Sampling supports nearest
//! (repeat addressing) and bilinear (clamp-to-edge) filtering.

use crate::raster::Color;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOrder {
    Rgb,
    Bgr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    Srgb,
    Linear,
}

#[derive(Debug, Clone)]
pub struct Texture {
    pub width: usize,
    pub height: usize,
    /// 3 bytes per texel in `channel_order`
    pub data: Vec<u8>,
    pub channel_order: ChannelOrder,
    pub color_space: ColorSpace,
    pub name: String,
}

impl Texture {
    /// Load a texture from a PNG/JPEG/BMP file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let img = image::open(path)
            .map_err(|e| format!("Failed to load {}: {}", path.display(), e))?;

        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        println!("Loaded texture: {} ({}x{})", name, width, height);
        Ok(Self {
            width: width as usize,
            height: height as usize,
            data: rgb.into_raw(),
            channel_order: ChannelOrder::Rgb,
            color_space: ColorSpace::Srgb,
            name,
        })
    }

    /// Decode a texture from raw image bytes
    pub fn from_bytes(bytes: &[u8], name: String) -> Result<Self, String> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| format!("Failed to decode image: {}", e))?;
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        Ok(Self {
            width: width as usize,
            height: height as usize,
            data: rgb.into_raw(),
            channel_order: ChannelOrder::Rgb,
            color_space: ColorSpace::Srgb,
            name,
        })
    }

    /// Checkerboard test texture (4-texel squares)
    pub fn checkerboard(width: usize, height: usize, color1: Color, color2: Color) -> Self {
        let mut data = Vec::with_capacity(width * height * 3);
        for y in 0..height {
            for x in 0..width {
                let checker = ((x / 4) + (y / 4)) % 2 == 0;
                let c = if checker { color1 } else { color2 };
                data.extend_from_slice(&c.to_bytes());
            }
        }
        Self {
            width,
            height,
            data,
            channel_order: ChannelOrder::Rgb,
            color_space: ColorSpace::Linear,
            name: "checkerboard".to_string(),
        }
    }

    fn texel(&self, x: usize, y: usize) -> Color {
        let idx = (y * self.width + x) * 3;
        match self.channel_order {
            ChannelOrder::Rgb => Color::new(self.data[idx], self.data[idx + 1], self.data[idx + 2]),
            ChannelOrder::Bgr => Color::new(self.data[idx + 2], self.data[idx + 1], self.data[idx]),
        }
    }

    /// Swap between RGB and BGR storage in place
    pub fn swap_channel_order(&mut self) {
        for texel in self.data.chunks_exact_mut(3) {
            texel.swap(0, 2);
        }
        self.channel_order = match self.channel_order {
            ChannelOrder::Rgb => ChannelOrder::Bgr,
            ChannelOrder::Bgr => ChannelOrder::Rgb,
        };
    }

    /// Convert sRGB-tagged data to linear in place (no-op when already linear)
    pub fn to_linear(&mut self) {
        if self.color_space == ColorSpace::Linear {
            return;
        }
        for byte in self.data.iter_mut() {
            let c = *byte as f32 / 255.0;
            *byte = (c.powf(2.2) * 255.0 + 0.5) as u8;
        }
        self.color_space = ColorSpace::Linear;
    }

    /// Nearest-texel sample with repeat addressing
    pub fn sample_nearest(&self, u: f32, v: f32) -> Color {
        let x = ((u * self.width as f32) as isize).rem_euclid(self.width as isize) as usize;
        let y = ((v * self.height as f32) as isize).rem_euclid(self.height as isize) as usize;
        self.texel(x, y)
    }

    /// Bilinear sample with clamp-to-edge addressing
    pub fn sample_bilinear(&self, u: f32, v: f32) -> Color {
        let fx = (u * self.width as f32 - 0.5).clamp(0.0, (self.width - 1) as f32);
        let fy = (v * self.height as f32 - 0.5).clamp(0.0, (self.height - 1) as f32);
        let x0 = fx.floor() as usize;
        let y0 = fy.floor() as usize;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let tx = fx - x0 as f32;
        let ty = fy - y0 as f32;

        let top = self.texel(x0, y0).lerp(self.texel(x1, y0), tx);
        let bottom = self.texel(x0, y1).lerp(self.texel(x1, y1), tx);
        top.lerp(bottom, ty)
    }
}
