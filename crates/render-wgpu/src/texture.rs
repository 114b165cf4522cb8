use std::path::Path;

/// Errors from texture loading.
///
/// A missing or undecodable file is recoverable: callers are expected to log
/// it and fall back to [`Texture::fallback_crosshair`].
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to load image: {0}")]
    Load(#[from] image::ImageError),
}

/// A 2D RGBA texture with its view and sampler.
pub struct Texture {
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl Texture {
    /// Decode an image file and upload it as an sRGB RGBA texture.
    pub fn from_path(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: impl AsRef<Path>,
    ) -> Result<Self, TextureError> {
        let image = image::open(path.as_ref())?;
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        tracing::debug!(path = %path.as_ref().display(), width, height, "texture loaded");
        Ok(Self::from_rgba(device, queue, &rgba, width, height))
    }

    /// Upload raw RGBA8 pixels.
    pub fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pixels: &[u8],
        width: u32,
        height: u32,
    ) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("hud_texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self { view, sampler }
    }

    /// Built-in 16x16 crosshair used when the texture file cannot be read:
    /// a one-pixel white cross on black.
    pub fn fallback_crosshair(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let pixels = crosshair_pixels(16);
        Self::from_rgba(device, queue, &pixels, 16, 16)
    }
}

fn crosshair_pixels(size: u32) -> Vec<u8> {
    let mid = size / 2;
    let mut pixels = vec![0u8; (size * size * 4) as usize];
    for y in 0..size {
        for x in 0..size {
            let on_cross = x == mid || x == mid - 1 || y == mid || y == mid - 1;
            if on_cross {
                let i = ((y * size + x) * 4) as usize;
                pixels[i..i + 4].copy_from_slice(&[255, 255, 255, 255]);
            }
        }
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crosshair_pattern_marks_center_rows_and_columns() {
        let size = 16u32;
        let pixels = crosshair_pixels(size);
        assert_eq!(pixels.len(), (size * size * 4) as usize);

        let at = |x: u32, y: u32| pixels[((y * size + x) * 4) as usize];
        assert_eq!(at(8, 3), 255, "vertical bar");
        assert_eq!(at(3, 8), 255, "horizontal bar");
        assert_eq!(at(0, 0), 0, "corner stays dark");
    }
}
