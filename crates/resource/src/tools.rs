use anyhow::{bail, Result};
use wgpu::TextureFormat;

use crate::{Image, ImageMipMap};

pub const RGBA8_PIXEL_SIZE: u32 = 4;

/// Number of levels down to 1x1.
pub fn full_mip_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

pub fn generate_rgba8_mip_map(image: Image, mip_map_count: u32) -> Result<ImageMipMap> {
    match image.format {
        TextureFormat::Rgba8Unorm
        | TextureFormat::Rgba8UnormSrgb
        | TextureFormat::Rgba8Snorm
        | TextureFormat::Rgba8Uint
        | TextureFormat::Rgba8Sint => {}
        f => bail!("rgba8 mip generation got {:?}", f),
    };
    if image.data.len() != (image.width * image.height * RGBA8_PIXEL_SIZE) as usize {
        bail!("image data does not match {}x{}", image.width, image.height);
    }
    let mut mips = ImageMipMap {
        data: vec![image.data],
        width: image.width,
        height: image.height,
        format: image.format,
    };
    for mip_i in 1..mip_map_count.max(1) {
        let src = mips.extent_3d(mip_i - 1);
        let dst = mips.extent_3d(mip_i);
        let prev = &mips.data[mip_i as usize - 1];
        let mut mip = vec![0u8; (dst.width * dst.height * RGBA8_PIXEL_SIZE) as usize];
        for y in 0..dst.height {
            for x in 0..dst.width {
                let mut sum = [0u32; 4];
                for dy in 0..2 {
                    for dx in 0..2 {
                        // odd sizes reuse the last row/column
                        let sx = (x * 2 + dx).min(src.width - 1);
                        let sy = (y * 2 + dy).min(src.height - 1);
                        let i = ((sy * src.width + sx) * RGBA8_PIXEL_SIZE) as usize;
                        for c in 0..4 {
                            sum[c] += prev[i + c] as u32;
                        }
                    }
                }
                let o = ((y * dst.width + x) * RGBA8_PIXEL_SIZE) as usize;
                for c in 0..4 {
                    mip[o + c] = ((sum[c] + 2) / 4) as u8;
                }
            }
        }
        mips.data.push(mip);
    }
    log::debug!(
        "generated {} mip levels for {}x{}",
        mips.data.len(),
        mips.width,
        mips.height
    );
    Ok(mips)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, px: [u8; 4]) -> Image {
        Image {
            data: px.repeat((width * height) as usize),
            width,
            height,
            channels: 4,
            format: TextureFormat::Rgba8UnormSrgb,
        }
    }

    #[test]
    fn mip_count() {
        assert_eq!(full_mip_count(1, 1), 1);
        assert_eq!(full_mip_count(256, 256), 9);
        assert_eq!(full_mip_count(300, 20), 9);
    }

    #[test]
    fn chain_sizes_halve() {
        let img = solid(8, 2, [10, 20, 30, 255]);
        let count = full_mip_count(8, 2);
        let mips = generate_rgba8_mip_map(img, count).unwrap();
        assert_eq!(mips.mip_map_count(), 4);
        let sizes: Vec<_> = (0..4)
            .map(|i| {
                let e = mips.extent_3d(i);
                (e.width, e.height)
            })
            .collect();
        assert_eq!(sizes, vec![(8, 2), (4, 1), (2, 1), (1, 1)]);
        for (i, d) in mips.data.iter().enumerate() {
            let e = mips.extent_3d(i as u32);
            assert_eq!(d.len(), (e.width * e.height * 4) as usize);
            assert_eq!(&d[..4], &[10, 20, 30, 255]);
        }
    }

    #[test]
    fn box_filter_averages() {
        let mut img = solid(2, 2, [0, 0, 0, 255]);
        img.data[0..4].copy_from_slice(&[200, 100, 40, 255]);
        let mips = generate_rgba8_mip_map(img, 2).unwrap();
        assert_eq!(&mips.data[1][..], &[50, 25, 10, 255]);
    }

    #[test]
    fn rejects_other_formats() {
        let mut img = solid(1, 1, [0; 4]);
        img.format = TextureFormat::R8Unorm;
        assert!(generate_rgba8_mip_map(img, 1).is_err());
    }
}
