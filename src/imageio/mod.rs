use std::path::Path;
use anyhow::anyhow;
use crate::Vec3f;
use crate::spectrum::{Spectrum, spectrum_into_rgb8};

/// Pack display-ready values (already tone mapped and gamma corrected) into an 8-bit image.
pub fn spectrum_to_image(img: &[Spectrum], (w, h): (u32, u32)) -> anyhow::Result<image::RgbImage> {
    let rgb_buf: Vec<u8> = img.iter()
        .flat_map(|s| spectrum_into_rgb8(*s).to_vec())
        .collect();
    image::RgbImage::from_raw(w, h, rgb_buf)
        .ok_or_else(|| anyhow!("{} pixels do not fill a {}x{} image", img.len(), w, h))
}

pub fn write_png(path: impl AsRef<Path>, img: &[Spectrum], resolution: (u32, u32)) -> anyhow::Result<()> {
    let path = path.as_ref();
    spectrum_to_image(img, resolution)?.save_with_format(path, image::ImageFormat::Png)?;
    tracing::debug!("wrote {}", path.display());
    Ok(())
}

/// Map unit normals from `[-1, 1]` to `[0, 1]` for viewing.
pub fn normals_to_spectrum(normals: &[Vec3f]) -> Vec<Spectrum> {
    normals.iter()
        .map(|n| Spectrum::new(n.x * 0.5 + 0.5, n.y * 0.5 + 0.5, n.z * 0.5 + 0.5))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_mismatch_is_an_error() {
        let img = vec![Spectrum::one(); 5];
        assert!(spectrum_to_image(&img, (2, 3)).is_err());
        let img = spectrum_to_image(&img[..4], (2, 2)).unwrap();
        assert_eq!(img.get_pixel(1, 1).0, [255, 255, 255]);
    }

    #[test]
    fn test_normals_map_to_unit_range() {
        let s = normals_to_spectrum(&[vec3f!(0, 0, 1), vec3f!(-1, 0, 0)]);
        assert_eq!(s[0], Spectrum::new(0.5, 0.5, 1.0));
        assert_eq!(s[1], Spectrum::new(0.0, 0.5, 0.5));
    }
}
