use std::path::{Path, PathBuf};

use anyhow::Context;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};

/// Side length of the prepared avatar; the template's placeholder is square.
pub const AVATAR_SIZE: u32 = 800;

/// Prepare the user's photo for the template: center-crop to a square on the
/// shorter dimension, resize to the fixed resolution, re-encode as JPEG under
/// a per-name file, then install a copy at the fixed slot the template links.
///
/// Returns the per-name path.
pub fn prepare_avatar(
    source: &Path,
    display_name: &str,
    images_dir: &Path,
    data_dir: &Path,
) -> anyhow::Result<PathBuf> {
    let img = image::open(source)
        .with_context(|| format!("failed to open avatar image '{}'", source.display()))?;

    let resized = center_crop_square(&img).resize_exact(AVATAR_SIZE, AVATAR_SIZE, FilterType::Lanczos3);
    let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());

    std::fs::create_dir_all(images_dir)
        .with_context(|| format!("failed to create images dir '{}'", images_dir.display()))?;
    let dest = images_dir.join(format!("{}_avatar.jpg", file_stem_for(display_name)));
    rgb.save_with_format(&dest, ImageFormat::Jpeg)
        .with_context(|| format!("failed to save avatar to '{}'", dest.display()))?;

    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("failed to create data dir '{}'", data_dir.display()))?;
    let slot = data_dir.join("avatar.jpg");
    std::fs::copy(&dest, &slot)
        .with_context(|| format!("failed to install avatar at '{}'", slot.display()))?;

    tracing::info!(path = %dest.display(), "avatar prepared");
    Ok(dest)
}

fn center_crop_square(img: &DynamicImage) -> DynamicImage {
    let (width, height) = img.dimensions();
    let side = width.min(height);
    let left = (width - side) / 2;
    let top = (height - side) / 2;
    img.crop_imm(left, top, side, side)
}

/// Lowercased name with path-hostile characters stripped.
fn file_stem_for(display_name: &str) -> String {
    display_name
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | ':'))
        .collect()
}
