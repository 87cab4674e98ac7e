use std::{path::Path, sync::Arc};

use anyhow::Context;

use crate::{
    assets::store::PreparedImage,
    foundation::error::{ChoreoError, ChoreoResult},
};

/// Decode an encoded image (PNG, JPEG, ...) into premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> ChoreoResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(ChoreoError::asset("decoded image has zero size"));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Read and decode an image file.
pub fn load_image_file(path: &Path) -> ChoreoResult<PreparedImage> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("read image file '{}'", path.display()))?;
    decode_image(&bytes).map_err(|e| ChoreoError::asset(format!("{}: {e}", path.display())))
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[..3].fill(0);
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * a + 127) / 255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
