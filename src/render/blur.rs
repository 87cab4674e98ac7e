use rayon::prelude::*;

use crate::foundation::error::{ChoreoError, ChoreoResult};

/// Horizontal gaussian smear of a premultiplied RGBA8 buffer, rows in parallel.
///
/// Used for the stutter layer: a scratch reads as sideways motion, so only the x pass runs.
pub fn motion_blur_rgba8_premul(
    buf: &mut [u8],
    width: u32,
    height: u32,
    radius: u32,
) -> ChoreoResult<()> {
    let row_bytes = (width as usize)
        .checked_mul(4)
        .ok_or_else(|| ChoreoError::render("blur row size overflow"))?;
    if row_bytes == 0 || buf.len() != row_bytes * height as usize {
        return Err(ChoreoError::render(
            "motion blur expects a buffer matching width*height*4",
        ));
    }
    if radius == 0 {
        return Ok(());
    }

    let kernel = gaussian_kernel_q16(radius, radius as f32 * 0.5)?;
    buf.par_chunks_mut(row_bytes).for_each(|row| {
        if row.iter().skip(3).step_by(4).all(|&a| a == 0) {
            return;
        }
        let src = row.to_vec();
        horizontal_pass(&src, row, &kernel);
    });
    Ok(())
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> ChoreoResult<Vec<u32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(ChoreoError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();
    if sum <= 0.0 {
        return Err(ChoreoError::render("gaussian kernel sum is zero"));
    }

    let mut weights: Vec<u32> = weights_f
        .iter()
        .map(|wf| ((wf / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();
    // Push rounding error into the center tap so the kernel sums to exactly 1.0.
    let acc: i64 = weights.iter().map(|&w| i64::from(w)).sum();
    let mid = weights.len() / 2;
    weights[mid] = (i64::from(weights[mid]) + 65536 - acc).clamp(0, 65536) as u32;

    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], k: &[u32]) {
    let radius = (k.len() / 2) as i64;
    let w = (src.len() / 4) as i64;
    for x in 0..w {
        let mut acc = [0u64; 4];
        for (ki, &kw) in k.iter().enumerate() {
            let sx = (x + ki as i64 - radius).clamp(0, w - 1);
            let idx = sx as usize * 4;
            for c in 0..4 {
                acc[c] += u64::from(kw) * u64::from(src[idx + c]);
            }
        }
        let out = x as usize * 4;
        for c in 0..4 {
            dst[out + c] = q16_to_u8(acc[c]);
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + 32768) >> 16).min(255) as u8
}
