/// 8-bit channel to normalized `[0, 1]`.
#[inline]
pub(crate) fn unorm8_to_unit(v: u8) -> f32 {
    f32::from(v) / 255.0
}

/// Normalized channel back to 8 bits, rounding to nearest.
///
/// Out-of-range and NaN inputs saturate (`as` casts from float clamp in Rust).
#[inline]
pub(crate) fn unit_to_unorm8(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

#[inline]
pub(crate) fn dist_sq3(a: [f32; 3], b: [f32; 3]) -> f32 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    dr * dr + dg * dg + db * db
}

pub(crate) fn gcd_u32(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a.max(1)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
