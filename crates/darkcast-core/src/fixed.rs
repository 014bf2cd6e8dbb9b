use fixed::types::I32F32;

/// Q32.32 fixed-point: 32 integer bits, 32 fractional bits.
pub type Fixed64 = I32F32;

/// Ticks are the atomic unit of simulation time.
pub type Ticks = u64;

/// Convert Fixed64 to f64. Use only for display, never in the sim loop.
#[inline]
pub fn fixed64_to_f64(v: Fixed64) -> f64 {
    v.to_num::<f64>()
}

/// `done / total` as a fraction clamped to `[0, 1]`. A zero `total` counts as
/// finished.
pub fn fraction(done: i64, total: i64) -> Fixed64 {
    if total <= 0 {
        return Fixed64::ONE;
    }
    let done = done.clamp(0, total);
    // Divide in raw bits: totals above i32::MAX do not fit the integer part.
    let bits = (i128::from(done) << 32) / i128::from(total);
    Fixed64::from_bits(bits as i64)
}
