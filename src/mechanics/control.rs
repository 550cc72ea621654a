/// Control mechanics: moving averages, bounds and signs.

/// Exponential moving average with retention `decay`: decay * x + (1 - decay) * sample.
#[inline]
pub fn ema(x: f64, sample: f64, decay: f64) -> f64 {
    decay * x + (1.0 - decay) * sample
}

/// Clamp to [lo, hi]; the flag is set when the value had to move.
#[inline]
pub fn clamp_report(x: f64, lo: f64, hi: f64) -> (f64, bool) {
    let c = x.clamp(lo, hi);
    (c, c != x)
}

/// Sign in {-1, 0, 1}; unlike `f64::signum`, zero maps to zero.
#[inline]
pub fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}
