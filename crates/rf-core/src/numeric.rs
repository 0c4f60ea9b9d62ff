/// Floating point type used for result values.
pub type Real = f64;

/// True when `v` has no fractional part (infinities and NaN excluded).
pub fn is_whole(v: Real) -> bool {
    v.is_finite() && v.fract() == 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_numbers() {
        assert!(is_whole(3.0));
        assert!(is_whole(-0.0));
        assert!(!is_whole(2.5));
        assert!(!is_whole(Real::INFINITY));
        assert!(!is_whole(Real::NAN));
    }
}
