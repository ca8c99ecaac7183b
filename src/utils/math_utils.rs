//! Numeric conversions that are otherwise flagged by clippy.
#[must_use]
pub const fn usize_to_f64(value: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let newval = value as f64;
    newval
}

#[must_use]
pub const fn f64_to_usize(value: f64) -> usize {
    #[allow(clippy::cast_possible_truncation)]
    #[allow(clippy::cast_sign_loss)]
    let newval = value as usize;
    newval
}

/// Signed offset of `index` from `center` as a float.
#[must_use]
pub const fn centered_index_to_f64(index: usize, center: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let newval = index as f64 - center as f64;
    newval
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn conversions() {
        assert_eq!(usize_to_f64(3), 3.0);
        assert_eq!(f64_to_usize(3.7), 3);
        assert_eq!(f64_to_usize(-1.0), 0);
        assert_eq!(centered_index_to_f64(0, 2), -2.0);
        assert_eq!(centered_index_to_f64(5, 2), 3.0);
    }
}
