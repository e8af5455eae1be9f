//! Precision policies.
//!
//! Float values that take part in ordering or identity go through the helpers
//! here so that `-0.0`/`0.0` and NaN payloads never split what should compare
//! equal.

use core::cmp::Ordering;

use super::Vec3;

/// Canonicalize a floating-point value for deterministic ordering.
///
/// Rules:
/// - `-0.0` becomes `0.0`
/// - all NaNs become a single canonical NaN
pub fn canonical_f64(v: f64) -> f64 {
    if v == 0.0 {
        // Handles +0.0 and -0.0.
        0.0
    } else if v.is_nan() {
        f64::NAN
    } else {
        v
    }
}

/// Deterministic total ordering for floats.
///
/// Prefer this any time you sort floats or use them in ordered keys.
pub fn stable_total_cmp_f64(a: f64, b: f64) -> Ordering {
    canonical_f64(a).total_cmp(&canonical_f64(b))
}

/// Exact value identity for points.
///
/// No tolerance is applied: two points are the same only when every component
/// compares equal under `stable_total_cmp_f64`.
pub fn same_point(a: Vec3, b: Vec3) -> bool {
    stable_total_cmp_f64(a.x, b.x).is_eq()
        && stable_total_cmp_f64(a.y, b.y).is_eq()
        && stable_total_cmp_f64(a.z, b.z).is_eq()
}

/// Round to a fixed number of decimals, the way coordinate readouts are shown.
pub fn round_to(v: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    canonical_f64((v * scale).round() / scale)
}

#[cfg(test)]
mod tests {
    use super::{canonical_f64, round_to, same_point, stable_total_cmp_f64};
    use core::cmp::Ordering;

    use crate::math::Vec3;

    #[test]
    fn canonicalizes_negative_zero() {
        assert_eq!(canonical_f64(-0.0), 0.0);
        assert_eq!(canonical_f64(0.0), 0.0);
    }

    #[test]
    fn stable_cmp_is_total_and_deterministic() {
        assert_eq!(stable_total_cmp_f64(1.0, 2.0), Ordering::Less);
        assert_eq!(stable_total_cmp_f64(f64::NAN, f64::NAN), Ordering::Equal);
    }

    #[test]
    fn same_point_has_no_tolerance() {
        let a = Vec3::new(1.0, -0.0, 3.0);
        assert!(same_point(a, Vec3::new(1.0, 0.0, 3.0)));
        assert!(!same_point(a, Vec3::new(1.0 + 1e-12, 0.0, 3.0)));
    }

    #[test]
    fn rounds_like_a_readout() {
        assert_eq!(round_to(116.397_449, 4), 116.3974);
        assert_eq!(round_to(-0.000_01, 4), 0.0);
    }
}
