use std::f32::consts::{PI, TAU};

/// Fold an angle into `(-PI, PI]`.
/// Every wraparound-sensitive comparison in the crate goes through here.
pub fn normalize_angle(mut angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    while angle > PI {
        angle -= TAU;
    }
    while angle <= -PI {
        angle += TAU;
    }
    angle
}

/// Absolute angular difference between two bearings, in `[0, PI]`.
pub fn angle_difference(a: f32, b: f32) -> f32 {
    normalize_angle(a - b).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn normalize_stays_in_range() {
        for i in -100..100 {
            let angle = i as f32 * 0.37;
            let n = normalize_angle(angle);
            assert!(n > -PI - EPS && n <= PI + EPS, "{angle} -> {n}");
        }
    }

    #[test]
    fn normalize_identity_inside_range() {
        assert!((normalize_angle(1.0) - 1.0).abs() < EPS);
        assert!((normalize_angle(-3.0) + 3.0).abs() < EPS);
    }

    #[test]
    fn wraparound_at_pi() {
        // Just past PI folds to just past -PI.
        let n = normalize_angle(PI + 0.1);
        assert!((n + PI - 0.1).abs() < EPS);
    }

    #[test]
    fn difference_handles_the_seam() {
        // Bearings on either side of the +/-PI seam are close, not ~2*PI apart.
        let d = angle_difference(PI - 0.05, -PI + 0.05);
        assert!((d - 0.1).abs() < EPS);
    }

    #[test]
    fn difference_is_symmetric_and_bounded() {
        for i in 0..50 {
            let a = i as f32 * 0.3;
            let b = -(i as f32) * 0.17;
            let d = angle_difference(a, b);
            assert!((d - angle_difference(b, a)).abs() < EPS);
            assert!((0.0..=PI + EPS).contains(&d));
        }
    }
}
