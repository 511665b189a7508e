use crate::error::{ProjectionError, Result};

/// Inflation-adjusted return in percent via the Fisher relation
/// `(1 + n) / (1 + i) - 1`.
pub fn real_return_pct(nominal_pct: f64, inflation_pct: f64) -> Result<f64> {
    if !nominal_pct.is_finite() || !inflation_pct.is_finite() {
        return Err(ProjectionError::invalid_rate(
            "nominal and inflation rates must be finite",
        ));
    }
    let inflation_factor = 1.0 + inflation_pct / 100.0;
    if inflation_factor == 0.0 {
        return Err(ProjectionError::invalid_rate(
            "inflation of -100% has no real-return equivalent",
        ));
    }
    Ok(((1.0 + nominal_pct / 100.0) / inflation_factor - 1.0) * 100.0)
}

/// Per-month rate used by the month-stepped simulators (simple division, as
/// savings products quote it).
pub fn monthly_rate(annual_pct: f64) -> f64 {
    annual_pct / 100.0 / 12.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_approx(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    #[test]
    fn fisher_relation_matches_hand_calculation() {
        let real = real_return_pct(15.0, 12.0).expect("valid rates");
        assert_approx(real, (1.15 / 1.12 - 1.0) * 100.0, 1e-12);
        assert_approx(real, 2.6786, 1e-4);
    }

    #[test]
    fn fisher_differs_from_naive_subtraction_at_high_rates() {
        let real = real_return_pct(40.0, 30.0).expect("valid rates");
        assert!((real - 10.0).abs() > 1.0);
        assert_approx(real, 7.6923, 1e-4);
    }

    #[test]
    fn zero_inflation_leaves_nominal_unchanged() {
        assert_approx(real_return_pct(7.0, 0.0).expect("valid"), 7.0, 1e-12);
    }

    #[test]
    fn deflation_raises_real_return() {
        let real = real_return_pct(2.0, -2.0).expect("valid");
        assert!(real > 4.0);
    }

    #[test]
    fn inflation_of_minus_one_hundred_is_rejected() {
        let err = real_return_pct(5.0, -100.0).expect_err("must reject");
        assert!(matches!(err, ProjectionError::InvalidRate(_)));
    }

    #[test]
    fn non_finite_rates_are_rejected() {
        assert!(real_return_pct(f64::NAN, 2.0).is_err());
        assert!(real_return_pct(5.0, f64::INFINITY).is_err());
    }

    #[test]
    fn monthly_rate_divides_annual_percent() {
        assert_approx(monthly_rate(12.0), 0.01, 1e-15);
    }
}
