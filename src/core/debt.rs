use super::rates::monthly_rate;
use super::types::{DebtInput, DebtPayoff};
use crate::error::{ProjectionError, Result};

/// Residual balances below this are treated as settled.
const SETTLED_EPS: f64 = 1e-9;

/// Month-by-month amortization: interest accrues on the open balance, then
/// the payment (capped at what is owed) is applied. Stops at `max_months`.
pub fn payoff_schedule(input: &DebtInput, max_months: u32) -> Result<DebtPayoff> {
    validate_debt(input)?;

    if input.balance <= SETTLED_EPS {
        return Ok(DebtPayoff {
            months: Some(0),
            total_interest: 0.0,
            total_paid: 0.0,
            paid_off: true,
        });
    }

    let rate = monthly_rate(input.annual_rate_pct);
    if input.monthly_payment <= input.balance * rate || input.monthly_payment <= 0.0 {
        tracing::debug!(
            balance = input.balance,
            monthly_payment = input.monthly_payment,
            "payment does not cover monthly interest"
        );
        return Ok(DebtPayoff {
            months: None,
            total_interest: 0.0,
            total_paid: 0.0,
            paid_off: false,
        });
    }

    let mut balance = input.balance;
    let mut total_interest = 0.0;
    let mut total_paid = 0.0;
    let mut months = 0;
    while months < max_months {
        let interest = balance * rate;
        total_interest += interest;
        balance += interest;

        let payment = input.monthly_payment.min(balance);
        balance -= payment;
        total_paid += payment;
        months += 1;

        if balance <= SETTLED_EPS {
            return Ok(DebtPayoff {
                months: Some(months),
                total_interest,
                total_paid,
                paid_off: true,
            });
        }
    }

    Ok(DebtPayoff {
        months: None,
        total_interest,
        total_paid,
        paid_off: false,
    })
}

/// Level monthly payment that retires `balance` in exactly `months` payments.
pub fn required_payment(balance: f64, annual_rate_pct: f64, months: u32) -> Result<f64> {
    if !balance.is_finite() || balance < 0.0 {
        return Err(ProjectionError::invalid_input("balance must be >= 0"));
    }
    if !annual_rate_pct.is_finite() {
        return Err(ProjectionError::invalid_rate("annual rate must be finite"));
    }
    if months == 0 {
        return Err(ProjectionError::invalid_input("months must be > 0"));
    }

    let rate = monthly_rate(annual_rate_pct);
    if rate.abs() < 1e-9 {
        return Ok(balance / months as f64);
    }
    let discount = (1.0 + rate).powf(-(months as f64));
    Ok(balance * rate / (1.0 - discount))
}

fn validate_debt(input: &DebtInput) -> Result<()> {
    if !input.balance.is_finite() || input.balance < 0.0 {
        return Err(ProjectionError::invalid_input("balance must be >= 0"));
    }
    if !input.monthly_payment.is_finite() || input.monthly_payment < 0.0 {
        return Err(ProjectionError::invalid_input(
            "monthly payment must be >= 0",
        ));
    }
    if !input.annual_rate_pct.is_finite() {
        return Err(ProjectionError::invalid_rate("annual rate must be finite"));
    }
    Ok(())
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
    fn interest_free_debt_pays_off_linearly() {
        let input = DebtInput {
            balance: 1_000.0,
            annual_rate_pct: 0.0,
            monthly_payment: 300.0,
        };
        let payoff = payoff_schedule(&input, 600).expect("valid");
        assert!(payoff.paid_off);
        assert_eq!(payoff.months, Some(4));
        assert_approx(payoff.total_paid, 1_000.0, 1e-9);
        assert_approx(payoff.total_interest, 0.0, 1e-12);
    }

    #[test]
    fn interest_accrues_before_payment() {
        // 12% a year is 1% a month: 1000 -> 1010, pay 510 -> 500 -> 505, pay 505.
        let input = DebtInput {
            balance: 1_000.0,
            annual_rate_pct: 12.0,
            monthly_payment: 510.0,
        };
        let payoff = payoff_schedule(&input, 600).expect("valid");
        assert_eq!(payoff.months, Some(2));
        assert_approx(payoff.total_interest, 15.0, 1e-9);
        assert_approx(payoff.total_paid, 1_015.0, 1e-9);
    }

    #[test]
    fn payment_not_covering_interest_never_amortizes() {
        let input = DebtInput {
            balance: 10_000.0,
            annual_rate_pct: 24.0,
            monthly_payment: 200.0,
        };
        let payoff = payoff_schedule(&input, 600).expect("valid");
        assert!(!payoff.paid_off);
        assert_eq!(payoff.months, None);
        assert_approx(payoff.total_paid, 0.0, 0.0);
    }

    #[test]
    fn horizon_caps_slow_payoff() {
        let input = DebtInput {
            balance: 1_000.0,
            annual_rate_pct: 0.0,
            monthly_payment: 1.0,
        };
        let payoff = payoff_schedule(&input, 120).expect("valid");
        assert!(!payoff.paid_off);
        assert_approx(payoff.total_paid, 120.0, 1e-9);
    }

    #[test]
    fn empty_balance_is_already_paid() {
        let input = DebtInput {
            balance: 0.0,
            annual_rate_pct: 18.0,
            monthly_payment: 0.0,
        };
        let payoff = payoff_schedule(&input, 600).expect("valid");
        assert!(payoff.paid_off);
        assert_eq!(payoff.months, Some(0));
    }

    #[test]
    fn negative_balance_is_rejected() {
        let input = DebtInput {
            balance: -1.0,
            annual_rate_pct: 5.0,
            monthly_payment: 10.0,
        };
        assert!(matches!(
            payoff_schedule(&input, 600),
            Err(ProjectionError::InvalidInput(_))
        ));
    }

    #[test]
    fn required_payment_retires_balance_on_schedule() {
        let payment = required_payment(10_000.0, 6.0, 36).expect("valid");
        assert_approx(payment, 304.2194, 1e-3);

        let payoff = payoff_schedule(
            &DebtInput {
                balance: 10_000.0,
                annual_rate_pct: 6.0,
                monthly_payment: payment + 1e-6,
            },
            600,
        )
        .expect("valid");
        assert_eq!(payoff.months, Some(36));
    }

    #[test]
    fn required_payment_without_interest_is_linear() {
        assert_approx(required_payment(1_200.0, 0.0, 12).expect("valid"), 100.0, 1e-12);
        assert!(required_payment(1_200.0, 5.0, 0).is_err());
    }

    #[test]
    fn required_payment_handles_horizons_past_i32_range() {
        // The discount factor vanishes, leaving the interest-only payment.
        for months in [2_147_483_647, 2_147_483_648, 2_147_483_649, u32::MAX] {
            let payment = required_payment(1_000.0, 6.0, months).expect("valid");
            assert_approx(payment, 5.0, 1e-9);
        }
    }
}
