//! Compound-growth projection of an account balance.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_GROWTH_RATE: f64 = 0.07;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct ProjectionArgs {
    pub account_value: f64,
    pub years: u32,
    #[serde(default = "default_growth_rate")]
    pub growth_rate: f64,
}

fn default_growth_rate() -> f64 {
    DEFAULT_GROWTH_RATE
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Projection {
    pub projected_value: f64,
    pub initial_value: f64,
    pub years: u32,
    pub growth_rate: f64,
    pub growth_rate_percentage: String,
}

/// `account_value * (1 + growth_rate) ^ years`, rounded to cents.
pub fn project(args: ProjectionArgs) -> Result<Projection> {
    let ProjectionArgs {
        account_value,
        years,
        growth_rate,
    } = args;

    if !account_value.is_finite() || account_value < 0.0 {
        return Err(Error::InvalidArgument(format!(
            "account_value must be a non-negative number, got {account_value}"
        )));
    }
    if !growth_rate.is_finite() || growth_rate <= -1.0 {
        return Err(Error::InvalidArgument(format!(
            "growth_rate must be a number above -1.0, got {growth_rate}"
        )));
    }

    let exponent = i32::try_from(years)
        .map_err(|_| Error::InvalidArgument(format!("years is too large: {years}")))?;
    let projected = account_value * (1.0 + growth_rate).powi(exponent);
    if !projected.is_finite() {
        return Err(Error::InvalidArgument(
            "projection overflows; use a smaller horizon or rate".to_string(),
        ));
    }

    Ok(Projection {
        projected_value: round_cents(projected),
        initial_value: account_value,
        years,
        growth_rate,
        growth_rate_percentage: format!("{:.2}%", growth_rate * 100.0),
    })
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(account_value: f64, years: u32, growth_rate: f64) -> ProjectionArgs {
        ProjectionArgs {
            account_value,
            years,
            growth_rate,
        }
    }

    #[test]
    fn compounds_yearly() {
        let p = project(args(1000.0, 2, 0.10)).unwrap();
        assert_eq!(p.projected_value, 1210.00);
        assert_eq!(p.initial_value, 1000.0);
        assert_eq!(p.growth_rate_percentage, "10.00%");
    }

    #[test]
    fn rounds_to_cents() {
        let p = project(args(1234.567, 0, DEFAULT_GROWTH_RATE)).unwrap();
        assert_eq!(p.projected_value, 1234.57);
        assert_eq!(p.growth_rate_percentage, "7.00%");
    }

    #[test]
    fn growth_rate_defaults_when_absent() {
        let parsed: ProjectionArgs =
            serde_json::from_str(r#"{"account_value": 500.0, "years": 10}"#).unwrap();
        assert_eq!(parsed.growth_rate, DEFAULT_GROWTH_RATE);
    }

    #[test]
    fn negative_rates_shrink_the_account() {
        let p = project(args(1000.0, 2, -0.1)).unwrap();
        assert_eq!(p.projected_value, 810.0);
        assert_eq!(p.growth_rate_percentage, "-10.00%");

        assert!(project(args(1000.0, 2, -1.0)).unwrap_err().is_client_error());
        assert!(project(args(1000.0, 2, -1.5)).unwrap_err().is_client_error());
    }

    #[test]
    fn rejects_bad_inputs() {
        assert!(project(args(-1.0, 2, 0.1)).unwrap_err().is_client_error());
        assert!(project(args(f64::NAN, 2, 0.1)).unwrap_err().is_client_error());
        assert!(project(args(100.0, 2, f64::INFINITY)).unwrap_err().is_client_error());
        assert!(project(args(f64::MAX, 1000, 1.0)).unwrap_err().is_client_error());
    }
}
