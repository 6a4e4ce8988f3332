//! Return-series statistics
//!
//! Closed-form, stateless formulas over slices of returns. Ratios are
//! non-normalized (no annualization, risk-free rate assumed zero).
//! Compounding-return handling is not implemented.

use crate::error::{FxtError, Result};
use statrs::statistics::Statistics;

/// Standard deviation of `values`.
///
/// `sample = true` applies Bessel's correction, which needs at least two
/// values; the population form needs at least one.
pub fn standard_deviation(values: &[f64], sample: bool) -> Result<f64> {
    check_len(values.len(), sample)?;
    if sample {
        Ok(values.std_dev())
    } else {
        Ok(values.population_std_dev())
    }
}

/// Non-normalized Sharpe ratio of `returns`: mean return over the
/// standard deviation of all returns.
pub fn sharpe_ratio(returns: &[f64], compound: bool, sample: bool) -> Result<f64> {
    check_len(returns.len(), sample)?;
    if compound {
        return Err(FxtError::Unimplemented(
            "processing of compounding returns",
        ));
    }
    Ok(returns.mean() / standard_deviation(returns, sample)?)
}

/// Non-normalized Sortino ratio of `returns`: mean return over the
/// downside deviation (positive returns contribute zero to the spread).
pub fn sortino_ratio(returns: &[f64], compound: bool, sample: bool) -> Result<f64> {
    check_len(returns.len(), sample)?;
    if compound {
        return Err(FxtError::Unimplemented(
            "processing of compounding returns",
        ));
    }

    let mean = returns.mean();
    let downside: Vec<f64> = returns.iter().map(|&r| if r > 0.0 { 0.0 } else { r }).collect();
    Ok(mean / standard_deviation(&downside, sample)?)
}

fn check_len(n: usize, sample: bool) -> Result<()> {
    if n == 0 {
        return Err(FxtError::InvalidArgument(
            "illegal number of values (zero)".to_string(),
        ));
    }
    if sample && n == 1 {
        return Err(FxtError::InvalidArgument(
            "illegal number of values (one)".to_string(),
        ));
    }
    Ok(())
}
