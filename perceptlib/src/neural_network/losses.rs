use std::str::FromStr;

use super::prelude::*;

/// `sum((desired - actual)^2)`
pub fn sum_squared_error<F: Float>(desired: &[F], actual: &[F]) -> F {
    assert_eq!(desired.len(), actual.len(), "desired and actual outputs must have the same length");

    let mut loss = F::ZERO;

    for (desired, actual) in desired.iter().zip(actual) {
        let diff = *desired - *actual;

        loss += diff * diff;
    }

    loss
}

/// `sum((desired - actual)^2) / n`
pub fn mean_squared_error<F: Float>(desired: &[F], actual: &[F]) -> F {
    if desired.is_empty() {
        return F::ZERO;
    }

    sum_squared_error(desired, actual) / F::from_usize(desired.len())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
/// Loss (error) function used to score network predictions.
///
/// Note that it's only used for reporting: the output layer
/// gradient is always `actual - desired`.
pub enum Loss {
    #[default]
    Sse,
    Mse
}

impl Loss {
    #[inline]
    /// Calculate loss value from the desired and actual outputs.
    pub fn loss<F: Float>(&self, desired: &[F], actual: &[F]) -> F {
        match self {
            Self::Sse => sum_squared_error(desired, actual),
            Self::Mse => mean_squared_error(desired, actual)
        }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Sse => "sse",
            Self::Mse => "mse"
        }
    }
}

impl std::fmt::Display for Loss {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Loss {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sse" | "sum_squared_error" => Ok(Self::Sse),
            "mse" | "mean_squared_error" => Ok(Self::Mse),

            _ => anyhow::bail!("unknown loss function: {s:?}")
        }
    }
}

#[test]
fn test_squared_errors() {
    assert_eq!(sum_squared_error(&[1.0], &[3.0]), 4.0);
    assert_eq!(sum_squared_error(&[1.0, 2.0], &[3.0, 4.0]), 8.0);
    assert_eq!(mean_squared_error(&[1.0, 2.0], &[3.0, 4.0]), 4.0);

    assert_eq!(Loss::Sse.loss(&[0.5_f32, 0.5], &[0.5, 0.5]), 0.0);
    assert_eq!(Loss::Mse.loss::<f64>(&[], &[]), 0.0);
}

#[test]
#[should_panic]
fn test_squared_error_length_mismatch() {
    sum_squared_error(&[1.0, 2.0], &[3.0]);
}

#[test]
fn test_loss_names() {
    assert_eq!("SSE".parse::<Loss>().unwrap(), Loss::Sse);
    assert_eq!(Loss::Mse.to_string().parse::<Loss>().unwrap(), Loss::Mse);
    assert!("cross_entropy".parse::<Loss>().is_err());
}
