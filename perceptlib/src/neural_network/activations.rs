use std::str::FromStr;

use super::prelude::*;

// Derivatives below take the *activated* value `y = f(x)`
// because layers only keep activated outputs in their caches.

#[inline]
/// `1 if x >= 0 else 0`
pub fn step<F: Float>(x: F) -> F {
    if x >= F::ZERO { F::ONE } else { F::ZERO }
}

#[inline]
pub fn step_derivative<F: Float>(_: F) -> F {
    F::ZERO
}

#[inline]
/// `1 if x >= 0 else -1`
pub fn sign<F: Float>(x: F) -> F {
    if x >= F::ZERO { F::ONE } else { -F::ONE }
}

#[inline]
pub fn sign_derivative<F: Float>(_: F) -> F {
    F::ZERO
}

#[inline]
pub fn linear<F: Float>(x: F) -> F {
    x
}

#[inline]
pub fn linear_derivative<F: Float>(_: F) -> F {
    F::ONE
}

#[inline]
pub fn relu<F: Float>(x: F) -> F {
    if x >= F::ZERO { x } else { F::ZERO }
}

#[inline]
pub fn relu_derivative<F: Float>(y: F) -> F {
    if y > F::ZERO { F::ONE } else { F::ZERO }
}

#[inline]
pub fn sigmoid<F: Float>(x: F) -> F {
    F::ONE / (F::ONE + (-x).exp())
}

#[inline]
pub fn sigmoid_derivative<F: Float>(y: F) -> F {
    y * (F::ONE - y)
}

#[inline]
pub fn tanh<F: Float>(x: F) -> F {
    x.tanh()
}

#[inline]
pub fn tanh_derivative<F: Float>(y: F) -> F {
    F::ONE - y * y
}

/// Convert a vector of real values into a probability distribution.
///
/// The maximal value is subtracted before exponentiation so large
/// inputs don't overflow. Output always sums to 1.
pub fn softmax<F: Float>(values: &[F]) -> Vec<F> {
    let max = values.iter()
        .copied()
        .fold(F::MIN, F::max);

    let exps = values.iter()
        .map(|value| (*value - max).exp())
        .collect::<Vec<F>>();

    let mut sum = F::ZERO;

    for value in &exps {
        sum += *value;
    }

    exps.into_iter()
        .map(|value| value / sum)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
/// Activation function of the hidden layer neurons.
///
/// Each variant maps to a fixed pair of function and its derivative,
/// so they can't be mismatched.
pub enum Activation {
    Step,
    Sign,
    Linear,
    Relu,
    Sigmoid,

    #[default]
    Tanh
}

impl Activation {
    /// List of all the available activation functions.
    pub const ALL: [Self; 6] = [
        Self::Step,
        Self::Sign,
        Self::Linear,
        Self::Relu,
        Self::Sigmoid,
        Self::Tanh
    ];

    #[inline]
    /// Apply activation function to the weighted input sum.
    pub fn function<F: Float>(&self, x: F) -> F {
        match self {
            Self::Step    => step(x),
            Self::Sign    => sign(x),
            Self::Linear  => linear(x),
            Self::Relu    => relu(x),
            Self::Sigmoid => sigmoid(x),
            Self::Tanh    => tanh(x)
        }
    }

    #[inline]
    /// Calculate derivative of the activation function
    /// from its already activated output value.
    pub fn derivative<F: Float>(&self, y: F) -> F {
        match self {
            Self::Step    => step_derivative(y),
            Self::Sign    => sign_derivative(y),
            Self::Linear  => linear_derivative(y),
            Self::Relu    => relu_derivative(y),
            Self::Sigmoid => sigmoid_derivative(y),
            Self::Tanh    => tanh_derivative(y)
        }
    }

    #[inline]
    /// Canonical lowercase name of the function.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Step    => "step",
            Self::Sign    => "sign",
            Self::Linear  => "linear",
            Self::Relu    => "relu",
            Self::Sigmoid => "sigmoid",
            Self::Tanh    => "tanh"
        }
    }
}

impl std::fmt::Display for Activation {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Activation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "step" | "binary" => Ok(Self::Step),
            "sign" | "signum" => Ok(Self::Sign),
            "linear" | "lin" | "identity" => Ok(Self::Linear),
            "relu" => Ok(Self::Relu),
            "sigmoid" | "logistic" => Ok(Self::Sigmoid),
            "tanh" => Ok(Self::Tanh),

            _ => anyhow::bail!("unknown activation function: {s:?}")
        }
    }
}
