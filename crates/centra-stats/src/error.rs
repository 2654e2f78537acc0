use centra_core::error::ErrorCode;

/// Errors from the statistics helpers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StatsError {
    /// A distribution or test parameter is outside its domain.
    #[error("invalid {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
    /// A `N:n` trial string could not be parsed.
    #[error("invalid trial `{0}`: expected TRIALS:SUCCESSES")]
    MalformedTrial(String),
    /// Both samples have zero variance.
    #[error("pooled variance is zero; the test statistic is undefined")]
    DegenerateVariance,
}

impl StatsError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidParameter { .. } | Self::MalformedTrial(_) => ErrorCode::InvalidParameter,
            Self::DegenerateVariance => ErrorCode::DegenerateVariance,
        }
    }

    pub(crate) const fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value,
            reason,
        }
    }
}
