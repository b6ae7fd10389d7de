//! Errors raised while building API descriptions.

use std::fmt;

/// Chain phase a provider was running when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderPhase {
    Executing,
    Executed,
}

impl fmt::Display for ProviderPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Executing => f.write_str("executing"),
            Self::Executed => f.write_str("executed"),
        }
    }
}

/// Failure of a description pass. Every variant aborts the whole pass.
#[derive(thiserror::Error, Debug)]
pub enum DescriptionError {
    #[error("model metadata for '{type_name}' could not be resolved: {reason}")]
    MetadataUnavailable {
        type_name: &'static str,
        reason: String,
    },
    #[error("provider '{provider}' failed while {phase}: {source}")]
    Provider {
        provider: &'static str,
        phase: ProviderPhase,
        #[source]
        source: Box<DescriptionError>,
    },
}

impl DescriptionError {
    /// Innermost error, skipping provider wrappers.
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::Provider { source, .. } => source.root(),
            other @ Self::MetadataUnavailable { .. } => other,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn provider_error_message_names_provider_and_phase() {
        let err = DescriptionError::Provider {
            provider: "problem-responses",
            phase: ProviderPhase::Executing,
            source: Box::new(DescriptionError::MetadataUnavailable {
                type_name: "Problem",
                reason: "no schema".to_owned(),
            }),
        };
        assert_eq!(
            err.to_string(),
            "provider 'problem-responses' failed while executing: \
             model metadata for 'Problem' could not be resolved: no schema"
        );
        assert!(matches!(
            err.root(),
            DescriptionError::MetadataUnavailable { type_name: "Problem", .. }
        ));
    }
}
