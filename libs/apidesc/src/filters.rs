//! Behavioral markers applied to actions.
//!
//! A filter is anything attached to an action that changes how the host treats it.
//! Description providers never look at concrete filter types; they ask whether a
//! filter reports a [`Capability`]. Host crates can therefore add their own markers
//! and opt them into existing conventions.

use std::fmt;
use std::sync::Arc;

/// Named behavioral convention a filter can opt an action into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Capability {
    /// Opinionated API behavior: automatic model validation with problem responses.
    ApiBehavior,
    /// Host-defined convention.
    Custom(&'static str),
}

/// Marker attached to an action.
pub trait Filter: Send + Sync + fmt::Debug {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Capabilities reported by this marker.
    fn capabilities(&self) -> &[Capability] {
        &[]
    }

    fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}

/// Where a filter was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FilterScope {
    Global,
    Controller,
    Action,
}

/// A filter as applied to one action.
#[derive(Clone, Debug)]
pub struct FilterDescriptor {
    pub filter: Arc<dyn Filter>,
    pub scope: FilterScope,
    pub order: i32,
}

impl FilterDescriptor {
    pub fn new(filter: Arc<dyn Filter>, scope: FilterScope) -> Self {
        Self {
            filter,
            scope,
            order: 0,
        }
    }

    #[must_use]
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }
}

/// Rejects requests whose bound model failed validation with a 400 problem.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelStateInvalidFilter;

impl Filter for ModelStateInvalidFilter {
    fn name(&self) -> &str {
        "model-state-invalid"
    }

    fn capabilities(&self) -> &[Capability] {
        &[Capability::ApiBehavior]
    }
}

/// Turns bare client-error status results into problem payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientErrorResultFilter;

impl Filter for ClientErrorResultFilter {
    fn name(&self) -> &str {
        "client-error-result"
    }

    fn capabilities(&self) -> &[Capability] {
        &[Capability::ApiBehavior]
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Tracing;

    impl Filter for Tracing {
        fn name(&self) -> &str {
            "tracing"
        }
    }

    #[derive(Debug)]
    struct Hybrid;

    impl Filter for Hybrid {
        fn name(&self) -> &str {
            "hybrid"
        }

        fn capabilities(&self) -> &[Capability] {
            &[Capability::Custom("etag"), Capability::ApiBehavior]
        }
    }

    #[test]
    fn builtin_markers_report_api_behavior() {
        assert!(ModelStateInvalidFilter.has_capability(Capability::ApiBehavior));
        assert!(ClientErrorResultFilter.has_capability(Capability::ApiBehavior));
    }

    #[test]
    fn plain_filter_has_no_capabilities() {
        assert!(Tracing.capabilities().is_empty());
        assert!(!Tracing.has_capability(Capability::ApiBehavior));
    }

    #[test]
    fn host_defined_marker_can_opt_in() {
        assert!(Hybrid.has_capability(Capability::ApiBehavior));
        assert!(Hybrid.has_capability(Capability::Custom("etag")));
        assert!(!Hybrid.has_capability(Capability::Custom("cache")));
    }

    #[test]
    fn descriptor_defaults_to_order_zero() {
        let d = FilterDescriptor::new(Arc::new(Tracing), FilterScope::Action).with_order(5);
        assert_eq!(d.order, 5);
        assert_eq!(d.scope, FilterScope::Action);
        assert_eq!(FilterDescriptor::new(Arc::new(Tracing), FilterScope::Global).order, 0);
    }
}
