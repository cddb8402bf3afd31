use crate::instance_provider::ErrorPtr;
use std::any::TypeId;
use thiserror::Error;

/// Errors related to scanning for, creating, wiring, and retrieving components.
#[derive(Error, Clone, Debug)]
pub enum ContainerError {
    /// The scanner could not process the given base module. This always aborts a scan,
    /// regardless of the configured [FailurePolicy](crate::container::FailurePolicy), since
    /// silently returning no components would mask misconfiguration.
    #[error("Cannot scan base module '{base_module}': {message}")]
    ScanFailure {
        base_module: String,
        message: String,
    },
    /// A bare no-argument construction was requested for a component which did not register
    /// a fallback constructor.
    #[error("No injectable no-argument constructor registered for component: {type_name}")]
    NoInjectableConstructor { type_name: &'static str },
    /// A custom constructor failed while creating a component.
    #[error("Failed to instantiate component {type_name}: {source}")]
    InstantiationFailure {
        type_name: &'static str,
        source: ErrorPtr,
    },
    /// A late-bound field could not be wired during the injection phase.
    #[error("Failed to inject field '{field}' of component {type_name}: {source}")]
    FieldInjectionFailure {
        type_name: &'static str,
        field: &'static str,
        source: Box<ContainerError>,
    },
    /// A wiring method failed during the injection phase.
    #[error("Failed to inject via method '{method}' of component {type_name}: {source}")]
    MethodInjectionFailure {
        type_name: &'static str,
        method: &'static str,
        source: ErrorPtr,
    },
    /// No registered instance, directly or via an alias, satisfies the requested type.
    #[error("No dependency found for type: {}", .type_name.unwrap_or("<unknown>"))]
    DependencyNotFound {
        type_id: TypeId,
        type_name: Option<&'static str>,
    },
    /// Multiple registered instances satisfy the requested alias type, and either none or
    /// more than one of them is marked as primary.
    #[error("Multiple dependencies without a single primary marker found for type: {}", .type_name.unwrap_or("<unknown>"))]
    AmbiguousDependency {
        type_id: TypeId,
        type_name: Option<&'static str>,
    },
    /// Direct keyed lookup miss - the requested type was never registered by a scan.
    #[error("No component found for type: {}", .type_name.unwrap_or("<unknown>"))]
    ComponentNotFound {
        type_id: TypeId,
        type_name: Option<&'static str>,
    },
    /// No component registered the given qualifier name.
    #[error("No dependency registered under qualifier: {qualifier}")]
    UnknownQualifier { qualifier: String },
    /// A type-erased instance could not be downcast to the requested type.
    #[error("Tried to downcast component to incompatible type: {}", .type_name.unwrap_or("<unknown>"))]
    IncompatibleComponent {
        type_id: TypeId,
        type_name: Option<&'static str>,
    },
}

impl ContainerError {
    /// Fills in a missing type name on errors produced by type-erased lookups, so
    /// strongly-typed callers get diagnostics naming the requested type.
    pub(crate) fn with_type_name(self, name: &'static str) -> Self {
        match self {
            ContainerError::DependencyNotFound {
                type_id,
                type_name: None,
            } => ContainerError::DependencyNotFound {
                type_id,
                type_name: Some(name),
            },
            ContainerError::AmbiguousDependency {
                type_id,
                type_name: None,
            } => ContainerError::AmbiguousDependency {
                type_id,
                type_name: Some(name),
            },
            ContainerError::ComponentNotFound {
                type_id,
                type_name: None,
            } => ContainerError::ComponentNotFound {
                type_id,
                type_name: Some(name),
            },
            ContainerError::IncompatibleComponent {
                type_id,
                type_name: None,
            } => ContainerError::IncompatibleComponent {
                type_id,
                type_name: Some(name),
            },
            other => other,
        }
    }
}
