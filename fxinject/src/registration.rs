//! Registration tables for components and their aliases.
//!
//! Instead of discovering annotated classes on a classpath at runtime, components are entered
//! into a distributed registration table at build time - the derive macros submit a
//! [ComponentDefinition] per component, tagged with the module path the component lives in.
//! [Scanning](crate::container::Container::scan) then filters this table by module-path
//! prefix, which is the compile-time equivalent of scanning a base package.

use crate::error::ContainerError;
use crate::instance_provider::{CastFunction, ComponentInstanceAnyPtr, DependencyResolver};
use derivative::Derivative;
use std::any::TypeId;

/// Creates a type-erased instance with constructor-injected dependencies resolved from the
/// given resolver (phase 1).
pub type ConstructorFunction =
    fn(&dyn DependencyResolver) -> Result<ComponentInstanceAnyPtr, ContainerError>;

/// Wires late-bound fields and wiring methods of an already constructed instance (phase 2).
pub type InjectorFunction =
    fn(&ComponentInstanceAnyPtr, &dyn DependencyResolver) -> Result<(), ContainerError>;

/// Creates a bare instance without any injection - the no-argument constructor used by the
/// controller-factory fallback.
pub type FallbackConstructorFunction = fn() -> ComponentInstanceAnyPtr;

/// Registration information for a component.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct ComponentMetadata {
    /// Qualifier names under which the component can be requested. Derive-based components
    /// have their name generated from the type name by converting it to snake case.
    pub names: Vec<String>,

    #[derivative(Debug = "ignore")]
    pub constructor: ConstructorFunction,

    /// Present only for components with late-bound fields or a wiring method.
    #[derivative(Debug = "ignore")]
    pub injector: Option<InjectorFunction>,

    /// Present only for components registered with a no-argument fallback constructor.
    #[derivative(Debug = "ignore")]
    pub fallback_constructor: Option<FallbackConstructorFunction>,

    #[derivative(Debug = "ignore")]
    pub cast: CastFunction,
}

/// A component entry in the registration table. The declared type is the registry key under
/// which the scanned singleton instance is stored.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct ComponentDefinition {
    pub target: TypeId,
    pub target_name: &'static str,

    /// Module the component is defined in, as given by `module_path!()` - the unit of
    /// scanning.
    pub module_path: &'static str,

    pub metadata: ComponentMetadata,
}

/// Registration information for an alias of a component - typically a `dyn Trait` the
/// component implements.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct ComponentAliasMetadata {
    /// With multiple components registered for a given alias, the one marked as primary is
    /// returned when requesting a single instance.
    pub is_primary: bool,

    #[derivative(Debug = "ignore")]
    pub cast: CastFunction,
}

/// An alias entry in the registration table, mapping an alias type to the concrete component
/// satisfying it.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct ComponentAliasDefinition {
    pub alias_type: TypeId,
    pub target_type: TypeId,
    pub alias_name: &'static str,
    pub target_name: &'static str,
    pub metadata: ComponentAliasMetadata,
}

/// Returns all component definitions submitted to the registration table, in unspecified
/// order.
pub fn registered_components() -> Vec<ComponentDefinition> {
    inventory::iter::<internal::ComponentRegisterer>
        .into_iter()
        .map(|registerer| (registerer.register)())
        .collect()
}

/// Returns all alias definitions submitted to the registration table, in unspecified order.
pub fn registered_aliases() -> Vec<ComponentAliasDefinition> {
    inventory::iter::<internal::ComponentAliasRegisterer>
        .into_iter()
        .map(|registerer| (registerer.register)())
        .collect()
}

#[doc(hidden)]
pub mod internal {
    use crate::registration::{ComponentAliasDefinition, ComponentDefinition};
    use inventory::collect;
    pub use inventory::submit;

    pub struct ComponentRegisterer {
        pub register: fn() -> ComponentDefinition,
    }

    pub struct ComponentAliasRegisterer {
        pub register: fn() -> ComponentAliasDefinition,
    }

    collect!(ComponentRegisterer);
    collect!(ComponentAliasRegisterer);
}
