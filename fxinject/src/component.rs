//! One of the basic blocks of dependency injection is a [Component]. Components are injectable
//! objects, which themselves can contain dependencies to other components.
//!
//! ## Registering components
//!
//! Any type which wants to be managed by the container needs to implement `Component`. For
//! convenience, the trait can be automatically derived with all registration infrastructure if
//! the `derive` feature is enabled. The derive also records the component's module path, which
//! is what [scan](crate::container::Container::scan) filters on:
//!
//! ```
//! use fxinject::component::Injected;
//! use fxinject::instance_provider::ComponentInstancePtr;
//! use fxinject::{component_alias, injectable, Component};
//!
//! #[injectable]
//! trait Repository {}
//!
//! #[derive(Component)]
//! struct DiskRepository;
//!
//! #[component_alias]
//! impl Repository for DiskRepository {}
//!
//! #[derive(Component)]
//! #[component(names = ["user_service"])]
//! struct UserService {
//!     // concrete type dependency, resolved during construction (phase 1)
//!     repository: ComponentInstancePtr<DiskRepository>,
//!     // dyn Trait dependency, resolved through the alias registered above
//!     abstract_repository: ComponentInstancePtr<dyn Repository + Send + Sync>,
//!     // non-required dependency - don't fail when not present
//!     optional_repository: Option<ComponentInstancePtr<DiskRepository>>,
//!     // late-bound field, wired only after every component has been constructed (phase 2)
//!     #[component(inject)]
//!     late_repository: Injected<DiskRepository>,
//!     #[component(default)]
//!     request_count: u32,
//! }
//! ```
//!
//! ### Supported `#[component]` struct configuration
//!
//! * `names = ["name"]` - qualifier names for this component, instead of the auto-generated
//!   snake-case one
//! * `constructor = "expr"` - call `expr(dependencies...) -> Result<Self, ErrorPtr>` to
//!   construct the component, instead of standard struct construction; the parameter list comes
//!   from `constructor_parameters`
//! * `constructor_parameters = "Type1,dyn Trait2/qualifier,Option<Type3>"` - comma-separated
//!   dependency types for the custom constructor; `Option<T>` marks a non-required parameter
//!   and `/qualifier` requests a named instance
//! * `wire = "expr"` + `wire_parameters = "..."` - call `expr(&self, dependencies...) ->
//!   Result<(), ErrorPtr>` during the injection phase (method injection); same parameter
//!   grammar as `constructor_parameters`
//! * `fallback` - register a no-argument constructor (via [Default]) usable by the
//!   controller-factory fallback
//!
//! ### Supported `#[component]` field configuration
//!
//! * `inject` - wire this field during the injection phase; the field must be an [Injected]
//!   cell
//! * `required = false` - with `inject`, leave the cell empty instead of failing when the
//!   dependency is missing
//! * `qualifier = "name"` - resolve this injection point by qualifier name
//! * `default` - initialize with `Default::default()` instead of injecting
//! * `default = "expr"` - initialize by calling `expr()` instead of injecting
//!
//! ## Registering component aliases
//!
//! Component aliases are different types which can refer to a concrete component type - usually
//! `dyn Traits`, which makes it possible to inject an abstract `dyn Trait` instead of a
//! concrete component. Each injectable trait needs to be marked with `#[injectable]`, and each
//! implementation for a component registered with `#[component_alias]`:
//!
//! ```
//! use fxinject::{component_alias, injectable, Component};
//!
//! #[injectable]
//! trait SomeTrait {}
//!
//! #[derive(Component)]
//! struct SomeComponent;
//!
//! #[component_alias]
//! impl SomeTrait for SomeComponent {}
//! ```
//!
//! With multiple components registered for the same alias, requesting a single instance is
//! ambiguous and rejected, unless exactly one implementation is marked with
//! `#[component_alias(primary)]`.

use crate::error::ContainerError;
use crate::instance_provider::{
    ComponentInstanceAnyPtr, ComponentInstancePtr, DependencyResolver, InjectedDependency,
};
use std::fmt::{Debug, Formatter};
use std::sync::{PoisonError, RwLock};

/// Base trait for components for dependency injection.
///
/// Creation happens in two strictly ordered phases: [construct](Component::construct) builds
/// the instance with its constructor-injected dependencies resolved against the registry as
/// populated so far, and [inject](Component::inject) wires late-bound fields and wiring
/// methods once every component of the scan has been constructed. Constructor injection is
/// therefore sensitive to discovery order, while field and method injection is not.
pub trait Component: ComponentDowncast<Self> + Sized + Send + Sync {
    /// Phase 1: creates an instance of this component, resolving constructor dependencies
    /// from the given [DependencyResolver].
    fn construct(resolver: &dyn DependencyResolver) -> Result<Self, ContainerError>;

    /// Phase 2: wires late-bound fields and wiring methods. Runs against the fully populated
    /// registry. The default implementation does nothing.
    fn inject(&self, resolver: &dyn DependencyResolver) -> Result<(), ContainerError> {
        let _ = resolver;
        Ok(())
    }
}

/// Helper trait for traits implemented by components, thus allowing injection of components
/// based on `dyn Trait` types. The type `C` refers to a concrete component type. Typically
/// automatically derived when using the `#[component_alias]` attribute.
pub trait ComponentDowncast<C: Component>: Injectable {
    fn downcast(
        source: ComponentInstanceAnyPtr,
    ) -> Result<ComponentInstancePtr<Self>, ComponentInstanceAnyPtr>;
}

/// Marker trait for injectable types - components and aliases.
pub trait Injectable: 'static {}

/// A late-bound injection point - the field-injection cell of a component.
///
/// The cell is empty after construction and filled by the container during the injection
/// phase, which means it always observes the fully populated registry; two components can
/// even hold `Injected` references to each other. A later scan overwrites the cell with the
/// freshly registered instance.
///
/// Reading the cell yields `None` until the injection phase has run - observable when
/// retrieving components concurrently with an in-flight
/// [scan](crate::container::Container::scan), which is a documented caller obligation to
/// avoid.
pub struct Injected<T: Injectable + ?Sized> {
    slot: RwLock<Option<ComponentInstancePtr<T>>>,
}

impl<T: Injectable + ?Sized> Injected<T> {
    /// Returns the wired instance, or `None` if the injection phase has not filled this cell.
    pub fn get(&self) -> Option<ComponentInstancePtr<T>> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_wired(&self) -> bool {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Resolves and stores the dependency, replacing any previously wired instance. Called by
    /// the container during the injection phase.
    pub fn fill(
        &self,
        resolver: &dyn DependencyResolver,
        qualifier: Option<&str>,
    ) -> Result<(), ContainerError> {
        let instance = ComponentInstancePtr::<T>::resolve(resolver, qualifier)?;
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(instance);
        Ok(())
    }

    /// Non-required version of [fill](Injected::fill) - leaves the cell untouched when the
    /// dependency is missing.
    pub fn fill_optional(
        &self,
        resolver: &dyn DependencyResolver,
        qualifier: Option<&str>,
    ) -> Result<(), ContainerError> {
        if let Some(instance) =
            Option::<ComponentInstancePtr<T>>::resolve(resolver, qualifier)?
        {
            *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(instance);
        }

        Ok(())
    }
}

impl<T: Injectable + ?Sized> Default for Injected<T> {
    fn default() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }
}

impl<T: Injectable + ?Sized> Debug for Injected<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_wired() {
            f.write_str("Injected(wired)")
        } else {
            f.write_str("Injected(empty)")
        }
    }
}
