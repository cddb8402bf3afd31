//! Type-erased component instances and the resolver surface used to look them up.
//!
//! Component instances are shared as [ComponentInstancePtr]s and stored type-erased as
//! [ComponentInstanceAnyPtr]s. Going back from the erased form to a concrete component or a
//! `dyn Trait` alias requires the [CastFunction] registered alongside the instance, since a
//! plain [std::any::Any] downcast cannot produce a trait object pointer.

use crate::component::Injectable;
use crate::error::ContainerError;
use std::any::{type_name, Any, TypeId};
use std::sync::Arc;

pub type ComponentInstancePtr<T> = Arc<T>;
pub type ComponentInstanceAnyPtr = Arc<dyn Any + Send + Sync + 'static>;

/// Generic error used by custom constructors and wiring methods.
pub type ErrorPtr = Arc<dyn std::error::Error + Send + Sync>;

/// Casts a type-erased instance to a `Box` containing a [ComponentInstancePtr] of the type
/// associated with this function at registration time. The box is opaque on purpose - the
/// typed resolver helpers downcast it back to the pointer type they requested.
pub type CastFunction = fn(ComponentInstanceAnyPtr) -> Result<Box<dyn Any>, ComponentInstanceAnyPtr>;

/// Type-erased dependency lookup against a populated registry. Implemented by
/// [Container](crate::container::Container) and mockable for tests.
pub trait DependencyResolver {
    /// Resolves an instance for the requested type - an exact registry key first, then the
    /// alias table. Missing dependencies report
    /// [DependencyNotFound](ContainerError::DependencyNotFound); ambiguous aliases without a
    /// single primary candidate report
    /// [AmbiguousDependency](ContainerError::AmbiguousDependency).
    fn resolve_type(
        &self,
        type_id: TypeId,
    ) -> Result<(ComponentInstanceAnyPtr, CastFunction), ContainerError>;

    /// Resolves an instance registered under the given qualifier name, checked for
    /// compatibility with the requested type.
    fn resolve_qualified(
        &self,
        qualifier: &str,
        type_id: TypeId,
    ) -> Result<(ComponentInstanceAnyPtr, CastFunction), ContainerError>;
}

/// Strongly-typed helpers over [DependencyResolver].
pub trait TypedDependencyResolver {
    /// Typesafe version of [DependencyResolver::resolve_type].
    fn find_dependency<T: Injectable + ?Sized>(
        &self,
    ) -> Result<ComponentInstancePtr<T>, ContainerError>;

    /// Tries to find a dependency like [TypedDependencyResolver::find_dependency] does, but
    /// yields `None` on a missing dependency - the lookup flavor for non-required injection
    /// points.
    fn find_dependency_option<T: Injectable + ?Sized>(
        &self,
    ) -> Result<Option<ComponentInstancePtr<T>>, ContainerError>;

    /// Typesafe version of [DependencyResolver::resolve_qualified].
    fn find_dependency_qualified<T: Injectable + ?Sized>(
        &self,
        qualifier: &str,
    ) -> Result<ComponentInstancePtr<T>, ContainerError>;

    /// Qualifier-based lookup yielding `None` when the qualifier is unknown or its target is
    /// absent.
    fn find_dependency_qualified_option<T: Injectable + ?Sized>(
        &self,
        qualifier: &str,
    ) -> Result<Option<ComponentInstancePtr<T>>, ContainerError>;
}

impl<D: DependencyResolver + ?Sized> TypedDependencyResolver for D {
    fn find_dependency<T: Injectable + ?Sized>(
        &self,
    ) -> Result<ComponentInstancePtr<T>, ContainerError> {
        self.resolve_type(TypeId::of::<T>())
            .map_err(|error| error.with_type_name(type_name::<T>()))
            .and_then(downcast_instance::<T>)
    }

    fn find_dependency_option<T: Injectable + ?Sized>(
        &self,
    ) -> Result<Option<ComponentInstancePtr<T>>, ContainerError> {
        match self.resolve_type(TypeId::of::<T>()) {
            Ok(instance) => downcast_instance::<T>(instance).map(Some),
            Err(ContainerError::DependencyNotFound { .. }) => Ok(None),
            Err(error) => Err(error.with_type_name(type_name::<T>())),
        }
    }

    fn find_dependency_qualified<T: Injectable + ?Sized>(
        &self,
        qualifier: &str,
    ) -> Result<ComponentInstancePtr<T>, ContainerError> {
        self.resolve_qualified(qualifier, TypeId::of::<T>())
            .map_err(|error| error.with_type_name(type_name::<T>()))
            .and_then(downcast_instance::<T>)
    }

    fn find_dependency_qualified_option<T: Injectable + ?Sized>(
        &self,
        qualifier: &str,
    ) -> Result<Option<ComponentInstancePtr<T>>, ContainerError> {
        match self.resolve_qualified(qualifier, TypeId::of::<T>()) {
            Ok(instance) => downcast_instance::<T>(instance).map(Some),
            Err(
                ContainerError::DependencyNotFound { .. }
                | ContainerError::UnknownQualifier { .. },
            ) => Ok(None),
            Err(error) => Err(error.with_type_name(type_name::<T>())),
        }
    }
}

/// A single resolvable injection point - the type-driven dispatch target for generated
/// constructor and wiring-method parameters. `ComponentInstancePtr<T>` is a required
/// dependency, `Option<ComponentInstancePtr<T>>` a non-required one.
pub trait InjectedDependency: Sized {
    fn resolve(
        resolver: &dyn DependencyResolver,
        qualifier: Option<&str>,
    ) -> Result<Self, ContainerError>;
}

impl<T: Injectable + ?Sized> InjectedDependency for ComponentInstancePtr<T> {
    fn resolve(
        resolver: &dyn DependencyResolver,
        qualifier: Option<&str>,
    ) -> Result<Self, ContainerError> {
        match qualifier {
            Some(qualifier) => resolver.find_dependency_qualified::<T>(qualifier),
            None => resolver.find_dependency::<T>(),
        }
    }
}

impl<T: Injectable + ?Sized> InjectedDependency for Option<ComponentInstancePtr<T>> {
    fn resolve(
        resolver: &dyn DependencyResolver,
        qualifier: Option<&str>,
    ) -> Result<Self, ContainerError> {
        match qualifier {
            Some(qualifier) => resolver.find_dependency_qualified_option::<T>(qualifier),
            None => resolver.find_dependency_option::<T>(),
        }
    }
}

fn downcast_instance<T: Injectable + ?Sized>(
    (instance, cast): (ComponentInstanceAnyPtr, CastFunction),
) -> Result<ComponentInstancePtr<T>, ContainerError> {
    cast(instance)
        .ok()
        .and_then(|boxed| boxed.downcast::<ComponentInstancePtr<T>>().ok())
        .map(|pointer| *pointer)
        .ok_or_else(|| ContainerError::IncompatibleComponent {
            type_id: TypeId::of::<T>(),
            type_name: Some(type_name::<T>()),
        })
}
