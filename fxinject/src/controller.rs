//! Bridging the container into a GUI markup loader.
//!
//! Markup loaders create one controller instance per loaded document and let applications
//! override that creation with a factory callback. [ControllerFactory] is that callback's
//! implementation: controller types which are registered components are served from the
//! container as their wired singletons, so loading a document injects the controller's
//! dependencies instead of leaving them unset.
//!
//! Controllers not present in the registry can optionally fall back to a bare no-argument
//! construction, mirroring what loaders do on their own when no factory is set. Fallback
//! instances are fresh per request and never injected or registered.

use crate::component::Component;
use crate::container::{Container, FailurePolicy};
use crate::error::ContainerError;
use crate::instance_provider::{CastFunction, ComponentInstanceAnyPtr, ComponentInstancePtr};
use crate::registration::{registered_components, ComponentDefinition, FallbackConstructorFunction};
use fxhash::FxHashMap;
use std::any::{type_name, TypeId};
use std::sync::Arc;
use tracing::{debug, warn};

/// The type-to-instance closure handed to an external UI-markup loader as its controller
/// factory. Failures are logged and reported as `None`, since loader callbacks have no error
/// channel.
pub type ControllerFactoryFn = Box<dyn Fn(TypeId) -> Option<ComponentInstanceAnyPtr> + Send + Sync>;

struct ControllerEntry {
    type_name: &'static str,
    cast: CastFunction,
    fallback_constructor: Option<FallbackConstructorFunction>,
}

/// Serves controller instances for a markup loader from a scanned [Container].
pub struct ControllerFactory {
    container: Arc<Container>,
    fallback: bool,
    known: FxHashMap<TypeId, ControllerEntry>,
}

impl ControllerFactory {
    /// Creates a factory without bare-construction fallback - controllers must be scanned
    /// components.
    pub fn new(container: Arc<Container>) -> Self {
        Self::from_definitions(container, registered_components(), false)
    }

    /// Creates a factory which falls back to the no-argument constructor of components
    /// registered with one when the requested controller is not in the registry.
    pub fn with_fallback(container: Arc<Container>) -> Self {
        Self::from_definitions(container, registered_components(), true)
    }

    /// Creates a factory over an explicit definition list - the manual registration
    /// alternative to the build-time table.
    pub fn from_definitions(
        container: Arc<Container>,
        definitions: Vec<ComponentDefinition>,
        fallback: bool,
    ) -> Self {
        let known = definitions
            .into_iter()
            .map(|definition| {
                (
                    definition.target,
                    ControllerEntry {
                        type_name: definition.target_name,
                        cast: definition.metadata.cast,
                        fallback_constructor: definition.metadata.fallback_constructor,
                    },
                )
            })
            .collect();

        Self {
            container,
            fallback,
            known,
        }
    }

    /// Produces a controller instance for the given type. Registry hits yield the wired
    /// singleton; misses follow the container's [FailurePolicy] - strict surfaces the error,
    /// lenient logs it and yields `None`, letting the loader construct the controller itself.
    pub fn controller(
        &self,
        type_id: TypeId,
    ) -> Result<Option<(ComponentInstanceAnyPtr, CastFunction)>, ContainerError> {
        if let Some((instance, cast)) = self.container.component_by_id(type_id) {
            return Ok(Some((instance, cast)));
        }

        let entry = self.known.get(&type_id);

        if self.fallback {
            if let Some(entry) = entry {
                match entry.fallback_constructor {
                    Some(fallback_constructor) => {
                        debug!(
                            "Controller {} not registered; constructing bare fallback instance.",
                            entry.type_name
                        );
                        return Ok(Some((fallback_constructor(), entry.cast)));
                    }
                    None => {
                        return self.handle_miss(ContainerError::NoInjectableConstructor {
                            type_name: entry.type_name,
                        })
                    }
                }
            }
        }

        self.handle_miss(ContainerError::ComponentNotFound {
            type_id,
            type_name: entry.map(|entry| entry.type_name),
        })
    }

    /// Typesafe version of [controller](ControllerFactory::controller).
    pub fn controller_typed<T: Component>(
        &self,
    ) -> Result<Option<ComponentInstancePtr<T>>, ContainerError> {
        match self.controller(TypeId::of::<T>())? {
            Some((instance, _)) => T::downcast(instance)
                .map(Some)
                .map_err(|_| ContainerError::IncompatibleComponent {
                    type_id: TypeId::of::<T>(),
                    type_name: Some(type_name::<T>()),
                }),
            None => Ok(None),
        }
    }

    /// Consumes the factory into the closure shape external markup loaders accept.
    pub fn into_factory_fn(self) -> ControllerFactoryFn {
        Box::new(move |type_id| match self.controller(type_id) {
            Ok(result) => result.map(|(instance, _)| instance),
            Err(error) => {
                warn!("Failed to produce controller: {}", error);
                None
            }
        })
    }

    fn handle_miss(
        &self,
        error: ContainerError,
    ) -> Result<Option<(ComponentInstanceAnyPtr, CastFunction)>, ContainerError> {
        match self.container.failure_policy() {
            FailurePolicy::Strict => Err(error),
            FailurePolicy::Lenient => {
                warn!("Letting the loader handle controller creation: {}", error);
                Ok(None)
            }
        }
    }
}
