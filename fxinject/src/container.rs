//! Core functionality for creating and retrieving [Component](crate::component::Component)
//! instances.
//!
//! A [Container] owns the singleton registry - a mapping from declared component type to
//! exactly one instance per scan. [Scanning](Container::scan) runs in two strictly ordered
//! phases: first every discovered component is constructed, with constructor dependencies
//! resolved against the registry *as populated so far* (discovery order matters here), then
//! every stored instance has its late-bound fields and wiring methods injected against the
//! fully populated registry (discovery order does not matter here). Each registry entry
//! carries an explicit [WiringState] so the intermediate constructed-but-not-yet-wired state
//! is visible rather than incidental.
//!
//! The registry supports concurrent reads and inserts, but the two-phase protocol gives no
//! cross-thread guarantee that wiring has completed - callers must not retrieve components
//! concurrently with an in-flight scan, or they may observe `Constructed` entries.

use crate::component::Component;
use crate::error::ContainerError;
use crate::instance_provider::{
    CastFunction, ComponentInstanceAnyPtr, ComponentInstancePtr, DependencyResolver,
};
use crate::registration::{
    registered_aliases, ComponentAliasDefinition, ComponentDefinition, InjectorFunction,
};
use crate::scanner::{ComponentScanner, RegistrationScanner};
use fxhash::FxHashMap;
use itertools::Itertools;
use std::any::{type_name, TypeId};
use std::sync::{PoisonError, RwLock};
use tracing::{debug, info, warn};

pub type ComponentScannerPtr = Box<dyn ComponentScanner + Send + Sync>;

/// Governs how a [Container] reacts to failures during scanning and controller retrieval.
/// Strict is the default: lenient mode starts applications with silently missing
/// dependencies, which is only acceptable as an explicit opt-in.
#[derive(Default, Copy, Clone, Eq, PartialEq, Debug)]
pub enum FailurePolicy {
    /// Abort the scan on the first failure and surface it. The registry keeps the components
    /// registered up to that point - there is no rollback.
    #[default]
    Strict,
    /// Log failures and continue with the remaining work, leaving the offending component
    /// absent or partially wired.
    Lenient,
}

/// Status of a registry entry. Entries are `Constructed` between the two scan phases and
/// `Wired` once field and method injection has completed for them.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum WiringState {
    Constructed,
    Wired,
}

struct RegistryEntry {
    instance: ComponentInstanceAnyPtr,
    cast: CastFunction,
    injector: Option<InjectorFunction>,
    state: WiringState,
    type_name: &'static str,
}

struct AliasEntry {
    target: TypeId,
    alias_name: &'static str,
    is_primary: bool,
    cast: CastFunction,
}

/// Builder for a [Container] with sensible defaults - the registration-table scanner, the
/// alias table submitted at build time, and the strict failure policy.
pub struct ContainerBuilder {
    scanner: ComponentScannerPtr,
    failure_policy: FailurePolicy,
    aliases: Vec<ComponentAliasDefinition>,
}

impl ContainerBuilder {
    pub fn new() -> Self {
        Self {
            scanner: Box::new(RegistrationScanner),
            failure_policy: FailurePolicy::default(),
            aliases: registered_aliases(),
        }
    }

    /// Sets the source of component definitions for scans.
    pub fn with_scanner(mut self, scanner: ComponentScannerPtr) -> Self {
        self.scanner = scanner;
        self
    }

    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    /// Replaces the alias table, which by default contains all aliases submitted to the
    /// registration table.
    pub fn with_alias_definitions(mut self, aliases: Vec<ComponentAliasDefinition>) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn build(self) -> Container {
        let mut aliases: FxHashMap<TypeId, Vec<AliasEntry>> = FxHashMap::default();
        for definition in self.aliases {
            aliases
                .entry(definition.alias_type)
                .or_default()
                .push(AliasEntry {
                    target: definition.target_type,
                    alias_name: definition.alias_name,
                    is_primary: definition.metadata.is_primary,
                    cast: definition.metadata.cast,
                });
        }

        Container {
            scanner: self.scanner,
            failure_policy: self.failure_policy,
            aliases,
            components: RwLock::default(),
            names: RwLock::default(),
        }
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The injection container - owns the singleton registry and the two-phase build algorithm.
pub struct Container {
    scanner: ComponentScannerPtr,
    failure_policy: FailurePolicy,
    aliases: FxHashMap<TypeId, Vec<AliasEntry>>,
    components: RwLock<FxHashMap<TypeId, RegistryEntry>>,
    names: RwLock<FxHashMap<String, TypeId>>,
}

impl Container {
    /// Scans the given base module for components and registers a wired singleton instance
    /// per discovered type. Scans are additive: a repeated scan overwrites entries under the
    /// same keys with fresh instances instead of doubling the registry.
    ///
    /// Scanner failures always abort, regardless of [FailurePolicy]; per-component failures
    /// follow the configured policy.
    pub fn scan(&self, base_module: &str) -> Result<(), ContainerError> {
        let definitions = self.scanner.find_components(base_module)?;
        debug!(
            "Scanning {} components under base module {}.",
            definitions.len(),
            base_module
        );

        self.instantiate_components(&definitions)?;
        self.inject_components()?;
        self.log_registration_summary();

        Ok(())
    }

    /// Phase 1: construct every discovered component in discovery order. Constructor
    /// dependencies resolve against the registry as populated so far, so a component
    /// discovered before its constructor dependency fails to resolve it.
    fn instantiate_components(
        &self,
        definitions: &[ComponentDefinition],
    ) -> Result<(), ContainerError> {
        for definition in definitions {
            match (definition.metadata.constructor)(self) {
                Ok(instance) => self.store_constructed(definition, instance),
                Err(error) => self.handle_failure(definition.target_name, error)?,
            }
        }

        Ok(())
    }

    /// Phase 2: run the injector of every stored instance against the fully populated
    /// registry, then mark the entry as wired. Also re-wires instances surviving from
    /// earlier scans, so their late-bound fields point at freshly registered dependencies.
    fn inject_components(&self) -> Result<(), ContainerError> {
        let snapshot = {
            let components = self.read_components();
            components
                .iter()
                .map(|(type_id, entry)| {
                    (*type_id, entry.type_name, entry.instance.clone(), entry.injector)
                })
                .sorted_by_key(|(_, type_name, ..)| *type_name)
                .collect_vec()
        };

        for (type_id, type_name, instance, injector) in snapshot {
            if let Some(injector) = injector {
                if let Err(error) = injector(&instance, self) {
                    self.handle_failure(type_name, error)?;
                    continue;
                }
            }

            self.mark_wired(type_id);
        }

        Ok(())
    }

    fn store_constructed(&self, definition: &ComponentDefinition, instance: ComponentInstanceAnyPtr) {
        {
            let mut components = self
                .components
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            components.insert(
                definition.target,
                RegistryEntry {
                    instance,
                    cast: definition.metadata.cast,
                    injector: definition.metadata.injector,
                    state: WiringState::Constructed,
                    type_name: definition.target_name,
                },
            );
        }

        let mut names = self.names.write().unwrap_or_else(PoisonError::into_inner);
        names.retain(|_, target| *target != definition.target);
        for name in &definition.metadata.names {
            names.insert(name.clone(), definition.target);
        }
    }

    fn mark_wired(&self, type_id: TypeId) {
        let mut components = self
            .components
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = components.get_mut(&type_id) {
            entry.state = WiringState::Wired;
        }
    }

    fn handle_failure(
        &self,
        type_name: &'static str,
        error: ContainerError,
    ) -> Result<(), ContainerError> {
        match self.failure_policy {
            FailurePolicy::Strict => Err(error),
            FailurePolicy::Lenient => {
                warn!("Skipping component {}: {}", type_name, error);
                Ok(())
            }
        }
    }

    fn log_registration_summary(&self) {
        let components = self.read_components();
        info!("Registered {} components.", components.len());
        for type_name in components.values().map(|entry| entry.type_name).sorted() {
            debug!("- Registered component: {}", type_name);
        }
    }

    /// Retrieves a scanned component by its declared type - a direct keyed lookup without the
    /// alias table. A miss reports [ComponentNotFound](ContainerError::ComponentNotFound).
    pub fn get_component<T: Component>(&self) -> Result<ComponentInstancePtr<T>, ContainerError> {
        let type_id = TypeId::of::<T>();
        let instance = {
            let components = self.read_components();
            components.get(&type_id).map(|entry| entry.instance.clone())
        }
        .ok_or(ContainerError::ComponentNotFound {
            type_id,
            type_name: Some(type_name::<T>()),
        })?;

        T::downcast(instance).map_err(|_| ContainerError::IncompatibleComponent {
            type_id,
            type_name: Some(type_name::<T>()),
        })
    }

    /// Retrieves a component like [get_component](Container::get_component) does, but yields
    /// `None` on a miss.
    pub fn get_component_option<T: Component>(
        &self,
    ) -> Result<Option<ComponentInstancePtr<T>>, ContainerError> {
        match self.get_component::<T>() {
            Ok(instance) => Ok(Some(instance)),
            Err(ContainerError::ComponentNotFound { .. }) => Ok(None),
            Err(error) => Err(error),
        }
    }

    /// Returns the wiring state of the registry entry for the given type, if present.
    pub fn wiring_state(&self, type_id: TypeId) -> Option<WiringState> {
        self.read_components()
            .get(&type_id)
            .map(|entry| entry.state)
    }

    pub fn component_count(&self) -> usize {
        self.read_components().len()
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    pub(crate) fn component_by_id(
        &self,
        type_id: TypeId,
    ) -> Option<(ComponentInstanceAnyPtr, CastFunction)> {
        self.read_components()
            .get(&type_id)
            .map(|entry| (entry.instance.clone(), entry.cast))
    }

    fn read_components(
        &self,
    ) -> std::sync::RwLockReadGuard<'_, FxHashMap<TypeId, RegistryEntry>> {
        self.components
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl DependencyResolver for Container {
    fn resolve_type(
        &self,
        type_id: TypeId,
    ) -> Result<(ComponentInstanceAnyPtr, CastFunction), ContainerError> {
        let components = self.read_components();

        if let Some(entry) = components.get(&type_id) {
            return Ok((entry.instance.clone(), entry.cast));
        }

        let mut alias_name = None;
        if let Some(candidates) = self.aliases.get(&type_id) {
            alias_name = candidates.first().map(|alias| alias.alias_name);

            let live = candidates
                .iter()
                .filter(|alias| components.contains_key(&alias.target))
                .collect_vec();

            let selected = match live.len() {
                0 => None,
                1 => Some(live[0]),
                _ => {
                    let primary = live
                        .iter()
                        .filter(|alias| alias.is_primary)
                        .exactly_one()
                        .map_err(|_| ContainerError::AmbiguousDependency {
                            type_id,
                            type_name: alias_name,
                        })?;
                    Some(*primary)
                }
            };

            if let Some(alias) = selected {
                let entry = &components[&alias.target];
                return Ok((entry.instance.clone(), alias.cast));
            }
        }

        Err(ContainerError::DependencyNotFound {
            type_id,
            type_name: alias_name,
        })
    }

    fn resolve_qualified(
        &self,
        qualifier: &str,
        type_id: TypeId,
    ) -> Result<(ComponentInstanceAnyPtr, CastFunction), ContainerError> {
        let target = {
            let names = self.names.read().unwrap_or_else(PoisonError::into_inner);
            names.get(qualifier).copied()
        }
        .ok_or_else(|| ContainerError::UnknownQualifier {
            qualifier: qualifier.to_string(),
        })?;

        let components = self.read_components();
        let entry = components
            .get(&target)
            .ok_or(ContainerError::DependencyNotFound {
                type_id,
                type_name: None,
            })?;

        if target == type_id {
            return Ok((entry.instance.clone(), entry.cast));
        }

        self.aliases
            .get(&type_id)
            .and_then(|candidates| candidates.iter().find(|alias| alias.target == target))
            .map(|alias| (entry.instance.clone(), alias.cast))
            .ok_or(ContainerError::IncompatibleComponent {
                type_id,
                type_name: Some(entry.type_name),
            })
    }
}

#[cfg(test)]
mod tests {
    use crate::component::{Component, ComponentDowncast, Injectable, Injected};
    use crate::container::{Container, ContainerBuilder, FailurePolicy, WiringState};
    use crate::error::ContainerError;
    use crate::instance_provider::{
        ComponentInstanceAnyPtr, ComponentInstancePtr, DependencyResolver,
        TypedDependencyResolver,
    };
    use crate::registration::{
        ComponentAliasDefinition, ComponentAliasMetadata, ComponentDefinition, ComponentMetadata,
    };
    use crate::scanner::{FixedScanner, MockComponentScanner};
    use std::any::{Any, TypeId};

    #[derive(Debug)]
    struct Repository;

    impl Injectable for Repository {}

    impl ComponentDowncast<Repository> for Repository {
        fn downcast(
            source: ComponentInstanceAnyPtr,
        ) -> Result<ComponentInstancePtr<Self>, ComponentInstanceAnyPtr> {
            source.downcast()
        }
    }

    impl Component for Repository {
        fn construct(_resolver: &dyn DependencyResolver) -> Result<Self, ContainerError> {
            Ok(Repository)
        }
    }

    struct Service {
        repository: ComponentInstancePtr<Repository>,
    }

    impl Injectable for Service {}

    impl ComponentDowncast<Service> for Service {
        fn downcast(
            source: ComponentInstanceAnyPtr,
        ) -> Result<ComponentInstancePtr<Self>, ComponentInstanceAnyPtr> {
            source.downcast()
        }
    }

    impl Component for Service {
        fn construct(resolver: &dyn DependencyResolver) -> Result<Self, ContainerError> {
            Ok(Self {
                repository: resolver.find_dependency::<Repository>()?,
            })
        }
    }

    struct AuditLog {
        repository: Injected<Repository>,
    }

    impl Injectable for AuditLog {}

    impl ComponentDowncast<AuditLog> for AuditLog {
        fn downcast(
            source: ComponentInstanceAnyPtr,
        ) -> Result<ComponentInstancePtr<Self>, ComponentInstanceAnyPtr> {
            source.downcast()
        }
    }

    impl Component for AuditLog {
        fn construct(_resolver: &dyn DependencyResolver) -> Result<Self, ContainerError> {
            Ok(Self {
                repository: Injected::default(),
            })
        }

        fn inject(&self, resolver: &dyn DependencyResolver) -> Result<(), ContainerError> {
            self.repository
                .fill(resolver, None)
                .map_err(|source| ContainerError::FieldInjectionFailure {
                    type_name: "AuditLog",
                    field: "repository",
                    source: Box::new(source),
                })
        }
    }

    fn repository_definition() -> ComponentDefinition {
        fn constructor(
            resolver: &dyn DependencyResolver,
        ) -> Result<ComponentInstanceAnyPtr, ContainerError> {
            Repository::construct(resolver)
                .map(|component| ComponentInstancePtr::new(component) as ComponentInstanceAnyPtr)
        }

        fn cast(
            instance: ComponentInstanceAnyPtr,
        ) -> Result<Box<dyn Any>, ComponentInstanceAnyPtr> {
            Repository::downcast(instance).map(|pointer| Box::new(pointer) as Box<dyn Any>)
        }

        ComponentDefinition {
            target: TypeId::of::<Repository>(),
            target_name: "Repository",
            module_path: "app::data",
            metadata: ComponentMetadata {
                names: vec!["repository".to_string()],
                constructor,
                injector: None,
                fallback_constructor: None,
                cast,
            },
        }
    }

    fn service_definition() -> ComponentDefinition {
        fn constructor(
            resolver: &dyn DependencyResolver,
        ) -> Result<ComponentInstanceAnyPtr, ContainerError> {
            Service::construct(resolver)
                .map(|component| ComponentInstancePtr::new(component) as ComponentInstanceAnyPtr)
        }

        fn cast(
            instance: ComponentInstanceAnyPtr,
        ) -> Result<Box<dyn Any>, ComponentInstanceAnyPtr> {
            Service::downcast(instance).map(|pointer| Box::new(pointer) as Box<dyn Any>)
        }

        ComponentDefinition {
            target: TypeId::of::<Service>(),
            target_name: "Service",
            module_path: "app::service",
            metadata: ComponentMetadata {
                names: vec!["service".to_string()],
                constructor,
                injector: None,
                fallback_constructor: None,
                cast,
            },
        }
    }

    fn audit_log_definition() -> ComponentDefinition {
        fn constructor(
            resolver: &dyn DependencyResolver,
        ) -> Result<ComponentInstanceAnyPtr, ContainerError> {
            AuditLog::construct(resolver)
                .map(|component| ComponentInstancePtr::new(component) as ComponentInstanceAnyPtr)
        }

        fn injector(
            instance: &ComponentInstanceAnyPtr,
            resolver: &dyn DependencyResolver,
        ) -> Result<(), ContainerError> {
            let instance = AuditLog::downcast(instance.clone()).map_err(|_| {
                ContainerError::IncompatibleComponent {
                    type_id: TypeId::of::<AuditLog>(),
                    type_name: Some("AuditLog"),
                }
            })?;
            instance.inject(resolver)
        }

        fn cast(
            instance: ComponentInstanceAnyPtr,
        ) -> Result<Box<dyn Any>, ComponentInstanceAnyPtr> {
            AuditLog::downcast(instance).map(|pointer| Box::new(pointer) as Box<dyn Any>)
        }

        ComponentDefinition {
            target: TypeId::of::<AuditLog>(),
            target_name: "AuditLog",
            module_path: "app::audit",
            metadata: ComponentMetadata {
                names: vec!["audit_log".to_string()],
                constructor,
                injector: Some(injector),
                fallback_constructor: None,
                cast,
            },
        }
    }

    fn create_container(
        definitions: Vec<ComponentDefinition>,
        failure_policy: FailurePolicy,
    ) -> Container {
        let mut scanner = MockComponentScanner::new();
        scanner
            .expect_find_components()
            .returning(move |_| Ok(definitions.clone()));

        ContainerBuilder::new()
            .with_scanner(Box::new(scanner))
            .with_failure_policy(failure_policy)
            .build()
    }

    #[test]
    fn should_register_one_wired_singleton_per_component() {
        let container = create_container(
            vec![repository_definition(), service_definition()],
            FailurePolicy::Strict,
        );
        container.scan("app").unwrap();

        assert_eq!(container.component_count(), 2);
        assert_eq!(
            container.wiring_state(TypeId::of::<Repository>()),
            Some(WiringState::Wired)
        );

        let first = container.get_component::<Repository>().unwrap();
        let second = container.get_component::<Repository>().unwrap();
        assert!(ComponentInstancePtr::ptr_eq(&first, &second));
    }

    #[test]
    fn should_fail_scan_when_constructor_dependency_is_discovered_later() {
        let container = create_container(
            vec![service_definition(), repository_definition()],
            FailurePolicy::Strict,
        );

        assert!(matches!(
            container.scan("app").unwrap_err(),
            ContainerError::DependencyNotFound { type_id, .. } if type_id == TypeId::of::<Repository>()
        ));
        assert_eq!(container.component_count(), 0);
    }

    #[test]
    fn should_resolve_constructor_dependency_discovered_earlier() {
        let container = create_container(
            vec![repository_definition(), service_definition()],
            FailurePolicy::Strict,
        );
        container.scan("app").unwrap();

        let service = container.get_component::<Service>().unwrap();
        let repository = container.get_component::<Repository>().unwrap();
        assert!(ComponentInstancePtr::ptr_eq(&service.repository, &repository));
    }

    #[test]
    fn should_overwrite_entries_with_fresh_instances_on_rescan() {
        let container = create_container(vec![repository_definition()], FailurePolicy::Strict);

        container.scan("app").unwrap();
        let first = container.get_component::<Repository>().unwrap();

        container.scan("app").unwrap();
        let second = container.get_component::<Repository>().unwrap();

        assert_eq!(container.component_count(), 1);
        assert!(!ComponentInstancePtr::ptr_eq(&first, &second));
    }

    #[test]
    fn should_skip_failing_component_in_lenient_mode() {
        // Service is discovered first, so its constructor cannot resolve Repository yet.
        let container = create_container(
            vec![service_definition(), repository_definition()],
            FailurePolicy::Lenient,
        );
        container.scan("app").unwrap();

        assert_eq!(container.component_count(), 1);
        assert!(container.get_component_option::<Service>().unwrap().is_none());
        assert!(container
            .get_component_option::<Repository>()
            .unwrap()
            .is_some());
    }

    #[test]
    fn should_always_propagate_scanner_failure() {
        let mut scanner = MockComponentScanner::new();
        scanner.expect_find_components().returning(|base_module| {
            Err(ContainerError::ScanFailure {
                base_module: base_module.to_string(),
                message: "indexing failed".to_string(),
            })
        });

        let container = ContainerBuilder::new()
            .with_scanner(Box::new(scanner))
            .with_failure_policy(FailurePolicy::Lenient)
            .build();

        assert!(matches!(
            container.scan("app").unwrap_err(),
            ContainerError::ScanFailure { .. }
        ));
    }

    #[test]
    fn should_wire_late_bound_fields_independently_of_discovery_order() {
        for definitions in [
            vec![audit_log_definition(), repository_definition()],
            vec![repository_definition(), audit_log_definition()],
        ] {
            let container = create_container(definitions, FailurePolicy::Strict);
            container.scan("app").unwrap();

            let audit_log = container.get_component::<AuditLog>().unwrap();
            let repository = container.get_component::<Repository>().unwrap();
            assert!(ComponentInstancePtr::ptr_eq(
                &audit_log.repository.get().unwrap(),
                &repository
            ));
            assert_eq!(
                container.wiring_state(TypeId::of::<AuditLog>()),
                Some(WiringState::Wired)
            );
        }
    }

    #[test]
    fn should_surface_field_injection_failure_in_strict_mode() {
        // No Repository registered, so wiring AuditLog must fail.
        let container = create_container(vec![audit_log_definition()], FailurePolicy::Strict);

        assert!(matches!(
            container.scan("app").unwrap_err(),
            ContainerError::FieldInjectionFailure { field: "repository", .. }
        ));
    }

    #[test]
    fn should_leave_component_constructed_on_lenient_injection_failure() {
        let container = create_container(vec![audit_log_definition()], FailurePolicy::Lenient);
        container.scan("app").unwrap();

        assert_eq!(
            container.wiring_state(TypeId::of::<AuditLog>()),
            Some(WiringState::Constructed)
        );
        let audit_log = container.get_component::<AuditLog>().unwrap();
        assert!(!audit_log.repository.is_wired());
    }

    #[test]
    fn should_report_miss_on_unregistered_component() {
        let container = create_container(vec![], FailurePolicy::Strict);
        container.scan("app").unwrap();

        assert!(matches!(
            container.get_component::<Repository>().unwrap_err(),
            ContainerError::ComponentNotFound { type_id, .. } if type_id == TypeId::of::<Repository>()
        ));
        assert!(container
            .get_component_option::<Repository>()
            .unwrap()
            .is_none());
    }

    #[test]
    fn should_resolve_dependency_by_qualifier() {
        let container = create_container(vec![repository_definition()], FailurePolicy::Strict);
        container.scan("app").unwrap();

        let by_qualifier = container
            .find_dependency_qualified::<Repository>("repository")
            .unwrap();
        let direct = container.get_component::<Repository>().unwrap();
        assert!(ComponentInstancePtr::ptr_eq(&by_qualifier, &direct));

        assert!(matches!(
            container
                .find_dependency_qualified::<Repository>("missing")
                .unwrap_err(),
            ContainerError::UnknownQualifier { .. }
        ));
    }

    #[test]
    fn should_filter_definitions_by_base_module_with_fixed_scanner() {
        let container = ContainerBuilder::new()
            .with_scanner(Box::new(FixedScanner::new(vec![
                repository_definition(),
                service_definition(),
            ])))
            .build();

        // only app::data matches, so Service is never discovered
        container.scan("app::data").unwrap();
        assert_eq!(container.component_count(), 1);
        assert!(container.get_component_option::<Service>().unwrap().is_none());
    }

    mod aliases {
        use super::*;

        trait DataSource: Send + Sync + std::fmt::Debug {
            fn label(&self) -> &'static str;
        }

        impl Injectable for dyn DataSource + Send + Sync {}

        #[derive(Debug)]
        struct PrimarySource;
        #[derive(Debug)]
        struct SecondarySource;

        impl DataSource for PrimarySource {
            fn label(&self) -> &'static str {
                "primary"
            }
        }

        impl DataSource for SecondarySource {
            fn label(&self) -> &'static str {
                "secondary"
            }
        }

        fn simple_definition<T: Send + Sync + 'static>(
            target_name: &'static str,
        ) -> ComponentDefinition {
            fn cast_unavailable(
                instance: ComponentInstanceAnyPtr,
            ) -> Result<Box<dyn Any>, ComponentInstanceAnyPtr> {
                Err(instance)
            }

            ComponentDefinition {
                target: TypeId::of::<T>(),
                target_name,
                module_path: "app::sources",
                metadata: ComponentMetadata {
                    names: vec![],
                    constructor: |_| unreachable!(),
                    injector: None,
                    fallback_constructor: None,
                    cast: cast_unavailable,
                },
            }
        }

        fn primary_source_definition() -> ComponentDefinition {
            fn constructor(
                _resolver: &dyn DependencyResolver,
            ) -> Result<ComponentInstanceAnyPtr, ContainerError> {
                Ok(ComponentInstancePtr::new(PrimarySource) as ComponentInstanceAnyPtr)
            }

            fn cast(
                instance: ComponentInstanceAnyPtr,
            ) -> Result<Box<dyn Any>, ComponentInstanceAnyPtr> {
                instance
                    .downcast::<PrimarySource>()
                    .map(|pointer| Box::new(pointer) as Box<dyn Any>)
            }

            let mut definition = simple_definition::<PrimarySource>("PrimarySource");
            definition.metadata.constructor = constructor;
            definition.metadata.cast = cast;
            definition
        }

        fn secondary_source_definition() -> ComponentDefinition {
            fn constructor(
                _resolver: &dyn DependencyResolver,
            ) -> Result<ComponentInstanceAnyPtr, ContainerError> {
                Ok(ComponentInstancePtr::new(SecondarySource) as ComponentInstanceAnyPtr)
            }

            fn cast(
                instance: ComponentInstanceAnyPtr,
            ) -> Result<Box<dyn Any>, ComponentInstanceAnyPtr> {
                instance
                    .downcast::<SecondarySource>()
                    .map(|pointer| Box::new(pointer) as Box<dyn Any>)
            }

            let mut definition = simple_definition::<SecondarySource>("SecondarySource");
            definition.metadata.constructor = constructor;
            definition.metadata.cast = cast;
            definition
        }

        fn primary_alias(is_primary: bool) -> ComponentAliasDefinition {
            fn cast(
                instance: ComponentInstanceAnyPtr,
            ) -> Result<Box<dyn Any>, ComponentInstanceAnyPtr> {
                instance.downcast::<PrimarySource>().map(|pointer| {
                    Box::new(pointer as ComponentInstancePtr<dyn DataSource + Send + Sync>)
                        as Box<dyn Any>
                })
            }

            ComponentAliasDefinition {
                alias_type: TypeId::of::<dyn DataSource + Send + Sync>(),
                target_type: TypeId::of::<PrimarySource>(),
                alias_name: "dyn DataSource",
                target_name: "PrimarySource",
                metadata: ComponentAliasMetadata { is_primary, cast },
            }
        }

        fn secondary_alias() -> ComponentAliasDefinition {
            fn cast(
                instance: ComponentInstanceAnyPtr,
            ) -> Result<Box<dyn Any>, ComponentInstanceAnyPtr> {
                instance.downcast::<SecondarySource>().map(|pointer| {
                    Box::new(pointer as ComponentInstancePtr<dyn DataSource + Send + Sync>)
                        as Box<dyn Any>
                })
            }

            ComponentAliasDefinition {
                alias_type: TypeId::of::<dyn DataSource + Send + Sync>(),
                target_type: TypeId::of::<SecondarySource>(),
                alias_name: "dyn DataSource",
                target_name: "SecondarySource",
                metadata: ComponentAliasMetadata {
                    is_primary: false,
                    cast,
                },
            }
        }

        fn create_alias_container(
            definitions: Vec<ComponentDefinition>,
            aliases: Vec<ComponentAliasDefinition>,
        ) -> Container {
            let mut scanner = MockComponentScanner::new();
            scanner
                .expect_find_components()
                .returning(move |_| Ok(definitions.clone()));

            ContainerBuilder::new()
                .with_scanner(Box::new(scanner))
                .with_alias_definitions(aliases)
                .build()
        }

        #[test]
        fn should_resolve_alias_with_single_live_target() {
            let container = create_alias_container(
                vec![primary_source_definition()],
                vec![primary_alias(false), secondary_alias()],
            );
            container.scan("app").unwrap();

            let source = container
                .find_dependency::<dyn DataSource + Send + Sync>()
                .unwrap();
            assert_eq!(source.label(), "primary");
        }

        #[test]
        fn should_reject_ambiguous_alias_without_primary_marker() {
            let container = create_alias_container(
                vec![primary_source_definition(), secondary_source_definition()],
                vec![primary_alias(false), secondary_alias()],
            );
            container.scan("app").unwrap();

            assert!(matches!(
                container
                    .find_dependency::<dyn DataSource + Send + Sync>()
                    .unwrap_err(),
                ContainerError::AmbiguousDependency { .. }
            ));
        }

        #[test]
        fn should_prefer_primary_alias_target() {
            let container = create_alias_container(
                vec![primary_source_definition(), secondary_source_definition()],
                vec![primary_alias(true), secondary_alias()],
            );
            container.scan("app").unwrap();

            let source = container
                .find_dependency::<dyn DataSource + Send + Sync>()
                .unwrap();
            assert_eq!(source.label(), "primary");
        }

        #[test]
        fn should_report_missing_dependency_for_alias_without_live_targets() {
            let container = create_alias_container(
                vec![],
                vec![primary_alias(false), secondary_alias()],
            );
            container.scan("app").unwrap();

            assert!(matches!(
                container
                    .find_dependency::<dyn DataSource + Send + Sync>()
                    .unwrap_err(),
                ContainerError::DependencyNotFound { .. }
            ));
        }
    }
}
