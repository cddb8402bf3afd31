//! Discovery of components under a base module.
//!
//! The actual "classpath walk" is the registration table populated at build time - a scanner
//! only filters it down to the requested base module and reports misconfiguration. A scanner
//! never degrades a failure to an empty result: a malformed base module always surfaces as
//! [ScanFailure](crate::error::ContainerError::ScanFailure), since an empty result would
//! silently mask the problem.

use crate::error::ContainerError;
use crate::registration::{registered_components, ComponentDefinition};
use itertools::Itertools;
#[cfg(test)]
use mockall::automock;
use tracing::debug;

/// Source of component definitions for a [Container](crate::container::Container) scan.
#[cfg_attr(test, automock)]
pub trait ComponentScanner {
    /// Returns the definitions of all components in or under the given base module. The
    /// returned order is the order in which the container instantiates components, so
    /// implementations must document it.
    fn find_components(
        &self,
        base_module: &str,
    ) -> Result<Vec<ComponentDefinition>, ContainerError>;
}

/// Scanner over the build-time registration table. Results are sorted by module path and then
/// type name, which fixes the instantiation order of a scan.
#[derive(Default, Copy, Clone, Eq, PartialEq, Debug)]
pub struct RegistrationScanner;

impl ComponentScanner for RegistrationScanner {
    fn find_components(
        &self,
        base_module: &str,
    ) -> Result<Vec<ComponentDefinition>, ContainerError> {
        validate_base_module(base_module)?;

        let components = registered_components()
            .into_iter()
            .filter(|definition| module_matches(base_module, definition.module_path))
            .sorted_by_key(|definition| (definition.module_path, definition.target_name))
            .collect_vec();

        debug!(
            "Found {} components under base module {}.",
            components.len(),
            base_module
        );

        Ok(components)
    }
}

/// Scanner over an explicit definition list - the manual registration alternative to the
/// derive macros, and the seam for pinning discovery order in tests. Definitions are returned
/// in insertion order.
#[derive(Default, Clone)]
pub struct FixedScanner {
    definitions: Vec<ComponentDefinition>,
}

impl FixedScanner {
    pub fn new(definitions: Vec<ComponentDefinition>) -> Self {
        Self { definitions }
    }
}

impl ComponentScanner for FixedScanner {
    fn find_components(
        &self,
        base_module: &str,
    ) -> Result<Vec<ComponentDefinition>, ContainerError> {
        validate_base_module(base_module)?;

        Ok(self
            .definitions
            .iter()
            .filter(|definition| module_matches(base_module, definition.module_path))
            .cloned()
            .collect_vec())
    }
}

fn validate_base_module(base_module: &str) -> Result<(), ContainerError> {
    let valid_segment = |segment: &str| {
        !segment.is_empty()
            && segment
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_')
            && !segment.starts_with(|c: char| c.is_numeric())
    };

    if base_module.is_empty() {
        return Err(ContainerError::ScanFailure {
            base_module: base_module.to_string(),
            message: "base module must not be empty".to_string(),
        });
    }

    if !base_module.split("::").all(valid_segment) {
        return Err(ContainerError::ScanFailure {
            base_module: base_module.to_string(),
            message: "base module is not a valid module path".to_string(),
        });
    }

    Ok(())
}

fn module_matches(base_module: &str, module_path: &str) -> bool {
    module_path
        .strip_prefix(base_module)
        .map(|rest| rest.is_empty() || rest.starts_with("::"))
        .unwrap_or(false)
}
