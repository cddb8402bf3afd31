//! Application entry points - one-call setup of a scanned container and its controller
//! factory.

use crate::container::{Container, ContainerBuilder};
use crate::controller::ControllerFactory;
use crate::error::ContainerError;
use std::sync::Arc;
use tracing::info;

/// Creates a container with default configuration - the build-time registration table as the
/// component source and the strict failure policy.
pub fn create_container() -> Container {
    ContainerBuilder::new().build()
}

/// Creates a default container, scans the given base modules in order and wraps the result in
/// a [ControllerFactory] ready to be handed to a markup loader.
pub fn initialize(
    base_modules: &[&str],
) -> Result<(Arc<Container>, ControllerFactory), ContainerError> {
    let container = Arc::new(create_container());
    for base_module in base_modules {
        container.scan(base_module)?;
    }

    info!(
        "Injection initialized with {} components.",
        container.component_count()
    );

    Ok((container.clone(), ControllerFactory::new(container)))
}

/// Scans the module the macro is invoked in, which makes a call at the application's
/// composition root pick up every component defined in or under it:
///
/// ```ignore
/// let container = fxinject::bootstrap::create_container();
/// fxinject::scan!(container)?;
/// ```
///
/// An explicit base module can be passed as the second argument.
#[macro_export]
macro_rules! scan {
    ($container:expr) => {
        $container.scan(module_path!())
    };
    ($container:expr, $base_module:expr) => {
        $container.scan($base_module)
    };
}
