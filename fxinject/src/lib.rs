//! A dependency injection container bound to the controller-creation lifecycle of GUI markup
//! loaders.
//!
//! Markup loaders instantiate controller classes themselves, which leaves controllers without
//! their dependencies. This crate closes that gap: components are registered at build time,
//! discovered by [scanning](container::Container::scan) a base module, created as wired
//! singletons in two strictly ordered phases (construct, then inject), and served to the
//! loader through a [controller factory](controller::ControllerFactory).
//!
//! ### Example
//!
//! ```
//! use fxinject::bootstrap;
//! use fxinject::instance_provider::ComponentInstancePtr;
//! use fxinject::{scan, Component};
//!
//! #[derive(Component)]
//! struct Repository;
//!
//! #[derive(Component)]
//! struct Service {
//!     repository: ComponentInstancePtr<Repository>,
//! }
//!
//! # fn main() -> Result<(), fxinject::error::ContainerError> {
//! let container = bootstrap::create_container();
//! scan!(container)?;
//!
//! let service = container.get_component::<Service>()?;
//! # Ok(())
//! # }
//! ```
//!
//! For handing the container to a markup loader, see [bootstrap::initialize] and
//! [controller::ControllerFactory::into_factory_fn].
//!
//! ### Features
//!
//! * `derive` - automatic deriving of [Component](component::Component) and registration of
//!   component aliases (enabled by default).

pub mod bootstrap;
pub mod component;
pub mod container;
pub mod controller;
pub mod error;
pub mod instance_provider;
pub mod registration;
pub mod scanner;

#[cfg(feature = "derive")]
pub use fxinject_derive::{component_alias, injectable, Component};
