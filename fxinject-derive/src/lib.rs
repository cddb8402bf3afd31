//! Derive and attribute macros for the `fxinject` crate - see its documentation for usage.

use crate::attributes::ComponentAliasAttributes;
use crate::component::{expand_component, expand_component_alias, expand_injectable};
use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput, Error, ItemImpl, ItemTrait};

mod attributes;
mod component;

/// Derives `Component` for a struct and submits it to the registration table, tagged with the
/// module path of the definition site. Configured with `#[component(...)]` attributes.
#[proc_macro_derive(Component, attributes(component))]
pub fn generate_component(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_component(&input)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}

/// Marks a trait as injectable, making `dyn Trait + Send + Sync` dependencies resolvable once
/// implementations are registered with `#[component_alias]`.
#[proc_macro_attribute]
pub fn injectable(args: TokenStream, input: TokenStream) -> TokenStream {
    if !args.is_empty() {
        return Error::new(
            proc_macro2::Span::call_site(),
            "injectable does not take arguments",
        )
        .into_compile_error()
        .into();
    }

    let item = parse_macro_input!(input as ItemTrait);
    expand_injectable(&item)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}

/// Registers a trait implementation as an alias of a component, making the component
/// resolvable as `dyn Trait + Send + Sync`. `#[component_alias(primary)]` marks the
/// implementation to prefer when several components share the alias.
#[proc_macro_attribute]
pub fn component_alias(args: TokenStream, input: TokenStream) -> TokenStream {
    let args = parse_macro_input!(args as ComponentAliasAttributes);
    let item = parse_macro_input!(input as ItemImpl);
    expand_component_alias(&item, &args)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}
