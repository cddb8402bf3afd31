use crate::attributes::{
    ComponentAliasAttributes, ComponentAttributes, DefaultDefinition, FieldAttributes, Parameter,
};
use convert_case::{Case, Casing};
use itertools::Itertools;
use proc_macro2::{Ident, TokenStream};
use quote::quote;
use std::ops::Deref;
use syn::spanned::Spanned;
use syn::{
    Attribute, Data, DataStruct, DeriveInput, Error, Expr, ExprArray, ExprLit, Field, Fields,
    Index, Lit, LitStr, Member, Result, Type,
};

const COMPONENT: &str = "component";

fn extract_field_attributes(attributes: &[Attribute]) -> Result<FieldAttributes> {
    attributes
        .iter()
        .filter_map(|attribute| {
            if attribute.path().is_ident(COMPONENT) {
                Some(FieldAttributes::try_from(attribute))
            } else {
                None
            }
        })
        .next()
        .transpose()
        .map(Option::unwrap_or_default)
}

fn extract_component_attributes(attributes: &[Attribute]) -> Result<Option<ComponentAttributes>> {
    attributes
        .iter()
        .filter_map(|attribute| {
            if attribute.path().is_ident(COMPONENT) {
                Some(ComponentAttributes::try_from(attribute))
            } else {
                None
            }
        })
        .next()
        .transpose()
}

fn qualifier_tokens(qualifier: Option<&str>) -> TokenStream {
    match qualifier {
        Some(qualifier) => quote!(::std::option::Option::Some(#qualifier)),
        None => quote!(::std::option::Option::None),
    }
}

fn generate_field_construction(field: &Field) -> Result<TokenStream> {
    let attributes = extract_field_attributes(&field.attrs)?;

    if attributes.inject {
        // late-bound cell, filled during the injection phase
        return Ok(quote!(::std::default::Default::default()));
    }

    Ok(match &attributes.default {
        Some(DefaultDefinition::Expr(path)) => quote!(#path()),
        Some(DefaultDefinition::Default) => quote!(::std::default::Default::default()),
        None => {
            let qualifier =
                qualifier_tokens(attributes.qualifier.as_ref().map(|lit| lit.value()).as_deref());
            quote!(fxinject::instance_provider::InjectedDependency::resolve(
                resolver, #qualifier
            )?)
        }
    })
}

fn generate_parameter_resolution(parameter: &Parameter) -> TokenStream {
    let ty = &parameter.ty;
    let qualifier = qualifier_tokens(parameter.qualifier.as_deref());

    if parameter.optional {
        quote! {
            <::std::option::Option<fxinject::instance_provider::ComponentInstancePtr<#ty>>
                as fxinject::instance_provider::InjectedDependency>::resolve(resolver, #qualifier)?
        }
    } else {
        quote! {
            <fxinject::instance_provider::ComponentInstancePtr<#ty>
                as fxinject::instance_provider::InjectedDependency>::resolve(resolver, #qualifier)?
        }
    }
}

fn generate_construction(
    fields: &Fields,
    attributes: Option<&ComponentAttributes>,
) -> Result<TokenStream> {
    if let Some((constructor, parameters)) = attributes.and_then(|attributes| attributes.constructor.as_ref())
    {
        let parameters = parameters.iter().map(generate_parameter_resolution);
        return Ok(quote! {
            #constructor(#(#parameters),*).map_err(|error| {
                fxinject::error::ContainerError::InstantiationFailure {
                    type_name: ::std::any::type_name::<Self>(),
                    source: error,
                }
            })
        });
    }

    let generation = match fields {
        Fields::Named(fields) => {
            let fields: Vec<_> = fields
                .named
                .iter()
                .map(|field| -> Result<TokenStream> {
                    let ident = field.ident.as_ref().unwrap();
                    let instance = generate_field_construction(field)?;
                    Ok(quote!(#ident: #instance))
                })
                .try_collect()?;

            quote! {
                Self {
                    #(#fields),*
                }
            }
        }
        Fields::Unnamed(fields) => {
            let fields: Vec<_> = fields
                .unnamed
                .iter()
                .map(generate_field_construction)
                .try_collect()?;

            quote!(Self(#(#fields),*))
        }
        Fields::Unit => quote!(Self),
    };

    Ok(quote!(::std::result::Result::Ok(#generation)))
}

fn generate_injection(fields: &Fields, attributes: Option<&ComponentAttributes>) -> Result<TokenStream> {
    let mut statements = vec![];

    for (index, field) in fields.iter().enumerate() {
        let field_attributes = extract_field_attributes(&field.attrs)?;
        if !field_attributes.inject {
            continue;
        }

        let member = match &field.ident {
            Some(ident) => Member::Named(ident.clone()),
            None => Member::Unnamed(Index::from(index)),
        };
        let field_name = LitStr::new(
            &match &field.ident {
                Some(ident) => ident.to_string(),
                None => index.to_string(),
            },
            field.span(),
        );
        let qualifier = qualifier_tokens(
            field_attributes
                .qualifier
                .as_ref()
                .map(|lit| lit.value())
                .as_deref(),
        );
        let fill = if field_attributes.required {
            quote!(fill)
        } else {
            quote!(fill_optional)
        };

        statements.push(quote! {
            self.#member.#fill(resolver, #qualifier).map_err(|source| {
                fxinject::error::ContainerError::FieldInjectionFailure {
                    type_name: ::std::any::type_name::<Self>(),
                    field: #field_name,
                    source: ::std::boxed::Box::new(source),
                }
            })?;
        });
    }

    if let Some(wire) = attributes.and_then(|attributes| attributes.wire.as_ref()) {
        let path = &wire.path;
        let method_name = LitStr::new(&wire.name, path.span());
        let parameters = wire.parameters.iter().map(generate_parameter_resolution);

        statements.push(quote! {
            #path(self, #(#parameters),*).map_err(|error| {
                fxinject::error::ContainerError::MethodInjectionFailure {
                    type_name: ::std::any::type_name::<Self>(),
                    method: #method_name,
                    source: error,
                }
            })?;
        });
    }

    if statements.is_empty() {
        return Ok(quote!());
    }

    Ok(quote! {
        fn inject(
            &self,
            resolver: &dyn fxinject::instance_provider::DependencyResolver,
        ) -> ::std::result::Result<(), fxinject::error::ContainerError> {
            #(#statements)*
            ::std::result::Result::Ok(())
        }
    })
}

fn generate_names(attribute_names: Option<&ExprArray>, ident: &Ident) -> Vec<String> {
    attribute_names
        .map(|names| {
            names
                .elems
                .iter()
                .filter_map(|elem| {
                    if let Expr::Lit(ExprLit {
                        lit: Lit::Str(string),
                        ..
                    }) = elem
                    {
                        Some(string.value())
                    } else {
                        None
                    }
                })
                .collect()
        })
        .unwrap_or_else(|| vec![ident.to_string().to_case(Case::Snake)])
}

pub fn expand_component(input: &DeriveInput) -> Result<TokenStream> {
    let Data::Struct(DataStruct { fields, .. }) = &input.data else {
        return Err(Error::new(
            input.span(),
            "Can only derive Component on structs!",
        ));
    };
    if !input.generics.params.is_empty() {
        return Err(Error::new(
            input.generics.span(),
            "Cannot derive Component on generic structs!",
        ));
    }

    let ident = &input.ident;
    let attributes = extract_component_attributes(&input.attrs)?;
    let construction = generate_construction(fields, attributes.as_ref())?;
    let injection = generate_injection(fields, attributes.as_ref())?;
    let has_injector = !injection.is_empty();
    let names = generate_names(
        attributes.as_ref().and_then(|attributes| attributes.names.as_ref()),
        ident,
    );

    let injector_fn = has_injector.then(|| {
        quote! {
            fn injector(
                instance: &fxinject::instance_provider::ComponentInstanceAnyPtr,
                resolver: &dyn fxinject::instance_provider::DependencyResolver,
            ) -> ::std::result::Result<(), fxinject::error::ContainerError> {
                let instance = <#ident as fxinject::component::ComponentDowncast<#ident>>::downcast(
                    ::std::clone::Clone::clone(instance),
                )
                .map_err(|_| fxinject::error::ContainerError::IncompatibleComponent {
                    type_id: ::std::any::TypeId::of::<#ident>(),
                    type_name: ::std::option::Option::Some(::std::any::type_name::<#ident>()),
                })?;
                fxinject::component::Component::inject(&*instance, resolver)
            }
        }
    });
    let injector = if has_injector {
        quote!(::std::option::Option::Some(injector))
    } else {
        quote!(::std::option::Option::None)
    };

    let has_fallback = attributes
        .as_ref()
        .map(|attributes| attributes.fallback)
        .unwrap_or(false);
    let fallback_fn = has_fallback.then(|| {
        quote! {
            fn fallback_constructor() -> fxinject::instance_provider::ComponentInstanceAnyPtr {
                fxinject::instance_provider::ComponentInstancePtr::new(
                    <#ident as ::std::default::Default>::default(),
                ) as fxinject::instance_provider::ComponentInstanceAnyPtr
            }
        }
    });
    let fallback_constructor = if has_fallback {
        quote!(::std::option::Option::Some(fallback_constructor))
    } else {
        quote!(::std::option::Option::None)
    };

    Ok(quote! {
        #[automatically_derived]
        impl fxinject::component::Injectable for #ident {}

        #[automatically_derived]
        impl fxinject::component::ComponentDowncast<#ident> for #ident {
            fn downcast(
                source: fxinject::instance_provider::ComponentInstanceAnyPtr,
            ) -> ::std::result::Result<
                fxinject::instance_provider::ComponentInstancePtr<Self>,
                fxinject::instance_provider::ComponentInstanceAnyPtr,
            > {
                source.downcast()
            }
        }

        #[automatically_derived]
        impl fxinject::component::Component for #ident {
            fn construct(
                resolver: &dyn fxinject::instance_provider::DependencyResolver,
            ) -> ::std::result::Result<Self, fxinject::error::ContainerError> {
                #construction
            }

            #injection
        }

        const _: () = {
            fn constructor(
                resolver: &dyn fxinject::instance_provider::DependencyResolver,
            ) -> ::std::result::Result<
                fxinject::instance_provider::ComponentInstanceAnyPtr,
                fxinject::error::ContainerError,
            > {
                <#ident as fxinject::component::Component>::construct(resolver).map(|component| {
                    fxinject::instance_provider::ComponentInstancePtr::new(component)
                        as fxinject::instance_provider::ComponentInstanceAnyPtr
                })
            }

            fn cast(
                instance: fxinject::instance_provider::ComponentInstanceAnyPtr,
            ) -> ::std::result::Result<
                ::std::boxed::Box<dyn ::std::any::Any>,
                fxinject::instance_provider::ComponentInstanceAnyPtr,
            > {
                <#ident as fxinject::component::ComponentDowncast<#ident>>::downcast(instance)
                    .map(|pointer| ::std::boxed::Box::new(pointer) as ::std::boxed::Box<dyn ::std::any::Any>)
            }

            #injector_fn
            #fallback_fn

            fn register() -> fxinject::registration::ComponentDefinition {
                fxinject::registration::ComponentDefinition {
                    target: ::std::any::TypeId::of::<#ident>(),
                    target_name: ::std::any::type_name::<#ident>(),
                    module_path: ::std::module_path!(),
                    metadata: fxinject::registration::ComponentMetadata {
                        names: vec![#(#names.to_string()),*],
                        constructor,
                        injector: #injector,
                        fallback_constructor: #fallback_constructor,
                        cast,
                    },
                }
            }

            fxinject::registration::internal::submit! {
                fxinject::registration::internal::ComponentRegisterer {
                    register
                }
            }
        };
    })
}

pub fn expand_injectable(item: &syn::ItemTrait) -> Result<TokenStream> {
    if !item.generics.params.is_empty() {
        return Err(Error::new(
            item.generics.span(),
            "Cannot mark generic traits as injectable!",
        ));
    }

    let ident = &item.ident;
    Ok(quote! {
        #item

        #[automatically_derived]
        impl fxinject::component::Injectable for dyn #ident + ::std::marker::Send + ::std::marker::Sync {}
    })
}

pub fn expand_component_alias(
    item: &syn::ItemImpl,
    args: &ComponentAliasAttributes,
) -> Result<TokenStream> {
    let trait_type = item
        .trait_
        .as_ref()
        .map(|(_, path, ..)| path)
        .ok_or_else(|| Error::new(item.span(), "Missing trait identifier!"))?;

    let target_type = if let Type::Path(path) = item.self_ty.deref() {
        &path.path
    } else {
        return Err(Error::new(
            item.span(),
            "Registering aliases is only available for components!",
        ));
    };

    let is_primary = args.is_primary;

    Ok(quote! {
        #item

        #[automatically_derived]
        impl fxinject::component::ComponentDowncast<#target_type>
            for dyn #trait_type + ::std::marker::Send + ::std::marker::Sync
        {
            fn downcast(
                source: fxinject::instance_provider::ComponentInstanceAnyPtr,
            ) -> ::std::result::Result<
                fxinject::instance_provider::ComponentInstancePtr<Self>,
                fxinject::instance_provider::ComponentInstanceAnyPtr,
            > {
                source
                    .downcast::<#target_type>()
                    .map(|pointer| pointer as fxinject::instance_provider::ComponentInstancePtr<Self>)
            }
        }

        const _: () = {
            fn cast(
                instance: fxinject::instance_provider::ComponentInstanceAnyPtr,
            ) -> ::std::result::Result<
                ::std::boxed::Box<dyn ::std::any::Any>,
                fxinject::instance_provider::ComponentInstanceAnyPtr,
            > {
                <dyn #trait_type + ::std::marker::Send + ::std::marker::Sync
                    as fxinject::component::ComponentDowncast<#target_type>>::downcast(instance)
                    .map(|pointer| ::std::boxed::Box::new(pointer) as ::std::boxed::Box<dyn ::std::any::Any>)
            }

            fn register() -> fxinject::registration::ComponentAliasDefinition {
                fxinject::registration::ComponentAliasDefinition {
                    alias_type: ::std::any::TypeId::of::<
                        dyn #trait_type + ::std::marker::Send + ::std::marker::Sync,
                    >(),
                    target_type: ::std::any::TypeId::of::<#target_type>(),
                    alias_name: ::std::any::type_name::<
                        dyn #trait_type + ::std::marker::Send + ::std::marker::Sync,
                    >(),
                    target_name: ::std::any::type_name::<#target_type>(),
                    metadata: fxinject::registration::ComponentAliasMetadata {
                        is_primary: #is_primary,
                        cast,
                    },
                }
            }

            fxinject::registration::internal::submit! {
                fxinject::registration::internal::ComponentAliasRegisterer {
                    register
                }
            }
        };
    })
}
