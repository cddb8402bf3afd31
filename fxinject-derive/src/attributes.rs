use proc_macro2::Span;
use syn::parse::{Parse, ParseStream};
use syn::spanned::Spanned;
use syn::{
    Attribute, Error, ExprArray, ExprPath, Ident, LitBool, LitStr, Result, Token, Type,
    TypeParamBound, TypeTraitObject,
};

pub enum DefaultDefinition {
    Default,
    Expr(ExprPath),
}

/// Parsed `#[component(...)]` field configuration.
pub struct FieldAttributes {
    pub inject: bool,
    pub required: bool,
    pub qualifier: Option<LitStr>,
    pub default: Option<DefaultDefinition>,
}

impl Default for FieldAttributes {
    fn default() -> Self {
        Self {
            inject: false,
            required: true,
            qualifier: None,
            default: None,
        }
    }
}

impl TryFrom<&Attribute> for FieldAttributes {
    type Error = Error;

    fn try_from(value: &Attribute) -> Result<Self> {
        let mut result = Self::default();
        value.parse_nested_meta(|meta| {
            if meta.path.is_ident("inject") {
                result.inject = true;
            } else if meta.path.is_ident("required") {
                let value = meta.value()?;
                let flag: LitBool = value.parse()?;
                result.required = flag.value();
            } else if meta.path.is_ident("qualifier") {
                result.qualifier = Some(meta.value().and_then(|value| value.parse())?);
            } else if meta.path.is_ident("default") {
                if meta.input.peek(Token![=]) {
                    let value = meta.value()?;
                    let expr: LitStr = value.parse()?;
                    result.default = Some(DefaultDefinition::Expr(expr.parse()?));
                } else {
                    result.default = Some(DefaultDefinition::Default);
                }
            } else {
                return Err(meta.error("unsupported component field configuration"));
            }

            Ok(())
        })?;

        if result.default.is_some() && (result.inject || result.qualifier.is_some()) {
            return Err(Error::new(
                value.span(),
                "default fields cannot also be injected",
            ));
        }
        if !result.required && !result.inject {
            return Err(Error::new(
                value.span(),
                "required = false applies to inject fields; use Option<...> for constructor dependencies",
            ));
        }

        Ok(result)
    }
}

/// Parsed `#[component(...)]` struct configuration.
pub struct ComponentAttributes {
    pub names: Option<ExprArray>,
    pub constructor: Option<(ExprPath, Vec<Parameter>)>,
    pub wire: Option<WireMethod>,
    pub fallback: bool,
}

pub struct WireMethod {
    pub path: ExprPath,
    pub name: String,
    pub parameters: Vec<Parameter>,
}

impl TryFrom<&Attribute> for ComponentAttributes {
    type Error = Error;

    fn try_from(value: &Attribute) -> Result<Self> {
        let mut names = None;
        let mut constructor: Option<ExprPath> = None;
        let mut constructor_parameters: Option<LitStr> = None;
        let mut wire: Option<(ExprPath, String)> = None;
        let mut wire_parameters: Option<LitStr> = None;
        let mut fallback = false;

        value.parse_nested_meta(|meta| {
            if meta.path.is_ident("names") {
                names = Some(meta.value().and_then(|value| value.parse())?);
            } else if meta.path.is_ident("constructor") {
                let value = meta.value()?;
                let expr: LitStr = value.parse()?;
                constructor = Some(expr.parse()?);
            } else if meta.path.is_ident("constructor_parameters") {
                constructor_parameters = Some(meta.value().and_then(|value| value.parse())?);
            } else if meta.path.is_ident("wire") {
                let value = meta.value()?;
                let expr: LitStr = value.parse()?;
                let path: ExprPath = expr.parse()?;
                // diagnostics report the method name, not the full path expression
                let name = path
                    .path
                    .segments
                    .last()
                    .map(|segment| segment.ident.to_string())
                    .unwrap_or_else(|| expr.value());
                wire = Some((path, name));
            } else if meta.path.is_ident("wire_parameters") {
                wire_parameters = Some(meta.value().and_then(|value| value.parse())?);
            } else if meta.path.is_ident("fallback") {
                fallback = true;
            } else {
                return Err(meta.error("unsupported component configuration"));
            }

            Ok(())
        })?;

        if constructor.is_none() && constructor_parameters.is_some() {
            return Err(Error::new(
                value.span(),
                "constructor_parameters requires a constructor",
            ));
        }
        if wire.is_none() && wire_parameters.is_some() {
            return Err(Error::new(value.span(), "wire_parameters requires wire"));
        }

        Ok(Self {
            names,
            constructor: constructor
                .map(|path| {
                    parse_parameter_list(constructor_parameters.as_ref())
                        .map(|parameters| (path, parameters))
                })
                .transpose()?,
            wire: wire
                .map(|(path, name)| {
                    parse_parameter_list(wire_parameters.as_ref()).map(|parameters| WireMethod {
                        path,
                        name,
                        parameters,
                    })
                })
                .transpose()?,
            fallback,
        })
    }
}

/// A single entry of a `constructor_parameters`/`wire_parameters` list:
/// `Type`, `dyn Trait`, `Option<Type>` for a non-required dependency, with an optional
/// `/qualifier` suffix.
pub struct Parameter {
    pub ty: Type,
    pub optional: bool,
    pub qualifier: Option<String>,
}

fn parse_parameter_list(text: Option<&LitStr>) -> Result<Vec<Parameter>> {
    let Some(text) = text else {
        return Ok(vec![]);
    };

    text.value()
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| parse_parameter(entry, text.span()))
        .collect()
}

fn parse_parameter(entry: &str, span: Span) -> Result<Parameter> {
    let (type_text, qualifier) = match entry.split_once('/') {
        Some((type_text, qualifier)) => (type_text.trim(), Some(qualifier.trim().to_string())),
        None => (entry, None),
    };

    let (type_text, optional) = type_text
        .strip_prefix("Option<")
        .and_then(|rest| rest.strip_suffix('>'))
        .map(|inner| (inner.trim(), true))
        .unwrap_or((type_text, false));

    let ty: Type = syn::parse_str(type_text)
        .map_err(|_| Error::new(span, format!("cannot parse parameter type: {type_text}")))?;

    Ok(Parameter {
        ty: ensure_threadsafe(ty),
        optional,
        qualifier,
    })
}

// dyn Trait dependencies are registered as dyn Trait + Send + Sync
fn ensure_threadsafe(ty: Type) -> Type {
    if let Type::TraitObject(mut trait_object) = ty {
        if !contains_bound(&trait_object, "Send") {
            trait_object.bounds.push(syn::parse_quote!(Send));
        }
        if !contains_bound(&trait_object, "Sync") {
            trait_object.bounds.push(syn::parse_quote!(Sync));
        }
        Type::TraitObject(trait_object)
    } else {
        ty
    }
}

fn contains_bound(trait_object: &TypeTraitObject, name: &str) -> bool {
    trait_object.bounds.iter().any(|bound| {
        matches!(
            bound,
            TypeParamBound::Trait(bound)
                if bound.path.segments.last().map(|segment| segment.ident == name).unwrap_or(false)
        )
    })
}

/// Arguments of `#[component_alias]` - an optional `primary` marker.
pub struct ComponentAliasAttributes {
    pub is_primary: bool,
}

impl Parse for ComponentAliasAttributes {
    fn parse(input: ParseStream) -> Result<Self> {
        if input.is_empty() {
            return Ok(Self { is_primary: false });
        }

        let ident: Ident = input.parse()?;
        if ident == "primary" && input.is_empty() {
            Ok(Self { is_primary: true })
        } else {
            Err(Error::new(ident.span(), "expected `primary`"))
        }
    }
}
