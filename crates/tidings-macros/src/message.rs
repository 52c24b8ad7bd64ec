//! Message derive macro implementation: **parent-in-child** design.
//!
//! # Overview
//!
//! `#[derive(Message)]` generates:
//!
//! 1. `impl Message`: payload type identity plus `ancestor_any` for walking
//!    the embedded parent chain
//! 2. `impl Deref[Mut]`: generated when a parent field exists
//!
//! # Type-level attributes `#[message(...)]`
//!
//! | Key | Example | Required | Description |
//! |-----|---------|----------|-------------|
//! | `name` | `"combat.Damage"` | No | Type name used in logs and the payload catalog (default: the type's identifier) |
//!
//! # Field-level attributes `#[message(...)]`
//!
//! | Key | Description |
//! |-----|-------------|
//! | `parent` | Marks this field as the parent payload (type is auto-detected) |

use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, Ident, LitStr, Type, spanned::Spanned};

// ============================================================================
// Entry point
// ============================================================================

pub fn derive_message(input: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new(
            input.generics.span(),
            "Message cannot be derived for generic types",
        ));
    }

    let type_name = parse_type_name(&input.attrs)?
        .unwrap_or_else(|| LitStr::new(&name.to_string(), name.span()));

    let parent = match &input.data {
        Data::Struct(data) => find_parent_field(name, &data.fields)?,
        Data::Enum(data) => {
            for variant in &data.variants {
                if find_parent_field(name, &variant.fields)?.is_some() {
                    return Err(syn::Error::new(
                        variant.span(),
                        "#[message(parent)] is only supported on struct fields",
                    ));
                }
            }
            None
        }
        Data::Union(_) => {
            return Err(syn::Error::new(
                input.span(),
                "Message cannot be derived for unions",
            ));
        }
    };

    Ok(match parent {
        Some((field, parent_ty)) => generate_child(name, &type_name, &field, &parent_ty),
        None => generate_root(name, &type_name),
    })
}

// ============================================================================
// Attribute parsing
// ============================================================================

fn parse_type_name(attrs: &[Attribute]) -> syn::Result<Option<LitStr>> {
    let mut name = None;

    for attr in attrs {
        if !attr.path().is_ident("message") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                name = Some(meta.value()?.parse::<LitStr>()?);
                Ok(())
            } else {
                Err(meta.error("unknown #[message] key, expected `name`"))
            }
        })?;
    }

    Ok(name)
}

fn is_parent_field(attrs: &[Attribute]) -> syn::Result<bool> {
    let mut is_parent = false;

    for attr in attrs {
        if !attr.path().is_ident("message") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("parent") {
                is_parent = true;
                Ok(())
            } else {
                Err(meta.error("unknown #[message] field key, expected `parent`"))
            }
        })?;
    }

    Ok(is_parent)
}

/// Returns the accessor and type of the field marked `#[message(parent)]`.
fn find_parent_field(name: &Ident, fields: &Fields) -> syn::Result<Option<(TokenStream, Type)>> {
    let mut parent: Option<(TokenStream, Type)> = None;

    for (index, field) in fields.iter().enumerate() {
        if !is_parent_field(&field.attrs)? {
            continue;
        }
        if parent.is_some() {
            return Err(syn::Error::new(
                field.span(),
                format!("{name} has more than one #[message(parent)] field"),
            ));
        }
        let accessor = match &field.ident {
            Some(ident) => quote! { #ident },
            None => {
                let index = syn::Index {
                    index: index as u32,
                    span: Span::call_site(),
                };
                quote! { #index }
            }
        };
        parent = Some((accessor, field.ty.clone()));
    }

    Ok(parent)
}

// ============================================================================
// Code generation
// ============================================================================

fn generate_root(name: &Ident, type_name: &LitStr) -> TokenStream {
    quote! {
        impl ::tidings_core::Message for #name {
            fn static_type() -> ::tidings_core::PayloadType {
                ::tidings_core::PayloadType::root::<Self>(#type_name)
            }

            fn payload_type(&self) -> ::tidings_core::PayloadType {
                <Self as ::tidings_core::Message>::static_type()
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }
        }
    }
}

fn generate_child(
    name: &Ident,
    type_name: &LitStr,
    field: &TokenStream,
    parent_ty: &Type,
) -> TokenStream {
    // ── Deref / DerefMut ──
    let deref_impls = quote! {
        impl ::std::ops::Deref for #name {
            type Target = #parent_ty;
            #[inline]
            fn deref(&self) -> &Self::Target {
                &self.#field
            }
        }

        impl ::std::ops::DerefMut for #name {
            #[inline]
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.#field
            }
        }
    };

    let message_impl = quote! {
        impl ::tidings_core::Message for #name {
            fn static_type() -> ::tidings_core::PayloadType {
                ::tidings_core::PayloadType::child::<Self>(
                    #type_name,
                    <#parent_ty as ::tidings_core::Message>::static_type,
                )
            }

            fn payload_type(&self) -> ::tidings_core::PayloadType {
                <Self as ::tidings_core::Message>::static_type()
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn ancestor_any(
                &self,
                type_id: ::std::any::TypeId,
            ) -> ::std::option::Option<&dyn ::std::any::Any> {
                if type_id == ::std::any::TypeId::of::<Self>() {
                    return ::std::option::Option::Some(self);
                }
                <#parent_ty as ::tidings_core::Message>::ancestor_any(&self.#field, type_id)
            }
        }
    };

    quote! {
        #deref_impls
        #message_impl
    }
}
