//! Derive macro for `Entity`
//!
//! Expands a named struct into its static descriptor, a `FromRow`
//! implementation and one accessor constant per persisted field.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{parse_macro_input, Data, DeriveInput, Field, Fields, Ident, Type};

use crate::attributes::{self, FieldAttributes};
use crate::utils;

pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// A persisted field with its resolved column name
struct Column<'a> {
    field: &'a Field,
    ident: &'a Ident,
    name: String,
    attrs: FieldAttributes,
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Entity cannot be derived for generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(syn::DataStruct {
            fields: Fields::Named(fields),
            ..
        }) => &fields.named,
        _ => {
            return Err(syn::Error::new_spanned(
                struct_name,
                "Entity can only be derived for structs with named fields",
            ));
        }
    };

    let table_name = attributes::extract_table_name(&input.attrs)?;

    let mut columns = Vec::new();
    let mut base: Option<&Field> = None;
    for field in fields {
        let attrs = attributes::parse_field_attributes(field)?;
        if attrs.is_base {
            if base.is_some() {
                return Err(syn::Error::new_spanned(
                    field,
                    "only one field may be marked #[base]",
                ));
            }
            base = Some(field);
            continue;
        }
        // Named fields always carry an ident
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        columns.push(Column {
            field,
            ident,
            name: ident.unraw().to_string(),
            attrs,
        });
    }

    let entity_impl = entity_impl(struct_name, table_name.as_deref(), &columns, base);
    let from_row_impl = from_row_impl(struct_name, &columns, base);
    let accessors = accessors(struct_name, &columns);

    Ok(quote! {
        #entity_impl
        #from_row_impl
        #accessors
    })
}

fn entity_impl(
    struct_name: &Ident,
    table_name: Option<&str>,
    columns: &[Column<'_>],
    base: Option<&Field>,
) -> TokenStream2 {
    let type_name = struct_name.to_string();

    let table_name = match table_name {
        Some(table) => quote! { ::core::option::Option::Some(#table) },
        None => quote! { ::core::option::Option::None },
    };

    let field_descriptors = columns.iter().map(|column| {
        let name = &column.name;
        let mut descriptor = quote! { ::querychain::FieldDescriptor::new(#name) };
        if let Some(explicit) = &column.attrs.column_name {
            descriptor = quote! { #descriptor.with_column(#explicit) };
        }
        if column.attrs.is_ignored {
            descriptor = quote! { #descriptor.ignored() };
        }
        descriptor
    });

    let base = match base {
        Some(field) => {
            let base_ty = &field.ty;
            quote! {
                ::core::option::Option::Some(
                    <#base_ty as ::querychain::Entity>::descriptor
                        as fn() -> &'static ::querychain::EntityDescriptor
                )
            }
        }
        None => quote! { ::core::option::Option::None },
    };

    quote! {
        impl ::querychain::Entity for #struct_name {
            fn descriptor() -> &'static ::querychain::EntityDescriptor {
                static DESCRIPTOR: ::querychain::EntityDescriptor = ::querychain::EntityDescriptor {
                    type_name: #type_name,
                    table_name: #table_name,
                    fields: &[#(#field_descriptors),*],
                    base: #base,
                };
                &DESCRIPTOR
            }
        }
    }
}

fn from_row_impl(
    struct_name: &Ident,
    columns: &[Column<'_>],
    base: Option<&Field>,
) -> TokenStream2 {
    let field_reads = columns.iter().map(|column| {
        let ident = column.ident;
        if column.attrs.is_ignored {
            return quote! { #ident: ::core::default::Default::default(), };
        }
        // Blank explicit names fall back to the convention, as the resolver does
        let column_name = column
            .attrs
            .column_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| utils::snake_case(&column.name));
        quote! { #ident: row.try_get(#column_name)?, }
    });

    let base_read = base.map(|field| {
        let ident = &field.ident;
        let base_ty = &field.ty;
        quote! { #ident: <#base_ty as ::querychain::FromRow>::from_row(row)?, }
    });

    quote! {
        impl ::querychain::FromRow for #struct_name {
            fn from_row(
                row: &::querychain::Row,
            ) -> ::core::result::Result<Self, ::querychain::ExecutionError> {
                ::core::result::Result::Ok(Self {
                    #(#field_reads)*
                    #base_read
                })
            }
        }
    }
}

fn accessors(struct_name: &Ident, columns: &[Column<'_>]) -> TokenStream2 {
    let consts = columns
        .iter()
        .filter(|column| !column.attrs.is_ignored)
        .map(|column| {
            let vis = &column.field.vis;
            let ident = column.ident;
            let ty = &column.field.ty;
            let prefix = if is_bool(ty) { "is" } else { "get" };
            let method = format!("{prefix}_{}", column.name);
            let getter = format_ident!("{}", method);
            let const_ident = format_ident!("{}", utils::const_name(&column.name));
            let doc = format!("Accessor for `{}`, resolved through `{method}`", column.name);

            quote! {
                #[doc = #doc]
                #vis const #const_ident: ::querychain::Accessor<#struct_name, #ty> = {
                    #[allow(non_snake_case)]
                    fn #getter(entity: &#struct_name) -> &#ty {
                        &entity.#ident
                    }
                    ::querychain::Accessor::new(#method, #getter)
                };
            }
        });

    quote! {
        #[allow(dead_code)]
        impl #struct_name {
            #(#consts)*
        }
    }
}

fn is_bool(ty: &Type) -> bool {
    match ty {
        Type::Path(type_path) if type_path.qself.is_none() => type_path
            .path
            .get_ident()
            .is_some_and(|ident| ident == "bool"),
        _ => false,
    }
}
