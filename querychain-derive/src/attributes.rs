//! Attribute parsing utilities

use syn::{Attribute, Expr, ExprLit, Field, Lit};

/// Read `#[name = "value"]`, rejecting any other shape
fn string_value(attr: &Attribute) -> syn::Result<String> {
    let meta = attr.meta.require_name_value()?;
    match &meta.value {
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok(s.value()),
        other => Err(syn::Error::new_spanned(
            other,
            format!(
                "expected a string literal, e.g. #[{} = \"...\"]",
                attr.path().get_ident().map(ToString::to_string).unwrap_or_default()
            ),
        )),
    }
}

/// Extract table name from struct attributes
pub fn extract_table_name(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    for attr in attrs {
        if attr.path().is_ident("table_name") {
            return string_value(attr).map(Some);
        }
    }
    Ok(None)
}

/// Column-related attributes of one field
#[derive(Default)]
pub struct FieldAttributes {
    pub column_name: Option<String>,
    pub is_ignored: bool,
    pub is_base: bool,
}

/// Parse all column attributes from a field
pub fn parse_field_attributes(field: &Field) -> syn::Result<FieldAttributes> {
    let mut attrs = FieldAttributes::default();

    for attr in &field.attrs {
        if attr.path().is_ident("column_name") {
            attrs.column_name = Some(string_value(attr)?);
        } else if attr.path().is_ident("ignore") || attr.path().is_ident("skip") {
            attr.meta.require_path_only()?;
            attrs.is_ignored = true;
        } else if attr.path().is_ident("base") {
            attr.meta.require_path_only()?;
            attrs.is_base = true;
        }
    }

    if attrs.is_base && (attrs.is_ignored || attrs.column_name.is_some()) {
        return Err(syn::Error::new_spanned(
            field,
            "#[base] fields inherit the base entity's columns and take no other column attributes",
        ));
    }

    Ok(attrs)
}
