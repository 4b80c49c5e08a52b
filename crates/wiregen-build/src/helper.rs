use convert_case::{Case, Casing};
use proc_macro2::{Ident, Literal, Span, TokenStream};
use quote::{format_ident, quote};
use std::path::Path;
use syn::Lifetime;

// keywords usable as raw identifiers
const RESERVED: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

// keywords that cannot be raw
const UNRAWABLE: &[&str] = &["crate", "self", "Self", "super", "_"];

/// snake_case, leaving names that are already lower case untouched.
pub fn snake(name: &str) -> String {
    if name.chars().any(char::is_uppercase) {
        name.to_case(Case::Snake)
    } else {
        name.to_string()
    }
}

/// Upper-case form used for constants (`VT_HP`, `ENUM_NAMES_COLOR`).
pub fn upper(name: &str) -> String {
    snake(name).to_uppercase()
}

/// An identifier, escaped when it collides with a keyword.
pub fn ident(name: &str) -> Ident {
    if UNRAWABLE.contains(&name) {
        format_ident!("{name}_")
    } else if RESERVED.contains(&name) {
        Ident::new_raw(name, Span::call_site())
    } else {
        format_ident!("{name}")
    }
}

pub fn field_ident(name: &str) -> Ident {
    ident(&snake(name))
}

pub fn module_ident(component: &str) -> Ident {
    ident(&snake(component))
}

pub fn vt_ident(field: &str) -> Ident {
    format_ident!("VT_{}", upper(field))
}

pub fn lifetime(name: &str) -> Lifetime {
    Lifetime::new(&format!("'{name}"), Span::call_site())
}

/// `#[doc = "..."]` per comment line.
pub fn doc_attrs(lines: &[String]) -> TokenStream {
    let lines = lines.iter().map(|line| format!(" {line}"));

    quote! {
        #( #[doc = #lines] )*
    }
}

/// Integer literal, with the sign emitted as a separate token.
pub fn int_lit(value: i128) -> TokenStream {
    let lit = Literal::u128_unsuffixed(value.unsigned_abs());
    if value < 0 { quote!(-#lit) } else { quote!(#lit) }
}

/// Float literal for an `f32`/`f64` slot, spelling out the non-finite values.
pub fn float_lit(ty: &TokenStream, value: f64) -> TokenStream {
    if value.is_nan() {
        quote!(#ty::NAN)
    } else if value.is_infinite() {
        if value < 0.0 {
            quote!(#ty::NEG_INFINITY)
        } else {
            quote!(#ty::INFINITY)
        }
    } else {
        let lit = Literal::f64_unsuffixed(value.abs());
        if value.is_sign_negative() && value != 0.0 {
            quote!(-#lit)
        } else {
            quote!(#lit)
        }
    }
}

/// File name without directories or extension.
pub fn file_base(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Module that a dependency unit is mounted as (`monster_generated`).
pub fn unit_module_ident(file_name: &str) -> Ident {
    let base: String = file_base(file_name)
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();

    format_ident!("{base}_generated")
}
