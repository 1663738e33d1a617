//! Derive macro for error types.
//!
//! Generates `std::fmt::Display` and `std::error::Error` implementations from
//! an `#[error("...")]` message on every variant (or on the struct itself).
//!
//! ```ignore
//! use sml_derive::Error;
//!
//! #[derive(Debug, Error)]
//! pub enum VMError {
//!     #[error("undefined label: {label}")]
//!     UndefinedLabel { label: String },
//!
//!     #[error("io error: {0}")]
//!     Io(String),
//!
//!     #[error("division by zero")]
//!     DivisionByZero,
//! }
//! ```
//!
//! Tuple fields are referenced positionally (`{0}`, `{1:?}`), named fields by name.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{ToTokens, format_ident, quote};
use syn::{Attribute, Data, DeriveInput, Fields, LitStr, parse_macro_input};

pub fn derive_error(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let body = match &input.data {
        Data::Enum(data) => {
            let arms = data
                .variants
                .iter()
                .map(|variant| {
                    let message = error_message(&variant.attrs, &variant.ident)?;
                    Ok(variant_arm(&variant.ident, &variant.fields, &message))
                })
                .collect::<syn::Result<Vec<_>>>()?;
            quote! {
                match self {
                    #(#arms)*
                }
            }
        }
        Data::Struct(data) => {
            let message = error_message(&input.attrs, &input.ident)?;
            struct_body(&data.fields, &message)
        }
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                input,
                "Error cannot be derived for unions",
            ));
        }
    };

    Ok(quote! {
        impl #impl_generics ::std::fmt::Display for #name #ty_generics #where_clause {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                #body
            }
        }

        impl #impl_generics ::std::error::Error for #name #ty_generics #where_clause {}
    })
}

fn variant_arm(variant: &syn::Ident, fields: &Fields, message: &str) -> TokenStream2 {
    match fields {
        Fields::Unit => quote! {
            Self::#variant => write!(f, #message),
        },
        Fields::Unnamed(unnamed) => {
            let count = unnamed.unnamed.len();
            let format = rename_positional(message, count);
            let patterns = (0..count).map(|i| {
                let binding = format_ident!("f{}", i);
                if mentions(&format, &binding.to_string()) {
                    quote! { #binding }
                } else {
                    quote! { _ }
                }
            });
            let used: Vec<_> = (0..count)
                .map(|i| format_ident!("f{}", i))
                .filter(|binding| mentions(&format, &binding.to_string()))
                .collect();
            quote! {
                Self::#variant(#(#patterns),*) => write!(f, #format, #(#used = #used),*),
            }
        }
        Fields::Named(named) => {
            let used: Vec<_> = named
                .named
                .iter()
                .filter_map(|field| field.ident.as_ref())
                .filter(|ident| mentions(message, &ident.to_string()))
                .collect();
            quote! {
                Self::#variant { #(#used,)* .. } => write!(f, #message, #(#used = #used),*),
            }
        }
    }
}

fn struct_body(fields: &Fields, message: &str) -> TokenStream2 {
    match fields {
        Fields::Unit => quote! { write!(f, #message) },
        Fields::Named(named) => {
            let used: Vec<_> = named
                .named
                .iter()
                .filter_map(|field| field.ident.as_ref())
                .filter(|ident| mentions(message, &ident.to_string()))
                .collect();
            quote! { write!(f, #message, #(#used = self.#used),*) }
        }
        Fields::Unnamed(unnamed) => {
            let format = rename_positional(message, unnamed.unnamed.len());
            let (bindings, indices): (Vec<_>, Vec<_>) = (0..unnamed.unnamed.len())
                .map(|i| (format_ident!("f{}", i), syn::Index::from(i)))
                .filter(|(binding, _)| mentions(&format, &binding.to_string()))
                .unzip();
            quote! { write!(f, #format, #(#bindings = self.#indices),*) }
        }
    }
}

/// Reads the string literal out of the single `#[error("...")]` attribute.
fn error_message<T: ToTokens>(attrs: &[Attribute], target: &T) -> syn::Result<String> {
    let Some(attr) = attrs.iter().find(|attr| attr.path().is_ident("error")) else {
        return Err(syn::Error::new_spanned(
            target,
            "missing #[error(\"...\")] attribute; every error needs a display message",
        ));
    };

    attr.parse_args::<LitStr>()
        .map(|lit| lit.value())
        .map_err(|_| {
            syn::Error::new_spanned(
                &attr.meta,
                "expected a string literal, e.g. #[error(\"undefined label: {label}\")]",
            )
        })
}

/// True when `message` has a `{key}` or `{key:...}` placeholder.
fn mentions(message: &str, key: &str) -> bool {
    message.contains(&format!("{{{key}}}")) || message.contains(&format!("{{{key}:"))
}

/// Rewrites `{0}` / `{0:?}` style placeholders into `{f0}` / `{f0:?}` so that
/// tuple fields can be passed to `write!` as named arguments.
fn rename_positional(message: &str, field_count: usize) -> String {
    let mut out = String::with_capacity(message.len() + field_count);
    let mut rest = message;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        if let Some(stripped) = after.strip_prefix('{') {
            out.push_str("{{");
            rest = stripped;
            continue;
        }

        let end = after.find(['}', ':']).unwrap_or(after.len());
        let key = &after[..end];
        match key.parse::<usize>() {
            Ok(index) if index < field_count => {
                out.push('{');
                out.push('f');
                out.push_str(key);
            }
            _ => {
                out.push('{');
                out.push_str(key);
            }
        }
        rest = &after[end..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::rename_positional;

    #[test]
    fn positional_placeholders_are_renamed() {
        assert_eq!(rename_positional("io error: {0}", 1), "io error: {f0}");
        assert_eq!(rename_positional("{0} and {1:?}", 2), "{f0} and {f1:?}");
    }

    #[test]
    fn named_and_escaped_placeholders_are_kept() {
        assert_eq!(rename_positional("label {label}", 0), "label {label}");
        assert_eq!(rename_positional("{{literal}} {0}", 1), "{{literal}} {f0}");
    }

    #[test]
    fn mentions_matches_plain_and_formatted_placeholders() {
        assert!(super::mentions("at {index}", "index"));
        assert!(super::mentions("at {index:>4}", "index"));
        assert!(!super::mentions("at {indexes}", "index"));
    }

    #[test]
    fn out_of_range_index_is_left_alone() {
        assert_eq!(rename_positional("{3}", 1), "{3}");
    }
}
