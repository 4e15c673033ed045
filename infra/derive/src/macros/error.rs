use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Attribute, Data, DeriveInput, Fields, Ident, Type, Variant};

pub fn expand(input: DeriveInput) -> TokenStream {
    match ErrorEnum::parse(&input) {
        Ok(model) => model.render(&input),
        Err(err) => err.to_compile_error(),
    }
}

/// The pieces of the annotated enum the generated code depends on.
struct ErrorEnum {
    name: Ident,
    arms: Vec<Arm>,
    missing_derives: Vec<TokenStream>,
}

/// One variant: its name, the wrapped upstream error (if any), and whether it
/// can carry a context string.
struct Arm {
    ident: Ident,
    source: Option<(Ident, Type)>,
    has_context: bool,
    cfgs: Vec<Attribute>,
}

impl ErrorEnum {
    fn parse(input: &DeriveInput) -> syn::Result<Self> {
        let Data::Enum(data) = &input.data else {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "haven_error can only be applied to enums",
            ));
        };

        let mut failure: Option<syn::Error> = None;
        let mut arms = Vec::with_capacity(data.variants.len());
        for variant in &data.variants {
            match Arm::parse(variant) {
                Ok(arm) => arms.push(arm),
                Err(err) => match failure.as_mut() {
                    Some(all) => all.combine(err),
                    None => failure = Some(err),
                },
            }
        }
        if let Some(err) = failure {
            return Err(err);
        }

        let derived = derived_traits(&input.attrs);
        let mut missing_derives = Vec::new();
        if !derived.iter().any(|name| name == "Debug") {
            missing_derives.push(quote! { Debug });
        }
        if !derived.iter().any(|name| name == "Error") {
            missing_derives.push(quote! { ::thiserror::Error });
        }

        Ok(Self { name: input.ident.clone(), arms, missing_derives })
    }

    fn render(&self, input: &DeriveInput) -> TokenStream {
        let name = &self.name;
        let ext = format_ident!("{name}Ext");

        let derives = &self.missing_derives;
        let derive_attr =
            if derives.is_empty() { quote! {} } else { quote! { #[derive(#(#derives),*)] } };

        let context_arms = self.arms.iter().filter(|arm| arm.has_context).map(|arm| {
            let ident = &arm.ident;
            let cfgs = &arm.cfgs;
            quote! { #(#cfgs)* #name::#ident { context: slot, .. } => *slot = Some(context.into()), }
        });

        let source_impls = self
            .arms
            .iter()
            .filter(|arm| arm.ident != "Internal")
            .filter_map(|arm| arm.render_source_impls(name, &ext));

        let internal_impls =
            self.arms.iter().find(|arm| arm.ident == "Internal").map(|arm| arm.render_internal(name));

        quote! {
            #[allow(non_shorthand_field_patterns)]
            #derive_attr
            #input

            pub trait #ext<T> {
                fn context(
                    self,
                    context: impl Into<::std::borrow::Cow<'static, str>>,
                ) -> ::std::result::Result<T, #name>;
            }

            #[automatically_derived]
            impl<T> #ext<T> for ::std::result::Result<T, #name> {
                #[inline]
                #[allow(unused_variables)]
                fn context(self, context: impl Into<::std::borrow::Cow<'static, str>>) -> Self {
                    self.map_err(|mut error| {
                        #[allow(unreachable_patterns)]
                        match &mut error {
                            #(#context_arms)*
                            _ => {}
                        }
                        error
                    })
                }
            }

            #(#source_impls)*
            #internal_impls

            #[allow(dead_code)]
            fn format_context(
                context: &::std::option::Option<::std::borrow::Cow<'static, str>>,
            ) -> ::std::borrow::Cow<'static, str> {
                match context {
                    Some(text) => ::std::borrow::Cow::Owned(format!(" ({text})")),
                    None => ::std::borrow::Cow::Borrowed(""),
                }
            }
        }
    }
}

impl Arm {
    fn parse(variant: &Variant) -> syn::Result<Self> {
        let Fields::Named(fields) = &variant.fields else {
            return Err(syn::Error::new_spanned(
                variant,
                "haven_error variants need named fields so source and context can be wired",
            ));
        };

        let mut source = None;
        let mut has_context = false;
        for field in &fields.named {
            let Some(ident) = &field.ident else { continue };
            if ident == "context" {
                if !is_context_type(&field.ty) {
                    return Err(syn::Error::new_spanned(
                        &field.ty,
                        "context field must be Option<Cow<'static, str>>",
                    ));
                }
                has_context = true;
            } else if ident == "source"
                || has_attr(&field.attrs, "source")
                || has_attr(&field.attrs, "from")
            {
                source.get_or_insert_with(|| (ident.clone(), field.ty.clone()));
            }
        }

        if source.is_some() && !has_context {
            return Err(syn::Error::new_spanned(
                &variant.ident,
                "haven_error requires `context: Option<Cow<'static, str>>` next to a source field",
            ));
        }

        let cfgs = variant.attrs.iter().filter(|attr| attr.path().is_ident("cfg")).cloned().collect();

        Ok(Self { ident: variant.ident.clone(), source, has_context, cfgs })
    }

    fn render_source_impls(&self, name: &Ident, ext: &Ident) -> Option<TokenStream> {
        let (field, ty) = self.source.as_ref()?;
        let ident = &self.ident;
        let cfgs = &self.cfgs;

        Some(quote! {
            #(#cfgs)*
            #[automatically_derived]
            impl ::std::convert::From<#ty> for #name {
                #[inline]
                fn from(#field: #ty) -> Self {
                    Self::#ident { #field, context: None }
                }
            }

            #(#cfgs)*
            #[automatically_derived]
            impl<T> #ext<T> for ::std::result::Result<T, #ty> {
                #[inline]
                fn context(
                    self,
                    context: impl Into<::std::borrow::Cow<'static, str>>,
                ) -> ::std::result::Result<T, #name> {
                    self.map_err(|#field| #name::#ident { #field, context: Some(context.into()) })
                }
            }
        })
    }

    fn render_internal(&self, name: &Ident) -> TokenStream {
        let cfgs = &self.cfgs;
        quote! {
            #(#cfgs)*
            impl ::std::convert::From<&'static str> for #name {
                #[inline]
                fn from(message: &'static str) -> Self {
                    Self::Internal { message: ::std::borrow::Cow::Borrowed(message), context: None }
                }
            }

            #(#cfgs)*
            impl ::std::convert::From<String> for #name {
                #[inline]
                fn from(message: String) -> Self {
                    Self::Internal { message: ::std::borrow::Cow::Owned(message), context: None }
                }
            }
        }
    }
}

fn has_attr(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}

fn derived_traits(attrs: &[Attribute]) -> Vec<String> {
    let mut names = Vec::new();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("derive")) {
        let _ = attr.parse_nested_meta(|meta| {
            if let Some(last) = meta.path.segments.last() {
                names.push(last.ident.to_string());
            }
            Ok(())
        });
    }
    names
}

/// Accepts `Option<Cow<'static, str>>` with or without `std::` paths.
fn is_context_type(ty: &Type) -> bool {
    let compact: String = quote!(#ty).to_string().chars().filter(|c| !c.is_whitespace()).collect();
    let compact = ["::std::option::", "std::option::", "::std::borrow::", "std::borrow::"]
        .iter()
        .fold(compact, |acc, prefix| acc.replace(prefix, ""));
    compact == "Option<Cow<'static,str>>"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand_str(source: &str) -> String {
        let input: DeriveInput = syn::parse_str(source).expect("test input should parse");
        expand(input).to_string()
    }

    #[test]
    fn generates_ext_trait_and_conversions() {
        let out = expand_str(
            "pub enum LoadError {
                #[error(\"io\")]
                Io { source: std::io::Error, context: Option<Cow<'static, str>> },
                #[error(\"internal\")]
                Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
            }",
        );

        assert!(out.contains("pub trait LoadErrorExt"));
        assert!(out.contains("From < std :: io :: Error > for LoadError"));
        assert!(out.contains("for LoadError"));
        assert!(out.contains(":: thiserror :: Error"));
        assert!(!out.contains("compile_error"));
    }

    #[test]
    fn rejects_source_without_context() {
        let out = expand_str(
            "pub enum Broken {
                #[error(\"io\")]
                Io { source: std::io::Error },
            }",
        );
        assert!(out.contains("compile_error"));
    }

    #[test]
    fn rejects_tuple_variants() {
        let out = expand_str("pub enum Broken { Io(std::io::Error) }");
        assert!(out.contains("compile_error"));
    }

    #[test]
    fn rejects_wrong_context_type() {
        let out = expand_str(
            "pub enum Broken {
                #[error(\"x\")]
                Invalid { message: String, context: Option<String> },
            }",
        );
        assert!(out.contains("compile_error"));
    }

    #[test]
    fn rejects_structs() {
        let out = expand_str("pub struct NotAnEnum { field: u8 }");
        assert!(out.contains("compile_error"));
    }

    #[test]
    fn context_type_accepts_qualified_paths() {
        let ty: Type = syn::parse_str("std::option::Option<std::borrow::Cow<'static, str>>")
            .expect("type should parse");
        assert!(is_context_type(&ty));

        let ty: Type = syn::parse_str("Option<String>").expect("type should parse");
        assert!(!is_context_type(&ty));
    }
}
