//! Procedural macro `#[derive(Record)]` for record-schema.
//!
//! Implements `record_schema::Record` for a struct with named fields. Each
//! field's JSON kind is read from its Rust type; `required`, `format`, and
//! `rename` come from `#[record(...)]` attributes. Field names follow serde's
//! `rename`, `rename_all`, and `skip` so the record matches the JSON serde
//! produces; `#[record(rename = "...")]` takes precedence.
//!
//! An `Option<T>` field is described by the kind of `T`. Serde writes `None`
//! as `null`, which that kind rejects, so the field must carry
//! `#[serde(skip_serializing_if = "Option::is_none")]` (or be skipped) and may
//! not be `required`. Map types have no fixed members and become `Any`.
//!
//! ```ignore
//! #[derive(Serialize, Deserialize, Record)]
//! #[serde(rename_all = "PascalCase")]
//! struct Account {
//!     #[record(required, format = "email")]
//!     email: String,
//!     roles: Vec<String>,
//! }
//! ```

use heck::{
    ToKebabCase, ToLowerCamelCase, ToShoutyKebabCase, ToShoutySnakeCase, ToSnakeCase,
    ToUpperCamelCase,
};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::punctuated::Punctuated;
use syn::{
    Attribute, Data, DeriveInput, Expr, ExprLit, Fields, GenericArgument, Lit, LitStr, Meta,
    PathArguments, Token, Type, parse_macro_input,
};

#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input: DeriveInput = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let ident = &input.ident;
    let attrs: RecordAttrs = RecordAttrs::parse(&input.attrs, false)?;
    let serde_attrs: SerdeAttrs = SerdeAttrs::parse(&input.attrs);
    let record_name: String = attrs
        .rename
        .or(serde_attrs.rename)
        .unwrap_or_else(|| ident.unraw().to_string());

    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            ident,
            "Record can only be derived for structs",
        ));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new_spanned(
            ident,
            "Record can only be derived for structs with named fields",
        ));
    };

    let mut descriptors: Vec<TokenStream2> = Vec::with_capacity(fields.named.len());
    for field in &fields.named {
        let Some(field_ident) = &field.ident else {
            continue;
        };
        let attrs: RecordAttrs = RecordAttrs::parse(&field.attrs, true)?;
        let field_serde: SerdeAttrs = SerdeAttrs::parse(&field.attrs);
        if field_serde.skip {
            continue;
        }
        let field_ty: &Type = match option_inner(&field.ty) {
            Some(inner) => {
                check_optional_field(field_ident, &attrs, &field_serde)?;
                inner
            }
            None => &field.ty,
        };
        let name: String = match (attrs.rename, field_serde.rename) {
            (Some(name), _) | (None, Some(name)) => name,
            (None, None) => {
                let ident_name: String = field_ident.unraw().to_string();
                match &serde_attrs.rename_all {
                    Some(rule) => apply_rename_rule(rule, &ident_name),
                    None => ident_name,
                }
            }
        };
        let kind: FieldKindTokens = field_kind(field_ty)?;
        let required: bool = attrs.required;
        let format: TokenStream2 = match (attrs.format, kind.is_uuid) {
            (Some(format), _) => {
                quote!(::core::option::Option::Some(::record_schema::Format::from(#format)))
            }
            (None, true) => quote!(::core::option::Option::Some(::record_schema::Format::Uuid)),
            (None, false) => quote!(::core::option::Option::None),
        };
        let kind_tokens: TokenStream2 = kind.tokens;
        descriptors.push(quote! {
            ::record_schema::FieldDescriptor {
                name: ::std::string::String::from(#name),
                kind: #kind_tokens,
                required: #required,
                format: #format,
            }
        });
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics ::record_schema::Record for #ident #ty_generics #where_clause {
            fn record_type() -> ::record_schema::RecordType {
                ::record_schema::RecordType {
                    name: ::std::string::String::from(#record_name),
                    fields: ::std::vec![#(#descriptors),*],
                }
            }
        }
    })
}

/// Values collected from `#[record(...)]` on a struct or one of its fields.
#[derive(Default)]
struct RecordAttrs {
    rename: Option<String>,
    required: bool,
    format: Option<String>,
}

impl RecordAttrs {
    fn parse(attrs: &[Attribute], on_field: bool) -> syn::Result<Self> {
        let mut parsed = Self::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident("record")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    parsed.rename = Some(meta.value()?.parse::<LitStr>()?.value());
                    Ok(())
                } else if on_field && meta.path.is_ident("required") {
                    parsed.required = true;
                    Ok(())
                } else if on_field && meta.path.is_ident("format") {
                    parsed.format = Some(meta.value()?.parse::<LitStr>()?.value());
                    Ok(())
                } else {
                    Err(meta.error("unsupported record attribute"))
                }
            })?;
        }
        Ok(parsed)
    }
}

/// The parts of `#[serde(...)]` that change which JSON members exist.
#[derive(Default)]
struct SerdeAttrs {
    rename: Option<String>,
    rename_all: Option<String>,
    skip: bool,
    skip_serializing: bool,
    skip_serializing_if: bool,
}

impl SerdeAttrs {
    /// Attributes serde itself cannot parse are skipped; serde reports them.
    fn parse(attrs: &[Attribute]) -> Self {
        let mut parsed = Self::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
            let Ok(metas) = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)
            else {
                continue;
            };
            for meta in metas {
                match meta {
                    Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                        parsed.rename = string_literal(&nv.value);
                    }
                    Meta::NameValue(nv) if nv.path.is_ident("rename_all") => {
                        parsed.rename_all = string_literal(&nv.value);
                    }
                    Meta::NameValue(nv) if nv.path.is_ident("skip_serializing_if") => {
                        parsed.skip_serializing_if = true;
                    }
                    Meta::Path(path) if path.is_ident("skip") => parsed.skip = true,
                    Meta::Path(path) if path.is_ident("skip_serializing") => {
                        parsed.skip_serializing = true;
                    }
                    _ => {}
                }
            }
        }
        parsed
    }
}

fn string_literal(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => Some(s.value()),
        _ => None,
    }
}

/// Applies a serde `rename_all` rule to a snake_case field name.
fn apply_rename_rule(rule: &str, name: &str) -> String {
    match rule {
        "lowercase" => name.to_lowercase(),
        "UPPERCASE" => name.to_uppercase(),
        "PascalCase" => name.to_upper_camel_case(),
        "camelCase" => name.to_lower_camel_case(),
        "snake_case" => name.to_snake_case(),
        "SCREAMING_SNAKE_CASE" => name.to_shouty_snake_case(),
        "kebab-case" => name.to_kebab_case(),
        "SCREAMING-KEBAB-CASE" => name.to_shouty_kebab_case(),
        _ => name.to_string(),
    }
}

struct FieldKindTokens {
    tokens: TokenStream2,
    /// The innermost string type is `Uuid`, which implies `format = "uuid"`.
    is_uuid: bool,
}

impl FieldKindTokens {
    fn plain(tokens: TokenStream2) -> Self {
        Self {
            tokens,
            is_uuid: false,
        }
    }
}

/// Optional fields whose `None` would be written as `null` cannot satisfy
/// the generated schema.
fn check_optional_field(
    ident: &syn::Ident,
    attrs: &RecordAttrs,
    serde_attrs: &SerdeAttrs,
) -> syn::Result<()> {
    if attrs.required {
        return Err(syn::Error::new_spanned(
            ident,
            "an Option field cannot be #[record(required)]: None leaves it out",
        ));
    }
    if !serde_attrs.skip_serializing_if && !serde_attrs.skip_serializing {
        return Err(syn::Error::new_spanned(
            ident,
            "an Option field needs #[serde(skip_serializing_if = \"Option::is_none\")] \
             so that None is left out instead of written as null",
        ));
    }
    Ok(())
}

/// `T` when `ty` is `Option<T>`.
fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    if type_path.qself.is_some() {
        return None;
    }
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    first_type_argument(&segment.arguments)
}

fn field_kind(ty: &Type) -> syn::Result<FieldKindTokens> {
    let any = || FieldKindTokens::plain(quote!(::record_schema::FieldKind::Any));
    let kind = match ty {
        Type::Reference(reference) => field_kind(&reference.elem)?,
        Type::Paren(paren) => field_kind(&paren.elem)?,
        Type::Group(group) => field_kind(&group.elem)?,
        Type::Slice(slice) => array_of(field_kind(&slice.elem)?),
        Type::Array(array) => array_of(field_kind(&array.elem)?),
        Type::Path(type_path) if type_path.qself.is_none() => {
            let Some(segment) = type_path.path.segments.last() else {
                return Ok(any());
            };
            match segment.ident.to_string().as_str() {
                "String" | "str" | "char" => {
                    FieldKindTokens::plain(quote!(::record_schema::FieldKind::String))
                }
                "Uuid" => FieldKindTokens {
                    tokens: quote!(::record_schema::FieldKind::String),
                    is_uuid: true,
                },
                "bool" => FieldKindTokens::plain(quote!(::record_schema::FieldKind::Boolean)),
                "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32" | "u64"
                | "u128" | "usize" => {
                    FieldKindTokens::plain(quote!(::record_schema::FieldKind::Integer))
                }
                "f32" | "f64" => FieldKindTokens::plain(quote!(::record_schema::FieldKind::Number)),
                "Value" | "HashMap" | "BTreeMap" | "IndexMap" | "Map" => any(),
                "Option" => {
                    return Err(syn::Error::new_spanned(
                        ty,
                        "Option is only supported as the outermost type of a field; \
                         nested None is written as null",
                    ));
                }
                "Box" | "Rc" | "Arc" => match first_type_argument(&segment.arguments) {
                    Some(inner) => field_kind(inner)?,
                    None => any(),
                },
                "Vec" | "VecDeque" | "HashSet" | "BTreeSet" | "IndexSet" => {
                    match first_type_argument(&segment.arguments) {
                        Some(inner) => array_of(field_kind(inner)?),
                        None => array_of(any()),
                    }
                }
                _ => FieldKindTokens::plain(quote! {
                    ::record_schema::FieldKind::Record(
                        <#ty as ::record_schema::Record>::record_type()
                    )
                }),
            }
        }
        _ => any(),
    };
    Ok(kind)
}

fn array_of(items: FieldKindTokens) -> FieldKindTokens {
    let inner: TokenStream2 = items.tokens;
    FieldKindTokens {
        tokens: quote!(::record_schema::FieldKind::Array(::std::boxed::Box::new(#inner))),
        is_uuid: items.is_uuid,
    }
}

fn first_type_argument(arguments: &PathArguments) -> Option<&Type> {
    let PathArguments::AngleBracketed(angle) = arguments else {
        return None;
    };
    angle.args.iter().find_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    })
}
