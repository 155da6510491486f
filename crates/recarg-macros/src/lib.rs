use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{
    Attribute, Data, DeriveInput, Expr, Fields, Ident, LitInt, LitStr, Result, Token,
    ext::IdentExt,
    parenthesized,
    parse::{Parse, ParseStream},
    parse_macro_input,
    punctuated::Punctuated,
    token::Paren,
};

/// Derive `recarg::Record` for a struct with named fields.
///
/// Every field becomes one argument. Doc comments turn into help text, the
/// struct name (kebab-cased) becomes the program name, and `#[arg(..)]`
/// tunes the rest:
///
/// ```ignore
/// /// Serve files over HTTP.
/// #[derive(Record)]
/// #[record(name = "serve")]
/// struct Serve {
///     /// Port to listen on
///     #[arg(args("-p", "--port"), default = 8080)]
///     port: u16,
///     /// Output format
///     #[arg(literals("plain", "json"), default = "plain", group = "Output")]
///     format: String,
///     /// Paths to serve
///     #[arg(args("roots"), nargs = "+")]
///     roots: Vec<String>,
///     verbose: bool,
/// }
/// ```
///
/// Recognized options: `args("..", ..)`, `help = ".."`, `value_name = ".."`,
/// `default = expr`, `default_factory = expr`, `parse_with = expr`,
/// `choices(..)`, `literals(..)`, `nargs = N | "+" | "*"`, `required`,
/// `keep_underscores`, and `group` (bare, `= "Title"`, or
/// `("Title", "description")`).
///
/// An `Option` field with no declared default reads absence as `None`;
/// any other flagged field without a default is required.
#[proc_macro_derive(Record, attributes(arg, record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand_record(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

enum ArgMeta {
    Args(Vec<LitStr>),
    Help(LitStr),
    ValueName(LitStr),
    Default(Expr),
    DefaultFactory(Expr),
    ParseWith(Expr),
    Choices(Vec<Expr>),
    Literals(Vec<Expr>),
    Nargs(NargsSpec),
    Required,
    KeepUnderscores,
    Group(GroupSpec),
}

enum NargsSpec {
    Count(usize),
    OneOrMore,
    ZeroOrMore,
}

enum GroupSpec {
    Titled(LitStr),
    Described(LitStr, LitStr),
    Anonymous,
}

impl Parse for ArgMeta {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: Ident = input.call(Ident::parse_any)?;
        match key.to_string().as_str() {
            "args" => {
                let names = parse_str_list(input)?;
                if names.is_empty() {
                    return Err(syn::Error::new(
                        key.span(),
                        "args(..) needs at least one name",
                    ));
                }
                Ok(Self::Args(names))
            }
            "help" => {
                input.parse::<Token![=]>()?;
                Ok(Self::Help(input.parse()?))
            }
            "value_name" => {
                input.parse::<Token![=]>()?;
                Ok(Self::ValueName(input.parse()?))
            }
            "default" => {
                input.parse::<Token![=]>()?;
                Ok(Self::Default(input.parse()?))
            }
            "default_factory" => {
                input.parse::<Token![=]>()?;
                Ok(Self::DefaultFactory(input.parse()?))
            }
            "parse_with" => {
                input.parse::<Token![=]>()?;
                Ok(Self::ParseWith(input.parse()?))
            }
            "choices" => {
                let values = parse_expr_list(input)?;
                if values.is_empty() {
                    return Err(syn::Error::new(
                        key.span(),
                        "choices(..) needs at least one value",
                    ));
                }
                Ok(Self::Choices(values))
            }
            "literals" => {
                let values = parse_expr_list(input)?;
                if values.is_empty() {
                    return Err(syn::Error::new(
                        key.span(),
                        "literals(..) needs at least one member",
                    ));
                }
                Ok(Self::Literals(values))
            }
            "nargs" => {
                input.parse::<Token![=]>()?;
                Ok(Self::Nargs(parse_nargs(input)?))
            }
            "required" => Ok(Self::Required),
            "keep_underscores" => Ok(Self::KeepUnderscores),
            "group" => {
                if input.peek(Token![=]) {
                    input.parse::<Token![=]>()?;
                    return Ok(Self::Group(GroupSpec::Titled(input.parse()?)));
                }
                if input.peek(Paren) {
                    let parts = parse_str_list(input)?;
                    let mut parts = parts.into_iter();
                    return match (parts.next(), parts.next(), parts.next()) {
                        (None, ..) => Ok(Self::Group(GroupSpec::Anonymous)),
                        (Some(title), None, _) => Ok(Self::Group(GroupSpec::Titled(title))),
                        (Some(title), Some(description), None) => {
                            Ok(Self::Group(GroupSpec::Described(title, description)))
                        }
                        _ => Err(syn::Error::new(
                            key.span(),
                            "group(..) takes at most a title and a description",
                        )),
                    };
                }
                Ok(Self::Group(GroupSpec::Anonymous))
            }
            other => Err(syn::Error::new(
                key.span(),
                format!("unknown arg option: {other}"),
            )),
        }
    }
}

fn parse_str_list(input: ParseStream) -> Result<Vec<LitStr>> {
    let content;
    parenthesized!(content in input);
    let items: Punctuated<LitStr, Token![,]> =
        content.parse_terminated(|p: ParseStream<'_>| p.parse::<LitStr>(), Token![,])?;
    Ok(items.into_iter().collect())
}

fn parse_expr_list(input: ParseStream) -> Result<Vec<Expr>> {
    let content;
    parenthesized!(content in input);
    let items: Punctuated<Expr, Token![,]> =
        content.parse_terminated(Expr::parse, Token![,])?;
    Ok(items.into_iter().collect())
}

fn parse_nargs(input: ParseStream) -> Result<NargsSpec> {
    if input.peek(LitStr) {
        let lit: LitStr = input.parse()?;
        return match lit.value().as_str() {
            "+" => Ok(NargsSpec::OneOrMore),
            "*" => Ok(NargsSpec::ZeroOrMore),
            other => Err(syn::Error::new(
                lit.span(),
                format!("nargs must be a count, \"+\", or \"*\", not {other:?}"),
            )),
        };
    }
    let lit: LitInt = input.parse()?;
    let count: usize = lit.base10_parse()?;
    if count == 0 {
        return Err(syn::Error::new(lit.span(), "nargs must be at least 1"));
    }
    Ok(NargsSpec::Count(count))
}

#[derive(Default)]
struct FieldAttrs {
    flags: Option<Vec<LitStr>>,
    help: Option<LitStr>,
    value_name: Option<LitStr>,
    default: Option<Expr>,
    default_factory: Option<Expr>,
    parse_with: Option<Expr>,
    choices: Option<Vec<Expr>>,
    literals: Option<Vec<Expr>>,
    nargs: Option<NargsSpec>,
    required: bool,
    keep_underscores: bool,
    group: Option<GroupSpec>,
}

fn collect_field_attrs(field: &syn::Field) -> Result<FieldAttrs> {
    let mut attrs = FieldAttrs::default();

    for attr in &field.attrs {
        if !attr.path().is_ident("arg") {
            continue;
        }
        let metas = attr.parse_args_with(Punctuated::<ArgMeta, Token![,]>::parse_terminated)?;
        for meta in metas {
            match meta {
                ArgMeta::Args(flags) => attrs.flags = Some(flags),
                ArgMeta::Help(help) => attrs.help = Some(help),
                ArgMeta::ValueName(value_name) => attrs.value_name = Some(value_name),
                ArgMeta::Default(expr) => {
                    if attrs.default_factory.is_some() {
                        return Err(syn::Error::new_spanned(
                            attr,
                            "default and default_factory are mutually exclusive",
                        ));
                    }
                    attrs.default = Some(expr);
                }
                ArgMeta::DefaultFactory(expr) => {
                    if attrs.default.is_some() {
                        return Err(syn::Error::new_spanned(
                            attr,
                            "default and default_factory are mutually exclusive",
                        ));
                    }
                    attrs.default_factory = Some(expr);
                }
                ArgMeta::ParseWith(expr) => attrs.parse_with = Some(expr),
                ArgMeta::Choices(values) => attrs.choices = Some(values),
                ArgMeta::Literals(values) => attrs.literals = Some(values),
                ArgMeta::Nargs(spec) => attrs.nargs = Some(spec),
                ArgMeta::Required => attrs.required = true,
                ArgMeta::KeepUnderscores => attrs.keep_underscores = true,
                ArgMeta::Group(spec) => attrs.group = Some(spec),
            }
        }
    }

    Ok(attrs)
}

enum RecordMeta {
    Name(LitStr),
    About(LitStr),
}

impl Parse for RecordMeta {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: Ident = input.parse()?;
        match key.to_string().as_str() {
            "name" => {
                input.parse::<Token![=]>()?;
                Ok(Self::Name(input.parse()?))
            }
            "about" => {
                input.parse::<Token![=]>()?;
                Ok(Self::About(input.parse()?))
            }
            other => Err(syn::Error::new(
                key.span(),
                format!("unknown record option: {other}"),
            )),
        }
    }
}

#[derive(Default)]
struct RecordAttrs {
    name: Option<LitStr>,
    about: Option<LitStr>,
}

fn collect_record_attrs(attrs: &[Attribute]) -> Result<RecordAttrs> {
    let mut collected = RecordAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("record") {
            continue;
        }
        let metas = attr.parse_args_with(Punctuated::<RecordMeta, Token![,]>::parse_terminated)?;
        for meta in metas {
            match meta {
                RecordMeta::Name(name) => collected.name = Some(name),
                RecordMeta::About(about) => collected.about = Some(about),
            }
        }
    }

    Ok(collected)
}

enum TypeShape {
    Bool,
    Int,
    Float,
    Str,
    Vec(Box<TypeShape>),
    Option(Box<TypeShape>),
    Other,
}

fn type_shape(ty: &syn::Type) -> TypeShape {
    let syn::Type::Path(path) = ty else {
        return TypeShape::Other;
    };
    if path.qself.is_some() {
        return TypeShape::Other;
    }
    let Some(segment) = path.path.segments.last() else {
        return TypeShape::Other;
    };
    match segment.ident.to_string().as_str() {
        "bool" => TypeShape::Bool,
        "i8" | "i16" | "i32" | "i64" | "isize" | "u8" | "u16" | "u32" | "u64" | "usize" => {
            TypeShape::Int
        }
        "f32" | "f64" => TypeShape::Float,
        "String" | "PathBuf" => TypeShape::Str,
        "Vec" => match single_type_argument(segment) {
            Some(inner) => TypeShape::Vec(Box::new(type_shape(inner))),
            None => TypeShape::Other,
        },
        "Option" => match single_type_argument(segment) {
            Some(inner) => TypeShape::Option(Box::new(type_shape(inner))),
            None => TypeShape::Other,
        },
        _ => TypeShape::Other,
    }
}

fn single_type_argument(segment: &syn::PathSegment) -> Option<&syn::Type> {
    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    let mut iter = args.args.iter();
    let first = iter.next()?;
    if iter.next().is_some() {
        return None;
    }
    match first {
        syn::GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}

fn innermost_is_opaque(shape: &TypeShape) -> bool {
    match shape {
        TypeShape::Vec(inner) | TypeShape::Option(inner) => innermost_is_opaque(inner),
        TypeShape::Other => true,
        _ => false,
    }
}

fn kind_tokens(shape: &TypeShape, literals: Option<&[Expr]>) -> proc_macro2::TokenStream {
    match shape {
        TypeShape::Option(inner) => {
            let inner = kind_tokens(inner, literals);
            quote! { ::recarg::FieldKind::optional(#inner) }
        }
        TypeShape::Vec(inner) => {
            let inner = kind_tokens(inner, literals);
            quote! { ::recarg::FieldKind::list(#inner) }
        }
        scalar => {
            if let Some(members) = literals {
                return quote! { ::recarg::FieldKind::literal([#(#members),*]) };
            }
            match scalar {
                TypeShape::Bool => quote! { ::recarg::FieldKind::Bool },
                TypeShape::Int => quote! { ::recarg::FieldKind::Int },
                TypeShape::Float => quote! { ::recarg::FieldKind::Float },
                TypeShape::Str => quote! { ::recarg::FieldKind::Str },
                _ => quote! { ::recarg::FieldKind::Any },
            }
        }
    }
}

fn expand_record(input: &DeriveInput) -> Result<proc_macro2::TokenStream> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Record can only be derived for structs with named fields",
        ));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Record can only be derived for structs with named fields",
        ));
    };

    let record_attrs = collect_record_attrs(&input.attrs)?;
    let prog = record_attrs
        .name
        .map(|lit| lit.value())
        .unwrap_or_else(|| kebab_case(&input.ident.to_string()));
    let about = record_attrs
        .about
        .map(|lit| lit.value())
        .or_else(|| doc_text(&input.attrs));

    let mut descriptors = Vec::new();
    let mut takes = Vec::new();
    for field in &fields.named {
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
        let name = ident.unraw().to_string();
        let attrs = collect_field_attrs(field)?;

        descriptors.push(descriptor_tokens(&name, field, &attrs)?);

        let name_lit = LitStr::new(&name, ident.span());
        takes.push(quote! { #ident: values.take(#name_lit)? });
    }

    let prog_lit = LitStr::new(&prog, Span::call_site());
    let about_call = about.map(|text| {
        let lit = LitStr::new(&text, Span::call_site());
        quote! { .about(#lit) }
    });

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let values_param = if takes.is_empty() {
        quote! { _values }
    } else {
        quote! { values }
    };

    Ok(quote! {
        impl #impl_generics ::recarg::Record for #ident #ty_generics #where_clause {
            fn schema() -> ::recarg::RecordSchema {
                ::recarg::RecordSchema::new(#prog_lit)
                    #about_call
                    #( .field(#descriptors) )*
            }

            fn from_values(
                #values_param: &mut ::recarg::ParsedValues,
            ) -> ::core::result::Result<Self, ::recarg::ConstructionError> {
                ::core::result::Result::Ok(Self {
                    #( #takes, )*
                })
            }
        }
    })
}

fn descriptor_tokens(
    name: &str,
    field: &syn::Field,
    attrs: &FieldAttrs,
) -> Result<proc_macro2::TokenStream> {
    let shape = type_shape(&field.ty);
    if innermost_is_opaque(&shape) && attrs.literals.is_none() && attrs.parse_with.is_none() {
        return Err(syn::Error::new_spanned(
            &field.ty,
            "unsupported field type; provide #[arg(parse_with = ..)] or #[arg(literals(..))]",
        ));
    }

    let kind = kind_tokens(&shape, attrs.literals.as_deref());
    let name_lit = LitStr::new(name, Span::call_site());
    let mut tokens = quote! { ::recarg::FieldDescriptor::new(#name_lit, #kind) };

    if let Some(flags) = &attrs.flags {
        tokens = quote! { #tokens.flags([#(#flags),*]) };
    }
    let help = attrs
        .help
        .as_ref()
        .map(|lit| lit.value())
        .or_else(|| doc_text(&field.attrs));
    if let Some(help) = help {
        let lit = LitStr::new(help.trim(), Span::call_site());
        tokens = quote! { #tokens.help(#lit) };
    }
    if let Some(value_name) = &attrs.value_name {
        tokens = quote! { #tokens.value_name(#value_name) };
    }
    if let Some(default) = &attrs.default {
        tokens = quote! { #tokens.default(#default) };
    } else if let Some(factory) = &attrs.default_factory {
        tokens = quote! { #tokens.default_factory(#factory) };
    } else if matches!(shape, TypeShape::Option(_)) {
        // An Option field with no declared default reads absence as None.
        tokens = quote! { #tokens.default(::recarg::Value::Null) };
    }
    if let Some(parse_with) = &attrs.parse_with {
        tokens = quote! { #tokens.parse_with(#parse_with) };
    }
    if let Some(choices) = &attrs.choices {
        tokens = quote! { #tokens.choices([#(#choices),*]) };
    }
    if let Some(nargs) = &attrs.nargs {
        let arity = match nargs {
            NargsSpec::Count(count) => quote! { ::recarg::Arity::Count(#count) },
            NargsSpec::OneOrMore => quote! { ::recarg::Arity::OneOrMore },
            NargsSpec::ZeroOrMore => quote! { ::recarg::Arity::ZeroOrMore },
        };
        tokens = quote! { #tokens.arity(#arity) };
    }
    if attrs.required {
        tokens = quote! { #tokens.required(true) };
    }
    if attrs.keep_underscores {
        tokens = quote! { #tokens.keep_underscores() };
    }
    if let Some(group) = &attrs.group {
        let group_tokens = match group {
            GroupSpec::Titled(title) => quote! { ::recarg::Group::titled(#title) },
            GroupSpec::Described(title, description) => {
                quote! { ::recarg::Group::described(#title, #description) }
            }
            GroupSpec::Anonymous => quote! { ::recarg::Group::anonymous() },
        };
        tokens = quote! { #tokens.group(#group_tokens) };
    }

    Ok(tokens)
}

fn doc_text(attrs: &[Attribute]) -> Option<String> {
    let mut lines: Vec<String> = Vec::new();
    for attr in attrs {
        if !attr.path().is_ident("doc") {
            continue;
        }
        let syn::Meta::NameValue(pair) = &attr.meta else {
            continue;
        };
        let syn::Expr::Lit(lit) = &pair.value else {
            continue;
        };
        if let syn::Lit::Str(text) = &lit.lit {
            lines.push(text.value().trim().to_string());
        }
    }
    let joined = lines.join(" ").trim().to_string();
    if joined.is_empty() { None } else { Some(joined) }
}

fn kebab_case(ident: &str) -> String {
    let mut out = String::new();
    for (i, ch) in ident.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
