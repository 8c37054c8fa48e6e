use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, ToTokens};
use syn::{
    parse::{Parse, ParseStream},
    Attribute,
    Expr,
    ExprArray,
    Generics,
    Ident,
    ItemStruct,
    Result,
    Token,
};

/// The arguments that can be passed to the `error` attribute.
#[derive(Debug, Default)]
pub struct ErrorArgs {
    pub message: Option<Expr>,
    pub labels: Vec<Expr>,
    pub help: Option<Expr>,
}

impl ErrorArgs {
    /// Parse the next argument in the input stream and applies it to itself.
    fn parse_arg(&mut self, input: ParseStream) -> Result<()> {
        let ident: Ident = input.parse()?;
        input.parse::<Token![=]>()?;

        let ident_str = ident.to_string();
        match ident_str.as_str() {
            "message" => self.message = Some(input.parse()?),
            "labels" => {
                let array: ExprArray = input.parse()?;
                self.labels = array.elems.into_iter().collect();
            },
            "help" => self.help = Some(input.parse()?),
            _ => return Err(syn::Error::new_spanned(ident, format!("unknown tag `{}`", ident_str))),
        }

        Ok(())
    }
}

impl Parse for ErrorArgs {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut args = ErrorArgs::default();

        // tags are separated by commas, and a trailing comma is allowed
        while !input.is_empty() {
            args.parse_arg(input)?;
            if input.is_empty() {
                break;
            }
            input.parse::<Token![,]>()?;
        }

        Ok(args)
    }
}

/// The target struct to derive [`ErrorKind`] for.
#[derive(Debug)]
pub struct ErrorKindTarget {
    pub name: Ident,
    pub generics: Generics,
    pub error_args: ErrorArgs,
}

impl Parse for ErrorKindTarget {
    fn parse(input: ParseStream) -> Result<Self> {
        // parse outer attributes, including documentation and `error` attributes
        let attributes = input.call(Attribute::parse_outer)?;
        let remaining = input.parse::<ItemStruct>()?;

        let name = remaining.ident;
        let mut error_args = None;

        for attr in &attributes {
            if attr.path().is_ident("error") {
                error_args = Some(attr.parse_args::<ErrorArgs>()?);
                break;
            }
        }

        let Some(error_args) = error_args else {
            return Err(syn::Error::new_spanned(name, "missing `#[error(...)]` attribute"));
        };

        if error_args.message.is_none() {
            return Err(syn::Error::new_spanned(name, "the `error` attribute needs a `message` tag"));
        }

        Ok(ErrorKindTarget {
            name,
            generics: remaining.generics,
            error_args,
        })
    }
}

impl ToTokens for ErrorKindTarget {
    fn to_tokens(&self, tokens: &mut TokenStream2) {
        let message = self.error_args.message.as_ref()
            .map(|expr| quote! { (#expr).to_string() })
            .unwrap_or_else(|| quote! { ::std::string::String::new() });
        let labels = &self.error_args.labels;
        let help = self.error_args.help.as_ref().map(|expr| {
            quote! { builder.set_help((#expr).to_string()); }
        });

        tokens.extend(quote! {
            fn message(&self) -> ::std::string::String {
                #message
            }

            fn build_report<'a>(
                &self,
                src_id: &'a str,
                spans: &[::std::ops::Range<usize>],
            ) -> ::canon_error::ariadne::Report<(&'a str, ::std::ops::Range<usize>)> {
                use ::canon_error::ariadne::{Label, Report, ReportKind};

                let labels: ::std::vec::Vec<::std::string::String> = ::std::vec![
                    #((#labels).to_string()),*
                ];
                let offset = spans.first().map(|span| span.start).unwrap_or(0);
                let mut builder = Report::build(ReportKind::Error, src_id, offset)
                    .with_message(self.message());

                for (span, label) in spans.iter().zip(labels) {
                    let mut span_label = Label::new((src_id, span.clone()))
                        .with_color(::canon_error::EXPR);
                    if !label.is_empty() {
                        span_label = span_label.with_message(label);
                    }
                    builder.add_label(span_label);
                }

                #help

                builder.finish()
            }
        });
    }
}
