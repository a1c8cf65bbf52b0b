//! Attribute macros for Weir.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    Expr, FnArg, Ident, ItemFn, LitStr, ReturnType, Token,
    parse::{Parse, ParseStream},
    parse_macro_input,
};

/// Turn a function `fn(Message) -> Result<Message, E>` into a processor.
///
/// The function is replaced by a unit struct of the same name (or of the
/// name given with `name = "..."`) implementing `weir::Processor`. The
/// original body stays callable as `Struct::call`.
///
/// With `filter = predicate`, messages for which `predicate(&message)` is
/// false pass through unchanged.
///
/// ```rust,ignore
/// #[weir::processor]
/// fn shout(message: Message) -> Result<Message, BoxError> {
///     let body = message.body_str().unwrap_or_default().to_uppercase();
///     Ok(message.set_body(body))
/// }
///
/// let route = Route::new(shout);
/// ```
#[proc_macro_attribute]
pub fn processor(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as ProcessorArgs);
    let input = parse_macro_input!(item as ItemFn);

    expand_processor(&args, &input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_processor(args: &ProcessorArgs, input: &ItemFn) -> syn::Result<TokenStream2> {
    let fn_name = &input.sig.ident;
    let fn_vis = &input.vis;
    let fn_block = &input.block;
    let fn_attrs = &input.attrs;

    if let Some(asyncness) = &input.sig.asyncness {
        return Err(syn::Error::new_spanned(
            asyncness,
            "Processor function must not be async",
        ));
    }

    let inputs = &input.sig.inputs;
    let message_arg = match (inputs.len(), inputs.first()) {
        (1, Some(FnArg::Typed(pat_type))) => pat_type,
        _ => {
            return Err(syn::Error::new_spanned(
                inputs,
                "Processor function must take a single message argument: fn(message: Message)",
            ));
        }
    };

    let ReturnType::Type(_, output) = &input.sig.output else {
        return Err(syn::Error::new_spanned(
            &input.sig,
            "Processor function must return Result<Message, E>",
        ));
    };

    let struct_name = if let Some(ref custom_name) = args.name {
        Ident::new(custom_name, fn_name.span())
    } else {
        fn_name.clone()
    };

    let filter_check = args.filter.as_ref().map(|filter_expr| {
        quote! {
            if !(#filter_expr)(&message) {
                k(::weir::Validation::from(message));
                return;
            }
        }
    });

    Ok(quote! {
        #[allow(non_camel_case_types)]
        #[derive(Clone, Copy, Debug, Default)]
        #[doc = concat!("Processor generated by `#[weir::processor]` on `", stringify!(#fn_name), "`")]
        #fn_vis struct #struct_name;

        impl #struct_name {
            #(#fn_attrs)*
            #fn_vis fn call(#message_arg) -> #output #fn_block
        }

        impl ::weir::Processor for #struct_name {
            fn process(&self, message: ::weir::Message, k: ::weir::Continuation) {
                #filter_check
                ::weir::processors::invoke(message, &k, Self::call);
            }
        }
    })
}

struct ProcessorArgs {
    name: Option<String>,
    filter: Option<Expr>,
}

impl Parse for ProcessorArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut name = None;
        let mut filter = None;

        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            match ident.to_string().as_str() {
                "name" => {
                    let lit: LitStr = input.parse()?;
                    name = Some(lit.value());
                }
                "filter" => {
                    let expr: Expr = input.parse()?;
                    filter = Some(expr);
                }
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown attribute: {}", other),
                    ));
                }
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(ProcessorArgs { name, filter })
    }
}
