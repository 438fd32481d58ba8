mod route;

use proc_macro::TokenStream;

/// Generates an `OpenAPI` transform for a handler, named after the handler with the suffix `_docs`.
///
/// The first paragraph of the doc comment becomes the operation summary and the
/// rest becomes its description. Accepts any number of `tag = ...` and
/// `response(status = ..., description = "...", shape = "...")` arguments.
#[proc_macro_attribute]
pub fn route(args: TokenStream, input: TokenStream) -> TokenStream {
	route::from_input(args, input)
}
