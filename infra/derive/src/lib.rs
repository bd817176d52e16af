#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by every `StoreHub` crate.
//!
//! * [`macro@shub_error`] turns an enum into a `thiserror` error with `.context(..)` support.
//! * [`macro@api_model`] and [`macro@api_handler`] keep DTOs and axum handlers consistent
//!   with the `OpenAPI` document.
//! * [`macro@shub_slice`] wraps feature state into an `Arc` handle registrable in the kernel.
//!
//! Examples are `ignore`d here because a proc-macro crate cannot use its own macros.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Standard request/response DTO.
///
/// * Adds `Debug`, `Serialize` and `Deserialize` unless already derived.
/// * Adds `utoipa::ToSchema` behind the consuming crate's `server` feature.
/// * Applies `#[serde(rename_all = "camelCase")]` and `#[serde(deny_unknown_fields)]`
///   unless overridden with `rename_all = "..."` / `deny_unknown_fields = false`.
///
/// ```rust,ignore
/// #[shub_derive::api_model(deny_unknown_fields = false)]
/// pub struct LoginResponse {
///     pub jwt: String,
/// }
/// ```
#[proc_macro_attribute]
pub fn api_model(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::api::expand_api_model(attr.into(), input).into()
}

/// Axum handler registered in the `OpenAPI` document.
///
/// Arguments are forwarded to `utoipa::path` when the `server` feature of the consuming crate
/// is enabled.
///
/// ```rust,ignore
/// #[shub_derive::api_handler(
///     post,
///     path = "/api/orders",
///     responses((status = OK, body = OrderResponse)),
///     tag = ORDERS_TAG,
/// )]
/// pub async fn create_order_handler() -> impl IntoResponse { /* ... */ }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_api_handler(args.into(), input).into()
}

/// Domain error enum.
///
/// # Generated items
///
/// * `#[derive(Debug, thiserror::Error)]` unless already present.
/// * `<Name>Ext` trait adding `.context(..)` to `Result<T, Name>` and to results of every
///   wrapped source error type.
/// * `From<Source>` for variants with a `source` (or `#[source]`/`#[from]`) field.
/// * `From<&'static str>` / `From<String>` when an `Internal { message, context }` variant exists.
/// * A module-private `format_context` helper for the `#[error(...)]` strings.
///
/// # Requirements
///
/// * Variants use named fields; tuple and unit variants are rejected.
/// * A variant with a source must also carry `context: Option<Cow<'static, str>>`.
///
/// ```rust,ignore
/// #[shub_derive::shub_error]
/// pub enum StoreError {
///     #[error("Duplicate record{}: {message}", format_context(.context))]
///     Duplicate { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
///     #[error("Internal store error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
/// ```
#[proc_macro_attribute]
pub fn shub_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand(input).into()
}

/// Feature slice handle.
///
/// `struct Foo { .. }` becomes `FooInner { .. }` plus a cloneable `Foo` wrapping
/// `Arc<FooInner>`, with `Deref` to the inner state and a `FeatureSlice` impl.
///
/// ```rust,ignore
/// #[shub_derive::shub_slice]
/// pub struct Orders {
///     pub service: Arc<dyn OrderService>,
/// }
/// ```
#[proc_macro_attribute]
pub fn shub_slice(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::slice::expand_slice(input).into()
}
