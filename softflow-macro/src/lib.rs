//! Derive macro for bit-representable simulation values.
//!
//! # Note
//!
//! `#[derive(Signal)]` on a struct lays out its ports as a struct of its fields, in declaration
//! order. The first field occupies the least significant bits of `transl()`.
//!
//! ```ignore
//! #[derive(Debug, Clone, Signal)]
//! pub struct Valid<V: Signal> {
//!     #[member(name = "")]
//!     pub inner: V,
//!     pub valid: bool,
//! }
//!
//! impl<V: Signal> Signal for Valid<V> {
//!     ...
//!     fn port_decls() -> PortDecls {
//!         PortDecls::Struct(vec![
//!             (None, V::port_decls()),
//!             (Some("valid".to_string()), PortDecls::Bits(1)),
//!         ])
//!     }
//! }
//! ```
//!
//! Unit-only enums are encoded as their variant index (or `#[encode(..)]`) in `clog2(#variants)`
//! bits, unless `#[width(..)]` overrides it.

mod signal;
mod utils;

use proc_macro::{self, TokenStream};

#[proc_macro_derive(Signal, attributes(member, width, encode))]
pub fn signal(input: TokenStream) -> TokenStream { signal::derive(input) }
