//! SoftFlow: cycle-level simulation of latency-insensitive hardware modules.
//!
//! Modules are described the same way they would be in a hardware description: a typed ingress and
//! egress [`Interface`], and a transition function that maps the ingress forward signals, the egress
//! backward signals and the current state to the egress forward signals, the ingress backward signals
//! and the next state. [`Fsm::step`] evaluates one clock edge.

// # Tries to warn on most lints (`rustc -W help`).
#![warn(absolute_paths_not_starting_with_crate)]
#![warn(anonymous_parameters)]
#![warn(explicit_outlives_requirements)]
#![warn(keyword_idents)]
#![warn(macro_use_extern_crate)]
#![warn(missing_debug_implementations)]
#![warn(non_ascii_idents)]
#![warn(rust_2018_idioms)]
#![warn(trivial_numeric_casts)]
#![warn(unsafe_op_in_unsafe_fn)]
#![warn(unused_extern_crates)]
#![warn(unused_import_braces)]
#![warn(unused_qualifications)]
//
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::private_intra_doc_links)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_codeblock_attributes)]
#![warn(rustdoc::invalid_html_tags)]
#![warn(rustdoc::invalid_rust_codeblocks)]
#![warn(rustdoc::bare_urls)]
#![warn(unreachable_pub)]
//
#![allow(type_alias_bounds)]

// `#[derive(Signal)]` refers to `::softflow`.
extern crate self as softflow;

mod bits;
mod interface;
mod module;
mod module_fsm;
mod port_decls;
mod signal;
pub mod utils;
pub mod vcdgen;

pub use bits::Bits;
pub use interface::{Bwd, ChannelTyp, Fwd, Interface};
pub use module::Module;
pub use module_fsm::Fsm;
pub use port_decls::{PortDecls, PortIter};
pub use signal::{Signal, SignalError};
pub use softflow_macro::Signal;
pub use utils::*;
pub use vcdgen::{Probe, VcdError, Vcdgen};
