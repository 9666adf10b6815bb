//! Standard library.

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
#![allow(clippy::type_complexity)]
#![allow(type_alias_bounds)]

use softflow::*;

mod bitmap;
pub mod lane;
mod stream;
mod unidir;
mod valid_ready;

pub use bitmap::*;
pub use stream::*;
pub use unidir::*;
pub use valid_ready::*;
