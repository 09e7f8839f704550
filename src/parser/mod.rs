//! Parser module for reflecting over a tokenized PHP file.
//!
//! A single forward-only [`TokenStream`](stream::TokenStream) is shared by
//! everything in here:
//!
//! - file: the `SourceFile` driver and its dispatch loop
//! - lookups: which token kind is handled by which file handler
//! - elements: include, constant, function, class and interface parsers
//! - markers: `// TODO`-style comment scanning
//!
//! Handlers are looked up per token kind; a handler leaves the cursor one
//! token past what it consumed and the loop resumes from there.

pub mod elements;
pub mod file;
pub mod lookups;
pub mod markers;
pub mod stream;
