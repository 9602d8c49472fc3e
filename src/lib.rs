//! Upload office documents, get a Markdown/plain-text rendition back.
//!
//! All parsing and markdown generation is delegated to an external engine
//! (MarkItDown) behind the [`engine::Engine`] trait; this crate is the
//! orchestration, the HTTP surface, and the reporting around it.

pub mod cli;
pub mod config;
pub mod engine;
pub mod pipeline;
pub mod postprocess;
pub mod report;
pub mod server;
pub mod staging;
pub mod util;
