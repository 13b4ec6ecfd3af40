//! CLI command handlers

pub mod commands;

pub use commands::{decode, decode_file, encode, encode_file, headers, load_document, OutputFormat};
