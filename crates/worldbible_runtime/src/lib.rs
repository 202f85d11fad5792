//! World documents, editing sessions and the command line for worldbible.
//!
//! This crate provides:
//! - [`document`] - JSON and `MessagePack` world documents, file load/save
//! - [`Session`] - editing facade with write-time rule checks and automatic
//!   conflict analysis
//! - the `worldbible` binary

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod document;
pub mod session;

pub use document::{
    Format, from_json, from_msgpack, load_from_file, save_to_file, to_json, to_msgpack,
};
pub use session::{Session, SessionConfig};
