//! World document encoding and file persistence.
//!
//! The canonical format is pretty-printed JSON with camelCase fields. Elements
//! are kept in an ordered map and timestamps are RFC 3339 strings, so parsing
//! a document and encoding it again yields the same bytes.
//!
//! `MessagePack` (named fields) is available as a compact archive format.
//! Files ending in `.msgpack` or `.mpk` use it; everything else is JSON.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::debug;
use worldbible_foundation::{Error, ErrorKind, Result};
use worldbible_storage::World;

/// On-disk encoding of a world document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// Pretty-printed JSON.
    Json,
    /// `MessagePack` with named fields.
    MessagePack,
}

impl Format {
    /// Picks the format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("msgpack") || ext.eq_ignore_ascii_case("mpk") => {
                Self::MessagePack
            }
            _ => Self::Json,
        }
    }
}

// =============================================================================
// In-memory codecs
// =============================================================================

/// Encodes a world as a pretty-printed JSON document.
///
/// # Errors
///
/// Returns `SerializationFailure` if encoding fails.
pub fn to_json(world: &World) -> Result<String> {
    serde_json::to_string_pretty(world).map_err(|e| Error::serialization(e.to_string()))
}

/// Parses a JSON world document.
///
/// # Errors
///
/// Returns `SerializationFailure` if the text is not a valid document.
pub fn from_json(text: &str) -> Result<World> {
    serde_json::from_str(text).map_err(|e| Error::serialization(e.to_string()))
}

/// Encodes a world as `MessagePack`, keeping field names.
///
/// # Errors
///
/// Returns `SerializationFailure` if encoding fails.
pub fn to_msgpack(world: &World) -> Result<Vec<u8>> {
    rmp_serde::to_vec_named(world).map_err(|e| Error::serialization(e.to_string()))
}

/// Decodes a `MessagePack` world.
///
/// # Errors
///
/// Returns `SerializationFailure` if the bytes are not a valid world.
pub fn from_msgpack(bytes: &[u8]) -> Result<World> {
    rmp_serde::from_slice(bytes).map_err(|e| Error::serialization(e.to_string()))
}

// =============================================================================
// Files
// =============================================================================

fn io_error(action: &str, path: &Path, e: &std::io::Error) -> Error {
    Error::new(ErrorKind::Io(format!(
        "failed to {action} '{}': {e}",
        path.display()
    )))
}

/// Saves a world, creating or truncating the file.
///
/// # Errors
///
/// Returns `Io` if the file cannot be written and `SerializationFailure` if
/// encoding fails. Nothing is written when encoding fails.
pub fn save_to_file<P: AsRef<Path>>(world: &World, path: P) -> Result<()> {
    let path = path.as_ref();
    let bytes = match Format::from_path(path) {
        Format::Json => to_json(world)?.into_bytes(),
        Format::MessagePack => to_msgpack(world)?,
    };

    let file = File::create(path).map_err(|e| io_error("create file", path, &e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(&bytes)
        .map_err(|e| io_error("write to file", path, &e))?;
    writer
        .flush()
        .map_err(|e| io_error("flush file", path, &e))?;

    debug!(path = %path.display(), bytes = bytes.len(), "world saved");
    Ok(())
}

/// Loads a world saved by [`save_to_file`].
///
/// # Errors
///
/// Returns `Io` if the file cannot be read and `SerializationFailure` if its
/// contents are not a valid world.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<World> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| io_error("open file", path, &e))?;
    let mut reader = BufReader::new(file);
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| io_error("read file", path, &e))?;

    let world = match Format::from_path(path) {
        Format::Json => {
            let text = std::str::from_utf8(&bytes)
                .map_err(|e| Error::serialization(format!("document is not UTF-8: {e}")))?;
            from_json(text)?
        }
        Format::MessagePack => from_msgpack(&bytes)?,
    };
    debug!(path = %path.display(), elements = world.element_count(), "world loaded");
    Ok(world)
}
