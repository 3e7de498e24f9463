//! SmartIR command document conversion.
//!
//! A SmartIR document keeps its IR codes under `commands`, nested by mode,
//! fan speed and temperature. Conversion replaces every string leaf with its
//! Tuya encoding and leaves all other values untouched.

pub mod parallel;
pub mod single;

pub use parallel::ParallelConverter;
pub use single::SingleThreadedConverter;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::debug;
use serde_json::{Map, Value};

use crate::broadlink;
use crate::compress::compress;
use crate::error::{Error, Result};
use crate::CompressionLevel;

/// Controller name written into converted documents
pub const SUPPORTED_CONTROLLER: &str = "MQTT";

/// Encoding name written into converted documents
pub const COMMANDS_ENCODING: &str = "Raw";

/// Turns one IR code into its encoded textual form
pub trait CodeConverter: Sync {
    fn convert(&self, code: &str) -> Result<String>;
}

/// Broadlink base64 code in, Tuya base64 stream out
#[derive(Clone, Copy, Debug, Default)]
pub struct BroadlinkToTuya {
    level: CompressionLevel,
}

impl BroadlinkToTuya {
    pub fn new(level: CompressionLevel) -> Self {
        Self { level }
    }
}

impl CodeConverter for BroadlinkToTuya {
    fn convert(&self, code: &str) -> Result<String> {
        let payload = broadlink::decode_code(code)?;
        compress_to_base64(&payload, self.level)
    }
}

/// Single-line standard base64 with padding
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Compress a packed timing buffer and wrap it in base64
pub fn compress_to_base64(data: &[u8], level: CompressionLevel) -> Result<String> {
    Ok(encode_base64(&compress(data, level)?))
}

/// Convert a single Broadlink code to a Tuya code
pub fn convert_broadlink_code(code: &str, level: CompressionLevel) -> Result<String> {
    BroadlinkToTuya::new(level).convert(code)
}

/// Statistics from a document conversion
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConvertStats {
    pub codes_converted: u64,
    /// Total length of the original code strings
    pub input_bytes: u64,
    /// Total length of the encoded code strings
    pub output_bytes: u64,
}

impl ConvertStats {
    fn record(&mut self, input: &str, output: &str) {
        self.codes_converted += 1;
        self.input_bytes += input.len() as u64;
        self.output_bytes += output.len() as u64;
    }
}

/// Trait for converting a whole SmartIR document
pub trait DocumentConverter {
    fn convert(&mut self, document: Value) -> Result<(Value, ConvertStats)>;
}

/// Recursively convert every string leaf of a command tree
///
/// Key order is preserved. A failing code is reported with its own key.
pub fn convert_commands<C: CodeConverter + ?Sized>(
    commands: &Map<String, Value>,
    converter: &C,
    stats: &mut ConvertStats,
) -> Result<Map<String, Value>> {
    let mut result = Map::with_capacity(commands.len());

    for (key, value) in commands {
        let converted = match value {
            Value::String(code) => {
                let encoded = converter.convert(code).map_err(|e| command_error(key, e))?;
                debug!("converted '{}': {} -> {} chars", key, code.len(), encoded.len());
                stats.record(code, &encoded);
                Value::String(encoded)
            }
            Value::Object(nested) => Value::Object(convert_commands(nested, converter, stats)?),
            other => other.clone(),
        };
        result.insert(key.clone(), converted);
    }

    Ok(result)
}

fn command_error(key: &str, source: Error) -> Error {
    Error::Command { key: key.to_string(), source: Box::new(source) }
}

/// Take the `commands` object out of a document, `{}` when absent
///
/// The entry itself stays in place so the converted map lands in the same
/// slot and the top-level key order is unchanged.
fn take_commands(document: &mut Value) -> Result<Map<String, Value>> {
    let object = document
        .as_object_mut()
        .ok_or_else(|| Error::InvalidDocument("top level must be an object".to_string()))?;

    match object.get_mut("commands") {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(commands)) => Ok(std::mem::take(commands)),
        Some(_) => Err(Error::InvalidDocument("'commands' must be an object".to_string())),
    }
}

/// Put converted commands back and mark the document as Tuya-encoded
///
/// Existing keys keep their position; missing ones are appended.
fn finish_document(mut document: Value, commands: Map<String, Value>) -> Value {
    if let Some(object) = document.as_object_mut() {
        object.insert("commands".to_string(), Value::Object(commands));
        object.insert("supportedController".to_string(), SUPPORTED_CONTROLLER.into());
        object.insert("commandsEncoding".to_string(), COMMANDS_ENCODING.into());
    }
    document
}
