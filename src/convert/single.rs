use serde_json::Value;

use super::{
    convert_commands, finish_document, take_commands, BroadlinkToTuya, ConvertStats,
    DocumentConverter,
};
use crate::error::Result;
use crate::ConvertConfig;

/// Converts every command on the calling thread
pub struct SingleThreadedConverter {
    config: ConvertConfig,
}

impl SingleThreadedConverter {
    pub fn new(config: ConvertConfig) -> Self {
        Self { config }
    }
}

impl DocumentConverter for SingleThreadedConverter {
    fn convert(&mut self, mut document: Value) -> Result<(Value, ConvertStats)> {
        let commands = take_commands(&mut document)?;
        let converter = BroadlinkToTuya::new(self.config.level);

        let mut stats = ConvertStats::default();
        let converted = convert_commands(&commands, &converter, &mut stats)?;

        Ok((finish_document(document, converted), stats))
    }
}
