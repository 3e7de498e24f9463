pub mod codec;
pub mod constants;
pub mod reader;

pub use codec::{literal_run_cost, reference_cost, Block, BlockWriter};
pub use constants::*;
pub use reader::{decompress, summarize, BlockReader, StreamSummary};
