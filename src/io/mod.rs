mod file_reader;
mod range_reader;

pub use file_reader::FileReader;
pub use range_reader::{check_range, MemoryReader, RangeReader};
