pub mod error;
pub mod line_reader;
pub mod parser;

pub use error::{InputError, ReadError};
pub use line_reader::LineReader;
pub use parser::{check_range, parse_value};

/// Capacity of the receive buffer; menus ask for at most 4 characters.
pub const RX_BUFFER_SIZE: usize = 8;
