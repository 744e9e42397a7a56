use super::{InputError, ReadError, RX_BUFFER_SIZE};
use crate::console::{Console, ConsoleError};
use heapless::String;

const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7F;

/// Bounded line input from the operator terminal.
///
/// One buffer is reused for every read; it is cleared at the start of each call.
pub struct LineReader {
    buffer: String<RX_BUFFER_SIZE>,
    echo: bool,
    // Set after a CR so the LF of a CRLF pair is not read as an empty line
    last_was_cr: bool,
    // Set after TooLong; the rest of that line is dropped on the next read
    discarding: bool,
}

impl Default for LineReader {
    fn default() -> Self {
        Self::new()
    }
}

impl LineReader {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            echo: false,
            last_was_cr: false,
            discarding: false,
        }
    }

    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Read one terminated line of at most `max_len` characters.
    ///
    /// `max_len` is clamped to the buffer capacity.
    pub async fn read_line<C: Console>(
        &mut self,
        console: &mut C,
        max_len: usize,
    ) -> Result<&str, ReadError> {
        let max_len = max_len.min(RX_BUFFER_SIZE);
        self.buffer.clear();

        loop {
            let byte = match console.read_byte().await {
                Ok(byte) => byte,
                Err(e) => {
                    self.buffer.clear();
                    return Err(e.into());
                }
            };

            let after_cr = core::mem::replace(&mut self.last_was_cr, byte == b'\r');
            if byte == b'\n' && after_cr {
                continue;
            }

            if self.discarding {
                if byte == b'\r' || byte == b'\n' {
                    self.discarding = false;
                }
                continue;
            }

            match byte {
                b'\r' | b'\n' => {
                    if self.buffer.is_empty() {
                        return Err(InputError::NoData.into());
                    }
                    debug!("line: '{}'", self.buffer.as_str());
                    return Ok(self.buffer.as_str());
                }
                BACKSPACE | DELETE => {
                    if self.buffer.pop().is_some() && self.echo {
                        console.write_str("\x08 \x08").await?;
                    }
                }
                0x20..=0x7E => {
                    if self.buffer.len() >= max_len {
                        self.buffer.clear();
                        self.discarding = true;
                        return Err(InputError::TooLong.into());
                    }
                    // Capacity is RX_BUFFER_SIZE and max_len never exceeds it
                    let _ = self.buffer.push(byte as char);
                    if self.echo {
                        let mut echo = [0u8; 4];
                        console
                            .write_str((byte as char).encode_utf8(&mut echo))
                            .await?;
                    }
                }
                _ => {
                    // Ignore other control characters
                }
            }
        }
    }

    /// Wait for a single keypress.
    ///
    /// The LF left over from a CRLF line ending is not a keypress.
    pub async fn read_key<C: Console>(&mut self, console: &mut C) -> Result<u8, ConsoleError> {
        loop {
            let byte = console.read_byte().await?;
            let after_cr = core::mem::replace(&mut self.last_was_cr, byte == b'\r');
            if byte == b'\n' && after_cr {
                continue;
            }
            return Ok(byte);
        }
    }
}
