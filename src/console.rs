//! Serial console boundary.
//!
//! The menu only needs to send text and to wait for one received byte. Board code provides
//! the UART-backed implementation; tests script one in memory.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConsoleError {
    /// Transport failure on the UART
    Uart,
    /// No byte arrived within the configured receive timeout
    Timeout,
}

#[allow(async_fn_in_trait)]
pub trait Console {
    async fn write_str(&mut self, s: &str) -> Result<(), ConsoleError>;

    /// Wait for the next received byte.
    async fn read_byte(&mut self) -> Result<u8, ConsoleError>;

    async fn write_line(&mut self, s: &str) -> Result<(), ConsoleError> {
        self.write_str(s).await?;
        self.write_str("\r\n").await
    }
}
