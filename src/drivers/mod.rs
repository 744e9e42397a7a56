pub mod drv8711;

pub use drv8711::Drv8711;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverError {
    /// SPI transfer failed
    Spi,
    /// Chip-select pin could not be driven
    ChipSelect,
}
