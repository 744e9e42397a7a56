//! DRV8711 stepper driver over SPI.
//!
//! Each access is one 16-bit frame, MSB first: bit 15 selects read (1) or write (0), bits
//! 14..12 carry the register address and bits 11..0 the data. Chip select is active HIGH on
//! this part, so it is driven by hand around every frame.

use super::DriverError;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

// Register addresses
pub mod reg {
    pub const CTRL: u8 = 0x00;
    pub const TORQUE: u8 = 0x01;
    pub const OFF: u8 = 0x02;
    pub const BLANK: u8 = 0x03;
    pub const DECAY: u8 = 0x04;
    pub const STALL: u8 = 0x05;
    pub const DRIVE: u8 = 0x06;
    pub const STATUS: u8 = 0x07;
}

// Power-on values from the datasheet, CTRL with the outputs disabled
const DEFAULTS: [(u8, u16); 7] = [
    (reg::CTRL, 0xC10),
    (reg::TORQUE, 0x1FF),
    (reg::OFF, 0x030),
    (reg::BLANK, 0x080),
    (reg::DECAY, 0x110),
    (reg::STALL, 0x040),
    (reg::DRIVE, 0xA59),
];

const CTRL_ENBL: u16 = 1 << 0;
const OFF_PWMMODE: u16 = 1 << 8;

const READ_BIT: u16 = 1 << 15;
const DATA_MASK: u16 = 0x0FFF;

/// Bridge drive mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriveMode {
    /// Internal indexer driven by the STEP/DIR inputs
    Stepper,
    /// Indexer bypassed, bridges driven directly by the xINx inputs
    DirectPwm,
}

/// STATUS register.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Status {
    raw: u16,
}

impl Status {
    pub fn from_raw(raw: u16) -> Self {
        Self {
            raw: raw & DATA_MASK,
        }
    }

    #[inline]
    pub fn raw(&self) -> u16 {
        self.raw
    }

    /// Overtemperature shutdown.
    #[inline]
    pub fn ots(&self) -> bool {
        (self.raw & (1 << 0)) != 0
    }

    /// Channel A overcurrent shutdown.
    #[inline]
    pub fn aocp(&self) -> bool {
        (self.raw & (1 << 1)) != 0
    }

    /// Channel B overcurrent shutdown.
    #[inline]
    pub fn bocp(&self) -> bool {
        (self.raw & (1 << 2)) != 0
    }

    /// Channel A predriver fault.
    #[inline]
    pub fn apdf(&self) -> bool {
        (self.raw & (1 << 3)) != 0
    }

    /// Channel B predriver fault.
    #[inline]
    pub fn bpdf(&self) -> bool {
        (self.raw & (1 << 4)) != 0
    }

    /// Undervoltage lockout.
    #[inline]
    pub fn uvlo(&self) -> bool {
        (self.raw & (1 << 5)) != 0
    }

    /// Stall detected.
    #[inline]
    pub fn std(&self) -> bool {
        (self.raw & (1 << 6)) != 0
    }

    /// Latched stall detect.
    #[inline]
    pub fn stdlat(&self) -> bool {
        (self.raw & (1 << 7)) != 0
    }

    pub fn has_fault(&self) -> bool {
        self.raw & 0xFF != 0
    }
}

/// Build a read frame for `addr`.
#[inline]
pub fn read_frame(addr: u8) -> u16 {
    READ_BIT | (u16::from(addr & 0x07) << 12)
}

/// Build a write frame carrying the low 12 bits of `data`.
#[inline]
pub fn write_frame(addr: u8, data: u16) -> u16 {
    (u16::from(addr & 0x07) << 12) | (data & DATA_MASK)
}

pub struct Drv8711<SPI, CS> {
    spi: SPI,
    cs: CS,
}

impl<SPI, CS> Drv8711<SPI, CS>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
{
    pub fn new(spi: SPI, cs: CS) -> Self {
        Self { spi, cs }
    }

    /// Load the datasheet defaults into every configuration register.
    pub fn init(&mut self) -> Result<(), DriverError> {
        for (addr, value) in DEFAULTS {
            self.write_register(addr, value)?;
        }
        self.clear_status()?;
        info!("DRV8711: configured, outputs disabled");
        Ok(())
    }

    fn transfer(&mut self, frame: u16) -> Result<u16, DriverError> {
        let tx = frame.to_be_bytes();
        let mut rx = [0u8; 2];

        self.cs.set_high().map_err(|_| DriverError::ChipSelect)?;
        let result = self
            .spi
            .transfer(&mut rx, &tx)
            .and_then(|_| self.spi.flush());
        // Release the chip even when the transfer failed
        self.cs.set_low().map_err(|_| DriverError::ChipSelect)?;
        result.map_err(|_| DriverError::Spi)?;

        Ok(u16::from_be_bytes(rx))
    }

    pub fn read_register(&mut self, addr: u8) -> Result<u16, DriverError> {
        let response = self.transfer(read_frame(addr))?;
        Ok(response & DATA_MASK)
    }

    pub fn write_register(&mut self, addr: u8, data: u16) -> Result<(), DriverError> {
        self.transfer(write_frame(addr, data))?;
        Ok(())
    }

    fn modify_register(
        &mut self,
        addr: u8,
        f: impl FnOnce(u16) -> u16,
    ) -> Result<(), DriverError> {
        let value = self.read_register(addr)?;
        self.write_register(addr, f(value))
    }

    pub fn status(&mut self) -> Result<Status, DriverError> {
        self.read_register(reg::STATUS).map(Status::from_raw)
    }

    /// Clear the latched fault bits.
    pub fn clear_status(&mut self) -> Result<(), DriverError> {
        self.write_register(reg::STATUS, 0)
    }

    pub fn set_enabled(&mut self, enabled: bool) -> Result<(), DriverError> {
        self.modify_register(reg::CTRL, |ctrl| {
            if enabled {
                ctrl | CTRL_ENBL
            } else {
                ctrl & !CTRL_ENBL
            }
        })
    }

    pub fn set_mode(&mut self, mode: DriveMode) -> Result<(), DriverError> {
        debug!("DRV8711: mode {}", mode);
        self.modify_register(reg::OFF, |off| match mode {
            DriveMode::Stepper => off & !OFF_PWMMODE,
            DriveMode::DirectPwm => off | OFF_PWMMODE,
        })
    }

    pub fn free(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }
}
