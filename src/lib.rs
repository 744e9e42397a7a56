#![cfg_attr(not(test), no_std)]

//! Lift Test Rig Firmware Library
//!
//! Serial-terminal menus for exercising the rig's PWM outputs, the DRV8711 stepper driver
//! and a simulated lift. The menu core runs against the [`console::Console`] and
//! [`rig::RigHardware`] traits; the nRF52840 implementations live in `board`.

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod config;
pub mod console;
pub mod drivers;
pub mod input;
pub mod menu;
pub mod rig;

// Board support (conditional compilation for rig feature)
#[cfg(feature = "rig")]
pub mod board;

pub use config::RigConfig;
pub use console::{Console, ConsoleError};
pub use menu::{DeviceSettings, Dispatcher, MenuContext};
pub use rig::{Direction, PwmChannel, RigHardware};
