//! Hardware boundary for the test rig.
//!
//! The dispatcher owns the operator settings and pushes every validated change through
//! [`RigHardware`], so the drivers always see the latest value without shared globals.

use crate::drivers::DriverError;

/// Servo-style 16-bit PWM outputs on the rig.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmChannel {
    Pwm3,
    Pwm4,
}

impl PwmChannel {
    pub fn label(self) -> &'static str {
        match self {
            PwmChannel::Pwm3 => "PWM 3",
            PwmChannel::Pwm4 => "PWM 4",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    #[default]
    Clockwise,
    AntiClockwise,
}

impl Direction {
    pub fn toggled(self) -> Self {
        match self {
            Direction::Clockwise => Direction::AntiClockwise,
            Direction::AntiClockwise => Direction::Clockwise,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::Clockwise => "CLOCKWISE",
            Direction::AntiClockwise => "ANTICLOCKWISE",
        }
    }
}

/// Primitive peripheral operations the menus drive.
pub trait RigHardware {
    /// Load a pulse width (us) into a 16-bit PWM output.
    fn set_pulse_time(&mut self, channel: PwmChannel, pulse_us: u16);

    /// Drive the stepper DIR output.
    fn set_direction(&mut self, direction: Direction);

    /// Time between step pulses (us) used while stepping.
    fn set_step_interval(&mut self, interval_us: u16);

    /// Put the motor driver in indexer (step/dir) mode.
    fn set_stepper_mode(&mut self) -> Result<(), DriverError>;

    fn set_motor_enabled(&mut self, enabled: bool) -> Result<(), DriverError>;

    /// Start or stop step generation. Stopping leaves the STEP output low.
    fn set_stepping(&mut self, stepping: bool);

    fn read_driver_status(&mut self) -> Result<u16, DriverError>;

    fn clear_driver_status(&mut self) -> Result<(), DriverError>;
}
