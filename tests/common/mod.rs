//! Shared test doubles: a scripted console and a recording rig.

#![allow(dead_code)]

use std::collections::VecDeque;

use lift_test_rig::drivers::DriverError;
use lift_test_rig::{Console, ConsoleError, Direction, PwmChannel, RigHardware};

/// Console fed from a byte script. Once the script runs out every read fails with
/// `exhausted` (a UART error unless the test asks for timeouts).
pub struct ScriptedConsole {
    input: VecDeque<u8>,
    pub output: String,
    exhausted: ConsoleError,
}

impl ScriptedConsole {
    pub fn new(script: &str) -> Self {
        Self {
            input: script.bytes().collect(),
            output: String::new(),
            exhausted: ConsoleError::Uart,
        }
    }

    pub fn timing_out(mut self) -> Self {
        self.exhausted = ConsoleError::Timeout;
        self
    }

    pub fn feed(&mut self, script: &str) {
        self.input.extend(script.bytes());
    }

    pub fn pending(&self) -> usize {
        self.input.len()
    }

    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }
}

impl Console for ScriptedConsole {
    async fn write_str(&mut self, s: &str) -> Result<(), ConsoleError> {
        self.output.push_str(s);
        Ok(())
    }

    async fn read_byte(&mut self) -> Result<u8, ConsoleError> {
        self.input.pop_front().ok_or(self.exhausted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RigEvent {
    Pulse(PwmChannel, u16),
    Direction(Direction),
    StepInterval(u16),
    StepperMode,
    Motor(bool),
    Stepping(bool),
    StatusRead,
    StatusCleared,
}

/// Rig that records every call and models the driver STATUS register.
pub struct MockRig {
    pub events: Vec<RigEvent>,
    pub pulses: [u16; 2],
    pub direction: Direction,
    pub step_interval_us: u16,
    pub motor_enabled: bool,
    pub stepping: bool,
    pub status: u16,
    pub driver_fails: bool,
}

impl MockRig {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            pulses: [0; 2],
            direction: Direction::Clockwise,
            step_interval_us: 0,
            motor_enabled: false,
            stepping: false,
            status: 0,
            driver_fails: false,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn failing(mut self) -> Self {
        self.driver_fails = true;
        self
    }

    pub fn pulse(&self, channel: PwmChannel) -> u16 {
        match channel {
            PwmChannel::Pwm3 => self.pulses[0],
            PwmChannel::Pwm4 => self.pulses[1],
        }
    }

    fn driver(&self) -> Result<(), DriverError> {
        if self.driver_fails {
            Err(DriverError::Spi)
        } else {
            Ok(())
        }
    }
}

impl RigHardware for MockRig {
    fn set_pulse_time(&mut self, channel: PwmChannel, pulse_us: u16) {
        match channel {
            PwmChannel::Pwm3 => self.pulses[0] = pulse_us,
            PwmChannel::Pwm4 => self.pulses[1] = pulse_us,
        }
        self.events.push(RigEvent::Pulse(channel, pulse_us));
    }

    fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
        self.events.push(RigEvent::Direction(direction));
    }

    fn set_step_interval(&mut self, interval_us: u16) {
        self.step_interval_us = interval_us;
        self.events.push(RigEvent::StepInterval(interval_us));
    }

    fn set_stepper_mode(&mut self) -> Result<(), DriverError> {
        self.driver()?;
        self.events.push(RigEvent::StepperMode);
        Ok(())
    }

    fn set_motor_enabled(&mut self, enabled: bool) -> Result<(), DriverError> {
        self.driver()?;
        self.motor_enabled = enabled;
        self.events.push(RigEvent::Motor(enabled));
        Ok(())
    }

    fn set_stepping(&mut self, stepping: bool) {
        self.stepping = stepping;
        self.events.push(RigEvent::Stepping(stepping));
    }

    fn read_driver_status(&mut self) -> Result<u16, DriverError> {
        self.driver()?;
        self.events.push(RigEvent::StatusRead);
        Ok(self.status)
    }

    fn clear_driver_status(&mut self) -> Result<(), DriverError> {
        self.driver()?;
        self.status = 0;
        self.events.push(RigEvent::StatusCleared);
        Ok(())
    }
}
