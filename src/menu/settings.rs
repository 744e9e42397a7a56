use crate::config::RigConfig;
use crate::rig::{Direction, PwmChannel};

/// Operator-controlled rig state. Only the dispatcher writes it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceSettings {
    pub pwm3_pulse_us: u16,
    pub pwm4_pulse_us: u16,
    pub direction: Direction,
    pub step_interval_us: u16,
    pub current_floor: u8,
    pub steps_per_floor: u16,
}

impl DeviceSettings {
    pub fn from_config(config: &RigConfig) -> Self {
        Self {
            pwm3_pulse_us: config.pulse_default_us,
            pwm4_pulse_us: config.pulse_default_us,
            direction: Direction::Clockwise,
            step_interval_us: config.step_interval_default_us,
            current_floor: 0,
            steps_per_floor: config.steps_per_floor_default,
        }
    }

    pub fn pulse_time(&self, channel: PwmChannel) -> u16 {
        match channel {
            PwmChannel::Pwm3 => self.pwm3_pulse_us,
            PwmChannel::Pwm4 => self.pwm4_pulse_us,
        }
    }

    pub fn set_pulse_time(&mut self, channel: PwmChannel, pulse_us: u16) {
        match channel {
            PwmChannel::Pwm3 => self.pwm3_pulse_us = pulse_us,
            PwmChannel::Pwm4 => self.pwm4_pulse_us = pulse_us,
        }
    }
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self::from_config(&RigConfig::DEFAULT)
    }
}
