/// Operator-facing limits and defaults for the rig.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RigConfig {
    /// Receive timeout for a console read (ms). `None` waits forever.
    pub rx_timeout_ms: Option<u64>,

    /// Echo accepted characters back to the terminal
    pub echo: bool,

    /// Shortest accepted servo pulse (us)
    pub pulse_min_us: u16,

    /// Longest accepted servo pulse (us)
    pub pulse_max_us: u16,

    /// Pulse restored when a PWM test ends (us)
    pub pulse_default_us: u16,

    /// Shortest accepted stepper step interval (us)
    pub step_interval_min_us: u16,

    /// Step interval used until the operator sets one (us)
    pub step_interval_default_us: u16,

    /// Steps the lift carriage needs to travel one floor
    pub steps_per_floor_default: u16,
}

impl RigConfig {
    pub const DEFAULT: Self = Self {
        rx_timeout_ms: None,
        echo: false,
        pulse_min_us: 1000,
        pulse_max_us: 2000,
        pulse_default_us: 1500,
        step_interval_min_us: 500,
        step_interval_default_us: 1000,
        steps_per_floor_default: 200,
    };
}

impl Default for RigConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
