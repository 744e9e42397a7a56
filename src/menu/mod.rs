pub mod dispatcher;
pub mod settings;
pub mod text;

pub use dispatcher::Dispatcher;
pub use settings::DeviceSettings;

use crate::rig::PwmChannel;

/// Deepest nesting: main -> stepper test -> step interval entry.
pub const MENU_DEPTH: usize = 4;

/// Number of floors served by the lift, ground floor included.
pub const FLOOR_COUNT: u8 = 3;

/// The option set currently accepting operator input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuContext {
    Main,
    ElevatorRun,
    Calibration,
    PwmTest(PwmChannel),
    StepperTest,
    /// Single entry of a new stepper step interval
    StepInterval,
    /// Single entry of the steps needed per floor
    FloorSteps,
}

impl MenuContext {
    /// Longest entry the context accepts, in characters.
    pub fn max_len(self) -> usize {
        match self {
            MenuContext::Main => 2,
            MenuContext::ElevatorRun | MenuContext::Calibration | MenuContext::StepperTest => 1,
            MenuContext::PwmTest(_) | MenuContext::StepInterval | MenuContext::FloorSteps => 4,
        }
    }
}
