//! Fixed operator text, sent line by line.

pub const CRLF: &str = "\r\n";
pub const SELECT_PROMPT: &str = "\r\nEnter option number: ";
pub const INVALID_NUMBER: &str = "\r\n Value out of range";
pub const DRIVER_FAULT: &str = "\r\n Driver not responding";

pub const BANNER: &[&str] = &[
    "\r\n\r\n",
    "Lift Test Rig\r\n",
    "nRF52840 + DRV8711\r\n",
];

pub const MAIN_MENU: &[&str] = &[
    "\r\n\r\n **** ELEVATOR CONTROL ****\r\n",
    " 1: Run elevator\r\n",
    " 2: Elevator calibration\r\n",
    " 3: Test PWM 3\r\n",
    " 4: Test PWM 4\r\n",
    " 5: Test stepper motor\r\n",
    " 6: Read driver status\r\n",
    " 7: Clear driver status\r\n",
];

pub const ELEVATOR_MENU: &[&str] = &[
    "\r\n\r\n **** RUN ELEVATOR ****\r\n",
    " 1: Ground floor\r\n",
    " 2: Floor 1\r\n",
    " 3: Floor 2\r\n",
    " 4: Return to main menu\r\n",
];

pub const CALIBRATION_MENU: &[&str] = &[
    "\r\n\r\n **** ELEVATOR CALIBRATION ****\r\n",
    " 1: Set steps per floor\r\n",
    " 2: Set current position as ground floor\r\n",
    " 3: Show calibration\r\n",
    " 4: Return to main menu\r\n",
];

pub const STEPPER_MENU: &[&str] = &[
    "\r\n\r\n **** STEPPER MOTOR TEST OPTION LIST ****\r\n",
    " 1: Toggle direction\r\n",
    " 2: Set the motor step interval\r\n",
    " 3: Start motor\r\n",
    " 4: Return to main menu\r\n",
];

pub const STEPPER_STATUS_HEADER: &str = "\r\n\r\n*** STEPPER MOTOR DRIVE STATUS ***\r\n";
pub const STEPPER_DIRECTION: &str = "\r\n      Direction: ";
pub const STEPPER_INTERVAL: &str = "\r\n  Step interval: ";
pub const MOTOR_RUNNING: &str = "\r\n Motor running. Enter any character to stop: ";
pub const MOTOR_STOPPED: &str = "\r\n Motor stopped";

pub const ELEVATOR_STATUS_HEADER: &str = "\r\n\r\n*** ELEVATOR STATUS ***\r\n";
pub const ELEVATOR_FLOOR: &str = "\r\n  Current floor: ";
pub const ELEVATOR_STEPS: &str = "\r\n Steps per floor: ";
pub const GROUND_FLOOR_SET: &str = "\r\n Current position set as ground floor";

pub const DRIVER_STATUS: &str = "\r\n DRV8711 STATUS: ";
pub const DRIVER_STATUS_CLEARED: &str = "\r\n DRV8711 status cleared";
