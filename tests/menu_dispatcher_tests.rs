//! Menu dispatcher tests

mod common;

use common::{MockRig, RigEvent, ScriptedConsole};
use embassy_futures::block_on;
use lift_test_rig::{ConsoleError, Direction, Dispatcher, MenuContext, PwmChannel, RigConfig};

type TestDispatcher = Dispatcher<ScriptedConsole, MockRig>;

fn dispatcher(script: &str) -> TestDispatcher {
    Dispatcher::new(ScriptedConsole::new(script), MockRig::new(), RigConfig::default())
}

/// Run one menu step per scripted line.
fn steps(d: &mut TestDispatcher, count: usize) {
    for _ in 0..count {
        block_on(d.step()).unwrap();
    }
}

#[test]
fn test_starts_in_main_menu_with_defaults() {
    let d = dispatcher("");

    assert_eq!(d.context(), MenuContext::Main);
    assert_eq!(d.settings().pwm3_pulse_us, 1500);
    assert_eq!(d.settings().pwm4_pulse_us, 1500);
    assert_eq!(d.settings().direction, Direction::Clockwise);
    assert_eq!(d.hardware().pulse(PwmChannel::Pwm3), 1500);
    assert_eq!(d.hardware().step_interval_us, 1000);
}

#[test]
fn test_main_menu_lists_options() {
    let mut d = dispatcher("99\r");
    steps(&mut d, 1);

    let output = &d.console().output;
    assert!(output.contains("ELEVATOR CONTROL"));
    assert!(output.contains(" 5: Test stepper motor"));
    assert!(output.contains("Enter option number: "));
}

#[test]
fn test_unrecognized_main_value_is_invalid_number() {
    let mut d = dispatcher("99\r");
    steps(&mut d, 1);

    assert!(d.console().output.ends_with("\r\n Value out of range"));
    assert_eq!(d.context(), MenuContext::Main);
}

#[test]
fn test_input_errors_keep_context() {
    let mut d = dispatcher("\r123\r1..\r");

    steps(&mut d, 1);
    assert!(d.console_mut().take_output().ends_with(" No Value Entered"));
    steps(&mut d, 1);
    assert!(d.console_mut().take_output().ends_with(" String entered is too long"));
    // "1..\r" is too long for the main menu before the parser ever sees it
    steps(&mut d, 1);
    assert!(d.console_mut().take_output().ends_with(" String entered is too long"));
    assert_eq!(d.context(), MenuContext::Main);
}

#[test]
fn test_pwm_test_sets_pulse_time() {
    let mut d = dispatcher("3\r1200\r");
    steps(&mut d, 2);

    assert_eq!(d.context(), MenuContext::PwmTest(PwmChannel::Pwm3));
    assert_eq!(d.settings().pwm3_pulse_us, 1200);
    assert_eq!(d.hardware().pulse(PwmChannel::Pwm3), 1200);
    assert_eq!(d.hardware().pulse(PwmChannel::Pwm4), 1500);
    assert!(d.console().output.contains("enter a value between 1000 and 2000"));
}

#[test]
fn test_pwm_zero_exits_and_resets_pulse_time() {
    let mut d = dispatcher("4\r1800\r0\r");
    steps(&mut d, 3);

    assert_eq!(d.context(), MenuContext::Main);
    assert_eq!(d.settings().pwm4_pulse_us, 1500);
    assert_eq!(d.hardware().pulse(PwmChannel::Pwm4), 1500);
    assert_eq!(
        d.hardware().events.last(),
        Some(&RigEvent::Pulse(PwmChannel::Pwm4, 1500))
    );
}

#[test]
fn test_pwm_value_below_range_is_too_small() {
    let mut d = dispatcher("3\r999\r");
    steps(&mut d, 2);

    assert!(d.console().output.ends_with("\r\n Value too small"));
    assert_eq!(d.context(), MenuContext::PwmTest(PwmChannel::Pwm3));
    assert_eq!(d.settings().pwm3_pulse_us, 1500);
}

#[test]
fn test_pwm_value_above_range_is_too_large() {
    let mut d = dispatcher("3\r2001\r");
    steps(&mut d, 2);

    assert!(d.console().output.ends_with("\r\n Value too large"));
    assert_eq!(d.context(), MenuContext::PwmTest(PwmChannel::Pwm3));
    assert_eq!(d.hardware().pulse(PwmChannel::Pwm3), 1500);
}

#[test]
fn test_pwm_range_ends_are_accepted() {
    let mut d = dispatcher("3\r1000\r2000\r");

    steps(&mut d, 2);
    assert_eq!(d.settings().pwm3_pulse_us, 1000);
    steps(&mut d, 1);
    assert_eq!(d.settings().pwm3_pulse_us, 2000);
}

#[test]
fn test_pwm_fraction_is_truncated() {
    let mut d = dispatcher("3\r12.5\r");
    steps(&mut d, 2);

    // 12 is below the pulse range
    assert!(d.console().output.ends_with(" Value too small"));
}

#[test]
fn test_entering_stepper_test_selects_stepper_mode() {
    let mut d = dispatcher("5\r");
    steps(&mut d, 1);

    assert_eq!(d.context(), MenuContext::StepperTest);
    assert!(d.hardware().events.contains(&RigEvent::StepperMode));
    assert_eq!(d.hardware().direction, Direction::Clockwise);
}

#[test]
fn test_stepper_menu_shows_status() {
    let mut d = dispatcher("5\r9\r");
    steps(&mut d, 2);

    let output = &d.console().output;
    assert!(output.contains("STEPPER MOTOR DRIVE STATUS"));
    assert!(output.contains("      Direction: CLOCKWISE"));
    assert!(output.contains("  Step interval: 1000"));
    assert!(output.ends_with("\r\n Value out of range"));
}

#[test]
fn test_toggle_direction() {
    let mut d = dispatcher("5\r1\r1\r");

    steps(&mut d, 2);
    assert_eq!(d.settings().direction, Direction::AntiClockwise);
    assert_eq!(d.hardware().direction, Direction::AntiClockwise);

    steps(&mut d, 1);
    assert_eq!(d.settings().direction, Direction::Clockwise);
}

#[test]
fn test_step_interval_below_minimum_is_rejected() {
    let mut d = dispatcher("5\r2\r400\r");
    steps(&mut d, 3);

    assert!(d.console().output.ends_with(" Value too small"));
    assert_eq!(d.context(), MenuContext::StepperTest);
    assert_eq!(d.settings().step_interval_us, 1000);
    assert_eq!(d.hardware().step_interval_us, 1000);
}

#[test]
fn test_step_interval_is_applied() {
    let mut d = dispatcher("5\r2\r750\r");
    steps(&mut d, 3);

    assert_eq!(d.context(), MenuContext::StepperTest);
    assert_eq!(d.settings().step_interval_us, 750);
    assert_eq!(d.hardware().step_interval_us, 750);
}

#[test]
fn test_step_interval_zero_is_too_small() {
    let mut d = dispatcher("5\r2\r0\r");
    steps(&mut d, 3);

    assert!(d.console().output.ends_with(" Value too small"));
    assert_eq!(d.context(), MenuContext::StepperTest);
    assert_eq!(d.settings().step_interval_us, 1000);
}

#[test]
fn test_step_interval_entry_is_single_shot() {
    let mut d = dispatcher("5\r2\r\r");
    steps(&mut d, 3);

    assert!(d.console().output.ends_with(" No Value Entered"));
    assert_eq!(d.context(), MenuContext::StepperTest);
}

#[test]
fn test_run_motor_until_keypress() {
    let mut d = dispatcher("5\r3\rx");
    steps(&mut d, 2);

    let events = &d.hardware().events;
    let start = events.iter().position(|e| *e == RigEvent::Motor(true)).unwrap();
    assert_eq!(
        &events[start..],
        &[
            RigEvent::Motor(true),
            RigEvent::Stepping(true),
            RigEvent::Stepping(false),
            RigEvent::Motor(false),
        ]
    );
    assert!(d.console().output.contains("Motor running. Enter any character to stop: "));
    assert!(d.console().output.ends_with(" Motor stopped"));
    assert_eq!(d.context(), MenuContext::StepperTest);
}

#[test]
fn test_run_motor_with_crlf_terminal_waits_for_real_key() {
    let mut d = dispatcher("5\r\n3\r\nx4\r\n");
    steps(&mut d, 2);

    // The LF of "3\r\n" must not stop the motor; "x" does
    assert_eq!(d.console().pending(), 3);
    let events = &d.hardware().events;
    let start = events.iter().position(|e| *e == RigEvent::Motor(true)).unwrap();
    assert_eq!(
        &events[start..],
        &[
            RigEvent::Motor(true),
            RigEvent::Stepping(true),
            RigEvent::Stepping(false),
            RigEvent::Motor(false),
        ]
    );

    steps(&mut d, 1);
    assert_eq!(d.context(), MenuContext::Main);
    assert!(!d.console().output.contains("Invalid character"));
}

#[test]
fn test_run_motor_announces_before_starting() {
    let mut d = Dispatcher::new(
        ScriptedConsole::new("5\r3\r"),
        MockRig::new().failing(),
        RigConfig::default(),
    );
    steps(&mut d, 1);
    d.console_mut().take_output();
    steps(&mut d, 1);

    assert!(d
        .console()
        .output
        .ends_with("Motor running. Enter any character to stop: \r\n Driver not responding"));
    assert!(!d.hardware().events.contains(&RigEvent::Stepping(true)));
}

#[test]
fn test_run_motor_stops_on_console_failure() {
    let mut d = dispatcher("5\r3\r");
    steps(&mut d, 1);

    assert_eq!(block_on(d.step()), Err(ConsoleError::Uart));
    assert!(!d.hardware().stepping);
    assert!(!d.hardware().motor_enabled);
}

#[test]
fn test_leaving_stepper_test_resets_outputs() {
    let mut d = dispatcher("5\r1\r4\r");
    steps(&mut d, 3);

    assert_eq!(d.context(), MenuContext::Main);
    assert_eq!(d.settings().direction, Direction::Clockwise);

    let rig = d.hardware();
    assert_eq!(rig.direction, Direction::Clockwise);
    assert!(!rig.stepping);
    assert!(!rig.motor_enabled);
    assert!(rig.events.ends_with(&[
        RigEvent::Stepping(false),
        RigEvent::Motor(false),
        RigEvent::Direction(Direction::Clockwise),
    ]));
}

#[test]
fn test_elevator_moves_between_floors() {
    let mut d = dispatcher("1\r3\r2\r2\r4\r");

    steps(&mut d, 2);
    assert!(d.console_mut().take_output().ends_with(" Moving up to floor 2: 400 steps"));
    assert_eq!(d.settings().current_floor, 2);

    steps(&mut d, 1);
    assert!(d.console_mut().take_output().ends_with(" Moving down to floor 1: 200 steps"));
    assert_eq!(d.settings().current_floor, 1);

    steps(&mut d, 1);
    assert!(d.console_mut().take_output().ends_with(" Already at floor 1"));

    steps(&mut d, 1);
    assert_eq!(d.context(), MenuContext::Main);
}

#[test]
fn test_elevator_rejects_floor_past_the_top() {
    let mut d = dispatcher("1\r5\r");
    steps(&mut d, 2);

    assert!(d.console().output.ends_with(" Value out of range"));
    assert_eq!(d.context(), MenuContext::ElevatorRun);
    assert_eq!(d.settings().current_floor, 0);
}

#[test]
fn test_elevator_menu_shows_current_floor() {
    let mut d = dispatcher("1\r7\r");
    steps(&mut d, 2);

    let output = &d.console().output;
    assert!(output.contains("ELEVATOR STATUS"));
    assert!(output.contains("  Current floor: 0"));
    assert!(output.contains("RUN ELEVATOR"));
    assert!(output.ends_with(" Value out of range"));
}

#[test]
fn test_calibration_sets_steps_per_floor() {
    let mut d = dispatcher("2\r1\r150\r3\r");
    steps(&mut d, 3);

    assert_eq!(d.context(), MenuContext::Calibration);
    assert_eq!(d.settings().steps_per_floor, 150);

    steps(&mut d, 1);
    assert!(d.console().output.ends_with(" Steps per floor: 150"));
}

#[test]
fn test_calibration_zeroes_floor() {
    let mut d = dispatcher("1\r3\r4\r2\r2\r4\r");
    steps(&mut d, 5);

    assert_eq!(d.settings().current_floor, 0);
    assert!(d.console().output.ends_with(" Current position set as ground floor"));

    steps(&mut d, 1);
    assert_eq!(d.context(), MenuContext::Main);
}

#[test]
fn test_driver_status_displayed_in_binary() {
    let mut d = Dispatcher::new(
        ScriptedConsole::new("6\r"),
        MockRig::new().with_status(0x0A5),
        RigConfig::default(),
    );
    steps(&mut d, 1);

    assert!(d.console().output.ends_with(" DRV8711 STATUS: 000010100101"));
}

#[test]
fn test_driver_status_cleared() {
    let mut d = Dispatcher::new(
        ScriptedConsole::new("7\r"),
        MockRig::new().with_status(0x080),
        RigConfig::default(),
    );
    steps(&mut d, 1);

    assert_eq!(d.hardware().status, 0);
    assert!(d.console().output.ends_with(" DRV8711 status cleared"));
}

#[test]
fn test_driver_failure_is_reported() {
    let mut d = Dispatcher::new(
        ScriptedConsole::new("6\r5\r3\r"),
        MockRig::new().failing(),
        RigConfig::default(),
    );

    steps(&mut d, 1);
    assert!(d.console_mut().take_output().ends_with(" Driver not responding"));

    // Stepper test is still entered; starting the motor is refused
    steps(&mut d, 1);
    assert_eq!(d.context(), MenuContext::StepperTest);
    steps(&mut d, 1);
    assert!(d.console().output.ends_with(" Driver not responding"));
    assert!(!d.hardware().stepping);
}

#[test]
fn test_console_failure_surfaces_from_step() {
    let mut d = dispatcher("");

    assert_eq!(block_on(d.step()), Err(ConsoleError::Uart));
    assert_eq!(d.context(), MenuContext::Main);
}

#[test]
fn test_custom_pulse_limits() {
    let config = RigConfig {
        pulse_min_us: 500,
        pulse_max_us: 2500,
        ..RigConfig::default()
    };
    let mut d = Dispatcher::new(ScriptedConsole::new("3\r600\r"), MockRig::new(), config);
    steps(&mut d, 2);

    assert_eq!(d.settings().pwm3_pulse_us, 600);
    assert!(d.console().output.contains("between 500 and 2500"));
}
