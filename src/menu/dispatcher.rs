use super::settings::DeviceSettings;
use super::{text, MenuContext, FLOOR_COUNT, MENU_DEPTH};
use crate::config::RigConfig;
use crate::console::{Console, ConsoleError};
use crate::drivers::DriverError;
use crate::input::{check_range, parse_value, InputError, LineReader, ReadError};
use crate::rig::{Direction, PwmChannel, RigHardware};
use core::fmt::Write;
use heapless::{String, Vec};

/// Serial menu state machine.
///
/// Each [`step`](Self::step) shows the active menu, reads one entry and acts on it. Sub-menus
/// are pushed on a bounded stack; the main menu stays at the bottom for the life of the
/// firmware.
pub struct Dispatcher<C, H> {
    console: C,
    hardware: H,
    reader: LineReader,
    config: RigConfig,
    settings: DeviceSettings,
    stack: Vec<MenuContext, MENU_DEPTH>,
}

impl<C, H> Dispatcher<C, H>
where
    C: Console,
    H: RigHardware,
{
    pub fn new(console: C, mut hardware: H, config: RigConfig) -> Self {
        let settings = DeviceSettings::from_config(&config);

        hardware.set_pulse_time(PwmChannel::Pwm3, settings.pwm3_pulse_us);
        hardware.set_pulse_time(PwmChannel::Pwm4, settings.pwm4_pulse_us);
        hardware.set_direction(settings.direction);
        hardware.set_step_interval(settings.step_interval_us);

        let mut stack = Vec::new();
        let _ = stack.push(MenuContext::Main);

        Self {
            console,
            hardware,
            reader: LineReader::new().with_echo(config.echo),
            config,
            settings,
            stack,
        }
    }

    pub fn context(&self) -> MenuContext {
        self.stack.last().copied().unwrap_or(MenuContext::Main)
    }

    pub fn settings(&self) -> &DeviceSettings {
        &self.settings
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    pub fn hardware(&self) -> &H {
        &self.hardware
    }

    /// Serve the menus forever.
    pub async fn run(&mut self) -> ! {
        info!("Menu: starting");
        if let Err(e) = self.send_lines(text::BANNER).await {
            warn!("Menu: console error {}", e);
        }

        loop {
            if let Err(e) = self.step().await {
                warn!("Menu: console error {}", e);
            }
        }
    }

    /// Show the active menu, take one entry and act on it.
    pub async fn step(&mut self) -> Result<(), ConsoleError> {
        let context = self.context();
        self.show_menu(context).await?;

        let entry = match self
            .reader
            .read_line(&mut self.console, context.max_len())
            .await
        {
            Ok(line) => parse_value(line).map_err(ReadError::from),
            Err(e) => Err(e),
        };

        let result = match entry {
            Ok(value) => {
                debug!("Menu: {} <- {}", context, value);
                self.dispatch(context, value).await
            }
            Err(ReadError::Input(e)) => self.notify(e).await,
            Err(ReadError::Console(e)) => Err(e),
        };

        // The step interval gets one attempt, whatever the outcome
        if context == MenuContext::StepInterval && self.context() == context {
            self.leave();
        }
        result
    }

    async fn dispatch(&mut self, context: MenuContext, value: u32) -> Result<(), ConsoleError> {
        match context {
            MenuContext::Main => self.main_menu(value).await,
            MenuContext::ElevatorRun => self.elevator_menu(value).await,
            MenuContext::Calibration => self.calibration_menu(value).await,
            MenuContext::PwmTest(channel) => self.pwm_test(channel, value).await,
            MenuContext::StepperTest => self.stepper_menu(value).await,
            MenuContext::StepInterval => self.step_interval_entry(value).await,
            MenuContext::FloorSteps => self.floor_steps_entry(value).await,
        }
    }

    async fn main_menu(&mut self, value: u32) -> Result<(), ConsoleError> {
        match value {
            1 => self.enter(MenuContext::ElevatorRun).await,
            2 => self.enter(MenuContext::Calibration).await,
            3 => self.enter(MenuContext::PwmTest(PwmChannel::Pwm3)).await,
            4 => self.enter(MenuContext::PwmTest(PwmChannel::Pwm4)).await,
            5 => self.enter(MenuContext::StepperTest).await,
            6 => self.show_driver_status().await,
            7 => match self.hardware.clear_driver_status() {
                Ok(()) => self.console.write_str(text::DRIVER_STATUS_CLEARED).await,
                Err(e) => self.driver_fault(e).await,
            },
            _ => self.console.write_str(text::INVALID_NUMBER).await,
        }
    }

    async fn elevator_menu(&mut self, value: u32) -> Result<(), ConsoleError> {
        let floors = u32::from(FLOOR_COUNT);
        match value {
            // Bounded by FLOOR_COUNT
            v if (1..=floors).contains(&v) => self.move_to_floor((v - 1) as u8).await,
            v if v == floors + 1 => {
                self.leave();
                Ok(())
            }
            _ => self.console.write_str(text::INVALID_NUMBER).await,
        }
    }

    async fn calibration_menu(&mut self, value: u32) -> Result<(), ConsoleError> {
        match value {
            1 => self.enter(MenuContext::FloorSteps).await,
            2 => {
                self.settings.current_floor = 0;
                info!("Calibration: ground floor reset");
                self.console.write_str(text::GROUND_FLOOR_SET).await
            }
            3 => self.show_elevator_status().await,
            4 => {
                self.leave();
                Ok(())
            }
            _ => self.console.write_str(text::INVALID_NUMBER).await,
        }
    }

    async fn pwm_test(&mut self, channel: PwmChannel, value: u32) -> Result<(), ConsoleError> {
        if value == 0 {
            self.leave();
            return Ok(());
        }

        let checked = check_range(
            value,
            u32::from(self.config.pulse_min_us),
            u32::from(self.config.pulse_max_us),
        );
        match checked {
            Ok(pulse) => {
                // Bounded by pulse_max_us
                let pulse = pulse as u16;
                self.settings.set_pulse_time(channel, pulse);
                self.hardware.set_pulse_time(channel, pulse);
                info!("PWM: {} pulse {} us", channel, pulse);
                Ok(())
            }
            Err(e) => self.notify(e).await,
        }
    }

    async fn stepper_menu(&mut self, value: u32) -> Result<(), ConsoleError> {
        match value {
            1 => {
                let direction = self.settings.direction.toggled();
                self.settings.direction = direction;
                self.hardware.set_direction(direction);
                info!("Stepper: direction {}", direction);
                Ok(())
            }
            2 => self.enter(MenuContext::StepInterval).await,
            3 => self.run_motor().await,
            4 => {
                self.leave();
                Ok(())
            }
            _ => self.console.write_str(text::INVALID_NUMBER).await,
        }
    }

    async fn step_interval_entry(&mut self, value: u32) -> Result<(), ConsoleError> {
        let checked = check_range(
            value,
            u32::from(self.config.step_interval_min_us),
            u32::from(u16::MAX),
        );
        match checked {
            Ok(interval) => {
                let interval = interval as u16;
                self.settings.step_interval_us = interval;
                self.hardware.set_step_interval(interval);
                info!("Stepper: interval {} us", interval);
                Ok(())
            }
            Err(e) => self.notify(e).await,
        }
    }

    async fn floor_steps_entry(&mut self, value: u32) -> Result<(), ConsoleError> {
        if value == 0 {
            self.leave();
            return Ok(());
        }

        match u16::try_from(value) {
            Ok(steps) => {
                self.settings.steps_per_floor = steps;
                info!("Calibration: {} steps per floor", steps);
                self.leave();
                Ok(())
            }
            Err(_) => self.notify(InputError::ValueTooLarge).await,
        }
    }

    /// Run the stepper until the operator sends any character.
    async fn run_motor(&mut self) -> Result<(), ConsoleError> {
        self.console.write_str(text::MOTOR_RUNNING).await?;
        if let Err(e) = self.hardware.set_motor_enabled(true) {
            return self.driver_fault(e).await;
        }
        self.hardware.set_stepping(true);
        info!("Stepper: running");

        let result = self.wait_for_keypress().await;

        self.hardware.set_stepping(false);
        if let Err(e) = self.hardware.set_motor_enabled(false) {
            error!("Stepper: motor disable failed {}", e);
        }
        info!("Stepper: stopped");

        result?;
        self.console.write_str(text::MOTOR_STOPPED).await
    }

    async fn wait_for_keypress(&mut self) -> Result<(), ConsoleError> {
        loop {
            match self.reader.read_key(&mut self.console).await {
                Ok(key) => {
                    debug!("Stepper: stop key {=u8:#x}", key);
                    return Ok(());
                }
                Err(ConsoleError::Timeout) => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Simulated lift travel: report the step count and record the new floor.
    async fn move_to_floor(&mut self, target: u8) -> Result<(), ConsoleError> {
        let current = self.settings.current_floor;
        let mut line: String<64> = String::new();

        if target == current {
            let _ = write!(line, "\r\n Already at floor {}", target);
            return self.console.write_str(&line).await;
        }

        let floors = i32::from(target) - i32::from(current);
        let steps = floors * i32::from(self.settings.steps_per_floor);
        let heading = if floors > 0 { "up" } else { "down" };
        info!("Elevator: floor {} -> {} ({} steps)", current, target, steps);

        self.settings.current_floor = target;
        let _ = write!(
            line,
            "\r\n Moving {} to floor {}: {} steps",
            heading,
            target,
            steps.unsigned_abs()
        );
        self.console.write_str(&line).await
    }

    async fn enter(&mut self, context: MenuContext) -> Result<(), ConsoleError> {
        if self.stack.is_full() {
            warn!("Menu: stack full, {} not entered", context);
            return Ok(());
        }

        if context == MenuContext::StepperTest {
            self.settings.direction = Direction::Clockwise;
            self.hardware.set_direction(Direction::Clockwise);
            if let Err(e) = self.hardware.set_stepper_mode() {
                self.driver_fault(e).await?;
            }
        }

        debug!("Menu: enter {}", context);
        let _ = self.stack.push(context);
        Ok(())
    }

    /// Return to the parent menu, restoring whatever the child leaves behind.
    fn leave(&mut self) {
        if self.stack.len() <= 1 {
            return;
        }
        let Some(context) = self.stack.pop() else {
            return;
        };
        debug!("Menu: leave {}", context);

        match context {
            MenuContext::PwmTest(_) => {
                let pulse = self.config.pulse_default_us;
                for channel in [PwmChannel::Pwm3, PwmChannel::Pwm4] {
                    self.settings.set_pulse_time(channel, pulse);
                    self.hardware.set_pulse_time(channel, pulse);
                }
            }
            MenuContext::StepperTest => {
                self.hardware.set_stepping(false);
                if let Err(e) = self.hardware.set_motor_enabled(false) {
                    error!("Stepper: motor disable failed {}", e);
                }
                self.settings.direction = Direction::Clockwise;
                self.hardware.set_direction(Direction::Clockwise);
            }
            _ => {}
        }
    }

    async fn show_menu(&mut self, context: MenuContext) -> Result<(), ConsoleError> {
        match context {
            MenuContext::Main => self.send_lines(text::MAIN_MENU).await?,
            MenuContext::ElevatorRun => {
                self.show_elevator_status().await?;
                self.send_lines(text::ELEVATOR_MENU).await?;
            }
            MenuContext::Calibration => self.send_lines(text::CALIBRATION_MENU).await?,
            MenuContext::StepperTest => {
                self.show_stepper_status().await?;
                self.send_lines(text::STEPPER_MENU).await?;
            }
            MenuContext::PwmTest(channel) => {
                let mut line: String<96> = String::new();
                let _ = write!(
                    line,
                    "\r\n {}: enter a value between {} and {}. Enter 0 to exit: ",
                    channel.label(),
                    self.config.pulse_min_us,
                    self.config.pulse_max_us
                );
                return self.console.write_str(&line).await;
            }
            MenuContext::StepInterval => {
                let mut line: String<96> = String::new();
                let _ = write!(
                    line,
                    "\r\n Enter a step interval in microseconds. Value between {} and 9999: ",
                    self.config.step_interval_min_us
                );
                return self.console.write_str(&line).await;
            }
            MenuContext::FloorSteps => {
                return self
                    .console
                    .write_str("\r\n Enter steps per floor. Value between 1 and 9999. Enter 0 to cancel: ")
                    .await;
            }
        }
        self.console.write_str(text::SELECT_PROMPT).await
    }

    async fn show_stepper_status(&mut self) -> Result<(), ConsoleError> {
        self.console.write_str(text::STEPPER_STATUS_HEADER).await?;
        self.console.write_str(text::STEPPER_DIRECTION).await?;
        self.console
            .write_str(self.settings.direction.label())
            .await?;
        self.console.write_str(text::STEPPER_INTERVAL).await?;
        let mut value: String<8> = String::new();
        let _ = write!(value, "{}", self.settings.step_interval_us);
        self.console.write_str(&value).await
    }

    async fn show_elevator_status(&mut self) -> Result<(), ConsoleError> {
        let mut value: String<8> = String::new();
        self.console.write_str(text::ELEVATOR_STATUS_HEADER).await?;
        self.console.write_str(text::ELEVATOR_FLOOR).await?;
        let _ = write!(value, "{}", self.settings.current_floor);
        self.console.write_str(&value).await?;
        self.console.write_str(text::ELEVATOR_STEPS).await?;
        value.clear();
        let _ = write!(value, "{}", self.settings.steps_per_floor);
        self.console.write_str(&value).await
    }

    async fn show_driver_status(&mut self) -> Result<(), ConsoleError> {
        match self.hardware.read_driver_status() {
            Ok(raw) => {
                info!("DRV8711: status {=u16:#x}", raw);
                let mut bits: String<16> = String::new();
                let _ = write!(bits, "{:012b}", raw & 0x0FFF);
                self.console.write_str(text::DRIVER_STATUS).await?;
                self.console.write_str(&bits).await
            }
            Err(e) => self.driver_fault(e).await,
        }
    }

    async fn send_lines(&mut self, lines: &[&str]) -> Result<(), ConsoleError> {
        for line in lines {
            self.console.write_str(line).await?;
        }
        Ok(())
    }

    async fn notify(&mut self, error: InputError) -> Result<(), ConsoleError> {
        debug!("Menu: rejected entry {}", error);
        self.console.write_str(error.notice()).await
    }

    async fn driver_fault(&mut self, error: DriverError) -> Result<(), ConsoleError> {
        error!("DRV8711: {}", error);
        self.console.write_str(text::DRIVER_FAULT).await
    }
}
