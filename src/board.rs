//! nRF52840 board support for the lift test rig.
//!
//! # Pin Mapping
//!
//! - **Console UART** (UARTE1, 115200 8N1): RX P1.14, TX P1.15
//! - **Activity LEDs** (active low): LED1 P0.13 (RX), LED2 P0.14 (TX)
//! - **PWM 3 / PWM 4** (PWM0, 1 us tick, 20 ms frame): P1.01 / P1.02
//! - **DRV8711 SPI** (SPIM3, 1 MHz, mode 0): SCK P1.10, MOSI P1.11, MISO P1.12, SCS P1.13
//! - **DRV8711 STEP / DIR**: P1.03 / P1.04
//!
//! UART bytes are pumped into [`RX_CHANNEL`] by [`rx_task`], which re-arms the receiver
//! straight away and leaves the LED1 flash to [`rx_led_task`]. Step pulses come from
//! [`step_task`] while [`STEPPING`] is set.

use crate::console::{Console, ConsoleError};
use crate::drivers::drv8711::{DriveMode, Drv8711};
use crate::drivers::DriverError;
use crate::rig::{Direction, PwmChannel, RigHardware};
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use embassy_nrf::gpio::Output;
use embassy_nrf::peripherals::{PWM0, SPI3, UARTE1};
use embassy_nrf::pwm::{Prescaler, SimplePwm};
use embassy_nrf::spim::Spim;
use embassy_nrf::uarte::{UarteRx, UarteTx};
use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, ThreadModeRawMutex};
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use embassy_time::{with_timeout, Duration, Timer};

/// PWM frame length in 1 us ticks (50 Hz servo frame).
pub const PWM_FRAME_TICKS: u16 = 20_000;

const TX_CHUNK: usize = 32;

pub static RX_CHANNEL: Channel<ThreadModeRawMutex, u8, 32> = Channel::new();
pub static STEPPING: AtomicBool = AtomicBool::new(false);
pub static STEP_INTERVAL_US: AtomicU32 = AtomicU32::new(1000);
static STEP_WAKE: Signal<CriticalSectionRawMutex, ()> = Signal::new();
static RX_ACTIVITY: Signal<CriticalSectionRawMutex, ()> = Signal::new();

#[embassy_executor::task]
pub async fn rx_task(mut rx: UarteRx<'static, UARTE1>) {
    info!("Starting UART receive task");
    loop {
        let mut single_byte = [0u8; 1];
        match rx.read(&mut single_byte).await {
            Ok(()) => {
                RX_ACTIVITY.signal(());
                RX_CHANNEL.send(single_byte[0]).await;
            }
            Err(e) => {
                warn!("UART: receive error {}", e);
            }
        }
    }
}

/// Flash LED1 on UART RX activity.
#[embassy_executor::task]
pub async fn rx_led_task(mut rx_led: Output<'static>) {
    loop {
        RX_ACTIVITY.wait().await;
        rx_led.set_low();
        Timer::after(Duration::from_millis(10)).await;
        rx_led.set_high();
    }
}

#[embassy_executor::task]
pub async fn step_task(mut step: Output<'static>) {
    info!("Starting step generator task");
    loop {
        if !STEPPING.load(Ordering::Relaxed) {
            step.set_low();
            STEP_WAKE.wait().await;
            continue;
        }

        let interval = u64::from(STEP_INTERVAL_US.load(Ordering::Relaxed).max(2));
        step.set_high();
        Timer::after_micros(interval / 2).await;
        step.set_low();
        Timer::after_micros(interval - interval / 2).await;
    }
}

/// Console on UARTE1. Receive side is fed by [`rx_task`].
pub struct UartConsole<'d> {
    tx: UarteTx<'d, UARTE1>,
    tx_led: Option<Output<'d>>,
    rx_timeout_ms: Option<u64>,
}

impl<'d> UartConsole<'d> {
    pub fn new(tx: UarteTx<'d, UARTE1>) -> Self {
        Self {
            tx,
            tx_led: None,
            rx_timeout_ms: None,
        }
    }

    pub fn with_tx_led(mut self, tx_led: Output<'d>) -> Self {
        self.tx_led = Some(tx_led);
        self
    }

    pub fn with_rx_timeout(mut self, rx_timeout_ms: Option<u64>) -> Self {
        self.rx_timeout_ms = rx_timeout_ms;
        self
    }
}

impl Console for UartConsole<'_> {
    async fn write_str(&mut self, s: &str) -> Result<(), ConsoleError> {
        if let Some(ref mut led) = self.tx_led {
            led.set_low(); // Turn on LED (active low)
        }

        // EasyDMA only reads from RAM, so text in flash goes through a stack buffer
        let mut buf = [0u8; TX_CHUNK];
        let mut result = Ok(());
        for chunk in s.as_bytes().chunks(TX_CHUNK) {
            buf[..chunk.len()].copy_from_slice(chunk);
            if self.tx.write(&buf[..chunk.len()]).await.is_err() {
                result = Err(ConsoleError::Uart);
                break;
            }
        }

        if let Some(ref mut led) = self.tx_led {
            led.set_high(); // Turn off LED (active low)
        }
        result
    }

    async fn read_byte(&mut self) -> Result<u8, ConsoleError> {
        match self.rx_timeout_ms {
            Some(ms) => with_timeout(Duration::from_millis(ms), RX_CHANNEL.receive())
                .await
                .map_err(|_| ConsoleError::Timeout),
            None => Ok(RX_CHANNEL.receive().await),
        }
    }
}

/// PWM outputs, DIR pin and the DRV8711 of the rig.
pub struct NrfRig<'d> {
    pwm: SimplePwm<'d, PWM0>,
    driver: Drv8711<Spim<'d, SPI3>, Output<'d>>,
    dir: Output<'d>,
}

impl<'d> NrfRig<'d> {
    pub fn new(
        pwm: SimplePwm<'d, PWM0>,
        driver: Drv8711<Spim<'d, SPI3>, Output<'d>>,
        dir: Output<'d>,
    ) -> Self {
        // 16 MHz / 16 gives a 1 us tick, so duty values are pulse widths in us
        pwm.set_prescaler(Prescaler::Div16);
        pwm.set_max_duty(PWM_FRAME_TICKS);

        Self { pwm, driver, dir }
    }
}

impl RigHardware for NrfRig<'_> {
    fn set_pulse_time(&mut self, channel: PwmChannel, pulse_us: u16) {
        let index = match channel {
            PwmChannel::Pwm3 => 0,
            PwmChannel::Pwm4 => 1,
        };
        self.pwm.set_duty(index, pulse_us.min(PWM_FRAME_TICKS));
    }

    fn set_direction(&mut self, direction: Direction) {
        match direction {
            Direction::Clockwise => self.dir.set_low(),
            Direction::AntiClockwise => self.dir.set_high(),
        }
    }

    fn set_step_interval(&mut self, interval_us: u16) {
        STEP_INTERVAL_US.store(u32::from(interval_us), Ordering::Relaxed);
    }

    fn set_stepper_mode(&mut self) -> Result<(), DriverError> {
        self.driver.set_mode(DriveMode::Stepper)
    }

    fn set_motor_enabled(&mut self, enabled: bool) -> Result<(), DriverError> {
        info!("DRV8711: outputs {}", if enabled { "on" } else { "off" });
        self.driver.set_enabled(enabled)
    }

    fn set_stepping(&mut self, stepping: bool) {
        STEPPING.store(stepping, Ordering::Relaxed);
        STEP_WAKE.signal(());
    }

    fn read_driver_status(&mut self) -> Result<u16, DriverError> {
        self.driver.status().map(|status| status.raw())
    }

    fn clear_driver_status(&mut self) -> Result<(), DriverError> {
        self.driver.clear_status()
    }
}
