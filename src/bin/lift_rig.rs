#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_nrf::{
    bind_interrupts,
    gpio::{Level, Output, OutputDrive},
    peripherals,
    pwm::SimplePwm,
    spim::{self, Spim},
    uarte::{self, Uarte},
};
use {defmt_rtt as _, panic_halt as _};

use lift_test_rig::board::{rx_led_task, rx_task, step_task, NrfRig, UartConsole};
use lift_test_rig::drivers::Drv8711;
use lift_test_rig::{Dispatcher, RigConfig};

bind_interrupts!(struct Irqs {
    UARTE1 => uarte::InterruptHandler<peripherals::UARTE1>;
    SPIM3 => spim::InterruptHandler<peripherals::SPI3>;
});

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Lift test rig starting");
    let p = embassy_nrf::init(Default::default());
    let config = RigConfig::default();

    // Activity LEDs: P0.13 (RX), P0.14 (TX), active low
    let rx_led = Output::new(p.P0_13, Level::High, OutputDrive::Standard);
    let tx_led = Output::new(p.P0_14, Level::High, OutputDrive::Standard);

    // Configure UART for the operator console
    let mut uart_config = uarte::Config::default();
    uart_config.parity = uarte::Parity::EXCLUDED;
    uart_config.baudrate = uarte::Baudrate::BAUD115200;
    let uarte = Uarte::new(p.UARTE1, Irqs, p.P1_14, p.P1_15, uart_config);
    let (tx, rx) = uarte.split();

    // DRV8711 on SPIM3, chip select is active high
    let mut spi_config = spim::Config::default();
    spi_config.frequency = spim::Frequency::M1;
    spi_config.mode = spim::MODE_0;
    let spi = Spim::new(p.SPI3, Irqs, p.P1_10, p.P1_12, p.P1_11, spi_config);
    let scs = Output::new(p.P1_13, Level::Low, OutputDrive::Standard);
    let mut driver = Drv8711::new(spi, scs);
    if let Err(e) = driver.init() {
        warn!("DRV8711 not configured: {}", e);
    }

    let pwm = SimplePwm::new_2ch(p.PWM0, p.P1_01, p.P1_02);
    let step = Output::new(p.P1_03, Level::Low, OutputDrive::Standard);
    let dir = Output::new(p.P1_04, Level::Low, OutputDrive::Standard);
    info!("Peripherals configured");

    unwrap!(spawner.spawn(rx_task(rx)));
    unwrap!(spawner.spawn(rx_led_task(rx_led)));
    unwrap!(spawner.spawn(step_task(step)));

    let console = UartConsole::new(tx)
        .with_tx_led(tx_led)
        .with_rx_timeout(config.rx_timeout_ms);
    let rig = NrfRig::new(pwm, driver, dir);

    let mut dispatcher = Dispatcher::new(console, rig, config);
    dispatcher.run().await
}
