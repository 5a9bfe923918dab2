//! rotary-hw-interface
//!
//! Rotary encoder firmware for the Raspberry Pi Pico 2 with the encoder
//! wired to an MCP23017 I/O expander:
//!
//! 1. The encoder is turned or its button pressed.
//! 2. The expander latches the change and pulls its INT output low.
//! 3. The encoder task reads INTF/INTCAP and feeds them to the decoder.
//! 4. On every accepted step or button report the change notifier signals
//!    the report task, which logs the new value.
//!
//! # Wiring
//!
//! | Signal      | Connection        | Notes                          |
//! |-------------|-------------------|--------------------------------|
//! | I2C0 SDA    | GP20              |                                |
//! | I2C0 SCL    | GP21              |                                |
//! | MCP INTA    | GP19              | Active-low, pull-up enabled    |
//! | Encoder CLK | GPA0              | Common pin to GND              |
//! | Encoder DT  | GPA1              |                                |
//! | Encoder SW  | GPA2              | Switch to GND                  |

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::block::ImageDef;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Timer};
use {defmt_rtt as _, panic_probe as _};

use mcp230xx::{IoConfig, Mcp230xx, DEFAULT_ADDRESS};
use rotary_encoder::{EncoderConfig, Event, OnChange, PinAssignment, RotaryEncoder, RotaryError};

// ---------------------------------------------------------------------------
// Boot block and interrupt binding
// ---------------------------------------------------------------------------

/// Tell the RP2350 Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = embassy_rp::block::ImageDef::secure_exe();

// Wire the I2C0 peripheral interrupt to Embassy's async handler.
bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Expander bits of the encoder lines.
const PINS: PinAssignment = PinAssignment::new(0, 1).with_switch(2);

/// Counter range and starting point.
const ENCODER_CONFIG: EncoderConfig = EncoderConfig::new(PINS)
    .with_range(0, 100)
    .with_initial_value(50);

// ---------------------------------------------------------------------------
// Static storage
// ---------------------------------------------------------------------------

/// Latest `(value, button)` published by the encoder, consumed by the
/// report task. Only the newest change is kept.
static CHANGES: Signal<CriticalSectionRawMutex, (i32, bool)> = Signal::new();

// ---------------------------------------------------------------------------
// Type aliases
// ---------------------------------------------------------------------------

type ExpanderI2c = I2c<'static, I2C0, i2c::Async>;

type Encoder = RotaryEncoder<Mcp230xx<ExpanderI2c>, Input<'static>, ChangeNotifier>;

// ---------------------------------------------------------------------------
// Change notification
// ---------------------------------------------------------------------------

/// Forwards encoder changes to the report task.
///
/// Runs in the encoder task's dispatch path, so it only signals.
struct ChangeNotifier;

impl OnChange for ChangeNotifier {
    fn on_change(&mut self, value: i32, button_state: bool) {
        CHANGES.signal((value, button_state));
    }
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Interrupt-driven encoder task.
///
/// Waits while INT is low, then lets the encoder read INTF and INTCAP and
/// dispatch them. Reading INTCAP drives INT back high.
#[embassy_executor::task]
async fn encoder_task(mut encoder: Encoder) {
    if let Err(_) = encoder.start().await {
        error!("Failed to start encoder");
        return;
    }

    info!("Encoder task started");

    loop {
        match encoder.next_event().await {
            Ok(Some(Event::Step(direction))) => debug!("Step: {}", direction),
            Ok(Some(Event::Button(level))) => debug!("Button: {}", level),
            Ok(None) => {}
            Err(RotaryError::NotStarted) => {
                error!("Encoder stopped unexpectedly");
                return;
            }
            Err(_) => {
                // A failed INTCAP read leaves INT low and the next call
                // retries at once; back off so a bus fault does not spin.
                warn!("Encoder interrupt read failed");
                Timer::after(Duration::from_millis(10)).await;
            }
        }
    }
}

/// Logs every change published by the encoder.
#[embassy_executor::task]
async fn report_task() {
    loop {
        let (value, pressed) = CHANGES.wait().await;
        info!("value={} pressed={}", value, pressed);
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("rotary-hw-interface starting");

    let i2c = I2c::new_async(
        p.I2C0,
        p.PIN_21, // SCL
        p.PIN_20, // SDA
        Irqs,
        i2c::Config::default(),
    );

    // Expander INTA: active-low, pull-up enabled.
    let int_pin = Input::new(p.PIN_19, Pull::Up);

    // Give the expander time to come out of power-on reset.
    Timer::after(Duration::from_millis(10)).await;

    // —— Expander initialisation ————————————————————————————————————————————

    let mut expander = Mcp230xx::new(i2c, DEFAULT_ADDRESS);

    if let Err(_) = expander.init().await {
        error!("MCP23017 not responding at {=u8:#x}", DEFAULT_ADDRESS);
        return;
    }

    // Mirror INTA/INTB so encoder pins on either port reach GP19.
    let io_config = IoConfig {
        interrupt_mirror: Some(true),
        ..IoConfig::default()
    };
    if let Err(_) = expander.configure(io_config).await {
        warn!("Failed to enable interrupt mirroring");
    }

    // —— Encoder ————————————————————————————————————————————————————————————

    let encoder = match RotaryEncoder::new(expander, int_pin, ENCODER_CONFIG, ChangeNotifier).await {
        Ok(encoder) => encoder,
        Err(_) => {
            error!("Failed to arm encoder pins");
            return;
        }
    };

    info!("Encoder armed, initial value {}", encoder.value());

    spawner.spawn(report_task()).unwrap();
    spawner.spawn(encoder_task(encoder)).unwrap();

    info!("All tasks spawned");
}
