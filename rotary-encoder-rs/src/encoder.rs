//! Interrupt-driven encoder on an expander port.
//!
//! [`RotaryEncoder`] ties a [`Decoder`] to the expander registers and to the
//! expander's INT line. Construction arms the encoder pins, [`start`] binds
//! the interrupt line and [`stop`] releases it again.
//!
//! [`start`]: RotaryEncoder::start
//! [`stop`]: RotaryEncoder::stop

use embedded_hal_async::digital::Wait;

use crate::config::EncoderConfig;
use crate::decoder::{Decoder, Event};
use crate::error::RotaryError;
use crate::notify::OnChange;
use crate::port::{ConfigRegister, PortRegisters};

/// Rotary encoder wired to an I/O expander with its INT output on `line`.
///
/// The INT output is active-low and shared by all armed pins. Once the
/// expander latches a change in INTF/INTCAP it holds INT low until INTCAP
/// is read, so dispatch waits on the level rather than on an edge.
///
/// The encoder owns `line` for its whole lifetime; [`start`](Self::start)
/// and [`stop`](Self::stop) only decide whether it is serviced.
///
/// # Example
///
/// ```ignore
/// use rotary_encoder::{EncoderConfig, PinAssignment, RotaryEncoder};
///
/// let pins = PinAssignment::new(0, 1).with_switch(2);
/// let config = EncoderConfig::new(pins).with_range(0, 100);
///
/// // `expander` implements `PortRegisters`, `int_pin` is an input with `Wait`
/// let mut encoder = RotaryEncoder::new(expander, int_pin, config, |value, pressed| {
///     defmt::info!("value={} pressed={}", value, pressed);
/// })
/// .await?;
///
/// encoder.start().await?;
/// loop {
///     encoder.next_event().await?;
/// }
/// ```
pub struct RotaryEncoder<P, L, C = ()> {
    port: P,
    line: L,
    decoder: Decoder<C>,
    bound: bool,
}

impl<P, L, C> RotaryEncoder<P, L, C>
where
    P: PortRegisters,
    L: Wait,
    C: OnChange,
{
    /// Create the encoder and arm its pins on the expander.
    ///
    /// The clk, dt and (optional) sw bits are OR'd into the mode, pull-up,
    /// input polarity and interrupt enable registers. Other pins keep their
    /// configuration. `line` must already be configured as an input.
    ///
    /// # Panics
    /// On an invalid [`EncoderConfig`], before any register is touched.
    ///
    /// # Errors
    /// * [`RotaryError::Port`] if arming the pins fails
    pub async fn new(
        mut port: P,
        line: L,
        config: EncoderConfig,
        on_change: C,
    ) -> Result<Self, RotaryError<P::Error, L::Error>> {
        let decoder = Decoder::new(config, on_change);
        let mask = decoder.pins().mask();

        for register in ConfigRegister::ARMING {
            port.set_bits(register, mask)
                .await
                .map_err(RotaryError::Port)?;
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("Encoder armed on pins {=u16:#x}", mask);

        Ok(Self {
            port,
            line,
            decoder,
            bound: false,
        })
    }

    // ── Binding ──────────────────────────────────────────────────────

    /// Bind the interrupt line and clear any interrupt latched before.
    ///
    /// Starting an already started encoder only clears the latch again.
    pub async fn start(&mut self) -> Result<(), RotaryError<P::Error, L::Error>> {
        self.bound = true;
        self.discard_captured().await?;

        #[cfg(feature = "defmt")]
        defmt::info!("Encoder started");

        Ok(())
    }

    /// Release the interrupt line, then clear any pending latch so the next
    /// [`start`](Self::start) does not fire on stale state.
    pub async fn stop(&mut self) -> Result<(), RotaryError<P::Error, L::Error>> {
        self.bound = false;
        self.discard_captured().await?;

        #[cfg(feature = "defmt")]
        defmt::info!("Encoder stopped");

        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.bound
    }

    async fn discard_captured(&mut self) -> Result<(), RotaryError<P::Error, L::Error>> {
        // Reading INTCAP clears the latch; discard the value.
        let _ = self
            .port
            .interrupt_captured()
            .await
            .map_err(RotaryError::Port)?;
        Ok(())
    }

    // ── Dispatch ─────────────────────────────────────────────────────

    /// Wait until INT is asserted and dispatch the latched interrupt.
    ///
    /// Returns at once if INT is already low, e.g. when a change latched
    /// while the previous one was being handled or an INTCAP read failed.
    /// Reads INTF, then INTCAP (which releases INT) and hands both to the
    /// decoder. Returns the resulting event, if any.
    ///
    /// # Errors
    /// * [`RotaryError::NotStarted`] while the encoder is stopped
    /// * [`RotaryError::Line`] if waiting on the line fails
    /// * [`RotaryError::Port`] if reading the interrupt registers fails
    pub async fn next_event(&mut self) -> Result<Option<Event>, RotaryError<P::Error, L::Error>> {
        if !self.bound {
            return Err(RotaryError::NotStarted);
        }

        self.line
            .wait_for_low()
            .await
            .map_err(RotaryError::Line)?;

        let flagged = self
            .port
            .interrupt_flag()
            .await
            .map_err(RotaryError::Port)?;
        let captured = self
            .port
            .interrupt_captured()
            .await
            .map_err(RotaryError::Port)?;

        Ok(self.deliver(flagged, captured))
    }

    /// Dispatch interrupt registers that were read elsewhere.
    ///
    /// Ignored while the encoder is stopped: no state changes and the
    /// change sink is not called.
    pub fn deliver(&mut self, flagged: u16, captured: u16) -> Option<Event> {
        if !self.bound {
            return None;
        }
        self.decoder.handle_interrupt(flagged, captured)
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn value(&self) -> i32 {
        self.decoder.value()
    }

    pub fn button_state(&self) -> bool {
        self.decoder.button_state()
    }

    pub fn decoder(&self) -> &Decoder<C> {
        &self.decoder
    }

    /// Give back the port, the interrupt line and the change sink.
    ///
    /// The encoder pins stay armed on the expander.
    pub fn release(self) -> (P, L, C) {
        (self.port, self.line, self.decoder.into_handler())
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────
