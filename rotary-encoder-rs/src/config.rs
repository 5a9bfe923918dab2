//! Encoder configuration.
//!
//! [`PinAssignment`] names the expander bits the encoder is wired to and
//! [`EncoderConfig`] adds the counter range. Both are fixed for the
//! lifetime of a [`Decoder`](crate::Decoder); invalid combinations are
//! programmer errors and panic at construction.

/// Width of the expander port in bits.
pub const PORT_WIDTH: u8 = 16;

// ── PinAssignment ────────────────────────────────────────────────────────

/// Bit positions of the encoder lines within the 16-bit expander port.
///
/// Bit `n` is pin `n` of the expander (GPA0 = 0 … GPB7 = 15).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinAssignment {
    /// Encoder A / CLK line.
    pub clk: u8,
    /// Encoder B / DT line.
    pub dt: u8,
    /// Push-button line, if the encoder has one wired.
    pub sw: Option<u8>,
}

impl PinAssignment {
    /// Rotation lines only, no push button.
    pub const fn new(clk: u8, dt: u8) -> Self {
        Self { clk, dt, sw: None }
    }

    /// Add a push-button line.
    pub const fn with_switch(self, sw: u8) -> Self {
        Self {
            sw: Some(sw),
            ..self
        }
    }

    /// Mask covering the CLK and DT bits.
    ///
    /// # Panics
    /// If `clk` or `dt` is not below [`PORT_WIDTH`].
    pub fn rotation_mask(&self) -> u16 {
        bit(self.clk) | bit(self.dt)
    }

    /// Mask of the switch bit, if any.
    ///
    /// # Panics
    /// If `sw` is not below [`PORT_WIDTH`].
    pub fn switch_mask(&self) -> Option<u16> {
        self.sw.map(bit)
    }

    /// Every bit the encoder uses.
    ///
    /// # Panics
    /// If any assigned bit is not below [`PORT_WIDTH`].
    pub fn mask(&self) -> u16 {
        self.rotation_mask() | self.switch_mask().unwrap_or(0)
    }

    /// Panics unless all bits are distinct and within the port.
    pub(crate) fn validate(&self) {
        assert!(self.clk < PORT_WIDTH, "clk bit {} outside the port", self.clk);
        assert!(self.dt < PORT_WIDTH, "dt bit {} outside the port", self.dt);
        assert_ne!(self.clk, self.dt, "clk and dt must use different bits");

        if let Some(sw) = self.sw {
            assert!(sw < PORT_WIDTH, "sw bit {} outside the port", sw);
            assert!(
                sw != self.clk && sw != self.dt,
                "sw must not share a bit with clk or dt"
            );
        }
    }
}

fn bit(n: u8) -> u16 {
    assert!(n < PORT_WIDTH, "bit {} outside the port", n);
    1 << n
}

// ── EncoderConfig ────────────────────────────────────────────────────────

/// Counter configuration for one encoder.
///
/// [`EncoderConfig::new()`] starts at 0 within `[0, 10]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderConfig {
    /// Expander bits the encoder is wired to.
    pub pins: PinAssignment,
    /// Counter value after construction. Default: 0.
    pub initial_value: i32,
    /// Lowest counter value (inclusive). Default: 0.
    pub min_value: i32,
    /// Highest counter value (inclusive). Default: 10.
    pub max_value: i32,
}

impl EncoderConfig {
    /// Default range for the given pins.
    pub const fn new(pins: PinAssignment) -> Self {
        Self {
            pins,
            initial_value: 0,
            min_value: 0,
            max_value: 10,
        }
    }

    /// Set the inclusive counter range.
    pub const fn with_range(self, min_value: i32, max_value: i32) -> Self {
        Self {
            min_value,
            max_value,
            ..self
        }
    }

    /// Set the starting value. Must lie inside the range.
    pub const fn with_initial_value(self, initial_value: i32) -> Self {
        Self {
            initial_value,
            ..self
        }
    }

    pub(crate) fn validate(&self) {
        self.pins.validate();
        assert!(
            self.min_value <= self.max_value,
            "min_value {} greater than max_value {}",
            self.min_value,
            self.max_value
        );
        assert!(
            (self.min_value..=self.max_value).contains(&self.initial_value),
            "initial_value {} outside [{}, {}]",
            self.initial_value,
            self.min_value,
            self.max_value
        );
    }
}
