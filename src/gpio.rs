//! This module provides functionality for General Purpose Input and Output (GPIO) pins,
//! including pin mode, pad driver and hardware-control settings.
//! It includes implementations of `embedded-hal` pin abstraction.

#[cfg(feature = "embedded_hal")]
use core::convert::Infallible;

#[cfg(feature = "embedded_hal")]
use embedded_hal::digital::{ErrorType, InputPin, OutputPin, StatefulOutputPin};

use crate::{
    pac::{PORT0_BASE, port},
    traits::{ActiveLow, ToggleOutput},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Values for `IOCRx.PCy`. Input modes select the pull device and whether the input is
/// inverted; output modes select push-pull or open-drain and the output source.
pub enum PinMode {
    Input,
    InputPullDown,
    InputPullUp,
    /// Input with continuous sampling of the pad.
    InputSampling,
    InputInverted,
    Output,
    OutputOpenDrain,
    /// Alternate output function 1 through 4, push-pull.
    Alt(u8),
    /// Alternate output function 1 through 4, open-drain.
    AltOpenDrain(u8),
}

impl PinMode {
    /// The 5-bit `PC` code, already shifted into place within its byte of `IOCR`.
    fn val(&self) -> u8 {
        match self {
            Self::Input => 0x00,
            Self::InputPullDown => 0x08,
            Self::InputPullUp => 0x10,
            Self::InputSampling => 0x18,
            Self::InputInverted => 0x20,
            Self::Output => 0x80,
            Self::OutputOpenDrain => 0xC0,
            Self::Alt(f) => {
                assert!((1..=4).contains(f), "Alternate functions are 1 through 4.");
                0x80 | f << 3
            }
            Self::AltOpenDrain(f) => {
                assert!((1..=4).contains(f), "Alternate functions are 1 through 4.");
                0xC0 | f << 3
            }
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
/// Values for `PDRx.PDy`: output driver strength and edge shape.
pub enum OutputStrength {
    StrongSharpEdge = 0,
    StrongMediumEdge = 1,
    StrongSoftEdge = 2,
    StrongSlowEdge = 3,
    Medium = 4,
    Weak = 7,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
/// Values for `HWSEL.HWy`: whether software or a peripheral drives the pin.
pub enum HwControl {
    Software = 0,
    Peripheral0 = 1,
    Peripheral1 = 2,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// GPIO port. Ports 14 and 15 are the analog-capable ones.
pub enum Port {
    P0,
    P1,
    P2,
    P3,
    P4,
    P5,
    P6,
    #[cfg(ports_7_9)]
    P7,
    #[cfg(ports_7_9)]
    P8,
    #[cfg(ports_7_9)]
    P9,
    P14,
    P15,
}

impl Port {
    fn index(&self) -> usize {
        match self {
            Self::P0 => 0,
            Self::P1 => 1,
            Self::P2 => 2,
            Self::P3 => 3,
            Self::P4 => 4,
            Self::P5 => 5,
            Self::P6 => 6,
            #[cfg(ports_7_9)]
            Self::P7 => 7,
            #[cfg(ports_7_9)]
            Self::P8 => 8,
            #[cfg(ports_7_9)]
            Self::P9 => 9,
            Self::P14 => 14,
            Self::P15 => 15,
        }
    }

    /// Pointer to the port's register block.
    pub fn ptr(&self) -> *const port::RegisterBlock {
        (PORT0_BASE + 0x100 * self.index()) as *const _
    }
}

/// Represents a single GPIO pin. Allows access to the pin's configuration and level
/// through its port's registers.
pub struct Pin {
    pub port: Port,
    pub pin: u8,
    regs: *const port::RegisterBlock,
}

// Every access is a single register read or write; `toggle` and the level setters go through
// `OMR`, which only affects the bits written.
unsafe impl Send for Pin {}

impl Pin {
    /// Create a new pin, with a specific mode. Example:
    /// ```no_run
    /// use xmc4_hal::gpio::{Pin, Port, PinMode};
    ///
    /// let led = Pin::new(Port::P5, 9, PinMode::Output);
    /// ```
    pub fn new(port: Port, pin: u8, mode: PinMode) -> Self {
        unsafe { Self::from_regs(port.ptr(), port, pin, mode) }
    }

    /// Create a pin on a register block at an arbitrary address, eg a simulated one.
    ///
    /// # Safety
    /// `regs` must point to a port register block that outlives the pin.
    pub unsafe fn from_regs(
        regs: *const port::RegisterBlock,
        port: Port,
        pin: u8,
        mode: PinMode,
    ) -> Self {
        assert!(pin <= 15, "Pin must be 0 - 15.");

        let mut result = Self { port, pin, regs };
        result.mode(mode);

        result
    }

    fn regs(&self) -> &port::RegisterBlock {
        unsafe { &*self.regs }
    }

    /// Set pin mode. Eg, input, output, or an alternate function.
    pub fn mode(&mut self, value: PinMode) {
        let shift = 8 * (self.pin as u32 % 4);
        let iocr = &self.regs().iocr[self.pin as usize / 4];

        unsafe {
            iocr.modify(|r| (r & !(0xF8 << shift)) | ((value.val() as u32) << shift));
        }
    }

    /// Set output driver strength. Sets the `PDRx` register.
    pub fn output_strength(&mut self, value: OutputStrength) {
        let shift = 4 * (self.pin as u32 % 8);
        let pdr = &self.regs().pdr[self.pin as usize / 8];

        unsafe {
            pdr.modify(|r| (r & !(0b111 << shift)) | ((value as u32) << shift));
        }
    }

    /// Hand the pin to a peripheral, or back to software. Sets the `HWSEL` register.
    pub fn hw_control(&mut self, value: HwControl) {
        let shift = 2 * self.pin as u32;

        unsafe {
            self.regs()
                .hwsel
                .modify(|r| (r & !(0b11 << shift)) | ((value as u32) << shift));
        }
    }

    /// Enable the digital input path. Pins on the analog ports, 14 and 15, come out of reset
    /// with it disabled and always read low until this is called.
    pub fn enable_digital_input(&mut self) {
        unsafe { self.regs().pdisc.modify(|r| r & !(1 << self.pin)) };
    }

    /// Disable the digital input path, eg to use the pin as an analog input.
    pub fn disable_digital_input(&mut self) {
        unsafe { self.regs().pdisc.modify(|r| r | 1 << self.pin) };
    }

    /// Check if the pin's input voltage is high. Reads from the `IN` register.
    pub fn is_high(&self) -> bool {
        self.regs().in_.read() & (1 << self.pin) != 0
    }

    /// Check if the pin's input voltage is low. Reads from the `IN` register.
    pub fn is_low(&self) -> bool {
        !self.is_high()
    }

    /// Check the level the pin is set to drive. Reads from the `OUT` register.
    pub fn is_set_high(&self) -> bool {
        self.regs().out.read() & (1 << self.pin) != 0
    }

    /// Set the pin's output voltage to high. Sets the `OMR` register.
    pub fn set_high(&mut self) {
        unsafe { self.regs().omr.write(1 << self.pin) };
    }

    /// Set the pin's output voltage to low. Sets the `OMR` register.
    pub fn set_low(&mut self) {
        unsafe { self.regs().omr.write(1 << (self.pin + 16)) };
    }

    /// Toggle output voltage between low and high. Setting both the set and reset bits in `OMR`
    /// toggles the output in one write.
    pub fn toggle(&mut self) {
        unsafe { self.regs().omr.write(0x1_0001 << self.pin) };
    }
}

impl ToggleOutput for Pin {
    fn toggle(&mut self) {
        Pin::toggle(self);
    }
}

impl ActiveLow for Pin {
    fn is_active(&self) -> bool {
        self.is_low()
    }
}

#[cfg(feature = "embedded_hal")]
impl ErrorType for Pin {
    type Error = Infallible;
}

#[cfg(feature = "embedded_hal")]
impl InputPin for Pin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(Pin::is_high(self))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(Pin::is_low(self))
    }
}

#[cfg(feature = "embedded_hal")]
impl OutputPin for Pin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Pin::set_low(self);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Pin::set_high(self);
        Ok(())
    }
}

#[cfg(feature = "embedded_hal")]
impl StatefulOutputPin for Pin {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(Pin::is_set_high(self))
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!Pin::is_set_high(self))
    }

    fn toggle(&mut self) -> Result<(), Self::Error> {
        Pin::toggle(self);
        Ok(())
    }
}
