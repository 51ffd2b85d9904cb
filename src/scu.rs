//! System Control Unit: the clock-gating and peripheral-reset controls needed to bring a
//! peripheral up before its driver touches it.

use core::ops::Deref;

use crate::pac::{scu_clk, scu_reset};

/// Peripherals with a gate in `CGATx` and a reset in `PRx`. The value encodes the register
/// index in bits 28..31 and the bit mask below it, the same way the vendor headers do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum Peripheral {
    Ccu40 = 1 << 2,
    Ccu41 = 1 << 3,
    Ccu42 = 1 << 4,
    Ccu43 = 0x1000_0000 | 1,
    Ports = 0x1000_0000 | 1 << 9,
}

impl Peripheral {
    /// Index of the `CGATx` / `PRx` register that holds this peripheral's bit.
    pub const fn reg_index(self) -> usize {
        (self as u32 >> 28) as usize
    }

    pub const fn mask(self) -> u32 {
        self as u32 & 0x0FFF_FFFF
    }
}

/// Clocks switched by `CLKSET` / `CLKCLR`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum Clock {
    Usb = 1 << 0,
    Mmc = 1 << 1,
    Eth = 1 << 2,
    Ebu = 1 << 3,
    Ccu = 1 << 4,
    Wdt = 1 << 5,
}

/// Owns the `SCU_CLK` and `SCU_RESET` blocks.
pub struct Scu<C, R> {
    clk: C,
    reset: R,
}

impl<C, R> Scu<C, R>
where
    C: Deref<Target = scu_clk::RegisterBlock>,
    R: Deref<Target = scu_reset::RegisterBlock>,
{
    pub fn new(clk: C, reset: R) -> Self {
        Self { clk, reset }
    }

    /// Enable a module clock, eg `Clock::Ccu` which feeds every CCU4 and CCU8 module.
    pub fn enable_clock(&mut self, clock: Clock) {
        unsafe { self.clk.clkset.write(clock as u32) };
    }

    /// Ungate the peripheral's clock, then release it from reset.
    pub fn enable_peripheral(&mut self, periph: Peripheral) {
        let i = periph.reg_index();

        unsafe {
            self.clk.cgat[i].clr.write(periph.mask());
            self.reset.pr[i].clr.write(periph.mask());
        }
    }

    pub fn is_peripheral_clock_gated(&self, periph: Peripheral) -> bool {
        self.clk.cgat[periph.reg_index()].stat.read() & periph.mask() != 0
    }

    pub fn is_peripheral_reset(&self, periph: Peripheral) -> bool {
        self.reset.pr[periph.reg_index()].stat.read() & periph.mask() != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test_util::{peek, poke};

    #[test]
    fn ccu43_lives_in_the_second_registers() {
        assert_eq!(Peripheral::Ccu43.reg_index(), 1);
        assert_eq!(Peripheral::Ccu43.mask(), 1);
        assert_eq!(Peripheral::Ccu40.reg_index(), 0);
        assert_eq!(Peripheral::Ccu40.mask(), 0b100);
    }

    #[test]
    fn enable_peripheral_ungates_and_releases_reset() {
        let clk: scu_clk::RegisterBlock = unsafe { core::mem::zeroed() };
        let reset: scu_reset::RegisterBlock = unsafe { core::mem::zeroed() };
        let mut scu = Scu::new(&clk, &reset);

        scu.enable_peripheral(Peripheral::Ccu43);

        assert_eq!(peek(&clk.cgat[1].clr), 1);
        assert_eq!(peek(&reset.pr[1].clr), 1);
        assert_eq!(peek(&clk.cgat[0].clr), 0);
        assert_eq!(peek(&reset.pr[1].set), 0);
    }

    #[test]
    fn enable_clock_writes_clkset() {
        let clk: scu_clk::RegisterBlock = unsafe { core::mem::zeroed() };
        let reset: scu_reset::RegisterBlock = unsafe { core::mem::zeroed() };
        let mut scu = Scu::new(&clk, &reset);

        scu.enable_clock(Clock::Ccu);
        assert_eq!(peek(&clk.clkset), 0b1_0000);
    }

    #[test]
    fn status_reads_use_the_peripheral_bit() {
        let clk: scu_clk::RegisterBlock = unsafe { core::mem::zeroed() };
        let reset: scu_reset::RegisterBlock = unsafe { core::mem::zeroed() };
        let scu = Scu::new(&clk, &reset);

        // Out of reset, CCU43 and PORTS are gated and held in reset.
        poke(&clk.cgat[1].stat, 1 | 1 << 9);
        poke(&reset.pr[1].stat, 1 << 9);

        assert!(scu.is_peripheral_clock_gated(Peripheral::Ccu43));
        assert!(scu.is_peripheral_clock_gated(Peripheral::Ports));
        assert!(!scu.is_peripheral_clock_gated(Peripheral::Ccu40));
        assert!(!scu.is_peripheral_reset(Peripheral::Ccu43));
        assert!(scu.is_peripheral_reset(Peripheral::Ports));
    }
}
