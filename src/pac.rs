//! Register blocks for the peripherals this crate drives, laid out per the XMC4500/4700/4800
//! reference manuals. Only the registers the drivers touch are named; the rest is padding.
//!
//! Registers that are write-only on silicon (the `...SET`, `...CLR` and `OMR` style registers)
//! are typed `WO`, and read-only status registers `RO`. The peripheral handles mirror what
//! svd2rust generates: zero-sized, `Deref` to their register block, and handed out once by
//! [`Peripherals::take`].
//!
//! Ports have no handle here. A `gpio::Pin` owns a single pin rather than a port, and finds its
//! port's block from [`PORT0_BASE`] through `gpio::Port::ptr`.

use core::{
    marker::PhantomData,
    ops::Deref,
    sync::atomic::{AtomicBool, Ordering},
};

use paste::paste;

#[cfg(feature = "rt")]
pub use cortex_m_rt::interrupt;

pub use self::Interrupt as interrupt;

/// Number of priority bits implemented by the NVIC on this part.
pub const NVIC_PRIO_BITS: u8 = 6;

/// Number of external interrupt lines in the vector table.
pub const NUM_INTERRUPTS: usize = 112;

pub mod scu_clk {
    use volatile_register::{RO, RW, WO};

    /// One `CGATSTATx` / `CGATSETx` / `CGATCLRx` triplet.
    #[repr(C)]
    pub struct Gate {
        pub stat: RO<u32>,
        pub set: WO<u32>,
        pub clr: WO<u32>,
    }

    /// SCU clock control, `SCU_CLK`.
    #[repr(C)]
    pub struct RegisterBlock {
        /// 0x00: Clock status.
        pub clkstat: RO<u32>,
        /// 0x04: Clock set control.
        pub clkset: WO<u32>,
        /// 0x08: Clock clear control.
        pub clkclr: WO<u32>,
        /// 0x0C: System clock control.
        pub sysclkcr: RW<u32>,
        /// 0x10: CPU clock control.
        pub cpuclkcr: RW<u32>,
        /// 0x14: Peripheral bus clock control.
        pub pbclkcr: RW<u32>,
        _reserved0: [u32; 2],
        /// 0x20: CCU clock control.
        pub ccuclkcr: RW<u32>,
        _reserved1: [u32; 7],
        /// 0x40: Peripheral clock gating, registers 0 through 3.
        pub cgat: [Gate; 4],
    }
}

pub mod scu_reset {
    use volatile_register::{RO, WO};

    /// One `PRSTATx` / `PRSETx` / `PRCLRx` triplet.
    #[repr(C)]
    pub struct PeripheralReset {
        pub stat: RO<u32>,
        pub set: WO<u32>,
        pub clr: WO<u32>,
    }

    /// SCU reset control, `SCU_RESET`.
    #[repr(C)]
    pub struct RegisterBlock {
        /// 0x00: System reset status.
        pub rststat: RO<u32>,
        /// 0x04: Reset request set.
        pub rstset: WO<u32>,
        /// 0x08: Reset request clear.
        pub rstclr: WO<u32>,
        /// 0x0C: Peripheral resets, registers 0 through 3.
        pub pr: [PeripheralReset; 4],
    }
}

pub mod ccu4 {
    use volatile_register::{RO, RW, WO};

    /// CCU4 kernel (global) registers.
    #[repr(C)]
    pub struct RegisterBlock {
        /// 0x00: Global control.
        pub gctrl: RW<u32>,
        /// 0x04: Global status.
        pub gstat: RO<u32>,
        /// 0x08: Global idle set.
        pub gidls: WO<u32>,
        /// 0x0C: Global idle clear.
        pub gidlc: WO<u32>,
        /// 0x10: Global channel set; requests shadow transfers.
        pub gcss: WO<u32>,
        /// 0x14: Global channel clear.
        pub gcsc: WO<u32>,
        /// 0x18: Global channel status; shadow transfers still pending.
        pub gcst: RO<u32>,
        _reserved0: [u32; 13],
        /// 0x50: Extended capture mode read.
        pub ecrd: RO<u32>,
        _reserved1: [u32; 11],
        /// 0x80: Module identification.
        pub midr: RO<u32>,
    }
}

pub mod ccu4_cc4 {
    use volatile_register::{RO, RW, WO};

    /// CCU4 timer slice (`CC4y`) registers.
    #[repr(C)]
    pub struct RegisterBlock {
        /// 0x00: Input selector configuration.
        pub ins: RW<u32>,
        /// 0x04: Connection matrix control.
        pub cmc: RW<u32>,
        /// 0x08: Slice timer status.
        pub tcst: RO<u32>,
        /// 0x0C: Slice timer run set.
        pub tcset: WO<u32>,
        /// 0x10: Slice timer clear.
        pub tcclr: WO<u32>,
        /// 0x14: Slice timer control.
        pub tc: RW<u32>,
        /// 0x18: Passive level config.
        pub psl: RW<u32>,
        /// 0x1C: Dither config.
        pub dit: RO<u32>,
        /// 0x20: Dither shadow.
        pub dits: RW<u32>,
        /// 0x24: Prescaler control.
        pub psc: RW<u32>,
        /// 0x28: Floating prescaler control.
        pub fpc: RW<u32>,
        /// 0x2C: Floating prescaler shadow.
        pub fpcs: RW<u32>,
        /// 0x30: Timer period value.
        pub pr: RO<u32>,
        /// 0x34: Timer shadow period value.
        pub prs: RW<u32>,
        /// 0x38: Timer compare value.
        pub cr: RO<u32>,
        /// 0x3C: Timer shadow compare value.
        pub crs: RW<u32>,
        _reserved0: [u32; 12],
        /// 0x70: Timer value.
        pub timer: RW<u32>,
        /// 0x74: Capture registers 0 through 3.
        pub cv: [RO<u32>; 4],
        _reserved1: [u32; 7],
        /// 0xA0: Interrupt status.
        pub ints: RO<u32>,
        /// 0xA4: Interrupt enable control.
        pub inte: RW<u32>,
        /// 0xA8: Service request selector.
        pub srs: RW<u32>,
        /// 0xAC: Interrupt status set.
        pub sws: WO<u32>,
        /// 0xB0: Interrupt status clear.
        pub swr: WO<u32>,
    }
}

pub mod port {
    use volatile_register::{RO, RW, WO};

    /// GPIO port registers, `PORTx`.
    #[repr(C)]
    pub struct RegisterBlock {
        /// 0x00: Output.
        pub out: RW<u32>,
        /// 0x04: Output modification; `PSx` in the low half, `PRx` in the high half.
        pub omr: WO<u32>,
        _reserved0: [u32; 2],
        /// 0x10: Input/output control, four pins per register.
        pub iocr: [RW<u32>; 4],
        _reserved1: u32,
        /// 0x24: Input.
        pub in_: RO<u32>,
        _reserved2: [u32; 6],
        /// 0x40: Pad driver mode, eight pins per register.
        pub pdr: [RW<u32>; 2],
        _reserved3: [u32; 6],
        /// 0x60: Pin function decision control. Writable on the analog ports only.
        pub pdisc: RW<u32>,
        _reserved4: [u32; 3],
        /// 0x70: Pin power save.
        pub pps: RW<u32>,
        /// 0x74: Pin hardware select.
        pub hwsel: RW<u32>,
    }
}

/// Base address of `PORT0`; each following port is 0x100 above the last.
pub const PORT0_BASE: usize = 0x4802_8000;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(non_camel_case_types)]
#[repr(u16)]
/// External interrupt lines. Only the CCU4 service request nodes are listed; everything else in
/// the vector table points at `DefaultHandler`.
pub enum Interrupt {
    CCU40_0 = 44,
    CCU40_1 = 45,
    CCU40_2 = 46,
    CCU40_3 = 47,
    CCU41_0 = 48,
    CCU41_1 = 49,
    CCU41_2 = 50,
    CCU41_3 = 51,
    CCU42_0 = 52,
    CCU42_1 = 53,
    CCU42_2 = 54,
    CCU42_3 = 55,
    CCU43_0 = 56,
    CCU43_1 = 57,
    CCU43_2 = 58,
    CCU43_3 = 59,
}

unsafe impl cortex_m::interrupt::InterruptNumber for Interrupt {
    #[inline(always)]
    fn number(self) -> u16 {
        self as u16
    }
}

#[doc(hidden)]
#[derive(Clone, Copy)]
pub union Vector {
    _handler: unsafe extern "C" fn(),
    _reserved: u32,
}

/// Declares the handlers and fills the `__INTERRUPTS` table with them.
macro_rules! vector_table {
    ($($num:literal => $name:ident),+ $(,)?) => {
        #[cfg(feature = "rt")]
        unsafe extern "C" {
            fn DefaultHandler();
            $(fn $name();)+
        }

        #[cfg(feature = "rt")]
        #[doc(hidden)]
        #[unsafe(link_section = ".vector_table.interrupts")]
        #[unsafe(no_mangle)]
        pub static __INTERRUPTS: [Vector; NUM_INTERRUPTS] = {
            let mut table = [Vector { _handler: DefaultHandler }; NUM_INTERRUPTS];
            $(table[$num] = Vector { _handler: $name };)+
            table
        };
    };
}

vector_table! {
    44 => CCU40_0, 45 => CCU40_1, 46 => CCU40_2, 47 => CCU40_3,
    48 => CCU41_0, 49 => CCU41_1, 50 => CCU41_2, 51 => CCU41_3,
    52 => CCU42_0, 53 => CCU42_1, 54 => CCU42_2, 55 => CCU42_3,
    56 => CCU43_0, 57 => CCU43_1, 58 => CCU43_2, 59 => CCU43_3,
}

/// Zero-sized handle for one peripheral instance.
macro_rules! peripheral {
    ($NAME:ident, $block:ident, $addr:expr) => {
        #[allow(non_camel_case_types)]
        #[doc = concat!("`", stringify!($NAME), "` at ", stringify!($addr), ".")]
        pub struct $NAME {
            _marker: PhantomData<*const ()>,
        }

        unsafe impl Send for $NAME {}

        impl $NAME {
            /// Pointer to the register block.
            pub const PTR: *const $block::RegisterBlock = $addr as *const _;

            /// Return the pointer to the register block.
            #[inline(always)]
            pub const fn ptr() -> *const $block::RegisterBlock {
                Self::PTR
            }

            /// Unchecked access to the peripheral.
            ///
            /// # Safety
            /// Must not alias a handle that is in use elsewhere.
            pub unsafe fn steal() -> Self {
                Self {
                    _marker: PhantomData,
                }
            }
        }

        impl Deref for $NAME {
            type Target = $block::RegisterBlock;

            #[inline(always)]
            fn deref(&self) -> &Self::Target {
                unsafe { &*Self::PTR }
            }
        }
    };
}

peripheral!(SCU_CLK, scu_clk, 0x5000_4600);
peripheral!(SCU_RESET, scu_reset, 0x5000_4400);

/// CCU4 modules, with their four slices 0x100 apart starting at `base + 0x100`.
macro_rules! ccu4_modules {
    ($(($m:literal, $addr:literal)),+) => {
        paste! {
            $(
                peripheral!([<CCU4 $m>], ccu4, $addr);
                peripheral!([<CCU4 $m _CC40>], ccu4_cc4, $addr + 0x100);
                peripheral!([<CCU4 $m _CC41>], ccu4_cc4, $addr + 0x200);
                peripheral!([<CCU4 $m _CC42>], ccu4_cc4, $addr + 0x300);
                peripheral!([<CCU4 $m _CC43>], ccu4_cc4, $addr + 0x400);
            )+

            /// All peripherals this crate has register blocks for.
            #[allow(non_snake_case)]
            pub struct Peripherals {
                pub SCU_CLK: SCU_CLK,
                pub SCU_RESET: SCU_RESET,
                $(
                    pub [<CCU4 $m>]: [<CCU4 $m>],
                    pub [<CCU4 $m _CC40>]: [<CCU4 $m _CC40>],
                    pub [<CCU4 $m _CC41>]: [<CCU4 $m _CC41>],
                    pub [<CCU4 $m _CC42>]: [<CCU4 $m _CC42>],
                    pub [<CCU4 $m _CC43>]: [<CCU4 $m _CC43>],
                )+
            }

            impl Peripherals {
                /// Unchecked access to all peripherals.
                ///
                /// # Safety
                /// Must not alias handles that are in use elsewhere.
                pub unsafe fn steal() -> Self {
                    TAKEN.store(true, Ordering::Relaxed);
                    unsafe {
                        Self {
                            SCU_CLK: SCU_CLK::steal(),
                            SCU_RESET: SCU_RESET::steal(),
                            $(
                                [<CCU4 $m>]: [<CCU4 $m>]::steal(),
                                [<CCU4 $m _CC40>]: [<CCU4 $m _CC40>]::steal(),
                                [<CCU4 $m _CC41>]: [<CCU4 $m _CC41>]::steal(),
                                [<CCU4 $m _CC42>]: [<CCU4 $m _CC42>]::steal(),
                                [<CCU4 $m _CC43>]: [<CCU4 $m _CC43>]::steal(),
                            )+
                        }
                    }
                }
            }
        }
    };
}

ccu4_modules!(
    (0, 0x4000_C000),
    (1, 0x4001_0000),
    (2, 0x4001_4000),
    (3, 0x4800_4000)
);

static TAKEN: AtomicBool = AtomicBool::new(false);

impl Peripherals {
    /// Returns all the peripherals *once*.
    pub fn take() -> Option<Self> {
        cortex_m::interrupt::free(|_| {
            if TAKEN.load(Ordering::Relaxed) {
                None
            } else {
                Some(unsafe { Peripherals::steal() })
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use core::mem::{offset_of, size_of};

    use super::*;

    #[test]
    fn slice_register_offsets() {
        assert_eq!(offset_of!(ccu4_cc4::RegisterBlock, tc), 0x14);
        assert_eq!(offset_of!(ccu4_cc4::RegisterBlock, psc), 0x24);
        assert_eq!(offset_of!(ccu4_cc4::RegisterBlock, prs), 0x34);
        assert_eq!(offset_of!(ccu4_cc4::RegisterBlock, timer), 0x70);
        assert_eq!(offset_of!(ccu4_cc4::RegisterBlock, ints), 0xA0);
        assert_eq!(offset_of!(ccu4_cc4::RegisterBlock, swr), 0xB0);
    }

    #[test]
    fn kernel_and_port_offsets() {
        assert_eq!(offset_of!(ccu4::RegisterBlock, gcst), 0x18);
        assert_eq!(offset_of!(ccu4::RegisterBlock, ecrd), 0x50);
        assert_eq!(offset_of!(ccu4::RegisterBlock, midr), 0x80);

        assert_eq!(offset_of!(port::RegisterBlock, iocr), 0x10);
        assert_eq!(offset_of!(port::RegisterBlock, in_), 0x24);
        assert_eq!(offset_of!(port::RegisterBlock, pdr), 0x40);
        assert_eq!(offset_of!(port::RegisterBlock, pdisc), 0x60);
        assert_eq!(offset_of!(port::RegisterBlock, hwsel), 0x74);
    }

    #[test]
    fn port_blocks_fit_their_stride() {
        assert_eq!(size_of::<port::RegisterBlock>(), 0x78);
        assert!(size_of::<port::RegisterBlock>() <= 0x100);
        assert_eq!(PORT0_BASE % 0x100, 0);
    }

    #[test]
    fn scu_offsets() {
        assert_eq!(offset_of!(scu_clk::RegisterBlock, ccuclkcr), 0x20);
        assert_eq!(offset_of!(scu_clk::RegisterBlock, cgat), 0x40);
        assert_eq!(size_of::<scu_clk::Gate>(), 0xC);
        assert_eq!(offset_of!(scu_reset::RegisterBlock, pr), 0x0C);
    }

    #[test]
    fn slice_addresses() {
        assert_eq!(CCU43_CC43::ptr() as usize, 0x4800_4400);
        assert_eq!(CCU40_CC40::ptr() as usize, 0x4000_C100);
    }
}
