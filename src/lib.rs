//! Hardware abstraction layer for the Infineon XMC4000 family, centered on what a timer-driven
//! blinky needs: the SCU clock and reset controls, CCU4 compare timers and their service
//! requests, and port pins.
//!
//! The [`blink`] module holds the board-independent part of the Relax Kit blinky: the button
//! adjusted blink interval and the period-match handler. See `demos/blinky` for the firmware.
//!
//! Drivers take their register blocks through `Deref`, so they run on the peripheral handles in
//! [`pac`] on hardware, and on plain in-memory register blocks in host tests.

#![cfg_attr(not(test), no_std)]

use cfg_if::cfg_if;

mod macros;
mod util;

pub mod blink;
pub mod ccu4;
pub mod error;
pub mod gpio;
pub mod pac;
pub mod scu;
pub mod traits;

cfg_if! {
    if #[cfg(feature = "xmc4800")] {
        /// The part this crate was built for.
        pub const CHIP: &str = "XMC4800";
    } else if #[cfg(feature = "xmc4700")] {
        /// The part this crate was built for.
        pub const CHIP: &str = "XMC4700";
    } else if #[cfg(feature = "xmc4500")] {
        /// The part this crate was built for.
        pub const CHIP: &str = "XMC4500";
    } else {
        compile_error!("Select a chip with one of the `xmc4500`, `xmc4700` or `xmc4800` features.");
    }
}

/// Iterations a bounded register wait spins for before giving up with
/// [`Error::RegisterUnchanged`](error::Error::RegisterUnchanged).
pub const MAX_ITERS: u32 = 300_000;

/// Encode a priority level for `NVIC::set_priority`. Levels run 0 (most urgent) through 63; the
/// part only implements the top `NVIC_PRIO_BITS` bits of each priority byte.
pub const fn nvic_priority(level: u8) -> u8 {
    let max = (1 << pac::NVIC_PRIO_BITS) - 1;
    let level = if level > max { max } else { level };
    level << (8 - pac::NVIC_PRIO_BITS)
}
