//! Provides support for the CCU4 capture/compare units in compare (timer) mode. Includes module
//! initialization, slice configuration, period and compare programming, shadow transfers,
//! and period-match and compare-match interrupts.
//!
//! Capture mode, the external event inputs and the trap function are not yet supported.
//!
//! Period and compare values are written to shadow registers; they take effect on the next
//! shadow transfer, which is requested with [`Ccu4::enable_shadow_transfer`]. While a slice is
//! stopped the transfer happens immediately.

use core::ops::{BitOr, Deref};

use crate::{
    error::{Error, Result},
    pac::{Interrupt, ccu4, ccu4_cc4, scu_clk, scu_reset},
    scu::{Clock, Peripheral, Scu},
    traits::PeriodTimer,
    util::bounded_loop,
};

// GCTRL
const GCTRL_MSDE_POS: u32 = 14;
const GCTRL_MSDE_MSK: u32 = 0b11 << GCTRL_MSDE_POS;
// GIDLC / GIDLS
const GIDLC_SPRB: u32 = 1 << 8;
const GIDLS_CPRB: u32 = 1 << 8;
// TCST, TCSET, TCCLR
const TCST_TRB: u32 = 1 << 0;
const TCSET_TRBS: u32 = 1 << 0;
const TCCLR_TRBC: u32 = 1 << 0;
const TCCLR_TCC: u32 = 1 << 1;
// TC
const TC_TSSM_POS: u32 = 1;
const TC_CLST_POS: u32 = 2;
const TC_FPE_POS: u32 = 16;
// CMC
const CMC_TCE: u32 = 1 << 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Used for when attempting to write a value that doesn't fit its register field.
pub enum Ccu4Error {
    /// The floating prescaler compare value exceeds 15.
    FloatLimit,
    /// The dither compare limit exceeds 15.
    DitherLimit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
/// CCU4 module instance.
pub enum Instance {
    Ccu40 = 0,
    Ccu41 = 1,
    Ccu42 = 2,
    Ccu43 = 3,
}

impl Instance {
    fn peripheral(self) -> Peripheral {
        match self {
            Self::Ccu40 => Peripheral::Ccu40,
            Self::Ccu41 => Peripheral::Ccu41,
            Self::Ccu42 => Peripheral::Ccu42,
            Self::Ccu43 => Peripheral::Ccu43,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
/// Timer slice within a module.
pub enum Slice {
    S0 = 0,
    S1 = 1,
    S2 = 2,
    S3 = 3,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
/// Which shadow transfers multi-channel mode requests. `GCTRL.MSDE`.
pub enum McsAction {
    TransferPrCr = 0,
    TransferPrCrPcmp = 1,
    TransferPrCrPcmpDit = 3,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
/// Prescaler initial value, `PSC.PSIV`. The slice clock is fCCU divided by 2^n.
pub enum Prescaler {
    Div1 = 0,
    Div2 = 1,
    Div4 = 2,
    Div8 = 3,
    Div16 = 4,
    Div32 = 5,
    Div64 = 6,
    Div128 = 7,
    Div256 = 8,
    Div512 = 9,
    Div1024 = 10,
    Div2048 = 11,
    Div4096 = 12,
    Div8192 = 13,
    Div16384 = 14,
    Div32768 = 15,
}

impl Prescaler {
    pub const fn divisor(self) -> u32 {
        1 << self as u32
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
/// Counting scheme. `TC.TCM`.
pub enum CountMode {
    /// Count up to the period value, then restart from 0.
    EdgeAligned = 0,
    /// Count up to the period value, then back down to 1.
    CenterAligned = 1,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
/// `TC.FPE`.
pub enum PrescalerMode {
    Normal = 0,
    Floating = 1,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
/// Output level while the slice output is inactive. `PSL.PSL`.
pub enum PassiveLevel {
    Low = 0,
    High = 1,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
/// Slice events that can raise service requests. The value is the bit position in `INTS`,
/// `INTE` and `SWR`.
pub enum SliceEvent {
    PeriodMatch = 0,
    OneMatch = 1,
    CompareMatchUp = 2,
    CompareMatchDown = 3,
    Event0 = 8,
    Event1 = 9,
    Event2 = 10,
    Trap = 11,
}

impl SliceEvent {
    /// Position of the 2-bit field in `SRS` that routes this event.
    fn srs_pos(self) -> u32 {
        match self {
            Self::PeriodMatch | Self::OneMatch => 0,
            Self::CompareMatchUp | Self::CompareMatchDown => 2,
            Self::Event0 => 8,
            Self::Event1 => 10,
            Self::Event2 | Self::Trap => 12,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
/// Service request line of a module. Line n of CCU4x is NVIC node `CCU4x_n`.
pub enum ServiceRequest {
    Sr0 = 0,
    Sr1 = 1,
    Sr2 = 2,
    Sr3 = 3,
}

const NODES: [[Interrupt; 4]; 4] = [
    [Interrupt::CCU40_0, Interrupt::CCU40_1, Interrupt::CCU40_2, Interrupt::CCU40_3],
    [Interrupt::CCU41_0, Interrupt::CCU41_1, Interrupt::CCU41_2, Interrupt::CCU41_3],
    [Interrupt::CCU42_0, Interrupt::CCU42_1, Interrupt::CCU42_2, Interrupt::CCU42_3],
    [Interrupt::CCU43_0, Interrupt::CCU43_1, Interrupt::CCU43_2, Interrupt::CCU43_3],
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// A set of shadow transfer requests, as written to `GCSS` and read back from `GCST`.
pub struct ShadowTransfer(u32);

impl ShadowTransfer {
    /// Period and compare values of a slice.
    pub const fn period_compare(slice: Slice) -> Self {
        Self(1 << (4 * slice as u32))
    }

    /// Dither compare value of a slice.
    pub const fn dither(slice: Slice) -> Self {
        Self(1 << (4 * slice as u32 + 1))
    }

    /// Prescaler value of a slice.
    pub const fn prescaler(slice: Slice) -> Self {
        Self(1 << (4 * slice as u32 + 2))
    }

    pub const fn bits(self) -> u32 {
        self.0
    }
}

impl BitOr for ShadowTransfer {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

#[derive(Clone, Copy, Debug)]
/// Initial slice configuration for compare mode. Fields that aren't set here keep their reset
/// values.
pub struct CompareConfig {
    pub count_mode: CountMode,
    /// Stop after a single period.
    pub monoshot: bool,
    /// Do a shadow transfer whenever the timer is cleared by software.
    pub shadow_transfer_on_clear: bool,
    pub prescaler_mode: PrescalerMode,
    pub prescaler: Prescaler,
    /// Compare value for the floating prescaler, 0 - 15.
    pub float_limit: u8,
    /// Dither compare value, 0 - 15.
    pub dither_limit: u8,
    pub passive_level: PassiveLevel,
    /// Concatenate this slice's timer with the previous slice's.
    pub timer_concatenation: bool,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            count_mode: CountMode::EdgeAligned,
            monoshot: false,
            shadow_transfer_on_clear: false,
            prescaler_mode: PrescalerMode::Normal,
            prescaler: Prescaler::Div1,
            float_limit: 0,
            dither_limit: 0,
            passive_level: PassiveLevel::Low,
            timer_concatenation: false,
        }
    }
}

/// Represents a CCU4 module's kernel registers.
pub struct Ccu4<R> {
    regs: R,
    instance: Instance,
}

impl<R> Ccu4<R>
where
    R: Deref<Target = ccu4::RegisterBlock>,
{
    /// Bring the module up: enable the CCU clock, ungate the module and release its reset,
    /// start the prescaler, and select the multi-channel shadow transfer action. All slices are
    /// left idle; use `enable_clock` for each slice you use.
    pub fn new<C, S>(
        regs: R,
        instance: Instance,
        mcs_action: McsAction,
        scu: &mut Scu<C, S>,
    ) -> Self
    where
        C: Deref<Target = scu_clk::RegisterBlock>,
        S: Deref<Target = scu_reset::RegisterBlock>,
    {
        scu.enable_clock(Clock::Ccu);
        scu.enable_peripheral(instance.peripheral());

        let result = Self { regs, instance };

        result.start_prescaler();

        unsafe {
            result.regs.gctrl.modify(|r| {
                (r & !GCTRL_MSDE_MSK) | ((mcs_action as u32) << GCTRL_MSDE_POS)
            });
        }

        result
    }

    pub fn instance(&self) -> Instance {
        self.instance
    }

    /// Start the prescaler; no slice counts without it.
    pub fn start_prescaler(&self) {
        unsafe { self.regs.gidlc.write(GIDLC_SPRB) };
    }

    pub fn stop_prescaler(&self) {
        unsafe { self.regs.gidls.write(GIDLS_CPRB) };
    }

    /// Take a slice out of idle so it can count.
    pub fn enable_clock(&self, slice: Slice) {
        unsafe { self.regs.gidlc.write(1 << slice as u32) };
    }

    /// Put a slice into idle.
    pub fn disable_clock(&self, slice: Slice) {
        unsafe { self.regs.gidls.write(1 << slice as u32) };
    }

    pub fn is_idle(&self, slice: Slice) -> bool {
        self.regs.gstat.read() & (1 << slice as u32) != 0
    }

    /// Request shadow transfers. Pass several with `|`, eg
    /// `ShadowTransfer::period_compare(Slice::S3) | ShadowTransfer::prescaler(Slice::S3)`.
    pub fn enable_shadow_transfer(&self, transfer: ShadowTransfer) {
        unsafe { self.regs.gcss.write(transfer.bits()) };
    }

    /// Withdraw shadow transfer requests that haven't happened yet.
    pub fn cancel_shadow_transfer(&self, transfer: ShadowTransfer) {
        unsafe { self.regs.gcsc.write(transfer.bits()) };
    }

    pub fn shadow_transfer_pending(&self, transfer: ShadowTransfer) -> bool {
        self.regs.gcst.read() & transfer.bits() != 0
    }

    /// Block until the requested transfers have happened. Returns `Error::RegisterUnchanged` if
    /// they're still pending after `MAX_ITERS` polls, eg because the slice is running with a
    /// long period.
    pub fn wait_shadow_transfer(&self, transfer: ShadowTransfer) -> Result<()> {
        bounded_loop!(
            self.shadow_transfer_pending(transfer),
            Error::RegisterUnchanged
        );
        Ok(())
    }

    /// NVIC interrupt for a service request line of this module.
    pub fn interrupt(&self, sr: ServiceRequest) -> Interrupt {
        NODES[self.instance as usize][sr as usize]
    }
}

/// Represents one timer slice of a CCU4 module. Borrows the module, since reprogramming the
/// period requires its shadow transfer control.
pub struct Ccu4Slice<'a, R, S> {
    regs: S,
    module: &'a Ccu4<R>,
    slice: Slice,
}

impl<'a, R, S> Ccu4Slice<'a, R, S>
where
    R: Deref<Target = ccu4::RegisterBlock>,
    S: Deref<Target = ccu4_cc4::RegisterBlock>,
{
    /// Wrap a slice's register block. `regs` must be the block of `slice` in `module`.
    pub fn new(regs: S, module: &'a Ccu4<R>, slice: Slice) -> Self {
        Self {
            regs,
            module,
            slice,
        }
    }

    pub fn slice(&self) -> Slice {
        self.slice
    }

    /// Configure the slice for compare mode. The prescaler value takes effect on the next
    /// prescaler shadow transfer.
    pub fn compare_init(&mut self, cfg: &CompareConfig) -> Result<()> {
        if cfg.float_limit > 0xF {
            return Err(Error::Ccu4Error(Ccu4Error::FloatLimit));
        }
        if cfg.dither_limit > 0xF {
            return Err(Error::Ccu4Error(Ccu4Error::DitherLimit));
        }

        let tc = cfg.count_mode as u32
            | (cfg.monoshot as u32) << TC_TSSM_POS
            | (cfg.shadow_transfer_on_clear as u32) << TC_CLST_POS
            | (cfg.prescaler_mode as u32) << TC_FPE_POS;

        unsafe {
            self.regs.tc.write(tc);
            self.regs.dits.write(cfg.dither_limit as u32);
            self.regs.psl.write(cfg.passive_level as u32);
            self.regs.psc.write(cfg.prescaler as u32);
            self.regs.fpcs.write(cfg.float_limit as u32);
            self.regs.cmc.modify(|r| {
                if cfg.timer_concatenation {
                    r | CMC_TCE
                } else {
                    r & !CMC_TCE
                }
            });
        }

        Ok(())
    }

    /// Set the period shadow value, in timer ticks. With edge-aligned counting the period is
    /// `value + 1` ticks.
    pub fn set_period_match(&mut self, value: u16) {
        unsafe { self.regs.prs.write(value as u32) };
    }

    /// The period value currently in use; the shadow value only shows up here after a transfer.
    pub fn period_match(&self) -> u16 {
        self.regs.pr.read() as u16
    }

    /// Set the compare shadow value, in timer ticks.
    pub fn set_compare_match(&mut self, value: u16) {
        unsafe { self.regs.crs.write(value as u32) };
    }

    pub fn timer_value(&self) -> u16 {
        self.regs.timer.read() as u16
    }

    /// Start counting.
    pub fn start(&mut self) {
        unsafe { self.regs.tcset.write(TCSET_TRBS) };
    }

    /// Stop counting. The timer keeps its value.
    pub fn stop(&mut self) {
        unsafe { self.regs.tcclr.write(TCCLR_TRBC) };
    }

    /// Reset the timer value to 0.
    pub fn clear(&mut self) {
        unsafe { self.regs.tcclr.write(TCCLR_TCC) };
    }

    pub fn is_running(&self) -> bool {
        self.regs.tcst.read() & TCST_TRB != 0
    }

    /// Route an event to one of the module's service request lines.
    pub fn set_interrupt_node(&mut self, event: SliceEvent, sr: ServiceRequest) {
        let pos = event.srs_pos();
        unsafe {
            self.regs
                .srs
                .modify(|r| (r & !(0b11 << pos)) | ((sr as u32) << pos));
        }
    }

    /// Enable a specific type of slice interrupt.
    pub fn enable_event(&mut self, event: SliceEvent) {
        unsafe { self.regs.inte.modify(|r| r | 1 << event as u32) };
    }

    pub fn disable_event(&mut self, event: SliceEvent) {
        unsafe { self.regs.inte.modify(|r| r & !(1 << event as u32)) };
    }

    /// Clear the event's flag in `INTS`. Service requests are pulses, so the interrupt fires on
    /// the next event whether or not this is called.
    pub fn clear_event(&mut self, event: SliceEvent) {
        unsafe { self.regs.swr.write(1 << event as u32) };
    }

    pub fn event_pending(&self, event: SliceEvent) -> bool {
        self.regs.ints.read() & (1 << event as u32) != 0
    }

    /// NVIC interrupt for a service request line of the parent module.
    pub fn interrupt(&self, sr: ServiceRequest) -> Interrupt {
        self.module.interrupt(sr)
    }

    /// Shadow transfers for this slice's period, compare and prescaler values.
    fn shadow_transfer(&self) -> ShadowTransfer {
        ShadowTransfer::period_compare(self.slice) | ShadowTransfer::prescaler(self.slice)
    }
}

impl<R, S> PeriodTimer for Ccu4Slice<'_, R, S>
where
    R: Deref<Target = ccu4::RegisterBlock>,
    S: Deref<Target = ccu4_cc4::RegisterBlock>,
{
    fn reload_period(&mut self, period: u16) {
        // With the timer stopped, the transfer happens right away rather than at the next
        // period match.
        self.stop();
        self.set_period_match(period);
        self.module.enable_shadow_transfer(self.shadow_transfer());
        self.start();
    }
}
