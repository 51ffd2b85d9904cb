//! Button-adjusted LED blink period, as used by the Relax Kit blinky demo.
//!
//! A CCU4 slice raises a period-match interrupt once per blink interval, and the handler
//! toggles the LED with [`on_period_match`]. The main loop polls two buttons through an
//! [`IntervalAdjuster`]: one press shortens the interval by a step, the other lengthens it,
//! both within fixed bounds. Holding a button counts as one press; both buttons have to be
//! released before the next press registers. There's no time-based debouncing.

use crate::{
    error::Result,
    traits::{ActiveLow, PeriodTimer, ToggleOutput},
};

/// CCU ticks per second after the 4096 prescaler, with fCCU at 144 MHz, as calibrated for the
/// Relax Kit.
pub const DEFAULT_TICKS_PER_SECOND: u32 = 35_155;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkError {
    /// The minimum interval is above the maximum.
    EmptyRange,
    /// The initial interval is outside the min/max range.
    InitialOutOfRange,
    /// The step is 0 ms.
    ZeroStep,
    /// The step is wider than the min/max range.
    StepTooLarge,
    /// The timer tick rate is 0.
    ZeroTickRate,
    /// The maximum interval doesn't fit the 16-bit period register at this tick rate.
    PeriodOverflow,
}

#[derive(Clone, Copy, Debug)]
/// Interval bounds and timer calibration. All intervals are in milliseconds.
pub struct BlinkConfig {
    pub initial_ms: u32,
    pub min_ms: u32,
    pub max_ms: u32,
    pub step_ms: u32,
    /// Timer ticks per second, after the prescaler.
    pub ticks_per_second: u32,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            initial_ms: 1_000,
            min_ms: 100,
            max_ms: 1_500,
            step_ms: 100,
            ticks_per_second: DEFAULT_TICKS_PER_SECOND,
        }
    }
}

impl BlinkConfig {
    pub fn validate(&self) -> core::result::Result<(), BlinkError> {
        if self.min_ms > self.max_ms {
            return Err(BlinkError::EmptyRange);
        }
        if !(self.min_ms..=self.max_ms).contains(&self.initial_ms) {
            return Err(BlinkError::InitialOutOfRange);
        }
        if self.step_ms == 0 {
            return Err(BlinkError::ZeroStep);
        }
        if self.step_ms > self.max_ms - self.min_ms {
            return Err(BlinkError::StepTooLarge);
        }
        if self.ticks_per_second == 0 {
            return Err(BlinkError::ZeroTickRate);
        }
        if self.ticks(self.max_ms) > u16::MAX as u64 {
            return Err(BlinkError::PeriodOverflow);
        }
        Ok(())
    }

    fn ticks(&self, interval_ms: u32) -> u64 {
        self.ticks_per_second as u64 * interval_ms as u64 / 1_000
    }

    /// Period register value for an interval. Truncates; 1000 ms is 35155 ticks and 100 ms
    /// 3515 with the default calibration. Saturates for intervals a validated config never
    /// produces.
    pub fn period_counts(&self, interval_ms: u32) -> u16 {
        u16::try_from(self.ticks(interval_ms)).unwrap_or(u16::MAX)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Edge-detection state.
pub enum AdjusterState {
    /// Both buttons released; the next press is acted on.
    Idle,
    /// A press was acted on and at least one button is still down.
    Pressed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// One sample of the two buttons. `true` is pressed.
pub struct Buttons {
    /// Shortens the interval. Wins when both are pressed.
    pub decrease: bool,
    /// Lengthens the interval.
    pub increase: bool,
}

impl Buttons {
    pub const RELEASED: Self = Self {
        decrease: false,
        increase: false,
    };

    /// Sample two active-low inputs.
    pub fn read<D: ActiveLow, I: ActiveLow>(decrease: &D, increase: &I) -> Self {
        Self {
            decrease: decrease.is_active(),
            increase: increase.is_active(),
        }
    }

    pub fn any(&self) -> bool {
        self.decrease || self.increase
    }
}

/// Owns the blink interval and the press edge detection. Call `poll` or `poll_and_apply`
/// once per main loop iteration.
pub struct IntervalAdjuster {
    cfg: BlinkConfig,
    interval_ms: u32,
    state: AdjusterState,
}

impl IntervalAdjuster {
    pub fn new(cfg: BlinkConfig) -> Result<Self> {
        cfg.validate()?;

        Ok(Self {
            cfg,
            interval_ms: cfg.initial_ms,
            state: AdjusterState::Idle,
        })
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Period register value for the current interval.
    pub fn period_counts(&self) -> u16 {
        self.cfg.period_counts(self.interval_ms)
    }

    pub fn state(&self) -> AdjusterState {
        self.state
    }

    pub fn config(&self) -> &BlinkConfig {
        &self.cfg
    }

    /// Advance the state machine by one sample. Returns the period to program when a press was
    /// acted on. That includes presses at a bound, where the interval doesn't change.
    pub fn poll(&mut self, buttons: Buttons) -> Option<u16> {
        match (self.state, buttons.any()) {
            (AdjusterState::Idle, true) => {
                self.state = AdjusterState::Pressed;

                self.interval_ms = if buttons.decrease {
                    self.interval_ms
                        .saturating_sub(self.cfg.step_ms)
                        .max(self.cfg.min_ms)
                } else {
                    self.interval_ms
                        .saturating_add(self.cfg.step_ms)
                        .min(self.cfg.max_ms)
                };

                #[cfg(feature = "defmt")]
                defmt::debug!("Blink interval: {} ms", self.interval_ms);

                Some(self.period_counts())
            }
            (AdjusterState::Pressed, false) => {
                self.state = AdjusterState::Idle;
                None
            }
            _ => None,
        }
    }

    /// `poll`, then reprogram the timer if a press was acted on.
    pub fn poll_and_apply<T: PeriodTimer>(
        &mut self,
        buttons: Buttons,
        timer: &mut T,
    ) -> Option<u16> {
        let period = self.poll(buttons)?;
        timer.reload_period(period);
        Some(period)
    }
}

/// Period-match handler body: toggle the LED once.
#[inline(always)]
pub fn on_period_match<P: ToggleOutput>(led: &mut P) {
    led.toggle();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(BlinkConfig::default().validate(), Ok(()));
    }

    #[test]
    fn validation() {
        let cfg = BlinkConfig {
            min_ms: 2_000,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(BlinkError::EmptyRange));

        let cfg = BlinkConfig {
            initial_ms: 50,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(BlinkError::InitialOutOfRange));

        let cfg = BlinkConfig {
            step_ms: 0,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(BlinkError::ZeroStep));

        let cfg = BlinkConfig {
            step_ms: 1_401,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(BlinkError::StepTooLarge));
        let cfg = BlinkConfig {
            initial_ms: 100,
            step_ms: u32::MAX,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(BlinkError::StepTooLarge));
        let cfg = BlinkConfig {
            step_ms: 1_400,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Ok(()));

        let cfg = BlinkConfig {
            ticks_per_second: 0,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(BlinkError::ZeroTickRate));

        // 35155 * 1865 / 1000 = 65564; 1864 ms still fits.
        let cfg = BlinkConfig {
            max_ms: 1_865,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(BlinkError::PeriodOverflow));
        let cfg = BlinkConfig {
            max_ms: 1_864,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn new_rejects_invalid_config() {
        let cfg = BlinkConfig {
            step_ms: 0,
            ..Default::default()
        };
        assert!(matches!(
            IntervalAdjuster::new(cfg),
            Err(Error::BlinkError(BlinkError::ZeroStep))
        ));
    }

    #[test]
    fn period_saturates() {
        let cfg = BlinkConfig::default();
        assert_eq!(cfg.period_counts(1_500), 52_732);
        assert_eq!(cfg.period_counts(10_000), u16::MAX);
    }

    #[test]
    fn unaligned_bounds_clamp() {
        let mut adj = IntervalAdjuster::new(BlinkConfig {
            initial_ms: 150,
            ..Default::default()
        })
        .unwrap();

        let down = Buttons {
            decrease: true,
            increase: false,
        };
        adj.poll(down);
        assert_eq!(adj.interval_ms(), 100);
    }

    #[test]
    fn widest_step_stays_in_range() {
        let mut adj = IntervalAdjuster::new(BlinkConfig {
            initial_ms: 100,
            step_ms: 1_400,
            ..Default::default()
        })
        .unwrap();

        let up = Buttons {
            decrease: false,
            increase: true,
        };
        let down = Buttons {
            decrease: true,
            increase: false,
        };
        for buttons in [up, up, down, down] {
            adj.poll(buttons);
            adj.poll(Buttons::RELEASED);
            assert!((100..=1_500).contains(&adj.interval_ms()));
        }
        assert_eq!(adj.interval_ms(), 100);
    }
}
