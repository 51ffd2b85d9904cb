// Traits used across the library. Could be used more generally than in this lib.

/// A periodic timer whose period can be changed while it's in use.
pub trait PeriodTimer {
    /// Stop the timer, load a new period in timer ticks, and restart it. The new period
    /// must be in effect by the time the timer runs again.
    fn reload_period(&mut self, period: u16);
}

/// An output that can be flipped without knowing its current level.
pub trait ToggleOutput {
    fn toggle(&mut self);
}

/// A digital input that reads as active when its pin is low, eg a button to ground.
pub trait ActiveLow {
    fn is_active(&self) -> bool;
}
