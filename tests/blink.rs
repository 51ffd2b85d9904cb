//! Blink behavior on fake pins and a fake timer.

use xmc4_hal::{
    blink::{AdjusterState, BlinkConfig, Buttons, IntervalAdjuster, on_period_match},
    traits::{ActiveLow, PeriodTimer, ToggleOutput},
};

const A: Buttons = Buttons {
    decrease: true,
    increase: false,
};
const B: Buttons = Buttons {
    decrease: false,
    increase: true,
};
const BOTH: Buttons = Buttons {
    decrease: true,
    increase: true,
};
const NONE: Buttons = Buttons::RELEASED;

#[derive(Default)]
struct FakeTimer {
    period: u16,
    reloads: u32,
}

impl PeriodTimer for FakeTimer {
    fn reload_period(&mut self, period: u16) {
        self.period = period;
        self.reloads += 1;
    }
}

#[derive(Default)]
struct FakeLed {
    high: bool,
}

impl ToggleOutput for FakeLed {
    fn toggle(&mut self) {
        self.high = !self.high;
    }
}

/// Pin level; buttons pull to ground when pressed.
struct FakeButton {
    level_high: bool,
}

impl ActiveLow for FakeButton {
    fn is_active(&self) -> bool {
        !self.level_high
    }
}

fn adjuster() -> IntervalAdjuster {
    IntervalAdjuster::new(BlinkConfig::default()).unwrap()
}

/// Press and release.
fn click(adj: &mut IntervalAdjuster, buttons: Buttons) {
    adj.poll(buttons);
    adj.poll(NONE);
}

#[test]
fn starts_at_one_second() {
    let adj = adjuster();
    assert_eq!(adj.interval_ms(), 1_000);
    assert_eq!(adj.period_counts(), 35_155);
    assert_eq!(adj.state(), AdjusterState::Idle);
}

#[test]
fn period_conversion() {
    let cfg = BlinkConfig::default();
    assert_eq!(cfg.period_counts(1_000), 35_155);
    assert_eq!(cfg.period_counts(100), 3_515);
    assert_eq!(cfg.period_counts(1_500), 52_732);
}

#[test]
fn interval_stays_on_the_grid() {
    let mut adj = adjuster();

    // Small LCG; the sequence just has to be long and mixed.
    let mut seed: u32 = 0x1234_5678;
    for _ in 0..5_000 {
        seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        let buttons = match seed >> 30 {
            0 => A,
            1 => B,
            2 => BOTH,
            _ => NONE,
        };
        adj.poll(buttons);

        let ms = adj.interval_ms();
        assert!((100..=1_500).contains(&ms), "interval {ms} out of range");
        assert_eq!(ms % 100, 0);
    }
}

#[test]
fn decrease_floors_at_100() {
    let mut adj = adjuster();

    for _ in 0..9 {
        click(&mut adj, A);
    }
    assert_eq!(adj.interval_ms(), 100);

    for _ in 0..5 {
        click(&mut adj, A);
        assert_eq!(adj.interval_ms(), 100);
    }
    assert_eq!(adj.period_counts(), 3_515);
}

#[test]
fn increase_caps_at_1500() {
    let mut adj = adjuster();

    for _ in 0..5 {
        click(&mut adj, B);
    }
    assert_eq!(adj.interval_ms(), 1_500);

    for _ in 0..5 {
        click(&mut adj, B);
        assert_eq!(adj.interval_ms(), 1_500);
    }
}

#[test]
fn holding_counts_once() {
    let mut adj = adjuster();

    assert_eq!(adj.poll(A), Some(31_639));
    for _ in 0..10_000 {
        assert_eq!(adj.poll(A), None);
    }
    assert_eq!(adj.interval_ms(), 900);
    assert_eq!(adj.state(), AdjusterState::Pressed);

    // Switching buttons without releasing both doesn't count either.
    assert_eq!(adj.poll(B), None);
    assert_eq!(adj.poll(BOTH), None);
    assert_eq!(adj.interval_ms(), 900);

    assert_eq!(adj.poll(NONE), None);
    assert_eq!(adj.state(), AdjusterState::Idle);
    assert!(adj.poll(B).is_some());
    assert_eq!(adj.interval_ms(), 1_000);
}

#[test]
fn both_pressed_acts_as_decrease() {
    let mut both = adjuster();
    let mut a = adjuster();

    for _ in 0..3 {
        click(&mut both, BOTH);
        click(&mut a, A);
        assert_eq!(both.interval_ms(), a.interval_ms());
    }
    assert_eq!(both.interval_ms(), 700);
}

#[test]
fn presses_reprogram_the_timer() {
    let mut adj = adjuster();
    let mut timer = FakeTimer::default();

    assert_eq!(adj.poll_and_apply(B, &mut timer), Some(38_670));
    assert_eq!(timer.period, 38_670);
    assert_eq!(adj.poll_and_apply(B, &mut timer), None);
    assert_eq!(adj.poll_and_apply(NONE, &mut timer), None);
    assert_eq!(timer.reloads, 1);

    // A press at a bound still reloads, with the clamped value.
    let mut adj = IntervalAdjuster::new(BlinkConfig {
        initial_ms: 1_500,
        ..Default::default()
    })
    .unwrap();
    let mut timer = FakeTimer::default();
    adj.poll_and_apply(B, &mut timer);
    assert_eq!(timer.reloads, 1);
    assert_eq!(timer.period, 52_732);
}

#[test]
fn buttons_read_active_low() {
    let up = FakeButton { level_high: true };
    let down = FakeButton { level_high: false };

    assert_eq!(Buttons::read(&up, &up), NONE);
    assert_eq!(Buttons::read(&down, &up), A);
    assert_eq!(Buttons::read(&up, &down), B);
    assert_eq!(Buttons::read(&down, &down), BOTH);
}

#[test]
fn even_period_matches_restore_the_led() {
    for n in [1, 2, 7, 500] {
        let mut led = FakeLed::default();
        for i in 0..2 * n {
            on_period_match(&mut led);
            assert_eq!(led.high, i % 2 == 0);
        }
        assert!(!led.high);
    }
}
