//! Relax Kit blinky: LED1 (P5.9) toggles on each CCU43 slice 3 period match, starting at 1 s.
//! Button1 (P15.13) shortens the interval by 100 ms, down to 100 ms. Button2 (P15.12) lengthens
//! it by 100 ms, up to 1.5 s.
//!
//! Assumes the startup code left fSYS and fCCU at 144 MHz.

#![no_std]
#![no_main]

use cortex_m_rt::entry; // The runtime

use hal::{
    self,
    blink::{self, BlinkConfig, Buttons, IntervalAdjuster},
    ccu4::{
        CompareConfig, Ccu4, Ccu4Slice, Instance, McsAction, Prescaler, ServiceRequest,
        ShadowTransfer, Slice, SliceEvent,
    },
    gpio::{Pin, PinMode, Port},
    make_globals, access_global, init_globals, setup_nvic,
    pac::{self, interrupt},
    scu::Scu,
};

use defmt_rtt as _;
// global logger
use panic_probe as _;

make_globals!((LED, Pin));

#[entry]
fn main() -> ! {
    // Set up CPU peripherals
    let mut cp = cortex_m::Peripherals::take().unwrap();
    // Set up microcontroller peripherals
    let dp = pac::Peripherals::take().unwrap();

    defmt::println!("Blinky on {}", hal::CHIP);

    let mut scu = Scu::new(dp.SCU_CLK, dp.SCU_RESET);

    let ccu43 = Ccu4::new(dp.CCU43, Instance::Ccu43, McsAction::TransferPrCr, &mut scu);
    ccu43.enable_clock(Slice::S3);

    let blink_cfg = BlinkConfig::default();
    let mut adjuster = IntervalAdjuster::new(blink_cfg).unwrap();

    let mut timer = Ccu4Slice::new(dp.CCU43_CC43, &ccu43, Slice::S3);
    timer
        .compare_init(&CompareConfig {
            prescaler: Prescaler::Div4096,
            ..Default::default()
        })
        .unwrap();
    timer.set_period_match(adjuster.period_counts());

    ccu43.enable_shadow_transfer(
        ShadowTransfer::period_compare(Slice::S3) | ShadowTransfer::prescaler(Slice::S3),
    );

    timer.set_interrupt_node(SliceEvent::PeriodMatch, ServiceRequest::Sr1);
    timer.enable_event(SliceEvent::PeriodMatch);

    timer.clear();
    timer.start();

    let led = Pin::new(Port::P5, 9, PinMode::Output);
    init_globals!((LED, led));

    // Both buttons pull to ground. P15 is an analog port, so its digital input path has to be
    // switched on.
    let mut button1 = Pin::new(Port::P15, 13, PinMode::Input);
    button1.enable_digital_input();
    let mut button2 = Pin::new(Port::P15, 12, PinMode::Input);
    button2.enable_digital_input();

    setup_nvic!([(CCU43_1, 63)], cp);

    loop {
        adjuster.poll_and_apply(Buttons::read(&button1, &button2), &mut timer);
    }
}

#[interrupt]
/// CCU43 slice 3 period match.
fn CCU43_1() {
    critical_section::with(|cs| {
        access_global!(LED, led, cs);
        blink::on_period_match(led);
    });
}

// same panicking *behavior* as `panic-probe` but doesn't print a panic message
// this prevents the panic message being printed *twice* when `defmt::panic` is invoked
#[defmt::panic_handler]
fn panic() -> ! {
    cortex_m::asm::udf()
}
