//! Syntax helpers for sharing peripherals with interrupt handlers. These expand in the
//! firmware crate, which must depend on `critical-section`.

/// Syntax helper for getting global variables of the form `Mutex<RefCell<Option>>>` from an
/// interrupt-free context, eg in interrupt handlers.
///
/// Example: `access_global!(LED, led, cs)`
#[macro_export]
macro_rules! access_global {
    ($NAME_GLOBAL:ident, $name_local:ident, $cs:expr) => {
        let mut part1 = $NAME_GLOBAL.borrow($cs).borrow_mut();
        let $name_local = part1.as_mut().unwrap();
    };
}

/// Syntax helper for setting global variables of the form `Mutex<RefCell<Option>>>`.
/// Ideal for non-copy-type variables that can't be initialized immediatiately.
///
/// Example: `make_globals!(
///     (LED, Pin),
/// )`
#[macro_export]
macro_rules! make_globals {
    ($(($NAME:ident, $type:ty)),+ $(,)?) => {
        $(
            static $NAME: ::critical_section::Mutex<core::cell::RefCell<Option<$type>>> = ::critical_section::Mutex::new(core::cell::RefCell::new(None));
        )+
    };
}

/// Initialize one or more globals inside a critical section.
///
/// Example: `init_globals!((LED, led))`
#[macro_export]
macro_rules! init_globals {
    ($(($NAME:ident, $val:expr)),* $(,)?) => {
        ::critical_section::with(|cs| {
            $(
                $NAME.borrow(cs).replace(Some($val));
            )*
        });
    };
}

/// Set priorities and unmask interrupt lines. The second value is a priority level from 0 to
/// 63; lower is more urgent. Example use:
/// setup_nvic!([
///     (CCU43_1, 63),
/// ], cp);
#[macro_export]
macro_rules! setup_nvic {
    (
        [ $( ($int:ident, $prio:expr) ),* $(,)? ],
        $cp:ident
    ) => {
        unsafe {
            $(
                $cp.NVIC.set_priority($crate::pac::Interrupt::$int, $crate::nvic_priority($prio));
            )*
            $(
                cortex_m::peripheral::NVIC::unmask($crate::pac::Interrupt::$int);
            )*
        }
    };
}
