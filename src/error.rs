//! Common error definitions.

use crate::{blink::BlinkError, ccu4::Ccu4Error};

macro_rules! impl_from_error {
    ($error:ident) => {
        impl From<$error> for Error {
            fn from(error: $error) -> Self {
                Self::$error(error)
            }
        }
    };
}

/// Alias for Result<T, Error>.
pub type Result<T> = core::result::Result<T, Error>;

/// Collection of all errors that can occur.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Occurs when an expected change of a register doesn't happen in time.
    ///
    /// This is returned when a bounded loop exceeds its allotted iteration count.
    RegisterUnchanged,
    /// Timer (CCU4) configuration errors.
    Ccu4Error(Ccu4Error),
    /// Blink interval configuration errors.
    BlinkError(BlinkError),
}

impl_from_error!(Ccu4Error);
impl_from_error!(BlinkError);
