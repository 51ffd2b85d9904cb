//! This is an internal module that contains utility functionality used by other modules.

/// Spin while `$cond` holds, returning `Err($err)` from the enclosing function once
/// `MAX_ITERS` iterations pass without it clearing.
macro_rules! bounded_loop {
    ($cond:expr, $err:expr) => {{
        let mut i = 0;
        while $cond {
            i += 1;
            if i >= crate::MAX_ITERS {
                #[cfg(feature = "defmt")]
                defmt::warn!("Register unchanged after {} iterations", i);
                return Err($err);
            }
        }
    }};
}

pub(crate) use bounded_loop;

/// Read and write register cells of zeroed, in-memory register blocks, bypassing their access
/// types. Write-only registers keep the last value written since there's no hardware behind
/// them.
#[cfg(test)]
pub(crate) mod test_util {
    pub fn peek<T>(reg: &T) -> u32 {
        unsafe { core::ptr::read_volatile(reg as *const T as *const u32) }
    }

    /// Register cells wrap an `UnsafeCell<u32>`; write through it.
    pub fn poke<T>(reg: &T, val: u32) {
        let cell = reg as *const T as *const core::cell::UnsafeCell<u32>;
        unsafe { core::ptr::write_volatile((*cell).get(), val) }
    }
}

#[cfg(test)]
mod tests {
    use super::test_util::{peek, poke};
    use volatile_register::{RO, WO};

    #[test]
    fn poke_reaches_read_only_and_write_only_cells() {
        let status: RO<u32> = unsafe { core::mem::zeroed() };
        let request: WO<u32> = unsafe { core::mem::zeroed() };

        poke(&status, 0x8000_0001);
        assert_eq!(status.read(), 0x8000_0001);

        unsafe { request.write(0x1_0200) };
        assert_eq!(peek(&request), 0x1_0200);
        poke(&request, 7);
        assert_eq!(peek(&request), 7);
    }
}
