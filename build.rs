use std::{env, fs::File, io::Write, path::PathBuf};

use cfg_aliases::cfg_aliases;

fn main() {
    cfg_aliases! {
        // Ports 7 through 9 only bond out on the 196-pin XMC4700 and XMC4800.
        ports_7_9: { any(feature = "xmc4700", feature = "xmc4800") },
    }

    // `cortex-m-rt` looks for `device.x` on the linker search path when its `device` feature is
    // on; it carries the weak interrupt handler aliases for our vector table.
    if env::var_os("CARGO_FEATURE_RT").is_some() {
        let out = PathBuf::from(env::var_os("OUT_DIR").unwrap());
        File::create(out.join("device.x"))
            .unwrap()
            .write_all(include_bytes!("device.x"))
            .unwrap();
        println!("cargo:rustc-link-search={}", out.display());
        println!("cargo:rerun-if-changed=device.x");
    }
    println!("cargo:rerun-if-changed=build.rs");
}
