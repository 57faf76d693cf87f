#![allow(dead_code)]

pub mod supply;
pub mod token;

/// Routes `log` records to the test harness, once per test binary.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
