//! Load Test Runner
//!
//! The concurrency tests below are quick enough to run in CI. The sustained
//! throughput test is marked `#[ignore]`:
//! ```bash
//! cargo test --test load_tests -- --ignored --test-threads=1
//! ```

mod common;
mod load;
