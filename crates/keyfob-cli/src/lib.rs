//! keyfob CLI library
//!
//! Config-file handling for the `keyfob` binary. The verification logic
//! itself lives in `keyfob-otp`.

pub mod config;
