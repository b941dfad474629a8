//! Structured logging facility for Grove
//!
//! - One initialization point, `init(profile)`, safe to call repeatedly
//! - `log_op_start!` / `log_op_end!` / `log_op_error!` bracket every
//!   mutating membership operation with the canonical schema fields
//! - An in-memory capture layer for asserting on emitted events in tests
//!
//! ```rust
//! use grove_core::logging_facility::{init, Profile};
//!
//! init(Profile::from_env());
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile, PROFILE_ENV_VAR};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
