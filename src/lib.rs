// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Streaming [JUnit XML report][1] writer for instrumentation test runs.
//!
//! An external test-execution engine drives a [`Listener`] with the lifecycle
//! events of every test it runs, and the [`JUnit`] writer streams them into
//! one report file (or one file per test class), flushing after every test.
//!
//! ```rust,no_run
//! use junit_listener::{
//!     writer::junit::Config, Description, Failure, JUnit, Listener as _,
//!     ListenerExt as _, Log,
//! };
//!
//! # fn main() -> junit_listener::Result<()> {
//! let mut listener = JUnit::new(
//!     Config::multi_file("TEST-__suite__.xml").with_report_dir("reports"),
//! )
//! .tee(Log::new());
//!
//! let test = Description::test("com.example.FooTest", "testBar");
//! listener.test_started(&test)?;
//! listener.test_failure(
//!     &Failure::new(test.clone(), "java.lang.AssertionError")
//!         .with_message("expected true"),
//! );
//! listener.test_finished(&test);
//! listener.shutdown();
//! # Ok(())
//! # }
//! ```
//!
//! [1]: https://llg.cubic.org/docs/junit

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(nonstandard_style, rustdoc::all, trivial_casts, trivial_numeric_casts)]
#![forbid(non_ascii_idents, unsafe_code)]
#![warn(
    clippy::as_conversions,
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro,
    clippy::missing_const_for_fn,
    clippy::missing_docs_in_private_items,
    clippy::str_to_string,
    clippy::todo,
    clippy::unwrap_used,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_results
)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod clock;
pub mod error;
pub mod event;
pub mod listener;
pub mod writer;

#[doc(inline)]
pub use self::{
    clock::Clock,
    error::{Error, Result},
    event::{Description, Failure, Problem},
    listener::{Ext as ListenerExt, Listener, Log, Tee},
    writer::JUnit,
};
