// SPDX-License-Identifier: MIT OR Apache-2.0
#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod command;
pub mod drain;
pub mod error;
pub mod output;

pub use command::LocalCommand;
pub use drain::drain_pair;
pub use error::{ExecError, StreamKind};
pub use output::trim_output;
