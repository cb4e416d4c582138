//! Typed argument parsing with clap.
//!
//! ```rust,ignore
//! use clap::Parser;
//!
//! #[derive(Parser)]
//! struct BanArgs {
//!     user: String,
//!     #[arg(short, long, default_value_t = 0)]
//!     days: u8,
//! }
//!
//! let ban = Command::new(["ban"])?.executor(|inv, _| async move {
//!     let args: BanArgs = parse_args(&inv)?;
//!     // ...
//!     Ok(())
//! });
//! ```
//!
//! Parse failures become [`CommandError::InvalidUsage`], so they reach the
//! command's `InvalidUsage` hook like any other usage error.

use clap::Parser;

use crate::error::{CommandError, UsageError};
use crate::invocation::Invocation;

/// Parses the invocation's arguments into `T`.
///
/// The trigger is used as the binary name, so clap's messages read
/// naturally (`error: the following required arguments were not provided`
/// followed by `Usage: ban <USER>`).
pub fn parse_args<T: Parser>(invocation: &Invocation) -> Result<T, CommandError> {
    let argv = std::iter::once(invocation.trigger())
        .chain(invocation.args().iter().map(String::as_str));

    T::try_parse_from(argv).map_err(|e| {
        let message = e.render().to_string();
        CommandError::InvalidUsage(UsageError::new(message.trim_end()))
    })
}
