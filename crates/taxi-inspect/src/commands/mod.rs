//! Subcommand implementations.
//!
//! Each command writes to a caller-supplied sink so it can be exercised
//! without touching the process's stdout.

pub mod codes;
pub mod decode;
pub mod encode;

use std::io::Write;

use serde::Serialize;

use crate::error::InspectResult;

/// Writes one value as a line of JSON.
pub(crate) fn write_json<T: Serialize>(out: &mut impl Write, value: &T, pretty: bool) -> InspectResult<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    writeln!(out)?;
    Ok(())
}
