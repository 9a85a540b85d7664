//! `codes`: list every status family.

use std::io::Write;

use serde::Serialize;

use crate::error::InspectResult;

/// Status codes grouped by family, shaped like the dashboard's `codes` reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Codes {
    pub message_codes: Vec<i32>,
    pub warning_codes: Vec<i32>,
    pub error_codes: Vec<i32>,
}

impl Codes {
    pub fn collect() -> Self {
        Self {
            message_codes: taxi_protocol::message_codes(),
            warning_codes: taxi_protocol::warning_codes(),
            error_codes: taxi_protocol::error_codes(),
        }
    }
}

pub fn run(pretty: bool, out: &mut impl Write) -> InspectResult<()> {
    super::write_json(out, &Codes::collect(), pretty)
}
