//! `decode`: turn captured bytes back into JSON records.

use std::fs::File;
use std::io::{self, BufReader, Read, Write};

use taxi_protocol::{FrameReader, RecordKind};

use crate::cli::DecodeArgs;
use crate::config::InspectConfig;
use crate::error::{InspectError, InspectResult};

/// Runs `decode`, returning how many records were printed.
pub fn run(args: &DecodeArgs, config: &InspectConfig, out: &mut impl Write) -> InspectResult<usize> {
    let kind = args.record_kind().ok_or_else(|| match &args.topic {
        Some(topic) => InspectError::Usage(format!("topic {topic:?} carries no known record")),
        None => InspectError::Usage("pass --kind or --topic".to_string()),
    })?;
    let framed = args.framed || config.output.framed;
    let pretty = args.pretty || config.output.pretty;

    let input: Box<dyn Read> = if args.input.as_os_str() == "-" {
        Box::new(io::stdin().lock())
    } else {
        Box::new(File::open(&args.input)?)
    };

    tracing::debug!(%kind, framed, input = %args.input.display(), "decoding");
    decode_stream(BufReader::new(input), kind, framed, pretty, out)
}

/// Decodes either one bare record or a stream of frames from `input`.
pub fn decode_stream<R: Read>(
    mut input: R,
    kind: RecordKind,
    framed: bool,
    pretty: bool,
    out: &mut impl Write,
) -> InspectResult<usize> {
    if !framed {
        let mut bytes = Vec::new();
        input.read_to_end(&mut bytes)?;
        let record = taxi_protocol::decode(kind, &bytes)?;
        super::write_json(out, &record, pretty)?;
        return Ok(1);
    }

    let mut reader = FrameReader::new(input);
    let mut count = 0;
    while let Some(record) = reader.read_record(kind)? {
        super::write_json(out, &record, pretty)?;
        count += 1;
    }
    tracing::info!(%kind, count, "decoded framed records");
    Ok(count)
}
