//! `encode-message`: build a dispatch message and write its bytes.

use std::fs::File;
use std::io::{self, Write};

use taxi_protocol::{Coordinate, FrameWriter, Identifier, Message, NONE_ID};

use crate::cli::EncodeMessageArgs;
use crate::config::InspectConfig;
use crate::error::{InspectError, InspectResult};

const FRAME_HEADER_SIZE: usize = 4;

/// Runs `encode-message`, returning how many bytes were written.
pub fn run(args: &EncodeMessageArgs, config: &InspectConfig) -> InspectResult<usize> {
    let message = build_message(args)?;
    let framed = args.framed || config.output.framed;

    let written = if args.output.as_os_str() == "-" {
        let mut stdout = io::stdout().lock();
        let written = write_message(&message, framed, &mut stdout)?;
        stdout.flush()?;
        written
    } else {
        let mut file = File::create(&args.output)?;
        write_message(&message, framed, &mut file)?
    };

    tracing::info!(subject = %message.subject(), taxi = message.taxi_id(), written, "encoded message");
    Ok(written)
}

/// Builds the message either from `--json` or from the individual flags.
pub fn build_message(args: &EncodeMessageArgs) -> InspectResult<Message> {
    if let Some(json) = &args.json {
        return Ok(serde_json::from_str(json)?);
    }

    let subject = args
        .subject
        .ok_or_else(|| InspectError::Usage("pass --subject or --json".to_string()))?;
    let mut builder = Message::builder().subject(subject).taxi_id(args.taxi_id);
    if let Some(id) = args.id.as_deref().filter(|id| id.as_bytes() != [NONE_ID].as_slice()) {
        builder = builder.id(id.parse::<Identifier>()?);
    }
    if let (Some(x), Some(y)) = (args.x, args.y) {
        builder = builder.coord(Coordinate::new(x, y));
    }
    Ok(builder.build()?)
}

/// Writes the encoded message, optionally inside a frame.
pub fn write_message(message: &Message, framed: bool, out: &mut impl Write) -> InspectResult<usize> {
    let bytes = message.encode();
    if framed {
        FrameWriter::new(&mut *out).write_frame(&bytes)?;
        return Ok(FRAME_HEADER_SIZE + bytes.len());
    }
    out.write_all(&bytes)?;
    Ok(bytes.len())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use taxi_protocol::{ProtocolError, Subject};

    use super::*;

    fn flags(subject: Option<Subject>) -> EncodeMessageArgs {
        EncodeMessageArgs {
            json: None,
            subject,
            id: None,
            taxi_id: 0,
            x: None,
            y: None,
            framed: false,
            output: PathBuf::from("-"),
        }
    }

    #[test]
    fn go_to_from_flags() {
        let args = EncodeMessageArgs {
            taxi_id: 3,
            x: Some(4),
            y: Some(5),
            ..flags(Some(Subject::GoTo))
        };
        let message = build_message(&args).unwrap();
        assert_eq!(
            message.encode(),
            [0, 0, 0, 0, b'-', 3, 0, 4, 0, 0, 0, 5, 0, 0, 0]
        );
    }

    #[test]
    fn dash_id_means_none() {
        let args = EncodeMessageArgs {
            id: Some("-".to_string()),
            ..flags(Some(Subject::Stop))
        };
        assert_eq!(build_message(&args).unwrap().id(), None);
    }

    #[test]
    fn customer_subject_requires_id() {
        let err = build_message(&flags(Some(Subject::DisconnectCustomer))).unwrap_err();
        assert!(matches!(
            err,
            InspectError::Protocol(ProtocolError::MissingField("id"))
        ));
    }

    #[test]
    fn bad_id_is_rejected() {
        let args = EncodeMessageArgs {
            id: Some("ab".to_string()),
            ..flags(Some(Subject::DisconnectCustomer))
        };
        assert!(matches!(
            build_message(&args),
            Err(InspectError::Protocol(ProtocolError::InvalidIdentifier(_)))
        ));
    }

    #[test]
    fn json_input() {
        let args = EncodeMessageArgs {
            json: Some(r#"{"code":0,"id":"-","taxiId":3,"coord":{"x":4,"y":5}}"#.to_string()),
            ..flags(None)
        };
        let message = build_message(&args).unwrap();
        assert_eq!(message.subject(), Subject::GoTo);
        assert_eq!(message.taxi_id(), 3);
        assert_eq!(message.coord(), Coordinate::new(4, 5));
    }

    #[test]
    fn json_input_follows_subject_rules() {
        let args = EncodeMessageArgs {
            json: Some(r#"{"code":5,"id":"-","taxiId":0,"coord":{"x":0,"y":0}}"#.to_string()),
            ..flags(None)
        };
        match build_message(&args) {
            Err(InspectError::Json(err)) => {
                assert!(err.to_string().starts_with("missing required field: id"), "{err}");
            }
            other => panic!("expected a rejected message, got {other:?}"),
        }
    }

    #[test]
    fn malformed_json_is_json_error() {
        let args = EncodeMessageArgs {
            json: Some("{\"code\":".to_string()),
            ..flags(None)
        };
        assert!(matches!(build_message(&args), Err(InspectError::Json(_))));
    }

    #[test]
    fn framed_output_has_length_prefix() {
        let message = build_message(&flags(Some(Subject::Stop))).unwrap();
        let mut out = Vec::new();
        let written = write_message(&message, true, &mut out).unwrap();
        assert_eq!(written, 19);
        assert_eq!(out.len(), 19);
        assert_eq!(&out[..4], &15u32.to_le_bytes());
    }

    #[test]
    fn run_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stop.bin");
        let args = EncodeMessageArgs {
            taxi_id: 7,
            output: path.clone(),
            ..flags(Some(Subject::Stop))
        };
        let written = run(&args, &InspectConfig::default()).unwrap();
        assert_eq!(written, 15);

        let bytes = std::fs::read(&path).unwrap();
        let decoded = Message::decode(&bytes).unwrap();
        assert_eq!(decoded.subject(), Subject::Stop);
        assert_eq!(decoded.taxi_id(), 7);
    }
}
