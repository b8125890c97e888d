//! JSON transport for failure records.
//!
//! Failures cross process boundaries as plain records: kind, message and an
//! optional nested cause. Decoding performs no classification checks.
//!
//! Both directions accept cause chains of at most [`MAX_CHAIN_LINKS`]
//! failures, so every record [`encode`] produces can be read back by
//! [`decode`].

use thiserror::Error;

use crate::error::{Failure, GuardedFatalFailure};

/// Longest cause chain, counting the outermost failure, that can be encoded
/// or decoded. Each link is one JSON object level, which keeps records well
/// inside serde_json's nesting limit.
pub const MAX_CHAIN_LINKS: usize = 64;

/// Errors produced while encoding or decoding failures.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The failure could not be serialized.
    #[error("failed to encode failure: {0}")]
    Encode(#[source] serde_json::Error),

    /// The input was not a valid failure record.
    #[error("failed to decode failure: {0}")]
    Decode(#[source] serde_json::Error),

    /// The cause chain is longer than [`MAX_CHAIN_LINKS`].
    #[error("cause chain has more than {max} links")]
    ChainTooLong {
        /// The limit that was exceeded.
        max: usize,
    },
}

fn check_chain_length(failure: &Failure) -> Result<(), CodecError> {
    if failure.chain().take(MAX_CHAIN_LINKS + 1).count() > MAX_CHAIN_LINKS {
        return Err(CodecError::ChainTooLong {
            max: MAX_CHAIN_LINKS,
        });
    }
    Ok(())
}

/// Encodes a failure and its cause chain as JSON.
///
/// Chains longer than [`MAX_CHAIN_LINKS`] are rejected with
/// [`CodecError::ChainTooLong`] before anything is serialized.
pub fn encode(failure: &Failure) -> Result<String, CodecError> {
    check_chain_length(failure)?;
    serde_json::to_string(failure).map_err(CodecError::Encode)
}

/// Encodes a guarded fatal failure as its underlying record.
pub fn encode_guarded(guarded: &GuardedFatalFailure) -> Result<String, CodecError> {
    encode(guarded.as_failure())
}

/// Decodes a failure record produced by [`encode`].
///
/// Accepts chains of up to [`MAX_CHAIN_LINKS`] failures, the same bound
/// [`encode`] enforces. Longer chains fail with [`CodecError::ChainTooLong`],
/// or with [`CodecError::Decode`] once nesting passes serde_json's own limit.
pub fn decode(input: &str) -> Result<Failure, CodecError> {
    let failure: Failure = serde_json::from_str(input).map_err(CodecError::Decode)?;
    check_chain_length(&failure)?;
    Ok(failure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{is_fatal, FailureKind, FatalKind};

    #[test]
    fn test_encode_wire_shape() {
        let failure = Failure::wrap("boundary", Failure::fatal(FatalKind::OutOfMemory, "oom"));
        let value: serde_json::Value = serde_json::from_str(&encode(&failure).unwrap()).unwrap();

        assert_eq!(value["kind"], serde_json::json!("wrapper"));
        assert_eq!(value["message"], serde_json::json!("boundary"));
        assert_eq!(
            value["cause"]["kind"],
            serde_json::json!({ "fatal": "out_of_memory" })
        );
        assert!(value["cause"]["cause"].is_null());
    }

    #[test]
    fn test_decode_preserves_classification() {
        let original = Failure::wrap(
            "boundary",
            Failure::wrap("again", Failure::fatal(FatalKind::ThreadAborted, "aborted")),
        );
        let decoded = decode(&encode(&original).unwrap()).unwrap();

        assert_eq!(decoded, original);
        assert!(is_fatal(&decoded));
    }

    #[test]
    fn test_decode_missing_cause_defaults_to_none() {
        let decoded =
            decode(r#"{"kind":{"ordinary":"file_not_found"},"message":"gone"}"#).unwrap();

        assert_eq!(
            decoded.kind(),
            &FailureKind::Ordinary("file_not_found".to_string())
        );
        assert!(decoded.cause().is_none());
    }

    #[test]
    fn test_decode_rejects_unknown_kind() {
        let result = decode(r#"{"kind":{"fatal":"meltdown"},"message":"x"}"#);
        assert!(matches!(result, Err(CodecError::Decode(_))));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode("not json").unwrap_err();
        assert!(err.to_string().starts_with("failed to decode failure"));
    }

    fn chain_of(links: usize) -> Failure {
        let mut failure = Failure::fatal(FatalKind::OutOfMemory, "oom");
        for _ in 1..links {
            failure = Failure::wrap("boundary", failure);
        }
        failure
    }

    #[test]
    fn test_longest_chain_round_trips() {
        let original = chain_of(MAX_CHAIN_LINKS);
        assert_eq!(original.chain().count(), MAX_CHAIN_LINKS);

        let decoded = decode(&encode(&original).unwrap()).unwrap();
        assert_eq!(decoded, original);
        assert!(is_fatal(&decoded));
    }

    #[test]
    fn test_encode_rejects_chain_over_limit() {
        let result = encode(&chain_of(MAX_CHAIN_LINKS + 1));
        assert!(matches!(
            result,
            Err(CodecError::ChainTooLong { max: MAX_CHAIN_LINKS })
        ));
    }

    #[test]
    fn test_encode_rejects_very_deep_chain() {
        let result = encode(&chain_of(200));
        assert!(matches!(result, Err(CodecError::ChainTooLong { .. })));
    }

    #[test]
    fn test_decode_rejects_chain_over_limit() {
        let json = serde_json::to_string(&chain_of(MAX_CHAIN_LINKS + 1)).unwrap();
        let result = decode(&json);
        assert!(matches!(
            result,
            Err(CodecError::ChainTooLong { max: MAX_CHAIN_LINKS })
        ));
    }

    #[test]
    fn test_decode_rejects_nesting_past_serde_limit() {
        let mut json = r#"{"kind":{"fatal":"out_of_memory"},"message":"oom","cause":null}"#
            .to_string();
        for _ in 0..200 {
            json = format!(r#"{{"kind":"wrapper","message":"boundary","cause":{}}}"#, json);
        }
        assert!(decode(&json).is_err());
    }

    #[test]
    fn test_encode_guarded() {
        let guarded = GuardedFatalFailure::new("halt");
        let decoded = decode(&encode_guarded(&guarded).unwrap()).unwrap();

        assert_eq!(decoded.kind(), &FailureKind::Fatal(FatalKind::Raised));
        assert_eq!(decoded.message(), "halt");
    }
}
