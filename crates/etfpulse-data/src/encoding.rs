//! Character encoding detection for text quote files.
//!
//! Exports from Chinese brokerage terminals are frequently GBK encoded while
//! hand-edited files are UTF-8. Detection runs in this order:
//!
//! 1. byte-order mark
//! 2. strict UTF-8 validation
//! 3. statistical detection over a leading sample, biased towards Chinese
//!
//! A low-confidence guess, or a guess outside the Chinese encodings, is
//! inconclusive and resolves to [`DEFAULT_ENCODING`]; short GBK files would
//! otherwise decode cleanly as EUC-KR. When the detected encoding cannot
//! decode the input cleanly the default is tried before the input is declared
//! garbled.

use crate::error::{LoadError, Result};
use chardetng::EncodingDetector;
use encoding_rs::{BIG5, Encoding, GB18030, GBK, UTF_8};
use tracing::debug;

/// Encoding used when detection is inconclusive.
pub static DEFAULT_ENCODING: &Encoding = GBK;

/// Top-level domain hint passed to the statistical detector.
const DETECTION_TLD: &[u8] = b"cn";

/// Number of leading bytes fed to the statistical detector.
pub const DETECTION_SAMPLE_BYTES: usize = 100_000;

/// Guess the encoding of `bytes`.
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }
    if std::str::from_utf8(bytes).is_ok() {
        return UTF_8;
    }

    let sample = &bytes[..bytes.len().min(DETECTION_SAMPLE_BYTES)];
    let mut detector = EncodingDetector::new();
    // A truncated sample may end mid-character; only claim the end of
    // stream when the whole input was fed.
    detector.feed(sample, sample.len() == bytes.len());
    let (guess, confident) = detector.guess_assess(Some(DETECTION_TLD), true);
    if confident && is_chinese(guess) {
        guess
    } else {
        debug!(
            guess = guess.name(),
            confident,
            fallback = DEFAULT_ENCODING.name(),
            "Inconclusive encoding detection"
        );
        DEFAULT_ENCODING
    }
}

fn is_chinese(encoding: &'static Encoding) -> bool {
    encoding == GBK || encoding == GB18030 || encoding == BIG5
}

/// Decode `bytes` to text, detecting the encoding.
pub fn decode(bytes: &[u8]) -> Result<String> {
    let detected = detect_encoding(bytes);
    debug!(encoding = detected.name(), "Detected input encoding");

    if let Some(text) = decode_strict(detected, bytes) {
        return Ok(text);
    }

    debug!(
        detected = detected.name(),
        fallback = DEFAULT_ENCODING.name(),
        "Detected encoding failed, trying default"
    );
    decode_strict(DEFAULT_ENCODING, bytes).ok_or(LoadError::Garbled {
        encoding: DEFAULT_ENCODING.name(),
    })
}

fn decode_strict(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        None
    } else {
        Some(text.into_owned())
    }
}
