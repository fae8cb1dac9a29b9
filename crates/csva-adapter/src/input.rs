//! Byte-level pass over CSV input
//!
//! The `csv` parser accepts stray quotes and only trims whitespace after a field
//! has been split. [`Input`] sits between the source and the parser: it drops
//! leading whitespace of each field before the parser decides whether the field is
//! quoted, and keeps the bytes of the rows not yet checked so strict quoting can be
//! enforced with [`check_quotes`].

use std::io::{self, Read};

/// Source wrapper feeding the `csv` parser
pub(crate) struct Input<R> {
    inner: R,
    trim: Option<TrimState>,
    capture: Option<Capture>,
}

/// Bytes handed to the parser and not yet released, starting at absolute `offset`
struct Capture {
    bytes: Vec<u8>,
    offset: u64,
}

struct TrimState {
    delimiter: u8,
    comment: Option<u8>,
    field_start: bool,
    line_start: bool,
    in_quotes: bool,
    after_quote: bool,
    in_comment: bool,
}

impl<R: Read> Input<R> {
    pub(crate) fn new(inner: R) -> Self {
        Self {
            inner,
            trim: None,
            capture: None,
        }
    }

    /// Drop spaces and tabs at the start of every unquoted field.
    pub(crate) fn trim_leading_space(mut self, delimiter: u8, comment: Option<u8>) -> Self {
        self.trim = Some(TrimState {
            delimiter,
            comment,
            field_start: true,
            line_start: true,
            in_quotes: false,
            after_quote: false,
            in_comment: false,
        });
        self
    }

    /// Keep the parsed bytes around until they are released.
    pub(crate) fn capture(mut self) -> Self {
        self.capture = Some(Capture {
            bytes: Vec::new(),
            offset: 0,
        });
        self
    }
}

impl<R> Input<R> {
    /// Captured bytes between the absolute offsets `start` and `end`.
    pub(crate) fn span(&self, start: u64, end: u64) -> &[u8] {
        let Some(capture) = &self.capture else {
            return &[];
        };
        let len = capture.bytes.len();
        let lo = (start.saturating_sub(capture.offset) as usize).min(len);
        let hi = (end.saturating_sub(capture.offset) as usize).clamp(lo, len);
        &capture.bytes[lo..hi]
    }

    /// Forget every captured byte before the absolute offset `end`.
    pub(crate) fn release(&mut self, end: u64) {
        if let Some(capture) = &mut self.capture {
            let count = (end.saturating_sub(capture.offset) as usize).min(capture.bytes.len());
            capture.bytes.drain(..count);
            capture.offset += count as u64;
        }
    }
}

impl<R: Read> Read for Input<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            let n = self.inner.read(buf)?;
            if n == 0 {
                return Ok(0);
            }
            let kept = match &mut self.trim {
                Some(trim) => trim.filter(&mut buf[..n]),
                None => n,
            };
            // a chunk made only of trimmed whitespace is not the end of input
            if kept == 0 {
                continue;
            }
            if let Some(capture) = &mut self.capture {
                capture.bytes.extend_from_slice(&buf[..kept]);
            }
            return Ok(kept);
        }
    }
}

impl TrimState {
    /// Compact `buf` in place, returning the number of bytes kept.
    fn filter(&mut self, buf: &mut [u8]) -> usize {
        let mut kept = 0;
        for i in 0..buf.len() {
            let b = buf[i];
            if self.keep(b) {
                buf[kept] = b;
                kept += 1;
            }
        }
        kept
    }

    fn keep(&mut self, b: u8) -> bool {
        let newline = b == b'\n' || b == b'\r';
        if self.in_comment {
            if newline {
                self.in_comment = false;
                self.field_start = true;
                self.line_start = true;
            }
            return true;
        }
        if self.in_quotes {
            if b == b'"' {
                self.in_quotes = false;
                self.after_quote = true;
            }
            return true;
        }
        if std::mem::take(&mut self.after_quote) && b == b'"' {
            self.in_quotes = true;
            return true;
        }
        if self.line_start && Some(b) == self.comment {
            self.in_comment = true;
            self.line_start = false;
            return true;
        }
        if self.field_start && matches!(b, b' ' | b'\t' | 0x0b | 0x0c) {
            self.line_start = false;
            return false;
        }
        if self.field_start && b == b'"' {
            self.in_quotes = true;
            self.field_start = false;
            self.line_start = false;
            return true;
        }
        self.field_start = newline || b == self.delimiter;
        self.line_start = newline;
        true
    }
}

/// Quoting violation found in a raw row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct QuoteError {
    /// 1-based byte column of the offending quote
    pub column: usize,
    pub reason: &'static str,
}

const BARE_QUOTE: &str = "bare \" in non-quoted field";
const EXTRANEOUS_QUOTE: &str = "extraneous or missing \" in quoted field";

/// Check one raw row for quotes the strict grammar rejects: a `"` inside an
/// unquoted field, or a closing `"` not followed by the delimiter or the end of
/// the row. Blank and comment lines in front of the row are skipped.
pub(crate) fn check_quotes(
    raw: &[u8],
    delimiter: u8,
    comment: Option<u8>,
) -> Result<(), QuoteError> {
    let mut i = skip_preamble(raw, comment);
    let line_begin = i;
    let at_end = |i: usize| i >= raw.len() || raw[i] == b'\n' || raw[i] == b'\r';

    loop {
        if raw.get(i) == Some(&b'"') {
            i += 1;
            loop {
                match raw.get(i) {
                    None => {
                        return Err(QuoteError {
                            column: i - line_begin,
                            reason: EXTRANEOUS_QUOTE,
                        });
                    }
                    Some(b'"') if raw.get(i + 1) == Some(&b'"') => i += 2,
                    Some(b'"') => {
                        i += 1;
                        break;
                    }
                    Some(_) => i += 1,
                }
            }
            if at_end(i) {
                return Ok(());
            }
            if raw[i] != delimiter {
                return Err(QuoteError {
                    column: i - line_begin,
                    reason: EXTRANEOUS_QUOTE,
                });
            }
            i += 1;
            continue;
        }

        while !at_end(i) && raw[i] != delimiter {
            if raw[i] == b'"' {
                return Err(QuoteError {
                    column: i - line_begin + 1,
                    reason: BARE_QUOTE,
                });
            }
            i += 1;
        }
        if at_end(i) {
            return Ok(());
        }
        i += 1;
    }
}

fn skip_preamble(raw: &[u8], comment: Option<u8>) -> usize {
    let mut i = 0;
    while i < raw.len() {
        match raw[i] {
            b'\n' | b'\r' => i += 1,
            b if Some(b) == comment => {
                while i < raw.len() && raw[i] != b'\n' {
                    i += 1;
                }
            }
            _ => break,
        }
    }
    i
}
