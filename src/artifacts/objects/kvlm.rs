//! Key-value list with message (KVLM)
//!
//! The text encoding shared by commits and tags:
//!
//! ```text
//! tree 29ff16c9c14e2652b22f8b78bb08a5a07930c147
//! parent 206941306e8a8af65b66eaaaea388a7ae24d49a0
//! author Thibault Polge <thibault@thb.lt> 1527025023 +0200
//! gpgsig -----BEGIN PGP SIGNATURE-----
//!  iQIzBAABCAAdFiEExwXquOM8bWb4Q2zVGxM2FxoLkGQFAlsEjZQACgkQGxM2FxoL
//!  -----END PGP SIGNATURE-----
//!
//! Create first draft
//! ```
//!
//! Continuation lines start with a single space, which is dropped on parse.
//! Repeated keys are grouped at the position of their first occurrence, so a
//! payload whose duplicate keys are not contiguous (`a`, `b`, `a`) does not
//! serialize back to the same bytes.

use crate::errors::{Error, Result};
use bytes::Bytes;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Kvlm {
    fields: Vec<(Bytes, Vec<Bytes>)>,
    message: Bytes,
}

impl Kvlm {
    pub fn new(message: impl Into<Bytes>) -> Self {
        Kvlm {
            fields: Vec::new(),
            message: message.into(),
        }
    }

    /// Append a value, grouping it with earlier values of the same key
    pub fn push(&mut self, key: impl Into<Bytes>, value: impl Into<Bytes>) {
        let key = key.into();
        let value = value.into();

        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.fields.push((key, vec![value])),
        }
    }

    /// Builder form of [`Kvlm::push`]
    pub fn with(mut self, key: impl Into<Bytes>, value: impl Into<Bytes>) -> Self {
        self.push(key, value);
        self
    }

    pub fn get(&self, key: &[u8]) -> Option<&[Bytes]> {
        self.fields
            .iter()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, values)| values.as_slice())
    }

    pub fn first(&self, key: &[u8]) -> Option<&Bytes> {
        self.get(key).and_then(|values| values.first())
    }

    pub fn fields(&self) -> impl Iterator<Item = (&Bytes, &[Bytes])> {
        self.fields.iter().map(|(k, v)| (k, v.as_slice()))
    }

    pub fn message(&self) -> &Bytes {
        &self.message
    }

    pub fn parse(raw: &[u8]) -> Result<Self> {
        let mut kvlm = Kvlm::default();
        let mut start = 0;

        loop {
            if start >= raw.len() {
                // headers ran to the end of the payload without a message
                return Ok(kvlm);
            }

            let newline = find(raw, b'\n', start);
            let space = find(raw, b' ', start);

            // A blank line: the rest of the payload is the message
            if newline == Some(start) {
                kvlm.message = Bytes::copy_from_slice(&raw[start + 1..]);
                return Ok(kvlm);
            }

            let space = match (space, newline) {
                (Some(space), Some(newline)) if space < newline => space,
                (Some(space), None) => space,
                _ => {
                    return Err(Error::CorruptObject(format!(
                        "malformed header line at byte {start}"
                    )));
                }
            };

            // The value ends at the first newline not followed by a space
            let mut end = space;
            loop {
                match find(raw, b'\n', end + 1) {
                    Some(newline) if raw.get(newline + 1) == Some(&b' ') => end = newline,
                    Some(newline) => {
                        end = newline;
                        break;
                    }
                    None => {
                        end = raw.len();
                        break;
                    }
                }
            }

            let key = Bytes::copy_from_slice(&raw[start..space]);
            let value = unfold(&raw[space + 1..end]);
            kvlm.push(key, value);

            start = end + 1;
        }
    }

    pub fn serialize(&self) -> Bytes {
        let mut out = Vec::new();

        for (key, values) in &self.fields {
            for value in values {
                out.extend_from_slice(key);
                out.push(b' ');
                for &byte in value.iter() {
                    out.push(byte);
                    if byte == b'\n' {
                        out.push(b' ');
                    }
                }
                out.push(b'\n');
            }
        }

        out.push(b'\n');
        out.extend_from_slice(&self.message);

        Bytes::from(out)
    }

    /// Header lines followed by the message, as text
    pub fn display(&self) -> String {
        String::from_utf8_lossy(&self.serialize()).into_owned()
    }
}

fn find(raw: &[u8], needle: u8, from: usize) -> Option<usize> {
    raw.get(from..)?
        .iter()
        .position(|&b| b == needle)
        .map(|position| from + position)
}

/// Drop the leading space of every continuation line
fn unfold(value: &[u8]) -> Bytes {
    let mut out = Vec::with_capacity(value.len());
    let mut previous = None;

    for &byte in value {
        if !(byte == b' ' && previous == Some(b'\n')) {
            out.push(byte);
        }
        previous = Some(byte);
    }

    Bytes::from(out)
}
