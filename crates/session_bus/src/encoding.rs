//! Text encodings of client connections.
//!
//! The portal encodes what it writes to a client with the session encoding,
//! and the game decodes what the client typed with the same one. The
//! encoding travels in the `new_session` message under its [`name`].
//!
//! [`name`]: Encoding::name

use std::fmt;
use std::str::FromStr;

/// Text codec of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Utf8,
    Latin1,
    Ascii,
}

impl Encoding {
    /// Encodes `text`, replacing characters the codec cannot represent with `?`.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            Encoding::Utf8 => text.as_bytes().to_vec(),
            Encoding::Latin1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
                .collect(),
            Encoding::Ascii => text
                .chars()
                .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
                .collect(),
        }
    }

    /// Decodes `bytes`, lossily.
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            Encoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Encoding::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
            Encoding::Ascii => bytes
                .iter()
                .map(|&b| if b.is_ascii() { char::from(b) } else { '\u{FFFD}' })
                .collect(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Latin1 => "latin-1",
            Encoding::Ascii => "ascii",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Encoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "utf-8" | "utf8" => Ok(Encoding::Utf8),
            "latin-1" | "latin1" | "iso-8859-1" => Ok(Encoding::Latin1),
            "ascii" | "us-ascii" => Ok(Encoding::Ascii),
            other => Err(format!("unsupported encoding '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_names() {
        assert_eq!("UTF-8".parse::<Encoding>(), Ok(Encoding::Utf8));
        assert_eq!("iso_8859_1".parse::<Encoding>(), Ok(Encoding::Latin1));
        assert!("ebcdic".parse::<Encoding>().is_err());

        for encoding in [Encoding::Utf8, Encoding::Latin1, Encoding::Ascii] {
            assert_eq!(encoding.name().parse::<Encoding>(), Ok(encoding));
        }
    }

    #[test]
    fn test_decode_is_lossy() {
        assert_eq!(Encoding::Latin1.decode(b"caf\xe9"), "café");
        assert_eq!(Encoding::Utf8.decode(b"caf\xe9"), "caf\u{FFFD}");
        assert_eq!(Encoding::Ascii.decode(b"caf\xe9"), "caf\u{FFFD}");
        assert_eq!(Encoding::Utf8.decode("café".as_bytes()), "café");
    }
}
