//! Permission bits.
//!
//! `Mode` is a thin newtype over the POSIX permission word (masked to `0o7777`).
//! It can be built from a number or parsed from an octal string; `"755"`,
//! `"0755"` and `"0o755"` are equivalent.

use std::fmt;
use std::str::FromStr;

use crate::errors::FsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Mode(u32);

impl Mode {
    /// Documented default for new files (before the umask applies).
    pub const DEFAULT_FILE: Mode = Mode(0o666);
    /// Documented default for new directories (before the umask applies).
    pub const DEFAULT_DIR: Mode = Mode(0o777);

    const MASK: u32 = 0o7777;

    pub const fn new(bits: u32) -> Self {
        Mode(bits & Self::MASK)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Permission bits only (no setuid/setgid/sticky).
    pub const fn permissions(self) -> u32 {
        self.0 & 0o777
    }

    /// True when nobody has the write bit; this is what maps to the read-only
    /// attribute on Windows.
    pub const fn is_readonly(self) -> bool {
        self.0 & 0o222 == 0
    }

    pub fn parse(s: &str) -> Result<Self, FsError> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0o")
            .or_else(|| trimmed.strip_prefix("0O"))
            .unwrap_or(trimmed);
        // from_str_radix would also take a leading sign
        if digits.is_empty() || digits.len() > 5 || !digits.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
            return Err(FsError::InvalidMode(s.to_string()));
        }
        let bits = u32::from_str_radix(digits, 8).map_err(|_| FsError::InvalidMode(s.to_string()))?;
        if bits > Self::MASK {
            return Err(FsError::InvalidMode(s.to_string()));
        }
        Ok(Mode(bits))
    }
}

impl From<u32> for Mode {
    fn from(bits: u32) -> Self {
        Mode::new(bits)
    }
}

impl From<Mode> for u32 {
    fn from(m: Mode) -> Self {
        m.0
    }
}

impl FromStr for Mode {
    type Err = FsError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::parse(s)
    }
}

impl TryFrom<&str> for Mode {
    type Error = FsError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Mode::parse(s)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04o}", self.0)
    }
}

impl fmt::Octal for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Octal::fmt(&self.0, f)
    }
}
