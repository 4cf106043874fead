//! Server-side path syntax.

use std::fmt;
use std::path::Path;

/// Filesystem convention of the host running clamd.
///
/// Path scans send the path as the daemon will see it; a client on Windows
/// talking to a Linux daemon needs `/` separators, and the reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum Platform {
    /// `/` separators.
    Unix,
    /// `\` separators.
    Windows,
    /// Same separator as the local host; paths are sent unchanged.
    #[default]
    Native,
}

impl Platform {
    /// Renders a local path in the server's syntax.
    pub fn to_server_path(self, path: &Path) -> String {
        let local = path.to_string_lossy();
        match self {
            Self::Unix => local.replace('\\', "/"),
            Self::Windows => local.replace('/', "\\"),
            Self::Native => local.into_owned(),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unix => "unix",
            Self::Windows => "windows",
            Self::Native => "native",
        })
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "unix" => Ok(Self::Unix),
            "windows" => Ok(Self::Windows),
            "native" => Ok(Self::Native),
            _ => Err(format!("unknown platform: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn to_unix() {
        let path = Path::new("test\\path\\to\\file");
        assert_eq!(Platform::Unix.to_server_path(path), "test/path/to/file");
    }

    #[test]
    fn to_windows() {
        let path = Path::new("test/path/to/file");
        assert_eq!(Platform::Windows.to_server_path(path), "test\\path\\to\\file");
    }

    #[test]
    fn native_keeps_path() {
        let path = Path::new("test/path/to/file");
        assert_eq!(
            Platform::Native.to_server_path(path),
            path.to_string_lossy()
        );
    }

    #[test]
    fn parse_roundtrip() {
        for p in [Platform::Unix, Platform::Windows, Platform::Native] {
            assert_eq!(p.to_string().parse::<Platform>().unwrap(), p);
        }
        assert_eq!("WINDOWS".parse::<Platform>().unwrap(), Platform::Windows);
        assert!("amiga".parse::<Platform>().is_err());
    }
}
