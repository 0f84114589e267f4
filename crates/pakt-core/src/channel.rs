//! Channel priority ordering.
//!
//! Channels are listed highest priority first. The literal name `defaults`
//! stands for the legacy channel set `main`, `free`, `pro`, `r`.

use std::fmt;

/// Name that expands to [`DEFAULT_CHANNELS`].
pub const DEFAULTS_ALIAS: &str = "defaults";

/// The channels `defaults` expands to, in priority order.
pub const DEFAULT_CHANNELS: [&str; 4] = ["main", "free", "pro", "r"];

/// An ordered, de-duplicated list of channel names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelOrder {
    channels: Vec<String>,
}

impl ChannelOrder {
    /// Expand `defaults` and drop repeated names, keeping the first occurrence.
    pub fn new<S: AsRef<str>>(names: &[S]) -> Self {
        let mut channels: Vec<String> = Vec::new();
        let mut push = |name: &str| {
            if !channels.iter().any(|c| c == name) {
                channels.push(name.to_string());
            }
        };
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            if name == DEFAULTS_ALIAS {
                for alias in DEFAULT_CHANNELS {
                    push(alias);
                }
            } else {
                push(name);
            }
        }
        Self { channels }
    }

    /// Priority of a channel: `len - index` for a listed channel, `0` otherwise.
    ///
    /// Accepts either a bare name or a channel URL, which is matched by its
    /// last path segment.
    pub fn priority(&self, channel: &str) -> i64 {
        let name = canonical_name(channel);
        self.channels
            .iter()
            .position(|c| c == name)
            .map(|idx| (self.channels.len() - idx) as i64)
            .unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.channels.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

impl fmt::Display for ChannelOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.channels.join(", "))
    }
}

/// Platform directories a channel URL may end in.
pub const PLATFORM_SUBDIRS: &[&str] = &[
    "noarch",
    "linux-32",
    "linux-64",
    "linux-aarch64",
    "linux-armv6l",
    "linux-armv7l",
    "linux-ppc64le",
    "linux-s390x",
    "osx-64",
    "osx-arm64",
    "win-32",
    "win-64",
    "win-arm64",
    "emscripten-wasm32",
    "wasi-wasm32",
    "zos-z",
];

/// `https://host/pkgs/main/` and `https://host/pkgs/main/linux-64` -> `main`;
/// bare names are returned as-is.
pub fn canonical_name(channel: &str) -> &str {
    let trimmed = channel.trim().trim_end_matches('/');
    let mut segments = trimmed.rsplit('/').filter(|s| !s.is_empty());
    match segments.next() {
        Some(last) if PLATFORM_SUBDIRS.contains(&last) => segments.next().unwrap_or(last),
        Some(last) => last,
        None => trimmed,
    }
}
