//! Run configuration.

use crate::error::ConfigError;
use crate::format::Format;
use crate::hash::DEFAULT_SEED;

/// Default blackhole address in both source and destination.
pub const DEFAULT_BLACKHOLE: &str = "0.0.0.0";

/// Default IPv6 blackhole address in the destination.
pub const DEFAULT_BLACKHOLE_V6: &str = "::";

/// Default number of domains per output line for compressible formats.
pub const DEFAULT_GROUP_SIZE: u8 = 9;

/// Fingerprint width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashWidth {
    #[default]
    W64,
    W128,
    W192,
    W256,
}

impl HashWidth {
    /// Number of 64-bit words per fingerprint.
    #[inline]
    pub const fn words(self) -> usize {
        match self {
            Self::W64 => 1,
            Self::W128 => 2,
            Self::W192 => 3,
            Self::W256 => 4,
        }
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self.words() as u32 * 64
    }
}

impl TryFrom<u32> for HashWidth {
    type Error = ConfigError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            64 => Ok(Self::W64),
            128 => Ok(Self::W128),
            192 => Ok(Self::W192),
            256 => Ok(Self::W256),
            _ => Err(ConfigError::HashWidth(value)),
        }
    }
}

/// Line terminator written after every output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

/// Settings for one conversion run.
#[derive(Debug, Clone)]
pub struct Config {
    pub format: Format,
    /// Domains per line for compressible formats (1 to 9).
    pub group_size: u8,
    pub hash_width: HashWidth,
    pub hash_seed: u64,
    /// Address that prefixes domain lines in the source.
    pub from_blackhole: String,
    /// Address written in front of domains; falls back to `from_blackhole`.
    pub to_blackhole: Option<String>,
    pub to_blackhole_v6: String,
    /// Remove duplicate domains.
    pub dedupe: bool,
    /// Carry `#` comment lines through to the output.
    pub keep_comments: bool,
    pub line_ending: LineEnding,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: Format::Hosts,
            group_size: DEFAULT_GROUP_SIZE,
            hash_width: HashWidth::W64,
            hash_seed: DEFAULT_SEED,
            from_blackhole: DEFAULT_BLACKHOLE.to_string(),
            to_blackhole: None,
            to_blackhole_v6: DEFAULT_BLACKHOLE_V6.to_string(),
            dedupe: true,
            keep_comments: false,
            line_ending: LineEnding::Lf,
        }
    }
}

impl Config {
    pub fn new(format: Format) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    /// Destination IPv4 blackhole address.
    pub fn to_blackhole(&self) -> &str {
        self.to_blackhole.as_deref().unwrap_or(&self.from_blackhole)
    }

    /// Check every setting before any pass runs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=9).contains(&self.group_size) {
            return Err(ConfigError::GroupSize(self.group_size));
        }
        if !is_address_token(&self.from_blackhole) {
            return Err(ConfigError::EmptyAddress("source blackhole"));
        }
        if !is_address_token(self.to_blackhole()) {
            return Err(ConfigError::EmptyAddress("destination blackhole"));
        }
        if self.format.spec().is_dual_address() && !is_address_token(&self.to_blackhole_v6) {
            return Err(ConfigError::MissingIpv6Address);
        }
        Ok(())
    }
}

fn is_address_token(addr: &str) -> bool {
    !addr.is_empty() && !addr.contains(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_group_size_range() {
        let mut config = Config::default();
        config.group_size = 0;
        assert!(matches!(config.validate(), Err(ConfigError::GroupSize(0))));
        config.group_size = 10;
        assert!(matches!(config.validate(), Err(ConfigError::GroupSize(10))));
        config.group_size = 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_hash_width_from_bits() {
        assert_eq!(HashWidth::try_from(64).unwrap(), HashWidth::W64);
        assert_eq!(HashWidth::try_from(256).unwrap().words(), 4);
        assert!(matches!(HashWidth::try_from(100), Err(ConfigError::HashWidth(100))));
        assert_eq!(HashWidth::W192.bits(), 192);
    }

    #[test]
    fn test_to_blackhole_falls_back_to_source() {
        let mut config = Config::default();
        config.from_blackhole = "127.0.0.1".to_string();
        assert_eq!(config.to_blackhole(), "127.0.0.1");
        config.to_blackhole = Some("0.0.0.0".to_string());
        assert_eq!(config.to_blackhole(), "0.0.0.0");
    }

    #[test]
    fn test_blank_addresses_rejected() {
        let mut config = Config::default();
        config.from_blackhole = String::new();
        assert!(matches!(config.validate(), Err(ConfigError::EmptyAddress(_))));

        let mut config = Config::new(Format::Ipv6);
        config.to_blackhole_v6 = " ".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::MissingIpv6Address)));
    }
}
