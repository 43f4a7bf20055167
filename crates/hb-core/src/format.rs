//! Destination formats and the line emitter.
//!
//! Every format is described by a static [`FormatSpec`]: the template(s)
//! for a domain line, the template for a comment line, and a set of
//! [`FormatTraits`]. The emitter only walks these tables.

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use crate::compress::Group;
use crate::config::Config;
use crate::error::ConfigError;
use crate::normalize::EntryKind;

// =============================================================================
// Formats
// =============================================================================

/// Destination format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Adblock,
    Dnsmasq,
    Dualserver,
    Fqdn,
    Hosts,
    Ipv6,
    Privoxy,
    Rfqdn,
    Rpz,
    Unbound,
}

impl Format {
    pub const ALL: [Format; 10] = [
        Format::Adblock,
        Format::Dnsmasq,
        Format::Dualserver,
        Format::Fqdn,
        Format::Hosts,
        Format::Ipv6,
        Format::Privoxy,
        Format::Rfqdn,
        Format::Rpz,
        Format::Unbound,
    ];

    /// Descriptor for this format.
    pub fn spec(self) -> &'static FormatSpec {
        match self {
            Self::Adblock => &ADBLOCK,
            Self::Dnsmasq => &DNSMASQ,
            Self::Dualserver => &DUALSERVER,
            Self::Fqdn => &FQDN,
            Self::Hosts => &HOSTS,
            Self::Ipv6 => &IPV6,
            Self::Privoxy => &PRIVOXY,
            Self::Rfqdn => &RFQDN,
            Self::Rpz => &RPZ,
            Self::Unbound => &UNBOUND,
        }
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.name() == lower)
            .ok_or_else(|| ConfigError::UnknownFormat(s.to_string()))
    }
}

bitflags::bitflags! {
    /// Behavior of a destination format.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FormatTraits: u8 {
        /// A blocked ancestor makes its subdomains redundant
        const REDUCIBLE = 1 << 0;
        /// Several domains may share one output line
        const COMPRESSIBLE = 1 << 1;
        /// Each group is written once per address family
        const DUAL_ADDRESS = 1 << 2;
    }
}

/// One piece of an output line template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Piece {
    Lit(&'static str),
    /// Destination IPv4 blackhole address
    Addr,
    /// Destination IPv6 blackhole address
    Addr6,
    /// One domain, or a space-joined group of domains
    Domain,
    /// Comment line with its leading `#` removed
    CommentBody,
}

pub type Template = &'static [Piece];

/// Static description of a destination format.
#[derive(Debug)]
pub struct FormatSpec {
    pub name: &'static str,
    /// Lines written for every domain (or domain group)
    pub domain_lines: &'static [Template],
    /// Comment template; `None` passes comments through unchanged
    pub comment_line: Option<Template>,
    pub traits: FormatTraits,
}

impl FormatSpec {
    #[inline]
    pub fn is_reducible(&self) -> bool {
        self.traits.contains(FormatTraits::REDUCIBLE)
    }

    #[inline]
    pub fn is_compressible(&self) -> bool {
        self.traits.contains(FormatTraits::COMPRESSIBLE)
    }

    #[inline]
    pub fn is_dual_address(&self) -> bool {
        self.traits.contains(FormatTraits::DUAL_ADDRESS)
    }
}

use Piece::{Addr, Addr6, CommentBody, Domain, Lit};

static ADBLOCK: FormatSpec = FormatSpec {
    name: "adblock",
    domain_lines: &[&[Lit("||"), Domain, Lit("^")]],
    comment_line: Some(&[Lit("!"), CommentBody]),
    traits: FormatTraits::REDUCIBLE,
};

static DNSMASQ: FormatSpec = FormatSpec {
    name: "dnsmasq",
    domain_lines: &[&[Lit("address=/"), Domain, Lit("/")]],
    comment_line: None,
    traits: FormatTraits::REDUCIBLE,
};

static DUALSERVER: FormatSpec = FormatSpec {
    name: "dualserver",
    domain_lines: &[&[Domain, Lit("="), Addr]],
    comment_line: None,
    traits: FormatTraits::empty(),
};

static FQDN: FormatSpec = FormatSpec {
    name: "fqdn",
    domain_lines: &[&[Domain]],
    comment_line: None,
    traits: FormatTraits::empty(),
};

static HOSTS: FormatSpec = FormatSpec {
    name: "hosts",
    domain_lines: &[&[Addr, Lit(" "), Domain]],
    comment_line: None,
    traits: FormatTraits::COMPRESSIBLE,
};

static IPV6: FormatSpec = FormatSpec {
    name: "ipv6",
    domain_lines: &[&[Addr, Lit(" "), Domain], &[Addr6, Lit(" "), Domain]],
    comment_line: None,
    traits: FormatTraits::COMPRESSIBLE.union(FormatTraits::DUAL_ADDRESS),
};

static PRIVOXY: FormatSpec = FormatSpec {
    name: "privoxy",
    domain_lines: &[&[Domain], &[Lit("."), Domain]],
    comment_line: None,
    traits: FormatTraits::REDUCIBLE,
};

static RFQDN: FormatSpec = FormatSpec {
    name: "rfqdn",
    domain_lines: &[&[Domain]],
    comment_line: None,
    traits: FormatTraits::REDUCIBLE,
};

static RPZ: FormatSpec = FormatSpec {
    name: "rpz",
    domain_lines: &[
        &[Domain, Lit(" CNAME .")],
        &[Lit("*."), Domain, Lit(" CNAME .")],
    ],
    comment_line: Some(&[Lit(";"), CommentBody]),
    traits: FormatTraits::REDUCIBLE,
};

static UNBOUND: FormatSpec = FormatSpec {
    name: "unbound",
    domain_lines: &[&[Lit("local-zone: \""), Domain, Lit("\" always_nxdomain")]],
    comment_line: None,
    traits: FormatTraits::REDUCIBLE,
};

// =============================================================================
// Emitter
// =============================================================================

/// Renders groups into the literal text of one format.
pub struct Emitter<'a> {
    spec: &'static FormatSpec,
    addr: &'a str,
    addr6: &'a str,
    eol: &'static str,
}

impl<'a> Emitter<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            spec: config.format.spec(),
            addr: config.to_blackhole(),
            addr6: &config.to_blackhole_v6,
            eol: config.line_ending.as_str(),
        }
    }

    /// Write one group, returning the number of lines written.
    pub fn write_group<W: Write>(&self, out: &mut W, group: &Group) -> io::Result<usize> {
        match group.kind {
            EntryKind::Domain => {
                for template in self.spec.domain_lines {
                    self.write_line(out, template, &group.text)?;
                }
                Ok(self.spec.domain_lines.len())
            }
            EntryKind::Comment => {
                match self.spec.comment_line {
                    Some(template) => self.write_line(out, template, &group.text)?,
                    None => {
                        out.write_all(group.text.as_bytes())?;
                        out.write_all(self.eol.as_bytes())?;
                    }
                }
                Ok(1)
            }
        }
    }

    fn write_line<W: Write>(&self, out: &mut W, template: Template, text: &str) -> io::Result<()> {
        for piece in template {
            let s = match *piece {
                Piece::Lit(lit) => lit,
                Piece::Addr => self.addr,
                Piece::Addr6 => self.addr6,
                Piece::Domain => text,
                Piece::CommentBody => text.strip_prefix('#').unwrap_or(text),
            };
            out.write_all(s.as_bytes())?;
        }
        out.write_all(self.eol.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(format: Format, kind: EntryKind, text: &str) -> String {
        let config = Config::new(format);
        let emitter = Emitter::new(&config);
        let mut out = Vec::new();
        let group = Group {
            kind,
            text: text.to_string(),
            count: 1,
        };
        emitter.write_group(&mut out, &group).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("hosts".parse::<Format>().unwrap(), Format::Hosts);
        assert_eq!("AdBlock".parse::<Format>().unwrap(), Format::Adblock);
        assert!(matches!(
            "bind".parse::<Format>(),
            Err(ConfigError::UnknownFormat(_))
        ));
        for format in Format::ALL {
            assert_eq!(format.name().parse::<Format>().unwrap(), format);
        }
    }

    #[test]
    fn test_traits() {
        let reducible: Vec<_> = Format::ALL
            .into_iter()
            .filter(|f| f.spec().is_reducible())
            .collect();
        assert_eq!(
            reducible,
            vec![
                Format::Adblock,
                Format::Dnsmasq,
                Format::Privoxy,
                Format::Rfqdn,
                Format::Rpz,
                Format::Unbound
            ]
        );
        assert!(Format::Hosts.spec().is_compressible());
        assert!(Format::Ipv6.spec().is_compressible());
        assert!(Format::Ipv6.spec().is_dual_address());
        assert!(!Format::Fqdn.spec().is_reducible());
        assert!(!Format::Dualserver.spec().is_compressible());
    }

    #[test]
    fn test_domain_lines() {
        let d = EntryKind::Domain;
        assert_eq!(render(Format::Hosts, d, "a.com b.com"), "0.0.0.0 a.com b.com\n");
        assert_eq!(render(Format::Ipv6, d, "a.com"), "0.0.0.0 a.com\n:: a.com\n");
        assert_eq!(render(Format::Dualserver, d, "a.com"), "a.com=0.0.0.0\n");
        assert_eq!(render(Format::Adblock, d, "a.com"), "||a.com^\n");
        assert_eq!(render(Format::Dnsmasq, d, "a.com"), "address=/a.com/\n");
        assert_eq!(render(Format::Privoxy, d, "a.com"), "a.com\n.a.com\n");
        assert_eq!(render(Format::Rpz, d, "a.com"), "a.com CNAME .\n*.a.com CNAME .\n");
        assert_eq!(
            render(Format::Unbound, d, "a.com"),
            "local-zone: \"a.com\" always_nxdomain\n"
        );
        assert_eq!(render(Format::Fqdn, d, "a.com"), "a.com\n");
        assert_eq!(render(Format::Rfqdn, d, "a.com"), "a.com\n");
    }

    #[test]
    fn test_comment_lines() {
        let c = EntryKind::Comment;
        assert_eq!(render(Format::Adblock, c, "# ads"), "! ads\n");
        assert_eq!(render(Format::Rpz, c, "# ads"), "; ads\n");
        assert_eq!(render(Format::Hosts, c, "# ads"), "# ads\n");
        assert_eq!(render(Format::Unbound, c, "#x"), "#x\n");
    }

    #[test]
    fn test_custom_addresses_and_crlf() {
        let mut config = Config::new(Format::Ipv6);
        config.to_blackhole = Some("127.0.0.1".to_string());
        config.to_blackhole_v6 = "::1".to_string();
        config.line_ending = crate::config::LineEnding::CrLf;
        let emitter = Emitter::new(&config);
        let mut out = Vec::new();
        let group = Group {
            kind: EntryKind::Domain,
            text: "a.com".to_string(),
            count: 1,
        };
        let lines = emitter.write_group(&mut out, &group).unwrap();
        assert_eq!(lines, 2);
        assert_eq!(out, b"127.0.0.1 a.com\r\n::1 a.com\r\n");
    }
}
