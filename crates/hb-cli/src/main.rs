//! hosts-bl CLI
//!
//! Converts a hosts-style blocklist into another blocklist format.

use std::io::{self, IsTerminal, Write};

use clap::{ArgAction, CommandFactory, Parser};
use tracing_subscriber::filter::LevelFilter;

use hb_core::config::{DEFAULT_BLACKHOLE, DEFAULT_BLACKHOLE_V6};
use hb_core::Format;

mod convert;

use convert::{ConvertOptions, STDIO};

#[derive(Parser)]
#[command(name = "hosts-bl")]
#[command(about = "Convert hosts blocklists to other formats, removing redundant entries")]
struct Cli {
    /// Source and destination files ("-" for stdin/stdout)
    #[arg(num_args = 0..=2, value_name = "FILE")]
    paths: Vec<String>,

    /// Source file
    #[arg(short, long)]
    input: Option<String>,

    /// Destination file
    #[arg(short, long)]
    output: Option<String>,

    /// Destination format: adblock, dnsmasq, dualserver, fqdn, hosts, ipv6,
    /// privoxy, rfqdn, rpz, unbound
    #[arg(short, long, default_value = "hosts")]
    format: Format,

    /// Number of domains per line, 1 to 9
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=9))]
    compression: Option<u8>,

    /// Don't check for and remove duplicates
    #[arg(long)]
    dupe: bool,

    /// Don't remove comments
    #[arg(long)]
    comments: bool,

    /// Black hole address in source
    #[arg(long, default_value = DEFAULT_BLACKHOLE)]
    from_blackhole: String,

    /// Black hole address in destination (defaults to the source address)
    #[arg(long)]
    to_blackhole: Option<String>,

    /// IPv6 black hole address in destination
    #[arg(long, default_value = DEFAULT_BLACKHOLE_V6)]
    to_blackhole_v6: String,

    /// Fingerprint width in bits: 64, 128, 192 or 256
    #[arg(long, default_value_t = 64)]
    hash_width: u32,

    /// Hash seed (random per run when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Write CRLF line endings
    #[arg(long)]
    crlf: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let (input, output) = match resolve_paths(&cli.paths, cli.input.clone(), cli.output.clone()) {
        Ok(paths) => paths,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let input = match input {
        Some(input) => input,
        None if !std::io::stdin().is_terminal() => STDIO.to_string(),
        None => {
            // Nothing to convert
            if let Err(e) = print_usage(&mut io::stdout()) {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
            return;
        }
    };

    let opts = ConvertOptions {
        input,
        output,
        format: cli.format,
        group_size: cli.compression,
        keep_duplicates: cli.dupe,
        keep_comments: cli.comments,
        from_blackhole: cli.from_blackhole,
        to_blackhole: cli.to_blackhole,
        to_blackhole_v6: cli.to_blackhole_v6,
        hash_width: cli.hash_width,
        seed: cli.seed,
        crlf: cli.crlf,
    };

    if let Err(e) = convert::run_convert(opts) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn print_usage<W: Write>(out: &mut W) -> io::Result<()> {
    Cli::command().write_help(out)?;
    out.flush()
}

/// Assign positional paths to whichever of input/output was not given
/// as an option.
fn resolve_paths(
    paths: &[String],
    mut input: Option<String>,
    mut output: Option<String>,
) -> Result<(Option<String>, Option<String>), String> {
    for path in paths {
        if input.is_none() {
            input = Some(path.clone());
        } else if output.is_none() {
            output = Some(path.clone());
        } else {
            return Err(format!("Unexpected argument '{}'", path));
        }
    }
    Ok((input, output))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_positional_paths() {
        let (i, o) = resolve_paths(&strings(&["in.txt", "out.txt"]), None, None).unwrap();
        assert_eq!(i.as_deref(), Some("in.txt"));
        assert_eq!(o.as_deref(), Some("out.txt"));
    }

    #[test]
    fn test_positional_fills_missing_slot() {
        let (i, o) = resolve_paths(&strings(&["out.txt"]), Some("in.txt".into()), None).unwrap();
        assert_eq!(i.as_deref(), Some("in.txt"));
        assert_eq!(o.as_deref(), Some("out.txt"));
    }

    #[test]
    fn test_too_many_paths() {
        let err = resolve_paths(&strings(&["a", "b"]), Some("in.txt".into()), None);
        assert!(err.is_err());
    }

    #[test]
    fn test_cli_parses_options() {
        let cli = Cli::try_parse_from([
            "hosts-bl",
            "-f",
            "AdBlock",
            "--compression",
            "3",
            "--comments",
            "--hash-width",
            "128",
            "list.txt",
        ])
        .unwrap();
        assert_eq!(cli.format, Format::Adblock);
        assert_eq!(cli.compression, Some(3));
        assert!(cli.comments);
        assert!(!cli.dupe);
        assert_eq!(cli.hash_width, 128);
        assert_eq!(cli.paths, vec!["list.txt"]);
    }

    #[test]
    fn test_cli_rejects_bad_values() {
        assert!(Cli::try_parse_from(["hosts-bl", "--compression", "0"]).is_err());
        assert!(Cli::try_parse_from(["hosts-bl", "--compression", "10"]).is_err());
        assert!(Cli::try_parse_from(["hosts-bl", "-f", "bind"]).is_err());
        assert!(Cli::try_parse_from(["hosts-bl", "--dupe", "--dupe"]).is_err());
        assert!(Cli::try_parse_from(["hosts-bl", "-f", "rpz", "-f", "hosts"]).is_err());
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_print_usage() {
        let mut out = Vec::new();
        print_usage(&mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("Usage"));
    }

    #[test]
    fn test_print_usage_reports_write_error() {
        let err = print_usage(&mut ClosedPipe).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }
}
