use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use log::{debug, info};

use hb_core::{convert, Config, Format, HashWidth, LineEnding, Source};

/// Path meaning stdin (as input) or stdout (as output).
pub const STDIO: &str = "-";

pub struct ConvertOptions {
    pub input: String,
    pub output: Option<String>,
    pub format: Format,
    pub group_size: Option<u8>,
    pub keep_duplicates: bool,
    pub keep_comments: bool,
    pub from_blackhole: String,
    pub to_blackhole: Option<String>,
    pub to_blackhole_v6: String,
    pub hash_width: u32,
    pub seed: Option<u64>,
    pub crlf: bool,
}

pub fn run_convert(opts: ConvertOptions) -> Result<(), String> {
    let config = build_config(&opts)?;
    config.validate().map_err(|e| e.to_string())?;

    let output = opts
        .output
        .clone()
        .unwrap_or_else(|| default_output(&opts.input, opts.format));
    debug!("{} -> {} ({})", opts.input, output, opts.format);

    let start = Instant::now();

    let mut source = if opts.input == STDIO {
        Source::from_reader(io::stdin().lock())
            .map_err(|e| format!("Failed to read stdin: {}", e))?
    } else {
        Source::open(&opts.input)
            .map_err(|e| format!("Failed to read '{}': {}", opts.input, e))?
    };

    let sink: Box<dyn Write> = if output == STDIO {
        Box::new(io::stdout().lock())
    } else {
        let file = File::create(&output)
            .map_err(|e| format!("Failed to create '{}': {}", output, e))?;
        Box::new(file)
    };
    let mut writer = BufWriter::new(sink);

    let summary = convert(&mut source, &config, &mut writer)
        .map_err(|e| format!("Failed to convert '{}': {}", opts.input, e))?;

    info!(
        "Wrote {} domain(s) and {} comment(s) to '{}' in {:.1}ms",
        summary.domains,
        summary.comments,
        output,
        start.elapsed().as_secs_f64() * 1000.0
    );

    Ok(())
}

fn build_config(opts: &ConvertOptions) -> Result<Config, String> {
    let hash_width = HashWidth::try_from(opts.hash_width).map_err(|e| e.to_string())?;

    let mut config = Config::new(opts.format);
    if let Some(group_size) = opts.group_size {
        config.group_size = group_size;
    }
    config.hash_width = hash_width;
    config.hash_seed = opts.seed.unwrap_or_else(rand::random);
    config.from_blackhole = opts.from_blackhole.clone();
    config.to_blackhole = opts.to_blackhole.clone();
    config.to_blackhole_v6 = opts.to_blackhole_v6.clone();
    config.dedupe = !opts.keep_duplicates;
    config.keep_comments = opts.keep_comments;
    config.line_ending = if opts.crlf { LineEnding::CrLf } else { LineEnding::Lf };
    Ok(config)
}

/// `<format>-<file name>` for files, stdout for stdin.
fn default_output(input: &str, format: Format) -> String {
    if input == STDIO {
        return STDIO.to_string();
    }
    let name = Path::new(input)
        .file_name()
        .unwrap_or_default()
        .to_string_lossy();
    format!("{}-{}", format.name(), name)
}
