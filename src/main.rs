use anyhow::Context;
use clap::{CommandFactory, Parser};
use packnam::{parse_number, EncodeOptions, Nametable, DEFAULT_VRAM_ADDRESS, DEFAULT_WIDTH};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

/// major.minor, the way the tool has always reported itself
const PROGRAM_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION_MAJOR"),
    ".",
    env!("CARGO_PKG_VERSION_MINOR")
);

#[derive(Parser)]
#[command(name = "packnam", version = PROGRAM_VERSION)]
#[command(about = "Packs a nametable into VRAM update commands", long_about = None)]
struct Cli {
    /// Width of input is NUM tiles
    #[arg(long, value_name = "NUM", default_value_t = DEFAULT_WIDTH, value_parser = parse_width)]
    width: usize,

    /// VRAM start address
    #[arg(long, value_name = "NUM", default_value_t = DEFAULT_VRAM_ADDRESS, value_parser = parse_address)]
    vram_address: u16,

    /// Store encoded data in FILE
    #[arg(long, value_name = "FILE", default_value = "packnam.dat")]
    output: PathBuf,

    /// Give a short usage message
    #[arg(long)]
    usage: bool,

    /// Nametable to pack
    #[arg(required_unless_present = "usage")]
    input: Option<PathBuf>,
}

fn parse_width(s: &str) -> Result<usize, String> {
    let width = parse_number(s).map_err(|e| e.to_string())?;
    match usize::try_from(width) {
        Ok(width) if width > 0 => Ok(width),
        _ => Err("width must be at least 1 tile".to_owned()),
    }
}

fn parse_address(s: &str) -> Result<u16, String> {
    let addr = parse_number(s).map_err(|e| e.to_string())?;
    u16::try_from(addr).map_err(|_| format!("address 0x{addr:X} is past 0xFFFF"))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    if cli.usage {
        println!("{}", Cli::command().render_usage());
        return Ok(());
    }
    let Some(input_path) = cli.input else {
        anyhow::bail!("no filename given");
    };

    let input = File::open(&input_path)
        .with_context(|| format!("failed to open `{}' for reading", input_path.display()))?;
    let nametable = Nametable::read_from(input)
        .with_context(|| format!("failed to read `{}'", input_path.display()))?;
    if nametable.len() < cli.width {
        log::warn!(
            "`{}' holds {} bytes, less than one row of {} tiles",
            input_path.display(),
            nametable.len(),
            cli.width
        );
    }

    let options = EncodeOptions {
        width: cli.width,
        vram_address: cli.vram_address,
    };
    let packed = nametable
        .encode(&options)
        .with_context(|| format!("failed to pack `{}'", input_path.display()))?;

    let output = File::create(&cli.output)
        .with_context(|| format!("failed to open `{}' for writing", cli.output.display()))?;
    packed
        .write_to(BufWriter::new(output))
        .with_context(|| format!("failed to write `{}'", cli.output.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["packnam", "level.nam"]).unwrap();
        assert_eq!(cli.width, DEFAULT_WIDTH);
        assert_eq!(cli.vram_address, DEFAULT_VRAM_ADDRESS);
        assert_eq!(cli.output, PathBuf::from("packnam.dat"));
        assert_eq!(cli.input, Some(PathBuf::from("level.nam")));
        assert!(!cli.usage);
    }

    #[test]
    fn test_numbers_take_c_prefixes() {
        let cli = Cli::try_parse_from([
            "packnam",
            "--width=0x20",
            "--vram-address=0x2400",
            "--output=out.bin",
            "level.nam",
        ])
        .unwrap();
        assert_eq!(cli.width, 32);
        assert_eq!(cli.vram_address, 0x2400);
        assert_eq!(cli.output, PathBuf::from("out.bin"));
        assert!(Cli::try_parse_from(["packnam", "--width=0", "level.nam"]).is_err());
        assert!(Cli::try_parse_from(["packnam", "--vram-address=0x10000", "level.nam"]).is_err());
    }

    #[test]
    fn test_usage_needs_no_input() {
        let cli = Cli::try_parse_from(["packnam", "--usage"]).unwrap();
        assert!(cli.usage);
        assert_eq!(cli.input, None);
        let usage = Cli::command().render_usage().to_string();
        assert!(usage.starts_with("Usage: packnam"));
        assert!(Cli::try_parse_from(["packnam"]).is_err());
    }

    #[test]
    fn test_version_is_major_minor() {
        assert_eq!(PROGRAM_VERSION, "1.0");
        let err = Cli::try_parse_from(["packnam", "--version"]).err().unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
        assert_eq!(err.to_string().trim(), "packnam 1.0");
    }
}
