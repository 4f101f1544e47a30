//! mpflash
//!
//! Command-line front-end for mpflash-core. Status goes to stdout as one JSON
//! object per line; diagnostics go through `env_logger` (`RUST_LOG`).

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::debug;
use serde_json::json;

use mpflash_core::constants::{DEFAULT_OUTPUT_DIR, DEFAULT_SCRIPT_NAME, MICROPYTHON_VERSION};
use mpflash_core::flash::{FlashRequest, Flasher, RuntimeSource, ScriptSource};
use mpflash_core::records::extract_script;

#[derive(Parser, Debug)]
#[command(name = "mpflash", version)]
#[command(about = "Flash a MicroPython script onto a BBC micro:bit.")]
struct Cli {
    /// Python script (.py) to embed. Omit to flash the bare runtime.
    source: Option<PathBuf>,

    /// Device volume to flash; repeat for several. Discovered automatically when omitted.
    #[arg(short, long = "target", value_name = "VOLUME")]
    targets: Vec<PathBuf>,

    /// Script text to embed instead of a file.
    #[arg(long, conflicts_with = "source")]
    code: Option<String>,

    /// Name for the local copy of an inline script.
    #[arg(long)]
    name: Option<String>,

    /// MicroPython runtime hex image.
    #[arg(short, long, env = "MPFLASH_RUNTIME")]
    runtime: Option<PathBuf>,

    /// Minify the script before embedding.
    #[arg(short, long)]
    minify: bool,

    /// Directory for the local copy of the image.
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Do not keep a local copy.
    #[arg(long)]
    no_local_copy: bool,

    /// Write to all devices at once.
    #[arg(long)]
    parallel: bool,

    /// Print the script embedded in a hex file and exit.
    #[arg(short, long, value_name = "HEX", conflicts_with_all = ["source", "code"])]
    extract: Option<PathBuf>,
}

fn message(msg: impl AsRef<str>) {
    println!("{}", json!({ "message": msg.as_ref() }));
}

fn extract(path: &Path) -> Result<()> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading hex: {}", path.display()))?;
    let script = extract_script(&text)
        .with_context(|| format!("extracting script from {}", path.display()))?;
    io::stdout().write_all(&script).context("writing script to stdout")?;
    Ok(())
}

fn request_from(cli: &Cli) -> FlashRequest {
    let script = match (&cli.source, &cli.code) {
        (Some(path), _) => Some(ScriptSource::File(path.clone())),
        (None, Some(code)) => Some(ScriptSource::Inline {
            name: cli.name.clone().unwrap_or_else(|| DEFAULT_SCRIPT_NAME.to_string()),
            bytes: code.clone().into_bytes(),
        }),
        (None, None) => None,
    };

    let mut request = FlashRequest::new()
        .targets(cli.targets.iter().cloned())
        .minify(cli.minify)
        .parallel(cli.parallel)
        .output_dir((!cli.no_local_copy).then(|| cli.output_dir.clone()));
    if let Some(script) = script {
        request = request.script(script);
    }
    if let Some(runtime) = &cli.runtime {
        request = request.runtime(RuntimeSource::File(runtime.clone()));
    }
    request
}

fn run(cli: Cli) -> Result<bool> {
    if let Some(path) = &cli.extract {
        extract(path)?;
        return Ok(true);
    }

    debug!("MicroPython runtime version {}", MICROPYTHON_VERSION);
    let request = request_from(&cli);
    let report = Flasher::new().flash(&request).context("flashing")?;

    println!("{}", serde_json::to_string(&report).context("serialising report")?);
    if let Some(err) = &report.discovery_error {
        message(err);
    }
    if !report.device_found() {
        message("micro:bit not found");
        return Ok(true);
    }
    if report.all_devices_ok() {
        message(format!("flashed {} device(s)", report.devices.len()));
        Ok(true)
    } else {
        message("some devices could not be flashed");
        Ok(false)
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            message(format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("mpflash").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn inline_code_goes_to_explicit_target() {
        let cli = parse(&["--code", "print(1)", "--target", "/media/MICROBIT", "-r", "fw.hex"]);
        let request = request_from(&cli);

        assert_eq!(
            request.script,
            Some(ScriptSource::Inline { name: "my_hex".to_string(), bytes: b"print(1)".to_vec() })
        );
        assert_eq!(request.targets, vec![PathBuf::from("/media/MICROBIT")]);
        assert_eq!(request.runtime, Some(RuntimeSource::File(PathBuf::from("fw.hex"))));
    }

    #[test]
    fn file_source_with_several_targets() {
        let cli = parse(&["blink.py", "-t", "/a", "-t", "/b", "--name", "ignored"]);
        let request = request_from(&cli);

        assert_eq!(request.script, Some(ScriptSource::File(PathBuf::from("blink.py"))));
        assert_eq!(request.targets, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
        assert_eq!(request.output_dir, Some(PathBuf::from(DEFAULT_OUTPUT_DIR)));
    }

    #[test]
    fn named_inline_script_and_flags() {
        let cli = parse(&["--code", "x=1", "--name", "blink", "-m", "--parallel", "--no-local-copy"]);
        let request = request_from(&cli);

        assert_eq!(request.script.as_ref().map(ScriptSource::name).as_deref(), Some("blink"));
        assert!(request.minify);
        assert!(request.parallel);
        assert!(request.targets.is_empty());
        assert_eq!(request.output_dir, None);
    }

    #[test]
    fn no_script_flashes_bare_runtime() {
        let request = request_from(&parse(&["-o", "out"]));
        assert_eq!(request.script, None);
        assert_eq!(request.output_dir, Some(PathBuf::from("out")));
    }

    #[test]
    fn code_conflicts_with_source() {
        assert!(Cli::try_parse_from(["mpflash", "blink.py", "--code", "x=1"]).is_err());
        assert!(Cli::try_parse_from(["mpflash", "-e", "a.hex", "--code", "x=1"]).is_err());
    }
}
