use log::debug;

use crate::constants::TRAILER_RECORDS;
use crate::records::RecordStream;
use crate::splice::types::{CompositeImage, RuntimeImage, SpliceError};

/// Insert script records `TRAILER_RECORDS` lines before the end of the runtime.
///
/// An empty script returns the runtime text unchanged.
pub fn splice(runtime: &RuntimeImage, script: &RecordStream) -> CompositeImage {
    if script.is_empty() {
        return CompositeImage::from_text(runtime.as_str().to_owned());
    }
    let lines = script.lines();
    splice_lines(runtime, lines.iter().map(String::as_str))
}

/// Text form of [`splice`]: runtime hex + script hex → composite hex.
pub fn embed_hex(runtime_hex: &str, script_hex: &str) -> Result<String, SpliceError> {
    let runtime = RuntimeImage::new(runtime_hex)?;
    if script_hex.trim().is_empty() {
        return Ok(runtime.as_str().to_owned());
    }
    Ok(splice_lines(&runtime, script_hex.split_whitespace()).into_string())
}

fn splice_lines<'a>(
    runtime: &'a RuntimeImage,
    script: impl Iterator<Item = &'a str>,
) -> CompositeImage {
    let runtime_lines = runtime.lines();
    // Runtimes shorter than the trailer get the script in front.
    let split = runtime_lines.len().saturating_sub(TRAILER_RECORDS);
    let (body, trailer) = runtime_lines.split_at(split);

    let mut out: Vec<&str> = Vec::with_capacity(runtime_lines.len() + TRAILER_RECORDS);
    out.extend_from_slice(body);
    let before = out.len();
    out.extend(script);
    let inserted = out.len() - before;
    out.extend_from_slice(trailer);

    debug!("spliced {} script records at line {} of {}", inserted, split + 1, runtime_lines.len());

    let mut text = out.join("\n");
    text.push('\n');
    CompositeImage::from_text(text)
}
