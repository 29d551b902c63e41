// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Subcommand implementations.
//!
//! Every command writes its result to the supplied writer (stdout in the
//! binary) unless an output path is given.

use crate::cli::{ConvertArgs, Format, InspectArgs, SampleArgs};
use crate::config::CliConfig;
use anyhow::{Context, Result};
use comfy_table::{ContentArrangement, Table};
use hitpack_codec::{binary, document, CodecLimits, DocumentCodec, DocumentMode};
use hitpack_model::{SearchResponse, TotalHits};
use hitpack_testkit::Generator;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::{debug, info};

/// Decode `input` and re-encode it in the target form.
pub fn convert(args: &ConvertArgs, config: &CliConfig, out: &mut dyn Write) -> Result<()> {
    let bytes = read_input(&args.input)?;
    let mode = if args.strict {
        DocumentMode::Strict
    } else {
        config.document_mode
    };
    let response = decode(&bytes, args.from, config.limits, mode)
        .with_context(|| format!("decode {} input {}", args.from, args.input.display()))?;
    let encoded = encode(&response, args.to, config.limits, args.pretty || config.pretty)?;
    info!(
        from = %args.from,
        to = %args.to,
        bytes_in = bytes.len(),
        bytes_out = encoded.len(),
        "converted envelope"
    );
    write_output(args.output.as_deref(), &encoded, out)
}

/// Print a summary table of the envelope in `input`.
pub fn inspect(args: &InspectArgs, config: &CliConfig, out: &mut dyn Write) -> Result<()> {
    let bytes = read_input(&args.input)?;
    let format = args.format.unwrap_or_else(|| detect(&bytes));
    debug!(%format, "inspecting envelope");
    let response = decode(&bytes, format, config.limits, config.document_mode)
        .with_context(|| format!("decode {format} input {}", args.input.display()))?;
    writeln!(out, "{}", summary_table(&response))?;
    Ok(())
}

/// Write the envelope generated from `args.seed`.
pub fn sample(args: &SampleArgs, config: &CliConfig, out: &mut dyn Write) -> Result<()> {
    let response = Generator::new(args.seed).response()?;
    let encoded = encode(&response, args.format, config.limits, args.pretty || config.pretty)?;
    info!(seed = args.seed, format = %args.format, bytes = encoded.len(), "generated envelope");
    write_output(args.output.as_deref(), &encoded, out)
}

/// Decode bytes in the given form.
pub fn decode(
    bytes: &[u8],
    format: Format,
    limits: CodecLimits,
    mode: DocumentMode,
) -> Result<SearchResponse> {
    let response = match format {
        Format::Binary => binary::decode_with_limits(bytes, limits)?,
        Format::Json => DocumentCodec { mode }.decode_slice(bytes)?,
    };
    Ok(response)
}

/// Encode in the given form; JSON output ends with a newline.
pub fn encode(
    response: &SearchResponse,
    format: Format,
    limits: CodecLimits,
    pretty: bool,
) -> Result<Vec<u8>> {
    Ok(match format {
        Format::Binary => binary::encode_with_limits(response, limits)?,
        Format::Json => {
            let mut text = if pretty {
                document::to_string_pretty(response)?
            } else {
                document::to_string(response)?
            };
            text.push('\n');
            text.into_bytes()
        }
    })
}

/// Guess the form of `bytes`.
///
/// A binary envelope starts with a 0/1 presence flag, a document with `{`
/// after optional whitespace.
pub fn detect(bytes: &[u8]) -> Format {
    match bytes.iter().find(|b| !b.is_ascii_whitespace()) {
        Some(b'{') => Format::Json,
        _ => Format::Binary,
    }
}

/// Two-column summary: shape, record count, total, timing and async state.
pub fn summary_table(response: &SearchResponse) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["FIELD", "VALUE"]);

    let (shape, records, total) = match response.hits() {
        Some(hits) => (
            hits.kind().to_string(),
            hits.len().to_string(),
            hits.total().map_or_else(|| "-".to_owned(), format_total),
        ),
        None => ("absent".to_owned(), "-".to_owned(), "-".to_owned()),
    };
    table.add_row(vec!["shape".to_owned(), shape]);
    table.add_row(vec!["records".to_owned(), records]);
    table.add_row(vec!["total".to_owned(), total]);
    table.add_row(vec!["took".to_owned(), format!("{} ms", response.took())]);
    table.add_row(vec!["timed_out".to_owned(), response.timed_out().to_string()]);
    match response.async_state() {
        Some(state) => {
            table.add_row(vec!["id".to_owned(), state.id.clone()]);
            table.add_row(vec!["is_running".to_owned(), state.is_running.to_string()]);
            table.add_row(vec!["is_partial".to_owned(), state.is_partial.to_string()]);
        }
        None => {
            table.add_row(vec!["async".to_owned(), "none".to_owned()]);
        }
    }
    table
}

fn format_total(total: &TotalHits) -> String {
    format!("{} ({})", total.count, total.relation.as_str())
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut bytes = Vec::new();
        io::stdin()
            .lock()
            .read_to_end(&mut bytes)
            .context("read stdin")?;
        return Ok(bytes);
    }
    fs::read(path).with_context(|| format!("read {}", path.display()))
}

fn write_output(path: Option<&Path>, bytes: &[u8], out: &mut dyn Write) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, bytes).with_context(|| format!("write {}", path.display()))?;
            info!(path = %path.display(), "wrote output");
        }
        None => {
            out.write_all(bytes)?;
            out.flush()?;
        }
    }
    Ok(())
}
