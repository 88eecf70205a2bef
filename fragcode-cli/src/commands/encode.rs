use crate::manifest::Manifest;
use crate::read_input;
use anyhow::{Context, Result};
use fragcode_core::{record::encode_record, FragmentEncoder};
use std::fs;
use tracing::info;

/// Split `input` into fragments and write `M + redundancy` records to `output`
///
/// The manifest goes to `manifest`, or `<output>.json` when omitted.
pub fn execute(
    input: &str,
    output: &str,
    frag_size: usize,
    redundancy: usize,
    manifest: Option<&str>,
) -> Result<Manifest> {
    info!("Encoding {} into {} ({}-byte fragments)", input, output, frag_size);

    let message = read_input(input)?;
    let encoder = FragmentEncoder::from_message(&message, frag_size)
        .with_context(|| format!("Cannot split {} bytes into {}-byte fragments", message.len(), frag_size))?;
    let params = encoder.params();

    info!(
        "Message of {} bytes -> {} source fragments + {} redundancy",
        message.len(),
        params.m,
        redundancy
    );

    let mut output_data = Vec::new();
    for fragment in encoder.stream(0).take(params.m + redundancy) {
        let record = encode_record(params, &fragment)
            .with_context(|| format!("Failed to encode fragment {}", fragment.index))?;
        output_data.extend_from_slice(&record);
    }

    fs::write(output, &output_data)
        .with_context(|| format!("Failed to write output file: {}", output))?;

    let sidecar = Manifest::new(params, &message, redundancy);
    let manifest_path = manifest
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}.json", output));
    sidecar.save(&manifest_path)?;

    info!(
        "Wrote {} records ({} bytes) and manifest {}",
        params.m + redundancy,
        output_data.len(),
        manifest_path
    );

    Ok(sidecar)
}
