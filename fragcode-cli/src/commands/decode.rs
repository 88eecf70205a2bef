use crate::manifest::Manifest;
use crate::read_input;
use anyhow::{bail, Context, Result};
use colored::*;
use fragcode_core::{
    decoder::DecodeStats, scanner::scan_records_with_stats, FragmentDecoder, SubmitOutcome,
};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Recover the message carried by the records in `input` and write it to `output`
///
/// Uses the manifest at `manifest`, or `<input>.json` when it exists, to
/// strip padding and verify the result. Without one the whole M × frag_size
/// block is written.
pub fn execute(input: &str, output: &str, manifest: Option<&str>) -> Result<DecodeStats> {
    info!("Decoding records from {}", input);

    let data = read_input(input)?;
    let sidecar = load_manifest(input, manifest)?;

    let (located, scan) = scan_records_with_stats(&data);
    info!(
        "Found {} intact records ({} damaged)",
        scan.records_found, scan.decode_failures
    );

    let Some(first) = located.first() else {
        bail!("No intact fragment records found in {}", input);
    };

    let params = match &sidecar {
        Some(m) => m.params,
        None => first.record.params,
    };
    let mut decoder = FragmentDecoder::new(params)?;

    let mut skipped = 0;
    for lr in &located {
        if lr.record.params != params {
            warn!(
                "Skipping record at offset {}: parameters {:?} do not match session {:?}",
                lr.offset, lr.record.params, params
            );
            skipped += 1;
            continue;
        }

        let outcome = decoder.submit_fragment(&lr.record.fragment)?;
        debug!("Fragment {}: {:?}", lr.record.fragment.index, outcome);
        if outcome == SubmitOutcome::Complete {
            break;
        }
    }

    let stats = decoder.stats();
    if !decoder.is_complete() {
        println!(
            "{} Not enough fragments: {} of {} pivots still missing",
            "✗".red(),
            decoder.missing_count(),
            params.m
        );
        bail!(
            "Decoding incomplete: {} pivots missing",
            decoder.missing_count()
        );
    }

    let len = sidecar
        .as_ref()
        .map(|m| m.message_len)
        .unwrap_or(params.block_len());
    let message = decoder.into_message(len)?;

    if let Some(sidecar) = &sidecar {
        sidecar.verify(&message)?;
        info!("BLAKE3 digest verified");
    }

    fs::write(output, &message)
        .with_context(|| format!("Failed to write output file: {}", output))?;

    println!("\n=== Decode Results ===");
    println!("Records used:      {}", stats.submitted);
    println!("Redundant:         {}", stats.redundant);
    println!("Skipped:           {}", skipped);
    println!("Overhead:          {:.2}%", stats.overhead());
    println!("{} Recovered {} bytes to {}", "✓".green(), message.len(), output);

    Ok(stats)
}

fn load_manifest(input: &str, manifest: Option<&str>) -> Result<Option<Manifest>> {
    if let Some(path) = manifest {
        return Manifest::load(path).map(Some);
    }

    let default = format!("{}.json", input);
    if input != "-" && Path::new(&default).exists() {
        info!("Using manifest {}", default);
        return Manifest::load(&default).map(Some);
    }

    Ok(None)
}
