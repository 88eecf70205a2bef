use crate::read_input;
use anyhow::Result;
use colored::*;
use fragcode_core::{matrix::parity_row, scanner::scan_records_with_stats, FragmentDecoder};
use std::collections::BTreeMap;
use tracing::info;

pub fn execute(input: &str, list: bool) -> Result<()> {
    info!("Inspecting file: {}", input);

    let data = read_input(input)?;
    info!("File size: {} bytes", data.len());

    let (located, stats) = scan_records_with_stats(&data);

    println!("\n=== Scan Results ===");
    println!("Bytes scanned:     {} bytes", stats.bytes_scanned);
    println!("Markers found:     {}", stats.markers_found);
    println!("Valid records:     {}", stats.records_found);
    println!("Decode failures:   {}", stats.decode_failures);
    println!("Bytes recovered:   {} bytes", stats.bytes_recovered);
    println!("Recovery rate:     {:.2}%", stats.recovery_rate());

    if located.is_empty() {
        println!("{} No valid records found", "✗".red());
        return Ok(());
    }

    // A stream may in principle mix sessions; report each separately
    let mut sessions: BTreeMap<(usize, usize), Vec<_>> = BTreeMap::new();
    for lr in &located {
        sessions
            .entry((lr.record.params.m, lr.record.params.frag_size))
            .or_default()
            .push(lr);
    }

    for ((m, frag_size), records) in &sessions {
        println!("\n=== Session M={} fragment size={} ===", m, frag_size);

        let mut decoder = FragmentDecoder::with_size(*m, *frag_size)?;
        let systematic = records
            .iter()
            .filter(|lr| (lr.record.fragment.index as usize) < *m)
            .count();

        for lr in records {
            let fragment = &lr.record.fragment;
            let outcome = decoder.submit_fragment(fragment)?;
            if list {
                let row = parity_row(fragment.index, *m)?;
                println!(
                    "  #{:<6} @ {:<8} weight {:<5} {:?}",
                    fragment.index,
                    lr.offset,
                    row.weight(),
                    outcome
                );
            }
        }

        println!("Records:           {}", records.len());
        println!("Systematic:        {}", systematic);
        println!("Redundancy:        {}", records.len() - systematic);
        if decoder.is_complete() {
            println!("{} Decodable", "✓".green());
        } else {
            println!(
                "{} Not decodable: {} pivots missing",
                "✗".red(),
                decoder.missing_count()
            );
        }
    }

    Ok(())
}
