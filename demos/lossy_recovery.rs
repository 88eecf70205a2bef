//! Example demonstrating recovery across a lossy, corrupting channel

use fragcode_core::{
    record::encode_record, scanner::scan_records_with_stats, FragmentDecoder, FragmentEncoder,
    SubmitOutcome,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Fragcode Lossy Recovery Example\n");

    // Step 1: Encode a message with 50% redundancy
    println!("Step 1: Encoding...");
    let message: Vec<u8> = (0..400u32).map(|i| (i % 251) as u8).collect();
    let encoder = FragmentEncoder::from_message(&message, 20)?;
    let params = encoder.params();

    let mut stream = Vec::new();
    let mut offsets = Vec::new();
    for fragment in encoder.stream(0).take(params.m * 3 / 2) {
        offsets.push(stream.len());
        stream.extend_from_slice(&encode_record(params, &fragment)?);
    }
    println!(
        "{} source fragments, {} records, {} bytes\n",
        params.m,
        offsets.len(),
        stream.len()
    );

    // Step 2: Lose every fifth record outright and corrupt two more
    println!("Step 2: Simulating the channel...");
    let mut received = Vec::new();
    for (k, &start) in offsets.iter().enumerate() {
        let end = offsets.get(k + 1).copied().unwrap_or(stream.len());
        if k % 5 == 0 {
            continue;
        }
        received.extend_from_slice(&stream[start..end]);
    }
    received[30] ^= 0xFF;
    let mid = received.len() / 2;
    received[mid] ^= 0x0F;
    println!("Channel delivered {} of {} bytes\n", received.len(), stream.len());

    // Step 3: Scan and decode
    println!("Step 3: Scanning and decoding...");
    let (located, stats) = scan_records_with_stats(&received);
    println!(
        "Intact records: {}, damaged: {}",
        stats.records_found, stats.decode_failures
    );

    let mut decoder = FragmentDecoder::new(params)?;
    for lr in &located {
        let outcome = decoder.submit_fragment(&lr.record.fragment)?;
        if outcome == SubmitOutcome::Complete {
            println!("Complete after fragment {}", lr.record.fragment.index);
            break;
        }
    }

    if decoder.is_complete() {
        let recovered = decoder.into_message(message.len())?;
        assert_eq!(recovered, message);
        println!("\n✓ Message recovered intact");
    } else {
        println!(
            "\n✗ Still missing {} pivots; more redundancy needed",
            decoder.missing_count()
        );
    }

    Ok(())
}
