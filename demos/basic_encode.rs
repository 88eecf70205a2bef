//! Basic encoding example

use fragcode_core::{record::encode_record, FragmentEncoder};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Fragcode Basic Encoding Example\n");

    let message = b"Firmware image chunk destined for a fleet of sensors on a lossy uplink";
    let encoder = FragmentEncoder::from_message(message, 8)?;
    let params = encoder.params();

    println!(
        "Message: {} bytes -> {} fragments of {} bytes",
        message.len(),
        params.m,
        params.frag_size
    );

    // The first M records carry the message verbatim, the rest are redundancy
    let redundancy = params.m / 2;
    let mut output = Vec::new();
    for fragment in encoder.stream(0).take(params.m + redundancy) {
        let record = encode_record(params, &fragment)?;
        println!("Fragment {:>3}: {} bytes", fragment.index, record.len());
        output.extend_from_slice(&record);
    }

    std::fs::write("example_output.frag", &output)?;

    println!("\nWrote {} bytes to example_output.frag", output.len());
    println!("Use 'fragcode inspect --input example_output.frag' to read it back");

    Ok(())
}
