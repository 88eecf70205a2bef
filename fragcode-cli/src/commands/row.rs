use anyhow::Result;
use fragcode_core::{bitvec::get_bit, matrix::parity_row};

/// Print row `index` of the parity matrix for `fragments` source fragments
pub fn execute(index: u32, fragments: usize) -> Result<()> {
    let row = parity_row(index, fragments)?;
    println!("{}", format_row(row.as_bytes(), row.width()));
    println!(
        "index {} ({}), weight {}",
        index,
        if row.is_systematic() {
            "systematic"
        } else {
            "redundancy"
        },
        row.weight()
    );
    Ok(())
}

/// Render the first `width` bits as '0'/'1', MSB first
pub fn format_row(bits: &[u8], width: usize) -> String {
    (0..width)
        .map(|i| {
            if get_bit(bits, i) {
                '1'
            } else {
                '0'
            }
        })
        .collect()
}
