use anyhow::{bail, Result};
use colored::*;
use fragcode_core::{FragmentDecoder, FragmentEncoder, SubmitOutcome};
use rand::{Rng, RngCore, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Aggregate results of a simulation run
#[derive(Debug, Clone, Default, Serialize)]
pub struct SimulationReport {
    /// Trials run
    pub trials: usize,

    /// Trials that recovered the message
    pub completed: usize,

    /// Trials that gave up before completing
    pub failed: usize,

    /// Mean fragments transmitted per completed trial
    pub mean_sent: f64,

    /// Mean fragments received per completed trial
    pub mean_received: f64,

    /// Mean redundant fragments per completed trial
    pub mean_redundant: f64,
}

/// Send fragments through a channel losing each with probability `loss`
/// until the receiver completes, `trials` times.
pub fn execute(
    fragments: usize,
    frag_size: usize,
    loss: f64,
    trials: usize,
    seed: u64,
) -> Result<SimulationReport> {
    if !(0.0..1.0).contains(&loss) {
        bail!("Loss probability must be in [0, 1), got {}", loss);
    }

    info!(
        "Simulating {} trials: M={}, fragment size={}, loss={:.1}%",
        trials,
        fragments,
        frag_size,
        loss * 100.0
    );

    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let mut report = SimulationReport {
        trials,
        ..Default::default()
    };
    let (mut sent_total, mut received_total, mut redundant_total) = (0usize, 0usize, 0usize);

    // Give up well past anything a working code needs
    let budget = 16 * fragments + 64;

    for trial in 0..trials {
        let mut message = vec![0u8; fragments * frag_size];
        rng.fill_bytes(&mut message);

        let encoder = FragmentEncoder::from_message(&message, frag_size)?;
        if encoder.params().m != fragments {
            bail!("Fragment count {} out of range", fragments);
        }
        let mut decoder = FragmentDecoder::new(encoder.params())?;

        let mut sent = 0;
        for fragment in encoder.stream(0).take(budget) {
            sent += 1;
            if rng.gen_bool(loss) {
                continue;
            }
            if decoder.submit_fragment(&fragment)? == SubmitOutcome::Complete {
                break;
            }
        }

        if !decoder.is_complete() {
            warn!("Trial {} gave up after {} fragments", trial, sent);
            report.failed += 1;
            continue;
        }

        let stats = decoder.stats();
        if decoder.recovered() != Some(message.as_slice()) {
            bail!("Trial {} recovered the wrong data", trial);
        }
        debug!(
            "Trial {}: sent {}, received {}, redundant {}",
            trial, sent, stats.submitted, stats.redundant
        );

        report.completed += 1;
        sent_total += sent;
        received_total += stats.submitted;
        redundant_total += stats.redundant;
    }

    if report.completed > 0 {
        let n = report.completed as f64;
        report.mean_sent = sent_total as f64 / n;
        report.mean_received = received_total as f64 / n;
        report.mean_redundant = redundant_total as f64 / n;
    }

    println!("\n=== Simulation Results ===");
    println!("Trials:            {}", report.trials);
    println!("Completed:         {}", report.completed.to_string().green());
    if report.failed > 0 {
        println!("Failed:            {}", report.failed.to_string().red());
    } else {
        println!("Failed:            {}", report.failed);
    }
    println!("Mean sent:         {:.2}", report.mean_sent);
    println!("Mean received:     {:.2}", report.mean_received);
    println!("Mean redundant:    {:.2}", report.mean_redundant);

    Ok(report)
}
