//! Demonstration of the receive window under a simulated lossy multicast feed.

use rxwindow::{SlotState, Window, WindowConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("rxwindow - PGM-style receive window demonstration");
    println!("==================================================");

    let config = WindowConfig::new(1500)?.with_capacity(256)?.with_preallocate(32);

    let mut delivered = Vec::new();
    let mut window = Window::new(config, |payload| delivered.push(payload))?;

    println!("\nSimulating an in-order burst...");
    window.push(b"packet-100", 100, 100)?;
    window.push(b"packet-101", 101, 100)?;
    println!("  delivered so far: {}", delivered.len());

    println!("\nSimulating a dropped packet (103 arrives before 102)...");
    window.push(b"packet-103", 103, 100)?;
    println!(
        "  delivered: {}, backoff placeholders pending: {}",
        delivered.len(),
        window.stats().gap_placeholders_created
    );

    println!("\nA NAK manager would now walk the BackOff queue to send NAKs:");
    window.state_foreach(SlotState::BackOff, |_payload, seq, state, age, _retry| {
        println!("  seq {seq} has been in BackOff for {age:.3}s, sending NAK -> WaitNcf");
        *state = SlotState::WaitNcf;
        false
    });

    println!("\nSender confirms the retransmission with an NCF...");
    window.ncf(102, 100)?;

    println!("\nThe retransmitted packet finally arrives...");
    window.push(b"packet-102", 102, 100)?;
    println!("  delivered so far: {}", delivered.len());

    println!("\nFinal stats: {:?}", window.stats());
    window.shutdown();

    for (i, payload) in delivered.iter().enumerate() {
        println!("  [{i}] {}", String::from_utf8_lossy(payload));
    }

    Ok(())
}
