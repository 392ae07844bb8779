//! Minimal example: drive the enclave through one ENCRYPT/DECRYPT cycle.
//!
//! Run with: `cargo run --example round_trip`
//!
//! Uses the same fixed sample vectors as the built-in self test, prints
//! the sealed output, and finishes with the audit trail of the session.
//! Fixed IVs are for the demo only — in production every encryption under
//! a given key needs a fresh nonce, and that duty sits with the caller.

use keycell::Invoker;

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let key: Vec<u8> = (0x00..=0x0f).collect();
    let iv: Vec<u8> = (0xa0..=0xab).collect();
    let plaintext = b"Hello AES-GCM";

    let mut invoker = Invoker::new();

    let sealed = invoker.encrypt(&key, &iv, plaintext)?;
    println!(
        "sealed {} plaintext bytes into {} bytes (ciphertext || tag)",
        plaintext.len(),
        sealed.len()
    );
    println!("  {}", hex(&sealed));

    let opened = invoker.decrypt(&key, &iv, &sealed)?;
    assert_eq!(opened, plaintext);
    println!("recovered: {:?}", String::from_utf8_lossy(&opened));

    let mac = invoker.mac_compute(&key, plaintext)?;
    println!("hmac-sha256: {}", hex(&mac));

    invoker.self_test()?;
    println!("self test passed");

    println!("audit trail:");
    for event in invoker.enclave().audit_log().iter() {
        println!("  cmd {} -> {} @ {}", event.command_id, event.outcome, event.at);
    }

    Ok(())
}
