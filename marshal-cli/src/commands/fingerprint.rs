//! `fingerprint`.

use marshal::Marshaler;

pub fn handle(marshaler: &Marshaler) -> Result<String, String> {
    let fingerprint = marshaler
        .fingerprint()
        .map_err(|e| format!("failed to fingerprint ABI: {e}"))?;
    Ok(fingerprint.to_hex())
}
