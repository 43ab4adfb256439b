//! Domain Services
//!
//! Pure functions over request bodies.

/// Re-serialize a JSON body with object keys in sorted order
///
/// An empty (or whitespace-only) body canonicalizes to `null`. Anything that
/// is not valid JSON is an error.
pub fn canonical_json(body: &[u8]) -> Result<String, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok("null".to_string());
    }
    // serde_json's default map is a BTreeMap, so keys come out sorted
    let value: serde_json::Value = serde_json::from_slice(body)?;
    serde_json::to_string(&value)
}

/// Whole seconds until `remaining_ms` elapses, rounded up
pub fn ceil_secs(remaining_ms: i64) -> u64 {
    (remaining_ms.max(0) as u64).div_ceil(1000)
}
