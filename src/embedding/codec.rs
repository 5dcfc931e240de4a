//! JSON text encoding of embeddings stored on job and user rows.

/// Serialize an embedding to a JSON array.
pub fn encode_embedding(embedding: &[f32]) -> String {
    match serde_json::to_string(embedding) {
        Ok(encoded) => encoded,
        Err(error) => {
            log::error!("Failed to encode embedding: {error}");
            "[]".to_string()
        }
    }
}

/// Parse a stored embedding, reporting malformed input.
pub fn parse_embedding(encoded: &str) -> Result<Vec<f32>, serde_json::Error> {
    serde_json::from_str(encoded)
}

/// Parse a stored embedding, yielding an empty vector for malformed input.
///
/// An empty vector scores 0.0 against everything and is treated as an
/// invalid embedding by callers.
pub fn decode_embedding(encoded: &str) -> Vec<f32> {
    parse_embedding(encoded).unwrap_or_else(|error| {
        log::warn!("Failed to decode stored embedding: {error}");
        Vec::new()
    })
}
