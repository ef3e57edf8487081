//! Embedding <-> BLOB encoding. SQLite has no native vector column, so
//! embeddings round-trip as little-endian `f32` bytes.

pub fn embedding_to_blob(embedding: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(embedding.len() * 4);
    for v in embedding {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    bytes
}

pub fn blob_to_embedding(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let embedding = vec![0.1_f32, -0.2, 0.3, 1.0];
        let blob = embedding_to_blob(&embedding);
        let decoded = blob_to_embedding(&blob);
        assert_eq!(embedding, decoded);
    }
}
