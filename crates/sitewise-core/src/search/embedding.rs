//! Deterministic pseudo-embedding and cosine similarity
//!
//! The embedding is a seeded stand-in for a trained model: the same text
//! always yields the same vector.

/// Length of every embedding vector
pub const EMBEDDING_DIMENSIONS: usize = 1536;

/// Embed text into a vector with components in `[0, 1)`.
///
/// The seed is the sum of the text's UTF-16 code units; component `i` is the
/// fractional part of `sin(seed + i) * 10000`.
pub fn pseudo_embed(text: &str) -> Vec<f64> {
    let mut seed: f64 = text.encode_utf16().map(|unit| unit as f64).sum();

    (0..EMBEDDING_DIMENSIONS)
        .map(|_| {
            let x = seed.sin() * 10000.0;
            seed += 1.0;
            x - x.floor()
        })
        .collect()
}

/// Compute cosine similarity between two vectors.
///
/// Zero when the lengths differ or either vector has zero magnitude.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
