// TF-IDF vector index over one document's chunk list. The index is rebuilt
// wholesale whenever the chunk set changes; vectors from different builds
// are never mixed, which keeps every vector in one build at the same
// dimensionality.


use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::segmenter::Chunk;
use crate::tokenizer::tokenize;

#[derive(Debug, Clone, Default)]
pub struct VectorIndex {
    vocabulary: Vec<String>,
    term_indices: HashMap<String, usize>,
    idf: Vec<f32>,
    chunk_vectors: HashMap<String, Vec<f32>>,
}

impl VectorIndex {
    /// Build an index over a document's full chunk list. Vocabulary order is
    /// arbitrary but fixed for the life of this build.
    #[inline]
    pub fn build(chunks: &[Chunk]) -> Self {
        let chunk_tokens: Vec<Vec<String>> =
            chunks.iter().map(|chunk| tokenize(&chunk.text)).collect();

        let mut vocabulary = Vec::new();
        let mut term_indices: HashMap<String, usize> = HashMap::new();
        let mut containing_chunks: Vec<usize> = Vec::new();

        for tokens in &chunk_tokens {
            let mut seen_in_chunk: HashSet<&str> = HashSet::new();
            for token in tokens {
                if !term_indices.contains_key(token) {
                    term_indices.insert(token.clone(), vocabulary.len());
                    vocabulary.push(token.clone());
                    containing_chunks.push(0);
                }
                if seen_in_chunk.insert(token.as_str()) {
                    containing_chunks[term_indices[token.as_str()]] += 1;
                }
            }
        }

        let total = chunks.len() as f32;
        // Smoothed IDF: the raw ln(total/containing) collapses to an all-zero
        // index when a document has a single chunk (or a term occurs in every
        // chunk), which would make small documents unsearchable.
        let idf: Vec<f32> = containing_chunks
            .iter()
            .map(|&containing| (total / containing.max(1) as f32).ln() + 1.0)
            .collect();

        let mut chunk_vectors = HashMap::with_capacity(chunks.len());
        for (chunk, tokens) in chunks.iter().zip(&chunk_tokens) {
            let mut vector = vec![0.0_f32; vocabulary.len()];
            if !tokens.is_empty() {
                let token_count = tokens.len() as f32;
                let mut counts: HashMap<&str, usize> = HashMap::new();
                for token in tokens {
                    *counts.entry(token.as_str()).or_insert(0) += 1;
                }
                for (term, count) in counts {
                    let index = term_indices[term];
                    let tf = count as f32 / token_count;
                    vector[index] = tf * idf[index];
                }
                l2_normalize(&mut vector);
            }
            chunk_vectors.insert(chunk.id.clone(), vector);
        }

        debug!(
            "Built vector index: {} chunks, {} terms",
            chunks.len(),
            vocabulary.len()
        );

        Self {
            vocabulary,
            term_indices,
            idf,
            chunk_vectors,
        }
    }

    /// Dimensionality shared by every vector in this build.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.vocabulary.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chunk_vectors.is_empty()
    }

    #[inline]
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    #[inline]
    pub fn chunk_vector(&self, chunk_id: &str) -> Option<&[f32]> {
        self.chunk_vectors.get(chunk_id).map(Vec::as_slice)
    }

    /// Vectorize a query against this build's vocabulary. Terms the
    /// vocabulary does not contain are silently ignored.
    #[inline]
    pub fn vectorize_query(&self, query: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; self.vocabulary.len()];
        for token in tokenize(query) {
            if let Some(&index) = self.term_indices.get(&token) {
                vector[index] += 1.0;
            }
        }
        l2_normalize(&mut vector);
        vector
    }
}

/// Dot product of two equal-length vectors; for L2-normalized inputs this
/// is the cosine similarity.
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn l2_normalize(vector: &mut [f32]) {
    let magnitude = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if magnitude > 0.0 {
        for value in vector.iter_mut() {
            *value /= magnitude;
        }
    }
}
