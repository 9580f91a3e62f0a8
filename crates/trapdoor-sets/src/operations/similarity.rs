//! Similarity metrics over trapdoored values
//!
//! - Jaccard for Boolean sets (inclusion-exclusion over cardinality
//!   estimates) and for symmetric difference sets (bit overlap)
//! - MinHash signatures
//! - LSH banding over trapdoor bits
//! - Cosine similarity of hash bytes

use serde::Serialize;

use crate::adapters::Blake3KeyedHasher;
use crate::domain::hash_functions::{derive_word, encode_value, Domain};
use crate::domain::{
    Approx, ApproxBool, BooleanSet, FixedHash, KeyFingerprint, SymmetricDifferenceSet, Trapdoor,
    TrapdoorConfig, TrapdoorFactory,
};
use crate::error::{Result, TrapdoorError};
use crate::operations::cardinality::CardinalityEstimator;
use crate::ports::KeyedHasher;

/// J(A, B) = |A ∩ B| / |A ∪ B| for Boolean sets
///
/// Two empty sets are identical.
pub fn boolean_jaccard<E, T, const N: usize>(
    estimator: &E,
    a: &BooleanSet<T, N>,
    b: &BooleanSet<T, N>,
) -> Result<Approx<f64>>
where
    E: CardinalityEstimator,
    T: ?Sized,
{
    let intersection = a.intersection(b)?;
    let union = a.union(b)?;

    let card_i = estimator.estimate(&intersection);
    let card_u = estimator.estimate(&union);

    if *card_u.value() == 0 {
        return Ok(Approx::exact(1.0));
    }

    let similarity = (*card_i.value() as f64 / *card_u.value() as f64).min(1.0);
    Ok(Approx::with_error(
        similarity,
        card_i.error_rate().max(card_u.error_rate()),
    ))
}

/// Bit-overlap Jaccard for symmetric difference sets
pub fn symmetric_jaccard<T, const N: usize>(
    a: &SymmetricDifferenceSet<T, N>,
    b: &SymmetricDifferenceSet<T, N>,
) -> Result<Approx<f64>>
where
    T: ?Sized,
{
    a.key_fingerprint().combine(b.key_fingerprint())?;

    let common = (*a.hash() & *b.hash()).count_ones();
    let either = (*a.hash() | *b.hash()).count_ones();

    if either == 0 {
        return Ok(Approx::exact(1.0));
    }

    Ok(Approx::with_error(
        common as f64 / either as f64,
        1.0 / (either as f64).sqrt(),
    ))
}

/// MinHash signature: per-slot minimum of salted element hashes
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MinHashSignature {
    values: Vec<u32>,
    key_fingerprint: KeyFingerprint,
}

impl MinHashSignature {
    pub fn values(&self) -> &[u32] {
        &self.values
    }

    pub fn key_fingerprint(&self) -> KeyFingerprint {
        self.key_fingerprint
    }
}

/// Builds and compares MinHash signatures under one secret
#[derive(Clone, Debug)]
pub struct MinHasher<const N: usize = 32, H = Blake3KeyedHasher> {
    trapdoors: TrapdoorFactory<N, H>,
    permutations: usize,
}

impl<const N: usize> MinHasher<N, Blake3KeyedHasher> {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self::with_hasher(Blake3KeyedHasher::new(secret))
    }

    pub fn from_config(secret: impl AsRef<[u8]>, config: &TrapdoorConfig) -> Result<Self> {
        config.validate()?;
        Self::new(secret).with_permutations(config.minhash_permutations)
    }
}

impl<const N: usize, H: KeyedHasher> MinHasher<N, H> {
    pub fn with_hasher(hasher: H) -> Self {
        Self {
            trapdoors: TrapdoorFactory::with_hasher(hasher),
            permutations: TrapdoorConfig::default().minhash_permutations,
        }
    }

    /// Set the signature length
    pub fn with_permutations(mut self, permutations: usize) -> Result<Self> {
        if permutations == 0 {
            return Err(TrapdoorError::InvalidParameters(
                "permutations cannot be 0".to_string(),
            ));
        }
        self.permutations = permutations;
        Ok(self)
    }

    pub fn permutations(&self) -> usize {
        self.permutations
    }

    /// Signature of a collection; an empty collection leaves every slot at `u32::MAX`
    pub fn generate_signature<'a, T, I>(&self, values: I) -> Result<MinHashSignature>
    where
        T: Serialize + ?Sized + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let mut slots = vec![u32::MAX; self.permutations];
        for value in values {
            let encoded = encode_value(value)?;
            for (i, slot) in slots.iter_mut().enumerate() {
                let draw = self
                    .trapdoors
                    .derive_salted::<4>(Domain::MinHashSlot, i as u32, &encoded);
                *slot = (*slot).min(u32::from_be_bytes(draw.into_bytes()));
            }
        }
        Ok(MinHashSignature {
            values: slots,
            key_fingerprint: self.trapdoors.key_fingerprint(),
        })
    }

    /// Fraction of matching slots, standard error √(s(1-s)/k)
    pub fn estimate_similarity(
        &self,
        a: &MinHashSignature,
        b: &MinHashSignature,
    ) -> Result<Approx<f64>> {
        a.key_fingerprint.ensure_matches(b.key_fingerprint)?;
        if a.values.len() != b.values.len() {
            return Err(TrapdoorError::LengthMismatch {
                left: a.values.len(),
                right: b.values.len(),
            });
        }
        let k = a.values.len();
        if k == 0 {
            return Ok(Approx::exact(1.0));
        }

        let matches = a
            .values
            .iter()
            .zip(&b.values)
            .filter(|(x, y)| x == y)
            .count();
        let similarity = matches as f64 / k as f64;
        let error = (similarity * (1.0 - similarity) / k as f64).sqrt();

        Ok(Approx::with_error(similarity, error))
    }
}

/// LSH signature: one packed word per band
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LshSignature {
    bands: Vec<u64>,
    key_fingerprint: KeyFingerprint,
}

impl LshSignature {
    pub fn bands(&self) -> &[u64] {
        &self.bands
    }

    pub fn key_fingerprint(&self) -> KeyFingerprint {
        self.key_fingerprint
    }
}

/// Banded bit-sampling index over N-byte trapdoors
///
/// Each band samples `band_size` bit positions chosen by the keyed hasher,
/// so the projections are fixed per secret.
#[derive(Clone, Debug)]
pub struct LshIndex<const N: usize = 32> {
    projections: Vec<Vec<usize>>,
    band_size: usize,
    key_fingerprint: KeyFingerprint,
}

impl<const N: usize> LshIndex<N> {
    pub fn new(secret: impl AsRef<[u8]>, bands: usize, band_size: usize) -> Result<Self> {
        Self::with_hasher(&Blake3KeyedHasher::new(secret), bands, band_size)
    }

    pub fn from_config(secret: impl AsRef<[u8]>, config: &TrapdoorConfig) -> Result<Self> {
        config.validate()?;
        Self::new(secret, config.lsh_bands, config.lsh_band_size)
    }

    pub fn with_hasher<H: KeyedHasher>(hasher: &H, bands: usize, band_size: usize) -> Result<Self> {
        let bits = FixedHash::<N>::BIT_SIZE;
        if bands == 0 || band_size == 0 || band_size > 64 || bits == 0 {
            return Err(TrapdoorError::InvalidParameters(format!(
                "LSH needs bands >= 1, band size 1..=64 and a non-empty hash (bands={}, band_size={}, bits={})",
                bands, band_size, bits
            )));
        }

        let projections = (0..bands)
            .map(|band| {
                (0..band_size)
                    .map(|j| {
                        let salt = (band * band_size + j) as u32;
                        (derive_word(hasher, Domain::LshProjection, salt, &[]) % bits as u64)
                            as usize
                    })
                    .collect()
            })
            .collect();

        Ok(Self {
            projections,
            band_size,
            key_fingerprint: hasher.fingerprint(),
        })
    }

    pub fn bands(&self) -> usize {
        self.projections.len()
    }

    pub fn band_size(&self) -> usize {
        self.band_size
    }

    pub fn generate_signature<T: ?Sized>(&self, td: &Trapdoor<T, N>) -> Result<LshSignature> {
        self.key_fingerprint.ensure_matches(td.key_fingerprint())?;
        let hash = td.hash();
        let bands = self
            .projections
            .iter()
            .map(|band| {
                band.iter()
                    .fold(0u64, |acc, &idx| (acc << 1) | u64::from(hash.bit(idx)))
            })
            .collect();
        Ok(LshSignature {
            bands,
            key_fingerprint: td.key_fingerprint(),
        })
    }

    /// Invert P(match) = 1 - (1 - s^r)^b: s = (1 - (1 - m)^(1/b))^(1/r)
    pub fn estimate_similarity(&self, a: &LshSignature, b: &LshSignature) -> Result<Approx<f64>> {
        a.key_fingerprint.ensure_matches(b.key_fingerprint)?;
        if a.bands.len() != b.bands.len() {
            return Err(TrapdoorError::LengthMismatch {
                left: a.bands.len(),
                right: b.bands.len(),
            });
        }

        let bands = a.bands.len() as f64;
        let matches = a.bands.iter().zip(&b.bands).filter(|(x, y)| x == y).count();
        let match_ratio = matches as f64 / bands;
        let similarity = (1.0 - (1.0 - match_ratio).powf(1.0 / bands))
            .max(0.0)
            .powf(1.0 / self.band_size as f64);

        Ok(Approx::with_error(similarity, 1.0 / bands.sqrt()))
    }

    /// Estimated similarity at or above `threshold`
    pub fn are_similar(
        &self,
        a: &LshSignature,
        b: &LshSignature,
        threshold: f64,
    ) -> Result<ApproxBool> {
        let estimate = self.estimate_similarity(a, b)?;
        Ok(ApproxBool::new(
            *estimate.value() >= threshold,
            estimate.false_positive_rate(),
            0.0,
        ))
    }

    /// Indices of the candidates similar to `query`
    pub fn find_similar<T: ?Sized>(
        &self,
        query: &Trapdoor<T, N>,
        candidates: &[Trapdoor<T, N>],
        threshold: f64,
    ) -> Result<Vec<usize>> {
        let query_sig = self.generate_signature(query)?;
        let mut similar = Vec::new();
        for (i, candidate) in candidates.iter().enumerate() {
            let sig = self.generate_signature(candidate)?;
            if self.are_similar(&query_sig, &sig, threshold)?.is_true() {
                similar.push(i);
            }
        }
        Ok(similar)
    }
}

/// Cosine similarity of the hash bytes read as a vector
///
/// A zero vector is dissimilar to everything.
pub fn cosine_similarity<const N: usize>(a: &FixedHash<N>, b: &FixedHash<N>) -> Approx<f64> {
    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (&x, &y) in a.as_bytes().iter().zip(b.as_bytes()) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Approx::exact(0.0);
    }

    Approx::with_error(
        dot / (norm_a.sqrt() * norm_b.sqrt()),
        1.0 / FixedHash::<N>::BIT_SIZE as f64,
    )
}

/// Cosine similarity of two trapdoors built under the same secret
pub fn trapdoor_cosine_similarity<T: ?Sized, const N: usize>(
    a: &Trapdoor<T, N>,
    b: &Trapdoor<T, N>,
) -> Result<Approx<f64>> {
    a.key_fingerprint().ensure_matches(b.key_fingerprint())?;
    Ok(cosine_similarity(a.hash(), b.hash()))
}
