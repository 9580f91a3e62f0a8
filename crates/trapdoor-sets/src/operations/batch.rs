//! Batch operations over collections of trapdoors and sets
//!
//! Convenience wrappers with no semantics of their own. Every element is
//! independent, so the `parallel` feature adds rayon-backed variants that
//! return the same results in the same order.

use serde::Serialize;
use tracing::debug;

use crate::adapters::Blake3KeyedHasher;
use crate::domain::{
    ApproxBool, BooleanSet, FixedHash, KeyFingerprint, MembershipProbe, SymmetricDifferenceSet,
    Trapdoor, TrapdoorFactory,
};
use crate::error::{Result, TrapdoorError};
use crate::ports::KeyedHasher;

/// Create one trapdoor per value
pub fn batch_create<T, const N: usize, H>(
    factory: &TrapdoorFactory<N, H>,
    values: &[T],
) -> Result<Vec<Trapdoor<T, N>>>
where
    T: Serialize,
    H: KeyedHasher,
{
    values.iter().map(|value| factory.create(value)).collect()
}

/// Pairwise equality of two equally long slices
pub fn batch_equals<T: ?Sized, const N: usize>(
    left: &[Trapdoor<T, N>],
    right: &[Trapdoor<T, N>],
) -> Result<Vec<ApproxBool>> {
    if left.len() != right.len() {
        return Err(TrapdoorError::LengthMismatch {
            left: left.len(),
            right: right.len(),
        });
    }
    left.iter().zip(right).map(|(a, b)| a.equals(b)).collect()
}

/// XOR-fold of all sets; the empty slice folds to the unset empty set
pub fn batch_union<T: ?Sized, const N: usize>(
    sets: &[SymmetricDifferenceSet<T, N>],
) -> Result<SymmetricDifferenceSet<T, N>> {
    sets.iter()
        .try_fold(SymmetricDifferenceSet::default(), |acc, set| acc.symmetric_difference(set))
}

/// AND-fold of all sets; the empty slice yields the unset empty set
pub fn batch_intersection<T: ?Sized, const N: usize>(
    sets: &[BooleanSet<T, N>],
) -> Result<BooleanSet<T, N>> {
    let Some((first, rest)) = sets.split_first() else {
        return Ok(BooleanSet::default());
    };
    rest.iter().try_fold(*first, |acc, set| acc.intersection(set))
}

/// Membership of every probe in `set`
pub fn batch_contains<T: ?Sized, const N: usize>(
    set: &BooleanSet<T, N>,
    probes: &[MembershipProbe<T, N>],
) -> Result<Vec<ApproxBool>> {
    probes.iter().map(|probe| set.contains(probe)).collect()
}

#[cfg(feature = "parallel")]
pub use self::parallel::{par_batch_contains, par_batch_create};

#[cfg(feature = "parallel")]
mod parallel {
    use rayon::prelude::*;

    use super::*;

    /// Parallel `batch_create`; output order matches input order
    pub fn par_batch_create<T, const N: usize, H>(
        factory: &TrapdoorFactory<N, H>,
        values: &[T],
    ) -> Result<Vec<Trapdoor<T, N>>>
    where
        T: Serialize + Sync,
        H: KeyedHasher,
    {
        values.par_iter().map(|value| factory.create(value)).collect()
    }

    /// Parallel `batch_contains`
    pub fn par_batch_contains<T: ?Sized, const N: usize>(
        set: &BooleanSet<T, N>,
        probes: &[MembershipProbe<T, N>],
    ) -> Result<Vec<ApproxBool>> {
        probes.par_iter().map(|probe| set.contains(probe)).collect()
    }
}

/// Map-then-hash helpers bound to one secret
#[derive(Clone, Debug)]
pub struct Pipeline<const N: usize = 32, H = Blake3KeyedHasher> {
    trapdoors: TrapdoorFactory<N, H>,
}

impl<const N: usize> Pipeline<N, Blake3KeyedHasher> {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            trapdoors: TrapdoorFactory::new(secret),
        }
    }
}

impl<const N: usize, H: KeyedHasher> Pipeline<N, H> {
    pub fn with_hasher(hasher: H) -> Self {
        Self {
            trapdoors: TrapdoorFactory::with_hasher(hasher),
        }
    }

    /// Apply `transform` to each value and create the trapdoor of the result
    pub fn transform_create<U, T, F>(
        &self,
        values: &[U],
        transform: F,
    ) -> Result<Vec<Trapdoor<T, N>>>
    where
        T: Serialize,
        F: Fn(&U) -> T,
    {
        values
            .iter()
            .map(|value| self.trapdoors.create(&transform(value)))
            .collect()
    }

    /// XOR the trapdoors of the values accepted by `predicate`
    pub fn filter_to_set<T, P>(
        &self,
        values: &[T],
        predicate: P,
    ) -> Result<SymmetricDifferenceSet<T, N>>
    where
        T: Serialize,
        P: Fn(&T) -> bool,
    {
        let mut set = SymmetricDifferenceSet::from_parts(FixedHash::zero(), self.key_fingerprint());
        let mut kept = 0usize;
        for value in values.iter().filter(|v| predicate(v)) {
            set.insert(&self.trapdoors.create(value)?)?;
            kept += 1;
        }
        debug!(input = values.len(), kept, "Filtered values into set");
        Ok(set)
    }

    pub fn key_fingerprint(&self) -> KeyFingerprint {
        self.trapdoors.key_fingerprint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BooleanSetFactory, SymmetricDifferenceSetFactory};

    #[test]
    fn test_batch_create_matches_individual_create() {
        let factory = TrapdoorFactory::<32>::new("k");
        let values = [1u32, 2, 3];
        let batch = batch_create(&factory, &values).unwrap();

        assert_eq!(batch.len(), 3);
        for (td, value) in batch.iter().zip(&values) {
            assert_eq!(*td, factory.create(value).unwrap(), "Batch must match create");
        }
    }

    #[test]
    fn test_batch_equals() {
        let factory = TrapdoorFactory::<32>::new("k");
        let left = batch_create(&factory, &[1u32, 2, 3]).unwrap();
        let right = batch_create(&factory, &[1u32, 5, 3]).unwrap();

        let results: Vec<bool> = batch_equals(&left, &right)
            .unwrap()
            .iter()
            .map(|r| *r.value())
            .collect();
        assert_eq!(results, vec![true, false, true]);
    }

    #[test]
    fn test_batch_equals_length_mismatch() {
        let factory = TrapdoorFactory::<32>::new("k");
        let left = batch_create(&factory, &[1u32, 2]).unwrap();
        let right = batch_create(&factory, &[1u32]).unwrap();

        assert_eq!(
            batch_equals(&left, &right).unwrap_err(),
            TrapdoorError::LengthMismatch { left: 2, right: 1 }
        );
    }

    #[test]
    fn test_batch_union_matches_from_unique() {
        let factory = SymmetricDifferenceSetFactory::<32>::new("k");
        let sets: Vec<_> = [1u32, 2, 3]
            .iter()
            .map(|v| factory.singleton(v).unwrap())
            .collect();

        let union = batch_union(&sets).unwrap();
        let direct = factory.from_unique(&[1u32, 2, 3]).unwrap();
        assert_eq!(union.hash(), direct.hash());
        assert_eq!(union.key_fingerprint(), factory.key_fingerprint());
    }

    #[test]
    fn test_batch_union_of_nothing_is_empty() {
        let union = batch_union::<u32, 32>(&[]).unwrap();
        assert!(union.is_empty().is_true());
    }

    #[test]
    fn test_batch_intersection() {
        let factory = BooleanSetFactory::<32>::new("k");
        let sets = vec![
            factory.from_collection(["a", "b", "c"]).unwrap(),
            factory.from_collection(["b", "c", "d"]).unwrap(),
            factory.from_collection(["c", "d", "e"]).unwrap(),
        ];

        let common = batch_intersection(&sets).unwrap();
        let probe = factory.trapdoor("c").unwrap();
        let hit = common.contains(&probe).unwrap();
        assert!(hit.is_true(), "Shared element must survive the intersection");
        assert_eq!(hit.false_negative_rate(), 0.0);
    }

    #[test]
    fn test_batch_intersection_key_mismatch() {
        let a = BooleanSetFactory::<32>::new("k1").singleton("x").unwrap();
        let b = BooleanSetFactory::<32>::new("k2").singleton("x").unwrap();

        assert!(matches!(
            batch_intersection(&[a, b]),
            Err(TrapdoorError::KeyMismatch { .. })
        ));
    }

    #[test]
    fn test_batch_contains() {
        let factory = BooleanSetFactory::<32>::new("k");
        let set = factory.from_collection(["a", "b"]).unwrap();
        let probes = vec![factory.trapdoor("a").unwrap(), factory.trapdoor("b").unwrap()];

        let results = batch_contains(&set, &probes).unwrap();
        assert!(results.iter().all(|r| r.is_true()));
    }

    #[test]
    fn test_pipeline_transform_create() {
        let pipeline = Pipeline::<32>::new("k");
        let factory = TrapdoorFactory::<32>::new("k");

        let doubled = pipeline.transform_create(&[1u32, 2], |v| v * 2).unwrap();
        assert_eq!(doubled[0], factory.create(&2u32).unwrap());
        assert_eq!(doubled[1], factory.create(&4u32).unwrap());
    }

    #[test]
    fn test_pipeline_filter_to_set() {
        let pipeline = Pipeline::<32>::new("k");
        let factory = SymmetricDifferenceSetFactory::<32>::new("k");

        let evens = pipeline
            .filter_to_set(&[1u32, 2, 3, 4], |v| v % 2 == 0)
            .unwrap();
        let expected = factory.from_unique(&[2u32, 4]).unwrap();
        assert!(evens.equals(&expected).unwrap().is_true());
    }

    #[test]
    fn test_pipeline_filter_nothing_is_empty() {
        let pipeline = Pipeline::<32>::new("k");
        let none = pipeline.filter_to_set(&[1u32, 3], |v| v % 2 == 0).unwrap();
        assert!(none.is_empty().is_true());
        assert_eq!(none.key_fingerprint(), pipeline.key_fingerprint());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_variants_match_sequential() {
        let factory = TrapdoorFactory::<32>::new("k");
        let values: Vec<u32> = (0..64).collect();

        let sequential = batch_create(&factory, &values).unwrap();
        let parallel = par_batch_create(&factory, &values).unwrap();
        assert_eq!(sequential, parallel);

        let sets = BooleanSetFactory::<32>::new("k");
        let set = sets.from_collection(&values[..10]).unwrap();
        let probes: Vec<_> = values.iter().map(|v| sets.trapdoor(v).unwrap()).collect();
        let seq = batch_contains(&set, &probes).unwrap();
        let par = par_batch_contains(&set, &probes).unwrap();
        assert_eq!(seq, par, "Parallel membership must match sequential");
    }
}
