//! # End-to-End Scenarios
//!
//! Each test drives the public API the way an application would: one secret,
//! a factory per set flavour, then queries whose error rates are checked
//! alongside their values.
//!
//! ## Flows Tested:
//!
//! 1. **Trapdoor equality**: determinism and the collision-only false positive
//! 2. **Boolean set intersection**: shared members survive with fnr = 0
//! 3. **XOR cancellation**: a set XOR itself is empty
//! 4. **Threshold sharing**: XOR and Shamir reconstruction
//! 5. **Key isolation**: no operation accepts operands from two secrets
//! 6. **Wire format**: byte round trips for several hash widths

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use trapdoor_sets::codec::BinaryFormat;
    use trapdoor_sets::operations::{
        batch_union, compare_cardinality, AdaptiveCardinality, CardinalityEstimator, MinHasher,
        Pipeline, SecureAggregator, ShamirScheme, ThresholdScheme,
    };
    use trapdoor_sets::{
        BooleanSet, BooleanSetFactory, FixedHash, HmacSha256KeyedHasher, SymmetricDifferenceSet,
        SymmetricDifferenceSetFactory, Trapdoor, TrapdoorConfig, TrapdoorError, TrapdoorFactory,
    };

    // =============================================================================
    // SCENARIO 1: TRAPDOOR EQUALITY
    // =============================================================================

    #[test]
    fn test_scenario_trapdoor_equality() {
        let factory = TrapdoorFactory::<32>::new("k");

        let alice_1 = factory.create("alice").unwrap();
        let alice_2 = factory.create("alice").unwrap();
        assert_eq!(alice_1.hash(), alice_2.hash(), "Same value must hash identically");

        let bob = factory.create("bob").unwrap();
        let answer = alice_1.equals(&bob).unwrap();
        assert!(!answer.is_true(), "Distinct values must compare unequal");
        assert_eq!(answer.false_positive_rate(), 2f64.powi(-256));
        assert_eq!(answer.false_negative_rate(), 0.0);
    }

    // =============================================================================
    // SCENARIO 2: BOOLEAN SET INTERSECTION
    // =============================================================================

    #[test]
    fn test_scenario_boolean_intersection_membership() {
        let factory = BooleanSetFactory::<32>::new("k");

        let set1 = factory.from_collection(["a", "b", "c", "d"]).unwrap();
        let set2 = factory.from_collection(["c", "d", "e", "f"]).unwrap();
        let both = set1.intersection(&set2).unwrap();

        let answer = both.contains(&factory.trapdoor("c").unwrap()).unwrap();
        assert!(answer.is_true(), "c was inserted into both sets");
        assert_eq!(answer.false_negative_rate(), 0.0);
    }

    #[test]
    fn test_subset_of_union() {
        let factory = BooleanSetFactory::<32>::new("k");
        let a = factory.from_collection(["x", "y"]).unwrap();
        let b = factory.from_collection(["z"]).unwrap();

        let union = a.union(&b).unwrap();
        assert!(a.subset_of(&union).unwrap().is_true(), "a must be a subset of a | b");
        assert!(b.subset_of(&union).unwrap().is_true(), "b must be a subset of a | b");
    }

    // =============================================================================
    // SCENARIO 3: XOR CANCELLATION
    // =============================================================================

    #[test]
    fn test_scenario_symmetric_difference_cancels() {
        let factory = SymmetricDifferenceSetFactory::<32>::new("k");

        let a = factory.from_unique(&[1u32, 2, 3]).unwrap();
        let b = factory.from_unique(&[1u32, 2, 3]).unwrap();
        let empty = a.symmetric_difference(&b).unwrap().is_empty();

        assert!(empty.is_true(), "Identical sets must cancel");
        assert_eq!(empty.false_positive_rate(), FixedHash::<32>::collision_probability());
        assert_eq!(empty.false_negative_rate(), 0.0);
    }

    #[test]
    fn test_pipeline_agrees_with_batch_union() {
        let pipeline = Pipeline::<32>::new("k");
        let factory = SymmetricDifferenceSetFactory::<32>::new("k");
        let values: Vec<u32> = (1..=10).collect();

        let odds = pipeline.filter_to_set(&values, |v| v % 2 == 1).unwrap();
        let singletons: Vec<SymmetricDifferenceSet<u32, 32>> = [1u32, 3, 5, 7, 9]
            .iter()
            .map(|v| factory.singleton(v).unwrap())
            .collect();

        let folded = batch_union(&singletons).unwrap();
        assert!(odds.equals(&folded).unwrap().is_true());
    }

    // =============================================================================
    // SCENARIO 4: THRESHOLD SHARING
    // =============================================================================

    #[test]
    fn test_scenario_xor_threshold_reconstruction() {
        let factory = TrapdoorFactory::<32>::new("k");
        let secret = factory.create("launch code").unwrap();
        let scheme = ThresholdScheme::<32>::new(3, 5).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let shares = scheme.create_shares(&secret, &mut rng);
        assert_eq!(shares.len(), 5, "(3, 5) scheme must produce five shares");

        let rebuilt: Trapdoor<str, 32> = scheme
            .reconstruct(&shares[0..3], factory.key_fingerprint())
            .unwrap();
        assert_eq!(rebuilt, secret, "Leading three shares must reconstruct exactly");

        let err = scheme
            .reconstruct::<str>(&shares[0..2], factory.key_fingerprint())
            .unwrap_err();
        assert_eq!(
            err,
            TrapdoorError::InsufficientShares {
                provided: 2,
                required: 3
            }
        );
    }

    #[test]
    fn test_shamir_any_subset_reconstructs() {
        let factory = TrapdoorFactory::<32>::new("k");
        let secret = factory.create(&42u64).unwrap();
        let scheme = ShamirScheme::<32>::new(3, 5).unwrap();
        let mut rng = StdRng::seed_from_u64(11);

        let shares = scheme.split(&secret, &mut rng);
        for picks in [[0usize, 1, 2], [4, 1, 3], [2, 4, 0]] {
            let subset: Vec<_> = picks.iter().map(|&i| shares[i]).collect();
            let rebuilt: Trapdoor<u64, 32> =
                scheme.reconstruct(&subset, factory.key_fingerprint()).unwrap();
            assert_eq!(rebuilt, secret, "Shares {:?} must reconstruct", picks);
        }
    }

    // =============================================================================
    // KEY ISOLATION
    // =============================================================================

    #[test]
    fn test_key_isolation_across_all_set_types() {
        let t1 = TrapdoorFactory::<32>::new("secret-1");
        let t2 = TrapdoorFactory::<32>::new("secret-2");
        let a = t1.create("v").unwrap();
        let b = t2.create("v").unwrap();
        assert_ne!(a, b, "Different secrets must give different trapdoors");
        assert!(matches!(a.equals(&b), Err(TrapdoorError::KeyMismatch { .. })));

        let s1 = SymmetricDifferenceSetFactory::<32>::new("secret-1").singleton("v").unwrap();
        let s2 = SymmetricDifferenceSetFactory::<32>::new("secret-2").singleton("v").unwrap();
        assert!(matches!(
            s1.symmetric_difference(&s2),
            Err(TrapdoorError::KeyMismatch { .. })
        ));

        let b1 = BooleanSetFactory::<32>::new("secret-1").singleton("v").unwrap();
        let b2 = BooleanSetFactory::<32>::new("secret-2").singleton("v").unwrap();
        assert!(matches!(b1.union(&b2), Err(TrapdoorError::KeyMismatch { .. })));
        assert!(matches!(b1.subset_of(&b2), Err(TrapdoorError::KeyMismatch { .. })));
        assert!(matches!(
            compare_cardinality(&AdaptiveCardinality::default(), &b1, &b2, 0.1),
            Err(TrapdoorError::KeyMismatch { .. })
        ));
    }

    #[test]
    fn test_hmac_adapter_behaves_like_default() {
        let hasher = Arc::new(HmacSha256KeyedHasher::new("k").unwrap());
        let factory = BooleanSetFactory::<32, _>::with_hasher(hasher.clone());

        let set = factory.from_collection(["a", "b", "c"]).unwrap();
        for item in ["a", "b", "c"] {
            let probe = factory.trapdoor(item).unwrap();
            assert!(set.contains(&probe).unwrap().is_true(), "{} must be found", item);
        }

        let blake = BooleanSetFactory::<32>::new("k");
        assert_ne!(
            factory.key_fingerprint(),
            blake.key_fingerprint(),
            "Different hashers must not share fingerprints"
        );
    }

    // =============================================================================
    // DERIVED OPERATIONS
    // =============================================================================

    #[test]
    fn test_cardinality_of_small_set() {
        let factory = BooleanSetFactory::<32>::new("k");
        let values: Vec<u32> = (0..20).collect();
        let set = factory.from_collection(&values).unwrap();

        let estimate = AdaptiveCardinality::default().estimate(&set);
        let n = *estimate.value();
        assert!((10..=35).contains(&n), "Estimate {} too far from 20", n);
    }

    #[test]
    fn test_compare_cardinality_with_configured_tolerance() {
        let config = TrapdoorConfig::default();
        let factory = BooleanSetFactory::<32>::from_config("k", &config).unwrap();
        let estimator = AdaptiveCardinality::from_config(&config).unwrap();

        let small_values: Vec<u32> = (0..5).collect();
        let large_values: Vec<u32> = (100..160).collect();
        let small = factory.from_collection(&small_values).unwrap();
        let large = factory.from_collection(&large_values).unwrap();

        let order =
            compare_cardinality(&estimator, &small, &large, config.cardinality_tolerance).unwrap();
        assert_eq!(*order.value(), std::cmp::Ordering::Less);

        let same = compare_cardinality(&estimator, &large, &large, config.cardinality_tolerance)
            .unwrap();
        assert_eq!(*same.value(), std::cmp::Ordering::Equal);
    }

    #[test]
    fn test_minhash_similarity_bounds() {
        let minhash = MinHasher::<32>::new("k");
        let a = minhash.generate_signature(&[1u32, 2, 3, 4]).unwrap();
        let same = minhash.generate_signature(&[4u32, 3, 2, 1]).unwrap();
        let disjoint = minhash.generate_signature(&[100u32, 200, 300]).unwrap();

        let identical = minhash.estimate_similarity(&a, &same).unwrap();
        assert_eq!(*identical.value(), 1.0, "Order must not matter");

        let far = minhash.estimate_similarity(&a, &disjoint).unwrap();
        assert!(*far.value() < 0.1, "Disjoint collections must look dissimilar");
    }

    #[test]
    fn test_secure_aggregation() {
        let aggregator = SecureAggregator::<32>::new("k");
        let total = aggregator.sum(&[1i64, 2, 3, 4]).unwrap();
        assert_eq!(*total.value(), 10);
        assert_eq!(total.error_rate(), aggregator.error_rate());

        let mean = aggregator.average(&[2i32, 4, 6]).unwrap();
        assert!((mean.value() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_config_drives_factories() {
        let json = r#"{
            "boolean_hash_count": 5,
            "hll_precision_bits": 6,
            "adaptive_threshold": 100,
            "minhash_permutations": 64,
            "lsh_bands": 20,
            "lsh_band_size": 5,
            "cardinality_tolerance": 0.1,
            "aggregation_error_rate": 0.001
        }"#;
        let config: TrapdoorConfig = serde_json::from_str(json).unwrap();

        let sets = BooleanSetFactory::<32>::from_config("k", &config).unwrap();
        assert_eq!(sets.hash_count(), 5);

        let minhash = MinHasher::<32>::from_config("k", &config).unwrap();
        assert_eq!(minhash.permutations(), 64);
    }

    // =============================================================================
    // WIRE FORMAT
    // =============================================================================

    #[test]
    fn test_wire_round_trip_for_several_widths() {
        let t16 = TrapdoorFactory::<16>::new("k").create("v").unwrap();
        let t64 = TrapdoorFactory::<64>::new("k").create("v").unwrap();
        assert_eq!(t16.to_bytes().len(), 24);
        assert_eq!(t64.to_bytes().len(), 72);
        assert_eq!(Trapdoor::<str, 16>::from_bytes(&t16.to_bytes()).unwrap(), t16);
        assert_eq!(Trapdoor::<str, 64>::from_bytes(&t64.to_bytes()).unwrap(), t64);

        let sds = SymmetricDifferenceSetFactory::<16>::new("k")
            .from_unique(&[1u8, 2, 3])
            .unwrap();
        assert_eq!(
            SymmetricDifferenceSet::<u8, 16>::from_bytes(&sds.to_bytes()).unwrap(),
            sds
        );

        let factory = BooleanSetFactory::<32>::new("k");
        let set = factory.from_collection(["a", "b"]).unwrap();
        let decoded = BooleanSet::<str, 32>::from_bytes(&set.to_bytes()).unwrap();
        assert_eq!(decoded, set);
        assert!(
            decoded.contains(&factory.trapdoor("a").unwrap()).unwrap().is_true(),
            "Decoded set must keep its members"
        );
    }

    #[test]
    fn test_truncated_buffer_is_rejected() {
        let td = TrapdoorFactory::<32>::new("k").create("v").unwrap();
        let bytes = td.to_bytes();
        assert!(matches!(
            Trapdoor::<str, 32>::from_bytes(&bytes[..bytes.len() - 1]),
            Err(TrapdoorError::InsufficientBytes { .. })
        ));
    }
}
