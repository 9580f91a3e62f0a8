//! # Algebra Laws
//!
//! Property-based checks of the identities every representation must satisfy
//! exactly, independent of hash collisions: the bitwise lattice on
//! `FixedHash`, rate composition on `Approx`, and the set laws that follow
//! from them.

#[cfg(test)]
mod tests {
    use proptest::collection;
    use proptest::prelude::*;

    use trapdoor_sets::{
        compose_error_rates, ApproxBool, BooleanSetFactory, FixedHash,
        SymmetricDifferenceSetFactory, TrapdoorFactory,
    };

    fn hash16() -> impl Strategy<Value = FixedHash<16>> {
        prop::array::uniform16(any::<u8>()).prop_map(FixedHash::new)
    }

    fn hash32() -> impl Strategy<Value = FixedHash<32>> {
        prop::array::uniform32(any::<u8>()).prop_map(FixedHash::new)
    }

    fn approx_bool() -> impl Strategy<Value = ApproxBool> {
        (any::<bool>(), 0.0f64..=1.0, 0.0f64..=1.0)
            .prop_map(|(v, fpr, fnr)| ApproxBool::new(v, fpr, fnr))
    }

    macro_rules! lattice_laws {
        ($name:ident, $strategy:ident, $n:literal) => {
            proptest! {
                #[test]
                fn $name(a in $strategy(), b in $strategy(), c in $strategy()) {
                    let zero = FixedHash::<$n>::zero();
                    let ones = FixedHash::<$n>::ones();

                    prop_assert_eq!(a ^ a, zero);
                    prop_assert_eq!(a ^ zero, a);
                    prop_assert_eq!((a ^ b) ^ c, a ^ (b ^ c));
                    prop_assert_eq!(a ^ b, b ^ a);
                    prop_assert_eq!((a & b) & c, a & (b & c));
                    prop_assert_eq!((a | b) | c, a | (b | c));
                    prop_assert_eq!(!!a, a);
                    prop_assert_eq!(!zero, ones);
                    prop_assert_eq!(!(a & b), !a | !b);
                    prop_assert_eq!(!(a | b), !a & !b);
                }
            }
        };
    }

    lattice_laws!(test_fixed_hash_laws_128, hash16, 16);
    lattice_laws!(test_fixed_hash_laws_256, hash32, 32);

    #[test]
    fn test_compose_boundaries() {
        assert_eq!(compose_error_rates(0.0, 0.0), 0.0);
        assert_eq!(compose_error_rates(0.3, 0.0), 0.3);
        assert_eq!(compose_error_rates(1.0, 1.0), 1.0);
    }

    proptest! {
        #[test]
        fn test_double_negation_restores_everything(a in approx_bool()) {
            let back = !!a;
            prop_assert_eq!(back.value(), a.value());
            prop_assert_eq!(back.false_positive_rate(), a.false_positive_rate());
            prop_assert_eq!(back.false_negative_rate(), a.false_negative_rate());
        }

        #[test]
        fn test_and_composes_rates(a in approx_bool(), b in approx_bool()) {
            let both = a & b;
            prop_assert_eq!(*both.value(), *a.value() && *b.value());
            prop_assert_eq!(
                both.false_positive_rate(),
                compose_error_rates(a.false_positive_rate(), b.false_positive_rate())
            );
            prop_assert_eq!(
                both.false_negative_rate(),
                compose_error_rates(a.false_negative_rate(), b.false_negative_rate())
            );
            prop_assert!(both.error_rate() <= 1.0);
        }

        #[test]
        fn test_compose_stays_in_unit_interval(e1 in 0.0f64..=1.0, e2 in 0.0f64..=1.0) {
            let c = compose_error_rates(e1, e2);
            prop_assert!((0.0..=1.0).contains(&c));
            prop_assert!(c >= e1.max(e2) - 1e-12);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn test_creation_is_deterministic(value in any::<u64>()) {
            let factory = TrapdoorFactory::<32>::new("laws");
            prop_assert_eq!(factory.create(&value).unwrap(), factory.create(&value).unwrap());
        }

        #[test]
        fn test_symmetric_difference_group_laws(
            xs in collection::hash_set(any::<u32>(), 0..16)
        ) {
            let factory = SymmetricDifferenceSetFactory::<32>::new("laws");
            let values: Vec<u32> = xs.into_iter().collect();
            let a = factory.from_unique(&values).unwrap();

            prop_assert!(a.symmetric_difference(&a).unwrap().is_empty().is_true());
            prop_assert_eq!(a.symmetric_difference(&factory.empty()).unwrap(), a);
        }

        #[test]
        fn test_boolean_members_are_always_found(
            xs in collection::vec(any::<u32>(), 1..24),
            ys in collection::vec(any::<u32>(), 0..24)
        ) {
            let factory = BooleanSetFactory::<32>::new("laws");
            let a = factory.from_collection(&xs).unwrap();
            let b = factory.from_collection(&ys).unwrap();

            for x in &xs {
                let hit = a.contains(&factory.trapdoor(x).unwrap()).unwrap();
                prop_assert!(hit.is_true());
                prop_assert_eq!(hit.false_negative_rate(), 0.0);
            }
            prop_assert!(a.subset_of(&a.union(&b).unwrap()).unwrap().is_true());
        }

        #[test]
        fn test_boolean_difference_never_misses_with_certainty(
            xs in collection::vec(any::<u32>(), 1..24),
            ys in collection::vec(any::<u32>(), 1..24)
        ) {
            let factory = BooleanSetFactory::<8>::new("laws");
            let a = factory.from_collection(&xs).unwrap();
            let b = factory.from_collection(&ys).unwrap();
            let diff = a.difference(&b).unwrap();

            for x in xs.iter().filter(|x| !ys.contains(x)) {
                let hit = diff.contains(&factory.trapdoor(x).unwrap()).unwrap();
                if !hit.is_true() {
                    prop_assert!(hit.false_negative_rate() > 0.0);
                }
            }
        }
    }
}
