//! Tests for the policy table and lookup

use rust_decimal_macros::dec;

use core_kernel::Currency;
use domain_policy::{CoverageMatch, PolicyError, PolicySource, PolicyTable, PolicyTerms};

// ============================================================================
// Built-in Table
// ============================================================================

mod builtin_table_tests {
    use super::*;

    #[test]
    fn test_known_policy_covered() {
        let table = PolicyTable::builtin();
        let record = table.lookup("POL001", "collision");

        assert_eq!(record.policy_id, "POL001");
        assert_eq!(record.deductible.amount(), dec!(500));
        assert_eq!(record.coverage_limit.amount(), dec!(50000));
        assert!(record.is_covered);
        assert_eq!(record.source, PolicySource::Registered);
        assert!(record.coverage_details.to_lowercase().contains("covered"));
    }

    #[test]
    fn test_known_policy_not_covered() {
        let table = PolicyTable::builtin();
        let record = table.lookup("POL003", "vandalism");

        assert_eq!(record.policy_id, "POL003");
        assert!(!record.is_covered);
        assert!(record.coverage_details.contains("NOT covered"));
    }

    #[test]
    fn test_pol002_covers_vandalism() {
        let table = PolicyTable::builtin();
        let record = table.lookup("POL002", "Vandalism");

        assert!(record.is_covered);
        assert_eq!(record.deductible.amount(), dec!(1000));
        assert_eq!(record.coverage_limit.amount(), dec!(100000));
    }

    #[test]
    fn test_unknown_policy_falls_back_to_default() {
        let table = PolicyTable::builtin();
        let record = table.lookup("POL999", "flood");

        assert_eq!(record.policy_id, "POL999");
        assert_eq!(record.deductible.amount(), dec!(500.0));
        assert_eq!(record.coverage_limit.amount(), dec!(50000.0));
        assert!(record.is_covered);
        assert!(record.used_default());
    }

    #[test]
    fn test_default_does_not_cover_vandalism() {
        let table = PolicyTable::builtin();
        assert!(!table.lookup("nobody", "vandalism").is_covered);
    }

    #[test]
    fn test_policy_ids_are_case_sensitive() {
        let table = PolicyTable::builtin();
        assert_eq!(table.lookup("pol003", "hail").source, PolicySource::Default);
    }

    #[test]
    fn test_table_contents() {
        let table = PolicyTable::builtin();
        assert_eq!(table.len(), 3);
        assert!(table.contains("POL002"));
        assert!(!table.contains("POL004"));
        assert_eq!(table.matching(), CoverageMatch::Substring);
    }

    #[test]
    fn test_lookup_is_repeatable() {
        let table = PolicyTable::builtin();
        assert_eq!(table.lookup("POL001", "Hail"), table.lookup("POL001", "Hail"));
    }
}

// ============================================================================
// Coverage Matching Modes
// ============================================================================

mod matching_tests {
    use super::*;

    #[test]
    fn test_substring_mode_covers_descriptive_damage() {
        let table = PolicyTable::builtin();
        assert!(table.lookup("POL001", "Major Frontal Collision").is_covered);
        assert!(!table.lookup("POL001", "Front Bumper Dent").is_covered);
        assert!(!table.lookup("POL001", "Paint Scratch").is_covered);
    }

    #[test]
    fn test_exact_mode_is_compatibility_option() {
        let table = PolicyTable::builtin().with_matching(CoverageMatch::Exact);
        assert!(table.lookup("POL001", "Collision").is_covered);
        assert!(!table.lookup("POL001", "Major Frontal Collision").is_covered);
    }

    #[test]
    fn test_empty_damage_type_not_covered() {
        let table = PolicyTable::builtin();
        assert!(!table.lookup("POL001", "").is_covered);
    }
}

// ============================================================================
// Custom Tables and JSON Loading
// ============================================================================

mod custom_table_tests {
    use super::*;

    const TABLE_JSON: &str = r#"{
        "default": { "deductible": 750, "coverage_limit": 10000, "covered_damage_types": ["fire"] },
        "policies": {
            "HOME-1": { "deductible": "100.50", "coverage_limit": 2000, "covered_damage_types": ["Flood", "Fire"] }
        }
    }"#;

    #[test]
    fn test_from_json_str() {
        let table = PolicyTable::from_json_str(TABLE_JSON).unwrap();

        let record = table.lookup("HOME-1", "flood damage");
        assert!(record.is_covered);
        assert_eq!(record.deductible.amount(), dec!(100.50));
        assert_eq!(record.deductible.currency(), Currency::USD);

        let fallback = table.lookup("HOME-2", "hail");
        assert!(!fallback.is_covered);
        assert_eq!(fallback.deductible.amount(), dec!(750));
    }

    #[test]
    fn test_from_json_rejects_negative_deductible() {
        let json = r#"{ "default": { "deductible": -1, "coverage_limit": 10, "covered_damage_types": [] } }"#;
        let result = PolicyTable::from_json_str(json);
        assert!(matches!(result, Err(PolicyError::InvalidTerms { .. })));
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        let result = PolicyTable::from_json_str("{ not json");
        assert!(matches!(result, Err(PolicyError::Parse(_))));
    }

    #[test]
    fn test_from_file_round_trip() {
        let dir = std::env::temp_dir().join(format!("policy-table-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("policies.json");
        std::fs::write(&path, TABLE_JSON).unwrap();

        let table = PolicyTable::from_file(&path).unwrap();
        assert!(table.contains("HOME-1"));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_from_file_missing() {
        let result = PolicyTable::from_file("/nonexistent/policies.json");
        assert!(matches!(result, Err(PolicyError::Io { .. })));
    }

    #[test]
    fn test_injected_default_terms() {
        let default = PolicyTerms::new("DEFAULT", dec!(0), dec!(100), Currency::USD, ["hail"]).unwrap();
        let table = PolicyTable::new(default.clone());

        assert!(table.is_empty());
        assert_eq!(table.default_terms(), &default);
        assert_eq!(table.lookup("any", "hail").coverage_limit.amount(), dec!(100));
    }
}

// ============================================================================
// Properties
// ============================================================================

mod lookup_properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn unregistered_ids_always_get_default_terms(policy_id in "[A-Z]{3}[0-9]{4,6}", damage in ".{0,24}") {
            let table = PolicyTable::builtin();
            let record = table.lookup(&policy_id, &damage);

            prop_assert_eq!(record.source, PolicySource::Default);
            prop_assert_eq!(record.deductible, table.default_terms().deductible);
            prop_assert_eq!(record.coverage_limit, table.default_terms().coverage_limit);
        }

        #[test]
        fn coverage_ignores_case(upper in any::<bool>()) {
            let table = PolicyTable::builtin();
            let damage = if upper { "HAIL DAMAGE" } else { "hail damage" };
            prop_assert!(table.lookup("POL003", damage).is_covered);
        }
    }
}
