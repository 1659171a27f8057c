//! Ordering stage

use crate::compiler::SourceUnit;

/// Module descriptors first, everything else after; relative order is kept in both groups
pub fn order_units(units: Vec<SourceUnit>) -> Vec<SourceUnit> {
    let (mut ordered, rest): (Vec<_>, Vec<_>) = units.into_iter().partition(SourceUnit::is_module_descriptor);
    ordered.extend(rest);
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(units: &[SourceUnit]) -> Vec<&str> {
        units.iter().map(SourceUnit::name).collect()
    }

    fn units(names: &[&str]) -> Vec<SourceUnit> {
        names.iter().map(|n| SourceUnit::new(*n, "")).collect()
    }

    #[test]
    fn test_descriptors_move_to_front() {
        let ordered = order_units(units(&[
            "a/A.strata",
            "m1/module-info.strata",
            "b/B.strata",
            "m2/module-info.stratac",
        ]));
        assert_eq!(
            names(&ordered),
            vec![
                "m1/module-info.strata",
                "m2/module-info.stratac",
                "a/A.strata",
                "b/B.strata",
            ]
        );
    }

    #[test]
    fn test_order_kept_without_descriptors() {
        let input = units(&["c/C.strata", "a/A.strata", "b/B.strata"]);
        let ordered = order_units(input.clone());
        assert_eq!(ordered, input);
    }

    #[test]
    fn test_idempotent_and_complete() {
        let input = units(&[
            "z/Z.strata",
            "m/module-info.strata",
            "a/A.strata",
            "n/module-info.stratac",
            "b/B.strata",
        ]);
        let once = order_units(input.clone());
        let twice = order_units(once.clone());
        assert_eq!(once, twice);

        let mut sorted_input = names(&input);
        let mut sorted_output = names(&once);
        sorted_input.sort_unstable();
        sorted_output.sort_unstable();
        assert_eq!(sorted_input, sorted_output);

        let first_ordinary = once.iter().position(|u| !u.is_module_descriptor()).unwrap();
        assert!(once[first_ordinary..].iter().all(|u| !u.is_module_descriptor()));
    }

    #[test]
    fn test_empty_batch() {
        assert!(order_units(Vec::new()).is_empty());
    }

    #[test]
    fn test_look_alike_names_are_ordinary() {
        let ordered = order_units(units(&["a/A.strata", "x/my-module-info.strata.bak"]));
        assert_eq!(names(&ordered), vec!["a/A.strata", "x/my-module-info.strata.bak"]);
    }
}
