/// Asserts that the enabled connections of a genome form no cycle.
#[macro_export]
macro_rules! assert_acyclic {
    ($genome:expr) => {
        assert!(
            neatling_lib::model::genome::topology::is_acyclic(&$genome),
            "Genome {} has a cycle among its enabled connections",
            $genome.id
        );
    };
}

/// Asserts two floats agree to within `1e-9`.
#[macro_export]
macro_rules! assert_close {
    ($left:expr, $right:expr) => {
        let (l, r): (f64, f64) = ($left, $right);
        assert!((l - r).abs() < 1e-9, "{} is not close to {}", l, r);
    };
}
