mod common;
use common::genes;
use neatling_lib::model::config::DistanceCoefficients;
use neatling_lib::model::GenomeLogic;

#[test]
fn test_partially_overlapping_innovations() {
    let g1 = genes(0, &[(1, 0.1), (2, 0.2)]);
    let g2 = genes(1, &[(1, 0.1), (3, 0.3)]);
    let coefficients = DistanceCoefficients::default();

    // Innovation 2 lies within g2's range and counts; 3 lies past g1's range and does not.
    // d = 1, N = 2, matching weight difference 0.
    assert_close!(g1.distance(&g2, &coefficients), 1.0);
    assert_close!(g2.distance(&g1, &coefficients), 1.0);
}

#[test]
fn test_missing_gene_count_feeds_both_structural_terms() {
    let g1 = genes(0, &[(1, 0.0), (2, 0.0), (4, 0.0)]);
    let g2 = genes(1, &[(1, 0.0), (3, 0.0), (4, 0.0)]);
    let coefficients = DistanceCoefficients {
        c1: 2.0,
        c2: 3.0,
        c3: 0.0,
    };
    assert_close!(g1.distance(&g2, &coefficients), 2.0 * 2.0 / 3.0 + 3.0 * 2.0 / 3.0);
}

#[test]
fn test_weight_term_averages_matching_genes() {
    let g1 = genes(0, &[(1, 0.5), (2, -1.0)]);
    let g2 = genes(1, &[(1, 1.5), (2, 1.0)]);
    let coefficients = DistanceCoefficients::default();
    assert_close!(g1.distance(&g2, &coefficients), 0.4 * 1.5);
}

#[test]
fn test_identical_and_empty_genomes() {
    let coefficients = DistanceCoefficients::default();
    let g = genes(0, &[(1, 0.3), (5, -0.7)]);
    assert_close!(g.distance(&g.clone(), &coefficients), 0.0);

    let empty = genes(1, &[]);
    assert_close!(empty.distance(&genes(2, &[]), &coefficients), 0.0);
    // Nothing is counted against a genome with no markers.
    assert_close!(g.distance(&empty, &coefficients), 0.0);
}
