use crate::lattice::TransformMatrix;

/// Lazily generate every canonical supercell matrix of determinant `n`.
///
/// Yields `[[x1, x2], [0, x3]]` with `x1 * x3 == n` and `0 <= x2 < x3`, ordered by `x3`
/// and then `x2` (both ascending). `n == 0` yields nothing, since no positive diagonal
/// has a zero product.
pub fn supercell_matrices(n: u32) -> impl Iterator<Item = TransformMatrix> {
    (1..=n)
        .filter(move |x3| n % x3 == 0)
        .flat_map(move |x3| {
            let x1 = n / x3;
            (0..x3).map(move |x2| TransformMatrix::from_canonical(x1, x2, x3))
        })
}

/// Collect [`supercell_matrices`] in generation order.
///
/// ```
/// use lattice_match::matching::enumerate_supercell_matrices;
///
/// let matrices = enumerate_supercell_matrices(2);
/// let entries: Vec<_> = matrices.iter().map(|m| m.entries()).collect();
/// assert_eq!(entries, vec![(2, 0, 1), (1, 0, 2), (1, 1, 2)]);
/// ```
pub fn enumerate_supercell_matrices(n: u32) -> Vec<TransformMatrix> {
    let mut matrices = Vec::with_capacity(count_supercell_matrices(n) as usize);
    matrices.extend(supercell_matrices(n));
    matrices
}

/// Number of canonical matrices of determinant `n`, i.e. the divisor sum σ(n).
pub fn count_supercell_matrices(n: u32) -> u64 {
    (1..=n)
        .filter(|x3| n % x3 == 0)
        .map(|x3| x3 as u64)
        .sum()
}
