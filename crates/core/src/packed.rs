//! Symmetric matrices stored as their packed lower triangle.
//!
//! An `n × n` symmetric matrix is stored row by row as the `n(n+1)/2`
//! elements on and below the diagonal:
//!
//! ```text
//! a00
//! a10 a11
//! a20 a21 a22
//! ```
//!
//! Element `(i, j)` with `j ≤ i` lives at `i(i+1)/2 + j`. The accessors below
//! accept either order and map `(i, j)` with `j > i` onto `(j, i)`.

/// Returns the number of stored elements of an `n × n` packed matrix.
#[must_use]
pub const fn len(n: usize) -> usize {
    n * (n + 1) / 2
}

/// Returns the storage index of element `(i, j)`.
#[must_use]
pub const fn index(i: usize, j: usize) -> usize {
    if j <= i {
        i * (i + 1) / 2 + j
    } else {
        j * (j + 1) / 2 + i
    }
}

/// Returns element `(i, j)` of a packed matrix.
///
/// # Panics
///
/// Panics if `(i, j)` lies outside `matrix`.
#[must_use]
pub fn get(matrix: &[f64], i: usize, j: usize) -> f64 {
    matrix[index(i, j)]
}

/// Returns a mutable reference to element `(i, j)` of a packed matrix.
///
/// # Panics
///
/// Panics if `(i, j)` lies outside `matrix`.
pub fn get_mut(matrix: &mut [f64], i: usize, j: usize) -> &mut f64 {
    &mut matrix[index(i, j)]
}

/// Replaces a positive definite packed matrix by its Cholesky factor `L`.
///
/// On success `matrix` holds the lower triangular `L` with `A = LLᵀ`.
/// Returns `false` if the matrix is not numerically positive definite; the
/// contents are then partially overwritten and meaningless.
pub fn cholesky_decompose(matrix: &mut [f64], n: usize) -> bool {
    for k in 0..n {
        let mut s = get(matrix, k, k);
        for i in 0..k {
            s -= get(matrix, k, i) * get(matrix, k, i);
        }
        if s <= 0.0 {
            return false;
        }
        let s = s.sqrt();
        *get_mut(matrix, k, k) = s;

        for j in k + 1..n {
            let mut r = get(matrix, j, k);
            for i in 0..k {
                r -= get(matrix, k, i) * get(matrix, j, i);
            }
            *get_mut(matrix, j, k) = r / s;
        }
    }
    true
}

/// Solves `LLᵀx = b` in place, with `decomp` from [`cholesky_decompose`].
///
/// On return `rhs` holds the solution `x`.
pub fn cholesky_solve(decomp: &[f64], rhs: &mut [f64], n: usize) {
    for j in 0..n {
        for i in 0..j {
            rhs[j] -= get(decomp, j, i) * rhs[i];
        }
        rhs[j] /= get(decomp, j, j);
    }

    for j in (0..n).rev() {
        for i in j + 1..n {
            rhs[j] -= get(decomp, i, j) * rhs[i];
        }
        rhs[j] /= get(decomp, j, j);
    }
}

/// Inverts a positive definite packed matrix in place.
///
/// Returns `false` if the matrix is not numerically positive definite; the
/// contents are then meaningless.
pub fn cholesky_invert(matrix: &mut [f64], n: usize) -> bool {
    if !cholesky_decompose(matrix, n) {
        return false;
    }

    let mut inverse = vec![0.0; len(n)];
    let mut column = vec![0.0; n];
    for j in 0..n {
        column.fill(0.0);
        column[j] = 1.0;
        cholesky_solve(matrix, &mut column, n);
        for (i, &value) in column.iter().enumerate().skip(j) {
            *get_mut(&mut inverse, i, j) = value;
        }
    }
    matrix[..len(n)].copy_from_slice(&inverse);
    true
}
