use approx::{AbsDiffEq, RelativeEq};
use std::ops::Mul;

use super::{common::FloatValueType, Normal};

/// A row-major 4x4 `Matrix4x4`
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Matrix4x4<T>
where
    T: FloatValueType,
{
    /// Raw values in row-major order.
    pub m: [[T; 4]; 4],
}

impl<T> Matrix4x4<T>
where
    T: FloatValueType,
{
    /// Creates a new `Matrix4x4`.
    pub fn new(m: [[T; 4]; 4]) -> Self {
        let ret = Self { m };
        debug_assert!(!ret.has_nans());
        ret
    }

    /// Creates a new identity `Matrix4x4`.
    pub fn identity() -> Self {
        let mut m = [[T::zero(); 4]; 4];
        for (i, row) in m.iter_mut().enumerate() {
            row[i] = T::one();
        }
        Self { m }
    }

    /// Checks if this `Matrix4x4` contains NaNs.
    pub fn has_nans(&self) -> bool {
        self.m.iter().flatten().any(|v| v.is_nan())
    }

    /// Returns the row `i` of this `Matrix4x4`.
    pub fn row(&self, i: usize) -> [T; 4] {
        self.m[i]
    }

    /// Returns the column `i` of this `Matrix4x4`.
    pub fn col(&self, i: usize) -> [T; 4] {
        [self.m[0][i], self.m[1][i], self.m[2][i], self.m[3][i]]
    }

    /// Returns the transpose of this `Matrix4x4`.
    pub fn transposed(&self) -> Self {
        Self {
            m: [self.col(0), self.col(1), self.col(2), self.col(3)],
        }
    }

    /// Returns the inverse of this `Matrix4x4` or `None` if it is singular.
    pub fn inverted(&self) -> Option<Self> {
        // Gauss-Jordan elimination with partial pivoting on [M | I]
        let mut a = self.m;
        let mut inv = Self::identity().m;

        for col in 0..4 {
            // Largest remaining value in the column keeps the elimination stable
            let mut pivot_row = col;
            for row in (col + 1)..4 {
                if a[row][col].abs() > a[pivot_row][col].abs() {
                    pivot_row = row;
                }
            }
            if a[pivot_row][col].abs() <= T::epsilon() * T::epsilon() {
                return None;
            }
            a.swap(col, pivot_row);
            inv.swap(col, pivot_row);

            let pivot_inv = T::one() / a[col][col];
            for c in 0..4 {
                a[col][c] *= pivot_inv;
                inv[col][c] *= pivot_inv;
            }

            for row in 0..4 {
                if row == col {
                    continue;
                }
                let factor = a[row][col];
                if factor == T::zero() {
                    continue;
                }
                for c in 0..4 {
                    a[row][c] = a[row][c] - factor * a[col][c];
                    inv[row][c] = inv[row][c] - factor * inv[col][c];
                }
            }
        }

        Some(Self::new(inv))
    }

    /// Returns the upper 3x3 block of this `Matrix4x4` as a `Matrix4x4` with no translation.
    pub fn upper3x3(&self) -> Self {
        let mut m = Self::identity().m;
        for (row, src) in m.iter_mut().zip(self.m.iter()).take(3) {
            row[..3].copy_from_slice(&src[..3]);
        }
        Self { m }
    }
}

impl<'a, 'b, T> Mul<&'b Matrix4x4<T>> for &'a Matrix4x4<T>
where
    T: FloatValueType,
{
    type Output = Matrix4x4<T>;

    fn mul(self, other: &'b Matrix4x4<T>) -> Matrix4x4<T> {
        let mut m = [[T::zero(); 4]; 4];
        for (r, row) in m.iter_mut().enumerate() {
            for (c, v) in row.iter_mut().enumerate() {
                *v = self.m[r][0] * other.m[0][c]
                    + self.m[r][1] * other.m[1][c]
                    + self.m[r][2] * other.m[2][c]
                    + self.m[r][3] * other.m[3][c];
            }
        }
        Matrix4x4::new(m)
    }
}

impl<'a, T> Mul<Normal<T>> for &'a Matrix4x4<T>
where
    T: FloatValueType,
{
    type Output = Normal<T>;

    /// Applies the upper 3x3 block, for use with a normal matrix.
    fn mul(self, n: Normal<T>) -> Normal<T> {
        let m = &self.m;
        Normal::new(
            m[0][0] * n.x + m[0][1] * n.y + m[0][2] * n.z,
            m[1][0] * n.x + m[1][1] * n.y + m[1][2] * n.z,
            m[2][0] * n.x + m[2][1] * n.y + m[2][2] * n.z,
        )
    }
}

impl<T> AbsDiffEq for Matrix4x4<T>
where
    T: FloatValueType + AbsDiffEq<Epsilon = T>,
{
    type Epsilon = T;

    fn default_epsilon() -> T {
        T::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: T) -> bool {
        self.m
            .iter()
            .flatten()
            .zip(other.m.iter().flatten())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl<T> RelativeEq for Matrix4x4<T>
where
    T: FloatValueType + RelativeEq<Epsilon = T>,
{
    fn default_max_relative() -> T {
        T::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: T, max_relative: T) -> bool {
        self.m
            .iter()
            .flatten()
            .zip(other.m.iter().flatten())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}
