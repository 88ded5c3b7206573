//! Views of Pascal's Triangle built on top of the memoized binomial coefficients.
//!
//! These are the quantities the triangle is usually shown with: whole rows, the odd/even pattern
//! that forms a Sierpinski triangle, street-grid path counts, and shallow diagonals whose sums are
//! Fibonacci numbers.

use crate::cache::MemoCache;
use crate::error::{EvalError, Result};
use crate::evaluator::{BinomialKey, Evaluator};

impl<B, F> Evaluator<B, F>
where
    B: MemoCache<BinomialKey, u128>,
    F: MemoCache<u64, u128>,
{
    /// Row `n` of the triangle, C(n, 0) through C(n, n). Empty for negative `n`.
    pub fn row(&self, n: i64) -> Result<Vec<u128>> {
        (0..=n).map(|k| self.binomial(n, k)).collect()
    }

    /// The first `size` rows of the triangle.
    pub fn triangle(&self, size: i64) -> Result<Vec<Vec<u128>>> {
        (0..size).map(|n| self.row(n)).collect()
    }

    /// The first `size` rows with `true` wherever the entry is odd.
    pub fn parity_rows(&self, size: i64) -> Result<Vec<Vec<bool>>> {
        (0..size)
            .map(|n| {
                (0..=n)
                    .map(|k| Ok(self.binomial(n, k)? & 1 == 1))
                    .collect::<Result<Vec<bool>>>()
            })
            .collect()
    }

    /// Render the parity pattern as centred text, `#` for odd entries and `.` for even ones.
    ///
    /// ```
    /// use pascal_memo::Evaluator;
    ///
    /// let evaluator = Evaluator::new();
    /// assert_eq!(evaluator.render_parity(3).unwrap(), "  #\n # #\n# . #\n");
    /// ```
    pub fn render_parity(&self, size: i64) -> Result<String> {
        let mut out = String::new();
        for (n, row) in self.parity_rows(size)?.into_iter().enumerate() {
            let indent = size as usize - 1 - n;
            out.push_str(&" ".repeat(indent));
            let cells: Vec<&str> = row
                .into_iter()
                .map(|odd| if odd { "#" } else { "." })
                .collect();
            out.push_str(&cells.join(" "));
            out.push('\n');
        }
        Ok(out)
    }

    /// Number of shortest street routes across a grid of `width` by `height` blocks,
    /// moving only east or south. This is C(width + height, width).
    ///
    /// Grids whose `width + height` does not fit in an `i64` are rejected with
    /// [`EvalError::GridTooLarge`].
    pub fn lattice_paths(&self, width: i64, height: i64) -> Result<u128> {
        if width < 0 || height < 0 {
            return Ok(0);
        }
        let n = width
            .checked_add(height)
            .ok_or(EvalError::GridTooLarge { width, height })?;
        self.binomial(n, width)
    }

    /// Route counts to every crossing of the grid. Entry `[iy][ix]` is C(ix + iy, ix).
    pub fn lattice_grid(&self, width: i64, height: i64) -> Result<Vec<Vec<u128>>> {
        (0..=height)
            .map(|iy| (0..=width).map(|ix| self.lattice_paths(ix, iy)).collect())
            .collect()
    }

    /// Sum of the shallow diagonal C(d, 0) + C(d - 1, 1) + C(d - 2, 2) + ..., which equals F(d + 1).
    pub fn shallow_diagonal_sum(&self, d: i64) -> Result<u128> {
        let mut sum: u128 = 0;
        for k in 0..=d / 2 {
            let value = self.binomial(d - k, k)?;
            sum = sum
                .checked_add(value)
                .ok_or_else(|| EvalError::FibonacciOverflow(d.saturating_add(1)))?;
        }
        Ok(sum)
    }
}
