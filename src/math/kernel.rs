//! Shape-checked linear-algebra primitives.
//!
//! Every operation writes into a caller-supplied `out` of the exact expected
//! shape. Shapes are validated before `out` is touched, so a failed call
//! leaves `out` as it was. Rust's borrow rules already keep `out` disjoint
//! from the inputs; in-place updates go through [`Kernel::sub_assign`] and
//! [`Kernel::scale_assign`].

use serde::{Deserialize, Serialize};

use crate::error::{MlError, Result};
use crate::math::{Buffer, Matrix, Number, Vector};

/// Whether the kernel validates operand shapes before computing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Validation {
    #[default]
    Checked,
    /// Skips shape checks for call sites whose shapes are already proven.
    /// A wrong shape then surfaces as a slice-index panic or a truncated
    /// loop instead of [`MlError::ShapeMismatch`].
    Trusted,
}

/// Entry point for all primitive operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Kernel {
    validation: Validation,
}

impl Kernel {
    pub const fn new(validation: Validation) -> Kernel {
        Kernel { validation }
    }

    pub const fn checked() -> Kernel {
        Kernel::new(Validation::Checked)
    }

    pub const fn trusted() -> Kernel {
        Kernel::new(Validation::Trusted)
    }

    pub fn validation(&self) -> Validation {
        self.validation
    }

    pub(crate) fn ensure<F>(&self, op: &'static str, ok: bool, detail: F) -> Result<()>
    where
        F: FnOnce() -> String,
    {
        if self.validation == Validation::Checked && !ok {
            return Err(MlError::ShapeMismatch {
                op,
                detail: detail(),
            });
        }
        Ok(())
    }

    fn ensure_same<T: Buffer>(&self, op: &'static str, operands: &[&T]) -> Result<()> {
        let first = operands.first().map(|b| b.dims());
        self.ensure(
            op,
            operands.iter().all(|b| Some(b.dims()) == first),
            || {
                let dims: Vec<String> = operands.iter().map(|b| b.dims().to_string()).collect();
                format!("operands must share one shape, got [{}]", dims.join(", "))
            },
        )
    }

    fn zip_into<T, F>(out: &mut T, a: &T, b: &T, f: F)
    where
        T: Buffer,
        F: Fn(Number, Number) -> Number,
    {
        for ((o, &x), &y) in out.values_mut().iter_mut().zip(a.values()).zip(b.values()) {
            *o = f(x, y);
        }
    }

    /// `out = a + b`
    pub fn add<T: Buffer>(&self, out: &mut T, a: &T, b: &T) -> Result<()> {
        self.ensure_same("add", &[&*out, a, b])?;
        Kernel::zip_into(out, a, b, |x, y| x + y);
        Ok(())
    }

    /// `out = a - b`
    pub fn sub<T: Buffer>(&self, out: &mut T, a: &T, b: &T) -> Result<()> {
        self.ensure_same("sub", &[&*out, a, b])?;
        Kernel::zip_into(out, a, b, |x, y| x - y);
        Ok(())
    }

    /// Hadamard product, `out = a ⊙ b`.
    pub fn entrywise_product<T: Buffer>(&self, out: &mut T, a: &T, b: &T) -> Result<()> {
        self.ensure_same("entrywise_product", &[&*out, a, b])?;
        Kernel::zip_into(out, a, b, |x, y| x * y);
        Ok(())
    }

    /// `out = k * input`
    pub fn scale<T: Buffer>(&self, out: &mut T, input: &T, k: Number) -> Result<()> {
        self.map_into(out, input, |x| x * k)
    }

    pub fn copy<T: Buffer>(&self, out: &mut T, input: &T) -> Result<()> {
        self.ensure_same("copy", &[&*out, input])?;
        out.values_mut().copy_from_slice(input.values());
        Ok(())
    }

    /// Applies `f` to every entry of `input`, writing into `out`.
    pub fn map_into<T, F>(&self, out: &mut T, input: &T, f: F) -> Result<()>
    where
        T: Buffer,
        F: Fn(Number) -> Number,
    {
        self.ensure_same("map_into", &[&*out, input])?;
        for (o, &x) in out.values_mut().iter_mut().zip(input.values()) {
            *o = f(x);
        }
        Ok(())
    }

    /// `target = target - rhs`
    pub fn sub_assign<T: Buffer>(&self, target: &mut T, rhs: &T) -> Result<()> {
        self.ensure_same("sub_assign", &[&*target, rhs])?;
        for (t, &r) in target.values_mut().iter_mut().zip(rhs.values()) {
            *t -= r;
        }
        Ok(())
    }

    /// `target = k * target`
    pub fn scale_assign<T: Buffer>(&self, target: &mut T, k: Number) {
        for t in target.values_mut() {
            *t *= k;
        }
    }

    /// `out = a · b`, with `out[i][j] = Σ_k a[i][k] * b[k][j]` summed in `k` order.
    pub fn matrix_product(&self, out: &mut Matrix, a: &Matrix, b: &Matrix) -> Result<()> {
        self.ensure(
            "matrix_product",
            a.cols() == b.rows() && out.rows() == a.rows() && out.cols() == b.cols(),
            || {
                format!(
                    "{}x{} · {}x{} cannot be written to {}x{}",
                    a.rows(),
                    a.cols(),
                    b.rows(),
                    b.cols(),
                    out.rows(),
                    out.cols()
                )
            },
        )?;

        let (n, inner, m) = (a.rows(), a.cols(), b.cols());
        let (av, bv) = (a.as_slice(), b.as_slice());
        let ov = out.as_mut_slice();
        for i in 0..n {
            for j in 0..m {
                let mut sum = 0.0;
                for k in 0..inner {
                    sum += av[i * inner + k] * bv[k * m + j];
                }
                ov[i * m + j] = sum;
            }
        }
        Ok(())
    }

    /// `out = a · b` for a vector `b`.
    pub fn matrix_vector_product(&self, out: &mut Vector, a: &Matrix, b: &Vector) -> Result<()> {
        self.ensure(
            "matrix_vector_product",
            a.cols() == b.size() && out.size() == a.rows(),
            || {
                format!(
                    "{}x{} · vector of {} cannot be written to vector of {}",
                    a.rows(),
                    a.cols(),
                    b.size(),
                    out.size()
                )
            },
        )?;

        let cols = a.cols();
        let (av, bv) = (a.as_slice(), b.as_slice());
        for (i, o) in out.as_mut_slice().iter_mut().enumerate() {
            let row = &av[i * cols..(i + 1) * cols];
            *o = row.iter().zip(bv).map(|(x, y)| x * y).sum();
        }
        Ok(())
    }

    /// `out[i][j] = input[j][i]`
    pub fn transpose(&self, out: &mut Matrix, input: &Matrix) -> Result<()> {
        self.ensure(
            "transpose",
            out.rows() == input.cols() && out.cols() == input.rows(),
            || {
                format!(
                    "transpose of {}x{} cannot be written to {}x{}",
                    input.rows(),
                    input.cols(),
                    out.rows(),
                    out.cols()
                )
            },
        )?;

        let (rows, cols) = (input.rows(), input.cols());
        let iv = input.as_slice();
        let ov = out.as_mut_slice();
        for i in 0..rows {
            for j in 0..cols {
                ov[j * rows + i] = iv[i * cols + j];
            }
        }
        Ok(())
    }

    /// Sums every row across its columns: `out[i] = Σ_j input[i][j]`.
    ///
    /// With samples laid out as columns this reduces per-sample values over a batch.
    pub fn column_sum(&self, out: &mut Vector, input: &Matrix) -> Result<()> {
        self.ensure("column_sum", out.size() == input.rows(), || {
            format!(
                "{}x{} reduces to {} values, receiver holds {}",
                input.rows(),
                input.cols(),
                input.rows(),
                out.size()
            )
        })?;

        let cols = input.cols();
        let iv = input.as_slice();
        for (i, o) in out.as_mut_slice().iter_mut().enumerate() {
            *o = iv[i * cols..(i + 1) * cols].iter().sum();
        }
        Ok(())
    }

    /// `out[i][j] = mat[i][j] + vec[i]` for every column `j`.
    pub fn broadcast_add_vector_to_columns(
        &self,
        out: &mut Matrix,
        mat: &Matrix,
        vec: &Vector,
    ) -> Result<()> {
        self.ensure(
            "broadcast_add_vector_to_columns",
            mat.rows() == vec.size() && out.rows() == mat.rows() && out.cols() == mat.cols(),
            || {
                format!(
                    "{}x{} + vector of {} cannot be written to {}x{}",
                    mat.rows(),
                    mat.cols(),
                    vec.size(),
                    out.rows(),
                    out.cols()
                )
            },
        )?;

        let cols = mat.cols();
        let mv = mat.as_slice();
        let ov = out.as_mut_slice();
        for (i, &b) in vec.as_slice().iter().enumerate() {
            for j in 0..cols {
                ov[i * cols + j] = mv[i * cols + j] + b;
            }
        }
        Ok(())
    }
}
