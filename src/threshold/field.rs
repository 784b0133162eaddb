//! GF(2^8) 有限域运算，约化多项式为 x^8 + x^4 + x^3 + x + 1（0x11B）。
//!
//! 加法与减法都是异或；乘法逐位进行，不依赖查表。

use std::ops::{Add, Mul};
use zeroize::Zeroize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Zeroize)]
pub(crate) struct Gf256(pub(crate) u8);

impl Gf256 {
    pub(crate) const ZERO: Self = Gf256(0);
    pub(crate) const ONE: Self = Gf256(1);

    /// 乘法逆元，`a^-1 = a^254`。零没有逆元，返回 `None`。
    pub(crate) fn inverse(self) -> Option<Self> {
        if self.0 == 0 {
            return None;
        }
        // 平方-乘：254 = 0b1111_1110
        let mut result = Gf256::ONE;
        let mut base = self;
        let mut exponent = 254u8;
        while exponent != 0 {
            if exponent & 1 == 1 {
                result = result * base;
            }
            base = base * base;
            exponent >>= 1;
        }
        Some(result)
    }

    /// Horner 法求多项式在 `x` 处的值，系数按升幂排列
    pub(crate) fn evaluate(coefficients: &[Gf256], x: Gf256) -> Gf256 {
        coefficients
            .iter()
            .rev()
            .fold(Gf256::ZERO, |acc, &c| acc * x + c)
    }

    /// 计算 x = 0 处的拉格朗日基系数 `l_i(0) = Π_{j≠i} x_j / (x_j - x_i)`。
    ///
    /// 所有 x 必须互不相同且非零，否则返回 `None`。
    pub(crate) fn lagrange_basis_at_zero(xs: &[Gf256]) -> Option<Vec<Gf256>> {
        xs.iter()
            .enumerate()
            .map(|(i, &xi)| {
                let mut numerator = Gf256::ONE;
                let mut denominator = Gf256::ONE;
                for (j, &xj) in xs.iter().enumerate() {
                    if i != j {
                        numerator = numerator * xj;
                        denominator = denominator * (xj + xi);
                    }
                }
                Some(numerator * denominator.inverse()?)
            })
            .collect()
    }
}

impl Add for Gf256 {
    type Output = Self;

    #[allow(clippy::suspicious_arithmetic_impl)]
    fn add(self, rhs: Self) -> Self {
        Gf256(self.0 ^ rhs.0)
    }
}

impl Mul for Gf256 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let mut a = self.0;
        let mut b = rhs.0;
        let mut product = 0u8;
        for _ in 0..8 {
            // 无分支：掩码为 0x00 或 0xFF
            product ^= a & (b & 1).wrapping_neg();
            let carry = (a >> 7).wrapping_neg();
            a = (a << 1) ^ (0x1B & carry);
            b >>= 1;
        }
        Gf256(product)
    }
}
