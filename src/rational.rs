// tonal-gen -- music theory engine and chord progression generator
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Rational numbers are used for counting beats, e.g. a dotted eighth taking 3/4 of a beat.

use std::{cmp::Ordering, fmt, ops};

/// Underlying integral type for the rational numbers.
type Int = i64;

/// A rational number, always fully normalized.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Rational {
    /// The numerator of the fraction, carrying the sign.
    num: Int,
    /// The denominator of the fraction, always positive.
    denom: Int,
}

impl Rational {
    /// Create a new rational from a potentially unnormalized fraction.
    ///
    /// # Panic
    ///
    /// Panics if the denominator is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use tonal_gen::rational::*;
    ///
    /// assert_eq!(Rational::new(10, 5), Rational::from_int(2));
    /// assert_eq!(Rational::new(-6, 8), Rational::new(3, -4));
    /// ```
    pub fn new(num: Int, denom: Int) -> Rational {
        assert_ne!(denom, 0, "Denominator must not be zero");

        let sign = num.signum() * denom.signum();
        let div = gcd(num, denom).max(1);
        Rational {
            num: sign * num.abs() / div,
            denom: denom.abs() / div,
        }
    }

    pub fn from_int(int: Int) -> Rational {
        Rational { num: int, denom: 1 }
    }

    pub fn zero() -> Rational {
        Rational::from_int(0)
    }

    pub fn one() -> Rational {
        Rational::from_int(1)
    }

    pub fn numerator(self) -> Int {
        self.num
    }

    pub fn denominator(self) -> Int {
        self.denom
    }

    /// Lossy conversion, used when handing beat counts over to wall clock time.
    pub fn to_f64(self) -> f64 {
        self.num as f64 / self.denom as f64
    }
}

/// # Examples
///
/// ```
/// use tonal_gen::rational::*;
///
/// assert_eq!(Rational::new(1, 2) + Rational::new(3, 4), Rational::new(5, 4));
/// assert_eq!(Rational::new(3, 4) + Rational::new(-5, 8), Rational::new(1, 8));
/// ```
impl ops::Add for Rational {
    type Output = Rational;

    fn add(self, rhs: Rational) -> Self::Output {
        Rational::new(
            self.num * rhs.denom + self.denom * rhs.num,
            self.denom * rhs.denom,
        )
    }
}

impl ops::AddAssign for Rational {
    fn add_assign(&mut self, rhs: Rational) {
        *self = *self + rhs;
    }
}

impl ops::Mul<Int> for Rational {
    type Output = Rational;

    fn mul(self, rhs: Int) -> Self::Output {
        Rational::new(self.num * rhs, self.denom)
    }
}

impl ops::Div<Int> for Rational {
    type Output = Rational;

    fn div(self, rhs: Int) -> Self::Output {
        Rational::new(self.num, self.denom * rhs)
    }
}

impl std::iter::Sum for Rational {
    fn sum<I: Iterator<Item = Rational>>(iter: I) -> Rational {
        iter.fold(Rational::zero(), |acc, r| acc + r)
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Rational) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// ```
/// use tonal_gen::rational::*;
///
/// assert!(Rational::new(3, 4) < Rational::new(3, 2));
/// assert!(Rational::from_int(4) >= Rational::new(8, 2));
/// ```
impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        // a / b < c / d  <=>  a * d < c * b, denominators are positive
        let l = self.num * other.denom;
        let r = other.num * self.denom;
        l.cmp(&r)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denom == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.denom)
        }
    }
}

/// Computes the greatest common divisor of two numbers using euclids algorithm.
///
/// # Example
///
/// ```
/// use tonal_gen::rational::*;
///
/// assert_eq!(gcd(20, 15), 5);
/// assert_eq!(gcd(0, 10), 10);
/// assert_eq!(gcd(10, -10), 10);
/// ```
pub fn gcd(a: Int, b: Int) -> Int {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sum_of_beats() {
        let beats: Rational = vec![Rational::new(1, 2), Rational::new(3, 4), Rational::new(3, 4)]
            .into_iter()
            .sum();
        assert_eq!(beats, Rational::from_int(2));
        assert_eq!(format!("{}", beats), "2");
        assert_eq!(format!("{}", Rational::new(3, 2)), "3/2");
    }

    #[test]
    fn zero_stays_normalized() {
        assert_eq!(Rational::new(0, 7), Rational::zero());
        assert_eq!(Rational::zero().denominator(), 1);
        assert_eq!(Rational::new(3, 4) / 3, Rational::new(1, 4));
    }

    #[test]
    fn scaling_by_integers() {
        // a dotted eighth
        assert_eq!(Rational::new(1, 2) * 3 / 2, Rational::new(3, 4));
        assert_eq!(Rational::new(2, 3) * 3, Rational::from_int(2));
        assert_eq!(Rational::new(1, 4) * -2, Rational::new(-1, 2));
    }
}
