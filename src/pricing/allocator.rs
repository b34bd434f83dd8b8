//! Ceiling-constrained price allocation
//!
//! Splits a set's total price across its pieces. The sum of the allocated
//! prices always equals the input total to the cent; the ceiling is only
//! guaranteed for the first `n-1` pieces. The last piece absorbs whatever
//! remains and may exceed the ceiling, or clamp to zero, for adverse
//! (total, pieces, ceiling) combinations. That policy is deliberate and
//! pinned by tests; no redistribution is attempted.

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AllocationError {
    #[error("total price must be positive, got {0}")]
    NonPositiveTotal(Decimal),

    #[error("piece count must be at least one")]
    ZeroPieces,
}

/// Allocates a total price across N pieces under a per-piece ceiling.
pub struct PriceAllocator {
    ceiling: Decimal,
}

impl PriceAllocator {
    pub fn new(ceiling: Decimal) -> Self {
        Self { ceiling }
    }

    pub fn ceiling(&self) -> Decimal {
        self.ceiling
    }

    /// Returns one price per piece, summing exactly to `total`.
    pub fn allocate(&self, total: Decimal, pieces: u32) -> Result<Vec<Decimal>, AllocationError> {
        if pieces == 0 {
            return Err(AllocationError::ZeroPieces);
        }
        if total <= Decimal::ZERO {
            return Err(AllocationError::NonPositiveTotal(total));
        }

        let count = Decimal::from(pieces);
        let even = round_money(total / count);

        if even <= self.ceiling {
            let mut split = vec![even; pieces as usize];
            // fold the rounding drift into the last piece so the sum is exact
            let drift = total - even * count;
            if let Some(last) = split.last_mut() {
                *last += drift;
            }
            return Ok(split);
        }

        let mut split = Vec::with_capacity(pieces as usize);
        let mut remaining = total;
        for i in 0..pieces - 1 {
            // reserve one unit for every piece still to come so later shares
            // stay nonnegative
            let reserve = Decimal::from(pieces - i - 1);
            let share = round_money(self.ceiling.min(remaining - reserve).max(Decimal::ZERO));
            split.push(share);
            remaining -= share;
        }
        split.push(remaining.max(Decimal::ZERO));
        Ok(split)
    }
}

fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
