//! Storage reserve schedule.
//!
//! The deployment must hold a minimum balance proportional to the persistent
//! storage it has allocated. The schedule fixes that proportion; growth must
//! be pre-funded by the caller of the operation that allocates.

use serde::{Deserialize, Serialize};

use crate::amount::Amount;

/// Pricing for the minimum-reserve requirement.
///
/// The requirement for a deployment holding `n` boxes totalling `b` bytes of
/// keys and values is `base_reserve + n * box_flat_cost + b * box_byte_cost`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSchedule {
    /// Reserve every deployment holds before allocating anything,
    /// covering its account record and global singletons.
    pub base_reserve: u64,

    /// Flat reserve increase per allocated box.
    pub box_flat_cost: u64,

    /// Reserve increase per byte of box key plus box value.
    pub box_byte_cost: u64,
}

impl StorageSchedule {
    /// Reserve requirement for `boxes` allocated boxes totalling `bytes`
    /// bytes of keys and values.
    pub fn requirement(&self, boxes: u64, bytes: u64) -> Amount {
        let total = self
            .base_reserve
            .saturating_add(self.box_flat_cost.saturating_mul(boxes))
            .saturating_add(self.box_byte_cost.saturating_mul(bytes));
        Amount::new(total)
    }

    /// Marginal reserve cost of allocating one box with the given key and
    /// value lengths.
    pub fn box_cost(&self, key_len: usize, value_len: usize) -> Amount {
        let bytes = (key_len + value_len) as u64;
        Amount::new(
            self.box_flat_cost
                .saturating_add(self.box_byte_cost.saturating_mul(bytes)),
        )
    }
}

impl Default for StorageSchedule {
    fn default() -> Self {
        Self {
            base_reserve: 100_000,
            box_flat_cost: 2_500,
            box_byte_cost: 400,
        }
    }
}
