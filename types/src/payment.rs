//! Funding proof accompanying a storage-growth operation.

use serde::{Deserialize, Serialize};

use crate::account::AccountId;
use crate::amount::Amount;

/// A payment record proving that `amount` was transferred to `receiver`.
///
/// The DAO only reads `receiver` and `amount`: the receiver must be the DAO's
/// own account, and the amount must cover the marginal reserve increase of
/// the operation being funded. Settlement of the transfer itself happens in
/// the surrounding deployment and is out of scope here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub sender: AccountId,
    pub receiver: AccountId,
    pub amount: Amount,
}

impl Payment {
    pub fn new(sender: AccountId, receiver: AccountId, amount: Amount) -> Self {
        Self {
            sender,
            receiver,
            amount,
        }
    }
}
