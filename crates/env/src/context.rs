//! Per-call environment properties served by the reference hosts.

use crate::codec::encode;
use crate::error::Result;
use crate::host::Property;
use serde::{Deserialize, Serialize};
use tessera_core::Address;

/// Default gas budget for a call.
pub const DEFAULT_GAS_LEFT: u64 = 1_000_000;

/// The environment a contract call runs in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    /// Account that made the call.
    pub caller: Address,
    /// Address of the executing contract.
    pub address: Address,
    /// Balance of the executing contract.
    pub balance: u128,
    /// Value sent along with the call.
    pub value_transferred: u128,
    /// Block timestamp (milliseconds).
    pub now: u64,
    /// Current block number.
    pub block_number: u64,
    /// Existential deposit.
    pub minimum_balance: u128,
    /// Gas remaining for the call.
    pub gas_left: u64,
}

impl CallContext {
    /// Create a context for a call from `caller` into `address`.
    pub fn new(caller: Address, address: Address) -> Self {
        Self {
            caller,
            address,
            ..Self::default()
        }
    }

    /// Encode a single property with the storage codec.
    pub fn encode_property(&self, property: Property) -> Result<Vec<u8>> {
        match property {
            Property::Caller => encode(&self.caller),
            Property::Address => encode(&self.address),
            Property::Balance => encode(&self.balance),
            Property::ValueTransferred => encode(&self.value_transferred),
            Property::Now => encode(&self.now),
            Property::BlockNumber => encode(&self.block_number),
            Property::MinimumBalance => encode(&self.minimum_balance),
            Property::GasLeft => encode(&self.gas_left),
        }
    }
}

impl Default for CallContext {
    fn default() -> Self {
        Self {
            caller: Address::ZERO,
            address: Address::ZERO,
            balance: 0,
            value_transferred: 0,
            now: 0,
            block_number: 0,
            minimum_balance: 0,
            gas_left: DEFAULT_GAS_LEFT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode;

    #[test]
    fn test_encode_property() {
        let mut context = CallContext::new(Address([0xAA; 32]), Address([0xBB; 32]));
        context.block_number = 77;

        let caller: Address = decode(&context.encode_property(Property::Caller).unwrap()).unwrap();
        assert_eq!(caller, Address([0xAA; 32]));

        let number: u64 =
            decode(&context.encode_property(Property::BlockNumber).unwrap()).unwrap();
        assert_eq!(number, 77);
    }
}
