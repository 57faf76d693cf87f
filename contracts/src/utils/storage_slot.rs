//! Helper for reading and writing primitive types to specific storage slots.
use alloy_primitives::{Address, B256, U256};
use zos_vm::Host;

/// A value that occupies a single storage word.
pub trait SlotValue: Sized {
    /// Decodes the value from a storage word.
    fn from_word(word: B256) -> Self;

    /// Encodes the value into a storage word.
    fn into_word(self) -> B256;
}

/// Addresses are right-aligned: the low 20 bytes hold the address and the
/// high 12 bytes are zero.
impl SlotValue for Address {
    fn from_word(word: B256) -> Self {
        Address::from_word(word)
    }

    fn into_word(self) -> B256 {
        Address::into_word(&self)
    }
}

impl SlotValue for U256 {
    fn from_word(word: B256) -> Self {
        word.into()
    }

    fn into_word(self) -> B256 {
        self.into()
    }
}

impl SlotValue for B256 {
    fn from_word(word: B256) -> Self {
        word
    }

    fn into_word(self) -> B256 {
        self
    }
}

/// Helper for reading and writing primitive types to specific storage slots.
///
/// Storage slots are often used to avoid storage conflict when dealing with
/// upgradeable contracts. A proxy keeps its own bookkeeping at slots derived
/// from a hash, far away from the sequential layout the logic behind it uses.
///
/// Example usage to access the zOS implementation slot:
///
/// ```rust
/// use alloy_primitives::{b256, Address, B256};
/// use zos_contracts::utils::storage_slot::StorageSlot;
/// use zos_vm::prelude::*;
///
/// const IMPLEMENTATION_SLOT: B256 = b256!(
///     "0x7050c9e0f4ca769c69bd3a8ef740bc37934f8e2c036e5a723fd8ee048ed3f8c3"
/// );
///
/// fn implementation(host: &dyn Host) -> Address {
///     StorageSlot::get_slot(host, IMPLEMENTATION_SLOT)
/// }
/// ```
pub struct StorageSlot;

impl StorageSlot {
    /// Returns the value stored at `slot` of the current contract.
    ///
    /// # Arguments
    ///
    /// * `host` - Read access to the contract's state.
    /// * `slot` - The slot to read from.
    #[must_use]
    pub fn get_slot<V: SlotValue>(
        host: &(impl Host + ?Sized),
        slot: B256,
    ) -> V {
        V::from_word(host.storage_load(slot))
    }

    /// Stores `value` at `slot` of the current contract.
    ///
    /// # Arguments
    ///
    /// * `host` - Write access to the contract's state.
    /// * `slot` - The slot to write to.
    /// * `value` - The value to store.
    pub fn set_slot<V: SlotValue>(
        host: &mut (impl Host + ?Sized),
        slot: B256,
        value: V,
    ) {
        host.storage_store(slot, value.into_word());
    }
}
