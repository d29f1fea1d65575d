//! # sabre-precompile
//!
//! Implementations of EVM precompiled contracts.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(not(feature = "std"), no_std)]

#[macro_use]
#[cfg(not(feature = "std"))]
extern crate alloc as std;

pub mod blake2;
pub mod bn128;
pub mod hash;
pub mod identity;
pub mod interface;
#[cfg(feature = "c-kzg")]
pub mod kzg_point_evaluation;
pub mod modexp;
pub mod secp256k1;
#[cfg(feature = "c-kzg")]
pub mod trusted_setup;
pub mod utilities;

pub use interface::*;

use cfg_if::cfg_if;
use once_cell::race::OnceBox;
use primitives::{hardfork::SpecId, Address, HashMap, HashSet};
use std::{boxed::Box, vec::Vec};

/// Calculate the linear cost of a precompile.
pub fn calc_linear_cost_u32(len: usize, base: u64, word: u64) -> u64 {
    (len as u64).div_ceil(32) * word + base
}

/// Precompiles contain a map of precompile addresses to functions and the set
/// of those addresses.
#[derive(Clone, Default, Debug)]
pub struct Precompiles {
    /// Precompiles
    inner: HashMap<Address, PrecompileFn>,
    /// Addresses of precompile
    addresses: HashSet<Address>,
}

impl Precompiles {
    /// Returns the precompiles for the given spec.
    pub fn new(spec: PrecompileSpecId) -> &'static Self {
        match spec {
            PrecompileSpecId::FRONTIER => Self::frontier(),
            PrecompileSpecId::BYZANTIUM => Self::byzantium(),
            PrecompileSpecId::ISTANBUL => Self::istanbul(),
            PrecompileSpecId::CANCUN => Self::cancun(),
        }
    }

    /// Returns precompiles for Frontier spec.
    pub fn frontier() -> &'static Self {
        static INSTANCE: OnceBox<Precompiles> = OnceBox::new();
        INSTANCE.get_or_init(|| {
            let mut precompiles = Precompiles::default();
            precompiles.extend([
                secp256k1::ECRECOVER,
                hash::SHA256,
                hash::RIPEMD160,
                identity::FUN,
            ]);
            Box::new(precompiles)
        })
    }

    /// Returns inner HashMap of precompiles.
    pub fn inner(&self) -> &HashMap<Address, PrecompileFn> {
        &self.inner
    }

    /// Returns precompiles for Byzantium spec.
    pub fn byzantium() -> &'static Self {
        static INSTANCE: OnceBox<Precompiles> = OnceBox::new();
        INSTANCE.get_or_init(|| {
            let mut precompiles = Self::frontier().clone();
            precompiles.extend([
                // EIP-196: Precompiled contracts for addition and scalar multiplication on the elliptic curve alt_bn128.
                // EIP-197: Precompiled contracts for optimal ate pairing check on the elliptic curve alt_bn128.
                bn128::add::BYZANTIUM,
                bn128::mul::BYZANTIUM,
                bn128::pair::BYZANTIUM,
                // EIP-198: Big integer modular exponentiation.
                modexp::FUN,
            ]);
            Box::new(precompiles)
        })
    }

    /// Returns precompiles for Istanbul spec.
    pub fn istanbul() -> &'static Self {
        static INSTANCE: OnceBox<Precompiles> = OnceBox::new();
        INSTANCE.get_or_init(|| {
            let mut precompiles = Self::byzantium().clone();
            precompiles.extend([
                // EIP-1108: Reduce alt_bn128 precompile gas costs.
                bn128::add::ISTANBUL,
                bn128::mul::ISTANBUL,
                bn128::pair::ISTANBUL,
                // EIP-152: Add BLAKE2 compression function `F` precompile.
                blake2::FUN,
            ]);
            Box::new(precompiles)
        })
    }

    /// Returns precompiles for Cancun spec.
    ///
    /// If the `c-kzg` feature is not enabled KZG Point Evaluation precompile fails
    /// with a fatal error instead of verifying proofs.
    pub fn cancun() -> &'static Self {
        static INSTANCE: OnceBox<Precompiles> = OnceBox::new();
        INSTANCE.get_or_init(|| {
            let mut precompiles = Self::istanbul().clone();

            // EIP-4844: Shard Blob Transactions
            cfg_if! {
                if #[cfg(feature = "c-kzg")] {
                    let precompile = kzg_point_evaluation::POINT_EVALUATION.clone();
                } else {
                    let precompile = PrecompileWithAddress(u64_to_address(0x0A), |_, _| {
                        Err(PrecompileError::Fatal("c-kzg feature is not enabled".into()))
                    });
                }
            }

            precompiles.extend([precompile]);

            Box::new(precompiles)
        })
    }

    /// Returns the precompiles for the latest spec.
    pub fn latest() -> &'static Self {
        Self::cancun()
    }

    /// Returns an iterator over the precompiles addresses.
    #[inline]
    pub fn addresses(&self) -> impl ExactSizeIterator<Item = &Address> {
        self.inner.keys()
    }

    /// Consumes the type and returns all precompile addresses.
    #[inline]
    pub fn into_addresses(self) -> impl ExactSizeIterator<Item = Address> {
        self.inner.into_keys()
    }

    /// Is the given address a precompile.
    #[inline]
    pub fn contains(&self, address: &Address) -> bool {
        self.inner.contains_key(address)
    }

    /// Returns the precompile for the given address.
    #[inline]
    pub fn get(&self, address: &Address) -> Option<&PrecompileFn> {
        self.inner.get(address)
    }

    /// Returns the precompile for the given address.
    #[inline]
    pub fn get_mut(&mut self, address: &Address) -> Option<&mut PrecompileFn> {
        self.inner.get_mut(address)
    }

    /// Runs the precompile at the given address.
    ///
    /// Returns `None` if no precompile is registered at `address`. The caller
    /// decides how to account gas for `Err(PrecompileError::OutOfGas)`.
    #[inline]
    pub fn call(
        &self,
        address: &Address,
        input: &[u8],
        gas_limit: u64,
    ) -> Option<PrecompileResult> {
        let precompile = self.inner.get(address)?;
        Some(precompile(input, gas_limit))
    }

    /// Is the precompiles list empty.
    pub fn is_empty(&self) -> bool {
        self.inner.len() == 0
    }

    /// Returns the number of precompiles.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns the precompiles addresses as a set.
    pub fn addresses_set(&self) -> &HashSet<Address> {
        &self.addresses
    }

    /// Extends the precompiles with the given precompiles.
    ///
    /// Other precompiles with overwrite existing precompiles.
    #[inline]
    pub fn extend(&mut self, other: impl IntoIterator<Item = PrecompileWithAddress>) {
        let items: Vec<PrecompileWithAddress> = other.into_iter().collect::<Vec<_>>();
        self.addresses.extend(items.iter().map(|p| *p.address()));
        self.inner.extend(items.into_iter().map(|p| (p.0, p.1)));
    }

    /// Returns complement of `other` in `self`.
    ///
    /// Two entries are considered equal if the precompile addresses are equal.
    pub fn difference(&self, other: &Self) -> Self {
        let Self { inner, .. } = self;

        let inner = inner
            .iter()
            .filter(|(a, _)| !other.inner.contains_key(*a))
            .map(|(a, p)| (*a, *p))
            .collect::<HashMap<_, _>>();

        let addresses = inner.keys().cloned().collect::<HashSet<_>>();

        Self { inner, addresses }
    }

    /// Returns intersection of `self` and `other`.
    ///
    /// Two entries are considered equal if the precompile addresses are equal.
    pub fn intersection(&self, other: &Self) -> Self {
        let Self { inner, .. } = self;

        let inner = inner
            .iter()
            .filter(|(a, _)| other.inner.contains_key(*a))
            .map(|(a, p)| (*a, *p))
            .collect::<HashMap<_, _>>();

        let addresses = inner.keys().cloned().collect::<HashSet<_>>();

        Self { inner, addresses }
    }
}

/// Precompile function with its address.
#[derive(Clone, Debug)]
pub struct PrecompileWithAddress(pub Address, pub PrecompileFn);

impl From<(Address, PrecompileFn)> for PrecompileWithAddress {
    fn from(value: (Address, PrecompileFn)) -> Self {
        PrecompileWithAddress(value.0, value.1)
    }
}

impl From<PrecompileWithAddress> for (Address, PrecompileFn) {
    fn from(value: PrecompileWithAddress) -> Self {
        (value.0, value.1)
    }
}

impl PrecompileWithAddress {
    /// Returns reference of address.
    #[inline]
    pub fn address(&self) -> &Address {
        &self.0
    }

    /// Returns reference of precompile.
    #[inline]
    pub fn precompile(&self) -> &PrecompileFn {
        &self.1
    }
}

/// The spec tiers that change the precompile set.
///
/// Hardforks in between reuse the table of the last tier below them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum PrecompileSpecId {
    /// Frontier spec.
    FRONTIER,
    /// Byzantium spec.
    BYZANTIUM,
    /// Istanbul spec.
    ISTANBUL,
    /// Cancun spec.
    CANCUN,
}

impl From<SpecId> for PrecompileSpecId {
    fn from(spec_id: SpecId) -> Self {
        Self::from_spec_id(spec_id)
    }
}

impl PrecompileSpecId {
    /// Returns the appropriate precompile Spec for the primitive [SpecId].
    pub const fn from_spec_id(spec_id: primitives::hardfork::SpecId) -> Self {
        use primitives::hardfork::SpecId::*;
        match spec_id {
            FRONTIER | FRONTIER_THAWING | HOMESTEAD | DAO_FORK | TANGERINE | SPURIOUS_DRAGON => {
                Self::FRONTIER
            }
            BYZANTIUM | CONSTANTINOPLE | PETERSBURG => Self::BYZANTIUM,
            ISTANBUL | MUIR_GLACIER | BERLIN | LONDON | ARROW_GLACIER | GRAY_GLACIER | MERGE
            | SHANGHAI => Self::ISTANBUL,
            CANCUN | PRAGUE | OSAKA => Self::CANCUN,
        }
    }
}

/// Const function for making an address by concatenating the bytes from two given numbers.
///
/// Note that 32 + 128 = 160 = 20 bytes (the length of an address).
///
/// This function is used as a convenience for specifying the addresses of the various precompiles.
#[inline]
pub const fn u64_to_address(x: u64) -> Address {
    let x = x.to_be_bytes();
    Address::new([
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, x[0], x[1], x[2], x[3], x[4], x[5], x[6], x[7],
    ])
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_difference_precompile_sets() {
        let difference = Precompiles::istanbul().difference(Precompiles::byzantium());
        assert_eq!(difference.len(), 1);
        assert!(difference.contains(&u64_to_address(9)));
    }

    #[test]
    fn test_intersection_precompile_sets() {
        let intersection = Precompiles::frontier().intersection(Precompiles::byzantium());

        assert_eq!(intersection.len(), 4)
    }

    #[test]
    fn tier_membership_counts() {
        assert_eq!(Precompiles::frontier().len(), 4);
        assert_eq!(Precompiles::byzantium().len(), 8);
        assert_eq!(Precompiles::istanbul().len(), 9);
        assert_eq!(Precompiles::cancun().len(), 10);
    }

    #[test]
    fn addresses_set_matches_inner_keys() {
        let precompiles = Precompiles::latest();
        assert_eq!(precompiles.len(), precompiles.addresses_set().len());
        assert!(precompiles
            .addresses()
            .all(|address| precompiles.addresses_set().contains(address)));
    }

    #[test]
    fn call_unknown_address_is_none() {
        let precompiles = Precompiles::latest();
        assert!(precompiles
            .call(&u64_to_address(0x100), &[], u64::MAX)
            .is_none());
        assert!(precompiles.call(&Address::ZERO, &[], u64::MAX).is_none());
    }

    #[test]
    fn call_respects_fork_availability() {
        // Blake2 only exists from Istanbul on.
        let byzantium = Precompiles::new(PrecompileSpecId::BYZANTIUM);
        assert!(byzantium.call(&u64_to_address(9), &[], u64::MAX).is_none());

        let istanbul = Precompiles::new(PrecompileSpecId::ISTANBUL);
        assert!(istanbul.call(&u64_to_address(9), &[], u64::MAX).is_some());

        // Point evaluation only exists from Cancun on. Pre-Cancun the address is
        // not a precompile at all, it is not an error.
        assert!(istanbul.call(&u64_to_address(0xA), &[], u64::MAX).is_none());
        let cancun = Precompiles::new(PrecompileSpecId::CANCUN);
        assert!(cancun.call(&u64_to_address(0xA), &[], u64::MAX).is_some());
    }

    #[test]
    fn call_runs_the_handler() {
        let precompiles = Precompiles::new(PrecompileSpecId::FRONTIER);
        let out = precompiles
            .call(&u64_to_address(4), b"data", 100)
            .unwrap()
            .unwrap();
        assert_eq!(out.bytes[..], *b"data");
        assert_eq!(out.gas_used, 18);
    }

    #[test]
    fn bn128_gas_is_repriced_at_istanbul() {
        let address = u64_to_address(6);

        let byzantium = Precompiles::new(PrecompileSpecId::BYZANTIUM)
            .call(&address, &[], 40_000)
            .unwrap()
            .unwrap();
        assert_eq!(byzantium.gas_used, 500);

        let istanbul = Precompiles::new(PrecompileSpecId::ISTANBUL)
            .call(&address, &[], 40_000)
            .unwrap()
            .unwrap();
        assert_eq!(istanbul.gas_used, 150);
    }

    #[test]
    fn constructors_return_shared_instances() {
        let first: *const Precompiles = Precompiles::new(PrecompileSpecId::CANCUN);
        let second: *const Precompiles = Precompiles::new(PrecompileSpecId::CANCUN);
        assert_eq!(first, second);
    }

    #[test]
    fn spec_id_collapses_to_precompile_tiers() {
        for (spec_id, expected) in [
            (SpecId::FRONTIER, PrecompileSpecId::FRONTIER),
            (SpecId::SPURIOUS_DRAGON, PrecompileSpecId::FRONTIER),
            (SpecId::BYZANTIUM, PrecompileSpecId::BYZANTIUM),
            (SpecId::PETERSBURG, PrecompileSpecId::BYZANTIUM),
            (SpecId::ISTANBUL, PrecompileSpecId::ISTANBUL),
            (SpecId::BERLIN, PrecompileSpecId::ISTANBUL),
            (SpecId::SHANGHAI, PrecompileSpecId::ISTANBUL),
            (SpecId::CANCUN, PrecompileSpecId::CANCUN),
            (SpecId::PRAGUE, PrecompileSpecId::CANCUN),
            (SpecId::OSAKA, PrecompileSpecId::CANCUN),
        ] {
            assert_eq!(PrecompileSpecId::from_spec_id(spec_id), expected);
        }
    }
}
