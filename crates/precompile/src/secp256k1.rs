//! `ecrecover` precompile.
//!
//! Depending on enabled features, it will use different implementations of `ecrecover`.
//! * [`secp256k1`](https://crates.io/crates/secp256k1) - uses the C implementation of secp256k1
//!   from bitcoin core. It is faster than `k256` and enabled by default.
//! * [`k256`](https://crates.io/crates/k256) - maintained pure rust lib, perfect for no_std
//!   environments. Used when the `secp256k1` feature is disabled.
//!
//! Input format:
//! [32 bytes for hash][32 bytes for v][32 bytes for r][32 bytes for s]
//!
//! Output format:
//! [32 bytes for the recovered address, left-padded]
//!
//! Inputs that do not recover to a key (bad `v`, invalid signature) are not errors. The
//! precompile succeeds with a zero word as output and the flat gas charged.

use crate::{
    utilities::right_pad, PrecompileError, PrecompileOutput, PrecompileResult,
    PrecompileWithAddress,
};
use primitives::{alloy_primitives::B512, B256};

cfg_if::cfg_if! {
    if #[cfg(feature = "secp256k1")] {
        mod bitcoin_secp256k1;
        pub use bitcoin_secp256k1::ecrecover;
    } else {
        mod k256;
        pub use self::k256::ecrecover;
    }
}

/// `ecrecover` precompile, containing address and function to run.
pub const ECRECOVER: PrecompileWithAddress =
    PrecompileWithAddress(crate::u64_to_address(1), ec_recover_run);

/// `ecrecover` precompile function. Read more about input and output format in [this module docs](self).
pub fn ec_recover_run(input: &[u8], gas_limit: u64) -> PrecompileResult {
    const ECRECOVER_BASE: u64 = 3_000;

    if ECRECOVER_BASE > gas_limit {
        return Err(PrecompileError::OutOfGas);
    }

    let input = right_pad::<128>(input);

    // `v` must be a 32-byte big-endian integer equal to 27 or 28.
    let mut output = B256::ZERO;
    if input[32..63].iter().all(|&b| b == 0) && matches!(input[63], 27 | 28) {
        let msg = <&B256>::try_from(&input[0..32]).unwrap();
        let recid = input[63] - 27;
        let sig = <&B512>::try_from(&input[64..128]).unwrap();

        // A signature that does not recover yields the zero word, not an error.
        if let Ok(address_hash) = ecrecover(sig, recid, msg) {
            output = address_hash;
        }
    }

    Ok(PrecompileOutput::new(ECRECOVER_BASE, output.to_vec().into()))
}
