//! Modexp precompile, arbitrary-precision `base^exponent % modulus`.
//! More details in [`modexp_run`]
use crate::{
    utilities::{left_pad, left_pad_vec, right_pad_vec, right_pad_with_offset},
    PrecompileError, PrecompileOutput, PrecompileResult, PrecompileWithAddress,
};
use aurora_engine_modexp::modexp;
use core::cmp::{max, min};
use primitives::{Bytes, U256};

/// Modexp precompile
pub const FUN: PrecompileWithAddress = PrecompileWithAddress(crate::u64_to_address(5), modexp_run);

/// The minimum gas cost of a modexp call since [EIP-2565](https://eips.ethereum.org/EIPS/eip-2565).
pub const MIN_GAS: u64 = 200;

/// The size of the modexp header in bytes.
const HEADER_LENGTH: usize = 96;

/// Computes `base^exponent % modulus` over arbitrarily long words.
///
/// The input format is:
/// `<length_of_BASE> <length_of_EXPONENT> <length_of_MODULUS> <BASE> <EXPONENT> <MODULUS>`
/// where each length is a 32-byte big-endian integer counting the bytes of the value that
/// follows. Missing input bytes read as zero, and the output is the result left-padded to
/// the modulus length.
///
/// Malformed lengths are never an error on their own. Lengths that do not fit the platform
/// word out-price any 64-bit gas limit, so they surface as [`PrecompileError::OutOfGas`].
///
/// See: <https://eips.ethereum.org/EIPS/eip-198>
/// See: <https://eips.ethereum.org/EIPS/eip-2565>
pub fn modexp_run(input: &[u8], gas_limit: u64) -> PrecompileResult {
    if MIN_GAS > gas_limit {
        return Err(PrecompileError::OutOfGas);
    }

    // Extract the header.
    let base_len = U256::from_be_bytes(right_pad_with_offset::<32>(input, 0).into_owned());
    let exp_len = U256::from_be_bytes(right_pad_with_offset::<32>(input, 32).into_owned());
    let mod_len = U256::from_be_bytes(right_pad_with_offset::<32>(input, 64).into_owned());

    // Cast base and modulus to usize, it does not make sense to handle larger values.
    let Ok(base_len) = usize::try_from(base_len) else {
        return Err(PrecompileError::OutOfGas);
    };
    let Ok(mod_len) = usize::try_from(mod_len) else {
        return Err(PrecompileError::OutOfGas);
    };

    // Handle a special case when both the base and mod length are zero.
    if base_len == 0 && mod_len == 0 {
        return Ok(PrecompileOutput::new(MIN_GAS, Bytes::new()));
    }

    // Cast exponent length to usize, it does not make sense to handle larger values.
    let Ok(exp_len) = usize::try_from(exp_len) else {
        return Err(PrecompileError::OutOfGas);
    };

    // Used to extract ADJUSTED_EXPONENT_LENGTH.
    let exp_highp_len = min(exp_len, 32);

    // Throw away the header data as we already extracted lengths.
    let input = input.get(HEADER_LENGTH..).unwrap_or_default();

    let exp_highp = {
        // Get right padded bytes so if data.len is less than exp_len we will get right padded zeroes.
        let right_padded_highp = right_pad_with_offset::<32>(input, base_len);
        // If exp_len is less than 32 bytes get only exp_len bytes and do left padding.
        let out = left_pad::<32>(&right_padded_highp[..exp_highp_len]);
        U256::from_be_bytes(out.into_owned())
    };

    // Check if we have enough gas.
    let gas_cost = gas_calc(base_len as u64, exp_len as u64, mod_len as u64, &exp_highp);
    if gas_cost > gas_limit {
        return Err(PrecompileError::OutOfGas);
    }

    // Padding is needed if the input does not contain all 3 values.
    let input_len = base_len.saturating_add(exp_len).saturating_add(mod_len);
    let input = right_pad_vec(input, input_len);
    let (base, input) = input.split_at(base_len);
    let (exponent, modulus) = input.split_at(exp_len);
    debug_assert_eq!(modulus.len(), mod_len);

    let output = modexp(base, exponent, modulus);

    // Left pad the result to modulus length. The output is always shorter or equal.
    Ok(PrecompileOutput::new(
        gas_cost,
        left_pad_vec(&output, mod_len).into_owned().into(),
    ))
}

/// Calculate the gas cost for the modexp precompile per [EIP-2565](https://eips.ethereum.org/EIPS/eip-2565).
pub fn gas_calc(base_length: u64, exp_length: u64, mod_length: u64, exp_highp: &U256) -> u64 {
    let multiplication_complexity = calculate_multiplication_complexity(base_length, mod_length);
    let iteration_count = calculate_iteration_count(exp_length, exp_highp);
    let gas = (multiplication_complexity * U256::from(iteration_count)) / U256::from(3);
    if gas.bit_len() > 64 {
        u64::MAX
    } else {
        max(MIN_GAS, gas.as_limbs()[0])
    }
}

/// Calculate the multiplication complexity of the modexp as 8-byte words squared.
fn calculate_multiplication_complexity(base_length: u64, mod_length: u64) -> U256 {
    let max_length = max(base_length, mod_length);
    let mut words = max_length / 8;
    if max_length % 8 > 0 {
        words += 1;
    }
    let words = U256::from(words);
    words * words
}

/// Calculate the iteration count of the modexp from the exponent length and its
/// leading 32 bytes.
fn calculate_iteration_count(exp_length: u64, exp_highp: &U256) -> u64 {
    let mut iteration_count: u64 = 0;

    if exp_length <= 32 && *exp_highp == U256::ZERO {
        iteration_count = 0;
    } else if exp_length <= 32 {
        iteration_count = exp_highp.bit_len() as u64 - 1;
    } else if exp_length > 32 {
        iteration_count = (8u64.saturating_mul(exp_length - 32))
            .saturating_add(max(1, exp_highp.bit_len() as u64) - 1);
    }

    max(iteration_count, 1)
}
