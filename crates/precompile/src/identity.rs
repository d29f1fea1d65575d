//! Identity precompile returns its input, more details in [`identity_run`]
use super::calc_linear_cost_u32;
use crate::{PrecompileError, PrecompileOutput, PrecompileResult, PrecompileWithAddress};

/// Identity precompile
pub const FUN: PrecompileWithAddress =
    PrecompileWithAddress(crate::u64_to_address(4), identity_run);

/// The base cost of the operation
pub const IDENTITY_BASE: u64 = 15;
/// The cost per word
pub const IDENTITY_PER_WORD: u64 = 3;

/// Takes the input bytes, copies them, and returns it as the output.
///
/// See: <https://ethereum.github.io/yellowpaper/paper.pdf>
/// See: <https://etherscan.io/address/0000000000000000000000000000000000000004>
pub fn identity_run(input: &[u8], gas_limit: u64) -> PrecompileResult {
    let gas_used = calc_linear_cost_u32(input.len(), IDENTITY_BASE, IDENTITY_PER_WORD);
    if gas_used > gas_limit {
        return Err(PrecompileError::OutOfGas);
    }
    Ok(PrecompileOutput::new(gas_used, input.to_vec().into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_returns_input() {
        let out = identity_run(b"hello", 100).unwrap();
        assert_eq!(out.bytes[..], *b"hello");
        assert_eq!(out.gas_used, 18);
    }

    #[test]
    fn identity_empty_input_costs_base() {
        let out = identity_run(&[], 15).unwrap();
        assert!(out.bytes.is_empty());
        assert_eq!(out.gas_used, IDENTITY_BASE);
    }

    #[test]
    fn identity_out_of_gas() {
        assert!(matches!(
            identity_run(b"hello", 17),
            Err(PrecompileError::OutOfGas)
        ));
    }
}
