//! Swap-path encoding for the autocompound call.
//!
//! The staking contract takes `swapData = abi.encode(uint8 dexType, bytes pathData)`:
//! - dexType 0: Uniswap V2, `pathData = abi.encode(address[] path)`
//! - dexType 1: Uniswap V3, `pathData` is the packed path
//!   `token(20) ++ fee(uint24, 3) ++ token(20) [++ fee ++ token ...]`
//!
//! The contract validates that the path starts at the reward token and ends
//! at METRO; this module only produces well-formed encodings.

use alloy::primitives::{Address, Bytes};
use alloy::sol_types::SolValue;
use thiserror::Error;

/// Which DEX family the encoded path targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DexKind {
    UniswapV2 = 0,
    UniswapV3 = 1,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SwapPathError {
    #[error("swap path needs at least two tokens")]
    TooShort,
    #[error("expected {expected} fees for {tokens} tokens, got {got}")]
    FeeCountMismatch {
        tokens: usize,
        expected: usize,
        got: usize,
    },
    #[error("fee {0} does not fit in uint24")]
    FeeOutOfRange(u32),
}

/// Encode a V2 swap path, e.g. `[USDC, METRO]` or `[USDC, WETH, METRO]`.
pub fn encode_v2(path: &[Address]) -> Result<Bytes, SwapPathError> {
    if path.len() < 2 {
        return Err(SwapPathError::TooShort);
    }
    let path_data = path.to_vec().abi_encode();
    Ok(wrap(DexKind::UniswapV2, path_data))
}

/// Encode a V3 packed path. `fees` must have exactly one entry per hop.
pub fn encode_v3(tokens: &[Address], fees: &[u32]) -> Result<Bytes, SwapPathError> {
    if tokens.len() < 2 {
        return Err(SwapPathError::TooShort);
    }
    if fees.len() != tokens.len() - 1 {
        return Err(SwapPathError::FeeCountMismatch {
            tokens: tokens.len(),
            expected: tokens.len() - 1,
            got: fees.len(),
        });
    }

    let mut packed = Vec::with_capacity(20 + fees.len() * 23);
    packed.extend_from_slice(tokens[0].as_slice());
    for (fee, token) in fees.iter().zip(&tokens[1..]) {
        if *fee > 0x00FF_FFFF {
            return Err(SwapPathError::FeeOutOfRange(*fee));
        }
        packed.extend_from_slice(&fee.to_be_bytes()[1..]);
        packed.extend_from_slice(token.as_slice());
    }
    Ok(wrap(DexKind::UniswapV3, packed))
}

fn wrap(dex: DexKind, path_data: Vec<u8>) -> Bytes {
    Bytes::from((dex as u8, Bytes::from(path_data)).abi_encode_params())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::U256;

    fn addr(b: u8) -> Address {
        Address::repeat_byte(b)
    }

    #[test]
    fn test_v2_rejects_single_token() {
        assert_eq!(encode_v2(&[addr(1)]).unwrap_err(), SwapPathError::TooShort);
    }

    #[test]
    fn test_v2_shape() {
        let data = encode_v2(&[addr(1), addr(2)]).unwrap();
        // (uint8, bytes): two head words, then the bytes tail holding the
        // encoded address array (offset + length + 2 elements).
        let (dex, path_data) = <(u8, Bytes)>::abi_decode_params(&data).unwrap();
        assert_eq!(dex, 0);
        let path = Vec::<Address>::abi_decode(&path_data).unwrap();
        assert_eq!(path, vec![addr(1), addr(2)]);
    }

    #[test]
    fn test_v3_packed_layout() {
        let data = encode_v3(&[addr(0xAA), addr(0xBB)], &[100]).unwrap();
        let (dex, path_data) = <(u8, Bytes)>::abi_decode_params(&data).unwrap();
        assert_eq!(dex, 1);
        // 20 + 3 + 20 bytes
        assert_eq!(path_data.len(), 43);
        assert_eq!(&path_data[..20], addr(0xAA).as_slice());
        assert_eq!(&path_data[20..23], &[0, 0, 100]);
        assert_eq!(&path_data[23..], addr(0xBB).as_slice());
    }

    #[test]
    fn test_v3_multi_hop() {
        let data = encode_v3(&[addr(1), addr(2), addr(3)], &[500, 3000]).unwrap();
        let (_, path_data) = <(u8, Bytes)>::abi_decode_params(&data).unwrap();
        assert_eq!(path_data.len(), 20 + 23 + 23);
    }

    #[test]
    fn test_v3_fee_count_mismatch() {
        let err = encode_v3(&[addr(1), addr(2)], &[]).unwrap_err();
        assert!(matches!(err, SwapPathError::FeeCountMismatch { .. }));
    }

    #[test]
    fn test_v3_fee_out_of_range() {
        let err = encode_v3(&[addr(1), addr(2)], &[0x0100_0000]).unwrap_err();
        assert_eq!(err, SwapPathError::FeeOutOfRange(0x0100_0000));
    }

    #[test]
    fn test_u256_sanity() {
        // Guards the repr cast used by wrap().
        assert_eq!(U256::from(DexKind::UniswapV3 as u8), U256::from(1));
    }
}
