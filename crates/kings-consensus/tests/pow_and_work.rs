use kings_consensus::{
    check_proof_of_work, decode_compact, encode_compact, get_block_proof, tip_is_better, ChainWork,
    PowError, Uint256,
};
use kings_core::{ChainParameters, Hash32};

fn params_from_json(document: &str) -> ChainParameters {
    ChainParameters::from_json(document).expect("valid parameters")
}

#[test]
fn hash_equal_to_limit_passes_and_one_above_fails() {
    let params = ChainParameters::mainnet();
    let limit = decode_compact(params.pow_limit_bits).value;

    check_proof_of_work(&limit.to_hash(), params.pow_limit_bits, &params).expect("hash == target");
    assert_eq!(
        check_proof_of_work(
            &limit.wrapping_add(Uint256::ONE).to_hash(),
            params.pow_limit_bits,
            &params
        ),
        Err(PowError::HashExceedsTarget)
    );
}

#[test]
fn hash_comparison_is_numeric_not_bytewise() {
    let params = ChainParameters::mainnet();
    let bits = 0x1c0f_fff0;
    let target = decode_compact(bits).value;

    // Low byte set: numerically tiny even though the first byte is large.
    let mut low = [0u8; 32];
    low[0] = 0xff;
    check_proof_of_work(&Hash32(low), bits, &params).expect("tiny hash");

    // High byte set: numerically huge.
    let mut high = [0u8; 32];
    high[31] = 0x01;
    assert!(Uint256::from_hash(&Hash32(high)) > target);
    assert_eq!(
        check_proof_of_work(&Hash32(high), bits, &params),
        Err(PowError::HashExceedsTarget)
    );
}

#[test]
fn bypass_comes_from_parameters() {
    let params = params_from_json(r#"{ "skip_pow_check": true }"#);
    check_proof_of_work(&Hash32::zero(), 0, &params).expect("bypass");

    let strict = params_from_json("{}");
    assert_eq!(
        check_proof_of_work(&Hash32::zero(), 0, &strict),
        Err(PowError::BelowMinimumWork)
    );
}

#[test]
fn block_proof_strictly_decreases_with_target() {
    let params = ChainParameters::mainnet();
    let one = encode_compact(&Uint256::ONE);
    let mid = encode_compact(&Uint256::pow2(200));
    assert_eq!(one, 0x0101_0000);
    assert_eq!(mid, 0x1a01_0000);

    let w_one = get_block_proof(one);
    let w_mid = get_block_proof(mid);
    let w_limit = get_block_proof(params.pow_limit_bits);
    assert!(w_one > w_mid);
    assert!(w_mid > w_limit);
    assert!(!w_limit.is_zero());
    // floor(2^256 / (2^200 + 1))
    assert_eq!(w_mid, Uint256::from_u64((1u64 << 56) - 1));
}

#[test]
fn heavier_chain_wins() {
    let easy: ChainWork = std::iter::repeat(0x1e0f_ffffu32).take(10).collect();
    let hard: ChainWork = std::iter::repeat(0x1c0f_fff0u32).take(2).collect();
    let h_low = Hash32([0u8; 32]);
    let h_high = Hash32([1u8; 32]);

    // More blocks do not beat more work.
    assert!(tip_is_better(&hard, &h_high, &easy, &h_low));
    assert!(tip_is_better(&easy, &h_low, &easy, &h_high));
}
