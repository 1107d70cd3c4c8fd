// SPDX-License-Identifier: AGPL-3.0-or-later

//! Nonce generation and wallet-signature verification.
//!
//! The challenge is a fixed template embedding the issued nonce. Wallets sign
//! it with EIP-191 personal-sign; verification recovers the signer address
//! from the signature and compares it to the claimed address. `Address`
//! comparison is byte-wise, so hex casing of the claimed address never
//! matters once parsed.

use std::str::FromStr;

use alloy::primitives::{Address, Signature};
use rand::Rng;

use super::AuthError;

/// Fixed prefix of the signed challenge message.
pub const CHALLENGE_PREFIX: &str = "Sign this message to authenticate: ";

/// Upper bound (exclusive) for generated nonces.
const NONCE_RANGE: u32 = 1_000_000;

/// Generate a fresh nonce: the decimal rendering of a uniform random
/// integer below one million.
pub fn generate_nonce() -> String {
    rand::thread_rng().gen_range(0..NONCE_RANGE).to_string()
}

/// Build the exact challenge message for a nonce.
pub fn challenge_message(nonce: &str) -> String {
    format!("{CHALLENGE_PREFIX}{nonce}")
}

/// Cheap plausibility check for an EVM address: `0x` + 40 hex characters.
pub fn is_plausible_address(address: &str) -> bool {
    let Some(hex) = address.strip_prefix("0x") else {
        return false;
    };
    hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit())
}

/// Verify that `signature` is a valid personal-sign signature over the
/// challenge for `nonce`, produced by the key behind `claimed_address`.
///
/// Malformed signatures and recovery mismatches are both reported as
/// [`AuthError::InvalidSignature`]; the caller leaves the nonce in place so
/// the client may retry against the same challenge.
pub fn verify_wallet_signature(
    claimed_address: &str,
    nonce: &str,
    signature: &str,
) -> Result<(), AuthError> {
    let claimed =
        Address::from_str(claimed_address).map_err(|_| AuthError::InvalidSignature)?;

    let signature = Signature::from_str(signature).map_err(|_| AuthError::InvalidSignature)?;

    let message = challenge_message(nonce);
    let recovered = signature
        .recover_address_from_msg(message.as_bytes())
        .map_err(|_| AuthError::InvalidSignature)?;

    if recovered != claimed {
        return Err(AuthError::InvalidSignature);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::signers::{local::PrivateKeySigner, SignerSync};

    fn sig_hex(signature: &Signature) -> String {
        format!("0x{}", alloy::hex::encode(signature.as_bytes()))
    }

    #[test]
    fn nonces_are_numeric_and_vary() {
        let first = generate_nonce();
        assert!(first.parse::<u32>().unwrap() < NONCE_RANGE);

        // One collision in a row of draws is vanishingly unlikely across
        // twenty attempts.
        let distinct = (0..20).map(|_| generate_nonce()).any(|n| n != first);
        assert!(distinct);
    }

    #[test]
    fn challenge_embeds_nonce_verbatim() {
        assert_eq!(
            challenge_message("424242"),
            "Sign this message to authenticate: 424242"
        );
    }

    #[test]
    fn plausible_address_checks_shape() {
        assert!(is_plausible_address(
            "0x742d35Cc6634C0532925a3b844Bc9e7595f4aB12"
        ));
        assert!(!is_plausible_address("742d35Cc6634C0532925a3b844Bc9e7595f4aB12"));
        assert!(!is_plausible_address("0x742d35"));
        assert!(!is_plausible_address("0xZZZd35Cc6634C0532925a3b844Bc9e7595f4aB12"));
    }

    #[test]
    fn valid_signature_verifies() {
        let signer = PrivateKeySigner::random();
        let nonce = "123456";
        let signature = signer
            .sign_message_sync(challenge_message(nonce).as_bytes())
            .unwrap();

        let address = signer.address().to_string();
        verify_wallet_signature(&address, nonce, &sig_hex(&signature))
            .expect("signature from the claimed key verifies");
    }

    #[test]
    fn claimed_address_case_is_ignored() {
        let signer = PrivateKeySigner::random();
        let nonce = "7";
        let signature = signer
            .sign_message_sync(challenge_message(nonce).as_bytes())
            .unwrap();

        let lowered = signer.address().to_string().to_lowercase();
        verify_wallet_signature(&lowered, nonce, &sig_hex(&signature))
            .expect("lower-cased claimed address still matches");
    }

    #[test]
    fn signature_over_wrong_nonce_is_rejected() {
        let signer = PrivateKeySigner::random();
        let signature = signer
            .sign_message_sync(challenge_message("111").as_bytes())
            .unwrap();

        let err = verify_wallet_signature(
            &signer.address().to_string(),
            "222",
            &sig_hex(&signature),
        )
        .unwrap_err();
        assert!(matches!(err, AuthError::InvalidSignature));
    }

    #[test]
    fn signature_from_other_key_is_rejected() {
        let signer = PrivateKeySigner::random();
        let other = PrivateKeySigner::random();
        let nonce = "987654";
        let signature = other
            .sign_message_sync(challenge_message(nonce).as_bytes())
            .unwrap();

        let err = verify_wallet_signature(
            &signer.address().to_string(),
            nonce,
            &sig_hex(&signature),
        )
        .unwrap_err();
        assert!(matches!(err, AuthError::InvalidSignature));
    }

    #[test]
    fn garbage_signature_is_rejected() {
        let err = verify_wallet_signature(
            "0x742d35Cc6634C0532925a3b844Bc9e7595f4aB12",
            "1",
            "0xnot-a-signature",
        )
        .unwrap_err();
        assert!(matches!(err, AuthError::InvalidSignature));
    }
}
