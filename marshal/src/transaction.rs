//! Transaction codec.
//!
//! The signable body ("digest") of a transaction:
//!
//! ```text
//! +----------------+------------------+----------------+-------+------------------------+
//! | timestamp (8)  | chain id (32)    | max fee (8)    | n (1) | n × (id (1) + struct)  |
//! +----------------+------------------+----------------+-------+------------------------+
//! ```
//!
//! All integers are big-endian. The timestamp is in milliseconds and is
//! floored to whole seconds before encoding. Actions carry no length
//! prefix; the decoder re-derives each span from the ABI.
//!
//! A signed transaction appends an auth trailer to the digest:
//!
//! ```text
//! +-------------+-----------------+----------------+
//! | auth id (1) | public key (32) | signature (64) |
//! +-------------+-----------------+----------------+
//! ```
//!
//! Signing itself is delegated to a [`TxSigner`].

use primitive_types::U256;
use tracing::debug;

use crate::codec::{numeric, take};
use crate::engine::Marshaler;
use crate::error::{CodecError, Result};
use crate::types::{
    ActionData, AuthTrailer, ED25519_AUTH_ID, NumberKind, PUBLIC_KEY_LEN, SIGNATURE_LEN,
    SignedTransaction, TransactionBase, TransactionPayload, TypeCategory, TypeDescriptor, Value,
};

/// Producer of Ed25519 signatures over transaction digests.
///
/// Implemented by the caller's key management; the marshaler never holds
/// private keys.
pub trait TxSigner {
    fn public_key(&self) -> [u8; PUBLIC_KEY_LEN];
    fn sign(&self, digest: &[u8]) -> [u8; SIGNATURE_LEN];
}

/// Floors a millisecond timestamp to whole seconds.
pub fn floor_timestamp(timestamp_ms: u64) -> u64 {
    timestamp_ms - timestamp_ms % 1000
}

impl Marshaler {
    /// Encodes the signable body of `tx`.
    pub fn encode_transaction(&self, tx: &TransactionPayload) -> Result<Vec<u8>> {
        let count = u8::try_from(tx.actions.len())
            .map_err(|_| CodecError::TooManyActions(tx.actions.len()))?;

        let mut out = Vec::with_capacity(8 + 32 + 8 + 1);
        out.extend_from_slice(&floor_timestamp(tx.base.timestamp).to_be_bytes());
        out.extend(numeric::encode_number(
            NumberKind::U256,
            &Value::Uint(tx.base.chain_id),
        )?);
        out.extend_from_slice(&tx.base.max_fee.to_be_bytes());
        out.push(count);

        for action in &tx.actions {
            out.push(self.action_type_id(&action.action_name)?);
            let ty = TypeDescriptor::named(&action.action_name);
            out.extend(self.encode_field(&ty, &action.data)?);
        }

        debug!(actions = count, digest_len = out.len(), "encoded transaction");
        Ok(out)
    }

    /// Decodes a transaction body from the start of `bytes`.
    ///
    /// Returns the payload and the number of bytes consumed, which is the
    /// digest length when `bytes` is a signed transaction.
    pub fn decode_transaction(&self, bytes: &[u8]) -> Result<(TransactionPayload, usize)> {
        let timestamp = read_u64(bytes)?;
        let chain_id = U256::from_big_endian(take(&bytes[8..], 32)?);
        let max_fee = read_u64(&bytes[40..])?;
        let count = take(&bytes[48..], 1)?[0];

        let mut offset = 49;
        let mut actions = Vec::with_capacity(usize::from(count));
        for _ in 0..count {
            let (typed, data, consumed) =
                self.parse_tagged(&bytes[offset..], TypeCategory::Action)?;
            actions.push(ActionData::new(typed.name.clone(), data));
            offset += consumed;
        }

        debug!(actions = count, digest_len = offset, "decoded transaction");
        let payload = TransactionPayload {
            base: TransactionBase {
                timestamp,
                chain_id,
                max_fee,
            },
            actions,
        };
        Ok((payload, offset))
    }

    /// Encodes `tx` and appends the auth trailer produced by `signer`.
    pub fn sign_transaction(
        &self,
        tx: &TransactionPayload,
        signer: &impl TxSigner,
    ) -> Result<Vec<u8>> {
        let digest = self.encode_transaction(tx)?;
        let signature = signer.sign(&digest);

        let mut out = digest;
        out.reserve(1 + PUBLIC_KEY_LEN + SIGNATURE_LEN);
        out.push(ED25519_AUTH_ID);
        out.extend_from_slice(&signer.public_key());
        out.extend_from_slice(&signature);
        Ok(out)
    }

    /// Decodes a digest followed by its auth trailer.
    ///
    /// The trailer must end exactly at the end of `bytes`. The signature is
    /// returned as-is; verifying it is the caller's business.
    pub fn decode_signed_transaction(&self, bytes: &[u8]) -> Result<SignedTransaction> {
        let (payload, digest_len) = self.decode_transaction(bytes)?;
        let rest = &bytes[digest_len..];

        let auth_id = take(rest, 1)?[0];
        if auth_id != ED25519_AUTH_ID {
            return Err(CodecError::UnsupportedAuthScheme(auth_id).into());
        }
        let expected = 1 + PUBLIC_KEY_LEN + SIGNATURE_LEN;
        if rest.len() != expected {
            return Err(CodecError::TrailingOrMissingBytes {
                consumed: digest_len + expected,
                len: bytes.len(),
            }
            .into());
        }

        let mut public_key = [0u8; PUBLIC_KEY_LEN];
        public_key.copy_from_slice(&rest[1..1 + PUBLIC_KEY_LEN]);
        let mut signature = [0u8; SIGNATURE_LEN];
        signature.copy_from_slice(&rest[1 + PUBLIC_KEY_LEN..]);

        Ok(SignedTransaction {
            payload,
            digest_len,
            auth: AuthTrailer {
                auth_id,
                public_key,
                signature,
            },
        })
    }
}

fn read_u64(bytes: &[u8]) -> std::result::Result<u64, CodecError> {
    let raw = take(bytes, 8)?;
    let mut buf = [0u8; 8];
    buf.copy_from_slice(raw);
    Ok(u64::from_be_bytes(buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MarshalError, SchemaError};
    use crate::types::{Abi, Fields};
    use serde_json::json;

    const TEST_ADDRESS: &str =
        "0x0102030405060708090a0b0c0d0e0f10111213140000000000000000000000000020db0e6c";
    const CHAIN_ID: &str =
        "95632850705676588962230523364794060760548920101893345343436308617602133954596";
    const EMPTY_DIGEST: &str = concat!(
        "0000018fcbcdeef0",
        "d36e467c73e2840140cc41b3d72f8a5a7446b2399c39b9c74d4cf077d2509024",
        "00000002540be400",
        "00"
    );

    /// Deterministic signer that echoes a fixed key and a digest-derived
    /// signature.
    struct DummySigner;

    impl TxSigner for DummySigner {
        fn public_key(&self) -> [u8; PUBLIC_KEY_LEN] {
            [7; PUBLIC_KEY_LEN]
        }

        fn sign(&self, digest: &[u8]) -> [u8; SIGNATURE_LEN] {
            [digest.len() as u8; SIGNATURE_LEN]
        }
    }

    fn dummy_marshaler() -> Marshaler {
        let abi = Abi::from_json(json!({
            "actions": [{"id": 0, "name": "Transfer"}, {"id": 3, "name": "Ping"}],
            "outputs": [],
            "types": [
                {"name": "Transfer", "fields": [
                    {"name": "to", "type": "Address"},
                    {"name": "value", "type": "uint64"},
                    {"name": "memo", "type": "[]uint8"}
                ]},
                {"name": "Ping", "fields": []}
            ]
        }))
        .expect("well-formed abi");
        Marshaler::new(abi).expect("valid abi")
    }

    fn dummy_payload(actions: Vec<ActionData>) -> TransactionPayload {
        TransactionPayload {
            base: TransactionBase {
                timestamp: 1_717_111_222_000,
                chain_id: U256::from_dec_str(CHAIN_ID).expect("valid chain id"),
                max_fee: 10_000_000_000,
            },
            actions,
        }
    }

    fn dummy_transfer() -> ActionData {
        ActionData::new(
            "Transfer",
            Fields::new()
                .with("to", TEST_ADDRESS)
                .with("value", 1000u64)
                .with("memo", "aGk="),
        )
    }

    #[test]
    fn empty_transaction_digest_is_pinned() {
        let m = dummy_marshaler();
        let digest = m.encode_transaction(&dummy_payload(vec![])).expect("encodable");
        assert_eq!(hex::encode(&digest), EMPTY_DIGEST);
    }

    #[test]
    fn one_action_extends_the_empty_prefix() {
        let m = dummy_marshaler();
        let digest = m
            .encode_transaction(&dummy_payload(vec![dummy_transfer()]))
            .expect("encodable");
        let hex = hex::encode(&digest);

        assert_eq!(&hex[..EMPTY_DIGEST.len() - 2], &EMPTY_DIGEST[..EMPTY_DIGEST.len() - 2]);
        assert_eq!(
            &hex[EMPTY_DIGEST.len() - 2..],
            concat!(
                "01",
                "00",
                "0102030405060708090a0b0c0d0e0f101112131400000000000000000000000000",
                "00000000000003e8",
                "000000026869"
            )
        );
    }

    #[test]
    fn sub_second_timestamps_are_floored() {
        let m = dummy_marshaler();
        let mut tx = dummy_payload(vec![]);
        tx.base.timestamp = 1_717_111_222_999;
        let digest = m.encode_transaction(&tx).expect("encodable");
        assert_eq!(hex::encode(&digest), EMPTY_DIGEST);
        assert_eq!(floor_timestamp(999), 0);
        assert_eq!(floor_timestamp(1000), 1000);
    }

    #[test]
    fn transaction_roundtrips_with_several_actions() {
        let m = dummy_marshaler();
        let tx = dummy_payload(vec![
            dummy_transfer(),
            ActionData::new("Ping", Fields::new()),
            dummy_transfer(),
        ]);
        let digest = m.encode_transaction(&tx).expect("encodable");

        let (decoded, consumed) = m.decode_transaction(&digest).expect("decodable");
        assert_eq!(decoded, tx);
        assert_eq!(consumed, digest.len());
        assert_eq!(decoded.to_json()["base"]["chainId"], json!(CHAIN_ID));
    }

    #[test]
    fn unknown_action_and_too_many_actions_fail() {
        let m = dummy_marshaler();
        let tx = dummy_payload(vec![ActionData::new("Burn", Fields::new())]);
        assert!(matches!(
            m.encode_transaction(&tx),
            Err(MarshalError::Schema(SchemaError::UnknownAction(ref name))) if name == "Burn"
        ));

        let tx = dummy_payload(vec![ActionData::new("Ping", Fields::new()); 256]);
        assert!(matches!(
            m.encode_transaction(&tx),
            Err(MarshalError::Codec(CodecError::TooManyActions(256)))
        ));
        let tx = dummy_payload(vec![ActionData::new("Ping", Fields::new()); 255]);
        assert!(m.encode_transaction(&tx).is_ok());
    }

    #[test]
    fn truncated_digest_is_out_of_bounds() {
        let m = dummy_marshaler();
        let digest = m
            .encode_transaction(&dummy_payload(vec![dummy_transfer()]))
            .expect("encodable");
        for cut in [0, 7, 20, 45, 48, 49, digest.len() - 1] {
            assert!(
                matches!(
                    m.decode_transaction(&digest[..cut]),
                    Err(MarshalError::Codec(CodecError::OutOfBounds { .. }))
                ),
                "cut at {cut}"
            );
        }
    }

    #[test]
    fn signed_transaction_carries_the_trailer() {
        let m = dummy_marshaler();
        let tx = dummy_payload(vec![dummy_transfer()]);
        let digest = m.encode_transaction(&tx).expect("encodable");
        let signed = m.sign_transaction(&tx, &DummySigner).expect("signable");

        assert_eq!(&signed[..digest.len()], &digest[..]);
        assert_eq!(signed.len(), digest.len() + 1 + PUBLIC_KEY_LEN + SIGNATURE_LEN);
        assert_eq!(signed[digest.len()], ED25519_AUTH_ID);

        let decoded = m.decode_signed_transaction(&signed).expect("decodable");
        assert_eq!(decoded.payload, tx);
        assert_eq!(decoded.digest_len, digest.len());
        assert_eq!(decoded.auth.public_key, [7; PUBLIC_KEY_LEN]);
        assert_eq!(decoded.auth.signature, [digest.len() as u8; SIGNATURE_LEN]);
    }

    #[test]
    fn signed_transaction_rejects_bad_trailers() {
        let m = dummy_marshaler();
        let tx = dummy_payload(vec![]);
        let signed = m.sign_transaction(&tx, &DummySigner).expect("signable");
        let digest_len = EMPTY_DIGEST.len() / 2;

        let mut wrong_scheme = signed.clone();
        wrong_scheme[digest_len] = 0x01;
        assert!(matches!(
            m.decode_signed_transaction(&wrong_scheme),
            Err(MarshalError::Codec(CodecError::UnsupportedAuthScheme(1)))
        ));

        let mut long = signed.clone();
        long.push(0);
        assert!(matches!(
            m.decode_signed_transaction(&long),
            Err(MarshalError::Codec(CodecError::TrailingOrMissingBytes { .. }))
        ));

        assert!(matches!(
            m.decode_signed_transaction(&signed[..signed.len() - 1]),
            Err(MarshalError::Codec(CodecError::TrailingOrMissingBytes { .. }))
        ));
        assert!(matches!(
            m.decode_signed_transaction(&signed[..digest_len]),
            Err(MarshalError::Codec(CodecError::OutOfBounds { .. }))
        ));
    }
}
