//! Canonical CBOR encoding of the transaction model.
//!
//! Every impl here is written by hand against `minicbor`'s encoder and
//! decoder rather than derived, so the wire layout is visible in one place
//! and pinned by golden vectors in the tests.
//!
//! ```text
//! Transaction   = [ body, witness_set, null ]
//! body          = { 0: [* input], 1: [* output], 2: fee, 3: ttl }
//! input         = [ bytes .size 32, uint ]
//! output        = [ bytes, uint ]
//! witness_set   = {} / { 0: [+ vkey_witness] }
//! vkey_witness  = [ bytes .size 32, bytes .size 64 ]
//! ```
//!
//! Integers use the shortest head, containers are definite-length, and body
//! keys are written in ascending order. The body encoding doubles as the
//! preimage of the transaction ID.
//!
//! Decoding is strict: anything this version cannot represent is rejected as
//! [`TransactionError::MalformedEncoding`] rather than dropped, and no input,
//! however mangled, makes the decoder panic.

use minicbor::data::Type;
use minicbor::{decode as de, encode as en, Decode, Decoder, Encode, Encoder};

use super::error::TransactionError;
use super::types::{
    Certificate, Metadata, Transaction, TransactionBody, TransactionId, TransactionInput,
    TransactionOutput, VKeyWitness, WitnessSet,
};
use crate::config::{
    BODY_KEY_CERTIFICATES, BODY_KEY_FEE, BODY_KEY_INPUTS, BODY_KEY_METADATA_HASH,
    BODY_KEY_OUTPUTS, BODY_KEY_TTL, BODY_KEY_UPDATE, BODY_KEY_WITHDRAWALS, WITNESS_KEY_VKEYS,
};
use crate::crypto::{blake2b_256, PublicKey, Signature};

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Encode any model value to its canonical bytes.
pub fn encode<T: Encode<()>>(value: &T) -> Vec<u8> {
    // Writes into a Vec cannot fail, and none of the impls below emit
    // custom errors.
    minicbor::to_vec(value).expect("encoding into a Vec<u8> is infallible")
}

/// Decode a model value, requiring the input to hold exactly one item in
/// its canonical encoding.
///
/// Bytes that decode but would re-encode differently (keys out of order,
/// over-long integer heads, an explicit empty certificate list) are
/// rejected: the ID is computed from the re-encoded body, so accepting them
/// would report an ID the received body does not hash to.
pub fn decode<'b, T>(bytes: &'b [u8]) -> Result<T, TransactionError>
where
    T: Decode<'b, ()> + Encode<()>,
{
    let mut decoder = Decoder::new(bytes);
    let value = T::decode(&mut decoder, &mut ())?;
    let consumed = decoder.position();
    if consumed != bytes.len() {
        return Err(TransactionError::malformed(format!(
            "{} trailing byte(s) after offset {consumed}",
            bytes.len() - consumed
        )));
    }
    if encode(&value) != bytes {
        return Err(TransactionError::malformed("non-canonical encoding"));
    }
    Ok(value)
}

/// Parse the hex interchange form of a signed transaction.
pub fn decode_transaction(hex_str: &str) -> Result<Transaction, TransactionError> {
    Transaction::from_hex(hex_str)
}

/// Render a transaction in the hex interchange form.
pub fn encode_transaction(tx: &Transaction) -> String {
    tx.to_hex()
}

impl TransactionBody {
    /// Canonical encoding; also the hashing preimage of the ID.
    pub fn to_bytes(&self) -> Vec<u8> {
        encode(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        decode(bytes)
    }

    /// BLAKE2b-256 of [`TransactionBody::to_bytes`].
    pub fn id(&self) -> TransactionId {
        TransactionId::from_bytes(blake2b_256(&self.to_bytes()))
    }
}

impl Transaction {
    pub fn to_bytes(&self) -> Vec<u8> {
        encode(self)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        decode(bytes)
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, TransactionError> {
        let bytes = hex::decode(hex_str.trim())?;
        Self::from_bytes(&bytes)
    }

    /// The ID of the body. Witnesses and metadata never contribute to it.
    pub fn id(&self) -> TransactionId {
        self.body.id()
    }
}

// ---------------------------------------------------------------------------
// Decoding helpers
// ---------------------------------------------------------------------------

fn malformed(message: String, position: usize) -> de::Error {
    de::Error::message(message).at(position)
}

/// Read a definite array header.
fn array_len(d: &mut Decoder<'_>, what: &str) -> Result<u64, de::Error> {
    let pos = d.position();
    d.array()?
        .ok_or_else(|| malformed(format!("{what}: indefinite-length array"), pos))
}

/// Read a definite array header of exactly `expected` elements.
fn fixed_array(d: &mut Decoder<'_>, expected: u64, what: &str) -> Result<(), de::Error> {
    let pos = d.position();
    let len = array_len(d, what)?;
    if len != expected {
        return Err(malformed(
            format!("{what}: expected {expected} elements, found {len}"),
            pos,
        ));
    }
    Ok(())
}

/// Read a definite map header.
fn map_len(d: &mut Decoder<'_>, what: &str) -> Result<u64, de::Error> {
    let pos = d.position();
    d.map()?
        .ok_or_else(|| malformed(format!("{what}: indefinite-length map"), pos))
}

/// Decode a definite array of `T`. The declared length is not trusted for
/// preallocation; a lying header simply runs out of input.
fn decode_vec<'b, C, T: Decode<'b, C>>(
    d: &mut Decoder<'b>,
    ctx: &mut C,
    what: &str,
) -> Result<Vec<T>, de::Error> {
    let len = array_len(d, what)?;
    let mut items = Vec::new();
    for _ in 0..len {
        items.push(T::decode(d, ctx)?);
    }
    Ok(items)
}

fn set_once<T>(
    slot: &mut Option<T>,
    value: T,
    key: u64,
    what: &str,
    pos: usize,
) -> Result<(), de::Error> {
    if slot.replace(value).is_some() {
        return Err(malformed(format!("{what}: duplicate key {key}"), pos));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// TransactionInput
// ---------------------------------------------------------------------------

impl<C> Encode<C> for TransactionInput {
    fn encode<W: en::Write>(
        &self,
        e: &mut Encoder<W>,
        _ctx: &mut C,
    ) -> Result<(), en::Error<W::Error>> {
        e.array(2)?
            .bytes(self.transaction_id.as_bytes())?
            .u64(self.index)?;
        Ok(())
    }
}

impl<'b, C> Decode<'b, C> for TransactionInput {
    fn decode(d: &mut Decoder<'b>, _ctx: &mut C) -> Result<Self, de::Error> {
        fixed_array(d, 2, "input")?;
        let pos = d.position();
        let transaction_id = TransactionId::try_from_slice(d.bytes()?)
            .map_err(|_| malformed("input: transaction id must be 32 bytes".into(), pos))?;
        let index = d.u64()?;
        Ok(Self {
            transaction_id,
            index,
        })
    }
}

// ---------------------------------------------------------------------------
// TransactionOutput
// ---------------------------------------------------------------------------

impl<C> Encode<C> for TransactionOutput {
    fn encode<W: en::Write>(
        &self,
        e: &mut Encoder<W>,
        _ctx: &mut C,
    ) -> Result<(), en::Error<W::Error>> {
        e.array(2)?.bytes(&self.address)?.u64(self.amount)?;
        Ok(())
    }
}

impl<'b, C> Decode<'b, C> for TransactionOutput {
    fn decode(d: &mut Decoder<'b>, _ctx: &mut C) -> Result<Self, de::Error> {
        fixed_array(d, 2, "output")?;
        let address = d.bytes()?.to_vec();
        let amount = d.u64()?;
        Ok(Self { address, amount })
    }
}

// ---------------------------------------------------------------------------
// Unsupported optional payloads
// ---------------------------------------------------------------------------

impl<C> Encode<C> for Certificate {
    fn encode<W: en::Write>(
        &self,
        _e: &mut Encoder<W>,
        _ctx: &mut C,
    ) -> Result<(), en::Error<W::Error>> {
        match *self {}
    }
}

impl<C> Encode<C> for Metadata {
    fn encode<W: en::Write>(
        &self,
        _e: &mut Encoder<W>,
        _ctx: &mut C,
    ) -> Result<(), en::Error<W::Error>> {
        match *self {}
    }
}

// ---------------------------------------------------------------------------
// TransactionBody
// ---------------------------------------------------------------------------

impl<C> Encode<C> for TransactionBody {
    fn encode<W: en::Write>(
        &self,
        e: &mut Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), en::Error<W::Error>> {
        let entries = if self.certificates.is_empty() { 4 } else { 5 };
        e.map(entries)?;

        e.u64(BODY_KEY_INPUTS)?.array(self.inputs.len() as u64)?;
        for input in &self.inputs {
            input.encode(e, ctx)?;
        }

        e.u64(BODY_KEY_OUTPUTS)?.array(self.outputs.len() as u64)?;
        for output in &self.outputs {
            output.encode(e, ctx)?;
        }

        e.u64(BODY_KEY_FEE)?.u64(self.fee)?;
        e.u64(BODY_KEY_TTL)?.u64(self.ttl)?;

        if !self.certificates.is_empty() {
            e.u64(BODY_KEY_CERTIFICATES)?
                .array(self.certificates.len() as u64)?;
            for certificate in &self.certificates {
                certificate.encode(e, ctx)?;
            }
        }
        Ok(())
    }
}

impl<'b, C> Decode<'b, C> for TransactionBody {
    fn decode(d: &mut Decoder<'b>, ctx: &mut C) -> Result<Self, de::Error> {
        let start = d.position();
        let entries = map_len(d, "body")?;

        let mut inputs = None;
        let mut outputs = None;
        let mut fee = None;
        let mut ttl = None;
        let mut certificates = None;

        for _ in 0..entries {
            let pos = d.position();
            let key = d.u64()?;
            match key {
                BODY_KEY_INPUTS => set_once(&mut inputs, decode_vec(d, ctx, "inputs")?, key, "body", pos)?,
                BODY_KEY_OUTPUTS => set_once(&mut outputs, decode_vec(d, ctx, "outputs")?, key, "body", pos)?,
                BODY_KEY_FEE => set_once(&mut fee, d.u64()?, key, "body", pos)?,
                BODY_KEY_TTL => set_once(&mut ttl, d.u64()?, key, "body", pos)?,
                BODY_KEY_CERTIFICATES => {
                    if array_len(d, "certificates")? != 0 {
                        return Err(malformed("body: certificates are not supported".into(), pos));
                    }
                    set_once(&mut certificates, Vec::<Certificate>::new(), key, "body", pos)?;
                }
                BODY_KEY_WITHDRAWALS | BODY_KEY_UPDATE | BODY_KEY_METADATA_HASH => {
                    return Err(malformed(format!("body: field {key} is not supported"), pos));
                }
                other => {
                    return Err(malformed(format!("body: unknown field {other}"), pos));
                }
            }
        }

        let missing = |name: &str| malformed(format!("body: missing {name}"), start);
        Ok(Self {
            inputs: inputs.ok_or_else(|| missing("inputs"))?,
            outputs: outputs.ok_or_else(|| missing("outputs"))?,
            fee: fee.ok_or_else(|| missing("fee"))?,
            ttl: ttl.ok_or_else(|| missing("ttl"))?,
            certificates: certificates.unwrap_or_default(),
        })
    }
}

// ---------------------------------------------------------------------------
// Witnesses
// ---------------------------------------------------------------------------

impl<C> Encode<C> for VKeyWitness {
    fn encode<W: en::Write>(
        &self,
        e: &mut Encoder<W>,
        _ctx: &mut C,
    ) -> Result<(), en::Error<W::Error>> {
        e.array(2)?
            .bytes(self.vkey.as_bytes())?
            .bytes(self.signature.as_bytes())?;
        Ok(())
    }
}

impl<'b, C> Decode<'b, C> for VKeyWitness {
    fn decode(d: &mut Decoder<'b>, _ctx: &mut C) -> Result<Self, de::Error> {
        fixed_array(d, 2, "vkey witness")?;
        let pos = d.position();
        let vkey = PublicKey::try_from_slice(d.bytes()?)
            .map_err(|err| malformed(format!("vkey witness: {err}"), pos))?;
        let pos = d.position();
        let signature = Signature::try_from_slice(d.bytes()?)
            .map_err(|err| malformed(format!("vkey witness: {err}"), pos))?;
        Ok(Self { vkey, signature })
    }
}

impl<C> Encode<C> for WitnessSet {
    fn encode<W: en::Write>(
        &self,
        e: &mut Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), en::Error<W::Error>> {
        if self.vkey_witnesses.is_empty() {
            e.map(0)?;
            return Ok(());
        }
        e.map(1)?
            .u64(WITNESS_KEY_VKEYS)?
            .array(self.vkey_witnesses.len() as u64)?;
        for witness in &self.vkey_witnesses {
            witness.encode(e, ctx)?;
        }
        Ok(())
    }
}

impl<'b, C> Decode<'b, C> for WitnessSet {
    fn decode(d: &mut Decoder<'b>, ctx: &mut C) -> Result<Self, de::Error> {
        let entries = map_len(d, "witness set")?;
        let mut vkey_witnesses = None;
        for _ in 0..entries {
            let pos = d.position();
            let key = d.u64()?;
            if key != WITNESS_KEY_VKEYS {
                return Err(malformed(
                    format!("witness set: witness kind {key} is not supported"),
                    pos,
                ));
            }
            let witnesses = decode_vec(d, ctx, "vkey witnesses")?;
            set_once(&mut vkey_witnesses, witnesses, key, "witness set", pos)?;
        }
        Ok(Self {
            vkey_witnesses: vkey_witnesses.unwrap_or_default(),
        })
    }
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

impl<C> Encode<C> for Transaction {
    fn encode<W: en::Write>(
        &self,
        e: &mut Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), en::Error<W::Error>> {
        e.array(3)?;
        self.body.encode(e, ctx)?;
        self.witness_set.encode(e, ctx)?;
        match &self.metadata {
            None => {
                e.null()?;
            }
            Some(metadata) => metadata.encode(e, ctx)?,
        }
        Ok(())
    }
}

impl<'b, C> Decode<'b, C> for Transaction {
    fn decode(d: &mut Decoder<'b>, ctx: &mut C) -> Result<Self, de::Error> {
        fixed_array(d, 3, "transaction")?;
        let body = TransactionBody::decode(d, ctx)?;
        let witness_set = WitnessSet::decode(d, ctx)?;
        let pos = d.position();
        if d.datatype()? != Type::Null {
            return Err(malformed("transaction: metadata is not supported".into(), pos));
        }
        d.null()?;
        Ok(Self {
            body,
            witness_set,
            metadata: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Ed25519Keypair;

    const TX_ID: &str = "2432fc624eb86075fcf035ca198cd89eff491ee38c0ada3434eb70c3af797acc";
    const ADDRESS: &str = "60f0b3ea369542a5848290b727648b5838b5daa2559debd55dfcaa1f20";

    /// One input, one output, fee and ttl from the single-input scenario.
    fn golden_body() -> TransactionBody {
        TransactionBody {
            inputs: vec![TransactionInput::new(TX_ID.parse().unwrap(), 0)],
            outputs: vec![TransactionOutput::new(
                hex::decode(ADDRESS).unwrap(),
                20_982_393_645,
            )],
            fee: 164_357,
            ttl: 39_851_191,
            certificates: Vec::new(),
        }
    }

    const GOLDEN_BODY_HEX: &str = "a400818258202432fc624eb86075fcf035ca198cd89eff491ee38c0ada\
        3434eb70c3af797acc00018182581d60f0b3ea369542a5848290b727648b5838b5daa2559debd55dfcaa1f20\
        1b00000004e2a5eb2d021a00028205031a026014b7";

    #[test]
    fn body_encoding_matches_golden_bytes() {
        assert_eq!(hex::encode(golden_body().to_bytes()), GOLDEN_BODY_HEX);
    }

    #[test]
    fn body_id_matches_golden_digest() {
        assert_eq!(
            golden_body().id().to_string(),
            "71e5121b92c53834937730f6f0a6cf692496714dc3a426bba302868edc76a72a"
        );
    }

    #[test]
    fn unsigned_transaction_layout() {
        let tx = Transaction::new(golden_body(), WitnessSet::default());
        let hex_str = tx.to_hex();
        // [body, {}, null]
        assert!(hex_str.starts_with("83a4"));
        assert!(hex_str.ends_with("a0f6"));
        assert_eq!(hex_str.len(), 2 * (1 + GOLDEN_BODY_HEX.len() / 2 + 2));
    }

    #[test]
    fn signed_transaction_matches_golden_hex() {
        let kp = Ed25519Keypair::from_seed(&[1u8; 32]);
        let body = golden_body();
        let signature = kp.sign(body.id().as_bytes());
        let tx = Transaction::new(
            body,
            WitnessSet::new(vec![VKeyWitness::new(kp.public_key(), signature)]),
        );
        let expected = format!(
            "83{GOLDEN_BODY_HEX}a10081825820\
             8a88e3dd7409f195fd52db2d3cba5d72ca6709bf1d94121bf3748801b40f6f5c5840\
             56cb36935b29b0b7d1a5b48fb5be448d889fc861120bc42d99327e82a8fb5005\
             8604893f52c0e38198a9b2b226e02df646b6de0881a8291447fe9d6084964201f6"
        );
        assert_eq!(tx.to_hex(), expected);
        assert_eq!(tx.to_bytes().len(), 200);
        assert_eq!(decode_transaction(&expected).unwrap(), tx);
    }

    #[test]
    fn witnesses_do_not_change_the_id() {
        let kp = Ed25519Keypair::from_seed(&[2u8; 32]);
        let body = golden_body();
        let unsigned = Transaction::new(body.clone(), WitnessSet::default());
        let signed = Transaction::new(
            body.clone(),
            WitnessSet::new(vec![VKeyWitness::new(
                kp.public_key(),
                kp.sign(body.id().as_bytes()),
            )]),
        );
        assert_eq!(unsigned.id(), signed.id());
        assert_ne!(unsigned.to_bytes(), signed.to_bytes());
    }

    #[test]
    fn entity_roundtrips() {
        let input = TransactionInput::new(TX_ID.parse().unwrap(), 7);
        assert_eq!(decode::<TransactionInput>(&encode(&input)).unwrap(), input);

        let output = TransactionOutput::new(vec![], u64::MAX);
        assert_eq!(decode::<TransactionOutput>(&encode(&output)).unwrap(), output);

        let body = golden_body();
        assert_eq!(TransactionBody::from_bytes(&body.to_bytes()).unwrap(), body);
    }

    fn assert_non_canonical(hex_str: &str) {
        let bytes = hex::decode(hex_str).unwrap();
        match TransactionBody::from_bytes(&bytes) {
            Err(TransactionError::MalformedEncoding { reason }) => {
                assert_eq!(reason, "non-canonical encoding")
            }
            other => panic!("expected non-canonical rejection for {hex_str}, got {other:?}"),
        }
    }

    #[test]
    fn canonical_body_decodes() {
        let body = TransactionBody::from_bytes(&hex::decode("a4008001800205030a").unwrap()).unwrap();
        assert_eq!(body.fee, 5);
        assert_eq!(body.ttl, 10);
    }

    #[test]
    fn body_keys_out_of_order_are_rejected() {
        // {3: ttl, 2: fee, 1: [], 0: []}
        assert_non_canonical("a4030a020501800080");
    }

    #[test]
    fn explicit_empty_certificates_are_rejected() {
        assert_non_canonical("a5008001800205030a0480");
    }

    #[test]
    fn overlong_integer_heads_are_rejected() {
        // fee 5 written as a one-byte-argument uint (0x18 0x05).
        assert_non_canonical("a400800180021805030a");
    }

    #[test]
    fn non_canonical_transaction_is_rejected_before_id_is_computed() {
        // Decodes structurally, but the ID of the re-encoded body would not
        // be the hash of the body bytes that were received.
        match decode_transaction("83a4030a020501800080a0f6") {
            Err(TransactionError::MalformedEncoding { reason }) => {
                assert_eq!(reason, "non-canonical encoding")
            }
            other => panic!("expected rejection, got {other:?}"),
        }
        // Witness set with an explicit empty vkey list.
        assert!(decode_transaction("83a4008001800205030aa10080f6").is_err());
    }

    fn assert_malformed(hex_str: &str) {
        match decode_transaction(hex_str) {
            Err(TransactionError::MalformedEncoding { .. }) => {}
            other => panic!("expected MalformedEncoding for {hex_str}, got {other:?}"),
        }
    }

    #[test]
    fn rejects_structural_violations() {
        // Not hex.
        assert_malformed("zz");
        // Empty input.
        assert_malformed("");
        // Array of 2 instead of 3.
        assert_malformed("82a40080018002050300a0");
        // Body is an array, not a map.
        assert_malformed("8380a0f6");
        // Missing ttl.
        assert_malformed("83a3008001800205a0f6");
        // Duplicate fee key.
        assert_malformed("83a40080018002050206a0f6");
        // Withdrawals present.
        assert_malformed("83a50080018002050300050aa0f6");
        // Unknown body key.
        assert_malformed("83a500800180020503000901a0f6");
        // Non-empty certificates.
        assert_malformed("83a5008001800205030004818000a0f6");
        // Metadata present.
        assert_malformed("83a40080018002050300a0a0");
        // Bootstrap witnesses (key 2) are not supported.
        assert_malformed("83a40080018002050300a10280f6");
        // Trailing byte.
        assert_malformed("83a40080018002050300a0f600");
        // Indefinite-length inputs array.
        assert_malformed("83a4009fff018002050300a0f6");
        // Transaction id of 2 bytes.
        assert_malformed("83a4008182420102000180020503 00a0f6".replace(' ', "").as_str());
        // Negative fee.
        assert_malformed("83a40080018002200300a0f6");
    }

    #[test]
    fn rejects_wrong_witness_sizes() {
        let mut hex_str = String::from("83a40080018002050300a1008182");
        hex_str.push_str("5820");
        hex_str.push_str(&"11".repeat(32));
        hex_str.push_str("583f");
        hex_str.push_str(&"22".repeat(63));
        hex_str.push_str("f6");
        assert_malformed(&hex_str);
    }

    #[test]
    fn truncation_never_panics() {
        let kp = Ed25519Keypair::from_seed(&[1u8; 32]);
        let body = golden_body();
        let tx = Transaction::new(
            body.clone(),
            WitnessSet::new(vec![VKeyWitness::new(
                kp.public_key(),
                kp.sign(body.id().as_bytes()),
            )]),
        );
        let bytes = tx.to_bytes();
        for cut in 0..bytes.len() {
            assert!(
                Transaction::from_bytes(&bytes[..cut]).is_err(),
                "prefix of length {cut} must not decode"
            );
        }
        assert!(Transaction::from_bytes(&bytes).is_ok());
    }

    #[test]
    fn lying_length_header_does_not_allocate() {
        // Inputs array claims 2^63 elements, then ends.
        assert_malformed("83a4009b8000000000000000");
    }
}
