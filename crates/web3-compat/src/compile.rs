/*!
# Transaction Compiler

Lays out a message from a fee payer, a list of instructions and a blockhash
lifetime, then serializes it using the network's message encoding:

```text
[0x80 | version]          v0 only
num_required_signatures   u8
num_readonly_signed       u8
num_readonly_unsigned     u8
account_keys              compact-u16 length, 32 bytes each
recent_blockhash          32 bytes
instructions              compact-u16 length, each:
    program_id_index      u8
    account_indices       compact-u16 length, u8 each
    data                  compact-u16 length, bytes
address_table_lookups     compact-u16 length (always 0), v0 only
```

The account table is ordered fee payer first, then writable signers, readonly
signers, writable non-signers and readonly non-signers, each group sorted by
key bytes. This is the same layout `solana-sdk` produces, so the output is
byte-identical to a message compiled there from the same inputs.
*/

use crate::{
    bridge::CompatInstruction,
    error::{CompileError, DecodeError},
};
use serde::{Deserialize, Serialize};
use solana_sdk::{
    instruction::Instruction, pubkey::Pubkey, signature::Signature, signer::Signer,
};
use std::collections::{BTreeMap, HashMap};

const MAX_STATIC_ACCOUNTS: usize = u8::MAX as usize + 1;
const HASH_BYTES: usize = 32;
const SIGNATURE_BYTES: usize = 64;
const VERSION_PREFIX_MASK: u8 = 0x80;

/// Message format to emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransactionVersion {
    Legacy,
    #[default]
    V0,
}

/// Recent blockhash plus the last block height at which it is still valid
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockhashLifetime {
    pub blockhash: String,
    pub last_valid_block_height: u64,
}

impl BlockhashLifetime {
    fn decode_blockhash(&self) -> Result<[u8; HASH_BYTES], CompileError> {
        let invalid = |source| CompileError::InvalidBlockhash {
            blockhash: self.blockhash.clone(),
            source,
        };
        let decoded = bs58::decode(&self.blockhash)
            .into_vec()
            .map_err(|e| invalid(DecodeError::Base58(e)))?;
        decoded.as_slice().try_into().map_err(|_| {
            invalid(DecodeError::InvalidLength {
                expected: HASH_BYTES,
                actual: decoded.len(),
            })
        })
    }
}

/// Inputs to [`compile_from_compat`]
#[derive(Debug, Clone)]
pub struct CompileParams {
    pub fee_payer: Pubkey,
    pub instructions: Vec<CompatInstruction>,
    pub latest_blockhash: BlockhashLifetime,
    pub version: TransactionVersion,
}

/// A required signer and its signature, empty until signed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureSlot {
    pub signer: Pubkey,
    pub signature: Option<Signature>,
}

/// Serialized message plus one signature slot per required signer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTransaction {
    message_bytes: Vec<u8>,
    signatures: Vec<SignatureSlot>,
    lifetime: BlockhashLifetime,
}

impl CompiledTransaction {
    pub fn message_bytes(&self) -> &[u8] {
        &self.message_bytes
    }

    /// Signature slots in account-table order
    pub fn signatures(&self) -> &[SignatureSlot] {
        &self.signatures
    }

    pub fn lifetime(&self) -> &BlockhashLifetime {
        &self.lifetime
    }

    /// Fill the slots belonging to `signers`. Every signer must be a required
    /// signer of the message.
    pub fn sign(&mut self, signers: &[&dyn Signer]) -> Result<(), CompileError> {
        for signer in signers {
            let pubkey = signer.pubkey();
            let slot = self
                .signatures
                .iter_mut()
                .find(|slot| slot.signer == pubkey)
                .ok_or(CompileError::UnknownSigner(pubkey))?;
            let signature = signer
                .try_sign_message(&self.message_bytes)
                .map_err(|e| CompileError::Signing(pubkey, e.to_string()))?;
            slot.signature = Some(signature);
        }
        Ok(())
    }

    pub fn is_fully_signed(&self) -> bool {
        self.signatures.iter().all(|slot| slot.signature.is_some())
    }

    /// Transaction wire format: signature count, signatures (zeroed when
    /// empty), then the message.
    pub fn to_wire_bytes(&self) -> Result<Vec<u8>, CompileError> {
        let mut wire = Vec::with_capacity(
            3 + self.signatures.len() * SIGNATURE_BYTES + self.message_bytes.len(),
        );
        write_compact_len(&mut wire, self.signatures.len(), "signatures")?;
        for slot in &self.signatures {
            match &slot.signature {
                Some(signature) => wire.extend_from_slice(signature.as_ref()),
                None => wire.extend_from_slice(&[0u8; SIGNATURE_BYTES]),
            }
        }
        wire.extend_from_slice(&self.message_bytes);
        Ok(wire)
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct KeyMeta {
    is_signer: bool,
    is_writable: bool,
}

struct MessageHeader {
    num_required_signatures: u8,
    num_readonly_signed: u8,
    num_readonly_unsigned: u8,
}

/// Compile legacy or typed-role instructions into a message for `fee_payer`.
pub fn compile_from_compat(params: CompileParams) -> Result<CompiledTransaction, CompileError> {
    let blockhash = params.latest_blockhash.decode_blockhash()?;
    let instructions: Vec<Instruction> = params
        .instructions
        .iter()
        .map(CompatInstruction::to_legacy)
        .collect();

    let (header, account_keys) = compile_keys(&params.fee_payer, &instructions)?;
    let index_of: HashMap<Pubkey, u8> = account_keys
        .iter()
        .enumerate()
        .map(|(index, key)| (*key, index as u8))
        .collect();

    let mut message = Vec::with_capacity(256);
    if params.version == TransactionVersion::V0 {
        message.push(VERSION_PREFIX_MASK);
    }
    message.push(header.num_required_signatures);
    message.push(header.num_readonly_signed);
    message.push(header.num_readonly_unsigned);

    write_compact_len(&mut message, account_keys.len(), "account keys")?;
    for key in &account_keys {
        message.extend_from_slice(key.as_ref());
    }
    message.extend_from_slice(&blockhash);

    write_compact_len(&mut message, instructions.len(), "instructions")?;
    for ix in &instructions {
        // Every key was inserted by compile_keys, so lookups cannot miss.
        message.push(index_of[&ix.program_id]);
        write_compact_len(&mut message, ix.accounts.len(), "instruction accounts")?;
        message.extend(ix.accounts.iter().map(|meta| index_of[&meta.pubkey]));
        write_compact_len(&mut message, ix.data.len(), "instruction data")?;
        message.extend_from_slice(&ix.data);
    }

    if params.version == TransactionVersion::V0 {
        write_compact_len(&mut message, 0, "address table lookups")?;
    }

    let signatures = account_keys[..header.num_required_signatures as usize]
        .iter()
        .map(|signer| SignatureSlot {
            signer: *signer,
            signature: None,
        })
        .collect();

    Ok(CompiledTransaction {
        message_bytes: message,
        signatures,
        lifetime: params.latest_blockhash,
    })
}

fn compile_keys(
    fee_payer: &Pubkey,
    instructions: &[Instruction],
) -> Result<(MessageHeader, Vec<Pubkey>), CompileError> {
    let mut key_meta_map = BTreeMap::<Pubkey, KeyMeta>::new();
    for ix in instructions {
        key_meta_map.entry(ix.program_id).or_default();
        for account in &ix.accounts {
            let meta = key_meta_map.entry(account.pubkey).or_default();
            meta.is_signer |= account.is_signer;
            meta.is_writable |= account.is_writable;
        }
    }
    key_meta_map.remove(fee_payer);

    let key_meta_map = &key_meta_map;
    let group = move |signer: bool, writable: bool| {
        key_meta_map
            .iter()
            .filter(move |(_, meta)| meta.is_signer == signer && meta.is_writable == writable)
            .map(|(key, _)| *key)
    };

    let writable_signers: Vec<Pubkey> = std::iter::once(*fee_payer)
        .chain(group(true, true))
        .collect();
    let readonly_signers: Vec<Pubkey> = group(true, false).collect();
    let writable_non_signers: Vec<Pubkey> = group(false, true).collect();
    let readonly_non_signers: Vec<Pubkey> = group(false, false).collect();

    let total = writable_signers.len()
        + readonly_signers.len()
        + writable_non_signers.len()
        + readonly_non_signers.len();
    if total > MAX_STATIC_ACCOUNTS {
        return Err(CompileError::AccountIndexOverflow(total));
    }

    let count = |len: usize| u8::try_from(len).map_err(|_| CompileError::AccountIndexOverflow(total));
    let header = MessageHeader {
        num_required_signatures: count(writable_signers.len() + readonly_signers.len())?,
        num_readonly_signed: count(readonly_signers.len())?,
        num_readonly_unsigned: count(readonly_non_signers.len())?,
    };

    let keys = writable_signers
        .into_iter()
        .chain(readonly_signers)
        .chain(writable_non_signers)
        .chain(readonly_non_signers)
        .collect();

    Ok((header, keys))
}

/// Append `len` in compact-u16 form (7 bits per byte, high bit = continue)
fn write_compact_len(buf: &mut Vec<u8>, len: usize, what: &'static str) -> Result<(), CompileError> {
    let value = u16::try_from(len).map_err(|_| CompileError::LengthOverflow { what, len })?;
    let mut rem = value as u32;
    loop {
        let mut byte = (rem & 0x7f) as u8;
        rem >>= 7;
        if rem == 0 {
            buf.push(byte);
            return Ok(());
        }
        byte |= 0x80;
        buf.push(byte);
    }
}
