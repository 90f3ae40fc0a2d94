/*!
# Instruction Bridge

Converts instructions between the legacy flat `AccountMeta` list and the
typed-role shape. Account order is preserved exactly and duplicates are kept,
so the conversion is lossless in both directions.
*/

use crate::address::Address;
use serde::{Deserialize, Serialize};
use solana_sdk::instruction::{AccountMeta, Instruction};

/// Whether an account reference is writable and/or must co-sign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountRole {
    Readonly,
    Writable,
    ReadonlySigner,
    WritableSigner,
}

impl AccountRole {
    pub fn from_flags(is_signer: bool, is_writable: bool) -> Self {
        match (is_signer, is_writable) {
            (true, true) => Self::WritableSigner,
            (true, false) => Self::ReadonlySigner,
            (false, true) => Self::Writable,
            (false, false) => Self::Readonly,
        }
    }

    pub fn is_signer(&self) -> bool {
        matches!(self, Self::ReadonlySigner | Self::WritableSigner)
    }

    pub fn is_writable(&self) -> bool {
        matches!(self, Self::Writable | Self::WritableSigner)
    }
}

/// One account referenced by a [`ModernInstruction`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountReference {
    pub address: Address,
    pub role: AccountRole,
}

/// Instruction in the typed-role shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModernInstruction {
    pub program_address: Address,
    #[serde(default)]
    pub accounts: Vec<AccountReference>,
    #[serde(default)]
    pub data: Vec<u8>,
}

impl ModernInstruction {
    pub fn new(program_address: Address, accounts: Vec<AccountReference>, data: Vec<u8>) -> Self {
        Self {
            program_address,
            accounts,
            data,
        }
    }
}

/// An instruction in either shape, accepted wherever both are valid input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompatInstruction {
    Legacy(Instruction),
    Modern(ModernInstruction),
}

impl CompatInstruction {
    pub fn to_legacy(&self) -> Instruction {
        match self {
            Self::Legacy(instruction) => instruction.clone(),
            Self::Modern(instruction) => to_legacy_instruction(instruction),
        }
    }
}

impl From<Instruction> for CompatInstruction {
    fn from(instruction: Instruction) -> Self {
        Self::Legacy(instruction)
    }
}

impl From<ModernInstruction> for CompatInstruction {
    fn from(instruction: ModernInstruction) -> Self {
        Self::Modern(instruction)
    }
}

/// Typed-role instruction → legacy `Instruction`
pub fn to_legacy_instruction(instruction: &ModernInstruction) -> Instruction {
    let accounts = instruction
        .accounts
        .iter()
        .map(|account| AccountMeta {
            pubkey: (&account.address).into(),
            is_signer: account.role.is_signer(),
            is_writable: account.role.is_writable(),
        })
        .collect();

    Instruction {
        program_id: (&instruction.program_address).into(),
        accounts,
        data: instruction.data.clone(),
    }
}

/// Legacy `Instruction` → typed-role instruction
pub fn from_legacy_instruction(instruction: &Instruction) -> ModernInstruction {
    let accounts = instruction
        .accounts
        .iter()
        .map(|meta| AccountReference {
            address: meta.pubkey.into(),
            role: AccountRole::from_flags(meta.is_signer, meta.is_writable),
        })
        .collect();

    ModernInstruction {
        program_address: instruction.program_id.into(),
        accounts,
        data: instruction.data.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::pubkey::Pubkey;

    fn modern_fixture() -> ModernInstruction {
        let shared = Address::from(Pubkey::new_unique());
        ModernInstruction::new(
            Pubkey::new_unique().into(),
            vec![
                AccountReference {
                    address: shared.clone(),
                    role: AccountRole::WritableSigner,
                },
                AccountReference {
                    address: Pubkey::new_unique().into(),
                    role: AccountRole::ReadonlySigner,
                },
                AccountReference {
                    address: Pubkey::new_unique().into(),
                    role: AccountRole::Writable,
                },
                AccountReference {
                    address: shared,
                    role: AccountRole::Readonly,
                },
            ],
            vec![1, 2, 3],
        )
    }

    #[test]
    fn test_role_flag_bijection() {
        for role in [
            AccountRole::Readonly,
            AccountRole::Writable,
            AccountRole::ReadonlySigner,
            AccountRole::WritableSigner,
        ] {
            assert_eq!(
                AccountRole::from_flags(role.is_signer(), role.is_writable()),
                role
            );
        }
    }

    #[test]
    fn test_modern_round_trip_preserves_order_and_duplicates() {
        let modern = modern_fixture();
        let legacy = to_legacy_instruction(&modern);
        assert_eq!(legacy.accounts.len(), 4);
        assert_eq!(legacy.accounts[0].pubkey, legacy.accounts[3].pubkey);
        assert!(legacy.accounts[0].is_signer && legacy.accounts[0].is_writable);
        assert!(legacy.accounts[1].is_signer && !legacy.accounts[1].is_writable);
        assert!(!legacy.accounts[2].is_signer && legacy.accounts[2].is_writable);
        assert_eq!(from_legacy_instruction(&legacy), modern);
    }

    #[test]
    fn test_legacy_round_trip() {
        let legacy = Instruction::new_with_bytes(
            Pubkey::new_unique(),
            &[9, 8, 7],
            vec![
                AccountMeta::new(Pubkey::new_unique(), true),
                AccountMeta::new_readonly(Pubkey::new_unique(), false),
            ],
        );
        assert_eq!(to_legacy_instruction(&from_legacy_instruction(&legacy)), legacy);
    }

    #[test]
    fn test_absent_accounts_and_data() {
        let modern: ModernInstruction =
            serde_json::from_str(r#"{"programAddress":"11111111111111111111111111111111"}"#)
                .unwrap();
        let legacy = to_legacy_instruction(&modern);
        assert!(legacy.accounts.is_empty());
        assert!(legacy.data.is_empty());
        let back = from_legacy_instruction(&legacy);
        assert!(back.accounts.is_empty());
        assert!(back.data.is_empty());
    }
}
