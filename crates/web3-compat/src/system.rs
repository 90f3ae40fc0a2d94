use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

/// The System Program address, `11111111111111111111111111111111`
pub const SYSTEM_PROGRAM_ID: Pubkey = Pubkey::new_from_array([0u8; 32]);

/// Discriminant of the System Program `Transfer` instruction
pub const TRANSFER_INSTRUCTION_INDEX: u32 = 2;

pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Build a System Program transfer with a hand-encoded 12-byte payload:
/// little-endian `u32` discriminant followed by little-endian `u64` lamports.
pub fn transfer(from: &Pubkey, to: &Pubkey, lamports: u64) -> Instruction {
    let mut data = Vec::with_capacity(12);
    data.extend_from_slice(&TRANSFER_INSTRUCTION_INDEX.to_le_bytes());
    data.extend_from_slice(&lamports.to_le_bytes());

    Instruction {
        program_id: SYSTEM_PROGRAM_ID,
        accounts: vec![AccountMeta::new(*from, true), AccountMeta::new(*to, false)],
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_layout() {
        let from = Pubkey::new_unique();
        let to = Pubkey::new_unique();
        for lamports in [0, 1, 5_000, LAMPORTS_PER_SOL, u64::MAX] {
            let ix = transfer(&from, &to, lamports);
            assert_eq!(ix.data.len(), 12);
            assert_eq!(
                u32::from_le_bytes(ix.data[..4].try_into().unwrap()),
                TRANSFER_INSTRUCTION_INDEX
            );
            assert_eq!(u64::from_le_bytes(ix.data[4..].try_into().unwrap()), lamports);
        }
    }

    #[test]
    fn test_account_order_and_program() {
        let from = Pubkey::new_unique();
        let to = Pubkey::new_unique();
        let ix = transfer(&from, &to, 42);
        assert_eq!(ix.program_id.to_string(), "11111111111111111111111111111111");
        assert_eq!(ix.accounts, vec![AccountMeta::new(from, true), AccountMeta::new(to, false)]);
    }

    #[test]
    #[allow(deprecated)]
    fn test_matches_sdk_transfer() {
        let from = Pubkey::new_unique();
        let to = Pubkey::new_unique();
        let sdk = solana_sdk::system_instruction::transfer(&from, &to, 1_000_000);
        assert_eq!(transfer(&from, &to, 1_000_000), sdk);
    }
}
