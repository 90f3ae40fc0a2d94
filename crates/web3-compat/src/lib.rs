/*!
# Web3 Compat

A legacy-shaped Solana client surface: `PublicKey`-style addresses, plain
instructions and a `Connection` object, implemented on top of typed
addresses, role-tagged instructions, deterministic message compilation and a
pluggable RPC transport.

## Quick Start

```rust,no_run
use solana_sdk::{signature::Keypair, signer::Signer, transaction::Transaction};
use web3_compat::{send_and_confirm_transaction, system, Commitment, Connection};

# async fn example() -> Result<(), Box<dyn std::error::Error>> {
let connection = Connection::new("https://api.devnet.solana.com", Commitment::Confirmed);
let payer = Keypair::new();
let recipient = Keypair::new().pubkey();

let balance = connection.get_balance(&payer.pubkey(), None).await?;
println!("Payer holds {} lamports", balance);

let lifetime = connection.get_latest_blockhash(None).await?.value;
let mut tx = Transaction::new_with_payer(
    &[system::transfer(&payer.pubkey(), &recipient, 1_000)],
    Some(&payer.pubkey()),
);
tx.message.recent_blockhash = lifetime.blockhash.parse()?;

let signature = send_and_confirm_transaction(&connection, tx, &[&payer], None).await?;
println!("Confirmed {}", signature);
# Ok(())
# }
```

## Compiling Typed Instructions

```rust
use solana_sdk::pubkey::Pubkey;
use web3_compat::{
    compile_from_compat, system, BlockhashLifetime, CompileParams, TransactionVersion,
};

# fn example() -> Result<(), Box<dyn std::error::Error>> {
let payer = Pubkey::new_unique();
let compiled = compile_from_compat(CompileParams {
    fee_payer: payer,
    instructions: vec![system::transfer(&payer, &Pubkey::new_unique(), 42).into()],
    latest_blockhash: BlockhashLifetime {
        blockhash: "11111111111111111111111111111111".to_string(),
        last_valid_block_height: 100,
    },
    version: TransactionVersion::V0,
})?;
assert_eq!(compiled.signatures().len(), 1);
# Ok(())
# }
```

## Custom Transports

Anything implementing [`RpcTransport`] can back a [`Connection`], which is how
the test suite scripts node responses:

```rust,ignore
let connection = Connection::with_transport(Arc::new(my_transport), ConnectionConfig::default());
```
*/

mod address;
mod bridge;
mod codec;
mod commitment;
mod compile;
mod config;
mod confirm;
mod connection;
mod error;
mod send_and_confirm;
pub mod system;
mod transport;
mod types;
mod wire;

pub use address::{to_address, to_public_key, Address, IntoAddress};
pub use bridge::{
    from_legacy_instruction, to_legacy_instruction, AccountReference, AccountRole,
    CompatInstruction, ModernInstruction,
};
pub use codec::{decode_account_data, encode_for_simulation, AccountData, DataEncoding};
pub use commitment::{resolve_commitment, Commitment};
pub use compile::{
    compile_from_compat, BlockhashLifetime, CompileParams, CompiledTransaction, SignatureSlot,
    TransactionVersion,
};
pub use config::{ConfirmationConfig, ConnectionConfig, MalformedAccountPolicy};
pub use confirm::{next_state, ConfirmationState};
pub use connection::Connection;
pub use error::{CompatError, CompatResult, CompileError, DecodeError};
pub use send_and_confirm::{send_and_confirm_transaction, SignableTransaction};
pub use system::{LAMPORTS_PER_SOL, SYSTEM_PROGRAM_ID};
pub use transport::RpcTransport;
pub use types::{
    AccountInfo, AccountInfoConfig, DataSlice, ProgramAccount, ProgramAccountsConfig,
    RawTransaction, RpcContext, RpcResponse, SendOptions, SignatureStatus, SignatureStatusConfig,
    SimulateAccountsConfig, SimulateConfig, SimulatedAccountInfo, SimulatedTransactionResponse,
};
