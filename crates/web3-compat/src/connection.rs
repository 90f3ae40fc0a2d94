use crate::{
    address::{Address, IntoAddress},
    codec::DataEncoding,
    commitment::{resolve_commitment, Commitment},
    compile::BlockhashLifetime,
    config::{ConnectionConfig, MalformedAccountPolicy},
    error::{CompatError, CompatResult},
    transport::RpcTransport,
    types::{
        AccountInfo, AccountInfoConfig, ProgramAccount, ProgramAccountsConfig, RawTransaction,
        RpcResponse, SendOptions, SignatureStatus, SignatureStatusConfig, SimulateConfig,
        SimulatedAccountInfo, SimulatedTransactionResponse,
    },
    wire::{
        self, AccountInfoRequest, CommitmentConfig, ProgramAccountsRequest,
        SendTransactionRequest, SignatureStatusRequest, SimulateAccountsRequest,
        SimulateTransactionRequest, WireAccount, WireBlockhash, WireProgramAccount,
        WireSignatureStatus, WireSimulation,
    },
};
use base64::{prelude::BASE64_STANDARD, Engine};
use serde_json::{json, Number, Value};
use solana_client::{nonblocking::rpc_client::RpcClient, rpc_request::RpcRequest};
use solana_sdk::signature::Signature;
use std::{str::FromStr, sync::Arc};
use tracing::{debug, warn};

/// Legacy-shaped client for a single RPC endpoint
///
/// Every call resolves its commitment against the connection default, builds
/// the node request, and widens the response into the legacy data shapes.
#[derive(Clone)]
pub struct Connection {
    endpoint: String,
    config: ConnectionConfig,
    transport: Arc<dyn RpcTransport>,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("endpoint", &self.endpoint)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Connection {
    /// Connect to `endpoint` over HTTP JSON-RPC
    pub fn new(endpoint: impl Into<String>, config: impl Into<ConnectionConfig>) -> Self {
        let endpoint = endpoint.into();
        let transport = Arc::new(RpcClient::new(endpoint.clone()));
        Self {
            endpoint,
            config: config.into(),
            transport,
        }
    }

    /// Use a caller-supplied transport
    pub fn with_transport(
        transport: Arc<dyn RpcTransport>,
        config: impl Into<ConnectionConfig>,
    ) -> Self {
        Self {
            endpoint: transport.url(),
            config: config.into(),
            transport,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Default commitment, already normalized
    pub fn commitment(&self) -> Option<&Commitment> {
        self.config.commitment.as_ref()
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    fn resolve(&self, explicit: Option<Commitment>) -> Option<Commitment> {
        resolve_commitment(explicit.as_ref(), self.config.commitment.as_ref())
    }

    async fn call(&self, request: RpcRequest, params: Value) -> CompatResult<Value> {
        debug!("RPC {} -> {}", request, self.endpoint);
        let response = self.transport.call(request, params).await?;
        Ok(response)
    }

    pub async fn get_latest_blockhash(
        &self,
        commitment: impl Into<Option<Commitment>>,
    ) -> CompatResult<RpcResponse<BlockhashLifetime>> {
        let method = RpcRequest::GetLatestBlockhash;
        let params = json!([CommitmentConfig {
            commitment: self.resolve(commitment.into()),
        }]);
        let response =
            wire::parse_envelope::<WireBlockhash>(method, self.call(method, params).await?)?;

        Ok(RpcResponse {
            context: response.context,
            value: BlockhashLifetime {
                blockhash: response.value.blockhash,
                last_valid_block_height: wire::widen(
                    &response.value.last_valid_block_height,
                    "lastValidBlockHeight",
                )?,
            },
        })
    }

    /// Balance in lamports
    pub async fn get_balance(
        &self,
        address: impl IntoAddress,
        commitment: impl Into<Option<Commitment>>,
    ) -> CompatResult<u64> {
        let address = address.into_address()?;
        let method = RpcRequest::GetBalance;
        let params = json!([
            address,
            CommitmentConfig {
                commitment: self.resolve(commitment.into()),
            }
        ]);
        let response = wire::parse_envelope::<Number>(method, self.call(method, params).await?)?;
        wire::widen(&response.value, "value")
    }

    /// Account snapshot, `None` when the account does not exist. Data is
    /// always fetched as base64.
    pub async fn get_account_info(
        &self,
        address: impl IntoAddress,
        config: impl Into<AccountInfoConfig>,
    ) -> CompatResult<Option<AccountInfo>> {
        let address = address.into_address()?;
        let config = config.into();
        let method = RpcRequest::GetAccountInfo;
        let params = json!([
            address,
            AccountInfoRequest {
                encoding: DataEncoding::Base64,
                commitment: self.resolve(config.commitment),
                data_slice: config.data_slice,
                min_context_slot: config.min_context_slot,
            }
        ]);
        let response =
            wire::parse_envelope::<Option<WireAccount>>(method, self.call(method, params).await?)?;

        response
            .value
            .map(WireAccount::into_account_info)
            .transpose()
    }

    /// Accounts owned by `program`. Entries that cannot be converted are
    /// handled per [`MalformedAccountPolicy`].
    pub async fn get_program_accounts(
        &self,
        program: impl IntoAddress,
        config: impl Into<ProgramAccountsConfig>,
    ) -> CompatResult<Vec<ProgramAccount>> {
        let program = program.into_address()?;
        let config = config.into();
        let method = RpcRequest::GetProgramAccounts;
        let params = json!([
            program,
            ProgramAccountsRequest {
                encoding: config.encoding.unwrap_or(DataEncoding::Base64),
                commitment: self.resolve(config.commitment),
                data_slice: config.data_slice,
                filters: config.filters,
                min_context_slot: config.min_context_slot,
                with_context: config.with_context,
            }
        ]);

        let raw = self.call(method, params).await?;
        let entries = match raw {
            Value::Array(entries) => entries,
            Value::Null => Vec::new(),
            envelope @ Value::Object(_) => wire::parse_envelope::<Vec<Value>>(method, envelope)?.value,
            other => {
                return Err(CompatError::UnexpectedResponse {
                    method,
                    reason: format!("expected an account list, got {other}"),
                })
            }
        };

        let mut accounts = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            match convert_program_account(method, entry) {
                Ok(account) => accounts.push(account),
                Err(e) => match self.config.malformed_accounts {
                    MalformedAccountPolicy::Drop => {
                        warn!("Dropping program account #{} owned by {}: {}", index, program, e);
                    }
                    MalformedAccountPolicy::Fail => return Err(e),
                },
            }
        }

        Ok(accounts)
    }

    /// Statuses for `signatures`, in input order. Every signature is
    /// validated before any request is made.
    pub async fn get_signature_statuses<S: AsRef<str>>(
        &self,
        signatures: &[S],
        config: Option<SignatureStatusConfig>,
    ) -> CompatResult<RpcResponse<Vec<Option<SignatureStatus>>>> {
        let signatures = signatures
            .iter()
            .map(|raw| {
                let raw = raw.as_ref();
                Signature::from_str(raw)
                    .map(|_| raw.to_string())
                    .map_err(|_| CompatError::Validation(format!("invalid signature `{raw}`")))
            })
            .collect::<CompatResult<Vec<_>>>()?;

        let method = RpcRequest::GetSignatureStatuses;
        let params = match config {
            Some(config) => json!([
                signatures,
                SignatureStatusRequest {
                    search_transaction_history: config.search_transaction_history,
                }
            ]),
            None => json!([signatures]),
        };
        let response = wire::parse_envelope::<Vec<Option<WireSignatureStatus>>>(
            method,
            self.call(method, params).await?,
        )?;

        if response.value.len() != signatures.len() {
            return Err(CompatError::UnexpectedResponse {
                method,
                reason: format!(
                    "requested {} statuses, received {}",
                    signatures.len(),
                    response.value.len()
                ),
            });
        }

        let statuses = response
            .value
            .into_iter()
            .map(|status| status.map(WireSignatureStatus::into_status).transpose())
            .collect::<CompatResult<Vec<_>>>()?;

        Ok(RpcResponse {
            context: response.context,
            value: statuses,
        })
    }

    /// Submit a transaction, returning its signature
    pub async fn send_raw_transaction(
        &self,
        transaction: impl Into<RawTransaction>,
        options: Option<SendOptions>,
    ) -> CompatResult<String> {
        let bytes = transaction.into().to_bytes()?;
        let options = options.unwrap_or_default();
        let method = RpcRequest::SendTransaction;
        let params = json!([
            BASE64_STANDARD.encode(bytes),
            SendTransactionRequest {
                encoding: DataEncoding::Base64,
                skip_preflight: options.skip_preflight,
                preflight_commitment: options.preflight_commitment,
                max_retries: options.max_retries,
                min_context_slot: options.min_context_slot,
            }
        ]);

        let signature: String = wire::parse(method, self.call(method, params).await?)?;
        debug!("Submitted transaction {}", signature);
        Ok(signature)
    }

    /// Dry-run a transaction. Signature verification is off unless asked for.
    pub async fn simulate_transaction(
        &self,
        transaction: impl Into<RawTransaction>,
        config: Option<SimulateConfig>,
    ) -> CompatResult<RpcResponse<SimulatedTransactionResponse>> {
        let bytes = transaction.into().to_bytes()?;
        let config = config.unwrap_or_default();
        let method = RpcRequest::SimulateTransaction;
        let params = json!([
            BASE64_STANDARD.encode(bytes),
            SimulateTransactionRequest {
                encoding: DataEncoding::Base64,
                sig_verify: config.sig_verify.unwrap_or(false),
                replace_recent_blockhash: config.replace_recent_blockhash,
                commitment: self.resolve(config.commitment),
                min_context_slot: config.min_context_slot,
                accounts: config.accounts.map(|accounts| SimulateAccountsRequest {
                    addresses: accounts.addresses,
                    encoding: accounts.encoding.unwrap_or(DataEncoding::Base64),
                }),
                inner_instructions: config.inner_instructions,
            }
        ]);

        let response =
            wire::parse_envelope::<WireSimulation>(method, self.call(method, params).await?)?;
        let simulation = response.value;

        let accounts = simulation
            .accounts
            .map(|accounts| {
                accounts
                    .into_iter()
                    .map(convert_simulated_account)
                    .collect::<CompatResult<Vec<_>>>()
            })
            .transpose()?;

        Ok(RpcResponse {
            context: response.context,
            value: SimulatedTransactionResponse {
                accounts,
                err: simulation.err,
                logs: simulation.logs,
                return_data: simulation.return_data,
                units_consumed: wire::widen_opt(
                    simulation.units_consumed.as_ref(),
                    "unitsConsumed",
                )?,
            },
        })
    }

    /// Ask the node's faucet for `lamports`, returning the airdrop signature
    pub async fn request_airdrop(
        &self,
        address: impl IntoAddress,
        lamports: u64,
        commitment: impl Into<Option<Commitment>>,
    ) -> CompatResult<String> {
        let address = address.into_address()?;
        let method = RpcRequest::RequestAirdrop;
        let params = json!([
            address,
            lamports,
            CommitmentConfig {
                commitment: self.resolve(commitment.into()),
            }
        ]);

        let signature: String = wire::parse(method, self.call(method, params).await?)?;
        debug!("Requested airdrop of {} lamports to {}: {}", lamports, address, signature);
        Ok(signature)
    }
}

fn convert_program_account(method: RpcRequest, entry: Value) -> CompatResult<ProgramAccount> {
    let entry: WireProgramAccount = wire::parse(method, entry)?;
    let pubkey = entry.pubkey.parse::<Address>()?.into();
    Ok(ProgramAccount {
        pubkey,
        account: entry.account.into_account_info()?,
    })
}

/// Null or non-account entries read as `None`
fn convert_simulated_account(entry: Value) -> CompatResult<Option<SimulatedAccountInfo>> {
    match serde_json::from_value::<WireAccount>(entry) {
        Ok(account) => account.into_simulated().map(Some),
        Err(_) => Ok(None),
    }
}
