use base64::{prelude::BASE64_STANDARD, Engine};
use serde_json::json;
use solana_client::rpc_request::RpcRequest;
use solana_sdk::{
    hash::Hash,
    message::{v0, VersionedMessage},
    signer::Signer,
    transaction::{Transaction, VersionedTransaction},
};
use tokio_test::{assert_err, assert_ok};
use web3_compat::{
    compile_from_compat, send_and_confirm_transaction, system, BlockhashLifetime, Commitment,
    CompatError, CompileParams, ConnectionConfig, SendOptions, TransactionVersion,
};
use web3_compat_testing::{
    deterministic_keypair, deterministic_pubkey, scripted_connection, signature_status_json,
    single_status_response, ScriptedTransport,
};

/// Send-and-confirm signs a copy, submits it and polls until confirmed
///
/// **Test flow:**
/// 1. Build an unsigned legacy transfer
/// 2. Send with the payer plus an unrelated signer
/// 3. Verify the submitted bytes carry a valid payer signature
/// 4. Verify confirmation used the preflight commitment
#[tokio::test(start_paused = true)]
async fn test_send_and_confirm_legacy_transaction() {
    let payer = deterministic_keypair("payer");
    let bystander = deterministic_keypair("bystander");
    let recipient = deterministic_pubkey("recipient");
    let mut tx = Transaction::new_with_payer(
        &[system::transfer(&payer.pubkey(), &recipient, 5_000)],
        Some(&payer.pubkey()),
    );
    tx.message.recent_blockhash = Hash::new_from_array([6u8; 32]);

    let mut expected = tx.clone();
    expected.sign(&[&payer], expected.message.recent_blockhash);
    let expected_signature = expected.signatures[0].to_string();

    let transport = ScriptedTransport::new()
        .reply(RpcRequest::SendTransaction, json!(expected_signature))
        .reply(RpcRequest::GetSignatureStatuses, single_status_response(60, None))
        .reply(
            RpcRequest::GetSignatureStatuses,
            single_status_response(
                61,
                Some(signature_status_json(61, Some(1), Some("confirmed"), None)),
            ),
        )
        .into_arc();
    let connection = scripted_connection(&transport, Commitment::Finalized);

    let signature = assert_ok!(
        send_and_confirm_transaction(
            &connection,
            tx.clone(),
            &[&bystander, &payer],
            Some(SendOptions {
                preflight_commitment: Some(Commitment::Confirmed),
                ..Default::default()
            }),
        )
        .await
    );

    assert_eq!(signature, expected_signature);
    // The caller's transaction stays unsigned
    assert_eq!(tx.signatures[0], Default::default());

    let params = transport.last_params(RpcRequest::SendTransaction).unwrap();
    let wire = BASE64_STANDARD.decode(params[0].as_str().unwrap()).unwrap();
    let submitted: Transaction = bincode::deserialize(&wire).unwrap();
    assert_eq!(submitted, expected);
    assert_ok!(submitted.verify());

    assert_eq!(transport.calls(RpcRequest::GetSignatureStatuses), 2);
}

#[tokio::test(start_paused = true)]
async fn test_send_and_confirm_compiled_transaction() {
    let payer = deterministic_keypair("payer");
    let recipient = deterministic_pubkey("recipient");
    let compiled = compile_from_compat(CompileParams {
        fee_payer: payer.pubkey(),
        instructions: vec![system::transfer(&payer.pubkey(), &recipient, 10).into()],
        latest_blockhash: BlockhashLifetime {
            blockhash: Hash::new_from_array([2u8; 32]).to_string(),
            last_valid_block_height: 500,
        },
        version: TransactionVersion::V0,
    })
    .unwrap();

    let mut expected = compiled.clone();
    expected.sign(&[&payer]).unwrap();
    let expected_signature = expected.signatures()[0]
        .signature
        .as_ref()
        .unwrap()
        .to_string();

    let transport = ScriptedTransport::new()
        .reply(RpcRequest::SendTransaction, json!(expected_signature))
        .reply(
            RpcRequest::GetSignatureStatuses,
            single_status_response(
                70,
                Some(signature_status_json(70, None, Some("finalized"), None)),
            ),
        )
        .into_arc();
    let connection = scripted_connection(&transport, ConnectionConfig::default());

    let signature = assert_ok!(
        send_and_confirm_transaction(&connection, compiled, &[&payer], None).await
    );
    assert_eq!(signature, expected_signature);

    let params = transport.last_params(RpcRequest::SendTransaction).unwrap();
    let wire = BASE64_STANDARD.decode(params[0].as_str().unwrap()).unwrap();
    assert_eq!(wire, expected.to_wire_bytes().unwrap());
    let submitted: VersionedTransaction = bincode::deserialize(&wire).unwrap();
    assert_eq!(submitted.verify_with_results(), vec![true]);
    assert_eq!(params[1], json!({"encoding": "base64"}));
    assert_eq!(transport.calls(RpcRequest::GetSignatureStatuses), 1);
}

/// Versioned transactions go through the same sign, send and poll cycle
///
/// **Test flow:**
/// 1. Compile a v0 transfer with the SDK and leave `signatures` empty
/// 2. Send with an unrelated signer plus the payer
/// 3. Verify the submitted bytes decode to a verifying `VersionedTransaction`
/// 4. Verify the caller's copy is untouched and polling stopped at `processed`
#[tokio::test(start_paused = true)]
async fn test_send_and_confirm_versioned_transaction() {
    let payer = deterministic_keypair("payer");
    let bystander = deterministic_keypair("bystander");
    let recipient = deterministic_pubkey("recipient");
    let message = v0::Message::try_compile(
        &payer.pubkey(),
        &[system::transfer(&payer.pubkey(), &recipient, 42)],
        &[],
        Hash::new_from_array([8u8; 32]),
    )
    .unwrap();
    let tx = VersionedTransaction {
        signatures: vec![],
        message: VersionedMessage::V0(message),
    };

    let expected = VersionedTransaction::try_new(tx.message.clone(), &[&payer]).unwrap();
    let expected_signature = expected.signatures[0].to_string();

    let transport = ScriptedTransport::new()
        .reply(RpcRequest::SendTransaction, json!(expected_signature))
        .reply(RpcRequest::GetSignatureStatuses, single_status_response(80, None))
        .reply(
            RpcRequest::GetSignatureStatuses,
            single_status_response(
                81,
                Some(signature_status_json(81, Some(0), Some("processed"), None)),
            ),
        )
        .into_arc();
    let connection = scripted_connection(&transport, Commitment::Processed);

    let signature = assert_ok!(
        send_and_confirm_transaction(&connection, tx.clone(), &[&bystander, &payer], None).await
    );

    assert_eq!(signature, expected_signature);
    assert!(tx.signatures.is_empty());

    let params = transport.last_params(RpcRequest::SendTransaction).unwrap();
    let wire = BASE64_STANDARD.decode(params[0].as_str().unwrap()).unwrap();
    let submitted: VersionedTransaction = bincode::deserialize(&wire).unwrap();
    assert_eq!(submitted.verify_with_results(), vec![true]);
    assert_eq!(submitted, expected);

    assert_eq!(transport.calls(RpcRequest::GetSignatureStatuses), 2);
}

/// An unrecognized connection default cannot be satisfied, so confirmation
/// waits for `finalized` instead of running out the clock
#[tokio::test(start_paused = true)]
async fn test_unrecognized_default_confirms_at_finalized() {
    let payer = deterministic_keypair("payer");
    let mut tx = Transaction::new_with_payer(
        &[system::transfer(&payer.pubkey(), &deterministic_pubkey("recipient"), 3)],
        Some(&payer.pubkey()),
    );
    tx.message.recent_blockhash = Hash::new_from_array([9u8; 32]);

    let mut signed = tx.clone();
    signed.sign(&[&payer], signed.message.recent_blockhash);
    let expected_signature = signed.signatures[0].to_string();

    let transport = ScriptedTransport::new()
        .reply(RpcRequest::SendTransaction, json!(expected_signature))
        .reply(
            RpcRequest::GetSignatureStatuses,
            single_status_response(
                90,
                Some(signature_status_json(90, Some(2), Some("confirmed"), None)),
            ),
        )
        .reply(
            RpcRequest::GetSignatureStatuses,
            single_status_response(
                91,
                Some(signature_status_json(91, None, Some("finalized"), None)),
            ),
        )
        .into_arc();
    let connection = scripted_connection(&transport, Commitment::from("bogus"));

    let signature = assert_ok!(
        send_and_confirm_transaction(&connection, tx, &[&payer], None).await
    );

    assert_eq!(signature, expected_signature);
    assert_eq!(transport.calls(RpcRequest::GetSignatureStatuses), 2);
}

#[tokio::test]
async fn test_send_failure_skips_confirmation() {
    let payer = deterministic_keypair("payer");
    let mut tx = Transaction::new_with_payer(
        &[system::transfer(&payer.pubkey(), &deterministic_pubkey("recipient"), 1)],
        Some(&payer.pubkey()),
    );
    tx.message.recent_blockhash = Hash::new_from_array([4u8; 32]);

    let transport = ScriptedTransport::new()
        .fail(RpcRequest::SendTransaction, "blockhash not found")
        .into_arc();
    let connection = scripted_connection(&transport, ConnectionConfig::default());

    let error = assert_err!(send_and_confirm_transaction(&connection, tx, &[&payer], None).await);

    assert!(matches!(error, CompatError::Transport(_)));
    assert_eq!(transport.calls(RpcRequest::GetSignatureStatuses), 0);
}
