//! End-to-end pipeline scenarios against the mock network and wallet

use std::sync::Arc;

use crate::config::Config;
use crate::deployer::{DeployError, TokenDeployer};
use crate::test_utils::{valid_request, MockNetworkClient, MockRemoteSigner};
use crate::types::{DeploymentOutcome, DeploymentRequest};
use crate::wallet::RemoteSigner;

const RENT_LAMPORTS: u64 = 1_461_600;

fn deployer(
    network: &MockNetworkClient,
    signer: &MockRemoteSigner,
) -> TokenDeployer<MockNetworkClient, MockRemoteSigner> {
    TokenDeployer::new(
        Arc::new(network.clone()),
        Arc::new(signer.clone()),
        &Config::default(),
    )
}

fn fast_deployer(
    network: &MockNetworkClient,
    signer: &MockRemoteSigner,
) -> TokenDeployer<MockNetworkClient, MockRemoteSigner> {
    let mut config = Config::default();
    config.confirm.deadline_secs = 1;
    config.confirm.poll_interval_ms = 10;
    TokenDeployer::new(Arc::new(network.clone()), Arc::new(signer.clone()), &config)
}

/// Scenario A: valid request, owner signs, network accepts and confirms
#[tokio::test]
async fn test_scenario_a_confirmed_deployment() {
    let network = MockNetworkClient::new(RENT_LAMPORTS);
    let signer = MockRemoteSigner::approving();
    let deployer = deployer(&network, &signer);

    let outcome = deployer.deploy(valid_request()).await;

    match outcome {
        DeploymentOutcome::Confirmed { mint, signature } => {
            assert_ne!(mint, signer.pubkey(), "mint must be a fresh address");
            assert_eq!(signature, network.mock_signature());
        }
        other => panic!("expected Confirmed, got {:?}", other),
    }
    assert_eq!(network.submit_calls().await, 1);
}

/// Scenario B: owner declines to sign; nothing is submitted
#[tokio::test]
async fn test_scenario_b_declined_signature() {
    let network = MockNetworkClient::new(RENT_LAMPORTS);
    let signer = MockRemoteSigner::declining();
    let deployer = deployer(&network, &signer);

    let outcome = deployer.deploy(valid_request()).await;

    assert!(matches!(outcome, DeploymentOutcome::Rejected { .. }));
    assert_eq!(network.submit_calls().await, 0);
}

/// Scenario C: empty name; pipeline halts before identity generation and
/// before any network call
#[tokio::test]
async fn test_scenario_c_validation_halts_pipeline() {
    let network = MockNetworkClient::new(RENT_LAMPORTS);
    let signer = MockRemoteSigner::approving();
    let deployer = deployer(&network, &signer);

    let request = DeploymentRequest {
        name: String::new(),
        symbol: "X".to_string(),
        decimals: 9,
        supply: 1,
        image: None,
        description: None,
        uri: None,
    };
    let outcome = deployer.deploy(request).await;

    assert!(matches!(outcome, DeploymentOutcome::Rejected { .. }));
    assert_eq!(network.rent_calls().await, 0);
    assert_eq!(network.blockhash_calls().await, 0);
    assert_eq!(network.submit_calls().await, 0);
    assert_eq!(signer.sign_calls().await, 0);
}

/// Scenario D: submission succeeds but confirmation never arrives; one
/// submission only, outcome keeps the signature
#[tokio::test(start_paused = true)]
async fn test_scenario_d_confirmation_timeout() {
    let network = MockNetworkClient::new(RENT_LAMPORTS);
    network.never_confirm().await;
    let signer = MockRemoteSigner::approving();
    let deployer = fast_deployer(&network, &signer);

    let outcome = deployer.deploy(valid_request()).await;

    match outcome {
        DeploymentOutcome::ConfirmationTimedOut { signature } => {
            assert_eq!(signature, network.mock_signature());
        }
        other => panic!("expected ConfirmationTimedOut, got {:?}", other),
    }
    assert_eq!(network.submit_calls().await, 1);
    assert!(network.status_calls().await > 1, "should have polled");
}

/// Rent estimation failure surfaces before any signature is requested
#[tokio::test]
async fn test_unreachable_network_fails_before_signing() {
    let network = MockNetworkClient::new(RENT_LAMPORTS);
    network.fail_rent("connection refused").await;
    let signer = MockRemoteSigner::approving();
    let deployer = deployer(&network, &signer);

    let outcome = deployer.deploy(valid_request()).await;

    assert!(matches!(outcome, DeploymentOutcome::SubmissionFailed { .. }));
    assert_eq!(signer.sign_calls().await, 0);
    assert_eq!(network.submit_calls().await, 0);
}

/// Wallet connectivity failure is a network error, not a decline
#[tokio::test]
async fn test_unreachable_wallet_is_not_a_decline() {
    let network = MockNetworkClient::new(RENT_LAMPORTS);
    let signer = MockRemoteSigner::unreachable();
    let deployer = deployer(&network, &signer);

    let err = deployer.try_deploy(valid_request()).await.unwrap_err();

    assert!(matches!(err, DeployError::Network(_)));
    assert!(err.is_retryable());
    assert_eq!(network.submit_calls().await, 0);
}

/// Node-side rejection (e.g. insufficient owner balance) maps to
/// SubmissionFailed, distinct from a timeout
#[tokio::test]
async fn test_node_rejection_is_submission_failed() {
    let network = MockNetworkClient::new(RENT_LAMPORTS);
    network.reject_submission("insufficient funds for rent").await;
    let signer = MockRemoteSigner::approving();
    let deployer = deployer(&network, &signer);

    let outcome = deployer.deploy(valid_request()).await;

    match outcome {
        DeploymentOutcome::SubmissionFailed { reason } => {
            assert!(reason.contains("insufficient funds"));
        }
        other => panic!("expected SubmissionFailed, got {:?}", other),
    }
}

/// Idempotence: retrying after a failure produces a fresh, independent
/// asset identity, never reusing the prior attempt's address
#[tokio::test]
async fn test_retry_uses_fresh_asset_identity() {
    let network = MockNetworkClient::new(RENT_LAMPORTS);
    let signer = MockRemoteSigner::approving();
    let deployer = deployer(&network, &signer);

    let first = deployer.deploy(valid_request()).await;
    let second = deployer.deploy(valid_request()).await;

    let first_mint = first.mint().expect("first attempt should confirm");
    let second_mint = second.mint().expect("second attempt should confirm");
    assert_ne!(first_mint, second_mint);
}

/// Two attempts may run concurrently; they share only the network client
#[tokio::test]
async fn test_concurrent_attempts_are_independent() {
    let network = MockNetworkClient::new(RENT_LAMPORTS);
    let signer = MockRemoteSigner::approving();
    let deployer = deployer(&network, &signer);

    let (a, b) = tokio::join!(
        deployer.deploy(valid_request()),
        deployer.deploy(valid_request())
    );

    let mint_a = a.mint().expect("attempt a should confirm");
    let mint_b = b.mint().expect("attempt b should confirm");
    assert_ne!(mint_a, mint_b);
    assert_eq!(network.submit_calls().await, 2);
}

/// A confirmation that needs several polls still confirms within deadline
#[tokio::test]
async fn test_confirmation_after_several_polls() {
    let network = MockNetworkClient::new(RENT_LAMPORTS);
    network.queue_status(crate::rpc::TxStatus::Unconfirmed).await;
    network.queue_status(crate::rpc::TxStatus::Unconfirmed).await;
    let signer = MockRemoteSigner::approving();
    let deployer = fast_deployer(&network, &signer);

    let outcome = deployer.deploy(valid_request()).await;

    assert!(outcome.is_confirmed());
    assert!(network.status_calls().await >= 3);
}
