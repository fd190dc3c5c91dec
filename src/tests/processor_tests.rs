// Signal processor state machine tests
use std::sync::Arc;

use crate::encoder::{EncodedInput, ManualExport};
use crate::primitives::{Address, CallContext, FieldElement, Policy, SignalingError};
use crate::storage::MemoryStore;
use crate::verifier::StaticVerifier;
use crate::SignalingDeployment;

fn admin_ctx() -> CallContext {
    CallContext::new(Address::from_data(b"admin"), 0)
}

fn deployment() -> SignalingDeployment {
    SignalingDeployment::new(
        Arc::new(MemoryStore::new()),
        Arc::new(StaticVerifier::accepting()),
        0,
    )
}

fn calldata_for(root: u64, nullifier: u64, message: u64, scope: u64) -> EncodedInput {
    let mut values: Vec<FieldElement> = (1..=Policy::PROOF_COORDINATES as u64)
        .map(FieldElement::from_u64)
        .collect();
    values.extend([
        FieldElement::from_u64(root),
        FieldElement::from_u64(nullifier),
        FieldElement::from_u64(message),
        FieldElement::from_u64(scope),
    ]);
    EncodedInput::Calldata(values)
}

#[tokio::test]
async fn test_end_to_end_signal_scenario() {
    let deployment = deployment();
    let ctx = admin_ctx();
    let registry = deployment.registry();

    registry.create(&ctx, 1).await.unwrap();
    registry
        .add_member(&ctx, 1, FieldElement::from_u64(0xc1), FieldElement::from_u64(0xaaa))
        .await
        .unwrap();
    assert_eq!(registry.member_count(1).await.unwrap(), 1);

    registry
        .add_member(&ctx, 1, FieldElement::from_u64(0xc2), FieldElement::from_u64(0xbbb))
        .await
        .unwrap();
    assert_eq!(registry.member_count(1).await.unwrap(), 2);
    assert_eq!(
        registry.current_root(1).await.unwrap(),
        FieldElement::from_u64(0xbbb)
    );
    assert!(
        registry
            .is_valid_root(1, &FieldElement::from_u64(0xaaa))
            .await
            .unwrap()
    );

    // Signal against the older, still-windowed root
    let input = calldata_for(0xaaa, 0xcafe, 0x1234, 0x42);
    let receipt = deployment.processor().submit(1, &input).await.unwrap();
    assert_eq!(receipt.nullifier, FieldElement::from_u64(0xcafe));
    assert_eq!(receipt.message, FieldElement::from_u64(0x1234));
    assert_eq!(receipt.scope, FieldElement::from_u64(0x42));
    assert!(
        deployment
            .ledger()
            .is_used(&FieldElement::from_u64(0xcafe))
            .await
            .unwrap()
    );

    // Identical replay is blocked by the consumed nullifier
    assert!(matches!(
        deployment.processor().submit(1, &input).await,
        Err(SignalingError::NullifierReused)
    ));

    // An unknown root never validates
    let bad_root = calldata_for(0xbadbad, 0xd00d, 0x1234, 0x42);
    assert!(matches!(
        deployment.processor().submit(1, &bad_root).await,
        Err(SignalingError::RootMismatch)
    ));

    println!("✅ End-to-end signal scenario works");
}

#[tokio::test]
async fn test_nullifier_exhaustion_spans_historical_roots() {
    let deployment = deployment();
    let ctx = admin_ctx();
    let registry = deployment.registry();

    registry.create(&ctx, 1).await.unwrap();
    registry
        .add_member(&ctx, 1, FieldElement::from_u64(1), FieldElement::from_u64(0xaaa))
        .await
        .unwrap();
    registry
        .add_member(&ctx, 1, FieldElement::from_u64(2), FieldElement::from_u64(0xbbb))
        .await
        .unwrap();

    deployment
        .processor()
        .submit(1, &calldata_for(0xaaa, 0xcafe, 1, 7))
        .await
        .unwrap();

    // Same nullifier under the other historically-valid root: the identity
    // is exhausted for the scope, the root does not matter
    assert!(matches!(
        deployment
            .processor()
            .submit(1, &calldata_for(0xbbb, 0xcafe, 2, 7))
            .await,
        Err(SignalingError::NullifierReused)
    ));
}

#[tokio::test]
async fn test_missing_group_rejected_before_verification() {
    let deployment = deployment();
    assert!(matches!(
        deployment
            .processor()
            .submit(9, &calldata_for(1, 2, 3, 4))
            .await,
        Err(SignalingError::NotFound(9))
    ));
}

#[tokio::test]
async fn test_verifier_errors_collapse_to_invalid_proof() {
    let deployment = SignalingDeployment::new(
        Arc::new(MemoryStore::new()),
        Arc::new(StaticVerifier::rejecting()),
        0,
    );
    let ctx = admin_ctx();
    deployment.registry().create(&ctx, 1).await.unwrap();

    assert!(matches!(
        deployment
            .processor()
            .submit(1, &calldata_for(1, 2, 3, 4))
            .await,
        Err(SignalingError::InvalidProof)
    ));
}

#[tokio::test]
async fn test_short_public_outputs_are_malformed() {
    let deployment = deployment();
    let ctx = admin_ctx();
    deployment.registry().create(&ctx, 1).await.unwrap();

    // Eight coordinates and only two trailing values
    let mut values: Vec<FieldElement> = (1..=Policy::PROOF_COORDINATES as u64)
        .map(FieldElement::from_u64)
        .collect();
    values.extend([FieldElement::from_u64(1), FieldElement::from_u64(2)]);

    assert!(matches!(
        deployment
            .processor()
            .submit(1, &EncodedInput::Calldata(values))
            .await,
        Err(SignalingError::MalformedPublicInputs(_))
    ));
}

#[tokio::test]
async fn test_diagnostic_payload_never_reaches_verifier() {
    let deployment = deployment();
    let ctx = admin_ctx();
    deployment.registry().create(&ctx, 1).await.unwrap();

    let diagnostic = EncodedInput::Diagnostic(ManualExport {
        note: "manual".to_string(),
        proof_json: "{}".to_string(),
        reduced_publics: Vec::new(),
    });
    assert!(matches!(
        deployment.processor().submit(1, &diagnostic).await,
        Err(SignalingError::EncodingUnavailable)
    ));
}

#[tokio::test]
async fn test_concurrent_signals_same_nullifier_single_winner() {
    let deployment = Arc::new(deployment());
    let ctx = admin_ctx();
    deployment.registry().create(&ctx, 1).await.unwrap();
    deployment
        .registry()
        .add_member(&ctx, 1, FieldElement::from_u64(1), FieldElement::from_u64(0xaaa))
        .await
        .unwrap();

    let tasks: Vec<_> = (0..8u64)
        .map(|i| {
            let deployment = deployment.clone();
            tokio::spawn(async move {
                // Different messages, same (identity, scope) nullifier
                deployment
                    .processor()
                    .submit(1, &calldata_for(0xaaa, 0xcafe, 100 + i, 7))
                    .await
            })
        })
        .collect();
    let results = futures::future::join_all(tasks).await;

    let successes = results
        .into_iter()
        .filter(|joined| joined.as_ref().unwrap().is_ok())
        .count();
    assert_eq!(successes, 1);

    println!("✅ Concurrent signals for one nullifier admit a single winner");
}
