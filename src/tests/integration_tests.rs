// Full-lifecycle integration tests
use std::sync::Arc;

use crate::encoder::{ProofEncoder, ProvingProfile, SignalProof};
use crate::primitives::{Address, CallContext, FieldElement, SignalingError, SignalingEvent};
use crate::storage::{MemoryStore, SledStore};
use crate::tree::{MembershipTree, SequentialTree};
use crate::verifier::StaticVerifier;
use crate::SignalingDeployment;

fn admin_ctx() -> CallContext {
    CallContext::new(Address::from_data(b"admin"), 0)
}

#[tokio::test]
async fn test_event_stream_reconstructs_history() {
    let deployment = SignalingDeployment::new(
        Arc::new(MemoryStore::new()),
        Arc::new(StaticVerifier::accepting()),
        0,
    );
    let ctx = admin_ctx();
    let mut events = deployment.subscribe_events();

    let successor = Address::from_data(b"successor");
    deployment.registry().create(&ctx, 1).await.unwrap();
    deployment
        .registry()
        .add_member(&ctx, 1, FieldElement::from_u64(0xc1), FieldElement::from_u64(0xaaa))
        .await
        .unwrap();
    deployment
        .registry()
        .remove_member(&ctx, 1, FieldElement::from_u64(0xc1), FieldElement::from_u64(0xbbb))
        .await
        .unwrap();
    deployment.admin().propose(&ctx, 1, successor).await.unwrap();
    deployment
        .admin()
        .accept(&CallContext::new(successor, 0), 1)
        .await
        .unwrap();

    let expected = [
        SignalingEvent::GroupCreated {
            id: 1,
            admin: ctx.caller,
        },
        SignalingEvent::MemberAdded {
            id: 1,
            member_ref: FieldElement::from_u64(0xc1),
            index: 0,
            root: FieldElement::from_u64(0xaaa),
        },
        SignalingEvent::MemberRemoved {
            id: 1,
            member_ref: FieldElement::from_u64(0xc1),
            root: FieldElement::from_u64(0xbbb),
        },
        SignalingEvent::AdminTransferProposed {
            id: 1,
            from: ctx.caller,
            to: successor,
        },
        SignalingEvent::AdminTransferAccepted {
            id: 1,
            new_admin: successor,
        },
    ];
    for expectation in expected {
        assert_eq!(events.recv().await.unwrap(), expectation);
    }

    println!("✅ Event stream reconstructs the full history");
}

#[tokio::test]
async fn test_signal_accepted_event_carries_outputs() {
    let deployment = SignalingDeployment::new(
        Arc::new(MemoryStore::new()),
        Arc::new(StaticVerifier::accepting()),
        0,
    );
    let ctx = admin_ctx();
    deployment.registry().create(&ctx, 1).await.unwrap();
    deployment
        .registry()
        .add_member(&ctx, 1, FieldElement::from_u64(1), FieldElement::from_u64(0xaaa))
        .await
        .unwrap();

    let mut events = deployment.subscribe_events();
    let mut values: Vec<FieldElement> = (1..=8u64).map(FieldElement::from_u64).collect();
    values.extend([
        FieldElement::from_u64(0xaaa),
        FieldElement::from_u64(0xcafe),
        FieldElement::from_u64(0x1234),
        FieldElement::from_u64(0x42),
    ]);
    deployment
        .processor()
        .submit(1, &crate::encoder::EncodedInput::Calldata(values))
        .await
        .unwrap();

    assert_eq!(
        events.recv().await.unwrap(),
        SignalingEvent::SignalAccepted {
            id: 1,
            nullifier: FieldElement::from_u64(0xcafe),
            message: FieldElement::from_u64(0x1234),
            scope: FieldElement::from_u64(0x42),
        }
    );
}

#[tokio::test]
async fn test_sled_deployment_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = admin_ctx();
    let nullifier = FieldElement::from_u64(0xcafe);

    {
        let store = Arc::new(SledStore::open(dir.path()).unwrap());
        let deployment =
            SignalingDeployment::new(store, Arc::new(StaticVerifier::accepting()), 0);
        deployment.registry().create(&ctx, 1).await.unwrap();
        deployment
            .registry()
            .add_member(&ctx, 1, FieldElement::from_u64(1), FieldElement::from_u64(0xaaa))
            .await
            .unwrap();

        let mut values: Vec<FieldElement> = (1..=8u64).map(FieldElement::from_u64).collect();
        values.extend([
            FieldElement::from_u64(0xaaa),
            nullifier,
            FieldElement::from_u64(0x1234),
            FieldElement::from_u64(0x42),
        ]);
        deployment
            .processor()
            .submit(1, &crate::encoder::EncodedInput::Calldata(values))
            .await
            .unwrap();
    }

    let store = Arc::new(SledStore::open(dir.path()).unwrap());
    let deployment = SignalingDeployment::new(store, Arc::new(StaticVerifier::accepting()), 0);

    assert!(deployment.registry().exists(1).await);
    assert_eq!(deployment.registry().member_count(1).await.unwrap(), 1);
    assert!(
        deployment
            .registry()
            .is_valid_root(1, &FieldElement::from_u64(0xaaa))
            .await
            .unwrap()
    );
    assert!(deployment.ledger().is_used(&nullifier).await.unwrap());

    // The replay guard holds across restarts
    let mut values: Vec<FieldElement> = (1..=8u64).map(FieldElement::from_u64).collect();
    values.extend([
        FieldElement::from_u64(0xaaa),
        nullifier,
        FieldElement::from_u64(0x9999),
        FieldElement::from_u64(0x42),
    ]);
    assert!(matches!(
        deployment
            .processor()
            .submit(1, &crate::encoder::EncodedInput::Calldata(values))
            .await,
        Err(SignalingError::NullifierReused)
    ));

    println!("✅ Sled-backed deployment survives reopen");
}

#[tokio::test]
async fn test_tree_to_signal_pipeline() {
    let deployment = SignalingDeployment::new(
        Arc::new(MemoryStore::new()),
        Arc::new(StaticVerifier::accepting()),
        0,
    );
    let ctx = admin_ctx();
    deployment.registry().create(&ctx, 7).await.unwrap();

    // Roots come from the off-chain collaborator; the registry only
    // records and compares them
    let mut tree = SequentialTree::new();
    for seed in 0..3u64 {
        let commitment = FieldElement::from_u64(1000 + seed);
        let leaf = tree.insert(commitment);
        let index = deployment
            .registry()
            .add_member(&ctx, 7, commitment, tree.root())
            .await
            .unwrap();
        assert_eq!(index, leaf);
    }
    let root = tree.root();

    // Proof handoff in the proving system's loose JSON shape
    let proof_json = serde_json::json!({
        "pi_a": ["0x1", "0x2", "1"],
        "pi_b": [["0x3", "0x4"], ["0x5", "0x6"], ["1", "0"]],
        "pi_c": ["0x7", "0x8", "1"],
        "publicSignals": [
            format!("0x{}", root.to_hex()),
            "0xcafe",
            "0x1234",
            "0x42",
        ],
    });
    let proof = SignalProof::from_json(&proof_json).unwrap();

    let encoder = ProofEncoder::new(ProvingProfile::bn254_groth16(20));
    let input = encoder.encode(&proof).await.unwrap();
    assert!(input.is_usable());
    encoder.validate_length(input.calldata().unwrap()).unwrap();

    let receipt = deployment.processor().submit(7, &input).await.unwrap();
    assert_eq!(receipt.nullifier, FieldElement::from_u64(0xcafe));

    println!("✅ Tree → proof → encoder → signal pipeline works");
}
