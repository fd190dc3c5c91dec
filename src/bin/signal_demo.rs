// End-to-end signaling walkthrough against a sled-backed deployment
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use group_signaling_bc::{
    Address, CallContext, EncodedInput, FieldElement, MembershipTree, ProofEncoder,
    ProvingProfile, SequentialTree, SignalProof, SignalingDeployment, SledStore, StaticVerifier,
};

#[derive(Parser)]
#[command(name = "signal-demo", about = "Anonymous group signaling demo")]
struct Args {
    /// Data directory for the sled store; a temp dir is used when omitted
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Root-history ring-buffer capacity (0 = default)
    #[arg(long, default_value_t = 0)]
    root_history: usize,

    /// Membership-tree depth encoded in the proving profile
    #[arg(long, default_value_t = 20)]
    tree_depth: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    tracing::info!("🧩 Anonymous group signaling demo");

    let tmp;
    let data_dir = match &args.data_dir {
        Some(dir) => dir.clone(),
        None => {
            tmp = tempfile::tempdir()?;
            tmp.path().to_path_buf()
        }
    };

    let store = Arc::new(SledStore::open(&data_dir)?);
    let verifier = Arc::new(StaticVerifier::accepting());
    let deployment = SignalingDeployment::new(store, verifier, args.root_history);

    // Tail the event stream the way an external indexer would
    let mut events = deployment.subscribe_events();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            tracing::info!(?event, "📡 event");
        }
    });

    let admin = Address::from_data(b"demo-admin");
    let ctx = CallContext::new(admin, 0);
    let group = 1;

    deployment.registry().create(&ctx, group).await?;
    tracing::info!(group, "✅ group created");

    // Off-chain collaborator: commitments in, roots out
    let mut tree = SequentialTree::new();
    let mut last_root = FieldElement::zero();
    for name in ["alice", "bob", "carol"] {
        let commitment = FieldElement(rand::random::<[u8; 32]>());
        tree.insert(commitment);
        last_root = tree.root();
        let index = deployment
            .registry()
            .add_member(&ctx, group, commitment, last_root)
            .await?;
        tracing::info!(member = name, index, root = %last_root, "✅ member added");
    }

    // Proof arrives from the proving collaborator as loosely-typed JSON
    let proof_json = serde_json::json!({
        "pi_a": ["0x1", "0x2", "1"],
        "pi_b": [["0x3", "0x4"], ["0x5", "0x6"], ["1", "0"]],
        "pi_c": ["0x7", "0x8", "1"],
        "publicSignals": [
            format!("0x{}", last_root.to_hex()),
            "0xcafe",
            "0x1234",
            "0x42",
        ],
    });
    let proof = SignalProof::from_json(&proof_json)?;

    let encoder = ProofEncoder::new(ProvingProfile::bn254_groth16(args.tree_depth));
    let input = encoder.encode(&proof).await?;
    match &input {
        EncodedInput::Calldata(values) => {
            tracing::info!(len = values.len(), "✅ proof encoded");
        }
        EncodedInput::Diagnostic(export) => {
            tracing::warn!(note = %export.note, "⚠️  manual export only, not submitting");
            return Ok(());
        }
    }

    let receipt = deployment.processor().submit(group, &input).await?;
    tracing::info!(nullifier = %receipt.nullifier, "✅ signal accepted");

    match deployment.processor().submit(group, &input).await {
        Err(e) => tracing::info!(error = %e, "✅ replay rejected"),
        Ok(_) => anyhow::bail!("replay unexpectedly accepted"),
    }

    // Two-step admin handover
    let successor = Address::from_data(b"demo-successor");
    deployment.admin().propose(&ctx, group, successor).await?;
    deployment
        .admin()
        .accept(&CallContext::new(successor, 0), group)
        .await?;
    tracing::info!(new_admin = %successor, "✅ admin transfer complete");

    tracing::info!("🎉 demo complete");
    Ok(())
}
