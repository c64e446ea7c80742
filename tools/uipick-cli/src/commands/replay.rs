//! Replay a recorded gesture stream through the capture manager.

use std::path::PathBuf;

use uipick_capture_engine::{
    CaptureManager, DecisionJournal, DecisionRecord, JournalHeader, PickerHost, PickerKind,
};
use uipick_common::config::AppConfig;
use uipick_target_contract::TargetContract;
use uipick_ui_model::{parse_events, MemoryTree};

pub fn run(
    tree_path: PathBuf,
    events_path: PathBuf,
    kind: PickerKind,
    journal_path: Option<PathBuf>,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let tree = MemoryTree::load(&tree_path)
        .map_err(|e| anyhow::anyhow!("Failed to load tree: {e}"))?;
    let content = std::fs::read_to_string(&events_path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", events_path.display()))?;
    let events = parse_events(&content)?;
    tracing::debug!(
        tree_nodes = tree.len(),
        events = events.len(),
        kind = %kind,
        "Replay inputs loaded"
    );

    let mut journal = journal_path
        .map(|path| {
            DecisionJournal::create(&path, &JournalHeader::new(events_path.display().to_string()))
        })
        .transpose()?;

    let manager = CaptureManager::new(
        config.capture.clone(),
        TargetContract::new(config.contract.clone()),
        Box::new(uipick_capture_engine::NoopHooks),
    );
    let mut host = PickerHost::new(manager);
    host.arm(kind);

    println!(
        "Replaying {} event(s) from {} with '{kind}' armed",
        events.len(),
        events_path.display()
    );
    println!();

    let mut resolved = 0usize;
    let mut suppressed = 0usize;
    for event in &events {
        let event = tree.locate(event.clone());
        let dispatch = host.dispatch(&tree, &event);
        if dispatch.is_resolved() {
            resolved += 1;
        }
        if dispatch.is_suppressed() {
            suppressed += 1;
        }

        let token = dispatch
            .token
            .map(|t| format!(" token={t:?}"))
            .unwrap_or_default();
        println!(
            "  t={:>6} {:<6} ({:>7.1},{:>7.1}) {:<20} {}{}{token}",
            event.timestamp_ms,
            format!("{:?}", event.phase).to_lowercase(),
            event.x,
            event.y,
            dispatch.outcome.as_str(),
            dispatch.root_id.as_deref().unwrap_or("-"),
            if dispatch.is_suppressed() { " [suppressed]" } else { "" },
        );

        if let Some(journal) = journal.as_mut() {
            journal.write_record(&DecisionRecord::from_dispatch(&event, &dispatch, Some(kind)))?;
        }
    }

    println!();
    println!("Resolved picks: {resolved}");
    println!("Suppressed events: {suppressed}");
    match host.selection(kind) {
        Some(target) => println!(
            "Selected {kind}: {} (surface on root: {})",
            target.id, target.surface_is_root
        ),
        None => println!("Selected {kind}: none"),
    }

    if let Some(mut journal) = journal {
        journal.flush()?;
        println!(
            "Journal: {} record(s) written to {}",
            journal.records_written(),
            journal.path().display()
        );
    }

    Ok(())
}
