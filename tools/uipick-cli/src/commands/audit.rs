//! Audit every target in a tree fixture.

use std::path::PathBuf;

use uipick_capture_engine::{PickerCoverage, PickerKind};
use uipick_common::config::AppConfig;
use uipick_target_contract::TargetContract;
use uipick_ui_model::MemoryTree;

pub fn run(tree_path: PathBuf, json: bool, config: &AppConfig) -> anyhow::Result<()> {
    let tree = MemoryTree::load(&tree_path)
        .map_err(|e| anyhow::anyhow!("Failed to load tree: {e}"))?;
    let report = TargetContract::new(config.contract.clone()).audit(&tree);
    let coverage = PickerCoverage::of_tree(&tree);

    if json {
        let mut value = serde_json::to_value(&report)?;
        value["pickers"] = serde_json::to_value(&coverage)?;
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("Auditing targets in: {}", tree_path.display());
        println!("  Nodes: {}", tree.len());
        println!("  Targets: {}", report.targets);
        println!("  Valid: {}", report.valid);
        println!("  Invalid: {}", report.invalid());

        println!("\nPicker coverage:");
        for kind in PickerKind::ALL {
            println!("  {:<10} {}", kind.as_str(), coverage.count(kind));
        }
        if !coverage.plates_without_preset.is_empty() {
            println!("\nPlates without a preset:");
            for id in &coverage.plates_without_preset {
                println!("  - {id}");
            }
        }

        if !report.is_clean() {
            println!("\nViolations:");
            for entry in &report.violations {
                let reasons: Vec<&str> = entry.reasons.iter().map(|r| r.code()).collect();
                println!(
                    "  - {} ({} node(s)): {}",
                    entry.violation_key,
                    entry.nodes.len(),
                    reasons.join(", ")
                );
            }

            println!("\nBy reason:");
            for (reason, count) in report.reason_counts() {
                println!("  {:<32} {count}", reason.code());
            }
        }
    }

    if report.is_clean() {
        if !json {
            println!("\nAll targets satisfy the contract.");
        }
        Ok(())
    } else {
        anyhow::bail!("{} target(s) violate the contract", report.invalid())
    }
}
