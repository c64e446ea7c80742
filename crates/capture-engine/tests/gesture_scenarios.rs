use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use proptest::prelude::*;
use uipick_capture_engine::{
    CaptureManager, PickerCoverage, PickerHost, PickerKind, ResolutionOutcome, ResolvedPick,
    TokenCheck,
};
use uipick_target_contract::{validate, Violation};
use uipick_ui_model::{parse_events, MemoryTree, NodeSpec, PointerEvent, PointerKind};

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("home-hub")
}

fn load_fixture_tree() -> MemoryTree {
    MemoryTree::load(&fixture_dir().join("tree.json")).expect("fixture tree should load")
}

fn load_fixture_events() -> Vec<PointerEvent> {
    let content = std::fs::read_to_string(fixture_dir().join("gesture.jsonl"))
        .expect("fixture events should be readable");
    parse_events(&content).expect("fixture events should parse")
}

/// One button target: `controls:homeHub:nav` at (0,0)-(100,40).
fn nav_tree() -> MemoryTree {
    MemoryTree::from_spec(
        NodeSpec::element("body").bounds(0.0, 0.0, 1000.0, 1000.0).child(
            NodeSpec::element("button")
                .key("nav")
                .bounds(0.0, 0.0, 100.0, 40.0)
                .target("controls:homeHub:nav")
                .scope("role")
                .role_group("homeHub")
                .surface(),
        ),
    )
}

type Picks = Rc<RefCell<Vec<ResolvedPick>>>;

fn recorder() -> (Picks, impl FnMut(&ResolvedPick) + 'static) {
    let picks: Picks = Rc::new(RefCell::new(Vec::new()));
    let sink = picks.clone();
    (picks, move |p: &ResolvedPick| sink.borrow_mut().push(p.clone()))
}

fn armed(kind: PickerKind) -> (CaptureManager, Picks) {
    let mut manager = CaptureManager::with_defaults();
    manager.attach();
    let (picks, on_pick) = recorder();
    manager.start_picking(kind, on_pick);
    (manager, picks)
}

#[test]
fn scenario_a_controls_pick_resolves_root_surface() {
    let tree = nav_tree();
    let (mut manager, picks) = armed(PickerKind::Controls);

    let dispatch = manager.handle_event(&tree, &tree.locate(PointerEvent::down(0, 50.0, 20.0)));
    assert!(dispatch.is_resolved());

    let picks = picks.borrow();
    assert_eq!(picks.len(), 1);
    let v = &picks[0].validation;
    assert!(v.ok);
    assert_eq!(v.root_id.as_deref(), Some("controls:homeHub:nav"));
    assert!(v.surface_is_root);
}

#[test]
fn scenario_b_plates_filter_skips_control() {
    let tree = nav_tree();
    let (mut manager, picks) = armed(PickerKind::Plates);

    let down = manager.handle_event(&tree, &tree.locate(PointerEvent::down(0, 50.0, 20.0)));
    let up = manager.handle_event(&tree, &tree.locate(PointerEvent::up(40, 50.0, 20.0)));
    assert_eq!(down.outcome, ResolutionOutcome::FilterRejected);
    assert_eq!(up.outcome, ResolutionOutcome::FilterRejected);
    assert!(!down.is_suppressed() && !up.is_suppressed());
    assert!(picks.borrow().is_empty());
}

#[test]
fn scenario_c_blank_instance_id_is_missing() {
    let tree = MemoryTree::from_spec(
        NodeSpec::element("body").child(
            NodeSpec::element("section")
                .key("card")
                .target("")
                .scope("instance")
                .surface(),
        ),
    );
    let card = tree.find_by_key("card").unwrap();
    let v = validate(&tree, card);
    assert!(!v.ok);
    assert!(v.has(Violation::MissingId));
    assert!(v.violation_key.unwrap().starts_with("MISSING_ID@"));
}

#[test]
fn press_and_release_resolve_exactly_once() {
    let tree = nav_tree();
    let (mut manager, picks) = armed(PickerKind::Controls);

    manager.handle_event(&tree, &tree.locate(PointerEvent::down(0, 50.0, 20.0)));
    let up = manager.handle_event(&tree, &tree.locate(PointerEvent::up(100, 52.0, 20.0)));
    assert_eq!(up.outcome, ResolutionOutcome::SuppressedPaired);
    assert!(up.is_suppressed());
    assert_eq!(picks.borrow().len(), 1);
}

#[test]
fn rearming_never_invokes_previous_callback() {
    let tree = nav_tree();
    let mut manager = CaptureManager::with_defaults();
    manager.attach();
    let (first, on_first) = recorder();
    let (second, on_second) = recorder();

    manager.start_picking(PickerKind::Plates, on_first);
    manager.start_picking(PickerKind::Controls, on_second);
    assert_eq!(manager.armed_kind(), Some(PickerKind::Controls));

    manager.handle_event(&tree, &tree.locate(PointerEvent::down(0, 50.0, 20.0)));
    manager.handle_event(&tree, &tree.locate(PointerEvent::up(10, 50.0, 20.0)));
    assert!(first.borrow().is_empty());
    assert_eq!(second.borrow().len(), 1);
}

#[test]
fn rearming_mid_gesture_drops_the_token() {
    let tree = nav_tree();
    let (mut manager, first) = armed(PickerKind::Controls);
    manager.handle_event(&tree, &tree.locate(PointerEvent::down(0, 50.0, 20.0)));
    assert!(manager.has_pending_suppression());

    let (second, on_second) = recorder();
    manager.start_picking(PickerKind::Controls, on_second);
    assert!(!manager.has_pending_suppression());

    // The release is now unpaired and resolves for the new callback only.
    let up = manager.handle_event(&tree, &tree.locate(PointerEvent::up(10, 50.0, 20.0)));
    assert!(up.is_resolved());
    assert_eq!(first.borrow().len(), 1);
    assert_eq!(second.borrow().len(), 1);
}

#[test]
fn precise_distance_boundary() {
    let tree = nav_tree();
    for (dx, expected) in [(12.0, TokenCheck::Paired), (13.0, TokenCheck::TooFar)] {
        let (mut manager, picks) = armed(PickerKind::Controls);
        manager.handle_event(&tree, &tree.locate(PointerEvent::down(0, 20.0, 20.0)));
        let up = manager.handle_event(&tree, &tree.locate(PointerEvent::up(50, 20.0 + dx, 20.0)));
        assert_eq!(up.token, Some(expected), "dx={dx}");
        let expected_picks = if expected == TokenCheck::Paired { 1 } else { 2 };
        assert_eq!(picks.borrow().len(), expected_picks, "dx={dx}");
    }
}

#[test]
fn coarse_distance_boundary() {
    let tree = nav_tree();
    for (dx, expected) in [(32.0, TokenCheck::Paired), (33.0, TokenCheck::TooFar)] {
        let (mut manager, _) = armed(PickerKind::Controls);
        let down = PointerEvent::down(0, 10.0, 20.0).with_pointer(PointerKind::Touch);
        manager.handle_event(&tree, &tree.locate(down));
        let up = PointerEvent::up(50, 10.0 + dx, 20.0).with_pointer(PointerKind::Touch);
        let dispatch = manager.handle_event(&tree, &tree.locate(up));
        assert_eq!(dispatch.token, Some(expected), "dx={dx}");
    }
}

#[test]
fn expiry_boundary_resolves_late_release_independently() {
    let tree = nav_tree();

    let (mut manager, picks) = armed(PickerKind::Controls);
    manager.handle_event(&tree, &tree.locate(PointerEvent::down(1000, 50.0, 20.0)));
    let on_time = manager.handle_event(&tree, &tree.locate(PointerEvent::up(1800, 50.0, 20.0)));
    assert_eq!(on_time.outcome, ResolutionOutcome::SuppressedPaired);
    assert_eq!(picks.borrow().len(), 1);

    let (mut manager, picks) = armed(PickerKind::Controls);
    manager.handle_event(&tree, &tree.locate(PointerEvent::down(1000, 50.0, 20.0)));
    let late = manager.handle_event(&tree, &tree.locate(PointerEvent::up(1801, 50.0, 20.0)));
    assert_eq!(late.token, Some(TokenCheck::Expired));
    assert_eq!(late.outcome, ResolutionOutcome::Resolved);
    assert!(late.is_suppressed());
    assert_eq!(picks.borrow().len(), 2);
    assert!(!manager.has_pending_suppression());
}

#[test]
fn release_only_gesture_resolves_without_token() {
    let tree = nav_tree();
    let (mut manager, picks) = armed(PickerKind::Controls);
    let up = manager.handle_event(&tree, &tree.locate(PointerEvent::up(0, 50.0, 20.0)));
    assert!(up.is_resolved());
    assert!(up.token.is_none());
    assert_eq!(picks.borrow().len(), 1);
}

#[test]
fn stopped_and_detached_managers_ignore_events() {
    let tree = nav_tree();
    let (mut manager, picks) = armed(PickerKind::Controls);
    let press = tree.locate(PointerEvent::down(0, 50.0, 20.0));

    manager.stop_picking();
    assert_eq!(manager.handle_event(&tree, &press).outcome, ResolutionOutcome::NotArmed);

    manager.detach();
    assert_eq!(manager.handle_event(&tree, &press).outcome, ResolutionOutcome::NotAttached);
    assert!(picks.borrow().is_empty());
}

#[test]
fn fixture_replay_outcomes() {
    let tree = load_fixture_tree();
    let events = load_fixture_events();
    let (mut manager, picks) = armed(PickerKind::Controls);

    let outcomes: Vec<ResolutionOutcome> = events
        .iter()
        .map(|e| manager.handle_event(&tree, &tree.locate(e.clone())).outcome)
        .collect();

    use ResolutionOutcome::*;
    assert_eq!(
        outcomes,
        vec![
            Resolved,
            SuppressedPaired,
            FilterRejected,
            FilterRejected,
            TargetInHostPanel,
            TargetInHostPanel,
            Resolved,
            TokenCleared,
            Resolved,
            NotPrimaryButton,
            NotPrimaryButton,
        ]
    );
    assert_eq!(picks.borrow().len(), 3);
    assert!(picks
        .borrow()
        .iter()
        .all(|p| p.validation.root_id.as_deref() == Some("controls:homeHub:nav")));
}

#[test]
fn fixture_picker_host_tracks_each_kind() {
    let tree = load_fixture_tree();
    let mut host = PickerHost::new(CaptureManager::with_defaults());

    let click = |host: &mut PickerHost, t: u64, x: f64, y: f64| {
        host.dispatch(&tree, &tree.locate(PointerEvent::down(t, x, y)));
        host.dispatch(&tree, &tree.locate(PointerEvent::up(t + 40, x, y)));
    };

    host.arm(PickerKind::Plates);
    click(&mut host, 0, 100.0, 150.0);
    host.arm(PickerKind::Card);
    click(&mut host, 1000, 100.0, 300.0);
    // Duplicate instance ids never resolve.
    click(&mut host, 2000, 700.0, 300.0);

    let plate = host.selection(PickerKind::Plates).unwrap();
    assert_eq!(plate.id, "homeHub:plate:mode:practice");
    assert!(!plate.surface_is_root);
    assert_eq!(host.selection(PickerKind::Card).unwrap().id, "practice:card:session");
    assert!(host.selection(PickerKind::Controls).is_none());
}

#[test]
fn fixture_nested_targets_fail_validation() {
    let tree = load_fixture_tree();
    let (mut manager, picks) = armed(PickerKind::Controls);
    let dispatch = manager.handle_event(&tree, &tree.locate(PointerEvent::down(0, 50.0, 470.0)));
    assert_eq!(dispatch.outcome, ResolutionOutcome::ValidationFailed);
    assert_eq!(dispatch.root_id.as_deref(), Some("homeHub:cluster-action"));
    assert!(picks.borrow().is_empty());
}

#[test]
fn fixture_plates_all_have_presets() {
    let tree = load_fixture_tree();
    let coverage = PickerCoverage::of_tree(&tree);
    assert_eq!(coverage.count(PickerKind::Controls), 3);
    assert_eq!(coverage.count(PickerKind::Plates), 2);
    assert_eq!(coverage.count(PickerKind::Card), 3);
    assert!(coverage.plates_without_preset.is_empty());
}

proptest! {
    #[test]
    fn release_pairs_iff_within_threshold(dx in -40.0f64..40.0, dy in -40.0f64..40.0) {
        let tree = nav_tree();
        let (mut manager, picks) = armed(PickerKind::Controls);
        manager.handle_event(&tree, &tree.locate(PointerEvent::down(0, 50.0, 20.0)));
        // Keep the release inside the anchor so only distance decides.
        let nav = tree.require_key("nav").unwrap();
        let up = PointerEvent::up(10, 50.0 + dx, 20.0).with_target(nav);
        let up = PointerEvent { y: 20.0 + dy, ..up };
        let dispatch = manager.handle_event(&tree, &up);

        let within = dx * dx + dy * dy <= 144.0;
        prop_assert_eq!(dispatch.token == Some(TokenCheck::Paired), within);
        prop_assert!(dispatch.is_suppressed());
        prop_assert_eq!(picks.borrow().len(), if within { 1 } else { 2 });
    }
}
