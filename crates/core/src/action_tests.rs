// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn task() -> TaskName {
    TaskName::new("initial_import")
}

#[test]
fn serializes_with_type_tag() {
    let action = TaskAction::Continue { task: task(), run_id: RunId::from_string("run-abc") };
    let json = serde_json::to_value(&action).unwrap();

    assert_eq!(json["type"], "task:continue");
    assert_eq!(json["task"], "initial_import");
    assert_eq!(json["run_id"], "run-abc");
}

#[test]
fn round_trips_every_variant() {
    let run_id = RunId::mint();
    let actions = vec![
        TaskAction::Start { task: task(), args: Args::new().with("page", 1) },
        TaskAction::Continue { task: task(), run_id: run_id.clone() },
        TaskAction::Run { task: task(), run_id: run_id.clone(), chunk: Args::new() },
        TaskAction::Cleanup { task: task(), run_id },
    ];

    for action in actions {
        let json = serde_json::to_string(&action).unwrap();
        let back: TaskAction = serde_json::from_str(&json).unwrap();
        assert_eq!(action, back);
    }
}

#[test]
fn group_covers_all_run_scoped_actions() {
    let run_id = RunId::from_string("run-xyz");
    let expected = ActionGroup::for_run(&task(), &run_id);

    let start = TaskAction::Start { task: task(), args: Args::new() };
    let cont = TaskAction::Continue { task: task(), run_id: run_id.clone() };
    let run = TaskAction::Run { task: task(), run_id: run_id.clone(), chunk: Args::new() };
    let cleanup = TaskAction::Cleanup { task: task(), run_id };

    assert_eq!(start.group(), None);
    assert_eq!(cont.group(), Some(expected.clone()));
    assert_eq!(run.group(), Some(expected.clone()));
    assert_eq!(cleanup.group(), Some(expected));
}

#[test]
fn group_tag_format() {
    let group = ActionGroup::for_run(&task(), &RunId::from_string("run-xyz"));
    assert_eq!(group.as_str(), "initial_import|run-xyz");
}

#[test]
fn equal_payloads_compare_equal() {
    // The scheduler de-dups on payload equality
    let a = TaskAction::Start { task: task(), args: Args::new().with("page", 1) };
    let b = TaskAction::Start { task: task(), args: Args::new().with("page", 1) };
    let c = TaskAction::Start { task: task(), args: Args::new().with("page", 2) };

    assert_eq!(a, b);
    assert_ne!(a, c);
}
