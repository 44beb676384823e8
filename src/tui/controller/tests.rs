use super::*;
use crate::catalog::{Catalog, Category, ToolDescriptor, UpdateMethod};

fn tool(name: &str, binary: &str, category: Category) -> ToolDescriptor {
    ToolDescriptor::new(name, binary, binary, category, UpdateMethod::BrewPkg)
}

fn controller(tools: Vec<ToolDescriptor>) -> Controller {
    let catalog = Catalog::new(tools).unwrap();
    let mut c = Controller::new(catalog, vec![Category::Runtime]);
    c.start();
    c
}

fn three_tools() -> Controller {
    controller(vec![
        tool("Alpha", "alpha", Category::Utils),
        tool("Beta", "beta", Category::Utils),
        tool("Gamma", "gamma", Category::Infra),
    ])
}

fn v(s: &str) -> LocalVersion {
    LocalVersion::Version(s.to_string())
}

fn rv(s: &str) -> RemoteVersion {
    RemoteVersion::Version(s.to_string())
}

/// Feed local results, warm the cache, then feed remote results.
fn probe_all(c: &mut Controller, locals: Vec<LocalVersion>, remotes: Vec<RemoteVersion>) {
    for (index, version) in locals.into_iter().enumerate() {
        c.apply(SessionEvent::LocalProbed { index, version });
    }
    c.apply(SessionEvent::CacheWarmed);
    for (index, version) in remotes.into_iter().enumerate() {
        c.apply(SessionEvent::RemoteProbed { index, version });
    }
}

fn success(hint: &str) -> UpdateOutcome {
    UpdateOutcome::Success {
        hint: hint.to_string(),
        confirmed: v(hint),
    }
}

fn to_main(c: &mut Controller) {
    c.apply(SessionEvent::SplashElapsed);
    assert_eq!(c.state(), SessionState::Main);
}

#[test]
fn start_probes_every_tool() {
    let catalog = Catalog::new(vec![
        tool("Alpha", "alpha", Category::Utils),
        tool("Beta", "beta", Category::Utils),
    ])
    .unwrap();
    let mut c = Controller::new(catalog, vec![Category::Runtime]);
    assert_eq!(c.start(), vec![Effect::ProbeLocal(0), Effect::ProbeLocal(1)]);
    assert_eq!(c.state(), SessionState::Splash);
    assert!(c.tools().iter().all(|t| t.status == ToolStatus::Checking));
}

#[test]
fn first_local_result_triggers_single_warm_up() {
    let mut c = three_tools();
    let first = c.apply(SessionEvent::LocalProbed {
        index: 0,
        version: v("1.0.0"),
    });
    assert_eq!(first, vec![Effect::WarmUp]);
    let second = c.apply(SessionEvent::LocalProbed {
        index: 1,
        version: v("1.0.0"),
    });
    assert!(second.is_empty());
}

#[test]
fn warm_cache_fans_out_remote_probes() {
    let mut c = three_tools();
    c.apply(SessionEvent::LocalProbed {
        index: 0,
        version: LocalVersion::Missing,
    });
    c.apply(SessionEvent::LocalProbed {
        index: 1,
        version: v("1.0.0"),
    });
    let effects = c.apply(SessionEvent::CacheWarmed);
    // Missing tools need no remote probe; unanswered locals wait.
    assert_eq!(effects, vec![Effect::ProbeRemote(1)]);

    let late = c.apply(SessionEvent::LocalProbed {
        index: 2,
        version: v("2.0.0"),
    });
    assert_eq!(late, vec![Effect::ProbeRemote(2)]);
}

#[test]
fn statuses_follow_probe_results() {
    let mut c = three_tools();
    probe_all(
        &mut c,
        vec![LocalVersion::Missing, v("1.0"), v("1.0")],
        vec![RemoteVersion::Unknown, rv("1.0"), rv("2.0")],
    );
    let statuses: Vec<_> = c.tools().iter().map(|t| t.status).collect();
    assert_eq!(
        statuses,
        vec![ToolStatus::Missing, ToolStatus::Installed, ToolStatus::Outdated]
    );
    assert!(!c.is_loading());
}

#[test]
fn results_apply_in_any_order() {
    let mut c = three_tools();
    c.apply(SessionEvent::LocalProbed {
        index: 2,
        version: v("1.0"),
    });
    c.apply(SessionEvent::CacheWarmed);
    c.apply(SessionEvent::RemoteProbed {
        index: 2,
        version: rv("2.0"),
    });
    c.apply(SessionEvent::LocalProbed {
        index: 0,
        version: v("3.0"),
    });
    assert_eq!(c.tools()[2].status, ToolStatus::Outdated);
    assert_eq!(c.tools()[0].status, ToolStatus::Installed);
    assert_eq!(c.tools()[1].status, ToolStatus::Checking);
    assert!(c.is_loading());
}

#[test]
fn detected_rests_at_unmanaged() {
    let mut c = three_tools();
    probe_all(
        &mut c,
        vec![LocalVersion::Detected, v("1"), v("1")],
        vec![RemoteVersion::Unknown, rv("1"), rv("1")],
    );
    assert_eq!(c.tools()[0].status, ToolStatus::Unmanaged);
}

#[test]
fn splash_leaves_on_timer_or_key() {
    let mut c = three_tools();
    assert_eq!(c.state(), SessionState::Splash);
    c.handle_intent(Intent::Down);
    assert_eq!(c.state(), SessionState::Main);
    // Late timer is harmless.
    c.apply(SessionEvent::SplashElapsed);
    assert_eq!(c.state(), SessionState::Main);
    assert_eq!(c.cursor(), 0);
}

#[test]
fn three_tool_scenario_updates_sequentially() {
    let mut c = three_tools();
    probe_all(
        &mut c,
        vec![LocalVersion::Missing, v("1.0"), v("1.0")],
        vec![RemoteVersion::Unknown, rv("1.0"), rv("2.0")],
    );
    to_main(&mut c);

    c.handle_intent(Intent::Down);
    c.handle_intent(Intent::Toggle);
    c.handle_intent(Intent::Down);
    c.handle_intent(Intent::Toggle);
    assert_eq!(c.selection().iter().copied().collect::<Vec<_>>(), vec![1, 2]);

    let effects = c.handle_intent(Intent::Commit);
    assert_eq!(c.state(), SessionState::Updating);
    assert_eq!(
        effects,
        vec![Effect::Execute {
            index: 1,
            expected: Some("1.0".to_string())
        }]
    );
    assert_eq!(c.queue().iter().copied().collect::<Vec<_>>(), vec![2]);
    assert_eq!(c.in_flight(), Some(1));
    c.validate().unwrap();

    let effects = c.apply(SessionEvent::UpdateFinished {
        index: 1,
        outcome: success("1.0"),
    });
    assert_eq!(
        effects,
        vec![Effect::Execute {
            index: 2,
            expected: Some("2.0".to_string())
        }]
    );
    assert_eq!(c.tools()[1].status, ToolStatus::Updated);
    assert_eq!(c.tools()[2].status, ToolStatus::Updating);
    c.validate().unwrap();

    let effects = c.apply(SessionEvent::UpdateFinished {
        index: 2,
        outcome: success("2.0"),
    });
    assert!(effects.is_empty());
    assert_eq!(c.state(), SessionState::Summary);
    c.validate().unwrap();

    let summary = c.summary().unwrap();
    assert_eq!(summary.attempted, 2);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.skipped, 1);
    assert!((summary.success_rate() - 100.0).abs() < f64::EPSILON);
    assert_eq!(summary.updated[1].detail, "2.0");
}

#[test]
fn summary_returns_to_main_and_settles() {
    let mut c = three_tools();
    probe_all(
        &mut c,
        vec![v("1.0"), v("1.0"), v("1.0")],
        vec![rv("1.0"), rv("2.0"), rv("1.0")],
    );
    to_main(&mut c);
    c.handle_intent(Intent::Down);
    c.handle_intent(Intent::Commit);
    c.apply(SessionEvent::UpdateFinished {
        index: 1,
        outcome: success("2.0"),
    });
    assert_eq!(c.state(), SessionState::Summary);

    c.handle_intent(Intent::Dismiss);
    assert_eq!(c.state(), SessionState::Main);
    assert!(c.selection().is_empty());
    assert_eq!(c.progress(), Progress::default());
    assert_eq!(c.tools()[1].status, ToolStatus::Installed);
    assert_eq!(c.tools()[1].local, Some(v("2.0")));
    c.validate().unwrap();
}

#[test]
fn protected_commit_requires_confirmation() {
    let mut c = controller(vec![
        tool("Git", "git", Category::Utils),
        tool("Node.js", "node", Category::Runtime),
    ]);
    probe_all(&mut c, vec![v("1"), v("20.0.0")], vec![rv("1"), rv("22.0.0")]);
    to_main(&mut c);

    c.handle_intent(Intent::Down);
    c.handle_intent(Intent::Toggle);
    let effects = c.handle_intent(Intent::Commit);
    assert!(effects.is_empty());
    assert_eq!(c.state(), SessionState::Confirm);

    c.handle_intent(Intent::Cancel);
    assert_eq!(c.state(), SessionState::Main);
    assert_eq!(c.selection().iter().copied().collect::<Vec<_>>(), vec![1]);
    assert!(c.queue().is_empty());
    assert_eq!(c.progress().total, 0);
    assert_eq!(c.tools()[1].status, ToolStatus::Outdated);
    c.validate().unwrap();
}

#[test]
fn runtimes_stay_protected_when_config_lists_none() {
    let config: crate::config::Config = toml::from_str("protected_categories = []").unwrap();
    assert!(config.protected_categories.is_empty());
    let catalog = Catalog::new(vec![tool("Node.js", "node", Category::Runtime)]).unwrap();
    let mut c = Controller::new(catalog, config.protected_categories);
    c.start();
    probe_all(&mut c, vec![v("20.0.0")], vec![rv("22.0.0")]);
    to_main(&mut c);

    assert!(c.is_protected(Category::Runtime));
    let effects = c.handle_intent(Intent::Commit);
    assert!(effects.is_empty());
    assert_eq!(c.state(), SessionState::Confirm);
}

#[test]
fn configured_categories_add_to_runtimes() {
    let catalog = Catalog::new(vec![tool("Docker", "docker", Category::Infra)]).unwrap();
    let c = Controller::new(catalog, vec![Category::Infra]);
    assert!(c.is_protected(Category::Infra));
    assert!(c.is_protected(Category::Runtime));
    assert!(!c.is_protected(Category::Utils));
}

#[test]
fn protected_commit_proceeds_on_yes() {
    let mut c = controller(vec![tool("Node.js", "node", Category::Runtime)]);
    probe_all(&mut c, vec![v("20.0.0")], vec![rv("22.0.0")]);
    to_main(&mut c);

    c.handle_intent(Intent::Commit);
    assert_eq!(c.state(), SessionState::Confirm);
    let effects = c.handle_intent(Intent::Confirm);
    assert_eq!(c.state(), SessionState::Updating);
    assert_eq!(
        effects,
        vec![Effect::Execute {
            index: 0,
            expected: Some("22.0.0".to_string())
        }]
    );
}

#[test]
fn protected_preview_also_requires_confirmation() {
    let mut c = controller(vec![
        tool("Git", "git", Category::Utils),
        tool("Python", "python3", Category::Runtime),
    ]);
    probe_all(&mut c, vec![v("1"), v("3.12")], vec![rv("1"), rv("3.13")]);
    to_main(&mut c);

    c.handle_intent(Intent::ToggleAll);
    c.handle_intent(Intent::Preview);
    assert_eq!(c.state(), SessionState::Preview);
    assert_eq!(c.pending(), &[0, 1]);

    let effects = c.handle_intent(Intent::Confirm);
    assert!(effects.is_empty());
    assert_eq!(c.state(), SessionState::Confirm);
}

#[test]
fn preview_defaults_to_cursor_and_proceeds() {
    let mut c = three_tools();
    probe_all(
        &mut c,
        vec![v("1"), v("1"), v("1")],
        vec![rv("2"), rv("1"), rv("1")],
    );
    to_main(&mut c);

    c.handle_intent(Intent::Preview);
    assert_eq!(c.state(), SessionState::Preview);
    assert_eq!(c.pending(), &[0]);

    let effects = c.handle_intent(Intent::Confirm);
    assert_eq!(c.state(), SessionState::Updating);
    assert_eq!(effects.len(), 1);
    assert!(c.is_selected(0));
}

#[test]
fn preview_cancel_returns_to_main() {
    let mut c = three_tools();
    probe_all(
        &mut c,
        vec![v("1"), v("1"), v("1")],
        vec![rv("1"), rv("1"), rv("1")],
    );
    to_main(&mut c);
    c.handle_intent(Intent::Preview);
    c.handle_intent(Intent::Cancel);
    assert_eq!(c.state(), SessionState::Main);
    assert!(c.pending().is_empty());
    assert!(c.selection().is_empty());
}

#[test]
fn commit_ignored_while_loading() {
    let mut c = three_tools();
    to_main(&mut c);
    let effects = c.handle_intent(Intent::Commit);
    assert!(effects.is_empty());
    assert_eq!(c.state(), SessionState::Main);
    assert!(c.selection().is_empty());

    c.handle_intent(Intent::Preview);
    assert_eq!(c.state(), SessionState::Main);
}

#[test]
fn failures_do_not_stop_the_queue() {
    let mut c = three_tools();
    probe_all(
        &mut c,
        vec![v("1"), v("1"), v("1")],
        vec![rv("2"), rv("2"), rv("2")],
    );
    to_main(&mut c);
    c.handle_intent(Intent::ToggleAll);
    c.handle_intent(Intent::Commit);

    let effects = c.apply(SessionEvent::UpdateFinished {
        index: 0,
        outcome: UpdateOutcome::Failure {
            message: "`brew upgrade alpha` failed: boom".to_string(),
            manual: false,
        },
    });
    assert_eq!(effects.len(), 1);
    c.apply(SessionEvent::UpdateFinished {
        index: 1,
        outcome: UpdateOutcome::Failure {
            message: "manual update required (not manager-tracked)".to_string(),
            manual: true,
        },
    });
    c.apply(SessionEvent::UpdateFinished {
        index: 2,
        outcome: success("2"),
    });

    let summary = c.summary().unwrap();
    assert_eq!((summary.succeeded, summary.failed, summary.skipped), (1, 2, 0));
    assert_eq!(summary.failures[0].detail, "`brew upgrade alpha` failed: boom");
    assert_eq!(c.tools()[0].status, ToolStatus::Failed);

    c.handle_intent(Intent::Dismiss);
    assert_eq!(c.tools()[0].status, ToolStatus::Outdated);
    assert_eq!(c.tools()[1].status, ToolStatus::ManualCheck);
    assert_eq!(c.tools()[2].status, ToolStatus::Installed);
}

#[test]
fn at_most_one_tool_updating() {
    let mut c = three_tools();
    probe_all(
        &mut c,
        vec![v("1"), v("1"), v("1")],
        vec![rv("2"), rv("2"), rv("2")],
    );
    to_main(&mut c);
    c.handle_intent(Intent::ToggleAll);
    c.handle_intent(Intent::Commit);

    for index in 0..3 {
        let updating = c
            .tools()
            .iter()
            .filter(|t| t.status == ToolStatus::Updating)
            .count();
        assert_eq!(updating, 1);
        c.validate().unwrap();
        c.apply(SessionEvent::UpdateFinished {
            index,
            outcome: success("2"),
        });
    }
    assert_eq!(c.state(), SessionState::Summary);
}

#[test]
fn stale_update_results_are_ignored() {
    let mut c = three_tools();
    probe_all(
        &mut c,
        vec![v("1"), v("1"), v("1")],
        vec![rv("2"), rv("2"), rv("2")],
    );
    to_main(&mut c);
    c.handle_intent(Intent::ToggleAll);
    c.handle_intent(Intent::Commit);

    // Tool 2 is still queued, not in flight.
    let effects = c.apply(SessionEvent::UpdateFinished {
        index: 2,
        outcome: success("2"),
    });
    assert!(effects.is_empty());
    assert_eq!(c.in_flight(), Some(0));
    assert_eq!(c.progress().completed, 0);
    c.validate().unwrap();
}

#[test]
fn keys_are_ignored_while_updating() {
    let mut c = three_tools();
    probe_all(
        &mut c,
        vec![v("1"), v("1"), v("1")],
        vec![rv("2"), rv("2"), rv("2")],
    );
    to_main(&mut c);
    c.handle_intent(Intent::Commit);
    assert!(c.handle_intent(Intent::Cancel).is_empty());
    assert!(c.handle_intent(Intent::ToggleAll).is_empty());
    assert_eq!(c.state(), SessionState::Updating);
    assert_eq!(c.handle_intent(Intent::Quit), vec![Effect::Quit]);
}

#[test]
fn filter_restricts_navigation() {
    let mut c = controller(vec![
        tool("Claude CLI", "claude", Category::Code),
        tool("Git", "git", Category::Utils),
        tool("Ripgrep", "rg", Category::Utils),
        tool("GitHub CLI", "gh", Category::Utils),
        ToolDescriptor::new(
            "Lazygit",
            "lazygit",
            "jesseduffield/lazygit/lazygit",
            Category::Utils,
            UpdateMethod::BrewPkg,
        ),
    ]);
    to_main(&mut c);

    c.handle_intent(Intent::EnterSearch);
    assert_eq!(c.state(), SessionState::Search);
    for ch in "GIT".chars() {
        c.handle_intent(Intent::SearchInput(ch));
    }
    assert_eq!(c.visible(), vec![1, 3, 4]);
    assert_eq!(c.cursor(), 1);

    c.handle_intent(Intent::Confirm);
    assert_eq!(c.state(), SessionState::Main);
    assert_eq!(c.filter(), "GIT");

    c.handle_intent(Intent::Down);
    assert_eq!(c.cursor(), 3);
    c.handle_intent(Intent::Toggle);
    c.handle_intent(Intent::Down);
    c.handle_intent(Intent::Down);
    assert_eq!(c.cursor(), 4);

    // Esc clears the filter without touching the selection.
    c.handle_intent(Intent::Cancel);
    assert_eq!(c.filter(), "");
    assert_eq!(c.visible().len(), 5);
    assert_eq!(c.selection().iter().copied().collect::<Vec<_>>(), vec![3]);
    c.validate().unwrap();
}

#[test]
fn search_cancel_clears_filter() {
    let mut c = three_tools();
    to_main(&mut c);
    c.handle_intent(Intent::EnterSearch);
    c.handle_intent(Intent::SearchInput('g'));
    c.handle_intent(Intent::SearchInput('a'));
    assert_eq!(c.cursor(), 2);
    c.handle_intent(Intent::SearchBackspace);
    assert_eq!(c.filter(), "g");
    c.handle_intent(Intent::Cancel);
    assert_eq!(c.state(), SessionState::Main);
    assert!(c.filter().is_empty());
}

#[test]
fn filter_matches_category_tag() {
    let mut c = three_tools();
    to_main(&mut c);
    c.handle_intent(Intent::EnterSearch);
    for ch in "infra".chars() {
        c.handle_intent(Intent::SearchInput(ch));
    }
    assert_eq!(c.visible(), vec![2]);
}

#[test]
fn group_toggle_selects_then_clears_category() {
    let mut c = three_tools();
    to_main(&mut c);
    c.handle_intent(Intent::ToggleGroup);
    assert_eq!(c.selection().iter().copied().collect::<Vec<_>>(), vec![0, 1]);

    // Partially selected group becomes fully selected.
    c.handle_intent(Intent::Toggle);
    c.handle_intent(Intent::ToggleGroup);
    assert_eq!(c.selection().len(), 2);

    c.handle_intent(Intent::ToggleGroup);
    assert!(c.selection().is_empty());
}

#[test]
fn global_toggle_flips_between_none_and_all() {
    let mut c = three_tools();
    to_main(&mut c);
    c.handle_intent(Intent::Toggle);
    c.handle_intent(Intent::ToggleAll);
    assert_eq!(c.selection().len(), 3);
    c.handle_intent(Intent::ToggleAll);
    assert!(c.selection().is_empty());
}

#[test]
fn category_navigation() {
    let mut c = three_tools();
    to_main(&mut c);
    c.handle_intent(Intent::JumpCategory(Category::Infra));
    assert_eq!(c.cursor(), 2);
    c.handle_intent(Intent::NextCategory);
    assert_eq!(c.cursor(), 0);
    c.handle_intent(Intent::NextCategory);
    assert_eq!(c.cursor(), 2);
    // Absent category leaves the cursor alone.
    c.handle_intent(Intent::JumpCategory(Category::Sys));
    assert_eq!(c.cursor(), 2);
}

#[test]
fn cursor_stays_in_bounds() {
    let mut c = three_tools();
    to_main(&mut c);
    c.handle_intent(Intent::Up);
    assert_eq!(c.cursor(), 0);
    for _ in 0..10 {
        c.handle_intent(Intent::Down);
    }
    assert_eq!(c.cursor(), 2);
    c.handle_intent(Intent::Top);
    assert_eq!(c.cursor(), 0);
    c.handle_intent(Intent::Bottom);
    assert_eq!(c.cursor(), 2);
    c.validate().unwrap();
}

#[test]
fn tick_only_advances_frame() {
    let mut c = three_tools();
    let before = c.tools().to_vec();
    c.apply(SessionEvent::Tick);
    c.apply(SessionEvent::Tick);
    assert_eq!(c.frame(), 2);
    assert_eq!(c.tools(), before.as_slice());
    assert_eq!(c.state(), SessionState::Splash);
}
