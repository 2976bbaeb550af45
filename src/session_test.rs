use std::sync::Arc;

use rand::SeedableRng;

use super::*;
use crate::catalog::Catalog;
use crate::config::PosturePreference;
use crate::pose::test_helpers::{sitting, standing};
use crate::preset::{FREE_TIER_SEQUENCE, FreeTier, PresetTable};

// =============================================================================
// Fixtures
// =============================================================================

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

fn selector(catalog: Catalog, paid: bool) -> PoseSelector {
    PoseSelector::new(
        Arc::new(catalog),
        Arc::new(PresetTable::builtin()),
        Arc::new(FreeTier::default()),
        Arc::new(paid),
    )
}

fn sitting_catalog() -> Catalog {
    Catalog::new(vec![sitting("a"), sitting("b"), sitting("c"), sitting("d")]).expect("valid")
}

fn start(config: SessionConfig, catalog: Catalog) -> (Session, TimerQueue, Vec<SessionEvent>) {
    let mut queue = TimerQueue::new();
    let (session, events) =
        Session::start(config, selector(catalog, true), StdRng::seed_from_u64(3), &mut queue).expect("valid config");
    (session, queue, events)
}

fn shown_by(events: &[SessionEvent], want: Transition) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, SessionEvent::PoseShown { cause, .. } if *cause == want))
        .count()
}

// =============================================================================
// Start
// =============================================================================

#[test]
fn start_shows_and_records_first_pose() {
    let (session, queue, events) = start(SessionConfig::default(), sitting_catalog());
    assert_eq!(events.len(), 1);
    let SessionEvent::PoseShown { pose_id, rule, cause } = &events[0] else {
        panic!("expected first pose, got {events:?}");
    };
    assert_eq!(*cause, Transition::Start);
    assert_eq!(*rule, Some(SelectionRule::Fresh));
    assert_eq!(session.current_pose_id(), Some(pose_id.as_str()));
    assert_eq!(session.history().as_slice(), [pose_id.clone()]);
    assert_eq!(session.current_pose().map(|p| p.id.as_str()), Some(pose_id.as_str()));
    assert_eq!(queue.pending(), 2);
}

#[test]
fn start_rejects_zero_lengths() {
    let mut queue = TimerQueue::new();
    let zero_pose = SessionConfig::default().with_pose_duration_secs(0);
    let err = Session::start(zero_pose, selector(sitting_catalog(), true), StdRng::seed_from_u64(0), &mut queue)
        .err()
        .expect("rejected");
    assert_eq!(err, ConfigError::ZeroPoseDuration);

    let zero_session = SessionConfig::default().with_duration_mins(0);
    assert!(Session::start(zero_session, selector(sitting_catalog(), true), StdRng::seed_from_u64(0), &mut queue).is_err());
    assert_eq!(queue.pending(), 0);
}

#[test]
fn start_with_empty_pool_is_born_ended() {
    let catalog = Catalog::new(vec![standing("mountain")]).expect("valid");
    let (mut session, mut queue, events) = start(SessionConfig::default(), catalog);
    assert_eq!(events, vec![SessionEvent::Ended { reason: EndReason::NoEligiblePose }]);
    assert!(session.is_ended());
    assert!(session.current_pose_id().is_none());
    assert_eq!(queue.pending(), 0);
    assert!(session.run_until(&mut queue, secs(1_000)).is_empty());
    assert_eq!(session.summary(queue.now()).poses_shown, 0);
}

// =============================================================================
// Timers
// =============================================================================

#[test]
fn one_minute_session_of_fifteen_second_poses() {
    let config = SessionConfig::default().with_speed(Speed::Flow).with_duration_mins(1);
    let (mut session, mut queue, _) = start(config, sitting_catalog());

    let events = session.run_until(&mut queue, secs(60));
    assert_eq!(shown_by(&events, Transition::Timer), 3);
    assert_eq!(events.last(), Some(&SessionEvent::Ended { reason: EndReason::TimeElapsed }));
    assert_eq!(queue.pending(), 0);

    let summary = session.summary(queue.now());
    assert_eq!(summary.poses_shown, 4);
    assert_eq!(summary.elapsed, secs(60));
    assert_eq!(summary.reason, Some(EndReason::TimeElapsed));
}

#[test]
fn pose_changes_exactly_at_each_boundary() {
    let (mut session, mut queue, _) = start(SessionConfig::default(), sitting_catalog());
    assert!(session.run_until(&mut queue, secs(29)).is_empty());
    assert_eq!(shown_by(&session.run_until(&mut queue, secs(30)), Transition::Timer), 1);
    assert_eq!(session.pose_remaining_secs(queue.now()), 30);
}

#[test]
fn session_end_fires_once_and_then_ignores_everything() {
    let config = SessionConfig::default().with_duration_mins(1);
    let (mut session, mut queue, _) = start(config, sitting_catalog());
    let ends = session
        .run_until(&mut queue, secs(600))
        .into_iter()
        .filter(|e| matches!(e, SessionEvent::Ended { .. }))
        .count();
    assert_eq!(ends, 1);
    assert!(session.skip(&mut queue).is_none());
    assert!(session.pause(&mut queue).is_none());
    assert!(!session.redo(&mut queue));
    assert!(session.abandon(&mut queue).is_none());
}

#[test]
fn pause_freezes_both_timers() {
    let (mut session, mut queue, _) = start(SessionConfig::default(), sitting_catalog());
    session.run_until(&mut queue, secs(10));
    assert_eq!(session.pause(&mut queue), Some(SessionEvent::Paused));
    assert!(session.pause(&mut queue).is_none());
    assert!(session.run_until(&mut queue, secs(1_000)).is_empty());
    assert_eq!(session.pose_remaining_secs(queue.now()), 20);
    assert_eq!(session.session_remaining(queue.now()), secs(290));

    assert_eq!(session.set_paused(false, &mut queue), Some(SessionEvent::Resumed));
    let before_end = session.run_until(&mut queue, secs(1_289));
    assert!(!before_end.iter().any(|e| matches!(e, SessionEvent::Ended { .. })));
    assert_eq!(
        session.run_until(&mut queue, secs(1_290)).last(),
        Some(&SessionEvent::Ended { reason: EndReason::TimeElapsed })
    );
    assert_eq!(session.summary(queue.now()).elapsed, secs(300));
}

// =============================================================================
// Controls
// =============================================================================

#[test]
fn skip_shows_next_pose_and_restarts_countdown() {
    let (mut session, mut queue, _) = start(SessionConfig::default(), sitting_catalog());
    session.run_until(&mut queue, secs(20));
    let first = session.current_pose_id().map(str::to_owned);

    let skipped = session.skip(&mut queue).expect("next pose");
    assert!(matches!(skipped, SessionEvent::PoseShown { cause: Transition::Skip, .. }));
    assert_ne!(session.current_pose_id().map(str::to_owned), first);
    assert_eq!(session.history().len(), 2);

    assert!(session.run_until(&mut queue, secs(49)).is_empty());
    assert_eq!(shown_by(&session.run_until(&mut queue, secs(50)), Transition::Timer), 1);
}

#[test]
fn go_back_restores_previous_pose() {
    let (mut session, mut queue, _) = start(SessionConfig::default(), sitting_catalog());
    session.skip(&mut queue);
    let second = session.current_pose_id().map(str::to_owned).expect("pose");
    session.skip(&mut queue);
    assert_eq!(session.history().len(), 3);

    let back = session.go_back(&mut queue).expect("went back");
    assert_eq!(back, SessionEvent::PoseShown { pose_id: second.clone(), rule: None, cause: Transition::Back });
    assert_eq!(session.current_pose_id(), Some(second.as_str()));
    assert_eq!(session.history().len(), 2);
    assert_eq!(session.history().last(), Some(second.as_str()));
}

#[test]
fn go_back_on_first_pose_is_noop() {
    let (mut session, mut queue, _) = start(SessionConfig::default(), sitting_catalog());
    let first = session.current_pose_id().map(str::to_owned);
    assert!(session.go_back(&mut queue).is_none());
    assert_eq!(session.current_pose_id().map(str::to_owned), first);
    assert_eq!(session.history().len(), 1);
}

#[test]
fn redo_restarts_current_pose() {
    let (mut session, mut queue, _) = start(SessionConfig::default(), sitting_catalog());
    session.run_until(&mut queue, secs(25));
    assert!(session.redo(&mut queue));
    assert_eq!(session.pose_remaining_secs(queue.now()), 30);
    assert!(session.run_until(&mut queue, secs(54)).is_empty());
    assert_eq!(session.history().len(), 1);
}

#[test]
fn set_speed_restarts_with_new_length() {
    let (mut session, mut queue, _) = start(SessionConfig::default(), sitting_catalog());
    session.run_until(&mut queue, secs(10));
    session.set_speed(Speed::Flow, &mut queue).expect("valid speed");
    assert_eq!(session.config().pose_duration_secs, 15);
    assert!(session.run_until(&mut queue, secs(24)).is_empty());
    assert_eq!(shown_by(&session.run_until(&mut queue, secs(25)), Transition::Timer), 1);
}

#[test]
fn set_pose_duration_rejects_zero() {
    let (mut session, mut queue, _) = start(SessionConfig::default(), sitting_catalog());
    assert_eq!(session.set_pose_duration(0, &mut queue), Err(ConfigError::ZeroPoseDuration));
    assert_eq!(session.config().pose_duration_secs, 30);
}

#[test]
fn abandon_cancels_timers_and_clears_history() {
    let (mut session, mut queue, _) = start(SessionConfig::default(), sitting_catalog());
    session.run_until(&mut queue, secs(45));
    assert_eq!(session.abandon(&mut queue), Some(SessionEvent::Ended { reason: EndReason::Abandoned }));
    assert!(session.history().is_empty());
    assert_eq!(queue.pending(), 0);

    let summary = session.summary(secs(10_000));
    assert_eq!(summary.poses_shown, 2);
    assert_eq!(summary.elapsed, secs(45));
    assert_eq!(summary.reason, Some(EndReason::Abandoned));
}

// =============================================================================
// Selection through the session
// =============================================================================

#[test]
fn unpaid_session_walks_free_tier_sequence() {
    let mut queue = TimerQueue::new();
    let config = SessionConfig::default().with_posture(PosturePreference::Standing);
    let (mut session, _) =
        Session::start(config, selector(Catalog::builtin(), false), StdRng::seed_from_u64(9), &mut queue)
            .expect("valid config");
    session.run_until(&mut queue, secs(120));
    assert_eq!(session.history().as_slice(), FREE_TIER_SEQUENCE.iter().map(|s| (*s).to_owned()).collect::<Vec<_>>());
}

#[test]
fn sided_poses_follow_each_other() {
    let catalog = Catalog::new(vec![standing("eagle-right"), standing("eagle-left"), standing("mountain")]).expect("valid");
    let config = SessionConfig::default().with_posture(PosturePreference::Standing);
    let (mut session, mut queue, _) = start(config, catalog);
    session.run_until(&mut queue, secs(60));
    let shown = session.history().as_slice();
    let right = shown.iter().position(|id| id == "eagle-right").expect("shown");
    let left = shown.iter().position(|id| id == "eagle-left").expect("shown");
    assert_eq!(right.abs_diff(left), 1);
}
