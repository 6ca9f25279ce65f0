// Session Tests
// Client-side composition: incoming messages, throw fan-out, housekeeping

use dicemesh::game::{
    GameConfig, GameSession, Incoming, NoticeTick, RoundState, SelectionOutcome, SessionError,
    ThrowError, ThrowRole,
};
use dicemesh::presence::MockSendHandle;
use dicemesh::protocol::{
    decode, encode, PeerId, ProtocolError, ThrowKinematics, ThrowMessage, Vec3, WireMessage,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn id(s: &str) -> PeerId {
    PeerId::parse(s).unwrap()
}

fn kin() -> ThrowKinematics {
    ThrowKinematics::new(Vec3::new(1.0, 2.0, 0.0), 7.5)
}

fn throw_json(values: &[u32]) -> String {
    encode(&WireMessage::Throw(ThrowMessage::new(values.to_vec(), kin()))).unwrap()
}

fn thrower() -> GameSession {
    GameSession::new(GameConfig::new().with_role(ThrowRole::LocalThrower))
        .unwrap()
        .with_local_id(id("me"))
}

fn receiver() -> GameSession {
    GameSession::new(GameConfig::new()).unwrap().with_local_id(id("me"))
}

// ============================================================================
// INCOMING
// ============================================================================

#[test]
fn test_presence_updates_known_peers() {
    let mut session = receiver();

    let incoming = session
        .handle_incoming(r#"{"type":"peers","peers":["me","you"]}"#)
        .unwrap();

    assert_eq!(incoming, Incoming::Presence(vec![id("me"), id("you")]));
    assert_eq!(session.other_peers(), vec![id("you")]);
}

#[test]
fn test_remote_throw_applies_values() {
    let mut session = receiver();

    let incoming = session.handle_incoming(&throw_json(&[4, 4, 4, 2, 5])).unwrap();

    assert_eq!(incoming, Incoming::ThrowApplied(vec![4, 4, 4, 2, 5]));
    assert_eq!(session.dice().values(), vec![4, 4, 4, 2, 5]);
    assert!(matches!(session.round(), RoundState::Settled { .. }));
}

#[test]
fn test_malformed_throw_keeps_round_void() {
    let mut session = receiver();

    let result = session.handle_incoming(&throw_json(&[4, 4, 4]));

    assert!(matches!(
        result,
        Err(SessionError::Throw(ThrowError::Malformed(
            ProtocolError::WrongDieCount { .. }
        )))
    ));
    assert!(session.round().is_idle());
    assert_eq!(session.dice().values(), vec![0, 0, 0, 0, 0]);
    assert_eq!(session.notices().pending(), 1);
}

#[test]
fn test_garbage_is_reported_and_noticed() {
    let mut session = receiver();

    let result = session.handle_incoming("{{{");

    assert!(matches!(result, Err(SessionError::Protocol(_))));
    assert_eq!(session.notices().pending(), 1);
}

#[test]
fn test_second_throw_is_ignored() {
    let mut session = receiver();
    session.handle_incoming(&throw_json(&[1, 1, 1, 1, 1])).unwrap();

    let incoming = session.handle_incoming(&throw_json(&[2, 2, 2, 2, 2])).unwrap();

    assert_eq!(incoming, Incoming::ThrowIgnored);
    assert_eq!(session.dice().values(), vec![1, 1, 1, 1, 1]);
    assert_eq!(session.notices().pending(), 1);
}

// ============================================================================
// THROWING
// ============================================================================

#[tokio::test]
async fn test_thrower_fans_out_one_message() {
    let mut session = thrower();
    let a = Arc::new(MockSendHandle::new());
    let b = Arc::new(MockSendHandle::new());
    session.open_channel(id("a"), a.clone());
    session.open_channel(id("b"), b.clone());

    session.throw(kin(), Instant::now()).unwrap();
    let report = session
        .on_settled(vec![6, 6, 6, 1, 2], &[])
        .await
        .unwrap()
        .unwrap();

    assert_eq!(report.delivered.len(), 2);
    for handle in [&a, &b] {
        let delivered = handle.delivered();
        assert_eq!(delivered.len(), 1);
        assert_eq!(
            decode(&delivered[0]).unwrap(),
            WireMessage::Throw(ThrowMessage::new(vec![6, 6, 6, 1, 2], kin()))
        );
    }
    assert_eq!(session.dice().values(), vec![6, 6, 6, 1, 2]);
}

#[tokio::test]
async fn test_unreadable_settle_is_not_sent() {
    let mut session = thrower();
    let peer = Arc::new(MockSendHandle::new());
    session.open_channel(id("a"), peer.clone());
    session.throw(kin(), Instant::now()).unwrap();

    let result = session.on_settled(vec![0, 7, 3, 3, 3], &[]).await;

    assert!(matches!(
        result,
        Err(SessionError::Throw(ThrowError::Malformed(_)))
    ));
    assert!(peer.delivered().is_empty());
    assert!(matches!(session.round(), RoundState::Thrown { .. }));
    assert_eq!(session.notices().pending(), 1);
}

#[tokio::test]
async fn test_fan_out_failure_is_isolated() {
    let mut session = thrower();
    let good = Arc::new(MockSendHandle::new());
    let bad = Arc::new(MockSendHandle::new().with_failure());
    session.open_channel(id("good"), good.clone());
    session.open_channel(id("bad"), bad.clone());

    session.throw(kin(), Instant::now()).unwrap();
    let report = session
        .on_settled(vec![1, 2, 3, 4, 5], &[])
        .await
        .unwrap()
        .unwrap();

    assert_eq!(report.delivered, vec![id("good")]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(good.delivered().len(), 1);
    assert_eq!(session.channel_count(), 2);
    assert_eq!(session.notices().pending(), 1);
}

#[test]
fn test_receiver_cannot_throw() {
    let mut session = receiver();
    assert_eq!(
        session.throw(kin(), Instant::now()),
        Err(SessionError::Throw(ThrowError::NotThrower))
    );
}

#[tokio::test]
async fn test_settle_records_positions() {
    let mut session = thrower();
    session.throw(kin(), Instant::now()).unwrap();
    let landed = [Vec3::new(3.0, 0.0, 1.0), Vec3::new(-2.0, 0.0, 0.5)];

    let report = session.on_settled(vec![1, 2, 3, 4, 5], &landed).await.unwrap();

    // No data channels yet: still an (empty) emission
    assert!(report.unwrap().delivered.is_empty());
    assert_eq!(session.dice().get(0).unwrap().position, landed[0]);
    assert_eq!(session.dice().get(1).unwrap().position, landed[1]);
}

// ============================================================================
// GROUPING AND RESET
// ============================================================================

#[test]
fn test_select_and_return_dice() {
    let mut session = receiver();
    session.handle_incoming(&throw_json(&[4, 4, 4, 2, 5])).unwrap();

    assert_eq!(
        session.select_die(0).unwrap(),
        SelectionOutcome::Formed { members: vec![0, 1, 2] }
    );

    let moved = session.return_dice();

    assert_eq!(moved, vec![0, 1, 2]);
    assert!(session.grouping().groups().is_empty());
    assert!(session.round().is_idle());

    // Next round's throw is accepted again
    let incoming = session.handle_incoming(&throw_json(&[1, 1, 1, 1, 1])).unwrap();
    assert_eq!(incoming, Incoming::ThrowApplied(vec![1, 1, 1, 1, 1]));
}

#[test]
fn test_select_out_of_range() {
    let mut session = receiver();
    assert!(matches!(
        session.select_die(99),
        Err(SessionError::Grouping(_))
    ));
}

// ============================================================================
// HOUSEKEEPING
// ============================================================================

#[test]
fn test_poll_voids_stuck_throw_and_notifies() {
    let config = GameConfig::new()
        .with_role(ThrowRole::LocalThrower)
        .with_settle_timeout(Duration::from_secs(5));
    let mut session = GameSession::new(config).unwrap();
    let start = Instant::now();
    session.throw(kin(), start).unwrap();

    let tick = session.poll(start + Duration::from_secs(6));

    assert!(session.round().is_idle());
    assert!(matches!(tick, NoticeTick::Shown(_)));
}

#[test]
fn test_invalid_config_rejected() {
    let config = GameConfig::new().with_faces(1);
    assert!(matches!(
        GameSession::new(config),
        Err(SessionError::Config(_))
    ));
}
