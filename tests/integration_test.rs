use holdout::protocol::{HostEvent, PlayerEvent};
use holdout::state::AppState;
use holdout::types::GameStatus;
use std::sync::Arc;

async fn join(state: &AppState, name: &str) -> String {
    let session = state.current_session().await;
    state
        .register_player(name, &session)
        .await
        .expect("registration should succeed")
        .token
}

/// End-to-end test of a complete game: join, vote, eliminate, advance,
/// refresh the session, reset — asserting both state and the events each
/// audience sees along the way.
#[tokio::test]
async fn test_full_game_flow() {
    let state = Arc::new(AppState::new());
    let mut host_rx = state.broadcaster.subscribe_host();

    // 1. Three players join
    let alice = join(&state, "Alice").await;
    let bob = join(&state, "Bob").await;
    let carol = join(&state, "Carol").await;

    for expected in ["Alice", "Bob", "Carol"] {
        match host_rx.recv().await.unwrap() {
            HostEvent::UserJoined { name, .. } => assert_eq!(name, expected),
            other => panic!("expected user_joined, got {other:?}"),
        }
    }

    // 2. Players connect their push channels
    let (_alice_tx, mut alice_rx) = state.broadcaster.attach_player(&alice).await;
    let (_carol_tx, mut carol_rx) = state.broadcaster.attach_player(&carol).await;

    // 3. Host configures options and opens voting
    state
        .configure_options(vec!["Mountains".into(), "Sea".into()])
        .await
        .unwrap();
    state.start_voting().await.unwrap();

    match host_rx.recv().await.unwrap() {
        HostEvent::StatusChange {
            status, results, ..
        } => {
            assert_eq!(status, GameStatus::Voting);
            assert!(results.is_none());
        }
        other => panic!("expected status_change, got {other:?}"),
    }
    for rx in [&mut alice_rx, &mut carol_rx] {
        match rx.recv().await.unwrap() {
            PlayerEvent::VotingStarted { round, options } => {
                assert_eq!(round, 1);
                assert_eq!(options.len(), 2);
            }
            other => panic!("expected voting_started, got {other:?}"),
        }
    }

    // 4. Votes come in: Mountains is the majority 2-1
    state.submit_vote(&alice, "option_1").await.unwrap();
    state.submit_vote(&bob, "option_1").await.unwrap();
    state.submit_vote(&carol, "option_2").await.unwrap();

    let mut last_voted_count = 0;
    for _ in 0..3 {
        match host_rx.recv().await.unwrap() {
            HostEvent::VoteUpdate {
                voted_count,
                user_count,
                ..
            } => {
                assert_eq!(user_count, 3);
                last_voted_count = voted_count;
            }
            other => panic!("expected vote_update, got {other:?}"),
        }
    }
    assert_eq!(last_voted_count, 3);

    // A second vote is rejected and the first stands
    assert!(state.submit_vote(&alice, "option_2").await.is_err());
    let snapshot = state.player_snapshot(&alice).await.unwrap();
    assert_eq!(snapshot.vote_option.as_deref(), Some("option_1"));

    // 5. Host closes voting; tallies freeze
    let results = state.end_voting().await.unwrap();
    assert_eq!(results[0].votes, 2);
    assert_eq!(results[1].votes, 1);

    match host_rx.recv().await.unwrap() {
        HostEvent::StatusChange {
            status, results, ..
        } => {
            assert_eq!(status, GameStatus::Result);
            assert_eq!(results.unwrap()[0].votes, 2);
        }
        other => panic!("expected status_change, got {other:?}"),
    }
    for rx in [&mut alice_rx, &mut carol_rx] {
        match rx.recv().await.unwrap() {
            PlayerEvent::VotingEnded { results, .. } => assert_eq!(results.len(), 2),
            other => panic!("expected voting_ended, got {other:?}"),
        }
    }

    // Ending again is a no-op: same tally, no second broadcast
    let again = state.end_voting().await.unwrap();
    assert_eq!(again, results);
    assert!(host_rx.try_recv().is_err());

    // 6. Advance: the majority voters go, the minority voter stays
    let summary = state.next_round(None).await.unwrap();
    assert_eq!(summary.round, 2);
    assert_eq!(summary.eliminated_count, 2);
    assert_eq!(summary.active_users, 1);
    assert!(!summary.is_tie);

    match host_rx.recv().await.unwrap() {
        HostEvent::RoundChange {
            round,
            eliminated_tokens,
            active_users,
            is_tie,
        } => {
            assert_eq!(round, 2);
            assert_eq!(active_users, 1);
            assert!(!is_tie);
            assert!(eliminated_tokens.contains(&alice));
            assert!(eliminated_tokens.contains(&bob));
        }
        other => panic!("expected round_change, got {other:?}"),
    }
    match alice_rx.recv().await.unwrap() {
        PlayerEvent::Eliminated { round } => assert_eq!(round, 1),
        other => panic!("expected eliminated, got {other:?}"),
    }
    match carol_rx.recv().await.unwrap() {
        PlayerEvent::NextRound { round, .. } => assert_eq!(round, 2),
        other => panic!("expected next_round, got {other:?}"),
    }

    let history = state.history_snapshot().await;
    assert_eq!(history.total_rounds, 1);
    assert_eq!(history.history[0].survivors, vec!["Carol"]);

    // 7. Refreshing the session never locks out registered players
    let old_session = state.current_session().await;
    let new_session = state.refresh_session().await;
    assert_ne!(old_session, new_session);

    match host_rx.recv().await.unwrap() {
        HostEvent::SessionRefreshed { session_id } => assert_eq!(session_id, new_session),
        other => panic!("expected session_refreshed, got {other:?}"),
    }

    // Carol's token still works for reconciliation and voting
    assert!(state.player_snapshot(&carol).await.is_ok());
    // A newcomer with the old session id is turned away
    assert!(state.register_player("Dave", &old_session).await.is_err());
    assert!(state.register_player("Dave", &new_session).await.is_ok());

    // 8. Reset returns everything to round 1
    state.reset_game().await;
    match carol_rx.recv().await.unwrap() {
        PlayerEvent::GameReset => {}
        other => panic!("expected game_reset, got {other:?}"),
    }

    let snapshot = state.game_snapshot().await;
    assert_eq!(snapshot.status, GameStatus::Waiting);
    assert_eq!(snapshot.round, 1);
    assert_eq!(snapshot.user_count, 0);
    assert!(state.list_players().await.is_empty());
    assert_eq!(state.history_snapshot().await.total_rounds, 0);
}

/// Concurrent vote submissions from many tasks serialize cleanly: every
/// vote lands exactly once and the tally adds up.
#[tokio::test]
async fn test_concurrent_votes_serialize() {
    let state = Arc::new(AppState::new());

    let mut tokens = Vec::new();
    for i in 0..20 {
        tokens.push(join(&state, &format!("Player{i}")).await);
    }

    state
        .configure_options(vec!["Red".into(), "Green".into(), "Blue".into()])
        .await
        .unwrap();
    state.start_voting().await.unwrap();

    let mut handles = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        let state = state.clone();
        let token = token.clone();
        let option = format!("option_{}", (i % 3) + 1);
        handles.push(tokio::spawn(async move {
            state.submit_vote(&token, &option).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let snapshot = state.game_snapshot().await;
    assert_eq!(snapshot.voted_count, 20);
    let total: u32 = snapshot.options.iter().map(|o| o.votes).sum();
    assert_eq!(total, 20);
    // 20 voters over 3 options: 7 + 7 + 6
    let mut counts: Vec<u32> = snapshot.options.iter().map(|o| o.votes).collect();
    counts.sort_unstable();
    assert_eq!(counts, vec![6, 7, 7]);
}

/// A returning player (same name) gets the token it was first issued
/// instead of a second seat.
#[tokio::test]
async fn test_returning_player_keeps_token() {
    let state = Arc::new(AppState::new());
    let session = state.current_session().await;

    let first = state.register_player("Alice", &session).await.unwrap();
    assert!(!first.returning);

    let second = state.register_player("alice", &session).await.unwrap();
    assert!(second.returning);
    assert_eq!(second.token, first.token);
    assert_eq!(state.list_players().await.len(), 1);
}

/// Late joiners during an open vote get the option list immediately and
/// count as active non-voters for elimination.
#[tokio::test]
async fn test_join_during_voting() {
    let state = Arc::new(AppState::new());
    let alice = join(&state, "Alice").await;
    let bob = join(&state, "Bob").await;

    state
        .configure_options(vec!["A".into(), "B".into()])
        .await
        .unwrap();
    state.start_voting().await.unwrap();

    let session = state.current_session().await;
    let late = state.register_player("Late", &session).await.unwrap();
    assert_eq!(late.options.map(|o| o.len()), Some(2));

    // 1-1 tie between the early voters; the late non-voter is eliminated
    state.submit_vote(&alice, "option_1").await.unwrap();
    state.submit_vote(&bob, "option_2").await.unwrap();
    state.end_voting().await.unwrap();
    let summary = state.next_round(None).await.unwrap();

    assert!(summary.is_tie);
    assert_eq!(summary.eliminated_count, 1);
    let record = &state.history_snapshot().await.history[0];
    assert_eq!(record.eliminated, vec!["Late"]);
    assert_eq!(record.survivors, vec!["Alice", "Bob"]);
}
