
use party_core::{Effect, MatchEvent, PointerEvent};
use party_host::{HostNotice, StaticPromptSource};
use party_types::{Difficulty, Phase, Signal, WordSource};
use std::sync::Arc;
use std::time::Duration;
use test_helpers::*;

#[tokio::test(start_paused = true)]
async fn test_countdown_ticks_once_per_second() {
    let host = host_in_drawing().await;

    wait_ticks(10).await;

    let state = host.snapshot().await;
    assert_eq!(state.phase, Phase::Drawing);
    assert_eq!(state.turn.timer, 50);
}

#[tokio::test(start_paused = true)]
async fn test_countdown_times_out_into_post_turn() {
    let host = host_in_drawing().await;

    wait_ticks(60).await;

    let state = host.snapshot().await;
    assert_eq!(state.phase, Phase::PostTurn);
    assert_eq!(state.turn.timer, 0);
    assert_eq!(state.history.len(), 1);
    assert!(!state.history[0].was_correct);

    // Nothing keeps ticking after the timeout
    wait_ticks(5).await;
    assert_eq!(host.snapshot().await.turn.timer, 0);
}

#[tokio::test(start_paused = true)]
async fn test_next_countdown_survives_previous_timeout() {
    let host = host_in_drawing().await;
    wait_ticks(60).await;
    assert_eq!(host.phase().await, Phase::PostTurn);

    host.dispatch(Signal::NextTurn).await.unwrap();
    host.dispatch(Signal::Ready).await.unwrap();
    host.dispatch(Signal::ChoosePrompt { index: 0 }).await.unwrap();
    wait_ticks(5).await;

    let state = host.snapshot().await;
    assert_eq!(state.phase, Phase::Drawing);
    assert_eq!(state.turn.timer, 55);
}

#[tokio::test(start_paused = true)]
async fn test_mark_correct_freezes_timer_and_cancel_resumes() {
    let host = host_in_drawing().await;
    wait_ticks(5).await;

    host.dispatch(Signal::MarkCorrect).await.unwrap();
    wait_ticks(10).await;
    assert_eq!(host.snapshot().await.turn.timer, 55);

    host.dispatch(Signal::CancelConfirm).await.unwrap();
    wait_ticks(3).await;
    let state = host.snapshot().await;
    assert_eq!(state.phase, Phase::Drawing);
    assert_eq!(state.turn.timer, 52);
}

#[tokio::test(start_paused = true)]
async fn test_scored_turn_stops_countdown() {
    let host = host_in_drawing().await;
    wait_ticks(20).await;

    host.dispatch(Signal::MarkCorrect).await.unwrap();
    let bob = host.snapshot().await.players[1].id;
    host.dispatch(Signal::ToggleGuesser { player_id: bob })
        .await
        .unwrap();
    host.dispatch(Signal::SubmitScore).await.unwrap();

    let state = host.snapshot().await;
    assert_eq!(state.phase, Phase::PostTurn);
    // 40 seconds left: easy prompt with the speed bonus
    assert_eq!(state.players[0].score, 1);
    assert_eq!(state.players[1].score, 2);

    wait_ticks(60).await;
    assert_eq!(host.snapshot().await.history.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_end_early_stops_countdown() {
    let host = host_in_drawing().await;
    wait_ticks(2).await;

    let effects = host.dispatch(Signal::EndEarly).await.unwrap();
    assert_eq!(effects, vec![Effect::StopCountdown]);

    wait_ticks(70).await;
    let state = host.snapshot().await;
    assert_eq!(state.phase, Phase::GameOver);
    assert_eq!(state.turn.timer, 58);
    assert!(state.history.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_end_early_while_loading_drops_the_batch() {
    let source = Arc::new(SlowPromptSource::new(Duration::from_secs(30)));
    let host = create_test_host(source.clone());
    add_players(&host, &["Alice", "Bob"]).await;

    let effects = host.start_match().await.unwrap();
    assert!(matches!(effects[..], [Effect::FetchPrompts { .. }]));
    settle().await;
    assert_eq!(source.request_count(), 1);

    host.dispatch(Signal::EndEarly).await.unwrap();
    tokio::time::sleep(Duration::from_secs(60)).await;

    let state = host.snapshot().await;
    assert_eq!(state.phase, Phase::GameOver);
    assert!(state.prompt_pool.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_slow_fetch_keeps_loading_until_batch_arrives() {
    let source = Arc::new(SlowPromptSource::new(Duration::from_secs(5)));
    let host = create_test_host(source);
    add_players(&host, &["Alice", "Bob", "Cara"]).await;

    host.start_match().await.unwrap();
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(host.phase().await, Phase::Loading);

    tokio::time::sleep(Duration::from_secs(4)).await;
    let state = host.snapshot().await;
    assert_eq!(state.phase, Phase::PreTurn);
    assert_eq!(state.turn.prompt_choices.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_single_player_start_is_ignored() {
    let host = create_test_host(Arc::new(StaticPromptSource));
    add_players(&host, &["Alice"]).await;

    let effects = host.start_match().await.unwrap();
    assert!(effects.is_empty());
    assert_eq!(host.phase().await, Phase::Setup);
}

#[tokio::test(start_paused = true)]
async fn test_empty_custom_bank_sends_notice() {
    let host = create_test_host(Arc::new(StaticPromptSource));
    let mut notices = host.subscribe_notices();
    add_players(&host, &["Alice", "Bob"]).await;

    host.create_bank("Empty").await.unwrap();
    host.set_word_source(WordSource::Custom).await.unwrap();
    host.start_match().await.unwrap();

    assert_eq!(host.phase().await, Phase::Setup);
    assert_eq!(
        notices.recv().await.unwrap(),
        HostNotice::BankNeedsWords {
            usable_words: 0,
            required: 3
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_custom_bank_match_skips_fetch() {
    let host = create_test_host(Arc::new(SlowPromptSource::new(Duration::from_secs(60))));
    add_players(&host, &["Alice", "Bob"]).await;

    let id = host.create_bank("Kitchen").await.unwrap();
    host.set_bank_words(&id, Difficulty::Easy, "spoon\nfork\nladle")
        .await
        .unwrap();
    host.set_word_source(WordSource::Custom).await.unwrap();

    host.start_match().await.unwrap();
    let state = host.snapshot().await;
    assert_eq!(state.phase, Phase::PreTurn);
    let words: Vec<&str> = state
        .turn
        .prompt_choices
        .iter()
        .map(|p| p.word.as_str())
        .collect();
    assert_eq!(words, vec!["spoon", "fork", "ladle"]);
}

#[tokio::test(start_paused = true)]
async fn test_canvas_only_records_while_drawing() {
    let host = create_test_host(Arc::new(StaticPromptSource));
    add_players(&host, &["Alice", "Bob"]).await;
    assert!(!host.pointer(PointerEvent::Down { x: 1.0, y: 1.0 }));

    host.start_match().await.unwrap();
    settle().await;
    host.dispatch(Signal::Ready).await.unwrap();
    host.dispatch(Signal::ChoosePrompt { index: 1 }).await.unwrap();

    assert!(host.pointer(PointerEvent::Down { x: 1.0, y: 1.0 }));
    assert!(host.pointer(PointerEvent::Move { x: 4.0, y: 2.0 }));
    assert!(host.pointer(PointerEvent::Up));
    assert_eq!(host.strokes().len(), 1);

    host.dispatch(Signal::MarkCorrect).await.unwrap();
    assert!(!host.pointer(PointerEvent::Down { x: 0.0, y: 0.0 }));
    host.dispatch(Signal::CancelConfirm).await.unwrap();
    assert_eq!(host.strokes().len(), 1);

    host.dispatch(Signal::Skip).await.unwrap();
    host.dispatch(Signal::NextTurn).await.unwrap();
    host.dispatch(Signal::Ready).await.unwrap();
    host.dispatch(Signal::ChoosePrompt { index: 0 }).await.unwrap();
    // A new prompt starts on a clean canvas
    assert!(host.strokes().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_canvas_resize_and_clear() {
    let host = host_in_drawing().await;
    assert!(host.resize_canvas(800, 600));

    host.pointer(PointerEvent::Down { x: 10.0, y: 10.0 });
    host.pointer(PointerEvent::Up);
    assert!(host.resize_canvas(900, 650));
    assert_eq!(host.strokes().len(), 1);

    // Past the tolerance the drawing is dropped
    assert!(!host.resize_canvas(1200, 650));
    assert!(host.strokes().is_empty());

    host.pointer(PointerEvent::Down { x: 5.0, y: 5.0 });
    host.pointer(PointerEvent::Up);
    host.clear_canvas();
    assert!(host.strokes().is_empty());
    assert_eq!(host.phase().await, Phase::Drawing);
}

#[tokio::test(start_paused = true)]
async fn test_events_are_broadcast() {
    let host = create_test_host(Arc::new(StaticPromptSource));
    let mut events = host.subscribe_events();
    add_players(&host, &["Alice", "Bob"]).await;

    host.start_match().await.unwrap();
    settle().await;

    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event);
    }
    assert!(seen.iter().any(|e| matches!(e, MatchEvent::MatchStarted { player_count: 2, .. })));
    assert!(seen.iter().any(|e| matches!(
        e,
        MatchEvent::PhaseChanged {
            to: Phase::PreTurn,
            ..
        }
    )));
}

#[tokio::test(start_paused = true)]
async fn test_hint_reveals_as_time_passes() {
    let host = host_in_drawing().await;
    let word = host.snapshot().await.turn.current_prompt.unwrap().word;

    // Fallback easy prompts hide their length for the first 30 seconds
    assert_eq!(host.hint().await.and_then(|h| h.masked()), None);

    wait_ticks(40).await;
    let mask = host.hint().await.and_then(|h| h.masked()).unwrap();
    assert_eq!(mask.chars().count(), word.chars().count());
    assert!(mask.starts_with(word.chars().next().unwrap()));
}

#[tokio::test]
async fn test_bank_edits_are_persisted() {
    let (host, repository) = create_persistent_host().await;

    let id = host.create_bank("Road Trip").await.unwrap();
    host.set_bank_words(&id, Difficulty::Hard, "odometer, billboard")
        .await
        .unwrap();
    host.set_word_source(WordSource::Custom).await.unwrap();

    let stored = repository.load().await.unwrap();
    assert_eq!(stored, host.settings().await);
    assert_eq!(stored.catalog.selected_id(), Some(id.as_str()));
    assert_eq!(stored.source, WordSource::Custom);

    assert_eq!(host.delete_bank(&id).await, Ok(true));
    let stored = repository.load().await.unwrap();
    assert!(stored.catalog.get(&id).is_none());
}

#[tokio::test]
async fn test_last_bank_survives_delete() {
    let (host, repository) = create_persistent_host().await;
    let only = host.settings().await.catalog.selected_id().unwrap().to_string();

    assert_eq!(host.delete_bank(&only).await, Ok(false));
    assert_eq!(host.settings().await.catalog.banks().len(), 1);
    assert_eq!(repository.load().await.unwrap().catalog.banks().len(), 1);
}

#[tokio::test]
async fn test_failed_save_keeps_edit_and_sends_notice() {
    let host = create_host_with_broken_store().await;
    let mut notices = host.subscribe_notices();

    let id = host.create_bank("Offline").await.unwrap();

    assert_eq!(host.settings().await.catalog.selected_id(), Some(id.as_str()));
    match notices.recv().await.unwrap() {
        HostNotice::SettingsNotSaved { reason } => assert!(!reason.is_empty()),
        other => panic!("unexpected notice {:?}", other),
    }
}
