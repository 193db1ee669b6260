use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use relay_core::{CallBudget, ItemKey, MessageSlot, TrackerState};

#[test]
fn budget_allows_calls_until_the_window_is_full() {
    let start = Instant::now();
    let mut budget = CallBudget::per_minute(5);

    for i in 0..5 {
        let at = start + Duration::from_secs(i);
        assert_eq!(budget.delay_before_call(at), Duration::ZERO);
        budget.record_call(at);
    }

    let now = start + Duration::from_secs(10);
    assert_eq!(budget.delay_before_call(now), Duration::from_secs(50));
}

#[test]
fn budget_frees_slots_as_calls_age_out() {
    let start = Instant::now();
    let mut budget = CallBudget::new(2, Duration::from_secs(60));
    budget.record_call(start);
    budget.record_call(start + Duration::from_secs(30));

    let later = start + Duration::from_secs(61);
    assert_eq!(budget.delay_before_call(later), Duration::ZERO);
    budget.record_call(later);

    // The call at +30s is still in the window, so a third call must wait for it.
    assert_eq!(budget.delay_before_call(later), Duration::from_secs(29));
}

#[test]
fn separate_budgets_do_not_share_history() {
    let start = Instant::now();
    let mut first = CallBudget::new(1, Duration::from_secs(60));
    let mut second = CallBudget::new(1, Duration::from_secs(60));
    first.record_call(start);

    assert!(first.delay_before_call(start) > Duration::ZERO);
    assert_eq!(second.delay_before_call(start), Duration::ZERO);
}

#[test]
fn tracker_state_loads_partial_documents() {
    let state: TrackerState =
        serde_json::from_str(r#"{"last_seen": {"42": 3}, "last_id": 99}"#).unwrap();
    assert_eq!(state.watermark(42), 3);
    assert_eq!(state.watermark(7), 0);
    assert!(state.marquee.is_empty());
    assert!(state.published.is_empty());
}

#[test]
fn tracker_state_round_trips_through_json() {
    let mut state = TrackerState::new();
    state.last_seen.insert("1".to_string(), 5);
    state.marquee.push("<a href=\"u\">T</a>".to_string());
    state
        .published
        .insert(ItemKey::new(1, 5).to_string(), "123".to_string());

    let text = serde_json::to_string_pretty(&state).unwrap();
    let back: TrackerState = serde_json::from_str(&text).unwrap();
    assert_eq!(back, state);
}

#[test]
fn item_key_displays_as_topic_and_post() {
    assert_eq!(ItemKey::new(42, 7).to_string(), "42/7");
}

#[test]
fn message_slot_defaults_to_empty() {
    let slot: MessageSlot = serde_json::from_str("{}").unwrap();
    assert_eq!(slot, MessageSlot::default());
    assert_eq!(MessageSlot::with_id("9").message_id.as_deref(), Some("9"));
}
