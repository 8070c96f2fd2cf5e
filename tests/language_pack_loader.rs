mod common;

use app_ducks::env::IdleQueue;
use app_ducks::intl::{IntlError, IntlState, LanguagePackCache, LoadOptions};
use common::*;
use serde_json::json;
use std::sync::Arc;

fn locale(locale: &str) -> LoadOptions {
    LoadOptions {
        locale: Some(locale.to_string()),
        ..LoadOptions::default()
    }
}

#[tokio::test]
async fn test_concurrent_loads_share_one_fetch() {
    let fetch = MockFetchClient::new();
    fetch.respond_json(EN_US_URL, json!({"greeting": "Hello"}));
    let loader = server_loader(Arc::clone(&fetch));

    let first = loader.load_language_pack(MODULE, LoadOptions::default());
    let second = loader.load_language_pack(MODULE, LoadOptions::default());
    assert!(first.ptr_eq(&second));

    let (a, b) = tokio::join!(first, second);
    assert_eq!(a.unwrap().get("greeting"), Some(&json!("Hello")));
    assert!(b.is_ok());
    assert_eq!(fetch.calls(), vec![EN_US_URL]);
}

#[tokio::test]
async fn test_request_and_success_are_dispatched() {
    let fetch = MockFetchClient::new();
    fetch.respond_json(EN_US_URL, json!({"greeting": "Hello"}));
    let loader = server_loader(fetch);
    let actions = record_actions(loader.store());

    loader.load_language_pack(MODULE, LoadOptions::default()).await.unwrap();

    assert_eq!(
        *actions.lock(),
        vec![
            "app-ducks/intl/LANGUAGE_PACK_REQUEST",
            "app-ducks/intl/LANGUAGE_PACK_SUCCESS"
        ]
    );
    let state = loader.store().get_state();
    let entry = state.entry("en-US", MODULE).unwrap();
    assert!(entry.is_loaded());
    assert!(entry.promise.is_none());
    assert!(entry.last_fetched.is_some());
}

#[tokio::test]
async fn test_missing_pack_falls_back_once() {
    let fetch = MockFetchClient::new();
    fetch.respond_json(EN_US_URL, json!({"greeting": "Hello"}));
    let loader = server_loader(Arc::clone(&fetch));
    let (logs, _guard) = capture_warnings();

    let data = loader
        .load_language_pack(
            MODULE,
            LoadOptions {
                locale: Some("en-CA".to_string()),
                fallback_locale: Some("en-US".to_string()),
                ..LoadOptions::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(data.get("greeting"), Some(&json!("Hello")));
    assert_eq!(fetch.calls(), vec![EN_CA_URL, EN_US_URL]);
    let warnings = logs.contents();
    assert!(warnings.contains("Missing en-CA language pack for my-module, falling back to en-US"));

    // stored under the requested locale
    let state = loader.store().get_state();
    assert_eq!(state.language_pack("en-CA", MODULE).unwrap().len(), 1);
}

#[tokio::test]
async fn test_missing_pack_without_fallback_is_empty() {
    let fetch = MockFetchClient::new();
    let loader = server_loader(Arc::clone(&fetch));
    let (logs, _guard) = capture_warnings();

    let data = loader.load_language_pack(MODULE, locale("en-CA")).await.unwrap();

    assert!(data.is_empty());
    assert_eq!(fetch.call_count(), 1);
    assert!(logs.contents().is_empty());
}

#[tokio::test]
async fn test_fallback_that_is_also_missing_is_empty() {
    let fetch = MockFetchClient::new();
    let loader = server_loader(Arc::clone(&fetch));

    let data = loader
        .load_language_pack(
            MODULE,
            LoadOptions {
                locale: Some("en-CA".to_string()),
                fallback_locale: Some("fr-CA".to_string()),
                ..LoadOptions::default()
            },
        )
        .await
        .unwrap();

    assert!(data.is_empty());
    assert_eq!(fetch.calls(), vec![EN_CA_URL, FR_CA_URL]);
}

#[tokio::test]
async fn test_same_fallback_locale_is_not_retried() {
    let fetch = MockFetchClient::new();
    let loader = server_loader(Arc::clone(&fetch));

    let data = loader
        .load_language_pack(
            MODULE,
            LoadOptions {
                locale: Some("en-US".to_string()),
                fallback_locale: Some("en-US".to_string()),
                ..LoadOptions::default()
            },
        )
        .await
        .unwrap();

    assert!(data.is_empty());
    assert_eq!(fetch.call_count(), 1);
}

#[tokio::test]
async fn test_fallback_url_is_used_for_fallback() {
    let fetch = MockFetchClient::new();
    let custom = "https://my-cdn.example.com/packs/en-us.json";
    fetch.respond_json(custom, json!({"source": "custom"}));
    let loader = server_loader(Arc::clone(&fetch));

    let data = loader
        .load_language_pack(
            MODULE,
            LoadOptions {
                locale: Some("en-CA".to_string()),
                fallback_locale: Some("en-US".to_string()),
                fallback_url: Some(custom.to_string()),
                ..LoadOptions::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(data.get("source"), Some(&json!("custom")));
    assert_eq!(fetch.calls(), vec![EN_CA_URL, custom]);
}

#[tokio::test]
async fn test_server_error_fails_with_status_text() {
    let fetch = MockFetchClient::new();
    fetch.respond(EN_US_URL, MockReply::status(500, "Internal Server Error"));
    let loader = server_loader(fetch);

    let err = loader
        .load_language_pack(MODULE, LoadOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), format!("Internal Server Error ({})", EN_US_URL));
    assert!(matches!(*err, IntlError::Http { status: 500, .. }));

    let state = loader.store().get_state();
    let entry = state.entry("en-US", MODULE).unwrap();
    assert!(entry.error.is_some());
    assert!(entry.error_expiration.is_some());
    assert!(!entry.is_loading);
}

#[tokio::test]
async fn test_network_error_propagates_unchanged() {
    let fetch = MockFetchClient::new();
    fetch.respond(EN_US_URL, MockReply::NetworkError("connection reset".to_string()));
    let loader = server_loader(fetch);
    let actions = record_actions(loader.store());

    let err = loader
        .load_language_pack(MODULE, LoadOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(*err, IntlError::Fetch(_)));
    assert!(err.to_string().contains("connection reset"));
    assert_eq!(actions.lock().last(), Some(&"app-ducks/intl/LANGUAGE_PACK_FAILURE"));
}

#[tokio::test]
async fn test_invalid_json_is_a_parse_error() {
    let fetch = MockFetchClient::new();
    fetch.respond(
        EN_US_URL,
        MockReply::Status {
            status: 200,
            status_text: "OK".to_string(),
            body: "<html>".to_string(),
        },
    );
    let loader = server_loader(fetch);

    let err = loader
        .load_language_pack(MODULE, LoadOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(*err, IntlError::Parse { .. }));
}

#[tokio::test]
async fn test_failed_pack_is_refetched_by_next_load() {
    let fetch = MockFetchClient::new();
    fetch.respond(EN_US_URL, MockReply::status(503, "Service Unavailable"));
    fetch.respond_json(EN_US_URL, json!({"greeting": "Hello"}));
    let loader = server_loader(Arc::clone(&fetch));

    assert!(loader.load_language_pack(MODULE, LoadOptions::default()).await.is_err());
    let data = loader.load_language_pack(MODULE, LoadOptions::default()).await.unwrap();

    assert_eq!(data.get("greeting"), Some(&json!("Hello")));
    assert_eq!(fetch.call_count(), 2);
}

#[tokio::test]
async fn test_loaded_pack_is_returned_without_fetch() {
    let fetch = MockFetchClient::new();
    fetch.respond_json(EN_US_URL, json!({"greeting": "Hello"}));
    let loader = server_loader(Arc::clone(&fetch));

    loader.load_language_pack(MODULE, LoadOptions::default()).await.unwrap();
    let actions = record_actions(loader.store());
    let data = loader.load_language_pack(MODULE, LoadOptions::default()).await.unwrap();

    assert_eq!(data.get("greeting"), Some(&json!("Hello")));
    assert_eq!(fetch.call_count(), 1);
    assert!(actions.lock().is_empty());
}

#[tokio::test]
async fn test_force_starts_a_new_fetch() {
    let fetch = MockFetchClient::new();
    fetch.respond_json(EN_US_URL, json!({"v": 1}));
    fetch.respond_json(EN_US_URL, json!({"v": 2}));
    let loader = server_loader(Arc::clone(&fetch));

    loader.load_language_pack(MODULE, LoadOptions::default()).await.unwrap();
    loader.cache().clear();
    let data = loader
        .load_language_pack(
            MODULE,
            LoadOptions {
                force: true,
                ..LoadOptions::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(data.get("v"), Some(&json!(2)));
    assert_eq!(fetch.call_count(), 2);
}

#[tokio::test]
async fn test_server_cache_serves_later_renders() {
    let fetch = MockFetchClient::new();
    fetch.respond_json(EN_US_URL, json!({"greeting": "Hello"}));
    let cache = Arc::new(LanguagePackCache::default());

    let first = server_loader(Arc::clone(&fetch)).with_cache(Arc::clone(&cache));
    first.load_language_pack(MODULE, LoadOptions::default()).await.unwrap();

    let second = server_loader(Arc::clone(&fetch)).with_cache(Arc::clone(&cache));
    let data = second.load_language_pack(MODULE, LoadOptions::default()).await.unwrap();

    assert_eq!(data.get("greeting"), Some(&json!("Hello")));
    assert_eq!(fetch.call_count(), 1);
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn test_browser_never_uses_server_cache() {
    let fetch = MockFetchClient::new();
    fetch.respond_json(EN_US_URL, json!({"greeting": "Hello"}));
    let loader = browser_loader(Arc::clone(&fetch), Arc::new(IdleQueue::new()));

    loader.load_language_pack(MODULE, LoadOptions::default()).await.unwrap();

    assert!(loader.cache().is_empty());
    let state = loader.store().get_state();
    assert!(!state.entry("en-US", MODULE).unwrap().loaded_on_server);
}

#[tokio::test]
async fn test_server_success_marks_entry_server_loaded() {
    let fetch = MockFetchClient::new();
    fetch.respond_json(EN_US_URL, json!({}));
    let loader = server_loader(fetch);

    loader.load_language_pack(MODULE, LoadOptions::default()).await.unwrap();

    let state = loader.store().get_state();
    assert!(state.entry("en-US", MODULE).unwrap().loaded_on_server);
}

#[tokio::test]
async fn test_explicit_url_is_fetched() {
    let fetch = MockFetchClient::new();
    let custom = "https://my-cdn.example.com/custom.json";
    fetch.respond_json(custom, json!({"byo": true}));
    let loader = server_loader(Arc::clone(&fetch));

    let data = loader
        .load_language_pack(
            MODULE,
            LoadOptions {
                url: Some(custom.to_string()),
                ..LoadOptions::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(data.get("byo"), Some(&json!(true)));
    assert_eq!(fetch.calls(), vec![custom]);
}

#[tokio::test]
async fn test_explicit_url_loads_unregistered_component_with_fallback() {
    let fetch = MockFetchClient::new();
    let custom = "https://my-cdn.example.com/widget/en-ca.json";
    fetch.respond_json(custom, json!({"byo": true}));
    let loader = server_loader(Arc::clone(&fetch));

    let data = loader
        .load_language_pack(
            "unregistered-widget",
            LoadOptions {
                locale: Some("en-CA".to_string()),
                url: Some(custom.to_string()),
                fallback_locale: Some("en-US".to_string()),
                ..LoadOptions::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(data.get("byo"), Some(&json!(true)));
    assert_eq!(fetch.calls(), vec![custom]);
}

#[tokio::test]
async fn test_unresolvable_fallback_fails_after_not_found() {
    let fetch = MockFetchClient::new();
    let custom = "https://my-cdn.example.com/widget/en-ca.json";
    let loader = server_loader(Arc::clone(&fetch));

    let err = loader
        .load_language_pack(
            "unregistered-widget",
            LoadOptions {
                locale: Some("en-CA".to_string()),
                url: Some(custom.to_string()),
                fallback_locale: Some("en-US".to_string()),
                ..LoadOptions::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(&*err, IntlError::UnknownModule { component_key } if component_key == "unregistered-widget"));
    assert_eq!(fetch.calls(), vec![custom]);
    let state = loader.store().get_state();
    let entry = state.entry("en-CA", "unregistered-widget").unwrap();
    assert!(entry.error.is_some());
}

#[tokio::test]
async fn test_locale_filename_replaces_component_key() {
    let fetch = MockFetchClient::new();
    let url = "https://cdn.example.com/my-module/1.0.0/en-us/strings.json";
    fetch.respond_json(url, json!({"ok": true}));
    let loader = server_loader(Arc::clone(&fetch)).with_config(config_store(|c| {
        c.intl.locale_filename = Some("strings".to_string());
    }));

    loader.load_language_pack(MODULE, LoadOptions::default()).await.unwrap();
    assert_eq!(fetch.calls(), vec![url]);
}

#[tokio::test]
async fn test_next_locale_wins_over_active_locale() {
    let fetch = MockFetchClient::new();
    fetch.respond_json(FR_CA_URL, json!({"greeting": "Bonjour"}));
    let mut state = IntlState::new("en-US");
    state.next_locale = Some("fr-CA".to_string());
    let loader = browser_loader_with_state(Arc::clone(&fetch), Arc::new(IdleQueue::new()), state);

    let data = loader.load_language_pack(MODULE, LoadOptions::default()).await.unwrap();
    assert_eq!(data.get("greeting"), Some(&json!("Bonjour")));
    assert_eq!(fetch.calls(), vec![FR_CA_URL]);
}

#[tokio::test]
async fn test_configuration_errors_fail_without_dispatch() {
    let fetch = MockFetchClient::new();
    let loader = server_loader(Arc::clone(&fetch));
    let actions = record_actions(loader.store());

    let err = loader
        .load_language_pack(
            MODULE,
            LoadOptions {
                fallback_url: Some("https://x/fallback.json".to_string()),
                ..LoadOptions::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(*err, IntlError::MissingFallbackLocale { .. }));

    let err = loader
        .load_language_pack("unknown-module", LoadOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(*err, IntlError::UnknownModule { .. }));

    let no_locale = server_loader(Arc::clone(&fetch));
    no_locale.store().replace_state(IntlState::default());
    let err = no_locale
        .load_language_pack(MODULE, LoadOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(*err, IntlError::NoLocale));

    assert!(actions.lock().is_empty());
    assert_eq!(fetch.call_count(), 0);
}

fn hydrated_state() -> IntlState {
    let json = json!({
        "activeLocale": "en-US",
        "languagePacks": {
            "en-US": {"my-module": {"data": {"greeting": "Hello from server"}, "_loadedOnServer": true}}
        }
    });
    IntlState::from_json(&json.to_string()).unwrap()
}

#[tokio::test]
async fn test_hydrated_pack_is_revalidated_once_when_idle() {
    let fetch = MockFetchClient::new();
    fetch.respond_json(EN_US_URL, json!({"greeting": "Hello from client"}));
    let idle = Arc::new(IdleQueue::new());
    let loader = browser_loader_with_state(Arc::clone(&fetch), Arc::clone(&idle), hydrated_state());
    let actions = record_actions(loader.store());

    let data = loader.load_language_pack(MODULE, LoadOptions::default()).await.unwrap();
    assert_eq!(data.get("greeting"), Some(&json!("Hello from server")));
    // already scheduled, no second marker
    loader.load_language_pack(MODULE, LoadOptions::default()).await.unwrap();

    assert_eq!(idle.pending(), 1);
    assert_eq!(fetch.call_count(), 0);
    assert_eq!(
        *actions.lock(),
        vec!["app-ducks/intl/LANGUAGE_PACK_DEFERRED_FORCE_LOAD"]
    );

    assert_eq!(idle.run_idle().await, 1);

    assert_eq!(fetch.calls(), vec![EN_US_URL]);
    let state = loader.store().get_state();
    let entry = state.entry("en-US", MODULE).unwrap();
    assert_eq!(entry.data.get("greeting"), Some(&json!("Hello from client")));
    assert!(!entry.loaded_on_server);
    assert!(!entry.pending_deferred_force_load);

    // client-loaded now, nothing more to schedule
    loader.load_language_pack(MODULE, LoadOptions::default()).await.unwrap();
    assert_eq!(idle.pending(), 0);
}

#[tokio::test]
async fn test_server_never_schedules_deferred_reload() {
    let fetch = MockFetchClient::new();
    let loader = server_loader(Arc::clone(&fetch));
    loader.store().replace_state(hydrated_state());
    let actions = record_actions(loader.store());

    loader.load_language_pack(MODULE, LoadOptions::default()).await.unwrap();

    assert!(actions.lock().is_empty());
    assert_eq!(fetch.call_count(), 0);
}

#[tokio::test]
async fn test_failed_revalidation_keeps_server_data() {
    let fetch = MockFetchClient::new();
    fetch.respond(EN_US_URL, MockReply::status(500, "Internal Server Error"));
    let idle = Arc::new(IdleQueue::new());
    let loader = browser_loader_with_state(Arc::clone(&fetch), Arc::clone(&idle), hydrated_state());

    loader.load_language_pack(MODULE, LoadOptions::default()).await.unwrap();
    idle.run_idle().await;

    let state = loader.store().get_state();
    let entry = state.entry("en-US", MODULE).unwrap();
    assert_eq!(entry.data.get("greeting"), Some(&json!("Hello from server")));
    assert_eq!(fetch.call_count(), 1);
}
