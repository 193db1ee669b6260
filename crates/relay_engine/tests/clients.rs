use std::time::Duration;

use pretty_assertions::assert_eq;
use relay_engine::{
    DiscordWebhook, DiscourseAuth, DiscourseClient, Embed, FailureKind, ForumSource,
    GeminiSummarizer, HttpSettings, Notifier, Summarizer, ThemeSettingSink,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn auth() -> DiscourseAuth {
    DiscourseAuth {
        api_key: "secret".to_string(),
        api_username: "system".to_string(),
    }
}

#[tokio::test]
async fn latest_topics_sends_credentials_and_maps_topics() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/c/news/5/l/latest.json"))
        .and(header("Api-Key", "secret"))
        .and(header("Api-Username", "system"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "topic_list": { "topics": [
                { "id": 10, "slug": "launch", "title": "Launch day" },
                { "id": 11 }
            ]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = DiscourseClient::new(&server.uri(), auth(), &HttpSettings::default()).unwrap();
    let topics = client.latest_topics("news", "5").await.expect("topics");

    assert_eq!(topics.len(), 2);
    assert_eq!(topics[0].id, 10);
    assert_eq!(topics[0].slug, "launch");
    assert_eq!(topics[0].title, "Launch day");
    assert_eq!(topics[1].title, "");
}

#[tokio::test]
async fn topic_posts_requests_raw_markdown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/t/42/posts.json"))
        .and(query_param("include_raw", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "post_stream": { "posts": [
                {
                    "id": 900,
                    "post_number": 1,
                    "raw": "cover",
                    "created_at": "2024-01-01T00:00:00Z"
                },
                { "id": 901, "post_number": 2, "raw": null }
            ]}
        })))
        .mount(&server)
        .await;

    let client = DiscourseClient::new(&server.uri(), auth(), &HttpSettings::default()).unwrap();
    let posts = client.topic_posts(42).await.expect("posts");

    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].created_at.as_deref(), Some("2024-01-01T00:00:00Z"));
    assert_eq!(posts[1].post_number, 2);
    assert_eq!(posts[1].raw, "");
    assert_eq!(posts[1].created_at, None);
}

#[tokio::test]
async fn forum_errors_carry_the_status_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/t/1/posts.json"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let client = DiscourseClient::new(&server.uri(), auth(), &HttpSettings::default()).unwrap();
    let err = client.topic_posts(1).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(403));
    assert!(err.message.contains("forbidden"));
}

#[tokio::test]
async fn malformed_json_is_a_decode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/t/1/posts.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let client = DiscourseClient::new(&server.uri(), auth(), &HttpSettings::default()).unwrap();
    let err = client.topic_posts(1).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn slow_forum_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/t/1/posts.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({})),
        )
        .mount(&server)
        .await;

    let settings = HttpSettings {
        request_timeout: Duration::from_millis(50),
        ..HttpSettings::default()
    };
    let client = DiscourseClient::new(&server.uri(), auth(), &settings).unwrap();
    let err = client.topic_posts(1).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn theme_setting_is_put_as_name_and_value() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/admin/themes/12/setting.json"))
        .and(header("Api-Key", "secret"))
        .and(body_json(json!({ "name": "marquee_list", "value": "a|b" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": "OK" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = DiscourseClient::new(&server.uri(), auth(), &HttpSettings::default()).unwrap();
    client
        .update_setting("12", "marquee_list", "a|b")
        .await
        .expect("put ok");
}

#[tokio::test]
async fn gemini_summary_is_first_candidate_text_trimmed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-pro:generateContent"))
        .and(query_param("key", "gk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "  Short summary.\n" }] } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let endpoint = format!("{}/v1beta/models/gemini-pro", server.uri());
    let summarizer = GeminiSummarizer::new(&endpoint, "gk", &HttpSettings::default()).unwrap();
    let summary = summarizer.summarize("long text").await.expect("summary");
    assert_eq!(summary, "Short summary.");
}

#[tokio::test]
async fn gemini_without_candidates_gives_empty_summary() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/m:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let endpoint = format!("{}/m", server.uri());
    let summarizer = GeminiSummarizer::new(&endpoint, "gk", &HttpSettings::default()).unwrap();
    assert_eq!(summarizer.summarize("x").await.unwrap(), "");
}

#[tokio::test]
async fn webhook_create_waits_for_message_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/webhooks/1/tok"))
        .and(query_param("wait", "true"))
        .and(body_json(json!({
            "content": "",
            "embeds": [{ "title": "Hello", "url": "https://f/t/x/1/2", "description": "Sum" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "555" })))
        .expect(1)
        .mount(&server)
        .await;

    let webhook = format!("{}/api/webhooks/1/tok", server.uri());
    let notifier = DiscordWebhook::new(&webhook, &HttpSettings::default()).unwrap();
    let embed = Embed::new("Hello")
        .url("https://f/t/x/1/2")
        .description("Sum");

    let id = notifier.create_message(&embed).await.expect("created");
    assert_eq!(id.as_deref(), Some("555"));
}

#[tokio::test]
async fn webhook_edit_patches_the_message() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/webhooks/1/tok/messages/555"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let webhook = format!("{}/api/webhooks/1/tok", server.uri());
    let notifier = DiscordWebhook::new(&webhook, &HttpSettings::default()).unwrap();
    notifier
        .edit_message("555", &Embed::new("Status").color(0x2ECC71))
        .await
        .expect("edited");
}
