use serde_json::json;

use post_webhook::enums::response_handling::ResponseHandling;
use post_webhook::errors::{ErrorCategory, WebhookError};
use post_webhook::services::attachment_resolver::AttachmentResolver;
use post_webhook::services::webhook_service::WebhookService;
use post_webhook::structs::config::settings::Settings;
use post_webhook::structs::config::webhook_config::{CustomHeaders, WebhookConfig};
use post_webhook::structs::response_mode_choice::ResponseModeChoice;
use post_webhook::structs::send_request::SendRequest;

use crate::common::{collaborators, FixedPrompt, MemoryVault, RecordingTransport, CREATED_AT, MODIFIED_AT};

fn settings() -> Settings {
    Settings {
        vault_name: "MyVault".to_string(),
        ..Settings::default()
    }
}

fn webhook(mode: ResponseHandling) -> WebhookConfig {
    let mut webhook = WebhookConfig::new("Hook", "https://hooks.example.com/in");
    webhook.response_handling = mode;
    webhook
}

#[tokio::test]
async fn empty_url_is_rejected_before_any_request() {
    let vault = MemoryVault::new().with_file("Note.md", "text");
    let transport = RecordingTransport::text("unused");
    let prompt = FixedPrompt::cancelling();
    let service = WebhookService::new(collaborators(&vault, &transport, &prompt), &settings());

    let mut config = webhook(ResponseHandling::None);
    config.url = String::new();

    let err = service
        .send(&mut config, SendRequest::note(MemoryVault::doc("Note.md")))
        .await
        .unwrap_err();
    assert_eq!(err, WebhookError::MissingUrl);
    assert_eq!(err.category(), ErrorCategory::Configuration);
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn malformed_headers_are_rejected_before_any_request() {
    let vault = MemoryVault::new().with_file("Note.md", "text");
    let transport = RecordingTransport::text("unused");
    let prompt = FixedPrompt::cancelling();
    let service = WebhookService::new(collaborators(&vault, &transport, &prompt), &settings());

    let mut config = webhook(ResponseHandling::None);
    config.headers = Some(CustomHeaders::Raw("{\"Authorization\": ".into()));

    let err = service
        .send(&mut config, SendRequest::note(MemoryVault::doc("Note.md")))
        .await
        .unwrap_err();
    assert!(matches!(err, WebhookError::InvalidHeaders(_)));
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn payload_spreads_header_and_sends_trimmed_body() {
    let text = "---\ntitle: Weekly\ntags:\n  - work\n  - review\n---\n\n  Body text here.  \n\n";
    let vault = MemoryVault::new().with_file("Notes/Weekly.md", text);
    let transport = RecordingTransport::text("ok");
    let prompt = FixedPrompt::cancelling();
    let service = WebhookService::new(collaborators(&vault, &transport, &prompt), &settings());

    let mut config = webhook(ResponseHandling::None);
    config.headers = Some(CustomHeaders::Raw(r#"{"Authorization": "Bearer abc"}"#.into()));

    let outcome = service
        .send(&mut config, SendRequest::note(MemoryVault::doc("Notes/Weekly.md")))
        .await
        .unwrap();
    assert_eq!(outcome.response.status, 200);
    assert_eq!(outcome.response.text, "ok");
    assert_eq!(outcome.applied_mode, ResponseHandling::None);

    let request = transport.last_request();
    assert_eq!(request.url, "https://hooks.example.com/in");
    assert_eq!(request.header("authorization"), Some("Bearer abc"));
    assert_eq!(request.header("content-type"), Some("application/json"));

    let payload = transport.last_payload();
    assert_eq!(payload["title"], json!("Weekly"));
    assert_eq!(payload["tags"], json!(["work", "review"]));
    assert_eq!(payload["content"], json!("Body text here."));
    assert_eq!(payload["filename"], json!("Weekly.md"));
    assert_eq!(payload["filepath"], json!("Notes/Weekly.md"));
    assert_eq!(payload["createdAt"], json!(CREATED_AT));
    assert_eq!(payload["modifiedAt"], json!(MODIFIED_AT));
    assert!(payload["timestamp"].as_i64().unwrap() > 0);
    assert_eq!(payload["attachments"], json!([]));
    assert!(payload.get("renderedHtml").is_none());

    assert_eq!(vault.text("Notes/Weekly.md").as_deref(), Some(text));
}

#[tokio::test]
async fn inline_fields_accumulate_and_variables_win() {
    let text = "tags:: [a, b]\nstatus:: draft\ntags:: [c]\n";
    let variables = "---\npost-webhook: true\n---\n--status\nfrom variables\n--extra\nvalue\n";
    let vault = MemoryVault::new()
        .with_file("Note.md", text)
        .with_file("Context.md", variables);
    let transport = RecordingTransport::text("ok");
    let prompt = FixedPrompt::picking_note(0);
    let service = WebhookService::new(collaborators(&vault, &transport, &prompt), &settings());

    let mut config = webhook(ResponseHandling::None);
    config.process_inline_fields = true;
    config.include_variable_note = true;

    service
        .send(&mut config, SendRequest::note(MemoryVault::doc("Note.md")))
        .await
        .unwrap();

    let payload = transport.last_payload();
    assert_eq!(payload["tags"], json!(["a", "b", "c"]));
    assert_eq!(payload["status"], json!("from variables"));
    assert_eq!(payload["extra"], json!("value"));
}

#[tokio::test]
async fn cancelled_variable_note_prompt_sends_nothing() {
    let vault = MemoryVault::new()
        .with_file("Note.md", "body")
        .with_file("Context.md", "---\npost-webhook: \"true\"\n---\n--a\n1");
    let transport = RecordingTransport::text("ok");
    let prompt = FixedPrompt::cancelling();
    let service = WebhookService::new(collaborators(&vault, &transport, &prompt), &settings());

    let mut config = webhook(ResponseHandling::Append);
    config.include_variable_note = true;

    let err = service
        .send(&mut config, SendRequest::note(MemoryVault::doc("Note.md")))
        .await
        .unwrap_err();
    assert!(err.is_cancellation());
    assert_eq!(err.to_string(), "Variable note selection cancelled");
    assert_eq!(transport.calls(), 0);
    assert_eq!(vault.text("Note.md").as_deref(), Some("body"));
}

#[tokio::test]
async fn internal_links_become_vault_uris() {
    let vault = MemoryVault::new()
        .with_file("Note.md", "Hello [[world]] friend")
        .with_file("Folder/World.md", "")
        .with_link("world", "Folder/World.md");
    let transport = RecordingTransport::text("ok");
    let prompt = FixedPrompt::cancelling();
    let service = WebhookService::new(collaborators(&vault, &transport, &prompt), &settings());

    let mut config = webhook(ResponseHandling::None);
    config.convert_internal_links = true;
    config.send_rendered_markup = true;

    service
        .send(&mut config, SendRequest::note(MemoryVault::doc("Note.md")))
        .await
        .unwrap();

    let payload = transport.last_payload();
    assert_eq!(
        payload["content"],
        json!("Hello [world](obsidian://vault/MyVault/Folder%2FWorld.md) friend")
    );
    let html = payload["renderedHtml"].as_str().unwrap();
    assert!(html.contains(r#"<a href="obsidian://vault/MyVault/Folder%2FWorld.md">world</a>"#));
}

#[tokio::test]
async fn append_inserts_after_selection() {
    let text = "Intro line.\nThis is the key sentence of the note.\nOutro.";
    let vault = MemoryVault::new().with_file("Note.md", text);
    let transport = RecordingTransport::text("Done");
    let prompt = FixedPrompt::cancelling();
    let service = WebhookService::new(collaborators(&vault, &transport, &prompt), &settings());

    let mut config = webhook(ResponseHandling::Append);
    let outcome = service
        .send(&mut config, SendRequest::selection(MemoryVault::doc("Note.md"), "key sentence"))
        .await
        .unwrap();

    assert_eq!(outcome.applied_mode, ResponseHandling::Append);
    assert_eq!(transport.last_payload()["content"], json!("key sentence"));
    assert_eq!(
        vault.text("Note.md").unwrap(),
        "Intro line.\nThis is the key sentence\n\nDone\n\n of the note.\nOutro."
    );
}

#[tokio::test]
async fn append_without_selection_goes_to_the_end() {
    let vault = MemoryVault::new().with_file("Note.md", "Body");
    let transport = RecordingTransport::text("Done");
    let prompt = FixedPrompt::cancelling();
    let service = WebhookService::new(collaborators(&vault, &transport, &prompt), &settings());

    service
        .send(&mut webhook(ResponseHandling::Append), SendRequest::note(MemoryVault::doc("Note.md")))
        .await
        .unwrap();
    assert_eq!(vault.text("Note.md").unwrap(), "Body\n\nDone");
}

#[tokio::test]
async fn overwrite_replaces_the_note() {
    let vault = MemoryVault::new().with_file("Note.md", "old");
    let transport = RecordingTransport::text("new content");
    let prompt = FixedPrompt::cancelling();
    let service = WebhookService::new(collaborators(&vault, &transport, &prompt), &settings());

    service
        .send(&mut webhook(ResponseHandling::Overwrite), SendRequest::note(MemoryVault::doc("Note.md")))
        .await
        .unwrap();
    assert_eq!(vault.text("Note.md").unwrap(), "new content");
}

#[tokio::test]
async fn empty_response_never_touches_the_vault() {
    for mode in [ResponseHandling::Overwrite, ResponseHandling::Append, ResponseHandling::New, ResponseHandling::Ask] {
        let vault = MemoryVault::new().with_file("Note.md", "Body");
        let transport = RecordingTransport::text("");
        let prompt = FixedPrompt::picking_mode(ResponseModeChoice {
            mode: ResponseHandling::Overwrite,
            remember: true,
        });
        let service = WebhookService::new(collaborators(&vault, &transport, &prompt), &settings());

        let mut config = webhook(mode);
        let outcome = service
            .send(&mut config, SendRequest::selection(MemoryVault::doc("Note.md"), "Body"))
            .await
            .unwrap();

        assert_eq!(outcome.applied_mode, ResponseHandling::None);
        assert_eq!(outcome.created_path, None);
        assert!(!outcome.settings_changed);
        assert_eq!(config.response_handling, mode);
        assert_eq!(vault.text("Note.md").as_deref(), Some("Body"));
        assert_eq!(vault.paths(), vec!["Note.md"]);
    }
}

#[tokio::test]
async fn new_mode_creates_the_next_free_version() {
    let vault = MemoryVault::new().with_file("Folder/Note.md", "source");
    let transport = RecordingTransport::text("reply");
    let prompt = FixedPrompt::cancelling();
    let service = WebhookService::new(collaborators(&vault, &transport, &prompt), &settings());
    let mut config = webhook(ResponseHandling::New);

    let first = service
        .send(&mut config, SendRequest::note(MemoryVault::doc("Folder/Note.md")))
        .await
        .unwrap();
    assert_eq!(first.created_path.as_deref(), Some("Folder/Note v1.md"));

    let second = service
        .send(&mut config, SendRequest::note(MemoryVault::doc("Folder/Note.md")))
        .await
        .unwrap();
    assert_eq!(second.created_path.as_deref(), Some("Folder/Note v2.md"));

    assert_eq!(vault.text("Folder/Note v2.md").as_deref(), Some("reply"));
    assert_eq!(vault.text("Folder/Note.md").as_deref(), Some("source"));
}

#[tokio::test]
async fn new_mode_continues_from_a_versioned_note() {
    let vault = MemoryVault::new()
        .with_file("Note v3.md", "source")
        .with_file("Note v4.md", "taken");
    let transport = RecordingTransport::text("reply");
    let prompt = FixedPrompt::cancelling();
    let service = WebhookService::new(collaborators(&vault, &transport, &prompt), &settings());

    let outcome = service
        .send(&mut webhook(ResponseHandling::New), SendRequest::note(MemoryVault::doc("Note v3.md")))
        .await
        .unwrap();
    assert_eq!(outcome.created_path.as_deref(), Some("Note v5.md"));
}

#[tokio::test]
async fn new_mode_reports_exhausted_version_numbers() {
    let vault = MemoryVault::new()
        .with_file("Note v4294967294.md", "source")
        .with_file("Note v4294967295.md", "taken");
    let transport = RecordingTransport::text("reply");
    let prompt = FixedPrompt::cancelling();
    let service = WebhookService::new(collaborators(&vault, &transport, &prompt), &settings());

    let err = service
        .send(&mut webhook(ResponseHandling::New), SendRequest::note(MemoryVault::doc("Note v4294967294.md")))
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Storage);
    assert_eq!(vault.paths().len(), 2);
}

#[tokio::test]
async fn ask_mode_applies_and_remembers_the_choice() {
    let vault = MemoryVault::new().with_file("Note.md", "old");
    let transport = RecordingTransport::text("fresh");
    let prompt = FixedPrompt::picking_mode(ResponseModeChoice {
        mode: ResponseHandling::Overwrite,
        remember: true,
    });
    let service = WebhookService::new(collaborators(&vault, &transport, &prompt), &settings());

    let mut config = webhook(ResponseHandling::Ask);
    let outcome = service
        .send(&mut config, SendRequest::note(MemoryVault::doc("Note.md")))
        .await
        .unwrap();

    assert_eq!(outcome.applied_mode, ResponseHandling::Overwrite);
    assert!(outcome.settings_changed);
    assert_eq!(config.response_handling, ResponseHandling::Overwrite);
    assert_eq!(vault.text("Note.md").unwrap(), "fresh");
}

#[tokio::test]
async fn ask_mode_without_remember_keeps_asking() {
    let vault = MemoryVault::new().with_file("Note.md", "old");
    let transport = RecordingTransport::text("fresh");
    let prompt = FixedPrompt::picking_mode(ResponseModeChoice {
        mode: ResponseHandling::Append,
        remember: false,
    });
    let service = WebhookService::new(collaborators(&vault, &transport, &prompt), &settings());

    let mut config = webhook(ResponseHandling::Ask);
    let outcome = service
        .send(&mut config, SendRequest::note(MemoryVault::doc("Note.md")))
        .await
        .unwrap();

    assert_eq!(outcome.applied_mode, ResponseHandling::Append);
    assert!(!outcome.settings_changed);
    assert_eq!(config.response_handling, ResponseHandling::Ask);
}

#[tokio::test]
async fn dismissed_ask_prompt_leaves_the_note_alone() {
    let vault = MemoryVault::new().with_file("Note.md", "old");
    let transport = RecordingTransport::text("fresh");
    let prompt = FixedPrompt::cancelling();
    let service = WebhookService::new(collaborators(&vault, &transport, &prompt), &settings());

    let outcome = service
        .send(&mut webhook(ResponseHandling::Ask), SendRequest::note(MemoryVault::doc("Note.md")))
        .await
        .unwrap();

    assert_eq!(outcome.applied_mode, ResponseHandling::None);
    assert_eq!(outcome.response.text, "fresh");
    assert_eq!(vault.text("Note.md").unwrap(), "old");
}

#[tokio::test]
async fn error_status_leaves_the_note_alone() {
    let vault = MemoryVault::new().with_file("Note.md", "old");
    let transport = RecordingTransport::new(404, "text/plain", b"missing");
    let prompt = FixedPrompt::cancelling();
    let service = WebhookService::new(collaborators(&vault, &transport, &prompt), &settings());

    let err = service
        .send(&mut webhook(ResponseHandling::Overwrite), SendRequest::note(MemoryVault::doc("Note.md")))
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Protocol);
    assert!(err.to_string().starts_with("Request failed: 404"));
    assert_eq!(vault.text("Note.md").unwrap(), "old");
}

#[tokio::test]
async fn embedded_files_are_attached_unless_excluded() {
    let text = "---\nexclude-attachment: secret.pdf\n---\n![[photo.png]] ![[secret.pdf]] ![[Archive]] ![[gone.png]]";
    let vault = MemoryVault::new()
        .with_file("Note.md", text)
        .with_binary("img/photo.png", &[0x89, 0x50, 0x4E, 0x47])
        .with_binary("secret.pdf", b"%PDF")
        .with_folder("Archive")
        .with_link("photo.png", "img/photo.png")
        .with_link("secret.pdf", "secret.pdf")
        .with_link("Archive", "Archive")
        .with_embed("Note.md", "photo.png")
        .with_embed("Note.md", "secret.pdf")
        .with_embed("Note.md", "Archive")
        .with_embed("Note.md", "gone.png");
    let transport = RecordingTransport::text("ok");
    let prompt = FixedPrompt::cancelling();
    let service = WebhookService::new(collaborators(&vault, &transport, &prompt), &settings());

    service
        .send(&mut webhook(ResponseHandling::None), SendRequest::note(MemoryVault::doc("Note.md")))
        .await
        .unwrap();

    let payload = transport.last_payload();
    assert_eq!(
        payload["attachments"],
        json!([{
            "name": "photo.png",
            "type": "png",
            "mimeType": "image/png",
            "size": 4,
            "data": "iVBORw==",
            "path": "img/photo.png"
        }])
    );
    assert_eq!(payload["exclude-attachment"], json!("secret.pdf"));

    let mut excluding = webhook(ResponseHandling::None);
    excluding.exclude_attachments = true;
    service
        .send(&mut excluding, SendRequest::note(MemoryVault::doc("Note.md")))
        .await
        .unwrap();
    assert_eq!(transport.last_payload()["attachments"], json!([]));
}

#[tokio::test]
async fn resolving_attachments_twice_gives_the_same_records() {
    let vault = MemoryVault::new()
        .with_file("Note.md", "![[a.mp3]]")
        .with_binary("a.mp3", &[1, 2, 3, 4, 5])
        .with_link("a.mp3", "a.mp3")
        .with_embed("Note.md", "a.mp3");
    let resolver = AttachmentResolver::new(&vault, &vault);
    let doc = MemoryVault::doc("Note.md");

    let first = resolver.resolve(&doc, false).await.unwrap();
    let second = resolver.resolve(&doc, false).await.unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first, second);
    assert_eq!(first[0].mime_type, "audio/mpeg");
}

#[tokio::test]
async fn test_payload_is_fixed() {
    let vault = MemoryVault::new();
    let transport = RecordingTransport::text("ok");
    let prompt = FixedPrompt::cancelling();
    let service = WebhookService::new(collaborators(&vault, &transport, &prompt), &settings());

    let status = service.test(&webhook(ResponseHandling::None)).await.unwrap();
    assert_eq!(status, 200);

    let payload = transport.last_payload();
    assert_eq!(payload["test"], json!(true));
    assert_eq!(payload["message"], json!("Test Webhook from Obsidian"));
    assert!(payload["timestamp"].is_i64());
}
