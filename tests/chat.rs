//! Chat pipeline integration tests
//!
//! Runs the send/refresh/translate pipeline against in-memory doubles, no
//! server or audio hardware required.

use tasktalk::{ChatClient, Error, Language, RequestContext, Sender};

mod common;

use common::{task, FakeBackend, RecordingSpeaker, RecordingView};

fn client(backend: &FakeBackend) -> ChatClient<FakeBackend, RecordingView> {
    ChatClient::new(backend.clone(), RecordingView::default(), Language::En)
}

fn transport_error() -> Error {
    std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused").into()
}

#[tokio::test]
async fn test_empty_input_sends_nothing() {
    let backend = FakeBackend::new();
    let mut client = client(&backend);
    let mut speaker = RecordingSpeaker::default();

    // Queues are empty, so any request would panic the test
    client
        .send_message("", RequestContext::typed(), &mut speaker)
        .await;
    client
        .send_message("   \t ", RequestContext::voice(), &mut speaker)
        .await;

    assert!(backend.chat_requests().await.is_empty());
    assert!(client.transcript().is_empty());
    assert!(speaker.spoken.is_empty());
}

#[tokio::test]
async fn test_reply_without_todos_keeps_tasks() {
    let backend = FakeBackend::new();
    backend.push_fetch(vec![task(1, "Buy milk", false)]).await;
    backend.push_chat_reply("Hello! How can I help?", None).await;

    let mut client = client(&backend);
    let mut speaker = RecordingSpeaker::default();
    client.refresh_tasks().await;
    assert_eq!(client.tasks().len(), 1);

    client
        .send_message("hi", RequestContext::typed(), &mut speaker)
        .await;

    assert_eq!(client.tasks().len(), 1);
    assert_eq!(client.tasks().rows()[0].title(), "Buy milk");
    // One render from the fetch, none from the reply
    assert_eq!(client.view_mut().task_updates.len(), 1);
}

#[tokio::test]
async fn test_reply_with_todos_replaces_tasks() {
    let backend = FakeBackend::new();
    backend
        .push_chat_reply(
            "Added \"Walk the dog\" to your list.",
            Some(vec![task(1, "Buy milk", false), task(2, "Walk the dog", false)]),
        )
        .await;

    let mut client = client(&backend);
    let mut speaker = RecordingSpeaker::default();
    client
        .send_message("add walk the dog", RequestContext::typed(), &mut speaker)
        .await;

    assert_eq!(client.tasks().len(), 2);
    assert_eq!(client.tasks().rows()[1].title(), "Walk the dog");
    assert_eq!(
        client.view_mut().task_updates,
        vec![vec!["Buy milk".to_string(), "Walk the dog".to_string()]]
    );
    // The view saw the echo first, then the reply
    assert_eq!(
        client.view_mut().messages,
        vec![
            (Sender::User, "add walk the dog".to_string()),
            (
                Sender::Assistant,
                "Added \"Walk the dog\" to your list.".to_string()
            ),
        ]
    );
}

#[tokio::test]
async fn test_only_voice_replies_are_spoken() {
    let backend = FakeBackend::new();
    backend.push_chat_reply("first reply", None).await;
    backend.push_chat_reply("second reply", None).await;
    backend.push_chat_reply("third reply", None).await;

    let mut client = client(&backend);
    let mut speaker = RecordingSpeaker::default();

    client
        .send_message("spoken question", RequestContext::voice(), &mut speaker)
        .await;
    client
        .send_message("typed question", RequestContext::typed(), &mut speaker)
        .await;
    client
        .send_message("another spoken one", RequestContext::voice(), &mut speaker)
        .await;

    // Only the two voice-originated requests are read aloud
    assert_eq!(
        speaker.spoken,
        vec![
            ("first reply".to_string(), Language::En),
            ("third reply".to_string(), Language::En),
        ]
    );
}

#[tokio::test]
async fn test_backend_rejection_adds_processing_error() {
    let backend = FakeBackend::new();
    backend
        .push_chat_error(Error::Backend {
            status: 500,
            body: "internal error".to_string(),
        })
        .await;

    let mut client = client(&backend);
    let mut speaker = RecordingSpeaker::default();
    client
        .send_message("hello", RequestContext::voice(), &mut speaker)
        .await;

    let transcript = client.transcript();
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[0].sender, Sender::User);
    assert_eq!(transcript[1].sender, Sender::Assistant);
    assert_eq!(
        transcript[1].text,
        "Sorry, there was an error processing your request."
    );
    // Error replies are never read aloud
    assert!(speaker.spoken.is_empty());
}

#[tokio::test]
async fn test_transport_failure_adds_connect_error() {
    let backend = FakeBackend::new();
    backend.push_chat_error(transport_error()).await;

    let mut client = client(&backend);
    let mut speaker = RecordingSpeaker::default();
    client
        .send_message("hello", RequestContext::typed(), &mut speaker)
        .await;

    assert_eq!(
        client.transcript()[1].text,
        "Sorry, could not connect to the server. Please check your connection."
    );
}

#[tokio::test]
async fn test_refresh_failure_is_silent() {
    let backend = FakeBackend::new();
    backend.push_fetch(vec![task(1, "Buy milk", false)]).await;
    backend.push_fetch_error(transport_error()).await;

    let mut client = client(&backend);
    client.refresh_tasks().await;
    client.refresh_tasks().await;

    // The last good snapshot stays, with nothing surfaced to the user
    assert_eq!(client.tasks().len(), 1);
    assert!(client.view_mut().notices.is_empty());
    assert!(client.view_mut().statuses.is_empty());
}

#[tokio::test]
async fn test_unchanged_poll_keeps_translations() {
    let backend = FakeBackend::new();
    backend
        .push_fetch(vec![task(1, "Buy milk", false), task(2, "Walk the dog", false)])
        .await;
    backend.push_translations(&["Comprar leche", "Pasear al perro"]).await;

    let mut client = client(&backend);
    client.refresh_tasks().await;
    client.translate_tasks(Language::Es).await;
    assert_eq!(client.tasks().rows()[0].title(), "Comprar leche");
    let renders = client.view_mut().task_updates.len();

    // A poll returning the same tasks must not clobber the translation
    client.apply_snapshot(vec![task(1, "Buy milk", false), task(2, "Walk the dog", false)]);
    assert_eq!(client.tasks().rows()[0].title(), "Comprar leche");
    assert_eq!(client.view_mut().task_updates.len(), renders);

    // A real change replaces the snapshot and drops the translation
    client.apply_snapshot(vec![task(1, "Buy milk", true), task(2, "Walk the dog", false)]);
    assert_eq!(client.tasks().rows()[0].title(), "Buy milk");
    assert!(client.tasks().rows()[0].completed);
}

#[tokio::test]
async fn test_translation_mismatch_keeps_titles() {
    let backend = FakeBackend::new();
    backend
        .push_fetch(vec![task(1, "Buy milk", false), task(2, "Walk the dog", false)])
        .await;
    // One translation for two tasks
    backend.push_translations(&["Comprar leche"]).await;

    let mut client = client(&backend);
    client.refresh_tasks().await;
    client.translate_tasks(Language::Es).await;

    assert_eq!(client.tasks().rows()[0].title(), "Buy milk");
    assert_eq!(client.tasks().rows()[1].title(), "Walk the dog");
    assert!(client
        .view_mut()
        .notices
        .contains(&"Translation failed. Please try again.".to_string()));
}

#[tokio::test]
async fn test_translate_request_failure_keeps_titles() {
    let backend = FakeBackend::new();
    backend.push_fetch(vec![task(1, "Buy milk", false)]).await;
    backend.push_translate_error(transport_error()).await;

    let mut client = client(&backend);
    client.refresh_tasks().await;
    client.translate_tasks(Language::Fr).await;

    assert_eq!(client.tasks().rows()[0].title(), "Buy milk");
    assert!(client
        .view_mut()
        .notices
        .contains(&"Translation failed. Please try again.".to_string()));
}

#[tokio::test]
async fn test_translate_twice_uses_original_titles() {
    let backend = FakeBackend::new();
    backend
        .push_fetch(vec![task(1, "Buy milk", false), task(2, "Walk the dog", false)])
        .await;
    backend.push_translations(&["Comprar leche", "Pasear al perro"]).await;
    backend.push_translations(&["Acheter du lait", "Promener le chien"]).await;

    let mut client = client(&backend);
    client.refresh_tasks().await;
    client.translate_tasks(Language::Es).await;
    client.translate_tasks(Language::Fr).await;

    // Both requests carry the untranslated titles, not the Spanish ones
    let requests = backend.translate_requests().await;
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].tasks, vec!["Buy milk", "Walk the dog"]);
    assert_eq!(requests[0].target_language, "es");
    assert_eq!(requests[1].tasks, vec!["Buy milk", "Walk the dog"]);
    assert_eq!(requests[1].target_language, "fr");

    assert_eq!(client.tasks().rows()[0].title(), "Acheter du lait");
    assert!(client
        .view_mut()
        .statuses
        .contains(&"Translated 2 tasks".to_string()));
}

#[tokio::test]
async fn test_english_target_skips_network() {
    let backend = FakeBackend::new();
    backend.push_fetch(vec![task(1, "Buy milk", false)]).await;

    let mut client = client(&backend);
    client.refresh_tasks().await;
    client.translate_tasks(Language::En).await;

    assert!(backend.translate_requests().await.is_empty());
    assert!(client
        .view_mut()
        .notices
        .contains(&"Already in English. Select another language to translate.".to_string()));
}

#[tokio::test]
async fn test_translate_with_no_tasks_notices() {
    let backend = FakeBackend::new();
    let mut client = client(&backend);

    client.translate_tasks(Language::Ur).await;

    assert!(backend.translate_requests().await.is_empty());
    assert!(client
        .view_mut()
        .notices
        .contains(&"No tasks to translate!".to_string()));
}

#[tokio::test]
async fn test_rename_guard_skips_empty_and_unchanged() {
    let backend = FakeBackend::new();
    let mut client = client(&backend);
    let mut speaker = RecordingSpeaker::default();

    client.rename_task("Buy milk", "   ", &mut speaker).await;
    client.rename_task("Buy milk", "Buy milk", &mut speaker).await;

    assert!(backend.chat_requests().await.is_empty());
}

#[tokio::test]
async fn test_task_actions_synthesize_commands() {
    let backend = FakeBackend::new();
    for _ in 0..5 {
        backend.push_chat_reply("Done!", None).await;
    }

    let mut client = client(&backend);
    let mut speaker = RecordingSpeaker::default();

    client.complete_task("Buy milk", &mut speaker).await;
    client
        .rename_task("Buy milk", "Buy oat milk", &mut speaker)
        .await;
    client.delete_task("Buy milk", true, &mut speaker).await;
    client.add_task("call the vet", &mut speaker).await;
    client.clear_completed(true, &mut speaker).await;

    let messages: Vec<String> = backend
        .chat_requests()
        .await
        .into_iter()
        .map(|request| request.message)
        .collect();
    assert_eq!(
        messages,
        vec![
            "Mark \"Buy milk\" as complete",
            "Update task \"Buy milk\" to \"Buy oat milk\"",
            "Delete task \"Buy milk\"",
            "Add task: call the vet",
            "Delete all completed tasks",
        ]
    );

    // Synthesized commands are not echoed; only the replies appear
    assert_eq!(client.transcript().len(), 5);
    assert!(client
        .transcript()
        .iter()
        .all(|message| message.sender == Sender::Assistant));
    assert!(speaker.spoken.is_empty());
}

#[tokio::test]
async fn test_declined_confirmation_sends_nothing() {
    let backend = FakeBackend::new();
    let mut client = client(&backend);
    let mut speaker = RecordingSpeaker::default();

    // Queues are empty, so any request would panic the test
    client.delete_task("Buy milk", false, &mut speaker).await;
    client.clear_completed(false, &mut speaker).await;

    assert!(backend.chat_requests().await.is_empty());
    assert!(client.transcript().is_empty());
    assert!(client.view_mut().messages.is_empty());
}

#[tokio::test]
async fn test_chat_request_carries_language() {
    let backend = FakeBackend::new();
    backend.push_chat_reply("ٹھیک ہے", None).await;

    let mut client = client(&backend);
    let mut speaker = RecordingSpeaker::default();
    client.set_language(Language::Ur);
    client
        .send_message("hello", RequestContext::voice(), &mut speaker)
        .await;

    assert_eq!(backend.chat_requests().await[0].language, "ur");
    assert_eq!(
        speaker.spoken,
        vec![("ٹھیک ہے".to_string(), Language::Ur)]
    );
}

#[tokio::test]
async fn test_read_tasks_aloud() {
    let backend = FakeBackend::new();
    backend
        .push_fetch(vec![task(1, "Buy milk", false), task(2, "Walk the dog", true)])
        .await;

    let mut client = client(&backend);
    let mut speaker = RecordingSpeaker::default();
    client.refresh_tasks().await;
    client.read_tasks_aloud(&mut speaker);

    assert_eq!(
        speaker.spoken[0].0,
        "You have 2 tasks. Task 1: Buy milk, status pending. \
         Task 2: Walk the dog, status completed."
    );
}
