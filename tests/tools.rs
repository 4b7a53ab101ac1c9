use std::io::Cursor;
use std::path::Path;

use chrono::{TimeZone, Utc};
use toolshed::collaborators::{
    FixedColorPicker, MemoryClipboard, MemoryFileAccess, NoticeKind, RecordingNotifier,
    ColorPicker,
};
use toolshed::color::{Color, ColorHistory};
use toolshed::config::MainConfig;
use toolshed::context::{MemoryPreferenceStore, Preferences, TomlPreferenceStore};
use toolshed::generators::random::{RandomHistory, RandomSettings};
use toolshed::prelude::*;
use toolshed::todo::{Action, Filter, Priority, TodoList};

fn add(text: &str) -> Action {
    Action::Add {
        text: text.to_string(),
        category: None,
        priority: Priority::Medium,
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
    }
}

#[test]
fn test_convert_file_and_deliver() {
    let files = MemoryFileAccess::new().with_file("notes.txt", "hello world");
    let clipboard = MemoryClipboard::new();
    let notifier = RecordingNotifier::new();
    let controller = ToolsController::new(&files, &clipboard, &notifier);

    let text = controller
        .read_input(None, Some(Path::new("notes.txt")), &mut Cursor::new(""), 1000)
        .unwrap();
    let converted = TransformManager::get()
        .text()
        .apply("title", &text, &Options::new())
        .unwrap();

    let mut stdout = Vec::new();
    controller
        .deliver(
            &mut stdout,
            &converted,
            "converted-title.txt",
            &Delivery::new(true, Some(String::new())),
        )
        .unwrap();

    assert_eq!(String::from_utf8(stdout).unwrap(), "Hello World\n");
    assert_eq!(clipboard.contents().as_deref(), Some("Hello World"));
    assert_eq!(files.contents("converted-title.txt"), Some(b"Hello World".to_vec()));
    assert_eq!(
        notifier.notices().iter().filter(|(_, kind)| *kind == NoticeKind::Success).count(),
        2
    );
}

#[test]
fn test_unknown_operation_and_option() {
    let registry = TransformManager::get().text();
    assert!(matches!(
        registry.apply("shout", "hi", &Options::new()),
        Err(Error::UnknownOperation(_))
    ));
    assert!(matches!(
        registry.apply("upper", "hi", &Options::new().with("decimal_places", 2)),
        Err(Error::ValidationError(_))
    ));
}

#[test]
fn test_todo_session() {
    let list = TodoList::new()
        .reduce(add("write tests"))
        .and_then(|list| list.reduce(add("ship it")))
        .and_then(|list| list.reduce(Action::Toggle(1)))
        .unwrap();

    assert_eq!(list.todos[0].text, "ship it");
    assert_eq!(list.todos[0].id, 2);
    assert_eq!(list.active_count(), 1);
    assert_eq!(list.filtered(Filter::Completed).count(), 1);

    let exported = list.export_json().unwrap();
    let imported = TodoList::new()
        .reduce(Action::Import(TodoList::parse_import(&exported).unwrap()))
        .unwrap();
    assert_eq!(imported.todos, list.todos);

    let cleared = imported.reduce(Action::ClearCompleted).unwrap();
    assert_eq!(cleared.todos.len(), 1);
    assert!(cleared.clone().reduce(Action::Delete(1)).is_err());
}

#[test]
fn test_theme_preferences_persist() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.toml");

    let mut context = AppContext::load(Box::new(TomlPreferenceStore::new(&path))).unwrap();
    context.set_theme(Theme::Dark).unwrap();
    let context = AppContext::load(Box::new(TomlPreferenceStore::new(&path))).unwrap();
    assert_eq!(context.theme(), Theme::Dark);

    let memory = AppContext::load(Box::new(MemoryPreferenceStore::new(Preferences::default())))
        .unwrap();
    assert_eq!(memory.theme(), Theme::Light);
}

#[test]
fn test_partial_config_uses_defaults() {
    let config = MainConfig::from_toml("[defaults]\npassword_length = 24\n", "toolshed.toml").unwrap();
    assert_eq!(config.defaults.password_length, 24);
    assert_eq!(config.network, MainConfig::default().network);
    assert!(MainConfig::from_toml("[defaults\n", "toolshed.toml").is_err());
}

#[test]
fn test_picked_color_history() {
    let mut picker = FixedColorPicker::new("rebeccapurple");
    let color: Color = picker.pick().unwrap().parse().unwrap();
    let converted = color.convert();
    assert_eq!(converted.hex, "#663399");

    let mut history = ColorHistory::new();
    let now = Utc::now();
    assert!(history.record(converted.clone(), now));
    assert!(!history.record(converted, now));
    assert_eq!(history.len(), 1);
}

#[test]
fn test_random_settings_file_flow() {
    let files = MemoryFileAccess::new().with_file("range.txt", "10,20,50");
    let data = files.read_text_file(Path::new("range.txt"), 1000).unwrap();
    let settings: RandomSettings = data.parse().unwrap();
    let numbers = toolshed::generators::random::generate(settings).unwrap();

    assert_eq!(numbers.len(), 50);
    assert!(numbers.iter().all(|n| (10..=20).contains(n)));

    let mut history = RandomHistory::new();
    for _ in 0..7 {
        history.push(numbers.clone());
    }
    assert_eq!(history.len(), 5);
}

#[cfg(feature = "fetcher")]
mod network {
    use httpmock::prelude::*;
    use serde_json::json;
    use toolshed::fetcher::{FetchOptions, HttpClient};
    use toolshed::jokes::{Favorites, JokeClient};

    #[test]
    fn test_fetch_and_favorite_joke() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/").header("Accept", "application/json");
            then.status(200)
                .json_body(json!({ "id": "x1", "joke": "I'm reading a book on anti-gravity.", "status": 200 }));
        });

        let client = JokeClient::with_url(HttpClient::new(FetchOptions::default()), server.url("/"));
        let joke = client.fetch().unwrap();
        mock.assert_hits(1);

        let mut favorites = Favorites::new();
        assert!(favorites.toggle(&joke, chrono::Utc::now()));
        let restored = Favorites::import_json(&favorites.export_json().unwrap()).unwrap();
        assert!(restored.contains(&joke));
    }
}

#[cfg(feature = "imaging")]
mod imaging {
    use toolshed::canvas::RasterCanvas;
    use toolshed::collaborators::{MemoryClipboard, MemoryFileAccess, RecordingNotifier};
    use toolshed::prelude::*;
    use toolshed::qr::{generate, Correction, QrOptions, QR_FILENAME};

    #[test]
    fn test_save_qr_code() {
        let files = MemoryFileAccess::new();
        let clipboard = MemoryClipboard::new();
        let notifier = RecordingNotifier::new();
        let controller = ToolsController::new(&files, &clipboard, &notifier);

        let options = QrOptions {
            size: 300,
            correction: "h".parse::<Correction>().unwrap(),
            ..QrOptions::default()
        };
        let png = generate("https://example.com/menu", &options).unwrap();
        controller
            .deliver_bytes(&png, QR_FILENAME, &Delivery::new(false, Some(String::new())))
            .unwrap();

        let saved = files.contents("qr-code.png").unwrap();
        assert_eq!(RasterCanvas::decode(&saved).unwrap().dimensions(), (300, 300));
        assert!(clipboard.contents().is_none());
    }
}
