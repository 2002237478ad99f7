use super::*;
use std::path::PathBuf;

#[test]
fn prompt_collects_typed_and_pasted_text() {
    let mut app = App::new();
    app.push_prompt_char('x');
    assert!(app.prompt().is_none());

    app.open_prompt(PromptKind::File);
    for c in "/tmp/a".chars() {
        app.push_prompt_char(c);
    }
    app.push_prompt_str("b.mp3\n");
    app.pop_prompt_char();
    app.push_prompt_char('3');

    assert_eq!(app.prompt().unwrap().buffer, "/tmp/ab.mp3");
    assert_eq!(
        app.take_prompt(),
        Some((PromptKind::File, PathBuf::from("/tmp/ab.mp3")))
    );
    assert!(app.prompt().is_none());
}

#[test]
fn blank_prompt_yields_nothing_and_closes() {
    let mut app = App::new();
    app.open_prompt(PromptKind::Folder);
    app.push_prompt_str("   ");
    assert_eq!(app.take_prompt(), None);
    assert!(app.prompt().is_none());
}

#[test]
fn prompt_strips_quotes() {
    let prompt = PathPrompt {
        kind: PromptKind::Folder,
        buffer: "'/music/My Albums'".into(),
    };
    assert_eq!(prompt.path(), Some(PathBuf::from("/music/My Albums")));
}

#[test]
fn reopening_prompt_starts_empty() {
    let mut app = App::new();
    app.open_prompt(PromptKind::File);
    app.push_prompt_str("abc");
    app.open_prompt(PromptKind::Folder);
    let prompt = app.prompt().unwrap();
    assert_eq!(prompt.kind, PromptKind::Folder);
    assert!(prompt.buffer.is_empty());

    app.cancel_prompt();
    assert!(app.prompt().is_none());
}

#[test]
fn error_popup_is_dismissed_once() {
    let mut app = App::new();
    assert!(!app.dismiss_error());

    app.show_error("cannot open file");
    assert_eq!(app.error(), Some("cannot open file"));
    assert!(app.dismiss_error());
    assert!(app.error().is_none());
    assert!(!app.dismiss_error());
}

#[test]
fn tone_sliders_stay_in_range() {
    let mut tone = ToneControls::default();
    for _ in 0..20 {
        tone.adjust_bass(1);
        tone.adjust_treble(-1);
    }
    assert_eq!(tone.bass, TONE_MAX);
    assert_eq!(tone.treble, TONE_MIN);

    tone.adjust_bass(-3);
    assert_eq!(tone.bass, 9);
    tone.adjust_treble(i8::MAX);
    assert_eq!(tone.treble, TONE_MAX);
}
