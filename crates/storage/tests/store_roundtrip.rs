//! End-to-end persistence checks against a real directory-backed store.

use drill_core::model::{
    Answer, CustomQuestionDraft, Mode, Question, QuestionId, QuestionKind, SessionConfig,
    SessionData, SessionId,
};
use drill_core::time::fixed_now;
use storage::{
    CURRENT_SESSION_KEY, FileStore, KeyValueStore, load_custom_questions, load_session,
    save_custom_questions, save_session,
};

fn sample_session() -> SessionData {
    let questions = vec![
        Question::new(
            QuestionId::new("q-move"),
            "What happens to a value on move?",
            QuestionKind::Typing {
                accept: vec!["ownership transfers".into()],
            },
        ),
        Question::new(
            QuestionId::new("q-borrow"),
            "How many mutable borrows may exist at once?",
            QuestionKind::MultipleChoice {
                choices: vec!["one".into(), "two".into(), "any number".into()],
                answer_index: 0,
            },
        ),
    ];
    let config = SessionConfig::new("systems", "rust", "junior", Mode::Study).with_shuffle(false);
    let mut session =
        SessionData::new(SessionId::new("s-disk"), config, questions, fixed_now()).unwrap();
    session.record_current(Some(Answer::Text("ownership transfers".into())), true);
    session.set_current_index(1).unwrap();
    session
}

#[test]
fn session_and_custom_questions_survive_reopening_the_directory() {
    let dir = tempfile::tempdir().unwrap();
    let session = sample_session();
    let custom = CustomQuestionDraft {
        prompt: "Which trait enables `{}` formatting?".into(),
        kind: QuestionKind::Typing {
            accept: vec!["Display".into()],
        },
        explanation: Some("std::fmt::Display backs the `{}` placeholder.".into()),
        track: "systems".into(),
        framework: "rust".into(),
        level: "junior".into(),
        author: None,
    }
    .validate(QuestionId::new("cq-display"), fixed_now())
    .unwrap();

    {
        let store = FileStore::new(dir.path()).unwrap();
        save_session(&store, &session).unwrap();
        save_custom_questions(&store, std::slice::from_ref(&custom)).unwrap();
    }

    let store = FileStore::new(dir.path()).unwrap();
    assert_eq!(load_session(&store).unwrap().unwrap(), session);
    assert_eq!(load_custom_questions(&store).unwrap(), vec![custom]);
}

#[test]
fn corrupt_session_file_is_dropped_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path()).unwrap();
    save_session(&store, &sample_session()).unwrap();

    // Truncate the payload behind the store's back.
    store.put(CURRENT_SESSION_KEY, "{\"session_id\": \"s-disk\"").unwrap();

    assert!(load_session(&store).unwrap().is_none());
    assert_eq!(store.get(CURRENT_SESSION_KEY).unwrap(), None);

    // The custom-question namespace is untouched by the session cleanup.
    assert!(load_custom_questions(&store).unwrap().is_empty());
}
