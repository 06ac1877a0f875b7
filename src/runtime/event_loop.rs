use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::debug;

use crate::config;
use crate::ui::{self, InputState};
use crate::workflow::{InputField, ReviewWorkflow, Stage};

/// What the loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Main terminal event loop: draws the current stage and feeds key presses to
/// the workflow. Returns `Ok(())` when the user quits.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    workflow: &mut ReviewWorkflow,
    input: &mut InputState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        workflow.tick();
        terminal.draw(|f| ui::draw(f, workflow, input, &settings.ui))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key(key, workflow, input) == Flow::Quit {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Apply one key press to the workflow.
pub fn handle_key(key: KeyEvent, workflow: &mut ReviewWorkflow, input: &mut InputState) -> Flow {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Flow::Quit;
    }

    // A notice swallows the key that dismisses it.
    if workflow.notice().is_some() {
        workflow.dismiss_notice();
        return Flow::Continue;
    }

    match workflow.stage() {
        Stage::SelectingDirectory => handle_form_key(key, workflow, input),
        Stage::Presenting(_) => match input.editing {
            Some(field) => {
                handle_edit_key(key, field, workflow, input);
                Flow::Continue
            }
            None => handle_review_key(key, workflow, input),
        },
        Stage::Finished(_) => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Flow::Quit,
            KeyCode::Enter | KeyCode::Char('r') => {
                workflow.restart();
                Flow::Continue
            }
            _ => Flow::Continue,
        },
    }
}

fn handle_form_key(key: KeyEvent, workflow: &mut ReviewWorkflow, input: &mut InputState) -> Flow {
    match key.code {
        KeyCode::Esc => return Flow::Quit,
        KeyCode::Tab | KeyCode::BackTab => input.toggle_focus(),
        KeyCode::Backspace => {
            input.focused_mut().pop();
        }
        KeyCode::Enter => {
            let dir = expand_home(input.directory.trim(), env::var_os("HOME"));
            debug!(dir = %dir.display(), "starting from directory form");
            workflow.start(&dir, &input.playlist);
        }
        KeyCode::Char(c) if !c.is_control() => input.focused_mut().push(c),
        _ => {}
    }
    Flow::Continue
}

fn handle_edit_key(
    key: KeyEvent,
    field: InputField,
    workflow: &mut ReviewWorkflow,
    input: &mut InputState,
) {
    match key.code {
        KeyCode::Esc => input.editing = None,
        KeyCode::Enter => {
            input.editing = None;
            match field {
                InputField::Query => workflow.search(),
                InputField::Reference => workflow.add_by_reference(),
            }
        }
        KeyCode::Backspace => {
            if let Some(text) = workflow.input_mut(field) {
                text.pop();
            }
        }
        KeyCode::Char(c) if !c.is_control() => {
            if let Some(text) = workflow.input_mut(field) {
                text.push(c);
            }
        }
        _ => {}
    }
}

fn handle_review_key(key: KeyEvent, workflow: &mut ReviewWorkflow, input: &mut InputState) -> Flow {
    match key.code {
        KeyCode::Char('q') => return Flow::Quit,
        KeyCode::Char('/') => input.editing = Some(InputField::Query),
        KeyCode::Char('u') => input.editing = Some(InputField::Reference),
        KeyCode::Char('j') | KeyCode::Down => workflow.select_next(),
        KeyCode::Char('k') | KeyCode::Up => workflow.select_prev(),
        KeyCode::Enter | KeyCode::Char('a') => workflow.add_selected(),
        KeyCode::Char('s') => workflow.skip(),
        KeyCode::Char('p') => workflow.play_local(),
        KeyCode::Char('o') => workflow.play_preview(),
        KeyCode::Char('x') => workflow.stop_playback(),
        KeyCode::Char('e') => workflow.reveal_current(),
        KeyCode::Char('w') => workflow.open_selected_link(),
        _ => {}
    }
    Flow::Continue
}

/// `~/music` -> `<home>/music`. Without a home directory the input is kept as typed.
fn expand_home(raw: &str, home: Option<OsString>) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~/").or_else(|| (raw == "~").then_some("")) {
        if let Some(home) = home {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(raw)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::catalog::UnavailableCatalog;
    use crate::config::LibrarySettings;
    use crate::library::TagReader;
    use crate::preview::{Player, SilentOutput};

    fn workflow() -> ReviewWorkflow {
        let player = Player::new(
            Box::new(SilentOutput::new("test")),
            reqwest::blocking::Client::new(),
            Duration::from_secs(1),
        );
        ReviewWorkflow::new(
            Box::new(UnavailableCatalog::new("offline")),
            Box::new(TagReader),
            Box::new(player),
            LibrarySettings::default(),
            5,
        )
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(text: &str, w: &mut ReviewWorkflow, input: &mut InputState) {
        for c in text.chars() {
            handle_key(press(KeyCode::Char(c)), w, input);
        }
    }

    fn started(dir: &tempfile::TempDir) -> (ReviewWorkflow, InputState) {
        let mut w = workflow();
        let mut input = InputState::default();
        type_text(&dir.path().display().to_string(), &mut w, &mut input);
        handle_key(press(KeyCode::Enter), &mut w, &mut input);
        assert!(matches!(w.stage(), Stage::Presenting(_)));
        // The unavailable catalog reports itself on the first search.
        assert!(w.notice().is_some());
        handle_key(press(KeyCode::Char(' ')), &mut w, &mut input);
        (w, input)
    }

    fn music_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.mp3"), b"not audio").unwrap();
        dir
    }

    #[test]
    fn form_collects_directory_and_playlist() {
        let mut w = workflow();
        let mut input = InputState::default();
        type_text("/music", &mut w, &mut input);
        handle_key(press(KeyCode::Tab), &mut w, &mut input);
        type_text("Road Trip!", &mut w, &mut input);
        handle_key(press(KeyCode::Backspace), &mut w, &mut input);

        assert_eq!(input.directory, "/music");
        assert_eq!(input.playlist, "Road Trip");
        // `q` is text here, not quit.
        assert_eq!(handle_key(press(KeyCode::Char('q')), &mut w, &mut input), Flow::Continue);
        assert_eq!(handle_key(press(KeyCode::Esc), &mut w, &mut input), Flow::Quit);
    }

    #[test]
    fn notice_swallows_one_key() {
        let dir = music_dir();
        let (mut w, mut input) = started(&dir);
        assert!(w.notice().is_none());

        handle_key(press(KeyCode::Char('s')), &mut w, &mut input);
        assert!(matches!(w.stage(), Stage::Finished(_)));
    }

    #[test]
    fn query_editing_captures_keys_until_escape() {
        let dir = music_dir();
        let (mut w, mut input) = started(&dir);

        handle_key(press(KeyCode::Char('/')), &mut w, &mut input);
        type_text("sq", &mut w, &mut input);
        handle_key(press(KeyCode::Backspace), &mut w, &mut input);
        handle_key(press(KeyCode::Esc), &mut w, &mut input);

        let Stage::Presenting(review) = w.stage() else {
            panic!("still reviewing");
        };
        assert_eq!(review.query, "as");
        assert_eq!(input.editing, None);
    }

    #[test]
    fn finished_screen_restarts_or_quits() {
        let dir = music_dir();
        let (mut w, mut input) = started(&dir);
        handle_key(press(KeyCode::Char('s')), &mut w, &mut input);

        handle_key(press(KeyCode::Char('r')), &mut w, &mut input);
        assert!(matches!(w.stage(), Stage::SelectingDirectory));
        assert_eq!(input.directory, dir.path().display().to_string());

        handle_key(press(KeyCode::Enter), &mut w, &mut input);
        handle_key(press(KeyCode::Char(' ')), &mut w, &mut input);
        handle_key(press(KeyCode::Char('s')), &mut w, &mut input);
        assert_eq!(handle_key(press(KeyCode::Char('q')), &mut w, &mut input), Flow::Quit);
    }

    #[test]
    fn ctrl_c_always_quits() {
        let mut w = workflow();
        let mut input = InputState::default();
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key(key, &mut w, &mut input), Flow::Quit);
        assert!(input.directory.is_empty());
    }

    #[test]
    fn tilde_expands_to_home() {
        let home = || Some(OsString::from("/home/listener"));
        assert_eq!(expand_home("~/music", home()), PathBuf::from("/home/listener/music"));
        assert_eq!(expand_home("~", home()), PathBuf::from("/home/listener"));
        assert_eq!(expand_home("/srv/music", home()), PathBuf::from("/srv/music"));
        assert_eq!(expand_home("~other/music", home()), PathBuf::from("~other/music"));
        assert_eq!(expand_home("~/music", None), PathBuf::from("~/music"));
    }
}
