//! UI rendering for the terminal user interface.
//!
//! Everything here is a pure function of the workflow's current `Stage` plus
//! the few bits of view state (`InputState`) that only the event loop owns.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::catalog::RemoteTrack;
use crate::config::UiSettings;
use crate::preview::NowPlaying;
use crate::workflow::{FileReview, InputField, Notice, NoticeLevel, ReviewWorkflow, Stage, Summary};

/// Field of the directory form that has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Directory,
    Playlist,
}

/// Text the user is typing that is not (yet) part of the workflow.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub directory: String,
    pub playlist: String,
    pub focus: FormField,
    /// Set while one of the review screen's inputs captures keys.
    pub editing: Option<InputField>,
}

impl InputState {
    pub fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            FormField::Directory => &mut self.directory,
            FormField::Playlist => &mut self.playlist,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            FormField::Directory => FormField::Playlist,
            FormField::Playlist => FormField::Directory,
        };
    }
}

const NOTICE_WIDTH: u16 = 64;

const LEFT_PAD: Padding = Padding {
    left: 1,
    right: 0,
    top: 0,
    bottom: 0,
};

/// Key help for the footer, depending on what has keyboard focus.
fn controls_text(stage: &Stage, editing: Option<InputField>) -> String {
    let pairs: &[(&str, &str)] = match (stage, editing) {
        (Stage::SelectingDirectory, _) => &[
            ("tab", "switch field"),
            ("enter", "start"),
            ("esc", "quit"),
        ],
        (Stage::Presenting(_), Some(InputField::Query)) => {
            &[("enter", "search"), ("esc", "cancel")]
        }
        (Stage::Presenting(_), Some(InputField::Reference)) => {
            &[("enter", "add track"), ("esc", "cancel")]
        }
        (Stage::Presenting(_), None) => &[
            ("j/k", "select"),
            ("enter/a", "add"),
            ("s", "skip"),
            ("/", "search"),
            ("u", "add by URL"),
            ("p", "play file"),
            ("o", "preview"),
            ("x", "stop"),
            ("e", "show in folder"),
            ("w", "open link"),
            ("q", "quit"),
        ],
        (Stage::Finished(_), _) => &[("enter/r", "another directory"), ("q", "quit")],
    };
    pairs
        .iter()
        .map(|(k, v)| format!("[{k}] {v}"))
        .collect::<Vec<String>>()
        .join(" | ")
}

/// One line of the results list.
fn result_line(track: &RemoteTrack) -> String {
    let mut line = format!(
        "{} - {} · {} · {}",
        track.name,
        track.artist_line(),
        track.album,
        track.duration_string()
    );
    if track.preview_url.is_some() {
        line.push_str(" ♪");
    }
    line
}

fn now_playing_text(now: Option<&NowPlaying>, review: &FileReview) -> String {
    match now {
        None => "Stopped".to_string(),
        Some(NowPlaying::Local(path)) => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            format!("Playing file: {name}")
        }
        Some(NowPlaying::Preview { url }) => {
            let track = review
                .results
                .iter()
                .find(|t| t.preview_url.as_deref() == Some(url.as_str()));
            match track {
                Some(t) => format!("Playing preview: {} - {}", t.name, t.artist_line()),
                None => "Playing preview".to_string(),
            }
        }
    }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Rows `text` occupies once word-wrapped to `width` columns.
fn wrapped_height(text: &str, width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let rows: usize = text
        .lines()
        .map(|line| {
            let mut rows = 1;
            let mut used = 0;
            for word in line.split_whitespace() {
                let len = word.chars().count();
                if used > 0 && used + 1 + len > width {
                    rows += 1;
                    used = 0;
                }
                if used > 0 {
                    used += 1;
                }
                used += len;
                // Words longer than a row are split across rows.
                while used > width {
                    rows += 1;
                    used -= width;
                }
            }
            rows
        })
        .sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

fn input_line<'a>(label: &'a str, value: &'a str, active: bool) -> Line<'a> {
    let style = if active {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    };
    let mut spans = vec![Span::from(label).bold(), Span::styled(value, style)];
    if active {
        spans.push(Span::styled(" ", style));
    }
    Line::from(spans)
}

/// Render the whole UI for the workflow's current stage.
pub fn draw(frame: &mut Frame, workflow: &ReviewWorkflow, input: &InputState, ui: &UiSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" setlist ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    match workflow.stage() {
        Stage::SelectingDirectory => draw_directory_form(frame, chunks[1], input),
        Stage::Presenting(review) => draw_review(frame, chunks[1], workflow, review, input),
        Stage::Finished(summary) => draw_summary(frame, chunks[1], summary),
    }

    if let Some(notice) = workflow.notice() {
        draw_notice(frame, chunks[1], notice);
    }

    let footer = Paragraph::new(controls_text(workflow.stage(), input.editing))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(LEFT_PAD),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[2]);
}

fn draw_directory_form(frame: &mut Frame, area: Rect, input: &InputState) {
    let lines = vec![
        Line::from("Choose the directory to walk through and name the playlist."),
        Line::from("Leave the playlist name empty to use the directory's name."),
        Line::from(""),
        input_line(
            "Directory: ",
            &input.directory,
            input.focus == FormField::Directory,
        ),
        input_line(
            "Playlist:  ",
            &input.playlist,
            input.focus == FormField::Playlist,
        ),
    ];
    let form = Paragraph::new(lines)
        .block(Block::bordered().padding(LEFT_PAD).title(" new session "))
        .wrap(Wrap { trim: false });
    frame.render_widget(form, area);
}

fn draw_review(
    frame: &mut Frame,
    area: Rect,
    workflow: &ReviewWorkflow,
    review: &FileReview,
    input: &InputState,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(area);

    // Local file
    let meta = &review.metadata;
    let lines = vec![
        Line::from(review.file.file_name.as_str()).bold(),
        Line::from(format!(
            "Title: {} • Artist: {} • Duration: {}",
            meta.title.as_deref().unwrap_or("-"),
            meta.artist.as_deref().unwrap_or("-"),
            meta.duration_string().as_deref().unwrap_or("-"),
        )),
        Line::from(review.file.path.display().to_string()).dim(),
        input_line(
            "Search: ",
            &review.query,
            input.editing == Some(InputField::Query),
        ),
        input_line(
            "URL:    ",
            &review.reference,
            input.editing == Some(InputField::Reference),
        ),
    ];
    let title = format!(" file {} of {} ", review.position + 1, review.total);
    let file_panel = Paragraph::new(lines)
        .block(Block::bordered().padding(LEFT_PAD).title(title))
        .wrap(Wrap { trim: true });
    frame.render_widget(file_panel, chunks[0]);

    // Results
    let results_title = match &review.searched {
        Some(q) => format!(" results for \"{q}\" "),
        None => " results ".to_string(),
    };
    if review.results.is_empty() {
        let empty = if review.searched.is_some() {
            "No matches. Edit the search with / or paste a track URL with u."
        } else {
            "Nothing searched yet."
        };
        let p = Paragraph::new(empty)
            .block(Block::bordered().padding(LEFT_PAD).title(results_title))
            .wrap(Wrap { trim: true });
        frame.render_widget(p, chunks[1]);
    } else {
        let items: Vec<ListItem> = review
            .results
            .iter()
            .map(|t| ListItem::new(result_line(t)))
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(results_title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default();
        state.select(Some(review.selected));
        frame.render_stateful_widget(list, chunks[1], &mut state);
    }

    let now = workflow.now_playing();
    let status = Paragraph::new(now_playing_text(now.as_ref(), review))
        .block(Block::bordered().padding(LEFT_PAD).title(" playback "));
    frame.render_widget(status, chunks[2]);
}

fn draw_summary(frame: &mut Frame, area: Rect, summary: &Summary) {
    let mut text = summary.report();
    if let Some(id) = &summary.playlist_id {
        text.push_str(&format!("\n\nPlaylist: https://open.spotify.com/playlist/{id}"));
    }
    let p = Paragraph::new(text)
        .block(Block::bordered().padding(LEFT_PAD).title(" done "))
        .wrap(Wrap { trim: false });
    frame.render_widget(p, area);
}

fn draw_notice(frame: &mut Frame, area: Rect, notice: &Notice) {
    let text = format!("{}\n\n(press any key)", notice.body);
    let width = NOTICE_WIDTH.min(area.width.saturating_sub(2)).max(10);
    // Borders take two columns and two rows, padding one column.
    let height = wrapped_height(&text, width.saturating_sub(3)).saturating_add(2);
    let popup = centered_rect_sized(width, height, area);
    frame.render_widget(Clear, popup);

    let border = match notice.level {
        NoticeLevel::Info => Style::default(),
        NoticeLevel::Error => Style::default().fg(Color::Red),
    };
    let p = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .padding(LEFT_PAD)
                .title(format!(" {} ", notice.title)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(p, popup);
}
