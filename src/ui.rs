use crate::commands::format_created;
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use jotter::storage::{FileStore, KeyValueStore, StoreLocation};
use jotter::{Change, Note, NoteError, NoteStore};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::{Alignment, Color, Modifier, Rect, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Terminal;
use std::io::{stdout, Stdout};
use std::time::{Duration, Instant};

const FLASH_TTL: Duration = Duration::from_millis(1500);
const MAX_CARD_LINES: usize = 6;

pub fn run(notes: NoteStore<FileStore>, location: StoreLocation) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let mut app = App::new(notes, location);
    let result = app.event_loop(&mut terminal);
    teardown_terminal(&mut terminal)?;
    result
}

struct App<S> {
    notes: NoteStore<S>,
    location: StoreLocation,
    list_state: ListState,
    last_save: Instant,
    flash: Option<Flash>,
    mode: Mode,
}

// The edited note is the store's edit cursor; `Editing` holds only the draft.
enum Mode {
    Normal,
    Composing(FieldValue),
    Editing(FieldValue),
    ConfirmDelete { note_id: String },
}

struct Flash {
    text: String,
    warning: bool,
    shown_at: Instant,
}

impl Flash {
    fn info(text: impl Into<String>) -> Self {
        Flash {
            text: text.into(),
            warning: false,
            shown_at: Instant::now(),
        }
    }

    fn warning(text: impl Into<String>) -> Self {
        Flash {
            warning: true,
            ..Flash::info(text)
        }
    }

    fn is_visible(&self) -> bool {
        self.shown_at.elapsed() < FLASH_TTL
    }
}

enum FieldAction {
    Continue,
    Submit,
    Cancel,
}

#[derive(Clone)]
struct FieldValue {
    value: String,
    cursor: usize,
}

impl FieldValue {
    fn new(value: &str) -> Self {
        FieldValue {
            value: value.to_string(),
            cursor: value.len(),
        }
    }

    fn move_left(&mut self) {
        self.cursor = prev_boundary(&self.value, self.cursor);
    }

    fn move_right(&mut self) {
        self.cursor = next_boundary(&self.value, self.cursor);
    }

    fn move_up(&mut self) {
        let (line_starts, line_idx, col) = line_state(&self.value, self.cursor);
        if line_idx == 0 {
            return;
        }
        self.cursor = index_at_col(&self.value, line_starts[line_idx - 1], col);
    }

    fn move_down(&mut self) {
        let (line_starts, line_idx, col) = line_state(&self.value, self.cursor);
        if line_idx + 1 >= line_starts.len() {
            return;
        }
        self.cursor = index_at_col(&self.value, line_starts[line_idx + 1], col);
    }

    fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev = prev_boundary(&self.value, self.cursor);
        self.value.drain(prev..self.cursor);
        self.cursor = prev;
    }

    fn insert_char(&mut self, ch: char) {
        self.value.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    fn with_caret(&self) -> String {
        let mut text = self.value.clone();
        text.insert_str(self.cursor, "▌");
        text
    }
}

impl<S: KeyValueStore> App<S> {
    fn new(notes: NoteStore<S>, location: StoreLocation) -> Self {
        let mut list_state = ListState::default();
        if !notes.is_empty() {
            list_state.select(Some(0));
        }
        let flash = Flash::info(format!(
            "Loaded {} from {}",
            note_count(notes.len()),
            location.dir.display()
        ));
        App {
            notes,
            location,
            list_state,
            last_save: Instant::now(),
            flash: Some(flash),
            mode: Mode::Normal,
        }
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| self.draw(f))?;
            if event::poll(Duration::from_millis(200))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key) {
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self.mode {
            Mode::Normal => return self.handle_normal_key(key),
            Mode::Composing(_) | Mode::Editing(_) => self.handle_form_key(key),
            Mode::ConfirmDelete { .. } => self.handle_confirm_key(key),
        }
        false
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('n') | KeyCode::Char('i') => {
                self.mode = Mode::Composing(FieldValue::new(""));
            }
            KeyCode::Char('e') | KeyCode::Enter => self.begin_edit(),
            KeyCode::Char('d') | KeyCode::Delete => match self.selected_note() {
                Some(note) => {
                    self.mode = Mode::ConfirmDelete {
                        note_id: note.id.clone(),
                    }
                }
                None => self.flash = Some(Flash::warning("No note selected to delete")),
            },
            KeyCode::Char('s') => self.retry_save(),
            KeyCode::Up | KeyCode::Char('k') => self.prev_note(),
            KeyCode::Down | KeyCode::Char('j') => self.next_note(),
            KeyCode::Home | KeyCode::Char('g') => self.select_first(),
            KeyCode::End | KeyCode::Char('G') => {
                if !self.notes.is_empty() {
                    self.list_state.select(Some(self.notes.len() - 1));
                }
            }
            _ => {}
        }
        false
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let mut mode = std::mem::replace(&mut self.mode, Mode::Normal);
        let close_form = match &mut mode {
            Mode::Composing(draft) => match edit_field(draft, key) {
                FieldAction::Submit => self.submit_new(draft),
                FieldAction::Cancel => {
                    self.flash = Some(Flash::info("Canceled"));
                    true
                }
                FieldAction::Continue => false,
            },
            Mode::Editing(draft) => match edit_field(draft, key) {
                FieldAction::Submit => self.submit_edit(draft),
                FieldAction::Cancel => {
                    self.notes.cancel_edit();
                    self.flash = Some(Flash::info("Edit canceled"));
                    true
                }
                FieldAction::Continue => false,
            },
            Mode::ConfirmDelete { .. } | Mode::Normal => true,
        };
        self.mode = if close_form { Mode::Normal } else { mode };
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        let note_id = match &self.mode {
            Mode::ConfirmDelete { note_id } => note_id.clone(),
            _ => return,
        };
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                let change = self.notes.delete(&note_id);
                let message = if change.value {
                    "Note deleted"
                } else {
                    "Note was already gone"
                };
                self.record_change(&change, message);
                self.clamp_selection();
                self.mode = Mode::Normal;
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                self.flash = Some(Flash::info("Delete canceled"));
                self.mode = Mode::Normal;
            }
            _ => {}
        }
    }

    fn begin_edit(&mut self) {
        let (id, draft) = match self.selected_note() {
            Some(note) => (note.id.clone(), FieldValue::new(&note.content)),
            None => {
                self.flash = Some(Flash::warning("No note selected to edit"));
                return;
            }
        };
        if self.notes.begin_edit(&id) {
            self.mode = Mode::Editing(draft);
        }
    }

    fn submit_new(&mut self, draft: &FieldValue) -> bool {
        match self.notes.create(&draft.value) {
            Ok(change) => {
                self.record_change(&change, "Note added");
                self.select_first();
                true
            }
            Err(err) => self.reject(err),
        }
    }

    fn submit_edit(&mut self, draft: &FieldValue) -> bool {
        let id = match self.notes.editing() {
            Some(id) => id.to_string(),
            None => return true,
        };
        match self.notes.update(&id, &draft.value) {
            Ok(change) => {
                self.record_change(&change, "Note updated");
                true
            }
            Err(err @ NoteError::NotFound(_)) => {
                self.notes.cancel_edit();
                self.reject(err);
                true
            }
            Err(err) => self.reject(err),
        }
    }

    fn reject(&mut self, err: NoteError) -> bool {
        self.flash = Some(Flash::warning(match err {
            NoteError::EmptyContent => "Note cannot be empty".to_string(),
            other => other.to_string(),
        }));
        false
    }

    fn record_change<T>(&mut self, change: &Change<T>, message: &str) {
        self.flash = Some(match change.warning() {
            None => {
                self.last_save = Instant::now();
                Flash::info(message)
            }
            Some(err) => Flash::warning(format!(
                "{}, but only in memory: {} (s to retry)",
                message, err
            )),
        });
    }

    fn retry_save(&mut self) {
        if self.notes.is_synced() {
            self.flash = Some(Flash::info("Nothing to save"));
            return;
        }
        self.flash = Some(match self.notes.save() {
            Ok(()) => {
                self.last_save = Instant::now();
                Flash::info("Saved")
            }
            Err(err) => Flash::warning(format!("Save failed: {}", err)),
        });
    }

    fn selected_note(&self) -> Option<&Note> {
        self.list_state
            .selected()
            .and_then(|idx| self.notes.notes().get(idx))
    }

    fn select_first(&mut self) {
        self.list_state
            .select(if self.notes.is_empty() { None } else { Some(0) });
    }

    fn prev_note(&mut self) {
        if let Some(idx) = self.list_state.selected() {
            self.list_state.select(Some(idx.saturating_sub(1)));
        }
    }

    fn next_note(&mut self) {
        match self.list_state.selected() {
            Some(idx) if idx + 1 < self.notes.len() => self.list_state.select(Some(idx + 1)),
            None => self.select_first(),
            _ => {}
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.notes.len();
        let selected = match self.list_state.selected() {
            _ if len == 0 => None,
            Some(idx) => Some(idx.min(len - 1)),
            None => Some(0),
        };
        self.list_state.select(selected);
    }

    fn draw(&mut self, f: &mut ratatui::Frame<'_>) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(4),
            ])
            .split(f.size());

        self.draw_header(f, layout[0]);
        self.draw_notes(f, layout[1]);
        self.draw_footer(f, layout[2]);

        match &self.mode {
            Mode::Composing(draft) => self.draw_compose(f, draft),
            Mode::ConfirmDelete { note_id } => self.draw_confirm(f, note_id),
            Mode::Editing(_) | Mode::Normal => {}
        }
    }

    fn draw_header(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let saved = if self.notes.is_synced() {
            Span::styled(
                format!("saved {}", format_elapsed(self.last_save)),
                Style::default().fg(Color::Gray),
            )
        } else {
            Span::styled(
                "unsaved changes",
                Style::default()
                    .fg(Color::LightRed)
                    .add_modifier(Modifier::BOLD),
            )
        };
        let title = Line::from(vec![
            Span::styled(
                "jotter ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                note_count(self.notes.len()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  •  "),
            Span::styled(
                self.location.scope.to_string(),
                Style::default().fg(Color::Green),
            ),
            Span::raw("  •  "),
            Span::styled(
                format!("{}", self.location.dir.display()),
                Style::default().fg(Color::DarkGray),
            ),
            Span::raw("  •  "),
            saved,
        ]);

        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray));
        let paragraph = Paragraph::new(title)
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(paragraph, area);
    }

    fn draw_notes(&mut self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title(Span::styled(
                "Notes",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .style(Style::default().bg(Color::Rgb(16, 18, 24)));

        if self.notes.is_empty() {
            let empty = Paragraph::new(vec![
                Line::from(Span::styled(
                    "Your collection is empty",
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    "Press n to create your first note.",
                    Style::default().fg(Color::Gray),
                )),
            ])
            .alignment(Alignment::Center)
            .block(block);
            f.render_widget(empty, area);
            return;
        }

        let width = area.width.saturating_sub(2);
        let listing = self.notes.list();
        let selected = self.list_state.selected();
        let draft = match &self.mode {
            Mode::Editing(draft) => Some(draft),
            _ => None,
        };
        let items = listing
            .notes
            .iter()
            .enumerate()
            .map(|(idx, note)| match (listing.editing, draft) {
                (Some(editing), Some(draft)) if editing == note.id => edit_item(draft, width),
                _ => note_item(note, width, selected == Some(idx)),
            })
            .collect::<Vec<_>>();

        let list = List::new(items).block(block);
        f.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn draw_footer(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Length(2)])
            .split(area);

        let help_bar = Paragraph::new(self.footer_help_line())
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        f.render_widget(help_bar, rows[0]);

        let status = match self.flash.as_ref().filter(|flash| flash.is_visible()) {
            Some(flash) if flash.warning => Line::from(Span::styled(
                format!("⚠ {}", flash.text),
                Style::default().fg(Color::LightRed),
            )),
            Some(flash) => Line::from(Span::styled(
                flash.text.clone(),
                Style::default().fg(Color::LightGreen),
            )),
            None => Line::from(""),
        };
        let status = Paragraph::new(status).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        f.render_widget(status, rows[1]);
    }

    fn footer_help_line(&self) -> Line<'static> {
        let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::LightCyan));
        let spans = match self.mode {
            Mode::Normal => vec![
                key("↑↓ / j k"),
                Span::raw(" move  "),
                key("n"),
                Span::raw(" new  "),
                key("e"),
                Span::raw(" edit  "),
                key("d"),
                Span::raw(" delete  "),
                key("s"),
                Span::raw(" save  "),
                key("q"),
                Span::raw(" quit"),
            ],
            Mode::Composing(_) | Mode::Editing(_) => vec![
                key("Enter"),
                Span::raw(" save  "),
                key("Alt+Enter"),
                Span::raw(" newline  "),
                key("Esc"),
                Span::raw(" cancel"),
            ],
            Mode::ConfirmDelete { .. } => vec![
                key("y"),
                Span::raw(" confirm  "),
                key("n / Esc"),
                Span::raw(" cancel"),
            ],
        };
        Line::from(spans)
    }

    fn draw_compose(&self, f: &mut ratatui::Frame<'_>, draft: &FieldValue) {
        let area = centered_rect(70, 50, f.size());
        let mut lines = field_lines("Note", draft);
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Enter to add • Alt+Enter for a newline • Esc to cancel",
            Style::default().fg(Color::Gray),
        )));
        let dialog = Paragraph::new(lines)
            .block(
                Block::default()
                    .title(Span::styled(
                        "New Note",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .wrap(Wrap { trim: false });

        f.render_widget(Clear, area);
        f.render_widget(dialog, area);
    }

    fn draw_confirm(&self, f: &mut ratatui::Frame<'_>, note_id: &str) {
        let area = centered_rect(50, 30, f.size());
        let preview = self
            .notes
            .get(note_id)
            .and_then(|n| n.content.lines().next())
            .map(|line| truncate_text(line, 40))
            .unwrap_or_else(|| note_id.to_string());
        let body = vec![
            Line::from(Span::styled(
                format!("Delete \"{}\"?", preview),
                Style::default()
                    .fg(Color::LightRed)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Press y to confirm, n or Esc to cancel"),
        ];
        let dialog = Paragraph::new(body).alignment(Alignment::Center).block(
            Block::default()
                .title(Span::styled(
                    "Confirm Delete",
                    Style::default()
                        .fg(Color::LightRed)
                        .add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::LightRed)),
        );
        f.render_widget(Clear, area);
        f.render_widget(dialog, area);
    }
}

fn edit_field(field: &mut FieldValue, key: KeyEvent) -> FieldAction {
    match key.code {
        KeyCode::Esc => return FieldAction::Cancel,
        KeyCode::Enter => {
            if key
                .modifiers
                .intersects(KeyModifiers::ALT | KeyModifiers::SHIFT)
            {
                field.insert_char('\n');
            } else {
                return FieldAction::Submit;
            }
        }
        KeyCode::Left => field.move_left(),
        KeyCode::Right => field.move_right(),
        KeyCode::Up => field.move_up(),
        KeyCode::Down => field.move_down(),
        KeyCode::Backspace => field.backspace(),
        KeyCode::Char(c) => {
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
            {
                field.insert_char(c);
            }
        }
        _ => {}
    }
    FieldAction::Continue
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn teardown_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn prev_boundary(text: &str, cursor: usize) -> usize {
    text[..cursor]
        .char_indices()
        .next_back()
        .map_or(0, |(idx, _)| idx)
}

fn next_boundary(text: &str, cursor: usize) -> usize {
    text[cursor..]
        .chars()
        .next()
        .map_or(text.len(), |ch| cursor + ch.len_utf8())
}

// (line starts, cursor line, cursor column)
fn line_state(text: &str, cursor: usize) -> (Vec<usize>, usize, usize) {
    let mut starts = vec![0];
    for (idx, ch) in text.char_indices() {
        if ch == '\n' {
            starts.push(idx + 1);
        }
    }
    let line_idx = starts
        .iter()
        .rposition(|start| *start <= cursor)
        .unwrap_or(0);
    let col = text[starts[line_idx]..cursor].chars().count();
    (starts, line_idx, col)
}

fn index_at_col(text: &str, start: usize, target_col: usize) -> usize {
    let slice = &text[start..];
    let limit = slice.find('\n').unwrap_or(slice.len());
    slice[..limit]
        .char_indices()
        .nth(target_col)
        .map_or(start + limit, |(idx, _)| start + idx)
}

fn note_count(n: usize) -> String {
    if n == 1 {
        "1 note".to_string()
    } else {
        format!("{} notes", n)
    }
}

fn truncate_text(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(3)).collect();
    out.push_str(&".".repeat(max.min(3)));
    out
}

fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    for line in text.split('\n') {
        let chars: Vec<char> = line.chars().collect();
        if chars.is_empty() {
            out.push(String::new());
            continue;
        }
        for chunk in chars.chunks(width) {
            out.push(chunk.iter().collect());
        }
    }
    out
}

fn boxed_lines(
    body: Vec<String>,
    footer: String,
    inner_width: usize,
    edge: &str,
) -> Vec<Line<'static>> {
    let top = format!("+{}+", edge.repeat(inner_width + 2));
    let mut lines = vec![Line::raw(top.clone())];
    for text in body {
        lines.push(Line::raw(format!(
            "| {:width$} |",
            text,
            width = inner_width
        )));
    }
    lines.push(Line::raw(format!("| {:>width$} |", footer, width = inner_width)));
    lines.push(Line::raw(top));
    lines
}

fn note_item(note: &Note, width: u16, selected: bool) -> ListItem<'static> {
    let inner_width = width.saturating_sub(4).max(10) as usize;
    let mut body = wrap_text(&note.content, inner_width);
    if body.len() > MAX_CARD_LINES {
        body.truncate(MAX_CARD_LINES);
        if let Some(last) = body.last_mut() {
            *last = truncate_text(&format!("{}...", last), inner_width);
        }
    }
    let created = note
        .created_at
        .as_ref()
        .map(format_created)
        .unwrap_or_default();
    let edge = if selected { "=" } else { "-" };
    let footer = truncate_text(&created, inner_width);
    let lines = boxed_lines(body, footer, inner_width, edge);
    let item = ListItem::new(lines);
    if selected {
        item.style(
            Style::default()
                .bg(Color::Rgb(252, 214, 112))
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        item.style(Style::default().bg(Color::Rgb(22, 24, 30)).fg(Color::Gray))
    }
}

fn edit_item(draft: &FieldValue, width: u16) -> ListItem<'static> {
    let inner_width = width.saturating_sub(4).max(10) as usize;
    let body = wrap_text(&draft.with_caret(), inner_width);
    let hint = truncate_text("Enter save • Esc cancel", inner_width);
    ListItem::new(boxed_lines(body, hint, inner_width, "#")).style(
        Style::default()
            .bg(Color::Rgb(30, 34, 48))
            .fg(Color::LightCyan),
    )
}

fn field_lines(label: &str, field: &FieldValue) -> Vec<Line<'static>> {
    let label_style = Style::default()
        .fg(Color::Gray)
        .add_modifier(Modifier::BOLD | Modifier::DIM);
    let value_style = Style::default().fg(Color::Cyan);
    let prefix = format!("{}: ", label);
    let spacer = " ".repeat(prefix.chars().count());
    field
        .with_caret()
        .split('\n')
        .enumerate()
        .map(|(idx, line)| {
            Line::from(vec![
                Span::styled(
                    if idx == 0 {
                        prefix.clone()
                    } else {
                        spacer.clone()
                    },
                    label_style,
                ),
                Span::styled(line.to_string(), value_style),
            ])
        })
        .collect()
}

fn format_elapsed(last: Instant) -> String {
    let secs = last.elapsed().as_secs();
    if secs < 60 {
        format!("{}s ago", secs)
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else {
        format!("{}h ago", secs / 3600)
    }
}
