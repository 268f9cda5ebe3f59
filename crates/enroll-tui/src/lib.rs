// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use enroll_app::{
    AppCommand, AppEvent, AppState, ApplicationRecord, Column, LoadState, SortDirection,
    TableView, page_count,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

const TITLE: &str = "Student Applications List";
const LOADING_TEXT: &str = "Loading...";
const NO_DATA_TEXT: &str = "No data available";
const SEARCH_PLACEHOLDER: &str = "Search by Applicant Name, Status, or Student ID";
const SORT_MARK_ASC: &str = "▲";
const SORT_MARK_DESC: &str = "▼";
const SORT_MARK_IDLE: &str = "⇅";
const SEARCH_CURSOR: &str = "▏";
const STATUS_CLEAR_DELAY: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, PartialEq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
    Loaded(std::result::Result<Vec<ApplicationRecord>, String>),
}

/// Source of the dataset. `spawn_load` must deliver exactly one
/// [`InternalEvent::Loaded`] on `tx`; the default runs the load inline.
pub trait AppRuntime {
    fn load_applications(&mut self) -> Result<Vec<ApplicationRecord>>;

    fn spawn_load(&mut self, tx: Sender<InternalEvent>) -> Result<()> {
        let result = self
            .load_applications()
            .map_err(|error| format!("{error:#}"));
        tx.send(InternalEvent::Loaded(result))
            .map_err(|_| anyhow::anyhow!("load event channel closed"))?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Focus {
    Search,
    #[default]
    Table,
    Pager,
}

impl Focus {
    const fn next(self) -> Self {
        match self {
            Self::Search => Self::Table,
            Self::Table => Self::Pager,
            Self::Pager => Self::Search,
        }
    }

    const fn prev(self) -> Self {
        match self {
            Self::Search => Self::Pager,
            Self::Table => Self::Search,
            Self::Pager => Self::Table,
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Search => "SEARCH",
            Self::Table => "TABLE",
            Self::Pager => "PAGES",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ViewData {
    focus: Focus,
    selected_row: usize,
    selected_col: usize,
    pager_cursor: usize,
    status_token: u64,
}

impl Default for ViewData {
    fn default() -> Self {
        Self {
            focus: Focus::default(),
            selected_row: 0,
            selected_col: 0,
            pager_cursor: 1,
            status_token: 0,
        }
    }
}

pub fn run_app<R: AppRuntime>(state: &mut AppState, runtime: &mut R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    if let Err(error) = runtime.spawn_load(internal_tx.clone()) {
        apply_load_result(state, &mut view_data, Err(format!("{error:#}")));
    }

    let result = event_loop(&mut terminal, state, &mut view_data, &internal_tx, &internal_rx);

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    internal_rx: &Receiver<InternalEvent>,
) -> Result<()> {
    loop {
        process_internal_events(state, view_data, internal_rx);

        terminal
            .draw(|frame| render(frame, state, view_data))
            .context("draw frame")?;

        if !event::poll(Duration::from_millis(120)).context("poll event")? {
            continue;
        }
        if let Event::Key(key) = event::read().context("read event")? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if handle_key_event(state, view_data, internal_tx, key) {
                return Ok(());
            }
        }
    }
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &mut ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::Loaded(result) => apply_load_result(state, view_data, result),
        }
    }
}

fn apply_load_result(
    state: &mut AppState,
    view_data: &mut ViewData,
    result: std::result::Result<Vec<ApplicationRecord>, String>,
) {
    if let Err(cause) = &result {
        tracing::warn!(%cause, "application fetch failed");
    }
    for event in state.dispatch(AppCommand::LoadFinished(result)) {
        if let AppEvent::Loaded { records } = event {
            tracing::info!(records, "applications ready");
        }
    }
    view_data.selected_row = 0;
    view_data.pager_cursor = 1;
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_DELAY);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

/// Returns `true` when the app should quit.
fn handle_key_event(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c'))
    {
        return true;
    }

    if state.load.view().is_none() {
        return matches!(key.code, KeyCode::Char('q') | KeyCode::Esc);
    }

    match key.code {
        KeyCode::Tab => {
            view_data.focus = view_data.focus.next();
            return false;
        }
        KeyCode::BackTab => {
            view_data.focus = view_data.focus.prev();
            return false;
        }
        _ => {}
    }

    match view_data.focus {
        Focus::Search => {
            handle_search_key(state, view_data, key);
            false
        }
        Focus::Table => handle_table_key(state, view_data, internal_tx, key),
        Focus::Pager => handle_pager_key(state, view_data, key),
    }
}

fn handle_search_key(state: &mut AppState, view_data: &mut ViewData, key: KeyEvent) {
    let Some(mut query) = state.load.view().map(|view| view.query().to_owned()) else {
        return;
    };

    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) | (KeyCode::Enter, _) => {
            view_data.focus = Focus::Table;
            return;
        }
        (KeyCode::Char('u'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            query.clear();
        }
        (KeyCode::Backspace, _) => {
            query.pop();
        }
        (KeyCode::Char(ch), modifiers)
            if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            query.push(ch);
        }
        _ => return,
    }

    for event in state.dispatch(AppCommand::ApplyQuery(query)) {
        if let AppEvent::QueryApplied { .. } = event {
            view_data.selected_row = 0;
            view_data.pager_cursor = 1;
        }
    }
}

fn handle_table_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('/') => view_data.focus = Focus::Search,
        KeyCode::Char('j') | KeyCode::Down => move_row(state, view_data, 1),
        KeyCode::Char('k') | KeyCode::Up => move_row(state, view_data, -1),
        KeyCode::Char('h') | KeyCode::Left => move_col(view_data, -1),
        KeyCode::Char('l') | KeyCode::Right => move_col(view_data, 1),
        KeyCode::Char('g') => view_data.selected_row = 0,
        KeyCode::Char('G') => {
            let rows = state.load.view().map_or(0, |view| view.current_rows().len());
            view_data.selected_row = rows.saturating_sub(1);
        }
        KeyCode::Char('s') | KeyCode::Enter => {
            sort_selected_column(state, view_data, internal_tx);
        }
        _ => {}
    }
    false
}

fn handle_pager_key(state: &mut AppState, view_data: &mut ViewData, key: KeyEvent) -> bool {
    let last_page = state.load.view().map_or(1, TableView::last_page);
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('/') => view_data.focus = Focus::Search,
        KeyCode::Char('h') | KeyCode::Left => {
            view_data.pager_cursor = view_data.pager_cursor.saturating_sub(1).max(1);
        }
        KeyCode::Char('l') | KeyCode::Right => {
            view_data.pager_cursor = view_data.pager_cursor.saturating_add(1).min(last_page);
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            select_page(state, view_data, view_data.pager_cursor);
        }
        KeyCode::Char(digit @ '1'..='9') => {
            let page = digit.to_digit(10).map_or(1, |value| value as usize);
            select_page(state, view_data, page);
        }
        _ => {}
    }
    false
}

fn select_page(state: &mut AppState, view_data: &mut ViewData, page: usize) {
    for event in state.dispatch(AppCommand::SelectPage(page)) {
        if let AppEvent::PageChanged(_) = event {
            view_data.selected_row = 0;
        }
    }
    if let Some(view) = state.load.view() {
        view_data.pager_cursor = view.page();
    }
}

fn sort_selected_column(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let column = selected_column(view_data);
    let Some(key) = column.sort_key() else {
        emit_status(
            state,
            view_data,
            internal_tx,
            format!("sort unavailable: {}", column.label()),
        );
        return;
    };

    for event in state.dispatch(AppCommand::SortBy(key)) {
        if let AppEvent::Sorted(spec) = event {
            emit_status(
                state,
                view_data,
                internal_tx,
                format!("sort {} {}", column.label(), spec.direction.as_str()),
            );
        }
    }
}

fn selected_column(view_data: &ViewData) -> Column {
    Column::ALL[view_data.selected_col.min(Column::ALL.len() - 1)]
}

fn move_row(state: &AppState, view_data: &mut ViewData, delta: isize) {
    let row_count = state.load.view().map_or(0, |view| view.current_rows().len());
    if row_count == 0 {
        view_data.selected_row = 0;
        return;
    }

    let current = view_data.selected_row;
    let next = if delta.is_negative() {
        current.saturating_sub(delta.unsigned_abs())
    } else {
        current.saturating_add(delta as usize)
    };
    view_data.selected_row = next.min(row_count - 1);
}

fn move_col(view_data: &mut ViewData, delta: isize) {
    let current = view_data.selected_col;
    let next = if delta.is_negative() {
        current.saturating_sub(delta.unsigned_abs())
    } else {
        current.saturating_add(delta as usize)
    };
    view_data.selected_col = next.min(Column::ALL.len() - 1);
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    match &state.load {
        LoadState::Loading => render_message(frame, LOADING_TEXT, Style::default()),
        LoadState::Error(message) => {
            render_message(frame, message, Style::default().fg(Color::Red));
        }
        LoadState::Ready(view) => render_ready(frame, state, view, view_data),
    }
}

fn render_message(frame: &mut ratatui::Frame<'_>, text: &str, style: Style) {
    let body = Paragraph::new(text.to_owned())
        .style(style)
        .block(Block::default().title(TITLE).borders(Borders::ALL));
    frame.render_widget(body, frame.area());
}

fn render_ready(
    frame: &mut ratatui::Frame<'_>,
    state: &AppState,
    view: &TableView,
    view_data: &ViewData,
) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let search = Paragraph::new(search_line(view, view_data.focus == Focus::Search)).block(
        Block::default()
            .title("search")
            .borders(Borders::ALL)
            .border_style(focus_border(view_data.focus == Focus::Search)),
    );
    frame.render_widget(search, layout[0]);

    render_table(frame, layout[1], view, view_data);

    let pager = Paragraph::new(Line::from(pager_spans(view, view_data))).block(
        Block::default()
            .title("pages")
            .borders(Borders::ALL)
            .border_style(focus_border(view_data.focus == Focus::Pager)),
    );
    frame.render_widget(pager, layout[2]);

    let status = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[3]);
}

fn focus_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn render_table(frame: &mut ratatui::Frame<'_>, area: Rect, view: &TableView, view_data: &ViewData) {
    let table_focused = view_data.focus == Focus::Table;

    let header_cells = Column::ALL.iter().enumerate().map(|(index, column)| {
        let mut style = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);
        if table_focused && index == view_data.selected_col {
            style = style.fg(Color::Cyan);
        }
        Cell::from(header_label(view, *column)).style(style)
    });
    let header = Row::new(header_cells);

    let page_rows = view.current_rows();
    let rows: Vec<Row> = page_rows
            .iter()
            .enumerate()
            .map(|(row_index, record)| {
                let selected_row = table_focused && row_index == view_data.selected_row;
                let cells = Column::ALL
                    .iter()
                    .enumerate()
                    .map(|(column_index, column)| {
                        let mut style = Style::default();
                        if selected_row {
                            style = style.bg(Color::DarkGray);
                        }
                        if selected_row && column_index == view_data.selected_col {
                            style = Style::default()
                                .fg(Color::Black)
                                .bg(Color::Cyan)
                                .add_modifier(Modifier::BOLD);
                        }
                        Cell::from(record.cell_text(*column)).style(style)
                    })
                    .collect::<Vec<_>>();
                Row::new(cells)
            })
            .collect();

    let block = Block::default()
        .title(table_title(view))
        .borders(Borders::ALL)
        .border_style(focus_border(table_focused));
    let inner = block.inner(area);

    let widths = vec![Constraint::Fill(1); Column::ALL.len()];
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(block);
    frame.render_widget(table, area);

    // Spans every column, below the header row.
    if page_rows.is_empty() && inner.height > 1 {
        let message_area = Rect {
            y: inner.y + 1,
            height: 1,
            ..inner
        };
        let message = Paragraph::new(NO_DATA_TEXT).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(message, message_area);
    }
}

fn header_label(view: &TableView, column: Column) -> String {
    let Some(key) = column.sort_key() else {
        return column.label().to_owned();
    };
    let mark = match view.sort_direction_for(key) {
        Some(SortDirection::Asc) => SORT_MARK_ASC,
        Some(SortDirection::Desc) => SORT_MARK_DESC,
        None => SORT_MARK_IDLE,
    };
    format!("{} {mark}", column.label())
}

fn table_title(view: &TableView) -> String {
    format!(
        " {TITLE} | {} of {} | page {}/{} ",
        view.derived().len(),
        view.raw().len(),
        view.page(),
        view.last_page()
    )
}

fn search_line(view: &TableView, focused: bool) -> Line<'static> {
    let mut spans = Vec::with_capacity(2);
    if view.query().is_empty() {
        if focused {
            spans.push(Span::raw(SEARCH_CURSOR));
        }
        spans.push(Span::styled(
            SEARCH_PLACEHOLDER,
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.push(Span::raw(view.query().to_owned()));
        if focused {
            spans.push(Span::raw(SEARCH_CURSOR));
        }
    }
    Line::from(spans)
}

/// One button per page; an empty view has no buttons.
fn pager_spans(view: &TableView, view_data: &ViewData) -> Vec<Span<'static>> {
    let pager_focused = view_data.focus == Focus::Pager;
    let mut spans = Vec::new();
    for page in 1..=page_count(view.derived().len()) {
        if page > 1 {
            spans.push(Span::raw(" "));
        }
        let mut style = Style::default();
        if page == view.page() {
            style = style
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD);
        }
        if pager_focused && page == view_data.pager_cursor {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        spans.push(Span::styled(format!("[{page}]"), style));
    }
    spans
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    let hints = match view_data.focus {
        Focus::Search => "type to filter | ctrl+u clear | enter/esc table | tab focus | ctrl+q quit",
        Focus::Table => "j/k rows | h/l cols | s sort | / search | tab focus | q quit",
        Focus::Pager => "h/l move | enter go | 1-9 page | tab focus | q quit",
    };
    let focus = view_data.focus.label();
    match &state.status_line {
        Some(status) => format!("{focus} | {status} | {hints}"),
        None => format!("{focus} | {hints}"),
    }
}
