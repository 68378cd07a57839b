use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    layout::Position,
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::oneshot::{self, error::TryRecvError};

use crate::board::Board;
use crate::card::{self, JobCard};
use crate::dropdown::Dropdown;
use crate::models::Job;
use crate::pages::{self, History, InfoPage, Page};
use crate::store::{FetchError, JobStore, FALLBACK_MESSAGE};
use crate::variant::PageVariant;

type FetchResult = Result<Vec<Job>, FetchError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Search,
    Control(usize),
    Results,
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

struct AppState {
    board: Board,
    pending: Option<oneshot::Receiver<FetchResult>>,
    history: History,
    focus: Focus,
    selected: usize,
    scroll_offset: u16,
    // where things were drawn last frame, for mouse routing
    nav_areas: Vec<(Page, Rect)>,
    search_area: Rect,
    back_area: Rect,
}

impl AppState {
    fn new(variant: PageVariant, pending: oneshot::Receiver<FetchResult>) -> Self {
        Self {
            board: Board::new(variant),
            pending: Some(pending),
            history: History::default(),
            focus: Focus::Results,
            selected: 0,
            scroll_offset: 0,
            nav_areas: Vec::new(),
            search_area: Rect::default(),
            back_area: Rect::default(),
        }
    }

    fn poll_fetch(&mut self) {
        let Some(rx) = self.pending.as_mut() else { return };
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            // fetch task went away without answering
            Err(TryRecvError::Closed) => Err(FetchError::Provider(FALLBACK_MESSAGE.to_string())),
        };
        self.pending = None;
        self.board.on_fetch(result);
        self.reset_selection();
    }

    fn reset_selection(&mut self) {
        self.selected = 0;
        self.scroll_offset = 0;
    }

    fn focus_order(&self) -> Vec<Focus> {
        let mut order = vec![Focus::Search];
        order.extend((0..self.board.controls().len()).map(Focus::Control));
        order.push(Focus::Results);
        order
    }

    fn cycle_focus(&mut self, forward: bool) {
        self.board.close_dropdowns();
        let order = self.focus_order();
        let current = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (current + 1) % order.len()
        } else {
            (current + order.len() - 1) % order.len()
        };
        self.focus = order[next];
    }

    fn next(&mut self, visible: usize) {
        if visible > 0 && self.selected < visible - 1 {
            self.selected += 1;
            self.scroll_offset = 0;
        }
    }

    fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.scroll_offset = 0;
        }
    }

    fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(3);
    }

    fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(3);
    }

    fn navigate(&mut self, page: Page) {
        self.board.close_dropdowns();
        self.history.navigate(page);
    }

    fn on_key(&mut self, key: KeyEvent) -> Flow {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Flow::Quit;
        }

        if self.history.current() != Page::Home {
            match key.code {
                KeyCode::Char('q') => return Flow::Quit,
                KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => self.history.back(),
                KeyCode::Char('1') => self.navigate(Page::Home),
                KeyCode::Char('2') => self.navigate(Page::About),
                KeyCode::Char('3') => self.navigate(Page::Contact),
                _ => {}
            }
            return Flow::Continue;
        }

        if let Some(open) = self.board.open_control() {
            match key.code {
                KeyCode::Up | KeyCode::Char('k') => self.move_highlight(open, -1),
                KeyCode::Down | KeyCode::Char('j') => self.move_highlight(open, 1),
                KeyCode::PageUp => self.move_highlight(open, -10),
                KeyCode::PageDown => self.move_highlight(open, 10),
                KeyCode::Enter | KeyCode::Char(' ') => {
                    self.board.select_highlighted(open);
                    self.reset_selection();
                }
                KeyCode::Esc => self.board.close_dropdowns(),
                KeyCode::Tab => self.cycle_focus(true),
                KeyCode::BackTab => self.cycle_focus(false),
                _ => {}
            }
            return Flow::Continue;
        }

        if self.focus == Focus::Search {
            match key.code {
                KeyCode::Char(c) => {
                    self.board.push_search(c);
                    self.reset_selection();
                }
                KeyCode::Backspace => {
                    self.board.pop_search();
                    self.reset_selection();
                }
                KeyCode::Enter | KeyCode::Esc => self.focus = Focus::Results,
                KeyCode::Tab => self.cycle_focus(true),
                KeyCode::BackTab => self.cycle_focus(false),
                _ => {}
            }
            return Flow::Continue;
        }

        let visible = self.board.visible().len();
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Flow::Quit,
            KeyCode::Tab => self.cycle_focus(true),
            KeyCode::BackTab => self.cycle_focus(false),
            KeyCode::Char('/') => self.focus = Focus::Search,
            KeyCode::Char('1') => self.navigate(Page::Home),
            KeyCode::Char('2') => self.navigate(Page::About),
            KeyCode::Char('3') => self.navigate(Page::Contact),
            code => match self.focus {
                Focus::Control(index) => {
                    if matches!(code, KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Down) {
                        self.board.toggle_control(index);
                    }
                }
                Focus::Results => match code {
                    KeyCode::Down | KeyCode::Char('j') => self.next(visible),
                    KeyCode::Up | KeyCode::Char('k') => self.prev(),
                    KeyCode::Char('J') | KeyCode::PageDown => self.scroll_down(),
                    KeyCode::Char('K') | KeyCode::PageUp => self.scroll_up(),
                    _ => {}
                },
                Focus::Search => {}
            },
        }
        Flow::Continue
    }

    fn move_highlight(&mut self, index: usize, delta: isize) {
        if let Some(dropdown) = self.board.control_at_mut(index) {
            dropdown.move_highlight(delta);
        }
    }

    fn on_mouse(&mut self, mouse: MouseEvent) {
        let pos = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(page) = self
                    .nav_areas
                    .iter()
                    .find(|(_, area)| area.contains(pos))
                    .map(|(page, _)| *page)
                {
                    self.navigate(page);
                    return;
                }

                if self.history.current() != Page::Home {
                    if self.back_area.contains(pos) {
                        self.history.back();
                    }
                    return;
                }

                let before = self.board.filters();
                self.board.click(mouse.column, mouse.row);
                if self.board.filters() != before {
                    self.reset_selection();
                }

                if let Some(open) = self.board.open_control() {
                    self.focus = Focus::Control(open);
                } else if self.search_area.contains(pos) {
                    self.focus = Focus::Search;
                }
            }
            MouseEventKind::ScrollDown if self.history.current() == Page::Home => self.scroll_down(),
            MouseEventKind::ScrollUp if self.history.current() == Page::Home => self.scroll_up(),
            _ => {}
        }
    }
}

pub fn run_browse(store: Arc<dyn JobStore>, variant: PageVariant, runtime: Handle) -> Result<()> {
    let (tx, rx) = oneshot::channel();

    // Mount: a single fetch, no retry
    runtime.spawn(async move {
        tracing::info!(source = %store.describe(), "fetching jobs");
        let result = store.fetch_jobs().await;
        match &result {
            Ok(jobs) => tracing::info!(count = jobs.len(), "jobs fetched"),
            Err(e) => tracing::warn!(error = %e, "job fetch failed"),
        }
        let _ = tx.send(result);
    });

    let mut state = AppState::new(variant, rx);

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?.execute(EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, &mut state);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(DisableMouseCapture)?.execute(LeaveAlternateScreen)?;

    result
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, state: &mut AppState) -> Result<()> {
    let mut list_state = ListState::default();

    loop {
        state.poll_fetch();
        terminal.draw(|frame| draw(frame, state, &mut list_state))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if state.on_key(key) == Flow::Quit {
                    break;
                }
            }
            Event::Mouse(mouse) => state.on_mouse(mouse),
            _ => {}
        }
    }
    Ok(())
}

// --- Drawing ---

fn draw(frame: &mut Frame, state: &mut AppState, list_state: &mut ListState) {
    let [nav_area, body_area, help_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_nav(frame, state, nav_area);

    match state.history.current().info() {
        Some(info) => {
            draw_info_page(frame, state, info, body_area);
            let help = Paragraph::new(" Esc/b:back  1:home 2:about 3:contact  q:quit")
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(help, help_area);
        }
        None => {
            draw_board(frame, state, list_state, body_area);
            let help = Paragraph::new(
                " Tab:focus  /:search  Enter:open/select  j/k:navigate  J/K:scroll  2:about 3:contact  q:quit",
            )
            .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(help, help_area);
        }
    }
}

fn draw_nav(frame: &mut Frame, state: &mut AppState, area: Rect) {
    let block = Block::default().borders(Borders::BOTTOM);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [brand_area, links_area] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(26)]).areas(inner);

    let brand = Line::from(vec![
        Span::styled(
            format!(" {} ", pages::BRAND),
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            pages::TAGLINE,
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        ),
    ]);
    frame.render_widget(Paragraph::new(brand), brand_area);

    state.nav_areas.clear();
    let mut x = links_area.x;
    let mut spans = Vec::new();
    for (i, page) in Page::NAV.iter().enumerate() {
        let label = format!("{}:{}", i + 1, page.label());
        let width = label.chars().count() as u16;
        state
            .nav_areas
            .push((*page, Rect::new(x, links_area.y, width, 1).intersection(links_area)));
        x = x.saturating_add(width + 1);

        let style = if state.history.current() == *page {
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), links_area);
}

fn draw_info_page(frame: &mut Frame, state: &mut AppState, info: &InfoPage, area: Rect) {
    let [top, content] = Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);

    let back_label = "[<- Back]";
    let back_width = back_label.len() as u16;
    state.back_area = Rect::new(
        top.x + top.width.saturating_sub(back_width + 1),
        top.y,
        back_width,
        1,
    )
    .intersection(top);
    frame.render_widget(
        Paragraph::new(back_label).style(Style::default().fg(Color::Gray)),
        state.back_area,
    );

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            info.title,
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for paragraph in info.paragraphs {
        lines.push(Line::from(*paragraph));
        lines.push(Line::from(""));
    }
    if let Some(email) = info.email {
        lines.push(Line::from(vec![
            Span::raw("You can reach us directly at "),
            Span::styled(
                email,
                Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
            ),
        ]));
    }

    let width = content.width.min(90);
    let centered = Rect::new(
        content.x + (content.width - width) / 2,
        content.y,
        width,
        content.height,
    );
    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        centered,
    );
}

fn draw_board(frame: &mut Frame, state: &mut AppState, list_state: &mut ListState, area: Rect) {
    let [header_area, search_area, filter_area, results_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(0),
    ])
    .areas(area);

    // Record control positions before anything borrows the board immutably
    state.search_area = search_area;
    let count = state.board.controls().len().max(1) as u32;
    let control_areas = Layout::horizontal(vec![Constraint::Ratio(1, count); count as usize]).split(filter_area);
    for (i, rect) in control_areas.iter().enumerate() {
        if let Some(dropdown) = state.board.control_at_mut(i) {
            dropdown.set_button_area(*rect);
        }
    }
    let open = state.board.open_control();
    let popup = open.and_then(|i| {
        let button = control_areas[i];
        let entries = state.board.controls()[i].1.entry_count() as u16;
        let bottom = frame.area().bottom().saturating_sub(1);
        let y = button.bottom();
        let height = (entries + 2).min(14).min(bottom.saturating_sub(y));
        let width = button.width.max(24);
        let rect = Rect::new(button.x, y, width, height).intersection(frame.area());
        // borders plus at least one entry
        (rect.height >= 3).then_some((i, rect))
    });
    match (open, popup) {
        (_, Some((i, rect))) => {
            if let Some(dropdown) = state.board.control_at_mut(i) {
                dropdown.set_list_area(rect);
            }
        }
        // no room below the button
        (Some(_), None) => state.board.close_dropdowns(),
        (None, None) => {}
    }

    // Header
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            pages::HEADLINE,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(pages::SUBHEADLINE, Style::default().fg(Color::LightBlue))),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().style(Style::default().bg(Color::Blue)));
    frame.render_widget(header, header_area);

    // Search bar
    let search_focused = state.focus == Focus::Search;
    let search_text = if state.board.search().is_empty() && !search_focused {
        Span::styled(pages::SEARCH_PLACEHOLDER, Style::default().fg(Color::DarkGray))
    } else if search_focused {
        Span::raw(format!("{}_", state.board.search()))
    } else {
        Span::raw(state.board.search().to_string())
    };
    let search = Paragraph::new(Line::from(search_text)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Search ")
            .border_style(focus_style(search_focused)),
    );
    frame.render_widget(search, search_area);

    // Filter buttons
    for (i, (_, dropdown)) in state.board.controls().iter().enumerate() {
        let arrow = if dropdown.is_open() { "^" } else { "v" };
        let button = Paragraph::new(format!("{} {}", dropdown.button_label(), arrow)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(focus_style(state.focus == Focus::Control(i))),
        );
        frame.render_widget(button, control_areas[i]);
    }

    // Results
    let [list_area, detail_area] =
        Layout::horizontal([Constraint::Percentage(35), Constraint::Percentage(65)]).areas(results_area);

    let visible = state.board.visible();
    if state.selected >= visible.len() {
        state.selected = visible.len().saturating_sub(1);
    }
    list_state.select(if visible.is_empty() { None } else { Some(state.selected) });

    let mut header_lines: Vec<Line> = Vec::new();
    if let Some(error) = state.board.error() {
        header_lines.push(Line::from(Span::styled(error.to_string(), Style::default().fg(Color::Red))));
    }
    if state.board.is_loading() {
        header_lines.push(Line::from(Span::styled(
            "Loading jobs...",
            Style::default().fg(Color::DarkGray),
        )));
    } else if visible.is_empty() {
        header_lines.push(Line::from(card::NO_RESULTS));
    }

    let title = if state.board.filters().is_empty() {
        format!(" {} ({}) ", pages::SECTION_TITLE, visible.len())
    } else {
        format!(
            " {} ({} of {}) ",
            pages::SECTION_TITLE,
            visible.len(),
            state.board.jobs().len()
        )
    };
    let list_block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_style(state.focus == Focus::Results))
        .title(title);

    if visible.is_empty() {
        frame.render_widget(
            Paragraph::new(header_lines).block(list_block).wrap(Wrap { trim: false }),
            list_area,
        );
    } else {
        let inner = list_block.inner(list_area);
        frame.render_widget(list_block, list_area);
        let [messages_area, items_area] =
            Layout::vertical([Constraint::Length(header_lines.len() as u16), Constraint::Min(0)]).areas(inner);
        frame.render_widget(Paragraph::new(header_lines), messages_area);

        let title_width = items_area.width.saturating_sub(4) as usize;
        let items: Vec<ListItem> = visible
            .iter()
            .map(|job| {
                let company = job.company.as_deref().unwrap_or(card::NOT_PROVIDED);
                ListItem::new(card::truncate(&format!("{} | {}", job.job_title, company), title_width))
            })
            .collect();
        let list = List::new(items)
            .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, items_area, list_state);
    }

    let detail = match visible.get(state.selected) {
        Some(job) => build_card(&JobCard::new(job)),
        None => Text::raw(""),
    };
    let detail_widget = Paragraph::new(detail)
        .block(Block::default().borders(Borders::ALL).title(" Posting "))
        .wrap(Wrap { trim: false })
        .scroll((state.scroll_offset, 0));
    frame.render_widget(detail_widget, detail_area);

    // Open dropdown goes on top of everything else
    if let Some((i, rect)) = popup {
        draw_dropdown_list(frame, &state.board.controls()[i].1, rect);
    }
}

fn draw_dropdown_list(frame: &mut Frame, dropdown: &Dropdown, area: Rect) {
    frame.render_widget(Clear, area);
    let rows = dropdown.visible_rows();
    let selected = dropdown.selected_entry();
    let lines: Vec<Line> = (dropdown.offset()..dropdown.entry_count())
        .take(rows)
        .map(|entry| {
            let mut style = Style::default();
            if entry == selected {
                style = style.fg(Color::Blue).add_modifier(Modifier::BOLD);
            }
            if entry == dropdown.highlighted() {
                style = style.bg(Color::DarkGray);
            }
            Line::from(Span::styled(dropdown.entry_label(entry).to_string(), style))
        })
        .collect();
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::LightBlue)),
        ),
        area,
    );
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

fn build_card<'a>(card: &JobCard<'a>) -> Text<'a> {
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        card.title,
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    for (label, value) in card.fields() {
        lines.push(Line::from(vec![
            Span::styled(format!("{}: ", label), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(value),
        ]));
    }
    lines.push(Line::from(""));

    for line in card.description.lines() {
        lines.push(Line::from(line));
    }

    if let Some(url) = card.url {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::raw("View Posting: "),
            Span::styled(url, Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED)),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Posted on: {}", card.posted_on),
        Style::default().fg(Color::DarkGray),
    )));

    Text::from(lines)
}
