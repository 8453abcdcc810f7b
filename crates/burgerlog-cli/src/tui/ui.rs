//! Renders the browser screens with ratatui.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, TableState, Tabs, Wrap},
    Frame,
};

use burgerlog_core::schema::format_number;
use burgerlog_core::Reviewer;
use reporting::human;

use crate::tui::app::{App, Screen};

pub fn render(frame: &mut Frame, app: &App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(frame.area());

    render_header(frame, app, main_layout[0]);
    match app.current_screen {
        Screen::Cards => render_cards(frame, app, main_layout[1]),
        Screen::Table => render_table(frame, app, main_layout[1]),
    }
    render_footer(frame, app, main_layout[2]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Screen::ALL
        .iter()
        .map(|screen| {
            let style = if *screen == app.current_screen {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(Span::styled(format!(" {} ", screen.title()), style))
        })
        .collect();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", app.source))
                .title_style(
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .highlight_style(Style::default().fg(Color::Green))
        .select(app.current_screen.index());

    frame.render_widget(tabs, area);
}

fn render_cards(frame: &mut Frame, app: &App, area: Rect) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    let visible = app.visible();
    let items: Vec<ListItem> = visible
        .iter()
        .map(|record| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:>5} ", format_number(record.overall())),
                    Style::default().fg(overall_color(record.overall())),
                ),
                Span::raw(human::truncate(record.venue(), 28)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Mekanlar ({}) ", visible.len())),
        )
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !visible.is_empty() {
        state.select(Some(app.selected));
    }
    frame.render_stateful_widget(list, layout[0], &mut state);

    let detail = match app.selected_record() {
        Some(record) => Paragraph::new(human::card(record)),
        None => Paragraph::new("Kayıt yok.").alignment(Alignment::Center),
    };
    frame.render_widget(
        detail
            .block(Block::default().borders(Borders::ALL).title(" Kart "))
            .wrap(Wrap { trim: false }),
        layout[1],
    );
}

fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(
        ["Tarih", "Mekan", Reviewer::Baba.label(), Reviewer::Gokce.label(), "Ortalama", "Tekrar"]
            .into_iter()
            .map(|title| Cell::from(title).style(Style::default().add_modifier(Modifier::BOLD))),
    );

    let visible = app.visible();
    let rows: Vec<Row> = visible
        .iter()
        .map(|record| {
            Row::new(vec![
                Cell::from(record.date_string()),
                Cell::from(record.venue().to_string()),
                Cell::from(format_number(record.entry(Reviewer::Baba).subtotal)),
                Cell::from(format_number(record.entry(Reviewer::Gokce).subtotal)),
                Cell::from(format_number(record.overall()))
                    .style(Style::default().fg(overall_color(record.overall()))),
                Cell::from(if record.would_return() { "✅" } else { "❌" }),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Min(20),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(10),
            Constraint::Length(7),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Kayıtlar ({}) ", visible.len())),
    )
    .row_highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = TableState::default();
    if !visible.is_empty() {
        state.select(Some(app.selected));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let hint = if app.filtering {
        format!("Filtre: {}_  (Enter: tamam, Esc: temizle)", app.filter)
    } else if app.pending_delete.is_some() {
        app.status.clone()
    } else {
        let filter = if app.filter.is_empty() {
            String::new()
        } else {
            format!("[{}] ", app.filter)
        };
        format!(
            "{filter}{}  |  ↑↓ seç  Tab görünüm  / filtre  d sil  r yenile  q çık",
            app.status
        )
    };
    let style = if app.pending_delete.is_some() {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    frame.render_widget(
        Paragraph::new(hint)
            .style(style)
            .block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn overall_color(overall: f64) -> Color {
    if overall >= 8.0 {
        Color::Green
    } else if overall >= 5.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burgerlog_core::{RecordBuilder, ScoreSet};
    use ratatui::{backend::TestBackend, Terminal};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_overall_color() {
        assert_eq!(overall_color(9.0), Color::Green);
        assert_eq!(overall_color(5.0), Color::Yellow);
        assert_eq!(overall_color(2.5), Color::Red);
    }

    #[test]
    fn test_render_both_screens() {
        let record = RecordBuilder::new("Dumbo")
            .reviewer(Reviewer::Baba, ScoreSet::from_ratings(&[8; 6]), "")
            .build()
            .unwrap();
        let mut app = App::new(vec![record], "memory");
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();

        terminal.draw(|f| render(f, &app)).unwrap();
        assert!(buffer_text(&terminal).contains("Dumbo"));

        app.next_screen();
        terminal.draw(|f| render(f, &app)).unwrap();
        assert!(buffer_text(&terminal).contains("Ortalama"));
    }

    #[test]
    fn test_render_empty_ledger() {
        let app = App::new(Vec::new(), "memory");
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|f| render(f, &app)).unwrap();
        assert!(buffer_text(&terminal).contains("Kayıt yok."));
    }
}
