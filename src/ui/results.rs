use super::{cards_per_page, layout, page_start, truncate_str};
use crate::app::{App, InputMode, MessageKind, Phase};
use ratatui::{
    Frame,
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

pub fn render<A>(app: &App<A>, frame: &mut Frame) {
    let area = frame.area();
    let areas = layout(app, area);

    // ── Header ──
    let mut header_spans = vec![Span::styled(
        format!(" Recipe Finder   [{} recipes]", app.results.cards.len()),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    if app.phase() == Phase::Loading {
        header_spans.push(Span::styled(
            "   ⏳ Loading…",
            Style::default().fg(Color::Yellow),
        ));
    }
    let header = Paragraph::new(Line::from(header_spans))
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(header, areas.header);

    // ── Search bar ──
    let search_style = match app.input_mode {
        InputMode::Editing => Style::default().fg(Color::Yellow),
        InputMode::Normal => Style::default().fg(Color::DarkGray),
    };
    let search_label = if app.input_mode == InputMode::Editing {
        " 🔍 Dish (Enter to search, Esc to cancel): "
    } else {
        " 🔍 Dish (/): "
    };
    let mut search_block = Block::default()
        .borders(Borders::ALL)
        .border_style(search_style)
        .title(" Search ");
    if let Some(ref err) = app.input_error {
        search_block = search_block.title_bottom(
            Line::from(format!(" {} ", err.text)).style(Style::default().fg(Color::Red)),
        );
    }
    let search_bar = Paragraph::new(format!("{}{}", search_label, app.input))
        .style(search_style)
        .block(search_block);
    frame.render_widget(search_bar, areas.search);

    if app.input_mode == InputMode::Editing && app.modal.is_none() {
        let cursor_x = areas.search.x
            + unicode_width::UnicodeWidthStr::width(search_label) as u16
            + unicode_width::UnicodeWidthStr::width(app.input.as_str()) as u16;
        frame.set_cursor_position((cursor_x, areas.search.y + 1));
    }

    // ── Messages ──
    if areas.messages.height > 0 {
        let lines: Vec<Line> = app
            .results
            .messages
            .iter()
            .rev()
            .take(areas.messages.height.saturating_sub(2) as usize)
            .rev()
            .map(|m| {
                let (icon, color) = match m.kind {
                    MessageKind::Info => ("ℹ", Color::Blue),
                    MessageKind::Error => ("✖", Color::Red),
                };
                Line::from(vec![
                    Span::styled(format!(" {icon} "), Style::default().fg(color)),
                    Span::styled(m.text.as_str(), Style::default().fg(color)),
                ])
            })
            .collect();
        let messages = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(messages, areas.messages);
    }

    // ── Cards ──
    let per_page = cards_per_page(areas.cards);
    let start = page_start(app.selected, per_page);
    let end = (start + per_page).min(app.results.cards.len());
    let text_width = (areas.cards.width as usize).saturating_sub(6);

    let items: Vec<ListItem> = app.results.cards[start.min(end)..end]
        .iter()
        .map(|card| {
            let video = if card.has_video() {
                Span::styled("▶ video", Style::default().fg(Color::Green))
            } else {
                Span::styled("▷ no video", Style::default().fg(Color::DarkGray))
            };
            ListItem::new(Text::from(vec![
                Line::from(Span::styled(
                    truncate_str(&card.name, text_width),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(vec![
                    Span::styled(card.category.as_str(), Style::default().fg(Color::Yellow)),
                    Span::raw("  "),
                    video,
                    Span::styled(
                        format!("  #{}", card.id),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]),
                Line::from(Span::styled(
                    truncate_str(&card.image_url, text_width),
                    Style::default().fg(Color::DarkGray),
                )),
                Line::from(""),
            ]))
        })
        .collect();

    let page_info = format!(
        " {}-{} of {} ",
        if app.results.cards.is_empty() { 0 } else { start + 1 },
        end,
        app.results.cards.len()
    );

    let footer = if app.phase() == Phase::Idle {
        Line::from(" Press / and type a dish name ").alignment(Alignment::Center)
    } else {
        Line::from(page_info).alignment(Alignment::Right)
    };

    let list_widget = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Recipes ")
                .title_bottom(footer),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    let mut list_state = ListState::default();
    if !app.results.cards.is_empty() {
        list_state.select(Some(app.selected - start));
    }
    frame.render_stateful_widget(list_widget, areas.cards, &mut list_state);

    // ── Status bar ──
    let key = |k: &'static str| {
        Span::styled(
            k,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
    };
    let status_line = Line::from(vec![
        key(" ↑↓"),
        Span::raw(" Navigate  "),
        key("/"),
        Span::raw(" Search  "),
        key("Enter"),
        Span::raw(" Details  "),
        key("o"),
        Span::raw(" Video  "),
        key("r"),
        Span::raw(" Popular  "),
        key("?"),
        Span::raw(" Help  "),
        key("q"),
        Span::raw(" Quit  "),
        Span::styled(&app.status_msg, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(status_line), areas.status);
}
