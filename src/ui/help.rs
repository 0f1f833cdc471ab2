use super::centered_rect;
use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

pub fn render(frame: &mut Frame) {
    let area = centered_rect(70, 70, frame.area());

    // Clear the area behind the popup
    frame.render_widget(Clear, area);

    let help_text = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Global", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("    ?         ", Style::default().fg(Color::Yellow)),
            Span::raw("Toggle this help"),
        ]),
        Line::from(vec![
            Span::styled("    q         ", Style::default().fg(Color::Yellow)),
            Span::raw("Quit application"),
        ]),
        Line::from(vec![
            Span::styled("    Ctrl+C    ", Style::default().fg(Color::Yellow)),
            Span::raw("Quit from anywhere"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Results", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("    / or i    ", Style::default().fg(Color::Yellow)),
            Span::raw("Type a dish name"),
        ]),
        Line::from(vec![
            Span::styled("    Enter     ", Style::default().fg(Color::Yellow)),
            Span::raw("Search (while typing) / open recipe details"),
        ]),
        Line::from(vec![
            Span::styled("    ↑/k ↓/j   ", Style::default().fg(Color::Yellow)),
            Span::raw("Select recipe"),
        ]),
        Line::from(vec![
            Span::styled("    g/G       ", Style::default().fg(Color::Yellow)),
            Span::raw("Jump to first/last recipe"),
        ]),
        Line::from(vec![
            Span::styled("    o         ", Style::default().fg(Color::Yellow)),
            Span::raw("Open the recipe video in a browser"),
        ]),
        Line::from(vec![
            Span::styled("    r         ", Style::default().fg(Color::Yellow)),
            Span::raw("Reload popular recipes"),
        ]),
        Line::from(vec![
            Span::styled("    Click     ", Style::default().fg(Color::Yellow)),
            Span::raw("Open recipe details"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Recipe Details", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("    ↑/↓       ", Style::default().fg(Color::Yellow)),
            Span::raw("Scroll"),
        ]),
        Line::from(vec![
            Span::styled("    Esc/q/x   ", Style::default().fg(Color::Yellow)),
            Span::raw("Close"),
        ]),
        Line::from(vec![
            Span::styled("    Click     ", Style::default().fg(Color::Yellow)),
            Span::raw("Close when clicking [x] or outside"),
        ]),
        Line::from(""),
    ];

    let help = Paragraph::new(help_text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help: Keybindings ")
                .title_bottom(Line::from(" Press ? or Esc to close ").style(Style::default().fg(Color::DarkGray))),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(help, area);
}
