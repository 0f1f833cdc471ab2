use super::centered_rect;
use crate::render::{Instructions, NO_INSTRUCTIONS, RecipeModal};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

const CLOSE_MARKER: &str = " [x] ";

/// Where the modal sits for a given screen size.
pub fn area(screen: Rect) -> Rect {
    centered_rect(80, 80, screen)
}

/// The `[x]` close control in the modal's top border.
pub fn close_marker(modal: Rect) -> Rect {
    let width = CLOSE_MARKER.len() as u16;
    Rect::new(
        modal.right().saturating_sub(width + 1),
        modal.y,
        width,
        1,
    )
}

pub fn render(recipe: &RecipeModal, scroll: u16, frame: &mut Frame) {
    let area = area(frame.area());

    // Clear the area behind the popup
    frame.render_widget(Clear, area);

    let heading = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let label = Style::default().fg(Color::DarkGray);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(" Category: ", label),
            Span::styled(recipe.category.as_str(), Style::default().fg(Color::Yellow)),
        ]),
        Line::from(vec![
            Span::styled(" Image: ", label),
            Span::styled(
                recipe.image_url.as_str(),
                Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
            ),
        ]),
        Line::from(vec![
            Span::styled(" Video: ", label),
            Span::styled(
                recipe.video_url.as_str(),
                Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(" Ingredients:", heading)),
    ];

    lines.extend(
        recipe
            .ingredients
            .iter()
            .map(|item| Line::from(format!("   • {item}"))),
    );

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(" Instructions:", heading)));

    match &recipe.instructions {
        Instructions::Paragraphs(paragraphs) => {
            for paragraph in paragraphs {
                lines.push(Line::from(format!(" {paragraph}")));
                lines.push(Line::from(""));
            }
        }
        Instructions::NotSpecified => {
            lines.push(Line::from(Span::styled(format!(" {NO_INSTRUCTIONS}"), label)));
        }
    }

    let modal = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(format!(" {} ", recipe.name))
                .title(
                    Line::from(Span::styled(CLOSE_MARKER, Style::default().fg(Color::Red)))
                        .alignment(Alignment::Right),
                )
                .title_bottom(
                    Line::from(" ↑↓ scroll   Esc close ").style(Style::default().fg(Color::DarkGray)),
                ),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(modal, area);
}
