use ratatui::{
    layout::Rect,
    style::Color,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw_help(area: Rect, f: &mut Frame) {
    let p = Paragraph::new(vec![
        Line::from("Keybinds:"),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("q", Style::default().fg(Color::Magenta)),
            Span::raw(" / "),
            Span::styled("Ctrl-C", Style::default().fg(Color::Magenta)),
            Span::raw("  Quit"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("m", Style::default().fg(Color::Magenta)),
            Span::raw("           Toggle automatic/manual mode"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("tab", Style::default().fg(Color::Magenta)),
            Span::raw("         Switch tabs"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("?", Style::default().fg(Color::Magenta)),
            Span::raw("           Show this help"),
        ]),
        Line::from(""),
        Line::from("Manual mode only:"),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("←/→", Style::default().fg(Color::Magenta)),
            Span::raw("         Drag the slider (no command sent)"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("Enter", Style::default().fg(Color::Magenta)),
            Span::raw("       Send the slider position"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("-/+", Style::default().fg(Color::Magenta)),
            Span::raw("         Step down/up and send"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("z", Style::default().fg(Color::Magenta)),
            Span::raw("           Set 0° (closed) and send"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("c", Style::default().fg(Color::Magenta)),
            Span::raw("           Set 90° (neutral) and send"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("o", Style::default().fg(Color::Magenta)),
            Span::raw("           Set 180° (open) and send"),
        ]),
        Line::from(""),
        Line::from("Angles map to arm rotation as angle - 90, so 90° is vertical."),
        Line::from("Toggling back to automatic hands control to the device (sends 255)."),
    ])
    .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(p, area);
}
