//! Layout calculations for the UI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main screen layout areas
pub struct MainLayout {
    pub health: Option<Rect>,
    pub tabs: Rect,
    pub body: Rect,
    pub detail: Option<Rect>,
    pub status: Rect,
    pub help: Rect,
}

/// Calculate centered popup area
pub fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let popup_x = area.x + (area.width.saturating_sub(width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(
        popup_x,
        popup_y,
        width.min(area.width),
        height.min(area.height),
    )
}

/// Calculate main screen layout.
///
/// `detail_percent` is the width share of the detail panel, `None` hides it.
pub fn calculate_main_layout(
    area: Rect,
    show_health: bool,
    detail_percent: Option<u16>,
) -> MainLayout {
    // Vertical: (optional health cards) + tabs + body + status + help bar
    let mut constraints = Vec::with_capacity(5);
    if show_health {
        constraints.push(Constraint::Length(4));
    }
    constraints.extend([
        Constraint::Length(2),
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(3),
    ]);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let (health, rest) = if show_health {
        (Some(chunks[0]), &chunks[1..])
    } else {
        (None, &chunks[..])
    };

    // Horizontal split of the body: table + optional detail panel
    let (body, detail) = match detail_percent {
        Some(percent) => {
            let percent = percent.clamp(10, 90);
            let body_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Percentage(100 - percent),
                    Constraint::Percentage(percent),
                ])
                .split(rest[1]);
            (body_chunks[0], Some(body_chunks[1]))
        }
        None => (rest[1], None),
    };

    MainLayout {
        health,
        tabs: rest[0],
        body,
        detail,
        status: rest[2],
        help: rest[3],
    }
}
