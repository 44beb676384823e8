//! Main dashboard: tools grouped by category, search bar and footer.

use super::{line, progress_bar, spinner, status_color, styled_line};
use crate::catalog::Category;
use crate::tui::Controller;
use crate::tui::types::{SessionState, ToolStatus};
use crate::tui::util::{display_width, pad_to_width};
use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use std::io::{self, Write};

const NAME_WIDTH: usize = 22;
const VERSION_WIDTH: usize = 14;
const STATUS_WIDTH: usize = 10;
/// Header, search bar and footer.
const CHROME_ROWS: u16 = 3;

enum Row {
    Header(Category),
    Tool(usize),
}

/// Visible tools in catalog order with a heading at each category change.
fn rows(controller: &Controller) -> Vec<Row> {
    let mut rows = Vec::new();
    let mut current = None;
    for index in controller.visible() {
        let Some(tool) = controller.catalog().get(index) else {
            continue;
        };
        if current != Some(tool.category) {
            current = Some(tool.category);
            rows.push(Row::Header(tool.category));
        }
        rows.push(Row::Tool(index));
    }
    rows
}

pub(super) fn draw<W: Write>(
    w: &mut W,
    controller: &Controller,
    width: u16,
    height: u16,
) -> io::Result<()> {
    if height == 0 {
        return Ok(());
    }
    draw_header(w, controller, width)?;
    if height > 1 {
        draw_search_bar(w, controller, width)?;
    }
    if height > 2 {
        draw_footer(w, controller, height - 1, width)?;
    }

    let body_height = usize::from(height.saturating_sub(CHROME_ROWS));
    if body_height == 0 {
        return Ok(());
    }
    let rows = rows(controller);
    if rows.is_empty() {
        return styled_line(w, 2, "  no tools match", width, Color::DarkGrey, false);
    }

    let cursor_row = rows
        .iter()
        .position(|r| matches!(r, Row::Tool(i) if *i == controller.cursor()))
        .unwrap_or(0);
    let offset = (cursor_row + 1).saturating_sub(body_height);

    for (screen_row, row) in (2u16..).zip(rows.iter().skip(offset).take(body_height)) {
        match row {
            Row::Header(category) => {
                let text = format!(" {} [{}]", category.label(), category.jump_key());
                styled_line(w, screen_row, &text, width, Color::Cyan, true)?;
            }
            Row::Tool(index) => draw_tool(w, controller, *index, screen_row, width)?,
        }
    }
    Ok(())
}

fn draw_header<W: Write>(w: &mut W, controller: &Controller, width: u16) -> io::Result<()> {
    let mut text = format!(" SPARK  {} tools", controller.catalog().len());
    if !controller.selection().is_empty() {
        text.push_str(&format!("  {} selected", controller.selection().len()));
    }
    if controller.is_loading() {
        text.push_str(&format!(
            "  {} scanning {}",
            spinner(controller),
            controller.loading_count()
        ));
    }
    styled_line(w, 0, &text, width, Color::Yellow, true)
}

fn draw_search_bar<W: Write>(w: &mut W, controller: &Controller, width: u16) -> io::Result<()> {
    let searching = controller.state() == SessionState::Search;
    if searching || !controller.filter().is_empty() {
        let caret = if searching { "_" } else { "" };
        let text = format!(" / {}{caret}", controller.filter());
        return styled_line(w, 1, &text, width, Color::White, searching);
    }
    let headings = format!(
        "       {}{}{}STATUS",
        pad_to_width("TOOL", NAME_WIDTH + 1),
        pad_to_width("INSTALLED", VERSION_WIDTH + 1),
        pad_to_width("LATEST", VERSION_WIDTH + 1),
    );
    styled_line(w, 1, &headings, width, Color::DarkGrey, false)
}

fn draw_tool<W: Write>(
    w: &mut W,
    controller: &Controller,
    index: usize,
    row: u16,
    width: u16,
) -> io::Result<()> {
    let Some((tool, state)) = controller.tool(index) else {
        return Ok(());
    };
    let pointer = if index == controller.cursor() { ">" } else { " " };
    let mark = if controller.is_selected(index) { "[x]" } else { "[ ]" };
    let left = format!(
        " {pointer} {mark} {}{}{}",
        pad_to_width(&tool.name, NAME_WIDTH + 1),
        pad_to_width(&state.local_label(), VERSION_WIDTH + 1),
        pad_to_width(&state.remote.to_string(), VERSION_WIDTH + 1),
    );
    let width = usize::from(width);
    let left_width = width.saturating_sub(STATUS_WIDTH).min(display_width(&left));

    let mut status = state.status.label().to_string();
    if matches!(state.status, ToolStatus::Failed | ToolStatus::ManualCheck)
        && let Some(message) = &state.message
    {
        status.push_str(&format!(" {message}"));
    }

    queue!(w, MoveTo(0, row))?;
    if index == controller.cursor() {
        queue!(w, SetAttribute(Attribute::Reverse))?;
    }
    queue!(
        w,
        Print(pad_to_width(&left, left_width)),
        SetForegroundColor(status_color(state.status)),
        Print(pad_to_width(&status, width.saturating_sub(left_width))),
        SetAttribute(Attribute::Reset),
        ResetColor
    )
}

fn draw_footer<W: Write>(
    w: &mut W,
    controller: &Controller,
    row: u16,
    width: u16,
) -> io::Result<()> {
    match controller.state() {
        SessionState::Updating => {
            let progress = controller.progress();
            let current = controller
                .in_flight()
                .and_then(|i| controller.catalog().get(i))
                .map_or("", |t| t.name.as_str());
            let pct = progress.ratio() * 100.0;
            let text = format!(
                " {} updating {current}  {}/{}  [{}] {pct:.0}%",
                spinner(controller),
                progress.completed,
                progress.total,
                progress_bar(progress.ratio(), 20),
            );
            styled_line(w, row, &text, width, Color::Cyan, false)
        }
        SessionState::Search => line(
            w,
            row,
            " type to filter  up/down move  enter done  esc clear",
            width,
        ),
        _ => styled_line(
            w,
            row,
            " space select  g group  a all  tab next group  / search  d preview  enter update  q quit",
            width,
            Color::DarkGrey,
            false,
        ),
    }
}
