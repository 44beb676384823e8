//! Direct crossterm rendering of the controller snapshot.
//!
//! Every frame is a full redraw of the alternate screen; nothing here
//! mutates session state.

mod dashboard;
mod preview;
mod splash;
mod summary;

use crate::tui::Controller;
use crate::tui::types::{SPINNER, SessionState, ToolStatus};
use crate::tui::util::pad_to_width;
use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, Write};

/// Draw the whole screen for the controller's current state.
pub(crate) fn draw<W: Write>(
    w: &mut W,
    controller: &Controller,
    width: u16,
    height: u16,
) -> io::Result<()> {
    queue!(w, Clear(ClearType::All))?;
    match controller.state() {
        SessionState::Splash => splash::draw(w, controller, width, height)?,
        SessionState::Main | SessionState::Search | SessionState::Updating => {
            dashboard::draw(w, controller, width, height)?;
        }
        SessionState::Preview => preview::draw(w, controller, width, height)?,
        SessionState::Confirm => {
            dashboard::draw(w, controller, width, height)?;
            preview::draw_confirm(w, controller, width, height)?;
        }
        SessionState::Summary => summary::draw(w, controller, width, height)?,
    }
    w.flush()
}

pub(crate) fn status_color(status: ToolStatus) -> Color {
    match status {
        ToolStatus::Checking => Color::DarkGrey,
        ToolStatus::Installed | ToolStatus::Updated => Color::Green,
        ToolStatus::Outdated => Color::Yellow,
        ToolStatus::Missing => Color::DarkGrey,
        ToolStatus::Unmanaged => Color::Blue,
        ToolStatus::ManualCheck => Color::Magenta,
        ToolStatus::Updating => Color::Cyan,
        ToolStatus::Failed => Color::Red,
    }
}

pub(crate) fn spinner(controller: &Controller) -> &'static str {
    SPINNER[controller.frame() % SPINNER.len()]
}

/// Print `text` at `row`, clipped to the screen width.
pub(crate) fn line<W: Write>(w: &mut W, row: u16, text: &str, width: u16) -> io::Result<()> {
    queue!(
        w,
        MoveTo(0, row),
        Print(pad_to_width(text, usize::from(width)))
    )
}

pub(crate) fn styled_line<W: Write>(
    w: &mut W,
    row: u16,
    text: &str,
    width: u16,
    color: Color,
    bold: bool,
) -> io::Result<()> {
    queue!(w, SetForegroundColor(color))?;
    if bold {
        queue!(w, SetAttribute(Attribute::Bold))?;
    }
    line(w, row, text, width)?;
    queue!(w, SetAttribute(Attribute::Reset), ResetColor)
}

/// Bar of `width` cells filled to `ratio`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub(crate) fn progress_bar(ratio: f64, width: usize) -> String {
    let filled = ((ratio.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "#".repeat(filled), "-".repeat(width - filled))
}
