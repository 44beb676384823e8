use super::{line, styled_line};
use crate::tui::Controller;
use crossterm::style::Color;
use std::io::{self, Write};

pub(super) fn draw<W: Write>(
    w: &mut W,
    controller: &Controller,
    width: u16,
    height: u16,
) -> io::Result<()> {
    let Some(stats) = controller.summary() else {
        return Ok(());
    };
    if height == 0 {
        return Ok(());
    }

    let mut lines: Vec<(String, Color, bool)> = vec![
        (" Update complete".to_string(), Color::Yellow, true),
        (String::new(), Color::Reset, false),
        (
            format!(
                " attempted {}  succeeded {}  failed {}  skipped {}  success {:.0}%",
                stats.attempted,
                stats.succeeded,
                stats.failed,
                stats.skipped,
                stats.success_rate()
            ),
            Color::Reset,
            false,
        ),
        (String::new(), Color::Reset, false),
    ];
    if !stats.updated.is_empty() {
        lines.push((" Updated".to_string(), Color::Green, true));
        for entry in &stats.updated {
            lines.push((
                format!("   {}  {}", entry.name, entry.detail),
                Color::Green,
                false,
            ));
        }
    }
    if !stats.failures.is_empty() {
        lines.push((" Failed".to_string(), Color::Red, true));
        for entry in &stats.failures {
            let tag = if entry.manual { " [manual]" } else { "" };
            lines.push((
                format!("   {}{tag}  {}", entry.name, entry.detail),
                Color::Red,
                false,
            ));
        }
    }

    let footer_row = height - 1;
    for (row, (text, color, bold)) in (0u16..footer_row).zip(lines) {
        styled_line(w, row, &text, width, color, bold)?;
    }
    if footer_row > 0 {
        line(w, footer_row, " any key to return  q quit", width)?;
    }
    Ok(())
}
