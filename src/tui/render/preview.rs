//! Preview list and the protected-category confirmation modal.

use super::{line, styled_line};
use crate::catalog::Category;
use crate::tui::Controller;
use crossterm::style::Color;
use std::io::{self, Write};

pub(super) fn draw<W: Write>(
    w: &mut W,
    controller: &Controller,
    width: u16,
    height: u16,
) -> io::Result<()> {
    if height == 0 {
        return Ok(());
    }
    let pending = controller.pending();
    let title = format!(" Preview: {} tools will be updated", pending.len());
    styled_line(w, 0, &title, width, Color::Yellow, true)?;

    let mut lines: Vec<(String, Color)> = Vec::new();
    for category in Category::ALL {
        let tools: Vec<_> = pending
            .iter()
            .filter_map(|&i| controller.tool(i))
            .filter(|(t, _)| t.category == category)
            .collect();
        if tools.is_empty() {
            continue;
        }
        let heading = if controller.is_protected(category) {
            format!(" {} (protected)", category.label())
        } else {
            format!(" {}", category.label())
        };
        lines.push((heading, Color::Cyan));
        for (tool, state) in tools {
            let target = state
                .remote
                .version()
                .map_or_else(|| "latest".to_string(), str::to_string);
            let text = format!(
                "   {}  {} -> {target}  via {}",
                tool.name,
                state.local_label(),
                tool.method.tag()
            );
            let color = if controller.is_protected(category) {
                Color::Red
            } else {
                Color::Reset
            };
            lines.push((text, color));
        }
    }

    let footer_row = height - 1;
    for (row, (text, color)) in (2u16..footer_row).zip(lines) {
        styled_line(w, row, &text, width, color, false)?;
    }
    if footer_row > 0 {
        line(w, footer_row, " enter proceed  esc back", width)?;
    }
    Ok(())
}

/// Modal listing the protected tools in the pending batch.
pub(super) fn draw_confirm<W: Write>(
    w: &mut W,
    controller: &Controller,
    width: u16,
    height: u16,
) -> io::Result<()> {
    let protected: Vec<&str> = controller
        .pending()
        .iter()
        .filter_map(|&i| controller.catalog().get(i))
        .filter(|t| controller.is_protected(t.category))
        .map(|t| t.name.as_str())
        .collect();

    let body = [
        String::new(),
        " Protected tools selected:".to_string(),
        format!("   {}", protected.join(", ")),
        format!(" {} tools in batch. Proceed? [y/N]", controller.pending().len()),
        String::new(),
    ];
    let top = (height / 2).saturating_sub(2);
    for (row, text) in (top..height).zip(body.iter()) {
        styled_line(w, row, text, width, Color::Red, true)?;
    }
    Ok(())
}
