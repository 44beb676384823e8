use super::{line, spinner, styled_line};
use crate::tui::Controller;
use crossterm::style::Color;
use std::io::{self, Write};

const TITLE: &str = "SPARK";
const TAGLINE: &str = "developer tool updater";

pub(super) fn draw<W: Write>(
    w: &mut W,
    controller: &Controller,
    width: u16,
    height: u16,
) -> io::Result<()> {
    if height == 0 {
        return Ok(());
    }
    let mid = height / 2;
    let center = |text: &str| {
        let pad = usize::from(width).saturating_sub(text.len()) / 2;
        format!("{}{text}", " ".repeat(pad))
    };

    styled_line(w, mid.saturating_sub(1), &center(TITLE), width, Color::Yellow, true)?;
    line(w, mid, &center(TAGLINE), width)?;
    let status = format!(
        "{} scanning {} tools",
        spinner(controller),
        controller.catalog().len()
    );
    styled_line(
        w,
        mid.saturating_add(2).min(height - 1),
        &center(&status),
        width,
        Color::DarkGrey,
        false,
    )
}
