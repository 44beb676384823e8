//! Cursor movement, selection toggles and the search filter.

use super::Controller;
use crate::catalog::Category;

impl Controller {
    /// Indices matching the active filter, in catalog order.
    #[must_use]
    pub fn visible(&self) -> Vec<usize> {
        let needle = self.filter.to_lowercase();
        self.catalog
            .tools()
            .iter()
            .enumerate()
            .filter(|(_, t)| t.matches(&needle))
            .map(|(i, _)| i)
            .collect()
    }

    pub(super) fn cursor_visible(&self) -> bool {
        self.visible().contains(&self.cursor)
    }

    pub(super) fn move_cursor(&mut self, delta: isize) {
        let visible = self.visible();
        if visible.is_empty() {
            return;
        }
        let next = match visible.iter().position(|&i| i == self.cursor) {
            Some(pos) => pos
                .saturating_add_signed(delta)
                .min(visible.len() - 1),
            None => 0,
        };
        self.cursor = visible[next];
    }

    pub(super) fn move_to_edge(&mut self, bottom: bool) {
        let visible = self.visible();
        let edge = if bottom { visible.last() } else { visible.first() };
        if let Some(&i) = edge {
            self.cursor = i;
        }
    }

    pub(super) fn jump_to_category(&mut self, category: Category) {
        let catalog = &self.catalog;
        if let Some(i) = self
            .visible()
            .into_iter()
            .find(|&i| catalog.get(i).is_some_and(|t| t.category == category))
        {
            self.cursor = i;
        }
    }

    /// First visible tool of the next category, wrapping to the top.
    pub(super) fn next_category(&mut self) {
        let visible = self.visible();
        let Some(current) = self.catalog.get(self.cursor).map(|t| t.category) else {
            return;
        };
        let next = visible
            .iter()
            .copied()
            .filter(|&i| i > self.cursor)
            .find(|&i| self.catalog.get(i).is_some_and(|t| t.category != current));
        if let Some(i) = next.or_else(|| visible.first().copied()) {
            self.cursor = i;
        }
    }

    pub(super) fn toggle_cursor(&mut self) {
        if !self.cursor_visible() {
            return;
        }
        if !self.selection.remove(&self.cursor) {
            self.selection.insert(self.cursor);
        }
    }

    /// Select the whole category of the cursor item, or clear it when all
    /// members are already selected.
    pub(super) fn toggle_group(&mut self) {
        let Some(category) = self.catalog.get(self.cursor).map(|t| t.category) else {
            return;
        };
        let members: Vec<usize> = self
            .catalog
            .tools()
            .iter()
            .enumerate()
            .filter(|(_, t)| t.category == category)
            .map(|(i, _)| i)
            .collect();
        let all_selected = members.iter().all(|i| self.selection.contains(i));
        for i in members {
            if all_selected {
                self.selection.remove(&i);
            } else {
                self.selection.insert(i);
            }
        }
    }

    pub(super) fn toggle_all(&mut self) {
        if self.selection.len() == self.tools.len() {
            self.selection.clear();
        } else {
            self.selection.extend(0..self.tools.len());
        }
    }

    /// Re-apply the filter after an edit; the cursor lands on the first match.
    pub(super) fn refilter(&mut self) {
        if let Some(&first) = self.visible().first() {
            self.cursor = first;
        }
    }

    pub(super) fn clear_filter(&mut self) {
        self.filter.clear();
    }
}
