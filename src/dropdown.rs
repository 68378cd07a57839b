use ratatui::layout::{Position, Rect};

use crate::variant::FilterOption;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Click {
    Dismissed,
    Ignored,
    Toggled,
    Selected { changed: bool },
    // on the list border
    Inside,
}

#[derive(Debug, Clone)]
pub struct Dropdown {
    all_label: &'static str,
    options: Vec<FilterOption>,
    selected: Option<usize>,
    open: bool,
    // 0 is the "All ..." entry, `i + 1` is `options[i]`
    highlighted: usize,
    offset: usize,
    button_area: Rect,
    list_area: Option<Rect>,
}

impl Dropdown {
    pub fn new(all_label: &'static str, options: Vec<FilterOption>) -> Self {
        Self {
            all_label,
            options,
            selected: None,
            open: false,
            highlighted: 0,
            offset: 0,
            button_area: Rect::default(),
            list_area: None,
        }
    }

    pub fn set_options(&mut self, options: Vec<FilterOption>) {
        let current = self.selected_option().map(|o| o.value.clone());
        self.options = options;
        self.selected = current.and_then(|v| self.options.iter().position(|o| o.value == v));
        self.highlighted = self.selected.map_or(0, |i| i + 1);
        self.offset = 0;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
        self.highlighted = self.selected.map_or(0, |i| i + 1);
        self.scroll_to_highlight();
    }

    pub fn close(&mut self) {
        self.open = false;
        self.list_area = None;
    }

    pub fn toggle(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open();
        }
    }

    pub fn selected_option(&self) -> Option<&FilterOption> {
        self.selected.and_then(|i| self.options.get(i))
    }

    pub fn value(&self) -> &str {
        self.selected_option().map_or("", |o| o.value.as_str())
    }

    pub fn button_label(&self) -> &str {
        self.selected_option().map_or(self.all_label, |o| o.label.as_str())
    }

    pub fn entry_count(&self) -> usize {
        self.options.len() + 1
    }

    pub fn entry_label(&self, index: usize) -> &str {
        match index {
            0 => self.all_label,
            i => self.options.get(i - 1).map_or("", |o| o.label.as_str()),
        }
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn selected_entry(&self) -> usize {
        self.selected.map_or(0, |i| i + 1)
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn move_highlight(&mut self, delta: isize) {
        let last = self.entry_count() - 1;
        self.highlighted = self.highlighted.saturating_add_signed(delta).min(last);
        self.scroll_to_highlight();
    }

    /// Returns whether the filter value changed. Always closes.
    pub fn select_entry(&mut self, entry: usize) -> bool {
        let before = self.selected;
        self.selected = match entry {
            0 => None,
            i if i <= self.options.len() => Some(i - 1),
            _ => before,
        };
        self.close();
        self.selected != before
    }

    pub fn select_highlighted(&mut self) -> bool {
        self.select_entry(self.highlighted)
    }

    pub fn clear(&mut self) -> bool {
        self.select_entry(0)
    }

    pub fn select_value(&mut self, value: &str) -> bool {
        match self
            .options
            .iter()
            .position(|o| o.value.eq_ignore_ascii_case(value))
        {
            Some(i) => self.select_entry(i + 1),
            None => false,
        }
    }

    // --- Layout bookkeeping ---

    pub fn set_button_area(&mut self, area: Rect) {
        self.button_area = area;
    }

    pub fn set_list_area(&mut self, area: Rect) {
        self.list_area = Some(area);
        self.scroll_to_highlight();
    }

    pub fn visible_rows(&self) -> usize {
        self.list_area
            .map_or(self.entry_count(), |a| a.height.saturating_sub(2) as usize)
            .max(1)
    }

    fn scroll_to_highlight(&mut self) {
        let rows = self.visible_rows();
        if self.highlighted < self.offset {
            self.offset = self.highlighted;
        } else if self.highlighted >= self.offset + rows {
            self.offset = self.highlighted + 1 - rows;
        }
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        let pos = Position::new(column, row);
        self.button_area.contains(pos) || self.list_area.is_some_and(|a| a.contains(pos))
    }

    pub fn click(&mut self, column: u16, row: u16) -> Click {
        let pos = Position::new(column, row);

        if self.button_area.contains(pos) {
            self.toggle();
            return Click::Toggled;
        }

        if let Some(list) = self.list_area.filter(|_| self.open) {
            if list.contains(pos) {
                let inner_top = list.y + 1;
                if row < inner_top || row >= list.y + list.height.saturating_sub(1) {
                    return Click::Inside;
                }
                let entry = self.offset + (row - inner_top) as usize;
                if entry >= self.entry_count() {
                    return Click::Inside;
                }
                let changed = self.select_entry(entry);
                return Click::Selected { changed };
            }
        }

        if self.open {
            self.close();
            Click::Dismissed
        } else {
            Click::Ignored
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn states() -> Dropdown {
        let options = ["Alabama", "Alaska", "Arizona", "Arkansas", "California"]
            .into_iter()
            .map(FilterOption::plain)
            .collect();
        let mut d = Dropdown::new("All Locations", options);
        d.set_button_area(Rect::new(0, 0, 20, 3));
        d
    }

    #[test]
    fn test_defaults_to_all() {
        let d = states();
        assert!(!d.is_open());
        assert_eq!(d.value(), "");
        assert_eq!(d.button_label(), "All Locations");
        assert_eq!(d.entry_count(), 6);
    }

    #[test]
    fn test_keyboard_selection() {
        let mut d = states();
        d.toggle();
        assert!(d.is_open());
        d.move_highlight(5);
        assert!(d.select_highlighted());
        assert!(!d.is_open());
        assert_eq!(d.value(), "California");

        d.open();
        assert_eq!(d.highlighted(), 5);
        d.move_highlight(-10);
        assert!(d.select_highlighted());
        assert_eq!(d.value(), "");
    }

    #[test]
    fn test_click_outside_closes() {
        let mut d = states();
        d.toggle();
        d.set_list_area(Rect::new(0, 3, 20, 8));

        assert_eq!(d.click(50, 20), Click::Dismissed);
        assert!(!d.is_open());
        assert_eq!(d.click(50, 20), Click::Ignored);
    }

    #[test]
    fn test_click_inside_keeps_open() {
        let mut d = states();
        d.toggle();
        d.set_list_area(Rect::new(0, 3, 20, 8));

        // top border of the list
        assert_eq!(d.click(5, 3), Click::Inside);
        assert!(d.is_open());
    }

    #[test]
    fn test_click_on_entry_selects() {
        let mut d = states();
        assert_eq!(d.click(2, 1), Click::Toggled);
        d.set_list_area(Rect::new(0, 3, 20, 8));

        // row 4 is the first entry ("All Locations"), row 6 is "Alaska"
        assert_eq!(d.click(2, 6), Click::Selected { changed: true });
        assert_eq!(d.value(), "Alaska");
        assert!(!d.is_open());
    }

    #[test]
    fn test_scrolled_list_maps_clicks() {
        let mut d = states();
        d.open();
        // 3 visible entries
        d.set_list_area(Rect::new(0, 3, 20, 5));
        d.move_highlight(4);
        assert_eq!(d.offset(), 2);

        assert_eq!(d.click(2, 4), Click::Selected { changed: true });
        assert_eq!(d.value(), "Alaska");
    }

    #[test]
    fn test_set_options_keeps_or_clears_selection() {
        let mut d = states();
        d.select_value("Arizona");
        d.set_options(vec![FilterOption::plain("Arizona"), FilterOption::plain("Texas")]);
        assert_eq!(d.value(), "Arizona");

        d.set_options(vec![FilterOption::plain("Texas")]);
        assert_eq!(d.value(), "");
    }

    #[test]
    fn test_select_value_ignores_case() {
        let mut d = states();
        assert!(d.select_value("arizona"));
        assert_eq!(d.value(), "Arizona");
        assert!(!d.select_value("Atlantis"));
        assert_eq!(d.value(), "Arizona");
    }
}
