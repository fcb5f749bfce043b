//! Per-movie detail panel.

/// A collapsible section of a movie card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailSection {
    Synopsis,
    Genre,
    Director,
}

/// Which detail section of a movie is expanded. At most one is open at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetailPanel {
    open: Option<DetailSection>,
}

impl DetailPanel {
    /// Open `section` and close the others, or close it if it is already open.
    pub fn toggle(&mut self, section: DetailSection) {
        self.open = if self.open == Some(section) {
            None
        } else {
            Some(section)
        };
    }

    pub fn open_section(&self) -> Option<DetailSection> {
        self.open
    }

    pub fn is_open(&self, section: DetailSection) -> bool {
        self.open == Some(section)
    }

    /// The poster is hidden while any section is expanded.
    pub fn hides_image(&self) -> bool {
        self.open.is_some()
    }

    pub fn close(&mut self) {
        self.open = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opening_one_section_closes_others() {
        let mut panel = DetailPanel::default();
        assert!(!panel.hides_image());

        panel.toggle(DetailSection::Synopsis);
        assert!(panel.is_open(DetailSection::Synopsis));
        assert!(panel.hides_image());

        panel.toggle(DetailSection::Director);
        assert!(panel.is_open(DetailSection::Director));
        assert!(!panel.is_open(DetailSection::Synopsis));
        assert!(!panel.is_open(DetailSection::Genre));
    }

    #[test]
    fn test_toggling_open_section_closes_it() {
        let mut panel = DetailPanel::default();
        panel.toggle(DetailSection::Genre);
        panel.toggle(DetailSection::Genre);

        assert_eq!(panel.open_section(), None);
        assert!(!panel.hides_image());
    }
}
