pub const BRAND: &str = "Gavel";
pub const TAGLINE: &str = "Your Legal Career Hub";
pub const HEADLINE: &str = "Latest Legal Job Postings";
pub const SUBHEADLINE: &str = "Browse opportunities and advance your legal career with top employers.";
pub const SECTION_TITLE: &str = "Job Postings";
pub const SEARCH_PLACEHOLDER: &str = "Search legal jobs...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    About,
    Contact,
}

impl Page {
    pub const NAV: [Page; 3] = [Page::Home, Page::About, Page::Contact];

    pub fn label(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::About => "About",
            Page::Contact => "Contact",
        }
    }

    pub fn info(&self) -> Option<&'static InfoPage> {
        match self {
            Page::Home => None,
            Page::About => Some(&ABOUT),
            Page::Contact => Some(&CONTACT),
        }
    }
}

#[derive(Debug)]
pub struct InfoPage {
    pub title: &'static str,
    pub paragraphs: &'static [&'static str],
    pub email: Option<&'static str>,
}

pub static ABOUT: InfoPage = InfoPage {
    title: "About Gavel",
    paragraphs: &[
        "Gavel is dedicated to connecting top legal employers with exceptional legal talent. \
         Our mission is to empower legal careers by offering a carefully curated platform \
         where quality, relevance, and transparency are our guiding principles.",
        "Whether you're starting your legal career or looking to advance to a higher role, \
         Gavel is here to help you find the right opportunity. We believe in providing an \
         intuitive, professional space that meets the needs of both job seekers and employers.",
    ],
    email: None,
};

pub static CONTACT: InfoPage = InfoPage {
    title: "Contact Us",
    paragraphs: &["Have questions, feedback, or need assistance? We'd love to hear from you."],
    email: Some("info@gaveljobs.com"),
};

impl InfoPage {
    pub fn to_text(&self, width: usize) -> String {
        let mut out = format!("{}\n\n", self.title);
        for paragraph in self.paragraphs {
            out.push_str(&textwrap::fill(paragraph, width));
            out.push_str("\n\n");
        }
        if let Some(email) = self.email {
            out.push_str(&format!("You can reach us directly at {}\n", email));
        }
        out
    }
}

#[derive(Debug, Default)]
pub struct History {
    stack: Vec<Page>,
}

impl History {
    pub fn current(&self) -> Page {
        self.stack.last().copied().unwrap_or(Page::Home)
    }

    pub fn navigate(&mut self, page: Page) {
        if self.current() == page {
            return;
        }
        if page == Page::Home {
            self.stack.clear();
        } else if let Some(i) = self.stack.iter().position(|p| *p == page) {
            // revisiting a page unwinds to it instead of stacking a copy
            self.stack.truncate(i + 1);
        } else {
            self.stack.push(page);
        }
    }

    pub fn back(&mut self) {
        self.stack.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_text_includes_email() {
        let text = CONTACT.to_text(80);
        assert!(text.starts_with("Contact Us\n"));
        assert!(text.contains("info@gaveljobs.com"));
    }

    #[test]
    fn test_history_back() {
        let mut history = History::default();
        assert_eq!(history.current(), Page::Home);

        history.navigate(Page::About);
        history.navigate(Page::Contact);
        assert_eq!(history.current(), Page::Contact);

        history.back();
        assert_eq!(history.current(), Page::About);
        history.back();
        assert_eq!(history.current(), Page::Home);
        history.back();
        assert_eq!(history.current(), Page::Home);
    }

    #[test]
    fn test_navigating_home_resets_history() {
        let mut history = History::default();
        history.navigate(Page::About);
        history.navigate(Page::About);
        history.navigate(Page::Home);
        assert_eq!(history.current(), Page::Home);
        history.back();
        assert_eq!(history.current(), Page::Home);
    }

    #[test]
    fn test_history_stays_bounded() {
        let mut history = History::default();
        for _ in 0..50 {
            history.navigate(Page::About);
            history.navigate(Page::Contact);
        }
        assert_eq!(history.current(), Page::Contact);
        history.back();
        assert_eq!(history.current(), Page::About);
        history.back();
        assert_eq!(history.current(), Page::Home);
    }
}
