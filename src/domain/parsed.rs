/// Remote feed content as fetched, before anything is stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedFeed {
    pub title: String,
    pub link: String,
    pub description: String,
    pub items: Vec<ParsedItem>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedItem {
    pub title: String,
    pub link: String,
    pub description: String,
    /// Publication date in `Mon, 02 Jan 2006 15:04:05 -0700` form, or empty.
    pub pub_date: String,
}

impl ParsedItem {
    pub fn new(title: String, link: String) -> Self {
        Self {
            title,
            link,
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = description;
        self
    }

    pub fn with_pub_date(mut self, pub_date: String) -> Self {
        self.pub_date = pub_date;
        self
    }
}
