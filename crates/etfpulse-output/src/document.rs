//! Format-neutral report document.

/// Shown in a table that has no rows.
pub(crate) const NO_DATA: &str = "No data";

/// One block of a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Block {
    Heading { level: u8, text: String },
    Paragraph(String),
    Bullets(Vec<String>),
    Table { headers: Vec<String>, rows: Vec<Vec<String>> },
    Image { alt: String, uri: String },
    Rule,
}

/// An ordered list of blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Document {
    pub(crate) blocks: Vec<Block>,
}

impl Document {
    pub(crate) fn heading(&mut self, level: u8, text: impl Into<String>) {
        self.blocks.push(Block::Heading {
            level,
            text: text.into(),
        });
    }

    pub(crate) fn paragraph(&mut self, text: impl Into<String>) {
        self.blocks.push(Block::Paragraph(text.into()));
    }

    pub(crate) fn bullets(&mut self, items: Vec<String>) {
        self.blocks.push(Block::Bullets(items));
    }

    pub(crate) fn table(&mut self, headers: Vec<String>, rows: Vec<Vec<String>>) {
        self.blocks.push(Block::Table { headers, rows });
    }

    pub(crate) fn image(&mut self, alt: impl Into<String>, uri: String) {
        self.blocks.push(Block::Image {
            alt: alt.into(),
            uri,
        });
    }

    pub(crate) fn rule(&mut self) {
        self.blocks.push(Block::Rule);
    }
}
