//! Markdown rendering of a report document.

use crate::document::{Block, Document, NO_DATA};
use std::fmt::Write as _;

pub(crate) fn render(document: &Document) -> String {
    let mut out = String::new();
    for block in &document.blocks {
        match block {
            Block::Heading { level, text } => {
                let _ = writeln!(out, "{} {}\n", "#".repeat(usize::from(*level)), text);
            }
            Block::Paragraph(text) => {
                let _ = writeln!(out, "{text}\n");
            }
            Block::Bullets(items) => {
                for item in items {
                    let _ = writeln!(out, "- {item}");
                }
                out.push('\n');
            }
            Block::Table { headers, rows } => table(&mut out, headers, rows),
            Block::Image { alt, uri } => {
                let _ = writeln!(out, "![{alt}]({uri})\n");
            }
            Block::Rule => out.push_str("---\n\n"),
        }
    }
    out
}

fn table(out: &mut String, headers: &[String], rows: &[Vec<String>]) {
    out.push_str(&row(headers.iter().map(|h| cell(h)).collect()));
    out.push_str(&row(vec!["---".to_string(); headers.len()]));
    if rows.is_empty() {
        let mut cells = vec![String::new(); headers.len().max(1)];
        cells[0] = NO_DATA.to_string();
        out.push_str(&row(cells));
    }
    for r in rows {
        out.push_str(&row(r.iter().map(|c| cell(c)).collect()));
    }
    out.push('\n');
}

fn row(cells: Vec<String>) -> String {
    format!("| {} |\n", cells.join(" | "))
}

fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_blocks() {
        let mut doc = Document::default();
        doc.heading(2, "Rankings");
        doc.paragraph("Three funds.");
        doc.bullets(vec!["one".to_string(), "two".to_string()]);
        doc.image("chart", "data:image/svg+xml;base64,AA==".to_string());

        let text = render(&doc);
        assert!(text.starts_with("## Rankings\n\nThree funds.\n\n- one\n- two\n\n"));
        assert!(text.contains("![chart](data:image/svg+xml;base64,AA==)"));
    }

    #[test]
    fn test_table_with_rows() {
        let mut doc = Document::default();
        doc.table(
            vec!["Code".to_string(), "Name".to_string()],
            vec![vec!["001".to_string(), "A|B".to_string()]],
        );
        assert_eq!(
            render(&doc),
            "| Code | Name |\n| --- | --- |\n| 001 | A\\|B |\n\n"
        );
    }

    #[test]
    fn test_empty_table_has_no_data_row() {
        let mut doc = Document::default();
        doc.table(vec!["Code".to_string(), "Name".to_string()], Vec::new());
        assert!(render(&doc).contains("| No data |  |"));
    }
}
