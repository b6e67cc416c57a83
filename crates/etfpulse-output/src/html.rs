//! HTML rendering of a report document.

use crate::document::{Block, Document, NO_DATA};
use std::fmt::Write as _;

const STYLE: &str = "body{font-family:sans-serif;max-width:960px;margin:2em auto;color:#222}\
table{border-collapse:collapse;margin:1em 0}\
th,td{border:1px solid #ccc;padding:4px 8px;text-align:left}\
th{background:#f0f0f0}img{max-width:100%}";

pub(crate) fn render(title: &str, document: &Document) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n",
        escape(title)
    );
    for block in &document.blocks {
        match block {
            Block::Heading { level, text } => {
                let level = (*level).clamp(1, 6);
                let _ = writeln!(out, "<h{level}>{}</h{level}>", escape(text));
            }
            Block::Paragraph(text) => {
                let _ = writeln!(out, "<p>{}</p>", escape(text));
            }
            Block::Bullets(items) => {
                out.push_str("<ul>\n");
                for item in items {
                    let _ = writeln!(out, "<li>{}</li>", escape(item));
                }
                out.push_str("</ul>\n");
            }
            Block::Table { headers, rows } => table(&mut out, headers, rows),
            Block::Image { alt, uri } => {
                let _ = writeln!(out, "<img alt=\"{}\" src=\"{}\">", escape(alt), escape(uri));
            }
            Block::Rule => out.push_str("<hr>\n"),
        }
    }
    out.push_str("</body>\n</html>\n");
    out
}

fn table(out: &mut String, headers: &[String], rows: &[Vec<String>]) {
    out.push_str("<table>\n<tr>");
    for header in headers {
        let _ = write!(out, "<th>{}</th>", escape(header));
    }
    out.push_str("</tr>\n");
    if rows.is_empty() {
        let _ = writeln!(
            out,
            "<tr><td colspan=\"{}\">{NO_DATA}</td></tr>",
            headers.len().max(1)
        );
    }
    for row in rows {
        out.push_str("<tr>");
        for cell in row {
            let _ = write!(out, "<td>{}</td>", escape(cell));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</table>\n");
}

/// Escape text for element content and quoted attributes.
pub(crate) fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("P/E <5> & \"cheap\""), "P/E &lt;5&gt; &amp; &quot;cheap&quot;");
    }

    #[test]
    fn test_render_document() {
        let mut doc = Document::default();
        doc.heading(1, "Daily <Report>");
        doc.table(vec!["Code".to_string()], Vec::new());
        doc.rule();

        let html = render("Daily", &doc);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h1>Daily &lt;Report&gt;</h1>"));
        assert!(html.contains("<td colspan=\"1\">No data</td>"));
        assert!(html.contains("<hr>"));
        assert!(html.trim_end().ends_with("</html>"));
    }
}
