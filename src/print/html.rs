//! # HTML Serialization
//!
//! Converts a [`PrintDocument`] into one self-contained HTML page. Each
//! print page is a canvas-sized block followed by a page break; every
//! component is absolutely positioned inside it.

use std::fmt::Write;

use super::node::{Cell, GridNode, Node, PrintDocument, Row, TableNode, TextNode, TextStyle};

const CELL_BORDER: &str = "border: 1px solid #ddd";

const STYLESHEET: &str = "\
body { margin: 0; padding: 20px; font-family: Arial, sans-serif; }
.print-canvas { position: relative; border: 1px solid #ccc; background: white; margin: 0 auto; page-break-after: always; }
.print-component { position: absolute; word-wrap: break-word; overflow-wrap: break-word; }
.print-placeholder { border: 1px solid #333; background: #f9f9f9; display: flex; align-items: center; justify-content: center; border-radius: 4px; }
.print-table { position: absolute; background: #fff; border-radius: 4px; overflow: visible; }
.print-table table { width: 100%; height: 100%; border-collapse: collapse; table-layout: fixed; }
@media print {
  body { margin: 0; padding: 0; }
  .print-canvas { border: none; }
  .print-placeholder { border: none; }
}
";

impl PrintDocument {
    /// Serialize the document as a complete HTML page.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        out.push_str("<title>Canvas print</title>\n<style>\n");
        out.push_str(STYLESHEET);
        out.push_str("</style>\n</head>\n<body>\n");

        for page in &self.pages {
            let _ = write!(
                out,
                "<div class=\"print-canvas\" style=\"width: {}px; height: {}px;\"",
                self.width, self.height
            );
            if let Some(id) = &page.record_id {
                let _ = write!(out, " data-record=\"{}\"", escape(id));
            }
            out.push_str(">\n");
            for node in &page.nodes {
                match node {
                    Node::Text(n) => text_node(&mut out, n),
                    Node::Table(n) => table_node(&mut out, n),
                    Node::Grid(n) => grid_node(&mut out, n),
                }
            }
            out.push_str("</div>\n");
        }

        out.push_str("</body>\n</html>\n");
        out
    }
}

/// Escape text for use in element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn font_css(style: &TextStyle) -> String {
    format!(
        "font-size: {}px; color: {}; font-weight: {};",
        style.font_size,
        escape(&style.color),
        style.font_weight.as_css()
    )
}

fn position_css(frame: &crate::geometry::Rect, height: f64) -> String {
    format!(
        "left: {}px; top: {}px; width: {}px; height: {}px;",
        frame.x, frame.y, frame.width, height
    )
}

fn text_node(out: &mut String, n: &TextNode) {
    let class = if n.placeholder {
        "print-component print-placeholder"
    } else {
        "print-component"
    };
    let _ = writeln!(
        out,
        "<div class=\"{class}\" style=\"{} {} text-align: {}; line-height: {};\">{}</div>",
        position_css(&n.frame, n.frame.height),
        font_css(&n.style),
        n.style.text_align.as_css(),
        n.style.line_height,
        escape(&n.text)
    );
}

fn table_node(out: &mut String, n: &TableNode) {
    let _ = writeln!(
        out,
        "<div class=\"print-table\" style=\"{}\">",
        position_css(&n.frame, n.frame.height)
    );
    let _ = writeln!(out, "<table style=\"{}\">", font_css(&n.style));

    let cell_css = format!(
        "{CELL_BORDER}; padding: 4px 8px; font-size: {}px; line-height: {};",
        n.cell_font_size, n.cell_line_height
    );

    let _ = writeln!(
        out,
        "<thead><tr style=\"background-color: {}; height: {};\">",
        escape(&n.header_background),
        n.header.height
    );
    for cell in &n.header.cells {
        let _ = writeln!(
            out,
            "<th style=\"width: {}; {cell_css} text-align: {}; vertical-align: middle; \
             background-color: {}; font-weight: {};\" title=\"{}\">{}</th>",
            cell.width,
            cell.align.as_css(),
            escape(&n.header_background),
            n.header_font_weight.as_css(),
            escape(&cell.text),
            escape(&cell.text)
        );
    }
    out.push_str("</tr></thead>\n<tbody>\n");

    for row in &n.rows {
        let _ = write!(out, "<tr style=\"height: {};\">", row.height);
        for cell in &row.cells {
            let _ = write!(
                out,
                "<td style=\"width: {}; {cell_css} text-align: {}; vertical-align: top; \
                 background-color: #fff;\" title=\"{}\">{}</td>",
                cell.width,
                cell.align.as_css(),
                escape(&cell.text),
                escape(&cell.text)
            );
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n</div>\n");
}

fn grid_node(out: &mut String, n: &GridNode) {
    let _ = writeln!(
        out,
        "<div class=\"print-table\" style=\"{}\">",
        position_css(&n.frame, n.frame.height)
    );
    let _ = writeln!(out, "<table style=\"{}\">\n<tbody>", font_css(&n.style));
    for Row { height, cells } in &n.rows {
        let _ = write!(out, "<tr style=\"height: {height};\">");
        for cell in cells {
            grid_cell(out, cell, &n.style);
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n</div>\n");
}

fn grid_cell(out: &mut String, cell: &Cell, style: &TextStyle) {
    out.push_str("<td");
    if cell.colspan > 1 {
        let _ = write!(out, " colspan=\"{}\"", cell.colspan);
    }
    if cell.rowspan > 1 {
        let _ = write!(out, " rowspan=\"{}\"", cell.rowspan);
    }
    let _ = write!(
        out,
        " style=\"width: {}; {CELL_BORDER}; padding: 8px; text-align: {}; vertical-align: middle; \
         background-color: #fff; font-size: {}px; line-height: {};\">{}</td>",
        cell.width,
        cell.align.as_css(),
        style.font_size,
        style.line_height,
        escape(&cell.text)
    );
}
