//! HTML-like table labels.
//!
//! A table label renders as
//!
//! ```text
//! <<table border="0" cellborder="1" cellspacing="0">
//!     <tr><td bgcolor="SandyBrown" style="rounded"><b><i>classes</i></b></td></tr>
//!     <tr><td port="A" align="left">A</td></tr>
//! </table>>
//! ```
//!
//! so edges can address a single row as `"classes":"A"`.

use std::fmt::Write;

use reflgraph_core::{GridLabel, TableLabel};

const TABLE_OPEN: &str = "<<table border=\"0\" cellborder=\"1\" cellspacing=\"0\">\n";
const TABLE_CLOSE: &str = "</table>>";

/// Escape text for HTML-like label content and attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn table_label(label: &TableLabel) -> String {
    let mut out = String::from(TABLE_OPEN);
    let _ = writeln!(
        out,
        "\t<tr><td bgcolor=\"{}\" style=\"rounded\"><b><i>{}</i></b></td></tr>",
        escape_html(&label.color),
        escape_html(&label.title)
    );
    for row in &label.rows {
        let row = escape_html(row);
        let _ = writeln!(out, "\t<tr><td port=\"{row}\" align=\"{}\">{row}</td></tr>", label.align);
    }
    out.push_str(TABLE_CLOSE);
    out
}

pub fn grid_label(label: &GridLabel) -> String {
    let color = escape_html(&label.color);
    let mut out = String::from(TABLE_OPEN);

    out.push_str("\t<tr>");
    for cell in &label.header {
        let _ = write!(out, "<td bgcolor=\"{color}\"><b><i>{}</i></b></td>", escape_html(cell));
    }
    out.push_str("</tr>\n");

    for row in &label.rows {
        let _ = write!(out, "\t<tr bgcolor=\"{color}\">");
        for cell in row {
            let _ = write!(out, "<td align=\"{}\">{}</td>", label.align, escape_html(cell));
        }
        out.push_str("</tr>\n");
    }
    out.push_str(TABLE_CLOSE);
    out
}
