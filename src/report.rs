//! LaTeX rendering for the two tabular reports.

use std::fmt::Write;

use crate::db::models::{ItemRecord, SaleRecord};
use crate::grouping::OwnerGroup;

/// Escapes characters with syntactic meaning in LaTeX before interpolation.
pub fn escape_latex(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str(r"\textbackslash{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(ch);
            }
            '~' => out.push_str(r"\textasciitilde{}"),
            '^' => out.push_str(r"\textasciicircum{}"),
            _ => out.push(ch),
        }
    }
    out
}

fn document(column_spec: &str, header: &str, body: &str, caption: &str) -> String {
    format!(
        r"\documentclass{{article}}
\usepackage{{geometry}}
\usepackage{{pdflscape}}
\usepackage[utf8]{{inputenc}}
\geometry{{a4paper, margin=1in}}
\begin{{document}}
\begin{{landscape}}
\begin{{table}}[h]
\centering
\begin{{tabular}}{{{column_spec}}}
\hline
{header} \\
\hline
{body}
\hline
\end{{tabular}}
\caption{{{caption}}}
\end{{table}}
\end{{landscape}}
\end{{document}}
"
    )
}

/// "Items by user" table: one row per assigned item, a "None" row for users
/// holding nothing.
pub fn items_by_user(groups: &[OwnerGroup<ItemRecord>]) -> String {
    let mut body = String::new();
    for group in groups {
        let username = escape_latex(&group.username);
        if group.rows.is_empty() {
            let _ = writeln!(body, r"{username} & None & None \\");
            continue;
        }
        for item in &group.rows {
            let _ = writeln!(
                body,
                r"{username} & {} & {} \\",
                escape_latex(&item.name),
                escape_latex(&item.serial_number),
            );
        }
    }
    document(
        "|l|l|l|",
        r"\textbf{User} & \textbf{Item Name} & \textbf{Serial Number}",
        body.trim_end(),
        "Items by User",
    )
}

/// "Sales by user" table: one row per recorded sale.
pub fn sales_by_user(groups: &[OwnerGroup<SaleRecord>]) -> String {
    let mut body = String::new();
    for group in groups {
        let username = escape_latex(&group.username);
        if group.rows.is_empty() {
            let _ = writeln!(body, r"{username} & None & None & None \\");
            continue;
        }
        for sale in &group.rows {
            let _ = writeln!(
                body,
                r"{username} & {} & {} & {} \\",
                escape_latex(&sale.item_name),
                escape_latex(&sale.buyer_name),
                sale.sale_date,
            );
        }
    }
    document(
        "|l|l|l|l|",
        r"\textbf{User} & \textbf{Item Name} & \textbf{Buyer Name} & \textbf{Sale Date}",
        body.trim_end(),
        "Sales by User",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn item(name: &str, serial: &str) -> ItemRecord {
        ItemRecord {
            id: "i1".into(),
            name: name.into(),
            serial_number: serial.into(),
            description: None,
            price: 10.0,
            assigned_to: Some("u1".into()),
            assigned_to_username: Some("alice".into()),
        }
    }

    #[test]
    fn escapes_the_latex_special_set() {
        assert_eq!(escape_latex("A & B"), r"A \& B");
        assert_eq!(escape_latex("100% #1"), r"100\% \#1");
        assert_eq!(escape_latex("a_b"), r"a\_b");
        assert_eq!(escape_latex(r"C:\temp"), r"C:\textbackslash{}temp");
        assert_eq!(escape_latex("x^2~y"), r"x\textasciicircum{}2\textasciitilde{}y");
        assert_eq!(escape_latex("plain"), "plain");
    }

    #[test]
    fn items_report_has_document_structure() {
        let groups = vec![OwnerGroup {
            user_id: "u1".into(),
            username: "alice".into(),
            rows: vec![item("Drill", "SN1")],
        }];
        let doc = items_by_user(&groups);
        assert!(doc.contains(r"\documentclass"));
        assert!(doc.contains(r"\begin{document}"));
        assert!(doc.contains(r"alice & Drill & SN1 \\"));
    }

    #[test]
    fn ampersands_in_values_are_escaped() {
        let groups = vec![OwnerGroup {
            user_id: "u1".into(),
            username: "a&b".into(),
            rows: vec![item("Nuts & Bolts", "SN 2")],
        }];
        let doc = items_by_user(&groups);
        assert!(doc.contains(r"a\&b & Nuts \& Bolts & SN 2 \\"));
    }

    #[test]
    fn empty_groups_render_placeholder_rows() {
        let groups = vec![OwnerGroup::<SaleRecord> {
            user_id: "u1".into(),
            username: "carol".into(),
            rows: vec![],
        }];
        let doc = sales_by_user(&groups);
        assert!(doc.contains(r"carol & None & None & None \\"));
    }

    #[test]
    fn sales_rows_carry_item_and_buyer() {
        let groups = vec![OwnerGroup {
            user_id: "u1".into(),
            username: "alice".into(),
            rows: vec![SaleRecord {
                id: "s1".into(),
                item_name: "Drill".into(),
                item_serial: "SN1".into(),
                buyer_name: "Bob".into(),
                sale_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                user_id: "u1".into(),
            }],
        }];
        let doc = sales_by_user(&groups);
        assert!(doc.contains(r"alice & Drill & Bob & 2024-01-01 \\"));
    }
}
