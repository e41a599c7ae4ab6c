use common::query::ResultSet;
use common::Interaction;
use comfy_table::{Cell, ContentArrangement, Table};
use std::fmt::Write as _;

const TABLE_PRESET: &str = "││──╞═╪╡│    ┬┴┌┐└┘";
const MAX_CELL_CHARS: usize = 48;

pub fn result_table(result: &ResultSet) -> Table {
    let mut table = Table::new();
    table.load_preset(TABLE_PRESET);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(result.column_names().into_iter().map(Cell::new));

    for row in result.rows() {
        table.add_row(row.into_iter().map(|value| Cell::new(truncate(&value.to_string()))));
    }

    table
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_CELL_CHARS {
        return text.to_string();
    }
    let mut out: String = text.chars().take(MAX_CELL_CHARS - 1).collect();
    out.push('…');
    out
}

/// text shown to the user for one interaction
pub fn interaction(interaction: &Interaction) -> String {
    let mut out = String::new();

    if let Some(sql) = interaction.sql() {
        let _ = writeln!(out, "{}\n", sql);
    }

    match interaction {
        Interaction::EmptyQuestion => out.push_str("Please type a question first."),
        Interaction::GenerationFailed { provider, message } => {
            let _ = write!(out, "Error calling {} API: {}", provider, message);
        }
        Interaction::Answered { result, .. } => {
            let _ = write!(
                out,
                "{}\n({} row{})",
                result_table(result),
                result.row_count(),
                if result.row_count() == 1 { "" } else { "s" }
            );
        }
        Interaction::NoRows { .. } => out.push_str("Query ran successfully but returned no rows."),
        Interaction::ExecutionFailed { message, .. } => {
            let _ = write!(out, "Error executing query: {}", message);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::query::Value;

    fn artists() -> ResultSet {
        let mut rs = ResultSet::with_column_names(&["artist_name".to_string()]);
        rs.push_row(vec![Value::Text("Ada".to_string())]);
        rs
    }

    #[test]
    fn test_render_answer_includes_sql_and_rows() {
        let text = interaction(&Interaction::Answered {
            sql: "SELECT name AS artist_name FROM artists".to_string(),
            result: artists(),
        });

        assert!(text.starts_with("SELECT name AS artist_name FROM artists\n"));
        assert!(text.contains("artist_name"));
        assert!(text.contains("Ada"));
        assert!(text.ends_with("(1 row)"));
    }

    #[test]
    fn test_render_distinct_messages() {
        let no_rows = interaction(&Interaction::NoRows {
            sql: "SELECT 1 WHERE 0".to_string(),
            result: ResultSet::default(),
        });
        let failed = interaction(&Interaction::ExecutionFailed {
            sql: "SELEC".to_string(),
            message: "near \"SELEC\": syntax error".to_string(),
        });
        let gen_failed = interaction(&Interaction::GenerationFailed {
            provider: "gemini".to_string(),
            message: "quota".to_string(),
        });

        assert!(no_rows.ends_with("Query ran successfully but returned no rows."));
        assert!(failed.ends_with("Error executing query: near \"SELEC\": syntax error"));
        assert_eq!(gen_failed, "Error calling gemini API: quota");
        assert_eq!(
            interaction(&Interaction::EmptyQuestion),
            "Please type a question first."
        );
    }

    #[test]
    fn test_truncate_long_cells() {
        let long = "x".repeat(100);
        let out = truncate(&long);
        assert_eq!(out.chars().count(), MAX_CELL_CHARS);
        assert!(out.ends_with('…'));
        assert_eq!(truncate("short"), "short");
    }
}
