//! Command-line surface for the table editor

use crate::config::{clamp_row_limit, DashboardConfig};
use anyhow::{anyhow, bail, Result};
use cricket_rust_core::db::tables::{coerce_input, filter_tables, CellValue, ColumnMeta, TableEditor};
use serde_json::{Map, Value};

pub const USAGE: &str = "\
usage: live_dashboard [command]

  (none) | live              poll live matches until Ctrl-C
  once                       render live matches once and exit
  tables [search]            list tables, optionally filtered
  columns <table>            describe a table's columns
  rows <table> [limit] [--columns a,b]
                             print rows as JSON, optionally only some columns
  upsert <table> col=val...  update by primary key, or insert
  insert <table> col=val...  insert a new row
  delete <table> pk=val...   delete the row with this primary key";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Live,
    Once,
    Tables { search: String },
    Columns { table: String },
    Rows { table: String, limit: Option<i64>, columns: Vec<String> },
    Upsert { table: String, assignments: Vec<(String, String)> },
    Insert { table: String, assignments: Vec<(String, String)> },
    Delete { table: String, assignments: Vec<(String, String)> },
}

pub fn parse_command(args: &[String]) -> Result<Command> {
    let Some((name, rest)) = args.split_first() else {
        return Ok(Command::Live);
    };

    let table = || -> Result<String> {
        rest.first()
            .cloned()
            .ok_or_else(|| anyhow!("`{}` needs a table name\n{}", name, USAGE))
    };
    let assignments = || -> Result<Vec<(String, String)>> {
        rest.iter().skip(1).map(|a| parse_assignment(a)).collect()
    };

    match name.as_str() {
        "live" => Ok(Command::Live),
        "once" => Ok(Command::Once),
        "tables" => Ok(Command::Tables {
            search: rest.join(" "),
        }),
        "columns" => Ok(Command::Columns { table: table()? }),
        "rows" => {
            let table = table()?;
            let mut limit = None;
            let mut columns = Vec::new();
            let mut options = rest.iter().skip(1);
            while let Some(arg) = options.next() {
                if arg == "--columns" {
                    let list = options
                        .next()
                        .ok_or_else(|| anyhow!("`--columns` needs a column list"))?;
                    columns = parse_column_list(list);
                } else if let Some(list) = arg.strip_prefix("--columns=") {
                    columns = parse_column_list(list);
                } else {
                    limit = Some(
                        arg.parse::<i64>()
                            .map_err(|_| anyhow!("Invalid row limit: {}", arg))?,
                    );
                }
            }
            Ok(Command::Rows { table, limit, columns })
        }
        "upsert" => Ok(Command::Upsert {
            table: table()?,
            assignments: assignments()?,
        }),
        "insert" => Ok(Command::Insert {
            table: table()?,
            assignments: assignments()?,
        }),
        "delete" => Ok(Command::Delete {
            table: table()?,
            assignments: assignments()?,
        }),
        other => bail!("Unknown command: {}\n{}", other, USAGE),
    }
}

/// Split `column=value`; the value may be empty (NULL) or contain `=`
pub fn parse_assignment(raw: &str) -> Result<(String, String)> {
    let (column, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected column=value, got: {}", raw))?;
    let column = column.trim();
    if column.is_empty() {
        bail!("Missing column name in: {}", raw);
    }
    Ok((column.to_string(), value.to_string()))
}

fn parse_column_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

/// Keep only `columns` of a row object, in the given order. An empty
/// selection keeps the whole row.
pub fn project_row(row: &Value, columns: &[String]) -> Value {
    if columns.is_empty() {
        return row.clone();
    }
    let projected: Map<String, Value> = columns
        .iter()
        .map(|c| (c.clone(), row.get(c).cloned().unwrap_or(Value::Null)))
        .collect();
    Value::Object(projected)
}

/// Coerce assignments using the table's column types
pub fn build_row(
    assignments: &[(String, String)],
    columns: &[ColumnMeta],
) -> Result<Vec<(String, CellValue)>> {
    assignments
        .iter()
        .map(|(column, raw)| -> Result<(String, CellValue)> {
            let meta = columns
                .iter()
                .find(|c| &c.name == column)
                .ok_or_else(|| anyhow!("Unknown column: {}", column))?;
            Ok((column.clone(), coerce_input(&meta.data_type, raw)))
        })
        .collect()
}

/// Key values in primary-key order; every key column must be given
pub fn key_values(row: &[(String, CellValue)], pk_cols: &[String]) -> Result<Vec<CellValue>> {
    pk_cols
        .iter()
        .map(|pk| {
            row.iter()
                .find(|(c, _)| c == pk)
                .map(|(_, v)| v.clone())
                .ok_or_else(|| anyhow!("Missing primary key column: {}", pk))
        })
        .collect()
}

pub async fn run(editor: &TableEditor, command: Command, config: &DashboardConfig) -> Result<()> {
    match command {
        Command::Live | Command::Once => bail!("Not a table editor command"),
        Command::Tables { search } => {
            let tables = editor.list_tables().await?;
            let shown = filter_tables(&tables, &search);
            if shown.is_empty() {
                println!("No tables found in schema {}", editor.schema());
            }
            for table in shown {
                println!("{}", table);
            }
        }
        Command::Columns { table } => {
            let columns = editor.table_columns(&table).await?;
            let pk_cols = editor.primary_key_columns(&table).await?;
            println!("Table: {}", table);
            for c in columns {
                let key = if pk_cols.contains(&c.name) { " (pk)" } else { "" };
                println!(
                    "- {}{} - {} - nullable: {}",
                    c.name, key, c.data_type, c.is_nullable
                );
            }
        }
        Command::Rows { table, limit, columns } => {
            if !columns.is_empty() {
                let known = editor.table_columns(&table).await?;
                if let Some(unknown) = columns.iter().find(|c| !known.iter().any(|k| &k.name == *c)) {
                    bail!("Unknown column: {}", unknown);
                }
            }
            let limit = limit.map(clamp_row_limit).unwrap_or(config.row_limit);
            let rows = editor.fetch_rows(&table, limit).await?;
            if rows.is_empty() {
                println!("No rows found.");
            }
            for row in rows {
                println!("{}", project_row(&row, &columns));
            }
        }
        Command::Upsert { table, assignments } => {
            let columns = editor.table_columns(&table).await?;
            let pk_cols = editor.primary_key_columns(&table).await?;
            let row = build_row(&assignments, &columns)?;
            let affected = editor.upsert_row(&table, &row, &pk_cols).await?;
            println!("Saved ({} row(s) affected)", affected);
        }
        Command::Insert { table, assignments } => {
            let columns = editor.table_columns(&table).await?;
            let row = build_row(&assignments, &columns)?;
            let affected = editor.insert_row(&table, &row).await?;
            println!("Inserted ({} row(s) affected)", affected);
        }
        Command::Delete { table, assignments } => {
            let columns = editor.table_columns(&table).await?;
            let pk_cols = editor.primary_key_columns(&table).await?;
            if pk_cols.is_empty() {
                bail!("Cannot delete: table {} has no primary key", table);
            }
            let row = build_row(&assignments, &columns)?;
            let pk_vals = key_values(&row, &pk_cols)?;
            let affected = editor.delete_row(&table, &pk_cols, &pk_vals).await?;
            println!("Deleted ({} row(s) affected)", affected);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn column(name: &str, data_type: &str) -> ColumnMeta {
        ColumnMeta {
            name: name.to_string(),
            data_type: data_type.to_string(),
            is_nullable: "NO".to_string(),
            udt_schema: "pg_catalog".to_string(),
            udt_name: data_type.to_string(),
        }
    }

    #[test]
    fn test_parse_default_and_modes() {
        assert_eq!(parse_command(&[]).unwrap(), Command::Live);
        assert_eq!(parse_command(&args(&["once"])).unwrap(), Command::Once);
        assert_eq!(
            parse_command(&args(&["tables", "stats"])).unwrap(),
            Command::Tables { search: "stats".to_string() }
        );
    }

    #[test]
    fn test_parse_rows() {
        assert_eq!(
            parse_command(&args(&["rows", "players", "25"])).unwrap(),
            Command::Rows { table: "players".to_string(), limit: Some(25), columns: vec![] }
        );
        assert_eq!(
            parse_command(&args(&["rows", "players", "--columns", "name, role", "10"])).unwrap(),
            Command::Rows {
                table: "players".to_string(),
                limit: Some(10),
                columns: vec!["name".to_string(), "role".to_string()],
            }
        );
        assert_eq!(
            parse_command(&args(&["rows", "players", "--columns=name"])).unwrap(),
            Command::Rows { table: "players".to_string(), limit: None, columns: vec!["name".to_string()] }
        );
        assert!(parse_command(&args(&["rows", "players", "--columns"])).is_err());
        assert!(parse_command(&args(&["rows", "players", "many"])).is_err());
        assert!(parse_command(&args(&["rows"])).is_err());
    }

    #[test]
    fn test_parse_upsert() {
        let cmd = parse_command(&args(&["upsert", "players", "player_id=18", "name=Virat Kohli", "nickname="]))
            .unwrap();
        assert_eq!(
            cmd,
            Command::Upsert {
                table: "players".to_string(),
                assignments: vec![
                    ("player_id".to_string(), "18".to_string()),
                    ("name".to_string(), "Virat Kohli".to_string()),
                    ("nickname".to_string(), String::new()),
                ],
            }
        );
        assert!(parse_command(&args(&["upsert", "players", "oops"])).is_err());
        assert!(parse_command(&args(&["drop", "players"])).is_err());
    }

    #[test]
    fn test_project_row() {
        let row = json!({"player_id": 18, "name": "Virat Kohli", "role": "Batter"});
        let picked = project_row(&row, &["role".to_string(), "name".to_string(), "age".to_string()]);
        assert_eq!(picked, json!({"role": "Batter", "name": "Virat Kohli", "age": null}));
        let keys: Vec<&String> = picked.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["role", "name", "age"]);
        assert_eq!(project_row(&row, &[]), row);
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("note=a=b").unwrap(),
            ("note".to_string(), "a=b".to_string())
        );
        assert!(parse_assignment("=5").is_err());
    }

    #[test]
    fn test_build_row_coerces_by_type() {
        let columns = vec![column("player_id", "integer"), column("name", "text"), column("active", "boolean")];
        let assignments = vec![
            ("player_id".to_string(), "18".to_string()),
            ("name".to_string(), String::new()),
            ("active".to_string(), "yes".to_string()),
        ];
        let row = build_row(&assignments, &columns).unwrap();
        assert_eq!(row[0].1, CellValue::Int(18));
        assert_eq!(row[1].1, CellValue::Null);
        assert_eq!(row[2].1, CellValue::Bool(true));

        let unknown = vec![("age".to_string(), "30".to_string())];
        assert!(build_row(&unknown, &columns).is_err());
    }

    #[test]
    fn test_key_values_in_key_order() {
        let row = vec![
            ("innings".to_string(), CellValue::Int(2)),
            ("match_id".to_string(), CellValue::Int(9)),
        ];
        let pk = vec!["match_id".to_string(), "innings".to_string()];
        assert_eq!(
            key_values(&row, &pk).unwrap(),
            vec![CellValue::Int(9), CellValue::Int(2)]
        );
        assert!(key_values(&row[..1], &pk).is_err());
    }
}
