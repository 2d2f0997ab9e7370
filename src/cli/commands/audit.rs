use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::audit::{AuditEntry, load_audit};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::strip_ansi;
use ansi_term::Colour;

/// Widest visible operation+target column.
const OP_MAX: usize = 60;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if matches!(cmd, Commands::Audit { print: true }) {
        let pool = DbPool::open(cfg.database_path())?;
        let entries = pool.with_conn(|conn| load_audit(conn))?;
        print_audit(&entries);
    }

    Ok(())
}

/// ANSI color of an audit operation
fn color_for_operation(op: &str) -> Colour {
    match op {
        "capture" => Colour::Green,
        "commit_failed" => Colour::Red,
        "export" => Colour::Cyan,
        "migration_applied" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

/// Operation colored, target plain, cut to `OP_MAX` visible chars.
fn render_op_target(entry: &AuditEntry) -> String {
    let color = color_for_operation(&entry.operation);

    let plain = if entry.target.is_empty() {
        entry.operation.clone()
    } else {
        format!("{} ({})", entry.operation, entry.target)
    };

    let visible = if plain.chars().count() > OP_MAX {
        let mut s: String = plain.chars().take(OP_MAX - 3).collect();
        s.push_str("...");
        s
    } else {
        plain
    };

    match visible.split_once(' ') {
        Some((op, rest)) => format!("{} {}", color.paint(op), rest),
        None => color.paint(visible.as_str()).to_string(),
    }
}

fn print_audit(entries: &[AuditEntry]) {
    if entries.is_empty() {
        println!("📜 Internal log is empty.");
        return;
    }

    let dates: Vec<String> = entries
        .iter()
        .map(|e| {
            chrono::DateTime::parse_from_rfc3339(&e.date)
                .map(|dt| dt.format("%FT%T%:z").to_string())
                .unwrap_or_else(|_| e.date.clone())
        })
        .collect();
    let labels: Vec<String> = entries.iter().map(render_op_target).collect();

    let id_w = entries
        .iter()
        .map(|e| e.id.to_string().len())
        .max()
        .unwrap_or(1);
    let date_w = dates.iter().map(|d| d.len()).max().unwrap_or(10);
    let op_w = labels
        .iter()
        .map(|l| strip_ansi(l).chars().count())
        .max()
        .unwrap_or(10);

    println!("📜 Internal log:\n");

    for ((entry, date), label) in entries.iter().zip(&dates).zip(&labels) {
        let padding = " ".repeat(op_w.saturating_sub(strip_ansi(label).chars().count()));
        println!(
            "{:>id_w$}: {:<date_w$} | {}{} => {}",
            entry.id,
            date,
            label,
            padding,
            entry.message,
            id_w = id_w,
            date_w = date_w
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(operation: &str, target: &str) -> AuditEntry {
        AuditEntry {
            id: 1,
            date: String::new(),
            operation: operation.into(),
            target: target.into(),
            message: String::new(),
        }
    }

    #[test]
    fn long_targets_are_truncated() {
        let label = render_op_target(&entry("export", &"x".repeat(200)));
        let visible = strip_ansi(&label);
        assert_eq!(visible.chars().count(), OP_MAX);
        assert!(visible.starts_with("export ("));
        assert!(visible.ends_with("..."));
    }

    #[test]
    fn bare_operation_without_target() {
        assert_eq!(strip_ansi(&render_op_target(&entry("init", ""))), "init");
    }
}
