use std::collections::HashMap;

use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use license_resolver::models::DetectionMethod;

use super::{Entry, Outcome};

/// Render a colored terminal report.
pub fn render(entries: &[Entry], verbose: bool, quiet: bool) {
    let total = entries.len();
    let resolved_count = entries
        .iter()
        .filter(|e| matches!(e.outcome, Outcome::Resolved(_)))
        .count();
    let unresolved_count = entries
        .iter()
        .filter(|e| matches!(e.outcome, Outcome::Unresolved))
        .count();
    let failed_count = entries.iter().filter(|e| e.is_failed()).count();

    if quiet {
        println!(
            "Total: {}  Resolved: {}  Unresolved: {}  Failed: {}",
            total,
            resolved_count.to_string().green(),
            unresolved_count.to_string().yellow(),
            failed_count.to_string().red(),
        );
        return;
    }

    println!(
        "\n {} v{}\n",
        "license-resolver".bold(),
        env!("CARGO_PKG_VERSION")
    );

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(" │  {:<48} │", format!("Total        : {}", total));
    println!(
        " │  {:<48} │",
        format!(
            "{}  Resolved   : {:>4}  {}",
            "✓".green(),
            resolved_count,
            summarize_licenses(entries)
        )
    );
    println!(
        " │  {:<48} │",
        format!("{}  Unresolved : {:>4}", "⚠".yellow(), unresolved_count)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Failed     : {:>4}", "✗".red(), failed_count)
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    if failed_count > 0 {
        println!(" {} Resolution failures:\n", "[ERROR]".red().bold());
        render_failures(entries);
        println!();
    }

    if unresolved_count > 0 {
        println!(" {} No license found:\n", "[WARN]".yellow().bold());
        for entry in entries
            .iter()
            .filter(|e| matches!(e.outcome, Outcome::Unresolved))
        {
            println!("   {}", entry.subject);
        }
        println!();
    }

    if resolved_count > 0 {
        println!(" {} Resolved licenses:\n", "[OK]".green().bold());
        render_resolved(entries, verbose);
        println!();
    }
}

fn header(titles: &[&str]) -> Vec<Cell> {
    titles
        .iter()
        .map(|t| Cell::new(t).add_attribute(Attribute::Bold))
        .collect()
}

fn render_resolved(entries: &[Entry], verbose: bool) {
    let mut titles = vec!["Package", "Licenses", "Strategy", "Method"];
    if verbose {
        titles.extend(["Origin", "Confidence"]);
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header(&titles));

    for entry in entries {
        let Outcome::Resolved(resolution) = &entry.outcome else {
            continue;
        };

        let method_color = match resolution.method {
            DetectionMethod::Pattern => Color::Green,
            DetectionMethod::Alias => Color::Cyan,
            DetectionMethod::Classifier => Color::Yellow,
        };

        let mut row = vec![
            Cell::new(&entry.subject),
            Cell::new(resolution.licenses.to_string()),
            Cell::new(resolution.strategy.to_string()),
            Cell::new(resolution.method.to_string()).fg(method_color),
        ];
        if verbose {
            let confidence = resolution
                .confidence
                .map(|c| format!("{:.2}", c))
                .unwrap_or_else(|| "-".to_string());
            row.push(Cell::new(&resolution.origin));
            row.push(Cell::new(confidence).set_alignment(CellAlignment::Right));
        }
        table.add_row(row);
    }

    println!("{}", table);
}

fn render_failures(entries: &[Entry]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header(&["Package", "Error"]));

    for entry in entries {
        if let Outcome::Failed { error } = &entry.outcome {
            table.add_row(vec![
                Cell::new(&entry.subject),
                Cell::new(error).fg(Color::Red),
            ]);
        }
    }

    println!("{}", table);
}

/// The three most common licenses among resolved entries, e.g. `[MIT (4), ISC (2)]`.
fn summarize_licenses(entries: &[Entry]) -> String {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for entry in entries {
        if let Outcome::Resolved(resolution) = &entry.outcome {
            for license in resolution.licenses.iter() {
                *counts.entry(license).or_insert(0) += 1;
            }
        }
    }

    let mut pairs: Vec<(&str, usize)> = counts.into_iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    let summary: Vec<String> = pairs
        .iter()
        .take(3)
        .map(|(lic, cnt)| format!("{} ({})", lic, cnt))
        .collect();

    if summary.is_empty() {
        String::new()
    } else {
        format!("[{}]", summary.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use license_resolver::resolver::{Resolution, Strategy};

    fn resolved(subject: &str, licenses: &[&str]) -> Entry {
        Entry::new(
            subject,
            Outcome::Resolved(Resolution {
                licenses: licenses.iter().copied().collect(),
                strategy: Strategy::Registry,
                method: DetectionMethod::Pattern,
                origin: "license".into(),
                confidence: None,
            }),
        )
    }

    #[test]
    fn test_summarize_licenses() {
        let entries = vec![
            resolved("a", &["MIT"]),
            resolved("b", &["MIT", "GPL"]),
            resolved("c", &["ISC"]),
            resolved("d", &["BSD"]),
            Entry::new("e", Outcome::Unresolved),
        ];
        assert_eq!(summarize_licenses(&entries), "[MIT (2), BSD (1), GPL (1)]");
    }

    #[test]
    fn test_summarize_nothing_resolved() {
        let entries = vec![Entry::new("e", Outcome::Unresolved)];
        assert_eq!(summarize_licenses(&entries), "");
    }
}
