use crate::cli::commands::InitArgs;
use crate::io::journal_io::{self, JOURNAL_DIR};

use super::Context;

/// Infer a journal name from a directory name: separators become spaces,
/// words are title-cased.
fn infer_name(dir_name: &str) -> String {
    dir_name
        .split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => {
                    let upper: String = c.to_uppercase().collect();
                    upper + chars.as_str()
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn cmd_init(args: InitArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    ctx.init_default_logging()?;
    let root = ctx.start_dir()?;

    // Nested journals work, but are usually a mistake
    if let Some(parent) = root.parent()
        && let Ok(parent_root) = journal_io::discover_journal(parent)
    {
        eprintln!(
            "note: enclosing journal found at {}/",
            parent_root.join(JOURNAL_DIR).display()
        );
        eprintln!("creating a new journal in ./{}/", JOURNAL_DIR);
    }

    let name = args.name.unwrap_or_else(|| {
        root.file_name()
            .and_then(|n| n.to_str())
            .map(infer_name)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Journal".to_string())
    });

    let journal = journal_io::init_journal(&root, &name)?;

    if ctx.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "name": name,
                "path": journal.journal_dir.display().to_string(),
            }))?
        );
    } else {
        println!("Initialized journal: {}", name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_name() {
        assert_eq!(infer_name("work-log"), "Work Log");
        assert_eq!(infer_name("team_notes"), "Team Notes");
        assert_eq!(infer_name("journal"), "Journal");
        assert_eq!(infer_name("--"), "");
    }
}
