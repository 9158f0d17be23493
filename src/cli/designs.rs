//! Design discovery commands (`badgepress designs ...`).

use anyhow::Result;
use badgepress::{DesignInfo, DesignRegistry};
use clap::{Args, Subcommand};

/// Design subcommands.
#[derive(Subcommand, Debug)]
pub enum DesignCommand {
    /// List all built-in designs.
    List,
    /// Show the configuration keys a design reads.
    Show(DesignShowArgs),
}

/// Arguments for `badgepress designs show`.
#[derive(Args, Debug)]
pub struct DesignShowArgs {
    /// Design name to display.
    pub name: String,
}

/// Execute a design command.
pub fn handle(command: DesignCommand) -> Result<()> {
    match command {
        DesignCommand::List => {
            println!("Available designs:");
            for info in DesignRegistry::list() {
                println!("  - {}: {}", info.name, info.description);
            }
            Ok(())
        }
        DesignCommand::Show(args) => {
            let info = DesignRegistry::get(&args.name)?;
            print!("{}", describe(info));
            Ok(())
        }
    }
}

/// Config file walkthrough for one design: page-wide keys first, then the
/// design's own.
fn describe(info: &DesignInfo) -> String {
    let mut out = format!("Design: {}\n{}\n\nConfig keys:\n", info.name, info.description);
    out.push_str(&format!("  {:<24} {:<8} {}\n", "design", "required", info.name));
    out.push_str(&format!("  {:<24} {:<8} {}\n", "page_margin", "optional", "mm, default 10"));
    out.push_str(&format!("  {:<24} {:<8} {}\n", "waste", "optional", "bleed in mm, default 0"));
    if info.settings.is_empty() {
        out.push_str("  (no design-specific keys)\n");
    }
    for setting in info.settings {
        let need = if setting.required { "required" } else { "optional" };
        out.push_str(&format!("  {:<24} {:<8} {}\n", setting.key, need, setting.help));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_lists_its_field_keys() {
        let text = describe(DesignRegistry::get("fields").unwrap());
        assert!(text.starts_with("Design: fields\n"));
        for key in ["fields[].key", "fields[].font", "fields[].max_width", "fonts.<name>.path"] {
            assert!(text.contains(key), "missing {key} in:\n{text}");
        }
        assert!(text.contains(&format!("{:<24} optional", "fields[].uppercase")));
    }

    #[test]
    fn blank_has_only_page_keys() {
        let text = describe(DesignRegistry::get("blank").unwrap());
        assert!(text.contains("page_margin"));
        assert!(text.contains("(no design-specific keys)"));
        assert!(!text.contains("fields[]"));
    }
}
