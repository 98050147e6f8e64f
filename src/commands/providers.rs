use colored::Colorize;

use super::json;
use crate::error::Result;
use crate::llm::provider::catalog;

/// 列出 catalog 中的所有 provider
pub fn run(as_json: bool, colored: bool) -> Result<()> {
    let descriptors = catalog::list();
    if as_json {
        return json::output_json_success(descriptors);
    }

    for descriptor in descriptors {
        if colored {
            println!(
                "{} {} ({})",
                descriptor.id.as_str().cyan().bold(),
                descriptor.name.bold(),
                descriptor.credential_slot.bright_black()
            );
        } else {
            println!(
                "{} {} ({})",
                descriptor.id, descriptor.name, descriptor.credential_slot
            );
        }

        for (i, model) in descriptor.models.iter().enumerate() {
            let marker = if i == 0 { "*" } else { " " };
            println!("  {} {:<40} {}", marker, model.id, model.label);
        }
        println!();
    }
    println!("{}", crate::ui::info("* default model", colored));
    Ok(())
}
