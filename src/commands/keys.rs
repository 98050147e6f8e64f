use super::session::Session;
use crate::cli::KeysAction;
use crate::config::AppConfig;
use crate::error::{CodelensError, Result};
use crate::llm::provider::catalog::{self, ProviderId};
use crate::llm::provider::utils::mask_api_key;
use crate::ui;
use crate::vault::{CredentialMap, CredentialVault};

pub fn run(action: &KeysAction, config: &AppConfig) -> Result<()> {
    let colored = config.ui.colored;
    let mut session = Session::load(config)?;

    match action {
        KeysAction::Set { slot, value } => {
            let vault = CredentialVault::from_config(&config.vault)?;
            let slot = resolve_slot(slot)?;
            if value.trim().is_empty() {
                return Err(CodelensError::InvalidInput(format!(
                    "empty value for {}",
                    slot
                )));
            }

            let mut updates = CredentialMap::new();
            updates.insert(slot.to_string(), value.clone());
            session.record.store_credentials(&vault, &updates)?;
            session.save()?;
            ui::success(&format!("Stored {}", slot), colored);
        }
        KeysAction::List => {
            println!(
                "Selected: {} / {}",
                session.record.provider, session.record.model
            );
            if let Some(path) = session.path() {
                println!("{}", ui::info(&format!("Session file: {}", path.display()), colored));
            }

            let stored = match CredentialVault::from_config(&config.vault) {
                Ok(vault) => session.record.credentials(&vault),
                Err(e) => {
                    ui::warning(&e.to_string(), colored);
                    CredentialMap::new()
                }
            };
            for descriptor in catalog::list() {
                let value = stored
                    .get(descriptor.credential_slot)
                    .map(|secret| mask_api_key(secret))
                    .unwrap_or_else(|| "-".to_string());
                println!("  {:<22} {}", descriptor.credential_slot, value);
            }
        }
        KeysAction::Select { provider, model } => {
            session.record.select(provider, model.as_deref())?;
            session.save()?;
            ui::success(
                &format!(
                    "Selected {} / {}",
                    session.record.provider, session.record.model
                ),
                colored,
            );
        }
    }
    Ok(())
}

/// Slot name for `input`, which may be a slot or a provider id.
fn resolve_slot(input: &str) -> Result<&'static str> {
    let input = input.trim();
    if let Ok(id) = input.parse::<ProviderId>() {
        return Ok(id.descriptor().credential_slot);
    }
    catalog::list()
        .iter()
        .map(|d| d.credential_slot)
        .find(|slot| slot.eq_ignore_ascii_case(input))
        .ok_or_else(|| {
            CodelensError::InvalidInput(format!(
                "unknown credential slot '{}'; run 'codelens providers' for the list",
                input
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_slot() {
        assert_eq!(resolve_slot("openai").unwrap(), "OPENAI_API_KEY");
        assert_eq!(resolve_slot("huggingface_api_key").unwrap(), "HUGGINGFACE_API_KEY");
        assert!(resolve_slot("AWS_SECRET").is_err());
    }
}
