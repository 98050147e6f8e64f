use crate::cli::VaultAction;
use crate::config::VAULT_KEY_ENV;
use crate::error::Result;
use crate::ui;
use crate::vault::CredentialVault;

pub fn run(action: &VaultAction, colored: bool) -> Result<()> {
    match action {
        VaultAction::Keygen => {
            println!("{}", CredentialVault::generate_key());
            eprintln!(
                "{}",
                ui::info(
                    &format!("Put it under [vault] key or export {}", VAULT_KEY_ENV),
                    colored
                )
            );
        }
    }
    Ok(())
}
