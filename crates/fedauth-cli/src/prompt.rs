use fedauth_saml::{RolePrompt, RoleSelectionError};
use inquire::Text;

/// Asks for a role on the terminal.
#[derive(Debug, Default)]
pub struct TerminalRolePrompt;

impl RolePrompt for TerminalRolePrompt {
    fn ask(&mut self, listing: &[String]) -> Result<String, RoleSelectionError> {
        for line in listing {
            eprintln!("{line}");
        }

        Text::new("Select a role from above:")
            .prompt()
            .map_err(|e| RoleSelectionError::Prompt(e.to_string()))
    }

    fn rejected(&mut self, response: &str) {
        eprintln!("`{}` is not one of the listed roles", response.trim());
    }
}
