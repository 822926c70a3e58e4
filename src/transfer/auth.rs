use std::fmt;

use log::debug;
use ssh2::{KeyboardInteractivePrompt, Prompt};

/// An authentication method offered to the remote host.
///
/// Methods are tried in the order they appear in the list returned by
/// [`auth_methods`]; the first one the server accepts wins.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthMethod {
    /// Keyboard-interactive; every prompt is answered with the secret
    KeyboardInteractive(String),
    /// Plain password authentication
    Password(String),
}

impl AuthMethod {
    /// Method name as the SSH protocol spells it
    pub fn name(&self) -> &'static str {
        match self {
            AuthMethod::KeyboardInteractive(_) => "keyboard-interactive",
            AuthMethod::Password(_) => "password",
        }
    }
}

impl fmt::Debug for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthMethod({})", self.name())
    }
}

/// Build the fixed list of methods for `secret`: interactive first, then
/// plain password. A single secret is offered; this is not a guessing loop.
pub fn auth_methods(secret: &str) -> Vec<AuthMethod> {
    vec![
        AuthMethod::KeyboardInteractive(secret.to_string()),
        AuthMethod::Password(secret.to_string()),
    ]
}

/// Answers keyboard-interactive challenges with a stored secret.
pub struct SecretResponder<'a> {
    secret: &'a str,
}

impl<'a> SecretResponder<'a> {
    pub fn new(secret: &'a str) -> Self {
        Self { secret }
    }

    pub fn answers(&self, prompt_count: usize) -> Vec<String> {
        vec![self.secret.to_string(); prompt_count]
    }
}

impl KeyboardInteractivePrompt for SecretResponder<'_> {
    fn prompt<'b>(
        &mut self,
        username: &str,
        instructions: &str,
        prompts: &[Prompt<'b>],
    ) -> Vec<String> {
        debug!(
            "Keyboard-interactive challenge for {} ({} prompts): {}",
            username,
            prompts.len(),
            instructions
        );
        self.answers(prompts.len())
    }
}
