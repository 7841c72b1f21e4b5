//! The `chartwise keys` command for managing provider API keys.

use super::theme::{chartwise_theme, dim_style, missing_style, ok_style};
use chartwise_core::keys::{mask, validate};
use chartwise_core::{Chartwise, Config, ProviderKind};
use clap::{Args, Subcommand, ValueEnum};
use dialoguer::Password;
use serde::Serialize;

/// Arguments for the `keys` command.
#[derive(Args, Debug)]
pub struct KeysArgs {
    #[command(subcommand)]
    pub command: KeysCommand,
}

/// Provider selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderArg {
    /// Google Gemini (chart analysis)
    Gemini,
    /// Perplexity (news search)
    Perplexity,
}

impl From<ProviderArg> for ProviderKind {
    fn from(value: ProviderArg) -> Self {
        match value {
            ProviderArg::Gemini => ProviderKind::Gemini,
            ProviderArg::Perplexity => ProviderKind::Perplexity,
        }
    }
}

/// Subcommands for key management.
#[derive(Subcommand, Debug)]
pub enum KeysCommand {
    /// Validate and store a key (prompts for hidden input when VALUE is omitted)
    Set {
        #[arg(value_enum)]
        provider: ProviderArg,

        /// The key. Prefer the prompt: arguments end up in shell history.
        value: Option<String>,
    },

    /// Show which keys are configured (masked)
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove the stored key for one provider
    Clear {
        #[arg(value_enum)]
        provider: ProviderArg,
    },

    /// Remove every stored key
    ClearAll,

    /// Show the credentials file path
    Path,
}

/// Execute the keys command.
pub fn execute(args: KeysArgs, config: Config) -> chartwise_core::Result<()> {
    let chartwise = Chartwise::open(config);
    let store = chartwise.keys();

    match args.command {
        KeysCommand::Set { provider, value } => {
            let provider = ProviderKind::from(provider);
            let raw = match value {
                Some(value) => value,
                None => prompt_for_key(provider)?,
            };
            let key = validate(provider, &raw)?;
            store.save(provider, &key)?;
            println!("Saved {} key {}", provider.spec().name, mask(&key));
        }

        KeysCommand::Show { json: true } => {
            let entries: Vec<KeyEntry> = ProviderKind::ALL
                .into_iter()
                .map(|provider| KeyEntry::describe(&chartwise, provider))
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }

        KeysCommand::Show { json: false } => {
            for provider in ProviderKind::ALL {
                let spec = provider.spec();
                let line = match (store.get(provider), chartwise.resolve_key(provider)) {
                    (Some(key), _) => format!("{} (stored)", ok_style().apply_to(mask(&key))),
                    (None, Ok(key)) => format!(
                        "{} (from config or {})",
                        ok_style().apply_to(mask(&key)),
                        spec.env_var
                    ),
                    (None, Err(_)) => format!(
                        "{} {}",
                        missing_style().apply_to("not configured"),
                        dim_style().apply_to(format!("(get one at {})", spec.help_url))
                    ),
                };
                println!("{:<14} {line}", spec.name);
            }
        }

        KeysCommand::Clear { provider } => {
            let provider = ProviderKind::from(provider);
            store.clear(provider)?;
            println!("Cleared {} key", provider.spec().name);
        }

        KeysCommand::ClearAll => {
            store.clear_all()?;
            println!("Cleared all stored keys");
        }

        KeysCommand::Path => {
            let path = chartwise.config().keys_path();
            println!("{}", path.display());
        }
    }

    Ok(())
}

/// Machine-readable view of one provider's key.
#[derive(Serialize)]
struct KeyEntry {
    provider: ProviderKind,
    /// "stored", "config", or "missing"
    source: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    masked: Option<String>,
}

impl KeyEntry {
    fn describe(chartwise: &Chartwise, provider: ProviderKind) -> Self {
        let (source, key) = match chartwise.keys().get(provider) {
            Some(key) => ("stored", Some(key)),
            None => match chartwise.resolve_key(provider) {
                Ok(key) => ("config", Some(key)),
                Err(_) => ("missing", None),
            },
        };
        Self {
            provider,
            source,
            masked: key.as_deref().map(mask),
        }
    }
}

/// Ask for a key with hidden input.
fn prompt_for_key(provider: ProviderKind) -> chartwise_core::Result<String> {
    let spec = provider.spec();
    eprintln!(
        "  {}",
        dim_style()
            .for_stderr()
            .apply_to(format!("Get a {} key at {}", spec.name, spec.help_url))
    );

    let key = Password::with_theme(&chartwise_theme())
        .with_prompt(format!("{} API key ({})", spec.name, spec.placeholder))
        .interact()
        .map_err(std::io::Error::other)?;
    Ok(key)
}
