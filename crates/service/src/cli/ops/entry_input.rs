use std::path::PathBuf;

use clap::Subcommand;

use common::entry::{AuthData, BinaryData, CardData, Entry, TextData};

/// Typed entry content taken from the command line.
///
/// The auth password may be omitted from the arguments, in which case it is
/// prompted for without echo.
#[derive(Subcommand, Debug, Clone)]
pub enum EntryInput {
    /// Simple text data
    Text {
        /// Entry title
        #[arg(long)]
        name: String,
        /// Text content
        #[arg(long)]
        content: String,
    },
    /// Login/password for a website or service
    Auth {
        /// Entry title
        #[arg(long)]
        name: String,
        #[arg(long)]
        username: String,
        /// Password (prompted without echo if omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Credit card data
    Card {
        /// Entry title
        #[arg(long)]
        name: String,
        #[arg(long)]
        number: String,
        /// Expiry date
        #[arg(long)]
        date: String,
        #[arg(long)]
        cvc: String,
        /// Card holder name
        #[arg(long)]
        holder: String,
    },
    /// Small binary file
    Binary {
        /// Entry title
        #[arg(long)]
        name: String,
        /// File to store
        #[arg(long)]
        file: PathBuf,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum EntryInputError {
    #[error("password prompt failed: {0}")]
    Prompt(std::io::Error),
    #[error("read file failed: {0}")]
    ReadFile(std::io::Error),
}

impl EntryInput {
    /// Materialize the typed entry, prompting or reading files as needed.
    pub fn build(&self) -> Result<Entry, EntryInputError> {
        match self {
            EntryInput::Text { name, content } => Ok(Entry::Text(TextData {
                name: name.clone(),
                content: content.clone(),
            })),
            EntryInput::Auth {
                name,
                username,
                password,
            } => {
                let password = match password {
                    Some(p) => p.clone(),
                    None => rpassword::prompt_password("Password: ")
                        .map_err(EntryInputError::Prompt)?,
                };
                Ok(Entry::Auth(AuthData {
                    name: name.clone(),
                    username: username.clone(),
                    password,
                }))
            }
            EntryInput::Card {
                name,
                number,
                date,
                cvc,
                holder,
            } => Ok(Entry::Card(CardData {
                name: name.clone(),
                number: number.clone(),
                date: date.clone(),
                cvc: cvc.clone(),
                holder: holder.clone(),
            })),
            EntryInput::Binary { name, file } => {
                let content = std::fs::read(file).map_err(EntryInputError::ReadFile)?;
                let filename = file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| file.to_string_lossy().into_owned());
                Ok(Entry::Binary(BinaryData {
                    name: name.clone(),
                    filename,
                    content,
                }))
            }
        }
    }
}
