// Operations behind each command-line flag. Every operation is one request
// at most: read the token, call the API, print the outcome.

use crate::api::{ApiClient, ApiError};
use crate::cli::{Cli, Command, UpdateSpec, UpdateSpecError};
use crate::config::Config;
use crate::credentials::{CredentialError, CredentialStore};
use crate::ui::{self, Prompter};
use anyhow::Context;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Error Reading Pinata API Token, Run Setup First using pinata-cli -s")]
    MissingCredential,

    #[error("no token entered, nothing saved")]
    EmptyToken,

    #[error("Error in Saving JWT Token")]
    SaveToken(#[from] CredentialError),

    #[error(transparent)]
    InvalidUpdateSpec(#[from] UpdateSpecError),

    /// The user did not confirm a destructive operation.
    #[error("{0}")]
    Declined(&'static str),

    #[error("failed to read input")]
    Prompt(#[from] io::Error),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// How a run ended: what is printed and the process exit status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    Success,
    /// A prompt was answered with anything but yes.
    Declined(String),
    Failed(String),
}

impl Report {
    pub fn from_result(result: anyhow::Result<()>) -> Self {
        match result {
            Ok(()) => Report::Success,
            Err(err) => match err.downcast_ref::<CliError>() {
                Some(CliError::Declined(msg)) => Report::Declined(msg.to_string()),
                _ => Report::Failed(format!("{:#}", err)),
            },
        }
    }

    /// 0 only when the command printed its success outcome.
    pub fn exit_code(&self) -> u8 {
        match self {
            Report::Success => 0,
            Report::Declined(_) | Report::Failed(_) => 1,
        }
    }

    pub fn print(&self) {
        match self {
            Report::Success => {}
            Report::Declined(msg) => println!("{}", msg),
            Report::Failed(msg) => ui::error(msg),
        }
    }
}

/// Select the command from the parsed flags, resolve configuration and
/// run it.
pub fn execute<P: Prompter>(cli: &Cli, prompter: P) -> Report {
    let Some(command) = cli.command() else {
        return Report::Failed("Invalid Options, Use -h for detailed Help".into());
    };

    let result = Config::resolve(&cli.config)
        .context("invalid configuration")
        .and_then(|config| {
            tracing::debug!(
                credentials = %config.credentials_path.display(),
                "configuration resolved"
            );
            Ok(App::new(config, prompter).run(command)?)
        });
    Report::from_result(result)
}

pub struct App<P: Prompter> {
    config: Config,
    store: CredentialStore,
    prompter: P,
}

impl<P: Prompter> App<P> {
    pub fn new(config: Config, prompter: P) -> Self {
        let store = CredentialStore::new(config.credentials_path.clone());
        App {
            config,
            store,
            prompter,
        }
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Run one command. `Ok` means its success message was printed.
    pub fn run(&self, command: Command) -> Result<(), CliError> {
        tracing::debug!(?command, "running command");
        match command {
            Command::Setup => self.setup(),
            Command::AuthTest => self.auth_test(),
            Command::Upload(path) => self.upload(&path),
            Command::List => self.list(),
            Command::Get(id) => self.get(&id),
            Command::Update(raw) => self.update(&raw),
            Command::Delete(id) => self.delete(&id),
        }
    }

    /// Client for the stored token; fails before any request when the
    /// token is missing.
    fn client(&self) -> Result<ApiClient, CliError> {
        let token = self.store.load().ok_or(CliError::MissingCredential)?;
        Ok(ApiClient::new(&self.config, &token)?)
    }

    fn setup(&self) -> Result<(), CliError> {
        let token = self.prompter.secret("Enter Your Pinata JWT")?;
        let token = token.trim();
        if token.is_empty() {
            return Err(CliError::EmptyToken);
        }
        self.store.save(token)?;
        tracing::info!(path = %self.store.path().display(), "token saved");
        ui::success("Token saved successfully, you can proceed with other activities");
        Ok(())
    }

    fn auth_test(&self) -> Result<(), CliError> {
        let message = self.client()?.test_authentication()?;
        ui::success(&message);
        Ok(())
    }

    fn upload(&self, path: &Path) -> Result<(), CliError> {
        let client = self.client()?;
        let spinner = ui::spinner("File Uploading.....");
        let result = client.upload_file(path);
        spinner.finish_and_clear();

        let record = result?;
        ui::success("File Uploaded Successfully, use -l to list new files");
        println!("{}", ui::render_file_detail(&record));
        Ok(())
    }

    fn list(&self) -> Result<(), CliError> {
        let files = self.client()?.list_files()?;
        tracing::debug!(count = files.len(), "files listed");
        println!("{}", ui::render_file_list(&files));
        Ok(())
    }

    fn get(&self, id: &str) -> Result<(), CliError> {
        let record = self.client()?.get_file(id)?;
        println!("{}", ui::render_file_detail(&record));
        Ok(())
    }

    fn update(&self, raw: &str) -> Result<(), CliError> {
        let spec: UpdateSpec = raw.parse()?;
        self.client()?.update_file(&spec.id, &spec.name)?;
        ui::success("values updated successfully, run -l to check updated values");
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), CliError> {
        let client = self.client()?;
        let answer = self.prompter.line(&format!(
            "Are you Sure you want to Delete the file with ID [{}] (Yes / No)",
            id
        ))?;
        if answer.trim().is_empty() {
            return Err(CliError::Declined(
                "exiting as there are no inputs, Default is NO",
            ));
        }
        if !ui::is_affirmative(&answer) {
            return Err(CliError::Declined("User Confirmed NO"));
        }

        client.delete_file(id)?;
        ui::success("File deleted successfully");
        Ok(())
    }
}
