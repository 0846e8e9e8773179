// Command-line surface: flag definitions, command selection and parsing
// of the `--updatefile` argument.

use crate::config::ConfigArgs;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// All in One CLI Program to Access Pinata Cloud
#[derive(Parser, Debug)]
#[command(name = "pinata-cli")]
#[command(about = "All in One CLI Program to Access Pinata Cloud", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Set up the Pinata JWT token
    #[arg(short = 's', long = "setup")]
    pub setup: bool,

    /// Test your authentication with Pinata
    #[arg(short = 'a', long = "authtest")]
    pub authtest: bool,

    /// Upload a file from your local machine to Pinata
    #[arg(short = 'u', long = "uploadfile", value_name = "PATH")]
    pub uploadfile: Option<PathBuf>,

    /// List all the files stored in your Pinata account
    #[arg(short = 'l', long = "listfiles")]
    pub listfiles: bool,

    /// Get a single file by ID, use -l to get the IDs of all files
    #[arg(short = 'f', long = "getfile", value_name = "ID")]
    pub getfile: Option<String>,

    /// Update file properties, e.g. id=fileid,name=newname
    #[arg(short = 'p', long = "updatefile", value_name = "id=ID,name=NAME")]
    pub updatefile: Option<String>,

    /// Delete a file by ID (asks for confirmation)
    #[arg(short = 'd', long = "deletefile", value_name = "ID")]
    pub deletefile: Option<String>,

    /// Do not print the banner
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// The single operation selected for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Setup,
    AuthTest,
    Upload(PathBuf),
    List,
    Get(String),
    Update(String),
    Delete(String),
}

impl Cli {
    /// Pick the command to run. Flags are not checked against each other:
    /// the first one set, in the order setup, authtest, upload, list, get,
    /// update, delete, wins. Empty values count as unset.
    pub fn command(&self) -> Option<Command> {
        let non_empty = |v: &Option<String>| v.clone().filter(|s| !s.is_empty());

        if self.setup {
            Some(Command::Setup)
        } else if self.authtest {
            Some(Command::AuthTest)
        } else if let Some(path) = self
            .uploadfile
            .clone()
            .filter(|p| !p.as_os_str().is_empty())
        {
            Some(Command::Upload(path))
        } else if self.listfiles {
            Some(Command::List)
        } else if let Some(id) = non_empty(&self.getfile) {
            Some(Command::Get(id))
        } else if let Some(spec) = non_empty(&self.updatefile) {
            Some(Command::Update(spec))
        } else {
            non_empty(&self.deletefile).map(Command::Delete)
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid update specification '{input}': {reason}, expected id=<id>,name=<name>")]
pub struct UpdateSpecError {
    pub input: String,
    pub reason: String,
}

/// Parsed form of the `--updatefile` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateSpec {
    pub id: String,
    pub name: String,
}

impl FromStr for UpdateSpec {
    type Err = UpdateSpecError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let fail = |reason: &str| UpdateSpecError {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let fields: Vec<&str> = input.split(',').collect();
        if fields.len() != 2 {
            return Err(fail("expected exactly two comma-separated fields"));
        }

        let mut id = None;
        let mut name = None;
        for field in fields {
            let (key, value) = field
                .split_once('=')
                .ok_or_else(|| fail("each field must be key=value"))?;
            let value = value.trim();
            if value.is_empty() {
                return Err(fail("empty value"));
            }
            let slot = match key.trim() {
                "id" => &mut id,
                "name" => &mut name,
                _ => return Err(fail("unknown field")),
            };
            if slot.replace(value.to_string()).is_some() {
                return Err(fail("duplicate field"));
            }
        }

        match (id, name) {
            (Some(id), Some(name)) => Ok(UpdateSpec { id, name }),
            _ => Err(fail("both id and name are required")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["pinata-cli", "--config-dir", "/tmp/pinata-cli-test"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn no_flag_selects_nothing() {
        assert_eq!(parse(&[]).command(), None);
        assert_eq!(parse(&["-q", "-vv"]).command(), None);
    }

    #[test]
    fn each_flag_maps_to_its_command() {
        assert_eq!(parse(&["-s"]).command(), Some(Command::Setup));
        assert_eq!(parse(&["--authtest"]).command(), Some(Command::AuthTest));
        assert_eq!(
            parse(&["-u", "docs/a.txt"]).command(),
            Some(Command::Upload(PathBuf::from("docs/a.txt")))
        );
        assert_eq!(parse(&["--listfiles"]).command(), Some(Command::List));
        assert_eq!(parse(&["-f", "abc"]).command(), Some(Command::Get("abc".into())));
        assert_eq!(
            parse(&["-p", "id=1,name=x"]).command(),
            Some(Command::Update("id=1,name=x".into()))
        );
        assert_eq!(
            parse(&["--deletefile", "abc"]).command(),
            Some(Command::Delete("abc".into()))
        );
    }

    #[test]
    fn first_flag_in_priority_order_wins() {
        assert_eq!(parse(&["-d", "x", "-l", "-a"]).command(), Some(Command::AuthTest));
        assert_eq!(parse(&["-d", "x", "-f", "y"]).command(), Some(Command::Get("y".into())));
        assert_eq!(parse(&["-l", "-s"]).command(), Some(Command::Setup));
        assert_eq!(
            parse(&["-p", "id=1,name=x", "-u", "f.bin"]).command(),
            Some(Command::Upload(PathBuf::from("f.bin")))
        );
    }

    #[test]
    fn empty_values_are_ignored() {
        assert_eq!(parse(&["-f", "", "-d", "z"]).command(), Some(Command::Delete("z".into())));
    }

    #[test]
    fn verbose_counts() {
        assert_eq!(parse(&["-vvv"]).verbose, 3);
    }

    #[test]
    fn update_spec_parses() {
        let spec: UpdateSpec = "id=42,name=report.pdf".parse().unwrap();
        assert_eq!(
            spec,
            UpdateSpec {
                id: "42".into(),
                name: "report.pdf".into()
            }
        );
    }

    #[test]
    fn update_spec_accepts_either_order_and_equals_in_name() {
        let spec: UpdateSpec = "name=a=b.txt, id=7".parse().unwrap();
        assert_eq!(spec.id, "7");
        assert_eq!(spec.name, "a=b.txt");
    }

    #[test]
    fn malformed_update_specs_are_errors() {
        for bad in [
            "id=42",
            "id=42;name=x",
            "id=42,name=x,extra=1",
            "id42,name=x",
            "id=,name=x",
            "id=1,title=x",
            "id=1,id=2",
            "",
        ] {
            let err = bad.parse::<UpdateSpec>().unwrap_err();
            assert_eq!(err.input, bad);
        }
    }
}
