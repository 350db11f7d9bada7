use std::{
    env,
    io::{self, BufRead, Write},
    process::Command,
};

use log::{info, warn};

use crate::{
    config::{display_value, fields},
    error::{BuildError, Result},
    fill,
    prompt::Prompter,
};

const DEFAULT_PYTHON: &str = "python3";
const VERSION_SNIPPET: &str = "import transformers; print(transformers.__version__)";

/// Supplies the `transformers_version` written into every config.
pub trait VersionSource {
    /// Returns the framework version, consulting the operator if needed.
    ///
    /// # Errors
    /// Returns `BuildError::Aborted` if the operator declines a required step,
    /// or `BuildError::VersionUnavailable` if no version can be obtained.
    fn framework_version<R: BufRead, W: Write>(
        &self,
        prompter: &mut Prompter<R, W>,
    ) -> Result<String>;
}

/// A version known up front.
#[derive(Debug, Clone)]
pub struct FixedVersion(pub String);

impl VersionSource for FixedVersion {
    fn framework_version<R: BufRead, W: Write>(
        &self,
        _prompter: &mut Prompter<R, W>,
    ) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Asks the installed Python `transformers` package for its version,
/// offering to install it when missing.
#[derive(Debug, Clone)]
pub struct PythonTransformers {
    python: String,
}

impl PythonTransformers {
    pub fn new(python: impl Into<String>) -> Self {
        Self {
            python: python.into(),
        }
    }

    /// Uses the interpreter named by `PYTHON`, or `python3`.
    pub fn from_env() -> Self {
        Self::new(env::var("PYTHON").unwrap_or_else(|_| DEFAULT_PYTHON.to_string()))
    }

    /// `Ok(None)` means the interpreter ran but the import failed.
    fn query(&self) -> io::Result<Option<String>> {
        let out = Command::new(&self.python)
            .args(["-c", VERSION_SNIPPET])
            .output()?;
        if !out.status.success() {
            return Ok(None);
        }
        let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
        Ok((!version.is_empty()).then_some(version))
    }

    fn install(&self) -> Result<()> {
        let status = Command::new(&self.python)
            .args(["-m", "pip", "install", "transformers"])
            .status()
            .map_err(|e| BuildError::VersionUnavailable(format!("cannot run pip: {e}")))?;
        if !status.success() {
            return Err(BuildError::VersionUnavailable(format!(
                "pip install transformers failed ({status})"
            )));
        }
        Ok(())
    }

    fn ask_operator<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>) -> Result<String> {
        let field = fields::descriptor(fields::TRANSFORMERS_VERSION)
            .ok_or_else(|| BuildError::VersionUnavailable("unknown field".into()))?;
        let value = fill::ask_field(prompter, field.name, field.prompt, true, None)?;
        value
            .as_ref()
            .map(display_value)
            .ok_or_else(|| BuildError::VersionUnavailable("no version entered".into()))
    }
}

impl VersionSource for PythonTransformers {
    fn framework_version<R: BufRead, W: Write>(
        &self,
        prompter: &mut Prompter<R, W>,
    ) -> Result<String> {
        match self.query() {
            Ok(Some(version)) => {
                info!("transformers {version} found via {}", self.python);
                return Ok(version);
            }
            Ok(None) => {}
            Err(e) => {
                warn!("cannot run {}: {e}; asking for the version instead", self.python);
                return Self::ask_operator(prompter);
            }
        }

        prompter.say("The 'transformers' library is not installed.")?;
        if !prompter.confirm("Do you want to install 'transformers' now?")? {
            prompter.say("Cannot proceed without the 'transformers' library.")?;
            return Err(BuildError::Aborted(
                "the 'transformers' library is required".into(),
            ));
        }

        self.install()?;
        match self.query() {
            Ok(Some(version)) => {
                info!("installed transformers {version}");
                Ok(version)
            }
            Ok(None) => Err(BuildError::VersionUnavailable(
                "transformers still not importable after install".into(),
            )),
            Err(e) => Err(BuildError::VersionUnavailable(e.to_string())),
        }
    }
}
