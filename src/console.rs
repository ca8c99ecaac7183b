//! Handling the fsoptics CLI
//!
//! This module handles the command line parsing as well as basic information (e.g. help dialog, version information, etc.).
use crate::{
    error::{FsoError, FsoResult},
    get_version,
    scenario::Scenario,
};
use clap::{builder::Str, Parser, Subcommand};
use std::{
    fmt::Display,
    path::{Path, PathBuf},
};

/// The computation requested on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// evaluate a Bessel-Gauss beam scenario
    Beam,
    /// calculate the spectrum of a thin-film scenario
    Film,
}

impl Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Beam => write!(f, "beam"),
            Self::Film => write!(f, "film"),
        }
    }
}

/// Command line arguments for the fsoptics application.
#[derive(Debug)]
pub struct Args {
    /// requested computation
    pub mode: Mode,
    /// file path of the scenario document
    pub scenario: PathBuf,
    /// destination directory of the plots. if not defined, the directory of the scenario file is used
    pub output_dir: PathBuf,
}

#[derive(Parser)]
#[command(author, version = Str::from(get_version()), about, long_about = None)]
pub struct PartialArgs {
    #[command(subcommand)]
    command: PartialCommand,
}

#[derive(Subcommand)]
enum PartialCommand {
    /// evaluate a Bessel-Gauss beam and plot its intensity and phase
    Beam(PartialPaths),
    /// calculate and plot the spectrum of a thin-film stack
    Film(PartialPaths),
}

#[derive(clap::Args)]
struct PartialPaths {
    /// file path of the scenario document (.yaml or .yml)
    #[arg(short, long)]
    scenario: String,

    /// destination directory of the plots. if not defined, same directory as the scenario file is used
    #[arg(short, long)]
    output_dir: Option<String>,
}

/// Checks if the passed file path points to an existing YAML file.
fn file_path_is_valid(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
}

fn eval_file_path_input(file_path: &str) -> Option<PathBuf> {
    let path = PathBuf::from(file_path);
    file_path_is_valid(&path).then_some(path)
}

/// Evaluates the output directory input.
///
/// Returns the directory if it exists, the parent directory of the scenario file if no input was given
/// or `None` otherwise.
fn eval_output_dir_input(output_dir: Option<&str>, scenario: &Path) -> Option<PathBuf> {
    match output_dir {
        Some(dir) => {
            let path = PathBuf::from(dir);
            path.is_dir().then_some(path)
        }
        None => scenario.parent().map(Path::to_path_buf),
    }
}

impl TryFrom<PartialArgs> for Args {
    type Error = FsoError;

    fn try_from(part_args: PartialArgs) -> FsoResult<Self> {
        let (mode, paths) = match part_args.command {
            PartialCommand::Beam(paths) => (Mode::Beam, paths),
            PartialCommand::Film(paths) => (Mode::Film, paths),
        };
        let scenario = eval_file_path_input(&paths.scenario).ok_or_else(|| {
            FsoError::Console(format!(
                "invalid scenario file '{}', expected an existing .yaml or .yml file",
                paths.scenario
            ))
        })?;
        let output_dir = eval_output_dir_input(paths.output_dir.as_deref(), &scenario)
            .ok_or_else(|| {
                FsoError::Console(format!(
                    "output directory '{}' does not exist",
                    paths.output_dir.unwrap_or_default()
                ))
            })?;
        Ok(Self {
            mode,
            scenario,
            output_dir,
        })
    }
}

impl Args {
    /// Read the scenario document and check that it matches the requested [`Mode`].
    ///
    /// # Errors
    ///
    /// This function will return an [`FsoError::Console`] if the file cannot be read, parsed or
    /// describes a different computation.
    pub fn read_scenario(&self) -> FsoResult<Scenario> {
        let scenario = Scenario::from_file(&self.scenario)?;
        match (&scenario, self.mode) {
            (Scenario::Beam(_), Mode::Beam) | (Scenario::Film(_), Mode::Film) => Ok(scenario),
            _ => Err(FsoError::Console(format!(
                "scenario file {} does not describe a {} computation",
                self.scenario.display(),
                self.mode
            ))),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const FILM: &str = "film:
  ambient: 1.0
  substrate: { n: 1.5 }
  layers:
    - { thickness_nm: 100.0, n: 1.38 }
  sweep: { start_nm: 500.0, end_nm: 600.0, step_nm: 50.0 }
";
    fn scenario_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("film.yaml"), FILM).unwrap();
        fs::write(dir.path().join("film.txt"), FILM).unwrap();
        dir
    }
    #[test]
    fn file_path_is_valid_test() {
        let dir = scenario_dir();
        assert!(file_path_is_valid(&dir.path().join("film.yaml")));
        assert!(!file_path_is_valid(&dir.path().join("film.txt")));
        assert!(!file_path_is_valid(&dir.path().join("nonexistent.yaml")));
        assert!(!file_path_is_valid(dir.path()));
    }
    #[test]
    fn eval_output_dir_input_test() {
        let dir = scenario_dir();
        let scenario = dir.path().join("film.yaml");
        assert_eq!(
            eval_output_dir_input(None, &scenario),
            Some(dir.path().to_path_buf())
        );
        let out = dir.path().to_str().unwrap();
        assert_eq!(
            eval_output_dir_input(Some(out), &scenario),
            Some(PathBuf::from(out))
        );
        assert_eq!(
            eval_output_dir_input(Some("non_existent_path/still_not_existent/"), &scenario),
            None
        );
    }
    #[test]
    fn try_from_partial_args() {
        let dir = scenario_dir();
        let scenario = dir.path().join("film.yaml");
        let partial = PartialArgs::parse_from([
            "fsoptics",
            "film",
            "--scenario",
            scenario.to_str().unwrap(),
        ]);
        let args = Args::try_from(partial).unwrap();
        assert_eq!(args.mode, Mode::Film);
        assert_eq!(args.output_dir, dir.path());
        assert!(matches!(args.read_scenario(), Ok(Scenario::Film(_))));
    }
    #[test]
    fn try_from_partial_args_wrong() {
        let dir = scenario_dir();
        let txt = dir.path().join("film.txt");
        let partial =
            PartialArgs::parse_from(["fsoptics", "beam", "-s", txt.to_str().unwrap()]);
        assert!(matches!(
            Args::try_from(partial),
            Err(FsoError::Console(_))
        ));
        let yaml = dir.path().join("film.yaml");
        let partial = PartialArgs::parse_from([
            "fsoptics",
            "beam",
            "-s",
            yaml.to_str().unwrap(),
            "-o",
            "non_existent_path/",
        ]);
        assert!(Args::try_from(partial).is_err());
    }
    #[test]
    fn read_scenario_wrong_mode() {
        let dir = scenario_dir();
        let yaml = dir.path().join("film.yaml");
        let partial = PartialArgs::parse_from(["fsoptics", "beam", "-s", yaml.to_str().unwrap()]);
        let args = Args::try_from(partial).unwrap();
        assert!(matches!(args.read_scenario(), Err(FsoError::Console(_))));
    }
    #[test]
    fn display_mode() {
        assert_eq!(Mode::Beam.to_string(), "beam");
        assert_eq!(Mode::Film.to_string(), "film");
    }
}
