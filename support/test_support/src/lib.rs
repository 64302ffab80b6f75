use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CaseClass {
    RuntimeSuccess,
    FrontendError,
    BackendRuntimeError,
    GenerationError,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct BenchConfig {
    pub enabled: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExpectedOutcome {
    pub exit_code: i32,
    /// Interpreter stdout.
    pub stdout_file: Option<String>,
    pub stderr_contains_file: Option<String>,
    /// Exact C++ produced by the code generator.
    pub generated_file: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CaseSpec {
    pub class: CaseClass,
    /// Compile the generated C++ and compare its stdout with the interpreter.
    #[serde(default)]
    pub parity: bool,
    #[serde(default)]
    pub unsupported_backends: Vec<String>,
    #[serde(default)]
    pub bench: BenchConfig,
    pub expected: ExpectedOutcome,
}

#[derive(Debug, Clone)]
pub struct Case {
    pub name: String,
    pub dir: PathBuf,
    pub program_path: PathBuf,
    pub spec: CaseSpec,
}

impl Case {
    pub fn read_text(&self, relative_path: &str) -> Result<String> {
        fs::read_to_string(self.dir.join(relative_path))
            .with_context(|| format!("Reading {} fixture file {}", self.name, relative_path))
    }

    pub fn read_program(&self) -> Result<String> {
        fs::read_to_string(&self.program_path)
            .with_context(|| format!("Reading program for {}", self.name))
    }

    pub fn is_backend_unsupported(&self, backend_name: &str) -> bool {
        self.spec
            .unsupported_backends
            .iter()
            .any(|name| name == backend_name)
    }
}

pub fn load_cases(programs_dir: &Path) -> Result<Vec<Case>> {
    let mut cases = Vec::new();

    for entry in
        fs::read_dir(programs_dir).with_context(|| format!("Reading {}", programs_dir.display()))?
    {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }

        let case_path = path.join("case.yaml");
        if !case_path.exists() {
            continue;
        }

        let program_path = path.join("program.mini");
        ensure!(
            program_path.exists(),
            "Missing program.mini for case {}",
            path.display()
        );

        let case_name = path
            .file_name()
            .and_then(|value| value.to_str())
            .map(str::to_string)
            .with_context(|| format!("Invalid case directory name {}", path.display()))?;
        let case_raw = fs::read_to_string(&case_path)
            .with_context(|| format!("Reading {}", case_path.display()))?;
        let spec: CaseSpec = serde_yaml::from_str(&case_raw)
            .with_context(|| format!("Parsing {}", case_path.display()))?;

        cases.push(Case {
            name: case_name,
            dir: path,
            program_path,
            spec,
        });
    }

    ensure!(
        !cases.is_empty(),
        "No test cases found in {}",
        programs_dir.display()
    );
    cases.sort_by(|left, right| left.name.cmp(&right.name));
    Ok(cases)
}

pub fn normalize_output(output: &str) -> String {
    output.replace("\r\n", "\n").trim_end().to_string()
}

pub fn validate_unsupported_backends(case: &Case, known_backends: &[&str]) -> Result<()> {
    for backend in &case.spec.unsupported_backends {
        ensure!(
            known_backends.contains(&backend.as_str()),
            "Case {} contains unknown unsupported backend '{}'",
            case.name,
            backend
        );
    }
    Ok(())
}

/// Finds a runnable C++ compiler: `$CXX` first, then `c++`, `g++`, `clang++`.
pub fn detect_cxx_compiler() -> Option<String> {
    let runs = |compiler: &str| {
        Command::new(compiler)
            .arg("--version")
            .output()
            .is_ok_and(|output| output.status.success())
    };

    if let Ok(compiler) = std::env::var("CXX")
        && runs(&compiler)
    {
        return Some(compiler);
    }
    ["c++", "g++", "clang++"]
        .into_iter()
        .find(|candidate| runs(*candidate))
        .map(str::to_string)
}

/// Compiles `sources` into `binary` with C++17.
pub fn compile_cxx(compiler: &str, sources: &[PathBuf], binary: &Path) -> Result<()> {
    let output = Command::new(compiler)
        .arg("-std=c++17")
        .args(sources)
        .arg("-o")
        .arg(binary)
        .output()
        .with_context(|| format!("Running {compiler}"))?;
    ensure!(
        output.status.success(),
        "{compiler} failed for {}: {}",
        binary.display(),
        String::from_utf8_lossy(&output.stderr)
    );
    Ok(())
}

pub fn run_binary(path: &Path) -> Result<String> {
    let output = Command::new(path)
        .output()
        .with_context(|| format!("Running {}", path.display()))?;
    ensure!(
        output.status.success(),
        "{} exited with {}: {}",
        path.display(),
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
