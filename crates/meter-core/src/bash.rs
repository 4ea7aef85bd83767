//! Build/test classification of shell commands.

use std::fmt;

/// Substrings that mark a shell command as a build. Checked first.
pub const BUILD_PATTERNS: &[&str] = &[
    "go build",
    "npm run build",
    "npm build",
    "yarn build",
    "cargo build",
    "make",
    "cmake",
    "tsc",
    "webpack",
    "vite build",
    "docker build",
    "gradle build",
    "mvn compile",
    "mvn package",
];

/// Substrings that mark a shell command as a test run.
pub const TEST_PATTERNS: &[&str] = &[
    "go test",
    "npm test",
    "npm run test",
    "yarn test",
    "pytest",
    "python -m pytest",
    "jest",
    "vitest",
    "cargo test",
    "make test",
    "mocha",
    "rspec",
    "gradle test",
    "mvn test",
];

/// What a recognised shell command does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Build,
    Test,
}

impl CommandKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Build => "build",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a shell command by case-insensitive substring match.
///
/// Build patterns win over test patterns, so `make test` is a build.
pub fn classify_command(command: &str) -> Option<CommandKind> {
    let lower = command.to_lowercase();
    if BUILD_PATTERNS.iter().any(|pattern| lower.contains(pattern)) {
        Some(CommandKind::Build)
    } else if TEST_PATTERNS.iter().any(|pattern| lower.contains(pattern)) {
        Some(CommandKind::Test)
    } else {
        None
    }
}
