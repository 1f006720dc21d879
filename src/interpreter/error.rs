use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Undefined variable '{name}' at line {line}")]
    UndefinedVariable { name: String, line: usize },
    #[error("Division by zero at line {line}")]
    DivisionByZero { line: usize },
    #[error("Could not write program output: {0}")]
    Output(#[from] std::io::Error),
}

impl RuntimeError {
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::UndefinedVariable { line, .. } | Self::DivisionByZero { line } => Some(*line),
            Self::Output(_) => None,
        }
    }
}
