use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlowError {
    #[error("vertex not found: {0}")]
    VertexNotFound(String),

    #[error("vertex already exists: {0}")]
    DuplicateVertex(String),

    #[error("terminal vertex missing: {0}")]
    MissingTerminal(String),

    #[error("source and sink are the same vertex: {0}")]
    IdenticalTerminals(String),

    // every vertex with excess has a residual edge back toward the source,
    // so this only shows up on graphs mutated behind the solver's back
    #[error("no residual edge leaves {0}, cannot relabel")]
    RelabelExhausted(String),

    #[error("no reverse edge for {0} -> {1}")]
    MissingReverse(String, String),

    #[error("discharge limit of {0} reached")]
    DischargeLimit(usize),
}
