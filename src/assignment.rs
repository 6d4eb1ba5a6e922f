pub mod dataset;
pub mod network;

use crate::maximum_flow::error::FlowError;
use dataset::ReviewDataset;
use network::ReviewNetwork;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssignmentError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Flow(#[from] FlowError),

    #[error("review on line {0} appears before any product id")]
    ReviewWithoutProduct(usize),

    #[error("percentage out of range: {0}")]
    InvalidPercentage(f64),

    #[error("not a percentage: {0:?}")]
    UnparsablePercentage(String),

    #[error("customer share out of range: {0}")]
    InvalidShare(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentConfig {
    /// Share of customers kept, in percent.
    pub customer_percentage: f64,
    /// Share of each product's reviews that may be assigned, in percent.
    pub product_percentage: f64,
    /// Fraction of its own reviews a customer may be assigned.
    pub customer_share: f64,
    /// Customers dropped before anything else.
    pub outliers: Vec<String>,
}

impl Default for AssignmentConfig {
    fn default() -> Self {
        Self { customer_percentage: 100.0, product_percentage: 100.0, customer_share: 0.4, outliers: vec!["A3UN6WX5RRO2AG".to_string(), "ATVPDKIKX0DER".to_string()] }
    }
}

pub(crate) fn check_percentage(percentage: f64) -> Result<f64, AssignmentError> {
    if (0.0..=100.0).contains(&percentage) {
        Ok(percentage)
    } else {
        Err(AssignmentError::InvalidPercentage(percentage))
    }
}

pub(crate) fn check_share(share: f64) -> Result<f64, AssignmentError> {
    if (0.0..=1.0).contains(&share) {
        Ok(share)
    } else {
        Err(AssignmentError::InvalidShare(share))
    }
}

/// Reads a percentage given as text, such as a command line argument.
pub fn parse_percentage(text: &str) -> Result<f64, AssignmentError> {
    let percentage = text.trim().parse::<f64>().map_err(|_| AssignmentError::UnparsablePercentage(text.to_owned()))?;
    check_percentage(percentage)
}

/// Trims the customers of `dataset` and builds the network for what is left.
pub fn prepare(mut dataset: ReviewDataset, config: &AssignmentConfig) -> Result<ReviewNetwork, AssignmentError> {
    dataset.retain_percentage(config.customer_percentage, &config.outliers)?;
    ReviewNetwork::build(&dataset, config)
}
