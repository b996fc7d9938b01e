use log::info;

use super::{CannedAdvisor, KitchenAdvisor};
use crate::error::{CooksyError, Result};

pub struct AdvisorFactory;

impl AdvisorFactory {
    /// Create an advisor instance by configured name
    pub fn create(advisor_name: &str) -> Result<Box<dyn KitchenAdvisor>> {
        let advisor: Box<dyn KitchenAdvisor> = match advisor_name {
            "canned" => Box::new(CannedAdvisor::new()),
            _ => return Err(CooksyError::UnknownAdvisor(advisor_name.to_string())),
        };
        info!("Using '{}' advisor", advisor.advisor_name());
        Ok(advisor)
    }

    /// List all available advisor names
    pub fn available_advisors() -> Vec<&'static str> {
        vec!["canned"]
    }
}
