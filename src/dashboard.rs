use crate::api::BrokerageApi;
use crate::error::Result;
use crate::models::{ContractType, Property, PropertyStatus, PropertyType, User, UserId};
use crate::reviews::ReviewStats;
use std::collections::HashMap;
use tracing::info;

/// Agent profile page: the agent, their listings and their rating
#[derive(Debug, Clone)]
pub struct AgentOverview {
    pub agent: User,
    pub listings: Vec<Property>,
    pub reviews: ReviewStats,
}

impl AgentOverview {
    pub async fn load(api: &dyn BrokerageApi, agent_id: UserId) -> Result<Self> {
        let (agent, listings, reviews) = futures::try_join!(
            api.get_profile(agent_id),
            api.properties_by_realtor(agent_id),
            api.reviews_for_realtor(agent_id),
        )?;
        info!(
            "Agent {} has {} listings and {} reviews",
            agent_id,
            listings.len(),
            reviews.len()
        );

        Ok(Self {
            agent,
            listings,
            reviews: ReviewStats::from_reviews(&reviews),
        })
    }
}

/// Listing counts for the admin dashboard
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingSummary {
    pub total: usize,
    pub by_status: HashMap<PropertyStatus, usize>,
    pub by_type: HashMap<PropertyType, usize>,
    pub by_contract: HashMap<ContractType, usize>,
}

impl ListingSummary {
    pub fn from_properties<'a>(properties: impl IntoIterator<Item = &'a Property>) -> Self {
        let mut summary = Self::default();
        for property in properties {
            summary.total += 1;
            *summary.by_status.entry(property.status).or_default() += 1;
            *summary.by_type.entry(property.property_type()).or_default() += 1;
            *summary.by_contract.entry(property.contract_type).or_default() += 1;
        }
        summary
    }

    pub fn status_count(&self, status: PropertyStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }

    pub fn type_count(&self, property_type: PropertyType) -> usize {
        self.by_type.get(&property_type).copied().unwrap_or(0)
    }

    pub fn contract_count(&self, contract_type: ContractType) -> usize {
        self.by_contract.get(&contract_type).copied().unwrap_or(0)
    }
}
