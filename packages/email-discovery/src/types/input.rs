use serde::{Deserialize, Serialize};

/// What the caller knows about the business.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryInput {
    pub business_name: String,
    /// Raw website as entered upstream; may be empty.
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    /// Never run the business-data strategy, even if requested.
    #[serde(default)]
    pub skip_business_data_enrichment: bool,
    /// Run the business-data strategy and attach its output.
    #[serde(default)]
    pub include_business_data: bool,
}

impl DiscoveryInput {
    pub fn new(business_name: impl Into<String>, website: impl Into<String>) -> Self {
        Self {
            business_name: business_name.into(),
            website: website.into(),
            ..Default::default()
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }

    /// Request business-data enrichment.
    pub fn with_business_data(mut self) -> Self {
        self.include_business_data = true;
        self
    }

    /// Veto business-data enrichment.
    pub fn skip_business_data(mut self) -> Self {
        self.skip_business_data_enrichment = true;
        self
    }

    /// Whether the caller wants the business-data strategy to run.
    pub fn wants_business_data(&self) -> bool {
        self.include_business_data && !self.skip_business_data_enrichment
    }

    /// Website with surrounding whitespace removed, or `None` when blank.
    pub fn website(&self) -> Option<&str> {
        let w = self.website.trim();
        (!w.is_empty()).then_some(w)
    }
}
