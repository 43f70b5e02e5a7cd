use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// Offset-paging parameters for Management API list calls.
///
/// `page` is zero-based. When omitted, Auth0 applies its own defaults
/// (page 0, 50 items).
#[derive(Debug, Clone, Default)]
pub struct PageParams {
    page: Option<u32>,
    per_page: Option<u32>,
}

impl PageParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(per_page) = self.per_page {
            pairs.push(("per_page", per_page.to_string()));
        }
        pairs
    }
}

/// Checkpoint-paging parameters (`from`/`take`), used by the log endpoints.
#[derive(Debug, Clone, Default)]
pub struct CheckpointParams {
    from: Option<String>,
    take: Option<u32>,
}

impl CheckpointParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log ID to resume from (exclusive).
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn with_take(mut self, take: u32) -> Self {
        self.take = Some(take);
        self
    }

    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(from) = &self.from {
            pairs.push(("from", from.clone()));
        }
        if let Some(take) = self.take {
            pairs.push(("take", take.to_string()));
        }
        pairs
    }
}

/// One batch of a checkpoint-paged listing.
///
/// `next` is the checkpoint to resume from; `None` means the listing is
/// exhausted.
#[derive(Debug, Clone)]
pub struct CheckpointPage<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
}

impl<T> CheckpointPage<T> {
    /// Parameters for fetching the batch after this one.
    pub fn next_params(&self, take: u32) -> Option<CheckpointParams> {
        self.next
            .as_ref()
            .map(|from| CheckpointParams::new().with_from(from.clone()).with_take(take))
    }
}

/// One page of a Management API list response with totals.
///
/// Auth0 keys the item array by resource name (`"users"`, `"clients"`, ...),
/// so deserialization picks out whichever field holds the array rather than
/// hard-coding a name per endpoint.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub start: u64,
    pub limit: u64,
    pub length: u64,
    pub total: u64,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    /// Whether a further page exists beyond this one.
    pub fn has_more(&self) -> bool {
        self.start + self.length < self.total
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Page<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            #[serde(default)]
            start: u64,
            #[serde(default)]
            limit: u64,
            #[serde(default)]
            length: u64,
            #[serde(default)]
            total: u64,
            #[serde(flatten)]
            rest: serde_json::Map<String, serde_json::Value>,
        }

        let raw = Raw::deserialize(deserializer)?;
        let array = raw
            .rest
            .into_iter()
            .find_map(|(_, value)| value.is_array().then_some(value))
            .ok_or_else(|| serde::de::Error::custom("paged response contains no item array"))?;
        let items: Vec<T> = serde_json::from_value(array).map_err(serde::de::Error::custom)?;

        Ok(Page {
            start: raw.start,
            limit: raw.limit,
            length: raw.length,
            total: raw.total,
            items,
        })
    }
}
