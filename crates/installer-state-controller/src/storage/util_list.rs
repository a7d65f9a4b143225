use std::fmt::Debug;

use kube::{Api, api::ListParams};
use serde::de::DeserializeOwned;

use crate::error::AppError;

#[derive(Clone)]
pub struct ListOption {
    pub page_size: u32,
    pub label_selector: Option<String>,
}

impl ListOption {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size,
            label_selector: None,
        }
    }

    pub fn with_label_selector(mut self, selector: impl Into<String>) -> Self {
        self.label_selector = Some(selector.into());
        self
    }

    pub fn to_list_param(&self) -> ListParams {
        ListParams {
            label_selector: self.label_selector.clone(),
            limit: (self.page_size > 0).then_some(self.page_size),
            ..Default::default()
        }
    }
}

/// Lists every object matching `option`, following continue tokens until the
/// server reports no more pages.
pub async fn list_all<K>(api: &Api<K>, option: &ListOption) -> Result<Vec<K>, AppError>
where
    K: Clone + DeserializeOwned + Debug,
{
    let mut list_params = option.to_list_param();
    let mut items = Vec::new();
    loop {
        let page = api.list(&list_params).await?;
        items.extend(page.items);

        match page.metadata.continue_.as_deref() {
            Some(token) if !token.is_empty() => {
                tracing::debug!(
                    "List is paginated, remaining count is {}",
                    page.metadata.remaining_item_count.unwrap_or(0)
                );
                list_params = list_params.continue_token(token);
            }
            _ => break,
        }
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_list_param() {
        let params = ListOption::new(500)
            .with_label_selector("app=installer")
            .to_list_param();
        assert_eq!(params.label_selector.as_deref(), Some("app=installer"));
        assert_eq!(params.limit, Some(500));
        assert!(params.continue_token.is_none());
    }

    #[test]
    fn test_zero_page_size_disables_limit() {
        assert_eq!(ListOption::new(0).to_list_param().limit, None);
    }
}
