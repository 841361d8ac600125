//! Reference data for the appliance form: brands, categories, and house capacities.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use tokio::try_join;

use crate::{api::Client, prelude::*};

#[must_use]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,

    #[serde(default)]
    pub name: String,
}

impl Category {
    /// Built-in categories for when the backend cannot provide any.
    pub fn defaults() -> Vec<Self> {
        [
            (1, "Heating"),
            (2, "Kitchen"),
            (3, "Lighting"),
            (4, "Health"),
            (5, "Entertainment"),
            (6, "Cooling"),
        ]
        .into_iter()
        .map(|(id, name)| Self { id, name: name.to_string() })
        .collect()
    }
}

/// Everything the appliance form offers to choose from.
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceData {
    pub brands: Vec<String>,
    pub categories: Vec<Category>,
    pub house_capacities: Vec<String>,
}

impl Client {
    /// Fetch the brands, the categories, and the capacities concurrently.
    ///
    /// Falls back to [`Category::defaults`] when the categories are unavailable.
    #[instrument(skip_all)]
    pub async fn reference_data(&self) -> Result<ReferenceData> {
        let categories = async {
            Ok::<_, Error>(self.categories().await.unwrap_or_else(|error| {
                warn!("failed to fetch the categories, using the defaults: {error:#}");
                Category::defaults()
            }))
        };
        let (brands, categories, house_capacities) =
            try_join!(self.brands(), categories, self.house_capacities())?;
        Ok(ReferenceData { brands, categories, house_capacities })
    }

    #[instrument(skip_all)]
    pub async fn brands(&self) -> Result<Vec<String>> {
        self.strings("/brands").await
    }

    #[instrument(skip_all)]
    pub async fn house_capacities(&self) -> Result<Vec<String>> {
        self.strings("/house-capacity").await
    }

    #[instrument(skip_all)]
    pub async fn categories(&self) -> Result<Vec<Category>> {
        let categories: Vec<Category> = self
            .list("/categories")
            .await?
            .into_iter()
            .filter(|category: &Category| !category.name.trim().is_empty())
            .collect();
        debug!(n_categories = categories.len(), "fetched");
        Ok(categories)
    }

    async fn strings(&self, path: &str) -> Result<Vec<String>> {
        let strings: Vec<String> = self
            .list(path)
            .await?
            .into_iter()
            .filter(|string: &String| !string.trim().is_empty())
            .collect();
        debug!(path, n_items = strings.len(), "fetched");
        Ok(strings)
    }

    /// Fetch a list, treating `null` as empty and skipping malformed items.
    async fn list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let items = self.get::<Option<Vec<Value>>>(path).await?.flatten().unwrap_or_default();
        Ok(items.into_iter().filter_map(|item| serde_json::from_value(item).ok()).collect())
    }
}

#[cfg(test)]
mod tests {
    use mockito::Server;

    use super::*;
    use crate::api::client::tests::client_for;

    #[test]
    fn test_default_categories() {
        let categories = Category::defaults();
        assert_eq!(categories.len(), 6);
        assert_eq!(categories[0], Category { id: 1, name: "Heating".to_string() });
        assert_eq!(categories[5].name, "Cooling");
    }

    #[tokio::test]
    async fn test_brands_drop_blanks() -> Result {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/brands")
            .with_status(200)
            .with_body(r#"["Sharp", "", "  ", "Philips", 5]"#)
            .create_async()
            .await;
        let client = client_for(&server).await?;
        assert_eq!(client.brands().await?, ["Sharp", "Philips"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_null_is_empty() -> Result {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/house-capacity")
            .with_status(200)
            .with_body("null")
            .create_async()
            .await;
        let client = client_for(&server).await?;
        assert!(client.house_capacities().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_reference_data_falls_back_to_default_categories() -> Result {
        let mut server = Server::new_async().await;
        let _brands = server
            .mock("GET", "/brands")
            .with_status(200)
            .with_body(r#"["Sharp"]"#)
            .create_async()
            .await;
        let _categories = server.mock("GET", "/categories").with_status(500).create_async().await;
        let _capacities = server
            .mock("GET", "/house-capacity")
            .with_status(200)
            .with_body(r#"["900 VA", "1.300 VA"]"#)
            .create_async()
            .await;
        let client = client_for(&server).await?;

        let data = client.reference_data().await?;
        assert_eq!(data.brands, ["Sharp"]);
        assert_eq!(data.categories, Category::defaults());
        assert_eq!(data.house_capacities, ["900 VA", "1.300 VA"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_reference_data_fails_on_brands() -> Result {
        let mut server = Server::new_async().await;
        let _brands = server.mock("GET", "/brands").with_status(503).create_async().await;
        let _categories = server
            .mock("GET", "/categories")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;
        let _capacities = server
            .mock("GET", "/house-capacity")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;
        let client = client_for(&server).await?;
        assert!(client.reference_data().await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_categories() -> Result {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/categories")
            .with_status(200)
            .with_body(r#"[{"id": 1, "name": "Heating"}, {"id": 9, "name": ""}, {"id": 2}]"#)
            .create_async()
            .await;
        let client = client_for(&server).await?;
        assert_eq!(
            client.categories().await?,
            [Category { id: 1, name: "Heating".to_string() }],
        );
        Ok(())
    }
}
