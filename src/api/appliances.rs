//! Appliances stored on the user's account.

use http::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    api::{Client, lenient},
    prelude::*,
    quantity::{power::Watts, time::Hours},
};

#[must_use]
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Appliance {
    pub id: i64,

    #[serde(default)]
    pub user_id: Option<i64>,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub brand: String,

    #[serde(default)]
    pub category_id: u32,

    #[serde(default)]
    pub category_name: Option<String>,

    #[serde(default, deserialize_with = "lenient::deserialize_f64")]
    pub power_rating: f64,

    #[serde(default, deserialize_with = "lenient::deserialize_f64")]
    pub daily_usage: f64,
}

/// Appliance fields for creation and update.
#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize, bon::Builder)]
pub struct ApplianceFields {
    #[builder(into)]
    pub name: String,

    #[builder(into)]
    pub brand: String,

    pub category_id: u32,

    pub power_rating: Watts,

    pub daily_usage: Hours,
}

/// Outcome of a write operation.
#[must_use]
#[derive(Clone, Debug)]
pub struct Confirmation {
    pub message: String,
    pub appliance: Option<Appliance>,
}

/// The backend either wraps the record or sends it bare.
#[derive(Deserialize)]
#[serde(untagged)]
enum Reply {
    Envelope {
        #[serde(default)]
        message: Option<String>,

        data: Appliance,
    },
    Bare(Appliance),
    Other(Value),
}

impl Reply {
    fn into_confirmation(reply: Option<Self>, default_message: &str) -> Confirmation {
        let (message, appliance) = match reply {
            Some(Self::Envelope { message, data }) => (message, Some(data)),
            Some(Self::Bare(appliance)) => (None, Some(appliance)),
            Some(Self::Other(value)) => {
                (value.get("message").and_then(Value::as_str).map(str::to_string), None)
            }
            None => (None, None),
        };
        Confirmation {
            message: message
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| default_message.to_string()),
            appliance,
        }
    }
}

impl Client {
    #[instrument(skip_all)]
    pub async fn appliances(&self) -> Result<Vec<Appliance>> {
        let appliances = self
            .get::<Option<Vec<Appliance>>>("/user/appliances")
            .await?
            .flatten()
            .unwrap_or_default();
        debug!(n_appliances = appliances.len(), "fetched");
        Ok(appliances)
    }

    #[instrument(skip_all, fields(id = id))]
    pub async fn appliance(&self, id: i64) -> Result<Appliance> {
        self.get(&format!("/user/appliances/{id}"))
            .await?
            .with_context(|| format!("appliance #{id} is not found"))
    }

    #[instrument(skip_all, fields(name = fields.name.as_str()))]
    pub async fn create_appliance(&self, fields: &ApplianceFields) -> Result<Confirmation> {
        info!("creating…");
        let reply = self.send(Method::POST, "/user/appliances", fields).await?;
        Ok(Reply::into_confirmation(reply, "Appliance created successfully"))
    }

    /// Replace the stored appliance. The ID travels in the body.
    #[instrument(skip_all, fields(id = id))]
    pub async fn update_appliance(&self, id: i64, fields: &ApplianceFields) -> Result<Confirmation> {
        #[derive(Serialize)]
        struct UpdateRequest<'a> {
            id: i64,

            #[serde(flatten)]
            fields: &'a ApplianceFields,
        }

        info!("updating…");
        let reply = self.send(Method::PUT, "/user/appliances", &UpdateRequest { id, fields }).await?;
        Ok(Reply::into_confirmation(reply, "Appliance updated successfully"))
    }

    #[instrument(skip_all, fields(id = id))]
    pub async fn delete_appliance(&self, id: i64) -> Result<String> {
        #[derive(Serialize)]
        struct DeleteRequest {
            id: i64,
        }

        info!("deleting…");
        let reply = self.send(Method::DELETE, "/user/appliances", &DeleteRequest { id }).await?;
        Ok(Reply::into_confirmation(reply, "Appliance deleted successfully").message)
    }
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server};
    use serde_json::json;

    use super::*;
    use crate::{api::client::tests::client_for, quantity::Quantity};

    fn kettle() -> ApplianceFields {
        ApplianceFields::builder()
            .name("Kettle")
            .brand("Philips")
            .category_id(2)
            .power_rating(Quantity(1800.0))
            .daily_usage(Quantity(0.5))
            .build()
    }

    #[tokio::test]
    async fn test_list() -> Result {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/user/appliances")
            .with_status(200)
            .with_body(
                r#"[{"id": 1, "user_id": 3, "name": "Kettle", "brand": "Philips", "category_id": 2, "power_rating": "1800", "daily_usage": 0.5}]"#,
            )
            .create_async()
            .await;
        let client = client_for(&server).await?;

        let appliances = client.appliances().await?;
        assert_eq!(appliances.len(), 1);
        assert_eq!(appliances[0].power_rating, 1800.0);
        assert_eq!(appliances[0].user_id, Some(3));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_null() -> Result {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/user/appliances")
            .with_status(200)
            .with_body("null")
            .create_async()
            .await;
        let client = client_for(&server).await?;
        assert!(client.appliances().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_get() -> Result {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/user/appliances/5")
            .with_status(200)
            .with_body(r#"{"id": 5, "name": "Fan", "brand": "Maspion", "category_id": 6}"#)
            .create_async()
            .await;
        let client = client_for(&server).await?;

        let appliance = client.appliance(5).await?;
        assert_eq!(appliance.name, "Fan");
        assert_eq!(appliance.daily_usage, 0.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_enveloped() -> Result {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/user/appliances")
            .match_body(Matcher::Json(json!({
                "name": "Kettle",
                "brand": "Philips",
                "category_id": 2,
                "power_rating": 1800.0,
                "daily_usage": 0.5,
            })))
            .with_status(201)
            .with_body(r#"{"message": "Created", "data": {"id": 9, "name": "Kettle"}}"#)
            .create_async()
            .await;
        let client = client_for(&server).await?;

        let confirmation = client.create_appliance(&kettle()).await?;
        assert_eq!(confirmation.message, "Created");
        assert_eq!(confirmation.appliance.map(|appliance| appliance.id), Some(9));
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_update_bare() -> Result {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/user/appliances")
            .match_body(Matcher::PartialJson(json!({"id": 9, "name": "Kettle"})))
            .with_status(200)
            .with_body(r#"{"id": 9, "name": "Kettle", "brand": "Philips"}"#)
            .create_async()
            .await;
        let client = client_for(&server).await?;

        let confirmation = client.update_appliance(9, &kettle()).await?;
        assert_eq!(confirmation.message, "Appliance updated successfully");
        assert_eq!(confirmation.appliance.map(|appliance| appliance.brand), Some("Philips".into()));
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_delete() -> Result {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/user/appliances")
            .match_body(Matcher::Json(json!({"id": 9})))
            .with_status(200)
            .with_body(r#"{"message": "Deleted"}"#)
            .create_async()
            .await;
        let client = client_for(&server).await?;

        assert_eq!(client.delete_appliance(9).await?, "Deleted");
        mock.assert_async().await;
        Ok(())
    }
}
