//! Submitted appliance records: submission, history, and narrative analysis.

use std::fmt::{Display, Formatter};

use bon::Builder;
use http::Method;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use crate::{
    api::{Client, lenient},
    prelude::*,
    quantity::{energy::KilowattHours, power::Watts, time::Hours},
};

#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Eq,
    PartialEq,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum BillingType {
    #[display("prepaid")]
    Prepaid,

    #[default]
    #[display("postpaid")]
    Postpaid,
}

/// Device as the backend expects it in submissions and analysis requests.
#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize, Builder)]
pub struct DevicePayload {
    #[serde(rename = "jenis_pembayaran")]
    pub billing_type: BillingType,

    /// Household capacity descriptor, for example `1.300 VA`.
    #[serde(rename = "besar_listrik")]
    #[builder(into)]
    pub capacity: String,

    #[builder(into)]
    pub name: String,

    #[builder(into)]
    pub brand: String,

    pub power: Watts,

    pub duration: Hours,

    pub category_id: u32,
}

impl DevicePayload {
    pub const UNKNOWN_BRAND: &'static str = "Unknown";
}

/// Record ID, which the backend sends either as a number or as a string.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Number(i64),
    Text(String),
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(number) => Display::fmt(number, f),
            Self::Text(text) => Display::fmt(text, f),
        }
    }
}

#[derive(Serialize)]
struct Electricity {
    kwh: KilowattHours,
}

#[must_use]
#[derive(Clone, Debug, Deserialize)]
pub struct SubmitResponse {
    pub id_submit: Identifier,

    #[serde(default)]
    pub total_items: u32,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub ai_response: Option<String>,
}

/// Raw history row.
#[must_use]
#[derive(Clone, Debug, Deserialize)]
pub struct HistoryRecord {
    pub id: Identifier,

    #[serde(default, rename = "tanggal_input")]
    pub date: Option<String>,

    #[serde(default, rename = "nama_perangkat")]
    pub appliance: Option<String>,

    #[serde(default)]
    pub brand: Option<String>,

    #[serde(default)]
    pub category_id: Option<u32>,

    #[serde(default)]
    pub category_name: Option<String>,

    #[serde(default, rename = "daya", deserialize_with = "lenient::deserialize_f64")]
    pub power: f64,

    #[serde(default, rename = "durasi", deserialize_with = "lenient::deserialize_f64")]
    pub duration: f64,

    /// Household capacity descriptor at the time of the input.
    #[serde(default, rename = "besar_listrik")]
    pub capacity: Option<String>,
}

#[must_use]
#[derive(Clone, Debug, Deserialize)]
pub struct Analysis {
    #[serde(default, deserialize_with = "lenient::deserialize_f64")]
    pub total_power_wh: f64,

    #[serde(default, deserialize_with = "lenient::deserialize_f64")]
    pub daily_kwh: f64,

    #[serde(default, deserialize_with = "lenient::deserialize_f64")]
    pub monthly_kwh: f64,

    #[serde(default, deserialize_with = "lenient::deserialize_f64")]
    pub tariff_rate: f64,

    #[serde(default)]
    pub estimated_monthly_rp: Option<String>,

    #[serde(default)]
    pub ai_response: Option<String>,

    #[serde(default)]
    pub id_submit: Option<Identifier>,
}

impl Client {
    /// Store the devices together with the billing type and the aggregate monthly energy.
    #[instrument(skip_all, fields(billing_type = %billing_type, n_devices = devices.len()))]
    pub async fn submit(
        &self,
        billing_type: BillingType,
        monthly_energy: KilowattHours,
        devices: &[DevicePayload],
    ) -> Result<SubmitResponse> {
        #[derive(Serialize)]
        struct SubmitRequest<'a> {
            #[serde(rename = "billingtype")]
            billing_type: BillingType,

            electricity: Electricity,

            devices: &'a [DevicePayload],
        }

        info!("submitting…");
        let request = SubmitRequest {
            billing_type,
            electricity: Electricity { kwh: monthly_energy },
            devices,
        };
        self.send(Method::POST, "/submit", &request)
            .await?
            .context("the backend returned an empty submission response")
    }

    #[instrument(skip_all)]
    pub async fn history(&self) -> Result<Vec<HistoryRecord>> {
        #[serde_as]
        #[derive(Deserialize)]
        #[serde(transparent)]
        struct Rows(#[serde_as(as = "serde_with::VecSkipError<_>")] Vec<HistoryRecord>);

        let records = self.get::<Option<Rows>>("/history").await?.flatten().map(|rows| rows.0);
        let records = records.unwrap_or_default();
        info!(n_records = records.len(), "fetched the history");
        Ok(records)
    }

    /// Ask the backend for a narrative analysis of the devices.
    #[instrument(skip_all, fields(n_devices = devices.len(), capacity = capacity))]
    pub async fn analyze(&self, devices: &[DevicePayload], capacity: &str) -> Result<Analysis> {
        #[derive(Serialize)]
        struct AnalyzeRequest<'a> {
            devices: &'a [DevicePayload],

            #[serde(rename = "besar_listrik")]
            capacity: &'a str,
        }

        info!("analyzing…");
        self.send(Method::POST, "/analyze", &AnalyzeRequest { devices, capacity })
            .await?
            .context("the backend returned an empty analysis")
    }
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server};
    use serde_json::json;

    use super::*;
    use crate::{api::client::tests::client_for, quantity::Quantity};

    fn device() -> DevicePayload {
        DevicePayload::builder()
            .billing_type(BillingType::Postpaid)
            .capacity("1.300 VA")
            .name("Fridge")
            .brand("Sharp")
            .power(Quantity(100.0))
            .duration(Quantity(5.0))
            .category_id(2)
            .build()
    }

    #[test]
    fn test_device_payload_wire_format() -> Result {
        assert_eq!(
            serde_json::to_value(device())?,
            json!({
                "jenis_pembayaran": "postpaid",
                "besar_listrik": "1.300 VA",
                "name": "Fridge",
                "brand": "Sharp",
                "power": 100.0,
                "duration": 5.0,
                "category_id": 2,
            }),
        );
        Ok(())
    }

    #[test]
    fn test_deserialize_history_record() -> Result {
        // language=json
        let body = r#"{
            "id": 7,
            "tanggal_input": "2025-06-01",
            "nama_perangkat": "Rice cooker",
            "brand": "Miyako",
            "category_id": 2,
            "category_name": "Kitchen",
            "daya": "350",
            "durasi": 1.5,
            "besar_listrik": "900 VA"
        }"#;
        let record = serde_json::from_str::<HistoryRecord>(body)?;
        assert_eq!(record.id, Identifier::Number(7));
        assert_eq!(record.power, 350.0);
        assert_eq!(record.duration, 1.5);
        assert_eq!(record.capacity.as_deref(), Some("900 VA"));
        Ok(())
    }

    #[tokio::test]
    async fn test_submit() -> Result {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/submit")
            .match_body(Matcher::PartialJson(json!({
                "billingtype": "postpaid",
                "electricity": {"kwh": 30.0},
                "devices": [{"name": "Fridge", "besar_listrik": "1.300 VA"}],
            })))
            .with_status(200)
            .with_body(r#"{"id_submit": "abc-1", "total_items": 1, "message": "saved"}"#)
            .create_async()
            .await;
        let client = client_for(&server).await?;

        let response = client.submit(BillingType::Postpaid, Quantity(30.0), &[device()]).await?;
        assert_eq!(response.id_submit.to_string(), "abc-1");
        assert_eq!(response.total_items, 1);
        assert_eq!(response.message.as_deref(), Some("saved"));
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_history_skips_broken_rows() -> Result {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/history")
            .with_status(200)
            .with_body(r#"[{"id": 1, "daya": 100, "durasi": "2"}, {"daya": 5}, {"id": "2"}]"#)
            .create_async()
            .await;
        let client = client_for(&server).await?;

        let records = client.history().await?;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].duration, 2.0);
        assert_eq!(records[1].id, Identifier::Text("2".to_string()));
        assert_eq!(records[1].power, 0.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_history_null() -> Result {
        let mut server = Server::new_async().await;
        let _mock =
            server.mock("GET", "/history").with_status(200).with_body("null").create_async().await;
        let client = client_for(&server).await?;
        assert!(client.history().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_analyze() -> Result {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/analyze")
            .match_body(Matcher::PartialJson(json!({"besar_listrik": "1.300 VA"})))
            .with_status(200)
            .with_body(
                r#"{
                    "total_power_wh": 1000,
                    "daily_kwh": 1.0,
                    "monthly_kwh": 30.0,
                    "tariff_rate": 1444.7,
                    "estimated_monthly_rp": "Rp 43.341",
                    "ai_response": "Consider an inverter fridge.",
                    "id_submit": 3,
                    "besar_listrik": "1.300 VA"
                }"#,
            )
            .create_async()
            .await;
        let client = client_for(&server).await?;

        let analysis = client.analyze(&[device()], "1.300 VA").await?;
        assert_eq!(analysis.ai_response.as_deref(), Some("Consider an inverter fridge."));
        assert_eq!(analysis.monthly_kwh, 30.0);
        assert_eq!(analysis.total_power_wh, 1000.0);
        assert_eq!(analysis.id_submit, Some(Identifier::Number(3)));
        mock.assert_async().await;
        Ok(())
    }
}
