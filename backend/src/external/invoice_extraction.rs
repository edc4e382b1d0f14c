//! Invoice Extraction Client
//!
//! Client for a Gemini-style document-understanding API. The document is
//! sent inline as base64 together with a Portuguese extraction instruction
//! and a JSON response schema; the service answers with structured invoice
//! data.

use base64::Engine;
use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use shared::matching::{ExtractedInvoice, ExtractedItem};

use crate::error::{AppError, AppResult};

const ENTRY_PROMPT: &str = "Extraia as seguintes informações desta nota fiscal: o nome do fornecedor, a data da emissão (no formato AAAA-MM-DD), e uma lista de produtos com nome e quantidade. Retorne a resposta em formato JSON.";

const PRODUCT_PROMPT: &str = "Extraia uma lista de nomes de produtos únicos desta nota fiscal. Não inclua quantidades ou preços, apenas os nomes dos itens. Retorne a resposta em formato JSON.";

/// Client for the invoice extraction service
#[derive(Clone)]
pub struct InvoiceExtractionClient {
    api_endpoint: String,
    api_key: String,
    model: String,
    http_client: Client,
}

/// Invoice payload as returned by the extraction service
#[derive(Debug, Deserialize)]
struct InvoiceJson {
    supplier: String,
    date: String,
    items: Vec<ItemJson>,
}

#[derive(Debug, Deserialize)]
struct ItemJson {
    name: String,
    quantity: i64,
}

/// Product-name-only payload for the catalog import variant
#[derive(Debug, Deserialize)]
struct ProductNamesJson {
    items: Vec<NameJson>,
}

#[derive(Debug, Deserialize)]
struct NameJson {
    name: String,
}

/// Top-level generateContent response envelope
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

impl InvoiceExtractionClient {
    /// Create a new invoice extraction client
    pub fn new(api_endpoint: String, api_key: String, model: String) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_endpoint,
            api_key,
            model,
            http_client,
        })
    }

    /// Extract supplier, date, and items from an invoice document
    pub async fn extract_invoice(
        &self,
        document: &[u8],
        mime_type: &str,
    ) -> AppResult<ExtractedInvoice> {
        let schema = json!({
            "type": "OBJECT",
            "properties": {
                "supplier": { "type": "STRING", "description": "Nome do fornecedor" },
                "date": { "type": "STRING", "description": "Data no formato AAAA-MM-DD" },
                "items": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "name": { "type": "STRING", "description": "Nome do produto" },
                            "quantity": { "type": "NUMBER", "description": "Quantidade do produto" }
                        },
                        "required": ["name", "quantity"]
                    }
                }
            },
            "required": ["supplier", "date", "items"]
        });

        let text = self
            .generate(document, mime_type, ENTRY_PROMPT, schema)
            .await?;
        parse_invoice_json(&text)
    }

    /// Extract only unique product names from an invoice document
    pub async fn extract_product_names(
        &self,
        document: &[u8],
        mime_type: &str,
    ) -> AppResult<Vec<String>> {
        let schema = json!({
            "type": "OBJECT",
            "properties": {
                "items": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "name": { "type": "STRING", "description": "Nome do produto" }
                        },
                        "required": ["name"]
                    }
                }
            },
            "required": ["items"]
        });

        let text = self
            .generate(document, mime_type, PRODUCT_PROMPT, schema)
            .await?;
        parse_product_names_json(&text)
    }

    /// Send a generateContent request and return the response text
    async fn generate(
        &self,
        document: &[u8],
        mime_type: &str,
        prompt: &str,
        schema: serde_json::Value,
    ) -> AppResult<String> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(document);

        let body = json!({
            "contents": {
                "parts": [
                    { "text": prompt },
                    { "inline_data": { "mime_type": mime_type, "data": encoded } }
                ]
            },
            "generation_config": {
                "response_mime_type": "application/json",
                "response_schema": schema
            }
        });

        let url = format!(
            "{}/models/{}:generateContent",
            self.api_endpoint, self.model
        );

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ExtractionError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ExtractionError(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        let result: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExtractionError(format!("Failed to parse response: {}", e)))?;

        result
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| AppError::ExtractionError("Empty response from API".to_string()))
    }
}

/// Parse the structured invoice JSON returned by the extraction service
///
/// An unparseable date is tolerated and surfaced as `None`; the handler
/// substitutes today's date so the operator can still review the batch.
pub fn parse_invoice_json(text: &str) -> AppResult<ExtractedInvoice> {
    let parsed: InvoiceJson = serde_json::from_str(text)
        .map_err(|e| AppError::ExtractionError(format!("Malformed invoice JSON: {}", e)))?;

    let date = NaiveDate::parse_from_str(&parsed.date, "%Y-%m-%d").ok();

    Ok(ExtractedInvoice {
        supplier: parsed.supplier,
        date,
        items: parsed
            .items
            .into_iter()
            .map(|i| ExtractedItem {
                name: i.name,
                quantity: i.quantity,
            })
            .collect(),
    })
}

/// Parse the product-names-only JSON returned by the extraction service
pub fn parse_product_names_json(text: &str) -> AppResult<Vec<String>> {
    let parsed: ProductNamesJson = serde_json::from_str(text)
        .map_err(|e| AppError::ExtractionError(format!("Malformed product list JSON: {}", e)))?;

    Ok(parsed.items.into_iter().map(|i| i.name).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_invoice() {
        let text = r#"{
            "supplier": "Medic Distribuidora",
            "date": "2024-05-20",
            "items": [
                { "name": "Luva Nitrílica M", "quantity": 10 },
                { "name": "Gaze Estéril", "quantity": 50 }
            ]
        }"#;

        let invoice = parse_invoice_json(text).unwrap();
        assert_eq!(invoice.supplier, "Medic Distribuidora");
        assert_eq!(
            invoice.date,
            Some(NaiveDate::from_ymd_opt(2024, 5, 20).unwrap())
        );
        assert_eq!(invoice.items.len(), 2);
        assert_eq!(invoice.items[0].name, "Luva Nitrílica M");
        assert_eq!(invoice.items[1].quantity, 50);
    }

    #[test]
    fn bad_date_becomes_none() {
        let text = r#"{ "supplier": "X", "date": "20/05/2024", "items": [] }"#;
        let invoice = parse_invoice_json(text).unwrap();
        assert_eq!(invoice.date, None);
    }

    #[test]
    fn malformed_json_is_an_extraction_error() {
        let result = parse_invoice_json("not json at all");
        assert!(matches!(result, Err(AppError::ExtractionError(_))));
    }

    #[test]
    fn parses_product_names() {
        let text = r#"{ "items": [ { "name": "Álcool 70%" }, { "name": "Algodão" } ] }"#;
        let names = parse_product_names_json(text).unwrap();
        assert_eq!(names, vec!["Álcool 70%".to_string(), "Algodão".to_string()]);
    }
}
