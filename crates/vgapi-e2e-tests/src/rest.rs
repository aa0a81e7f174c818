use anyhow::Result;
use reqwest::{StatusCode, Url};
use serde_json::{Value, json};
use tracing::info;

use crate::extend_url;

async fn create(client: &reqwest::Client, url: Url, payload: &Value) -> Result<i64> {
    let response = client.post(url).json(payload).send().await?;
    info!("Create response: {:#?}", response);
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await?;
    assert_eq!(body["message"], "Registro creado correctamente");
    body["id"]
        .as_i64()
        .ok_or_else(|| anyhow::anyhow!("Missing id in {body}"))
}

pub async fn create_manufacturer(
    client: &reqwest::Client,
    base_url: &Url,
    name: &str,
    surname: Option<&str>,
) -> Result<i64> {
    let payload = json!({"name": name, "surname": surname});
    create(client, extend_url(base_url, "fabricantes"), &payload).await
}

pub async fn create_game(
    client: &reqwest::Client,
    base_url: &Url,
    title: &str,
    categorie: &str,
    manufacturer: i64,
    status: &str,
) -> Result<i64> {
    let payload = json!({
        "title": title,
        "categorie": categorie,
        "manufacturer": manufacturer,
        "price": 19.99,
        "status": status,
    });
    create(client, extend_url(base_url, "videojuegos"), &payload).await
}
