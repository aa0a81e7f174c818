use serde_json::{Value, json};
use tracing::info;
use tracing_test::traced_test;
use vgapi_e2e_tests::{
    extend_url, launch_env,
    rest::{create_game, create_manufacturer},
};

#[tokio::test]
#[traced_test]
async fn test_manufacturer_crud() {
    let (client, base_url, _config_guard, _server) =
        launch_env("test_manufacturer_crud").await.unwrap();
    let api_url = extend_url(&base_url, "fabricantes");

    let response = client.get(api_url.clone()).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let list: Vec<Value> = response.json().await.unwrap();
    assert!(list.is_empty());

    let id = create_manufacturer(&client, &base_url, "Capcom", Some("Osaka"))
        .await
        .unwrap();
    let record_url = extend_url(&api_url, id);

    let response = client.get(record_url.clone()).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let record: Value = response.json().await.unwrap();
    info!("Manufacturer: {record:#?}");
    assert_eq!(record["name"], "Capcom");
    assert_eq!(record["surname"], "Osaka");
    assert_eq!(record["juegos"], json!([]));
    assert!(record["createdAt"].is_string());

    let response = client
        .put(record_url.clone())
        .json(&json!({"surname": "Tokyo"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Registro Actualizado Correctamente");

    let response = client
        .put(record_url.clone())
        .json(&json!({"name": "Capcom", "surname": "Tokyo"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["message"],
        "No se modifico el registro / no se encontraron nuevos cambios."
    );

    let response = client.delete(record_url.clone()).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Registro Borrado Correctamente");

    let response = client.get(record_url.clone()).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Fabricante no encontrado.");

    let response = client
        .put(record_url.clone())
        .json(&json!({"name": "Ghost"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);

    let response = client.delete(record_url).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
#[traced_test]
async fn test_manufacturer_with_games() {
    let (client, base_url, _config_guard, _server) =
        launch_env("test_manufacturer_with_games").await.unwrap();
    let api_url = extend_url(&base_url, "fabricantes");

    let konami = create_manufacturer(&client, &base_url, "Konami", None)
        .await
        .unwrap();
    let atlus = create_manufacturer(&client, &base_url, "Atlus", None)
        .await
        .unwrap();
    for title in ["Metal Gear", "Castlevania"] {
        create_game(&client, &base_url, title, "accion", konami, "active")
            .await
            .unwrap();
    }

    let response = client.get(api_url.clone()).send().await.unwrap();
    let list: Vec<Value> = response.json().await.unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["name"], "Konami");
    assert_eq!(list[0]["juegos"].as_array().unwrap().len(), 2);
    assert_eq!(list[0]["juegos"][0]["title"], "Metal Gear");
    assert!(list[0]["juegos"][0].get("fabricante").is_none());
    assert_eq!(list[1]["juegos"], json!([]));

    let response = client
        .delete(extend_url(&api_url, konami))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 409);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["kind"], "conflict");

    let response = client
        .delete(extend_url(&api_url, atlus))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
#[traced_test]
async fn test_manufacturer_invalid_input() {
    let (client, base_url, _config_guard, _server) =
        launch_env("test_manufacturer_invalid_input").await.unwrap();
    let api_url = extend_url(&base_url, "fabricantes");

    for id in ["0", "abc", "-3", "1.5"] {
        for request in [
            client.get(extend_url(&api_url, id)),
            client.delete(extend_url(&api_url, id)),
            client.put(extend_url(&api_url, id)).json(&json!({"name": "X"})),
        ] {
            let response = request.send().await.unwrap();
            assert_eq!(response.status().as_u16(), 400, "id {id}");
            let body: Value = response.json().await.unwrap();
            assert_eq!(body["message"], "El ID debe ser un número entero mayor a 0.");
        }
    }

    let response = client
        .post(api_url.clone())
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let response = client
        .post(api_url)
        .json(&json!({"name": "n".repeat(300)}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["kind"], "validation");
}
