//! The page and endpoint for creating a product.

use axum::{
    Extension,
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::html;

use crate::{
    Error,
    endpoints,
    gateway::{ImageUpload, NewProduct},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE,
        base, loading_spinner,
    },
    navigation::NavBar,
    products::ProductsState,
    session::Session,
};

/// Display the form for creating a product.
pub async fn get_new_product_page() -> Response {
    let nav_bar = NavBar::new(endpoints::PRODUCTS_VIEW);
    let content = html! {
        (nav_bar.into_html())

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-6" { "New product" }

            form
                hx-post=(endpoints::PRODUCTS_API)
                hx-encoding="multipart/form-data"
                hx-target-error="#alert-container"
                hx-indicator="#indicator"
                hx-disabled-elt="#product-name, #product-quantity, #threshold-low, #threshold-critical, #product-image, #create-product-button"
                class="w-full max-w-md flex flex-col gap-4"
            {
                div
                {
                    label for="product-name" class=(FORM_LABEL_STYLE) { "Name" }

                    input
                        type="text"
                        name="name"
                        id="product-name"
                        class=(FORM_TEXT_INPUT_STYLE)
                        required;
                }

                div
                {
                    label for="product-quantity" class=(FORM_LABEL_STYLE) { "Starting quantity" }

                    input
                        type="number"
                        name="quantity"
                        id="product-quantity"
                        min="0"
                        step="1"
                        value="0"
                        class=(FORM_TEXT_INPUT_STYLE)
                        required;
                }

                div
                {
                    label for="threshold-low" class=(FORM_LABEL_STYLE) { "Low stock threshold" }

                    input
                        type="number"
                        name="threshold_low"
                        id="threshold-low"
                        min="0"
                        step="1"
                        value="0"
                        class=(FORM_TEXT_INPUT_STYLE)
                        required;
                }

                div
                {
                    label for="threshold-critical" class=(FORM_LABEL_STYLE) { "Critical stock threshold" }

                    input
                        type="number"
                        name="threshold_critical"
                        id="threshold-critical"
                        min="0"
                        step="1"
                        value="0"
                        class=(FORM_TEXT_INPUT_STYLE)
                        required;
                }

                div
                {
                    label for="product-image" class=(FORM_LABEL_STYLE) { "Image (optional)" }

                    input
                        type="file"
                        name="image"
                        id="product-image"
                        accept="image/*"
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                button type="submit" id="create-product-button" class=(BUTTON_PRIMARY_STYLE)
                {
                    span class="inline htmx-indicator" id="indicator" { (loading_spinner()) }
                    "Create product"
                }
            }
        }
    };

    base("New Product", &content).into_response()
}

fn parse_count(raw: &str, field: &str) -> Result<i64, Error> {
    match raw.trim().parse::<i64>() {
        Ok(count) if count >= 0 => Ok(count),
        _ => Err(Error::MultipartError(format!(
            "{field} must be a whole number of zero or more"
        ))),
    }
}

/// Read the new-product form out of a multipart body.
///
/// # Errors
///
/// Returns [Error::MultipartError] if the body cannot be read, a required
/// field is missing, or a count field is not a non-negative whole number.
async fn parse_new_product(mut multipart: Multipart) -> Result<NewProduct, Error> {
    let mut name = None;
    let mut quantity = None;
    let mut threshold_low = None;
    let mut threshold_critical = None;
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| Error::MultipartError(error.to_string()))?
    {
        let Some(field_name) = field.name().map(ToOwned::to_owned) else {
            continue;
        };

        if field_name == "image" {
            let file_name = field.file_name().map(ToOwned::to_owned);
            let content_type = field.content_type().map(ToOwned::to_owned);
            let bytes = field
                .bytes()
                .await
                .map_err(|error| Error::MultipartError(error.to_string()))?;

            // An empty file input still submits an empty part.
            if let Some(file_name) = file_name.filter(|file_name| !file_name.is_empty())
                && !bytes.is_empty()
            {
                image = Some(ImageUpload {
                    file_name,
                    content_type: content_type
                        .unwrap_or_else(|| "application/octet-stream".to_owned()),
                    bytes: bytes.to_vec(),
                });
            }

            continue;
        }

        let text = field
            .text()
            .await
            .map_err(|error| Error::MultipartError(error.to_string()))?;

        match field_name.as_str() {
            "name" => name = Some(text),
            "quantity" => quantity = Some(parse_count(&text, "quantity")?),
            "threshold_low" => threshold_low = Some(parse_count(&text, "threshold_low")?),
            "threshold_critical" => {
                threshold_critical = Some(parse_count(&text, "threshold_critical")?)
            }
            _ => {}
        }
    }

    let name = name
        .map(|name| name.trim().to_owned())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| Error::MultipartError("the product needs a name".to_owned()))?;

    Ok(NewProduct {
        name,
        quantity: quantity.unwrap_or(0),
        threshold_low: threshold_low.unwrap_or(0),
        threshold_critical: threshold_critical.unwrap_or(0),
        image,
    })
}

/// Create a product from the multipart form, then redirect to the product
/// list.
pub async fn post_create_product(
    State(state): State<ProductsState>,
    Extension(session): Extension<Session>,
    multipart: Multipart,
) -> Response {
    let product = match parse_new_product(multipart).await {
        Ok(product) => product,
        Err(error) => return error.into_alert_response(),
    };

    if let Err(error) = state.api.create_product(&session, product).await {
        return error.into_alert_response();
    }

    (
        StatusCode::SEE_OTHER,
        HxRedirect(endpoints::PRODUCTS_VIEW.to_owned()),
        (),
    )
        .into_response()
}

#[cfg(test)]
mod create_product_tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use axum::{
        Json, Router,
        extract::{Multipart, State as AxumState},
        http::StatusCode,
        routing::post,
    };
    use axum_test::{
        TestServer, TestServerConfig, Transport,
        multipart::{MultipartForm, Part},
    };
    use serde_json::{Value, json};

    use crate::{AppState, endpoints, routing::build_router};

    #[derive(Clone, Default)]
    struct BackendCalls {
        creates: Arc<AtomicUsize>,
    }

    async fn stub_log_in() -> Json<Value> {
        Json(json!({"token": "token-1", "storeId": "store-1"}))
    }

    async fn stub_create(
        AxumState(calls): AxumState<BackendCalls>,
        mut multipart: Multipart,
    ) -> (StatusCode, Json<Value>) {
        calls.creates.fetch_add(1, Ordering::SeqCst);
        let mut fields = Vec::new();

        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().unwrap().to_owned();

            if name == "image" {
                let bytes = field.bytes().await.unwrap();
                fields.push((name, format!("{} bytes", bytes.len())));
            } else {
                fields.push((name, field.text().await.unwrap()));
            }
        }

        assert!(fields.iter().any(|(name, value)| name == "storeId" && value == "store-1"));
        assert!(fields.iter().any(|(name, value)| name == "name" && value == "Cotton Saree"));
        assert!(fields.iter().any(|(name, value)| name == "quantity" && value == "12"));

        (StatusCode::OK, Json(json!({"message": "Product created"})))
    }

    fn spawn_backend(calls: BackendCalls) -> TestServer {
        let app = Router::new()
            .route("/auth/login", post(stub_log_in))
            .route("/products", post(stub_create))
            .with_state(calls);
        let config = TestServerConfig {
            transport: Some(Transport::HttpRandomPort),
            ..TestServerConfig::default()
        };

        TestServer::try_new_with_config(app, config).expect("Could not create stub backend.")
    }

    async fn logged_in_console(backend: &TestServer) -> TestServer {
        let state = AppState::new(
            backend.server_address().unwrap().as_str(),
            "foobar",
            Default::default(),
        );
        let mut server =
            TestServer::try_new(build_router(state)).expect("Could not create test server.");

        let form = [("name", "My Store"), ("password", "sesame")];
        let cookies = server.post(endpoints::LOG_IN_API).form(&form).await.cookies();
        server.add_cookies(cookies);

        server
    }

    fn product_form() -> MultipartForm {
        MultipartForm::new()
            .add_text("name", "Cotton Saree")
            .add_text("quantity", "12")
            .add_text("threshold_low", "10")
            .add_text("threshold_critical", "3")
    }

    #[tokio::test]
    async fn creating_a_product_redirects_to_the_list() {
        let calls = BackendCalls::default();
        let backend = spawn_backend(calls.clone());
        let server = logged_in_console(&backend).await;

        let response = server
            .post(endpoints::PRODUCTS_API)
            .multipart(product_form())
            .await;

        response.assert_status_see_other();
        assert_eq!(
            response.header("hx-redirect"),
            endpoints::PRODUCTS_VIEW,
            "should redirect to the product list"
        );
        assert_eq!(calls.creates.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn image_uploads_are_forwarded() {
        let calls = BackendCalls::default();
        let backend = spawn_backend(calls.clone());
        let server = logged_in_console(&backend).await;
        let form = product_form().add_part(
            "image",
            Part::bytes(vec![0u8; 16])
                .file_name("saree.png")
                .mime_type("image/png"),
        );

        let response = server.post(endpoints::PRODUCTS_API).multipart(form).await;

        response.assert_status_see_other();
        assert_eq!(calls.creates.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn blank_names_are_rejected_without_calling_the_backend() {
        let calls = BackendCalls::default();
        let backend = spawn_backend(calls.clone());
        let server = logged_in_console(&backend).await;
        let form = MultipartForm::new()
            .add_text("name", "   ")
            .add_text("quantity", "12");

        let response = server.post(endpoints::PRODUCTS_API).multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_text_contains("needs a name");
        assert_eq!(calls.creates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn negative_counts_are_rejected() {
        let calls = BackendCalls::default();
        let backend = spawn_backend(calls.clone());
        let server = logged_in_console(&backend).await;
        let form = MultipartForm::new()
            .add_text("name", "Cotton Saree")
            .add_text("quantity", "-4");

        let response = server.post(endpoints::PRODUCTS_API).multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(calls.creates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn new_product_page_renders_the_form() {
        let backend = spawn_backend(BackendCalls::default());
        let server = logged_in_console(&backend).await;

        let response = server.get(endpoints::NEW_PRODUCT_VIEW).await;

        response.assert_status_ok();
        let document = scraper::Html::parse_document(&response.text());
        let form_selector = scraper::Selector::parse(&format!(
            "form[hx-post=\"{}\"][hx-encoding=\"multipart/form-data\"]",
            endpoints::PRODUCTS_API
        ))
        .unwrap();
        assert!(document.select(&form_selector).next().is_some());
    }
}
