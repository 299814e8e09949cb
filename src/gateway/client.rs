//! The HTTP client for the backend API.
//!
//! Every operation the console performs goes through [ApiClient]: one method
//! per backend endpoint, JSON in and out (multipart for product creation).
//! The client attaches the session's bearer token, maps non-2xx responses to
//! [Error::Backend] with the server's message, and performs no retries — a
//! failed request is terminal for that user action.

use reqwest::{Method, RequestBuilder, multipart};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::{
    Error,
    gateway::{
        models::{
            CreateStoreResponse, Customer, HistoryFilter, LoginResponse, NewEntry, NewProduct,
            Product, ProductPatch, StockEvent,
        },
        notice::extract_notice,
    },
    session::Session,
};

/// A deserialized response body plus the backend's optional notice.
#[derive(Debug, Clone)]
pub struct Payload<T> {
    pub value: T,
    /// The `message`/`msg` field of the response, to surface as a toast.
    pub notice: Option<String>,
}

/// The client for the remote backend API.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// Create a client for the backend at `base_url`, e.g.
    /// "https://api.example.com".
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            http: reqwest::Client::new(),
        }
    }

    /// The base URL the client was created with.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The absolute URL for a file path returned by the backend, e.g. a
    /// product image reference.
    pub fn file_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str, session: Option<&Session>) -> RequestBuilder {
        let request = self.http.request(method, format!("{}{path}", self.base_url));

        match session {
            Some(session) if !session.token.is_empty() => request.bearer_auth(&session.token),
            _ => request,
        }
    }

    /// Send `request` and deserialize the JSON body into `T`.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - [Error::Network] if the request could not be sent.
    /// - [Error::Backend] for any non-2xx response, carrying the server's
    ///   message when one was sent.
    /// - [Error::InvalidResponse] if a 2xx body cannot be parsed as `T`.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Payload<T>, Error> {
        let response = request
            .send()
            .await
            .map_err(|error| Error::Network(error.to_string()))?;
        let status = response.status();
        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(_) if !status.is_success() => {
                return Err(Error::Backend {
                    status: status.as_u16(),
                    message: None,
                });
            }
            Err(error) => return Err(Error::InvalidResponse(error.to_string())),
        };

        let notice = extract_notice(&body);

        if !status.is_success() {
            return Err(Error::Backend {
                status: status.as_u16(),
                message: notice,
            });
        }

        let value = serde_json::from_value(body)
            .map_err(|error| Error::InvalidResponse(error.to_string()))?;

        Ok(Payload { value, notice })
    }

    /// Send `request` for its side effect, returning only the backend's
    /// notice. Non-JSON success bodies are tolerated.
    async fn send_for_notice(&self, request: RequestBuilder) -> Result<Option<String>, Error> {
        let response = request
            .send()
            .await
            .map_err(|error| Error::Network(error.to_string()))?;
        let status = response.status();
        let notice = response
            .text()
            .await
            .ok()
            .and_then(|text| serde_json::from_str::<Value>(&text).ok())
            .as_ref()
            .and_then(extract_notice);

        if !status.is_success() {
            return Err(Error::Backend {
                status: status.as_u16(),
                message: notice,
            });
        }

        Ok(notice)
    }

    /// Log a store in. `POST /auth/login`.
    pub async fn log_in(&self, name: &str, password: &str) -> Result<Payload<LoginResponse>, Error> {
        let request = self
            .request(Method::POST, "/auth/login", None)
            .json(&json!({ "name": name, "password": password }));

        self.send(request).await
    }

    /// Create a store account. `POST /auth/create-store`.
    pub async fn create_store(
        &self,
        name: &str,
        password: &str,
    ) -> Result<Payload<CreateStoreResponse>, Error> {
        let request = self
            .request(Method::POST, "/auth/create-store", None)
            .json(&json!({ "name": name, "password": password }));

        self.send(request).await
    }

    /// List the store's customers. `GET /users?storeId=`.
    pub async fn customers(&self, session: &Session) -> Result<Payload<Vec<Customer>>, Error> {
        let request = self
            .request(Method::GET, "/users", Some(session))
            .query(&[("storeId", session.store_id.as_str())]);

        self.send(request).await
    }

    /// Fetch a single customer by re-fetching the list and searching it.
    ///
    /// The backend has no single-customer endpoint, so an absent customer
    /// surfaces as [Error::NotFound] here rather than as a backend 404.
    pub async fn customer(&self, session: &Session, customer_id: &str) -> Result<Customer, Error> {
        let customers = self.customers(session).await?.value;

        customers
            .into_iter()
            .find(|customer| customer.id == customer_id)
            .ok_or(Error::NotFound)
    }

    /// Create a customer. `POST /users`.
    pub async fn create_customer(
        &self,
        session: &Session,
        name: &str,
        password: &str,
    ) -> Result<Option<String>, Error> {
        let request = self.request(Method::POST, "/users", Some(session)).json(&json!({
            "storeId": session.store_id,
            "name": name,
            "password": password,
        }));

        self.send_for_notice(request).await
    }

    /// Verify a customer's credential. `POST /users/{id}/verify`.
    pub async fn verify_customer(
        &self,
        session: &Session,
        customer_id: &str,
        password: &str,
    ) -> Result<Option<String>, Error> {
        let request = self
            .request(
                Method::POST,
                &format!("/users/{customer_id}/verify"),
                Some(session),
            )
            .json(&json!({ "password": password }));

        self.send_for_notice(request).await
    }

    /// Append a ledger entry. `POST /users/{id}/entries`.
    pub async fn add_entry(
        &self,
        session: &Session,
        customer_id: &str,
        entry: &NewEntry,
    ) -> Result<Option<String>, Error> {
        let request = self
            .request(
                Method::POST,
                &format!("/users/{customer_id}/entries"),
                Some(session),
            )
            .json(entry);

        self.send_for_notice(request).await
    }

    /// List the store's products. `GET /products?storeId=`.
    pub async fn products(&self, session: &Session) -> Result<Payload<Vec<Product>>, Error> {
        let request = self
            .request(Method::GET, "/products", Some(session))
            .query(&[("storeId", session.store_id.as_str())]);

        self.send(request).await
    }

    /// Fetch a single product. `GET /products/{id}`.
    pub async fn product(&self, session: &Session, product_id: &str) -> Result<Payload<Product>, Error> {
        let request = self.request(Method::GET, &format!("/products/{product_id}"), Some(session));

        self.send(request).await
    }

    /// Create a product with an optional image. `POST /products` (multipart).
    pub async fn create_product(
        &self,
        session: &Session,
        product: NewProduct,
    ) -> Result<Option<String>, Error> {
        let mut form = multipart::Form::new()
            .text("storeId", session.store_id.clone())
            .text("name", product.name)
            .text("quantity", product.quantity.to_string())
            .text("thresholdLow", product.threshold_low.to_string())
            .text("thresholdCritical", product.threshold_critical.to_string());

        if let Some(image) = product.image {
            let part = multipart::Part::bytes(image.bytes)
                .file_name(image.file_name)
                .mime_str(&image.content_type)
                .map_err(|error| Error::InvalidUpload(error.to_string()))?;
            form = form.part("image", part);
        }

        let request = self
            .request(Method::POST, "/products", Some(session))
            .multipart(form);

        self.send_for_notice(request).await
    }

    /// Update a product's fields, blocked flag or delete sentinel.
    /// `PATCH /products/{id}`.
    pub async fn update_product(
        &self,
        session: &Session,
        product_id: &str,
        patch: &ProductPatch,
    ) -> Result<Option<String>, Error> {
        let request = self
            .request(Method::PATCH, &format!("/products/{product_id}"), Some(session))
            .json(patch);

        self.send_for_notice(request).await
    }

    /// Fetch a product's stock history. `GET /products/{id}/history`.
    pub async fn stock_history(
        &self,
        session: &Session,
        product_id: &str,
        filter: &HistoryFilter,
    ) -> Result<Payload<Vec<StockEvent>>, Error> {
        let mut query: Vec<(&str, String)> = Vec::new();

        if let Some(from) = &filter.from {
            query.push(("from", from.clone()));
        }
        if let Some(to) = &filter.to {
            query.push(("to", to.clone()));
        }
        if let Some(kind) = filter.kind {
            query.push(("type", kind.as_str().to_owned()));
        }

        let request = self
            .request(
                Method::GET,
                &format!("/products/{product_id}/history"),
                Some(session),
            )
            .query(&query);

        self.send(request).await
    }

    /// Add stock to a product. `POST /products/{id}/history`.
    pub async fn add_stock(
        &self,
        session: &Session,
        product_id: &str,
        quantity: i64,
    ) -> Result<Option<String>, Error> {
        let request = self
            .request(
                Method::POST,
                &format!("/products/{product_id}/history"),
                Some(session),
            )
            .json(&json!({ "addedQuantity": quantity }));

        self.send_for_notice(request).await
    }

    /// Remove stock from a product. `POST /products/{id}/history/remove`.
    pub async fn remove_stock(
        &self,
        session: &Session,
        product_id: &str,
        quantity: i64,
    ) -> Result<Option<String>, Error> {
        let request = self
            .request(
                Method::POST,
                &format!("/products/{product_id}/history/remove"),
                Some(session),
            )
            .json(&json!({ "removedQuantity": quantity }));

        self.send_for_notice(request).await
    }
}
