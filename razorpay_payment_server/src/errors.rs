use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use log::*;
use razorpay_payment_engine::{OrderGatewayError, OrderStoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    /// Deliberately says nothing about why the request was rejected. A missing signature, a bad signature and a body
    /// that can't be parsed all look the same to the caller.
    #[error("Webhook request rejected.")]
    RejectedWebhook,
    #[error("Invalid order data. {0}")]
    InvalidOrderData(String),
    #[error("Order creation failed.")]
    OrderCreationFailed(#[from] OrderGatewayError),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::RejectedWebhook => StatusCode::BAD_REQUEST,
            Self::InvalidOrderData(_) => StatusCode::BAD_REQUEST,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::OrderCreationFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

impl From<OrderStoreError> for ServerError {
    fn from(e: OrderStoreError) -> Self {
        match &e {
            OrderStoreError::OrderAlreadyExists(oid) => {
                error!("The gateway issued order id {oid} twice, with different order details.")
            },
            OrderStoreError::OrderNotFound(_) => error!("Order store error. {e}"),
        }
        Self::BackendError("Could not save the order.".into())
    }
}
