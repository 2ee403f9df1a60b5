//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Any long, non-cpu-bound operation (e.g. calls to the payment
//! gateway) must be expressed as futures or asynchronous functions, so that the worker can handle other requests while
//! it waits.
use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use razorpay_payment_engine::{
    db_types::NewOrder,
    traits::{GatewayOrderRequest, OrderGateway, OrderStore},
    webhook_objects::WebhookEvent,
    OrderFlowApi,
};

use crate::{
    config::ServerOptions,
    data_objects::{CreateOrderRequest, JsonResponse, OrderDetails},
    errors::ServerError,
    helpers::new_receipt,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Banner  ----------------------------------------------------
#[get("/")]
pub async fn banner() -> impl Responder {
    trace!("💻️ Received banner request");
    HttpResponse::Ok().body("Razorpay payment gateway backend is running 🚀")
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(create_order => Post "/create-order" impl OrderStore, OrderGateway);
/// Route handler for the order creation endpoint
///
/// The storefront calls this when the customer starts checkout. The body is a JSON object with
/// * `amount` - the order total in major units (e.g. rupees). A number or a numeric string.
/// * `customer` - `{name, mobile, address}`
/// * `cartItems` - `[{name, qty}]`
///
/// The order is opened on the payment gateway and, once the gateway has assigned it an id, stored as `Pending`. The
/// gateway's order object is returned verbatim, since the checkout widget needs it.
pub async fn create_order<BStore, BGateway>(
    body: web::Json<CreateOrderRequest>,
    api: web::Data<OrderFlowApi<BStore>>,
    gateway: web::Data<BGateway>,
    options: web::Data<ServerOptions>,
) -> Result<HttpResponse, ServerError>
where
    BStore: OrderStore,
    BGateway: OrderGateway,
{
    trace!("💻️ Received order creation request");
    let details = OrderDetails::try_from(body.into_inner())?;
    let receipt = new_receipt(&options.receipt_prefix);
    let request = GatewayOrderRequest {
        amount: details.amount.minor_units(),
        currency: options.currency.clone(),
        receipt: receipt.clone(),
    };
    let gateway_order = gateway.create_gateway_order(request).await.map_err(|e| {
        warn!("💻️ The gateway could not create an order for receipt {receipt}. {e}");
        e
    })?;
    let order = NewOrder::new(gateway_order.order_id, details.amount, details.customer, details.cart_items)
        .with_currency(options.currency.as_str())
        .with_receipt(receipt);
    let order = api.create_order(order).await?;
    debug!("💻️ {order}");
    Ok(HttpResponse::Ok().json(gateway_order.raw))
}

//----------------------------------------------   Webhook  ----------------------------------------------------
route!(razorpay_webhook => Post "" impl OrderStore);
/// Route handler for payment gateway notifications
///
/// This route MUST be wrapped in the HMAC middleware, which authenticates the raw body before this handler sees it.
/// The body is taken as bytes, so that exactly what was signed is what gets parsed.
///
/// Every notification that passes authentication and parses is acknowledged with a 200, including notifications for
/// unknown orders, repeated deliveries, and event types we don't act on. A body that can't be parsed is rejected with
/// the same response as a bad signature.
pub async fn razorpay_webhook<BStore: OrderStore>(
    body: web::Bytes,
    api: web::Data<OrderFlowApi<BStore>>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ Received webhook call");
    let event = WebhookEvent::from_slice(body.as_ref()).map_err(|e| {
        warn!("💻️ Could not parse an authenticated webhook body. {e}");
        ServerError::RejectedWebhook
    })?;
    debug!("💻️ Webhook event '{}' received", event.event_type());
    let outcome = api.process_webhook_event(event).await.map_err(|e| {
        error!("💻️ Could not process webhook event. {e}");
        ServerError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(JsonResponse::success(outcome)))
}

//----------------------------------------------   CORS  ----------------------------------------------------
/// Answers the browser's preflight request for `/create-order`. The allowed origin is added to every response by the
/// server's default headers.
pub async fn cors_preflight() -> impl Responder {
    trace!("💻️ Received CORS preflight request");
    HttpResponse::NoContent()
        .insert_header(("Access-Control-Allow-Methods", "POST, OPTIONS"))
        .insert_header(("Access-Control-Allow-Headers", "Content-Type"))
        .insert_header(("Access-Control-Max-Age", "86400"))
        .finish()
}
