use std::time::Duration;

use actix_web::{
    dev::{HttpServiceFactory, Server},
    http::{
        header::{HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN},
        KeepAlive,
        Method,
    },
    middleware::{DefaultHeaders, Logger},
    web,
    App,
    HttpServer,
};
use log::*;
use razorpay_payment_engine::{
    events::{EventHandlers, EventProducers},
    traits::{OrderGateway, OrderStore},
    InMemoryOrderStore,
    OrderFlowApi,
};

use crate::{
    config::{ServerConfig, ServerOptions, WebhookConfig},
    errors::ServerError,
    integrations::razorpay::RazorpayOrderGateway,
    middleware::{HmacMiddlewareFactory, RAZORPAY_SIGNATURE_HEADER},
    notifier::{create_notifier, order_paid_hooks},
    routes::{banner, cors_preflight, health, CreateOrderRoute, RazorpayWebhookRoute},
    stale_order_worker::start_stale_order_worker,
};

const EVENT_BUFFER_SIZE: usize = 256;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    warn!(
        "🚨️ Orders are held in memory only. Every order, paid or not, is lost when the server stops. Pending orders \
         are never expired. 🚨️"
    );
    let store = InMemoryOrderStore::new();
    let notifier = create_notifier(&config.notifier).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let handlers = EventHandlers::new(EVENT_BUFFER_SIZE, order_paid_hooks(notifier));
    let producers = handlers.producers();
    let _event_jobs = handlers.start_handlers();
    let gateway = RazorpayOrderGateway::new(config.razorpay_config.clone())
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let _reporter =
        start_stale_order_worker(store.clone(), config.stale_order_report_interval, config.stale_order_age);
    let srv = create_server_instance(config, store, gateway, producers)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

/// Creates the HTTP server. Every worker shares the same order store and the same event producers, so orders created
/// through one worker can be paid through any other.
pub fn create_server_instance(
    config: ServerConfig,
    store: InMemoryOrderStore,
    gateway: RazorpayOrderGateway,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let cors_origin = HeaderValue::from_str(&config.cors_origin)
        .map_err(|e| ServerError::ConfigurationError(format!("Invalid CORS origin '{}'. {e}", config.cors_origin)))?;
    let options = ServerOptions::from_config(&config);
    let webhook = config.webhook.clone();
    let srv = HttpServer::new(move || {
        let orders_api = OrderFlowApi::new(store.clone(), producers.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("rpg::access_log"))
            .wrap(DefaultHeaders::new().add((ACCESS_CONTROL_ALLOW_ORIGIN, cors_origin.clone())))
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(gateway.clone()))
            .app_data(web::Data::new(options.clone()))
            .app_data(json_config())
            .service(banner)
            .service(health)
            .configure(order_routes::<InMemoryOrderStore, RazorpayOrderGateway>)
            .service(webhook_scope::<InMemoryOrderStore>(webhook.clone()))
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// The order creation route, and its CORS preflight.
pub fn order_routes<BStore, BGateway>(cfg: &mut web::ServiceConfig)
where
    BStore: OrderStore + 'static,
    BGateway: OrderGateway + 'static,
{
    cfg.service(CreateOrderRoute::<BStore, BGateway>::new())
        .route("/create-order", web::method(Method::OPTIONS).to(cors_preflight));
}

/// The webhook route, wrapped in the signature check.
pub fn webhook_scope<B: OrderStore + 'static>(config: WebhookConfig) -> impl HttpServiceFactory {
    web::scope("/razorpay-webhook")
        .wrap(HmacMiddlewareFactory::new(RAZORPAY_SIGNATURE_HEADER, config.secret, config.hmac_checks))
        .service(RazorpayWebhookRoute::<B>::new())
}

/// JSON bodies that can't be read as an order request are reported as invalid order data.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        debug!("💻️ Rejecting request body. {err}");
        ServerError::InvalidOrderData(err.to_string()).into()
    })
}
